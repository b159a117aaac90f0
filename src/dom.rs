//! HTML parsing and DOM queries using html5ever
//!
//! Provides utilities for:
//! - Parsing HTML content into an rcdom tree
//! - Finding elements by name, class, or attribute
//! - Extracting text content and attribute values
//!
//! All query helpers operate on [`Handle`]s and never mutate the tree. The
//! statute documents this crate consumes are read-only input.

use std::default::Default;

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::ParseOpts;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// Parse HTML content into a DOM tree.
pub fn parse_html(html: &str) -> RcDom {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            drop_doctype: false,
            ..Default::default()
        },
        ..Default::default()
    };

    parse_document(RcDom::default(), opts)
        .from_utf8()
        .one(html.as_bytes())
}

/// Check whether a node is an element with the given local name.
pub fn is_element(handle: &Handle, name: &str) -> bool {
    match handle.data {
        NodeData::Element { name: ref qname, .. } => qname.local.as_ref() == name,
        _ => false,
    }
}

/// Get the local name of an element node.
pub fn element_name(handle: &Handle) -> Option<String> {
    match handle.data {
        NodeData::Element { ref name, .. } => Some(name.local.as_ref().to_string()),
        _ => None,
    }
}

/// Get an attribute value from an element.
pub fn get_attribute(handle: &Handle, attr_name: &str) -> Option<String> {
    if let NodeData::Element { ref attrs, .. } = handle.data {
        for attr in attrs.borrow().iter() {
            if attr.name.local.as_ref() == attr_name {
                return Some(attr.value.to_string());
            }
        }
    }
    None
}

/// Check whether an element's `class` attribute contains the given class.
pub fn has_class(handle: &Handle, class: &str) -> bool {
    get_attribute(handle, "class")
        .map(|value| value.split_whitespace().any(|c| c == class))
        .unwrap_or(false)
}

/// Get the element children of a node (text and comment nodes skipped).
pub fn child_elements(handle: &Handle) -> Vec<Handle> {
    handle
        .children
        .borrow()
        .iter()
        .filter(|child| matches!(child.data, NodeData::Element { .. }))
        .cloned()
        .collect()
}

/// Get the first element with the given local name.
pub fn find_first_element(handle: &Handle, name: &str) -> Option<Handle> {
    if is_element(handle, name) {
        return Some(handle.clone());
    }

    for child in handle.children.borrow().iter() {
        if let Some(found) = find_first_element(child, name) {
            return Some(found);
        }
    }

    None
}

/// Find all elements with the given local name, in document order.
pub fn find_elements_by_name(handle: &Handle, name: &str) -> Vec<Handle> {
    let mut results = Vec::new();
    find_elements_recursive(handle, name, &mut results);
    results
}

fn find_elements_recursive(handle: &Handle, name: &str, results: &mut Vec<Handle>) {
    if is_element(handle, name) {
        results.push(handle.clone());
    }

    for child in handle.children.borrow().iter() {
        find_elements_recursive(child, name, results);
    }
}

/// Get the first element whose attribute has the given value.
pub fn find_element_by_attr(handle: &Handle, attr_name: &str, value: &str) -> Option<Handle> {
    if let NodeData::Element { .. } = handle.data
        && get_attribute(handle, attr_name).as_deref() == Some(value)
    {
        return Some(handle.clone());
    }

    for child in handle.children.borrow().iter() {
        if let Some(found) = find_element_by_attr(child, attr_name, value) {
            return Some(found);
        }
    }

    None
}

/// Get the first descendant element with the given local name and class.
pub fn select_class(handle: &Handle, name: &str, class: &str) -> Option<Handle> {
    if is_element(handle, name) && has_class(handle, class) {
        return Some(handle.clone());
    }

    for child in handle.children.borrow().iter() {
        if let Some(found) = select_class(child, name, class) {
            return Some(found);
        }
    }

    None
}

/// Get text content from a node (ignoring tags).
pub fn text_content(handle: &Handle) -> String {
    let mut text = String::new();
    text_recursive(handle, &mut text);
    text
}

fn text_recursive(handle: &Handle, text: &mut String) {
    match handle.data {
        NodeData::Text { ref contents } => {
            text.push_str(&contents.borrow());
        }
        NodeData::Element { .. } | NodeData::Document => {
            for child in handle.children.borrow().iter() {
                text_recursive(child, text);
            }
        }
        _ => {}
    }
}
