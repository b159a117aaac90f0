//! Zip packaging of an assembled vault.
//!
//! Entry order follows [`Vault::files`], every entry sits under the vault
//! name, and timestamps stay at the zip default so repeated runs over the
//! same input produce byte-identical archives.

use std::io::{Seek, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::assemble::Vault;
use crate::error::Result;

/// Write a [`Vault`] to a zip archive on disk.
///
/// # Example
///
/// ```no_run
/// use lawvault::{convert_bytes, write_vault_zip, ConvertOptions};
///
/// let html = std::fs::read("stgb.html")?;
/// let vault = convert_bytes(&html, &ConvertOptions::default())?;
/// write_vault_zip(&vault, "StGB.zip")?;
/// # Ok::<(), lawvault::Error>(())
/// ```
pub fn write_vault_zip<P: AsRef<Path>>(vault: &Vault, path: P) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_vault_zip_to_writer(vault, file)
}

/// Write a [`Vault`] to any [`Write`] + [`Seek`] destination.
///
/// Useful for writing to memory buffers.
pub fn write_vault_zip_to_writer<W: Write + Seek>(vault: &Vault, writer: W) -> Result<()> {
    let mut zip = ZipWriter::new(writer);
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for file in &vault.files {
        zip.start_file(format!("{}/{}", vault.name, file.path), options)?;
        zip.write_all(file.content.as_bytes())?;
    }

    zip.finish()?;
    Ok(())
}
