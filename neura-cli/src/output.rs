//! Saving generated images.

use std::path::Path;

use neura_client::GenerationClient;
use neura_core::export::decode_data_uri;

use crate::error::{CliError, CliResult};

/// Resolve a generated image reference to bytes.
///
/// Data URIs are decoded locally; http(s) URLs are downloaded.
///
/// # Errors
///
/// Returns an error if the data URI is malformed, the download fails, or the
/// reference is of any other kind.
pub async fn fetch_image(client: &GenerationClient, image: &str) -> CliResult<Vec<u8>> {
    if image.starts_with("data:") {
        return Ok(decode_data_uri(image)?.bytes);
    }
    if image.starts_with("http://") || image.starts_with("https://") {
        tracing::debug!("Downloading generated image from {image}");
        return Ok(client.download(image).await?);
    }
    Err(CliError::UnsupportedImage(truncate(image, 64)))
}

/// Write bytes to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`CliError::Io`] if the directory or file cannot be written.
pub fn write_image(path: &Path, bytes: &[u8]) -> CliResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| CliError::io(parent, e))?;
    }
    std::fs::write(path, bytes).map_err(|e| CliError::io(path, e))?;
    tracing::info!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
