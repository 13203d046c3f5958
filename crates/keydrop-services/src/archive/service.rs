use anyhow::{Context, Result};
use keydrop_storage::BlobStorage;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

/// Sanitize a file name for use as an archive entry to prevent path
/// traversal. Extracts only the base name (strips components like `../`).
fn sanitize_archive_filename(file_name: &str, fallback: &str) -> String {
    Path::new(file_name)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|s| !s.is_empty() && *s != "." && *s != "..")
        .unwrap_or(fallback)
        .to_string()
}

/// Create a ZIP archive from stored blobs.
///
/// `entries` is a list of `(blob_key, file_name)` pairs. A blob whose
/// download fails is logged and skipped so one missing file does not sink
/// the whole archive.
pub async fn create_zip_archive(
    storage: Arc<dyn BlobStorage>,
    entries: Vec<(String, String)>,
) -> Result<Vec<u8>> {
    use zip::write::{FileOptions, ZipWriter};
    use zip::CompressionMethod;

    let mut buffer = Vec::new();
    {
        let mut zip = ZipWriter::new(std::io::Cursor::new(&mut buffer));
        let options = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .unix_permissions(0o644);

        for (index, (blob_key, file_name)) in entries.into_iter().enumerate() {
            let data = match storage.download(&blob_key).await {
                Ok(data) => data,
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        blob_key = %blob_key,
                        "Skipping unreadable blob in archive"
                    );
                    continue;
                }
            };

            let safe_name =
                sanitize_archive_filename(&file_name, &format!("unnamed_{}", index));

            zip.start_file(&safe_name, options)
                .with_context(|| format!("Failed to add file to ZIP: {}", safe_name))?;
            zip.write_all(&data)
                .with_context(|| format!("Failed to write file data to ZIP: {}", safe_name))?;
        }

        zip.finish().context("Failed to finalize ZIP archive")?;
    }

    Ok(buffer)
}
