//! Publishing generated media under `/uploads`.

use std::path::Path;

use aiplex_core::utils::media_file_name;
use aiplex_providers::GeneratedMedia;
use tracing::info;

/// URL prefix the uploads directory is served under.
pub const UPLOADS_ROUTE: &str = "/uploads";

/// Turn generated media into a URL the browser can load.
///
/// Remote URLs pass through; bytes are written to `uploads_dir` under a
/// fresh name.
pub async fn publish(uploads_dir: &Path, media: GeneratedMedia) -> std::io::Result<String> {
    match media {
        GeneratedMedia::Remote(url) => Ok(url),
        GeneratedMedia::Bytes { data, extension } => {
            tokio::fs::create_dir_all(uploads_dir).await?;
            let file_name = media_file_name(&extension);
            let path = uploads_dir.join(&file_name);
            tokio::fs::write(&path, &data).await?;
            info!(path = %path.display(), bytes = data.len(), "media saved");
            Ok(format!("{UPLOADS_ROUTE}/{file_name}"))
        }
    }
}
