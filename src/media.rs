use crate::error::{AppError, AppResult};
use nanoid::nanoid;
use std::path::PathBuf;

const EVENT_IMAGE_DIR: &str = "event_images";

/// Where uploaded media lives and whether this binary serves it back.
/// Serving is a dev convenience; production puts a web server in front.
#[derive(Debug, Clone)]
pub struct MediaConfig {
    pub root: PathBuf,
    pub serve: bool,
}

/// Stores an uploaded event image under the media root and returns the URL
/// path it will be served from. The bytes are sniffed; anything that is not
/// an image is rejected.
pub async fn save_event_image(config: &MediaConfig, bytes: &[u8]) -> AppResult<String> {
    let kind = infer::get(bytes)
        .ok_or_else(|| AppError::bad_request("could not determine the image type"))?;
    let mime_type = kind.mime_type().parse::<mime::Mime>()?;
    if mime_type.type_() != mime::IMAGE {
        return Err(AppError::bad_request("event image must be an image file"));
    }

    let file_name = format!("{}.{}", nanoid!(), kind.extension());
    let dir = config.root.join(EVENT_IMAGE_DIR);
    tokio::fs::create_dir_all(&dir).await?;
    tokio::fs::write(dir.join(&file_name), bytes).await?;

    Ok(format!("/media/{EVENT_IMAGE_DIR}/{file_name}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rejects_bytes_that_are_not_an_image() {
        let config = MediaConfig {
            root: std::env::temp_dir().join("campus_event_hub_media_test"),
            serve: false,
        };
        assert!(save_event_image(&config, b"just some text").await.is_err());
    }

    #[tokio::test]
    async fn stores_a_png_and_returns_its_url() {
        let config = MediaConfig {
            root: std::env::temp_dir().join("campus_event_hub_media_test"),
            serve: false,
        };
        // magic header is enough for type sniffing
        let png = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00];

        let url = save_event_image(&config, &png).await.unwrap();
        assert!(url.starts_with("/media/event_images/"));
        assert!(url.ends_with(".png"));

        let stored = config
            .root
            .join(EVENT_IMAGE_DIR)
            .join(url.rsplit('/').next().unwrap());
        assert!(stored.exists());
    }
}
