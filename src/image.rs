use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::debug;
use std::path::{Path, PathBuf};

use crate::error::ChefError;

/// Where the fridge photo comes from
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// Image from a file path
    Path(PathBuf),
    /// Raw image bytes, with an optional MIME type
    Bytes {
        data: Vec<u8>,
        mime_type: Option<String>,
    },
    /// Base64 payload, optionally a `data:` URL
    Base64 {
        data: String,
        mime_type: Option<String>,
    },
}

/// Image bytes ready to be sent inline to the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl ImageData {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    /// `data:<mime>;base64,<payload>` form used by OpenAI-style image inputs
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.to_base64())
    }
}

/// Read an image source into transmittable bytes
///
/// # Errors
/// Returns [`ChefError::ImageRead`] if the file cannot be read, the base64
/// payload is invalid, or the image is empty.
pub async fn read(source: &ImageSource) -> Result<ImageData, ChefError> {
    let (bytes, declared, path) = match source {
        ImageSource::Path(path) => {
            let bytes = tokio::fs::read(path)
                .await
                .map_err(|e| ChefError::ImageRead(format!("{}: {}", path.display(), e)))?;
            (bytes, None, Some(path.as_path()))
        }
        ImageSource::Bytes { data, mime_type } => (data.clone(), mime_type.clone(), None),
        ImageSource::Base64 { data, mime_type } => {
            let (url_mime, payload) = split_data_url(data);
            let bytes = STANDARD
                .decode(payload.trim())
                .map_err(|e| ChefError::ImageRead(format!("invalid base64: {}", e)))?;
            (bytes, mime_type.clone().or(url_mime), None)
        }
    };

    if bytes.is_empty() {
        return Err(ChefError::ImageRead("image is empty".to_string()));
    }

    let mime_type = declared
        .or_else(|| sniff_mime_type(&bytes).map(str::to_string))
        .or_else(|| path.and_then(mime_from_extension).map(str::to_string))
        .unwrap_or_else(|| "image/jpeg".to_string());

    debug!("Read image: {} bytes ({})", bytes.len(), mime_type);

    Ok(ImageData { bytes, mime_type })
}

/// Split `data:image/png;base64,AAAA` into its MIME type and payload.
/// Plain base64 is returned unchanged.
fn split_data_url(data: &str) -> (Option<String>, &str) {
    let Some(rest) = data.strip_prefix("data:") else {
        return (None, data);
    };
    match rest.split_once(',') {
        Some((header, payload)) => {
            let mime = header
                .split(';')
                .next()
                .filter(|m| !m.is_empty())
                .map(str::to_string);
            (mime, payload)
        }
        None => (None, data),
    }
}

/// Detect the image format from its leading bytes
pub fn sniff_mime_type(bytes: &[u8]) -> Option<&'static str> {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        [0x89, b'P', b'N', b'G', ..] => Some("image/png"),
        [b'G', b'I', b'F', b'8', ..] => Some("image/gif"),
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some("image/webp"),
        [_, _, _, _, b'f', b't', b'y', b'p', b'h', b'e', b'i', b'c', ..] => Some("image/heic"),
        _ => None,
    }
}

fn mime_from_extension(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "heic" => Some("image/heic"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const PNG_HEADER: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_sniff_mime_type() {
        assert_eq!(sniff_mime_type(&[0xFF, 0xD8, 0xFF, 0xE0]), Some("image/jpeg"));
        assert_eq!(sniff_mime_type(&PNG_HEADER), Some("image/png"));
        assert_eq!(sniff_mime_type(b"RIFF\0\0\0\0WEBPVP8 "), Some("image/webp"));
        assert_eq!(sniff_mime_type(b"hello"), None);
    }

    #[test]
    fn test_split_data_url() {
        let (mime, payload) = split_data_url("data:image/png;base64,AAAA");
        assert_eq!(mime.as_deref(), Some("image/png"));
        assert_eq!(payload, "AAAA");

        let (mime, payload) = split_data_url("AAAA");
        assert!(mime.is_none());
        assert_eq!(payload, "AAAA");
    }

    #[tokio::test]
    async fn test_read_file_sniffs_type() {
        let mut file = tempfile::Builder::new().suffix(".jpg").tempfile().unwrap();
        file.write_all(&PNG_HEADER).unwrap();

        let image = read(&ImageSource::Path(file.path().to_path_buf()))
            .await
            .unwrap();
        // Magic bytes win over the extension
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.bytes, PNG_HEADER.to_vec());
    }

    #[tokio::test]
    async fn test_read_falls_back_to_extension() {
        let mut file = tempfile::Builder::new().suffix(".webp").tempfile().unwrap();
        file.write_all(b"not really an image").unwrap();

        let image = read(&ImageSource::Path(file.path().to_path_buf()))
            .await
            .unwrap();
        assert_eq!(image.mime_type, "image/webp");
    }

    #[tokio::test]
    async fn test_missing_file_is_image_read_error() {
        let result = read(&ImageSource::Path(PathBuf::from("/no/such/fridge.jpg"))).await;
        assert!(matches!(result, Err(ChefError::ImageRead(_))));
    }

    #[tokio::test]
    async fn test_empty_bytes_rejected() {
        let result = read(&ImageSource::Bytes {
            data: Vec::new(),
            mime_type: None,
        })
        .await;
        assert!(matches!(result, Err(ChefError::ImageRead(_))));
    }

    #[tokio::test]
    async fn test_read_base64_data_url() {
        let encoded = format!("data:image/png;base64,{}", STANDARD.encode(PNG_HEADER));
        let image = read(&ImageSource::Base64 {
            data: encoded,
            mime_type: None,
        })
        .await
        .unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.bytes.len(), PNG_HEADER.len());

        let bad = read(&ImageSource::Base64 {
            data: "%%%".to_string(),
            mime_type: None,
        })
        .await;
        assert!(matches!(bad, Err(ChefError::ImageRead(_))));
    }

    #[test]
    fn test_data_url_roundtrip_prefix() {
        let image = ImageData::new(vec![1, 2, 3], "image/jpeg");
        assert!(image.to_data_url().starts_with("data:image/jpeg;base64,"));
    }
}
