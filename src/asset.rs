use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::task::Poll;

use exif::{In, Reader, Tag, Value};

use crate::error::ShowcaseError;

pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "gif"];

/// Preloads slide images off screen.
///
/// `poll_load` is called once per frame while a transition is preloading. The
/// first call for a URL starts the load; later calls report on it. Returning
/// `Poll::Pending` keeps the display untouched until the next frame.
pub trait AssetLoader {
    type Asset;

    fn poll_load(&mut self, url: &str) -> Poll<Result<Self::Asset, ShowcaseError>>;
}

/// What the headless loader learned about an image file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbedImage {
    pub path: PathBuf,
    pub byte_len: usize,
    pub orientation: u16,
}

/// Loads nothing into GPU memory: reads the file and checks that it looks
/// like a displayable image.
#[derive(Debug, Default)]
pub struct FileProbe;

impl AssetLoader for FileProbe {
    type Asset = ProbedImage;

    fn poll_load(&mut self, url: &str) -> Poll<Result<ProbedImage, ShowcaseError>> {
        Poll::Ready(probe_image(Path::new(url)))
    }
}

pub fn image_extension(path: &Path) -> Option<String> {
    let ext = path.extension().and_then(|s| s.to_str())?.to_lowercase();
    SUPPORTED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

pub fn probe_image(path: &Path) -> Result<ProbedImage, ShowcaseError> {
    let url = path.display().to_string();
    if url.contains("://") {
        return Err(ShowcaseError::asset(url, "only local files are supported"));
    }
    let extension = image_extension(path)
        .ok_or_else(|| ShowcaseError::asset(&url, "unsupported image format"))?;

    let bytes = fs::read(path).map_err(|e| ShowcaseError::asset(&url, e.to_string()))?;
    if bytes.is_empty() {
        return Err(ShowcaseError::asset(url, "file is empty"));
    }

    Ok(ProbedImage {
        path: path.to_path_buf(),
        byte_len: bytes.len(),
        orientation: exif_orientation(&extension, &bytes),
    })
}

/// EXIF orientation tag of a JPEG, 1 (normal) when absent or unreadable.
pub fn exif_orientation(extension: &str, bytes: &[u8]) -> u16 {
    if extension != "jpg" && extension != "jpeg" {
        return 1;
    }
    match Reader::new().read_from_container(&mut Cursor::new(bytes)) {
        Ok(exif) => match exif.get_field(Tag::Orientation, In::PRIMARY) {
            Some(field) => match &field.value {
                Value::Short(values) if !values.is_empty() => values[0],
                _ => 1,
            },
            None => 1,
        },
        Err(e) => {
            // Non-critical, the image is shown unrotated
            tracing::debug!("no EXIF data: {e}");
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn rejects_unknown_extension() {
        let err = probe_image(Path::new("cover.tiff")).unwrap_err();
        assert!(matches!(err, ShowcaseError::AssetLoad { .. }));
    }

    #[test]
    fn rejects_remote_urls() {
        let err = probe_image(Path::new("https://cdn.example.com/a.png")).unwrap_err();
        assert!(err.to_string().contains("local files"));
    }

    #[test]
    fn missing_file_is_an_asset_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = probe_image(&dir.path().join("nope.png")).unwrap_err();
        assert!(matches!(err, ShowcaseError::AssetLoad { .. }));
    }

    #[test]
    fn probes_existing_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Cover.PNG");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(b"\x89PNG\r\n\x1a\nrest").unwrap();

        let probed = probe_image(&path).unwrap();
        assert_eq!(probed.byte_len, 12);
        assert_eq!(probed.orientation, 1);
    }

    #[test]
    fn jpeg_without_exif_is_upright() {
        assert_eq!(exif_orientation("jpg", b"\xff\xd8\xff\xd9"), 1);
    }
}
