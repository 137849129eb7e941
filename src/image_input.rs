//! Loading the image to annotate, from a path or from a drop onto the window.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::{DynamicImage, ImageFormat};
use tracing::info;

use crate::error::{PickerError, Result};
use crate::geometry::Size;

pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp", "tif", "tiff"];

#[derive(Clone, Debug)]
pub enum ImageSource {
    Path(PathBuf),
    /// A drop that may carry bytes, a MIME type, or only a path.
    Dropped {
        name: String,
        mime: String,
        path: Option<PathBuf>,
        bytes: Option<Arc<[u8]>>,
    },
}

pub struct LoadedImage {
    pub name: String,
    pub image: DynamicImage,
}

impl LoadedImage {
    pub fn original_size(&self) -> Size {
        Size::new(self.image.width() as f32, self.image.height() as f32)
    }
}

pub fn load_image(source: ImageSource) -> Result<LoadedImage> {
    let loaded = match source {
        ImageSource::Path(path) => load_path(&path)?,
        ImageSource::Dropped {
            name,
            mime,
            path,
            bytes,
        } => {
            if !mime.is_empty() && !mime.starts_with("image/") {
                return Err(PickerError::InvalidFileType(format!("{name} ({mime})")));
            }
            match (bytes, path) {
                (Some(bytes), _) => {
                    image::guess_format(&bytes)
                        .map_err(|_| PickerError::InvalidFileType(name.clone()))?;
                    LoadedImage {
                        name,
                        image: image::load_from_memory(&bytes)?,
                    }
                }
                (None, Some(path)) => load_path(&path)?,
                (None, None) => return Err(PickerError::InvalidFileType(name)),
            }
        }
    };

    info!(
        "loaded {} ({}x{})",
        loaded.name,
        loaded.image.width(),
        loaded.image.height()
    );
    Ok(loaded)
}

fn load_path(path: &Path) -> Result<LoadedImage> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("")
        .to_string();

    ImageFormat::from_path(path).map_err(|_| PickerError::InvalidFileType(name.clone()))?;
    let bytes = std::fs::read(path)?;
    let image = image::load_from_memory(&bytes)?;
    Ok(LoadedImage { name, image })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let img = DynamicImage::new_rgba8(w, h);
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn loads_png_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shot.png");
        std::fs::write(&path, png_bytes(12, 7)).unwrap();

        let loaded = load_image(ImageSource::Path(path)).unwrap();
        assert_eq!(loaded.name, "shot.png");
        assert_eq!(loaded.original_size(), Size::new(12.0, 7.0));
    }

    #[test]
    fn rejects_non_image_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "hello").unwrap();

        assert!(matches!(
            load_image(ImageSource::Path(path)),
            Err(PickerError::InvalidFileType(_))
        ));
    }

    #[test]
    fn rejects_non_image_mime() {
        let res = load_image(ImageSource::Dropped {
            name: "doc.pdf".into(),
            mime: "application/pdf".into(),
            path: None,
            bytes: Some(Arc::from(png_bytes(2, 2))),
        });
        assert!(matches!(res, Err(PickerError::InvalidFileType(_))));
    }

    #[test]
    fn loads_dropped_bytes() {
        let loaded = load_image(ImageSource::Dropped {
            name: "drop.png".into(),
            mime: "image/png".into(),
            path: None,
            bytes: Some(Arc::from(png_bytes(3, 5))),
        })
        .unwrap();
        assert_eq!(loaded.original_size(), Size::new(3.0, 5.0));
    }

    #[test]
    fn rejects_unrecognized_bytes() {
        let res = load_image(ImageSource::Dropped {
            name: "blob".into(),
            mime: String::new(),
            path: None,
            bytes: Some(Arc::from(b"definitely not an image".to_vec())),
        });
        assert!(matches!(res, Err(PickerError::InvalidFileType(_))));
    }

    #[test]
    fn corrupt_image_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        let mut bytes = png_bytes(4, 4);
        bytes.truncate(20);
        std::fs::write(&path, bytes).unwrap();

        assert!(matches!(
            load_image(ImageSource::Path(path)),
            Err(PickerError::ImageDecode(_))
        ));
    }
}
