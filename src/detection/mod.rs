use std::path::Path;

use image::ImageReader;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodItem {
    pub name: String,
    pub quantity: u32,
    pub days_until_expiry: i32, // negative when already expired
}

impl FoodItem {
    pub fn new(name: &str, quantity: u32, days_until_expiry: i32) -> Self {
        Self {
            name: name.to_string(),
            quantity,
            days_until_expiry,
        }
    }
}

/// Recognizes food items in a fridge photo.
pub trait FoodDetector: Send + Sync {
    fn detect(&self, image_path: &Path) -> Result<Vec<FoodItem>, AppError>;
}

/// Checks that the photo decodes, then reports a fixed fridge inventory.
#[derive(Debug, Clone, Default)]
pub struct PlaceholderDetector;

impl FoodDetector for PlaceholderDetector {
    #[instrument(skip(self))]
    fn detect(&self, image_path: &Path) -> Result<Vec<FoodItem>, AppError> {
        let (width, height) = read_dimensions(image_path)?;
        debug!(width, height, "image loaded");
        Ok(vec![
            FoodItem::new("tomato", 3, 2),
            FoodItem::new("banana", 2, 1),
            FoodItem::new("bread", 1, 3),
            FoodItem::new("milk", 1, 5),
        ])
    }
}

/// Reads just enough of the file to learn its format and dimensions.
fn read_dimensions(path: &Path) -> Result<(u32, u32), AppError> {
    if !path.is_file() {
        return Err(AppError::ImageNotFound(path.to_path_buf()));
    }
    let unreadable = |reason: String| AppError::UnreadableImage {
        path: path.to_path_buf(),
        reason,
    };
    ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|e| unreadable(e.to_string()))?
        .into_dimensions()
        .map_err(|e| unreadable(e.to_string()))
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::{Path, PathBuf};

    use image::{ImageFormat, Rgb, RgbImage};

    pub fn png_bytes() -> Vec<u8> {
        let img = RgbImage::from_pixel(4, 4, Rgb([200, 40, 40]));
        let mut buf = std::io::Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).expect("encode png");
        buf.into_inner()
    }

    pub fn write_png(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, png_bytes()).expect("write png");
        path
    }
}
