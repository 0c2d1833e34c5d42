//! Thumbnail preparation
//!
//! Decodes the selected photo, shrinks it to fit the thumbnail box and
//! re-encodes it as an in-memory JPEG. Nothing is written to disk.

use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader, RgbImage};
use thiserror::Error;

/// Extensions offered by the photo picker.
pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("unsupported file type '{0}', expected .jpg, .jpeg or .png")]
    UnsupportedExtension(String),

    #[error("cannot open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("cannot encode thumbnail: {0}")]
    Encode(#[source] image::ImageError),
}

/// A resized photo ready to embed.
#[derive(Debug, Clone)]
pub struct Thumbnail {
    pub width: u32,
    pub height: u32,
    /// Baseline JPEG, 8-bit RGB.
    pub jpeg: Vec<u8>,
}

impl Thumbnail {
    pub fn dimensions(&self) -> [u32; 2] {
        [self.width, self.height]
    }
}

/// True when the path carries one of [`ACCEPTED_EXTENSIONS`] (any case).
pub fn is_accepted_photo(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| ACCEPTED_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Load `path`, fit it into a `box_px` square and encode as JPEG.
pub fn prepare(path: &Path, box_px: u32, quality: u8) -> Result<Thumbnail, ImageError> {
    if !is_accepted_photo(path) {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();
        return Err(ImageError::UnsupportedExtension(ext));
    }

    let file = File::open(path).map_err(|source| ImageError::Open {
        path: path.display().to_string(),
        source,
    })?;
    let img = ImageReader::new(BufReader::new(file))
        .with_guessed_format()
        .map_err(|e| ImageError::Decode(image::ImageError::IoError(e)))?
        .decode()
        .map_err(ImageError::Decode)?;

    let img = shrink_to_fit(img, box_px);
    let rgb = flatten_on_white(&img);

    let mut buffer = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut buffer, quality)
        .encode_image(&rgb)
        .map_err(ImageError::Encode)?;

    Ok(Thumbnail {
        width: rgb.width(),
        height: rgb.height(),
        jpeg: buffer.into_inner(),
    })
}

/// Shrink to fit a `box_px` square keeping the aspect ratio. Never upscales.
pub fn shrink_to_fit(img: DynamicImage, box_px: u32) -> DynamicImage {
    if img.width() <= box_px && img.height() <= box_px {
        return img;
    }
    img.resize(box_px, box_px, FilterType::Lanczos3)
}

/// JPEG has no alpha; composite transparent pixels onto white.
fn flatten_on_white(img: &DynamicImage) -> RgbImage {
    if !img.color().has_alpha() {
        return img.to_rgb8();
    }
    let rgba = img.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let alpha = a as u32;
        let blend = |c: u8| ((c as u32 * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        image::Rgb([blend(r), blend(g), blend(b)])
    })
}
