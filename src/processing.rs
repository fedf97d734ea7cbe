use crate::constants::{BACKGROUND_RGB, MAX_IMAGE_DIMENSION, WEBP_METHOD};
use crate::error::{OptimizeError, Result};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageReader, Rgb, RgbImage};
use std::borrow::Cow;
use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;

/// A decoded image moving through the pipeline.
///
/// The handle only exposes the three operations the pipeline needs:
/// shrinking, flattening to alpha-free RGB and WebP encoding.
#[derive(Debug, Clone)]
pub struct WorkingImage {
    inner: DynamicImage,
}

impl WorkingImage {
    /// Decodes raw bytes, guessing the format from the content.
    ///
    /// # Arguments
    /// * `bytes` - The downloaded payload
    /// * `url` - Where the bytes came from, for error messages
    ///
    /// # Security
    /// Images above `MAX_IMAGE_DIMENSION` on either side are rejected to
    /// bound memory use during resizing.
    pub fn decode(bytes: &[u8], url: &str) -> Result<Self> {
        let decode_error = |source: image::ImageError| OptimizeError::Decode {
            url: url.to_string(),
            source,
        };

        let reader = || {
            ImageReader::new(Cursor::new(bytes))
                .with_guessed_format()
                .map_err(|e| decode_error(image::ImageError::IoError(e)))
        };

        // Only the header is read here; the pixels are decoded once the size is known.
        let (width, height) = reader()?.into_dimensions().map_err(decode_error)?;
        if width > MAX_IMAGE_DIMENSION || height > MAX_IMAGE_DIMENSION {
            return Err(OptimizeError::InvalidDimensions(
                width,
                height,
                MAX_IMAGE_DIMENSION,
            ));
        }

        let inner = reader()?.decode().map_err(decode_error)?;
        Ok(Self { inner })
    }

    pub fn from_dynamic(inner: DynamicImage) -> Self {
        Self { inner }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.inner.dimensions()
    }

    pub fn has_alpha(&self) -> bool {
        self.inner.color().has_alpha()
    }

    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.inner
    }

    pub fn into_dynamic(self) -> DynamicImage {
        self.inner
    }

    /// Shrinks the image with Lanczos3 so it fits within `max_width` x
    /// `max_height`, keeping the aspect ratio. Images that already fit are
    /// left untouched. Returns whether a resize happened.
    pub fn shrink_to_fit(&mut self, max_width: u32, max_height: u32) -> bool {
        let (width, height) = self.inner.dimensions();
        if width <= max_width && height <= max_height {
            return false;
        }

        self.inner = self.inner.resize(max_width, max_height, FilterType::Lanczos3);
        true
    }

    /// Produces an 8-bit RGB image. Transparent pixels are composited over
    /// opaque white; images without alpha are only converted.
    pub fn flatten(self) -> Self {
        let inner = if self.has_alpha() {
            let rgba = self.inner.to_rgba8();
            let (width, height) = rgba.dimensions();
            let flattened = RgbImage::from_fn(width, height, |x, y| {
                let [r, g, b, a] = rgba.get_pixel(x, y).0;
                Rgb([
                    blend(r, BACKGROUND_RGB[0], a),
                    blend(g, BACKGROUND_RGB[1], a),
                    blend(b, BACKGROUND_RGB[2], a),
                ])
            });
            DynamicImage::ImageRgb8(flattened)
        } else {
            match self.inner {
                rgb @ DynamicImage::ImageRgb8(_) => rgb,
                other => DynamicImage::ImageRgb8(other.to_rgb8()),
            }
        };

        Self { inner }
    }

    /// Lossy WebP at `quality` (1-100) using the slowest, best-compressing
    /// encoder method.
    pub fn encode_webp(&self, quality: u8) -> Result<Vec<u8>> {
        let rgb = match &self.inner {
            DynamicImage::ImageRgb8(buffer) => Cow::Borrowed(buffer),
            other => Cow::Owned(other.to_rgb8()),
        };

        let mut config = webp::WebPConfig::new().map_err(|_| {
            OptimizeError::WebpEncoding("failed to initialise encoder config".to_string())
        })?;
        config.lossless = 0;
        config.quality = f32::from(quality);
        config.method = WEBP_METHOD;

        let encoded = webp::Encoder::from_rgb(rgb.as_raw(), rgb.width(), rgb.height())
            .encode_advanced(&config)
            .map_err(|e| OptimizeError::WebpEncoding(format!("{:?}", e)))?;

        Ok(encoded.to_vec())
    }
}

/// Alpha-composites one channel over an opaque background channel.
fn blend(foreground: u8, background: u8, alpha: u8) -> u8 {
    let alpha = u32::from(alpha);
    let mixed = u32::from(foreground) * alpha + u32::from(background) * (255 - alpha);
    ((mixed + 127) / 255) as u8
}

/// Encodes `img` as WebP and writes it to `output_path`, creating missing
/// parent directories.
///
/// # Returns
/// * `Ok(size)` - Bytes written
/// * `Err(OptimizeError)` - Encoding or filesystem failure; these end the run
///
/// The bytes land in a temporary file next to the target first and are
/// renamed into place, so an interrupted write never leaves a truncated
/// `.webp` behind. The temporary file is opened like any new file, so the
/// output gets the usual umask-derived permissions.
pub fn save_webp(img: &WorkingImage, output_path: &Path, quality: u8) -> Result<u64> {
    let parent = match output_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)
        .map_err(|_| OptimizeError::DirectoryCreationFailed(parent.to_path_buf()))?;

    let encoded = img.encode_webp(quality)?;

    let mut temp = tempfile::Builder::new().make_in(parent, |path| {
        fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
    })?;
    temp.write_all(&encoded)?;
    temp.persist(output_path).map_err(|e| OptimizeError::Io(e.error))?;

    Ok(fs::metadata(output_path)?.len())
}
