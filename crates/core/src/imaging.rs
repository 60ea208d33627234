//! Center-crop + resize transform for stored recipe photos.
//!
//! [`scale`] never fails: a buffer that cannot be decoded is handed back
//! untouched so callers always have some image payload to serve.

use std::io::Cursor;
use std::sync::LazyLock;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader, Limits, Rgb, RgbImage};

/// JPEG quality used when re-encoding transformed images.
pub const JPEG_QUALITY: u8 = 85;

/// Dimensions of the built-in placeholder.
pub const DEFAULT_IMAGE_WIDTH: u32 = 640;
pub const DEFAULT_IMAGE_HEIGHT: u32 = 480;

/// Largest target width or height [`scale`] will render. Requests above
/// it are served the original bytes.
pub const MAX_SCALE_DIMENSION: u32 = 4096;

/// Largest stored image, per axis, that will be decoded for scaling.
const MAX_SOURCE_DIMENSION: u32 = 16_384;

/// Decoder allocation ceiling in bytes.
const MAX_DECODE_ALLOC: u64 = 256 * 1024 * 1024;

/// Served when a requested image name has no stored bytes.
///
/// Rendered once, on first use, and immutable afterwards.
pub static DEFAULT_IMAGE: LazyLock<Vec<u8>> = LazyLock::new(render_default_image);

fn render_default_image() -> Vec<u8> {
    let placeholder = RgbImage::from_pixel(
        DEFAULT_IMAGE_WIDTH,
        DEFAULT_IMAGE_HEIGHT,
        Rgb([0xd9, 0xd9, 0xd9]),
    );
    encode_jpeg(&placeholder).unwrap_or_default()
}

/// Source-space rectangle cut out of an image before resizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Largest rectangle with the target aspect ratio, centered in the source.
///
/// Fractional crop sizes are truncated; offsets use floor division. The
/// crop never collapses below one pixel on either axis.
pub fn center_crop(source_width: u32, source_height: u32, width: u32, height: u32) -> CropRect {
    let target_aspect = f64::from(width) / f64::from(height);
    let source_aspect = f64::from(source_width) / f64::from(source_height);

    let mut crop_width = f64::from(source_width);
    let mut crop_height = f64::from(source_height);

    if source_aspect > target_aspect {
        crop_width = crop_height * target_aspect;
    } else if source_aspect < target_aspect {
        crop_height = crop_width / target_aspect;
    }

    let crop_width = (crop_width as u32).clamp(1, source_width.max(1));
    let crop_height = (crop_height as u32).clamp(1, source_height.max(1));

    CropRect {
        x: (source_width - crop_width) / 2,
        y: (source_height - crop_height) / 2,
        width: crop_width,
        height: crop_height,
    }
}

/// Center-crop `data` to the `width:height` aspect ratio, resize it to
/// exactly `width x height` and re-encode it as JPEG.
///
/// A zero `width` or `height` means "no scaling" and returns the input
/// as-is, as does a dimension above [`MAX_SCALE_DIMENSION`] or any decode
/// or encode failure.
pub fn scale(data: &[u8], width: u32, height: u32) -> Vec<u8> {
    if width == 0 || height == 0 {
        return data.to_vec();
    }
    if width > MAX_SCALE_DIMENSION || height > MAX_SCALE_DIMENSION {
        tracing::warn!(width, height, max = MAX_SCALE_DIMENSION, "Requested image size too large, serving original bytes");
        return data.to_vec();
    }

    match try_scale(data, width, height) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(error = %err, width, height, "Image transform failed, serving original bytes");
            data.to_vec()
        }
    }
}

fn try_scale(data: &[u8], width: u32, height: u32) -> Result<Vec<u8>, image::ImageError> {
    let mut reader = ImageReader::new(Cursor::new(data)).with_guessed_format()?;
    reader.limits(decode_limits());
    let source = reader.decode()?;

    if source.width() == 0 || source.height() == 0 {
        return Ok(data.to_vec());
    }

    let crop = center_crop(source.width(), source.height(), width, height);
    let resized = source
        .crop_imm(crop.x, crop.y, crop.width, crop.height)
        .resize_exact(width, height, FilterType::Lanczos3);

    encode_jpeg(&flatten_on_black(&resized))
}

fn decode_limits() -> Limits {
    let mut limits = Limits::default();
    limits.max_image_width = Some(MAX_SOURCE_DIMENSION);
    limits.max_image_height = Some(MAX_SOURCE_DIMENSION);
    limits.max_alloc = Some(MAX_DECODE_ALLOC);
    limits
}

/// Drop the alpha channel by compositing over opaque black.
fn flatten_on_black(img: &DynamicImage) -> RgbImage {
    if !img.color().has_alpha() {
        return img.to_rgb8();
    }
    let rgba = img.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let over_black = |c: u8| ((u16::from(c) * u16::from(a)) / 255) as u8;
        Rgb([over_black(r), over_black(g), over_black(b)])
    })
}

fn encode_jpeg(img: &RgbImage) -> Result<Vec<u8>, image::ImageError> {
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY).encode_image(img)?;
    Ok(out)
}

/// MIME type sniffed from the leading bytes, for serving stored originals.
pub fn content_type(data: &[u8]) -> &'static str {
    image::guess_format(data)
        .map(|format| format.to_mime_type())
        .unwrap_or("application/octet-stream")
}
