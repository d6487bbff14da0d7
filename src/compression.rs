use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::ImageFormat;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use thiserror::Error;

use crate::image_uri::{split_image_uri, to_image_uri};

/// Bounds applied before an image is sent to the generation service.
#[derive(Debug, Clone, Copy)]
pub struct CompressionOptions {
    pub max_width: u32,
    pub max_height: u32,
    /// JPEG quality, 0-100.
    pub quality: u8,
}

impl Default for CompressionOptions {
    fn default() -> Self {
        Self {
            max_width: 1024,
            max_height: 1024,
            quality: 85,
        }
    }
}

#[derive(Debug, Error)]
pub enum CompressionError {
    /// No decoder is registered for the payload's format.
    #[error("no image decoder available for {0}")]
    Unavailable(String),

    /// The source bytes did not decode, or the output did not encode.
    #[error("image compression failed: {0}")]
    Failed(String),
}

/// Capability seam for the environment-dependent compression step.
///
/// Callers must treat any error as non-fatal and fall back to the original
/// image; the orchestrator never aborts a request over a failed compression.
pub trait ImageCodec: Send + Sync {
    fn compress(
        &self,
        image_uri: &str,
        options: &CompressionOptions,
    ) -> Result<String, CompressionError>;
}

/// Raster codec backed by the `image` crate.
///
/// Downscales by the single largest ratio that brings both dimensions within
/// bounds (aspect ratio preserved), never upsamples, and re-encodes as JPEG.
pub struct RasterCodec;

impl ImageCodec for RasterCodec {
    fn compress(
        &self,
        image_uri: &str,
        options: &CompressionOptions,
    ) -> Result<String, CompressionError> {
        let payload = split_image_uri(image_uri);
        let format = mime_to_format(&payload.mime_type)
            .ok_or_else(|| CompressionError::Unavailable(payload.mime_type.clone()))?;
        let bytes = BASE64
            .decode(payload.data.as_bytes())
            .map_err(|err| CompressionError::Failed(format!("invalid base64 payload: {err}")))?;
        let mut decoded = image::load_from_memory_with_format(&bytes, format)
            .map_err(|err| CompressionError::Failed(format!("decode failed: {err}")))?;

        let (width, height) = (decoded.width(), decoded.height());
        if width > options.max_width || height > options.max_height {
            let ratio = f64::min(
                options.max_width as f64 / width as f64,
                options.max_height as f64 / height as f64,
            );
            let new_width = ((width as f64 * ratio).round() as u32).max(1);
            let new_height = ((height as f64 * ratio).round() as u32).max(1);
            decoded = decoded.resize_exact(new_width, new_height, FilterType::Triangle);
        }

        // JPEG has no alpha channel.
        let rgb = decoded.to_rgb8();
        let mut output = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut output, options.quality);
        rgb.write_with_encoder(encoder)
            .map_err(|err| CompressionError::Failed(format!("encode failed: {err}")))?;

        Ok(to_image_uri("image/jpeg", &output))
    }
}

/// No-op codec for contexts without raster capability. Returns the input
/// unchanged so the orchestrator's contract is unaffected.
pub struct PassthroughCodec;

impl ImageCodec for PassthroughCodec {
    fn compress(
        &self,
        image_uri: &str,
        _options: &CompressionOptions,
    ) -> Result<String, CompressionError> {
        Ok(image_uri.to_string())
    }
}

fn mime_to_format(mime_type: &str) -> Option<ImageFormat> {
    match mime_type {
        "image/png" => Some(ImageFormat::Png),
        "image/jpeg" | "image/jpg" => Some(ImageFormat::Jpeg),
        "image/gif" => Some(ImageFormat::Gif),
        "image/webp" => Some(ImageFormat::WebP),
        "image/bmp" => Some(ImageFormat::Bmp),
        _ => None,
    }
}
