//! Lossy image recompression.
//!
//! Images are re-encoded as JPEG. The encoder first walks down a ladder of
//! quality settings; if even the lowest setting misses the byte budget the
//! image is downscaled and the ladder starts again.

use bytes::Bytes;
use image::{DynamicImage, GenericImageView, codecs::jpeg::JpegEncoder, imageops::FilterType};

use crate::{Error, Result};

const QUALITY_STEPS: &[u8] = &[85, 75, 65, 55, 45];
const MIN_DIMENSION: u32 = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionOptions {
  /// Upper bound on the encoded size.
  pub max_bytes:     u64,
  /// Upper bound on the longer edge, in pixels.
  pub max_dimension: u32,
}

impl Default for CompressionOptions {
  fn default() -> Self {
    Self { max_bytes: 1_000_000, max_dimension: 1920 }
  }
}

impl CompressionOptions {
  /// Preset used for gallery batches.
  pub fn gallery() -> Self {
    Self { max_bytes: 800_000, ..Self::default() }
  }
}

/// Decode `input` and re-encode it as a JPEG within `options`.
///
/// CPU bound; call from a blocking context or use [`compress`].
pub fn compress_blocking(input: &[u8], options: CompressionOptions) -> Result<Vec<u8>> {
  let mut image = image::load_from_memory(input)?;

  let (width, height) = image.dimensions();
  if width.max(height) > options.max_dimension {
    image = image.resize(options.max_dimension, options.max_dimension, FilterType::Triangle);
  }

  loop {
    if let Some(encoded) = encode_within(&image, options.max_bytes)? {
      return Ok(encoded);
    }

    let (width, height) = image.dimensions();
    let (next_w, next_h) = (width * 3 / 4, height * 3 / 4);
    if next_w.min(next_h) < MIN_DIMENSION {
      return Err(Error::Budget { max_bytes: options.max_bytes });
    }
    tracing::debug!(width = next_w, height = next_h, "downscaling to meet size budget");
    image = image.resize(next_w, next_h, FilterType::Triangle);
  }
}

/// First quality step whose output fits, if any.
fn encode_within(image: &DynamicImage, max_bytes: u64) -> Result<Option<Vec<u8>>> {
  let rgb = image.to_rgb8();
  for &quality in QUALITY_STEPS {
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, quality).encode_image(&rgb)?;
    if out.len() as u64 <= max_bytes {
      return Ok(Some(out));
    }
  }
  Ok(None)
}

/// [`compress_blocking`] on the blocking thread pool.
pub async fn compress(input: Bytes, options: CompressionOptions) -> Result<Bytes> {
  tokio::task::spawn_blocking(move || compress_blocking(&input, options))
    .await
    .map_err(|e| Error::Task(e.to_string()))?
    .map(Bytes::from)
}

#[cfg(test)]
pub(crate) mod tests {
  use image::{ImageFormat, RgbImage};

  use super::*;

  /// A noisy gradient that compresses poorly at high quality.
  pub(crate) fn noisy_jpeg(width: u32, height: u32, quality: u8) -> Vec<u8> {
    let mut seed: u32 = 0x9e37_79b9;
    let img = RgbImage::from_fn(width, height, |x, y| {
      seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
      let noise = (seed >> 24) as u8 / 3;
      image::Rgb([
        ((x * 255 / width) as u8).wrapping_add(noise),
        ((y * 255 / height) as u8).wrapping_add(noise),
        noise.wrapping_mul(2),
      ])
    });
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, quality).encode_image(&img).unwrap();
    out
  }

  #[tokio::test]
  async fn large_jpeg_fits_budget() {
    let input = noisy_jpeg(3000, 2000, 100);
    assert!(input.len() > 1_000_000, "fixture too small: {}", input.len());

    let out = compress(Bytes::from(input), CompressionOptions::default()).await.unwrap();
    assert!(out.len() <= 1_000_000);

    let decoded = image::load_from_memory_with_format(&out, ImageFormat::Jpeg).unwrap();
    assert!(decoded.width().max(decoded.height()) <= 1920);
    assert!(decoded.width() > decoded.height());
  }

  #[test]
  fn small_image_keeps_dimensions() {
    let input = noisy_jpeg(200, 100, 90);
    let out = compress_blocking(&input, CompressionOptions::default()).unwrap();
    let decoded = image::load_from_memory(&out).unwrap();
    assert_eq!(decoded.dimensions(), (200, 100));
  }

  #[test]
  fn tiny_budget_is_an_error() {
    let input = noisy_jpeg(200, 200, 90);
    let options = CompressionOptions { max_bytes: 10, max_dimension: 1920 };
    assert!(matches!(compress_blocking(&input, options), Err(Error::Budget { max_bytes: 10 })));
  }

  #[test]
  fn garbage_is_rejected() {
    assert!(compress_blocking(b"not an image", CompressionOptions::default()).is_err());
  }

  #[test]
  fn gallery_preset() {
    let options = CompressionOptions::gallery();
    assert_eq!(options.max_bytes, 800_000);
    assert_eq!(options.max_dimension, 1920);
  }
}
