use std::io::Cursor;

use bytes::Bytes;
use image::ImageFormat;

/// Why a payload could not be turned into a stored image.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    /// The input is not a readable image of the expected format.
    #[error("malformed input: {0}")]
    Malformed(String),

    /// The derived representation could not be produced.
    #[error("could not encode derived image: {0}")]
    Encode(String),
}

/// Derives the secondary representation of a submitted payload.
///
/// Implementations must be pure functions of the input bytes and must
/// report failure rather than return a partial artifact.
pub trait Codec: Send + Sync {
    fn decode_and_derive(&self, raw: &[u8]) -> Result<Bytes, DecodeError>;
}

/// Decodes a GIF and re-encodes its first frame as a PNG still.
#[derive(Clone, Copy, Debug, Default)]
pub struct GifSnapshotCodec;

impl Codec for GifSnapshotCodec {
    fn decode_and_derive(&self, raw: &[u8]) -> Result<Bytes, DecodeError> {
        let frame = image::load_from_memory_with_format(raw, ImageFormat::Gif)
            .map_err(|e| DecodeError::Malformed(e.to_string()))?;
        let mut png = Cursor::new(Vec::new());
        frame
            .write_to(&mut png, ImageFormat::Png)
            .map_err(|e| DecodeError::Encode(e.to_string()))?;
        Ok(Bytes::from(png.into_inner()))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{DynamicImage, Rgba, RgbaImage};

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

    /// A 2x2 single-colour GIF.
    pub(crate) fn tiny_gif(shade: u8) -> Vec<u8> {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, Rgba([shade, 0, 0, 255])));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Gif).unwrap();
        out.into_inner()
    }

    #[test]
    fn gif_becomes_png() {
        let derived = GifSnapshotCodec.decode_and_derive(&tiny_gif(200)).unwrap();
        assert!(derived.starts_with(PNG_MAGIC));

        let still = image::load_from_memory_with_format(&derived, ImageFormat::Png).unwrap();
        assert_eq!((still.width(), still.height()), (2, 2));
    }

    #[test]
    fn derivation_is_deterministic() {
        let gif = tiny_gif(10);
        assert_eq!(
            GifSnapshotCodec.decode_and_derive(&gif).unwrap(),
            GifSnapshotCodec.decode_and_derive(&gif).unwrap()
        );
    }

    #[test]
    fn non_gif_is_rejected() {
        let err = GifSnapshotCodec
            .decode_and_derive(b"definitely not a gif")
            .unwrap_err();
        assert!(matches!(err, DecodeError::Malformed(_)));
    }

    #[test]
    fn png_input_is_rejected() {
        let derived = GifSnapshotCodec.decode_and_derive(&tiny_gif(1)).unwrap();
        assert!(GifSnapshotCodec.decode_and_derive(&derived).is_err());
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(GifSnapshotCodec.decode_and_derive(&[]).is_err());
    }
}
