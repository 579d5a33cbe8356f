//! Raster export to PNG and `data:` URIs, and the matching decoders.

use base64::Engine;
use image::ImageEncoder;

use crate::error::{CanvasError, CanvasResult};
use crate::Raster;

/// MIME type of exported sketches.
pub const PNG_MIME: &str = "image/png";

/// Encode the raster as a lossless RGBA PNG.
///
/// # Errors
///
/// Returns [`CanvasError::Encode`] if the PNG encoder fails.
pub fn encode_png(raster: &Raster) -> CanvasResult<Vec<u8>> {
    let mut buf = std::io::Cursor::new(Vec::new());
    image::codecs::png::PngEncoder::new(&mut buf)
        .write_image(
            &raster.to_rgba(),
            raster.width(),
            raster.height(),
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|e| CanvasError::Encode(format!("PNG encoding failed: {e}")))?;
    Ok(buf.into_inner())
}

/// Encode the raster as `data:image/png;base64,...`.
///
/// # Errors
///
/// Returns [`CanvasError::Encode`] if the PNG encoder fails.
pub fn encode_png_data_uri(raster: &Raster) -> CanvasResult<String> {
    Ok(to_data_uri(PNG_MIME, &encode_png(raster)?))
}

/// Build a base64 `data:` URI.
#[must_use]
pub fn to_data_uri(mime: &str, bytes: &[u8]) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{mime};base64,{encoded}")
}

/// Payload of a decoded `data:` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    /// Declared MIME type (empty metadata yields `application/octet-stream`).
    pub mime: String,
    /// Decoded bytes.
    pub bytes: Vec<u8>,
}

/// Decode a base64 `data:` URI such as `data:image/png;base64,iVBORw0KGgo...`.
///
/// # Errors
///
/// Returns [`CanvasError::DataUri`] if the string is not a base64 data URI.
pub fn decode_data_uri(uri: &str) -> CanvasResult<DataUri> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| CanvasError::DataUri("not a data URI".to_string()))?;
    let (metadata, encoded) = rest
        .split_once(',')
        .ok_or_else(|| CanvasError::DataUri("missing comma".to_string()))?;

    let mut params = metadata.split(';');
    let mime = params
        .next()
        .filter(|m| !m.is_empty())
        .unwrap_or("application/octet-stream")
        .to_string();
    if !params.any(|p| p.eq_ignore_ascii_case("base64")) {
        return Err(CanvasError::DataUri(
            "only base64 data URIs are supported".to_string(),
        ));
    }

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|e| CanvasError::DataUri(format!("invalid base64: {e}")))?;

    Ok(DataUri { mime, bytes })
}

/// Decode PNG (or any format the `image` build supports) into a raster.
///
/// # Errors
///
/// Returns [`CanvasError::Encode`] if the bytes cannot be decoded and
/// [`CanvasError::InvalidSize`] if the image is too large for a raster.
pub fn decode_image(bytes: &[u8]) -> CanvasResult<Raster> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| CanvasError::Encode(format!("Failed to decode image: {e}")))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Raster::from_rgba(width, height, rgba.as_raw())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, CompositeMode, Point};

    fn white(width: u32, height: u32) -> Raster {
        Raster::new(width, height, Color::WHITE).expect("raster")
    }

    #[test]
    fn png_has_magic_bytes() {
        let raster = white(8, 8);
        let png = encode_png(&raster).expect("png");
        assert_eq!(&png[0..4], &[0x89, 0x50, 0x4E, 0x47]);
    }

    #[test]
    fn png_is_lossless() {
        let mut raster = white(16, 12);
        raster.stroke_segment(
            Point::new(1.0, 1.0),
            Point::new(14.0, 10.0),
            3.0,
            Color::rgb(12, 200, 99),
            CompositeMode::SourceOver,
        );
        raster.stroke_segment(
            Point::new(1.0, 10.0),
            Point::new(14.0, 1.0),
            4.0,
            Color::BLACK,
            CompositeMode::DestinationOut,
        );

        let decoded = decode_image(&encode_png(&raster).expect("png")).expect("decode");
        assert_eq!(decoded.to_rgba(), raster.to_rgba());
        assert_eq!(decoded, raster);
    }

    #[test]
    fn png_carries_straight_alpha() {
        let raster = Raster::new(1, 1, Color::rgba(240, 120, 60, 100)).expect("raster");
        let decoded = image::load_from_memory(&encode_png(&raster).expect("png"))
            .expect("decode")
            .to_rgba8();
        assert_eq!(decoded.as_raw().as_slice(), raster.to_rgba().as_slice());
        assert!(decoded.as_raw()[0] > 200, "got {:?}", decoded.as_raw());
    }

    #[test]
    fn data_uri_has_png_prefix() {
        let uri = encode_png_data_uri(&white(2, 2)).expect("uri");
        assert!(uri.starts_with("data:image/png;base64,iVBORw0KGgo"));
    }

    #[test]
    fn decode_data_uri_reads_mime_and_bytes() {
        let uri = to_data_uri("image/jpeg", b"hello");
        let decoded = decode_data_uri(&uri).expect("decode");
        assert_eq!(decoded.mime, "image/jpeg");
        assert_eq!(decoded.bytes, b"hello");
    }

    #[test]
    fn decode_data_uri_rejects_other_forms() {
        assert!(decode_data_uri("https://example.com/a.png").is_err());
        assert!(decode_data_uri("data:image/png;base64").is_err());
        assert!(decode_data_uri("data:text/plain,hello").is_err());
        assert!(decode_data_uri("data:image/png;base64,***").is_err());
    }
}
