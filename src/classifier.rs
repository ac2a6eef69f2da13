//! Text-versus-image detection for message parts.
//!
//! Clients send images as bare base64 strings mixed in with ordinary text, so
//! the only signal available is the shape of the string itself. The check is
//! a heuristic: a short word such as `"test"` is valid base64 and will pass
//! [`decode_base64`], while an image wrapped in a `data:` URL will not. Strings
//! that pass but do not decode to a recognisable image format stay text.
//! Decoding is canonical: padded input with non-zero trailing bits (`"ab=="`)
//! is rejected, although more lenient decoders accept it.
//!
//! Only PNG, JPEG and WebP bytes are forwarded unchanged; any other format
//! the `image` crate can read is re-encoded to PNG, since the model accepts
//! no other inline image types.

use crate::models::Part;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::ImageFormat;
use regex::Regex;
use std::io::Cursor;
use std::sync::LazyLock;
use tracing::{debug, warn};

static BASE64_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9+/]+={0,2}$").expect("base64 pattern is valid"));

/// Image bytes recovered from a base64 part.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub bytes: Vec<u8>,
    pub format: ImageFormat,
}

impl DecodedImage {
    pub fn mime_type(&self) -> &'static str {
        self.format.to_mime_type()
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }
}

/// Strict base64 decode gated by the alphabet and length checks.
pub fn decode_base64(s: &str) -> Option<Vec<u8>> {
    if s.is_empty() || s.len() % 4 != 0 || !BASE64_PATTERN.is_match(s) {
        return None;
    }
    STANDARD.decode(s).ok()
}

pub fn decode_image(s: &str) -> Option<DecodedImage> {
    let bytes = decode_base64(s)?;
    let format = image::guess_format(&bytes).ok()?;
    match format {
        ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::WebP => Some(DecodedImage { bytes, format }),
        other => reencode_as_png(&bytes, other),
    }
}

fn reencode_as_png(bytes: &[u8], format: ImageFormat) -> Option<DecodedImage> {
    let decoded = match image::load_from_memory_with_format(bytes, format) {
        Ok(decoded) => decoded,
        Err(e) => {
            debug!("{:?} part could not be decoded, keeping it as text: {}", format, e);
            return None;
        }
    };
    let mut png = Cursor::new(Vec::new());
    if let Err(e) = decoded.write_to(&mut png, ImageFormat::Png) {
        warn!("failed to re-encode {:?} part as PNG: {}", format, e);
        return None;
    }
    Some(DecodedImage { bytes: png.into_inner(), format: ImageFormat::Png })
}

/// Classifies in place and returns how many parts became images.
/// Already-decoded images pass through untouched.
pub fn classify_parts(parts: &mut [Part]) -> usize {
    let mut images = 0;
    for part in parts.iter_mut() {
        if let Part::Text(text) = part {
            if let Some(image) = decode_image(text) {
                *part = Part::Image(image);
                images += 1;
            }
        }
    }
    images
}
