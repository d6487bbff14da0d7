use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

/// MIME type assumed when an image string carries no usable prefix.
pub const DEFAULT_MIME: &str = "image/jpeg";

/// Base64 payload plus MIME tag, split out of a `data:` image URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub data: String,
    pub mime_type: String,
}

/// Splits a `data:<mime>;base64,<payload>` string into payload and MIME type.
///
/// Inputs without the prefix are tolerated: the whole string is treated as the
/// payload and the MIME type falls back to [`DEFAULT_MIME`].
pub fn split_image_uri(uri: &str) -> ImagePayload {
    let data = uri.split_once(',').map(|(_, rest)| rest).unwrap_or(uri);
    let mime_type = uri
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(';'))
        .map(|(mime, _)| mime)
        .filter(|mime| !mime.is_empty())
        .unwrap_or(DEFAULT_MIME);
    ImagePayload {
        data: data.to_string(),
        mime_type: mime_type.to_string(),
    }
}

/// Encodes raw image bytes as a self-describing image URI.
pub fn to_image_uri(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{mime_type};base64,{}", BASE64.encode(bytes))
}

/// Wraps an already-encoded base64 payload as a normalized PNG image URI.
pub fn png_image_uri(payload: &str) -> String {
    format!("data:image/png;base64,{payload}")
}

/// Sniffs the MIME type from magic bytes.
pub fn detect_mime_type(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
        return Some("image/png");
    }
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some("image/jpeg");
    }
    if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        return Some("image/gif");
    }
    if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        return Some("image/webp");
    }
    if bytes.starts_with(b"BM") {
        return Some("image/bmp");
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_prefixed_uri() {
        let payload = split_image_uri("data:image/png;base64,iVBORw0KGgo=");
        assert_eq!(payload.mime_type, "image/png");
        assert_eq!(payload.data, "iVBORw0KGgo=");
    }

    #[test]
    fn bare_payload_falls_back_to_default_mime() {
        let payload = split_image_uri("iVBORw0KGgo=");
        assert_eq!(payload.mime_type, DEFAULT_MIME);
        assert_eq!(payload.data, "iVBORw0KGgo=");
    }

    #[test]
    fn malformed_prefix_falls_back_to_default_mime() {
        let payload = split_image_uri("data:;base64,AAAA");
        assert_eq!(payload.mime_type, DEFAULT_MIME);
        assert_eq!(payload.data, "AAAA");
    }

    #[test]
    fn round_trips_through_uri_encoding() {
        let bytes = [0x89, 0x50, 0x4E, 0x47, 0x01, 0x02];
        let uri = to_image_uri("image/png", &bytes);
        let payload = split_image_uri(&uri);
        assert_eq!(payload.mime_type, "image/png");
        assert_eq!(BASE64.decode(payload.data).unwrap(), bytes);
    }

    #[test]
    fn png_wrapping_is_normalized() {
        assert_eq!(png_image_uri("AAAA"), "data:image/png;base64,AAAA");
    }

    #[test]
    fn detects_common_formats() {
        assert_eq!(
            detect_mime_type(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]),
            Some("image/png")
        );
        assert_eq!(detect_mime_type(&[0xFF, 0xD8, 0xFF, 0xE0]), Some("image/jpeg"));
        assert_eq!(detect_mime_type(b"GIF89a..."), Some("image/gif"));
        assert_eq!(detect_mime_type(b"RIFF\x00\x00\x00\x00WEBPVP8 "), Some("image/webp"));
        assert_eq!(detect_mime_type(b"plain text"), None);
    }
}
