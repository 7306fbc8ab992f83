//! Image attachments embedded in a completion request.

use base64::{engine::general_purpose, Engine as _};

/// Encode raw image bytes as the data-URL payload the completion endpoint
/// expects in its `image` field.
pub fn encode_image(bytes: &[u8], mime: &str) -> String {
    format!("data:{mime};base64,{}", general_purpose::STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::encode_image;

    #[test]
    fn wraps_bytes_in_a_data_url() {
        assert_eq!(
            encode_image(b"abc", "image/png"),
            "data:image/png;base64,YWJj"
        );
    }
}
