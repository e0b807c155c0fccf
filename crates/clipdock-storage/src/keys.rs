//! Storage key composition for processed videos.

use clipdock_core::models::Orientation;
use rand::Rng;

/// Random bytes per key; hex-encodes to 64 characters.
const KEY_RANDOM_BYTES: usize = 32;

/// Composes the durable object key for a processed video:
/// `<orientation>/<64 lowercase hex chars>.<extension>`.
///
/// The name comes from fresh randomness, not a content hash, so uploading
/// identical bytes twice yields two distinct keys.
pub fn video_key(orientation: Orientation, extension: &str) -> String {
    let mut rng = rand::rng();
    let random_bytes: Vec<u8> = (0..KEY_RANDOM_BYTES).map(|_| rng.random()).collect();
    format!("{}/{}.{}", orientation, hex::encode(random_bytes), extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    #[test]
    fn test_key_shape() {
        let pattern = Regex::new(r"^(landscape|portrait|other)/[0-9a-f]{64}\.mp4$").unwrap();
        for orientation in [
            Orientation::Landscape,
            Orientation::Portrait,
            Orientation::Other,
        ] {
            let key = video_key(orientation, "mp4");
            assert!(pattern.is_match(&key), "unexpected key shape: {}", key);
            assert!(key.starts_with(orientation.as_str()));
        }
    }

    #[test]
    fn test_keys_are_unique() {
        let a = video_key(Orientation::Landscape, "mp4");
        let b = video_key(Orientation::Landscape, "mp4");
        assert_ne!(a, b);
    }
}
