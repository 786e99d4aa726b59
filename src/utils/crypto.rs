//! Cryptographic utilities

use rand::Rng;

/// Generate a random identifier of `bytes` random bytes, hex encoded
pub fn generate_hex_id(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    rand::rng().fill(buf.as_mut_slice());
    hex::encode(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_hex_id() {
        let id1 = generate_hex_id(6);
        let id2 = generate_hex_id(6);

        assert_eq!(id1.len(), 12);
        assert!(id1.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(id1, id2);
    }
}
