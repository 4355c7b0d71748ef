//! The SSL 3.0 MAC construction (RFC 6101 section 5.2.3.1).
//!
//! Unlike HMAC, the inner and outer pads are *concatenated* with the
//! secret rather than XORed into a derived key, and the pad length is
//! fixed per digest algorithm rather than equal to the block size:
//! 48 bytes for MD5, 40 bytes for SHA-1.
//!
//! `MAC = H(secret ‖ pad2 ‖ H(secret ‖ pad1 ‖ seq_num ‖ type ‖ length ‖ data))`

use crate::hasher::{Hasher, HasherFactory};

const PAD1: u8 = 0x36;
const PAD2: u8 = 0x5c;

pub struct Ssl3Mac {
    hash: HasherFactory,
    secret: Vec<u8>,
    pad_size: usize,
    buffer: Vec<u8>,
}

impl Ssl3Mac {
    pub fn new(hash: HasherFactory, secret: &[u8], pad_size: usize) -> Self {
        Self {
            hash,
            secret: secret.to_vec(),
            pad_size,
            buffer: Vec::new(),
        }
    }

    pub fn output_size(&self) -> usize {
        (self.hash)().output_size()
    }

    pub fn update(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    pub fn finish(&self) -> Vec<u8> {
        let mut inner = (self.hash)();
        inner.update(&self.secret);
        inner.update(&vec![PAD1; self.pad_size]);
        inner.update(&self.buffer);
        let inner_digest = inner.finish();

        let mut outer = (self.hash)();
        outer.update(&self.secret);
        outer.update(&vec![PAD2; self.pad_size]);
        outer.update(&inner_digest);
        outer.finish()
    }
}

/// SSL 3.0 pad length for a given digest algorithm: 48 bytes for MD5,
/// 40 for SHA-1. Other digests were never defined for SSL 3.0.
pub fn pad_size_for_output(output_size: usize) -> Option<usize> {
    match output_size {
        16 => Some(48), // MD5
        20 => Some(40), // SHA-1
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::Hasher;
    use crate::md5::Md5Hasher;

    fn md5_factory() -> Box<dyn Hasher> {
        Box::new(Md5Hasher::new())
    }

    fn hex(s: &str) -> Vec<u8> {
        (0..s.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap())
            .collect()
    }

    /// Scenario from the protocol specification: mac=MD5, 16-byte secret of
    /// 0x0b, seq=0, type=application_data(23), version omitted (SSL 3.0),
    /// payload "abc".
    #[test]
    fn ssl3_mac_construction() {
        let secret = vec![0x0bu8; 16];
        let mut mac = Ssl3Mac::new(md5_factory, &secret, 48);

        let seq: u64 = 0;
        mac.update(&seq.to_be_bytes());
        mac.update(&[23u8]); // application_data
        mac.update(&(3u16).to_be_bytes()); // length of "abc"
        mac.update(b"abc");

        assert_eq!(mac.finish(), hex("6d91ce05df147f3b6ab8cf262dd4e1be"));
    }

    #[test]
    fn pad_sizes() {
        assert_eq!(pad_size_for_output(16), Some(48));
        assert_eq!(pad_size_for_output(20), Some(40));
        assert_eq!(pad_size_for_output(32), None);
    }
}
