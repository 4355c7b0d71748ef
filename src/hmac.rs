//! HMAC (RFC 2104), the MAC construction used by all TLS versions 1.0
//! and above. SSL 3.0 uses a related but distinct construction; see
//! `ssl3_mac.rs`.

use crate::hasher::{Hasher, HasherFactory};
use crate::utils::xor;

pub struct Hmac {
    derived_key: Vec<u8>,
    hash: HasherFactory,
    /// Underlying hasher, already primed with `derived_key xor ipad`.
    inner_hasher: Box<dyn Hasher>,
}

impl Hmac {
    pub fn new(hash: HasherFactory, key: &[u8]) -> Self {
        let block_size = hash().block_size();

        let mut derived_key = vec![0u8; block_size];
        if key.len() <= block_size {
            derived_key[0..key.len()].copy_from_slice(key);
        } else {
            let key_hash = {
                let mut h = hash();
                h.update(key);
                h.finish()
            };
            derived_key[0..key_hash.len()].copy_from_slice(&key_hash);
        }

        let mut inner_hasher = hash();
        let mut inner_start = vec![0u8; block_size];
        let ipad = vec![0x36u8; block_size];
        xor(&ipad, &derived_key, &mut inner_start);
        inner_hasher.update(&inner_start);

        Self {
            hash,
            derived_key,
            inner_hasher,
        }
    }

    pub fn output_size(&self) -> usize {
        self.inner_hasher.output_size()
    }

    pub fn update(&mut self, data: &[u8]) {
        self.inner_hasher.update(data);
    }

    pub fn finish(&self) -> Vec<u8> {
        let mut outer_hasher = (self.hash)();
        let block_size = outer_hasher.block_size();

        let mut outer_start = vec![0u8; block_size];
        let opad = vec![0x5cu8; block_size];
        xor(&opad, &self.derived_key, &mut outer_start);
        outer_hasher.update(&outer_start);

        outer_hasher.update(self.inner_hasher.finish().as_ref());
        outer_hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::md5::Md5Hasher;
    use crate::sha1::Sha1Hasher;
    use crate::sha256::Sha256Hasher;

    fn md5_factory() -> Box<dyn Hasher> {
        Box::new(Md5Hasher::new())
    }
    fn sha1_factory() -> Box<dyn Hasher> {
        Box::new(Sha1Hasher::new())
    }
    fn sha256_factory() -> Box<dyn Hasher> {
        Box::new(Sha256Hasher::new())
    }

    fn hex(s: &str) -> Vec<u8> {
        (0..s.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap())
            .collect()
    }

    #[test]
    fn rfc2202_hmac_md5() {
        let mut h = Hmac::new(md5_factory, b"key");
        h.update(b"The quick brown fox jumps over the lazy dog");
        assert_eq!(h.finish(), hex("80070713463e7749b90c2dc24911e275"));
    }

    #[test]
    fn rfc2202_hmac_sha1() {
        let mut h = Hmac::new(sha1_factory, b"key");
        h.update(b"The quick brown fox jumps over the lazy dog");
        assert_eq!(h.finish(), hex("de7c9b85b8b78aa6bc8a7a36f70a90701c9db4d9"));
    }

    #[test]
    fn hmac_sha256() {
        let mut h = Hmac::new(sha256_factory, b"key");
        h.update(b"The quick brown fox jumps over the lazy dog");
        assert_eq!(
            h.finish(),
            hex("f7bc83f430538424b13298e6aa6fb143ef4d59a14946175997479dbc2d1a3cd8")
        );
    }

    #[test]
    fn long_key_gets_hashed_down() {
        // Keys longer than the block size are hashed before use.
        let long_key = vec![0x0bu8; 200];
        let mut h = Hmac::new(sha1_factory, &long_key);
        h.update(b"data");
        assert_eq!(h.finish().len(), 20);
    }

    #[test]
    fn partial_updates_match_single_update() {
        let mut a = Hmac::new(sha1_factory, b"key");
        a.update(b"hello world");

        let mut b = Hmac::new(sha1_factory, b"key");
        b.update(b"hello ");
        b.update(b"world");

        assert_eq!(a.finish(), b.finish());
    }
}
