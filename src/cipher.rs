//! Primitive cipher traits. `cipher_engine::CipherState` composes these
//! into the stream/block dispatch the record codec needs; these traits
//! themselves know nothing about TLS.

/// A cipher operating on single fixed-size blocks. CBC chaining is
/// layered on top by `aes::CbcCipher`.
pub trait BlockCipher: Send {
    fn block_size(&self) -> usize;

    fn encrypt_block(&self, block: &[u8], out: &mut [u8]);

    fn decrypt_block(&self, block: &[u8], out: &mut [u8]);

    /// Scrubs the expanded key schedule in place.
    fn zeroize(&mut self);
}

/// A cipher that produces a keystream XORed against data of any length.
pub trait StreamCipher: Send {
    /// Encrypts (or, symmetrically, decrypts) `buf` in place by XORing
    /// it with the next `buf.len()` keystream bytes.
    fn apply_keystream(&mut self, buf: &mut [u8]);
}
