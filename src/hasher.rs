//! Common trait implemented by every digest algorithm (MD5, SHA-1,
//! SHA-256, and the NULL hasher) so that [`crate::hmac::Hmac`] and
//! [`crate::ssl3_mac::Ssl3Mac`] can be generic over which one is active.

/// Encapsulates an algorithm for creating digests (MD5, SHA-1, SHA-256).
pub trait Hasher: Send {
    /// Size in bytes of the internal compression block (64 for all of
    /// MD5/SHA-1/SHA-256).
    fn block_size(&self) -> usize;

    /// Size in bytes of the finalized digest.
    fn output_size(&self) -> usize;

    /// Appends data to the running hash state.
    fn update(&mut self, data: &[u8]);

    /// Finalizes the hash of everything seen so far without consuming
    /// `self`, so additional `update` calls remain legal afterwards.
    fn finish(&self) -> Vec<u8>;
}

/// Constructs a fresh, empty hasher instance for a given algorithm.
pub type HasherFactory = fn() -> Box<dyn Hasher>;
