//! `CipherEngine`: the polymorphic handle over {NULL, STREAM, BLOCK}
//! bulk ciphers. Like `MacEngine`, this is a tagged variant rather than
//! a trait object so the compiler can specialize the bounded per-record
//! loops (padding write, CBC chaining) instead of dispatching through a
//! vtable on every block.

use crate::aes::{AesBlockCipher, CbcCipher};
use crate::cipher::StreamCipher;
use crate::error::{Error, ErrorKind, Result};
use crate::rc4::Rc4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkCipherAlgorithm {
    Null,
    Rc4Stream,
    Aes128Cbc,
    Aes256Cbc,
}

impl BulkCipherAlgorithm {
    pub fn key_size(&self) -> usize {
        match self {
            BulkCipherAlgorithm::Null => 0,
            BulkCipherAlgorithm::Rc4Stream => 16,
            BulkCipherAlgorithm::Aes128Cbc => 16,
            BulkCipherAlgorithm::Aes256Cbc => 32,
        }
    }

    /// Size of the IV installed at `ConnectionState` setup time. Zero for
    /// NULL/stream ciphers, the block size for CBC.
    pub fn iv_size(&self) -> usize {
        match self {
            BulkCipherAlgorithm::Null | BulkCipherAlgorithm::Rc4Stream => 0,
            BulkCipherAlgorithm::Aes128Cbc | BulkCipherAlgorithm::Aes256Cbc => 16,
        }
    }

    pub fn block_size(&self) -> Option<usize> {
        match self {
            BulkCipherAlgorithm::Null | BulkCipherAlgorithm::Rc4Stream => None,
            BulkCipherAlgorithm::Aes128Cbc | BulkCipherAlgorithm::Aes256Cbc => Some(16),
        }
    }

    pub fn is_block(&self) -> bool {
        self.block_size().is_some()
    }
}

pub enum CipherState {
    Null,
    Stream(Rc4),
    Block(CbcCipher<AesBlockCipher>),
}

impl CipherState {
    pub fn new(algorithm: BulkCipherAlgorithm, key: &[u8], iv: &[u8]) -> Result<Self> {
        if key.len() != algorithm.key_size() {
            return Err(Error::with_context(
                ErrorKind::UnknownCipher,
                "cipher key is not the size this algorithm requires",
            ));
        }
        if let Some(block_size) = algorithm.block_size() {
            if iv.len() != block_size {
                return Err(Error::with_context(
                    ErrorKind::UnknownCipher,
                    "IV is not the size this algorithm's block requires",
                ));
            }
        }

        match algorithm {
            BulkCipherAlgorithm::Null => Ok(CipherState::Null),
            BulkCipherAlgorithm::Rc4Stream => Ok(CipherState::Stream(Rc4::new(key))),
            BulkCipherAlgorithm::Aes128Cbc | BulkCipherAlgorithm::Aes256Cbc => {
                let cipher = AesBlockCipher::new(key)?;
                Ok(CipherState::Block(CbcCipher::new(cipher, iv.to_vec())))
            }
        }
    }

    pub fn block_size(&self) -> Option<usize> {
        match self {
            CipherState::Block(c) => Some(c.block_size()),
            _ => None,
        }
    }

    /// Scrubs key material in place. Called when a `ConnectionState`
    /// displaces this cipher at a CipherSpec change, and on session
    /// teardown.
    pub fn zeroize(&mut self) {
        match self {
            CipherState::Null => {}
            CipherState::Stream(rc4) => rc4.zeroize(),
            CipherState::Block(cbc) => cbc.zeroize(),
        }
    }

    /// Encrypts `buf` in place. For a block cipher, `buf.len()` must
    /// already be a positive multiple of the block size (the caller is
    /// responsible for padding first) — a violation here is an internal
    /// logic error, not adversarial input, so it is reported as
    /// `UnknownCipherType` per the engine's error taxonomy.
    pub fn encrypt(&mut self, buf: &mut Vec<u8>) -> Result<()> {
        match self {
            CipherState::Null => Ok(()),
            CipherState::Stream(rc4) => {
                rc4.apply_keystream(buf);
                Ok(())
            }
            CipherState::Block(cbc) => {
                let block_size = cbc.block_size();
                if buf.is_empty() || buf.len() % block_size != 0 {
                    return Err(Error::with_context(
                        ErrorKind::UnknownCipherType,
                        "plaintext buffer is not a positive multiple of the block size",
                    ));
                }
                cbc.encrypt(buf);
                Ok(())
            }
        }
    }

    /// Decrypts `buf` in place. For a block cipher, a length that is zero
    /// or not a multiple of the block size is adversarial input (a
    /// tampered or truncated record), reported as `DecryptionFailed`.
    pub fn decrypt(&mut self, buf: &mut Vec<u8>) -> Result<()> {
        match self {
            CipherState::Null => Ok(()),
            CipherState::Stream(rc4) => {
                rc4.apply_keystream(buf);
                Ok(())
            }
            CipherState::Block(cbc) => {
                let block_size = cbc.block_size();
                if buf.is_empty() || buf.len() % block_size != 0 {
                    return Err(Error::with_context(
                        ErrorKind::DecryptionFailed,
                        "ciphertext fragment length is not a positive multiple of the block size",
                    ));
                }
                cbc.decrypt(buf);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_cipher_is_identity() {
        let mut state = CipherState::new(BulkCipherAlgorithm::Null, &[], &[]).unwrap();
        let mut buf = b"hello".to_vec();
        state.encrypt(&mut buf).unwrap();
        assert_eq!(buf, b"hello");
    }

    #[test]
    fn stream_cipher_round_trip() {
        let key = vec![9u8; 16];
        let mut enc = CipherState::new(BulkCipherAlgorithm::Rc4Stream, &key, &[]).unwrap();
        let mut dec = CipherState::new(BulkCipherAlgorithm::Rc4Stream, &key, &[]).unwrap();

        let mut buf = b"application data".to_vec();
        let original = buf.clone();
        enc.encrypt(&mut buf).unwrap();
        assert_ne!(buf, original);
        dec.decrypt(&mut buf).unwrap();
        assert_eq!(buf, original);
    }

    #[test]
    fn block_cipher_rejects_unaligned_plaintext() {
        let key = vec![0u8; 16];
        let iv = vec![0u8; 16];
        let mut state = CipherState::new(BulkCipherAlgorithm::Aes128Cbc, &key, &iv).unwrap();
        let mut buf = vec![0u8; 17];
        assert!(state.encrypt(&mut buf).is_err());
    }

    #[test]
    fn block_cipher_round_trip() {
        let key = vec![1u8; 16];
        let iv = vec![2u8; 16];
        let mut enc = CipherState::new(BulkCipherAlgorithm::Aes128Cbc, &key, &iv).unwrap();
        let mut dec = CipherState::new(BulkCipherAlgorithm::Aes128Cbc, &key, &iv).unwrap();

        let mut buf = vec![5u8; 32];
        let original = buf.clone();
        enc.encrypt(&mut buf).unwrap();
        dec.decrypt(&mut buf).unwrap();
        assert_eq!(buf, original);
    }
}
