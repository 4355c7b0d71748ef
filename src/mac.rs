//! `MacEngine`: a polymorphic handle over the MAC constructions a
//! `ConnectionState` can be configured with. Dispatch is a tagged
//! variant rather than a trait object so the hot path (one `update` per
//! record, one `finish` per record) avoids virtual calls on top of the
//! hasher's own dynamic dispatch.

use crate::error::{Error, ErrorKind, Result};
use crate::hasher::{Hasher, HasherFactory};
use crate::hmac::Hmac;
use crate::md5::Md5Hasher;
use crate::sha1::Sha1Hasher;
use crate::sha256::Sha256Hasher;
use crate::ssl3_mac::{self, Ssl3Mac};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacAlgorithm {
    Null,
    Md5,
    Sha1,
    Sha256,
}

impl MacAlgorithm {
    pub fn output_size(&self) -> usize {
        match self {
            MacAlgorithm::Null => 0,
            MacAlgorithm::Md5 => 16,
            MacAlgorithm::Sha1 => 20,
            MacAlgorithm::Sha256 => 32,
        }
    }

    fn hasher_factory(&self) -> Option<HasherFactory> {
        match self {
            MacAlgorithm::Null => None,
            MacAlgorithm::Md5 => Some(|| Box::new(Md5Hasher::new()) as Box<dyn Hasher>),
            MacAlgorithm::Sha1 => Some(|| Box::new(Sha1Hasher::new()) as Box<dyn Hasher>),
            MacAlgorithm::Sha256 => Some(|| Box::new(Sha256Hasher::new()) as Box<dyn Hasher>),
        }
    }
}

/// Whether the owning connection is negotiated as SSL 3.0 (which uses the
/// legacy MAC construction and omits the version bytes) or a TLS version
/// (HMAC, version bytes included).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacVersion {
    Ssl3,
    Tls,
}

pub enum MacEngine {
    Null,
    Hmac(Hmac),
    Ssl3(Ssl3Mac),
}

impl MacEngine {
    /// Constructs a MAC engine for `algorithm` keyed with `secret`. `version`
    /// selects between HMAC (TLS) and the legacy concatenation MAC (SSL 3.0).
    ///
    /// Fails with `UnknownMacAlgorithm` for an unrecognized algorithm, unless
    /// `algorithm` is `Null` (always accepted, `finish()` returns an empty
    /// tag).
    pub fn init(algorithm: MacAlgorithm, secret: &[u8], version: MacVersion) -> Result<Self> {
        let factory = match algorithm.hasher_factory() {
            Some(f) => f,
            None => return Ok(MacEngine::Null),
        };

        match version {
            MacVersion::Tls => Ok(MacEngine::Hmac(Hmac::new(factory, secret))),
            MacVersion::Ssl3 => {
                let output_size = algorithm.output_size();
                let pad_size = ssl3_mac::pad_size_for_output(output_size).ok_or_else(|| {
                    Error::with_context(
                        ErrorKind::UnknownMacAlgorithm,
                        "algorithm has no defined SSL 3.0 MAC pad size",
                    )
                })?;
                Ok(MacEngine::Ssl3(Ssl3Mac::new(factory, secret, pad_size)))
            }
        }
    }

    pub fn output_size(&self) -> usize {
        match self {
            MacEngine::Null => 0,
            MacEngine::Hmac(h) => h.output_size(),
            MacEngine::Ssl3(m) => m.output_size(),
        }
    }

    pub fn update(&mut self, data: &[u8]) {
        match self {
            MacEngine::Null => {}
            MacEngine::Hmac(h) => h.update(data),
            MacEngine::Ssl3(m) => m.update(data),
        }
    }

    pub fn finish(&self) -> Vec<u8> {
        match self {
            MacEngine::Null => Vec::new(),
            MacEngine::Hmac(h) => h.finish(),
            MacEngine::Ssl3(m) => m.finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_mac_is_empty() {
        let mut mac = MacEngine::init(MacAlgorithm::Null, b"", MacVersion::Tls).unwrap();
        mac.update(b"anything");
        assert_eq!(mac.finish(), Vec::<u8>::new());
    }

    #[test]
    fn tls_hmac_dispatch() {
        let mut mac = MacEngine::init(MacAlgorithm::Sha1, &[0u8; 20], MacVersion::Tls).unwrap();
        mac.update(b"hello");
        assert_eq!(mac.output_size(), 20);
        assert_eq!(mac.finish().len(), 20);
    }

    #[test]
    fn ssl3_unsupported_digest_fails() {
        let result = MacEngine::init(MacAlgorithm::Sha256, &[0u8; 32], MacVersion::Ssl3);
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().kind(), ErrorKind::UnknownMacAlgorithm);
    }
}
