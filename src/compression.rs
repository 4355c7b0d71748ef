//! `CompressionStage`: the pluggable NULL/DEFLATE compressor sitting
//! between fragmentation and MAC+encrypt. TLS compression is legacy
//! (CRIME) and almost always negotiated as NULL in practice, but the
//! record format still carries the slot, so the engine implements it.

use flate2::write::{DeflateDecoder, DeflateEncoder};
use flate2::Compression;
use std::io::Write;

use crate::error::{Error, ErrorKind, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionAlgorithm {
    Null,
    Deflate,
}

/// Per-direction compression state. DEFLATE keeps no state between
/// records in this engine (each record is compressed/decompressed
/// independently), matching TLS's own "each fragment is self-contained"
/// framing; only the algorithm selection is retained.
pub struct CompressionStage {
    algorithm: CompressionAlgorithm,
}

impl CompressionStage {
    pub fn new(algorithm: CompressionAlgorithm) -> Self {
        Self { algorithm }
    }

    /// Compresses `input`. Empty input is a short-circuit identity.
    /// Fails with `CompressionFailed` if the output would exceed
    /// `input.len() + 1024` (the expansion cap) or if the underlying
    /// codec errors.
    pub fn compress(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        if input.is_empty() {
            return Ok(Vec::new());
        }

        let output = match self.algorithm {
            CompressionAlgorithm::Null => input.to_vec(),
            CompressionAlgorithm::Deflate => {
                let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
                encoder.write_all(input).map_err(|e| {
                    Error::with_context(ErrorKind::CompressionFailed, &e.to_string())
                })?;
                encoder
                    .finish()
                    .map_err(|e| Error::with_context(ErrorKind::CompressionFailed, &e.to_string()))?
            }
        };

        if output.len() > input.len() + 1024 {
            return Err(Error::with_context(
                ErrorKind::CompressionFailed,
                "compressed output exceeds the expansion cap",
            ));
        }

        Ok(output)
    }

    /// Decompresses `input`. Empty input is a short-circuit identity.
    pub fn decompress(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        if input.is_empty() {
            return Ok(Vec::new());
        }

        match self.algorithm {
            CompressionAlgorithm::Null => Ok(input.to_vec()),
            CompressionAlgorithm::Deflate => {
                let mut decoder = DeflateDecoder::new(Vec::new());
                decoder.write_all(input).map_err(|e| {
                    Error::with_context(ErrorKind::CompressionFailed, &e.to_string())
                })?;
                decoder
                    .finish()
                    .map_err(|e| Error::with_context(ErrorKind::CompressionFailed, &e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_is_identity() {
        let mut stage = CompressionStage::new(CompressionAlgorithm::Null);
        let data = b"hello world".to_vec();
        let compressed = stage.compress(&data).unwrap();
        assert_eq!(compressed, data);
        let decompressed = stage.decompress(&compressed).unwrap();
        assert_eq!(decompressed, data);
    }

    #[test]
    fn empty_input_bypasses_codec() {
        let mut stage = CompressionStage::new(CompressionAlgorithm::Deflate);
        assert_eq!(stage.compress(&[]).unwrap(), Vec::<u8>::new());
        assert_eq!(stage.decompress(&[]).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn deflate_round_trip() {
        let mut stage = CompressionStage::new(CompressionAlgorithm::Deflate);
        let data = b"aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa".to_vec();
        let compressed = stage.compress(&data).unwrap();
        let decompressed = stage.decompress(&compressed).unwrap();
        assert_eq!(decompressed, data);
    }
}
