//! `ConnectionState`: the active (and, during a pending handshake, the
//! not-yet-activated) cryptographic parameters for one direction of a
//! `Session` — MAC, bulk cipher, compression, and the sequence number
//! that ties them to a specific record.

use crate::cipher_engine::{BulkCipherAlgorithm, CipherState};
use crate::compression::{CompressionAlgorithm, CompressionStage};
use crate::error::{Error, ErrorKind, Result};
use crate::mac::MacAlgorithm;

/// One direction's negotiated CipherSpec: which MAC, which bulk cipher
/// (with its key schedule already installed), which compressor.
pub struct CipherSpec {
    pub mac_algorithm: MacAlgorithm,
    pub mac_secret: Vec<u8>,
    pub bulk_cipher_algorithm: BulkCipherAlgorithm,
    pub cipher_state: CipherState,
    pub compression_state: CompressionStage,
}

impl CipherSpec {
    /// The CipherSpec a fresh `Session` starts in: NULL MAC, NULL cipher,
    /// NULL compression.
    pub fn null() -> Self {
        Self {
            mac_algorithm: MacAlgorithm::Null,
            mac_secret: Vec::new(),
            bulk_cipher_algorithm: BulkCipherAlgorithm::Null,
            cipher_state: CipherState::Null,
            compression_state: CompressionStage::new(CompressionAlgorithm::Null),
        }
    }

    pub fn new(
        mac_algorithm: MacAlgorithm,
        mac_secret: &[u8],
        bulk_cipher_algorithm: BulkCipherAlgorithm,
        cipher_key: &[u8],
        iv: &[u8],
        compression_algorithm: CompressionAlgorithm,
    ) -> Result<Self> {
        let cipher_state = CipherState::new(bulk_cipher_algorithm, cipher_key, iv)?;
        Ok(Self {
            mac_algorithm,
            mac_secret: mac_secret.to_vec(),
            bulk_cipher_algorithm,
            cipher_state,
            compression_state: CompressionStage::new(compression_algorithm),
        })
    }

    fn zeroize(&mut self) {
        crate::utils::zeroize(&mut self.mac_secret);
        self.cipher_state.zeroize();
    }
}

/// Per-direction state: one active CipherSpec, at most one pending
/// CipherSpec awaiting a ChangeCipherSpec signal, and the sequence
/// number of records sent/received under the active spec.
pub struct ConnectionState {
    active: CipherSpec,
    pending: Option<CipherSpec>,
    sequence_number: u64,
}

impl ConnectionState {
    pub fn new() -> Self {
        Self { active: CipherSpec::null(), pending: None, sequence_number: 0 }
    }

    pub fn active(&self) -> &CipherSpec {
        &self.active
    }

    pub fn active_mut(&mut self) -> &mut CipherSpec {
        &mut self.active
    }

    pub fn set_pending(&mut self, spec: CipherSpec) {
        self.pending = Some(spec);
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Swaps pending into active, resets the sequence number to 0, and
    /// zeroizes the displaced CipherSpec. The active/pending swap and the
    /// sequence reset happen together: there is no window in which a
    /// caller can observe the new keys with the old sequence number.
    pub fn install_pending(&mut self) -> Result<()> {
        let mut incoming = self.pending.take().ok_or_else(|| {
            Error::with_context(ErrorKind::InvalidSession, "no pending CipherSpec to activate")
        })?;

        std::mem::swap(&mut self.active, &mut incoming);
        incoming.zeroize();
        self.sequence_number = 0;
        Ok(())
    }

    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    /// Returns the pre-increment sequence number and advances it. Fails
    /// with `SequenceExhausted` rather than wrapping.
    pub fn advance_seq(&mut self) -> Result<u64> {
        if self.sequence_number == u64::MAX {
            return Err(Error::with_context(
                ErrorKind::SequenceExhausted,
                "sequence number would wrap past u64::MAX",
            ));
        }
        let seq = self.sequence_number;
        self.sequence_number += 1;
        Ok(seq)
    }

    /// Zeroizes both active and (if present) pending key material. Used
    /// on session teardown.
    pub fn zeroize(&mut self) {
        self.active.zeroize();
        if let Some(pending) = self.pending.as_mut() {
            pending.zeroize();
        }
    }
}

impl Default for ConnectionState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl ConnectionState {
    /// Test-only constructor for exercising the `SequenceExhausted`
    /// boundary without looping 2^64 times.
    pub(crate) fn new_at_sequence(seq: u64) -> Self {
        let mut state = Self::new();
        state.sequence_number = seq;
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_is_null_suite_at_seq_zero() {
        let state = ConnectionState::new();
        assert_eq!(state.sequence_number(), 0);
        assert_eq!(state.active().mac_algorithm, MacAlgorithm::Null);
        assert_eq!(state.active().bulk_cipher_algorithm, BulkCipherAlgorithm::Null);
    }

    #[test]
    fn advance_seq_increments_and_returns_prior_value() {
        let mut state = ConnectionState::new();
        assert_eq!(state.advance_seq().unwrap(), 0);
        assert_eq!(state.advance_seq().unwrap(), 1);
        assert_eq!(state.sequence_number(), 2);
    }

    #[test]
    fn install_pending_resets_sequence_and_swaps_spec() {
        let mut state = ConnectionState::new();
        state.advance_seq().unwrap();
        state.advance_seq().unwrap();
        assert_eq!(state.sequence_number(), 2);

        let spec = CipherSpec::new(
            MacAlgorithm::Sha1,
            &[7u8; 20],
            BulkCipherAlgorithm::Aes128Cbc,
            &[1u8; 16],
            &[2u8; 16],
            CompressionAlgorithm::Null,
        )
        .unwrap();
        state.set_pending(spec);
        assert!(state.has_pending());

        state.install_pending().unwrap();
        assert_eq!(state.sequence_number(), 0);
        assert!(!state.has_pending());
        assert_eq!(state.active().mac_algorithm, MacAlgorithm::Sha1);
    }

    #[test]
    fn advance_seq_fails_at_boundary() {
        let mut state = ConnectionState::new_at_sequence(u64::MAX);
        let err = state.advance_seq().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SequenceExhausted);
        assert_eq!(state.sequence_number(), u64::MAX);
    }

    #[test]
    fn install_pending_without_pending_spec_fails() {
        let mut state = ConnectionState::new();
        let err = state.install_pending().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSession);
    }
}
