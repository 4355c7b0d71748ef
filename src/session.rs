//! `Session`: the object the handshake layer actually holds. Owns the
//! read and write `ConnectionState`s, the negotiated protocol version,
//! and the terminal-state latch that turns any fatal error into
//! `InvalidSession` for every subsequent call.

use log::{debug, warn};

use crate::cipher_engine::BulkCipherAlgorithm;
use crate::compression::CompressionAlgorithm;
use crate::connection_state::{CipherSpec, ConnectionState};
use crate::error::{Error, ErrorKind, Result};
use crate::mac::MacAlgorithm;
use crate::random::MersenneTwisterRng;
use crate::record::{ContentType, ProtocolVersion};
use crate::record_codec;

pub struct Session {
    read: ConnectionState,
    write: ConnectionState,
    version: ProtocolVersion,
    rng: MersenneTwisterRng,
    /// Set once a fatal error has been observed; every subsequent call
    /// fails fast with `InvalidSession` instead of touching key material
    /// that may be in an inconsistent state.
    closed: bool,
}

impl Session {
    /// A fresh session in the NULL cipher suite, both directions, at the
    /// given negotiated version (the handshake layer updates this as
    /// renegotiation or version selection proceeds).
    pub fn new(version: ProtocolVersion) -> Self {
        Self {
            read: ConnectionState::new(),
            write: ConnectionState::new(),
            version,
            rng: MersenneTwisterRng::from_clock(),
            closed: false,
        }
    }

    pub fn current_version(&self) -> ProtocolVersion {
        self.version
    }

    pub fn set_version(&mut self, version: ProtocolVersion) {
        self.version = version;
    }

    fn check_open(&self) -> Result<()> {
        if self.closed {
            return Err(Error::new(ErrorKind::InvalidSession));
        }
        Ok(())
    }

    fn latch_if_fatal(&mut self, err: Error) -> Error {
        if err.is_fatal() {
            self.closed = true;
            warn!("record layer session closed after fatal error: {}", err);
        }
        err
    }

    /// Stages a pending read CipherSpec; takes effect on the next
    /// `activate_pending_read()`, normally driven by a peer
    /// ChangeCipherSpec.
    #[allow(clippy::too_many_arguments)]
    pub fn install_read_params(
        &mut self,
        mac_algorithm: MacAlgorithm,
        mac_secret: &[u8],
        cipher_algorithm: BulkCipherAlgorithm,
        cipher_key: &[u8],
        iv: &[u8],
        compression: CompressionAlgorithm,
    ) -> Result<()> {
        self.check_open()?;
        let spec = CipherSpec::new(mac_algorithm, mac_secret, cipher_algorithm, cipher_key, iv, compression)
            .map_err(|e| self.latch_if_fatal(e))?;
        self.read.set_pending(spec);
        debug!("pending read CipherSpec installed");
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    pub fn install_write_params(
        &mut self,
        mac_algorithm: MacAlgorithm,
        mac_secret: &[u8],
        cipher_algorithm: BulkCipherAlgorithm,
        cipher_key: &[u8],
        iv: &[u8],
        compression: CompressionAlgorithm,
    ) -> Result<()> {
        self.check_open()?;
        let spec = CipherSpec::new(mac_algorithm, mac_secret, cipher_algorithm, cipher_key, iv, compression)
            .map_err(|e| self.latch_if_fatal(e))?;
        self.write.set_pending(spec);
        debug!("pending write CipherSpec installed");
        Ok(())
    }

    pub fn activate_pending_read(&mut self) -> Result<()> {
        self.check_open()?;
        self.read.install_pending().map_err(|e| self.latch_if_fatal(e))?;
        debug!("read CipherSpec activated, sequence number reset");
        Ok(())
    }

    pub fn activate_pending_write(&mut self) -> Result<()> {
        self.check_open()?;
        self.write.install_pending().map_err(|e| self.latch_if_fatal(e))?;
        debug!("write CipherSpec activated, sequence number reset");
        Ok(())
    }

    /// Frames, MACs, pads and encrypts `plaintext` under the active
    /// write CipherSpec. `random_pad_flag` requests the traffic-analysis
    /// padding extension described in the codec.
    pub fn protect(
        &mut self,
        content_type: ContentType,
        plaintext: &[u8],
        random_pad_flag: bool,
    ) -> Result<Vec<u8>> {
        self.check_open()?;
        let version = self.version;
        record_codec::protect(&mut self.write, version, content_type, plaintext, random_pad_flag, &mut self.rng)
            .map_err(|e| self.latch_if_fatal(e))
    }

    /// Decrypts, verifies and decompresses one complete record under the
    /// active read CipherSpec.
    pub fn unprotect(&mut self, record: &[u8]) -> Result<(ContentType, Vec<u8>)> {
        self.check_open()?;
        let version = self.version;
        record_codec::unprotect(&mut self.read, version, record).map_err(|e| self.latch_if_fatal(e))
    }

    /// Zeroizes all key material in both directions and latches the
    /// session closed. Idempotent.
    pub fn zeroize_and_close(&mut self) {
        self.read.zeroize();
        self.write.zeroize();
        self.closed = true;
        debug!("session zeroized and closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_session_round_trips_null_suite() {
        let mut session = Session::new(ProtocolVersion::TLS1_0);
        let record = session
            .protect(ContentType::ApplicationData, b"ping", false)
            .unwrap();

        let mut peer = Session::new(ProtocolVersion::TLS1_0);
        let (content_type, plaintext) = peer.unprotect(&record).unwrap();
        assert_eq!(content_type, ContentType::ApplicationData);
        assert_eq!(plaintext, b"ping");
    }

    #[test]
    fn cipher_spec_change_resets_sequence_number() {
        let mut session = Session::new(ProtocolVersion::TLS1_0);
        session
            .protect(ContentType::ApplicationData, b"a", false)
            .unwrap();
        session
            .protect(ContentType::ApplicationData, b"b", false)
            .unwrap();

        session
            .install_write_params(
                MacAlgorithm::Sha1,
                &[3u8; 20],
                BulkCipherAlgorithm::Aes128Cbc,
                &[4u8; 16],
                &[5u8; 16],
                CompressionAlgorithm::Null,
            )
            .unwrap();
        session.activate_pending_write().unwrap();

        let record = session
            .protect(ContentType::ApplicationData, b"c", false)
            .unwrap();
        assert!(!record.is_empty());
    }

    #[test]
    fn fatal_error_latches_session_closed() {
        let mut session = Session::new(ProtocolVersion::TLS1_0);
        let oversized = vec![0u8; (1 << 14) + 1];
        let err = session
            .protect(ContentType::ApplicationData, &oversized, false)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LargePacket);

        let err = session
            .protect(ContentType::ApplicationData, b"anything", false)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSession);
    }

    #[test]
    fn zeroize_and_close_refuses_further_calls() {
        let mut session = Session::new(ProtocolVersion::TLS1_0);
        session.zeroize_and_close();
        let err = session
            .protect(ContentType::ApplicationData, b"x", false)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSession);
    }
}
