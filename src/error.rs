//! Stable error taxonomy for the record-layer engine.
//!
//! Every operation that can fail returns one of these kinds. Codes are
//! part of the public contract: callers (and tests) may match on
//! `ErrorKind::code()` instead of the `Display` string. A `fatal` error
//! latches the owning `Session` into a terminal state (see `session.rs`);
//! a non-fatal one (currently only `WarningAlertReceived`) does not.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnknownMacAlgorithm,
    UnknownCipher,
    UnknownCipherType,
    UnknownCompressionAlgorithm,
    LargePacket,
    UnexpectedPacketLength,
    DecryptionFailed,
    CompressionFailed,
    MemoryError,
    SequenceExhausted,
    WarningAlertReceived,
    /// Not part of the taxonomy in the strict sense: raised once a prior
    /// fatal error has latched the session and further calls are refused.
    InvalidSession,
}

impl ErrorKind {
    /// Fixed, stable integer code for this error kind.
    pub fn code(&self) -> u32 {
        match self {
            ErrorKind::UnknownMacAlgorithm => 1,
            ErrorKind::UnknownCipher => 2,
            ErrorKind::UnknownCipherType => 3,
            ErrorKind::UnknownCompressionAlgorithm => 4,
            ErrorKind::LargePacket => 5,
            ErrorKind::UnexpectedPacketLength => 6,
            ErrorKind::DecryptionFailed => 7,
            ErrorKind::CompressionFailed => 8,
            ErrorKind::MemoryError => 9,
            ErrorKind::SequenceExhausted => 10,
            ErrorKind::WarningAlertReceived => 11,
            ErrorKind::InvalidSession => 12,
        }
    }

    /// Whether this error kind moves the owning session into a terminal
    /// state. Only `WarningAlertReceived` is non-fatal.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ErrorKind::WarningAlertReceived)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            ErrorKind::UnknownMacAlgorithm => "unknown MAC algorithm",
            ErrorKind::UnknownCipher => "unknown cipher",
            ErrorKind::UnknownCipherType => "cipher is neither a stream nor a block cipher",
            ErrorKind::UnknownCompressionAlgorithm => "unknown compression algorithm",
            ErrorKind::LargePacket => "record fragment exceeds the maximum allowed length",
            ErrorKind::UnexpectedPacketLength => "fragment length inconsistent with cipher",
            ErrorKind::DecryptionFailed => "bad record mac",
            ErrorKind::CompressionFailed => "compression or decompression failed",
            ErrorKind::MemoryError => "allocation failure",
            ErrorKind::SequenceExhausted => "sequence number exhausted",
            ErrorKind::WarningAlertReceived => "peer sent a warning-level alert",
            ErrorKind::InvalidSession => "session is closed due to a prior fatal error",
        };
        f.write_str(s)
    }
}

/// An error raised by the record-layer engine.
///
/// Carries the stable [`ErrorKind`] plus an optional free-form context
/// string for logs/debugging. The context is never part of equality or
/// matching logic: only `kind` is, so callers comparing error codes across
/// implementations stay stable.
#[derive(Debug, Clone)]
pub struct Error {
    kind: ErrorKind,
    context: Option<String>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, context: None }
    }

    pub fn with_context<S: Into<String>>(kind: ErrorKind, context: S) -> Self {
        Self { kind, context: Some(context.into()) }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn is_fatal(&self) -> bool {
        self.kind.is_fatal()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.context {
            Some(ctx) => write!(f, "{} ({}, code={})", self.kind, ctx, self.kind.code()),
            None => write!(f, "{} (code={})", self.kind, self.kind.code()),
        }
    }
}

impl std::error::Error for Error {}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error::new(kind)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
