//! TLS/SSL record-layer cryptographic engine.
//!
//! Transforms application payloads into authenticated, encrypted,
//! framed records (MAC-then-encrypt, CBC or stream), and performs the
//! inverse on receipt. Sits between a handshake/message layer and a raw
//! bytestream transport; neither is this crate's concern.
//!
//! The entry point is [`session::Session`]: construct one per direction
//! pair, install CipherSpecs as the handshake negotiates them, then call
//! [`session::Session::protect`] / [`session::Session::unprotect`] per
//! record.

pub mod aes;
pub mod cipher;
pub mod cipher_engine;
pub mod compression;
pub mod connection_state;
pub mod error;
pub mod hasher;
pub mod hmac;
pub mod mac;
pub mod md5;
pub mod random;
pub mod rc4;
pub mod record;
pub mod record_codec;
pub mod session;
pub mod sha1;
pub mod sha256;
pub mod ssl3_mac;
mod utils;

pub use error::{Error, ErrorKind, Result};
pub use session::Session;
