//! The on-the-wire record header: `ContentType`, `ProtocolVersion`, and
//! the fixed 5-byte framing that precedes every ciphertext fragment.

use crate::error::{Error, ErrorKind, Result};

/// The maximum permitted ciphertext fragment length. A header claiming
/// more than this is rejected before any cryptographic work begins.
pub const MAX_FRAGMENT_LENGTH: usize = (1 << 14) + 2048;

pub const HEADER_LENGTH: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    ChangeCipherSpec,
    Alert,
    Handshake,
    ApplicationData,
}

impl ContentType {
    pub fn to_u8(self) -> u8 {
        match self {
            ContentType::ChangeCipherSpec => 20,
            ContentType::Alert => 21,
            ContentType::Handshake => 22,
            ContentType::ApplicationData => 23,
        }
    }

    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            20 => Some(ContentType::ChangeCipherSpec),
            21 => Some(ContentType::Alert),
            22 => Some(ContentType::Handshake),
            23 => Some(ContentType::ApplicationData),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ProtocolVersion {
    pub major: u8,
    pub minor: u8,
}

impl ProtocolVersion {
    pub const SSL3_0: ProtocolVersion = ProtocolVersion { major: 3, minor: 0 };
    pub const TLS1_0: ProtocolVersion = ProtocolVersion { major: 3, minor: 1 };
    pub const TLS1_1: ProtocolVersion = ProtocolVersion { major: 3, minor: 2 };
    pub const TLS1_2: ProtocolVersion = ProtocolVersion { major: 3, minor: 3 };

    pub fn is_ssl3(&self) -> bool {
        *self == ProtocolVersion::SSL3_0
    }
}

/// A parsed record header. The fragment bytes are carried separately by
/// the caller (see `record_codec`); this type only models the 5-byte
/// prefix.
#[derive(Debug, Clone, Copy)]
pub struct RecordHeader {
    pub content_type: ContentType,
    pub version: ProtocolVersion,
    pub length: u16,
}

impl RecordHeader {
    pub fn serialize(&self, out: &mut Vec<u8>) {
        out.push(self.content_type.to_u8());
        out.push(self.version.major);
        out.push(self.version.minor);
        out.extend_from_slice(&self.length.to_be_bytes());
    }

    /// Parses a 5-byte header. Fails with `LargePacket` if the claimed
    /// length exceeds `MAX_FRAGMENT_LENGTH`; this check happens before
    /// any byte of the fragment is touched.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LENGTH {
            return Err(Error::with_context(
                ErrorKind::UnexpectedPacketLength,
                "record header is shorter than 5 bytes",
            ));
        }

        let content_type = ContentType::from_u8(bytes[0]).ok_or_else(|| {
            Error::with_context(ErrorKind::UnexpectedPacketLength, "unrecognized content type")
        })?;
        let version = ProtocolVersion { major: bytes[1], minor: bytes[2] };
        let length = u16::from_be_bytes([bytes[3], bytes[4]]);

        if length as usize > MAX_FRAGMENT_LENGTH {
            return Err(Error::with_context(
                ErrorKind::LargePacket,
                "record fragment length exceeds 2^14 + 2048",
            ));
        }

        Ok(Self { content_type, version, length })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_header() {
        let header = RecordHeader {
            content_type: ContentType::ApplicationData,
            version: ProtocolVersion::TLS1_0,
            length: 5,
        };
        let mut buf = Vec::new();
        header.serialize(&mut buf);
        assert_eq!(buf, vec![23, 3, 1, 0, 5]);

        let parsed = RecordHeader::parse(&buf).unwrap();
        assert_eq!(parsed.content_type, ContentType::ApplicationData);
        assert_eq!(parsed.version, ProtocolVersion::TLS1_0);
        assert_eq!(parsed.length, 5);
    }

    #[test]
    fn oversize_length_rejected_before_crypto() {
        let mut buf = vec![23, 3, 1];
        buf.extend_from_slice(&((MAX_FRAGMENT_LENGTH + 1) as u16).to_be_bytes());
        let err = RecordHeader::parse(&buf).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LargePacket);
    }

    #[test]
    fn content_type_round_trips_through_u8() {
        for ct in [
            ContentType::ChangeCipherSpec,
            ContentType::Alert,
            ContentType::Handshake,
            ContentType::ApplicationData,
        ] {
            assert_eq!(ContentType::from_u8(ct.to_u8()), Some(ct));
        }
    }
}
