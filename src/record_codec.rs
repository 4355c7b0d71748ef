//! `protect`/`unprotect`: the heart of the engine. Turns plaintext into
//! a framed, MAC-then-encrypted record and back, against one direction's
//! `ConnectionState`.

use crate::connection_state::ConnectionState;
use crate::error::{Error, ErrorKind, Result};
use crate::mac::{MacAlgorithm, MacEngine, MacVersion};
use crate::random::{Rng, RngExt};
use crate::record::{ContentType, ProtocolVersion, RecordHeader, HEADER_LENGTH};

/// Maximum plaintext payload accepted by `protect`, per §3's record model.
pub const MAX_PLAINTEXT_LENGTH: usize = 1 << 14;

fn mac_version_for(version: ProtocolVersion) -> MacVersion {
    if version.is_ssl3() {
        MacVersion::Ssl3
    } else {
        MacVersion::Tls
    }
}

/// Builds the MAC input: `seq(8B BE) || type(1B) || version(2B, TLS only)
/// || length(2B BE) || data`.
fn mac_input(
    seq: u64,
    content_type: ContentType,
    version: ProtocolVersion,
    data: &[u8],
) -> Vec<u8> {
    let mut buf = Vec::with_capacity(13 + data.len());
    buf.extend_from_slice(&seq.to_be_bytes());
    buf.push(content_type.to_u8());
    if !version.is_ssl3() {
        buf.push(version.major);
        buf.push(version.minor);
    }
    buf.extend_from_slice(&(data.len() as u16).to_be_bytes());
    buf.extend_from_slice(data);
    buf
}

fn compute_mac(
    mac_algorithm: MacAlgorithm,
    mac_secret: &[u8],
    version: ProtocolVersion,
    seq: u64,
    content_type: ContentType,
    data: &[u8],
) -> Result<Vec<u8>> {
    let mut engine = MacEngine::init(mac_algorithm, mac_secret, mac_version_for(version))?;
    engine.update(&mac_input(seq, content_type, version, data));
    Ok(engine.finish())
}

/// Transforms `plaintext` into one fully framed record using `state`'s
/// active write CipherSpec. `random_pad_flag` asks for extra CBC padding
/// (up to one block) as a traffic-analysis countermeasure; it has no
/// effect for SSL 3.0 or non-block ciphers.
pub fn protect(
    state: &mut ConnectionState,
    version: ProtocolVersion,
    content_type: ContentType,
    plaintext: &[u8],
    random_pad_flag: bool,
    rng: &mut dyn Rng,
) -> Result<Vec<u8>> {
    if plaintext.len() > MAX_PLAINTEXT_LENGTH {
        return Err(Error::with_context(
            ErrorKind::LargePacket,
            "plaintext exceeds the 2^14 byte record payload limit",
        ));
    }

    let seq = state.sequence_number();
    let spec = state.active_mut();

    let compressed = spec.compression_state.compress(plaintext)?;

    let mac = compute_mac(
        spec.mac_algorithm,
        &spec.mac_secret,
        version,
        seq,
        content_type,
        &compressed,
    )?;

    let mut buf = compressed;
    buf.extend_from_slice(&mac);

    if let Some(block_size) = spec.cipher_state.block_size() {
        let base_pad = block_size - (buf.len() % block_size);
        let extra = if random_pad_flag && !version.is_ssl3() {
            (rng.between_u32(0, 2) as usize) * block_size
        } else {
            0
        };
        let pad_length = base_pad + extra;
        buf.resize(buf.len() + pad_length, (pad_length - 1) as u8);
    }

    spec.cipher_state.encrypt(&mut buf)?;

    if buf.len() > u16::MAX as usize {
        return Err(Error::with_context(
            ErrorKind::UnexpectedPacketLength,
            "encrypted fragment exceeds the 16-bit length field",
        ));
    }

    let header = RecordHeader { content_type, version, length: buf.len() as u16 };
    let mut record = Vec::with_capacity(HEADER_LENGTH + buf.len());
    header.serialize(&mut record);
    record.extend_from_slice(&buf);

    state.advance_seq()?;
    Ok(record)
}

/// Parses, decrypts, verifies and decompresses one complete record
/// against `state`'s active read CipherSpec.
///
/// The pad-length check, pad-content check and MAC comparison are all
/// folded into the single `DecryptionFailed` outcome: a caller (or an
/// attacker with oracle access) cannot distinguish "bad padding" from
/// "bad MAC" from the returned error alone. The MAC is always computed
/// — over a canonical slice derived with saturating arithmetic even when
/// the claimed pad length is nonsensical — so that a failing pad check
/// does not skip the (comparatively expensive) MAC computation.
pub fn unprotect(
    state: &mut ConnectionState,
    version: ProtocolVersion,
    record: &[u8],
) -> Result<(ContentType, Vec<u8>)> {
    let header = RecordHeader::parse(record)?;
    let fragment_end = HEADER_LENGTH + header.length as usize;
    if record.len() < fragment_end {
        return Err(Error::with_context(
            ErrorKind::UnexpectedPacketLength,
            "record shorter than its declared fragment length",
        ));
    }

    let seq = state.sequence_number();
    let spec = state.active_mut();

    let mut buf = record[HEADER_LENGTH..fragment_end].to_vec();
    spec.cipher_state.decrypt(&mut buf)?;

    let mac_size = spec.mac_algorithm.output_size();
    let length = buf.len();

    let (compressed_len, pad_ok) = if spec.cipher_state.block_size().is_some() {
        if length >= mac_size + 1 {
            let pad_length = buf[length - 1] as usize + 1;
            if pad_length <= length - mac_size {
                let pad_ok = version.is_ssl3()
                    || buf[length - pad_length..length]
                        .iter()
                        .all(|&b| b == (pad_length - 1) as u8);
                (length - mac_size - pad_length, pad_ok)
            } else {
                (length.saturating_sub(mac_size).saturating_sub(1), false)
            }
        } else {
            (0, false)
        }
    } else {
        if length >= mac_size {
            (length - mac_size, true)
        } else {
            (0, false)
        }
    };

    let compressed = &buf[0..compressed_len];
    let expected_mac = compute_mac(
        spec.mac_algorithm,
        &spec.mac_secret,
        version,
        seq,
        header.content_type,
        compressed,
    )?;
    // `compressed_len` never exceeds `length`, but a nonsensical pad_length
    // or an undersized fragment can still leave less than `mac_size` bytes
    // after it; clamp so the slice never runs past the buffer rather than
    // panicking on adversarial input. A short slice simply fails the
    // length check inside `constant_time_eq`.
    let mac_end = (compressed_len + mac_size).min(length);
    let received_mac = &buf[compressed_len..mac_end];
    let mac_ok = crate::utils::constant_time_eq(&expected_mac, received_mac);

    if !pad_ok || !mac_ok {
        return Err(Error::new(ErrorKind::DecryptionFailed));
    }

    let plaintext = spec.compression_state.decompress(compressed)?;
    state.advance_seq()?;
    Ok((header.content_type, plaintext))
}
