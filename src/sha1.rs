//! SHA-1 (FIPS 180-4). The default MAC digest for TLS 1.0/1.1 cipher
//! suites this engine targets.

use arrayref::{array_mut_ref, array_ref};

use crate::hasher::Hasher;

const CHUNK_SIZE: usize = 64;

const INITIAL_HASH: [u32; 5] = [0x67452301, 0xEFCDAB89, 0x98BADCFE, 0x10325476, 0xC3D2E1F0];

#[derive(Clone)]
pub struct Sha1Hasher {
    hash: [u32; 5],
    length: usize,
    pending_chunk: [u8; CHUNK_SIZE],
}

impl Sha1Hasher {
    pub fn new() -> Self {
        Self::default()
    }

    fn update_chunk(hash: &mut [u32; 5], chunk: &[u8; CHUNK_SIZE]) {
        let mut w = [0u32; 80];
        for i in 0..16 {
            w[i] = u32::from_be_bytes(*array_ref![chunk, 4 * i, 4]);
        }
        for i in 16..80 {
            w[i] = (w[i - 3] ^ w[i - 8] ^ w[i - 14] ^ w[i - 16]).rotate_left(1);
        }

        let mut a = hash[0];
        let mut b = hash[1];
        let mut c = hash[2];
        let mut d = hash[3];
        let mut e = hash[4];

        for i in 0..80 {
            let (f, k) = if i < 20 {
                ((b & c) | ((!b) & d), 0x5A827999)
            } else if i < 40 {
                (b ^ c ^ d, 0x6ED9EBA1)
            } else if i < 60 {
                ((b & c) | (b & d) | (c & d), 0x8F1BBCDC)
            } else {
                (b ^ c ^ d, 0xCA62C1D6u32)
            };

            let tmp = a
                .rotate_left(5)
                .wrapping_add(f)
                .wrapping_add(e)
                .wrapping_add(k)
                .wrapping_add(w[i]);
            e = d;
            d = c;
            c = b.rotate_left(30);
            b = a;
            a = tmp;
        }

        hash[0] = hash[0].wrapping_add(a);
        hash[1] = hash[1].wrapping_add(b);
        hash[2] = hash[2].wrapping_add(c);
        hash[3] = hash[3].wrapping_add(d);
        hash[4] = hash[4].wrapping_add(e);
    }
}

impl Default for Sha1Hasher {
    fn default() -> Self {
        Self {
            hash: INITIAL_HASH,
            length: 0,
            pending_chunk: [0u8; CHUNK_SIZE],
        }
    }
}

impl Hasher for Sha1Hasher {
    fn block_size(&self) -> usize {
        CHUNK_SIZE
    }

    fn output_size(&self) -> usize {
        20
    }

    fn update(&mut self, mut data: &[u8]) {
        let rem = self.length % CHUNK_SIZE;
        if rem != 0 {
            let n = std::cmp::min(CHUNK_SIZE - rem, data.len());
            self.pending_chunk[rem..(rem + n)].copy_from_slice(&data[0..n]);
            self.length += n;
            data = &data[n..];

            if self.length % CHUNK_SIZE != 0 {
                return;
            }

            let chunk = self.pending_chunk;
            Self::update_chunk(&mut self.hash, &chunk);
        }

        for i in 0..(data.len() / CHUNK_SIZE) {
            Self::update_chunk(&mut self.hash, array_ref![data, CHUNK_SIZE * i, CHUNK_SIZE]);
        }

        let r = data.len() % CHUNK_SIZE;
        self.pending_chunk[0..r].copy_from_slice(&data[(data.len() - r)..]);
        self.length += data.len();
    }

    fn finish(&self) -> Vec<u8> {
        let message_length = 8 * self.length as u64;

        let mut padded_len = self.length + (1 + 8);
        let rem = padded_len % CHUNK_SIZE;
        if rem != 0 {
            padded_len += CHUNK_SIZE - rem;
        }
        let num_extra = padded_len - self.length;

        let mut buf = [0u8; CHUNK_SIZE + 9];
        buf[0] = 0x80;
        *array_mut_ref![buf, num_extra - 8, 8] = message_length.to_be_bytes();

        let mut h = self.clone();
        h.update(&buf[0..num_extra]);
        debug_assert_eq!(h.length % CHUNK_SIZE, 0);

        let mut out = [0u8; 20];
        *array_mut_ref![out, 0, 4] = h.hash[0].to_be_bytes();
        *array_mut_ref![out, 4, 4] = h.hash[1].to_be_bytes();
        *array_mut_ref![out, 8, 4] = h.hash[2].to_be_bytes();
        *array_mut_ref![out, 12, 4] = h.hash[3].to_be_bytes();
        *array_mut_ref![out, 16, 4] = h.hash[4].to_be_bytes();
        out.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sha1(s: &[u8]) -> Vec<u8> {
        let mut h = Sha1Hasher::new();
        h.update(s);
        h.finish()
    }

    fn hex(s: &str) -> Vec<u8> {
        (0..s.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap())
            .collect()
    }

    #[test]
    fn empty_string() {
        assert_eq!(sha1(b""), hex("da39a3ee5e6b4b0d3255bfef95601890afd80709"));
    }

    #[test]
    fn quick_brown_fox() {
        assert_eq!(
            sha1(b"The quick brown fox jumps over the lazy dog"),
            hex("2fd4e1c67a2d28fced849ee1bb76e7391b93eb12")
        );
    }

    #[test]
    fn spans_multiple_chunks() {
        let input = vec![b'a'; 1000];
        assert_eq!(
            sha1(&input),
            hex("291e9a6c66994949b57ba5e650361e98fc36b1ba")
        );
    }
}
