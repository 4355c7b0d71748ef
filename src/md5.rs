//! MD5 (RFC 1321). Retained for SSL 3.0 MAC compatibility and the
//! historical TLS 1.0 cipher suites that pair it with RC4/3DES; not
//! recommended for anything new.

use arrayref::{array_mut_ref, array_ref};

use crate::hasher::Hasher;

const CHUNK_SIZE: usize = 64;

/// Per-round shift amounts.
const SHIFTS: [u8; 64] = [
    7, 12, 17, 22, 7, 12, 17, 22, 7, 12, 17, 22, 7, 12, 17, 22, 5, 9, 14, 20, 5, 9, 14, 20, 5, 9,
    14, 20, 5, 9, 14, 20, 4, 11, 16, 23, 4, 11, 16, 23, 4, 11, 16, 23, 4, 11, 16, 23, 6, 10, 15,
    21, 6, 10, 15, 21, 6, 10, 15, 21, 6, 10, 15, 21,
];

/// Constants from sines of integer indices: `K[i] = floor(2^32 * abs(sin(i + 1)))`.
const K_SINES: [u32; 64] = [
    0xd76aa478, 0xe8c7b756, 0x242070db, 0xc1bdceee, 0xf57c0faf, 0x4787c62a, 0xa8304613, 0xfd469501,
    0x698098d8, 0x8b44f7af, 0xffff5bb1, 0x895cd7be, 0x6b901122, 0xfd987193, 0xa679438e, 0x49b40821,
    0xf61e2562, 0xc040b340, 0x265e5a51, 0xe9b6c7aa, 0xd62f105d, 0x02441453, 0xd8a1e681, 0xe7d3fbc8,
    0x21e1cde6, 0xc33707d6, 0xf4d50d87, 0x455a14ed, 0xa9e3e905, 0xfcefa3f8, 0x676f02d9, 0x8d2a4c8a,
    0xfffa3942, 0x8771f681, 0x6d9d6122, 0xfde5380c, 0xa4beea44, 0x4bdecfa9, 0xf6bb4b60, 0xbebfbc70,
    0x289b7ec6, 0xeaa127fa, 0xd4ef3085, 0x04881d05, 0xd9d4d039, 0xe6db99e5, 0x1fa27cf8, 0xc4ac5665,
    0xf4292244, 0x432aff97, 0xab9423a7, 0xfc93a039, 0x655b59c3, 0x8f0ccc92, 0xffeff47d, 0x85845dd1,
    0x6fa87e4f, 0xfe2ce6e0, 0xa3014314, 0x4e0811a1, 0xf7537e82, 0xbd3af235, 0x2ad7d2bb, 0xeb86d391,
];

const A0: u32 = 0x67452301;
const B0: u32 = 0xefcdab89;
const C0: u32 = 0x98badcfe;
const D0: u32 = 0x10325476;

#[derive(Clone)]
pub struct Md5Hasher {
    hash: [u32; 4],
    /// Total number of *bytes* seen so far.
    length: usize,
    pending_chunk: [u8; CHUNK_SIZE],
}

impl Md5Hasher {
    pub fn new() -> Self {
        Self::default()
    }

    fn update_chunk(hash: &mut [u32; 4], data: &[u8; CHUNK_SIZE]) {
        let mut m = [0u32; 16];
        for i in 0..16 {
            m[i] = u32::from_le_bytes(*array_ref![data, 4 * i, 4]);
        }

        let mut a = hash[0];
        let mut b = hash[1];
        let mut c = hash[2];
        let mut d = hash[3];

        for i in 0..64 {
            let (mut f, g) = match i {
                0..=15 => ((b & c) | ((!b) & d), i),
                16..=31 => ((d & b) | ((!d) & c), (5 * i + 1) % 16),
                32..=47 => (b ^ c ^ d, (3 * i + 5) % 16),
                /* 48..=63 */ _ => (c ^ (b | (!d)), (7 * i) % 16),
            };

            f = f
                .wrapping_add(a)
                .wrapping_add(K_SINES[i])
                .wrapping_add(m[g]);
            a = d;
            d = c;
            c = b;
            b = b.wrapping_add(f.rotate_left(SHIFTS[i] as u32));
        }

        hash[0] = hash[0].wrapping_add(a);
        hash[1] = hash[1].wrapping_add(b);
        hash[2] = hash[2].wrapping_add(c);
        hash[3] = hash[3].wrapping_add(d);
    }
}

impl Default for Md5Hasher {
    fn default() -> Self {
        Self {
            hash: [A0, B0, C0, D0],
            length: 0,
            pending_chunk: [0u8; CHUNK_SIZE],
        }
    }
}

impl Hasher for Md5Hasher {
    fn block_size(&self) -> usize {
        CHUNK_SIZE
    }

    fn output_size(&self) -> usize {
        16
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
        let message_length_bits = (8 * self.length) as u64;

        // Need room for the '1' bit plus the 64-bit length, then pad up to
        // the next chunk boundary.
        let mut padded_len = self.length + (1 + 8);
        let rem = padded_len % CHUNK_SIZE;
        if rem != 0 {
            padded_len += CHUNK_SIZE - rem;
        }
        let num_extra = padded_len - self.length;

        let mut buf = [0u8; CHUNK_SIZE + 9];
        buf[0] = 0x80;
        *array_mut_ref![buf, num_extra - 8, 8] = message_length_bits.to_le_bytes();

        let mut h = self.clone();
        h.update(&buf[0..num_extra]);
        debug_assert_eq!(h.length % CHUNK_SIZE, 0);

        let mut out = [0u8; 16];
        *array_mut_ref![out, 0, 4] = h.hash[0].to_le_bytes();
        *array_mut_ref![out, 4, 4] = h.hash[1].to_le_bytes();
        *array_mut_ref![out, 8, 4] = h.hash[2].to_le_bytes();
        *array_mut_ref![out, 12, 4] = h.hash[3].to_le_bytes();
        out.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn md5(s: &[u8]) -> Vec<u8> {
        let mut h = Md5Hasher::new();
        h.update(s);
        h.finish()
    }

    #[test]
    fn empty_string() {
        assert_eq!(
            md5(b""),
            hex::decode("d41d8cd98f00b204e9800998ecf8427e")
        );
    }

    #[test]
    fn quick_brown_fox() {
        assert_eq!(
            md5(b"The quick brown fox jumps over the lazy dog"),
            hex::decode("9e107d9d372bb6826bd81d3542a419d6")
        );
    }

    #[test]
    fn long_input_spans_multiple_chunks() {
        let input = vec![b'a'; 1000];
        assert_eq!(
            md5(&input),
            hex::decode("cabe45dcc9ae5b66ba86600cca6b8ba8")
        );
    }

    pub(crate) mod hex {
        pub fn decode(s: &str) -> Vec<u8> {
            (0..s.len())
                .step_by(2)
                .map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap())
                .collect()
        }
    }
}
