//! RC4, the stream cipher historically paired with MD5/SHA-1 MACs in the
//! `TLS_RSA_WITH_RC4_128_*` suites. Kept for interoperability with the
//! legacy peers this engine's wire format targets; callers negotiating
//! fresh connections should prefer a block cipher suite.

use crate::cipher::StreamCipher;

pub struct Rc4 {
    s: [u8; 256],
    i: u8,
    j: u8,
}

impl Rc4 {
    pub fn new(key: &[u8]) -> Self {
        let mut s = [0u8; 256];
        for (i, v) in s.iter_mut().enumerate() {
            *v = i as u8;
        }

        let mut j: u8 = 0;
        for i in 0..256 {
            j = j
                .wrapping_add(s[i])
                .wrapping_add(key[i % key.len()]);
            s.swap(i, j as usize);
        }

        Self { s, i: 0, j: 0 }
    }

    /// Zeroizes the permutation state array.
    pub fn zeroize(&mut self) {
        crate::utils::zeroize(&mut self.s);
        self.i = 0;
        self.j = 0;
    }

    fn next_byte(&mut self) -> u8 {
        self.i = self.i.wrapping_add(1);
        self.j = self.j.wrapping_add(self.s[self.i as usize]);
        self.s.swap(self.i as usize, self.j as usize);
        let k = self.s[self.i as usize].wrapping_add(self.s[self.j as usize]);
        self.s[k as usize]
    }
}

impl StreamCipher for Rc4 {
    fn apply_keystream(&mut self, buf: &mut [u8]) {
        for b in buf.iter_mut() {
            *b ^= self.next_byte();
        }
    }
}
