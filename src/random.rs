//! A small, self-seeding PRNG used only to pick the *extra* length added
//! to CBC padding as a traffic-analysis countermeasure (`protect`'s
//! `random_pad_flag`). This is not a cryptographic RNG and must never be
//! used for key material, IVs, or anything else security-critical —
//! those are supplied by the handshake layer.

pub trait Rng {
    fn generate_bytes(&mut self, output: &mut [u8]);
}

pub trait RngExt: Rng {
    /// Returns a uniform random number in `[min, max)`.
    fn between_u32(&mut self, min: u32, max: u32) -> u32 {
        assert!(max > min);
        let mut buf = [0u8; 4];
        self.generate_bytes(&mut buf);
        let n = u32::from_le_bytes(buf);
        min + (n % (max - min))
    }
}

impl<R: Rng + ?Sized> RngExt for R {}

pub const MT_DEFAULT_SEED: u32 = 5489;

/// MT19937. Not cryptographically secure, but sufficient for choosing an
/// amount of extra padding: the output only needs to be unpredictable to
/// a passive traffic analyzer, and is never treated as a secret by the
/// protocol itself.
pub struct MersenneTwisterRng {
    x: [u32; 624],
    index: usize,
}

impl MersenneTwisterRng {
    pub fn new_seeded(seed: u32) -> Self {
        let mut rng = Self {
            x: [0u32; 624],
            index: 624,
        };
        rng.seed(seed);
        rng
    }

    /// Seeds from the current system clock. Good enough for a
    /// non-adversarial padding-length choice; not suitable for anything
    /// where an adversary gains by predicting the output.
    pub fn from_clock() -> Self {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.subsec_nanos())
            .unwrap_or(MT_DEFAULT_SEED);
        Self::new_seeded(nanos)
    }

    fn seed(&mut self, seed: u32) {
        self.index = 624;
        self.x[0] = seed;
        for i in 1..624 {
            self.x[i] = (self.x[i - 1] ^ (self.x[i - 1] >> 30))
                .wrapping_mul(1812433253)
                .wrapping_add(i as u32);
        }
    }

    fn next_u32(&mut self) -> u32 {
        if self.index >= 624 {
            self.twist();
        }

        let mut y = self.x[self.index];
        y ^= y >> 11;
        y ^= (y << 7) & 0x9D2C5680;
        y ^= (y << 15) & 0xEFC60000;
        y ^= y >> 18;

        self.index += 1;
        y
    }

    fn twist(&mut self) {
        const UPPER_MASK: u32 = 0x80000000;
        const LOWER_MASK: u32 = 0x7fffffff;

        for i in 0..624 {
            let x = (self.x[i] & UPPER_MASK) | (self.x[(i + 1) % 624] & LOWER_MASK);
            let mut x_a = x >> 1;
            if x & 1 != 0 {
                x_a ^= 0x9908B0DF;
            }
            self.x[i] = self.x[(i + 397) % 624] ^ x_a;
        }
        self.index = 0;
    }
}

impl Rng for MersenneTwisterRng {
    fn generate_bytes(&mut self, output: &mut [u8]) {
        let n = output.len() / 4;
        for i in 0..n {
            output[4 * i..4 * i + 4].copy_from_slice(&self.next_u32().to_le_bytes());
        }

        let r = output.len() % 4;
        if r != 0 {
            let v = self.next_u32().to_le_bytes();
            let start = output.len() - r;
            output[start..].copy_from_slice(&v[0..r]);
        }
    }
}
