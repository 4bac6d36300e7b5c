//! Deterministic expansion of a 32-byte hash digest into uniform
//! bit-strings, used both to derive `s = expand_sprime(s')` and to draw
//! `chal`/`ell` from a Fiat-Shamir transcript key. A digest seeds a
//! `ChaCha20Rng`, and callers draw as many bits as they need.

use num_bigint::Sign;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::bigint::Int;

pub struct KeyedRng(ChaCha20Rng);

impl KeyedRng {
    pub fn from_key(key: &[u8; 32]) -> Self {
        Self(ChaCha20Rng::from_seed(*key))
    }

    /// Draw a uniform integer in `[0, 2^bits)`.
    pub fn draw_bits(&mut self, bits: u32) -> Int {
        draw_bits_from(&mut self.0, bits)
    }
}

/// Draw a uniform integer in `[0, 2^bits)` from any byte-filling RNG.
/// Shared by the transcript's keyed expansion and the signer's
/// first-move nonce draws.
pub fn draw_bits_from(rng: &mut dyn RngCore, bits: u32) -> Int {
    let nbytes = ((bits + 7) / 8) as usize;
    let mut buf = vec![0u8; nbytes.max(1)];
    rng.fill_bytes(&mut buf);

    let total_bits = nbytes as u32 * 8;
    let extra = total_bits.saturating_sub(bits);
    if extra > 0 {
        buf[0] &= 0xffu8 >> extra;
    }

    Int::from_bytes_be(Sign::Plus, &buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_bits_is_bounded_and_deterministic() {
        let key = [7u8; 32];
        let mut r1 = KeyedRng::from_key(&key);
        let mut r2 = KeyedRng::from_key(&key);
        let a = r1.draw_bits(130);
        let b = r2.draw_bits(130);
        assert_eq!(a, b);
        assert!(a < (Int::from(1) << 130));
    }
}
