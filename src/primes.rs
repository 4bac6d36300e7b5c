//! Primality testing sits behind a small trait boundary: the
//! signer/verifier are written against [`PrimeOracle`] instead of a
//! concrete primality-testing crate, so an embedder can plug in
//! whatever `is_prime`/`next_prime` implementation they already trust.

use num_traits::{One, Zero};

use crate::bigint::{mod_floor, mod_pow, Int};
use crate::constants::SMALL_PRIMES;

/// Bases used by the Miller-Rabin test below. This set is a
/// deterministic witness set for every `n` under ~3.3e24 (about 82
/// bits); beyond that it is merely a strong probabilistic test, which
/// is why [`SmallPrimeTable`] is documented as a testing default rather
/// than a production oracle.
const MILLER_RABIN_BASES: [u32; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

/// External collaborator interface for primality testing, matching
/// `is_prime(x, key) -> bool` and
/// `next_prime(x, key, max_gap) -> bigint`.
///
/// `key` is the Fiat-Shamir transcript key, passed through so an
/// implementation may use it as, e.g., a cache namespace or an
/// audit-log correlation id; correctness never requires `key` to
/// influence the primality test itself.
pub trait PrimeOracle {
    fn is_prime(&self, x: &Int, key: &[u8; 32]) -> bool;

    /// Smallest prime in `[x, x + max_gap]`, or `None` if none exists
    /// in that range.
    fn next_prime(&self, x: &Int, key: &[u8; 32], max_gap: u32) -> Option<Int>;

    /// The fixed table of small primes tried by the signer while
    /// searching for a `t` with a square root modulo `N`.
    fn small_primes(&self) -> &[u32];
}

/// A deterministic, dependency-free [`PrimeOracle`]: trial division by
/// [`SMALL_PRIMES`] as a fast filter, then a fixed-base Miller-Rabin
/// test. Good enough to make this crate runnable and testable end to
/// end at the scheme's real parameter sizes (`ell` is a `CHAL_BITS =
/// 128`-bit candidate, far beyond what trial division alone can check
/// in practical time); production embeddings should still swap in a
/// primality test they trust (a vetted Miller-Rabin/Baillie-PSW crate,
/// or one tuned to their own adversarial model).
#[derive(Debug, Default, Clone, Copy)]
pub struct SmallPrimeTable;

impl SmallPrimeTable {
    fn is_probably_prime(x: &Int) -> bool {
        if *x < Int::from(2) {
            return false;
        }
        for &p in SMALL_PRIMES.iter() {
            let p_int = Int::from(p);
            if *x == p_int {
                return true;
            }
            if mod_floor(x, &p_int).is_zero() {
                return false;
            }
        }
        miller_rabin(x)
    }
}

/// Miller-Rabin primality test against [`MILLER_RABIN_BASES`]. Assumes
/// `n` is odd, at least 2, and not divisible by any of [`SMALL_PRIMES`]
/// (guaranteed by the trial-division pass in
/// [`SmallPrimeTable::is_probably_prime`]).
fn miller_rabin(n: &Int) -> bool {
    let n_minus_1 = n - Int::one();
    let mut d = n_minus_1.clone();
    let mut r = 0u32;
    while mod_floor(&d, &Int::from(2)).is_zero() {
        d = div_by_two(&d);
        r += 1;
    }

    'bases: for &a_val in MILLER_RABIN_BASES.iter() {
        let a = Int::from(a_val);
        if a >= *n {
            continue;
        }
        let mut x = mod_pow(&a, &d, n).expect("miller_rabin: n is nonzero by construction");
        if x == Int::one() || x == n_minus_1 {
            continue;
        }
        for _ in 1..r {
            x = mod_pow(&x, &Int::from(2), n).expect("miller_rabin: n is nonzero by construction");
            if x == n_minus_1 {
                continue 'bases;
            }
        }
        return false;
    }
    true
}

fn div_by_two(x: &Int) -> Int {
    crate::bigint::div_floor(x, &Int::from(2))
}

impl PrimeOracle for SmallPrimeTable {
    fn is_prime(&self, x: &Int, _key: &[u8; 32]) -> bool {
        Self::is_probably_prime(x)
    }

    fn next_prime(&self, x: &Int, _key: &[u8; 32], max_gap: u32) -> Option<Int> {
        let mut candidate = x.clone();
        for _ in 0..=max_gap {
            if Self::is_probably_prime(&candidate) {
                return Some(candidate);
            }
            candidate += 1;
        }
        None
    }

    fn small_primes(&self) -> &[u32] {
        &SMALL_PRIMES
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_known_small_primes_and_composites() {
        let oracle = SmallPrimeTable;
        let key = [0u8; 32];
        for &p in &SMALL_PRIMES[..10] {
            assert!(oracle.is_prime(&Int::from(p), &key));
        }
        assert!(!oracle.is_prime(&Int::from(91u32), &key)); // 7*13
    }

    #[test]
    fn next_prime_finds_closest_prime() {
        let oracle = SmallPrimeTable;
        let key = [0u8; 32];
        assert_eq!(
            oracle.next_prime(&Int::from(8u32), &key, 10).unwrap(),
            Int::from(11u32)
        );
    }

    #[test]
    fn rejects_strong_pseudoprime_with_large_prime_factors() {
        // 3,215,031,751 = 151 * 751 * 28351: a known Fermat/strong
        // pseudoprime to bases 2, 3, 5, 7, with factors all above
        // `SMALL_PRIMES`'s largest entry, so it reaches `miller_rabin`
        // rather than being caught by trial division.
        let oracle = SmallPrimeTable;
        let key = [0u8; 32];
        assert!(!oracle.is_prime(&Int::from(3_215_031_751u64), &key));
    }

    #[test]
    fn accepts_a_128_bit_scale_prime_in_practical_time() {
        // 2^127 - 1 (M127) is a well-known Mersenne prime, used here to
        // confirm the oracle resolves a candidate at the scheme's real
        // `CHAL_BITS = 128` scale without relying on trial division
        // alone (which would need ~2^63 divisions here).
        let oracle = SmallPrimeTable;
        let key = [0u8; 32];
        let m127 = (Int::from(1u32) << 127) - Int::from(1u32);
        assert!(oracle.is_prime(&m127, &key));
    }
}
