//! Zero-knowledge proof of RSA-modulus factorization over a group of
//! unknown order (a "Goo" proof): a prover commits to an RSA modulus
//! `n`, then produces non-interactive proofs of knowledge of its
//! factorization, bound to an arbitrary message via Fiat-Shamir.
//!
//! The group-arithmetic and proof engine lives in [`group`], [`comb`],
//! [`wnaf`], [`signer`], and [`verifier`]; [`bigint`] carries the
//! floor-division-consistent integer primitives everything else is
//! built on. Primality testing is an external collaborator boundary —
//! see [`primes::PrimeOracle`].

pub mod bigint;
pub mod comb;
pub mod constants;
pub mod error;
pub mod group;
pub mod primes;
pub mod prng;
pub mod signature;
pub mod signer;
pub mod transcript;
pub mod verifier;
pub mod wnaf;

use num_bigint::Sign;
use rand::RngCore;

use bigint::Int;
use error::{GooError, GooResult};
use group::{Group, GroupMode};
use primes::{PrimeOracle, SmallPrimeTable};
use signature::Signature;

/// A constructed group instance bound to a particular `PrimeOracle`,
/// exposing the public surface described for this scheme: generating
/// seeds, committing to a modulus, and signing/verifying proofs.
pub struct Goo {
    group: Group,
    oracle: Box<dyn PrimeOracle + Send + Sync>,
}

impl Goo {
    /// Construct a group over the RSA modulus given by its big-endian
    /// byte encoding. `mode` selects how large a comb table to build:
    /// [`GroupMode::Prover`] for a group that will sign, or
    /// [`GroupMode::VerifyOnly`] for one that will only verify.
    pub fn new(n_bytes: &[u8], g: u32, h: u32, mode: GroupMode) -> GooResult<Self> {
        let n = Int::from_bytes_be(Sign::Plus, n_bytes);
        let group = Group::new(n, g, h, mode)?;
        Ok(Self {
            group,
            oracle: Box::new(SmallPrimeTable),
        })
    }

    /// Construct a group with a caller-supplied primality oracle,
    /// replacing the trial-division default.
    pub fn with_oracle(
        n_bytes: &[u8],
        g: u32,
        h: u32,
        mode: GroupMode,
        oracle: Box<dyn PrimeOracle + Send + Sync>,
    ) -> GooResult<Self> {
        let n = Int::from_bytes_be(Sign::Plus, n_bytes);
        let group = Group::new(n, g, h, mode)?;
        Ok(Self { group, oracle })
    }

    /// Draw a fresh random 32-byte seed `s'`.
    pub fn generate(&self, rng: &mut dyn RngCore) -> [u8; 32] {
        let mut seed = [0u8; 32];
        rng.fill_bytes(&mut seed);
        seed
    }

    fn commitment(&self, s_prime: &[u8; 32], p: &Int, q: &Int) -> GooResult<Int> {
        let n = p * q;
        if n != self.group.n {
            return Err(GooError::Domain("challenge: p*q does not match group modulus"));
        }
        let s = signer::expand_sprime(s_prime);
        Ok(self.group.reduce(&self.group.powgh(&self.group.n, &s)?))
    }

    /// Compute the `C1` commitment to `(s', p, q)`, big-endian encoded
    /// to the group's element width.
    pub fn challenge(&self, s_prime: &[u8; 32], p: &Int, q: &Int) -> GooResult<Vec<u8>> {
        let c1 = self.commitment(s_prime, p, q)?;
        Ok(pad_be(&c1, self.group.size))
    }

    /// Check that `c1_bytes` is exactly the commitment `challenge`
    /// would produce for `(s', p, q)`.
    pub fn validate(&self, s_prime: &[u8; 32], c1_bytes: &[u8], p: &Int, q: &Int) -> bool {
        match self.challenge(s_prime, p, q) {
            Ok(bytes) => bytes == c1_bytes,
            Err(_) => false,
        }
    }

    /// Produce a serialized signature proving knowledge of `(p, q)`
    /// factoring the group's modulus, bound to `msg`.
    pub fn sign(
        &self,
        rng: &mut dyn RngCore,
        msg: &[u8],
        s_prime: [u8; 32],
        p: &Int,
        q: &Int,
    ) -> GooResult<Vec<u8>> {
        let sig = signer::sign(&self.group, self.oracle.as_ref(), rng, msg, s_prime, p, q)?;
        sig.to_bytes(self.group.size)
    }

    /// Verify a serialized signature against `msg` and a previously
    /// published commitment `c1_bytes`. Never panics; malformed input
    /// is rejected rather than propagated as an error.
    pub fn verify(&self, msg: &[u8], sig_bytes: &[u8], c1_bytes: &[u8]) -> bool {
        let c1 = Int::from_bytes_be(Sign::Plus, c1_bytes);
        let sig = match Signature::from_bytes(sig_bytes, self.group.size) {
            Ok(sig) => sig,
            Err(_) => return false,
        };
        verifier::verify(&self.group, self.oracle.as_ref(), msg, &sig, &c1)
    }
}

fn pad_be(x: &Int, width: usize) -> Vec<u8> {
    let bytes = x.to_bytes_be().1;
    let mut out = vec![0u8; width.saturating_sub(bytes.len())];
    out.extend_from_slice(&bytes);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn sign_then_verify_round_trip() {
        let p = (Int::from(1u32) << 521) - Int::from(1u32);
        let q = (Int::from(1u32) << 607) - Int::from(1u32);
        let n = &p * &q;
        let n_bytes = n.to_bytes_be().1;

        let goo = Goo::new(&n_bytes, 2, 3, GroupMode::Prover).unwrap();
        let mut rng = ChaCha20Rng::from_seed([11u8; 32]);
        let seed = goo.generate(&mut rng);

        let c1_bytes = goo.challenge(&seed, &p, &q).unwrap();
        assert!(goo.validate(&seed, &c1_bytes, &p, &q));

        let sig_bytes = goo.sign(&mut rng, b"S1", seed, &p, &q).unwrap();
        assert!(goo.verify(b"S1", &sig_bytes, &c1_bytes));
        assert!(!goo.verify(b"S2", &sig_bytes, &c1_bytes));

        let mut tampered = sig_bytes.clone();
        *tampered.last_mut().unwrap() ^= 0xff;
        assert!(!goo.verify(b"S1", &tampered, &c1_bytes));
    }

    #[test]
    fn rejects_mismatched_modulus() {
        let p = Int::from(11u32);
        let q = Int::from(23u32);
        let n = &p * &q;
        let n_bytes = n.to_bytes_be().1;
        let goo = Goo::new(&n_bytes, 2, 3, GroupMode::VerifyOnly).unwrap();

        let other_p = Int::from(13u32);
        let seed = [0u8; 32];
        assert!(goo.challenge(&seed, &other_p, &q).is_err());
    }
}
