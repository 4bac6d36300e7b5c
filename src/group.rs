//! The group of unknown order `(Z/N)*/{±1}` and its operations.

use crate::bigint::{bit_length, inverse, mod_floor, Int};
use crate::comb::{self, Comb, CombSpec};
use crate::constants::{CHAL_BITS, MAX_COMB_SIZE};
use crate::error::{GooError, GooResult};
use crate::wnaf;

/// Whether a [`Group`] needs the large prover-side combs or only the
/// small verifier-side one, sized for the challenge width alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupMode {
    Prover,
    VerifyOnly,
}

/// Immutable, process-wide group parameters: the RSA modulus, the two
/// generators, and their precomputed combs.
pub struct Group {
    pub n: Int,
    pub g: u32,
    pub h: u32,
    pub bits: u32,
    pub size: usize,
    pub nh: Int,
    pub rand_bits: u32,
    g_combs: Vec<Comb>,
    h_combs: Vec<Comb>,
}

impl Group {
    pub fn new(n: Int, g: u32, h: u32, mode: GroupMode) -> GooResult<Self> {
        let bits = bit_length(&n);
        let size = ((bits + 7) / 8) as usize;
        let nh = &n >> 1u32;
        let rand_bits = bits - 1;

        let comb_bit_sizes: Vec<u32> = match mode {
            GroupMode::Prover => {
                let worst = std::cmp::max(2 * bits, bits + rand_bits) + CHAL_BITS + 1;
                vec![rand_bits, worst]
            }
            GroupMode::VerifyOnly => vec![CHAL_BITS],
        };

        let mut g_combs = Vec::with_capacity(comb_bit_sizes.len());
        let mut h_combs = Vec::with_capacity(comb_bit_sizes.len());
        for want_bits in comb_bit_sizes {
            let spec: CombSpec = comb::generate(want_bits, MAX_COMB_SIZE)?;
            g_combs.push(Comb::precompute(&Int::from(g), &n, spec.clone()));
            h_combs.push(Comb::precompute(&Int::from(h), &n, spec));
        }

        Ok(Self {
            n,
            g,
            h,
            bits,
            size,
            nh,
            rand_bits,
            g_combs,
            h_combs,
        })
    }

    pub fn mul(&self, a: &Int, b: &Int) -> Int {
        mod_floor(&(a * b), &self.n)
    }

    pub fn sqr(&self, a: &Int) -> Int {
        mod_floor(&(a * a), &self.n)
    }

    pub fn inv(&self, b: &Int) -> GooResult<Int> {
        inverse(b, &self.n)
    }

    /// One inversion serving two elements: `(a^-1, b^-1)`.
    pub fn inv2(&self, a: &Int, b: &Int) -> GooResult<(Int, Int)> {
        let ab = self.mul(a, b);
        let ab_inv = self.inv(&ab)?;
        let a_inv = self.mul(b, &ab_inv);
        let b_inv = self.mul(a, &ab_inv);
        Ok((a_inv, b_inv))
    }

    /// One inversion serving seven elements, via a balanced product tree.
    #[allow(clippy::too_many_arguments)]
    pub fn inv7(
        &self,
        b1: &Int,
        b2: &Int,
        b3: &Int,
        b4: &Int,
        b5: &Int,
        b6: &Int,
        b7: &Int,
    ) -> GooResult<(Int, Int, Int, Int, Int, Int, Int)> {
        let b12 = self.mul(b1, b2);
        let b34 = self.mul(b3, b4);
        let b56 = self.mul(b5, b6);
        let b1234 = self.mul(&b12, &b34);
        let b123456 = self.mul(&b1234, &b56);
        let b1234567 = self.mul(&b123456, b7);

        let top_inv = self.inv(&b1234567)?;

        let b7_inv = self.mul(&top_inv, &b123456);
        let b123456_inv = self.mul(&top_inv, b7);
        let b56_inv = self.mul(&b123456_inv, &b1234);
        let b1234_inv = self.mul(&b123456_inv, &b56);
        let b34_inv = self.mul(&b1234_inv, &b12);
        let b12_inv = self.mul(&b1234_inv, &b34);
        let b1_inv = self.mul(&b12_inv, b2);
        let b2_inv = self.mul(&b12_inv, b1);
        let b3_inv = self.mul(&b34_inv, b4);
        let b4_inv = self.mul(&b34_inv, b3);
        let b5_inv = self.mul(&b56_inv, b6);
        let b6_inv = self.mul(&b56_inv, b5);

        Ok((b1_inv, b2_inv, b3_inv, b4_inv, b5_inv, b6_inv, b7_inv))
    }

    /// Canonical representative of `b`'s class in `(Z/N)*/{±1}`.
    pub fn reduce(&self, b: &Int) -> Int {
        let b = mod_floor(b, &self.n);
        let flipped = &self.n - &b;
        if flipped < b {
            flipped
        } else {
            b
        }
    }

    pub fn is_reduced(&self, b: &Int) -> bool {
        b.sign() != num_bigint::Sign::Minus && *b <= self.nh
    }

    /// Single variable-base exponentiation via windowed NAF.
    pub fn pow(&self, base: &Int, base_inv: &Int, e: &Int) -> GooResult<Int> {
        wnaf::pow(&self.n, base, base_inv, e)
    }

    /// Double variable-base exponentiation via windowed NAF, sharing
    /// squarings across both scans.
    #[allow(clippy::too_many_arguments)]
    pub fn pow2(
        &self,
        b1: &Int,
        b1_inv: &Int,
        e1: &Int,
        b2: &Int,
        b2_inv: &Int,
        e2: &Int,
    ) -> GooResult<Int> {
        wnaf::pow2(&self.n, b1, b1_inv, e1, b2, b2_inv, e2)
    }

    /// Simultaneous `g^e1 * h^e2` via the precomputed fixed-base combs.
    pub fn powgh(&self, e1: &Int, e2: &Int) -> GooResult<Int> {
        if self.g_combs.is_empty() {
            return Err(GooError::Domain("powgh: group has no combs"));
        }
        comb::powgh(&self.n, &self.g_combs, &self.h_combs, e1, e2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_group() -> Group {
        // 0xFFFFFFFB is prime; use it as a stand-in modulus for arithmetic
        // tests that don't need a genuine RSA composite.
        Group::new(Int::from(0xFFFFFFFBu64), 2, 3, GroupMode::VerifyOnly).unwrap()
    }

    #[test]
    fn reduce_is_idempotent_and_canonical() {
        let grp = small_group();
        for v in [0u64, 1, 2, 1000, 0xFFFFFFFA] {
            let b = Int::from(v);
            let r = grp.reduce(&b);
            assert!(grp.is_reduced(&r));
            assert_eq!(grp.reduce(&r), r);
        }
    }

    #[test]
    fn inv2_matches_individual_inverses() {
        let grp = small_group();
        let a = Int::from(7u32);
        let b = Int::from(11u32);
        let (a_inv, b_inv) = grp.inv2(&a, &b).unwrap();
        assert_eq!(a_inv, grp.inv(&a).unwrap());
        assert_eq!(b_inv, grp.inv(&b).unwrap());
    }

    #[test]
    fn inv7_matches_individual_inverses() {
        let grp = small_group();
        let vals: Vec<Int> = (2u32..9).map(Int::from).collect();
        let (i1, i2, i3, i4, i5, i6, i7) = grp
            .inv7(&vals[0], &vals[1], &vals[2], &vals[3], &vals[4], &vals[5], &vals[6])
            .unwrap();
        let got = [i1, i2, i3, i4, i5, i6, i7];
        for (v, got_inv) in vals.iter().zip(got.iter()) {
            assert_eq!(*got_inv, grp.inv(v).unwrap());
        }
    }

    #[test]
    fn powgh_agrees_with_pow2_for_small_exponents() {
        let grp = Group::new(Int::from(0xFFFFFFFBu64), 2, 3, GroupMode::VerifyOnly).unwrap();
        let e1 = Int::from(123u32);
        let e2 = Int::from(456u32);
        let got = grp.powgh(&e1, &e2).unwrap();

        let g_inv = grp.inv(&Int::from(2)).unwrap();
        let h_inv = grp.inv(&Int::from(3)).unwrap();
        let want = grp
            .pow2(&Int::from(2), &g_inv, &e1, &Int::from(3), &h_inv, &e2)
            .unwrap();
        assert_eq!(got, want);
    }
}
