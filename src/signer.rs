//! ZKPoK signing: witness discovery, first-move
//! commitments, Fiat-Shamir challenge, and quotient responses.

use num_traits::{Signed, ToPrimitive};
use rand::RngCore;
use zeroize::Zeroize;

use crate::bigint::{bit_length, div_floor, inverse, mod_floor, Int};
use crate::constants::{ELL_RETRY_LIMIT, EXPONENT_SIZE, MAX_RSA_BITS, MIN_RSA_BITS};
use crate::error::{GooError, GooResult};
use crate::group::Group;
use crate::prng::{draw_bits_from, KeyedRng};
use crate::primes::PrimeOracle;
use crate::signature::Signature;
use crate::transcript::{fs_chal, TranscriptInputs};

/// PRNG-expand a 32-byte seed into an `EXPONENT_SIZE`-bit scalar.
pub fn expand_sprime(s_prime: &[u8; 32]) -> Int {
    KeyedRng::from_key(s_prime).draw_bits(EXPONENT_SIZE)
}

/// Modular square root of `t` modulo `N = p*q`, combined via CRT from
/// the per-prime-factor roots. `None` if `t` is a non-residue modulo
/// either factor.
fn mod_sqrt_n(t: &Int, p: &Int, q: &Int, n: &Int) -> Option<Int> {
    let wp = crate::bigint::mod_sqrt(t, p).ok()?;
    let wq = crate::bigint::mod_sqrt(t, q).ok()?;

    // CRT: find w with w ≡ wp (mod p), w ≡ wq (mod q).
    let q_inv_mod_p = inverse(q, p).ok()?;
    let diff = mod_floor(&(&wp - &wq), p);
    let k = mod_floor(&(&diff * &q_inv_mod_p), p);
    let w = mod_floor(&(&wq + &(q * &k)), n);
    Some(w)
}

/// Transient prover secrets. Cleared best-effort on drop; `BigInt`
/// doesn't implement `Zeroize` so this can't guarantee the heap bytes
/// are wiped, but it keeps the values from lingering in the struct
/// past the point they're needed.
struct Witness {
    w: Int,
    a: Int,
    s: Int,
    s1: Int,
    s2: Int,
    r_w: Int,
    r_w2: Int,
    r_a: Int,
    r_an: Int,
    r_s1w: Int,
    r_sa: Int,
    r_s2: Int,
    r_s1: Int,
}

impl Drop for Witness {
    fn drop(&mut self) {
        for x in [
            &mut self.w,
            &mut self.a,
            &mut self.s,
            &mut self.s1,
            &mut self.s2,
            &mut self.r_w,
            &mut self.r_w2,
            &mut self.r_a,
            &mut self.r_an,
            &mut self.r_s1w,
            &mut self.r_sa,
            &mut self.r_s2,
            &mut self.r_s1,
        ] {
            *x = Int::from(0);
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub fn sign(
    group: &Group,
    oracle: &dyn PrimeOracle,
    rng: &mut dyn RngCore,
    msg: &[u8],
    mut s_prime: [u8; 32],
    p: &Int,
    q: &Int,
) -> GooResult<Signature> {
    let n = p * q;
    if n != group.n {
        s_prime.zeroize();
        return Err(GooError::Domain("sign: p*q does not match group modulus"));
    }
    let n_bits = bit_length(&n);
    if n_bits < MIN_RSA_BITS || n_bits > MAX_RSA_BITS {
        s_prime.zeroize();
        return Err(GooError::Domain("sign: modulus bit length out of range"));
    }

    let s = expand_sprime(&s_prime);
    s_prime.zeroize();

    let c1 = group.reduce(&group.powgh(&n, &s)?);

    let mut found = None;
    for &t in oracle.small_primes() {
        let t_int = Int::from(t);
        if let Some(w) = mod_sqrt_n(&t_int, p, q, &n) {
            found = Some((t_int, w));
            break;
        }
    }
    let (t, w) = found.ok_or(GooError::NoQR)?;

    let w_sq = &w * &w;
    let diff = &w_sq - &t;
    let a = div_floor(&diff, &n);
    if &a * &n != diff {
        return Err(GooError::Domain("sign: witness square root is not exact"));
    }

    let s1 = draw_bits_from(rng, EXPONENT_SIZE);
    let s2 = draw_bits_from(rng, EXPONENT_SIZE);
    let c2 = group.reduce(&group.powgh(&w, &s1)?);
    let c3 = group.reduce(&group.powgh(&a, &s2)?);

    let (c1_inv, c2_inv) = group.inv2(&c1, &c2)?;

    let r_w = draw_bits_from(rng, EXPONENT_SIZE);
    let mut r_w2 = draw_bits_from(rng, EXPONENT_SIZE);
    let r_a = draw_bits_from(rng, EXPONENT_SIZE);
    let mut r_an = draw_bits_from(rng, EXPONENT_SIZE);
    let r_s1w = draw_bits_from(rng, EXPONENT_SIZE);
    let r_sa = draw_bits_from(rng, EXPONENT_SIZE);
    let r_s2 = draw_bits_from(rng, EXPONENT_SIZE);

    if r_w2 < r_an {
        std::mem::swap(&mut r_w2, &mut r_an);
    }
    let e_val = &r_w2 - &r_an;

    let mut wit = Witness {
        w,
        a,
        s,
        s1,
        s2,
        r_w,
        r_w2,
        r_a,
        r_an,
        r_s1w,
        r_sa,
        r_s2,
        r_s1: Int::from(0),
    };

    let b_msg = group.reduce(&group.powgh(&wit.r_a, &wit.r_s2)?);
    let c_msg = group.reduce(&group.mul(
        &group.pow(&c2_inv, &c2, &wit.r_w)?,
        &group.powgh(&wit.r_w2, &wit.r_s1w)?,
    ));
    let d_msg = group.reduce(&group.mul(
        &group.pow(&c1_inv, &c1, &wit.r_a)?,
        &group.powgh(&wit.r_an, &wit.r_sa)?,
    ));

    let mod_bytes = group.size;
    let mut attempt = 0u32;
    let (chal, ell, _a_msg) = loop {
        if attempt >= ELL_RETRY_LIMIT {
            return Err(GooError::Overflow);
        }
        wit.r_s1 = draw_bits_from(rng, EXPONENT_SIZE);
        let a_msg = group.reduce(&group.powgh(&wit.r_w, &wit.r_s1)?);

        let inputs = TranscriptInputs {
            n: &group.n,
            g: group.g,
            h: group.h,
            mod_bytes,
            c1: &c1,
            c2: &c2,
            c3: &c3,
            t: &t,
            a: &a_msg,
            b: &b_msg,
            c: &c_msg,
            d: &d_msg,
            e: &e_val,
            msg,
        };
        let (chal, ell, _key) = fs_chal(oracle, &inputs, false)?;
        attempt += 1;
        if bit_length(&ell) == crate::constants::CHAL_BITS {
            break (chal, ell, a_msg);
        }
    };

    let z_w = &chal * &wit.w + &wit.r_w;
    let z_w2 = &chal * &wit.w * &wit.w + &wit.r_w2;
    let z_s1 = &chal * &wit.s1 + &wit.r_s1;
    let z_a = &chal * &wit.a + &wit.r_a;
    let z_an = &chal * &wit.a * &n + &wit.r_an;
    let z_s1w = &chal * &wit.s1 * &wit.w + &wit.r_s1w;
    let z_sa = &chal * &wit.s * &wit.a + &wit.r_sa;
    let z_s2 = &chal * &wit.s2 + &wit.r_s2;

    let aq = group.reduce(&group.powgh(&div_floor(&z_w, &ell), &div_floor(&z_s1, &ell))?);
    let bq = group.reduce(&group.powgh(&div_floor(&z_a, &ell), &div_floor(&z_s2, &ell))?);
    let cq = group.reduce(&group.mul(
        &group.pow(&c2_inv, &c2, &div_floor(&z_w, &ell))?,
        &group.powgh(&div_floor(&z_w2, &ell), &div_floor(&z_s1w, &ell))?,
    ));
    let dq = group.reduce(&group.mul(
        &group.pow(&c1_inv, &c1, &div_floor(&z_a, &ell))?,
        &group.powgh(&div_floor(&z_an, &ell), &div_floor(&z_sa, &ell))?,
    ));

    let eq_delta = &z_w2 - &z_an;
    let eq = div_floor(&eq_delta, &ell);
    if eq.is_negative() || bit_length(&eq) > EXPONENT_SIZE {
        return Err(GooError::Overflow);
    }

    let sig = Signature {
        c2,
        c3,
        t: t.to_u32().ok_or(GooError::Overflow)?,
        chal,
        ell: ell.clone(),
        aq,
        bq,
        cq,
        dq,
        eq,
        z_w: mod_floor(&z_w, &ell),
        z_w2: mod_floor(&z_w2, &ell),
        z_s1: mod_floor(&z_s1, &ell),
        z_a: mod_floor(&z_a, &ell),
        z_an: mod_floor(&z_an, &ell),
        z_s1w: mod_floor(&z_s1w, &ell),
        z_sa: mod_floor(&z_sa, &ell),
        z_s2: mod_floor(&z_s2, &ell),
    };

    tracing::debug!(ell_bits = bit_length(&sig.ell), attempts = attempt, "signature produced");

    Ok(sig)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_sprime_is_deterministic() {
        let seed = [9u8; 32];
        assert_eq!(expand_sprime(&seed), expand_sprime(&seed));
        assert!(bit_length(&expand_sprime(&seed)) <= EXPONENT_SIZE);
    }

    #[test]
    fn mod_sqrt_n_matches_square() {
        let p = Int::from(11u32);
        let q = Int::from(23u32);
        let n = &p * &q;
        let t = Int::from(4u32); // a perfect square, trivially a QR mod both
        let w = mod_sqrt_n(&t, &p, &q, &n).unwrap();
        assert_eq!(mod_floor(&(&w * &w - &t), &n), Int::from(0));
    }
}
