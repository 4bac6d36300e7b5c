//! ZKPoK verification. Never panics; any exception or
//! range violation is folded into `false`.

use num_traits::Signed;

use crate::bigint::{bit_length, Int};
use crate::constants::{CHAL_BITS, ELLDIFF_MAX};
use crate::error::GooError;
use crate::group::Group;
use crate::primes::PrimeOracle;
use crate::signature::Signature;
use crate::transcript::{fs_chal, TranscriptInputs};

fn verify_inner(
    group: &Group,
    oracle: &dyn PrimeOracle,
    msg: &[u8],
    sig: &Signature,
    c1: &Int,
) -> Result<bool, GooError> {
    for scalar in [
        &sig.chal, &sig.ell, &sig.z_w, &sig.z_w2, &sig.z_s1, &sig.z_a, &sig.z_an, &sig.z_s1w,
        &sig.z_sa, &sig.z_s2,
    ] {
        if scalar.is_negative() {
            return Ok(false);
        }
    }
    if sig.eq.is_negative() {
        return Ok(false);
    }
    if bit_length(&sig.ell) > CHAL_BITS {
        return Ok(false);
    }

    if !oracle.small_primes().contains(&sig.t) {
        return Ok(false);
    }

    for elem in [c1, &sig.c2, &sig.c3, &sig.aq, &sig.bq, &sig.cq, &sig.dq] {
        if !group.is_reduced(elem) {
            return Ok(false);
        }
    }

    let (c1_inv, c2_inv, c3_inv, aq_inv, bq_inv, cq_inv, dq_inv) =
        group.inv7(c1, &sig.c2, &sig.c3, &sig.aq, &sig.bq, &sig.cq, &sig.dq)?;

    let a = group.reduce(&group.mul(
        &group.pow(&sig.aq, &aq_inv, &sig.ell)?,
        &group.mul(
            &group.pow(&c2_inv, &sig.c2, &sig.chal)?,
            &group.powgh(&sig.z_w, &sig.z_s1)?,
        ),
    ));
    let b = group.reduce(&group.mul(
        &group.pow(&sig.bq, &bq_inv, &sig.ell)?,
        &group.mul(
            &group.pow(&c3_inv, &sig.c3, &sig.chal)?,
            &group.powgh(&sig.z_a, &sig.z_s2)?,
        ),
    ));
    let c = group.reduce(&group.mul(
        &group.pow(&sig.cq, &cq_inv, &sig.ell)?,
        &group.mul(
            &group.pow(&c2_inv, &sig.c2, &sig.z_w)?,
            &group.powgh(&sig.z_w2, &sig.z_s1w)?,
        ),
    ));
    let d = group.reduce(&group.mul(
        &group.pow(&sig.dq, &dq_inv, &sig.ell)?,
        &group.mul(
            &group.pow(&c1_inv, c1, &sig.z_a)?,
            &group.powgh(&sig.z_an, &sig.z_sa)?,
        ),
    ));

    let t_int = Int::from(sig.t);
    let delta = &sig.z_w2 - &sig.z_an;
    let mut e = &sig.eq * &sig.ell + &delta - &t_int * &sig.chal;
    if delta.is_negative() {
        e += &sig.ell;
    }
    if e.is_negative() {
        return Ok(false);
    }

    let inputs = TranscriptInputs {
        n: &group.n,
        g: group.g,
        h: group.h,
        mod_bytes: group.size,
        c1,
        c2: &sig.c2,
        c3: &sig.c3,
        t: &t_int,
        a: &a,
        b: &b,
        c: &c,
        d: &d,
        e: &e,
        msg,
    };
    let (chal_prime, ell_r_prime, key) = fs_chal(oracle, &inputs, true)?;

    if chal_prime != sig.chal {
        return Ok(false);
    }
    let ell_diff = &sig.ell - &ell_r_prime;
    if ell_diff.is_negative() || ell_diff > Int::from(ELLDIFF_MAX) {
        return Ok(false);
    }
    if !oracle.is_prime(&sig.ell, &key) {
        return Ok(false);
    }

    Ok(true)
}

/// Verify `sig` against `msg` and the committed modulus `c1`. Never
/// panics: any internal error or range violation reads as a rejected
/// signature.
pub fn verify(group: &Group, oracle: &dyn PrimeOracle, msg: &[u8], sig: &Signature, c1: &Int) -> bool {
    match verify_inner(group, oracle, msg, sig, c1) {
        Ok(ok) => ok,
        Err(err) => {
            tracing::warn!(?err, "signature rejected");
            false
        }
    }
}
