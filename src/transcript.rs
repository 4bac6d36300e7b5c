//! Canonical Fiat-Shamir transcript assembly.
//!
//! The byte layout is fixed-width end to end so the prover and verifier
//! always hash exactly the same bytes for the same logical values: every
//! field is left-padded to a declared width before it goes into `Sha256`,
//! rather than relying on a variable-length encoding that could make two
//! different field sequences hash identically.

use num_traits::{Signed, ToPrimitive};
use sha2::{Digest, Sha256};

use crate::bigint::Int;
use crate::constants::{CHAL_BITS, ELLDIFF_MAX, EXPONENT_SIZE, HASH_PREFIX, MSG_PAD_BYTES};
use crate::error::{GooError, GooResult};
use crate::prng::KeyedRng;
use crate::primes::PrimeOracle;

fn be_bytes_padded(x: &Int, width: usize) -> GooResult<Vec<u8>> {
    if x.is_negative() {
        return Err(GooError::Domain("transcript: negative scalar"));
    }
    let bytes = x.to_bytes_be().1;
    if bytes.len() > width {
        return Err(GooError::Overflow);
    }
    let mut out = vec![0u8; width - bytes.len()];
    out.extend_from_slice(&bytes);
    Ok(out)
}

fn msg_padded(msg: &[u8]) -> GooResult<[u8; MSG_PAD_BYTES]> {
    if msg.len() > MSG_PAD_BYTES {
        return Err(GooError::Domain("transcript: msg exceeds 64 bytes"));
    }
    let mut out = [0u8; MSG_PAD_BYTES];
    out[MSG_PAD_BYTES - msg.len()..].copy_from_slice(msg);
    Ok(out)
}

/// All the values absorbed into a single Fiat-Shamir transcript.
pub struct TranscriptInputs<'a> {
    pub n: &'a Int,
    pub g: u32,
    pub h: u32,
    pub mod_bytes: usize,
    pub c1: &'a Int,
    pub c2: &'a Int,
    pub c3: &'a Int,
    pub t: &'a Int,
    pub a: &'a Int,
    pub b: &'a Int,
    pub c: &'a Int,
    pub d: &'a Int,
    pub e: &'a Int,
    pub msg: &'a [u8],
}

/// Derive `(chal, ell, key)` from the transcript. `verify = false` is the
/// prover's path (`ell` is advanced to the next prime); `verify = true`
/// is the verifier's path (`ell` is taken as-is and checked separately).
pub fn fs_chal(
    oracle: &dyn PrimeOracle,
    inputs: &TranscriptInputs,
    verify: bool,
) -> GooResult<(Int, Int, [u8; 32])> {
    let mut transcript = Vec::new();
    transcript.extend_from_slice(&HASH_PREFIX);
    transcript.extend_from_slice(&be_bytes_padded(inputs.n, inputs.mod_bytes)?);
    transcript.extend_from_slice(&inputs.g.to_be_bytes());
    transcript.extend_from_slice(&inputs.h.to_be_bytes());

    for elem in [
        inputs.c1, inputs.c2, inputs.c3, inputs.a, inputs.b, inputs.c, inputs.d,
    ] {
        transcript.extend_from_slice(&be_bytes_padded(elem, inputs.mod_bytes)?);
    }

    let t_u32 = inputs
        .t
        .to_u32()
        .ok_or(GooError::Domain("transcript: t does not fit in 4 bytes"))?;
    transcript.extend_from_slice(&t_u32.to_be_bytes());

    let e_width = ((EXPONENT_SIZE + 7) / 8) as usize;
    transcript.extend_from_slice(&be_bytes_padded(inputs.e, e_width)?);

    transcript.extend_from_slice(&msg_padded(inputs.msg)?);

    let key: [u8; 32] = Sha256::digest(&transcript).into();

    let mut rng = KeyedRng::from_key(&key);
    let chal = rng.draw_bits(CHAL_BITS);
    let ell_r = rng.draw_bits(CHAL_BITS);

    let ell = if verify {
        ell_r
    } else {
        oracle
            .next_prime(&ell_r, &key, ELLDIFF_MAX)
            .ok_or(GooError::Overflow)?
    };

    Ok((chal, ell, key))
}
