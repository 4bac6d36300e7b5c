//! Signature record and its wire format.

use num_traits::Signed;

use crate::bigint::{bit_length, Int};
use crate::constants::EXPONENT_SIZE;
use crate::error::{GooError, GooResult};

const SCALAR_BYTES: usize = 16; // CHAL_BITS / 8, also the width of each z' entry
const T_BYTES: usize = 4;

fn e_mag_bytes() -> usize {
    ((EXPONENT_SIZE + 7) / 8) as usize
}

/// A single-use, immutable zero-knowledge proof of RSA-modulus
/// factorization, binding a message to a commitment `C1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub c2: Int,
    pub c3: Int,
    pub t: u32,
    pub chal: Int,
    pub ell: Int,
    pub aq: Int,
    pub bq: Int,
    pub cq: Int,
    pub dq: Int,
    pub eq: Int,
    pub z_w: Int,
    pub z_w2: Int,
    pub z_s1: Int,
    pub z_a: Int,
    pub z_an: Int,
    pub z_s1w: Int,
    pub z_sa: Int,
    pub z_s2: Int,
}

fn write_be(out: &mut Vec<u8>, x: &Int, width: usize) -> GooResult<()> {
    if x.is_negative() {
        return Err(GooError::Domain("signature: field must be non-negative"));
    }
    let bytes = x.to_bytes_be().1;
    if bytes.len() > width {
        return Err(GooError::Overflow);
    }
    out.extend(std::iter::repeat(0u8).take(width - bytes.len()));
    out.extend_from_slice(&bytes);
    Ok(())
}

fn read_be(buf: &[u8], pos: &mut usize, width: usize) -> GooResult<Int> {
    if buf.len() < *pos + width {
        return Err(GooError::Domain("signature: truncated field"));
    }
    let slice = &buf[*pos..*pos + width];
    *pos += width;
    Ok(Int::from_bytes_be(num_bigint::Sign::Plus, slice))
}

impl Signature {
    /// `mod_bytes` is the group's `⌈bits(N)/8⌉`, i.e. the width of every
    /// group-element field.
    pub fn to_bytes(&self, mod_bytes: usize) -> GooResult<Vec<u8>> {
        let mut out = Vec::new();
        write_be(&mut out, &self.c2, mod_bytes)?;
        write_be(&mut out, &self.c3, mod_bytes)?;

        let t_bytes = self.t.to_be_bytes();
        out.extend_from_slice(&t_bytes);

        write_be(&mut out, &self.chal, SCALAR_BYTES)?;
        write_be(&mut out, &self.ell, SCALAR_BYTES)?;

        write_be(&mut out, &self.aq, mod_bytes)?;
        write_be(&mut out, &self.bq, mod_bytes)?;
        write_be(&mut out, &self.cq, mod_bytes)?;
        write_be(&mut out, &self.dq, mod_bytes)?;

        // Sign-magnitude: one sign byte, then a fixed-width magnitude.
        let sign_byte = if self.eq.is_negative() { 1u8 } else { 0u8 };
        out.push(sign_byte);
        write_be(&mut out, &self.eq.abs(), e_mag_bytes())?;
        if bit_length(&self.eq) > EXPONENT_SIZE {
            return Err(GooError::Overflow);
        }

        for z in [
            &self.z_w,
            &self.z_w2,
            &self.z_s1,
            &self.z_a,
            &self.z_an,
            &self.z_s1w,
            &self.z_sa,
            &self.z_s2,
        ] {
            write_be(&mut out, z, SCALAR_BYTES)?;
        }

        Ok(out)
    }

    pub fn from_bytes(buf: &[u8], mod_bytes: usize) -> GooResult<Self> {
        let mut pos = 0usize;
        let c2 = read_be(buf, &mut pos, mod_bytes)?;
        let c3 = read_be(buf, &mut pos, mod_bytes)?;

        if buf.len() < pos + T_BYTES {
            return Err(GooError::Domain("signature: truncated t"));
        }
        let t = u32::from_be_bytes(buf[pos..pos + T_BYTES].try_into().unwrap());
        pos += T_BYTES;

        let chal = read_be(buf, &mut pos, SCALAR_BYTES)?;
        let ell = read_be(buf, &mut pos, SCALAR_BYTES)?;

        let aq = read_be(buf, &mut pos, mod_bytes)?;
        let bq = read_be(buf, &mut pos, mod_bytes)?;
        let cq = read_be(buf, &mut pos, mod_bytes)?;
        let dq = read_be(buf, &mut pos, mod_bytes)?;

        if buf.len() < pos + 1 {
            return Err(GooError::Domain("signature: truncated Eq sign byte"));
        }
        let sign_byte = buf[pos];
        pos += 1;
        if sign_byte > 1 {
            return Err(GooError::Domain("signature: invalid Eq sign byte"));
        }
        let eq_mag = read_be(buf, &mut pos, e_mag_bytes())?;
        let eq = if sign_byte == 1 { -eq_mag } else { eq_mag };
        if bit_length(&eq) > EXPONENT_SIZE {
            return Err(GooError::Overflow);
        }

        let z_w = read_be(buf, &mut pos, SCALAR_BYTES)?;
        let z_w2 = read_be(buf, &mut pos, SCALAR_BYTES)?;
        let z_s1 = read_be(buf, &mut pos, SCALAR_BYTES)?;
        let z_a = read_be(buf, &mut pos, SCALAR_BYTES)?;
        let z_an = read_be(buf, &mut pos, SCALAR_BYTES)?;
        let z_s1w = read_be(buf, &mut pos, SCALAR_BYTES)?;
        let z_sa = read_be(buf, &mut pos, SCALAR_BYTES)?;
        let z_s2 = read_be(buf, &mut pos, SCALAR_BYTES)?;

        if pos != buf.len() {
            return Err(GooError::Domain("signature: trailing bytes"));
        }

        Ok(Self {
            c2,
            c3,
            t,
            chal,
            ell,
            aq,
            bq,
            cq,
            dq,
            eq,
            z_w,
            z_w2,
            z_s1,
            z_a,
            z_an,
            z_s1w,
            z_sa,
            z_s2,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Signature {
        let small = Int::from(7u32);
        Signature {
            c2: small.clone(),
            c3: small.clone(),
            t: 11,
            chal: Int::from(123u32),
            ell: Int::from(9973u32),
            aq: small.clone(),
            bq: small.clone(),
            cq: small.clone(),
            dq: small,
            eq: Int::from(-42i32),
            z_w: Int::from(1u32),
            z_w2: Int::from(2u32),
            z_s1: Int::from(3u32),
            z_a: Int::from(4u32),
            z_an: Int::from(5u32),
            z_s1w: Int::from(6u32),
            z_sa: Int::from(7u32),
            z_s2: Int::from(8u32),
        }
    }

    #[test]
    fn round_trips_through_bytes() {
        let mod_bytes = 1;
        let sig = sample();
        let bytes = sig.to_bytes(mod_bytes).unwrap();
        let back = Signature::from_bytes(&bytes, mod_bytes).unwrap();
        assert_eq!(sig, back);
    }

    #[test]
    fn rejects_truncated_buffer() {
        let mod_bytes = 1;
        let sig = sample();
        let mut bytes = sig.to_bytes(mod_bytes).unwrap();
        bytes.pop();
        assert!(Signature::from_bytes(&bytes, mod_bytes).is_err());
    }

    #[test]
    fn rejects_field_exceeding_width() {
        let mod_bytes = 1;
        let mut sig = sample();
        sig.c2 = Int::from(1000u32); // doesn't fit in 1 byte
        assert!(sig.to_bytes(mod_bytes).is_err());
    }

    #[test]
    fn negative_eq_round_trips_sign() {
        let mod_bytes = 1;
        let mut sig = sample();
        sig.eq = Int::from(-7i32);
        let bytes = sig.to_bytes(mod_bytes).unwrap();
        let back = Signature::from_bytes(&bytes, mod_bytes).unwrap();
        assert_eq!(back.eq, Int::from(-7i32));
    }
}
