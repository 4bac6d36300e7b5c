//! Floor-division-consistent arbitrary-precision integer primitives.
//!
//! `num-bigint`'s own `Div`/`Rem` impls truncate toward zero, like Rust's
//! machine integers. Every function in this module goes through
//! `num_integer::Integer`'s `_floor` family instead, so the floor-mod law
//! (`div(x,y)*y + mod(x,y) == x`, with `mod`'s sign following `y`) holds by
//! construction rather than by caller discipline.

use num_bigint::{BigInt, Sign};
use num_integer::Integer as _;
use num_traits::{One, Signed, Zero};

use crate::error::{GooError, GooResult};

/// The arbitrary-precision integer type used throughout this crate.
pub type Int = BigInt;

/// Number of bits needed to represent `|x|`; `0` for `x == 0`.
pub fn bit_length(x: &Int) -> u32 {
    x.magnitude().bits() as u32
}

/// Number of bytes needed to hold `bit_length(x)` bits.
pub fn byte_length(x: &Int) -> u32 {
    (bit_length(x) + 7) / 8
}

/// Number of trailing zero bits of `|x|`; `0` for `x == 0`.
pub fn zero_bits(x: &Int) -> u32 {
    x.magnitude().trailing_zeros().unwrap_or(0) as u32
}

/// Floor-division quotient and remainder: `x = q*y + r`, `0 <= r < |y|`
/// if `y > 0`, else `y < r <= 0`.
pub fn div_mod_floor(x: &Int, y: &Int) -> (Int, Int) {
    x.div_mod_floor(y)
}

pub fn div_floor(x: &Int, y: &Int) -> Int {
    x.div_floor(y)
}

pub fn mod_floor(x: &Int, y: &Int) -> Int {
    x.mod_floor(y)
}

/// Euclidean GCD via floor-mod, always non-negative.
pub fn gcd(a: &Int, b: &Int) -> Int {
    a.gcd(b)
}

/// Extended GCD: returns `(s, t, g)` such that `s*a + t*b == g`. `s`, `t`
/// may be negative.
pub fn egcd(a: &Int, b: &Int) -> (Int, Int, Int) {
    let ext = a.extended_gcd(b);
    (ext.x, ext.y, ext.gcd)
}

/// Modular inverse of `a` modulo `n`, as the canonical representative in
/// `[0, n)`. Fails with [`GooError::NotInvertible`] when `gcd(a,n) > 1`.
pub fn inverse(a: &Int, n: &Int) -> GooResult<Int> {
    let (s, _t, g) = egcd(a, n);
    if g != Int::one() && g != -Int::one() {
        return Err(GooError::NotInvertible);
    }
    // `g` may be -1 if both a and n contributed a sign; normalize by
    // flipping `s` so that `s*a ≡ 1 (mod n)`.
    let s = if g.is_negative() { -s } else { s };
    Ok(mod_floor(&s, n))
}

/// Jacobi symbol `(x|y)`. `y` must be positive and odd.
pub fn jacobi(x: &Int, y: &Int) -> GooResult<i32> {
    if y.is_zero() || y.is_negative() || !is_odd(y) {
        return Err(GooError::Domain("jacobi: y must be positive and odd"));
    }

    let mut a = mod_floor(x, y);
    let mut n = y.clone();
    let mut result = 1i32;

    while !a.is_zero() {
        while is_even(&a) {
            a /= 2;
            let r = mod_floor(&n, &Int::from(8));
            if r == Int::from(3) || r == Int::from(5) {
                result = -result;
            }
        }
        std::mem::swap(&mut a, &mut n);
        if mod_floor(&a, &Int::from(4)) == Int::from(3)
            && mod_floor(&n, &Int::from(4)) == Int::from(3)
        {
            result = -result;
        }
        a = mod_floor(&a, &n);
    }

    if n == Int::one() {
        Ok(result)
    } else {
        Ok(0)
    }
}

fn is_even(x: &Int) -> bool {
    x.is_even()
}

fn is_odd(x: &Int) -> bool {
    x.is_odd()
}

/// `floor(sqrt(x))` via Newton's method. `x` must be non-negative.
pub fn sqrt(x: &Int) -> GooResult<Int> {
    if x.is_negative() {
        return Err(GooError::Domain("sqrt: x must be non-negative"));
    }
    if x.is_zero() || *x == Int::one() {
        return Ok(x.clone());
    }

    let mut z = Int::one() << (bit_length(x) / 2 + 1);
    loop {
        let next = (&z + x / &z) / 2;
        if next >= z {
            break;
        }
        z = next;
    }
    Ok(z)
}

/// Modular exponentiation `x^y mod m`, right-to-left square-and-multiply.
/// Negative `y` is supported by pre-inverting `x`. Fails on `m == 0`;
/// returns `0` for `m == 1`.
pub fn mod_pow(x: &Int, y: &Int, m: &Int) -> GooResult<Int> {
    if m.is_zero() {
        return Err(GooError::Domain("mod_pow: modulus must be nonzero"));
    }
    if m.abs() == Int::one() {
        return Ok(Int::zero());
    }

    let (mut base, mut exp) = if y.is_negative() {
        (inverse(x, m)?, -y.clone())
    } else {
        (mod_floor(x, m), y.clone())
    };

    if exp.is_zero() {
        return Ok(Int::one());
    }

    let mut result = Int::one();
    base = mod_floor(&base, m);

    while exp > Int::zero() {
        if is_odd(&exp) {
            result = mod_floor(&(&result * &base), m);
        }
        base = mod_floor(&(&base * &base), m);
        exp /= 2;
    }

    Ok(result)
}

/// Modular square root of `x` modulo the prime `p`. Dispatches on the
/// Jacobi symbol; fast paths for `p ≡ 3 (mod 4)` and `p ≡ 5 (mod 8)`,
/// general Tonelli-Shanks otherwise. Fails with [`GooError::NotASquare`]
/// when `x` is a non-residue.
pub fn mod_sqrt(x: &Int, p: &Int) -> GooResult<Int> {
    let x = mod_floor(x, p);
    if x.is_zero() {
        return Ok(Int::zero());
    }

    match jacobi(&x, p)? {
        -1 => return Err(GooError::NotASquare),
        0 => return Ok(Int::zero()),
        _ => {}
    }

    let four = Int::from(4);
    let eight = Int::from(8);

    if mod_floor(p, &four) == Int::from(3) {
        let e = (p + Int::one()) / &four;
        return mod_pow(&x, &e, p);
    }

    if mod_floor(p, &eight) == Int::from(5) {
        let e = (p - Int::one()) / &four;
        let d = mod_pow(&x, &e, p)?;
        return if d == Int::one() {
            let e2 = (p + Int::from(3)) / &eight;
            mod_pow(&x, &e2, p)
        } else {
            // d == p - 1
            let four_x = mod_floor(&(&four * &x), p);
            let e2 = (p - Int::from(5)) / &eight;
            let b = mod_pow(&four_x, &e2, p)?;
            let two_x = mod_floor(&(&Int::from(2) * &x), p);
            Ok(mod_floor(&(&two_x * &b), p))
        };
    }

    tonelli_shanks(&x, p)
}

fn tonelli_shanks(x: &Int, p: &Int) -> GooResult<Int> {
    // p - 1 = q * 2^s, q odd
    let mut q = p - Int::one();
    let mut s = 0u32;
    while is_even(&q) {
        q /= 2;
        s += 1;
    }

    // least quadratic non-residue n >= 2
    let mut n = Int::from(2);
    while jacobi(&n, p)? != -1 {
        n += 1;
    }

    let mut m = s;
    let mut c = mod_pow(&n, &q, p)?;
    let mut t = mod_pow(x, &q, p)?;
    let mut r = mod_pow(x, &((&q + Int::one()) / 2), p)?;

    loop {
        if t == Int::one() {
            return Ok(r);
        }

        // find least i, 0 < i < m, with t^(2^i) == 1
        let mut i = 0u32;
        let mut t2i = t.clone();
        while t2i != Int::one() {
            t2i = mod_floor(&(&t2i * &t2i), p);
            i += 1;
            if i >= m {
                return Err(GooError::NotASquare);
            }
        }

        let b_exp = Int::one() << (m - i - 1);
        let b = mod_pow(&c, &b_exp, p)?;
        m = i;
        c = mod_floor(&(&b * &b), p);
        t = mod_floor(&(&t * &c), p);
        r = mod_floor(&(&r * &b), p);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_mod_law() {
        for (x, y) in [(7, 3), (-7, 3), (7, -3), (-7, -3), (0, 5), (5, 1)] {
            let x = Int::from(x);
            let y = Int::from(y);
            let (q, r) = div_mod_floor(&x, &y);
            assert_eq!(&q * &y + &r, x);
            if y.sign() == Sign::Plus {
                assert!(r >= Int::zero() && r < y.abs());
            } else {
                assert!(r <= Int::zero() && r > -y.abs());
            }
        }
    }

    #[test]
    fn egcd_matches_known_vector() {
        let (s, t, g) = egcd(&Int::from(240), &Int::from(46));
        assert_eq!(g, Int::from(2));
        assert_eq!(&s * Int::from(240) + &t * Int::from(46), g);
        assert_eq!(s, Int::from(-9));
        assert_eq!(t, Int::from(47));
    }

    #[test]
    fn jacobi_symbol_table() {
        assert_eq!(jacobi(&Int::from(1001), &Int::from(9907)).unwrap(), -1);
        assert_eq!(jacobi(&Int::from(0), &Int::from(1)).unwrap(), 1);
        assert_eq!(jacobi(&Int::from(2), &Int::from(1)).unwrap(), 1);
    }

    #[test]
    fn jacobi_rejects_even_or_zero_modulus() {
        assert!(jacobi(&Int::from(3), &Int::from(4)).is_err());
        assert!(jacobi(&Int::from(3), &Int::from(0)).is_err());
    }

    #[test]
    fn sqrt_matches_known_vector() {
        let x = (Int::one() << 200) - Int::one();
        let expected = (Int::one() << 100) - Int::one();
        assert_eq!(sqrt(&x).unwrap(), expected);
        assert_eq!(sqrt(&Int::zero()).unwrap(), Int::zero());
        assert_eq!(sqrt(&Int::one()).unwrap(), Int::one());
    }

    #[test]
    fn mod_pow_edge_cases() {
        assert_eq!(
            mod_pow(&Int::from(5), &Int::zero(), &Int::from(7)).unwrap(),
            Int::one()
        );
        assert_eq!(
            mod_pow(&Int::from(5), &Int::from(3), &Int::one()).unwrap(),
            Int::zero()
        );
        assert!(mod_pow(&Int::from(5), &Int::from(3), &Int::zero()).is_err());
    }

    #[test]
    fn mod_sqrt_p_5_mod_8_branch() {
        // 13 ≡ 5 (mod 8)
        let r = mod_sqrt(&Int::from(10), &Int::from(13)).unwrap();
        assert!(r == Int::from(6) || r == Int::from(7));
    }

    #[test]
    fn mod_sqrt_p_3_mod_4_branch() {
        // 7 ≡ 3 (mod 4)
        let r = mod_sqrt(&Int::from(2), &Int::from(7)).unwrap();
        assert!(r == Int::from(3) || r == Int::from(4));
    }

    #[test]
    fn mod_sqrt_general_tonelli_shanks_branch() {
        // 17 ≡ 1 (mod 8): falls through to the general case
        let r = mod_sqrt(&Int::from(2), &Int::from(17)).unwrap();
        assert!(r == Int::from(6) || r == Int::from(11));
    }

    #[test]
    fn mod_sqrt_rejects_non_residue() {
        assert!(mod_sqrt(&Int::from(1001), &Int::from(9907)).is_err());
    }

    #[test]
    fn mod_sqrt_of_zero_is_zero() {
        assert_eq!(mod_sqrt(&Int::zero(), &Int::from(13)).unwrap(), Int::zero());
    }
}
