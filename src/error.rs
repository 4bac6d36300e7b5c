//! Error kinds for the Goo core.
//!
//! Internal primitives raise a typed [`GooError`]; `Group::sign` propagates
//! it with `?`. `Group::verify` and `Group::validate` catch every variant at
//! the boundary and fold it to `bool` — no error kind here is meant to
//! surface past those two entry points.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GooError {
    /// Inputs violate an arithmetic precondition (negative where
    /// non-negative is required, even modulus passed to `jacobi`, zero
    /// modulus passed to `mod_pow`, ...).
    #[error("domain error: {0}")]
    Domain(&'static str),

    /// `gcd(a, n) != 1` while computing a modular inverse.
    #[error("value is not invertible modulo n")]
    NotInvertible,

    /// `mod_sqrt` was asked for the square root of a non-residue.
    #[error("value is not a quadratic residue")]
    NotASquare,

    /// An exponent exceeded the largest comb, a wNAF buffer, or the
    /// `Eq` bit budget.
    #[error("exponent overflowed available capacity")]
    Overflow,

    /// No small prime in the table has a square root modulo `N`.
    #[error("no small prime is a quadratic residue mod n")]
    NoQR,

    /// A verifier predicate failed, or a signature field was out of range.
    #[error("invalid signature")]
    InvalidSignature,
}

pub type GooResult<T> = Result<T, GooError>;
