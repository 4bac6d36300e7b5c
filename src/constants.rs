//! Public parameters for the Goo signature scheme.
//!
//! These are fixed protocol constants, not per-embedder configuration:
//! challenge size, response size, and comb storage all silently depend
//! on one another, so changing one without the others breaks either
//! soundness or interoperability.

/// Bit-length of the Fiat-Shamir challenge `chal` and of the prime
/// divisor `ell` sampled from the transcript.
pub const CHAL_BITS: u32 = 128;

/// Bit-width of the random scalars used for commitments, first-move
/// randomness, and the PRNG-expanded seed `s`.
pub const EXPONENT_SIZE: u32 = 2048;

/// Upper bound on the gap searched by `next_prime` when deriving `ell`
/// from the transcript's raw random bits.
pub const ELLDIFF_MAX: u32 = 512;

/// wNAF window size used by the variable-base exponentiation engine.
pub const WINDOW_SIZE: u32 = 6;

/// Smallest RSA modulus bit-length accepted by the signer/verifier.
pub const MIN_RSA_BITS: u32 = 1024;

/// Largest RSA modulus bit-length accepted by the signer/verifier.
pub const MAX_RSA_BITS: u32 = 4096;

/// Storage cap (in precomputed group elements) for a single comb table.
pub const MAX_COMB_SIZE: usize = 512;

/// Cap on retries of the `ell`-must-be-128-bits loop before the signer
/// re-rolls its first-move randomness from scratch.
pub const ELL_RETRY_LIMIT: u32 = 64;

/// 32-byte domain-separation prefix absorbed at the start of every
/// Fiat-Shamir transcript.
pub const HASH_PREFIX: [u8; 32] = *b"goosig/fiat-shamir/transcript/v1";

/// Number of bytes used to left-pad `msg` inside the transcript.
pub const MSG_PAD_BYTES: usize = 64;

/// Small primes tried in order by the signer when looking for a prime
/// `t` with a square root modulo `N`. This table is the external
/// collaborator this module only consumes through a trait boundary; see
/// [`crate::primes::SmallPrimeTable`] for the runtime-facing interface
/// built on top of it.
pub const SMALL_PRIMES: [u32; 64] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
    101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191, 193,
    197, 199, 211, 223, 227, 229, 233, 239, 241, 251, 257, 263, 269, 271, 277, 281, 283, 293, 307,
    311,
];
