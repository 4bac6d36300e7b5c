//! Fixed-base comb: precomputed simultaneous multi-exponentiation on the
//! two group generators `g`, `h`.

use crate::bigint::{bit_length, mod_floor, Int};
use crate::constants::MAX_COMB_SIZE;
use crate::error::{GooError, GooResult};

/// The six derived parameters of one comb, plus its precomputed table.
#[derive(Debug, Clone)]
pub struct CombSpec {
    pub ppa: u32,
    pub aps: u32,
    pub shifts: u32,
    pub bpw: u32,
    pub bits: u32,
    pub size: usize,
}

impl CombSpec {
    fn ops(&self) -> u32 {
        self.shifts * (self.aps + 1) - 1
    }
}

fn isqrt_u32(x: u32) -> u32 {
    if x == 0 {
        return 0;
    }
    let mut z = x;
    let mut y = (z + 1) / 2;
    while y < z {
        z = y;
        y = (z + x / z) / 2;
    }
    z
}

/// Search for the cost-minimal comb shape for an exponent of `bits` bits,
/// constrained to `size <= max_size` precomputed elements.
pub fn generate(bits: u32, max_size: usize) -> GooResult<CombSpec> {
    // best[ops] = minimum-size candidate seen at that op count.
    let mut best_by_ops: std::collections::BTreeMap<u32, CombSpec> = std::collections::BTreeMap::new();

    for ppa in 2..=17u32 {
        let bpw = (bits + ppa - 1) / ppa;
        if bpw == 0 {
            continue;
        }
        let max_aps = isqrt_u32(bpw) + 1;
        for aps in 1..=max_aps {
            if bpw % aps != 0 {
                continue;
            }
            let shifts = bpw / aps;

            for &(shifts, aps) in &[(shifts, aps), (aps, shifts)] {
                if aps == 0 || shifts == 0 {
                    continue;
                }
                let size = ((1u64 << ppa) - 1) as usize * aps as usize;
                let spec = CombSpec {
                    ppa,
                    aps,
                    shifts,
                    bpw: shifts * aps,
                    bits: shifts * aps * ppa,
                    size,
                };
                let ops = spec.ops();
                match best_by_ops.get(&ops) {
                    Some(existing) if existing.size <= spec.size => {}
                    _ => {
                        best_by_ops.insert(ops, spec);
                    }
                }
            }
        }
    }

    let mut min_size_so_far = usize::MAX;
    for spec in best_by_ops.into_values() {
        if spec.size < min_size_so_far {
            min_size_so_far = spec.size;
            if spec.size <= max_size && spec.bits >= bits {
                return Ok(spec);
            }
        }
    }
    Err(GooError::Overflow)
}

/// A comb with its precomputed odd-window table for one base.
pub struct Comb {
    pub spec: CombSpec,
    items: Vec<Int>,
}

impl Comb {
    pub fn precompute(base: &Int, n: &Int, spec: CombSpec) -> Self {
        let ppa = spec.ppa as usize;
        let bpw = spec.bpw;
        let shifts = spec.shifts;
        let aps = spec.aps as usize;
        let bottom_row_len = (1usize << ppa) - 1;

        let mut items = vec![Int::from(0); spec.size];
        items[0] = mod_floor(base, n);

        for i in 1..ppa {
            let src = items[(1usize << (i - 1)) - 1].clone();
            let shifted = crate::bigint::mod_pow(&src, &(Int::from(1) << bpw), n)
                .expect("comb precompute: modulus must be nonzero");
            items[(1usize << i) - 1] = shifted;

            for j in (1usize << i) + 1..(1usize << (i + 1)) {
                items[j - 1] =
                    mod_floor(&(&items[j - (1usize << i) - 1] * &items[(1usize << i) - 1]), n);
            }
        }

        for i in 1..aps {
            for j in 0..bottom_row_len {
                let src = items[(i - 1) * bottom_row_len + j].clone();
                let shifted = crate::bigint::mod_pow(&src, &(Int::from(1) << shifts), n)
                    .expect("comb precompute: modulus must be nonzero");
                items[i * bottom_row_len + j] = shifted;
            }
        }

        Self { spec, items }
    }

    /// Encode `e` as a `shifts x aps` table of window selectors in
    /// `[0, 2^ppa)`, MSB-first across the exponent's bits.
    fn to_comb_exp(&self, e: &Int) -> GooResult<Vec<Vec<u32>>> {
        if bit_length(e) > self.spec.bits {
            return Err(GooError::Overflow);
        }
        if e.sign() == num_bigint::Sign::Minus {
            return Err(GooError::Domain("comb: exponent must be non-negative"));
        }

        let shifts = self.spec.shifts as usize;
        let aps = self.spec.aps as usize;
        let ppa = self.spec.ppa;
        let bits = self.spec.bits;

        // bit `(bits-1) - idx` of e, zero beyond e's own width.
        let bit_at = |idx: u32| -> u32 {
            let bit_index = bits - 1 - idx;
            ((e >> bit_index) & Int::from(1) == Int::from(1)) as u32
        };

        let mut wins = vec![vec![0u32; aps]; shifts];
        for j in 0..shifts {
            for i in 0..aps {
                let mut sel = 0u32;
                for k in 0..ppa {
                    let idx = (i as u32 + k * aps as u32) * self.spec.shifts + j as u32;
                    sel = (sel << 1) | bit_at(idx);
                }
                wins[j][i] = sel;
            }
        }
        Ok(wins)
    }

    fn item(&self, add_index: usize, selector: u32) -> Option<&Int> {
        if selector == 0 {
            return None;
        }
        let bottom_row_len = (1usize << self.spec.ppa) - 1;
        Some(&self.items[add_index * bottom_row_len + (selector as usize - 1)])
    }
}

/// Pick the smallest comb (by `bits`) from `candidates` that can hold
/// both `e1` and `e2`.
fn pick<'a>(candidates: &'a [Comb], needed_bits: u32) -> GooResult<&'a Comb> {
    candidates
        .iter()
        .filter(|c| c.spec.bits >= needed_bits)
        .min_by_key(|c| c.spec.bits)
        .ok_or(GooError::Overflow)
}

/// Simultaneous `g^e1 * h^e2 mod n`, using the smallest pair of combs
/// (from `g_combs`/`h_combs`, index-aligned by comb shape) able to hold
/// both exponents.
pub fn powgh(
    n: &Int,
    g_combs: &[Comb],
    h_combs: &[Comb],
    e1: &Int,
    e2: &Int,
) -> GooResult<Int> {
    let needed = std::cmp::max(bit_length(e1), bit_length(e2));
    let gc = pick(g_combs, needed)?;
    let hc = pick(h_combs, needed)?;
    if gc.spec.bits != hc.spec.bits {
        return Err(GooError::Domain("powgh: g/h comb shapes diverged"));
    }

    let g_wins = gc.to_comb_exp(e1)?;
    let h_wins = hc.to_comb_exp(e2)?;

    let mut ret = Int::from(1);
    for j in 0..gc.spec.shifts as usize {
        if ret != Int::from(1) {
            ret = mod_floor(&(&ret * &ret), n);
        }
        for i in 0..gc.spec.aps as usize {
            if let Some(item) = gc.item(i, g_wins[j][i]) {
                ret = mod_floor(&(&ret * item), n);
            }
            if let Some(item) = hc.item(i, h_wins[j][i]) {
                ret = mod_floor(&(&ret * item), n);
            }
        }
    }
    Ok(ret)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_fits_within_budget() {
        let spec = generate(256, MAX_COMB_SIZE).unwrap();
        assert!(spec.bits >= 256);
        assert!(spec.size <= MAX_COMB_SIZE);
        assert_eq!(spec.bpw, spec.shifts * spec.aps);
        assert_eq!(spec.bits, spec.bpw * spec.ppa);
    }

    #[test]
    fn powgh_matches_direct_modpow_for_g_only() {
        let n = Int::from(0xFFFFFFFBu64);
        let spec_g = generate(32, MAX_COMB_SIZE).unwrap();
        let spec_h = spec_g.clone();
        let g = Comb::precompute(&Int::from(2), &n, spec_g);
        let h = Comb::precompute(&Int::from(3), &n, spec_h);

        let e1 = Int::from(12345u32);
        let e2 = Int::from(0u32);
        let got = powgh(&n, &[g], &[h], &e1, &e2).unwrap();
        let want = crate::bigint::mod_pow(&Int::from(2), &e1, &n).unwrap();
        assert_eq!(got, want);
    }

    #[test]
    fn powgh_matches_direct_modpow_for_h_only() {
        let n = Int::from(0xFFFFFFFBu64);
        let spec_g = generate(32, MAX_COMB_SIZE).unwrap();
        let spec_h = spec_g.clone();
        let g = Comb::precompute(&Int::from(2), &n, spec_g);
        let h = Comb::precompute(&Int::from(3), &n, spec_h);

        let e1 = Int::from(0u32);
        let e2 = Int::from(54321u32);
        let got = powgh(&n, &[g], &[h], &e1, &e2).unwrap();
        let want = crate::bigint::mod_pow(&Int::from(3), &e2, &n).unwrap();
        assert_eq!(got, want);
    }

    #[test]
    fn powgh_matches_direct_modpow_for_both() {
        let n = Int::from(0xFFFFFFFBu64);
        let spec_g = generate(32, MAX_COMB_SIZE).unwrap();
        let spec_h = spec_g.clone();
        let g = Comb::precompute(&Int::from(2), &n, spec_g);
        let h = Comb::precompute(&Int::from(3), &n, spec_h);

        let e1 = Int::from(999u32);
        let e2 = Int::from(777u32);
        let got = powgh(&n, &[g], &[h], &e1, &e2).unwrap();
        let want = mod_floor(
            &(crate::bigint::mod_pow(&Int::from(2), &e1, &n).unwrap()
                * crate::bigint::mod_pow(&Int::from(3), &e2, &n).unwrap()),
            &n,
        );
        assert_eq!(got, want);
    }

    #[test]
    fn powgh_rejects_oversized_exponent() {
        let n = Int::from(0xFFFFFFFBu64);
        let spec_g = generate(8, MAX_COMB_SIZE).unwrap();
        let spec_h = spec_g.clone();
        let g = Comb::precompute(&Int::from(2), &n, spec_g);
        let h = Comb::precompute(&Int::from(3), &n, spec_h);

        let e1 = Int::from(1u32) << 100;
        let e2 = Int::from(0u32);
        assert!(powgh(&n, &[g], &[h], &e1, &e2).is_err());
    }
}
