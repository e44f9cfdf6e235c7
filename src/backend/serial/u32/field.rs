// -*- mode: rust; -*-
//
// This file is part of curve25519-mcu.
// See LICENSE for licensing information.

//! `FieldElement`: an element of `GF(2^255 - 19)`, the Curve25519 coordinate
//! field.
//!
//! Values are kept in *relaxed* form between operations — congruent to the
//! true residue mod p, but not necessarily less than p (bit 255 may be set,
//! and the value may exceed p by up to 37). [`FieldElement::reduce_completely`]
//! produces the canonical representative; [`FieldElement::to_bytes`] calls it
//! implicitly. This mirrors `fe25519.c`: the interleaved top-word-first
//! reduction avoids a dedicated normalization pass on every add/sub/mul.

use core::fmt;

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

use super::bigint::{self, U256};

#[cfg(feature = "zeroize")]
use zeroize::Zeroize;

/// An element of `GF(2^255 - 19)`.
#[derive(Clone, Copy)]
pub struct FieldElement(pub(crate) U256);

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldElement: {:?}", &self.0)
    }
}

#[cfg(feature = "zeroize")]
impl Zeroize for FieldElement {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl Default for FieldElement {
    fn default() -> Self {
        FieldElement::ZERO
    }
}

impl FieldElement {
    /// The additive identity.
    pub const ZERO: FieldElement = FieldElement([0u32; 8]);
    /// The multiplicative identity.
    pub const ONE: FieldElement = FieldElement([1, 0, 0, 0, 0, 0, 0, 0]);

    /// Loads 32 little-endian bytes verbatim, clearing bit 255. No validity
    /// check is performed: values are not required to be canonical on
    /// input.
    pub fn from_bytes(bytes: &[u8; 32]) -> FieldElement {
        let mut words = [0u32; 8];
        for i in 0..8 {
            words[i] = u32::from_le_bytes(bytes[4 * i..4 * i + 4].try_into().unwrap());
        }
        words[7] &= 0x7fff_ffff;
        FieldElement(words)
    }

    /// Reduces completely and serializes to 32 little-endian bytes; the high
    /// bit of byte 31 is always clear on return.
    pub fn to_bytes(&self) -> [u8; 32] {
        let canon = self.reduce_completely();
        let mut out = [0u8; 32];
        for i in 0..8 {
            out[4 * i..4 * i + 4].copy_from_slice(&canon.0[i].to_le_bytes());
        }
        out
    }

    /// `add(out, a, b)`: top-word-first interleaved reduction. 2^255 ≡ 19
    /// (mod p), so a carry out of bit 254 of the sum is folded back in as a
    /// multiple of 19.
    pub fn add(&self, rhs: &FieldElement) -> FieldElement {
        let a = &self.0;
        let b = &rhs.0;
        let mut out = [0u32; 8];

        let t = (a[7] as u64) + (b[7] as u64);
        out[7] = (t as u32) & 0x7fff_ffff;
        let mut accu: u64 = (t >> 31) * 19;

        for i in 0..7 {
            accu += a[i] as u64;
            accu += b[i] as u64;
            out[i] = accu as u32;
            accu >>= 32;
        }
        out[7] = out[7].wrapping_add(accu as u32);
        FieldElement(out)
    }

    /// `sub(out, a, b)`: mirror of `add`. `out[7] = (a[7]-b[7]) | 0x8000_0000`
    /// with the accumulator seeded as `19 * ((diff >> 31) - 1)`, the `-1`
    /// compensating for the bit that was just OR'd in, guaranteeing a
    /// non-negative result.
    pub fn sub(&self, rhs: &FieldElement) -> FieldElement {
        let a = &self.0;
        let b = &rhs.0;
        let mut out = [0u32; 8];

        let diff = (a[7] as i64) - (b[7] as i64);
        out[7] = (diff as u32) | 0x8000_0000;
        let top_borrow = (diff >> 31) as i64; // 0 or -1, arithmetic shift
        let mut accu: i64 = 19 * (top_borrow - 1);

        for i in 0..7 {
            accu += a[i] as i64;
            accu -= b[i] as i64;
            out[i] = accu as u32;
            accu >>= 32;
        }
        out[7] = out[7].wrapping_add(accu as u32);
        FieldElement(out)
    }

    /// `neg(out, v)`: `sub(0, v)` with the same bit-31 trick.
    pub fn negate(&self) -> FieldElement {
        FieldElement::ZERO.sub(self)
    }

    /// Multiplies by a small constant `k <= 2^16`, folding the overflow of
    /// the top word times `k` into the 19-multiplier on the fly.
    pub fn mpy_with_uint16(&self, k: u16) -> FieldElement {
        self.mpy_with_u32(k as u32)
    }

    /// Multiplies by the Montgomery-ladder constant 121666 = `(1<<16) +
    /// 0xDB42`. The original splits this into a 16-bit multiply plus a
    /// shifted add because its multiplier primitive only takes a 16-bit
    /// scalar; since our per-word accumulator already does the full 64-bit
    /// product, there is no need to split — `mpy_with_u32` folds the single
    /// 32-bit constant directly.
    pub fn mpy_with_121666(&self) -> FieldElement {
        self.mpy_with_u32(121666)
    }

    /// Shared implementation: multiplies by a 32-bit constant, interleaving
    /// the top-word 2^255-fold exactly as `add`/`sub` do.
    fn mpy_with_u32(&self, k: u32) -> FieldElement {
        let a = &self.0;
        let k = k as u64;
        let mut out = [0u32; 8];

        let top = (a[7] as u64) * k;
        out[7] = (top as u32) & 0x7fff_ffff;
        let mut accu: u64 = (top >> 31) * 19;

        for i in 0..7 {
            accu += (a[i] as u64) * k;
            out[i] = accu as u32;
            accu >>= 32;
        }
        out[7] = out[7].wrapping_add(accu as u32);
        FieldElement(out)
    }

    /// `mul(out, a, b)`: full 256x256 multiply followed by [`reduce_to_256_bits`].
    pub fn mul(&self, rhs: &FieldElement) -> FieldElement {
        let wide = bigint::mul_256x256(&self.0, &rhs.0);
        FieldElement(reduce_to_256_bits(&wide))
    }

    /// `square(out, v)`: full squaring followed by [`reduce_to_256_bits`].
    pub fn square(&self) -> FieldElement {
        let wide = bigint::sqr_256(&self.0);
        FieldElement(reduce_to_256_bits(&wide))
    }

    /// Reduces to the canonical representative in `[0, p)`.
    pub fn reduce_completely(&self) -> FieldElement {
        FieldElement(reduce_completely(&self.0))
    }

    /// Compares two field elements, reducing both completely on a
    /// word-level mismatch and retrying. Mutates neither `self` nor `rhs`
    /// (both are taken by value internally) but is variable-time, matching
    /// the original's documented input-mutating contract adapted to an
    /// immutable-by-default API: callers who need the original's in-place
    /// mutation should call `reduce_completely` themselves first.
    pub fn is_equal_vartime(&self, rhs: &FieldElement) -> bool {
        if bigint::is_equal_256(&self.0, &rhs.0) == 0 {
            return true;
        }
        let a = reduce_completely(&self.0);
        let b = reduce_completely(&rhs.0);
        bigint::is_equal_256(&a, &b) == 0
    }

    /// Returns true iff the value is congruent to zero mod p.
    pub fn is_zero(&self) -> Choice {
        let canon = reduce_completely(&self.0);
        let mut acc = canon[0];
        for i in 1..8 {
            acc |= canon[i];
        }
        acc.ct_eq(&0)
    }

    /// Returns the low bit of the canonical representative's first byte.
    pub fn parity(&self) -> Choice {
        let canon = reduce_completely(&self.0);
        Choice::from((canon[0] & 1) as u8)
    }

    /// Computes `x^((p-5)/8)` via the fixed addition chain given in
    /// `fe25519_pow2523.c` (attributed there to Hutter & Schwabe's avr-nacl).
    /// Block sizes (9, 19, 9, 49, 99, 49, 2 repeated squarings) are load
    /// bearing; do not "simplify" them.
    pub fn pow2523(&self) -> FieldElement {
        let z2 = self.square(); // 2
        let mut t0 = z2.square(); // 4
        t0 = t0.square(); // 8
        let z2_10_0 = t0.mul(self); // 9
        let z11 = z2_10_0.mul(&z2); // 11

        let mut t0 = z11.square();
        let mut z2_10_0 = t0.mul(&z2_10_0); // 2^5 - 1 = 31

        t0 = z2_10_0.square();
        for _ in 1..5 {
            t0 = t0.square();
        }
        z2_10_0 = t0.mul(&z2_10_0); // 2^10 - 1

        t0 = z2_10_0.square();
        for _ in 1..10 {
            t0 = t0.square();
        }
        let z2_50_0 = t0.mul(&z2_10_0); // 2^20 - 1

        t0 = z2_50_0.square();
        for _ in 1..20 {
            t0 = t0.square();
        }
        t0 = t0.mul(&z2_50_0); // 2^40 - 1

        for _ in 0..10 {
            t0 = t0.square();
        }
        let z2_50_0 = t0.mul(&z2_10_0); // 2^50 - 1

        t0 = z2_50_0.square();
        for _ in 1..50 {
            t0 = t0.square();
        }
        let z2_100_0 = t0.mul(&z2_50_0); // 2^100 - 1

        t0 = z2_100_0.square();
        for _ in 1..100 {
            t0 = t0.square();
        }
        t0 = t0.mul(&z2_100_0); // 2^200 - 1

        for _ in 0..50 {
            t0 = t0.square();
        }
        t0 = t0.mul(&z2_50_0); // 2^250 - 1

        t0 = t0.square(); // 2^251 - 2
        t0 = t0.square(); // 2^252 - 4
        t0.mul(self) // 2^252 - 3 = (p-5)/8
    }

    /// Computes `x^(p-2)`, the multiplicative inverse of a nonzero element.
    /// Not present in the original `fe25519.c`/`fe25519_pow2523.c` pair
    /// (only `pow2523` is); derived from it the standard way, since
    /// `p - 2 = 8*(2^252-3) + 3 = 8*pow2523_exponent + 3`:
    /// `invert(x) = pow2523(x)^8 * x^3`.
    pub fn invert(&self) -> FieldElement {
        let t = self.pow2523();
        let t = t.square().square().square(); // ^8
        let x2 = self.square();
        let x3 = x2.mul(self);
        t.mul(&x3)
    }

    /// Algorithm 3.37 (HAC), specialised to `p ≡ 5 (mod 8)`. Variable-time,
    /// which is acceptable: `squareroot` is only used when decoding public
    /// values.
    ///
    /// Built from [`pow2523`] rather than as a standalone addition chain:
    /// `beta = x^((p+3)/8) = x^((p-5)/8) * x`. If `beta^2 == x`, `x` is a
    /// quadratic residue and `beta` is its root. Otherwise `beta^2 == -x`,
    /// and the root is `beta * sqrt(-1)`, using `sqrt(-1) = 2 *
    /// 2^((p-5)/4) = 2 * pow2523(2)^2` (since `(p-1)/4 = 2*(p-5)/8 + 1`).
    /// This is algebraically the same pair of candidate outputs HAC 3.37
    /// computes via its square-and-multiply ladder on `(p-1)/4`.
    pub fn sqrt(&self) -> FieldElement {
        let beta = self.pow2523().mul(self);
        if beta.square().is_equal_vartime(self) {
            return beta;
        }
        let two = FieldElement::ONE.add(&FieldElement::ONE);
        let sqrt_m1 = two.mul(&two.pow2523().square());
        beta.mul(&sqrt_m1)
    }

    /// Fills a fresh field element from a CSPRNG, reducing the 32 raw bytes
    /// into relaxed form (bit 255 cleared) the same way [`from_bytes`] does.
    #[cfg(feature = "rand_core")]
    pub fn random<R: rand_core::CryptoRng + rand_core::RngCore>(rng: &mut R) -> FieldElement {
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        FieldElement::from_bytes(&bytes)
    }
}

impl ConstantTimeEq for FieldElement {
    fn ct_eq(&self, other: &Self) -> Choice {
        let a = reduce_completely(&self.0);
        let b = reduce_completely(&other.0);
        bigint::is_equal_256(&a, &b).ct_eq(&0)
    }
}

impl ConditionallySelectable for FieldElement {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        let mut out = a.0;
        bigint::cmov_256(&mut out, &b.0, choice.unwrap_u8() as u32);
        FieldElement(out)
    }
}

impl PartialEq for FieldElement {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}
impl Eq for FieldElement {}

#[cfg(feature = "serde")]
impl serde::Serialize for FieldElement {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(&self.to_bytes())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for FieldElement {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FieldElementVisitor;
        impl<'de> serde::de::Visitor<'de> for FieldElementVisitor {
            type Value = FieldElement;
            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("32 bytes of data")
            }
            fn visit_bytes<E: serde::de::Error>(self, v: &[u8]) -> Result<FieldElement, E> {
                let bytes: [u8; 32] = v.try_into().map_err(|_| E::invalid_length(v.len(), &self))?;
                Ok(FieldElement::from_bytes(&bytes))
            }
        }
        deserializer.deserialize_bytes(FieldElementVisitor)
    }
}

/// `reduceTo256Bits`: two-fold factor-38 reduction of a 512-bit product,
/// exploiting `2^256 ≡ 2*19 ≡ 38 (mod p)`.
fn reduce_to_256_bits(wide: &[u32; 16]) -> U256 {
    let mut out = [0u32; 8];

    // Fold word 15 first.
    let t = core::hint::black_box(wide[7] as u64) + 38 * core::hint::black_box(wide[15] as u64);
    out[7] = (t as u32) & 0x7fff_ffff;
    let mut accu: u64 = (t >> 31) * 19;

    for i in 0..7 {
        accu += wide[i] as u64;
        accu += 38 * (wide[i + 8] as u64);
        out[i] = accu as u32;
        accu >>= 32;
    }
    out[7] = out[7].wrapping_add(accu as u32);
    out
}

/// `reduceCompletely`: guarantees the canonical representative in `[0, p)`.
/// Guesses how many copies of p to subtract from the top bit, subtracts
/// `19 * guess` (mod p means subtracting p is adding 19, so we instead add
/// `19` and let the final conditional subtract handle the rest), then
/// conditionally subtracts p based on the true comparison.
fn reduce_completely(v: &U256) -> U256 {
    let mut t = *v;
    // First pass: fold the relaxed form's excess down into a value known to
    // be < 2p by observing bit 255 is the only bit that can be set beyond
    // the canonical range, worth 2^255 ≡ 19 (mod p).
    let top = t[7] >> 31;
    t[7] &= 0x7fff_ffff;
    let mut accu: u64 = (top as u64) * 19;
    for i in 0..7 {
        accu += t[i] as u64;
        t[i] = accu as u32;
        accu >>= 32;
    }
    t[7] = t[7].wrapping_add(accu as u32);

    // Second pass: conditionally subtract p = 2^255 - 19 once (t is now
    // < 2p, so one subtract suffices).
    const P: U256 = [
        0xffff_ffed,
        0xffff_ffff,
        0xffff_ffff,
        0xffff_ffff,
        0xffff_ffff,
        0xffff_ffff,
        0xffff_ffff,
        0x7fff_ffff,
    ];
    let mut candidate = t;
    let borrow = bigint::sub_borrow_256(&mut candidate, &P);
    bigint::cmov_256(&mut t, &candidate, (borrow == 0) as u32);
    t
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fe(bytes_hex_le: &[u8; 32]) -> FieldElement {
        FieldElement::from_bytes(bytes_hex_le)
    }

    #[test]
    fn mul_identity() {
        let mut one = [0u8; 32];
        one[0] = 1;
        let a = fe(&one);
        let b = fe(&one);
        assert_eq!(a.mul(&b).to_bytes(), one);
    }

    #[test]
    fn mul_two_times_two_to_254() {
        let mut a_bytes = [0u8; 32];
        a_bytes[0] = 2;
        let mut b_bytes = [0u8; 32];
        b_bytes[31] = 0x40;
        let a = fe(&a_bytes);
        let b = fe(&b_bytes);
        let mut expect = [0u8; 32];
        expect[0] = 0x13;
        assert_eq!(a.mul(&b).to_bytes(), expect);
    }

    #[test]
    fn square_of_p_minus_one_is_one() {
        let mut bytes = [0xffu8; 32];
        bytes[0] = 0xEC;
        bytes[31] = 0x7F;
        let x = fe(&bytes);
        let mut one = [0u8; 32];
        one[0] = 1;
        assert_eq!(x.square().to_bytes(), one);
    }

    #[test]
    fn invert_of_two_is_half() {
        let mut a_bytes = [0u8; 32];
        a_bytes[0] = 2;
        let x = fe(&a_bytes);
        let mut expect = [0xffu8; 32];
        expect[0] = 0xF7;
        expect[31] = 0x3F;
        assert_eq!(x.invert().to_bytes(), expect);
    }

    #[test]
    fn invert_roundtrips_through_mul() {
        let mut bytes = [0u8; 32];
        bytes[0] = 5;
        bytes[1] = 7;
        bytes[17] = 42;
        let x = fe(&bytes);
        let inv = x.invert();
        let mut one = [0u8; 32];
        one[0] = 1;
        assert_eq!(x.mul(&inv).to_bytes(), one);
    }

    #[test]
    fn add_then_sub_is_identity() {
        let mut a_bytes = [0u8; 32];
        a_bytes[3] = 9;
        let mut b_bytes = [0u8; 32];
        b_bytes[11] = 200;
        let a = fe(&a_bytes);
        let b = fe(&b_bytes);
        let sum = a.add(&b);
        assert!(sum.sub(&b).is_equal_vartime(&a));
    }

    #[test]
    fn neg_of_zero_is_zero() {
        let zero = FieldElement::ZERO;
        assert!(bool::from(zero.negate().is_zero()));
    }

    #[test]
    fn pow2523_satisfies_fermat_identity() {
        // pow2523(x) = x^((p-5)/8) = x^e with 8e + 5 = p, so by Fermat's
        // little theorem pow2523(x)^8 * x^5 == x^p == x for nonzero x.
        let mut bytes = [0u8; 32];
        bytes[0] = 3;
        let x = fe(&bytes);
        let chain = x.pow2523();
        let eighth = chain.square().square().square();
        let x5 = x.square().square().mul(&x);
        assert!(eighth.mul(&x5).is_equal_vartime(&x));
    }

    #[test]
    fn sqrt_of_square_recovers_value_or_its_negation() {
        let mut bytes = [0u8; 32];
        bytes[0] = 11;
        bytes[5] = 3;
        let x = fe(&bytes);
        let sq = x.square();
        let root = sq.sqrt();
        let root_sq = root.square();
        assert!(root_sq.is_equal_vartime(&sq));
    }

    #[test]
    fn mpy_with_121666_matches_scalar_mul() {
        let mut bytes = [0u8; 32];
        bytes[0] = 9;
        bytes[20] = 1;
        let x = fe(&bytes);
        let mut k_bytes = [0u8; 32];
        k_bytes[0] = 0x42;
        k_bytes[1] = 0xdb;
        k_bytes[2] = 0x01;
        let k = fe(&k_bytes);
        assert!(x.mpy_with_121666().is_equal_vartime(&x.mul(&k)));
    }
}
