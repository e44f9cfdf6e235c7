// -*- mode: rust; -*-
//
// This file is part of curve25519-mcu.
// See LICENSE for licensing information.

//! Constants for the scalar field `F_q`.
//!
//! `Q` and `MU` are the only curve-independent constants this crate needs;
//! basepoint/curve-shape tables (`EDWARDS_D` and friends) belong to the
//! higher-level point-arithmetic layer this crate does not implement.

use super::bigint::{U256, U288};

/// The prime order of the Ed25519 base point,
/// `q = 2^252 + 27742317777372353535851937790883648493`, as little-endian
/// 32-bit words.
pub(crate) const Q: U256 = [
    0x5cf5d3ed, 0x5812631a, 0xa2f79cd6, 0x14def9de, 0x00000000, 0x00000000, 0x00000000,
    0x10000000,
];

/// Barrett constant `mu = floor(2^504 / q)`, 288 bits, little-endian words.
pub(crate) const MU: U288 = [
    0x0a2c131b, 0xed9ce5a3, 0x086329a7, 0x2106215d, 0xffffffeb, 0xffffffff, 0xffffffff,
    0xffffffff, 0x0000000f,
];

/// `(q + 1) / 2`, used only in tests to check `sc25519_mul(2, (q+1)/2) == 1`.
#[cfg(test)]
pub(crate) const ONE_HALF: U256 = [
    0x2e7ae9f7, 0x2c09318d, 0x517bce6b, 0x0a6f7cef, 0x00000000, 0x00000000, 0x00000000,
    0x08000000,
];
