// -*- mode: rust; -*-
//
// This file is part of curve25519-mcu.
// See LICENSE for licensing information.

//! A constant-time `fe25519`/`sc25519` arithmetic core for register-starved
//! 32-bit targets.
//!
//! This crate provides the two finite fields underlying Curve25519 and
//! Ed25519:
//!
//! - [`FieldElement`], an element of `GF(2^255 - 19)`, the coordinate field
//!   used by the Montgomery ladder and the twisted Edwards curve.
//! - [`Scalar`], an element of `GF(q)` with `q = 2^252 +
//!   27742317777372353535851937790883648493`, the scalar field used for
//!   exponents.
//!
//! Unlike `curve25519-dalek`, this crate has exactly one backend: a serial
//! 32-bit implementation with no SIMD, no `u64` multiplier assumption, and
//! no allocation, built around a Karatsuba-structured multiplier tower
//! (see [`backend::serial::u32::bigint`]) operating entirely on `u32`
//! limbs. There is no curve-point or Edwards/Montgomery layer here: this
//! crate stops at the two field types, the layer beneath where a curve
//! implementation would be built.
//!
//! # Constant time
//!
//! Every operation not named `_vartime` (or documented otherwise, such as
//! [`FieldElement::sqrt`], whose variable-time-ness is inherent to the
//! square-root algorithm it implements) runs in time independent of its
//! input values. Conditional operations are expressed via
//! [`subtle::Choice`] and friends rather than data-dependent branches.
//!
//! # Features
//!
//! - `zeroize` (default-on): implements [`zeroize::Zeroize`] for
//!   [`FieldElement`] and [`Scalar`].
//! - `rand_core` (off by default): enables `FieldElement::random` and
//!   `Scalar::random`, generic over `rand_core::{CryptoRng, RngCore}`.
//! - `serde` (off by default): `Serialize`/`Deserialize` impls for both
//!   types' 32-byte canonical encodings.

#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![allow(clippy::needless_range_loop)]

pub mod backend;

pub use backend::serial::u32::field::FieldElement;
pub use backend::serial::u32::scalar::Scalar;
