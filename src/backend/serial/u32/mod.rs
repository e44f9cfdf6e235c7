// -*- mode: rust; -*-
//
// This file is part of curve25519-mcu.
// See LICENSE for licensing information.

//! Serial (non-SIMD) 32-bit backend: the only backend this crate ships,
//! since its target is register-starved microcontrollers rather than
//! desktop-class SIMD.

pub(crate) mod bigint;
pub(crate) mod constants;
pub mod field;
pub mod scalar;
