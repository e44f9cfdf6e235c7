// -*- mode: rust; -*-
//
// This file is part of curve25519-mcu.
// See LICENSE for licensing information.

//! Backend selection. `curve25519-dalek` picks among serial/SIMD/fiat
//! backends by target architecture; this crate has exactly one backend,
//! since the entire point is a 32-bit-multiplier-only implementation for
//! microcontrollers, not a dispatch layer over faster desktop backends.

pub mod serial;
