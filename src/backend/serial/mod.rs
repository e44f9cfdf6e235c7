// -*- mode: rust; -*-
//
// This file is part of curve25519-mcu.
// See LICENSE for licensing information.

//! Serial backends, grouped by native word size. Only `u32` is implemented;
//! the module nesting mirrors the teacher's `backend::serial::{u32, u64,
//! avx2, ...}` layout in case a wider-word backend is ever worth adding.

pub mod u32;
