// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Clock support for the Microchip ATSAMD51 (Cortex-M4F) MCU family:
//! bring-up of the clock tree from reset and peripheral clock
//! routing/gating for the drivers that come after it.

#![no_std]

#[cfg(test)]
extern crate std;

pub mod clocks;
pub mod cmcc;
pub mod gclk;
pub mod mclk;
pub mod osc32kctrl;
pub mod oscctrl;
pub mod static_ref;
pub mod wait;
