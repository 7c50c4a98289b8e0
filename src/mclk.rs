// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Main clock module (MCLK): bus clock gating for peripherals.
//!
//! Every peripheral sits behind a bit in one of the AHB/APB mask registers;
//! the bit must be set before the peripheral's registers are usable.

use tock_registers::interfaces::{Readable, Writeable};
use tock_registers::registers::ReadWrite;
use tock_registers::register_structs;

use crate::static_ref::StaticRef;

register_structs! {
    pub MclkRegisters {
        (0x000 => _reserved0),
        /// AHB bus clock mask
        (0x010 => pub ahbmask: ReadWrite<u32>),
        /// APBA..APBD bus clock masks. Power-domain ids count bits upward
        /// across these four words in order.
        (0x014 => pub apbmask: [ReadWrite<u32>; 4]),
        (0x024 => @END),
    }
}

pub const MCLK_BASE: StaticRef<MclkRegisters> =
    unsafe { StaticRef::new(0x4000_0800 as *const MclkRegisters) };

pub struct Mclk {
    registers: StaticRef<MclkRegisters>,
}

impl Mclk {
    pub const fn new(registers: StaticRef<MclkRegisters>) -> Mclk {
        Mclk { registers }
    }

    /// Un-gate the bus clock of the peripheral in power domain `pm_id`.
    /// Takes effect immediately; there is no status flag to wait on.
    pub fn enable_peripheral(&self, pm_id: usize) {
        let mask = &self.registers.apbmask[pm_id / 32];
        mask.set(mask.get() | 1 << (pm_id % 32));
    }
}
