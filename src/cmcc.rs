// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Cortex-M cache controller (CMCC).

use tock_registers::interfaces::Writeable;
use tock_registers::registers::ReadWrite;
use tock_registers::{register_bitfields, register_structs};

use crate::static_ref::StaticRef;

register_structs! {
    pub CmccRegisters {
        (0x000 => _reserved0),
        /// Cache control
        (0x008 => pub ctrl: ReadWrite<u32, CTRL::Register>),
        (0x00C => @END),
    }
}

register_bitfields![u32,
    pub CTRL [
        CEN OFFSET(0) NUMBITS(1) []
    ]
];

pub const CMCC_BASE: StaticRef<CmccRegisters> =
    unsafe { StaticRef::new(0x4100_6000 as *const CmccRegisters) };

pub struct Cmcc {
    registers: StaticRef<CmccRegisters>,
}

impl Cmcc {
    pub const fn new(registers: StaticRef<CmccRegisters>) -> Cmcc {
        Cmcc { registers }
    }

    /// Enable the instruction/data cache. Takes effect immediately.
    pub fn enable(&self) {
        self.registers.ctrl.write(CTRL::CEN::SET);
    }
}
