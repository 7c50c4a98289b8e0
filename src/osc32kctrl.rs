// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! 32 kHz oscillators controller (OSC32KCTRL).
//!
//! Only the external 32.768 kHz crystal oscillator (XOSC32K) is driven here;
//! the always-on internal OSCULP32K needs no setup.

use tock_registers::interfaces::{Readable, Writeable};
use tock_registers::registers::ReadWrite;
use tock_registers::{register_bitfields, register_structs};

use crate::static_ref::StaticRef;
use crate::wait::WaitPolicy;

register_structs! {
    pub Osc32kCtrlRegisters {
        (0x000 => pub intenclr: ReadWrite<u32>),
        (0x004 => pub intenset: ReadWrite<u32>),
        (0x008 => pub intflag: ReadWrite<u32>),
        /// Oscillator status
        (0x00C => pub status: ReadWrite<u32, STATUS::Register>),
        /// RTC clock selection
        (0x010 => pub rtcctrl: ReadWrite<u8>),
        (0x011 => _reserved0),
        /// External 32.768 kHz crystal oscillator control
        (0x014 => pub xosc32k: ReadWrite<u16, XOSC32K::Register>),
        (0x016 => pub cfdctrl: ReadWrite<u8>),
        (0x017 => pub evctrl: ReadWrite<u8>),
        (0x018 => _reserved1),
        /// Ultra-low-power internal oscillator control
        (0x01C => pub osculp32k: ReadWrite<u32>),
        (0x020 => @END),
    }
}

register_bitfields![u32,
    pub STATUS [
        XOSC32KRDY OFFSET(0) NUMBITS(1) [],
        XOSC32KFAIL OFFSET(2) NUMBITS(1) [],
        XOSC32KSW OFFSET(3) NUMBITS(1) []
    ]
];

register_bitfields![u16,
    pub XOSC32K [
        ENABLE OFFSET(1) NUMBITS(1) [],
        XTALEN OFFSET(2) NUMBITS(1) [],
        EN32K OFFSET(3) NUMBITS(1) [],
        EN1K OFFSET(4) NUMBITS(1) [],
        RUNSTDBY OFFSET(6) NUMBITS(1) [],
        ONDEMAND OFFSET(7) NUMBITS(1) [],
        STARTUP OFFSET(8) NUMBITS(3) [],
        WRTLOCK OFFSET(12) NUMBITS(1) [],
        /// Control gain mode
        CGM OFFSET(13) NUMBITS(2) [
            Standard = 1,
            HighSpeed = 2
        ]
    ]
];

pub const OSC32KCTRL_BASE: StaticRef<Osc32kCtrlRegisters> =
    unsafe { StaticRef::new(0x4000_1400 as *const Osc32kCtrlRegisters) };

pub struct Osc32kCtrl<'a> {
    registers: StaticRef<Osc32kCtrlRegisters>,
    wait: &'a dyn WaitPolicy,
}

impl<'a> Osc32kCtrl<'a> {
    pub const fn new(
        registers: StaticRef<Osc32kCtrlRegisters>,
        wait: &'a dyn WaitPolicy,
    ) -> Osc32kCtrl<'a> {
        Osc32kCtrl { registers, wait }
    }

    /// Start the external 32.768 kHz crystal and block until it has
    /// stabilized. Crystal startup is on the order of a second; a crystal
    /// that never becomes ready blocks forever.
    pub fn enable_xosc32k(&self) {
        self.registers.xosc32k.write(
            XOSC32K::ENABLE::SET
                + XOSC32K::XTALEN::SET
                + XOSC32K::EN32K::SET
                + XOSC32K::CGM::Standard,
        );
        self.wait
            .wait_until(&mut || self.registers.status.is_set(STATUS::XOSC32KRDY));
    }
}
