// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Generic clock controller (GCLK).
//!
//! The GCLK owns twelve clock generators, each dividing one oscillator or
//! PLL output, and 48 peripheral channels that connect a peripheral's clock
//! request to one of the generators. Generator-control writes cross into the
//! generator's clock domain and are only in effect once the matching
//! `SYNCBUSY` bit clears; channel writes are in effect once the channel
//! register reads back the written value.

use tock_registers::fields::FieldValue;
use tock_registers::interfaces::{Readable, Writeable};
use tock_registers::registers::ReadWrite;
use tock_registers::{register_bitfields, register_structs};

use crate::static_ref::StaticRef;
use crate::wait::WaitPolicy;

register_structs! {
    pub GclkRegisters {
        /// Controller control (software reset)
        (0x000 => pub ctrla: ReadWrite<u8, CTRLA::Register>),
        (0x001 => _reserved0),
        /// Write-synchronization status
        (0x004 => pub syncbusy: ReadWrite<u32, SYNCBUSY::Register>),
        (0x008 => _reserved1),
        /// Generator control, one register per generator
        (0x020 => pub genctrl: [ReadWrite<u32, GENCTRL::Register>; 12]),
        (0x050 => _reserved2),
        /// Peripheral channel control, one register per channel
        (0x080 => pub pchctrl: [ReadWrite<u32, PCHCTRL::Register>; 48]),
        (0x140 => @END),
    }
}

register_bitfields![u8,
    pub CTRLA [
        SWRST OFFSET(0) NUMBITS(1) []
    ]
];

register_bitfields![u32,
    pub SYNCBUSY [
        SWRST OFFSET(0) NUMBITS(1) [],
        /// One bit per generator, set while a GENCTRL write is synchronizing
        GENCTRL OFFSET(2) NUMBITS(12) []
    ],
    pub GENCTRL [
        SRC OFFSET(0) NUMBITS(5) [],
        GENEN OFFSET(8) NUMBITS(1) [],
        IDC OFFSET(9) NUMBITS(1) [],
        OOV OFFSET(10) NUMBITS(1) [],
        OE OFFSET(11) NUMBITS(1) [],
        DIVSEL OFFSET(12) NUMBITS(1) [],
        RUNSTDBY OFFSET(13) NUMBITS(1) [],
        DIV OFFSET(16) NUMBITS(16) []
    ],
    pub PCHCTRL [
        GEN OFFSET(0) NUMBITS(4) [],
        CHEN OFFSET(6) NUMBITS(1) [],
        WRTLOCK OFFSET(7) NUMBITS(1) []
    ]
];

pub const GCLK_BASE: StaticRef<GclkRegisters> =
    unsafe { StaticRef::new(0x4000_1C00 as *const GclkRegisters) };

/// Generator input selection (GENCTRL.SRC encoding).
#[derive(Clone, Copy, PartialEq, Debug)]
#[repr(u32)]
pub enum ClockSource {
    Xosc0 = 0x00,
    Xosc1 = 0x01,
    GclkIn = 0x02,
    GclkGen1 = 0x03,
    Osculp32k = 0x04,
    Xosc32k = 0x05,
    Dfll = 0x06,
    Dpll0 = 0x07,
    Dpll1 = 0x08,
}

/// The six generators the bring-up sequences configure, by hardware id.
#[derive(Clone, Copy, PartialEq, Debug)]
#[repr(usize)]
pub enum ClockGenerator {
    /// Generator 0, the CPU and main bus clock.
    Main = 0,
    /// Generator 1, 200 MHz rail for the fast timers.
    Mhz200 = 1,
    /// Generator 2, 32.768 kHz PLL reference.
    Khz32 = 2,
    /// Generator 3, 48 MHz rail (USB).
    Mhz48 = 3,
    /// Generator 4, 2 MHz PLL reference for the crystal-less bring-up.
    Mhz2 = 4,
    /// Generator 5, 100 MHz default peripheral rail.
    Mhz100 = 5,
}

pub struct Gclk<'a> {
    registers: StaticRef<GclkRegisters>,
    wait: &'a dyn WaitPolicy,
}

impl<'a> Gclk<'a> {
    pub const fn new(registers: StaticRef<GclkRegisters>, wait: &'a dyn WaitPolicy) -> Gclk<'a> {
        Gclk { registers, wait }
    }

    /// Reset the whole controller: all generators off, all channels
    /// disconnected.
    pub fn reset(&self) {
        self.registers.ctrla.write(CTRLA::SWRST::SET);
        self.wait
            .wait_until(&mut || !self.registers.syncbusy.is_set(SYNCBUSY::SWRST));
    }

    /// Configure `gen` to run undivided from `source` and enable it.
    pub fn gen_clock(&self, gen: ClockGenerator, source: ClockSource) {
        self.write_genctrl(gen, GENCTRL::SRC.val(source as u32) + GENCTRL::GENEN::SET);
    }

    /// Configure `gen` to run from `source` divided by `div` and enable it.
    pub fn gen_clock_divided(&self, gen: ClockGenerator, source: ClockSource, div: u32) {
        self.write_genctrl(
            gen,
            GENCTRL::SRC.val(source as u32) + GENCTRL::GENEN::SET + GENCTRL::DIV.val(div),
        );
    }

    fn write_genctrl(&self, gen: ClockGenerator, control: FieldValue<u32, GENCTRL::Register>) {
        // Single combined write: enable bit and configuration must land
        // together so the generator never runs with a half-written setup.
        self.registers.genctrl[gen as usize].write(control);
        self.wait.wait_until(&mut || {
            (self.registers.syncbusy.read(SYNCBUSY::GENCTRL) & (1 << gen as usize)) == 0
        });
    }

    /// Connect peripheral channel `pclk_id` to `gen` and enable it. The
    /// generator must already be enabled and synced.
    pub fn route_pclock(&self, pclk_id: usize, gen: ClockGenerator) {
        let control = PCHCTRL::GEN.val(gen as u32) + PCHCTRL::CHEN::SET;
        self.registers.pchctrl[pclk_id].write(control);
        self.wait
            .wait_until(&mut || self.registers.pchctrl[pclk_id].matches_all(control));
    }
}
