// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Oscillators controller (OSCCTRL): the DFLL48M and the two FDPLL200M
//! fractional PLLs.
//!
//! Both oscillator types take their reference from a dedicated GCLK
//! peripheral channel, which must be routed before the oscillator is
//! enabled. DFLL configuration registers synchronize individually through
//! `DFLLSYNC`; each PLL has its own `SYNCBUSY`.

use tock_registers::interfaces::{Readable, Writeable};
use tock_registers::registers::ReadWrite;
use tock_registers::{register_bitfields, register_structs};

use crate::static_ref::StaticRef;
use crate::wait::WaitPolicy;

register_structs! {
    pub DpllRegisters {
        (0x000 => pub ctrla: ReadWrite<u8, DPLLCTRLA::Register>),
        (0x001 => _reserved0),
        /// Loop divider ratio
        (0x004 => pub ratio: ReadWrite<u32, DPLLRATIO::Register>),
        (0x008 => pub ctrlb: ReadWrite<u32, DPLLCTRLB::Register>),
        (0x00C => pub syncbusy: ReadWrite<u32, DPLLSYNCBUSY::Register>),
        (0x010 => pub status: ReadWrite<u32, DPLLSTATUS::Register>),
        (0x014 => @END),
    },
    pub OscctrlRegisters {
        (0x000 => pub evctrl: ReadWrite<u8>),
        (0x001 => _reserved0),
        (0x004 => pub intenclr: ReadWrite<u32>),
        (0x008 => pub intenset: ReadWrite<u32>),
        (0x00C => pub intflag: ReadWrite<u32>),
        /// Oscillator status
        (0x010 => pub status: ReadWrite<u32, STATUS::Register>),
        (0x014 => pub dfllctrla: ReadWrite<u8, DFLLCTRLA::Register>),
        (0x015 => pub dfllctrlb: ReadWrite<u8, DFLLCTRLB::Register>),
        (0x016 => _reserved1),
        (0x018 => pub dfllval: ReadWrite<u32, DFLLVAL::Register>),
        (0x01C => pub dfllmul: ReadWrite<u32, DFLLMUL::Register>),
        /// DFLL write-synchronization status
        (0x020 => pub dfllsync: ReadWrite<u8, DFLLSYNC::Register>),
        (0x021 => _reserved2),
        /// The two fractional PLLs
        (0x030 => pub dpll: [DpllRegisters; 2]),
        (0x058 => @END),
    }
}

register_bitfields![u32,
    pub STATUS [
        XOSCRDY0 OFFSET(0) NUMBITS(1) [],
        XOSCRDY1 OFFSET(1) NUMBITS(1) [],
        DFLLRDY OFFSET(8) NUMBITS(1) [],
        DFLLLCKC OFFSET(10) NUMBITS(1) [],
        DFLLLCKF OFFSET(11) NUMBITS(1) []
    ],
    pub DFLLVAL [
        FINE OFFSET(0) NUMBITS(8) [],
        COARSE OFFSET(10) NUMBITS(6) []
    ],
    pub DFLLMUL [
        MUL OFFSET(0) NUMBITS(16) [],
        FSTEP OFFSET(16) NUMBITS(10) [],
        CSTEP OFFSET(26) NUMBITS(6) []
    ],
    pub DPLLRATIO [
        LDR OFFSET(0) NUMBITS(13) [],
        LDRFRAC OFFSET(16) NUMBITS(5) []
    ],
    pub DPLLCTRLB [
        FILTER OFFSET(0) NUMBITS(4) [],
        WUF OFFSET(4) NUMBITS(1) [],
        REFCLK OFFSET(5) NUMBITS(3) [
            Gclk = 0,
            Xosc32k = 1,
            Xosc0 = 2,
            Xosc1 = 3
        ],
        LTIME OFFSET(8) NUMBITS(3) [],
        LBYPASS OFFSET(11) NUMBITS(1) [],
        DCOFILTER OFFSET(12) NUMBITS(3) [],
        DCOEN OFFSET(15) NUMBITS(1) [],
        DIV OFFSET(16) NUMBITS(11) []
    ],
    pub DPLLSYNCBUSY [
        ENABLE OFFSET(1) NUMBITS(1) [],
        DPLLRATIO OFFSET(2) NUMBITS(1) []
    ],
    pub DPLLSTATUS [
        LOCK OFFSET(0) NUMBITS(1) [],
        CLKRDY OFFSET(1) NUMBITS(1) []
    ]
];

register_bitfields![u8,
    pub DPLLCTRLA [
        ENABLE OFFSET(1) NUMBITS(1) [],
        RUNSTDBY OFFSET(6) NUMBITS(1) [],
        ONDEMAND OFFSET(7) NUMBITS(1) []
    ],
    pub DFLLCTRLA [
        ENABLE OFFSET(1) NUMBITS(1) [],
        RUNSTDBY OFFSET(6) NUMBITS(1) [],
        ONDEMAND OFFSET(7) NUMBITS(1) []
    ],
    pub DFLLCTRLB [
        /// Open loop (0) or closed loop (1)
        MODE OFFSET(0) NUMBITS(1) [],
        STABLE OFFSET(1) NUMBITS(1) [],
        LLAW OFFSET(2) NUMBITS(1) [],
        USBCRM OFFSET(3) NUMBITS(1) [],
        CCDIS OFFSET(4) NUMBITS(1) [],
        QLDIS OFFSET(5) NUMBITS(1) [],
        BPLCKC OFFSET(6) NUMBITS(1) [],
        WAITLOCK OFFSET(7) NUMBITS(1) []
    ],
    pub DFLLSYNC [
        ENABLE OFFSET(1) NUMBITS(1) [],
        DFLLCTRLB OFFSET(2) NUMBITS(1) [],
        DFLLVAL OFFSET(3) NUMBITS(1) [],
        DFLLMUL OFFSET(4) NUMBITS(1) []
    ]
];

pub const OSCCTRL_BASE: StaticRef<OscctrlRegisters> =
    unsafe { StaticRef::new(0x4000_1000 as *const OscctrlRegisters) };

/// The two FDPLL instances.
#[derive(Clone, Copy, PartialEq, Debug)]
#[repr(usize)]
pub enum DpllInstance {
    Dpll0 = 0,
    Dpll1 = 1,
}

pub struct Oscctrl<'a> {
    registers: StaticRef<OscctrlRegisters>,
    wait: &'a dyn WaitPolicy,
}

impl<'a> Oscctrl<'a> {
    pub const fn new(
        registers: StaticRef<OscctrlRegisters>,
        wait: &'a dyn WaitPolicy,
    ) -> Oscctrl<'a> {
        Oscctrl { registers, wait }
    }

    /// Program `pll` to multiply its GCLK reference by `mult` and enable it,
    /// blocking until it reports lock and a ready output clock.
    ///
    /// The reference channel must already be routed, and the ratio write
    /// must be acknowledged before the enable bit is set.
    pub fn dpll_init(&self, pll: DpllInstance, mult: u32) {
        let dpll = &self.registers.dpll[pll as usize];
        dpll.ratio.write(DPLLRATIO::LDR.val(mult - 1));
        self.wait
            .wait_until(&mut || !dpll.syncbusy.is_set(DPLLSYNCBUSY::DPLLRATIO));
        // Lock bypass: the lock signal can chatter at a 32 kHz reference,
        // gating the output on it would drop clocks mid-run.
        dpll.ctrlb
            .write(DPLLCTRLB::REFCLK::Gclk + DPLLCTRLB::LBYPASS::SET);
        dpll.ctrla.write(DPLLCTRLA::ENABLE::SET);
        self.wait.wait_until(&mut || {
            dpll.status
                .matches_all(DPLLSTATUS::LOCK::SET + DPLLSTATUS::CLKRDY::SET)
        });
    }

    /// Stop the DFLL. Required before its multiplier or mode can be
    /// rewritten; the chip boots with it running open loop at 48 MHz.
    pub fn dfll_disable(&self) {
        self.registers.dfllctrla.set(0);
    }

    /// Bring the DFLL up in closed-loop mode, multiplying its GCLK reference
    /// by `mult`, and block until it is ready. The DFLL must be disabled and
    /// its reference channel routed.
    pub fn dfll_init_closed_loop(&self, mult: u32) {
        self.registers
            .dfllmul
            .write(DFLLMUL::MUL.val(mult) + DFLLMUL::CSTEP.val(31) + DFLLMUL::FSTEP.val(511));
        self.wait
            .wait_until(&mut || !self.registers.dfllsync.is_set(DFLLSYNC::DFLLMUL));
        self.registers
            .dfllctrlb
            .write(DFLLCTRLB::MODE::SET + DFLLCTRLB::QLDIS::SET + DFLLCTRLB::WAITLOCK::SET);
        self.wait
            .wait_until(&mut || !self.registers.dfllsync.is_set(DFLLSYNC::DFLLCTRLB));
        self.registers.dfllctrla.write(DFLLCTRLA::ENABLE::SET);
        self.wait
            .wait_until(&mut || self.registers.status.is_set(STATUS::DFLLRDY));
    }
}
