// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Clock tree bring-up and peripheral clock distribution.
//!
//! [`Clocks::init`] takes the chip from its reset state (CPU on the
//! open-loop DFLL) to a fixed clock tree:
//!
//! - generator 0: 120 MHz from FDPLL0, the CPU and main bus clock
//! - generator 1: 200 MHz from FDPLL1, for the fast timers
//! - generator 2: 32.768 kHz reference (crystal bring-up only)
//! - generator 3: 48 MHz from the DFLL, for USB
//! - generator 4: 2 MHz reference (crystal-less bring-up only)
//! - generator 5: 100 MHz (FDPLL1 divided by two), the default peripheral
//!   clock
//!
//! With an external 32.768 kHz crystal both PLLs and the closed-loop DFLL
//! are referenced from it; without one, everything derives from the
//! factory-calibrated open-loop DFLL through a 2 MHz generator. Either way
//! the resulting tree is the same, so the rest of the system never needs to
//! know which reference the board has.
//!
//! After `init`, peripheral drivers use [`Clocks::enable_pclock`] to connect
//! their GCLK channel and un-gate their bus clock, and
//! [`Clocks::get_pclock_frequency`] to learn the rate they were given.

use crate::cmcc::{Cmcc, CMCC_BASE};
use crate::gclk::{ClockGenerator, ClockSource, Gclk, GCLK_BASE};
use crate::mclk::{Mclk, MCLK_BASE};
use crate::osc32kctrl::{Osc32kCtrl, OSC32KCTRL_BASE};
use crate::oscctrl::{DpllInstance, Oscctrl, OSCCTRL_BASE};
use crate::wait::WaitPolicy;

/// Nominal generator output frequencies once `init` has completed.
pub const FREQ_MAIN: u32 = 120_000_000;
pub const FREQ_200M: u32 = 200_000_000;
pub const FREQ_32K: u32 = 32_768;
pub const FREQ_48M: u32 = 48_000_000;
pub const FREQ_2M: u32 = 2_000_000;
pub const FREQ_100M: u32 = 100_000_000;

/// GCLK peripheral channel ids with a dedicated role in the tree.
pub const PCLK_ID_DFLL48: usize = 0;
pub const PCLK_ID_FDPLL0: usize = 1;
pub const PCLK_ID_FDPLL1: usize = 2;
/// TC0 and TC1 share one peripheral channel.
pub const PCLK_ID_TC0: usize = 9;
pub const PCLK_ID_TC1: usize = 9;
pub const PCLK_ID_USB: usize = 10;

/// Reference the clock tree is built from, chosen by the board at its
/// single `init` call site.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum SystemClockSource {
    /// External 32.768 kHz crystal on the XIN32/XOUT32 pins.
    Xosc32k,
    /// No crystal: the factory-calibrated internal DFLL48M.
    Dfll48m,
}

impl ClockGenerator {
    /// Nominal output frequency once `init` has completed.
    pub fn frequency(self) -> u32 {
        match self {
            ClockGenerator::Main => FREQ_MAIN,
            ClockGenerator::Mhz200 => FREQ_200M,
            ClockGenerator::Khz32 => FREQ_32K,
            ClockGenerator::Mhz48 => FREQ_48M,
            ClockGenerator::Mhz2 => FREQ_2M,
            ClockGenerator::Mhz100 => FREQ_100M,
        }
    }
}

/// Generator a peripheral channel is served from. Routing and the frequency
/// lookup both resolve through this single table.
fn pclock_generator(pclk_id: usize) -> ClockGenerator {
    match pclk_id {
        PCLK_ID_TC0 => ClockGenerator::Mhz200,
        PCLK_ID_USB => ClockGenerator::Mhz48,
        _ => ClockGenerator::Mhz100,
    }
}

/// Division with round-half-away-from-zero, for PLL/DFLL multiplier
/// selection. Plain truncation would bias every derived clock low.
const fn div_round_closest(n: u32, d: u32) -> u32 {
    (n + d / 2) / d
}

pub struct Clocks<'a> {
    gclk: Gclk<'a>,
    mclk: Mclk,
    oscctrl: Oscctrl<'a>,
    osc32kctrl: Osc32kCtrl<'a>,
    cmcc: Cmcc,
}

impl<'a> Clocks<'a> {
    /// Driver over the hardware register blocks.
    pub const fn new(wait: &'a dyn WaitPolicy) -> Clocks<'a> {
        Clocks {
            gclk: Gclk::new(GCLK_BASE, wait),
            mclk: Mclk::new(MCLK_BASE),
            oscctrl: Oscctrl::new(OSCCTRL_BASE, wait),
            osc32kctrl: Osc32kCtrl::new(OSC32KCTRL_BASE, wait),
            cmcc: Cmcc::new(CMCC_BASE),
        }
    }

    /// Bring the clock tree up from reset.
    ///
    /// Blocks until every oscillator and PLL in the chosen tree reports
    /// ready; a dead crystal or unlockable PLL blocks forever rather than
    /// running at an unknown frequency.
    ///
    /// ## Safety
    ///
    /// Must run exactly once, directly after reset, before interrupts are
    /// enabled and before anything consumes a peripheral clock. Re-running
    /// it on a configured tree is undefined: the PLL and DFLL enable
    /// sequences assume the reset state of their blocks.
    pub unsafe fn init(&self, source: SystemClockSource) {
        self.gclk.reset();
        match source {
            SystemClockSource::Xosc32k => self.init_xosc32k(),
            SystemClockSource::Dfll48m => self.init_internal(),
        }
        self.cmcc.enable();
    }

    /// Build the tree from the external 32.768 kHz crystal.
    fn init_xosc32k(&self) {
        self.osc32kctrl.enable_xosc32k();
        self.gclk
            .gen_clock(ClockGenerator::Khz32, ClockSource::Xosc32k);

        // 120 MHz CPU clock on FDPLL0.
        self.gclk
            .route_pclock(PCLK_ID_FDPLL0, ClockGenerator::Khz32);
        self.oscctrl
            .dpll_init(DpllInstance::Dpll0, div_round_closest(FREQ_MAIN, FREQ_32K));
        self.gclk.gen_clock(ClockGenerator::Main, ClockSource::Dpll0);

        // 200 MHz on FDPLL1, 100 MHz by division from it.
        self.gclk
            .route_pclock(PCLK_ID_FDPLL1, ClockGenerator::Khz32);
        self.oscctrl
            .dpll_init(DpllInstance::Dpll1, div_round_closest(FREQ_200M, FREQ_32K));
        self.gclk
            .gen_clock(ClockGenerator::Mhz200, ClockSource::Dpll1);
        self.gclk.gen_clock_divided(
            ClockGenerator::Mhz100,
            ClockSource::Dpll1,
            div_round_closest(FREQ_200M, FREQ_100M),
        );

        // Re-lock the DFLL against the crystal for an accurate 48 MHz.
        self.oscctrl.dfll_disable();
        self.gclk
            .route_pclock(PCLK_ID_DFLL48, ClockGenerator::Khz32);
        self.oscctrl
            .dfll_init_closed_loop(div_round_closest(FREQ_48M, FREQ_32K));
        self.gclk.gen_clock(ClockGenerator::Mhz48, ClockSource::Dfll);
    }

    /// Build the tree with no crystal: the factory-calibrated DFLL feeds a
    /// 2 MHz generator that serves as both PLL references.
    fn init_internal(&self) {
        self.gclk.gen_clock(ClockGenerator::Mhz48, ClockSource::Dfll);
        self.gclk.gen_clock_divided(
            ClockGenerator::Mhz2,
            ClockSource::Dfll,
            div_round_closest(FREQ_48M, FREQ_2M),
        );

        self.gclk.route_pclock(PCLK_ID_FDPLL0, ClockGenerator::Mhz2);
        self.oscctrl
            .dpll_init(DpllInstance::Dpll0, div_round_closest(FREQ_MAIN, FREQ_2M));
        self.gclk.gen_clock(ClockGenerator::Main, ClockSource::Dpll0);

        self.gclk.route_pclock(PCLK_ID_FDPLL1, ClockGenerator::Mhz2);
        self.oscctrl
            .dpll_init(DpllInstance::Dpll1, div_round_closest(FREQ_200M, FREQ_2M));
        self.gclk
            .gen_clock(ClockGenerator::Mhz200, ClockSource::Dpll1);
        self.gclk.gen_clock_divided(
            ClockGenerator::Mhz100,
            ClockSource::Dpll1,
            div_round_closest(FREQ_200M, FREQ_100M),
        );
    }

    /// Connect peripheral channel `pclk_id` to its generator and un-gate
    /// the bus clock of power domain `pm_id`. Routing happens before the
    /// bus clock starts so the peripheral never sees a half-configured
    /// clock. Valid only after `init`.
    pub fn enable_pclock(&self, pclk_id: usize, pm_id: usize) {
        self.gclk.route_pclock(pclk_id, pclock_generator(pclk_id));
        self.mclk.enable_peripheral(pm_id);
    }

    /// Frequency of the clock `enable_pclock` serves this channel with.
    /// Pure lookup, usable before the channel is enabled.
    pub fn get_pclock_frequency(&self, pclk_id: usize) -> u32 {
        pclock_generator(pclk_id).frequency()
    }

    /// CPU clock frequency once `init` has completed.
    pub fn main_clock_frequency(&self) -> u32 {
        ClockGenerator::Main.frequency()
    }
}
