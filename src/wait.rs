// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2024.

//! Busy-wait primitive behind every hardware status poll.
//!
//! Clock bring-up blocks on a series of hardware status flags (oscillator
//! ready, PLL lock, write synchronization). All of those polls go through
//! [`WaitPolicy`] so the iteration strategy is chosen by whoever constructs
//! the drivers: hardware uses the unbounded [`SpinWait`], unit tests inject a
//! policy that advances a simulated device a bounded number of times.

/// Strategy for blocking until a hardware condition holds.
pub trait WaitPolicy {
    /// Block until `ready` returns true.
    fn wait_until(&self, ready: &mut dyn FnMut() -> bool);
}

/// Unbounded busy-wait, the hardware policy.
///
/// There is deliberately no timeout: none of the waited-on conditions can
/// fail transiently, so a flag that never sets means the clock tree cannot
/// be brought to its documented state and execution must not proceed.
pub struct SpinWait;

impl WaitPolicy for SpinWait {
    fn wait_until(&self, ready: &mut dyn FnMut() -> bool) {
        while !ready() {}
    }
}
