//! State shared between interrupt context and the cooperative loop.
//!
//! Three cells cross the ISR/main-loop boundary: the timer flag, the seconds
//! counter, and the set-point. Each has exactly one interrupt-side writer and
//! the control loop as sole reader (the flag is the one exception: the loop
//! clears it), so plain sequentially-consistent atomics are sufficient and no
//! lock is ever taken — ISR context cannot block.

use std::sync::atomic::{AtomicBool, AtomicI32, AtomicU32, Ordering};

/// Default target temperature on every boot, degrees Celsius.
pub const DEFAULT_SET_POINT_C: i32 = 25;

#[derive(Debug)]
pub struct SharedState {
    /// Set by the tick callback, consumed (swapped false) by the loop. At
    /// most one pending tick is representable: a second expiry before the
    /// loop gets around to it coalesces and is lost for scheduling, while
    /// `time_counter` still advances. Accepted skew, not a bug.
    timer_flag: AtomicBool,
    /// Whole seconds since boot; wraps silently at u32::MAX.
    time_counter: AtomicU32,
    /// User-adjustable target temperature. Deliberately unclamped.
    set_point: AtomicI32,
}

impl SharedState {
    pub fn new() -> Self {
        Self {
            timer_flag: AtomicBool::new(false),
            time_counter: AtomicU32::new(0),
            set_point: AtomicI32::new(DEFAULT_SET_POINT_C),
        }
    }

    /// Timer interrupt entry point, called once per 1 s period expiry.
    pub fn tick(&self) {
        self.timer_flag.store(true, Ordering::SeqCst);
        // fetch_add wraps on overflow for atomics
        self.time_counter.fetch_add(1, Ordering::SeqCst);
    }

    /// Consume a pending tick. Returns true at most once per `tick()`.
    pub fn take_tick(&self) -> bool {
        self.timer_flag.swap(false, Ordering::SeqCst)
    }

    pub fn seconds(&self) -> u32 {
        self.time_counter.load(Ordering::SeqCst)
    }

    /// Raise-button interrupt entry point (SW4 on the original board).
    pub fn button_raise(&self) {
        self.set_point.fetch_add(1, Ordering::SeqCst);
    }

    /// Lower-button interrupt entry point (SW2 on the original board).
    pub fn button_lower(&self) {
        self.set_point.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn set_point(&self) -> i32 {
        self.set_point.load(Ordering::SeqCst)
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}
