//! Status telegram encoder.
//!
//! One line per consumed tick, fixed shape:
//!
//! ```text
//! <RR,SS,H,TTTT>\n
//! ```
//!
//! RR = room temperature, SS = set-point (both minimum-width-2 zero-padded
//! signed decimal; negative or three-digit values widen as needed), H = heater
//! state as a single 0/1 digit, TTTT = seconds counter, minimum-width-4
//! zero-padded.

use arrayvec::ArrayString;
use core::fmt::Write;
use static_assertions::const_assert;

/// Worst case: two 11-char i32s, a 10-char u32, punctuation and newline.
pub const TELEGRAM_MAX: usize = 40;

const_assert!(TELEGRAM_MAX >= 2 * 11 + 10 + 1 + 6);

pub type Telegram = ArrayString<TELEGRAM_MAX>;

/// Pure formatting function; no side effects beyond building the line.
pub fn encode(room_c: i32, set_point_c: i32, heater_on: bool, seconds: u32) -> Telegram {
    let mut line = Telegram::new();
    // Buffer is sized for the widest possible fields, the write cannot fail.
    let _ = writeln!(
        line,
        "<{:02},{:02},{},{:04}>",
        room_c,
        set_point_c,
        u8::from(heater_on),
        seconds
    );
    line
}
