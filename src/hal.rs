//! Peripheral collaborator traits.
//!
//! The controller never touches hardware directly; it talks to these three
//! interfaces. On a real board they would wrap the vendor I2C/GPIO/UART
//! drivers, here the [`crate::sim`] module implements them in software.

use arrayvec::ArrayString;
use thiserror::Error;

/// Diagnostic lines share one bounded buffer size, like the 64-byte scratch
/// buffer on the original firmware.
pub const DIAG_LINE_MAX: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BusError {
    /// No device acknowledged at the addressed target.
    #[error("no acknowledge from device at address 0x{0:02X}")]
    Nack(u8),
    /// The transaction started but did not complete.
    #[error("bus transaction failed at address 0x{0:02X}")]
    TransferFailed(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("transport write failed")]
    WriteFailed,
}

/// Single-master I2C-style transaction bus.
///
/// At most one transaction is in flight system-wide; the call blocks the
/// cooperative loop until the transfer completes. `write` is transmitted
/// first, then `read.len()` bytes are clocked back (zero-length reads are
/// valid and used as presence probes).
pub trait I2cBus {
    fn transfer(&mut self, address: u8, write: &[u8], read: &mut [u8]) -> Result<(), BusError>;
}

/// The heater actuator output (an LED on the original launchpad).
pub trait HeaterPin {
    fn set(&mut self, on: bool);
    /// Read back the driven level, used when formatting the telegram.
    fn is_on(&self) -> bool;
}

/// Byte-stream transport (UART-like). Carries both the periodic telegrams
/// and the human-readable diagnostics; there is no separate error channel.
pub trait Transport {
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), TransportError>;
}

/// Build a bounded diagnostic line and push it out the transport.
pub(crate) fn write_diag<T: Transport>(
    transport: &mut T,
    fill: impl FnOnce(&mut ArrayString<DIAG_LINE_MAX>),
) -> Result<(), TransportError> {
    let mut line = ArrayString::<DIAG_LINE_MAX>::new();
    fill(&mut line);
    transport.write_bytes(line.as_bytes())
}
