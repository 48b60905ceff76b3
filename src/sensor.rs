//! Temperature sensor discovery and register access.
//!
//! The board can ship with one of several pin-compatible temperature sensors,
//! so the firmware does not hard-code an address: at boot it walks a fixed
//! catalog of candidates and locks onto the first one that acknowledges a
//! probe. The probe is a zero-length read (one selector byte written, nothing
//! clocked back), so it is safe against every candidate.

use crate::hal::{write_diag, BusError, I2cBus, Transport, TransportError};
use core::fmt::Write;
use heapless::Vec;
use static_assertions::const_assert;
use thiserror::Error;

/// Capacity of the probe log; the catalog must fit.
pub const MAX_CATALOG: usize = 8;

/// Result register LSB weight: 1/128 degree Celsius.
pub const LSB_CELSIUS: f32 = 0.007_812_5;

/// One candidate in the probe catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorDescriptor {
    /// 7-bit bus address.
    pub address: u8,
    /// Register holding the 16-bit temperature result.
    pub result_reg: u8,
    /// Marking on the package, for the discovery diagnostics.
    pub id: &'static str,
}

/// The candidates known to respond on this board family, in probe order.
pub const SENSOR_CATALOG: [SensorDescriptor; 3] = [
    SensorDescriptor {
        address: 0x48,
        result_reg: 0x00,
        id: "11X",
    },
    SensorDescriptor {
        address: 0x49,
        result_reg: 0x00,
        id: "116",
    },
    SensorDescriptor {
        address: 0x41,
        result_reg: 0x01,
        id: "006",
    },
];

const_assert!(SENSOR_CATALOG.len() <= MAX_CATALOG);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeRecord {
    pub address: u8,
    pub responded: bool,
}

pub type ProbeLog = Vec<ProbeRecord, MAX_CATALOG>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReadError {
    /// Discovery never found a device; permanent for this run.
    #[error("no active sensor")]
    NoActiveSensor,
    #[error("sensor read failed: {0}")]
    Bus(#[from] BusError),
}

/// Outcome of a discovery pass.
#[derive(Debug)]
pub struct Discovery {
    /// First responding candidate, if any. Immutable for the rest of the run.
    pub active: Option<SensorDescriptor>,
    /// Per-candidate outcomes, for diagnostics and tests.
    pub log: ProbeLog,
}

/// Probe the catalog in order, first acknowledging candidate wins.
///
/// Candidates after the winner are never addressed. A progress line per
/// attempt plus a final verdict go out over the transport; the transport is
/// the single diagnostic channel, so a failed write here is surfaced rather
/// than swallowed.
pub fn discover<B: I2cBus, T: Transport>(
    bus: &mut B,
    transport: &mut T,
    catalog: &[SensorDescriptor],
) -> Result<Discovery, TransportError> {
    transport.write_bytes(b"I2C sensor discovery\n")?;

    let mut log = ProbeLog::new();
    let mut active = None;

    for candidate in catalog {
        let responded = bus
            .transfer(candidate.address, &[candidate.result_reg], &mut [])
            .is_ok();
        let _ = log.push(ProbeRecord {
            address: candidate.address,
            responded,
        });
        write_diag(transport, |line| {
            let _ = writeln!(
                line,
                "  0x{:02X} ({})... {}",
                candidate.address,
                candidate.id,
                if responded { "found" } else { "no" }
            );
        })?;
        if responded {
            active = Some(*candidate);
            break;
        }
    }

    match active {
        Some(sensor) => write_diag(transport, |line| {
            let _ = writeln!(line, "active sensor: {}", sensor.id);
        })?,
        None => transport.write_bytes(b"no temperature sensor found\n")?,
    }

    Ok(Discovery { active, log })
}

/// Read the result register of the active sensor: one selector byte out, two
/// result bytes back, big-endian.
pub fn read_temperature<B: I2cBus>(
    bus: &mut B,
    sensor: &SensorDescriptor,
) -> Result<f32, ReadError> {
    let mut rx = [0u8; 2];
    bus.transfer(sensor.address, &[sensor.result_reg], &mut rx)?;
    Ok(raw_to_celsius(rx))
}

/// Convert a raw big-endian register value to degrees Celsius.
///
/// A set sign bit in the first byte marks a negative two's-complement
/// reading; the sign extension happens before scaling, not after.
pub fn raw_to_celsius(bytes: [u8; 2]) -> f32 {
    let raw = i16::from_be_bytes(bytes);
    f32::from(raw) * LSB_CELSIUS
}
