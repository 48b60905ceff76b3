//! The thermostat control loop.
//!
//! A single cooperative loop layered under two interrupt sources (the 1 Hz
//! timer and the set-point buttons, see [`crate::shared`]). Each consumed
//! tick runs one pass of the cyclic state machine:
//!
//! ```text
//! WAIT_TICK -> SAMPLE -> ACTUATE -> REPORT -> WAIT_TICK
//! ```
//!
//! The loop never terminates on its own and degrades rather than halts: a
//! failed sample is reported over the transport and the previous room
//! temperature is reused for that pass. Only peripheral bring-up failures are
//! fatal, and those surface before the loop starts.

use crate::hal::{write_diag, HeaterPin, I2cBus, Transport, TransportError};
use crate::sensor::{self, ProbeLog, ReadError, SensorDescriptor};
use crate::shared::SharedState;
use crate::telegram::{self, Telegram};
use core::fmt::Write;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ControllerError {
    /// The diagnostic/telegram channel itself failed; nothing sensible can
    /// be reported without it.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Loop counters, exposed for tests and the simulator status display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControllerStats {
    pub telegrams_sent: u32,
    pub samples_ok: u32,
    pub samples_failed: u32,
}

/// The controller owns every peripheral it needs plus all loop-side state;
/// nothing lives in globals. Interrupt-side state comes in through the shared
/// aggregate.
pub struct ThermostatController<B, P, T> {
    bus: B,
    heater: P,
    transport: T,
    shared: Arc<SharedState>,
    catalog: &'static [SensorDescriptor],

    /// Set once by discovery, immutable afterwards. `None` means the run is
    /// permanently degraded and every sample reports a read error.
    active_sensor: Option<SensorDescriptor>,
    probe_log: ProbeLog,
    /// Most recent successful sample, whole degrees. Stale on read failure.
    room_temp_c: i32,
    stats: ControllerStats,
}

impl<B, P, T> ThermostatController<B, P, T>
where
    B: I2cBus,
    P: HeaterPin,
    T: Transport,
{
    pub fn new(
        bus: B,
        heater: P,
        transport: T,
        shared: Arc<SharedState>,
        catalog: &'static [SensorDescriptor],
    ) -> Self {
        Self {
            bus,
            heater,
            transport,
            shared,
            catalog,
            active_sensor: None,
            probe_log: ProbeLog::new(),
            room_temp_c: 0,
            stats: ControllerStats::default(),
        }
    }

    /// Run sensor discovery. Called once before the loop; a catalog with no
    /// responder is not an error here — the loop runs degraded instead.
    pub fn start(&mut self) -> Result<(), ControllerError> {
        let discovery = sensor::discover(&mut self.bus, &mut self.transport, self.catalog)?;
        self.active_sensor = discovery.active;
        self.probe_log = discovery.log;
        Ok(())
    }

    /// One WAIT_TICK poll. Returns `Ok(None)` when no tick is pending, and
    /// the telegram emitted for the pass otherwise.
    pub fn service(&mut self) -> Result<Option<Telegram>, ControllerError> {
        if !self.shared.take_tick() {
            return Ok(None);
        }

        // SAMPLE: on failure keep the stale value and fall through to
        // REPORT; no retry within the tick.
        match self.sample() {
            Ok(celsius) => {
                self.room_temp_c = celsius as i32;
                self.stats.samples_ok += 1;
                // ACTUATE: strict less-than, no dead-band. An input sitting
                // exactly on the boundary chatters; that is the documented
                // behavior.
                self.heater.set(self.room_temp_c < self.shared.set_point());
            }
            Err(err) => {
                self.stats.samples_failed += 1;
                write_diag(&mut self.transport, |line| {
                    let _ = writeln!(line, "temperature read error: {err}");
                })?;
            }
        }

        // REPORT
        let line = telegram::encode(
            self.room_temp_c,
            self.shared.set_point(),
            self.heater.is_on(),
            self.shared.seconds(),
        );
        self.transport.write_bytes(line.as_bytes())?;
        self.stats.telegrams_sent += 1;
        Ok(Some(line))
    }

    fn sample(&mut self) -> Result<f32, ReadError> {
        let active = self.active_sensor.ok_or(ReadError::NoActiveSensor)?;
        sensor::read_temperature(&mut self.bus, &active)
    }

    pub fn active_sensor(&self) -> Option<SensorDescriptor> {
        self.active_sensor
    }

    pub fn probe_log(&self) -> &ProbeLog {
        &self.probe_log
    }

    pub fn room_temp_c(&self) -> i32 {
        self.room_temp_c
    }

    pub fn heater_on(&self) -> bool {
        self.heater.is_on()
    }

    pub fn stats(&self) -> ControllerStats {
        self.stats
    }

    /// Borrow the transport, so callers holding a capture transport can
    /// inspect what went out.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}
