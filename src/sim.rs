//! Simulated peripherals.
//!
//! Software stand-ins for the three hardware collaborators, driven by a
//! [`Scenario`]. `SimBus` plays the attached temperature sensor and carries a
//! small first-order room model (ambient pull plus heater input) so the demo
//! binary visibly regulates; `SimHeaterPin` closes the loop by sharing its
//! driven level with the bus; `CaptureTransport` collects everything the
//! controller writes for inspection.

use crate::hal::{BusError, HeaterPin, I2cBus, Transport, TransportError};
use crate::scenario::Scenario;
use crate::sensor::SENSOR_CATALOG;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Fake transaction bus with one (or zero) attached sensors.
#[derive(Debug)]
pub struct SimBus {
    scenario: Scenario,
    room_temp_c: f32,
    samples_served: u32,
    heater_level: Option<Arc<AtomicBool>>,
}

impl SimBus {
    pub fn new(scenario: Scenario) -> Self {
        let room_temp_c = scenario.start_temp_c;
        Self {
            scenario,
            room_temp_c,
            samples_served: 0,
            heater_level: None,
        }
    }

    /// Let the room model see the heater output. Without a link the plant
    /// only drifts toward ambient.
    pub fn link_heater(&mut self, level: Arc<AtomicBool>) {
        self.heater_level = Some(level);
    }

    /// Current simulated room temperature (the plant truth, pre-quantization).
    pub fn room_temp_c(&self) -> f32 {
        self.room_temp_c
    }

    fn attached(&self) -> Option<crate::sensor::SensorDescriptor> {
        self.scenario
            .responding_sensor
            .and_then(|index| SENSOR_CATALOG.get(index).copied())
    }

    /// Advance the room by one tick: leak toward ambient, heat if driven.
    fn step_plant(&mut self) {
        if self.scenario.frozen {
            return;
        }
        let heater_on = self
            .heater_level
            .as_ref()
            .is_some_and(|level| level.load(Ordering::SeqCst));
        let gain = if heater_on {
            self.scenario.heater_gain_c
        } else {
            0.0
        };
        let leak = (self.room_temp_c - self.scenario.ambient_c) * self.scenario.leak_factor;
        self.room_temp_c += gain - leak;
    }
}

impl I2cBus for SimBus {
    fn transfer(&mut self, address: u8, write: &[u8], read: &mut [u8]) -> Result<(), BusError> {
        let Some(sensor) = self.attached() else {
            return Err(BusError::Nack(address));
        };
        if address != sensor.address {
            return Err(BusError::Nack(address));
        }
        if write != [sensor.result_reg] {
            return Err(BusError::TransferFailed(address));
        }
        // Zero-length read: a discovery probe, acknowledged without side
        // effects.
        if read.is_empty() {
            return Ok(());
        }

        self.samples_served = self.samples_served.wrapping_add(1);
        if self.scenario.read_faults.contains(&self.samples_served) {
            return Err(BusError::TransferFailed(address));
        }

        self.step_plant();
        let raw = (self.room_temp_c / crate::sensor::LSB_CELSIUS) as i16;
        read.copy_from_slice(&raw.to_be_bytes());
        Ok(())
    }
}

/// Heater output pin; the driven level is shared so the bus plant model (and
/// tests) can observe it.
#[derive(Debug)]
pub struct SimHeaterPin {
    level: Arc<AtomicBool>,
}

impl SimHeaterPin {
    pub fn new() -> Self {
        Self {
            level: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.level)
    }
}

impl Default for SimHeaterPin {
    fn default() -> Self {
        Self::new()
    }
}

impl HeaterPin for SimHeaterPin {
    fn set(&mut self, on: bool) {
        self.level.store(on, Ordering::SeqCst);
    }

    fn is_on(&self) -> bool {
        self.level.load(Ordering::SeqCst)
    }
}

/// Transport that records every byte written, for tests and demos.
#[derive(Debug, Default)]
pub struct CaptureTransport {
    buffer: Vec<u8>,
}

impl CaptureTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        core::str::from_utf8(&self.buffer).unwrap_or("<non-utf8>")
    }

    /// Lines written so far, newline-split.
    pub fn lines(&self) -> Vec<String> {
        self.as_str().lines().map(str::to_owned).collect()
    }

    /// Only the status telegrams (lines shaped `<...>`), in order.
    pub fn telegrams(&self) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|line| line.starts_with('<'))
            .collect()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

impl Transport for CaptureTransport {
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        self.buffer.extend_from_slice(bytes);
        Ok(())
    }
}
