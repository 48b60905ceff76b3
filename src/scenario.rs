//! Simulation scenario description.
//!
//! A scenario configures the *fake hardware* only — which catalog entry
//! answers on the bus, how the simulated room behaves, and when the bus
//! should drop a read transaction. The thermostat core itself has no
//! configuration surface; it re-initializes the same way on every boot.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Scenario {
    /// Index into the probe catalog of the sensor that acknowledges, or
    /// `None` to boot with no sensor attached (degraded mode).
    pub responding_sensor: Option<usize>,
    /// Room temperature at boot, degrees Celsius.
    pub start_temp_c: f32,
    /// Temperature the room drifts toward with the heater off.
    pub ambient_c: f32,
    /// Degrees added per tick while the heater output is driven.
    pub heater_gain_c: f32,
    /// Fraction of the room/ambient difference lost per tick.
    pub leak_factor: f32,
    /// Sample numbers (1-based) at which the read transaction fails.
    pub read_faults: Vec<u32>,
    /// Hold the room at `start_temp_c` forever; used by the test suites.
    pub frozen: bool,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            responding_sensor: Some(2),
            start_temp_c: 18.0,
            ambient_c: 12.0,
            heater_gain_c: 0.8,
            leak_factor: 0.08,
            read_faults: Vec::new(),
            frozen: false,
        }
    }
}

impl Scenario {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
