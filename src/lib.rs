//! # Smart Thermostat Simulator
//!
//! An embedded-style smart thermostat control loop that runs (and tests)
//! entirely on the host. The firmware pattern is the classic ISR + polling
//! loop: a 1 Hz hardware timer sets a flag from interrupt context, the
//! cooperative main loop consumes it, samples a temperature sensor over an
//! I2C-style bus, drives a heater output, and emits one fixed-format status
//! telegram per tick over a byte-stream transport.
//!
//! ## Features
//!
//! - **Sensor discovery**: probes a fixed catalog of candidate I2C addresses
//!   and locks onto the first device that responds
//! - **Tick-driven control loop**: WAIT_TICK → SAMPLE → ACTUATE → REPORT,
//!   running forever with graceful degradation on read failures
//! - **Asynchronous set-point**: two button "interrupts" adjust the target
//!   temperature ±1 °C, racing safely against the loop via atomics
//! - **Status telegrams**: `<RR,SS,H,TTTT>` ASCII lines, one per tick
//! - **Simulated peripherals**: a fake bus with a first-order room model so
//!   the whole loop regulates visibly without hardware
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use thermostat_sim::controller::ThermostatController;
//! use thermostat_sim::scenario::Scenario;
//! use thermostat_sim::sensor::SENSOR_CATALOG;
//! use thermostat_sim::shared::SharedState;
//! use thermostat_sim::sim::{CaptureTransport, SimBus, SimHeaterPin};
//!
//! let shared = Arc::new(SharedState::new());
//! let bus = SimBus::new(Scenario::default());
//! let mut ctrl = ThermostatController::new(
//!     bus,
//!     SimHeaterPin::new(),
//!     CaptureTransport::new(),
//!     Arc::clone(&shared),
//!     &SENSOR_CATALOG,
//! );
//! ctrl.start().unwrap();
//!
//! // One timer interrupt, one loop iteration, one telegram.
//! shared.tick();
//! ctrl.service().unwrap();
//! ```
//!
//! ## Architecture
//!
//! - [`hal`] - peripheral collaborator traits (bus, heater pin, transport)
//! - [`shared`] - interrupt/main-loop shared state (flag, counter, set-point)
//! - [`sensor`] - probe catalog, discovery, register read and conversion
//! - [`controller`] - the control loop state machine
//! - [`telegram`] - status line encoder
//! - [`sim`] - simulated peripherals for the binary and the test suites
//! - [`scenario`] - serde description of a simulation run

#![deny(warnings)]
#![deny(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]

pub mod controller;
pub mod hal;
pub mod scenario;
pub mod sensor;
pub mod shared;
pub mod sim;
pub mod telegram;

// Re-export main public types for convenience
pub use controller::{ControllerError, ThermostatController};
pub use sensor::{SensorDescriptor, SENSOR_CATALOG};
pub use shared::SharedState;
