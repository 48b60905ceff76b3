use clap::{App, Arg};
use colored::*;
use std::sync::Arc;
use std::time::Duration;
use thermostat_sim::controller::ThermostatController;
use thermostat_sim::hal::{Transport, TransportError};
use thermostat_sim::scenario::Scenario;
use thermostat_sim::sensor::SENSOR_CATALOG;
use thermostat_sim::shared::SharedState;
use thermostat_sim::sim::{SimBus, SimHeaterPin};
use tokio::io::AsyncBufReadExt;
use tokio::time;
use tracing::{error, info};

/// Cooperative poll period while waiting for the next tick. Short enough not
/// to starve the 1 s cadence, long enough not to spin.
const POLL_PERIOD_MS: u64 = 10;

const DEFAULT_TICK_PERIOD_MS: &str = "1000";

/// The "UART": telegrams and diagnostics go to stdout, unbuffered per line.
struct StdoutTransport;

impl Transport for StdoutTransport {
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        use std::io::Write;
        let mut stdout = std::io::stdout();
        stdout
            .write_all(bytes)
            .and_then(|()| stdout.flush())
            .map_err(|_| TransportError::WriteFailed)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let matches = App::new("thermostat")
        .version("0.1.0")
        .author("Embedded Systems Engineering Team")
        .about("🌡️  Smart Thermostat Simulator - tick-driven control loop over simulated peripherals")
        .arg(
            Arg::with_name("scenario")
                .short("s")
                .long("scenario")
                .value_name("FILE")
                .help("JSON scenario describing the simulated hardware")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("period")
                .short("p")
                .long("period-ms")
                .value_name("MS")
                .help("Timer tick period in milliseconds (1000 = real time)")
                .takes_value(true)
                .default_value(DEFAULT_TICK_PERIOD_MS),
        )
        .arg(
            Arg::with_name("ticks")
                .short("n")
                .long("ticks")
                .value_name("COUNT")
                .help("Stop after this many telegrams (default: run forever)")
                .takes_value(true),
        )
        .get_matches();

    let scenario = match matches.value_of("scenario") {
        Some(path) => Scenario::from_json(&std::fs::read_to_string(path)?)?,
        None => Scenario::default(),
    };
    let period_ms: u64 = matches.value_of("period").unwrap_or(DEFAULT_TICK_PERIOD_MS).parse()?;
    let tick_limit = matches
        .value_of("ticks")
        .map(|value| value.parse::<u32>())
        .transpose()?;

    println!("{}", "🌡️  Smart Thermostat Simulator".bold());
    println!("{}", "==============================".bold());
    println!(
        "   type {} / {} then Enter to adjust the set-point",
        "+".green().bold(),
        "-".red().bold()
    );

    let shared = Arc::new(SharedState::new());
    let mut bus = SimBus::new(scenario);
    let heater = SimHeaterPin::new();
    bus.link_heater(heater.handle());
    let mut controller = ThermostatController::new(
        bus,
        heater,
        StdoutTransport,
        Arc::clone(&shared),
        &SENSOR_CATALOG,
    );

    // Peripheral bring-up and discovery; a dead transport here is fatal by
    // design, so it propagates out of main.
    controller.start()?;

    // The hardware timer "interrupt": one tick per period, forever.
    let timer_shared = Arc::clone(&shared);
    let timer = tokio::spawn(async move {
        let mut interval = time::interval(Duration::from_millis(period_ms));
        // interval fires immediately on the first await; the real timer
        // does not, so swallow that one
        interval.tick().await;
        loop {
            interval.tick().await;
            timer_shared.tick();
        }
    });

    // The button "interrupts": '+' raises the set-point, '-' lowers it.
    let button_shared = Arc::clone(&shared);
    let buttons = tokio::spawn(async move {
        let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            for ch in line.chars() {
                match ch {
                    '+' => button_shared.button_raise(),
                    '-' => button_shared.button_lower(),
                    _ => {}
                }
            }
        }
    });

    // Cooperative main loop: poll the tick flag, never block the "ISRs".
    loop {
        match controller.service() {
            Ok(Some(_)) => {
                if let Some(limit) = tick_limit {
                    if controller.stats().telegrams_sent >= limit {
                        break;
                    }
                }
            }
            Ok(None) => {}
            Err(e) => {
                error!("controller stopped: {e}");
                break;
            }
        }
        time::sleep(Duration::from_millis(POLL_PERIOD_MS)).await;
    }

    timer.abort();
    buttons.abort();

    let stats = controller.stats();
    info!(
        telegrams = stats.telegrams_sent,
        samples_ok = stats.samples_ok,
        samples_failed = stats.samples_failed,
        "simulation finished"
    );
    Ok(())
}
