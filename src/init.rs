//! Startup: command line arguments and scenario files.
//!
//! Arguments use the `key::value` form, e.g.
//! `cargo r -- print_info::false mode::lockstep scenario::demo.json`.

use std::{env, fs, path::{Path, PathBuf}};

use anyhow::{bail, Context};
use serde::{Serialize, Deserialize};

use crate::cabin::{Dirn, Floor, FloorRange};
use crate::config;
use crate::elevio::ElevEvent;
use crate::print;

/// How the demo drives the simulated cabin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SimMode {
    /// Dispatcher and cabin advanced step by step, no wall-clock
    #[default]
    Lockstep,
    /// Dispatcher thread plus a timed simulator task
    Realtime,
}

/// Everything `parse_args` extracts that is not a print toggle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// Simulation mode
    pub mode: SimMode,
    /// Scenario file, built-in demo if `None`
    pub scenario_path: Option<PathBuf>,
    /// `help` was given
    pub help: bool,
}

/// Reads the process arguments. Prints usage and exits if `help` is given.
pub fn parse_args() -> Settings {
    let settings = parse_args_from(env::args().skip(1));
    if settings.help {
        print_help();
        std::process::exit(0);
    }
    settings
}

/// Parses `key::value` arguments and applies the print toggles in [config].
///
/// Unknown keys and malformed values are reported with [print::warn] and skipped.
pub fn parse_args_from<I, S>(args: I) -> Settings
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut settings = Settings::default();

    for arg in args {
        let arg = arg.as_ref();
        let parts: Vec<&str> = arg.split("::").collect();
        if parts.len() == 2 {
            let key = parts[0].to_lowercase();
            let value = parts[1];
            let is_true = value.eq_ignore_ascii_case("true");

            match key.as_str() {
                "print_status" => config::set_toggle(&config::PRINT_STATUS_ON, is_true),
                "print_err" => config::set_toggle(&config::PRINT_ERR_ON, is_true),
                "print_warn" => config::set_toggle(&config::PRINT_WARN_ON, is_true),
                "print_ok" => config::set_toggle(&config::PRINT_OK_ON, is_true),
                "print_info" => config::set_toggle(&config::PRINT_INFO_ON, is_true),
                "scenario" => settings.scenario_path = Some(PathBuf::from(value)),
                "mode" => match value.to_lowercase().as_str() {
                    "lockstep" => settings.mode = SimMode::Lockstep,
                    "realtime" => settings.mode = SimMode::Realtime,
                    other => print::warn(format!("Unknown mode '{}', keeping {:?}", other, settings.mode)),
                },
                _ => print::warn(format!("Unknown argument '{}'", arg)),
            }
        } else {
            match arg.to_lowercase().as_str() {
                "help" => settings.help = true,
                // Debug modus: only errors are shown
                "debug" => {
                    config::set_toggle(&config::PRINT_STATUS_ON, false);
                    config::set_toggle(&config::PRINT_WARN_ON, false);
                    config::set_toggle(&config::PRINT_OK_ON, false);
                    config::set_toggle(&config::PRINT_INFO_ON, false);
                }
                _ => print::warn(format!("Unknown argument '{}'", arg)),
            }
        }
    }
    settings
}

fn print_help() {
    println!("Available arguments:");
    println!("  print_status::true/false");
    println!("  print_err::true/false");
    println!("  print_warn::true/false");
    println!("  print_ok::true/false");
    println!("  print_info::true/false");
    println!("  debug (only errors are shown)");
    println!("  mode::lockstep|realtime");
    println!("  scenario::<path to json>");
}

/// A button press scheduled `at_ms` milliseconds after start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedPress {
    /// Offset from start
    pub at_ms: u64,
    /// `FloorButton` or `CabinButton`
    pub event: ElevEvent,
}

/// A shaft and a list of button presses to replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Lowest served floor
    pub min_floor: Floor,
    /// Highest served floor
    pub max_floor: Floor,
    /// Where the cabin is parked at start
    pub start_floor: Floor,
    /// Presses, replayed in `at_ms` order
    #[serde(default)]
    pub presses: Vec<TimedPress>,
}

impl Scenario {
    /// The served floor range.
    pub fn range(&self) -> anyhow::Result<FloorRange> {
        Ok(FloorRange::new(self.min_floor, self.max_floor)?)
    }

    /// Checks the shaft, the start floor and that every event is a button press, then sorts
    /// the presses by time.
    pub fn validate(mut self) -> anyhow::Result<Scenario> {
        let range = self.range()?;
        if !range.contains(self.start_floor) {
            bail!("start floor {} outside [{}, {}]", self.start_floor, self.min_floor, self.max_floor);
        }
        if let Some(bad) = self.presses.iter().find(|p| !p.event.is_button()) {
            bail!("scenario may only contain button presses, found {:?} at {} ms", bad.event, bad.at_ms);
        }
        self.presses.sort_by_key(|p| p.at_ms);
        Ok(self)
    }
}

/// Reads and validates a scenario file.
pub fn load_scenario(path: &Path) -> anyhow::Result<Scenario> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading scenario {}", path.display()))?;
    parse_scenario(&text).with_context(|| format!("in scenario {}", path.display()))
}

/// Parses and validates scenario JSON.
pub fn parse_scenario(text: &str) -> anyhow::Result<Scenario> {
    let scenario: Scenario = serde_json::from_str(text).context("malformed scenario JSON")?;
    scenario.validate()
}

/// Built-in demo used when no scenario file is given.
///
/// Cabin at 1 is sent to 5, someone at 3 wants up while it passes, and someone at 8 wants
/// down after it has started.
pub fn default_scenario() -> Scenario {
    Scenario {
        min_floor: config::DEFAULT_MIN_FLOOR,
        max_floor: config::DEFAULT_MAX_FLOOR,
        start_floor: config::DEFAULT_START_FLOOR,
        presses: vec![
            TimedPress { at_ms: 0, event: ElevEvent::CabinButton { floor: 5 } },
            TimedPress { at_ms: 200, event: ElevEvent::FloorButton { floor: 3, dirn: Dirn::Up } },
            TimedPress { at_ms: 1500, event: ElevEvent::FloorButton { floor: 8, dirn: Dirn::Down } },
            TimedPress { at_ms: 2500, event: ElevEvent::CabinButton { floor: 2 } },
        ],
    }
}
