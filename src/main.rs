use std::time::Duration;

use anyhow::Context;
use tokio::sync::watch;
use tokio::time::sleep;

use elevator_dispatch::config;
use elevator_dispatch::elevator_logic::{self, Dispatcher};
use elevator_dispatch::elevio::CommandSender;
use elevator_dispatch::init::{self, Scenario, SimMode};
use elevator_dispatch::print;
use elevator_dispatch::sim::{self, Lockstep, SimCabin, SimTiming};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // "cargo r -- help" lists the arguments
    let settings = init::parse_args();

    let scenario = match &settings.scenario_path {
        Some(path) => init::load_scenario(path)?,
        None => init::default_scenario(),
    };
    print::info(format!(
        "Floors [{}, {}], cabin at {}, {} press(es), {:?} mode",
        scenario.min_floor,
        scenario.max_floor,
        scenario.start_floor,
        scenario.presses.len(),
        settings.mode
    ));

    match settings.mode {
        SimMode::Lockstep => run_lockstep(&scenario),
        SimMode::Realtime => run_realtime(&scenario).await,
    }
}

fn run_lockstep(scenario: &Scenario) -> anyhow::Result<()> {
    let mut sim = Lockstep::new(scenario.range()?, scenario.start_floor)?;
    let done = sim
        .replay(&scenario.presses, SimTiming::default(), config::LOCKSTEP_MAX_STEPS)
        .context("lockstep replay")?;

    print::ok(format!(
        "Settled after {:.1} s simulated, stops: {:?}",
        done.as_secs_f64(),
        sim.cabin.stops()
    ));
    print::info(format!("Command trace: {:?}", sim.trace));
    print::status(&sim.dispatcher.snapshot());
    Ok(())
}

async fn run_realtime(scenario: &Scenario) -> anyhow::Result<()> {
    let range = scenario.range()?;

    /* START ----------- Init av channels ---------------------- */
    let (hw, commands_rx) = CommandSender::new();
    let dispatcher = Dispatcher::new(range, scenario.start_floor, hw)?;
    let (events_tx, dispatcher_handle) = elevator_logic::spawn_dispatcher(dispatcher);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    /* SLUTT ----------- Init av channels ---------------------- */

    let cabin = SimCabin::new(range, scenario.start_floor)?;
    let sim_task = {
        let events_tx = events_tx.clone();
        tokio::spawn(async move {
            sim::run_realtime(cabin, commands_rx, events_tx, SimTiming::default(), shutdown_rx).await
        })
    };

    let script_task = {
        let events_tx = events_tx.clone();
        let presses = scenario.presses.clone();
        tokio::spawn(async move {
            let start = tokio::time::Instant::now();
            for press in presses {
                tokio::time::sleep_until(start + Duration::from_millis(press.at_ms)).await;
                if events_tx.send(press.event).is_err() {
                    print::err("Dispatcher queue closed before the script finished".to_string());
                    break;
                }
            }
        })
    };

    script_task.await.context("script task")?;
    sleep(config::SETTLE_TIME).await;

    let _ = shutdown_tx.send(true);
    let cabin = sim_task.await.context("simulator task")?;
    // Last senders gone, the dispatcher loop returns
    drop(events_tx);
    let dispatcher = tokio::task::spawn_blocking(move || dispatcher_handle.join())
        .await
        .context("joining dispatcher")?
        .map_err(|_| anyhow::anyhow!("dispatcher thread panicked"))?;

    print::ok(format!("Stops: {:?}", cabin.stops()));
    print::status(&dispatcher.snapshot());
    Ok(())
}
