/***************************************/
/*          Shared test helpers        */
/***************************************/
use crossbeam_channel as cbc;
use std::thread::{sleep, JoinHandle};
use std::time::{Duration, Instant};

use crate::config::{Config, DispatcherConfig, ElevatorConfig};
use crate::dispatcher::Dispatcher;
use crate::elevator::ElevatorUnit;
use crate::shared::{SharedState, Snapshot};

pub const TIMEOUT: Duration = Duration::from_secs(5);

/// Millisecond timings so a whole ride takes well under a second.
pub fn fast_elevator_config() -> ElevatorConfig {
    ElevatorConfig {
        move_time: 4,
        door_time: 8,
        time_slice: 1,
    }
}

pub fn fast_config(n_elevators: usize, n_floors: u8) -> Config {
    let mut config = Config::default();
    config.scheduler.n_elevators = n_elevators;
    config.scheduler.n_floors = n_floors;
    config.elevator = fast_elevator_config();
    config.dispatcher = DispatcherConfig { idle_wait: 1 };
    config
}

/// Polls the shared state until `predicate` holds or `timeout` passes.
/// Every polled snapshot must satisfy the queue invariants.
pub fn wait_until<F>(shared: &SharedState, timeout: Duration, mut predicate: F) -> bool
where
    F: FnMut(&Snapshot) -> bool,
{
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        let snapshot = {
            let state = shared.lock();
            if let Some(violation) = state.invariant_violation() {
                panic!("invariant violated: {}", violation);
            }
            state.snapshot()
        };
        if predicate(&snapshot) {
            return true;
        }
        sleep(Duration::from_micros(200));
    }
    false
}

pub fn spawn_unit(
    id: usize,
    config: &ElevatorConfig,
    shared: &SharedState,
) -> (JoinHandle<()>, cbc::Sender<()>) {
    let (terminate_tx, terminate_rx) = cbc::unbounded::<()>();
    let unit = ElevatorUnit::new(id, config, shared.clone(), terminate_rx);
    (std::thread::spawn(move || unit.run()), terminate_tx)
}

pub fn spawn_dispatcher(shared: &SharedState) -> (JoinHandle<()>, cbc::Sender<()>) {
    let (terminate_tx, terminate_rx) = cbc::unbounded::<()>();
    let dispatcher = Dispatcher::new(&DispatcherConfig { idle_wait: 1 }, shared.clone(), terminate_rx);
    (std::thread::spawn(move || dispatcher.run()), terminate_tx)
}
