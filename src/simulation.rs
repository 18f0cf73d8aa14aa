/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use log::{error, info};
use std::thread::{Builder, JoinHandle};

/***************************************/
/*           Local modules             */
/***************************************/
use crate::config::Config;
use crate::dispatcher::Dispatcher;
use crate::elevator::ElevatorUnit;
use crate::error::Result;
use crate::intake::RequestIntake;
use crate::shared::{SharedState, Snapshot};

/**
 * Owns the worker threads of a running simulation.
 *
 * One thread per elevator plus one dispatcher thread, all sharing the same
 * [`SharedState`]. Every worker holds a receiver of the same terminate channel;
 * dropping the sender in [`Simulation::shutdown`] disconnects it and stops them all
 * within one time slice.
 *
 * # Fields
 * - `shared`:          Scheduling state shared with the workers.
 * - `intake`:          Button press entry point bound to `shared`.
 * - `terminate_tx`:    Held only so that dropping it stops the workers.
 * - `workers`:         Join handles of the spawned threads.
 */
pub struct Simulation {
    shared: SharedState,
    intake: RequestIntake,
    terminate_tx: cbc::Sender<()>,
    workers: Vec<JoinHandle<()>>,
}

impl Simulation {
    pub fn start(config: &Config) -> Result<Simulation> {
        config.validate()?;

        let shared = SharedState::new(config.scheduler.n_elevators, config.scheduler.n_floors);
        let intake = RequestIntake::new(shared.clone());
        let (terminate_tx, terminate_rx) = cbc::unbounded::<()>();
        let mut workers = Vec::with_capacity(config.scheduler.n_elevators + 1);

        // Start the elevator units
        for id in 0..config.scheduler.n_elevators {
            let unit = ElevatorUnit::new(id, &config.elevator, shared.clone(), terminate_rx.clone());
            let unit_thread = Builder::new().name(format!("elevator_{}", id));
            workers.push(unit_thread.spawn(move || unit.run())?);
        }

        // Start the dispatcher
        let dispatcher = Dispatcher::new(&config.dispatcher, shared.clone(), terminate_rx);
        let dispatcher_thread = Builder::new().name("dispatcher".into());
        workers.push(dispatcher_thread.spawn(move || dispatcher.run())?);

        info!(
            "simulation started with {} elevators and {} floors",
            config.scheduler.n_elevators, config.scheduler.n_floors
        );

        Ok(Simulation {
            shared,
            intake,
            terminate_tx,
            workers,
        })
    }

    pub fn shared(&self) -> &SharedState {
        &self.shared
    }

    pub fn intake(&self) -> &RequestIntake {
        &self.intake
    }

    pub fn snapshot(&self) -> Snapshot {
        self.shared.snapshot()
    }

    pub fn shutdown(self) {
        drop(self.terminate_tx);
        for worker in self.workers {
            let name = worker.thread().name().unwrap_or("worker").to_string();
            if worker.join().is_err() {
                error!("{} panicked", name);
            }
        }
        info!("simulation stopped");
    }
}
