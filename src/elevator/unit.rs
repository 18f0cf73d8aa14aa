use crate::config::ElevatorConfig;
use crate::shared::{Behaviour, Direction, Elevator, SchedulingState, SharedState};
use crossbeam_channel as cbc;
use log::{debug, info, warn};
use parking_lot::MutexGuard;
use std::time::Duration;

/**
 * Simulates one elevator cabin.
 *
 * The `ElevatorUnit` drains its cabin's target queues in SCAN order: it serves every
 * target in the current scan direction in floor order and only reverses once that
 * queue is empty and the opposite one is not. Travel and door cycles are simulated as
 * a series of time slices. The shared lock is released only while a slice elapses, and
 * each re-acquisition checks whether the cabin faulted in the meantime.
 *
 * # Fields
 * - `id`:              Index of the cabin this unit drives.
 * - `shared`:          Handle to the shared scheduling state.
 * - `move_time`:       Simulated time to travel one floor.
 * - `door_time`:       Simulated time of a full open-hold-close door cycle.
 * - `time_slice`:      Granularity of the simulated waits, and the fault preemption latency.
 * - `terminate_rx`:    Stops the unit when signalled or disconnected.
 */
pub struct ElevatorUnit {
    id: usize,
    shared: SharedState,
    move_time: Duration,
    door_time: Duration,
    time_slice: Duration,
    terminate_rx: cbc::Receiver<()>,
}

/// What a unit will do next, decided from its cabin's state alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Run a door cycle at the given floor, then drop it from the queue for the direction.
    Serve(u8, Direction),
    Travel(Direction),
    Reverse(Direction),
    Idle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Terminate,
}

pub fn next_action(elevator: &Elevator) -> Action {
    if elevator.is_faulted() {
        return Action::Idle;
    }

    let scan = elevator.scan_direction;
    let floor = elevator.current_floor;
    match elevator.targets(scan).first() {
        Some(&head) if head == floor => Action::Serve(head, scan),
        Some(&head) if is_ahead(scan, floor, head) => Action::Travel(scan),
        Some(_) => Action::Idle,
        None if !elevator.targets(scan.opposite()).is_empty() => Action::Reverse(scan.opposite()),
        None => Action::Idle,
    }
}

fn is_ahead(direction: Direction, from: u8, to: u8) -> bool {
    match direction {
        Direction::Up => to > from,
        Direction::Down => to < from,
    }
}

impl ElevatorUnit {
    pub fn new(
        id: usize,
        config: &ElevatorConfig,
        shared: SharedState,
        terminate_rx: cbc::Receiver<()>,
    ) -> ElevatorUnit {
        ElevatorUnit {
            id,
            shared,
            move_time: config.move_time(),
            door_time: config.door_time(),
            time_slice: config.time_slice(),
            terminate_rx,
        }
    }

    pub fn run(self) {
        info!("elevator {} started", self.id);

        // Main loop
        while self.cycle() == Flow::Continue {}

        info!("elevator {} stopped", self.id);
    }

    fn cycle(&self) -> Flow {
        let mut guard = self.shared.lock();

        if guard.elevators[self.id].is_faulted() {
            guard.handle_fault(self.id);
            drop(guard);
            return self.pause();
        }

        let action = next_action(&guard.elevators[self.id]);
        match action {
            Action::Serve(floor, direction) => self.door_cycle(&mut guard, floor, direction),
            Action::Travel(direction) => self.travel(&mut guard, direction),
            Action::Reverse(direction) => {
                debug!("elevator {} now scanning {:?}", self.id, direction);
                guard.elevators[self.id].scan_direction = direction;
                Flow::Continue
            }
            Action::Idle => {
                drop(guard);
                self.pause()
            }
        }
    }

    // Waits one time slice without holding the lock
    fn pause(&self) -> Flow {
        match self.terminate_rx.recv_timeout(self.time_slice) {
            Err(cbc::RecvTimeoutError::Timeout) => Flow::Continue,
            Ok(()) | Err(cbc::RecvTimeoutError::Disconnected) => Flow::Terminate,
        }
    }

    fn travel(&self, guard: &mut MutexGuard<'_, SchedulingState>, direction: Direction) -> Flow {
        let epoch = {
            let elevator = &mut guard.elevators[self.id];
            elevator.behaviour = direction.moving();
            elevator.fault_epoch
        };

        let mut elapsed = Duration::ZERO;
        while elapsed < self.move_time {
            if MutexGuard::unlocked(guard, || self.pause()) == Flow::Terminate {
                return Flow::Terminate;
            }
            elapsed += self.time_slice;

            if guard.elevators[self.id].faulted_since(epoch) {
                return self.abort(guard, "travel");
            }
        }

        let elevator = &mut guard.elevators[self.id];
        elevator.current_floor = match direction {
            Direction::Up => elevator.current_floor + 1,
            Direction::Down => elevator.current_floor.saturating_sub(1),
        };
        elevator.behaviour = Behaviour::Normal;
        debug!("elevator {} reached floor {}", self.id, elevator.current_floor);
        Flow::Continue
    }

    fn door_cycle(
        &self,
        guard: &mut MutexGuard<'_, SchedulingState>,
        floor: u8,
        direction: Direction,
    ) -> Flow {
        let epoch = {
            let elevator = &mut guard.elevators[self.id];
            elevator.behaviour = Behaviour::DoorCycling;
            elevator.door_progress = 0.0;
            elevator.fault_epoch
        };
        debug!("elevator {} opening doors at floor {}", self.id, floor);

        let mut elapsed = Duration::ZERO;
        loop {
            if MutexGuard::unlocked(guard, || self.pause()) == Flow::Terminate {
                return Flow::Terminate;
            }
            elapsed += self.time_slice;

            if guard.elevators[self.id].faulted_since(epoch) {
                return self.abort(guard, "door cycle");
            }

            let elevator = &mut guard.elevators[self.id];
            if elapsed >= self.door_time {
                elevator.behaviour = Behaviour::Normal;
                elevator.door_progress = 0.0;
                break;
            }
            elevator.door_progress = elapsed.as_secs_f64() / self.door_time.as_secs_f64();
        }

        guard.complete_stop(self.id, floor, direction);
        Flow::Continue
    }

    fn abort(&self, guard: &mut MutexGuard<'_, SchedulingState>, operation: &str) -> Flow {
        if guard.elevators[self.id].is_faulted() {
            guard.handle_fault(self.id);
        }
        warn!(
            "elevator {} aborted {} at floor {}",
            self.id, operation, guard.elevators[self.id].current_floor
        );
        Flow::Continue
    }
}
