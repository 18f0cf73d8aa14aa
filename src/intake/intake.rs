/***************************************/
/*        3rd party libraries          */
/***************************************/
use log::{debug, info, warn};

/***************************************/
/*           Local modules             */
/***************************************/
use crate::error::{Error, Result};
use crate::shared::{Behaviour, Direction, SharedState};

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressOutcome {
    /// The press produced new work.
    Queued,
    /// Equivalent work was already pending.
    Coalesced,
    /// The press had no effect, e.g. the cabin is faulted or already on that floor.
    Ignored,
}

/**
 * Entry point for button presses coming from outside the scheduling core.
 *
 * Arguments are validated before the lock is taken, so out-of-range floors or
 * elevator ids never reach the shared state.
 *
 * # Fields
 * - `shared`:      Handle to the shared scheduling state.
 * - `n_elevators`: Number of cabins, valid ids are `0..n_elevators`.
 * - `n_floors`:    Number of floors, valid floors are `0..n_floors`.
 */
#[derive(Clone)]
pub struct RequestIntake {
    shared: SharedState,
    n_elevators: usize,
    n_floors: u8,
}

/***************************************/
/*             Public API              */
/***************************************/
impl RequestIntake {
    pub fn new(shared: SharedState) -> RequestIntake {
        let (n_elevators, n_floors) = {
            let state = shared.lock();
            (state.elevators.len(), state.n_floors)
        };
        RequestIntake {
            shared,
            n_elevators,
            n_floors,
        }
    }

    pub fn press_cabin_button(&self, elevator_id: usize, floor: u8) -> Result<PressOutcome> {
        self.check_elevator(elevator_id)?;
        self.check_floor(floor)?;

        let mut state = self.shared.lock();
        let elevator = &mut state.elevators[elevator_id];
        if elevator.is_faulted() || elevator.current_floor == floor {
            return Ok(PressOutcome::Ignored);
        }

        let queue = if floor > elevator.current_floor {
            Direction::Up
        } else {
            Direction::Down
        };
        if elevator.add_target(floor, queue) {
            debug!("elevator {} cabin button {} pressed", elevator_id, floor);
            Ok(PressOutcome::Queued)
        } else {
            Ok(PressOutcome::Coalesced)
        }
    }

    pub fn press_hall_call(&self, floor: u8, direction: Direction) -> Result<PressOutcome> {
        self.check_floor(floor)?;
        let missing_button = match direction {
            Direction::Up => floor == self.n_floors - 1,
            Direction::Down => floor == 0,
        };
        if missing_button {
            return Err(Error::InvalidHallCall { floor, direction });
        }

        let mut state = self.shared.lock();
        if state.all_faulted() {
            warn!(
                "hall call {:?} at floor {} ignored, every elevator is faulted",
                direction, floor
            );
            return Ok(PressOutcome::Ignored);
        }

        if state.add_hall_call(floor, direction) {
            debug!("hall call {:?} at floor {} received", direction, floor);
            Ok(PressOutcome::Queued)
        } else {
            Ok(PressOutcome::Coalesced)
        }
    }

    /// Faults a healthy elevator or recovers a faulted one. Returns the new behaviour.
    pub fn toggle_fault(&self, elevator_id: usize) -> Result<Behaviour> {
        self.check_elevator(elevator_id)?;

        let mut state = self.shared.lock();
        if state.elevators[elevator_id].is_faulted() {
            state.recover(elevator_id);
            info!("elevator {} recovered on floor 0", elevator_id);
        } else {
            let floor = state.elevators[elevator_id].current_floor;
            let reverted = state.handle_fault(elevator_id);
            warn!(
                "elevator {} faulted at floor {}, {} hall call(s) need a new elevator",
                elevator_id, floor, reverted
            );
        }
        Ok(state.elevators[elevator_id].behaviour)
    }

    fn check_elevator(&self, elevator_id: usize) -> Result<()> {
        if elevator_id >= self.n_elevators {
            return Err(Error::InvalidElevator {
                id: elevator_id,
                n_elevators: self.n_elevators,
            });
        }
        Ok(())
    }

    fn check_floor(&self, floor: u8) -> Result<()> {
        if floor >= self.n_floors {
            return Err(Error::InvalidFloor {
                floor,
                n_floors: self.n_floors,
            });
        }
        Ok(())
    }
}
