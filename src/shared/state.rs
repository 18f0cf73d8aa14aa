/***************************************/
/*        3rd party libraries          */
/***************************************/
use log::{debug, info};
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::structs::{
    AssignmentState, Behaviour, Direction, Elevator, ElevatorSnapshot, ExternalRequest, Snapshot,
};

/**
 * Scheduling data shared by every elevator unit, the dispatcher and the request intake.
 *
 * Only ever touched through [`SharedState::lock`]. There are no back-references from an
 * elevator to the requests it serves; the relation is recovered by matching floors.
 *
 * # Fields
 * - `elevators`:   One record per cabin, indexed by elevator id.
 * - `requests`:    Live hall calls in arrival order.
 * - `n_floors`:    Number of floors served, floors are `0..n_floors`.
 */
#[derive(Debug, Clone)]
pub struct SchedulingState {
    pub elevators: Vec<Elevator>,
    pub requests: Vec<ExternalRequest>,
    pub n_floors: u8,
}

impl SchedulingState {
    pub fn new(n_elevators: usize, n_floors: u8) -> SchedulingState {
        SchedulingState {
            elevators: (0..n_elevators).map(Elevator::new).collect(),
            requests: Vec::new(),
            n_floors,
        }
    }

    pub fn all_faulted(&self) -> bool {
        self.elevators.iter().all(Elevator::is_faulted)
    }

    pub fn find_request(&self, floor: u8, direction: Direction) -> Option<&ExternalRequest> {
        self.requests
            .iter()
            .find(|r| r.floor == floor && r.direction == direction && r.is_live())
    }

    /// Appends a hall call unless an equivalent one is already live. Returns true if appended.
    pub fn add_hall_call(&mut self, floor: u8, direction: Direction) -> bool {
        if self.find_request(floor, direction).is_some() {
            return false;
        }
        self.requests.push(ExternalRequest::new(floor, direction));
        true
    }

    /// Puts an elevator into `Fault`: door reset, both queues cleared and every waiting
    /// request on a cleared floor handed back to the dispatcher. Returns the number of
    /// requests that were handed back. Calling it on a faulted elevator changes nothing.
    pub fn handle_fault(&mut self, id: usize) -> usize {
        let elevator = &mut self.elevators[id];
        if !elevator.is_faulted() {
            elevator.behaviour = Behaviour::Fault;
            elevator.fault_epoch += 1;
        }
        elevator.door_progress = 0.0;
        let cleared: Vec<u8> = elevator
            .up_targets
            .drain(..)
            .chain(elevator.down_targets.drain(..))
            .collect();

        let mut reverted = 0;
        for request in self.requests.iter_mut() {
            if request.assignment == AssignmentState::Waiting && cleared.contains(&request.floor) {
                request.assignment = AssignmentState::Unassigned;
                reverted += 1;
            }
        }
        if !cleared.is_empty() {
            debug!(
                "elevator {} dropped targets {:?}, {} request(s) back to dispatch",
                id, cleared, reverted
            );
        }
        reverted
    }

    /// Brings a faulted elevator back on the ground floor with nothing queued.
    pub fn recover(&mut self, id: usize) {
        let elevator = &mut self.elevators[id];
        elevator.behaviour = Behaviour::Normal;
        elevator.current_floor = 0;
        elevator.scan_direction = Direction::Up;
        elevator.up_targets.clear();
        elevator.down_targets.clear();
        elevator.door_progress = 0.0;
    }

    /// Records a completed stop: `floor` leaves the queue being drained and every request
    /// waiting on that floor is finished. Returns the number of finished requests.
    pub fn complete_stop(&mut self, id: usize, floor: u8, direction: Direction) -> usize {
        self.elevators[id].remove_target(floor, direction);

        let mut finished = 0;
        for request in self.requests.iter_mut() {
            if request.floor == floor && request.assignment == AssignmentState::Waiting {
                request.assignment = AssignmentState::Finished;
                finished += 1;
            }
        }
        if finished > 0 {
            info!("elevator {} served {} hall call(s) at floor {}", id, finished, floor);
        }
        finished
    }

    /// Removes finished requests from the live list. Returns how many were removed.
    pub fn reap_finished(&mut self) -> usize {
        let before = self.requests.len();
        self.requests.retain(ExternalRequest::is_live);
        before - self.requests.len()
    }

    /// Describes the first broken queue invariant, if any.
    pub fn invariant_violation(&self) -> Option<String> {
        for elevator in &self.elevators {
            if !elevator.up_targets.windows(2).all(|w| w[0] < w[1]) {
                return Some(format!(
                    "elevator {} up targets not ascending: {:?}",
                    elevator.id, elevator.up_targets
                ));
            }
            if !elevator.down_targets.windows(2).all(|w| w[0] > w[1]) {
                return Some(format!(
                    "elevator {} down targets not descending: {:?}",
                    elevator.id, elevator.down_targets
                ));
            }
            if let Some(floor) = elevator
                .up_targets
                .iter()
                .find(|&&f| elevator.down_targets.contains(&f))
            {
                return Some(format!(
                    "elevator {} has floor {} in both queues",
                    elevator.id, floor
                ));
            }
            if elevator.is_faulted()
                && (!elevator.up_targets.is_empty()
                    || !elevator.down_targets.is_empty()
                    || elevator.door_progress != 0.0)
            {
                return Some(format!(
                    "elevator {} is faulted but still has work",
                    elevator.id
                ));
            }
            if elevator.current_floor >= self.n_floors {
                return Some(format!(
                    "elevator {} is on floor {} outside the building",
                    elevator.id, elevator.current_floor
                ));
            }
        }
        None
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            elevators: self.elevators.iter().map(ElevatorSnapshot::from).collect(),
            requests: self.requests.clone(),
        }
    }
}

/**
 * Cloneable handle to the single lock guarding [`SchedulingState`].
 *
 * Every worker gets its own clone through its constructor.
 */
#[derive(Clone)]
pub struct SharedState {
    inner: Arc<Mutex<SchedulingState>>,
}

impl SharedState {
    pub fn new(n_elevators: usize, n_floors: u8) -> SharedState {
        SharedState::from_state(SchedulingState::new(n_elevators, n_floors))
    }

    pub fn from_state(state: SchedulingState) -> SharedState {
        SharedState {
            inner: Arc::new(Mutex::new(state)),
        }
    }

    pub fn lock(&self) -> MutexGuard<'_, SchedulingState> {
        self.inner.lock()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.lock().snapshot()
    }
}
