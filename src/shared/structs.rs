/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use serde::Serialize;

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behaviour {
    #[serde(rename = "normal")]
    Normal,
    #[serde(rename = "movingUp")]
    MovingUp,
    #[serde(rename = "movingDown")]
    MovingDown,
    #[serde(rename = "doorCycling")]
    DoorCycling,
    #[serde(rename = "fault")]
    Fault,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    /// The behaviour an elevator shows while travelling in this direction.
    pub fn moving(self) -> Behaviour {
        match self {
            Direction::Up => Behaviour::MovingUp,
            Direction::Down => Behaviour::MovingDown,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentState {
    Unassigned,
    Waiting,
    Finished,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DoorPhase {
    Opening,
    Holding,
    Closing,
}

impl DoorPhase {
    pub fn from_progress(progress: f64) -> DoorPhase {
        if progress < 0.25 {
            DoorPhase::Opening
        } else if progress < 0.75 {
            DoorPhase::Holding
        } else {
            DoorPhase::Closing
        }
    }
}

/**
 * State of one elevator cabin.
 *
 * # Fields
 * - `id`:              Stable identity, index into the elevator bank.
 * - `current_floor`:   Last floor the cabin fully arrived at.
 * - `behaviour`:       What the cabin is doing right now.
 * - `scan_direction`:  Which target queue is being drained. Independent of `behaviour`.
 * - `up_targets`:      Floors to stop at while scanning up, strictly ascending.
 * - `down_targets`:    Floors to stop at while scanning down, strictly descending.
 * - `door_progress`:   Elapsed fraction of the current door cycle.
 * - `fault_epoch`:     Bumped on every transition into `Fault`.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct Elevator {
    pub id: usize,
    pub current_floor: u8,
    pub behaviour: Behaviour,
    pub scan_direction: Direction,
    pub up_targets: Vec<u8>,
    pub down_targets: Vec<u8>,
    pub door_progress: f64,
    pub fault_epoch: u64,
}

impl Elevator {
    pub fn new(id: usize) -> Elevator {
        Elevator {
            id,
            current_floor: 0,
            behaviour: Behaviour::Normal,
            scan_direction: Direction::Up,
            up_targets: Vec::new(),
            down_targets: Vec::new(),
            door_progress: 0.0,
            fault_epoch: 0,
        }
    }

    pub fn is_faulted(&self) -> bool {
        self.behaviour == Behaviour::Fault
    }

    pub fn targets(&self, direction: Direction) -> &Vec<u8> {
        match direction {
            Direction::Up => &self.up_targets,
            Direction::Down => &self.down_targets,
        }
    }

    pub fn targets_mut(&mut self, direction: Direction) -> &mut Vec<u8> {
        match direction {
            Direction::Up => &mut self.up_targets,
            Direction::Down => &mut self.down_targets,
        }
    }

    pub fn has_target(&self, floor: u8) -> bool {
        self.up_targets.contains(&floor) || self.down_targets.contains(&floor)
    }

    /// Inserts `floor` into the queue for `direction`, keeping the queue's order.
    /// Returns false if the floor is already queued in either direction.
    pub fn add_target(&mut self, floor: u8, direction: Direction) -> bool {
        if self.has_target(floor) {
            return false;
        }
        let queue = self.targets_mut(direction);
        let position = match direction {
            Direction::Up => queue.partition_point(|&f| f < floor),
            Direction::Down => queue.partition_point(|&f| f > floor),
        };
        queue.insert(position, floor);
        true
    }

    pub fn remove_target(&mut self, floor: u8, direction: Direction) {
        self.targets_mut(direction).retain(|&f| f != floor);
    }

    /// True if the cabin is in `Fault`, or went through one since `epoch` was read.
    pub fn faulted_since(&self, epoch: u64) -> bool {
        self.is_faulted() || self.fault_epoch != epoch
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExternalRequest {
    pub floor: u8,
    pub direction: Direction,
    pub assignment: AssignmentState,
}

impl ExternalRequest {
    pub fn new(floor: u8, direction: Direction) -> ExternalRequest {
        ExternalRequest {
            floor,
            direction,
            assignment: AssignmentState::Unassigned,
        }
    }

    pub fn is_live(&self) -> bool {
        self.assignment != AssignmentState::Finished
    }
}

/***************************************/
/*             Snapshots               */
/***************************************/
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ElevatorSnapshot {
    pub id: usize,
    #[serde(rename = "currentFloor")]
    pub current_floor: u8,
    pub behaviour: Behaviour,
    #[serde(rename = "scanDirection")]
    pub scan_direction: Direction,
    #[serde(rename = "doorProgress")]
    pub door_progress: f64,
    #[serde(rename = "doorPhase")]
    pub door_phase: Option<DoorPhase>,
    #[serde(rename = "upTargets")]
    pub up_targets: Vec<u8>,
    #[serde(rename = "downTargets")]
    pub down_targets: Vec<u8>,
}

impl From<&Elevator> for ElevatorSnapshot {
    fn from(elevator: &Elevator) -> Self {
        let door_phase = match elevator.behaviour {
            Behaviour::DoorCycling => Some(DoorPhase::from_progress(elevator.door_progress)),
            _ => None,
        };
        ElevatorSnapshot {
            id: elevator.id,
            current_floor: elevator.current_floor,
            behaviour: elevator.behaviour,
            scan_direction: elevator.scan_direction,
            door_progress: elevator.door_progress,
            door_phase,
            up_targets: elevator.up_targets.clone(),
            down_targets: elevator.down_targets.clone(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub elevators: Vec<ElevatorSnapshot>,
    pub requests: Vec<ExternalRequest>,
}
