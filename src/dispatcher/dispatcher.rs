/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use log::{debug, info};
use std::time::Duration;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::config::DispatcherConfig;
use crate::shared::{
    AssignmentState, Behaviour, Direction, Elevator, ExternalRequest, SchedulingState, SharedState,
};

/***************************************/
/*       Public data structures        */
/***************************************/

/// Outcome of one pass over the live hall calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassReport {
    pub assigned: usize,
    pub reaped: usize,
    pub unassigned: usize,
}

/**
 * Assigns hall calls to elevators.
 *
 * Each pass scores every healthy elevator against every unassigned hall call, queues the
 * call's floor on the closest one and then drops finished calls from the live list.
 *
 * # Fields
 * - `shared`:          Handle to the shared scheduling state.
 * - `idle_wait`:       How long to wait after a pass that assigned nothing.
 * - `terminate_rx`:    Stops the dispatcher when signalled or disconnected.
 */
pub struct Dispatcher {
    shared: SharedState,
    idle_wait: Duration,
    terminate_rx: cbc::Receiver<()>,
}

/***************************************/
/*             Public API              */
/***************************************/
impl Dispatcher {
    pub fn new(
        config: &DispatcherConfig,
        shared: SharedState,
        terminate_rx: cbc::Receiver<()>,
    ) -> Dispatcher {
        Dispatcher {
            shared,
            idle_wait: config.idle_wait(),
            terminate_rx,
        }
    }

    pub fn run(self) {
        info!("dispatcher started");

        // Main loop
        loop {
            let report = dispatch_pass(&mut self.shared.lock());
            if report.assigned > 0 || report.reaped > 0 {
                debug!("dispatch pass: {:?}", report);
            }

            if report.assigned == 0 {
                cbc::select! {
                    recv(self.terminate_rx) -> _ => break,
                    default(self.idle_wait) => {}
                }
            } else if !matches!(self.terminate_rx.try_recv(), Err(cbc::TryRecvError::Empty)) {
                break;
            }
        }

        info!("dispatcher stopped");
    }
}

/// Picks the healthy elevator closest to serving `request`; ties go to the lowest id.
/// Returns `None` if every elevator is faulted.
pub fn find_best_elevator(state: &SchedulingState, request: &ExternalRequest) -> Option<usize> {
    let mut best: Option<(usize, i32)> = None;

    for elevator in state.elevators.iter().filter(|e| !e.is_faulted()) {
        let distance = distance_to(elevator, request);
        if best.map_or(true, |(_, min)| distance < min) {
            best = Some((elevator.id, distance));
        }
    }

    best.map(|(id, _)| id)
}

/// Estimated number of floors `elevator` travels before it can stop for `request`.
pub fn distance_to(elevator: &Elevator, request: &ExternalRequest) -> i32 {
    // A moving cabin is already committed to the next floor
    let origin = match elevator.behaviour {
        Behaviour::MovingUp => elevator.current_floor as i32 + 1,
        Behaviour::MovingDown => elevator.current_floor as i32 - 1,
        _ => elevator.current_floor as i32,
    };
    let floor = request.floor as i32;

    let targets = elevator.targets(elevator.scan_direction);
    let last = match targets.last() {
        None => return (origin - floor).abs(),
        Some(&last) => last as i32,
    };

    let on_the_way = elevator.scan_direction == request.direction
        && match request.direction {
            Direction::Up => floor >= origin,
            Direction::Down => floor <= origin,
        };

    if on_the_way {
        (origin - floor).abs()
    } else {
        (origin - last).abs() + (floor - last).abs()
    }
}

/// Which of `elevator`'s queues `request` belongs in, or `None` if it has to wait for
/// the cabin to leave its floor.
pub fn choose_queue(elevator: &Elevator, request: &ExternalRequest) -> Option<Direction> {
    let current = elevator.current_floor;
    let floor = request.floor;

    if (current == floor
        && request.direction == Direction::Up
        && elevator.behaviour != Behaviour::MovingUp)
        || current < floor
    {
        Some(Direction::Up)
    } else if (current == floor
        && request.direction == Direction::Down
        && elevator.behaviour != Behaviour::MovingDown)
        || current > floor
    {
        Some(Direction::Down)
    } else {
        None
    }
}

pub fn dispatch_pass(state: &mut SchedulingState) -> PassReport {
    let mut report = PassReport::default();

    for index in 0..state.requests.len() {
        let request = state.requests[index];
        if request.assignment != AssignmentState::Unassigned {
            continue;
        }

        let Some(id) = find_best_elevator(state, &request) else {
            report.unassigned += 1;
            continue;
        };
        let Some(queue) = choose_queue(&state.elevators[id], &request) else {
            report.unassigned += 1;
            continue;
        };

        // A floor already queued on this cabin will be stopped at anyway
        state.elevators[id].add_target(request.floor, queue);
        state.requests[index].assignment = AssignmentState::Waiting;
        report.assigned += 1;
        info!(
            "hall call {:?} at floor {} assigned to elevator {}",
            request.direction, request.floor, id
        );
    }

    report.reaped = state.reap_finished();
    report
}
