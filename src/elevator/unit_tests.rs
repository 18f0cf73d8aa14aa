/*
 * Unit tests for the elevator unit
 *
 * The unit tests follows the Arrange, Act, Assert pattern. Units run on their own
 * thread with millisecond timings and are observed through the shared state.
 *
 * Tests:
 * - test_next_action_*
 * - test_unit_serves_cabin_target
 * - test_unit_scan_order
 * - test_unit_finishes_hall_call
 * - test_fault_mid_travel
 * - test_fault_during_door_cycle
 * - test_fault_and_recovery_within_one_slice
 * - test_unit_terminates
 */

/***************************************/
/*             Unit tests              */
/***************************************/
#[cfg(test)]
mod unit_tests {
    use std::thread::sleep;
    use std::time::Duration;

    use crate::config::ElevatorConfig;
    use crate::dispatcher::dispatch_pass;
    use crate::elevator::{next_action, Action};
    use crate::intake::RequestIntake;
    use crate::shared::AssignmentState::{Unassigned, Waiting};
    use crate::shared::Direction::{Down, Up};
    use crate::shared::{Behaviour, Elevator, SchedulingState, SharedState};
    use crate::test_utils::{fast_elevator_config, spawn_unit, wait_until, TIMEOUT};

    fn elevator_at(floor: u8, up: Vec<u8>, down: Vec<u8>) -> Elevator {
        let mut elevator = Elevator::new(0);
        elevator.current_floor = floor;
        elevator.up_targets = up;
        elevator.down_targets = down;
        elevator
    }

    #[test]
    fn test_next_action_serves_head_on_current_floor() {
        let elevator = elevator_at(4, vec![4, 6], vec![]);
        assert_eq!(next_action(&elevator), Action::Serve(4, Up));
    }

    #[test]
    fn test_next_action_travels_towards_head() {
        let elevator = elevator_at(2, vec![6], vec![1]);
        assert_eq!(next_action(&elevator), Action::Travel(Up));

        let mut elevator = elevator_at(5, vec![], vec![3, 1]);
        elevator.scan_direction = Down;
        assert_eq!(next_action(&elevator), Action::Travel(Down));
    }

    #[test]
    fn test_next_action_reverses_only_when_queue_empty() {
        let elevator = elevator_at(5, vec![], vec![3]);
        assert_eq!(next_action(&elevator), Action::Reverse(Down));

        let mut elevator = elevator_at(5, vec![8], vec![]);
        elevator.scan_direction = Down;
        assert_eq!(next_action(&elevator), Action::Reverse(Up));

        let elevator = elevator_at(5, vec![7], vec![3]);
        assert_eq!(next_action(&elevator), Action::Travel(Up));
    }

    #[test]
    fn test_next_action_idle() {
        let elevator = elevator_at(5, vec![], vec![]);
        assert_eq!(next_action(&elevator), Action::Idle);

        let mut elevator = elevator_at(5, vec![], vec![]);
        elevator.behaviour = Behaviour::Fault;
        assert_eq!(next_action(&elevator), Action::Idle);
    }

    #[test]
    fn test_unit_serves_cabin_target() {
        // Arrange
        let shared = SharedState::new(1, 10);
        let intake = RequestIntake::new(shared.clone());
        let (unit_thread, terminate_tx) = spawn_unit(0, &fast_elevator_config(), &shared);

        // Act
        intake.press_cabin_button(0, 3).unwrap();

        // Assert
        let arrived = wait_until(&shared, TIMEOUT, |s| {
            let e = &s.elevators[0];
            e.current_floor == 3 && e.up_targets.is_empty() && e.behaviour == Behaviour::Normal
        });
        assert!(arrived, "elevator never served floor 3: {:?}", shared.snapshot());

        // Cleanup
        terminate_tx.send(()).unwrap();
        unit_thread.join().unwrap();
    }

    #[test]
    fn test_unit_scan_order() {
        // Purpose: all up targets are served before the cabin turns around

        // Arrange
        let mut state = SchedulingState::new(1, 12);
        state.elevators[0] = elevator_at(5, vec![7, 9], vec![3]);
        let shared = SharedState::from_state(state);
        let config = ElevatorConfig {
            move_time: 4,
            door_time: 20,
            time_slice: 1,
        };
        let (unit_thread, terminate_tx) = spawn_unit(0, &config, &shared);

        // Act
        let mut floors = Vec::new();
        let done = wait_until(&shared, TIMEOUT, |s| {
            let e = &s.elevators[0];
            if floors.last() != Some(&e.current_floor) {
                floors.push(e.current_floor);
            }
            e.current_floor == 3 && e.up_targets.is_empty() && e.down_targets.is_empty()
                && e.behaviour == Behaviour::Normal
        });

        // Assert
        assert!(done, "queues never drained: {:?}", shared.snapshot());
        let top = floors.iter().position(|&f| f == 9).expect("never reached floor 9");
        assert!(floors[..=top].windows(2).all(|w| w[0] < w[1]), "{:?}", floors);
        assert!(floors[top..].windows(2).all(|w| w[0] > w[1]), "{:?}", floors);
        assert_eq!(shared.snapshot().elevators[0].scan_direction, Down);

        // Cleanup
        terminate_tx.send(()).unwrap();
        unit_thread.join().unwrap();
    }

    #[test]
    fn test_unit_finishes_hall_call() {
        // Arrange
        let mut state = SchedulingState::new(1, 10);
        state.elevators[0].up_targets = vec![2];
        state.add_hall_call(2, Down);
        state.requests[0].assignment = Waiting;
        let shared = SharedState::from_state(state);
        let (unit_thread, terminate_tx) = spawn_unit(0, &fast_elevator_config(), &shared);

        // Act
        let finished = wait_until(&shared, TIMEOUT, |s| !s.requests[0].is_live());

        // Assert
        assert!(finished);
        assert_eq!(shared.snapshot().elevators[0].current_floor, 2);

        // Cleanup
        terminate_tx.send(()).unwrap();
        unit_thread.join().unwrap();
    }

    #[test]
    fn test_fault_mid_travel() {
        // Purpose: a fault while travelling towards floor 5 keeps the cabin on its floor
        // and hands its hall calls to another elevator

        // Arrange
        let mut state = SchedulingState::new(5, 20);
        state.elevators[2] = elevator_at(3, vec![5, 8], vec![]);
        state.elevators[2].id = 2;
        state.add_hall_call(5, Up);
        state.add_hall_call(8, Up);
        state.requests[0].assignment = Waiting;
        state.requests[1].assignment = Waiting;
        let shared = SharedState::from_state(state);
        let intake = RequestIntake::new(shared.clone());
        let config = ElevatorConfig {
            move_time: 500,
            door_time: 500,
            time_slice: 2,
        };
        let (unit_thread, terminate_tx) = spawn_unit(2, &config, &shared);
        assert!(wait_until(&shared, TIMEOUT, |s| s.elevators[2].behaviour == Behaviour::MovingUp));

        // Act
        let behaviour = intake.toggle_fault(2).unwrap();
        sleep(Duration::from_millis(50));

        // Assert
        assert_eq!(behaviour, Behaviour::Fault);
        {
            let state = shared.lock();
            let elevator = &state.elevators[2];
            assert_eq!(elevator.behaviour, Behaviour::Fault);
            assert_eq!(elevator.current_floor, 3);
            assert!(elevator.up_targets.is_empty());
            assert!(elevator.down_targets.is_empty());
            assert_eq!(state.requests[0].assignment, Unassigned);
            assert_eq!(state.requests[1].assignment, Unassigned);
        }

        let report = dispatch_pass(&mut shared.lock());
        assert_eq!(report.assigned, 2);
        {
            let state = shared.lock();
            assert_eq!(state.elevators[0].up_targets, vec![5, 8]);
            assert!(state.elevators[2].up_targets.is_empty());
            assert_eq!(state.requests[0].assignment, Waiting);
            assert_eq!(state.requests[1].assignment, Waiting);
        }

        // Cleanup
        terminate_tx.send(()).unwrap();
        unit_thread.join().unwrap();
    }

    #[test]
    fn test_fault_during_door_cycle() {
        // Arrange
        let mut state = SchedulingState::new(2, 10);
        state.elevators[0] = elevator_at(4, vec![4], vec![]);
        state.add_hall_call(4, Down);
        state.requests[0].assignment = Waiting;
        let shared = SharedState::from_state(state);
        let intake = RequestIntake::new(shared.clone());
        let config = ElevatorConfig {
            move_time: 10,
            door_time: 1000,
            time_slice: 2,
        };
        let (unit_thread, terminate_tx) = spawn_unit(0, &config, &shared);
        assert!(wait_until(&shared, TIMEOUT, |s| s.elevators[0].door_progress > 0.0));

        // Act
        intake.toggle_fault(0).unwrap();
        sleep(Duration::from_millis(30));

        // Assert
        let snapshot = shared.snapshot();
        assert_eq!(snapshot.elevators[0].behaviour, Behaviour::Fault);
        assert_eq!(snapshot.elevators[0].door_progress, 0.0);
        assert_eq!(snapshot.elevators[0].current_floor, 4);
        assert_eq!(snapshot.requests[0].assignment, Unassigned);

        // Cleanup
        terminate_tx.send(()).unwrap();
        unit_thread.join().unwrap();
    }

    #[test]
    fn test_fault_and_recovery_within_one_slice() {
        // Purpose: a recovery that lands before the unit wakes up still aborts the travel step

        // Arrange
        let mut state = SchedulingState::new(1, 10);
        state.elevators[0] = elevator_at(3, vec![6], vec![]);
        let shared = SharedState::from_state(state);
        let config = ElevatorConfig {
            move_time: 100,
            door_time: 10,
            time_slice: 20,
        };
        let (unit_thread, terminate_tx) = spawn_unit(0, &config, &shared);
        assert!(wait_until(&shared, TIMEOUT, |s| s.elevators[0].behaviour == Behaviour::MovingUp));

        // Act
        {
            let mut state = shared.lock();
            state.handle_fault(0);
            state.recover(0);
        }
        sleep(Duration::from_millis(300));

        // Assert
        let snapshot = shared.snapshot();
        assert_eq!(snapshot.elevators[0].current_floor, 0);
        assert_eq!(snapshot.elevators[0].behaviour, Behaviour::Normal);

        // Cleanup
        terminate_tx.send(()).unwrap();
        unit_thread.join().unwrap();
    }

    #[test]
    fn test_unit_terminates() {
        let shared = SharedState::new(1, 10);
        let (unit_thread, terminate_tx) = spawn_unit(0, &fast_elevator_config(), &shared);

        drop(terminate_tx);

        unit_thread.join().unwrap();
    }
}
