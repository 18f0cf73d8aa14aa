/***************************************/
/*        3rd party libraries          */
/***************************************/
use log::{error, info, warn};
use std::str::FromStr;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::intake::RequestIntake;
use crate::shared::{AssignmentState, Behaviour, Direction, Snapshot};

/***************************************/
/*       Public data structures        */
/***************************************/

/// A line typed on the console, e.g. `hall 10 up`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Cabin { elevator: usize, floor: u8 },
    Hall { floor: u8, direction: Direction },
    Fault { elevator: usize },
    Status,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Command, String> {
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            ["cab", elevator, floor] => Ok(Command::Cabin {
                elevator: parse_number(elevator)?,
                floor: parse_number(floor)?,
            }),
            ["hall", floor, direction] => Ok(Command::Hall {
                floor: parse_number(floor)?,
                direction: parse_direction(direction)?,
            }),
            ["fault", elevator] => Ok(Command::Fault {
                elevator: parse_number(elevator)?,
            }),
            ["status"] => Ok(Command::Status),
            ["quit"] | ["exit"] => Ok(Command::Quit),
            _ => Err(format!(
                "unknown command '{}', expected: cab <elevator> <floor> | hall <floor> <up|down> | fault <elevator> | status | quit",
                line.trim()
            )),
        }
    }
}

fn parse_number<T: FromStr>(word: &str) -> Result<T, String> {
    word.parse::<T>()
        .map_err(|_| format!("'{}' is not a valid number", word))
}

fn parse_direction(word: &str) -> Result<Direction, String> {
    match word {
        "up" | "u" => Ok(Direction::Up),
        "down" | "d" => Ok(Direction::Down),
        _ => Err(format!("'{}' is not a direction, use up or down", word)),
    }
}

/***************************************/
/*             Public API              */
/***************************************/

/// Forwards a command to the intake and logs what happened.
pub fn execute(intake: &RequestIntake, snapshot: impl FnOnce() -> Snapshot, command: Command) {
    let result = match command {
        Command::Cabin { elevator, floor } => intake
            .press_cabin_button(elevator, floor)
            .map(|outcome| format!("cabin {} floor {}: {:?}", elevator, floor, outcome)),
        Command::Hall { floor, direction } => intake
            .press_hall_call(floor, direction)
            .map(|outcome| format!("hall call {:?} floor {}: {:?}", direction, floor, outcome)),
        Command::Fault { elevator } => intake
            .toggle_fault(elevator)
            .map(|behaviour| format!("elevator {} is now {:?}", elevator, behaviour)),
        Command::Status => {
            match serde_json::to_string_pretty(&snapshot()) {
                Ok(json) => println!("{}", json),
                Err(e) => error!("Failed to serialize snapshot: {}", e),
            }
            return;
        }
        Command::Quit => return,
    };

    match result {
        Ok(message) => info!("{}", message),
        Err(e) => warn!("{}", e),
    }
}

/// One line per elevator plus one for the pending hall calls.
pub fn summary(snapshot: &Snapshot) -> Vec<String> {
    let mut lines: Vec<String> = snapshot
        .elevators
        .iter()
        .map(|e| {
            let activity = match (e.behaviour, e.door_phase) {
                (Behaviour::DoorCycling, Some(phase)) => format!("door {:?}", phase).to_lowercase(),
                (Behaviour::MovingUp, _) => "moving up".to_string(),
                (Behaviour::MovingDown, _) => "moving down".to_string(),
                (Behaviour::Fault, _) => "FAULT".to_string(),
                _ => "idle".to_string(),
            };
            format!(
                "elevator {} | floor {:>2} | {:<12} | scan {:<4} | up {:?} down {:?}",
                e.id,
                e.current_floor,
                activity,
                format!("{:?}", e.scan_direction).to_lowercase(),
                e.up_targets,
                e.down_targets
            )
        })
        .collect();

    let pending: Vec<String> = snapshot
        .requests
        .iter()
        .filter(|r| r.assignment != AssignmentState::Finished)
        .map(|r| format!("{}{}", r.floor, if r.direction == Direction::Up { "^" } else { "v" }))
        .collect();
    lines.push(format!("hall calls | {}", pending.join(" ")));
    lines
}
