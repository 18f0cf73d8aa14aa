pub mod macros;
pub mod state;
pub mod structs;

pub use state::SchedulingState;
pub use state::SharedState;
pub use structs::AssignmentState;
pub use structs::Behaviour;
pub use structs::Direction;
pub use structs::DoorPhase;
pub use structs::Elevator;
pub use structs::ElevatorSnapshot;
pub use structs::ExternalRequest;
pub use structs::Snapshot;
