pub mod unit;

pub use unit::next_action;
pub use unit::Action;
pub use unit::ElevatorUnit;

mod unit_tests;
