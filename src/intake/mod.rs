pub mod intake;

pub use intake::PressOutcome;
pub use intake::RequestIntake;
