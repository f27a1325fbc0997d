// Drive module for the mecanum base
//
// Provides:
// - Two-stick mecanum mixing with ratio-preserving normalization
// - Replaceable joystick input curves
// - The drive controller with its timed auto-move

pub mod clock;
mod controller;
pub mod curve;
pub mod mecanum;

pub use clock::{Clock, ElapsedTime, ManualClock};
pub use controller::{AutoMoveState, MecanumDrive};
pub use curve::{InputCurve, shaped};
pub use mecanum::mix;
