// Motor layer for the mecanum base
//
// Provides:
// - The actuator trait the drive writes through
// - In-memory motor channels shared between drive and runtime
// - The four-wheel motor bundle

mod actuator;
mod bundle;

pub use actuator::{Actuator, ActuatorError, MotorChannel, Result};
pub use bundle::{DriveMotors, SharedMotor, WheelPowers};
