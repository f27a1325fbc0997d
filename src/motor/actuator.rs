// Actuator abstraction for the drive motors
//
// The hardware layer owns the real motor handles; the drive only needs
// something that accepts a normalized power in [-1, 1].

use std::cell::RefCell;
use std::rc::Rc;

use tracing::trace;

/// Error types for actuator writes
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ActuatorError {
    #[error("Motor {name} rejected non-finite power {power}")]
    NonFinite { name: &'static str, power: f64 },

    #[error("Motor {name} is disabled")]
    Disabled { name: &'static str },
}

pub type Result<T> = std::result::Result<T, ActuatorError>;

/// Anything that takes a normalized power command
pub trait Actuator {
    fn set_power(&mut self, power: f64) -> Result<()>;
}

/// Handles are shared with the hardware bundle, so a shared cell is an actuator too
impl<A: Actuator + ?Sized> Actuator for Rc<RefCell<A>> {
    fn set_power(&mut self, power: f64) -> Result<()> {
        self.borrow_mut().set_power(power)
    }
}

/// In-memory motor channel
///
/// Stores the last commanded power, clipped to [-1, 1] the way the motor
/// controller does. The runtime publishes these values each cycle.
#[derive(Debug, Clone)]
pub struct MotorChannel {
    name: &'static str,
    power: f64,
    enabled: bool,
    writes: u64,
}

impl MotorChannel {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            power: 0.0,
            enabled: true,
            writes: 0,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Last commanded power
    pub fn power(&self) -> f64 {
        self.power
    }

    /// Number of accepted writes since creation
    pub fn writes(&self) -> u64 {
        self.writes
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Disabling a channel zeroes it and rejects writes until re-enabled
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.power = 0.0;
        }
    }
}

impl Actuator for MotorChannel {
    fn set_power(&mut self, power: f64) -> Result<()> {
        if !power.is_finite() {
            return Err(ActuatorError::NonFinite {
                name: self.name,
                power,
            });
        }
        if !self.enabled {
            return Err(ActuatorError::Disabled { name: self.name });
        }

        self.power = power.clamp(-1.0, 1.0);
        self.writes += 1;
        trace!("{} <- {:.3}", self.name, self.power);
        Ok(())
    }
}
