// Four-motor hardware bundle for the mecanum base

use std::cell::RefCell;
use std::rc::Rc;

use tracing::info;

use super::actuator::{Actuator, MotorChannel, Result};

/// Motor channel shared between the hardware bundle and the drive
pub type SharedMotor = Rc<RefCell<MotorChannel>>;

/// Power values for the four wheels
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WheelPowers {
    pub front_left: f64,
    pub front_right: f64,
    pub rear_left: f64,
    pub rear_right: f64,
}

impl WheelPowers {
    pub fn new(front_left: f64, front_right: f64, rear_left: f64, rear_right: f64) -> Self {
        Self {
            front_left,
            front_right,
            rear_left,
            rear_right,
        }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Same power on every wheel (straight line)
    pub fn uniform(power: f64) -> Self {
        Self::new(power, power, power, power)
    }

    /// Returns powers as array [front_left, front_right, rear_left, rear_right]
    pub fn as_array(&self) -> [f64; 4] {
        [
            self.front_left,
            self.front_right,
            self.rear_left,
            self.rear_right,
        ]
    }

    /// Largest magnitude over the four wheels
    pub fn max_abs(&self) -> f64 {
        self.as_array().iter().fold(0.0f64, |max, v| max.max(v.abs()))
    }
}

impl From<[f64; 4]> for WheelPowers {
    fn from(v: [f64; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

/// The four drive actuators
#[derive(Debug, Clone)]
pub struct DriveMotors<A> {
    pub front_left: A,
    pub front_right: A,
    pub rear_left: A,
    pub rear_right: A,
}

impl<A: Actuator> DriveMotors<A> {
    pub fn new(front_left: A, front_right: A, rear_left: A, rear_right: A) -> Self {
        Self {
            front_left,
            front_right,
            rear_left,
            rear_right,
        }
    }

    /// Write all four powers in the fixed order FL, FR, RL, RR
    pub fn write(&mut self, powers: WheelPowers) -> Result<()> {
        self.front_left.set_power(powers.front_left)?;
        self.front_right.set_power(powers.front_right)?;
        self.rear_left.set_power(powers.rear_left)?;
        self.rear_right.set_power(powers.rear_right)
    }

    /// Zero every wheel, carrying on past failed channels
    ///
    /// Returns the first error, if any.
    pub fn halt(&mut self) -> Result<()> {
        let results = [
            self.front_left.set_power(0.0),
            self.front_right.set_power(0.0),
            self.rear_left.set_power(0.0),
            self.rear_right.set_power(0.0),
        ];
        results.into_iter().collect()
    }
}

impl DriveMotors<SharedMotor> {
    /// Fresh set of in-memory channels
    pub fn shared() -> Self {
        info!("Creating drive motor channels");
        Self {
            front_left: Rc::new(RefCell::new(MotorChannel::new("front_left"))),
            front_right: Rc::new(RefCell::new(MotorChannel::new("front_right"))),
            rear_left: Rc::new(RefCell::new(MotorChannel::new("rear_left"))),
            rear_right: Rc::new(RefCell::new(MotorChannel::new("rear_right"))),
        }
    }

    /// Read back the last commanded powers
    pub fn powers(&self) -> WheelPowers {
        WheelPowers::new(
            self.front_left.borrow().power(),
            self.front_right.borrow().power(),
            self.rear_left.borrow().power(),
            self.rear_right.borrow().power(),
        )
    }

    /// Enable or disable every channel at once
    pub fn set_enabled(&self, enabled: bool) {
        for motor in [
            &self.front_left,
            &self.front_right,
            &self.rear_left,
            &self.rear_right,
        ] {
            motor.borrow_mut().set_enabled(enabled);
        }
    }
}
