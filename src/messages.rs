// Define message types for the runtime

use serde::{Deserialize, Serialize};

use crate::motor::WheelPowers;
use crate::wrist::WristState;

// Command from teleop/scripts -> runtime
// Tagged by "type" so one topic carries every kind of command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DriveCommand {
    /// Raw two-stick gamepad frame
    Drive {
        left_x: f64,
        left_y: f64,
        right_x: f64,
        right_y: f64,
        #[serde(default)]
        apply_curve: bool,
    },
    /// Timed straight-line move
    AutoMove { speed: f64, duration_ms: f64 },
    /// Move the wrist to a preset
    Wrist { state: WristState },
    /// Stop the base and cancel any auto move
    Stop,
}

// Actuation output from runtime -> hardware
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct DriveActuation {
    pub front_left: f64,
    pub front_right: f64,
    pub rear_left: f64,
    pub rear_right: f64,
    pub wrist_target: i32,
    pub auto_move: bool,
}

impl DriveActuation {
    pub fn new(powers: WheelPowers, wrist_target: i32, auto_move: bool) -> Self {
        Self {
            front_left: powers.front_left,
            front_right: powers.front_right,
            rear_left: powers.rear_left,
            rear_right: powers.rear_right,
            wrist_target,
            auto_move,
        }
    }

    pub fn powers(&self) -> WheelPowers {
        WheelPowers::new(
            self.front_left,
            self.front_right,
            self.rear_left,
            self.rear_right,
        )
    }
}

/// Health status published by runtime
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeHealth {
    Ok,
    CmdStale,
    AutoMove,
}
