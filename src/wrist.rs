// Glyph wrist presets
//
// Each wrist state maps to a fixed encoder setpoint (ticks). The table is
// plain data so a gearbox change is a config edit, not a code change.

use serde::{Deserialize, Serialize};

/// Named wrist positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WristState {
    Start,
    Front,
    Back,
    RelicPickup,
    RelicPlace,
    RelicDone,
}

impl WristState {
    pub const ALL: [WristState; 6] = [
        WristState::Start,
        WristState::Front,
        WristState::Back,
        WristState::RelicPickup,
        WristState::RelicPlace,
        WristState::RelicDone,
    ];

    /// Setpoint from the default (20:1 gearbox) table
    pub fn setpoint(self) -> i32 {
        WristSetpoints::default().setpoint_for(self)
    }
}

/// Encoder setpoints for every wrist state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WristSetpoints {
    pub start: i32,
    pub front: i32,
    pub back: i32,
    pub relic_pickup: i32,
    pub relic_place: i32,
    pub relic_done: i32,
}

impl WristSetpoints {
    /// Tuning for the 20:1 gearbox currently on the robot
    pub const fn gearbox_20_1() -> Self {
        Self {
            start: 0,
            front: -620,
            back: 620,
            relic_pickup: 402,
            relic_place: 40,
            relic_done: -400,
        }
    }

    /// Tuning for the older 40:1 gearbox
    pub const fn gearbox_40_1() -> Self {
        Self {
            start: 0,
            front: -1240,
            back: 1240,
            relic_pickup: 804,
            relic_place: 80,
            relic_done: -800,
        }
    }

    pub fn setpoint_for(&self, state: WristState) -> i32 {
        match state {
            WristState::Start => self.start,
            WristState::Front => self.front,
            WristState::Back => self.back,
            WristState::RelicPickup => self.relic_pickup,
            WristState::RelicPlace => self.relic_place,
            WristState::RelicDone => self.relic_done,
        }
    }
}

impl Default for WristSetpoints {
    fn default() -> Self {
        Self::gearbox_20_1()
    }
}
