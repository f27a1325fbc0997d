// Mecanum drive controller
//
// Turns stick input into wheel powers and runs the timed auto-move used in
// teleop. Motor handles are shared with the hardware bundle; the drive only
// writes to them.

use tracing::{debug, info, warn};

use super::clock::Clock;
use super::curve::InputCurve;
use super::mecanum::mix;
use crate::motor::{Actuator, DriveMotors, Result, WheelPowers};

/// Timed straight-line move state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AutoMoveState {
    Idle,
    Moving { speed: f64, duration_ms: f64 },
}

/// Drive base with four mecanum wheels
pub struct MecanumDrive<A, C> {
    motors: DriveMotors<A>,
    clock: C,
    curve: InputCurve,
    auto_move: AutoMoveState,
}

impl<A: Actuator, C: Clock> MecanumDrive<A, C> {
    /// Create a drive over the given motors, using the squared input curve
    pub fn new(motors: DriveMotors<A>, clock: C) -> Self {
        Self {
            motors,
            clock,
            curve: InputCurve::default(),
            auto_move: AutoMoveState::Idle,
        }
    }

    /// Replace the input curve
    pub fn with_curve(mut self, curve: InputCurve) -> Self {
        self.curve = curve;
        self
    }

    pub fn set_curve(&mut self, curve: InputCurve) {
        debug!("Input curve set to {:?}", curve);
        self.curve = curve;
    }

    pub fn curve(&self) -> InputCurve {
        self.curve
    }

    /// Calculate wheel powers for the given stick positions
    ///
    /// # Returns
    /// `[front_left, front_right, rear_left, rear_right]`, each in [-1, 1]
    pub fn calc_velocities(
        &self,
        left_x: f64,
        left_y: f64,
        right_x: f64,
        right_y: f64,
        apply_curve: bool,
    ) -> [f64; 4] {
        let curve = apply_curve.then_some(&self.curve);
        mix(left_x, left_y, right_x, right_y, curve).as_array()
    }

    /// Calculate wheel powers and send them to the motors
    pub fn apply_power(
        &mut self,
        left_x: f64,
        left_y: f64,
        right_x: f64,
        right_y: f64,
        apply_curve: bool,
    ) -> Result<()> {
        let powers = self.calc_velocities(left_x, left_y, right_x, right_y, apply_curve);
        self.write_powers(WheelPowers::from(powers))
    }

    /// Send explicit powers, front-left first
    pub fn write_powers(&mut self, powers: WheelPowers) -> Result<()> {
        debug!(
            "Setting wheel powers: fl={:.3}, fr={:.3}, rl={:.3}, rr={:.3}",
            powers.front_left, powers.front_right, powers.rear_left, powers.rear_right
        );
        self.motors.write(powers)
    }

    /// Zero all four motors
    pub fn stop(&mut self) -> Result<()> {
        self.motors.halt()
    }

    /// Drive every wheel at `speed` for `duration_ms`
    ///
    /// Calling again while a move is running restarts the timer with the new
    /// speed and duration. If any wheel rejects the command the base is
    /// stopped and the drive stays idle.
    pub fn start_auto_move(&mut self, speed: f64, duration_ms: f64) -> Result<()> {
        if let AutoMoveState::Moving { .. } = self.auto_move {
            info!("Restarting auto move");
        }
        info!("Auto move: speed={:.2} for {}ms", speed, duration_ms);

        if let Err(e) = self.motors.write(WheelPowers::uniform(speed)) {
            warn!("Auto move aborted: {}", e);
            self.auto_move = AutoMoveState::Idle;
            if let Err(stop_err) = self.motors.halt() {
                warn!("Failed to stop after aborted auto move: {}", stop_err);
            }
            return Err(e);
        }

        self.auto_move = AutoMoveState::Moving { speed, duration_ms };
        self.clock.reset();
        Ok(())
    }

    /// End the auto move once its duration has elapsed
    ///
    /// Only flips the state; the motors keep their last power. Returns true on
    /// the cycle the move finishes, so the caller can stop the base. Use
    /// [`update_auto_move`](Self::update_auto_move) to do both.
    pub fn check_auto_move_done(&mut self) -> bool {
        match self.auto_move {
            AutoMoveState::Moving { duration_ms, .. } if self.clock.elapsed_ms() >= duration_ms => {
                info!("Auto move done after {:.0}ms", self.clock.elapsed_ms());
                self.auto_move = AutoMoveState::Idle;
                true
            }
            _ => false,
        }
    }

    /// Check the auto move and stop the motors when it finishes
    pub fn update_auto_move(&mut self) -> Result<bool> {
        let finished = self.check_auto_move_done();
        if finished {
            self.stop()?;
        }
        Ok(finished)
    }

    /// Abort a running auto move and stop the motors
    pub fn cancel_auto_move(&mut self) -> Result<()> {
        if self.is_auto_move_active() {
            info!("Auto move cancelled");
        }
        self.auto_move = AutoMoveState::Idle;
        self.stop()
    }

    pub fn is_auto_move_active(&self) -> bool {
        matches!(self.auto_move, AutoMoveState::Moving { .. })
    }

    pub fn auto_move_state(&self) -> AutoMoveState {
        self.auto_move
    }

    pub fn motors(&self) -> &DriveMotors<A> {
        &self.motors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drive::clock::ManualClock;
    use crate::motor::SharedMotor;

    fn setup() -> (
        MecanumDrive<SharedMotor, ManualClock>,
        DriveMotors<SharedMotor>,
        ManualClock,
    ) {
        let hw = DriveMotors::shared();
        let clock = ManualClock::new();
        let drive = MecanumDrive::new(hw.clone(), clock.clone());
        (drive, hw, clock)
    }

    #[test]
    fn test_calc_velocities_scenarios() {
        let (drive, _, _) = setup();
        assert_eq!(drive.calc_velocities(0.0, 1.0, 0.0, 1.0, false), [1.0; 4]);
        assert_eq!(
            drive.calc_velocities(1.0, 0.0, 0.0, 0.0, false),
            [1.0, -1.0, -1.0, 1.0]
        );
    }

    #[test]
    fn test_curve_is_replaceable() {
        let (drive, _, _) = setup();
        let drive = drive.with_curve(InputCurve::Linear);
        assert_eq!(drive.calc_velocities(0.0, 0.5, 0.0, 0.0, true), [0.5; 4]);

        let (mut drive, _, _) = setup();
        assert_eq!(drive.calc_velocities(0.0, 0.5, 0.0, 0.0, true), [0.25; 4]);
        drive.set_curve(InputCurve::Cubic);
        assert_eq!(drive.calc_velocities(0.0, 0.5, 0.0, 0.0, true), [0.125; 4]);
        // Curve flag off ignores the configured curve
        assert_eq!(drive.calc_velocities(0.0, 0.5, 0.0, 0.0, false), [0.5; 4]);
    }

    #[test]
    fn test_apply_power_writes_each_wheel() {
        let (mut drive, hw, _) = setup();
        drive.apply_power(0.0, 0.0, 0.5, 0.0, false).unwrap();
        let powers = hw.powers();
        assert_eq!(powers.front_left, 0.5);
        assert_eq!(powers.front_right, -0.5);
        assert_eq!(powers.rear_left, 0.5);
        assert_eq!(powers.rear_right, -0.5);
    }

    #[test]
    fn test_auto_move_times_out() {
        let (mut drive, hw, clock) = setup();
        clock.set(5000.0);
        drive.start_auto_move(0.5, 1000.0).unwrap();
        assert_eq!(clock.elapsed_ms(), 0.0, "start should reset the clock");
        assert_eq!(hw.powers(), WheelPowers::uniform(0.5));
        assert!(drive.is_auto_move_active());

        clock.set(500.0);
        assert!(!drive.check_auto_move_done());
        assert!(drive.is_auto_move_active());

        clock.set(1000.0);
        assert!(drive.check_auto_move_done());
        assert!(!drive.is_auto_move_active());

        // State flip alone leaves the motors running
        assert_eq!(hw.powers(), WheelPowers::uniform(0.5));
        assert!(!drive.check_auto_move_done(), "already idle");
    }

    #[test]
    fn test_restart_overwrites_speed_and_timer() {
        let (mut drive, hw, clock) = setup();
        drive.start_auto_move(0.5, 1000.0).unwrap();
        clock.set(800.0);
        drive.start_auto_move(-0.3, 1000.0).unwrap();
        assert_eq!(hw.powers(), WheelPowers::uniform(-0.3));
        assert_eq!(
            drive.auto_move_state(),
            AutoMoveState::Moving {
                speed: -0.3,
                duration_ms: 1000.0
            }
        );

        clock.set(900.0);
        drive.check_auto_move_done();
        assert!(drive.is_auto_move_active(), "timer should have restarted");
    }

    #[test]
    fn test_update_auto_move_stops_motors() {
        let (mut drive, hw, clock) = setup();
        drive.start_auto_move(0.7, 250.0).unwrap();
        clock.set(100.0);
        assert!(!drive.update_auto_move().unwrap());
        assert_eq!(hw.powers(), WheelPowers::uniform(0.7));

        clock.set(300.0);
        assert!(drive.update_auto_move().unwrap());
        assert_eq!(hw.powers(), WheelPowers::zero());
    }

    #[test]
    fn test_cancel_auto_move() {
        let (mut drive, hw, _) = setup();
        drive.start_auto_move(0.4, 10_000.0).unwrap();
        drive.cancel_auto_move().unwrap();
        assert!(!drive.is_auto_move_active());
        assert_eq!(hw.powers(), WheelPowers::zero());
    }

    #[test]
    fn test_failed_start_leaves_drive_idle_and_stopped() {
        let (mut drive, hw, _) = setup();
        hw.rear_left.borrow_mut().set_enabled(false);
        assert!(drive.start_auto_move(0.5, 1000.0).is_err());
        assert!(!drive.is_auto_move_active());
        assert_eq!(drive.auto_move_state(), AutoMoveState::Idle);
        assert_eq!(hw.powers(), WheelPowers::zero(), "no wheel may keep driving");
    }

    #[test]
    fn test_failed_restart_cancels_running_move() {
        let (mut drive, hw, _) = setup();
        drive.start_auto_move(0.5, 1000.0).unwrap();
        hw.front_right.borrow_mut().set_enabled(false);
        assert!(drive.start_auto_move(0.8, 1000.0).is_err());
        assert!(!drive.is_auto_move_active());
        assert_eq!(hw.powers(), WheelPowers::zero());
    }

    #[test]
    fn test_zero_duration_finishes_on_first_check() {
        let (mut drive, _, _) = setup();
        drive.start_auto_move(0.2, 0.0).unwrap();
        assert!(drive.check_auto_move_done());
    }
}
