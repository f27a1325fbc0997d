// Control loop with watchdog
// Note: a watchdog is a safety mechanism that triggers a safe action if something goes wrong
// Eg. without it if teleop crashes mid-drive, the base would keep its last wheel powers forever

use std::time::{Duration, Instant};
use tokio::time::interval;
use tracing::{debug, info, warn};

use crate::config::RuntimeConfig;
use crate::drive::{Clock, ElapsedTime, MecanumDrive};
use crate::messages::{DriveActuation, DriveCommand, RuntimeHealth};
use crate::motor::{DriveMotors, Result, SharedMotor};
use crate::wrist::WristSetpoints;

pub struct Runtime<C> {
    drive: MecanumDrive<SharedMotor, C>,
    motors: DriveMotors<SharedMotor>,
    wrist_table: WristSetpoints,
    wrist_target: i32,
    drive_received_at: Option<Instant>,
    cmd_timeout: Duration,
    health: RuntimeHealth,
}

impl Runtime<ElapsedTime> {
    pub fn new(config: &RuntimeConfig) -> Self {
        Self::with_clock(config, ElapsedTime::new())
    }
}

impl<C: Clock> Runtime<C> {
    pub fn with_clock(config: &RuntimeConfig, clock: C) -> Self {
        let motors = DriveMotors::shared();
        let drive = MecanumDrive::new(motors.clone(), clock).with_curve(config.input_curve);
        Self {
            drive,
            motors,
            wrist_table: config.wrist,
            wrist_target: config.wrist.start,
            drive_received_at: None,
            cmd_timeout: config.cmd_timeout(),
            health: RuntimeHealth::CmdStale, // Start stale until first cmd
        }
    }

    pub fn health(&self) -> RuntimeHealth {
        self.health
    }

    /// Process incoming command
    pub fn on_command(&mut self, cmd: DriveCommand) -> Result<()> {
        self.on_command_at(cmd, Instant::now())
    }

    pub fn on_command_at(&mut self, cmd: DriveCommand, now: Instant) -> Result<()> {
        match cmd {
            DriveCommand::Drive {
                left_x,
                left_y,
                right_x,
                right_y,
                apply_curve,
            } => {
                if self.drive.is_auto_move_active() {
                    debug!("Ignoring stick input during auto move");
                    return Ok(());
                }
                self.drive
                    .apply_power(left_x, left_y, right_x, right_y, apply_curve)?;
                self.drive_received_at = Some(now);
            }
            DriveCommand::AutoMove { speed, duration_ms } => {
                self.drive.start_auto_move(speed, duration_ms)?;
            }
            DriveCommand::Wrist { state } => {
                self.wrist_target = self.wrist_table.setpoint_for(state);
                info!("Wrist -> {:?} ({} ticks)", state, self.wrist_target);
            }
            DriveCommand::Stop => {
                info!("Stop requested");
                self.drive.cancel_auto_move()?;
                self.drive_received_at = None;
            }
        }
        Ok(())
    }

    /// Parse and apply one raw command payload
    ///
    /// Bad JSON and rejected motor writes are logged and dropped so a single
    /// command can never take the loop down. Returns true if the command was
    /// applied.
    pub fn handle_payload(&mut self, payload: &[u8]) -> bool {
        match serde_json::from_slice::<DriveCommand>(payload) {
            Ok(cmd) => {
                debug!("Received command: {:?}", &cmd);
                match self.on_command(cmd) {
                    Ok(()) => true,
                    Err(e) => {
                        warn!("Failed to apply command: {}", e);
                        false
                    }
                }
            }
            Err(e) => {
                warn!("Failed to parse command: {}", e);
                false
            }
        }
    }

    /// Run one control cycle and return the actuation to publish
    pub fn tick(&mut self) -> Result<DriveActuation> {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> Result<DriveActuation> {
        if self.drive.update_auto_move()? {
            // Stick input from before the move is not resumed
            self.drive_received_at = None;
        }

        if self.drive.is_auto_move_active() {
            self.health = RuntimeHealth::AutoMove;
        } else {
            let fresh = self
                .drive_received_at
                .is_some_and(|at| now.saturating_duration_since(at) <= self.cmd_timeout);

            if fresh {
                self.health = RuntimeHealth::Ok;
            } else {
                // Watchdog triggered - stop the robot
                if self.health != RuntimeHealth::CmdStale {
                    warn!("Drive command stale, stopping robot");
                }
                self.health = RuntimeHealth::CmdStale;
                self.drive.stop()?;
            }
        }

        Ok(DriveActuation::new(
            self.motors.powers(),
            self.wrist_target,
            self.drive.is_auto_move_active(),
        ))
    }
}

pub async fn run(
    config: RuntimeConfig,
) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
    info!("Opening Zenoh session...");
    let session = zenoh::open(zenoh::Config::default()).await?;

    info!("Setting up publishers and subscribers...");
    let subscriber = session.declare_subscriber(config.topics.cmd.clone()).await?;
    let pub_actuation = session
        .declare_publisher(config.topics.actuation.clone())
        .await?;
    let pub_health = session.declare_publisher(config.topics.health.clone()).await?;

    let mut runtime = Runtime::new(&config);
    let mut tick = interval(config.loop_period());

    info!(
        "Runtime started: {}Hz loop, {}ms watchdog timeout, {:?} input curve",
        config.loop_hz, config.cmd_timeout_ms, config.input_curve
    );
    info!("Subscribed to: {}", config.topics.cmd);
    info!(
        "Publishing to: {}, {}",
        config.topics.actuation, config.topics.health
    );

    loop {
        tick.tick().await;

        // 1. Drain all pending commands (non-blocking), in arrival order
        while let Ok(Some(sample)) = subscriber.try_recv() {
            let payload = sample.payload().to_bytes();
            runtime.handle_payload(&payload);
        }

        // 2. Run the drive cycle (auto move + watchdog)
        match runtime.tick() {
            Ok(actuation) => {
                // 3. Publish actuation
                let actuation_json = serde_json::to_string(&actuation)?;
                pub_actuation.put(actuation_json).await?;
            }
            Err(e) => {
                warn!("Drive cycle failed: {}", e);
            }
        }

        // 4. Publish health
        let health_json = serde_json::to_string(&runtime.health)?;
        pub_health.put(health_json).await?;
    }
}
