// Keyboard teleop as a virtual two-stick gamepad
//
// Left stick:  W/S forward-back, A/D turn
// Right stick: I/K forward-back, J/L strafe
// R/F speed, Space auto move, 1-6 wrist presets, X stop, Q quit
//
// Pass the runtime's --config file so both ends agree on the command topic.
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::info;

use rrbot_mecanum_runtime::config::RuntimeConfig;
use rrbot_mecanum_runtime::messages::DriveCommand;
use rrbot_mecanum_runtime::wrist::WristState;

const STICK_LEVELS: [f64; 3] = [0.4, 0.7, 1.0]; // stick deflection
const AUTO_MOVE_SPEED: f64 = 0.5;
const AUTO_MOVE_MS: f64 = 1000.0;
const INPUT_TIMEOUT_MS: u64 = 100; // Center sticks after this much time with no input

/// Keyboard gamepad for the mecanum runtime
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Same TOML file the runtime was started with
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Default, Clone, Copy)]
struct Sticks {
    left_x: f64,
    left_y: f64,
    right_x: f64,
    right_y: f64,
}

impl Sticks {
    fn command(&self) -> DriveCommand {
        DriveCommand::Drive {
            left_x: self.left_x,
            left_y: self.left_y,
            right_x: self.right_x,
            right_y: self.right_y,
            apply_curve: true,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let args = Args::parse();
    let config = RuntimeConfig::load(args.config.as_deref())?;

    info!("Opening Zenoh session...");
    let session = zenoh::open(zenoh::Config::default()).await?;
    let publisher = session.declare_publisher(config.topics.cmd.clone()).await?;
    info!("Publishing to: {}", config.topics.cmd);

    info!("Controls: WASD=left stick, IJKL=right stick, R/F=level, Space=auto move");
    info!("          1-6=wrist preset, X=stop, Q=quit");
    print_level(0);

    enable_raw_mode()?;
    let result = run_teleop(&publisher).await;
    disable_raw_mode()?;

    result
}

async fn send(
    publisher: &zenoh::pubsub::Publisher<'_>,
    cmd: &DriveCommand,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    publisher.put(serde_json::to_string(cmd)?).await?;
    Ok(())
}

async fn run_teleop(
    publisher: &zenoh::pubsub::Publisher<'_>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut level: usize = 0;

    // Persistent stick state
    let mut sticks = Sticks::default();
    let mut last_stick_input = Instant::now();

    loop {
        // Poll for key with 20ms timeout (50Hz effective rate)
        if event::poll(Duration::from_millis(20))? {
            if let Event::Key(KeyEvent { code, kind, .. }) = event::read()? {
                let pressed = kind == KeyEventKind::Press || kind == KeyEventKind::Repeat;
                let deflection = STICK_LEVELS[level];

                match code {
                    // Left stick
                    KeyCode::Char('w') if pressed => {
                        sticks.left_y = deflection;
                        last_stick_input = Instant::now();
                    }
                    KeyCode::Char('s') if pressed => {
                        sticks.left_y = -deflection;
                        last_stick_input = Instant::now();
                    }
                    KeyCode::Char('a') if pressed => {
                        sticks.left_x = -deflection;
                        last_stick_input = Instant::now();
                    }
                    KeyCode::Char('d') if pressed => {
                        sticks.left_x = deflection;
                        last_stick_input = Instant::now();
                    }

                    // Right stick
                    KeyCode::Char('i') if pressed => {
                        sticks.right_y = deflection;
                        last_stick_input = Instant::now();
                    }
                    KeyCode::Char('k') if pressed => {
                        sticks.right_y = -deflection;
                        last_stick_input = Instant::now();
                    }
                    KeyCode::Char('j') if pressed => {
                        sticks.right_x = -deflection;
                        last_stick_input = Instant::now();
                    }
                    KeyCode::Char('l') if pressed => {
                        sticks.right_x = deflection;
                        last_stick_input = Instant::now();
                    }

                    // Stick level
                    KeyCode::Char('r') if pressed => {
                        level = (level + 1).min(STICK_LEVELS.len() - 1);
                        print_level(level);
                    }
                    KeyCode::Char('f') if pressed => {
                        level = level.saturating_sub(1);
                        print_level(level);
                    }

                    KeyCode::Char(' ') if kind == KeyEventKind::Press => {
                        info!("Auto move {}ms at {}", AUTO_MOVE_MS, AUTO_MOVE_SPEED);
                        let cmd = DriveCommand::AutoMove {
                            speed: AUTO_MOVE_SPEED,
                            duration_ms: AUTO_MOVE_MS,
                        };
                        send(publisher, &cmd).await?;
                    }

                    KeyCode::Char(c @ '1'..='6') if kind == KeyEventKind::Press => {
                        let state = WristState::ALL[(c as u8 - b'1') as usize];
                        info!("Wrist: {:?}", state);
                        send(publisher, &DriveCommand::Wrist { state }).await?;
                    }

                    KeyCode::Char('x') if pressed => {
                        sticks = Sticks::default();
                        send(publisher, &DriveCommand::Stop).await?;
                    }

                    // Quit
                    KeyCode::Char('q') | KeyCode::Esc if pressed => {
                        send(publisher, &DriveCommand::Stop).await?;
                        break;
                    }

                    _ => {}
                }
            }
        }

        // Center sticks if no input for INPUT_TIMEOUT_MS
        if last_stick_input.elapsed() > Duration::from_millis(INPUT_TIMEOUT_MS) {
            sticks = Sticks::default();
        }

        // Always publish at ~50Hz
        send(publisher, &sticks.command()).await?;
    }

    Ok(())
}

fn print_level(idx: usize) {
    let label = ["LOW", "MED", "HIGH"][idx];
    info!("Stick level: {}", label);
}
