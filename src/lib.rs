pub mod config;
pub mod drive;
pub mod messages;
pub mod motor;
pub mod runtime;
pub mod wrist;
