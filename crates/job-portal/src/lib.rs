pub mod config;
pub mod error;
pub mod intake;
pub mod portal;
pub mod proxy;
pub mod telemetry;
