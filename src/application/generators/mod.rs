// Event generators - One typed event per simulated tick
pub mod alert;
pub mod health;
pub mod mission;
pub mod mode;
pub mod telemetry;
pub mod vision;
