// bopi-api: Async Rust client for the BoPi pool controller local HTTP API

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::BopiClient;
pub use error::{ConfigField, Error};
pub use models::{RelayState, SensorsState};
pub use transport::TransportConfig;
