pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod store;
pub mod traits;

#[cfg(test)]
mod test_utils;

pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use http::HttpRaceApi;
pub use lifecycle::RaceLifecycle;
pub use store::RaceStore;
pub use traits::RaceApi;
