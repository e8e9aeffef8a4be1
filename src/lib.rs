pub mod api;
pub mod config;
pub mod database;
pub mod error;
pub mod logger;
pub mod model;
pub mod service;

/// Errors that remember where in the source they were raised.
pub trait Located {
    fn location(&self) -> snafu::Location;
}
