//! Scenario error types

use surge_config::ConfigError;
use surge_events::EventError;
use surge_http::HttpError;
use surge_phase::ExchangeError;
use thiserror::Error;

pub type ScenarioResult<T> = Result<T, ScenarioError>;

#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("Phase data error: {0}")]
    Exchange(#[from] ExchangeError),

    #[error("Invalid event wait: {0}")]
    Event(#[from] EventError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Check failed: {0}")]
    CheckFailed(String),

    #[error("Missing data: {0}")]
    MissingData(String),

    #[error("Setup of {phase} failed: {source}")]
    Setup {
        phase: &'static str,
        #[source]
        source: Box<ScenarioError>,
    },

    #[error("Unknown phase '{0}'")]
    UnknownPhase(String),
}

impl ScenarioError {
    pub fn missing(what: impl Into<String>) -> Self {
        ScenarioError::MissingData(what.into())
    }
}
