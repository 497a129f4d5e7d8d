use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error, PartialEq)]
pub enum PlanError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("no cell for position `{position}` at {key}")]
    UnknownCell { position: String, key: String },
}
