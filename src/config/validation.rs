//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses parse before anything binds or dials
//! - Validate value ranges (timeouts > 0, connection limit > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BridgeConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::BridgeConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem found in a configuration.
#[derive(Debug)]
pub enum ValidationError {
    InvalidBindAddress { value: String },
    ZeroMaxConnections,
    EmptyBackendAddress,
    BackendAddressMissingScheme { value: String },
    ZeroConnectTimeout,
    InvalidMetricsAddress { value: String },
    UnknownLogLevel { value: String },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::InvalidBindAddress { value } => {
                write!(f, "listener.bind_address {:?} is not a socket address", value)
            }
            ValidationError::ZeroMaxConnections => {
                write!(f, "listener.max_connections must be greater than zero")
            }
            ValidationError::EmptyBackendAddress => {
                write!(f, "backend.address must not be empty")
            }
            ValidationError::BackendAddressMissingScheme { value } => {
                write!(f, "backend.address {:?} must start with http:// or https://", value)
            }
            ValidationError::ZeroConnectTimeout => {
                write!(f, "backend.connect_timeout_secs must be greater than zero")
            }
            ValidationError::InvalidMetricsAddress { value } => {
                write!(f, "observability.metrics_address {:?} is not a socket address", value)
            }
            ValidationError::UnknownLogLevel { value } => {
                write!(f, "observability.log_level {:?} is not one of {}", value, LOG_LEVELS.join("|"))
            }
        }
    }
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &BridgeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress {
            value: config.listener.bind_address.clone(),
        });
    }

    if config.listener.max_connections == 0 {
        errors.push(ValidationError::ZeroMaxConnections);
    }

    if config.backend.address.is_empty() {
        errors.push(ValidationError::EmptyBackendAddress);
    } else if !config.backend.address.starts_with("http://")
        && !config.backend.address.starts_with("https://")
    {
        errors.push(ValidationError::BackendAddressMissingScheme {
            value: config.backend.address.clone(),
        });
    }

    if config.backend.connect_timeout_secs == 0 {
        errors.push(ValidationError::ZeroConnectTimeout);
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress {
            value: config.observability.metrics_address.clone(),
        });
    }

    if !LOG_LEVELS.contains(&config.observability.log_level.to_lowercase().as_str()) {
        errors.push(ValidationError::UnknownLogLevel {
            value: config.observability.log_level.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
