//! Error types

use std::time::Duration;
use thiserror::Error;

/// Reasons a submission never reaches the lead pipeline
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// The request body is not a JSON submission object
    #[error("malformed submission body: {0}")]
    Malformed(#[from] serde_json::Error),
    /// One of `firstName`, `email` or `answers` is absent or empty
    #[error("Missing required fields")]
    MissingFields,
}

/// A single notification that could not be delivered
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The message could not be assembled for the email service
    #[error("failed to build message: {0}")]
    Build(String),
    /// The email service refused or failed the request
    #[error("email service rejected the message: {0}")]
    Rejected(String),
    /// The email service did not answer in time
    #[error("email send timed out after {0:?}")]
    Timeout(Duration),
}

/// Invalid environment configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable holds a value of the wrong shape
    #[error("invalid configuration: {0}")]
    Invalid(#[from] clap::Error),
}
