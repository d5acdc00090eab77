//! Deployment configuration, read from the function's environment

use crate::{
    error::ConfigError,
    render::{Renderer, DEFAULT_COACH_NAME, DEFAULT_CONSULTATION_URL},
};
use clap::Parser;
use std::{ffi::OsString, num::ParseIntError, time::Duration};

const DEFAULT_FROM_EMAIL: &str = "noreply@yourdomain.com";
const DEFAULT_ADMIN_EMAIL: &str = "admin@yourdomain.com";
const DEFAULT_REGION: &str = "us-east-1";
const DEFAULT_SEND_TIMEOUT_SECS: u64 = 10;

// An empty variable counts as unset.
fn timeout_secs(raw: &str) -> Result<u64, ParseIntError> {
    if raw.is_empty() {
        Ok(DEFAULT_SEND_TIMEOUT_SECS)
    } else {
        raw.parse()
    }
}

/// Quiz lead handler settings.
///
/// Every option has an environment variable, which is how a Lambda function
/// is configured; command line flags exist for local runs. Options set to an
/// empty value take their default.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "submit-quiz", about = "Capture IELTS quiz leads and send study-plan emails")]
pub struct Config {
    /// Sender address for both emails
    #[arg(long, env = "FROM_EMAIL", default_value = DEFAULT_FROM_EMAIL)]
    pub from_email: String,
    /// Recipient of new-lead notifications
    #[arg(long, env = "ADMIN_EMAIL", default_value = DEFAULT_ADMIN_EMAIL)]
    pub admin_email: String,
    /// Region of the SES endpoint
    #[arg(long, env = "AWS_REGION", default_value = DEFAULT_REGION)]
    pub region: String,
    /// Seconds to wait for each email send before treating it as failed
    #[arg(long, env = "SEND_TIMEOUT_SECS", default_value_t = DEFAULT_SEND_TIMEOUT_SECS, value_parser = timeout_secs)]
    pub send_timeout_secs: u64,
    /// Booking link in the user confirmation
    #[arg(long, env = "CONSULTATION_URL", default_value = DEFAULT_CONSULTATION_URL)]
    pub consultation_url: String,
    /// Signature in the user confirmation
    #[arg(long, env = "COACH_NAME", default_value = DEFAULT_COACH_NAME)]
    pub coach_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            from_email: DEFAULT_FROM_EMAIL.into(),
            admin_email: DEFAULT_ADMIN_EMAIL.into(),
            region: DEFAULT_REGION.into(),
            send_timeout_secs: DEFAULT_SEND_TIMEOUT_SECS,
            consultation_url: DEFAULT_CONSULTATION_URL.into(),
            coach_name: DEFAULT_COACH_NAME.into(),
        }
    }
}

impl Config {
    /// Load from the process environment and arguments
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Config::try_parse()?.fill_empty())
    }

    /// Load from explicit arguments, falling back to the environment
    pub fn load_from<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Ok(Config::try_parse_from(args)?.fill_empty())
    }

    fn fill_empty(mut self) -> Self {
        let defaults = Config::default();
        let fields = vec![
            (&mut self.from_email, defaults.from_email),
            (&mut self.admin_email, defaults.admin_email),
            (&mut self.region, defaults.region),
            (&mut self.consultation_url, defaults.consultation_url),
            (&mut self.coach_name, defaults.coach_name),
        ];
        for (field, default) in fields {
            if field.is_empty() {
                *field = default;
            }
        }
        self
    }

    /// Per-send timeout
    pub fn send_timeout(&self) -> Duration {
        Duration::from_secs(self.send_timeout_secs)
    }

    /// Renderer for this deployment's booking link and signature
    pub fn renderer(&self) -> Renderer {
        Renderer::new(self.consultation_url.clone(), self.coach_name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let config = Config::load_from(vec![
            "submit-quiz",
            "--from-email",
            "plans@example.com",
            "--admin-email",
            "owner@example.com",
            "--region",
            "eu-west-1",
            "--send-timeout-secs",
            "3",
            "--consultation-url",
            "https://example.com/book",
            "--coach-name",
            "Priya",
        ])
        .expect("failed to parse config");

        assert_eq!(config.from_email, "plans@example.com");
        assert_eq!(config.admin_email, "owner@example.com");
        assert_eq!(config.region, "eu-west-1");
        assert_eq!(config.send_timeout(), Duration::from_secs(3));
        assert_eq!(config.consultation_url, "https://example.com/book");
        assert_eq!(config.coach_name, "Priya");
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.from_email, "noreply@yourdomain.com");
        assert_eq!(config.admin_email, "admin@yourdomain.com");
        assert_eq!(config.region, "us-east-1");
        assert_eq!(config.send_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn empty_values_fall_back_to_defaults() {
        let config = Config::load_from(vec![
            "submit-quiz",
            "--from-email",
            "",
            "--admin-email=",
            "--coach-name",
            "",
            "--send-timeout-secs",
            "",
        ])
        .expect("failed to parse config");
        assert_eq!(config.from_email, "noreply@yourdomain.com");
        assert_eq!(config.admin_email, "admin@yourdomain.com");
        assert_eq!(config.coach_name, "[Your Name]");
        assert_eq!(config.send_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn empty_environment_variable_falls_back_to_default() {
        std::env::set_var("FROM_EMAIL", "");
        let config = Config::load_from(vec!["submit-quiz"]);
        std::env::remove_var("FROM_EMAIL");

        let config = config.expect("failed to parse config");
        assert_eq!(config.from_email, "noreply@yourdomain.com");
    }

    #[test]
    fn rejects_non_numeric_timeout() {
        match Config::load_from(vec!["submit-quiz", "--send-timeout-secs", "soon"]) {
            Err(ConfigError::Invalid(_)) => {}
            other => panic!("expected invalid config, got {:?}", other),
        }
    }
}
