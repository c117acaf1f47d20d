//! Application configuration loaded from environment variables.

use std::str::FromStr;

use chrono::{DateTime, TimeDelta, Utc};
use common::Money;
use domain::DateRange;
use thiserror::Error;

/// Errors raised while reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(invalid("LOG_FORMAT", s)),
        }
    }
}

/// Gateway operation the demo gateway is told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GatewayFailure {
    #[default]
    None,
    Authorize,
    Capture,
    Refund,
}

impl FromStr for GatewayFailure {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" | "" => Ok(Self::None),
            "authorize" => Ok(Self::Authorize),
            "capture" => Ok(Self::Capture),
            "refund" => Ok(Self::Refund),
            _ => Err(invalid("BOOKING_GATEWAY_FAILURE", s)),
        }
    }
}

/// How the demo booking is driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookingMode {
    /// The coordinator runs every step in one call.
    #[default]
    Orchestrated,
    /// Published events are fed back through the booking event handler.
    EventDriven,
}

impl FromStr for BookingMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "orchestrated" => Ok(Self::Orchestrated),
            "event-driven" | "event_driven" => Ok(Self::EventDriven),
            _ => Err(invalid("BOOKING_MODE", s)),
        }
    }
}

/// Demo configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `LOG_FORMAT`: `text` or `json` (default: `text`)
/// - `BOOKING_CURRENCY`: ISO currency code (default: `"USD"`)
/// - `BOOKING_NIGHTLY_RATE_CENTS`: price per night (default: `15000`)
/// - `BOOKING_NIGHTS`: length of stay (default: `2`)
/// - `BOOKING_CHECK_IN_DAYS`: days from now until check-in (default: `7`)
/// - `BOOKING_GATEWAY_FAILURE`: `none`, `authorize`, `capture` or `refund`
/// - `BOOKING_MODE`: `orchestrated` or `event-driven`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub log_level: String,
    pub log_format: LogFormat,
    pub currency: String,
    pub nightly_rate_cents: i64,
    pub nights: i64,
    pub check_in_days: i64,
    pub gateway_failure: GatewayFailure,
    pub mode: BookingMode,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Loads configuration through `lookup`, falling back to defaults for
    /// unset variables.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let config = Self {
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            log_format: parse_or(&lookup, "LOG_FORMAT", defaults.log_format)?,
            currency: lookup("BOOKING_CURRENCY").unwrap_or(defaults.currency),
            nightly_rate_cents: parse_or(
                &lookup,
                "BOOKING_NIGHTLY_RATE_CENTS",
                defaults.nightly_rate_cents,
            )?,
            nights: positive(
                parse_or(&lookup, "BOOKING_NIGHTS", defaults.nights)?,
                "BOOKING_NIGHTS",
            )?,
            check_in_days: parse_or(&lookup, "BOOKING_CHECK_IN_DAYS", defaults.check_in_days)?,
            gateway_failure: parse_or(
                &lookup,
                "BOOKING_GATEWAY_FAILURE",
                defaults.gateway_failure,
            )?,
            mode: parse_or(&lookup, "BOOKING_MODE", defaults.mode)?,
        };
        config.validate(Utc::now())?;
        Ok(config)
    }

    /// Checks that the price and stay derived from this configuration are
    /// representable when booking at `now`.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<(), ConfigError> {
        if self.nightly_rate_cents < 0 {
            return Err(invalid(
                "BOOKING_NIGHTLY_RATE_CENTS",
                &self.nightly_rate_cents.to_string(),
            ));
        }
        positive(self.nights, "BOOKING_NIGHTS")?;
        self.total_amount()?;
        self.stay(now)?;
        Ok(())
    }

    /// Returns the total price of the configured stay.
    pub fn total_amount(&self) -> Result<Money, ConfigError> {
        let total = self
            .nightly_rate_cents
            .checked_mul(self.nights)
            .ok_or_else(|| {
                invalid(
                    "BOOKING_NIGHTLY_RATE_CENTS",
                    &self.nightly_rate_cents.to_string(),
                )
            })?;
        Ok(Money::new(total, &self.currency))
    }

    /// Returns the configured stay for a booking made at `now`.
    pub fn stay(&self, now: DateTime<Utc>) -> Result<DateRange, ConfigError> {
        let check_in = TimeDelta::try_days(self.check_in_days)
            .and_then(|offset| now.checked_add_signed(offset))
            .ok_or_else(|| invalid("BOOKING_CHECK_IN_DAYS", &self.check_in_days.to_string()))?;
        let check_out = TimeDelta::try_days(self.nights)
            .and_then(|length| check_in.checked_add_signed(length))
            .ok_or_else(|| invalid("BOOKING_NIGHTS", &self.nights.to_string()))?;
        Ok(DateRange::new(check_in, check_out))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            currency: "USD".to_string(),
            nightly_rate_cents: 15000,
            nights: 2,
            check_in_days: 7,
            gateway_failure: GatewayFailure::None,
            mode: BookingMode::Orchestrated,
        }
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(var) {
        Some(value) => value.trim().parse().map_err(|_| invalid(var, &value)),
        None => Ok(default),
    }
}

fn positive(value: i64, var: &'static str) -> Result<i64, ConfigError> {
    if value > 0 {
        Ok(value)
    } else {
        Err(invalid(var, &value.to_string()))
    }
}

fn invalid(var: &'static str, value: &str) -> ConfigError {
    ConfigError::Invalid {
        var,
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn test_default_values() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Text);
        assert_eq!(config.gateway_failure, GatewayFailure::None);
        assert_eq!(config.mode, BookingMode::Orchestrated);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("RUST_LOG", "debug"),
            ("LOG_FORMAT", "JSON"),
            ("BOOKING_CURRENCY", "EUR"),
            ("BOOKING_NIGHTLY_RATE_CENTS", "9900"),
            ("BOOKING_NIGHTS", "3"),
            ("BOOKING_CHECK_IN_DAYS", "1"),
            ("BOOKING_GATEWAY_FAILURE", "capture"),
            ("BOOKING_MODE", "event-driven"),
        ]))
        .unwrap();

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.nights, 3);
        assert_eq!(config.check_in_days, 1);
        assert_eq!(config.gateway_failure, GatewayFailure::Capture);
        assert_eq!(config.mode, BookingMode::EventDriven);
        assert_eq!(config.total_amount().unwrap(), Money::new(29700, "EUR"));
    }

    #[test]
    fn test_invalid_values_are_reported() {
        let result = Config::from_lookup(lookup(&[("BOOKING_GATEWAY_FAILURE", "sometimes")]));
        assert_eq!(
            result,
            Err(ConfigError::Invalid {
                var: "BOOKING_GATEWAY_FAILURE",
                value: "sometimes".to_string(),
            })
        );

        let result = Config::from_lookup(lookup(&[("BOOKING_NIGHTS", "0")]));
        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                var: "BOOKING_NIGHTS",
                ..
            })
        ));

        assert!(Config::from_lookup(lookup(&[("BOOKING_NIGHTLY_RATE_CENTS", "lots")])).is_err());
    }

    #[test]
    fn test_default_total_amount() {
        assert_eq!(
            Config::default().total_amount().unwrap(),
            Money::new(30000, "USD")
        );
    }

    #[test]
    fn test_total_overflow_is_reported() {
        let max = i64::MAX.to_string();
        let result = Config::from_lookup(lookup(&[
            ("BOOKING_NIGHTLY_RATE_CENTS", max.as_str()),
            ("BOOKING_NIGHTS", "2"),
        ]));

        assert_eq!(
            result,
            Err(ConfigError::Invalid {
                var: "BOOKING_NIGHTLY_RATE_CENTS",
                value: max,
            })
        );
    }

    #[test]
    fn test_negative_rate_is_rejected() {
        let result = Config::from_lookup(lookup(&[("BOOKING_NIGHTLY_RATE_CENTS", "-100")]));
        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                var: "BOOKING_NIGHTLY_RATE_CENTS",
                ..
            })
        ));
    }

    #[test]
    fn test_out_of_range_check_in_is_reported() {
        let result = Config::from_lookup(lookup(&[("BOOKING_CHECK_IN_DAYS", "999999999999999")]));
        assert_eq!(
            result,
            Err(ConfigError::Invalid {
                var: "BOOKING_CHECK_IN_DAYS",
                value: "999999999999999".to_string(),
            })
        );

        let result = Config::from_lookup(lookup(&[(
            "BOOKING_CHECK_IN_DAYS",
            i64::MIN.to_string().as_str(),
        )]));
        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                var: "BOOKING_CHECK_IN_DAYS",
                ..
            })
        ));
    }

    #[test]
    fn test_out_of_range_stay_is_reported() {
        // The total still fits, but the check-out date does not.
        let result = Config::from_lookup(lookup(&[("BOOKING_NIGHTS", "200000000")]));
        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                var: "BOOKING_NIGHTS",
                ..
            })
        ));
    }

    #[test]
    fn test_stay_starts_after_check_in_days() {
        let now = Utc::now();
        let stay = Config::default().stay(now).unwrap();
        assert_eq!(stay.check_in, now + TimeDelta::days(7));
        assert_eq!(stay.nights(), 2);
    }
}
