use std::env;
use std::fmt;

use chrono::Duration;

/// Business-logic tunables, environment override with validated defaults.
///
/// The claim cooldown is the single knob the custody state machine exposes:
/// the exclusive window an item stays locked after a claim is submitted.
#[derive(Clone)]
pub struct ApplicationSettings {
    claim_cooldown_hours: u32,
    default_locker_number: i32,
    registration_reward_points: i64,
}

impl Default for ApplicationSettings {
    fn default() -> Self {
        Self {
            claim_cooldown_hours: 48,
            default_locker_number: 1,
            registration_reward_points: 100,
        }
    }
}

impl ApplicationSettings {
    /// Load settings with environment overrides
    ///
    /// # Errors
    /// Returns a message naming the offending variable when an override fails
    /// validation.
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let claim_cooldown_hours = match env::var("CLAIM_COOLDOWN_HOURS") {
            Ok(raw) => Self::parse_cooldown_hours(&raw)?,
            Err(_) => defaults.claim_cooldown_hours,
        };

        let default_locker_number = match env::var("DEFAULT_LOCKER_NUMBER") {
            Ok(raw) => Self::parse_locker_number(&raw)?,
            Err(_) => defaults.default_locker_number,
        };

        let registration_reward_points = match env::var("REGISTRATION_REWARD_POINTS") {
            Ok(raw) => Self::parse_reward_points(&raw)?,
            Err(_) => defaults.registration_reward_points,
        };

        Ok(Self {
            claim_cooldown_hours,
            default_locker_number,
            registration_reward_points,
        })
    }

    /// Exclusive claim window applied on submission
    pub fn claim_cooldown(&self) -> Duration {
        Duration::hours(self.claim_cooldown_hours as i64)
    }

    /// Fallback locker when registration does not name one
    pub fn default_locker_number(&self) -> i32 {
        self.default_locker_number
    }

    /// Points granted to an identified finder per registration
    pub fn registration_reward_points(&self) -> i64 {
        self.registration_reward_points
    }

    fn parse_cooldown_hours(raw: &str) -> Result<u32, String> {
        let hours = raw
            .parse::<u32>()
            .map_err(|_| "CLAIM_COOLDOWN_HOURS must be a positive integer".to_string())?;
        if hours == 0 || hours > 24 * 30 {
            return Err("CLAIM_COOLDOWN_HOURS must be between 1 and 720".to_string());
        }
        Ok(hours)
    }

    fn parse_locker_number(raw: &str) -> Result<i32, String> {
        let locker = raw
            .parse::<i32>()
            .map_err(|_| "DEFAULT_LOCKER_NUMBER must be a positive integer".to_string())?;
        if locker <= 0 {
            return Err("DEFAULT_LOCKER_NUMBER must be positive".to_string());
        }
        Ok(locker)
    }

    fn parse_reward_points(raw: &str) -> Result<i64, String> {
        raw.parse::<i64>()
            .map_err(|_| "REGISTRATION_REWARD_POINTS must be an integer".to_string())
    }
}

impl fmt::Debug for ApplicationSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApplicationSettings")
            .field("claim_cooldown_hours", &self.claim_cooldown_hours)
            .field("default_locker_number", &self.default_locker_number)
            .field("registration_reward_points", &self.registration_reward_points)
            .finish()
    }
}

impl fmt::Display for ApplicationSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ApplicationSettings {{ claim_cooldown: {}h, default_locker: {}, reward: {}pt }}",
            self.claim_cooldown_hours, self.default_locker_number, self.registration_reward_points
        )
    }
}
