//! Gameplay and streaming tunables.
//!
//! Every timing knob the engine uses lives here with its production default;
//! each can be overridden by an environment variable. Tests construct the
//! struct directly with tiny values instead of touching the environment.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct Tunables {
    /// Questions drawn per match at creation.
    pub questions_per_match: usize,
    /// Countdown per question; also the denominator of the speed bonus.
    pub question_time_limit: Duration,
    /// Pause between both players pressing start and the first question.
    pub intro_delay: Duration,
    /// How often stream poll loops re-read the store.
    pub stream_poll_interval: Duration,
    /// Minimum spacing between `match_update` events on one channel.
    pub stream_throttle: Duration,
    /// Close a match stream after this long without a state change.
    pub match_idle_timeout: Duration,
    /// How long an automatch stream searches before giving up.
    pub search_timeout: Duration,
    /// How long a match stream stays open after FINISHED is delivered.
    pub finish_grace: Duration,
    /// Custody submissions per transfer leg, counted across retries.
    pub transfer_max_attempts: u32,
    /// Pause between custody submissions after a transient failure.
    pub transfer_retry_delay: Duration,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            questions_per_match: 5,
            question_time_limit: Duration::from_secs(24),
            intro_delay: Duration::from_millis(2000),
            stream_poll_interval: Duration::from_millis(1000),
            stream_throttle: Duration::from_millis(500),
            match_idle_timeout: Duration::from_secs(1800),
            search_timeout: Duration::from_secs(20),
            finish_grace: Duration::from_secs(120),
            transfer_max_attempts: 3,
            transfer_retry_delay: Duration::from_millis(2000),
        }
    }
}

impl Tunables {
    pub fn from_env() -> Result<Self, AppError> {
        let d = Self::default();
        Ok(Self {
            questions_per_match: parsed("QUESTIONS_PER_MATCH", d.questions_per_match)?,
            question_time_limit: Duration::from_secs_f64(parsed(
                "QUESTION_TIME_LIMIT_SECS",
                d.question_time_limit.as_secs_f64(),
            )?),
            intro_delay: millis("INTRO_DELAY_MS", d.intro_delay)?,
            stream_poll_interval: millis("STREAM_POLL_INTERVAL_MS", d.stream_poll_interval)?,
            stream_throttle: millis("STREAM_THROTTLE_MS", d.stream_throttle)?,
            match_idle_timeout: secs("MATCH_IDLE_TIMEOUT_SECS", d.match_idle_timeout)?,
            search_timeout: secs("SEARCH_TIMEOUT_SECS", d.search_timeout)?,
            finish_grace: secs("FINISH_GRACE_SECS", d.finish_grace)?,
            transfer_max_attempts: parsed("TRANSFER_MAX_ATTEMPTS", d.transfer_max_attempts)?,
            transfer_retry_delay: millis("TRANSFER_RETRY_DELAY_MS", d.transfer_retry_delay)?,
        })
    }

    /// Question time limit in seconds, as the scoring formula consumes it.
    pub fn question_time_limit_secs(&self) -> f64 {
        self.question_time_limit.as_secs_f64()
    }
}

fn parsed<T>(name: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Err(_) => Ok(default),
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|err| AppError::config(format!("Invalid value for '{name}': '{raw}' ({err})"))),
    }
}

fn millis(name: &str, default: Duration) -> Result<Duration, AppError> {
    Ok(Duration::from_millis(parsed(
        name,
        default.as_millis() as u64,
    )?))
}

fn secs(name: &str, default: Duration) -> Result<Duration, AppError> {
    Ok(Duration::from_secs(parsed(name, default.as_secs())?))
}
