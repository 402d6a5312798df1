/// Instance health and statistics.
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::client::LacusClient;
use super::errors::Result;
use super::instance::LIVENESS_TIMEOUT;

/// The shapes `redis_up` answers with.
#[derive(Deserialize)]
#[serde(untagged)]
enum RedisUpPayload {
    Bare(bool),
    Report {
        #[serde(alias = "redis_up")]
        is_up: bool,
    },
}

impl LacusClient {
    /// Whether the instance answers `HEAD /` with 200 within two seconds.
    ///
    /// Never fails: unreachability is the answer, not an error.
    #[must_use]
    pub fn is_up(&self) -> bool {
        let url = self.root_url().clone();
        match self.http().head(url.clone()).timeout(LIVENESS_TIMEOUT).send() {
            Ok(response) => {
                debug!(%url, status = response.status().as_u16(), "liveness probe");
                response.status() == reqwest::StatusCode::OK
            }
            Err(err) => {
                debug!(%url, error = %err, "instance unreachable");
                false
            }
        }
    }

    /// Whether the instance's backing queue store (redis) is reachable.
    ///
    /// Returns `false` instead of failing when the instance itself cannot be
    /// reached or answers with something unexpected.
    #[must_use]
    pub fn redis_up(&self) -> bool {
        match self.get_json::<RedisUpPayload>("redis_up", &[]) {
            Ok(RedisUpPayload::Bare(up) | RedisUpPayload::Report { is_up: up }) => up,
            Err(err) => {
                warn!(error = %err, "redis health check failed");
                false
            }
        }
    }

    /// Capture statistics for one day (today when `day` is `None`).
    ///
    /// Only the last few days are kept by the instance. With `cardinality_only`
    /// the lists of captures, retries and failures are reduced to their sizes.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` or `Remote` on failure.
    pub fn daily_stats(&self, day: Option<NaiveDate>, cardinality_only: bool) -> Result<Value> {
        let mut path = if cardinality_only {
            "daily_stats".to_owned()
        } else {
            "daily_stats_details".to_owned()
        };
        if let Some(day) = day {
            path.push('/');
            path.push_str(&day.format("%Y-%m-%d").to_string());
        }
        self.get_json(&path, &[])
    }

    /// Database status (number of keys, memory usage).
    ///
    /// # Errors
    ///
    /// Returns `Timeout` or `Remote` on failure.
    pub fn db_status(&self) -> Result<Value> {
        self.get_json("db_status", &[])
    }

    /// Captures currently running.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` or `Remote` on failure.
    pub fn ongoing_captures(&self, with_settings: bool) -> Result<Vec<Value>> {
        self.get_json("ongoing_captures", settings_query(with_settings))
    }

    /// Captures waiting in the queue.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` or `Remote` on failure.
    pub fn enqueued_captures(&self, with_settings: bool) -> Result<Vec<Value>> {
        self.get_json("enqueued_captures", settings_query(with_settings))
    }

    /// Overall status of the instance.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` or `Remote` on failure.
    pub fn status(&self) -> Result<Value> {
        self.get_json("lacus_status", &[])
    }

    /// Whether every capture slot of the instance is in use.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` or `Remote` on failure.
    pub fn is_busy(&self) -> Result<bool> {
        self.get_json("is_busy", &[])
    }
}

fn settings_query(with_settings: bool) -> &'static [(&'static str, &'static str)] {
    if with_settings {
        &[("with_settings", "true")]
    } else {
        &[]
    }
}
