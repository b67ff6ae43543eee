//! Record identifier generation.

use std::str::FromStr;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

/// How new record ids are minted. One scheme per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdScheme {
    /// UUID v4 tokens.
    Random,
    /// Millisecond timestamps, strictly increasing within the process.
    Timestamp,
}

impl IdScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdScheme::Random => "random",
            IdScheme::Timestamp => "timestamp",
        }
    }
}

impl FromStr for IdScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" | "uuid" => Ok(IdScheme::Random),
            "timestamp" => Ok(IdScheme::Timestamp),
            other => Err(format!("unknown id scheme {:?}", other)),
        }
    }
}

/// Issues ids under a fixed [`IdScheme`].
#[derive(Debug)]
pub struct IdGenerator {
    scheme: IdScheme,
    last_millis: AtomicI64,
}

impl IdGenerator {
    pub fn new(scheme: IdScheme) -> Self {
        Self {
            scheme,
            last_millis: AtomicI64::new(0),
        }
    }

    pub fn scheme(&self) -> IdScheme {
        self.scheme
    }

    pub fn next_id(&self) -> String {
        match self.scheme {
            IdScheme::Random => uuid::Uuid::new_v4().to_string(),
            IdScheme::Timestamp => self.next_timestamp().to_string(),
        }
    }

    /// Current epoch millis, bumped past the last issued value on collision.
    fn next_timestamp(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let mut last = self.last_millis.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(last + 1);
            match self.last_millis.compare_exchange_weak(
                last,
                candidate,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return candidate,
                Err(current) => last = current,
            }
        }
    }
}
