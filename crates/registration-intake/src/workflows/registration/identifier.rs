use chrono::{DateTime, Utc};
use rand::Rng;

use super::domain::ApplicationId;

/// Source of application identifiers.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self, issued_at: DateTime<Utc>) -> ApplicationId;
}

/// `APP` + unix seconds + a random four digit suffix.
#[derive(Debug, Default, Clone, Copy)]
pub struct TimestampIdGenerator;

impl IdGenerator for TimestampIdGenerator {
    fn next_id(&self, issued_at: DateTime<Utc>) -> ApplicationId {
        let suffix: u16 = rand::thread_rng().gen_range(1000..=9999);
        ApplicationId(format!("APP{}{suffix}", issued_at.timestamp()))
    }
}
