//! Shared timestamp and identifier helpers.

use chrono::{DateTime, Utc};
use ulid::Ulid;

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

pub fn new_id() -> String {
    Ulid::new().to_string()
}
