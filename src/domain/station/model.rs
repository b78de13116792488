//! Station domain entity

use chrono::{DateTime, Utc};

use crate::domain::DomainResult;
use crate::shared::errors::DomainError;

/// Maximum station name length
pub const MAX_STATION_NAME_LEN: usize = 255;

/// Subway station, referenced by lines through its id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Station {
    pub id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Station {
    /// Unsaved station (id `0`)
    pub fn new(name: &str) -> DomainResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::InvalidArgument(
                "station name must not be empty".into(),
            ));
        }
        if name.chars().count() > MAX_STATION_NAME_LEN {
            return Err(DomainError::InvalidArgument(format!(
                "station name must be at most {} characters",
                MAX_STATION_NAME_LEN
            )));
        }

        let now = Utc::now();
        Ok(Self {
            id: 0,
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        })
    }
}
