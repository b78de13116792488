use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The new section does not start at the line's current down terminus.
    #[error("Section must start at the line's down terminus {expected}, got {actual}")]
    SectionChainBroken { expected: i32, actual: i32 },

    #[error("Station {0} is already the line's down terminus")]
    DuplicateTerminus(i32),

    #[error("Station {0} is already on the line")]
    StationAlreadyOnLine(i32),

    #[error("Line {line_id} has no section ending at station {station_id}")]
    SectionNotFound { line_id: i32, station_id: i32 },

    #[error("Line {0} has a single section left and it cannot be removed")]
    CannotDeleteLastSection(i32),

    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: i32) -> Self {
        Self::NotFound {
            entity,
            field: "id",
            value: id.to_string(),
        }
    }

    /// Whether the error was caused by the caller (bad input or stale state)
    /// rather than by the service itself.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Storage(_))
    }
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        Self::Storage(format!("Database error: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_entity_and_id() {
        let err = DomainError::not_found("Line", 7);
        assert_eq!(err.to_string(), "Not found: Line with id=7");
    }

    #[test]
    fn storage_errors_are_not_client_errors() {
        assert!(!DomainError::Storage("boom".into()).is_client_error());
        assert!(DomainError::DuplicateTerminus(3).is_client_error());
        assert!(DomainError::CannotDeleteLastSection(1).is_client_error());
    }

    #[test]
    fn chain_error_reports_both_stations() {
        let err = DomainError::SectionChainBroken {
            expected: 2,
            actual: 1,
        };
        assert_eq!(
            err.to_string(),
            "Section must start at the line's down terminus 2, got 1"
        );
    }
}
