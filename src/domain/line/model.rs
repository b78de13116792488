//! Line aggregate
//!
//! A line owns an ordered chain of sections. Sections are only ever
//! appended at the tail and removed from the tail, so insertion order is
//! topology order. The termini and total distance are derived from the
//! chain and kept in sync by every mutation.
//!
//! All mutating methods validate first and only then touch fields: a
//! failed call leaves the line exactly as it was.

use chrono::{DateTime, Utc};

use crate::domain::DomainResult;
use crate::shared::errors::DomainError;

/// Maximum length of a line name or color (mirrors the column size)
pub const MAX_LABEL_LEN: usize = 20;

/// One directed segment between two stations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Line-local sequence number
    pub id: i32,
    pub up_station_id: i32,
    pub down_station_id: i32,
    pub distance: i32,
}

/// Subway line with its section chain
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    id: i32,
    name: String,
    color: String,
    up_station_id: i32,
    down_station_id: i32,
    distance: i32,
    sections: Vec<Section>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Line {
    /// Create an unsaved line (id `0`) together with its first section.
    pub fn new(
        name: &str,
        color: &str,
        up_station_id: i32,
        down_station_id: i32,
        distance: i32,
    ) -> DomainResult<Self> {
        let name = validate_label("name", name)?;
        let color = validate_label("color", color)?;
        validate_distance(distance)?;
        if up_station_id == down_station_id {
            return Err(DomainError::InvalidArgument(format!(
                "up and down station must differ (both are {})",
                up_station_id
            )));
        }

        let now = Utc::now();
        Ok(Self {
            id: 0,
            name,
            color,
            up_station_id,
            down_station_id,
            distance,
            sections: vec![Section {
                id: 1,
                up_station_id,
                down_station_id,
                distance,
            }],
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuild a line from stored rows.
    ///
    /// The chain is checked again; stored data that breaks an invariant is
    /// reported as a storage error instead of being loaded.
    pub fn restore(
        id: i32,
        name: String,
        color: String,
        sections: Vec<Section>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let corrupt = |reason: String| {
            DomainError::Storage(format!("line {} is inconsistent: {}", id, reason))
        };

        let (Some(first), Some(last)) = (sections.first(), sections.last()) else {
            return Err(corrupt("no sections".into()));
        };

        for pair in sections.windows(2) {
            if pair[1].up_station_id != pair[0].down_station_id {
                return Err(corrupt(format!(
                    "section {} does not continue from section {}",
                    pair[1].id, pair[0].id
                )));
            }
        }
        if let Some(bad) = sections.iter().find(|s| s.distance <= 0) {
            return Err(corrupt(format!("section {} has distance {}", bad.id, bad.distance)));
        }
        let mut ids: Vec<i32> = sections.iter().map(|s| s.id).collect();
        ids.sort_unstable();
        ids.dedup();
        if ids.len() != sections.len() {
            return Err(corrupt("duplicate section ids".into()));
        }
        let Some(distance) = total_distance(&sections) else {
            return Err(corrupt("total distance overflows".into()));
        };

        Ok(Self {
            id,
            name,
            color,
            up_station_id: first.up_station_id,
            down_station_id: last.down_station_id,
            distance,
            sections,
            created_at,
            updated_at,
        })
    }

    /// Attach the identity assigned by storage.
    pub fn with_id(mut self, id: i32) -> Self {
        self.id = id;
        self
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn up_station_id(&self) -> i32 {
        self.up_station_id
    }

    pub fn down_station_id(&self) -> i32 {
        self.down_station_id
    }

    pub fn distance(&self) -> i32 {
        self.distance
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_persisted(&self) -> bool {
        self.id != 0
    }

    /// Current termini: `[up, down]`.
    pub fn station_ids(&self) -> [i32; 2] {
        [self.up_station_id, self.down_station_id]
    }

    /// Every station on the line in travel order, head to tail.
    pub fn station_path(&self) -> Vec<i32> {
        let mut path = Vec::with_capacity(self.sections.len() + 1);
        path.push(self.up_station_id);
        path.extend(self.sections.iter().map(|s| s.down_station_id));
        path
    }

    pub fn contains_station(&self, station_id: i32) -> bool {
        self.up_station_id == station_id
            || self.sections.iter().any(|s| s.down_station_id == station_id)
    }

    /// Append a section at the tail.
    pub fn add_section(
        &mut self,
        up_station_id: i32,
        down_station_id: i32,
        distance: i32,
    ) -> DomainResult<&Section> {
        if up_station_id != self.down_station_id {
            return Err(DomainError::SectionChainBroken {
                expected: self.down_station_id,
                actual: up_station_id,
            });
        }
        if down_station_id == self.down_station_id {
            return Err(DomainError::DuplicateTerminus(down_station_id));
        }
        // A station already on the chain would close a loop.
        if self.contains_station(down_station_id) {
            return Err(DomainError::StationAlreadyOnLine(down_station_id));
        }
        validate_distance(distance)?;
        let Some(total) = self.distance.checked_add(distance) else {
            return Err(DomainError::InvalidArgument(format!(
                "total distance would exceed {}",
                i32::MAX
            )));
        };

        let next_id = self.sections.iter().map(|s| s.id).max().unwrap_or(0) + 1;
        self.sections.push(Section {
            id: next_id,
            up_station_id,
            down_station_id,
            distance,
        });
        self.down_station_id = down_station_id;
        self.distance = total;
        self.updated_at = Utc::now();

        Ok(&self.sections[self.sections.len() - 1])
    }

    /// Remove the tail section, identified by its down station.
    pub fn delete_section(&mut self, station_id: i32) -> DomainResult<Section> {
        let is_tail = self
            .sections
            .last()
            .is_some_and(|tail| tail.down_station_id == station_id);
        if !is_tail {
            return Err(DomainError::SectionNotFound {
                line_id: self.id,
                station_id,
            });
        }
        if self.sections.len() == 1 {
            return Err(DomainError::CannotDeleteLastSection(self.id));
        }

        let Some(removed) = self.sections.pop() else {
            return Err(DomainError::CannotDeleteLastSection(self.id));
        };
        self.down_station_id = removed.up_station_id;
        self.distance -= removed.distance;
        self.updated_at = Utc::now();

        Ok(removed)
    }

    pub fn rename(&mut self, name: &str) -> DomainResult<()> {
        self.name = validate_label("name", name)?;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn recolor(&mut self, color: &str) -> DomainResult<()> {
        self.color = validate_label("color", color)?;
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// `None` when the sum does not fit in `i32`.
fn total_distance(sections: &[Section]) -> Option<i32> {
    sections
        .iter()
        .try_fold(0i32, |total, s| total.checked_add(s.distance))
}

fn validate_distance(distance: i32) -> DomainResult<()> {
    if distance <= 0 {
        return Err(DomainError::InvalidArgument(format!(
            "distance must be positive, got {}",
            distance
        )));
    }
    Ok(())
}

fn validate_label(field: &str, value: &str) -> DomainResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DomainError::InvalidArgument(format!("{} must not be empty", field)));
    }
    if value.chars().count() > MAX_LABEL_LEN {
        return Err(DomainError::InvalidArgument(format!(
            "{} must be at most {} characters",
            field, MAX_LABEL_LEN
        )));
    }
    Ok(value.to_string())
}

// ── Tests ──────────────────────────────────────────────────────
