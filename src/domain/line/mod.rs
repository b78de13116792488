//! Line aggregate
//!
//! Contains the Line entity, its Section chain, and the repository port.

pub mod model;
pub mod repository;

pub use model::{Line, Section, MAX_LABEL_LEN};
pub use repository::LineRepository;
