//! Database entities module

pub mod line;
pub mod section;
pub mod station;

pub use line::Entity as Line;
pub use section::Entity as Section;
pub use station::Entity as Station;
