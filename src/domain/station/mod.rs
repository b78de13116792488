//! Station entity and lookup port

pub mod model;
pub mod repository;

pub use model::{Station, MAX_STATION_NAME_LEN};
pub use repository::StationRepository;
