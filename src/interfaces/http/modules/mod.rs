pub mod health;
pub mod lines;
pub mod metrics;
pub mod request_id;
pub mod stations;
