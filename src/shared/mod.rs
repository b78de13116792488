pub mod errors;
pub mod shutdown;

pub use errors::*;
pub use shutdown::*;
