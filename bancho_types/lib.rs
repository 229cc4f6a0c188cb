pub mod errors;
pub mod map_request;
pub mod patch;

pub use errors::Result;
