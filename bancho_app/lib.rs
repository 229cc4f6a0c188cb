pub mod config;
pub mod repository;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
