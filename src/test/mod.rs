// Shared helpers for unit tests; compiled only for test builds
pub mod utils;
