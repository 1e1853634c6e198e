pub mod clinic;
pub mod error;
