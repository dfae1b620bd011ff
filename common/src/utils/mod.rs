pub mod serde;
pub mod tracing;
