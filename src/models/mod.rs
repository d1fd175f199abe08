pub mod common;
pub mod relay;
