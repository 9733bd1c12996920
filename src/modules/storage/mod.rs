pub mod json_backend;
pub mod memory_backend;
