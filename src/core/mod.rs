pub mod error;
pub mod events;
pub mod models;
pub mod traits;
