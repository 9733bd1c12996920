pub mod coverage;
pub mod storage;
pub mod tracking;
pub mod ui;
