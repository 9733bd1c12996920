pub mod coverage_set;
pub mod merge;
