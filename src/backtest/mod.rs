pub mod bins;
pub mod engine;
pub mod report;
