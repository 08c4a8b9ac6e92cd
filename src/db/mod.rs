pub mod initialize;
pub mod log;
pub mod migrate;
pub mod plans;
pub mod pool;
pub mod queries;
