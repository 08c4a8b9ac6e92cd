pub mod category;
pub mod day_summary;
pub mod plan;
pub mod session;
