//! Session aggregation: pure functions over a snapshot of entries.

pub mod daily;
pub mod range;

pub use daily::{day_summary, today_progress};
pub use range::{HistoryRange, summarize};

/// `round(num / den)` with halves rounded up, in integers. `den` must be > 0.
pub(crate) fn div_round(num: u64, den: u64) -> u64 {
    (2 * num + den) / (2 * den)
}
