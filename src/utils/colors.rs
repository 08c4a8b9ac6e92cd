/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";

/// Progress color:
/// nothing logged → grey
/// target reached → green
/// under target   → yellow
pub fn color_for_progress(done: u32, target: u32) -> &'static str {
    if done == 0 {
        GREY
    } else if done >= target {
        GREEN
    } else {
        YELLOW
    }
}

/// Remaining allocation color: negative (over-booked) is red.
pub fn color_for_remaining(value: i64) -> &'static str {
    if value < 0 { RED } else { GREEN }
}
