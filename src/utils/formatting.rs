//! Formatting utilities used for CLI outputs.

pub fn pad_right(s: &str, width: usize) -> String {
    format!("{:<width$}", s, width = width)
}

/// 95 → "01h 35m"; `short` gives "01:35".
pub fn mins2readable(mins: u64, short: bool) -> String {
    let hours = mins / 60;
    let minutes = mins % 60;

    if short {
        format!("{:02}:{:02}", hours, minutes)
    } else {
        format!("{:02}h {:02}m", hours, minutes)
    }
}

/// "Remaining 20m" / "Over by 15m" for the plan allocation line.
pub fn describe_remaining(remaining: i64) -> String {
    if remaining >= 0 {
        format!("Remaining {}m", remaining)
    } else {
        format!("Over by {}m", remaining.abs())
    }
}
