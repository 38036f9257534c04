pub const EMPTY_VALUE: &str = "---";

fn fit_with_remainder(dividend: u64, divisor: u64) -> (u64, u64) {
    let fit = dividend / divisor;
    let remainder = dividend % divisor;
    (fit, remainder)
}

/// Given elapsed seconds, format like "00:00:00"
/// Hours keep counting past a day, E.g. "26:00:05"
pub fn format_elapsed_time(elapsed: u64) -> String {
    let (hours, remainder) = fit_with_remainder(elapsed, 3600);
    let (minutes, seconds) = fit_with_remainder(remainder, 60);
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Session uptime (seconds, as reported by the agent) formatted like "00:00:00"
pub fn format_uptime(uptime: Option<f64>) -> String {
    match uptime {
        // `as` saturates, so huge uptimes clamp to u64::MAX instead of overflowing
        Some(seconds) if seconds.is_finite() => format_elapsed_time(seconds.round() as u64),
        _ => String::from(EMPTY_VALUE),
    }
}

pub fn maybe_string<T>(item: Option<&T>) -> String
where
    T: ToString,
{
    item.map(std::string::ToString::to_string)
        .unwrap_or_else(|| String::from(EMPTY_VALUE))
}
