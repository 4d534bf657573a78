//! Display helpers shared by front ends.

/// `MM:SS`, zero padded; minutes keep counting past 59
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// "2.5 kg lost" / "1.0 kg gained"
pub fn format_weight_change(change: f64) -> String {
    let direction = if change < 0.0 { "lost" } else { "gained" };
    format!("{:.1} kg {}", change.abs(), direction)
}
