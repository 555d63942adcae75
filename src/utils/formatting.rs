//! Formatting utilities used for CLI and export outputs.

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

/// Running clock shown during a session: `MM:SS` (minutes may exceed 59).
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Summary duration: `12 min 5 sec`.
pub fn format_duration(secs: u64) -> String {
    format!("{} min {} sec", secs / 60, secs % 60)
}

/// Weight without a trailing `.0` for whole numbers (135, 137.5).
pub fn format_weight(w: f64) -> String {
    if w.fract() == 0.0 {
        format!("{}", w as i64)
    } else {
        let s = format!("{:.2}", w);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// `Set 2: 135 lbs x 5 reps`
pub fn format_set(index: usize, weight: f64, reps: u32) -> String {
    format!("Set {}: {} lbs x {} reps", index + 1, format_weight(weight), reps)
}
