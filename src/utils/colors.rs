/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Green for a ticked set, grey for one still to do.
pub fn color_for_set(completed: bool) -> &'static str {
    if completed { GREEN } else { GREY }
}

/// Greys out an empty raw input so the prompt shows what is still missing.
pub fn colorize_raw(value: &str, placeholder: &str) -> String {
    if value.trim().is_empty() {
        format!("{GREY}{placeholder}{RESET}")
    } else {
        value.to_string()
    }
}
