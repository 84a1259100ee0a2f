//! Shared formatting helpers for the text output.
//!
//! All pure formatting functions live here. Derived metrics are stored
//! unclamped; clamping for display happens in this module only.

/// Controls compact (table columns) vs verbose (header) output.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FmtStyle {
    /// Compact: no spaces, short suffixes ("3m5s")
    Compact,
    /// Detail: spaces ("3m 5s")
    Detail,
}

/// Format duration in seconds as human-readable.
///
/// Compact: `"3m5s"` (no spaces, `"-"` for negative)
/// Detail:  `"3m 5s"` (with spaces, `"0s"` for `<= 0`)
pub fn format_duration(secs: i64, style: FmtStyle) -> String {
    let sep = match style {
        FmtStyle::Compact => {
            if secs < 0 {
                return "-".to_string();
            }
            ""
        }
        FmtStyle::Detail => {
            if secs <= 0 {
                return "0s".to_string();
            }
            " "
        }
    };
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m{}{}s", secs / 60, sep, secs % 60)
    } else if secs < 86400 {
        format!("{}h{}{}m", secs / 3600, sep, (secs % 3600) / 60)
    } else {
        format!("{}d{}{}h", secs / 86400, sep, (secs % 86400) / 3600)
    }
}

/// Format seconds as `HH:MM:SS`. Hours are not wrapped at 24.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

/// Clamp a percentage to `[0, 100]`. NaN reads as 0.
pub fn clamp_percent(percent: f64) -> f64 {
    if percent.is_nan() {
        0.0
    } else {
        percent.clamp(0.0, 100.0)
    }
}

/// Format percentage with one decimal, clamped to `[0, 100]`.
pub fn format_percent(percent: f64) -> String {
    format!("{:.1}%", clamp_percent(percent))
}

/// Format a gigabyte amount with two decimals.
pub fn format_gb(gb: f64) -> String {
    format!("{:.2}", gb.max(0.0))
}

/// Render a percentage as a fixed-width bar: `"[|||||     ]"`.
///
/// `width` is the number of cells between the brackets.
pub fn progress_bar(percent: f64, width: usize) -> String {
    let filled = ((clamp_percent(percent) / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!("[{}{}]", "|".repeat(filled), " ".repeat(width - filled))
}

/// Truncate a string to at most `max` chars, marking the cut with `~`.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out: String = s.chars().take(max - 1).collect();
    out.push('~');
    out
}
