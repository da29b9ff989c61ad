//! Display formatting helpers shared across components.

use chrono::{DateTime, Local, Utc};

/// Format a message timestamp: time of day for today, short date
/// otherwise.
pub fn format_time(at: DateTime<Utc>) -> String {
    let local = at.with_timezone(&Local);
    if local.date_naive() == Local::now().date_naive() {
        local.format("%H:%M").to_string()
    } else {
        local.format("%b %e").to_string()
    }
}

/// Truncate text for a sidebar preview, appending an ellipsis.
/// Cuts on a character boundary, so multi-byte text is safe.
pub fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{cut}...")
}

/// Human-readable byte size for attachment chips
pub fn human_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    match bytes {
        b if b >= MB => format!("{:.1} MB", b as f64 / MB as f64),
        b if b >= KB => format!("{:.1} KB", b as f64 / KB as f64),
        b => format!("{b} B"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_time_today_shows_clock() {
        let formatted = format_time(Utc::now());
        assert_eq!(formatted.len(), 5);
        assert!(formatted.contains(':'));
    }

    #[test]
    fn test_format_time_past_shows_date() {
        let old = Utc.with_ymd_and_hms(2021, 3, 4, 12, 0, 0).unwrap();
        let formatted = format_time(old);
        assert!(!formatted.contains(':'));
        assert!(formatted.starts_with("Mar"));
    }

    #[test]
    fn test_preview_short_text_unchanged() {
        assert_eq!(preview("hello", 50), "hello");
        assert_eq!(preview("hello", 5), "hello");
    }

    #[test]
    fn test_preview_truncates_long_text() {
        assert_eq!(preview("hello world", 5), "hello...");
    }

    #[test]
    fn test_preview_multibyte_safe() {
        // 4 emoji, each multi-byte
        assert_eq!(preview("👍👍👍👍", 2), "👍👍...");
    }

    #[test]
    fn test_human_size() {
        assert_eq!(human_size(0), "0 B");
        assert_eq!(human_size(1023), "1023 B");
        assert_eq!(human_size(1024), "1.0 KB");
        assert_eq!(human_size(1536), "1.5 KB");
        assert_eq!(human_size(25 * 1024 * 1024), "25.0 MB");
    }
}
