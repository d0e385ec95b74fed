use chrono::{Duration, NaiveDate};

/// Canonical `YYYY-MM-DD` key for a calendar day. All date comparisons in
/// the engine use string equality on these keys, never timestamp math.
pub fn day_key(d: NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

/// Parse a `YYYY-MM-DD` key back into a date.
pub fn parse_day_key(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// The last `n` day keys ending at `anchor` (inclusive), oldest first.
pub fn last_n_days(n: usize, anchor: NaiveDate) -> Vec<String> {
    (0..n)
        .rev()
        .map(|offset| day_key(anchor - Duration::days(offset as i64)))
        .collect()
}

/// Month key (`YYYY-MM`) for a day key: its first 7 characters.
pub fn month_key(day_key: &str) -> &str {
    day_key.get(..7).unwrap_or(day_key)
}

/// Strip markdown code fences from LLM responses.
pub fn strip_code_fences(s: &str) -> &str {
    let s = s.trim();
    if let Some(rest) = s.strip_prefix("```json") {
        rest.strip_suffix("```").unwrap_or(rest).trim()
    } else if let Some(rest) = s.strip_prefix("```") {
        rest.strip_suffix("```").unwrap_or(rest).trim()
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_key() {
        let d = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(day_key(d), "2025-03-07");
    }

    #[test]
    fn test_parse_day_key_roundtrip() {
        let d = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(); // Leap year
        assert_eq!(parse_day_key(&day_key(d)), Some(d));
        assert_eq!(parse_day_key("not-a-date"), None);
        assert_eq!(parse_day_key("2025-02-30"), None);
    }

    #[test]
    fn test_last_n_days_ordering() {
        let anchor = NaiveDate::from_ymd_opt(2025, 1, 3).unwrap();
        assert_eq!(
            last_n_days(3, anchor),
            vec!["2025-01-01", "2025-01-02", "2025-01-03"]
        );
    }

    #[test]
    fn test_last_n_days_crosses_month_boundary() {
        let anchor = NaiveDate::from_ymd_opt(2025, 3, 2).unwrap();
        assert_eq!(
            last_n_days(4, anchor),
            vec!["2025-02-27", "2025-02-28", "2025-03-01", "2025-03-02"]
        );
    }

    #[test]
    fn test_month_key() {
        assert_eq!(month_key("2025-03-07"), "2025-03");
        assert_eq!(month_key("2025-12"), "2025-12");
    }

    #[test]
    fn test_strip_code_fences_json() {
        assert_eq!(
            strip_code_fences("```json\n{\"key\": \"value\"}\n```"),
            "{\"key\": \"value\"}"
        );
    }

    #[test]
    fn test_strip_code_fences_plain() {
        assert_eq!(strip_code_fences("```\nsome text\n```"), "some text");
    }

    #[test]
    fn test_strip_code_fences_none() {
        assert_eq!(strip_code_fences("  plain insight text "), "plain insight text");
    }
}
