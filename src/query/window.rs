use std::sync::LazyLock;

use chrono::{Duration, NaiveDate};
use regex::Regex;

use crate::date_util::day_key;
use crate::error::{Error, Result};

static RE_TRAILING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d{1,3})d$").unwrap());

/// A snapshot fetch window. The views share these instead of each
/// carrying its own fetch-and-filter block: the daily view fetches
/// `Today`, the weekly chart `Trailing(7)`, analytics the full history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    Today,
    /// Last N days, inclusive of today.
    Trailing(u32),
    All,
}

impl Window {
    /// The trailing-7-day window used by the weekly series and average.
    pub const TRAILING_7: Window = Window::Trailing(7);

    /// Parse a window string.
    ///
    /// Supported formats:
    /// - `today` — the current day only
    /// - `7d`, `30d`, … — trailing N days
    /// - `all` — the entire history
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim().to_lowercase();
        match s.as_str() {
            "today" => return Ok(Window::Today),
            "all" => return Ok(Window::All),
            _ => {}
        }
        if let Some(caps) = RE_TRAILING.captures(&s) {
            let n: u32 = caps[1].parse().unwrap();
            if n > 0 {
                return Ok(Window::Trailing(n));
            }
        }
        Err(Error::WindowParse(format!("unrecognized window: {s}")))
    }

    /// Canonical key string for display and logging.
    pub fn to_key(&self) -> String {
        match self {
            Window::Today => "today".to_string(),
            Window::Trailing(n) => format!("{n}d"),
            Window::All => "all".to_string(),
        }
    }

    /// Inclusive day-key bounds relative to `today`, or `None` when the
    /// window is unbounded.
    pub fn bounds(&self, today: NaiveDate) -> Option<(String, String)> {
        match self {
            Window::Today => Some((day_key(today), day_key(today))),
            Window::Trailing(n) => Some((
                day_key(today - Duration::days(*n as i64 - 1)),
                day_key(today),
            )),
            Window::All => None,
        }
    }
}

impl std::fmt::Display for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_key())
    }
}
