//! Lenient page/limit parsing for student listing.
//!
//! # Invariants
//! - Absent, non-numeric, zero or negative input falls back to the default;
//!   bad pagination input is never a validation failure.
//! - A leading integer prefix is honored (`"3abc"` reads as `3`).
//! - `total_pages` is `ceil(total / limit)`.

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;

/// Effective page window for one list call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: u32,
    /// Rows per page, always >= 1.
    pub limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Builds a window, replacing zero values with defaults.
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: if page == 0 { DEFAULT_PAGE } else { page },
            limit: if limit == 0 { DEFAULT_LIMIT } else { limit },
        }
    }

    /// Coerces raw query-string values.
    pub fn from_raw(page: Option<&str>, limit: Option<&str>) -> Self {
        Self {
            page: parse_lenient(page).unwrap_or(DEFAULT_PAGE),
            limit: parse_lenient(limit).unwrap_or(DEFAULT_LIMIT),
        }
    }

    /// Number of rows skipped before this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

/// Returns `ceil(total / limit)`; zero rows yield zero pages.
pub fn total_pages(total: u64, limit: u32) -> u64 {
    total.div_ceil(u64::from(limit.max(1)))
}

fn parse_lenient(raw: Option<&str>) -> Option<u32> {
    let trimmed = raw?.trim_start();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_len = unsigned
        .bytes()
        .take_while(|byte| byte.is_ascii_digit())
        .count();
    if negative || digits_len == 0 {
        return None;
    }

    match unsigned[..digits_len].parse::<u32>() {
        Ok(0) | Err(_) => None,
        Ok(value) => Some(value),
    }
}
