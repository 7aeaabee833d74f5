//! Display text. The site ships in a single locale (zh-CN), so strings and
//! the long date format are fixed here rather than looked up.

use chrono::{Datelike, NaiveDate};

/// Inline message placed after an empty required field.
pub const REQUIRED_FIELD_MESSAGE: &str = "此字段为必填项";

/// Alert shown when the server answers but does not accept the submission.
pub const SUBMIT_FAILED_MESSAGE: &str = "提交失败，请重试";

/// Alert shown when the request fails or the answer cannot be decoded.
pub const SUBMIT_ERROR_MESSAGE: &str = "发生错误，请重试";

/// Long zh-CN date, e.g. `2026年10月19日`.
pub fn format_long_date(date: NaiveDate) -> String {
    format!("{}年{}月{}日", date.year(), date.month(), date.day())
}
