//! 时间格式化模块
//!
//! 服务端返回的时间字符串格式并不统一：有的带时区（RFC 3339），
//! 有的是不带时区的 ISO 8601（按 UTC 处理），可能带小数秒。
//! 这里统一解析为 `DateTime<Utc>`，并提供界面上使用的格式化函数。

use chrono::{DateTime, NaiveDateTime, Utc};

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// 解析服务端时间字符串
///
/// 返回 None 如果所有格式都无法解析
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// 格式化为日期，如 `2024-05-01`
///
/// 无法解析时原样返回，避免界面出现空白
pub fn format_date(s: &str) -> String {
    parse_timestamp(s)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| s.to_string())
}

/// 格式化为时分，如 `14:05`
pub fn format_time(s: &str) -> String {
    parse_timestamp(s)
        .map(|dt| dt.format("%H:%M").to_string())
        .unwrap_or_default()
}

/// 当前时间的 RFC 3339 字符串（用于本地追加的消息）
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_offset_and_naive_forms() {
        let with_tz = parse_timestamp("2024-05-01T12:30:00+03:00").unwrap();
        assert_eq!(with_tz.format("%H:%M").to_string(), "09:30");

        let naive = parse_timestamp("2024-05-01T12:30:00.1234567").unwrap();
        assert_eq!(naive.format("%Y-%m-%d %H:%M").to_string(), "2024-05-01 12:30");
    }

    #[test]
    fn unparseable_dates_pass_through() {
        assert_eq!(format_date("yesterday"), "yesterday");
        assert_eq!(format_time("yesterday"), "");
        assert_eq!(format_date("2024-01-02T00:00:00Z"), "2024-01-02");
    }
}
