//! 时间工具函数
//!
//! 所有日期→时间戳转换统一在 API handler 层完成，
//! repository 层只接收 `i64` Unix millis。时区统一为 UTC。

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use shared::{AppError, AppResult};

/// Current time as Unix millis
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Unix millis → DateTime (for wire views)
pub fn ms_to_datetime(ms: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// 某日期的 [起, 止) Unix millis 区间 (UTC)
pub fn day_bounds_ms(date: NaiveDate) -> AppResult<(i64, i64)> {
    let start = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| AppError::validation(format!("Invalid date: {}", date)))?
        .and_utc()
        .timestamp_millis();
    Ok((start, start + 24 * 60 * 60 * 1000))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_accepts_iso() {
        assert!(parse_date("2025-01-15").is_ok());
        assert!(parse_date("15/01/2025").is_err());
        assert!(parse_date("2025-13-40").is_err());
    }

    #[test]
    fn test_day_bounds_cover_24h() {
        let date = parse_date("2025-01-15").unwrap();
        let (start, end) = day_bounds_ms(date).unwrap();
        assert_eq!(end - start, 24 * 60 * 60 * 1000);
    }

    #[test]
    fn test_ms_round_trip() {
        let now = now_ms();
        assert_eq!(ms_to_datetime(now).timestamp_millis(), now);
    }
}
