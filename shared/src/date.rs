//! 时间类型模块
//!
//! 提供：
//! - `Timestamp`: Unix 秒级时间戳，用于令牌过期判断
//! - `Clock`: 可注入的时钟抽象（生产环境使用 `SystemClock`）
//! - `RentalInterval`: 车辆的已租日期区间，以及日期命中判断
//! - `month_grid`: 日历组件使用的月视图格子

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};
use std::time::Duration;

// =========================================================
// Timestamp - Unix 秒级时间戳
// =========================================================

/// 自 Unix 纪元以来的秒数
///
/// 与 JWT 的 `exp` 字段单位一致
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    #[inline]
    pub const fn from_secs(secs: i64) -> Self {
        Self(secs)
    }

    #[inline]
    pub const fn as_secs(&self) -> i64 {
        self.0
    }
}

impl From<i64> for Timestamp {
    fn from(secs: i64) -> Self {
        Self(secs)
    }
}

impl Add<Duration> for Timestamp {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        Self(self.0 + rhs.as_secs() as i64)
    }
}

impl Sub<Duration> for Timestamp {
    type Output = Self;

    fn sub(self, rhs: Duration) -> Self::Output {
        Self(self.0 - rhs.as_secs() as i64)
    }
}

// =========================================================
// Clock - 时钟抽象
// =========================================================

/// 当前时间来源
///
/// 会话守卫通过此 trait 读取时间，测试中可替换为固定时钟。
pub trait Clock {
    fn now(&self) -> Timestamp;

    /// 当前的本地日历日期
    fn today(&self) -> NaiveDate;
}

/// 系统时钟（WASM 下由 chrono 的 `wasmbind` 特性读取 JS Date）
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp(chrono::Utc::now().timestamp())
    }

    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

// =========================================================
// RentalInterval - 已租日期区间
// =========================================================

/// 某辆车的一段已预订日期（首尾均包含）
///
/// 约定 `start <= end`，消费方不做防御性检查。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalInterval {
    #[serde(rename = "rent_start_date", with = "flexible_date")]
    pub start: NaiveDate,
    #[serde(rename = "rent_end_date", with = "flexible_date")]
    pub end: NaiveDate,
}

impl RentalInterval {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// 与另一个闭区间 `[start, end]` 是否有交集
    #[inline]
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start <= end && start <= self.end
    }

    /// 区间包含的天数（首尾都计入）
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// 判断某日期是否落在任意一个已租区间内
///
/// 线性扫描，命中第一个区间即返回；空列表返回 false。
pub fn is_date_rented(date: NaiveDate, intervals: &[RentalInterval]) -> bool {
    intervals.iter().any(|interval| interval.contains(date))
}

/// 找出与请求区间冲突的第一个已租区间
pub fn first_conflict(
    start: NaiveDate,
    end: NaiveDate,
    intervals: &[RentalInterval],
) -> Option<&RentalInterval> {
    intervals.iter().find(|interval| interval.overlaps(start, end))
}

// =========================================================
// 日历月视图
// =========================================================

/// 生成某月的日历格子（周日为每周第一天）
///
/// 月初之前的空位为 `None`，之后依次为该月每一天。
/// 月份非法时返回空列表。
pub fn month_grid(year: i32, month: u32) -> Vec<Option<NaiveDate>> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };

    let leading = first.weekday().num_days_from_sunday() as usize;
    let mut cells: Vec<Option<NaiveDate>> = vec![None; leading];
    cells.extend(first.iter_days().take_while(|d| d.month() == month).map(Some));
    cells
}

/// 返回 (year, month) 的下一个月
pub fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month >= 12 { (year + 1, 1) } else { (year, month + 1) }
}

/// 返回 (year, month) 的上一个月
pub fn prev_month(year: i32, month: u32) -> (i32, u32) {
    if month <= 1 { (year - 1, 12) } else { (year, month - 1) }
}

// =========================================================
// 后端日期字段的序列化
// =========================================================

/// 后端返回的日期既可能是 `YYYY-MM-DD`，也可能是 RFC 3339 时间戳。
///
/// 时间戳按其自身的时区偏移取日期部分；序列化统一输出 `YYYY-MM-DD`。
pub mod flexible_date {
    use chrono::{DateTime, NaiveDate};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub const FORMAT: &str = "%Y-%m-%d";

    pub fn parse(s: &str) -> Option<NaiveDate> {
        let s = s.trim();
        NaiveDate::parse_from_str(s, FORMAT)
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
    }

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid date: {raw}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn jan_10_to_15() -> Vec<RentalInterval> {
        vec![RentalInterval::new(d(2024, 1, 10), d(2024, 1, 15))]
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        let intervals = jan_10_to_15();
        assert!(is_date_rented(d(2024, 1, 10), &intervals));
        assert!(is_date_rented(d(2024, 1, 15), &intervals));
        assert!(is_date_rented(d(2024, 1, 12), &intervals));
    }

    #[test]
    fn test_dates_outside_every_interval() {
        let intervals = vec![
            RentalInterval::new(d(2024, 1, 10), d(2024, 1, 15)),
            RentalInterval::new(d(2024, 2, 1), d(2024, 2, 1)),
        ];
        assert!(!is_date_rented(d(2024, 1, 9), &intervals));
        assert!(!is_date_rented(d(2024, 1, 16), &intervals));
        assert!(!is_date_rented(d(2024, 1, 31), &intervals));
        assert!(!is_date_rented(d(2024, 2, 2), &intervals));
        assert!(is_date_rented(d(2024, 2, 1), &intervals));
    }

    #[test]
    fn test_empty_list_never_matches() {
        assert!(!is_date_rented(d(2024, 1, 10), &[]));
    }

    #[test]
    fn test_overlapping_intervals() {
        let intervals = vec![
            RentalInterval::new(d(2024, 3, 1), d(2024, 3, 10)),
            RentalInterval::new(d(2024, 3, 5), d(2024, 3, 12)),
        ];
        assert!(is_date_rented(d(2024, 3, 7), &intervals));
        assert!(is_date_rented(d(2024, 3, 12), &intervals));
    }

    #[test]
    fn test_first_conflict() {
        let intervals = jan_10_to_15();
        assert!(first_conflict(d(2024, 1, 1), d(2024, 1, 9), &intervals).is_none());
        assert!(first_conflict(d(2024, 1, 16), d(2024, 1, 20), &intervals).is_none());
        assert_eq!(
            first_conflict(d(2024, 1, 14), d(2024, 1, 20), &intervals),
            Some(&intervals[0])
        );
        // 请求区间完全包住已租区间
        assert!(first_conflict(d(2024, 1, 1), d(2024, 1, 31), &intervals).is_some());
    }

    #[test]
    fn test_days_inclusive() {
        assert_eq!(jan_10_to_15()[0].days(), 6);
        assert_eq!(RentalInterval::new(d(2024, 1, 1), d(2024, 1, 1)).days(), 1);
    }

    #[test]
    fn test_deserialize_backend_dates() {
        let json = r#"[
            {"rent_start_date": "2024-01-10", "rent_end_date": "2024-01-15"},
            {"rent_start_date": "2024-02-01T00:00:00.000Z", "rent_end_date": "2024-02-03T10:30:00+05:45"}
        ]"#;
        let intervals: Vec<RentalInterval> = serde_json::from_str(json).unwrap();
        assert_eq!(intervals[0], jan_10_to_15()[0]);
        assert_eq!(intervals[1].start, d(2024, 2, 1));
        assert_eq!(intervals[1].end, d(2024, 2, 3));
    }

    #[test]
    fn test_deserialize_rejects_garbage() {
        let json = r#"{"rent_start_date": "yesterday", "rent_end_date": "2024-01-15"}"#;
        assert!(serde_json::from_str::<RentalInterval>(json).is_err());
    }

    #[test]
    fn test_month_grid() {
        // 2024-02-01 是周四
        let cells = month_grid(2024, 2);
        assert_eq!(cells.iter().take_while(|c| c.is_none()).count(), 4);
        assert_eq!(cells.iter().flatten().count(), 29);
        assert_eq!(cells.last().copied().flatten(), Some(d(2024, 2, 29)));
        assert!(month_grid(2024, 13).is_empty());
    }

    #[test]
    fn test_month_navigation() {
        assert_eq!(next_month(2024, 12), (2025, 1));
        assert_eq!(next_month(2024, 5), (2024, 6));
        assert_eq!(prev_month(2024, 1), (2023, 12));
        assert_eq!(prev_month(2024, 5), (2024, 4));
    }

    #[test]
    fn test_timestamp_arithmetic() {
        let t = Timestamp::from_secs(1_000);
        assert_eq!((t + Duration::from_secs(60)).as_secs(), 1_060);
        assert_eq!((t - Duration::from_secs(1)).as_secs(), 999);
    }
}
