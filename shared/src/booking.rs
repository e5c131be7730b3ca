//! 预订报价与收入汇总

use chrono::NaiveDate;

use crate::date::RentalInterval;
use crate::model::RevenueRecord;

/// 一次预订的价格
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BookingQuote {
    pub interval: RentalInterval,
    pub days: i64,
    pub price_per_day: f64,
    pub total: f64,
}

impl BookingQuote {
    /// 区间首尾都计费；`end` 早于 `start` 时返回 None
    pub fn new(start: NaiveDate, end: NaiveDate, price_per_day: f64) -> Option<Self> {
        if end < start {
            return None;
        }
        let interval = RentalInterval::new(start, end);
        let days = interval.days();
        Some(Self {
            interval,
            days,
            price_per_day,
            total: price_per_day * days as f64,
        })
    }

    /// Khalti 以 paisa 计价（1 NPR = 100 paisa）
    pub fn amount_paisa(&self) -> u64 {
        to_paisa(self.total)
    }
}

pub fn to_paisa(rupees: f64) -> u64 {
    (rupees * 100.0).round().max(0.0) as u64
}

/// 金额展示，如 "Rs. 3,500.00"
pub fn format_npr(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((&fixed, "00"));

    let mut grouped = String::new();
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{sign}Rs. {grouped}.{fraction}")
}

/// 收入汇总（管理员看全站，车主看自己的车辆）
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EarningsSummary {
    pub orders: usize,
    pub gross: f64,
    pub admin_earning: f64,
    pub owner_earning: f64,
}

impl EarningsSummary {
    pub fn from_records(records: &[RevenueRecord]) -> Self {
        records.iter().fold(Self::default(), |mut acc, r| {
            acc.orders += 1;
            acc.gross += r.total_amount;
            acc.admin_earning += r.admin_earning;
            acc.owner_earning += r.owner_earning;
            acc
        })
    }

    /// 平台抽成占总额的百分比
    pub fn commission_percent(&self) -> f64 {
        if self.gross <= 0.0 {
            0.0
        } else {
            self.admin_earning / self.gross * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn record(id: i64, total: f64, admin: f64) -> RevenueRecord {
        RevenueRecord {
            id,
            vehicle_name: None,
            total_amount: total,
            admin_earning: admin,
            owner_earning: total - admin,
            created_at: None,
        }
    }

    #[test]
    fn test_quote_counts_both_ends() {
        let quote = BookingQuote::new(d(10), d(12), 3500.0).unwrap();
        assert_eq!(quote.days, 3);
        assert_eq!(quote.total, 10500.0);
        assert_eq!(quote.amount_paisa(), 1_050_000);
    }

    #[test]
    fn test_same_day_rental() {
        let quote = BookingQuote::new(d(5), d(5), 999.99).unwrap();
        assert_eq!(quote.days, 1);
        assert_eq!(quote.amount_paisa(), 99_999);
    }

    #[test]
    fn test_reversed_range_has_no_quote() {
        assert!(BookingQuote::new(d(12), d(10), 100.0).is_none());
    }

    #[test]
    fn test_format_npr() {
        assert_eq!(format_npr(0.0), "Rs. 0.00");
        assert_eq!(format_npr(950.5), "Rs. 950.50");
        assert_eq!(format_npr(3500.0), "Rs. 3,500.00");
        assert_eq!(format_npr(1234567.891), "Rs. 1,234,567.89");
        assert_eq!(format_npr(-20.0), "-Rs. 20.00");
    }

    #[test]
    fn test_earnings_summary() {
        let summary = EarningsSummary::from_records(&[record(1, 1000.0, 100.0), record(2, 3000.0, 300.0)]);
        assert_eq!(summary.orders, 2);
        assert_eq!(summary.gross, 4000.0);
        assert_eq!(summary.admin_earning, 400.0);
        assert_eq!(summary.owner_earning, 3600.0);
        assert!((summary.commission_percent() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_summary() {
        let summary = EarningsSummary::from_records(&[]);
        assert_eq!(summary, EarningsSummary::default());
        assert_eq!(summary.commission_percent(), 0.0);
    }
}
