//! 领域模型 (Domain Models)
//!
//! 与后端 JSON 响应一一对应的结构。所有列表记录都必须带稳定的 `id`，
//! 缺失时整个响应按格式错误处理。

use serde::{Deserialize, Deserializer, Serialize};

use crate::date::RentalInterval;

pub type RecordId = i64;

// =========================================================
// 车辆
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    #[serde(alias = "vehicle_id")]
    pub id: RecordId,
    #[serde(default)]
    pub owner_id: Option<RecordId>,
    #[serde(alias = "vehicle_name")]
    pub name: String,
    #[serde(default, alias = "vehicle_type")]
    pub category: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(alias = "price", deserialize_with = "numeric::required")]
    pub price_per_day: f64,
    #[serde(default, alias = "image_url")]
    pub image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "numeric::optional")]
    pub average_rating: Option<f64>,
    #[serde(default)]
    pub seats: Option<u32>,
}

impl Vehicle {
    /// 用于列表筛选的模糊匹配
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        [
            Some(&self.name),
            self.category.as_ref(),
            self.brand.as_ref(),
            self.model.as_ref(),
            self.location.as_ref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&query))
    }

    /// 评分展示，如 "4.5 / 5"，无评分时为 "No ratings yet"
    pub fn rating_label(&self) -> String {
        match self.average_rating {
            Some(r) if r > 0.0 => format!("{:.1} / 5", r),
            _ => "No ratings yet".to_string(),
        }
    }
}

/// 车主添加车辆时填写的信息
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleDraft {
    pub name: String,
    pub category: String,
    pub brand: String,
    pub model: String,
    pub location: String,
    pub price_per_day: f64,
    pub seats: u32,
    pub description: String,
}

// =========================================================
// 订单
// =========================================================

/// 支付状态，后端大小写不统一
///
/// 没有支付记录的订单（LEFT JOIN 得到 `null`）视为待支付。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Failed,
    Unknown,
}

impl From<String> for PaymentStatus {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" | "unpaid" | "initiated" => PaymentStatus::Pending,
            "paid" | "completed" | "success" => PaymentStatus::Paid,
            "failed" | "expired" | "user canceled" | "refunded" => PaymentStatus::Failed,
            _ => PaymentStatus::Unknown,
        }
    }
}

impl From<Option<String>> for PaymentStatus {
    fn from(raw: Option<String>) -> Self {
        raw.map(PaymentStatus::from).unwrap_or_default()
    }
}

impl PaymentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Paid => "Paid",
            PaymentStatus::Failed => "Failed",
            PaymentStatus::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(alias = "order_id")]
    pub id: RecordId,
    pub vehicle_id: RecordId,
    #[serde(default)]
    pub user_id: Option<RecordId>,
    #[serde(default)]
    pub vehicle_name: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(flatten)]
    pub interval: RentalInterval,
    #[serde(alias = "total_amount", deserialize_with = "numeric::required")]
    pub total_price: f64,
    #[serde(default)]
    pub payment_status: PaymentStatus,
}

impl Order {
    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }
}

// =========================================================
// 评论
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(alias = "comment_id")]
    pub id: RecordId,
    #[serde(default)]
    pub user_id: Option<RecordId>,
    #[serde(default, alias = "user_name", alias = "name")]
    pub author: Option<String>,
    #[serde(alias = "comment_text", alias = "content")]
    pub comment: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

// =========================================================
// 账号
// =========================================================

/// 管理员查看的用户 / 车主记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRecord {
    #[serde(alias = "user_id", alias = "owner_id")]
    pub id: RecordId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

// =========================================================
// 收入
// =========================================================

/// 单笔订单的收入拆分
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueRecord {
    #[serde(alias = "order_id")]
    pub id: RecordId,
    #[serde(default)]
    pub vehicle_name: Option<String>,
    #[serde(alias = "total_price", deserialize_with = "numeric::required")]
    pub total_amount: f64,
    #[serde(deserialize_with = "numeric::required")]
    pub admin_earning: f64,
    #[serde(deserialize_with = "numeric::required")]
    pub owner_earning: f64,
    #[serde(default)]
    pub created_at: Option<String>,
}

// =========================================================
// 数字字段
// =========================================================

/// MySQL 的 DECIMAL / AVG 结果经 JSON 传输后常是字符串（如 "4.5000"），
/// 这里同时接受数字和数字字符串。
pub mod numeric {
    use super::*;
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    fn convert<E: Error>(raw: Raw) -> Result<f64, E> {
        match raw {
            Raw::Number(n) => Ok(n),
            Raw::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| E::custom(format!("invalid number: {s}"))),
        }
    }

    pub fn required<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        convert(Raw::deserialize(deserializer)?)
    }

    pub fn optional<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
        match Option::<Raw>::deserialize(deserializer)? {
            Some(raw) => convert(raw).map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn test_vehicle_accepts_backend_aliases_and_decimal_strings() {
        let vehicle: Vehicle = serde_json::from_value(json!({
            "vehicle_id": 3,
            "vehicle_name": "Scorpio",
            "vehicle_type": "SUV",
            "price": "3500.00",
            "average_rating": "4.2500",
            "location": "Pokhara"
        }))
        .unwrap();

        assert_eq!(vehicle.id, 3);
        assert_eq!(vehicle.category.as_deref(), Some("SUV"));
        assert_eq!(vehicle.price_per_day, 3500.0);
        assert_eq!(vehicle.average_rating, Some(4.25));
        assert_eq!(vehicle.rating_label(), "4.2 / 5");
    }

    #[test]
    fn test_vehicle_without_id_is_rejected() {
        let result = serde_json::from_value::<Vehicle>(json!({
            "name": "Pulsar",
            "price_per_day": 1200
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_vehicle_null_rating() {
        let vehicle: Vehicle = serde_json::from_value(json!({
            "id": 1, "name": "Pulsar", "price_per_day": 1200, "average_rating": null
        }))
        .unwrap();
        assert_eq!(vehicle.average_rating, None);
        assert_eq!(vehicle.rating_label(), "No ratings yet");
    }

    #[test]
    fn test_vehicle_matches_query() {
        let vehicle: Vehicle = serde_json::from_value(json!({
            "id": 1, "name": "Hyundai Creta", "price_per_day": 5000, "location": "Kathmandu"
        }))
        .unwrap();
        assert!(vehicle.matches(""));
        assert!(vehicle.matches("creta"));
        assert!(vehicle.matches("KATH"));
        assert!(!vehicle.matches("pokhara"));
    }

    #[test]
    fn test_order_flattens_rental_dates() {
        let order: Order = serde_json::from_value(json!({
            "order_id": 11,
            "vehicle_id": 3,
            "rent_start_date": "2024-01-10T00:00:00.000Z",
            "rent_end_date": "2024-01-12",
            "total_amount": "10500.00",
            "payment_status": "Completed"
        }))
        .unwrap();

        assert_eq!(order.id, 11);
        assert_eq!(order.interval.start, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
        assert_eq!(order.interval.days(), 3);
        assert_eq!(order.total_price, 10500.0);
        assert!(order.is_paid());
    }

    #[test]
    fn test_null_payment_status_is_pending() {
        let orders: Vec<Order> = serde_json::from_value(json!([
            {
                "order_id": 1,
                "vehicle_id": 3,
                "rent_start_date": "2024-01-10",
                "rent_end_date": "2024-01-11",
                "total_price": 7000,
                "payment_status": null
            },
            {
                "order_id": 2,
                "vehicle_id": 3,
                "rent_start_date": "2024-01-20",
                "rent_end_date": "2024-01-20",
                "total_price": 3500
            }
        ]))
        .unwrap();

        assert_eq!(orders.len(), 2);
        assert!(orders.iter().all(|o| o.payment_status == PaymentStatus::Pending));
        assert!(!orders[0].is_paid());
    }

    #[test]
    fn test_payment_status_variants() {
        assert_eq!(PaymentStatus::from("PAID".to_string()), PaymentStatus::Paid);
        assert_eq!(PaymentStatus::from("unpaid".to_string()), PaymentStatus::Pending);
        assert_eq!(PaymentStatus::from("User canceled".to_string()), PaymentStatus::Failed);
        assert_eq!(PaymentStatus::from("weird".to_string()), PaymentStatus::Unknown);
    }

    #[test]
    fn test_revenue_record() {
        let record: RevenueRecord = serde_json::from_value(json!({
            "order_id": 5,
            "total_price": 1000,
            "admin_earning": "100.00",
            "owner_earning": 900
        }))
        .unwrap();
        assert_eq!(record.admin_earning, 100.0);
        assert_eq!(record.owner_earning, 900.0);
    }
}
