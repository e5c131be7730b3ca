//! 表单状态管理模块
//!
//! 将零散的 signal 整合为 `FormState` 结构体，负责：
//! - 数据的持有
//! - 数据的重置
//! - 数据到车辆草稿的转换与校验

use easyrent_shared::model::VehicleDraft;
use easyrent_shared::validate::{ValidationError, require, validate_price};
use leptos::prelude::*;

/// 表单字段的快照
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VehicleFields {
    pub name: String,
    pub category: String,
    pub brand: String,
    pub model: String,
    pub location: String,
    pub price_per_day: String,
    pub seats: String,
    pub description: String,
}

impl VehicleFields {
    /// 校验并转换为草稿
    pub fn to_draft(&self) -> Result<VehicleDraft, ValidationError> {
        require("Vehicle name", &self.name)?;
        require("Vehicle type", &self.category)?;
        require("Location", &self.location)?;

        let price_per_day = self
            .price_per_day
            .trim()
            .parse::<f64>()
            .map_err(|_| ValidationError::Price)?;
        validate_price(price_per_day)?;

        let seats = self
            .seats
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|s| *s > 0)
            .ok_or(ValidationError::Required("Seats"))?;

        Ok(VehicleDraft {
            name: self.name.trim().to_string(),
            category: self.category.trim().to_string(),
            brand: self.brand.trim().to_string(),
            model: self.model.trim().to_string(),
            location: self.location.trim().to_string(),
            price_per_day,
            seats,
            description: self.description.trim().to_string(),
        })
    }
}

/// 表单状态结构体
///
/// 使用 `RwSignal` 因为它实现了 `Copy` trait，非常适合作为 Props 在组件间传递。
#[derive(Clone, Copy)]
pub struct FormState {
    pub name: RwSignal<String>,
    pub category: RwSignal<String>,
    pub brand: RwSignal<String>,
    pub model: RwSignal<String>,
    pub location: RwSignal<String>,
    pub price_per_day: RwSignal<String>,
    pub seats: RwSignal<String>,
    pub description: RwSignal<String>,
}

impl FormState {
    /// 创建新的表单状态，所有字段使用默认值
    pub fn new() -> Self {
        let defaults = VehicleFields::default();
        Self {
            name: RwSignal::new(defaults.name),
            category: RwSignal::new("Car".to_string()),
            brand: RwSignal::new(defaults.brand),
            model: RwSignal::new(defaults.model),
            location: RwSignal::new(defaults.location),
            price_per_day: RwSignal::new(defaults.price_per_day),
            seats: RwSignal::new("4".to_string()),
            description: RwSignal::new(defaults.description),
        }
    }

    /// 重置表单到初始状态
    pub fn reset(&self) {
        self.name.set(String::new());
        self.category.set("Car".to_string());
        self.brand.set(String::new());
        self.model.set(String::new());
        self.location.set(String::new());
        self.price_per_day.set(String::new());
        self.seats.set("4".to_string());
        self.description.set(String::new());
    }

    pub fn snapshot(&self) -> VehicleFields {
        VehicleFields {
            name: self.name.get(),
            category: self.category.get(),
            brand: self.brand.get(),
            model: self.model.get(),
            location: self.location.get(),
            price_per_day: self.price_per_day.get(),
            seats: self.seats.get(),
            description: self.description.get(),
        }
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> VehicleFields {
        VehicleFields {
            name: " Hyundai Creta ".to_string(),
            category: "SUV".to_string(),
            brand: "Hyundai".to_string(),
            model: "2022".to_string(),
            location: "Kathmandu".to_string(),
            price_per_day: "5000".to_string(),
            seats: "5".to_string(),
            description: String::new(),
        }
    }

    #[test]
    fn test_valid_fields_become_draft() {
        let draft = filled().to_draft().unwrap();
        assert_eq!(draft.name, "Hyundai Creta");
        assert_eq!(draft.price_per_day, 5000.0);
        assert_eq!(draft.seats, 5);
    }

    #[test]
    fn test_missing_name() {
        let fields = VehicleFields {
            name: "  ".to_string(),
            ..filled()
        };
        assert_eq!(fields.to_draft(), Err(ValidationError::Required("Vehicle name")));
    }

    #[test]
    fn test_bad_price_and_seats() {
        for price in ["", "abc", "0", "-10"] {
            let fields = VehicleFields {
                price_per_day: price.to_string(),
                ..filled()
            };
            assert_eq!(fields.to_draft(), Err(ValidationError::Price), "{price}");
        }

        let fields = VehicleFields {
            seats: "0".to_string(),
            ..filled()
        };
        assert_eq!(fields.to_draft(), Err(ValidationError::Required("Seats")));
    }
}
