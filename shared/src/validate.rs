//! 表单校验
//!
//! 提交前在客户端完成，错误文字直接显示在表单中。

use chrono::NaiveDate;
use thiserror::Error;
use validator::ValidateEmail;

use crate::date::{RentalInterval, first_conflict};

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("Enter a valid email address")]
    Email,
    #[error("Password must be at least 8 characters long")]
    PasswordTooShort,
    #[error("Password must contain an uppercase letter, a lowercase letter, a number and a symbol")]
    PasswordTooWeak,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("New password must differ from the current one")]
    PasswordUnchanged,
    #[error("Enter a 10 digit mobile number starting with 97 or 98")]
    Phone,
    #[error("Rating must be between 1 and 5")]
    Rating,
    #[error("Price must be greater than zero")]
    Price,
    #[error("End date cannot be before start date")]
    DateOrder,
    #[error("Bookings cannot start in the past")]
    PastDate,
    #[error("The vehicle is already booked from {start} to {end}")]
    DatesTaken { start: NaiveDate, end: NaiveDate },
}

pub fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Required(field))
    } else {
        Ok(())
    }
}

/// 语法交给 `validator` 判断；注册邮箱还要求域名带点，排除 `ram@localhost`
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    let has_dotted_domain = email
        .rsplit_once('@')
        .is_some_and(|(_, domain)| domain.contains('.'));

    if email.validate_email() && has_dotted_domain {
        Ok(())
    } else {
        Err(ValidationError::Email)
    }
}

/// 至少 8 位，包含大写、小写、数字和符号
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }

    let has_upper = password.chars().any(|c| c.is_uppercase());
    let has_lower = password.chars().any(|c| c.is_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password
        .chars()
        .any(|c| !c.is_alphanumeric() && !c.is_whitespace());

    if has_upper && has_lower && has_digit && has_symbol {
        Ok(())
    } else {
        Err(ValidationError::PasswordTooWeak)
    }
}

pub fn validate_password_confirmation(password: &str, confirm: &str) -> Result<(), ValidationError> {
    if password == confirm {
        Ok(())
    } else {
        Err(ValidationError::PasswordMismatch)
    }
}

pub fn validate_password_change(current: &str, new: &str, confirm: &str) -> Result<(), ValidationError> {
    require("Current password", current)?;
    validate_password(new)?;
    validate_password_confirmation(new, confirm)?;
    if current == new {
        return Err(ValidationError::PasswordUnchanged);
    }
    Ok(())
}

/// 尼泊尔手机号：10 位数字，以 97 或 98 开头，可带 +977 前缀
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let compact: String = phone
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-'))
        .collect();
    let digits = compact
        .strip_prefix("+977")
        .or_else(|| compact.strip_prefix("977").filter(|rest| rest.len() == 10))
        .unwrap_or(&compact);

    let valid = digits.len() == 10
        && digits.chars().all(|c| c.is_ascii_digit())
        && (digits.starts_with("97") || digits.starts_with("98"));

    if valid { Ok(()) } else { Err(ValidationError::Phone) }
}

pub fn validate_rating(rating: u8) -> Result<(), ValidationError> {
    if (1..=5).contains(&rating) {
        Ok(())
    } else {
        Err(ValidationError::Rating)
    }
}

pub fn validate_price(price: f64) -> Result<(), ValidationError> {
    if price.is_finite() && price > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::Price)
    }
}

/// 预订区间：顺序正确、不早于今天、不与已租区间重叠
pub fn validate_booking_range(
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
    rented: &[RentalInterval],
) -> Result<(), ValidationError> {
    if end < start {
        return Err(ValidationError::DateOrder);
    }
    if start < today {
        return Err(ValidationError::PastDate);
    }
    if let Some(taken) = first_conflict(start, end, rented) {
        return Err(ValidationError::DatesTaken {
            start: taken.start,
            end: taken.end,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email() {
        for ok in [
            "ram@example.com",
            "first.last+rent@mail.com.np",
            " a_b@x-y.io ",
            "o'brien@example.com",
            "a#b@example.com",
        ] {
            assert_eq!(validate_email(ok), Ok(()), "{ok}");
        }
        for bad in ["", "ram", "ram@", "@example.com", "ram@example", "r am@x.com", "ram@.com", "ram@@x.com"] {
            assert_eq!(validate_email(bad), Err(ValidationError::Email), "{bad}");
        }
    }

    #[test]
    fn test_password() {
        assert_eq!(validate_password("Kathmandu#1"), Ok(()));
        assert_eq!(validate_password("Ab1!"), Err(ValidationError::PasswordTooShort));
        assert_eq!(validate_password("kathmandu#1"), Err(ValidationError::PasswordTooWeak));
        assert_eq!(validate_password("Kathmandu11"), Err(ValidationError::PasswordTooWeak));
    }

    #[test]
    fn test_password_change() {
        assert_eq!(validate_password_change("Old#Pass1", "New#Pass1", "New#Pass1"), Ok(()));
        assert_eq!(
            validate_password_change("", "New#Pass1", "New#Pass1"),
            Err(ValidationError::Required("Current password"))
        );
        assert_eq!(
            validate_password_change("Old#Pass1", "New#Pass1", "New#Pass2"),
            Err(ValidationError::PasswordMismatch)
        );
        assert_eq!(
            validate_password_change("Same#Pass1", "Same#Pass1", "Same#Pass1"),
            Err(ValidationError::PasswordUnchanged)
        );
    }

    #[test]
    fn test_phone() {
        for ok in ["9841234567", "9761234567", "+977 9812345678", "977-9812345678"] {
            assert_eq!(validate_phone(ok), Ok(()), "{ok}");
        }
        for bad in ["", "984123456", "98412345678", "9641234567", "98412a4567"] {
            assert_eq!(validate_phone(bad), Err(ValidationError::Phone), "{bad}");
        }
    }

    #[test]
    fn test_rating_and_price() {
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(1).is_ok());
        assert!(validate_rating(5).is_ok());
        assert!(validate_rating(6).is_err());
        assert!(validate_price(0.0).is_err());
        assert!(validate_price(f64::NAN).is_err());
        assert!(validate_price(1500.0).is_ok());
    }

    #[test]
    fn test_booking_range() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        let rented = [RentalInterval::new(d(10), d(15))];

        assert_eq!(validate_booking_range(d(16), d(18), d(1), &rented), Ok(()));
        assert_eq!(
            validate_booking_range(d(18), d(16), d(1), &rented),
            Err(ValidationError::DateOrder)
        );
        assert_eq!(
            validate_booking_range(d(2), d(3), d(5), &rented),
            Err(ValidationError::PastDate)
        );
        assert_eq!(
            validate_booking_range(d(8), d(10), d(1), &rented),
            Err(ValidationError::DatesTaken { start: d(10), end: d(15) })
        );
    }
}
