use serde::{Deserialize, Deserializer, Serialize};

use chrono::NaiveDate;

use crate::Role;
use crate::date::{RentalInterval, flexible_date};
use crate::model::{AccountRecord, Comment, Order, RecordId, RevenueRecord, Vehicle, VehicleDraft};
use crate::request::{HttpBody, HttpMethod, MultipartValue};
use crate::token::AccountId;

/// A trait that defines the request-response relationship and metadata for an API endpoint.
///
/// Path parameters are marked `#[serde(skip)]` so they never leak into the body.
pub trait ApiRequest: Serialize {
    /// The response type returned by this request.
    type Response: for<'de> Deserialize<'de>;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// Whether a bearer token must be attached.
    const REQUIRES_AUTH: bool = true;

    /// The URL path, relative to the API base.
    fn path(&self) -> String;

    /// The request body. JSON-encodes `self` for methods that carry a body.
    fn body(&self) -> Result<Option<HttpBody>, serde_json::Error> {
        if Self::METHOD.has_body() {
            serde_json::to_string(self).map(|json| Some(HttpBody::Json(json)))
        } else {
            Ok(None)
        }
    }
}

// =========================================================
// Shared responses
// =========================================================

/// Acknowledgement for write endpoints.
///
/// Accepts any JSON (or an empty body) and keeps the `message` field if present.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Ack {
    pub message: Option<String>,
}

impl<'de> Deserialize<'de> for Ack {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<serde_json::Value>::deserialize(deserializer)?;
        let message = value
            .as_ref()
            .and_then(|v| v.get("message"))
            .and_then(|m| m.as_str())
            .map(str::to_string);
        Ok(Ack { message })
    }
}

// =========================================================
// Auth
// =========================================================

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    #[serde(skip)]
    pub role: Role,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoginResponse {
    #[serde(alias = "accessToken", alias = "access_token")]
    pub token: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiRequest for LoginRequest {
    type Response = LoginResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    const REQUIRES_AUTH: bool = false;

    fn path(&self) -> String {
        match self.role {
            Role::User => "/api/users/login",
            Role::Owner => "/api/owners/login",
            Role::Admin => "/api/admin/login",
        }
        .to_string()
    }
}

/// Self-service registration (users and owners; admins are provisioned server-side).
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    #[serde(skip)]
    pub role: Role,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl ApiRequest for RegisterRequest {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Post;
    const REQUIRES_AUTH: bool = false;

    fn path(&self) -> String {
        match self.role {
            Role::Owner => "/api/owners/register",
            Role::User | Role::Admin => "/api/users/register",
        }
        .to_string()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChangePasswordRequest {
    #[serde(skip)]
    pub role: Role,
    #[serde(skip)]
    pub account_id: AccountId,
    pub current_password: String,
    pub new_password: String,
}

impl ApiRequest for ChangePasswordRequest {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        let scope = match self.role {
            Role::Owner => "owners",
            Role::User | Role::Admin => "users",
        };
        format!("/api/{}/{}/password", scope, self.account_id)
    }
}

// =========================================================
// Vehicles
// =========================================================

/// Public catalogue
#[derive(Debug, Clone, Serialize)]
pub struct ListVehiclesRequest;

impl ApiRequest for ListVehiclesRequest {
    type Response = Vec<Vehicle>;
    const METHOD: HttpMethod = HttpMethod::Get;
    const REQUIRES_AUTH: bool = false;

    fn path(&self) -> String {
        "/api/vehicles".to_string()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GetVehicleRequest {
    #[serde(skip)]
    pub id: RecordId,
}

impl ApiRequest for GetVehicleRequest {
    type Response = Vehicle;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/api/vehicles/{}", self.id)
    }
}

/// Booked date ranges of one vehicle
#[derive(Debug, Clone, Serialize)]
pub struct VehicleRentalsRequest {
    #[serde(skip)]
    pub vehicle_id: RecordId,
}

impl ApiRequest for VehicleRentalsRequest {
    type Response = Vec<RentalInterval>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/api/vehicles/{}/rentals", self.vehicle_id)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OwnerVehiclesRequest {
    #[serde(skip)]
    pub owner_id: AccountId,
}

impl ApiRequest for OwnerVehiclesRequest {
    type Response = Vec<Vehicle>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/api/owners/{}/vehicles", self.owner_id)
    }
}

/// Image attached to a new vehicle
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Create a vehicle (multipart, with optional image)
#[derive(Debug, Clone, Serialize)]
pub struct CreateVehicleRequest {
    #[serde(flatten)]
    pub draft: VehicleDraft,
    #[serde(skip)]
    pub image: Option<ImageUpload>,
}

impl ApiRequest for CreateVehicleRequest {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/api/vehicles".to_string()
    }

    fn body(&self) -> Result<Option<HttpBody>, serde_json::Error> {
        let d = &self.draft;
        let mut fields: Vec<(String, MultipartValue)> = [
            ("name", d.name.clone()),
            ("vehicle_type", d.category.clone()),
            ("brand", d.brand.clone()),
            ("model", d.model.clone()),
            ("location", d.location.clone()),
            ("price_per_day", d.price_per_day.to_string()),
            ("seats", d.seats.to_string()),
            ("description", d.description.clone()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), MultipartValue::Text(v)))
        .collect();

        if let Some(image) = &self.image {
            fields.push((
                "image".to_string(),
                MultipartValue::File {
                    file_name: image.file_name.clone(),
                    content_type: image.content_type.clone(),
                    bytes: image.bytes.clone(),
                },
            ));
        }

        Ok(Some(HttpBody::Multipart(fields)))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteVehicleRequest {
    #[serde(skip)]
    pub id: RecordId,
}

impl ApiRequest for DeleteVehicleRequest {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self) -> String {
        format!("/api/vehicles/{}", self.id)
    }
}

// =========================================================
// Bookings
// =========================================================

#[derive(Debug, Clone, Serialize)]
pub struct CreateBookingRequest {
    pub vehicle_id: RecordId,
    #[serde(with = "flexible_date")]
    pub rent_start_date: NaiveDate,
    #[serde(with = "flexible_date")]
    pub rent_end_date: NaiveDate,
    pub total_price: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BookingCreated {
    #[serde(alias = "id")]
    pub order_id: RecordId,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiRequest for CreateBookingRequest {
    type Response = BookingCreated;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/api/bookings".to_string()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserBookingsRequest {
    #[serde(skip)]
    pub user_id: AccountId,
}

impl ApiRequest for UserBookingsRequest {
    type Response = Vec<Order>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/api/users/{}/bookings", self.user_id)
    }
}

/// Orders placed on an owner's vehicles
#[derive(Debug, Clone, Serialize)]
pub struct OwnerBookingsRequest {
    #[serde(skip)]
    pub owner_id: AccountId,
}

impl ApiRequest for OwnerBookingsRequest {
    type Response = Vec<Order>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/api/owners/{}/bookings", self.owner_id)
    }
}

// =========================================================
// Ratings & comments
// =========================================================

#[derive(Debug, Clone, Serialize)]
pub struct SubmitRatingRequest {
    #[serde(skip)]
    pub vehicle_id: RecordId,
    pub rating: u8,
}

impl ApiRequest for SubmitRatingRequest {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        format!("/api/vehicles/{}/ratings", self.vehicle_id)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ListCommentsRequest {
    #[serde(skip)]
    pub vehicle_id: RecordId,
}

impl ApiRequest for ListCommentsRequest {
    type Response = Vec<Comment>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/api/vehicles/{}/comments", self.vehicle_id)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitCommentRequest {
    #[serde(skip)]
    pub vehicle_id: RecordId,
    pub comment: String,
}

impl ApiRequest for SubmitCommentRequest {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        format!("/api/vehicles/{}/comments", self.vehicle_id)
    }
}

// =========================================================
// Payments (Khalti)
// =========================================================

/// Start a Khalti checkout for an order. `amount` is in paisa.
#[derive(Debug, Clone, Serialize)]
pub struct InitiatePaymentRequest {
    pub order_id: RecordId,
    pub amount: u64,
    pub return_url: String,
    pub website_url: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InitiatePaymentResponse {
    pub pidx: String,
    pub payment_url: String,
}

impl ApiRequest for InitiatePaymentRequest {
    type Response = InitiatePaymentResponse;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/api/payments/khalti/initiate".to_string()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyPaymentRequest {
    pub pidx: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PaymentVerification {
    pub status: String,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl PaymentVerification {
    pub fn is_completed(&self) -> bool {
        self.status.eq_ignore_ascii_case("completed")
    }
}

impl ApiRequest for VerifyPaymentRequest {
    type Response = PaymentVerification;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/api/payments/khalti/verify".to_string()
    }
}

// =========================================================
// Revenue & administration
// =========================================================

#[derive(Debug, Clone, Serialize)]
pub struct AdminRevenueRequest;

impl ApiRequest for AdminRevenueRequest {
    type Response = Vec<RevenueRecord>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/api/admin/revenue".to_string()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OwnerRevenueRequest {
    #[serde(skip)]
    pub owner_id: AccountId,
}

impl ApiRequest for OwnerRevenueRequest {
    type Response = Vec<RevenueRecord>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/api/owners/{}/revenue", self.owner_id)
    }
}

/// Accounts of one role, as listed for the admin
#[derive(Debug, Clone, Serialize)]
pub struct ListAccountsRequest {
    #[serde(skip)]
    pub role: Role,
}

impl ApiRequest for ListAccountsRequest {
    type Response = Vec<AccountRecord>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        match self.role {
            Role::Owner => "/api/admin/owners",
            Role::User | Role::Admin => "/api/admin/users",
        }
        .to_string()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteAccountRequest {
    #[serde(skip)]
    pub role: Role,
    #[serde(skip)]
    pub id: RecordId,
}

impl ApiRequest for DeleteAccountRequest {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self) -> String {
        let scope = match self.role {
            Role::Owner => "owners",
            Role::User | Role::Admin => "users",
        };
        format!("/api/admin/{}/{}", scope, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_params_stay_out_of_body() {
        let req = SubmitCommentRequest {
            vehicle_id: 9,
            comment: "Clean car".to_string(),
        };
        assert_eq!(req.path(), "/api/vehicles/9/comments");
        assert_eq!(
            req.body().unwrap(),
            Some(HttpBody::Json(r#"{"comment":"Clean car"}"#.to_string()))
        );
    }

    #[test]
    fn test_get_has_no_body() {
        let req = UserBookingsRequest {
            user_id: AccountId::new("4"),
        };
        assert_eq!(req.path(), "/api/users/4/bookings");
        assert_eq!(req.body().unwrap(), None);
    }

    #[test]
    fn test_login_paths_per_role() {
        let login = |role| LoginRequest {
            role,
            email: String::new(),
            password: String::new(),
        };
        assert_eq!(login(Role::User).path(), "/api/users/login");
        assert_eq!(login(Role::Owner).path(), "/api/owners/login");
        assert_eq!(login(Role::Admin).path(), "/api/admin/login");
    }

    #[test]
    fn test_booking_dates_serialize_as_plain_dates() {
        let req = CreateBookingRequest {
            vehicle_id: 2,
            rent_start_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            rent_end_date: NaiveDate::from_ymd_opt(2024, 1, 12).unwrap(),
            total_price: 300.0,
        };
        let Some(HttpBody::Json(json)) = req.body().unwrap() else {
            panic!("expected json body");
        };
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["rent_start_date"], "2024-01-10");
        assert_eq!(value["rent_end_date"], "2024-01-12");
    }

    #[test]
    fn test_vehicle_upload_is_multipart() {
        let req = CreateVehicleRequest {
            draft: VehicleDraft {
                name: "Swift".to_string(),
                price_per_day: 2500.0,
                seats: 5,
                ..Default::default()
            },
            image: Some(ImageUpload {
                file_name: "swift.jpg".to_string(),
                content_type: "image/jpeg".to_string(),
                bytes: vec![1, 2, 3],
            }),
        };
        let Some(HttpBody::Multipart(fields)) = req.body().unwrap() else {
            panic!("expected multipart body");
        };
        assert!(fields.contains(&("name".to_string(), MultipartValue::Text("Swift".to_string()))));
        assert!(fields.contains(&("price_per_day".to_string(), MultipartValue::Text("2500".to_string()))));
        assert!(matches!(fields.last(), Some((name, MultipartValue::File { .. })) if name == "image"));
    }

    #[test]
    fn test_ack_accepts_anything() {
        assert_eq!(serde_json::from_str::<Ack>("null").unwrap(), Ack::default());
        assert_eq!(
            serde_json::from_str::<Ack>(r#"{"message":"Deleted"}"#).unwrap().message.as_deref(),
            Some("Deleted")
        );
        assert_eq!(serde_json::from_str::<Ack>("[1,2]").unwrap(), Ack::default());
    }

    #[test]
    fn test_payment_verification_status() {
        let v: PaymentVerification = serde_json::from_str(r#"{"status":"Completed"}"#).unwrap();
        assert!(v.is_completed());
        let v: PaymentVerification = serde_json::from_str(r#"{"status":"Pending"}"#).unwrap();
        assert!(!v.is_completed());
    }
}
