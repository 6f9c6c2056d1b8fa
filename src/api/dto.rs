use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::extract::{lenient_f64, lenient_i64, lenient_string, string_only};
use crate::{
    db::models::{CommentStatus, Status, StatusRecord, User},
    tank::{SensorReading, SettingChange},
    users::{Login, Registration},
};

/// Acknowledgement body, e.g. `{"msg": "created"}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageDto {
    pub msg: String,
}

impl MessageDto {
    pub fn new(msg: &str) -> Self {
        Self { msg: msg.to_owned() }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDto {
    pub error: String,
}

// ---------------------------------------------------------------------------
// Tank
// ---------------------------------------------------------------------------

/// Request body for `POST /tank/status`. Every field is optional.
///
/// Metrics may arrive as numbers or numeric strings; a value of any other
/// type is recorded as missing rather than rejected.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct TankReadingRequest {
    /// Degrees Celsius
    #[serde(default, deserialize_with = "lenient_f64")]
    pub temp: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub ph: Option<f64>,
    /// Parts per million
    #[serde(default, deserialize_with = "lenient_f64")]
    pub tds: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub device_id: Option<String>,
}

impl From<TankReadingRequest> for SensorReading {
    fn from(r: TankReadingRequest) -> Self {
        Self {
            device_id: r.device_id,
            temp: r.temp,
            ph: r.ph,
            tds: r.tds,
        }
    }
}

/// Response for `GET /tank/status`.
///
/// With no readings stored yet every value is `null`, every status is
/// `normal` and `update_time` is `null`.
#[derive(Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TankStatusDto {
    pub update_time: Option<DateTime<Utc>>,
    pub temp: Option<f64>,
    pub ph: Option<f64>,
    pub tds: Option<f64>,
    pub temp_status: Status,
    pub ph_status: Status,
    pub tds_status: Status,
}

impl From<StatusRecord> for TankStatusDto {
    fn from(r: StatusRecord) -> Self {
        Self {
            update_time: Some(r.timestamps.created_at),
            temp: r.temp,
            ph: r.ph,
            tds: r.tds,
            temp_status: r.temp_status,
            ph_status: r.ph_status,
            tds_status: r.tds_status,
        }
    }
}

/// Request body for `POST /tank/settings`.
///
/// A non-string name or type counts as missing.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SettingRequest {
    #[serde(default, deserialize_with = "string_only")]
    pub setting_name: Option<String>,
    /// One of `number`, `boolean`, `text`, `select`.
    #[serde(default, deserialize_with = "string_only")]
    pub setting_type: Option<String>,
    /// String, number or boolean; stored as its display string.
    #[schema(value_type = Object)]
    pub value: Option<Value>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub user_id: Option<i64>,
}

impl From<SettingRequest> for SettingChange {
    fn from(r: SettingRequest) -> Self {
        Self {
            user_id: r.user_id,
            setting_name: r.setting_name,
            setting_type: r.setting_type,
            value: r.value,
        }
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub account: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<String>,
    /// `YYYY-MM-DD`
    pub birthday: Option<String>,
    pub region: Option<String>,
    pub avatar: Option<String>,
}

impl From<RegisterRequest> for Registration {
    fn from(r: RegisterRequest) -> Self {
        Self {
            account: r.account,
            password: r.password,
            name: r.name,
            phone: r.phone,
            gender: r.gender,
            birthday: r.birthday,
            region: r.region,
            avatar: r.avatar,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub account: Option<String>,
    pub password: Option<String>,
}

impl From<LoginRequest> for Login {
    fn from(r: LoginRequest) -> Self {
        Self {
            account: r.account,
            password: r.password,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserSummaryDto {
    pub id: i64,
    pub name: String,
}

impl From<User> for UserSummaryDto {
    fn from(u: User) -> Self {
        Self { id: u.id, name: u.name }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserProfileDto {
    pub id: i64,
    pub avatar: Option<String>,
    pub name: String,
    pub account: String,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub region: Option<String>,
}

impl From<User> for UserProfileDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            avatar: u.avatar_url,
            name: u.name,
            account: u.account,
            phone: u.phone,
            gender: u.gender,
            birthday: u.birthday,
            region: u.region,
        }
    }
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, ToSchema)]
pub struct CommentRequest {
    pub user_id: Option<i64>,
    pub content: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ModerationRequest {
    pub status: CommentStatus,
}
