use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Creation and last-modification times, flattened into every persisted row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow, Serialize, Deserialize, ToSchema)]
pub struct Timestamps {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Timestamps {
    pub fn now() -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

// ---------------------------------------------------------------------------
// Tank status
// ---------------------------------------------------------------------------

/// Mirrors the `metric_status` Postgres enum.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "metric_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Normal,
    Abnormal,
}

impl Status {
    pub fn is_abnormal(self) -> bool {
        self == Status::Abnormal
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Status::Normal => "normal",
            Status::Abnormal => "abnormal",
        })
    }
}

/// A classified reading ready to be appended to `tank_status`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStatusRecord {
    pub device_id: Option<String>,
    /// Degrees Celsius
    pub temp: Option<f64>,
    pub ph: Option<f64>,
    /// Parts per million
    pub tds: Option<f64>,
    pub temp_status: Status,
    pub ph_status: Status,
    pub tds_status: Status,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct StatusRecord {
    pub id: i64,
    pub device_id: Option<String>,
    pub temp: Option<f64>,
    pub ph: Option<f64>,
    pub tds: Option<f64>,
    pub temp_status: Status,
    pub ph_status: Status,
    pub tds_status: Status,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

// ---------------------------------------------------------------------------
// Device settings
// ---------------------------------------------------------------------------

/// Mirrors the `setting_type` Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "setting_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SettingType {
    Number,
    Boolean,
    Text,
    Select,
}

impl FromStr for SettingType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "number" => Ok(Self::Number),
            "boolean" => Ok(Self::Boolean),
            "text" => Ok(Self::Text),
            "select" => Ok(Self::Select),
            other => Err(format!("unknown setting_type: {other}")),
        }
    }
}

impl fmt::Display for SettingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SettingType::Number => "number",
            SettingType::Boolean => "boolean",
            SettingType::Text => "text",
            SettingType::Select => "select",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewDeviceSetting {
    pub user_id: Option<i64>,
    pub setting_name: String,
    pub setting_type: SettingType,
    /// Canonical string form of the submitted value.
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize, ToSchema)]
pub struct DeviceSettingRecord {
    pub id: i64,
    /// Not checked against `users`.
    pub user_id: Option<i64>,
    pub setting_name: String,
    pub setting_type: SettingType,
    pub value: String,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub account: String,
    pub name: String,
    pub password_hash: String,
    pub avatar_url: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub region: Option<String>,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct User {
    pub id: i64,
    pub account: String,
    pub name: String,
    /// Argon2 PHC string.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub avatar_url: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub region: Option<String>,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

/// Mirrors the `comment_status` Postgres enum.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "comment_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CommentStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewComment {
    pub user_id: i64,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize, ToSchema)]
pub struct Comment {
    pub id: i64,
    pub user_id: i64,
    pub content: String,
    pub status: CommentStatus,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub timestamps: Timestamps,
}
