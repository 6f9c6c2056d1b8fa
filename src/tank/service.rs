use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use super::classifier::{classify_ph, classify_tds, classify_temperature};
use crate::{
    db::{
        models::{DeviceSettingRecord, NewDeviceSetting, NewStatusRecord, SettingType, StatusRecord},
        Store,
    },
    error::{Error, Result},
};

pub const MISSING_SETTING_FIELDS: &str = "setting_name, setting_type and value are required";
pub const UNSUPPORTED_SETTING_VALUE: &str = "value must be a string, number or boolean";

/// One telemetry push. Every field may be missing; a sensor that failed to
/// report is not an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorReading {
    pub device_id: Option<String>,
    pub temp: Option<f64>,
    pub ph: Option<f64>,
    pub tds: Option<f64>,
}

/// A setting change as submitted, before validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingChange {
    pub user_id: Option<i64>,
    pub setting_name: Option<String>,
    pub setting_type: Option<String>,
    /// `None` means absent or JSON `null`; any other value is present,
    /// including `0`, `false` and `""`.
    pub value: Option<Value>,
}

#[derive(Clone)]
pub struct TankService {
    store: Arc<dyn Store>,
}

impl TankService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Classifies each metric and appends one status row.
    pub async fn ingest(&self, reading: SensorReading) -> Result<StatusRecord> {
        let record = NewStatusRecord {
            temp_status: classify_temperature(reading.temp),
            ph_status: classify_ph(reading.ph),
            tds_status: classify_tds(reading.tds),
            device_id: reading.device_id,
            temp: reading.temp,
            ph: reading.ph,
            tds: reading.tds,
        };

        let saved = self.store.insert_status(record).await?;

        info!(
            id = saved.id,
            device_id = ?saved.device_id,
            temp_status = %saved.temp_status,
            ph_status = %saved.ph_status,
            tds_status = %saved.tds_status,
            "Tank status recorded"
        );
        if saved.temp_status.is_abnormal()
            || saved.ph_status.is_abnormal()
            || saved.tds_status.is_abnormal()
        {
            warn!(
                id = saved.id,
                temp = ?saved.temp,
                ph = ?saved.ph,
                tds = ?saved.tds,
                "Tank reading outside normal range"
            );
        }

        Ok(saved)
    }

    pub async fn latest_status(&self) -> Result<Option<StatusRecord>> {
        Ok(self.store.latest_status().await?)
    }

    /// Validates a setting change and appends it to the setting log.
    pub async fn record_setting(&self, change: SettingChange) -> Result<DeviceSettingRecord> {
        let setting = validate_setting(change)?;
        let saved = self.store.insert_setting(setting).await?;

        info!(
            id = saved.id,
            user_id = ?saved.user_id,
            setting_name = %saved.setting_name,
            setting_type = %saved.setting_type,
            "Device setting saved"
        );
        Ok(saved)
    }

    pub async fn list_settings(&self, user_id: Option<i64>) -> Result<Vec<DeviceSettingRecord>> {
        Ok(self.store.list_settings(user_id).await?)
    }
}

fn validate_setting(change: SettingChange) -> Result<NewDeviceSetting> {
    let (Some(name), Some(kind), Some(value)) = (
        change.setting_name.filter(|s| !s.is_empty()),
        change.setting_type.filter(|s| !s.is_empty()),
        change.value,
    ) else {
        return Err(Error::validation(MISSING_SETTING_FIELDS));
    };

    let setting_type = kind.parse::<SettingType>().map_err(Error::Validation)?;
    let value = canonical_value(&value)
        .ok_or_else(|| Error::validation(UNSUPPORTED_SETTING_VALUE))?;

    Ok(NewDeviceSetting {
        user_id: change.user_id,
        setting_name: name,
        setting_type,
        value,
    })
}

/// Display form of a primitive JSON value: `true`, `12.5`, or the text
/// itself. `None` for null, arrays and objects.
pub fn canonical_value(value: &Value) -> Option<String> {
    match value {
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::db::{models::Status, MemoryStore};

    fn service() -> TankService {
        TankService::new(Arc::new(MemoryStore::new()))
    }

    fn change(name: Option<&str>, kind: Option<&str>, value: Option<Value>) -> SettingChange {
        SettingChange {
            user_id: None,
            setting_name: name.map(str::to_owned),
            setting_type: kind.map(str::to_owned),
            value,
        }
    }

    #[test]
    fn canonical_value_of_primitives() {
        assert_eq!(canonical_value(&json!(true)).as_deref(), Some("true"));
        assert_eq!(canonical_value(&json!(false)).as_deref(), Some("false"));
        assert_eq!(canonical_value(&json!(12.5)).as_deref(), Some("12.5"));
        assert_eq!(canonical_value(&json!(12)).as_deref(), Some("12"));
        assert_eq!(canonical_value(&json!(0)).as_deref(), Some("0"));
        assert_eq!(canonical_value(&json!("")).as_deref(), Some(""));
        assert_eq!(canonical_value(&json!("blue")).as_deref(), Some("blue"));
    }

    #[test]
    fn canonical_value_rejects_non_primitives() {
        assert!(canonical_value(&Value::Null).is_none());
        assert!(canonical_value(&json!([1, 2])).is_none());
        assert!(canonical_value(&json!({ "a": 1 })).is_none());
    }

    #[tokio::test]
    async fn ingest_all_absent_is_all_normal() {
        let tank = service();
        let saved = tank.ingest(SensorReading::default()).await.unwrap();

        assert_eq!(saved.temp, None);
        assert_eq!(saved.temp_status, Status::Normal);
        assert_eq!(saved.ph_status, Status::Normal);
        assert_eq!(saved.tds_status, Status::Normal);
    }

    #[tokio::test]
    async fn ingest_classifies_each_metric_independently() {
        let tank = service();
        let saved = tank
            .ingest(SensorReading {
                device_id: Some("tank-1".to_owned()),
                temp: Some(45.0),
                ph: Some(7.0),
                tds: Some(1200.0),
            })
            .await
            .unwrap();

        assert_eq!(saved.device_id.as_deref(), Some("tank-1"));
        assert_eq!(saved.temp_status, Status::Abnormal);
        assert_eq!(saved.ph_status, Status::Normal);
        assert_eq!(saved.tds_status, Status::Abnormal);

        let latest = tank.latest_status().await.unwrap().unwrap();
        assert_eq!(latest, saved);
    }

    #[tokio::test]
    async fn falsy_setting_values_are_accepted() {
        let tank = service();
        for (kind, value, stored) in [
            ("boolean", json!(false), "false"),
            ("number", json!(0), "0"),
            ("text", json!(""), ""),
        ] {
            let saved = tank
                .record_setting(change(Some("led"), Some(kind), Some(value)))
                .await
                .unwrap();
            assert_eq!(saved.value, stored);
        }
        assert_eq!(tank.list_settings(None).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn missing_setting_fields_are_rejected() {
        let tank = service();
        let cases = [
            change(None, Some("text"), Some(json!("x"))),
            change(Some(""), Some("text"), Some(json!("x"))),
            change(Some("led"), None, Some(json!("x"))),
            change(Some("led"), Some(""), Some(json!("x"))),
            change(Some("led"), Some("text"), None),
        ];

        for case in cases {
            let err = tank.record_setting(case).await.unwrap_err();
            assert!(
                matches!(&err, Error::Validation(msg) if msg == MISSING_SETTING_FIELDS),
                "unexpected error: {err:?}"
            );
        }
        assert!(tank.list_settings(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_setting_type_is_rejected() {
        let err = service()
            .record_setting(change(Some("led"), Some("slider"), Some(json!(3))))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(msg) if msg == "unknown setting_type: slider"));
    }

    #[tokio::test]
    async fn setting_is_attributed_without_user_check() {
        let tank = service();
        let saved = tank
            .record_setting(SettingChange {
                user_id: Some(404),
                ..change(Some("pump"), Some("select"), Some(json!("high")))
            })
            .await
            .unwrap();
        assert_eq!(saved.user_id, Some(404));
        assert_eq!(saved.setting_type, SettingType::Select);
        assert_eq!(tank.list_settings(Some(404)).await.unwrap().len(), 1);
        assert!(tank.list_settings(Some(1)).await.unwrap().is_empty());
    }
}
