//! Domain records for the Remo cloud API.
//!
//! # Design
//! These types mirror the service's JSON shapes and are defined independently
//! from the mock-server crate; the integration test catches schema drift
//! between the two. Fields the service reports as `null` for plain infrared
//! appliances are `Option`s.

use serde::{Deserialize, Serialize};

/// The account the bearer token belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub nickname: String,
}

/// Device fields shared by `Device` and the `device` member of `Appliance`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceCore {
    pub id: String,
    pub name: String,
    pub temperature_offset: i32,
    pub humidity_offset: i32,
    pub created_at: String,
    pub updated_at: String,
    pub firmware_version: String,
}

/// A single sensor reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorValue {
    #[serde(alias = "val")]
    pub value: f64,
    pub created_at: String,
}

/// Latest temperature (`te`) and humidity (`hu`) readings of a device.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewestEvents {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub te: Option<SensorValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hu: Option<SensorValue>,
}

/// A physical hub and its most recent sensor readings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    #[serde(flatten)]
    pub core: DeviceCore,
    #[serde(default)]
    pub newest_events: NewestEvents,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplianceModel {
    pub id: String,
    pub manufacturer: String,
    pub remote_name: String,
    pub name: String,
    pub image: String,
}

/// Accepted temperature, air volume and air direction values for one mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirConRangeMode {
    pub temp: String,
    pub vol: String,
    pub dir: String,
}

/// Current (or detected) air conditioner state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirConParams {
    pub temp: String,
    pub vol: String,
    pub dir: String,
    pub mode: String,
    pub button: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirConModes {
    pub cool: AirConRangeMode,
    pub warm: AirConRangeMode,
    pub dry: AirConRangeMode,
    pub blow: AirConRangeMode,
    pub auto: AirConRangeMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirConRange {
    pub modes: AirConModes,
    #[serde(rename = "fixedButtons")]
    pub fixed_buttons: Vec<String>,
}

/// Capabilities of an air conditioner appliance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirCon {
    pub range: AirConRange,
    #[serde(rename = "tempUnit")]
    pub temp_unit: String,
}

/// A stored infrared signal, without its waveform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    pub id: String,
    pub name: String,
    pub image: String,
}

/// A controllable appliance profile tied to a device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appliance {
    pub id: String,
    pub device: DeviceCore,
    #[serde(default)]
    pub model: Option<ApplianceModel>,
    pub nickname: String,
    pub image: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub settings: Option<AirConParams>,
    #[serde(default)]
    pub aircon: Option<AirCon>,
    #[serde(default)]
    pub signals: Vec<Signal>,
}

/// One candidate returned by appliance detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplianceModelAndParam {
    pub model: ApplianceModel,
    pub params: AirConParams,
}

/// A raw infrared waveform.
///
/// `freq` is the carrier frequency in kHz, `data` the alternating on/off
/// durations in microseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfraredSignal {
    pub format: String,
    pub freq: u32,
    pub data: Vec<u32>,
}

/// Parameters for `update_aircon_settings`. `None` fields are left unchanged
/// on the server and omitted from the request body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirConSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub air_volume: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub air_direction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button: Option<String>,
}

/// Parameters for `create_appliance`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAppliance {
    pub device: String,
    pub nickname: String,
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEVICE_CORE: &str = r#"{
        "id": "dev-1",
        "name": "Living room",
        "temperature_offset": 0,
        "humidity_offset": -2,
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-01-02T00:00:00Z",
        "firmware_version": "Remo/1.0.62-gabbf5bd"
    }"#;

    #[test]
    fn device_flattens_core_and_reads_sensors() {
        let raw = r#"{
            "id": "dev-1",
            "name": "Living room",
            "temperature_offset": 0,
            "humidity_offset": -2,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-02T00:00:00Z",
            "firmware_version": "Remo/1.0.62-gabbf5bd",
            "newest_events": {
                "te": {"val": 23.5, "created_at": "2024-01-02T00:00:00Z"},
                "hu": {"value": 41, "created_at": "2024-01-02T00:00:00Z"}
            }
        }"#;
        let device: Device = serde_json::from_str(raw).unwrap();
        assert_eq!(device.core.name, "Living room");
        assert_eq!(device.core.humidity_offset, -2);
        assert_eq!(device.newest_events.te.as_ref().unwrap().value, 23.5);
        assert_eq!(device.newest_events.hu.as_ref().unwrap().value, 41.0);
    }

    #[test]
    fn device_without_humidity_sensor() {
        let raw = r#"{
            "id": "dev-2",
            "name": "Remo mini",
            "temperature_offset": 0,
            "humidity_offset": 0,
            "created_at": "",
            "updated_at": "",
            "firmware_version": "Remo-mini/1.0.0",
            "newest_events": {"te": {"value": 20, "created_at": ""}}
        }"#;
        let device: Device = serde_json::from_str(raw).unwrap();
        assert!(device.newest_events.hu.is_none());
    }

    #[test]
    fn infrared_appliance_has_null_aircon_fields() {
        let raw = format!(
            r#"{{
                "id": "app-1",
                "device": {DEVICE_CORE},
                "model": null,
                "nickname": "Light",
                "image": "ico_light",
                "type": "IR",
                "settings": null,
                "aircon": null,
                "signals": [{{"id": "sig-1", "name": "on", "image": "ico_on"}}]
            }}"#
        );
        let appliance: Appliance = serde_json::from_str(&raw).unwrap();
        assert_eq!(appliance.kind, "IR");
        assert!(appliance.model.is_none());
        assert!(appliance.aircon.is_none());
        assert_eq!(appliance.signals[0].name, "on");
    }

    #[test]
    fn aircon_uses_camel_case_wire_names() {
        let mode = r#"{"temp": "16-30", "vol": "auto", "dir": "swing"}"#;
        let raw = format!(
            r#"{{
                "range": {{
                    "modes": {{"cool": {mode}, "warm": {mode}, "dry": {mode}, "blow": {mode}, "auto": {mode}}},
                    "fixedButtons": ["power-off"]
                }},
                "tempUnit": "c"
            }}"#
        );
        let aircon: AirCon = serde_json::from_str(&raw).unwrap();
        assert_eq!(aircon.temp_unit, "c");
        assert_eq!(aircon.range.fixed_buttons, vec!["power-off"]);
        assert_eq!(aircon.range.modes.cool.vol, "auto");

        let back = serde_json::to_value(&aircon).unwrap();
        assert_eq!(back["tempUnit"], "c");
        assert!(back["range"].get("fixedButtons").is_some());
    }

    #[test]
    fn appliance_kind_serializes_as_type() {
        let raw = format!(
            r#"{{"id": "a", "device": {DEVICE_CORE}, "nickname": "n", "image": "i", "type": "AC"}}"#
        );
        let appliance: Appliance = serde_json::from_str(&raw).unwrap();
        assert!(appliance.signals.is_empty());
        let back = serde_json::to_value(&appliance).unwrap();
        assert_eq!(back["type"], "AC");
        assert!(back.get("kind").is_none());
    }
}
