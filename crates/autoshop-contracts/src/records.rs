//! Intake record types.
//!
//! The three records mirror the intake form. Every field holds the raw string
//! the user typed; deciding what is acceptable is the validator's job.
//!
//! Records are keyed by their form labels (`"Make"`, `"Seating Capacity"`,
//! `"Last Service Date"`, ...) when built from raw field maps or TOML. An
//! unknown or misspelled label is rejected at construction time instead of
//! surfacing later as a silently empty field. Labels that are not supplied
//! default to the empty string.

use std::fmt;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ShopError, ShopResult};

/// Vehicle details captured at intake.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VehicleRecord {
    #[serde(rename = "Make")]
    pub make: String,
    #[serde(rename = "Model")]
    pub model: String,
    #[serde(rename = "Year")]
    pub year: String,
    #[serde(rename = "VIN")]
    pub vin: String,
    #[serde(rename = "Color")]
    pub color: String,
    #[serde(rename = "Mileage")]
    pub mileage: String,
    #[serde(rename = "Engine")]
    pub engine: String,
    #[serde(rename = "Transmission")]
    pub transmission: String,
    #[serde(rename = "Fuel Type")]
    pub fuel_type: String,
    #[serde(rename = "Seating Capacity")]
    pub seating_capacity: String,
    #[serde(rename = "Doors")]
    pub doors: String,
    #[serde(rename = "Condition")]
    pub condition: String,
}

impl VehicleRecord {
    /// Build a record from `(label, value)` pairs.
    pub fn from_fields<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> ShopResult<Self>
    where
        K: Into<String>,
        V: Into<String>,
    {
        from_label_map("vehicle", fields)
    }

    /// `(label, value)` pairs in form order.
    pub fn labeled(&self) -> [(&'static str, &str); 12] {
        [
            ("Make", self.make.as_str()),
            ("Model", self.model.as_str()),
            ("Year", self.year.as_str()),
            ("VIN", self.vin.as_str()),
            ("Color", self.color.as_str()),
            ("Mileage", self.mileage.as_str()),
            ("Engine", self.engine.as_str()),
            ("Transmission", self.transmission.as_str()),
            ("Fuel Type", self.fuel_type.as_str()),
            ("Seating Capacity", self.seating_capacity.as_str()),
            ("Doors", self.doors.as_str()),
            ("Condition", self.condition.as_str()),
        ]
    }
}

/// Customer details captured at intake.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CustomerRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Contact")]
    pub contact: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Address")]
    pub address: String,
    #[serde(rename = "Date of Birth")]
    pub date_of_birth: String,
    #[serde(rename = "License Number")]
    pub license_number: String,
    #[serde(rename = "Registration Number")]
    pub registration_number: String,
    #[serde(rename = "Additional Info")]
    pub additional_info: String,
}

impl CustomerRecord {
    /// Build a record from `(label, value)` pairs.
    pub fn from_fields<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> ShopResult<Self>
    where
        K: Into<String>,
        V: Into<String>,
    {
        from_label_map("customer", fields)
    }

    pub fn labeled(&self) -> [(&'static str, &str); 8] {
        [
            ("Name", self.name.as_str()),
            ("Contact", self.contact.as_str()),
            ("Email", self.email.as_str()),
            ("Address", self.address.as_str()),
            ("Date of Birth", self.date_of_birth.as_str()),
            ("License Number", self.license_number.as_str()),
            ("Registration Number", self.registration_number.as_str()),
            ("Additional Info", self.additional_info.as_str()),
        ]
    }
}

/// The vehicle's most recent service and the next one due.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceHistoryRecord {
    #[serde(rename = "Last Service Date")]
    pub last_service_date: String,
    #[serde(rename = "Next Service Due")]
    pub next_service_due: String,
    #[serde(rename = "Service Mileage")]
    pub service_mileage: String,
    #[serde(rename = "Service Type")]
    pub service_type: String,
    #[serde(rename = "Service Details")]
    pub service_details: String,
}

impl ServiceHistoryRecord {
    /// Build a record from `(label, value)` pairs.
    pub fn from_fields<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> ShopResult<Self>
    where
        K: Into<String>,
        V: Into<String>,
    {
        from_label_map("service history", fields)
    }

    pub fn labeled(&self) -> [(&'static str, &str); 5] {
        [
            ("Last Service Date", self.last_service_date.as_str()),
            ("Next Service Due", self.next_service_due.as_str()),
            ("Service Mileage", self.service_mileage.as_str()),
            ("Service Type", self.service_type.as_str()),
            ("Service Details", self.service_details.as_str()),
        ]
    }
}

/// One atomic form submission: all three records together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Intake {
    #[serde(default)]
    pub vehicle: VehicleRecord,
    #[serde(default)]
    pub customer: CustomerRecord,
    #[serde(default)]
    pub service: ServiceHistoryRecord,
}

impl Intake {
    pub fn new(
        vehicle: VehicleRecord,
        customer: CustomerRecord,
        service: ServiceHistoryRecord,
    ) -> Self {
        Self { vehicle, customer, service }
    }

    /// Parse an intake document with `[vehicle]`, `[customer]` and
    /// `[service]` tables keyed by form labels.
    ///
    /// Returns `ShopError::Intake` on malformed TOML or unknown labels.
    pub fn from_toml_str(s: &str) -> ShopResult<Self> {
        toml::from_str(s).map_err(|e| ShopError::Intake {
            reason: format!("failed to parse intake TOML: {}", e),
        })
    }
}

fn from_label_map<T, K, V>(record: &str, fields: impl IntoIterator<Item = (K, V)>) -> ShopResult<T>
where
    T: DeserializeOwned,
    K: Into<String>,
    V: Into<String>,
{
    let object: Map<String, Value> = fields
        .into_iter()
        .map(|(k, v)| (k.into(), Value::String(v.into())))
        .collect();
    serde_json::from_value(Value::Object(object)).map_err(|e| ShopError::Intake {
        reason: format!("{} record: {}", record, e),
    })
}

fn write_labeled(f: &mut fmt::Formatter<'_>, pairs: &[(&'static str, &str)]) -> fmt::Result {
    f.write_str("{")?;
    for (i, (label, value)) in pairs.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}: {}", label, value)?;
    }
    f.write_str("}")
}

impl fmt::Display for VehicleRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_labeled(f, &self.labeled())
    }
}

impl fmt::Display for CustomerRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_labeled(f, &self.labeled())
    }
}

impl fmt::Display for ServiceHistoryRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_labeled(f, &self.labeled())
    }
}
