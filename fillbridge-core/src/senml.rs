//! SenML measurement packs built from LwM2M-style objects.
//!
//! Every object becomes a pack whose first record names the object type:
//!
//! ```text
//! [{"bn":"<id>/<object id>/","bt":<epoch secs>,"n":"0","vs":"urn:oma:lwm2m:ext:<object id>"},
//!  {"n":"<resource>","v":<number>} | {"n":..,"vs":..} | {"n":..,"vb":..}, ...]
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ports::PortError;

/// Media type of an encoded pack.
pub const CONTENT_TYPE: &str = "application/senml+json";

/// Namespace prefix of object URNs.
pub const URN_PREFIX: &str = "urn:oma:lwm2m:ext";

/// Field name that keeps a field out of the pack.
pub const EXCLUDED: &str = "-";

/// Value carried by a single field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Any integer or float.
    Number(f64),
    /// String value.
    Text(String),
    /// Boolean value.
    Bool(bool),
}

macro_rules! number_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(value: $ty) -> Self {
                    FieldValue::Number(f64::from(value))
                }
            }
        )*
    };
}

number_from!(f32, f64, i8, i16, i32, u8, u16, u32);

// No lossless `From` into f64 for these widths.
macro_rules! wide_number_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for FieldValue {
                #[expect(clippy::cast_precision_loss, reason = "SenML numbers are doubles")]
                fn from(value: $ty) -> Self {
                    FieldValue::Number(value as f64)
                }
            }
        )*
    };
}

wide_number_from!(i64, u64, i128, u128, isize, usize);

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_owned())
    }
}

/// One declared field of an object: resource name, optional unit, and value.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Resource name written as the record name. Empty or `-` excludes the field.
    pub name: &'static str,
    /// Optional SenML unit.
    pub unit: Option<&'static str>,
    /// Value, `None` when unset.
    pub value: Option<FieldValue>,
}

impl Field {
    /// Field with a present value.
    pub fn new<V: Into<FieldValue>>(name: &'static str, value: V) -> Self {
        Self {
            name,
            unit: None,
            value: Some(value.into()),
        }
    }

    /// Field whose value may be unset; unset fields are left out of the pack.
    pub fn optional<V: Into<FieldValue>>(name: &'static str, value: Option<V>) -> Self {
        Self {
            name,
            unit: None,
            value: value.map(Into::into),
        }
    }

    /// Attach a unit.
    #[must_use]
    pub fn with_unit(mut self, unit: &'static str) -> Self {
        self.unit = Some(unit);
        self
    }

    fn is_excluded(&self) -> bool {
        self.name.is_empty() || self.name == EXCLUDED
    }
}

/// A record type that can be written as a SenML pack.
pub trait Lwm2mObject {
    /// Device identifier, first segment of the base name.
    fn id(&self) -> &str;

    /// LwM2M object type, such as `3435`.
    fn object_id(&self) -> &str;

    /// Object type URN carried by the header record.
    fn object_urn(&self) -> String {
        format!("{URN_PREFIX}:{}", self.object_id())
    }

    /// Capture time, written as base time.
    fn timestamp(&self) -> DateTime<Utc>;

    /// Fields in declaration order.
    fn fields(&self) -> Vec<Field>;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
/// A single SenML record.
pub struct Record {
    /// Base name.
    #[serde(rename = "bn", default, skip_serializing_if = "Option::is_none")]
    pub base_name: Option<String>,
    /// Base time in epoch seconds.
    #[serde(rename = "bt", default, skip_serializing_if = "Option::is_none")]
    pub base_time: Option<f64>,
    /// Record name.
    #[serde(rename = "n", default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Unit.
    #[serde(rename = "u", default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Numeric value.
    #[serde(rename = "v", default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    /// String value.
    #[serde(rename = "vs", default, skip_serializing_if = "Option::is_none")]
    pub string_value: Option<String>,
    /// Boolean value.
    #[serde(rename = "vb", default, skip_serializing_if = "Option::is_none")]
    pub bool_value: Option<bool>,
}

impl Record {
    fn from_field(field: Field) -> Option<Self> {
        if field.is_excluded() {
            return None;
        }

        let mut record = Record {
            name: field.name.to_owned(),
            unit: field.unit.map(str::to_owned),
            ..Record::default()
        };

        match field.value? {
            FieldValue::Number(number) => record.value = Some(number),
            FieldValue::Text(text) => record.string_value = Some(text),
            FieldValue::Bool(flag) => record.bool_value = Some(flag),
        }

        Some(record)
    }

    /// The value carried by this record, if any.
    #[must_use]
    pub fn field_value(&self) -> Option<FieldValue> {
        if let Some(number) = self.value {
            return Some(FieldValue::Number(number));
        }
        if let Some(text) = &self.string_value {
            return Some(FieldValue::Text(text.clone()));
        }
        self.bool_value.map(FieldValue::Bool)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
/// Ordered list of records describing one object.
pub struct Pack(pub Vec<Record>);

impl Pack {
    /// All records, header first.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.0
    }

    /// The header record naming the object type.
    #[must_use]
    pub fn header(&self) -> Option<&Record> {
        self.0.first()
    }

    /// Records after the header.
    #[must_use]
    pub fn entries(&self) -> &[Record] {
        self.0.get(1..).unwrap_or_default()
    }
}

/// Build the pack for an object.
#[expect(clippy::cast_precision_loss, reason = "SenML base time is a double")]
pub fn encode<O: Lwm2mObject + ?Sized>(object: &O) -> Pack {
    let header = Record {
        base_name: Some(format!("{}/{}/", object.id(), object.object_id())),
        base_time: Some(object.timestamp().timestamp() as f64),
        name: "0".to_owned(),
        string_value: Some(object.object_urn()),
        ..Record::default()
    };

    let mut records = vec![header];
    records.extend(object.fields().into_iter().filter_map(Record::from_field));

    Pack(records)
}

/// Encode an object as SenML JSON.
///
/// # Errors
///
/// Returns [`PortError::Serialization`] when JSON serialization fails.
pub fn to_json<O: Lwm2mObject + ?Sized>(object: &O) -> Result<Vec<u8>, PortError> {
    serde_json::to_vec(&encode(object)).map_err(PortError::Serialization)
}

/// Decode a SenML JSON pack.
///
/// # Errors
///
/// Returns [`PortError::Deserialization`] when the bytes are not a SenML pack.
pub fn from_json(bytes: &[u8]) -> Result<Pack, PortError> {
    serde_json::from_slice(bytes).map_err(PortError::Deserialization)
}
