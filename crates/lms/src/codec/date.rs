use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sqlx::database::HasArguments;
use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::sqlite::{SqliteTypeInfo, SqliteValueRef};
use sqlx::{Decode, Encode, Sqlite, Type, TypeInfo, ValueRef};

use super::CodecError;

/// Wire and storage layout for calendar dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A calendar date without a time component.
///
/// A JSON `null` decodes to the absent-date sentinel `0001-01-01`. The sentinel is
/// encoded back as `"0001-01-01"` rather than `null`, so clients that send `null`
/// read a zero date afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// The absent-date sentinel, `0001-01-01`.
    pub fn absent() -> Self {
        Self(NaiveDate::from_ymd_opt(1, 1, 1).unwrap_or(NaiveDate::MIN))
    }

    pub fn is_absent(&self) -> bool {
        *self == Self::absent()
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Strictly parse `YYYY-MM-DD`: four-digit year, two-digit month and day.
    pub fn parse(raw: &str) -> Result<Self, CodecError> {
        let bytes = raw.as_bytes();
        let shaped = bytes.len() == 10
            && bytes.iter().enumerate().all(|(index, byte)| match index {
                4 | 7 => *byte == b'-',
                _ => byte.is_ascii_digit(),
            });
        if !shaped {
            return Err(CodecError::MalformedDate(raw.to_string()));
        }

        NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .map(Self)
            .map_err(|_| CodecError::MalformedDate(raw.to_string()))
    }

    pub fn from_storage(value: StorageValue<'_>) -> Result<Self, CodecError> {
        match value {
            StorageValue::Null => Ok(Self::absent()),
            StorageValue::Temporal(date) => Ok(Self(date)),
            StorageValue::Text(text) => Self::parse(text),
            other => Err(CodecError::UnsupportedStorageValue(other.kind().to_string())),
        }
    }

    pub fn to_storage(&self) -> String {
        self.to_string()
    }
}

impl Default for CalendarDate {
    fn default() -> Self {
        Self::absent()
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl Serialize for CalendarDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CalendarDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(Self::absent()),
            Some(raw) => Self::parse(&raw).map_err(serde::de::Error::custom),
        }
    }
}

/// A column value as handed over by a store driver.
#[derive(Debug, Clone, PartialEq)]
pub enum StorageValue<'r> {
    Null,
    Temporal(NaiveDate),
    Text(&'r str),
    Integer(i64),
    Real(f64),
    Other(String),
}

impl<'r> StorageValue<'r> {
    pub fn kind(&self) -> &str {
        match self {
            StorageValue::Null => "NULL",
            StorageValue::Temporal(_) => "DATE",
            StorageValue::Text(_) => "TEXT",
            StorageValue::Integer(_) => "INTEGER",
            StorageValue::Real(_) => "REAL",
            StorageValue::Other(name) => name,
        }
    }

    /// Classify a SQLite value by its runtime storage class.
    pub(crate) fn from_sqlite(value: SqliteValueRef<'r>) -> Result<Self, BoxDynError> {
        if value.is_null() {
            return Ok(StorageValue::Null);
        }

        let class = value.type_info().name().to_ascii_uppercase();
        match class.as_str() {
            "TEXT" | "DATE" | "DATETIME" => {
                Ok(StorageValue::Text(<&str as Decode<Sqlite>>::decode(value)?))
            }
            "INTEGER" => Ok(StorageValue::Integer(<i64 as Decode<Sqlite>>::decode(value)?)),
            "REAL" => Ok(StorageValue::Real(<f64 as Decode<Sqlite>>::decode(value)?)),
            _ => Ok(StorageValue::Other(class)),
        }
    }
}

impl Type<Sqlite> for CalendarDate {
    fn type_info() -> SqliteTypeInfo {
        <str as Type<Sqlite>>::type_info()
    }

    // Storage classes are checked in `decode` so the codec reports its own error.
    fn compatible(_ty: &SqliteTypeInfo) -> bool {
        true
    }
}

impl<'q> Encode<'q, Sqlite> for CalendarDate {
    fn encode_by_ref(&self, buf: &mut <Sqlite as HasArguments<'q>>::ArgumentBuffer) -> IsNull {
        <String as Encode<'q, Sqlite>>::encode(self.to_storage(), buf)
    }
}

impl<'r> Decode<'r, Sqlite> for CalendarDate {
    fn decode(value: SqliteValueRef<'r>) -> Result<Self, BoxDynError> {
        let stored = StorageValue::from_sqlite(value)?;
        Ok(CalendarDate::from_storage(stored)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_round_trip_preserves_text() {
        for raw in ["2024-01-01", "2025-12-31", "2024-02-29", "0001-01-01", "9999-12-31"] {
            let decoded: CalendarDate =
                serde_json::from_str(&format!("\"{raw}\"")).expect("valid date decodes");
            let encoded = serde_json::to_string(&decoded).expect("date encodes");
            assert_eq!(encoded, format!("\"{raw}\""));
        }
    }

    #[test]
    fn rejects_malformed_dates() {
        for raw in [
            "2024-1-01",
            "2024/01/01",
            "24-01-01",
            "2024-02-30",
            "2024-01-01T00:00:00",
            "",
        ] {
            assert_eq!(
                CalendarDate::parse(raw),
                Err(CodecError::MalformedDate(raw.to_string())),
                "{raw} should be rejected"
            );
        }

        let err = serde_json::from_str::<CalendarDate>("\"01-02-2024\"").unwrap_err();
        assert!(err.to_string().contains("expected YYYY-MM-DD"));
    }

    #[test]
    fn null_decodes_to_absent_sentinel_and_encodes_as_zero_date() {
        let decoded: CalendarDate = serde_json::from_str("null").expect("null decodes");
        assert!(decoded.is_absent());
        assert_eq!(serde_json::to_string(&decoded).unwrap(), "\"0001-01-01\"");
    }

    #[test]
    fn storage_read_accepts_text_and_native_dates() {
        let native = NaiveDate::from_ymd_opt(2024, 6, 15).expect("valid");
        assert_eq!(
            CalendarDate::from_storage(StorageValue::Temporal(native)).unwrap(),
            CalendarDate::new(native)
        );
        assert_eq!(
            CalendarDate::from_storage(StorageValue::Text("2024-06-15")).unwrap(),
            CalendarDate::new(native)
        );
        assert!(CalendarDate::from_storage(StorageValue::Null)
            .unwrap()
            .is_absent());
    }

    #[test]
    fn storage_read_rejects_other_representations() {
        assert_eq!(
            CalendarDate::from_storage(StorageValue::Integer(20240615)),
            Err(CodecError::UnsupportedStorageValue("INTEGER".to_string()))
        );
        assert_eq!(
            CalendarDate::from_storage(StorageValue::Real(1.5)),
            Err(CodecError::UnsupportedStorageValue("REAL".to_string()))
        );
        assert!(matches!(
            CalendarDate::from_storage(StorageValue::Text("15/06/2024")),
            Err(CodecError::MalformedDate(_))
        ));
    }

    #[test]
    fn storage_write_is_plain_date_text() {
        let date = CalendarDate::new(NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid"));
        assert_eq!(date.to_storage(), "2025-01-01");
        assert_eq!(CalendarDate::absent().to_storage(), "0001-01-01");
    }
}
