use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sqlx::database::HasArguments;
use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::sqlite::{SqliteTypeInfo, SqliteValueRef};
use sqlx::{Decode, Encode, Sqlite, Type};

use super::{CodecError, StorageValue};

/// Fractional digits kept for every money-bearing column.
const SCALE: u32 = 2;

/// Fixed-point decimal column with two fractional digits.
trait FixedPoint: Sized {
    const FIELD: &'static str;
    const INTEGER_DIGITS: u32;

    fn wrap(value: Decimal) -> Self;

    fn from_decimal(value: Decimal) -> Result<Self, CodecError> {
        let rounded = value.round_dp_with_strategy(SCALE, RoundingStrategy::MidpointAwayFromZero);
        let limit = Decimal::from(10_i64.pow(Self::INTEGER_DIGITS));
        if rounded.abs() >= limit {
            return Err(CodecError::DecimalOverflow {
                field: Self::FIELD,
                value: value.to_string(),
                integer_digits: Self::INTEGER_DIGITS,
            });
        }

        let mut scaled = rounded;
        scaled.rescale(SCALE);
        Ok(Self::wrap(scaled))
    }

    fn from_text(raw: &str) -> Result<Self, CodecError> {
        let value = Decimal::from_str(raw.trim())
            .map_err(|_| CodecError::MalformedDecimal(raw.to_string()))?;
        Self::from_decimal(value)
    }

    fn from_stored(value: StorageValue<'_>) -> Result<Self, CodecError> {
        match value {
            StorageValue::Text(text) => Self::from_text(text),
            StorageValue::Integer(whole) => Self::from_decimal(Decimal::from(whole)),
            other => Err(CodecError::UnsupportedStorageValue(other.kind().to_string())),
        }
    }
}

/// Monetary amount: up to 15 integer digits and exactly 2 fractional digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(Decimal);

impl FixedPoint for Amount {
    const FIELD: &'static str = "amount";
    const INTEGER_DIGITS: u32 = 15;

    fn wrap(value: Decimal) -> Self {
        Self(value)
    }
}

/// Interest rate in percent: up to 3 integer digits and exactly 2 fractional digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rate(Decimal);

impl FixedPoint for Rate {
    const FIELD: &'static str = "interest rate";
    const INTEGER_DIGITS: u32 = 3;

    fn wrap(value: Decimal) -> Self {
        Self(value)
    }
}

macro_rules! fixed_point_column {
    ($name:ident) => {
        impl $name {
            pub fn new(value: Decimal) -> Result<Self, CodecError> {
                <Self as FixedPoint>::from_decimal(value)
            }

            pub fn parse(raw: &str) -> Result<Self, CodecError> {
                <Self as FixedPoint>::from_text(raw)
            }

            pub fn value(&self) -> Decimal {
                self.0
            }

            pub fn from_storage(value: StorageValue<'_>) -> Result<Self, CodecError> {
                <Self as FixedPoint>::from_stored(value)
            }

            pub fn to_storage(&self) -> String {
                self.0.to_string()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self(Decimal::new(0, SCALE))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(&self.0)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                deserializer.deserialize_any(FixedPointVisitor::<Self>(PhantomData))
            }
        }

        impl Type<Sqlite> for $name {
            fn type_info() -> SqliteTypeInfo {
                <str as Type<Sqlite>>::type_info()
            }

            fn compatible(_ty: &SqliteTypeInfo) -> bool {
                true
            }
        }

        impl<'q> Encode<'q, Sqlite> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut <Sqlite as HasArguments<'q>>::ArgumentBuffer,
            ) -> IsNull {
                <String as Encode<'q, Sqlite>>::encode(self.to_storage(), buf)
            }
        }

        impl<'r> Decode<'r, Sqlite> for $name {
            fn decode(value: SqliteValueRef<'r>) -> Result<Self, BoxDynError> {
                let stored = StorageValue::from_sqlite(value)?;
                Ok(Self::from_storage(stored)?)
            }
        }
    };
}

fixed_point_column!(Amount);
fixed_point_column!(Rate);

struct FixedPointVisitor<T>(PhantomData<T>);

impl<'de, T: FixedPoint> Visitor<'de> for FixedPointVisitor<T> {
    type Value = T;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a decimal string or an integer for {}", T::FIELD)
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<T, E> {
        T::from_text(value).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<T, E> {
        T::from_decimal(Decimal::from(value)).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<T, E> {
        T::from_decimal(Decimal::from(value)).map_err(E::custom)
    }

    fn visit_f64<E: de::Error>(self, _value: f64) -> Result<T, E> {
        Err(E::custom(CodecError::BinaryFloat { field: T::FIELD }))
    }
}
