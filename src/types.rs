//! Core types for the countries service

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A country record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Country {
    /// Unique identifier, assigned by the store
    pub id: u64,
    /// Country name
    pub name: String,
    /// Capital city
    pub capital: String,
    /// Land area
    pub area: i64,
}

impl Country {
    pub fn new(id: u64, name: impl Into<String>, capital: impl Into<String>, area: i64) -> Self {
        Self {
            id,
            name: name.into(),
            capital: capital.into(),
            area,
        }
    }
}

/// Payload for creating a country
///
/// `id` is accepted so that clients echoing a full record are not rejected,
/// but it is always replaced by the id the store assigns.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewCountry {
    /// Ignored; the store assigns ids
    #[serde(default, deserialize_with = "lax_int::deserialize_option")]
    pub id: Option<i64>,
    /// Country name
    pub name: String,
    /// Capital city
    pub capital: String,
    /// Land area (integer, or a string holding one)
    #[serde(deserialize_with = "lax_int::deserialize")]
    pub area: i64,
}

impl NewCountry {
    pub fn new(name: impl Into<String>, capital: impl Into<String>, area: i64) -> Self {
        Self {
            id: None,
            name: name.into(),
            capital: capital.into(),
            area,
        }
    }

    /// Build the stored record, discarding any client-supplied id
    pub fn into_country(self, id: u64) -> Country {
        Country {
            id,
            name: self.name,
            capital: self.capital,
            area: self.area,
        }
    }
}

/// The records every fresh store starts with
pub fn seed_countries() -> Vec<Country> {
    vec![
        Country::new(1, "Thailand", "Bangkok", 513120),
        Country::new(2, "Australia", "Canberra", 7617930),
        Country::new(3, "Egypt", "Cairo", 1010408),
    ]
}

/// Integer fields that also accept integral floats and numeric strings
pub(crate) mod lax_int {
    use std::fmt;

    use serde::de::{self, Deserializer, Visitor};
    use serde::Deserialize;

    struct LaxInt(i64);

    struct LaxIntVisitor;

    impl<'de> Visitor<'de> for LaxIntVisitor {
        type Value = LaxInt;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an integer or a string containing an integer")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<LaxInt, E> {
            Ok(LaxInt(v))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<LaxInt, E> {
            i64::try_from(v)
                .map(LaxInt)
                .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(v), &self))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<LaxInt, E> {
            if v.is_finite() && v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 {
                Ok(LaxInt(v as i64))
            } else {
                Err(E::invalid_value(de::Unexpected::Float(v), &self))
            }
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<LaxInt, E> {
            v.trim()
                .parse::<i64>()
                .map(LaxInt)
                .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
        }
    }

    impl<'de> Deserialize<'de> for LaxInt {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_any(LaxIntVisitor)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        LaxInt::deserialize(deserializer).map(|v| v.0)
    }

    pub fn deserialize_option<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<i64>, D::Error> {
        Option::<LaxInt>::deserialize(deserializer).map(|v| v.map(|v| v.0))
    }
}
