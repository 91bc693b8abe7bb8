mod category;
mod counter;
mod dessert;
mod product;

pub use category::{Category, CategoryCreate, CategoryUpdate};
pub use counter::{Collection, Counter, CounterReport};
pub use dessert::{Dessert, DessertCreate, DessertUpdate};
pub use product::{Product, ProductCreate, ProductUpdate};

use crate::error::{CatalogError, Result};

/// Field limits shared by the catalog entities.
pub const CATEGORY_NAME_MAX: usize = 50;
pub const ITEM_NAME_MAX: usize = 100;

fn default_available() -> bool {
    true
}

fn check_max_len(field: &str, value: &str, max: usize) -> Result<()> {
    let len = value.chars().count();
    if len > max {
        return Err(CatalogError::validation(format!(
            "{} must be at most {} characters (got {})",
            field, max, len
        )));
    }
    Ok(())
}

fn check_positive(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CatalogError::validation(format!(
            "{} must be greater than 0",
            field
        )));
    }
    Ok(())
}

fn check_positive_int(field: &str, value: i64) -> Result<()> {
    if value <= 0 {
        return Err(CatalogError::validation(format!(
            "{} must be greater than 0",
            field
        )));
    }
    Ok(())
}

/// Serde adapter for availability: `bool` in Rust, `0`/`1` on the wire.
pub mod flag {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        from_int(i64::deserialize(deserializer)?)
    }

    fn from_int<E: Error>(value: i64) -> Result<bool, E> {
        match value {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(E::custom(format!(
                "disponible must be 0 or 1 (got {})",
                other
            ))),
        }
    }

    /// Same mapping for optional patch fields.
    pub mod option {
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            value: &Option<bool>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(v) => serializer.serialize_some(&u8::from(*v)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<bool>, D::Error> {
            Option::<i64>::deserialize(deserializer)?
                .map(super::from_int::<D::Error>)
                .transpose()
        }
    }
}
