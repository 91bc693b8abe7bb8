use serde::{Deserialize, Serialize};

use super::{check_max_len, CATEGORY_NAME_MAX};
use crate::error::Result;

/// A named grouping label shared loosely by products and desserts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub nombre: String,
    pub descripcion: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCreate {
    pub nombre: String,
    pub descripcion: String,
}

impl CategoryCreate {
    pub fn new(nombre: impl Into<String>, descripcion: impl Into<String>) -> Self {
        Self {
            nombre: nombre.into(),
            descripcion: descripcion.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_max_len("nombre", &self.nombre, CATEGORY_NAME_MAX)
    }

    pub(crate) fn into_category(self, id: i64) -> Category {
        Category {
            id,
            nombre: self.nombre,
            descripcion: self.descripcion,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
}

impl CategoryUpdate {
    pub fn is_empty(&self) -> bool {
        self.nombre.is_none() && self.descripcion.is_none()
    }

    pub fn validate(&self) -> Result<()> {
        match &self.nombre {
            Some(nombre) => check_max_len("nombre", nombre, CATEGORY_NAME_MAX),
            None => Ok(()),
        }
    }
}
