use serde::{Deserialize, Serialize};

use super::{check_max_len, check_positive, default_available, flag, ITEM_NAME_MAX};
use crate::error::Result;

/// A ready-to-order food item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub nombre: String,
    /// Free-text category label; not checked against the category collection.
    pub categoria: String,
    pub descripcion: String,
    pub precio: f64,
    #[serde(with = "flag")]
    pub disponible: bool,
}

/// Input for creating a product. The id is assigned on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductCreate {
    pub nombre: String,
    pub categoria: String,
    pub descripcion: String,
    pub precio: f64,
    #[serde(default = "default_available", with = "flag")]
    pub disponible: bool,
}

impl ProductCreate {
    pub fn new(
        nombre: impl Into<String>,
        categoria: impl Into<String>,
        descripcion: impl Into<String>,
        precio: f64,
    ) -> Self {
        Self {
            nombre: nombre.into(),
            categoria: categoria.into(),
            descripcion: descripcion.into(),
            precio,
            disponible: true,
        }
    }

    pub fn with_disponible(mut self, disponible: bool) -> Self {
        self.disponible = disponible;
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_max_len("nombre", &self.nombre, ITEM_NAME_MAX)?;
        check_positive("precio", self.precio)
    }

    pub(crate) fn into_product(self, id: i64) -> Product {
        Product {
            id,
            nombre: self.nombre,
            categoria: self.categoria,
            descripcion: self.descripcion,
            precio: self.precio,
            disponible: self.disponible,
        }
    }
}

/// Partial update: only fields that are `Some` are written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categoria: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precio: Option<f64>,
    #[serde(
        default,
        with = "flag::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub disponible: Option<bool>,
}

impl ProductUpdate {
    pub fn is_empty(&self) -> bool {
        self.nombre.is_none()
            && self.categoria.is_none()
            && self.descripcion.is_none()
            && self.precio.is_none()
            && self.disponible.is_none()
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(nombre) = &self.nombre {
            check_max_len("nombre", nombre, ITEM_NAME_MAX)?;
        }
        if let Some(precio) = self.precio {
            check_positive("precio", precio)?;
        }
        Ok(())
    }
}
