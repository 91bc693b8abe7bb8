use serde::{Deserialize, Serialize};

use super::{
    check_max_len, check_positive, check_positive_int, default_available, flag, ITEM_NAME_MAX,
};
use crate::error::Result;

/// A dessert sold whole or by the slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dessert {
    pub id: i64,
    pub nombre: String,
    pub descripcion: String,
    pub categoria: String,
    pub rebanadas: i64,
    pub precio_rebanada: f64,
    pub precio_total: f64,
    #[serde(with = "flag")]
    pub disponible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DessertCreate {
    pub nombre: String,
    pub descripcion: String,
    pub categoria: String,
    pub rebanadas: i64,
    pub precio_rebanada: f64,
    pub precio_total: f64,
    #[serde(default = "default_available", with = "flag")]
    pub disponible: bool,
}

impl DessertCreate {
    pub fn new(
        nombre: impl Into<String>,
        descripcion: impl Into<String>,
        categoria: impl Into<String>,
        rebanadas: i64,
        precio_rebanada: f64,
        precio_total: f64,
    ) -> Self {
        Self {
            nombre: nombre.into(),
            descripcion: descripcion.into(),
            categoria: categoria.into(),
            rebanadas,
            precio_rebanada,
            precio_total,
            disponible: true,
        }
    }

    pub fn with_disponible(mut self, disponible: bool) -> Self {
        self.disponible = disponible;
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_max_len("nombre", &self.nombre, ITEM_NAME_MAX)?;
        check_positive_int("rebanadas", self.rebanadas)?;
        check_positive("precio_rebanada", self.precio_rebanada)?;
        check_positive("precio_total", self.precio_total)
    }

    pub(crate) fn into_dessert(self, id: i64) -> Dessert {
        Dessert {
            id,
            nombre: self.nombre,
            descripcion: self.descripcion,
            categoria: self.categoria,
            rebanadas: self.rebanadas,
            precio_rebanada: self.precio_rebanada,
            precio_total: self.precio_total,
            disponible: self.disponible,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DessertUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categoria: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rebanadas: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precio_rebanada: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precio_total: Option<f64>,
    #[serde(
        default,
        with = "flag::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub disponible: Option<bool>,
}

impl DessertUpdate {
    pub fn is_empty(&self) -> bool {
        self.nombre.is_none()
            && self.descripcion.is_none()
            && self.categoria.is_none()
            && self.rebanadas.is_none()
            && self.precio_rebanada.is_none()
            && self.precio_total.is_none()
            && self.disponible.is_none()
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(nombre) = &self.nombre {
            check_max_len("nombre", nombre, ITEM_NAME_MAX)?;
        }
        if let Some(rebanadas) = self.rebanadas {
            check_positive_int("rebanadas", rebanadas)?;
        }
        if let Some(precio) = self.precio_rebanada {
            check_positive("precio_rebanada", precio)?;
        }
        if let Some(precio) = self.precio_total {
            check_positive("precio_total", precio)?;
        }
        Ok(())
    }
}
