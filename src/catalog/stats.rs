use serde::Serialize;
use std::collections::HashSet;

use super::Catalog;
use crate::db::{DessertCategoryStats, ProductCategoryStats};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total_productos: i64,
    pub total_postres: i64,
    /// Distinct category labels in use by at least one product or dessert.
    /// Categories nobody references are not counted.
    pub total_categorias: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub resumen: Summary,
    pub estadisticas_productos: Vec<ProductCategoryStats>,
    pub estadisticas_postres: Vec<DessertCategoryStats>,
}

impl Catalog {
    pub async fn statistics(&self) -> Result<Statistics> {
        let estadisticas_productos = self.products.category_stats().await?;
        let estadisticas_postres = self.desserts.category_stats().await?;
        let total_productos = self.products.count().await?;
        let total_postres = self.desserts.count().await?;

        let labels: HashSet<&str> = estadisticas_productos
            .iter()
            .map(|s| s.categoria.as_str())
            .chain(estadisticas_postres.iter().map(|s| s.categoria.as_str()))
            .collect();
        let total_categorias = labels.len();

        Ok(Statistics {
            resumen: Summary {
                total_productos,
                total_postres,
                total_categorias,
            },
            estadisticas_productos,
            estadisticas_postres,
        })
    }
}
