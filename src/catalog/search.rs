use serde::Serialize;

use super::Catalog;
use crate::error::Result;
use crate::models::{Dessert, Product};

/// A product as shown in search results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductHit {
    pub tipo: &'static str,
    pub id: i64,
    pub nombre: String,
    pub descripcion: String,
    pub categoria: String,
    pub precio: String,
    pub disponible: &'static str,
}

/// A dessert as shown in search results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DessertHit {
    pub tipo: &'static str,
    pub id: i64,
    pub nombre: String,
    pub descripcion: String,
    pub categoria: String,
    pub precio_rebanada: String,
    pub precio_total: String,
    pub rebanadas: i64,
    pub disponible: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResults {
    pub termino_busqueda: String,
    pub productos: Vec<ProductHit>,
    pub postres: Vec<DessertHit>,
    pub total_resultados: usize,
}

impl From<Product> for ProductHit {
    fn from(p: Product) -> Self {
        Self {
            tipo: "Producto",
            id: p.id,
            nombre: p.nombre,
            descripcion: p.descripcion,
            categoria: p.categoria,
            precio: currency(p.precio),
            disponible: yes_no(p.disponible),
        }
    }
}

impl From<Dessert> for DessertHit {
    fn from(p: Dessert) -> Self {
        Self {
            tipo: "Postre",
            id: p.id,
            nombre: p.nombre,
            descripcion: p.descripcion,
            categoria: p.categoria,
            precio_rebanada: currency(p.precio_rebanada),
            precio_total: currency(p.precio_total),
            rebanadas: p.rebanadas,
            disponible: yes_no(p.disponible),
        }
    }
}

fn currency(amount: f64) -> String {
    format!("${:.2}", amount)
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Sí"
    } else {
        "No"
    }
}

/// Case-insensitive substring match over name, description and category.
///
/// Matching is done here rather than in SQL because SQLite's `LIKE` and
/// `lower()` only fold ASCII, and the catalog is full of accented names.
struct Matcher {
    needle: String,
}

impl Matcher {
    fn new(term: &str) -> Self {
        Self {
            needle: term.to_lowercase(),
        }
    }

    fn matches(&self, fields: [&str; 3]) -> bool {
        fields
            .iter()
            .any(|field| field.to_lowercase().contains(&self.needle))
    }
}

impl Catalog {
    /// Search products and desserts. An empty term matches everything.
    pub async fn search(&self, term: &str) -> Result<SearchResults> {
        let matcher = Matcher::new(term);

        let productos: Vec<ProductHit> = self
            .products
            .list_all()
            .await?
            .into_iter()
            .filter(|p| {
                matcher.matches([
                    p.nombre.as_str(),
                    p.descripcion.as_str(),
                    p.categoria.as_str(),
                ])
            })
            .map(ProductHit::from)
            .collect();

        let postres: Vec<DessertHit> = self
            .desserts
            .list_all()
            .await?
            .into_iter()
            .filter(|p| {
                matcher.matches([
                    p.nombre.as_str(),
                    p.descripcion.as_str(),
                    p.categoria.as_str(),
                ])
            })
            .map(DessertHit::from)
            .collect();

        tracing::debug!(
            term,
            productos = productos.len(),
            postres = postres.len(),
            "Search finished"
        );

        Ok(SearchResults {
            termino_busqueda: term.to_string(),
            total_resultados: productos.len() + postres.len(),
            productos,
            postres,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::{test_db, TestDb};
    use crate::models::{DessertCreate, ProductCreate};

    async fn setup_catalog() -> (Catalog, TestDb) {
        let db = test_db().await;
        let catalog = Catalog::new(db.pool.clone());

        catalog
            .products
            .create(ProductCreate::new(
                "Taco de Pastor",
                "taco",
                "Tortilla de maíz con carne de cerdo y piña",
                18.0,
            ))
            .await
            .unwrap();
        catalog
            .products
            .create(
                ProductCreate::new("Café Americano", "bebida", "Café de grano, 12 oz", 30.0)
                    .with_disponible(false),
            )
            .await
            .unwrap();
        catalog
            .desserts
            .create(DessertCreate::new(
                "Tiramisú",
                "Bizcocho bañado en café y mascarpone",
                "postre_frio",
                9,
                55.0,
                495.0,
            ))
            .await
            .unwrap();

        (catalog, db)
    }

    #[test]
    fn test_formatting_helpers() {
        assert_eq!(currency(45.0), "$45.00");
        assert_eq!(currency(32.5), "$32.50");
        assert_eq!(yes_no(true), "Sí");
        assert_eq!(yes_no(false), "No");
    }

    #[tokio::test]
    async fn test_empty_term_matches_everything() {
        let (catalog, _db) = setup_catalog().await;

        let results = catalog.search("").await.unwrap();
        assert_eq!(results.productos.len(), 2);
        assert_eq!(results.postres.len(), 1);
        assert_eq!(results.total_resultados, 3);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive() {
        let (catalog, _db) = setup_catalog().await;

        let upper = catalog.search("TACO").await.unwrap();
        let lower = catalog.search("taco").await.unwrap();
        assert_eq!(upper.productos, lower.productos);
        assert_eq!(upper.postres, lower.postres);
        assert_eq!(lower.total_resultados, 1);
        assert_eq!(upper.termino_busqueda, "TACO");
    }

    #[tokio::test]
    async fn test_search_folds_accented_characters() {
        let (catalog, _db) = setup_catalog().await;

        let results = catalog.search("CAFÉ").await.unwrap();
        assert_eq!(results.productos.len(), 1);
        assert_eq!(results.postres.len(), 1);

        let hit = &results.productos[0];
        assert_eq!(hit.tipo, "Producto");
        assert_eq!(hit.precio, "$30.00");
        assert_eq!(hit.disponible, "No");

        let dessert = &results.postres[0];
        assert_eq!(dessert.tipo, "Postre");
        assert_eq!(dessert.precio_rebanada, "$55.00");
        assert_eq!(dessert.precio_total, "$495.00");
        assert_eq!(dessert.disponible, "Sí");
    }

    #[tokio::test]
    async fn test_search_matches_category_and_treats_term_literally() {
        let (catalog, _db) = setup_catalog().await;

        let results = catalog.search("postre_").await.unwrap();
        assert_eq!(results.total_resultados, 1);

        let results = catalog.search("ta.o").await.unwrap();
        assert_eq!(results.total_resultados, 0);
    }
}
