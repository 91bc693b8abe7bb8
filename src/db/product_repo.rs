use serde::Serialize;
use sqlx::{SqliteConnection, SqlitePool};

use super::{page_limit, CounterRepository};
use crate::error::{CatalogError, EntityKind, Result};
use crate::models::{Collection, Product, ProductCreate, ProductUpdate};

#[derive(Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
    counters: CounterRepository,
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i64,
    nombre: String,
    categoria: String,
    descripcion: String,
    precio: f64,
    disponible: bool,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            nombre: row.nombre,
            categoria: row.categoria,
            descripcion: row.descripcion,
            precio: row.precio,
            disponible: row.disponible,
        }
    }
}

/// Per-category price summary over products.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct ProductCategoryStats {
    #[serde(rename = "_id")]
    pub categoria: String,
    pub total_productos: i64,
    pub precio_promedio: f64,
    pub precio_minimo: f64,
    pub precio_maximo: f64,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            counters: CounterRepository::new(pool.clone()),
            pool,
        }
    }

    /// Products in insertion order, paginated. A `limit` of 0 means no limit.
    pub async fn list(&self, skip: u32, limit: u32) -> Result<Vec<Product>> {
        let rows: Vec<ProductRow> =
            sqlx::query_as("SELECT * FROM productos ORDER BY id LIMIT ? OFFSET ?")
                .bind(page_limit(limit))
                .bind(skip)
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    pub async fn list_all(&self) -> Result<Vec<Product>> {
        let rows: Vec<ProductRow> = sqlx::query_as("SELECT * FROM productos ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    pub async fn get(&self, id: i64) -> Result<Product> {
        let row: Option<ProductRow> = sqlx::query_as("SELECT * FROM productos WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Product::from)
            .ok_or_else(|| CatalogError::not_found(EntityKind::Product, id))
    }

    /// Exact-match filter on the category label.
    pub async fn find_by_category(&self, categoria: &str) -> Result<Vec<Product>> {
        let rows: Vec<ProductRow> =
            sqlx::query_as("SELECT * FROM productos WHERE categoria = ? ORDER BY id")
                .bind(categoria)
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    pub async fn create(&self, input: ProductCreate) -> Result<Product> {
        input.validate()?;

        let id = self.counters.next_id(Collection::Productos.name()).await?;
        let product = input.into_product(id);
        insert(&self.pool, &product).await?;

        tracing::info!(id = product.id, nombre = %product.nombre, "Created product");
        Ok(product)
    }

    /// Apply the fields present in `patch`; absent fields keep their value.
    pub async fn update(&self, id: i64, patch: ProductUpdate) -> Result<Product> {
        patch.validate()?;

        if patch.is_empty() {
            return self.get(id).await;
        }

        let row: Option<ProductRow> = sqlx::query_as(
            r#"
            UPDATE productos
            SET nombre = COALESCE(?, nombre),
                categoria = COALESCE(?, categoria),
                descripcion = COALESCE(?, descripcion),
                precio = COALESCE(?, precio),
                disponible = COALESCE(?, disponible)
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(patch.nombre)
        .bind(patch.categoria)
        .bind(patch.descripcion)
        .bind(patch.precio)
        .bind(patch.disponible)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Product::from)
            .ok_or_else(|| CatalogError::not_found(EntityKind::Product, id))
    }

    /// Remove a product, returning its name.
    pub async fn delete(&self, id: i64) -> Result<String> {
        let nombre: Option<String> =
            sqlx::query_scalar("DELETE FROM productos WHERE id = ? RETURNING nombre")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        let nombre = nombre.ok_or_else(|| CatalogError::not_found(EntityKind::Product, id))?;
        tracing::info!(id, nombre = %nombre, "Deleted product");
        Ok(nombre)
    }

    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM productos")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Group by category, largest groups first.
    pub async fn category_stats(&self) -> Result<Vec<ProductCategoryStats>> {
        let stats = sqlx::query_as(
            r#"
            SELECT categoria,
                   COUNT(*) AS total_productos,
                   AVG(precio) AS precio_promedio,
                   MIN(precio) AS precio_minimo,
                   MAX(precio) AS precio_maximo
            FROM productos
            GROUP BY categoria
            ORDER BY total_productos DESC, categoria
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(stats)
    }

    /// Bulk insert with ids 1..=N. Only the seeder calls this.
    pub(crate) async fn insert_numbered(
        conn: &mut SqliteConnection,
        items: Vec<ProductCreate>,
    ) -> Result<i64> {
        let mut last_id = 0;
        for (index, input) in items.into_iter().enumerate() {
            let product = input.into_product(index as i64 + 1);
            insert(&mut *conn, &product).await?;
            last_id = product.id;
        }
        Ok(last_id)
    }
}

async fn insert<'e, E>(executor: E, product: &Product) -> Result<()>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO productos (id, nombre, categoria, descripcion, precio, disponible)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(product.id)
    .bind(&product.nombre)
    .bind(&product.categoria)
    .bind(&product.descripcion)
    .bind(product.precio)
    .bind(product.disponible)
    .execute(executor)
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::{test_db, TestDb};
    use std::collections::HashSet;

    struct TestContext {
        repo: ProductRepository,
        _db: TestDb, // Keep alive for duration of test
    }

    async fn setup_repo() -> TestContext {
        let db = test_db().await;
        TestContext {
            repo: ProductRepository::new(db.pool.clone()),
            _db: db,
        }
    }

    fn latte() -> ProductCreate {
        ProductCreate::new("Café Latte", "bebida", "Espresso con leche", 32.0)
    }

    #[tokio::test]
    async fn test_create_and_get_product() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        let created = repo.create(latte()).await.unwrap();
        assert_eq!(created.id, 1);
        assert!(created.disponible);

        let fetched = repo.get(created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_sequential_creates_yield_increasing_ids() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        let mut ids = Vec::new();
        for i in 0..5 {
            let input = ProductCreate::new(format!("Taco {}", i), "taco", "", 18.0);
            ids.push(repo.create(input).await.unwrap().id);
        }
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_get_unique_ids() {
        let ctx = setup_repo().await;

        let creates = (0..20).map(|i| {
            let repo = ctx.repo.clone();
            async move {
                repo.create(ProductCreate::new(format!("Torta {}", i), "torta", "", 45.0))
                    .await
                    .unwrap()
                    .id
            }
        });
        let ids = futures::future::join_all(creates).await;

        let unique: HashSet<i64> = ids.iter().copied().collect();
        assert_eq!(unique.len(), 20);
        assert_eq!(ctx.repo.count().await.unwrap(), 20);
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let ctx = setup_repo().await;
        let err = ctx.repo.get(42).await.unwrap_err();
        assert!(matches!(
            err,
            CatalogError::NotFound {
                kind: EntityKind::Product,
                id: 42
            }
        ));
    }

    #[tokio::test]
    async fn test_invalid_create_allocates_nothing() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        let err = repo
            .create(ProductCreate::new("Gratis", "bebida", "", 0.0))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));

        // The counter was never touched, so the next id is still 1
        assert_eq!(repo.create(latte()).await.unwrap().id, 1);
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_list_paginates_in_insertion_order() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        for name in ["A", "B", "C", "D"] {
            repo.create(ProductCreate::new(name, "x", "", 1.0))
                .await
                .unwrap();
        }

        let page = repo.list(1, 2).await.unwrap();
        let names: Vec<&str> = page.iter().map(|p| p.nombre.as_str()).collect();
        assert_eq!(names, vec!["B", "C"]);

        assert_eq!(repo.list(0, 100).await.unwrap().len(), 4);
        assert!(repo.list(10, 100).await.unwrap().is_empty());
        assert!(repo.list(4, 0).await.unwrap().is_empty());

        // Zero lifts the limit instead of returning an empty page
        let all = repo.list(0, 0).await.unwrap();
        assert_eq!(all.len(), 4);
        let rest = repo.list(1, 0).await.unwrap();
        assert_eq!(rest.len(), 3);
        assert_eq!(rest[0].nombre, "B");
    }

    #[tokio::test]
    async fn test_insert_numbered_uses_sequential_ids() {
        let ctx = setup_repo().await;

        let mut tx = ctx._db.pool.begin().await.unwrap();
        let last = ProductRepository::insert_numbered(
            &mut tx,
            vec![latte(), ProductCreate::new("Limonada", "bebida", "", 28.0)],
        )
        .await
        .unwrap();
        tx.commit().await.unwrap();
        assert_eq!(last, 2);

        assert_eq!(ctx.repo.get(1).await.unwrap(), latte().into_product(1));
        assert_eq!(ctx.repo.get(2).await.unwrap().nombre, "Limonada");
    }

    #[tokio::test]
    async fn test_find_by_category_exact_match() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        let created = repo.create(latte()).await.unwrap();
        repo.create(ProductCreate::new("Té", "bebida caliente", "", 20.0))
            .await
            .unwrap();

        let bebidas = repo.find_by_category("bebida").await.unwrap();
        assert_eq!(bebidas, vec![created]);
        assert!(repo.find_by_category("Bebida").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_empty_patch_returns_unchanged() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        let created = repo.create(latte()).await.unwrap();
        let updated = repo
            .update(created.id, ProductUpdate::default())
            .await
            .unwrap();
        assert_eq!(updated, created);
    }

    #[tokio::test]
    async fn test_update_changes_only_given_fields() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        let created = repo.create(latte()).await.unwrap();
        let patch = ProductUpdate {
            disponible: Some(false),
            ..Default::default()
        };
        let updated = repo.update(created.id, patch).await.unwrap();

        assert!(!updated.disponible);
        assert_eq!(updated.nombre, created.nombre);
        assert_eq!(updated.precio, created.precio);
        assert_eq!(updated.categoria, created.categoria);
        assert_eq!(repo.get(created.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_missing_and_invalid() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        let err = repo
            .update(9, ProductUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::NotFound { .. }));

        let created = repo.create(latte()).await.unwrap();
        let patch = ProductUpdate {
            nombre: Some("Nuevo".into()),
            precio: Some(-5.0),
            ..Default::default()
        };
        let err = repo.update(created.id, patch).await.unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
        assert_eq!(repo.get(created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        let created = repo.create(latte()).await.unwrap();
        assert_eq!(repo.delete(created.id).await.unwrap(), "Café Latte");

        assert!(matches!(
            repo.get(created.id).await.unwrap_err(),
            CatalogError::NotFound { .. }
        ));
        assert!(matches!(
            repo.delete(created.id).await.unwrap_err(),
            CatalogError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        let first = repo.create(latte()).await.unwrap();
        repo.delete(first.id).await.unwrap();
        let second = repo.create(latte()).await.unwrap();
        assert_eq!(second.id, first.id + 1);
    }

    #[tokio::test]
    async fn test_category_stats() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        for (name, cat, price) in [
            ("Taco de Pastor", "taco", 18.0),
            ("Taco de Suadero", "taco", 20.0),
            ("Taco de Barbacoa", "taco", 25.0),
            ("Limonada", "bebida", 28.0),
        ] {
            repo.create(ProductCreate::new(name, cat, "", price))
                .await
                .unwrap();
        }

        let stats = repo.category_stats().await.unwrap();
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].categoria, "taco");
        assert_eq!(stats[0].total_productos, 3);
        assert!((stats[0].precio_promedio - 21.0).abs() < 1e-9);
        assert_eq!(stats[0].precio_minimo, 18.0);
        assert_eq!(stats[0].precio_maximo, 25.0);
        assert_eq!(stats[1].categoria, "bebida");

        let total: i64 = stats.iter().map(|s| s.total_productos).sum();
        assert_eq!(total, repo.count().await.unwrap());
    }
}
