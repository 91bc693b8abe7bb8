use serde::Serialize;
use sqlx::{SqliteConnection, SqlitePool};

use super::{page_limit, CounterRepository};
use crate::error::{CatalogError, EntityKind, Result};
use crate::models::{Collection, Dessert, DessertCreate, DessertUpdate};

#[derive(Clone)]
pub struct DessertRepository {
    pool: SqlitePool,
    counters: CounterRepository,
}

#[derive(sqlx::FromRow)]
struct DessertRow {
    id: i64,
    nombre: String,
    descripcion: String,
    categoria: String,
    rebanadas: i64,
    precio_rebanada: f64,
    precio_total: f64,
    disponible: bool,
}

impl From<DessertRow> for Dessert {
    fn from(row: DessertRow) -> Self {
        Dessert {
            id: row.id,
            nombre: row.nombre,
            descripcion: row.descripcion,
            categoria: row.categoria,
            rebanadas: row.rebanadas,
            precio_rebanada: row.precio_rebanada,
            precio_total: row.precio_total,
            disponible: row.disponible,
        }
    }
}

/// Per-category averages over desserts.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct DessertCategoryStats {
    #[serde(rename = "_id")]
    pub categoria: String,
    pub total_postres: i64,
    pub precio_promedio_rebanada: f64,
    pub precio_promedio_total: f64,
}

impl DessertRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            counters: CounterRepository::new(pool.clone()),
            pool,
        }
    }

    /// A `limit` of 0 means no limit.
    pub async fn list(&self, skip: u32, limit: u32) -> Result<Vec<Dessert>> {
        let rows: Vec<DessertRow> =
            sqlx::query_as("SELECT * FROM postres ORDER BY id LIMIT ? OFFSET ?")
                .bind(page_limit(limit))
                .bind(skip)
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(Dessert::from).collect())
    }

    pub async fn list_all(&self) -> Result<Vec<Dessert>> {
        let rows: Vec<DessertRow> = sqlx::query_as("SELECT * FROM postres ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Dessert::from).collect())
    }

    pub async fn get(&self, id: i64) -> Result<Dessert> {
        let row: Option<DessertRow> = sqlx::query_as("SELECT * FROM postres WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Dessert::from)
            .ok_or_else(|| CatalogError::not_found(EntityKind::Dessert, id))
    }

    pub async fn find_by_category(&self, categoria: &str) -> Result<Vec<Dessert>> {
        let rows: Vec<DessertRow> =
            sqlx::query_as("SELECT * FROM postres WHERE categoria = ? ORDER BY id")
                .bind(categoria)
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(Dessert::from).collect())
    }

    pub async fn create(&self, input: DessertCreate) -> Result<Dessert> {
        input.validate()?;

        let id = self.counters.next_id(Collection::Postres.name()).await?;
        let dessert = input.into_dessert(id);
        insert(&self.pool, &dessert).await?;

        tracing::info!(id = dessert.id, nombre = %dessert.nombre, "Created dessert");
        Ok(dessert)
    }

    pub async fn update(&self, id: i64, patch: DessertUpdate) -> Result<Dessert> {
        patch.validate()?;

        if patch.is_empty() {
            return self.get(id).await;
        }

        let row: Option<DessertRow> = sqlx::query_as(
            r#"
            UPDATE postres
            SET nombre = COALESCE(?, nombre),
                descripcion = COALESCE(?, descripcion),
                categoria = COALESCE(?, categoria),
                rebanadas = COALESCE(?, rebanadas),
                precio_rebanada = COALESCE(?, precio_rebanada),
                precio_total = COALESCE(?, precio_total),
                disponible = COALESCE(?, disponible)
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(patch.nombre)
        .bind(patch.descripcion)
        .bind(patch.categoria)
        .bind(patch.rebanadas)
        .bind(patch.precio_rebanada)
        .bind(patch.precio_total)
        .bind(patch.disponible)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Dessert::from)
            .ok_or_else(|| CatalogError::not_found(EntityKind::Dessert, id))
    }

    pub async fn delete(&self, id: i64) -> Result<String> {
        let nombre: Option<String> =
            sqlx::query_scalar("DELETE FROM postres WHERE id = ? RETURNING nombre")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        let nombre = nombre.ok_or_else(|| CatalogError::not_found(EntityKind::Dessert, id))?;
        tracing::info!(id, nombre = %nombre, "Deleted dessert");
        Ok(nombre)
    }

    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM postres")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn category_stats(&self) -> Result<Vec<DessertCategoryStats>> {
        let stats = sqlx::query_as(
            r#"
            SELECT categoria,
                   COUNT(*) AS total_postres,
                   AVG(precio_rebanada) AS precio_promedio_rebanada,
                   AVG(precio_total) AS precio_promedio_total
            FROM postres
            GROUP BY categoria
            ORDER BY total_postres DESC, categoria
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(stats)
    }

    /// Bulk insert with ids 1..=N. Only the seeder calls this.
    pub(crate) async fn insert_numbered(
        conn: &mut SqliteConnection,
        items: Vec<DessertCreate>,
    ) -> Result<i64> {
        let mut last_id = 0;
        for (index, input) in items.into_iter().enumerate() {
            let dessert = input.into_dessert(index as i64 + 1);
            insert(&mut *conn, &dessert).await?;
            last_id = dessert.id;
        }
        Ok(last_id)
    }
}

async fn insert<'e, E>(executor: E, dessert: &Dessert) -> Result<()>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO postres (id, nombre, descripcion, categoria, rebanadas, precio_rebanada, precio_total, disponible)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(dessert.id)
    .bind(&dessert.nombre)
    .bind(&dessert.descripcion)
    .bind(&dessert.categoria)
    .bind(dessert.rebanadas)
    .bind(dessert.precio_rebanada)
    .bind(dessert.precio_total)
    .bind(dessert.disponible)
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
        repo: DessertRepository,
        _db: TestDb,
    }

    async fn setup_repo() -> TestContext {
        let db = test_db().await;
        TestContext {
            repo: DessertRepository::new(db.pool.clone()),
            _db: db,
        }
    }

    fn tres_leches() -> DessertCreate {
        DessertCreate::new(
            "Pastel Tres Leches",
            "Esponjoso pastel bañado en tres tipos de leche",
            "pastel",
            16,
            35.0,
            560.0,
        )
    }

    #[tokio::test]
    async fn test_create_and_get_dessert() {
        let ctx = setup_repo().await;
        let created = ctx.repo.create(tres_leches()).await.unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(ctx.repo.get(1).await.unwrap(), created);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_get_unique_ids() {
        let ctx = setup_repo().await;

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let repo = ctx.repo.clone();
                tokio::spawn(async move { repo.create(tres_leches()).await.unwrap().id })
            })
            .collect();

        let mut ids = HashSet::new();
        for handle in handles {
            assert!(ids.insert(handle.await.unwrap()));
        }
        assert_eq!(ids.len(), 16);
    }

    #[tokio::test]
    async fn test_create_rejects_zero_slices() {
        let ctx = setup_repo().await;
        let mut input = tres_leches();
        input.rebanadas = 0;

        let err = ctx.repo.create(input).await.unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
        assert_eq!(ctx.repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_single_field() {
        let ctx = setup_repo().await;
        let created = ctx.repo.create(tres_leches()).await.unwrap();

        let patch = DessertUpdate {
            rebanadas: Some(12),
            ..Default::default()
        };
        let updated = ctx.repo.update(created.id, patch).await.unwrap();

        assert_eq!(updated.rebanadas, 12);
        assert_eq!(updated.precio_total, created.precio_total);
        assert_eq!(updated.nombre, created.nombre);
        assert!(updated.disponible);
    }

    #[tokio::test]
    async fn test_update_empty_patch_and_missing_id() {
        let ctx = setup_repo().await;
        let created = ctx.repo.create(tres_leches()).await.unwrap();

        let same = ctx
            .repo
            .update(created.id, DessertUpdate::default())
            .await
            .unwrap();
        assert_eq!(same, created);

        let err = ctx
            .repo
            .update(99, DessertUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::NotFound {
                kind: EntityKind::Dessert,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let ctx = setup_repo().await;
        let created = ctx.repo.create(tres_leches()).await.unwrap();

        assert_eq!(
            ctx.repo.delete(created.id).await.unwrap(),
            "Pastel Tres Leches"
        );
        assert!(ctx.repo.get(created.id).await.is_err());
    }

    #[tokio::test]
    async fn test_find_by_category_and_stats() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        repo.create(tres_leches()).await.unwrap();
        repo.create(DessertCreate::new(
            "Tarta de Manzana",
            "",
            "pastel",
            8,
            45.0,
            320.0,
        ))
        .await
        .unwrap();
        repo.create(DessertCreate::new(
            "Tiramisú",
            "",
            "postre_frio",
            9,
            55.0,
            495.0,
        ))
        .await
        .unwrap();

        assert_eq!(repo.find_by_category("pastel").await.unwrap().len(), 2);
        assert!(repo.find_by_category("taco").await.unwrap().is_empty());

        let stats = repo.category_stats().await.unwrap();
        assert_eq!(stats[0].categoria, "pastel");
        assert_eq!(stats[0].total_postres, 2);
        assert!((stats[0].precio_promedio_rebanada - 40.0).abs() < 1e-9);
        assert!((stats[0].precio_promedio_total - 440.0).abs() < 1e-9);
        assert_eq!(stats[1].categoria, "postre_frio");
    }
}
