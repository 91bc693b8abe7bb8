use sqlx::{SqliteConnection, SqlitePool};

use super::CounterRepository;
use crate::error::{CatalogError, EntityKind, Result};
use crate::models::{Category, CategoryCreate, CategoryUpdate, Collection};

#[derive(Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
    counters: CounterRepository,
}

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: i64,
    nombre: String,
    descripcion: String,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: row.id,
            nombre: row.nombre,
            descripcion: row.descripcion,
        }
    }
}

impl CategoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            counters: CounterRepository::new(pool.clone()),
            pool,
        }
    }

    pub async fn list(&self) -> Result<Vec<Category>> {
        let rows: Vec<CategoryRow> = sqlx::query_as("SELECT * FROM categorias ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    pub async fn get(&self, id: i64) -> Result<Category> {
        let row: Option<CategoryRow> = sqlx::query_as("SELECT * FROM categorias WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Category::from)
            .ok_or_else(|| CatalogError::not_found(EntityKind::Category, id))
    }

    /// Categories whose name matches exactly. Names are not unique.
    pub async fn find_by_name(&self, nombre: &str) -> Result<Vec<Category>> {
        let rows: Vec<CategoryRow> =
            sqlx::query_as("SELECT * FROM categorias WHERE nombre = ? ORDER BY id")
                .bind(nombre)
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    pub async fn create(&self, input: CategoryCreate) -> Result<Category> {
        input.validate()?;

        let id = self.counters.next_id(Collection::Categorias.name()).await?;
        let category = input.into_category(id);
        insert(&self.pool, &category).await?;

        tracing::info!(id = category.id, nombre = %category.nombre, "Created category");
        Ok(category)
    }

    pub async fn update(&self, id: i64, patch: CategoryUpdate) -> Result<Category> {
        patch.validate()?;

        if patch.is_empty() {
            return self.get(id).await;
        }

        let row: Option<CategoryRow> = sqlx::query_as(
            r#"
            UPDATE categorias
            SET nombre = COALESCE(?, nombre),
                descripcion = COALESCE(?, descripcion)
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(patch.nombre)
        .bind(patch.descripcion)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Category::from)
            .ok_or_else(|| CatalogError::not_found(EntityKind::Category, id))
    }

    pub async fn delete(&self, id: i64) -> Result<String> {
        let nombre: Option<String> =
            sqlx::query_scalar("DELETE FROM categorias WHERE id = ? RETURNING nombre")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        let nombre = nombre.ok_or_else(|| CatalogError::not_found(EntityKind::Category, id))?;
        tracing::info!(id, nombre = %nombre, "Deleted category");
        Ok(nombre)
    }

    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categorias")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Bulk insert with ids 1..=N. Only the seeder calls this.
    pub(crate) async fn insert_numbered(
        conn: &mut SqliteConnection,
        items: Vec<CategoryCreate>,
    ) -> Result<i64> {
        let mut last_id = 0;
        for (index, input) in items.into_iter().enumerate() {
            let category = input.into_category(index as i64 + 1);
            insert(&mut *conn, &category).await?;
            last_id = category.id;
        }
        Ok(last_id)
    }
}

async fn insert<'e, E>(executor: E, category: &Category) -> Result<()>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    sqlx::query("INSERT INTO categorias (id, nombre, descripcion) VALUES (?, ?, ?)")
        .bind(category.id)
        .bind(&category.nombre)
        .bind(&category.descripcion)
        .execute(executor)
        .await?;
    Ok(())
}
