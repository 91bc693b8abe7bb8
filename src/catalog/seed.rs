//! Bootstrap data for an empty catalog.
//!
//! Each collection is seeded on its own: an existing product list does not
//! stop desserts from being seeded and vice versa. Seeding an empty category
//! collection also resets every counter.

use serde::Serialize;
use sqlx::SqliteConnection;

use super::Catalog;
use crate::db::{CategoryRepository, CounterRepository, DessertRepository, ProductRepository};
use crate::error::Result;
use crate::models::{CategoryCreate, Collection, DessertCreate, ProductCreate};

/// How many records each collection received. Zero means it was skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub categorias: i64,
    pub productos: i64,
    pub postres: i64,
}

impl SeedReport {
    pub fn is_empty(&self) -> bool {
        self.categorias == 0 && self.productos == 0 && self.postres == 0
    }
}

const CATEGORIES: &[(&str, &str)] = &[
    ("torta", "Tortas tradicionales mexicanas"),
    ("cuernito", "Cuernitos y croissants horneados"),
    ("quesadilla", "Quesadillas de tortilla de maíz"),
    ("taco", "Tacos variados"),
    ("baguette", "Baguettes gourmet"),
    ("bebida", "Bebidas frías y calientes"),
    ("postre", "Postres individuales"),
    ("pastel", "Pasteles completos y por rebanada"),
    ("postre_frio", "Postres fríos y gelatinas"),
];

// (nombre, categoria, descripcion, precio)
const PRODUCTS: &[(&str, &str, &str, f64)] = &[
    ("Torta de Jamón", "torta", "Torta con jamón, queso, aguacate, jitomate y lechuga en pan telera", 45.0),
    ("Torta de Milanesa", "torta", "Torta con milanesa de res empanizada, aguacate, jitomate, lechuga y frijoles", 60.0),
    ("Torta Cubana", "torta", "Torta con jamón, queso, milanesa, salchicha, chorizo, huevo, aguacate y frijoles", 85.0),
    ("Cuernito de Jamón y Queso", "cuernito", "Croissant horneado relleno de jamón y queso gouda derretido", 38.0),
    ("Cuernito 3 Quesos", "cuernito", "Croissant horneado relleno de queso manchego, gouda y philadelphia", 42.0),
    ("Quesadilla de Queso", "quesadilla", "Tortilla de maíz hecha a mano rellena de queso Oaxaca", 25.0),
    ("Quesadilla de Hongos", "quesadilla", "Tortilla de maíz hecha a mano rellena de hongos guisados y queso", 30.0),
    ("Quesadilla de Tinga", "quesadilla", "Tortilla de maíz hecha a mano rellena de tinga de pollo y queso", 35.0),
    ("Taco de Pastor", "taco", "Tortilla de maíz con carne de cerdo marinada en adobo y piña", 18.0),
    ("Taco de Suadero", "taco", "Tortilla de maíz con carne de res suadero, cilantro y cebolla", 20.0),
    ("Taco de Barbacoa", "taco", "Tortilla de maíz con carne de barbacoa de borrego, cilantro y cebolla", 25.0),
    ("Baguette Italiano", "baguette", "Pan baguette con jamón serrano, queso provolone, tomate y pesto", 65.0),
    ("Baguette de Pollo", "baguette", "Pan baguette con pollo a la plancha, queso manchego, lechuga y jitomate", 60.0),
    ("Café Americano", "bebida", "Café de grano recién molido, 12 oz", 30.0),
    ("Agua de Horchata", "bebida", "Agua fresca de arroz con canela y vainilla, 16 oz", 25.0),
    ("Limonada", "bebida", "Limonada natural con un toque de menta, 16 oz", 28.0),
    ("Rebanada de Pastel de Chocolate", "postre", "Rebanada individual de pastel de chocolate con ganache", 45.0),
    ("Flan Individual", "postre", "Porción individual de flan napolitano con caramelo", 35.0),
];

// (nombre, descripcion, categoria, rebanadas, precio_rebanada, precio_total)
const DESSERTS: &[(&str, &str, &str, i64, f64, f64)] = &[
    ("Pastel de Chocolate", "Delicioso pastel de chocolate con ganache de chocolate oscuro y decorado con fresas", "pastel", 12, 45.0, 540.0),
    ("Cheesecake de Fresa", "Tarta de queso cremosa con base de galleta y cobertura de fresas naturales", "pastel", 10, 50.0, 500.0),
    ("Pastel Tres Leches", "Esponjoso pastel bañado en tres tipos de leche con crema chantilly y canela", "pastel", 16, 35.0, 560.0),
    ("Tarta de Manzana", "Clásica tarta de manzana con masa crujiente y manzanas caramelizadas", "pastel", 8, 40.0, 320.0),
    ("Pastel de Zanahoria", "Húmedo pastel de zanahoria con nueces y betún de queso crema", "pastel", 12, 42.0, 504.0),
    ("Tiramisú", "Postre italiano con capas de bizcocho bañado en café, mascarpone y cacao", "postre_frio", 9, 55.0, 495.0),
    ("Pastel Red Velvet", "Suave pastel de terciopelo rojo con betún de queso crema", "pastel", 14, 48.0, 672.0),
    ("Flan Napolitano Familiar", "Flan casero de tamaño familiar con caramelo y vainilla", "postre_frio", 10, 25.0, 250.0),
];

impl Catalog {
    /// Populate whichever collections are empty with the reference menu.
    pub async fn seed(&self) -> Result<SeedReport> {
        let mut report = SeedReport::default();

        // Each block takes the write lock before checking for emptiness, so a
        // concurrent seeder waits and then finds the rows already there.
        let mut tx = self.pool().begin_with("BEGIN IMMEDIATE").await?;
        if is_empty(&mut tx, Collection::Categorias).await? {
            CounterRepository::reset_all(&mut tx).await?;
            let items = CATEGORIES
                .iter()
                .map(|(nombre, descripcion)| CategoryCreate::new(*nombre, *descripcion))
                .collect();
            report.categorias = CategoryRepository::insert_numbered(&mut tx, items).await?;
            CounterRepository::set(&mut tx, Collection::Categorias.name(), report.categorias)
                .await?;
            // The reset must not hand out ids that existing rows already hold
            restore_floor(&mut tx, Collection::Productos).await?;
            restore_floor(&mut tx, Collection::Postres).await?;
            tx.commit().await?;

            tracing::info!(count = report.categorias, "Seeded categories");
        } else {
            tx.rollback().await?;
        }

        let mut tx = self.pool().begin_with("BEGIN IMMEDIATE").await?;
        if is_empty(&mut tx, Collection::Productos).await? {
            let items = PRODUCTS
                .iter()
                .map(|(nombre, categoria, descripcion, precio)| {
                    ProductCreate::new(*nombre, *categoria, *descripcion, *precio)
                })
                .collect();
            report.productos = ProductRepository::insert_numbered(&mut tx, items).await?;
            CounterRepository::set(&mut tx, Collection::Productos.name(), report.productos)
                .await?;
            tx.commit().await?;

            tracing::info!(count = report.productos, "Seeded products");
        } else {
            tx.rollback().await?;
        }

        let mut tx = self.pool().begin_with("BEGIN IMMEDIATE").await?;
        if is_empty(&mut tx, Collection::Postres).await? {
            let items = DESSERTS
                .iter()
                .map(|(nombre, descripcion, categoria, rebanadas, rebanada, total)| {
                    DessertCreate::new(*nombre, *descripcion, *categoria, *rebanadas, *rebanada, *total)
                })
                .collect();
            report.postres = DessertRepository::insert_numbered(&mut tx, items).await?;
            CounterRepository::set(&mut tx, Collection::Postres.name(), report.postres).await?;
            tx.commit().await?;

            tracing::info!(count = report.postres, "Seeded desserts");
        } else {
            tx.rollback().await?;
        }

        if report.is_empty() {
            tracing::debug!("Catalog already seeded");
        }
        Ok(report)
    }
}

async fn is_empty(conn: &mut SqliteConnection, collection: Collection) -> Result<bool> {
    let sql = match collection {
        Collection::Categorias => "SELECT NOT EXISTS (SELECT 1 FROM categorias)",
        Collection::Productos => "SELECT NOT EXISTS (SELECT 1 FROM productos)",
        Collection::Postres => "SELECT NOT EXISTS (SELECT 1 FROM postres)",
    };
    let empty: bool = sqlx::query_scalar(sql).fetch_one(&mut *conn).await?;
    Ok(empty)
}

/// Raise a collection's counter to its highest stored id.
async fn restore_floor(conn: &mut SqliteConnection, collection: Collection) -> Result<()> {
    let sql = match collection {
        Collection::Categorias => "SELECT COALESCE(MAX(id), 0) FROM categorias",
        Collection::Productos => "SELECT COALESCE(MAX(id), 0) FROM productos",
        Collection::Postres => "SELECT COALESCE(MAX(id), 0) FROM postres",
    };
    let max_id: i64 = sqlx::query_scalar(sql).fetch_one(&mut *conn).await?;
    if max_id > 0 {
        CounterRepository::set(conn, collection.name(), max_id).await?;
    }
    Ok(())
}
