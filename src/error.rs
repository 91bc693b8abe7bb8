//! Catalog error types.

use std::fmt;
use thiserror::Error;

/// The kind of catalog entity an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Category,
    Product,
    Dessert,
}

impl EntityKind {
    /// Localized "not found" message shown to API clients.
    pub fn not_found_message(&self) -> &'static str {
        match self {
            EntityKind::Category => "Categoría no encontrada",
            EntityKind::Product => "Producto no encontrado",
            EntityKind::Dessert => "Postre no encontrado",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Category => write!(f, "category"),
            EntityKind::Product => write!(f, "product"),
            EntityKind::Dessert => write!(f, "dessert"),
        }
    }
}

/// Errors that can occur in catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No entity with this id exists.
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: i64 },

    /// Input violated a field constraint. Nothing was written.
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("database error: {0}")]
    Store(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CatalogError {
    pub fn not_found(kind: EntityKind, id: i64) -> Self {
        CatalogError::NotFound { kind, id }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        CatalogError::Validation(message.into())
    }
}

pub type Result<T, E = CatalogError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = CatalogError::not_found(EntityKind::Product, 7);
        assert_eq!(err.to_string(), "product 7 not found");
    }

    #[test]
    fn test_localized_messages() {
        assert_eq!(
            EntityKind::Dessert.not_found_message(),
            "Postre no encontrado"
        );
        assert_eq!(
            EntityKind::Category.not_found_message(),
            "Categoría no encontrada"
        );
    }
}
