use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Collections whose ids are minted by the sequence counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Categorias,
    Productos,
    Postres,
}

impl Collection {
    pub const ALL: [Collection; 3] = [
        Collection::Categorias,
        Collection::Productos,
        Collection::Postres,
    ];

    /// Counter key for this collection.
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Categorias => "categorias",
            Collection::Productos => "productos",
            Collection::Postres => "postres",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Collection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "categorias" => Ok(Collection::Categorias),
            "productos" => Ok(Collection::Productos),
            "postres" => Ok(Collection::Postres),
            _ => Err(format!(
                "Invalid collection '{}'. Valid options: categorias, productos, postres",
                s
            )),
        }
    }
}

/// A persisted sequence record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counter {
    pub collection_name: String,
    /// Last id handed out; 0 when nothing has been allocated yet.
    pub sequence_value: i64,
}

/// Inspection view of a counter as reported by `/contadores/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterReport {
    pub coleccion: String,
    pub proximo_id: i64,
    pub ultimo_id_usado: i64,
}

impl From<&Counter> for CounterReport {
    fn from(counter: &Counter) -> Self {
        Self {
            coleccion: counter.collection_name.clone(),
            proximo_id: counter.sequence_value + 1,
            ultimo_id_usado: counter.sequence_value,
        }
    }
}
