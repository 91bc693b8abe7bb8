use super::Catalog;
use crate::error::Result;
use crate::models::{Dessert, Product};

impl Catalog {
    /// Desserts whose category label equals the given product's.
    pub async fn desserts_sharing_category(&self, product_id: i64) -> Result<Vec<Dessert>> {
        let product = self.products.get(product_id).await?;
        self.desserts.find_by_category(&product.categoria).await
    }

    /// Products whose category label equals the given dessert's.
    pub async fn products_sharing_category(&self, dessert_id: i64) -> Result<Vec<Product>> {
        let dessert = self.desserts.get(dessert_id).await?;
        self.products.find_by_category(&dessert.categoria).await
    }
}
