use std::collections::HashSet;

use crate::models::product::{Product, ProductCategory, PRODUCTS_SHEET, PRODUCT_COLUMNS};
use crate::repositories::sheet_repository::SheetRepository;
use crate::utils::errors::AppResult;

#[derive(Clone)]
pub struct ProductRepository {
    sheets: SheetRepository,
}

impl ProductRepository {
    pub fn new(sheets: SheetRepository) -> Self {
        Self { sheets }
    }

    pub async fn verify_schema(&self) -> AppResult<()> {
        self.sheets.verify_schema(PRODUCTS_SHEET, PRODUCT_COLUMNS).await
    }

    pub async fn list_all(&self) -> AppResult<Vec<Product>> {
        let records = self.sheets.list_all(PRODUCTS_SHEET).await?;
        Ok(records.iter().map(Product::from_record).collect())
    }

    /// Producto cuya potencia es exactamente `power` (comparación de texto)
    pub async fn find_by_power(&self, power: &str) -> AppResult<Option<Product>> {
        let record = self
            .sheets
            .find_one(PRODUCTS_SHEET, |r| r.get("potencia") == Some(power))
            .await?;
        Ok(record.as_ref().map(Product::from_record))
    }

    /// Pares (potencia, precio) sin repetir, en orden del catálogo
    pub async fn categories(&self) -> AppResult<Vec<ProductCategory>> {
        let mut seen = HashSet::new();
        Ok(self
            .list_all()
            .await?
            .into_iter()
            .filter(|p| !p.power.is_empty())
            .map(|p| ProductCategory {
                power: p.power,
                price: p.attributes.price,
            })
            .filter(|c| seen.insert(c.clone()))
            .collect())
    }
}
