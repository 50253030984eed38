use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::order::OrderError;
use crate::domain::product::{NewProduct, Product, Store};
use crate::infra::Clock;
use crate::storage::{namespaced_key, JsonCollection, KeyValueStore};

pub const PRODUCTS_COLLECTION: &str = "products";

/// Catalog of products customers have pasted in, newest first.
pub struct ProductRepository {
    products: JsonCollection<Product>,
    clock: Arc<dyn Clock>,
    write_lock: Mutex<()>,
}

impl ProductRepository {
    pub fn new(store: Arc<dyn KeyValueStore>, namespace: &str, clock: Arc<dyn Clock>) -> Self {
        Self {
            products: JsonCollection::new(store, namespaced_key(namespace, PRODUCTS_COLLECTION)),
            clock,
            write_lock: Mutex::new(()),
        }
    }

    pub async fn add_product(&self, new: NewProduct) -> Result<Product, OrderError> {
        let price = OrderError::check_amount("product price", new.price)?;
        let weight_kg = new
            .weight_kg
            .map(|w| OrderError::check_amount("weight", w))
            .transpose()?;

        match Store::detect(&new.url) {
            None => return Err(OrderError::UnsupportedStore(new.url)),
            Some(detected) if detected != new.store => {
                return Err(OrderError::StoreMismatch {
                    url: new.url,
                    declared: new.store,
                    detected,
                });
            }
            Some(_) => {}
        }

        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: new.name,
            store: new.store,
            url: new.url,
            price,
            weight_kg,
            image_url: new.image_url,
            created_at: self.clock.now(),
        };

        let _guard = self.write_lock.lock().await;
        let mut products = self.products.load().await?;
        products.insert(0, product.clone());
        self.products.save(&products).await?;

        tracing::info!(
            product_id = %product.id,
            store = %product.store,
            price = product.price,
            "Product added"
        );

        Ok(product)
    }

    pub async fn get_product(&self, product_id: &str) -> Result<Product, OrderError> {
        self.products
            .load()
            .await?
            .into_iter()
            .find(|p| p.id == product_id)
            .ok_or_else(|| OrderError::ProductNotFound(product_id.to_string()))
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, OrderError> {
        Ok(self.products.load().await?)
    }

    pub async fn remove_product(&self, product_id: &str) -> Result<bool, OrderError> {
        let _guard = self.write_lock.lock().await;
        let mut products = self.products.load().await?;

        let before = products.len();
        products.retain(|p| p.id != product_id);
        if products.len() == before {
            return Ok(false);
        }

        self.products.save(&products).await?;
        tracing::info!(product_id = %product_id, "Product removed");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::SystemClock;
    use crate::storage::MemoryStore;

    fn repo() -> ProductRepository {
        ProductRepository::new(Arc::new(MemoryStore::new()), "test", Arc::new(SystemClock))
    }

    #[tokio::test]
    async fn test_add_get_list_remove() {
        let repo = repo();
        let dress = repo
            .add_product(NewProduct::new("Floral dress", Store::Shein, "https://shein.com/d", 22.0))
            .await
            .unwrap();
        let kindle = repo
            .add_product(NewProduct::new("Kindle", Store::Amazon, "https://amazon.com/k", 99.0).with_weight(0.3))
            .await
            .unwrap();

        assert_eq!(repo.get_product(&dress.id).await.unwrap(), dress);

        let listed = repo.list_products().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, kindle.id);

        assert!(repo.remove_product(&dress.id).await.unwrap());
        assert!(!repo.remove_product(&dress.id).await.unwrap());
        assert!(matches!(
            repo.get_product(&dress.id).await,
            Err(OrderError::ProductNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_amounts_rejected_before_write() {
        let repo = repo();

        let negative_price = NewProduct::new("Broken", Store::AliExpress, "https://aliexpress.com/item/x", -3.0);
        assert!(matches!(
            repo.add_product(negative_price).await,
            Err(OrderError::Validation { field: "product price", .. })
        ));

        let negative_weight = NewProduct::new("Broken", Store::AliExpress, "https://aliexpress.com/item/x", 3.0).with_weight(-1.0);
        assert!(matches!(
            repo.add_product(negative_weight).await,
            Err(OrderError::Validation { field: "weight", .. })
        ));

        assert!(repo.list_products().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_store_must_match_url() {
        let repo = repo();

        let mislabeled = NewProduct::new("Dress", Store::Amazon, "https://es.shein.com/dress-p-9", 15.0);
        assert!(matches!(
            repo.add_product(mislabeled).await,
            Err(OrderError::StoreMismatch {
                declared: Store::Amazon,
                detected: Store::Shein,
                ..
            })
        ));

        let elsewhere = NewProduct::new("Lamp", Store::AliExpress, "https://www.ebay.com/itm/7", 15.0);
        assert!(matches!(
            repo.add_product(elsewhere).await,
            Err(OrderError::UnsupportedStore(_))
        ));

        assert!(repo.list_products().await.unwrap().is_empty());

        let detected = NewProduct::from_url("Lamp", "https://aliexpress.com/item/7", 15.0).unwrap();
        let stored = repo.add_product(detected).await.unwrap();
        assert_eq!(stored.store, Store::AliExpress);
    }
}
