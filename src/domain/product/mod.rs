// ============================================================================
// Product Domain - items customers ask us to buy abroad
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::order::OrderError;

/// Origin store for a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Store {
    Shein,
    Amazon,
    AliExpress,
}

impl Store {
    /// Store a product URL points at, matched case-insensitively on the
    /// store's name anywhere in the URL. `None` for any other site.
    pub fn detect(url: &str) -> Option<Store> {
        let url = url.to_lowercase();
        if url.contains("shein") {
            Some(Store::Shein)
        } else if url.contains("amazon") {
            Some(Store::Amazon)
        } else if url.contains("aliexpress") {
            Some(Store::AliExpress)
        } else {
            None
        }
    }
}

impl fmt::Display for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Store::Shein => "Shein",
            Store::Amazon => "Amazon",
            Store::AliExpress => "AliExpress",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub store: Store,
    pub url: String,
    pub price: f64,
    /// Unknown for most scraped listings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Weight used for shipping, falling back to `default_kg`.
    pub fn effective_weight(&self, default_kg: f64) -> f64 {
        self.weight_kg.unwrap_or(default_kg)
    }
}

/// Input for adding a product to the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub store: Store,
    pub url: String,
    pub price: f64,
    pub weight_kg: Option<f64>,
    pub image_url: Option<String>,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, store: Store, url: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            store,
            url: url.into(),
            price,
            weight_kg: None,
            image_url: None,
        }
    }

    /// Build from a pasted URL, taking the store from the URL itself.
    pub fn from_url(name: impl Into<String>, url: impl Into<String>, price: f64) -> Result<Self, OrderError> {
        let url = url.into();
        let store = Store::detect(&url).ok_or_else(|| OrderError::UnsupportedStore(url.clone()))?;
        Ok(Self::new(name, store, url, price))
    }

    pub fn with_weight(mut self, weight_kg: f64) -> Self {
        self.weight_kg = Some(weight_kg);
        self
    }

    pub fn with_image(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }
}
