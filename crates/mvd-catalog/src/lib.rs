//! HTTP client for the product catalog service.
//!
//! Implements the [`ProductLookup`] seam over `GET /products/:id`. Any
//! non-success status maps to [`LookupError::NotFound`] and any transport or
//! decode failure to [`LookupError::Unavailable`]; callers treat either as
//! "this item cannot be ordered".

use async_trait::async_trait;
use mvd_orders::{LookupError, ProductLookup};
use mvd_schemas::Product;
use serde::Deserialize;
use tracing::debug;

// ---------------------------------------------------------------------------
// Wire shape
// ---------------------------------------------------------------------------

/// The catalog's product document, reduced to the fields ordering needs.
/// Prices are integer minor currency units.
#[derive(Debug, Clone, Deserialize)]
struct CatalogProduct {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    price: i64,
    stock: i64,
    seller: String,
}

impl From<CatalogProduct> for Product {
    fn from(p: CatalogProduct) -> Self {
        Product {
            id: p.id,
            name: p.name,
            price: p.price,
            stock: p.stock,
            seller_id: p.seller,
        }
    }
}

#[derive(Debug, serde::Serialize)]
struct StockAdjustment {
    quantity: i64,
}

// ---------------------------------------------------------------------------
// HttpCatalogClient
// ---------------------------------------------------------------------------

/// Catalog client bound to a configured base URL.
#[derive(Debug, Clone)]
pub struct HttpCatalogClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpCatalogClient {
    pub fn new(base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    fn product_url(&self, product_id: &str) -> String {
        format!("{}/products/{}", self.base_url.trim_end_matches('/'), product_id)
    }

    /// Best-effort stock adjustment: `PUT /products/:id/stock` with a signed
    /// quantity delta (negative after a sale, positive after a cancel).
    ///
    /// No lifecycle path calls this; stock mutation is left to the caller/UI
    /// layer, which logs and ignores failures. Exposed for callers that want
    /// the same best-effort follow-up.
    pub async fn adjust_stock(&self, product_id: &str, delta: i64) -> Result<(), LookupError> {
        let url = format!("{}/stock", self.product_url(product_id));
        let resp = self
            .http
            .put(url)
            .json(&StockAdjustment { quantity: delta })
            .send()
            .await
            .map_err(|e| LookupError::Unavailable(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(LookupError::NotFound(product_id.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ProductLookup for HttpCatalogClient {
    async fn get_product(&self, product_id: &str) -> Result<Product, LookupError> {
        let url = self.product_url(product_id);
        debug!(%url, "catalog lookup");

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| LookupError::Unavailable(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(LookupError::NotFound(product_id.to_string()));
        }

        let doc: CatalogProduct = resp
            .json()
            .await
            .map_err(|e| LookupError::Unavailable(e.to_string()))?;

        Ok(doc.into())
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn product_url_handles_trailing_slash() {
        let a = HttpCatalogClient::new("http://catalog:3002".to_string());
        let b = HttpCatalogClient::new("http://catalog:3002/".to_string());

        assert_eq!(a.product_url("p1"), "http://catalog:3002/products/p1");
        assert_eq!(b.product_url("p1"), "http://catalog:3002/products/p1");
    }

    #[tokio::test]
    async fn get_product_decodes_catalog_document() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/products/p1");
            then.status(200).json_body(serde_json::json!({
                "_id": "p1",
                "name": "Widget",
                "description": "ignored by this service",
                "price": 10,
                "stock": 5,
                "seller": "s1",
                "category": "tools"
            }));
        });

        let client = HttpCatalogClient::new(server.base_url());
        let product = client.get_product("p1").await.unwrap();

        assert_eq!(product.id, "p1");
        assert_eq!(product.name, "Widget");
        assert_eq!(product.price, 10);
        assert_eq!(product.stock, 5);
        assert_eq!(product.seller_id, "s1");
    }

    #[tokio::test]
    async fn non_success_status_maps_to_not_found() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/products/ghost");
            then.status(404).json_body(serde_json::json!({"message": "Product not found"}));
        });

        let client = HttpCatalogClient::new(server.base_url());
        let err = client.get_product("ghost").await.unwrap_err();

        assert_eq!(err, LookupError::NotFound("ghost".to_string()));
    }

    #[tokio::test]
    async fn undecodable_payload_maps_to_unavailable() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/products/p1");
            then.status(200).body("not json");
        });

        let client = HttpCatalogClient::new(server.base_url());
        let err = client.get_product("p1").await.unwrap_err();

        assert!(matches!(err, LookupError::Unavailable(_)));
    }

    #[tokio::test]
    async fn unreachable_catalog_maps_to_unavailable() {
        // Nothing listens on this port.
        let client = HttpCatalogClient::new("http://127.0.0.1:1".to_string());
        let err = client.get_product("p1").await.unwrap_err();

        assert!(matches!(err, LookupError::Unavailable(_)));
    }

    #[tokio::test]
    async fn adjust_stock_puts_signed_delta() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(PUT)
                .path("/products/p1/stock")
                .json_body(serde_json::json!({"quantity": -2}));
            then.status(200);
        });

        let client = HttpCatalogClient::new(server.base_url());
        client.adjust_stock("p1", -2).await.unwrap();
        mock.assert();
    }
}
