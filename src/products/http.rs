//! HTTP product source for the catalog service.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use rusty_money::iso::Currency;
use serde::Deserialize;
use tracing::debug;

use crate::products::{Product, ProductId, ProductRecord, ProductSource, ProductSourceError};

/// Reads products from `{base_url}/products` and `{base_url}/products/{id}`.
#[derive(Debug, Clone)]
pub struct HttpProductSource {
    base_url: String,
    currency: &'static Currency,
    http: Client,
}

impl HttpProductSource {
    /// Create a source for the service at `base_url`, pricing products in `currency`.
    #[must_use]
    pub fn new(base_url: impl Into<String>, currency: &'static Currency) -> Self {
        Self::with_client(base_url, currency, Client::new())
    }

    /// Create a source that reuses an existing HTTP client.
    #[must_use]
    pub fn with_client(
        base_url: impl Into<String>,
        currency: &'static Currency,
        http: Client,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            base_url,
            currency,
            http,
        }
    }

    /// URL of the list endpoint.
    #[must_use]
    pub fn list_url(&self) -> String {
        format!("{}/products", self.base_url)
    }

    /// URL of the single-item endpoint.
    #[must_use]
    pub fn item_url(&self, id: ProductId) -> String {
        format!("{}/products/{id}", self.base_url)
    }
}

/// The list endpoint answers with either a bare array or a `data` envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListBody {
    Bare(Vec<ProductRecord>),
    Wrapped { data: Vec<ProductRecord> },
}

impl ListBody {
    fn into_records(self) -> Vec<ProductRecord> {
        match self {
            ListBody::Bare(records) | ListBody::Wrapped { data: records } => records,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ItemBody {
    Bare(ProductRecord),
    Wrapped { data: ProductRecord },
}

impl ItemBody {
    fn into_record(self) -> ProductRecord {
        match self {
            ItemBody::Bare(record) | ItemBody::Wrapped { data: record } => record,
        }
    }
}

#[async_trait]
impl ProductSource for HttpProductSource {
    async fn list_products(&self) -> Result<Vec<Product>, ProductSourceError> {
        let url = self.list_url();

        debug!(%url, "fetching product list");

        let response = self.http.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(ProductSourceError::UnexpectedResponse(format!(
                "product list request failed with status {status}: {text}"
            )));
        }

        let body: ListBody = response.json().await?;

        let products = body
            .into_records()
            .into_iter()
            .map(|record| record.into_product(self.currency))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = products.len(), "fetched product list");

        Ok(products)
    }

    async fn get_product(&self, id: ProductId) -> Result<Product, ProductSourceError> {
        let url = self.item_url(id);

        debug!(%url, "fetching product");

        let response = self.http.get(&url).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(ProductSourceError::NotFound(id)),
            status if !status.is_success() => {
                let text = response.text().await.unwrap_or_default();

                return Err(ProductSourceError::UnexpectedResponse(format!(
                    "product request failed with status {status}: {text}"
                )));
            }
            _ => {}
        }

        let body: ItemBody = response.json().await?;

        Ok(body.into_record().into_product(self.currency)?)
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::GBP};
    use testresult::TestResult;

    use crate::test::server::{self, StubServer};

    use super::*;

    fn source(server: &StubServer) -> reqwest::Result<HttpProductSource> {
        Ok(HttpProductSource::with_client(
            server.base_url(),
            GBP,
            server::client()?,
        ))
    }

    #[tokio::test]
    async fn get_product_reads_bare_body() -> TestResult {
        let server = StubServer::respond(
            200,
            r#"{"id": 4, "name": "Lamp", "description": "Brass", "stock": 2, "price": 30.5}"#,
        )
        .await?;

        let product = source(&server)?.get_product(ProductId::new(4)).await?;

        assert_eq!(product.name, "Lamp");
        assert_eq!(product.price, Money::from_minor(3050, GBP));

        let request = server.request().await?;
        assert_eq!(request.method, "GET");
        assert_eq!(request.path, "/api/products/4");

        Ok(())
    }

    #[tokio::test]
    async fn get_product_reads_data_envelope() -> TestResult {
        let server = StubServer::respond(
            200,
            r#"{"data": {"id": 4, "name": "Lamp", "stock": 2, "price": 30}}"#,
        )
        .await?;

        let product = source(&server)?.get_product(ProductId::new(4)).await?;

        assert_eq!(product.id, ProductId::new(4));
        assert_eq!(product.price, Money::from_minor(3000, GBP));

        Ok(())
    }

    #[tokio::test]
    async fn get_product_maps_404_to_not_found() -> TestResult {
        let server = StubServer::respond(404, r#"{"message": "Not Found"}"#).await?;

        let result = source(&server)?.get_product(ProductId::new(99)).await;

        assert!(
            matches!(result, Err(ProductSourceError::NotFound(id)) if id == ProductId::new(99)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn get_product_maps_server_error_to_unexpected_response() -> TestResult {
        let server = StubServer::respond(500, r#"{"message": "boom"}"#).await?;

        let result = source(&server)?.get_product(ProductId::new(1)).await;

        let Err(ProductSourceError::UnexpectedResponse(message)) = result else {
            return Err(format!("expected UnexpectedResponse, got {result:?}").into());
        };

        assert!(message.contains("500"));
        assert!(message.contains("boom"));

        Ok(())
    }

    #[tokio::test]
    async fn list_products_reads_bare_array() -> TestResult {
        let server = StubServer::respond(
            200,
            r#"[{"id": 1, "name": "Lamp", "price": 20}, {"id": 2, "name": "Rug", "price": "5.00"}]"#,
        )
        .await?;

        let products = source(&server)?.list_products().await?;

        let names: Vec<&str> = products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Lamp", "Rug"]);
        assert_eq!(server.request().await?.path, "/api/products");

        Ok(())
    }

    #[tokio::test]
    async fn list_products_reads_data_envelope() -> TestResult {
        let server = StubServer::respond(
            200,
            r#"{"data": [{"id": 7, "name": "Vase", "stock": 1, "price": 12.25}]}"#,
        )
        .await?;

        let products = source(&server)?.list_products().await?;

        assert_eq!(products.len(), 1);
        assert_eq!(
            products.first().map(|p| &p.price),
            Some(&Money::from_minor(1225, GBP))
        );

        Ok(())
    }

    #[tokio::test]
    async fn list_products_maps_server_error_to_unexpected_response() -> TestResult {
        let server = StubServer::respond(503, "").await?;

        let result = source(&server)?.list_products().await;

        assert!(
            matches!(result, Err(ProductSourceError::UnexpectedResponse(_))),
            "expected UnexpectedResponse, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn list_products_rejects_negative_prices() -> TestResult {
        let server =
            StubServer::respond(200, r#"[{"id": 3, "name": "Refund", "price": -1}]"#).await?;

        let result = source(&server)?.list_products().await;

        assert!(
            matches!(result, Err(ProductSourceError::InvalidProduct(_))),
            "expected InvalidProduct, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn urls_ignore_trailing_slash() {
        let source = HttpProductSource::new("http://shop.test/api/", GBP);

        assert_eq!(source.list_url(), "http://shop.test/api/products");
        assert_eq!(
            source.item_url(ProductId::new(5)),
            "http://shop.test/api/products/5"
        );
    }

    #[test]
    fn list_body_accepts_bare_array() -> TestResult {
        let body: ListBody = serde_json::from_str(
            r#"[{"id": 1, "name": "Lamp", "description": null, "stock": 2, "price": 30, "featured_image": null}]"#,
        )?;

        let records = body.into_records();

        assert_eq!(records.len(), 1);
        assert_eq!(records.first().map(|r| r.id), Some(ProductId::new(1)));

        Ok(())
    }

    #[test]
    fn list_body_accepts_data_envelope() -> TestResult {
        let body: ListBody = serde_json::from_str(
            r#"{"data": [
                {"id": 1, "name": "Lamp", "stock": 2, "price": 30},
                {"id": 2, "name": "Rug", "stock": 1, "price": "120.50"}
            ]}"#,
        )?;

        let names: Vec<String> = body.into_records().into_iter().map(|r| r.name).collect();

        assert_eq!(names, vec!["Lamp", "Rug"]);

        Ok(())
    }

    #[test]
    fn item_body_accepts_data_envelope() -> TestResult {
        let body: ItemBody =
            serde_json::from_str(r#"{"data": {"id": 9, "name": "Vase", "price": 12.25}}"#)?;

        let product = body.into_record().into_product(GBP)?;

        assert_eq!(product.id, ProductId::new(9));
        assert_eq!(product.stock, 0);

        Ok(())
    }
}
