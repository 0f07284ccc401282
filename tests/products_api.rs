use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use products_api::{
    dto::products::{
        CreateProductRequest, ListingFilter, ListingOptions, SortField, UpdateProductRequest,
    },
    error::{ManagerError, ManagerResult, StoreError},
    models::Product,
    pagination::PageResult,
    routes::create_api_router,
    services::{MemoryProducts, ProductManager, ProductStore},
    state::AppState,
};
use serde_json::{Value, json};
use tower::ServiceExt;

/// Records every paginate call and answers with an empty page.
#[derive(Default)]
struct RecordingStore {
    calls: Mutex<Vec<(ListingFilter, ListingOptions)>>,
}

impl RecordingStore {
    fn calls(&self) -> Vec<(ListingFilter, ListingOptions)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProductStore for RecordingStore {
    async fn paginate(
        &self,
        filter: &ListingFilter,
        options: &ListingOptions,
    ) -> Result<PageResult<Product>, StoreError> {
        self.calls.lock().unwrap().push((filter.clone(), *options));
        Ok(PageResult::new(Vec::new(), 0, options.page, options.limit))
    }
}

struct BrokenStore;

#[async_trait]
impl ProductStore for BrokenStore {
    async fn paginate(
        &self,
        _filter: &ListingFilter,
        _options: &ListingOptions,
    ) -> Result<PageResult<Product>, StoreError> {
        Err(StoreError::Orm(sea_orm::DbErr::Custom(
            "connection refused".into(),
        )))
    }
}

/// Manager whose every call fails as if the product did not exist.
struct MissingManager;

#[async_trait]
impl ProductManager for MissingManager {
    async fn get_by_id(&self, id: &str) -> ManagerResult<Product> {
        Err(ManagerError::NotFound(id.to_string()))
    }

    async fn add(&self, _data: CreateProductRequest) -> ManagerResult<Product> {
        Err(ManagerError::InvalidPayload("rejected".into()))
    }

    async fn update(&self, id: &str, _data: UpdateProductRequest) -> ManagerResult<Product> {
        Err(ManagerError::NotFound(id.to_string()))
    }

    async fn delete(&self, id: &str) -> ManagerResult<Product> {
        Err(ManagerError::NotFound(id.to_string()))
    }
}

fn app(state: AppState) -> Router {
    Router::new()
        .nest("/api", create_api_router())
        .with_state(state)
}

async fn send(app: Router, request: Request<Body>) -> anyhow::Result<(StatusCode, Value)> {
    let response = app.oneshot(request).await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, serde_json::from_slice(&bytes)?))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn with_json(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn recording_state() -> (Arc<RecordingStore>, AppState) {
    let store = Arc::new(RecordingStore::default());
    let state = AppState::new(store.clone(), Arc::new(MissingManager));
    (store, state)
}

fn hoodie() -> Value {
    json!({
        "title": "Axum Hoodie",
        "description": "Warm",
        "code": "HOOD-001",
        "price": 550,
        "stock": 4,
        "category": "clothing"
    })
}

#[tokio::test]
async fn listing_builds_filter_and_options_from_query() -> anyhow::Result<()> {
    let (store, state) = recording_state();

    let (status, body) = send(
        app(state),
        get("/api/products?limit=5&page=2&category=shoes&stock=3&sort=asc"),
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["products"]["page"], 2);
    assert_eq!(body["products"]["limit"], 5);
    assert_eq!(
        store.calls(),
        vec![(
            ListingFilter {
                category: Some("shoes".into()),
                stock_greater_than: Some(2.0),
            },
            ListingOptions {
                page: 2,
                limit: 5,
                sort: Some(SortField::PriceAscending),
            },
        )]
    );
    Ok(())
}

#[tokio::test]
async fn listing_defaults_to_first_page_of_ten() -> anyhow::Result<()> {
    let (store, state) = recording_state();

    let (status, _) = send(app(state), get("/api/products")).await?;

    assert_eq!(status, StatusCode::OK);
    let (filter, options) = store.calls().remove(0);
    assert_eq!(filter, ListingFilter::default());
    assert_eq!(
        options,
        ListingOptions {
            page: 1,
            limit: 10,
            sort: None
        }
    );
    Ok(())
}

#[tokio::test]
async fn invalid_limit_is_rejected_without_querying_store() -> anyhow::Result<()> {
    let (store, state) = recording_state();

    let (status, body) = send(app(state), get("/api/products?limit=0")).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "error": "Parameter 'limit' must be a number between 1 and 100" })
    );
    assert!(store.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn limit_error_takes_precedence_over_page_error() -> anyhow::Result<()> {
    let (_, state) = recording_state();

    let (status, body) = send(app(state), get("/api/products?page=0&limit=101")).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Parameter 'limit' must be a number between 1 and 100"
    );
    Ok(())
}

#[tokio::test]
async fn repeated_category_is_not_a_string() -> anyhow::Result<()> {
    let (store, state) = recording_state();

    let (status, body) = send(
        app(state),
        get("/api/products?category=shoes&category=hats"),
    )
    .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Parameter 'category' must be a string");
    assert!(store.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn unknown_sort_is_rejected() -> anyhow::Result<()> {
    let (_, state) = recording_state();

    let (status, body) = send(app(state), get("/api/products?sort=cheapest")).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Parameter 'sort' must be either 'asc' or 'desc'");
    Ok(())
}

#[tokio::test]
async fn store_failure_is_reported_as_bad_request() -> anyhow::Result<()> {
    let state = AppState::new(Arc::new(BrokenStore), Arc::new(MissingManager));

    let (status, body) = send(app(state), get("/api/products")).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["error"].as_str().unwrap_or_default();
    assert!(message.contains("connection refused"), "got {message}");
    Ok(())
}

#[tokio::test]
async fn failed_update_still_answers_ok_with_error_envelope() -> anyhow::Result<()> {
    let (_, state) = recording_state();

    let (status, body) = send(
        app(state),
        with_json("PUT", "/api/products/abc", json!({ "price": 10 })),
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "error");
    assert_eq!(body["payload"]["kind"], "not_found");
    assert_eq!(body["payload"]["message"], "Product 'abc' not found");
    Ok(())
}

#[tokio::test]
async fn conventional_status_codes_can_be_enabled() -> anyhow::Result<()> {
    let (_, state) = recording_state();
    let state = state.with_conventional_status_codes(true);

    let (status, body) = send(app(state), get("/api/products/abc")).await?;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");
    Ok(())
}

#[tokio::test]
async fn product_lifecycle_through_the_router() -> anyhow::Result<()> {
    let state = AppState::in_memory(MemoryProducts::new());

    let (status, created) = send(
        app(state.clone()),
        with_json("POST", "/api/products", hoodie()),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["status"], "success");
    assert_eq!(created["payload"]["status"], true);
    let id = created["payload"]["id"].as_str().unwrap_or_default().to_string();

    let (_, fetched) = send(app(state.clone()), get(&format!("/api/products/{id}"))).await?;
    assert_eq!(fetched["status"], "success");
    assert_eq!(fetched["payload"]["code"], "HOOD-001");

    let (_, updated) = send(
        app(state.clone()),
        with_json("PUT", &format!("/api/products/{id}"), json!({ "stock": 9 })),
    )
    .await?;
    assert_eq!(updated["status"], "success");
    let message = updated["payload"].as_str().unwrap_or_default();
    assert!(message.starts_with("Producto {"), "got {message}");
    assert!(message.ends_with("} actualizado."), "got {message}");
    assert!(message.contains("\"stock\":9"), "got {message}");

    let (_, listed) = send(app(state.clone()), get("/api/products?stock=9")).await?;
    assert_eq!(listed["products"]["totalDocs"], 1);

    let delete = Request::builder()
        .method("DELETE")
        .uri(format!("/api/products/{id}"))
        .body(Body::empty())?;
    let (status, deleted) = send(app(state.clone()), delete).await?;
    assert_eq!(status, StatusCode::OK);
    let message = deleted["payload"].as_str().unwrap_or_default();
    assert!(message.ends_with("} eliminado."), "got {message}");

    let (status, missing) = send(app(state), get(&format!("/api/products/{id}"))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(missing["status"], "error");
    assert_eq!(missing["payload"]["kind"], "not_found");
    Ok(())
}

#[tokio::test]
async fn invalid_create_body_is_reported_in_envelope() -> anyhow::Result<()> {
    let state = AppState::in_memory(MemoryProducts::new());

    let (status, body) = send(
        app(state.clone()),
        with_json("POST", "/api/products", json!({ "title": "No code" })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "error");
    assert_eq!(body["payload"]["kind"], "invalid_payload");

    send(app(state.clone()), with_json("POST", "/api/products", hoodie())).await?;
    let (_, duplicate) = send(app(state), with_json("POST", "/api/products", hoodie())).await?;
    assert_eq!(duplicate["payload"]["kind"], "duplicate_code");
    Ok(())
}

#[tokio::test]
async fn huge_page_answers_with_an_empty_page() -> anyhow::Result<()> {
    let state = AppState::in_memory(MemoryProducts::new());
    send(app(state.clone()), with_json("POST", "/api/products", hoodie())).await?;

    let (status, body) = send(app(state), get("/api/products?page=1e20")).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["products"]["docs"], json!([]));
    assert_eq!(body["products"]["totalDocs"], 1);
    assert_eq!(body["products"]["hasNextPage"], false);
    Ok(())
}

#[tokio::test]
async fn update_without_json_content_type_answers_with_envelope() -> anyhow::Result<()> {
    let state = AppState::in_memory(MemoryProducts::new());
    let request = Request::builder()
        .method("PUT")
        .uri("/api/products/abc")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("stock=3"))?;

    let (status, body) = send(app(state), request).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "error");
    assert_eq!(body["payload"]["kind"], "invalid_payload");
    Ok(())
}

#[tokio::test]
async fn malformed_json_on_create_answers_with_envelope() -> anyhow::Result<()> {
    let state = AppState::in_memory(MemoryProducts::new());
    let request = Request::builder()
        .method("POST")
        .uri("/api/products")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{bad"))?;

    let (status, body) = send(app(state.clone()), request).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "error");
    assert_eq!(body["payload"]["kind"], "invalid_payload");

    let conventional = state.with_conventional_status_codes(true);
    let request = Request::builder()
        .method("POST")
        .uri("/api/products")
        .body(Body::from("{}"))?;
    let (status, body) = send(app(conventional), request).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["payload"]["kind"], "invalid_payload");
    Ok(())
}
