//! HTTP handlers for Products API

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use axum_helpers::{
    errors::responses::{
        BadRequestPathResponse, BadRequestValidationResponse, ForbiddenResponse,
        InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
    Admin, AppError, IdPath, RequireRole, ValidatedJson,
};
use std::sync::Arc;
use tracing::instrument;
use utoipa::OpenApi;

use crate::conversions::{from_entities, from_entity, to_entity};
use crate::error::{ProductError, ProductResult};
use crate::models::{ProductRequest, ProductView, ResponseEnvelope};
use crate::repository::ProductRepository;

/// OpenAPI documentation for Products API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        get_product,
        create_product,
        update_product,
        delete_product,
    ),
    components(
        schemas(ProductView, ProductRequest, ResponseEnvelope),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestPathResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Products", description = "Product catalog endpoints")
    )
)]
pub struct ApiDoc;

/// Create the products router.
///
/// Reads are public. Writes need `Admin` claims in the request extensions,
/// which `optional_jwt_auth_middleware` attaches when a valid token is sent.
pub fn router<R: ProductRepository + 'static>(repository: R) -> Router {
    let shared_repository = Arc::new(repository);

    Router::new()
        .route(
            "/",
            get(list_products::<R>)
                .post(create_product::<R>)
                .put(update_product::<R>)
                .delete(delete_product::<R>),
        )
        .route("/{id}", get(get_product::<R>))
        .with_state(shared_repository)
}

/// 200 for a successful write, 400 otherwise; the envelope is the body either way.
fn envelope_response(envelope: ResponseEnvelope) -> (StatusCode, Json<ResponseEnvelope>) {
    let status = if envelope.success {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };
    (status, Json(envelope))
}

/// List all products
#[utoipa::path(
    get,
    path = "",
    tag = "Products",
    responses(
        (status = 200, description = "All products in primary-key order", body = Vec<ProductView>),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
#[instrument(skip(repository))]
async fn list_products<R: ProductRepository>(
    State(repository): State<Arc<R>>,
) -> ProductResult<Json<Vec<ProductView>>> {
    let products = repository.get_all().await?;
    if products.is_empty() {
        return Err(ProductError::NoProducts);
    }
    Ok(Json(from_entities(products)))
}

/// Get a product by id
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = i32, Path, description = "Product id")
    ),
    responses(
        (status = 200, description = "Product found", body = ProductView),
        (status = 400, response = BadRequestPathResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
#[instrument(skip(repository))]
async fn get_product<R: ProductRepository>(
    State(repository): State<Arc<R>>,
    IdPath(id): IdPath,
) -> ProductResult<Json<ProductView>> {
    let product = repository
        .find_by_id(id)
        .await?
        .ok_or(ProductError::NotFound)?;
    Ok(Json(from_entity(product)))
}

/// Add a product
#[utoipa::path(
    post,
    path = "",
    tag = "Products",
    request_body = ProductRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Product added", body = ResponseEnvelope),
        (status = 400, description = "Rejected, see message", body = ResponseEnvelope),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse)
    )
)]
#[instrument(skip(repository, _admin))]
async fn create_product<R: ProductRepository>(
    _admin: RequireRole<Admin>,
    State(repository): State<Arc<R>>,
    ValidatedJson(request): ValidatedJson<ProductRequest>,
) -> (StatusCode, Json<ResponseEnvelope>) {
    envelope_response(repository.create(to_entity(&request)).await)
}

/// Replace a product; the id comes from the body
#[utoipa::path(
    put,
    path = "",
    tag = "Products",
    request_body = ProductRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Product updated", body = ResponseEnvelope),
        (status = 400, description = "Rejected, see message", body = ResponseEnvelope),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse)
    )
)]
#[instrument(skip(repository, _admin))]
async fn update_product<R: ProductRepository>(
    _admin: RequireRole<Admin>,
    State(repository): State<Arc<R>>,
    ValidatedJson(request): ValidatedJson<ProductRequest>,
) -> (StatusCode, Json<ResponseEnvelope>) {
    envelope_response(repository.update(to_entity(&request)).await)
}

/// Remove a product; the id comes from the body
#[utoipa::path(
    delete,
    path = "",
    tag = "Products",
    request_body = ProductRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Product deleted", body = ResponseEnvelope),
        (status = 400, description = "Rejected, see message", body = ResponseEnvelope),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse)
    )
)]
#[instrument(skip(repository, _admin, payload))]
async fn delete_product<R: ProductRepository>(
    _admin: RequireRole<Admin>,
    State(repository): State<Arc<R>>,
    payload: Result<Json<ProductRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ResponseEnvelope>), AppError> {
    // Only the id matters here, so field validation is skipped
    let Json(request) = payload?;
    Ok(envelope_response(repository.delete(to_entity(&request)).await))
}
