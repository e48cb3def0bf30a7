use axum::{
    Json,
    extract::State,
    http::{HeaderName, StatusCode},
    response::IntoResponse,
};
use tracing::info;

use crate::db::models::Customer;
use crate::middleware::extract::{CustomerId, Pagination, ValidJson};
use crate::types::customer::{CustomerPatch, CustomerPayload};
use crate::{CrmError, router::CrmState};

pub const TOTAL_COUNT_HEADER: HeaderName = HeaderName::from_static("x-total-count");

/// POST /customers -> 201 with the stored customer.
pub async fn create_customer(
    State(state): State<CrmState>,
    ValidJson(body): ValidJson<CustomerPayload>,
) -> Result<(StatusCode, Json<Customer>), CrmError> {
    let customer = body.into_new_customer()?;
    let created = state.storage.create(customer).await?;
    info!(id = created.id, "customer created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /customers?offset=&limit= -> one page in id order.
/// The total row count is reported in `x-total-count`.
pub async fn list_customers(
    State(state): State<CrmState>,
    Pagination(page): Pagination,
) -> Result<impl IntoResponse, CrmError> {
    let (customers, total) = state.storage.list_with_total(page).await?;
    Ok(([(TOTAL_COUNT_HEADER, total.to_string())], Json(customers)))
}

pub async fn get_customer(
    State(state): State<CrmState>,
    CustomerId(id): CustomerId,
) -> Result<Json<Customer>, CrmError> {
    Ok(Json(state.storage.get(id).await?))
}

/// PATCH /customers/{id} -> only the supplied fields change.
pub async fn update_customer(
    State(state): State<CrmState>,
    CustomerId(id): CustomerId,
    ValidJson(body): ValidJson<CustomerPatch>,
) -> Result<Json<Customer>, CrmError> {
    let changes = body.into_changes()?;
    let updated = state.storage.update(id, changes).await?;
    info!(id, "customer updated");
    Ok(Json(updated))
}

/// PUT /customers/{id} -> full replacement; omitted optional fields are cleared.
pub async fn replace_customer(
    State(state): State<CrmState>,
    CustomerId(id): CustomerId,
    ValidJson(body): ValidJson<CustomerPayload>,
) -> Result<Json<Customer>, CrmError> {
    let customer = body.into_new_customer()?;
    let updated = state.storage.update(id, customer.into()).await?;
    info!(id, "customer replaced");
    Ok(Json(updated))
}

pub async fn delete_customer(
    State(state): State<CrmState>,
    CustomerId(id): CustomerId,
) -> Result<StatusCode, CrmError> {
    state.storage.delete(id).await?;
    info!(id, "customer deleted");
    Ok(StatusCode::NO_CONTENT)
}
