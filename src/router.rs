use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::config::PaginationConfig;
use crate::db::CustomerStorage;
use crate::handlers::customers::{
    create_customer, delete_customer, get_customer, list_customers, replace_customer,
    update_customer,
};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct CrmState {
    pub storage: CustomerStorage,
    pub pagination: PaginationConfig,
}

impl CrmState {
    pub fn new(storage: CustomerStorage, pagination: PaginationConfig) -> Self {
        Self {
            storage,
            pagination,
        }
    }
}

pub fn crm_router(state: CrmState) -> Router {
    Router::new()
        .route("/customers", get(list_customers).post(create_customer))
        .route(
            "/customers/{id}",
            get(get_customer)
                .put(replace_customer)
                .patch(update_customer)
                .delete(delete_customer),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
