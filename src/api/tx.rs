use actix_web::{HttpResponse, Responder, post, web};

use super::ledger_error;
use super::models::{AppState, NewTxResponse};
use crate::transaction::Transaction;

/// Queue an opaque transaction for the next block.
#[post("/transactions/new")]
pub async fn new_transaction(
    state: web::Data<AppState>,
    body: web::Json<serde_json::Value>,
) -> impl Responder {
    let mut ledger = state.ledger.lock().expect("mutex poisoned");
    match ledger.enqueue_transaction(Transaction::from(body.into_inner())) {
        Ok(index) => HttpResponse::Created().json(NewTxResponse {
            message: format!("Transaction will be added to Block {index}"),
            index,
        }),
        Err(e) => ledger_error(&e),
    }
}
