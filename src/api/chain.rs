use actix_web::{HttpResponse, Responder, get, post, web};
use log::info;

use super::ledger_error;
use super::models::{
    AppState, ChainResponse, DifficultyResponse, LastBlockResponse, SetDifficultyRequest,
    ValidateResponse,
};

/// Get the full chain.
#[get("/chain")]
pub async fn get_chain(state: web::Data<AppState>) -> impl Responder {
    let ledger = state.ledger.lock().expect("mutex poisoned");
    let chain = ledger.chain_view();
    HttpResponse::Ok().json(ChainResponse {
        length: chain.len(),
        chain,
    })
}

/// Get the current mining target.
#[get("/last_block")]
pub async fn get_last_block(state: web::Data<AppState>) -> impl Responder {
    let ledger = state.ledger.lock().expect("mutex poisoned");
    match ledger.last_block() {
        Ok(block) => HttpResponse::Ok().json(LastBlockResponse { block }),
        Err(e) => ledger_error(&e),
    }
}

/// Audit linkage of the whole chain.
#[get("/validate")]
pub async fn validate_chain(state: web::Data<AppState>) -> impl Responder {
    let ledger = state.ledger.lock().expect("mutex poisoned");
    HttpResponse::Ok().json(ValidateResponse {
        valid: ledger.is_valid_chain(),
        length: ledger.len(),
    })
}

/// Get current PoW difficulty.
#[get("/difficulty")]
pub async fn get_difficulty(state: web::Data<AppState>) -> impl Responder {
    let ledger = state.ledger.lock().expect("mutex poisoned");
    HttpResponse::Ok().json(DifficultyResponse {
        difficulty: ledger.difficulty(),
    })
}

/// Update PoW difficulty (affects future submissions only).
#[post("/difficulty")]
pub async fn set_difficulty(
    state: web::Data<AppState>,
    body: web::Json<SetDifficultyRequest>,
) -> impl Responder {
    let mut ledger = state.ledger.lock().expect("mutex poisoned");
    if let Err(e) = ledger.set_difficulty(body.difficulty) {
        return ledger_error(&e);
    }
    info!("difficulty set to {}", ledger.difficulty());
    HttpResponse::Ok().json(DifficultyResponse {
        difficulty: ledger.difficulty(),
    })
}
