use actix_web::{HttpResponse, Responder, post, web};
use log::{debug, info};

use super::ledger_error;
use super::models::{AppState, MessageResponse, MineRequest, MineResponse};

/// Submit a proof for the current last block.
///
/// Verification and append happen under one ledger lock, so two miners
/// racing on the same head cannot both extend it.
#[post("/mine")]
pub async fn mine(state: web::Data<AppState>, req: web::Json<MineRequest>) -> impl Responder {
    let miner_id = req.id.trim();
    if miner_id.is_empty() {
        return HttpResponse::BadRequest().json(MessageResponse {
            message: "proof and id are required".to_string(),
        });
    }
    debug!("MINE - proof {} submitted by {}", req.proof, miner_id);

    let mut ledger = state.ledger.lock().expect("mutex poisoned");
    match ledger.verify_and_append(req.proof, req.previous_hash.as_deref()) {
        Ok(block) => {
            info!("MINE - block #{} credited to {}", block.index, miner_id);
            HttpResponse::Ok().json(MineResponse {
                message: "New Block Forged",
                block,
            })
        }
        Err(e) => ledger_error(&e),
    }
}
