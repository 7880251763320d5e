mod chain;
mod health;
mod mining;
pub mod models;
mod tx;

use actix_web::HttpResponse;
use actix_web::web::ServiceConfig;
use log::error;

use crate::blockchain::LedgerError;
pub use models::AppState;
use models::MessageResponse;

pub fn init_routes(cfg: &mut ServiceConfig) {
    cfg.service(health::health_check)
        .service(chain::get_chain)
        .service(chain::get_last_block)
        .service(chain::validate_chain)
        .service(chain::get_difficulty)
        .service(chain::set_difficulty)
        .service(mining::mine)
        .service(tx::new_transaction);
}

/// Map a ledger error onto an HTTP response: retryable rejections are the
/// client's problem, invariant faults are ours.
fn ledger_error(err: &LedgerError) -> HttpResponse {
    let body = MessageResponse {
        message: err.to_string(),
    };
    if err.is_recoverable() {
        HttpResponse::BadRequest().json(body)
    } else {
        error!("ledger invariant violated: {}", err);
        HttpResponse::InternalServerError().json(body)
    }
}
