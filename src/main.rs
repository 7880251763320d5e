use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;
use log::info;

use proof_ledger::api::{self, AppState};
use proof_ledger::config::Config;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let config = Config::from_env();
    let state = AppState::new(config.difficulty).map_err(std::io::Error::other)?;
    let state = web::Data::new(state);

    info!(
        "⛓️ Starting ledger node {} at http://{}:{} (difficulty={})",
        state.node_id, config.host, config.port, config.difficulty
    );

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::init_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
