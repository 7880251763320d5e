use serde::{Deserialize, Serialize};
use std::sync::Mutex;

use crate::blockchain::{Block, Ledger, LedgerError};

/// Shared application state: one ledger per process plus this node's identity.
pub struct AppState {
    pub ledger: Mutex<Ledger>,
    pub node_id: String,
}

impl AppState {
    pub fn new(difficulty: u32) -> Result<Self, LedgerError> {
        Ok(Self {
            ledger: Mutex::new(Ledger::new(difficulty)?),
            node_id: uuid::Uuid::new_v4().simple().to_string(),
        })
    }
}

/* ---------- Chain API Models ---------- */

#[derive(Serialize)]
pub struct ChainResponse<'a> {
    pub length: usize,
    pub chain: &'a [Block],
}

#[derive(Serialize)]
pub struct LastBlockResponse<'a> {
    pub block: &'a Block,
}

#[derive(Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub length: usize,
}

#[derive(Serialize)]
pub struct DifficultyResponse {
    pub difficulty: u32,
}

#[derive(Deserialize)]
pub struct SetDifficultyRequest {
    pub difficulty: u32,
}

/* ---------- Mining API Models ---------- */

#[derive(Deserialize)]
pub struct MineRequest {
    pub proof: u128,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub previous_hash: Option<String>,
}

#[derive(Serialize)]
pub struct MineResponse<'a> {
    pub message: &'static str,
    pub block: &'a Block,
}

/* ---------- TX API Models ---------- */

#[derive(Serialize)]
pub struct NewTxResponse {
    pub message: String,
    pub index: u64,
}

#[derive(Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub node_id: String,
}
