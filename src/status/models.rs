// src/status/models.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(FromRow, Serialize, Deserialize, Debug, Clone)]
pub struct StatusCheck {
    pub id: String,
    pub client_name: String,
    pub timestamp: String,
}

#[derive(Deserialize, Debug)]
pub struct CreateStatusCheck {
    pub client_name: String,
}
