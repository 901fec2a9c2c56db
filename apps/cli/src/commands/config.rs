//! # Config Commands

use std::path::PathBuf;

use serde::Serialize;
use tracing::debug;

use crate::state::ConfigState;

/// Effective configuration as shown to the operator. The admin password
/// is never printed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigResponse {
    pub store_name: String,
    pub currency_code: String,
    pub currency_symbol: String,
    pub currency_decimals: u8,
    pub db_path: PathBuf,
    pub password_is_default: bool,
}

/// Gets the current application configuration.
pub fn get_config(config: &ConfigState, db_path: PathBuf) -> ConfigResponse {
    debug!("get_config command");

    ConfigResponse {
        store_name: config.store_name.clone(),
        currency_code: config.currency_code.clone(),
        currency_symbol: config.currency_symbol.clone(),
        currency_decimals: config.currency_decimals,
        db_path,
        password_is_default: config.admin_password == ConfigState::default().admin_password,
    }
}
