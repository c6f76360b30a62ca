//! A small pastebin: submit text, get a short URL back.

use std::sync::Arc;

pub mod commands;
pub mod config;
pub mod controllers;
pub mod db;
pub mod error;
pub mod keygen;
pub mod models;
pub mod render;
pub mod types;

pub use error::{ApiError, ApiResult};

use config::Config;
use db::Database;
use keygen::{HexKeys, KeyGenerator};

/// Everything a request handler needs, cloned into each request.
#[derive(Clone)]
pub struct App {
    pub config: Arc<Config>,
    pub database: Database,
    pub keys: Arc<dyn KeyGenerator>,
}

impl App {
    pub fn new(config: Config, database: Database) -> Self {
        Self::with_keys(config, database, Arc::new(HexKeys))
    }

    pub fn with_keys(config: Config, database: Database, keys: Arc<dyn KeyGenerator>) -> Self {
        App {
            config: Arc::new(config),
            database,
            keys,
        }
    }
}
