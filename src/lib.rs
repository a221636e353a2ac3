pub mod commands;
pub mod database;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

pub use error::{LifeError, LifeResult};
pub use state::AppState;
