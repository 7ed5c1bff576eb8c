pub mod config;
pub mod error;
pub mod routes;
pub mod store;

pub use config::{Args, ServerConfig};
pub use error::ApiError;
pub use routes::{AppState, create_router};
pub use store::{GameEntry, GameStore, MemoryGameStore};
