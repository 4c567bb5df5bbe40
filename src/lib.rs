pub mod app;
pub mod cache;
pub mod config;
pub mod errors;
pub mod gateway;
pub mod habits;
pub mod handlers;
pub mod models;
pub mod notify;
pub mod occurrences;
pub mod state;
pub mod traits;

pub use app::router;
pub use config::AppConfig;
pub use state::AppState;
