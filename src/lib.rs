pub mod app;
pub mod config;
pub mod daily_values;
pub mod errors;
pub mod handlers;
pub mod intake;
pub mod models;
pub mod registry;
pub mod state;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use registry::Registry;
pub use state::AppState;
