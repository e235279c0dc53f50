pub mod app;
pub mod error;
pub mod middleware;
pub mod theme;

pub use app::{build_app, AppState};
pub use error::HttpError;
