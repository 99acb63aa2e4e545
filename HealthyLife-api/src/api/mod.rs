pub mod handlers;
pub mod locale;
pub mod routes;

pub use routes::{create_app, create_state, AppState};
