pub mod api_types;
pub mod error;
pub mod routes;
pub mod state;

pub use routes::{build_router, CREATE_DOCUMENT_PATH, HEALTH_PATH};
pub use state::AppState;
