pub mod handlers;

pub use handlers::{AppState, DEFAULT_PAGE_SIZE, router};
