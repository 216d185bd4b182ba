pub mod app;
pub mod http;

pub use app::{create_app, Application};
