pub mod json;
pub mod model;

pub use model::AppConfig;
