mod models;
mod state;
mod objects;
mod health;

pub use models::AppState;
pub use objects::{delete_object, delete_prefix, get_object, put_object, upload};
pub use health::health;
