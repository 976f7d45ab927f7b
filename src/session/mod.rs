mod store;
mod types;

pub use store::BrandContextStore;
pub use types::{BrandContext, generate_session_id};
