pub mod error;
pub mod openai;
pub mod traits;
pub mod types;

pub use error::CompletionError;
pub use openai::OpenAiBackend;
pub use traits::CompletionBackend;
pub use types::{ChatTurn, CompletionOptions, TurnRole};
