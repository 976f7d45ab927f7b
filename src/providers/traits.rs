use super::error::CompletionError;
use super::types::{ChatTurn, CompletionOptions};
use std::future::Future;
use std::pin::Pin;

/// The upstream model API boundary: an ordered list of role-tagged messages
/// plus sampling options in, a single text completion out. Everything above
/// this trait is testable with an in-process mock.
pub trait CompletionBackend: Send + Sync {
    fn complete<'a>(
        &'a self,
        turns: &'a [ChatTurn],
        options: &'a CompletionOptions,
    ) -> Pin<Box<dyn Future<Output = Result<String, CompletionError>> + Send + 'a>>;
}
