#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::new_without_default
)]

pub mod api;
pub mod client;
pub mod config;
pub mod gateway;
pub mod generate;
pub mod prompt;
pub mod providers;
pub mod session;
pub mod validate;

pub use config::Config;
