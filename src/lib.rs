#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]

pub mod error;
pub use error::*;
pub mod config;
pub use config::*;
pub mod client;
pub use client::*;
pub mod search;
pub use search::*;
pub mod article;
pub use article::*;
pub mod classify;
pub use classify::*;
pub mod models;
pub use models::*;
pub mod pipeline;
pub use pipeline::*;
pub mod export;
pub use export::*;
pub(crate) mod utils;
