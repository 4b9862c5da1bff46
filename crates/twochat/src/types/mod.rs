//! Types for the 2Chat API and its webhooks.

mod api;
mod webhook;

pub use api::*;
pub use webhook::*;
