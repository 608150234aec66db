//! Client for the expense REST backend.
//!
//! All expense, category and account data lives in the backend. The client
//! sends the user's bearer token with each request and converts the backend's
//! JSON into the crate's models.

mod client;
mod wire;

pub use client::{ApiClient, DEFAULT_API_URL, DEFAULT_REQUEST_TIMEOUT};
pub use wire::{Credentials, NewUser, TokenPair};
