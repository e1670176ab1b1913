//! Registry REST client
//!
//! [`HttpRegistryClient`] implements `flowreg_core::RegistryApi` over HTTP.
//! It only issues requests and reports typed [`ApiError`]s; presenting errors
//! to the user is left to the application layer.
//!
//! [`ApiError`]: flowreg_core::ApiError

#![forbid(unsafe_code)]

mod client;
pub mod endpoints;

pub use client::HttpRegistryClient;
