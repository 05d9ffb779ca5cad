//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`]: the catalog of hosted completion models
//! - [`sampling::SamplingConfig`]: per-request generation parameters
//! - [`credential::ApiKey`]: the bearer credential
//! - [`error::DomainError`]: domain-level errors

pub mod credential;
pub mod error;
pub mod model;
pub mod sampling;
