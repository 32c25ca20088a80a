//! # vendorank API
//!
//! [`QueryService`] runs one vendor qualification query through the
//! category filter, similarity engine and ranker. [`RestApi`] exposes it over
//! HTTP:
//!
//! - `POST /vendor_qualification` - rank vendors for a category and capability list
//! - `GET /categories` - categories known to the catalog
//! - `GET /health` - liveness, catalog size and embedder in use

pub mod rest;
pub mod service;

pub use rest::RestApi;
pub use service::{QueryOutcome, QueryService, ServiceConfig, ServiceError, VendorMatch, VendorQuery};
