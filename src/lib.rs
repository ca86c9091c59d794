//! Twenty CRM Dashboard Library
//!
//! Backend for the marketing dashboard: a Twenty CRM client that always
//! resolves (remote data or local fallback), static campaign and overview
//! demo data, a Huly project/task client, and the HTTP handlers serving
//! them.
//!
//! # Modules
//!
//! - `api`: API-layer namespace.
//! - `core`: Domain-layer namespace.
//! - `integrations`: External service integrations.
//! - `config`: Configuration management.
//! - `demo`: Static campaign and overview data.
//! - `errors`: Error handling types.
//! - `fallback`: Data substituted when Twenty is unavailable.
//! - `handlers`: HTTP request handlers.
//! - `huly_client`: Huly project and task API client.
//! - `models`: CRM and analytics data models.
//! - `routes`: Router assembly.
//! - `twenty_client`: Twenty CRM API client.

pub mod api;
pub mod core;
pub mod integrations;

pub mod config;
pub mod demo;
pub mod errors;
pub mod fallback;
pub mod handlers;
pub mod huly_client;
pub mod models;
pub mod routes;
pub mod twenty_client;
