//! keycloak-gate HTTP server.
//!
//! This crate exposes simplified OAuth2 endpoints in front of a Keycloak
//! realm and authenticates API requests by bearer token.

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
