//! Core types and utilities for keycloak-gate.
//!
//! This crate provides the foundational types shared by the access library
//! and the HTTP server: the rootcause-based `Result` alias and the
//! `AccessToken` credential wrapper.

pub mod error;
pub mod token;

pub use error::Result;
pub use token::AccessToken;
