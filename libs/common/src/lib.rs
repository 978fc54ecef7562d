//! Common library for the marketplace services
//!
//! This crate provides shared functionality used by the auth and api
//! services: database and cache connectivity, the user role model, the
//! authorization predicates, JWT claims verification, slug and username
//! derivation, and field-scoped validation errors.

pub mod cache;
pub mod database;
pub mod error;
pub mod permissions;
pub mod role;
pub mod settings;
pub mod slug;
pub mod token;
pub mod validation;

pub use permissions::{Action, Policy, Principal};
pub use role::Role;
pub use validation::FieldErrors;
