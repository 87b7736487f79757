//! Shared utilities for the passenger report workspace.
//!
//! This crate provides field-level validation used by the domain models
//! and by the reporter when it loads an extract.

pub mod validation;
