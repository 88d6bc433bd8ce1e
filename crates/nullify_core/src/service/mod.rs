//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate registry lookups and repository calls into use-case
//!   level APIs.
//! - Keep callers decoupled from storage details.

pub mod record_service;
