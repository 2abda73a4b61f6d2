// crates/dust-config/src/lib.rs
// ============================================================================
// Module: DUST Config Library
// Description: Configuration model and validation for the audit engine.
// Purpose: Single source of truth for dust.toml semantics.
// Dependencies: dust-core, serde, toml
// ============================================================================

//! ## Overview
//! `dust-config` loads `dust.toml`, validates it fail-closed, and converts it
//! into the [`dust_core::AuditSettings`] consumed by the rule tables. It also
//! selects the audit log sink.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
