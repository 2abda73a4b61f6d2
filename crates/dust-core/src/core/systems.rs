// crates/dust-core/src/core/systems.rs
// ============================================================================
// Module: DUST System Names
// Description: Closed set of backend systems known to the audit engine.
// Purpose: Replace string-keyed validator lookup with typed dispatch.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! The supported backend systems are fixed at build time. Names parse
//! case-insensitively from their slug (`"AD"` and `"ad"` are the same
//! system); anything else is rejected with [`UnknownSystemError`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: System Name
// ============================================================================

/// Backend system holding a copy of the user's identity.
///
/// # Invariants
/// - Slugs are lowercase ASCII and stable; test ids are prefixed with them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemName {
    /// On-premises Active Directory.
    Ad,
    /// Azure Active Directory.
    Aad,
    /// FEIDE identity federation.
    Feide,
    /// Visma HR roster.
    Visma,
    /// PIFU student roster.
    Pifu,
    /// School Data Sync.
    Sds,
    /// Visma InSchool.
    Vis,
    /// Directory synchronisation status.
    Sync,
    /// Equitrac print accounting.
    Equitrac,
    /// Vigo follow-up service.
    #[serde(rename = "vigoot")]
    VigoOt,
    /// Vigo apprenticeship records.
    #[serde(rename = "vigolaerling")]
    VigoLaerling,
    /// Public 360 archive.
    P360,
}

impl SystemName {
    /// Every supported system in slug order of declaration.
    pub const ALL: [Self; 12] = [
        Self::Ad,
        Self::Aad,
        Self::Feide,
        Self::Visma,
        Self::Pifu,
        Self::Sds,
        Self::Vis,
        Self::Sync,
        Self::Equitrac,
        Self::VigoOt,
        Self::VigoLaerling,
        Self::P360,
    ];

    /// Returns the stable slug for the system.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ad => "ad",
            Self::Aad => "aad",
            Self::Feide => "feide",
            Self::Visma => "visma",
            Self::Pifu => "pifu",
            Self::Sds => "sds",
            Self::Vis => "vis",
            Self::Sync => "sync",
            Self::Equitrac => "equitrac",
            Self::VigoOt => "vigoot",
            Self::VigoLaerling => "vigolaerling",
            Self::P360 => "p360",
        }
    }

    /// Returns true for roster systems whose snapshot may hold many records.
    #[must_use]
    pub const fn is_roster(self) -> bool {
        matches!(self, Self::Visma | Self::Pifu)
    }
}

impl fmt::Display for SystemName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a system name is not part of the supported set.
///
/// # Invariants
/// - `name` is the raw, unnormalized input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no matching system found: {name}")]
pub struct UnknownSystemError {
    /// Name that failed to resolve.
    pub name: String,
}

impl FromStr for SystemName {
    type Err = UnknownSystemError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|system| system.as_str() == normalized).ok_or_else(|| {
            UnknownSystemError {
                name: value.to_string(),
            }
        })
    }
}
