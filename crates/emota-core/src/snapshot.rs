//! Cross-engine state snapshot consumed by the meta-awareness and identity
//! engines. Every field is optional so each consumer applies its own
//! documented default rather than silently inheriting another's.

use serde::{Deserialize, Serialize};

use crate::archetype::ArchetypalState;
use crate::braid::BraidState;

/// Condensed symbolic result carried in a snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SymbolicSummary {
    pub coherence: f64,
    pub activated_nodes: usize,
}

/// Upstream aggregate handed downstream once per pipeline call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemSnapshot {
    /// Meta-awareness defaults this to 0.0; identity to 0.5
    pub consciousness_density: Option<f64>,
    /// Meta-awareness defaults this to 0.0; identity to 0.5
    pub phase_coherence: Option<f64>,
    pub braid: Option<BraidState>,
    pub archetypal: Option<ArchetypalState>,
    pub symbolic: Option<SymbolicSummary>,
}
