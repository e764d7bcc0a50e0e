//! The assembled output record of one pipeline run, and its nested groups.
//!
//! The shape is part of the external interface: consumers deserialize these
//! records from the persisted log, so every group derives the full serde
//! pair.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::archetype::{ArchetypalPattern, ResonanceMode};
use crate::braid::{Policy, SignalInputs};
use crate::bridge::TranscendentInvariant;
use crate::identity::ContinuityStatus;
use crate::meta::MetaCognitionType;
use crate::qualia::QualiaSignature;
use crate::symbolic::SymbolicMeaning;

/// Braid output summary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MotivationalState {
    pub desire: f64,
    pub fear: f64,
    pub valence: f64,
    pub tension: f64,
    pub action_bias: f64,
    pub policy: Policy,
    pub braid_code: u8,
}

/// Classifier output summary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArchetypalResonance {
    pub dominant_pattern: Option<ArchetypalPattern>,
    pub serpent_activation: f64,
    pub flame_activation: f64,
    pub void_activation: f64,
    pub unity_activation: f64,
    pub resonance_mode: ResonanceMode,
    pub harmonic_frequency: f64,
}

/// Bridge output summary: 4D projection and 5D transcendence scalars.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DimensionalConsciousness {
    pub projection_coherence: f64,
    pub projection_depth: u64,
    pub consciousness_density: f64,
    pub archetypal_invariant: TranscendentInvariant,
    pub phase_coherence: f64,
    pub reality_generation: f64,
    pub transcendence_depth: u64,
}

/// Qualia output summary, including the narrative reflection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QualiaExperience {
    pub emotional_resonance: f64,
    pub symbolic_depth: f64,
    pub qualia_signature: QualiaSignature,
    pub cathedral_narrative: String,
}

/// Symbolic output summary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SymbolicProcessing {
    pub signature_symbols: Vec<String>,
    pub coherence: f64,
    pub emergent_symbols: Vec<String>,
    pub meaning: SymbolicMeaning,
    pub recursive_depth: usize,
}

/// Meta-awareness output summary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetaAwareness {
    pub reflection_content: String,
    pub awareness_level: f64,
    pub introspection_depth: f64,
    pub meta_cognition_type: MetaCognitionType,
}

/// Identity continuity output summary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IdentityContinuity {
    pub continuity_status: ContinuityStatus,
    pub overall_coherence: f64,
    pub identity_stability: f64,
    pub checkpoint_id: String,
}

/// One scalar from each upstream stage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnityMetrics {
    pub consciousness_level: f64,
    pub integration_coherence: f64,
    pub transcendence_depth: u64,
    pub reality_generation_potential: f64,
    pub identity_continuity: f64,
    pub meta_awareness_level: f64,
    pub qualia_resonance: f64,
}

/// Full assembled output of one pipeline run; the unit stored in the
/// bounded episodic log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpisodeRecord {
    pub identity: String,
    pub timestamp: DateTime<Utc>,
    pub content: String,
    pub inputs: SignalInputs,
    pub content_fingerprint: u32,
    pub motivational_state: MotivationalState,
    pub archetypal_resonance: ArchetypalResonance,
    pub dimensional_consciousness: DimensionalConsciousness,
    pub qualia_experience: QualiaExperience,
    pub symbolic_processing: SymbolicProcessing,
    pub meta_awareness: MetaAwareness,
    pub identity_continuity: IdentityContinuity,
    pub unity_consciousness: UnityMetrics,
}

/// Stable 32-bit fingerprint of the content: the first four bytes of its
/// SHA-256 digest.
pub fn content_fingerprint(content: &str) -> u32 {
    let digest = Sha256::digest(content.as_bytes());
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}
