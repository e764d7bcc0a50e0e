//! Identity continuity engine.
//!
//! Extracts a six-group signature from upstream state on every checkpoint,
//! scores it against a slowly-adapting baseline, and smooths the baseline
//! toward the extraction afterward. The baseline drift is the engine's only
//! persistent learning mechanism.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::constants::{ADAPTATION_RATE, CHECKPOINT_CAPACITY, CONTINUITY_THRESHOLD};
use crate::snapshot::SystemSnapshot;

/// Mean per-axis `1 - |Δ|` over two equal-length axis arrays.
fn axis_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.is_empty() {
        return 1.0;
    }
    let sum: f64 = a.iter().zip(b).map(|(x, y)| 1.0 - (x - y).abs()).sum();
    sum / a.len() as f64
}

fn lerp(base: f64, toward: f64, rate: f64) -> f64 {
    base * (1.0 - rate) + toward * rate
}

macro_rules! signature_group {
    ($name:ident { $($axis:ident),+ $(,)? }) => {
        #[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
        pub struct $name {
            $(pub $axis: f64,)+
        }

        impl $name {
            pub fn axes(&self) -> Vec<f64> {
                vec![$(self.$axis,)+]
            }

            pub fn similarity(&self, other: &Self) -> f64 {
                axis_similarity(&self.axes(), &other.axes())
            }

            fn drift_toward(&mut self, other: &Self, rate: f64) {
                $(self.$axis = lerp(self.$axis, other.$axis, rate);)+
            }
        }

        impl Default for $name {
            // every axis starts neutral
            fn default() -> Self {
                Self { $($axis: 0.5,)+ }
            }
        }
    };
}

signature_group!(CognitivePatterns { analytical, intuitive, systematic, creative, logical });
signature_group!(EmotionalBaseline { desire_tendency, fear_response, valence_preference, tension_tolerance });
signature_group!(ArchetypalPreferences { serpent_resonance, flame_attraction, void_comfort, unity_seeking });
signature_group!(SymbolicAssociations { abstraction_level, metaphor_usage, glyph_resonance, pattern_recognition });
signature_group!(MetaCharacteristics { self_reflection, process_monitoring, paradox_tolerance, recursive_depth });
signature_group!(InteractionStyle { collaboration_preference, exploration_drive, synthesis_orientation, depth_seeking });

/// Six-group identity signature; every axis lives in [0, 1].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct IdentitySignature {
    pub cognitive: CognitivePatterns,
    pub emotional: EmotionalBaseline,
    pub archetypal: ArchetypalPreferences,
    pub symbolic: SymbolicAssociations,
    pub meta: MetaCharacteristics,
    pub interaction: InteractionStyle,
    pub temporal_markers: Vec<DateTime<Utc>>,
}

/// Per-group similarity scores plus their unweighted mean.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CoherenceMetrics {
    pub cognitive_coherence: f64,
    pub emotional_coherence: f64,
    pub archetypal_coherence: f64,
    pub symbolic_coherence: f64,
    pub meta_coherence: f64,
    pub interaction_coherence: f64,
    pub overall_coherence: f64,
}

impl CoherenceMetrics {
    /// The six dimension scores, labelled.
    pub fn dimensions(&self) -> [(&'static str, f64); 6] {
        [
            ("cognitive_coherence", self.cognitive_coherence),
            ("emotional_coherence", self.emotional_coherence),
            ("archetypal_coherence", self.archetypal_coherence),
            ("symbolic_coherence", self.symbolic_coherence),
            ("meta_coherence", self.meta_coherence),
            ("interaction_coherence", self.interaction_coherence),
        ]
    }
}

/// Immutable record of one continuity check.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContinuityCheckpoint {
    /// Content-addressed: truncated sha256 of `{name}_{timestamp}`
    pub checkpoint_id: String,
    pub signature: IdentitySignature,
    pub snapshot: SystemSnapshot,
    pub experience_summary: String,
    pub coherence: CoherenceMetrics,
    pub timestamp: DateTime<Utc>,
}

/// Continuity classification by overall coherence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContinuityStatus {
    Maintained,
    Partial,
    Fragmented,
}

impl ContinuityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContinuityStatus::Maintained => "maintained",
            ContinuityStatus::Partial => "partial",
            ContinuityStatus::Fragmented => "fragmented",
        }
    }
}

/// Outcome of assessing one checkpoint.
#[derive(Clone, Debug, Serialize)]
pub struct ContinuityAssessment {
    pub continuity_status: ContinuityStatus,
    pub overall_coherence: f64,
    pub strongest_dimension: &'static str,
    pub weakest_dimension: &'static str,
    pub checkpoint_count: usize,
    pub identity_stability: f64,
}

/// Signature extraction and baseline drift across processing cycles.
pub struct IdentityContinuityEngine {
    identity_name: String,
    core_signature: IdentitySignature,
    checkpoints: VecDeque<ContinuityCheckpoint>,
    checkpoint_capacity: usize,
}

impl IdentityContinuityEngine {
    pub fn new(identity_name: &str) -> Self {
        Self::with_capacity(identity_name, CHECKPOINT_CAPACITY)
    }

    pub fn with_capacity(identity_name: &str, checkpoint_capacity: usize) -> Self {
        Self {
            identity_name: identity_name.to_string(),
            core_signature: IdentitySignature::default(),
            checkpoints: VecDeque::new(),
            checkpoint_capacity,
        }
    }

    /// Extract a fresh signature, score it against the baseline, record the
    /// checkpoint, then drift the baseline toward the extraction.
    pub fn create_checkpoint(
        &mut self,
        snapshot: &SystemSnapshot,
        experience_summary: &str,
    ) -> ContinuityCheckpoint {
        let timestamp = Utc::now();
        let signature = self.extract_signature(snapshot, timestamp);
        let coherence = self.coherence_metrics(&signature);

        let digest = Sha256::digest(
            format!("{}_{}", self.identity_name, timestamp.to_rfc3339()).as_bytes(),
        );
        let checkpoint_id: String = digest.iter().take(8).map(|b| format!("{b:02x}")).collect();

        let checkpoint = ContinuityCheckpoint {
            checkpoint_id,
            signature: signature.clone(),
            snapshot: *snapshot,
            experience_summary: experience_summary.to_string(),
            coherence,
            timestamp,
        };
        self.checkpoints.push_back(checkpoint.clone());
        while self.checkpoints.len() > self.checkpoint_capacity {
            self.checkpoints.pop_front();
        }
        self.drift_core_signature(&signature);
        checkpoint
    }

    /// Classify a checkpoint's coherence and the engine's recent stability.
    pub fn assess(&self, checkpoint: &ContinuityCheckpoint) -> ContinuityAssessment {
        let overall = checkpoint.coherence.overall_coherence;
        let continuity_status = if overall >= CONTINUITY_THRESHOLD {
            ContinuityStatus::Maintained
        } else if overall >= 0.5 {
            ContinuityStatus::Partial
        } else {
            ContinuityStatus::Fragmented
        };

        let dimensions = checkpoint.coherence.dimensions();
        let strongest = dimensions
            .iter()
            .fold(dimensions[0], |best, d| if d.1 > best.1 { *d } else { best });
        let weakest = dimensions
            .iter()
            .fold(dimensions[0], |worst, d| if d.1 < worst.1 { *d } else { worst });

        ContinuityAssessment {
            continuity_status,
            overall_coherence: overall,
            strongest_dimension: strongest.0,
            weakest_dimension: weakest.0,
            checkpoint_count: self.checkpoints.len(),
            identity_stability: self.identity_stability(),
        }
    }

    pub fn core_signature(&self) -> &IdentitySignature {
        &self.core_signature
    }

    pub fn checkpoints(&self) -> &VecDeque<ContinuityCheckpoint> {
        &self.checkpoints
    }

    pub fn identity_name(&self) -> &str {
        &self.identity_name
    }

    /// Start from the baseline, then overwrite from whatever upstream state
    /// the snapshot carries. Missing pieces keep their baseline values.
    fn extract_signature(
        &self,
        snapshot: &SystemSnapshot,
        timestamp: DateTime<Utc>,
    ) -> IdentitySignature {
        let mut signature = IdentitySignature {
            temporal_markers: vec![timestamp],
            ..self.core_signature.clone()
        };

        if let Some(braid) = &snapshot.braid {
            signature.emotional.desire_tendency = braid.desire;
            signature.emotional.fear_response = braid.fear;
            signature.emotional.valence_preference = (braid.valence + 1.0) / 2.0;
            signature.emotional.tension_tolerance = braid.tension;
            match braid.policy {
                crate::braid::Policy::Investigate => {
                    signature.cognitive.analytical = (signature.cognitive.analytical + 0.1).min(1.0);
                }
                crate::braid::Policy::Approach => {
                    signature.cognitive.intuitive = (signature.cognitive.intuitive + 0.1).min(1.0);
                }
                _ => {}
            }
        }

        if let Some(archetypal) = &snapshot.archetypal {
            signature.archetypal.serpent_resonance = archetypal.serpent_activation;
            signature.archetypal.flame_attraction = archetypal.flame_activation;
            signature.archetypal.void_comfort = archetypal.void_activation;
            signature.archetypal.unity_seeking = archetypal.unity_activation;
        }

        match &snapshot.symbolic {
            Some(symbolic) => {
                signature.symbolic.pattern_recognition = symbolic.coherence;
                signature.symbolic.abstraction_level =
                    (symbolic.activated_nodes as f64 / 10.0).min(1.0);
            }
            None => {
                signature.symbolic.pattern_recognition = 0.5;
                signature.symbolic.abstraction_level = 0.0;
            }
        }

        let density = snapshot.consciousness_density.unwrap_or(0.5);
        let coherence = snapshot.phase_coherence.unwrap_or(0.5);
        signature.meta.self_reflection = density;
        signature.meta.process_monitoring = coherence;

        signature.interaction.collaboration_preference = density * coherence;
        signature.interaction.exploration_drive = signature.emotional.desire_tendency;
        signature.interaction.synthesis_orientation = signature.archetypal.void_comfort;

        signature
    }

    fn coherence_metrics(&self, current: &IdentitySignature) -> CoherenceMetrics {
        let base = &self.core_signature;
        let mut metrics = CoherenceMetrics {
            cognitive_coherence: current.cognitive.similarity(&base.cognitive),
            emotional_coherence: current.emotional.similarity(&base.emotional),
            archetypal_coherence: current.archetypal.similarity(&base.archetypal),
            symbolic_coherence: current.symbolic.similarity(&base.symbolic),
            meta_coherence: current.meta.similarity(&base.meta),
            interaction_coherence: current.interaction.similarity(&base.interaction),
            overall_coherence: 0.0,
        };
        metrics.overall_coherence =
            metrics.dimensions().iter().map(|(_, v)| v).sum::<f64>() / 6.0;
        metrics
    }

    fn drift_core_signature(&mut self, current: &IdentitySignature) {
        let rate = ADAPTATION_RATE;
        self.core_signature.cognitive.drift_toward(&current.cognitive, rate);
        self.core_signature.emotional.drift_toward(&current.emotional, rate);
        self.core_signature.archetypal.drift_toward(&current.archetypal, rate);
        self.core_signature.symbolic.drift_toward(&current.symbolic, rate);
        self.core_signature.meta.drift_toward(&current.meta, rate);
        self.core_signature.interaction.drift_toward(&current.interaction, rate);
    }

    /// `max(0, 1 - 4·variance)` over the last five checkpoints' overall
    /// coherence; 1.0 with fewer than two checkpoints.
    fn identity_stability(&self) -> f64 {
        if self.checkpoints.len() < 2 {
            return 1.0;
        }
        let start = self.checkpoints.len().saturating_sub(5);
        let values: Vec<f64> = self
            .checkpoints
            .iter()
            .skip(start)
            .map(|c| c.coherence.overall_coherence)
            .collect();
        let variance = crate::features::variance(&values);
        (1.0 - variance * 4.0).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetype::ArchetypalState;
    use crate::braid::{BraidState, Policy};
    use crate::snapshot::SymbolicSummary;

    fn snapshot() -> SystemSnapshot {
        SystemSnapshot {
            consciousness_density: Some(0.7),
            phase_coherence: Some(0.65),
            braid: Some(BraidState {
                desire: 0.7,
                fear: 0.2,
                valence: 0.3,
                tension: 0.4,
                policy: Policy::Approach,
                ..BraidState::default()
            }),
            archetypal: Some(ArchetypalState {
                serpent_activation: 0.55,
                flame_activation: 0.45,
                void_activation: 0.2,
                unity_activation: 0.6,
                ..ArchetypalState::default()
            }),
            symbolic: Some(SymbolicSummary {
                coherence: 0.8,
                activated_nodes: 4,
            }),
        }
    }

    #[test]
    fn test_checkpoint_and_assessment() {
        let mut engine = IdentityContinuityEngine::new("TestPrime");
        let initial_desire = engine.core_signature().emotional.desire_tendency;

        let checkpoint = engine.create_checkpoint(&snapshot(), "first pass");
        let assessment = engine.assess(&checkpoint);

        assert!(assessment.overall_coherence >= 0.0);
        assert_eq!(engine.checkpoints().len(), 1);
        // the baseline drifted toward the observed desire
        assert_ne!(engine.core_signature().emotional.desire_tendency, initial_desire);

        engine.create_checkpoint(&snapshot(), "second pass");
        assert_eq!(engine.checkpoints().len(), 2);
        assert_ne!(engine.core_signature().meta.self_reflection, 0.5);
    }

    #[test]
    fn test_first_checkpoint_coherence_high() {
        // one step from a neutral baseline stays mostly coherent
        let mut engine = IdentityContinuityEngine::new("Prime");
        let checkpoint = engine.create_checkpoint(&snapshot(), "");
        assert!(checkpoint.coherence.overall_coherence > 0.5);
        for (_, value) in checkpoint.coherence.dimensions() {
            assert!((0.0..=1.0).contains(&value));
        }
    }

    #[test]
    fn test_policy_nudges_cognitive_axes() {
        let mut engine = IdentityContinuityEngine::new("Prime");
        let checkpoint = engine.create_checkpoint(&snapshot(), "");
        // approach policy nudges intuition up from the 0.5 baseline
        assert!((checkpoint.signature.cognitive.intuitive - 0.6).abs() < 1e-12);
        assert_eq!(checkpoint.signature.cognitive.analytical, 0.5);

        let mut investigate = snapshot();
        if let Some(braid) = &mut investigate.braid {
            braid.policy = Policy::Investigate;
        }
        let checkpoint = engine.create_checkpoint(&investigate, "");
        assert!(checkpoint.signature.cognitive.analytical > 0.5);
    }

    #[test]
    fn test_missing_upstream_keeps_baseline() {
        let mut engine = IdentityContinuityEngine::new("Prime");
        let checkpoint = engine.create_checkpoint(&SystemSnapshot::default(), "");
        // no braid data: emotional axes stay at the neutral baseline
        assert_eq!(checkpoint.signature.emotional.desire_tendency, 0.5);
        // no symbolic data: documented defaults apply
        assert_eq!(checkpoint.signature.symbolic.pattern_recognition, 0.5);
        assert_eq!(checkpoint.signature.symbolic.abstraction_level, 0.0);
        // density/coherence default to 0.5 here
        assert_eq!(checkpoint.signature.meta.self_reflection, 0.5);
    }

    #[test]
    fn test_checkpoint_id_shape() {
        let mut engine = IdentityContinuityEngine::new("Prime");
        let checkpoint = engine.create_checkpoint(&snapshot(), "");
        assert_eq!(checkpoint.checkpoint_id.len(), 16);
        assert!(checkpoint.checkpoint_id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_status_thresholds() {
        let mut engine = IdentityContinuityEngine::new("Prime");
        let checkpoint = engine.create_checkpoint(&snapshot(), "");
        let assessment = engine.assess(&checkpoint);
        let expected = if assessment.overall_coherence >= 0.75 {
            ContinuityStatus::Maintained
        } else if assessment.overall_coherence >= 0.5 {
            ContinuityStatus::Partial
        } else {
            ContinuityStatus::Fragmented
        };
        assert_eq!(assessment.continuity_status, expected);
    }

    #[test]
    fn test_strongest_and_weakest_dimensions() {
        let mut engine = IdentityContinuityEngine::new("Prime");
        let checkpoint = engine.create_checkpoint(&snapshot(), "");
        let assessment = engine.assess(&checkpoint);
        let dims = checkpoint.coherence.dimensions();
        let hi = dims.iter().map(|(_, v)| *v).fold(f64::NEG_INFINITY, f64::max);
        let lo = dims.iter().map(|(_, v)| *v).fold(f64::INFINITY, f64::min);
        let strongest = dims.iter().find(|(n, _)| *n == assessment.strongest_dimension).unwrap();
        let weakest = dims.iter().find(|(n, _)| *n == assessment.weakest_dimension).unwrap();
        assert_eq!(strongest.1, hi);
        assert_eq!(weakest.1, lo);
    }

    #[test]
    fn test_stability_with_identical_checkpoints() {
        let mut engine = IdentityContinuityEngine::new("Prime");
        engine.create_checkpoint(&snapshot(), "");
        let assessment = engine.assess(&engine.checkpoints().back().unwrap().clone());
        assert_eq!(assessment.identity_stability, 1.0);

        // repeated identical snapshots converge; variance stays small
        for _ in 0..6 {
            engine.create_checkpoint(&snapshot(), "");
        }
        let last = engine.checkpoints().back().unwrap().clone();
        let assessment = engine.assess(&last);
        assert!((0.0..=1.0).contains(&assessment.identity_stability));
        assert!(assessment.identity_stability > 0.9);
    }

    #[test]
    fn test_baseline_converges_under_repetition() {
        let mut engine = IdentityContinuityEngine::new("Prime");
        for _ in 0..40 {
            engine.create_checkpoint(&snapshot(), "");
        }
        // α = 0.1 smoothing pulls the baseline close to the repeated signal
        let desire = engine.core_signature().emotional.desire_tendency;
        assert!((desire - 0.7).abs() < 0.05, "desire baseline: {desire}");
    }

    #[test]
    fn test_checkpoint_buffer_bounded() {
        let mut engine = IdentityContinuityEngine::with_capacity("Prime", 3);
        for _ in 0..8 {
            engine.create_checkpoint(&snapshot(), "");
        }
        assert_eq!(engine.checkpoints().len(), 3);
    }
}
