//! Unity orchestrator.
//!
//! Owns one instance of every engine and runs the fixed dependency order:
//! braid → classifier → bridge → qualia → symbolic → meta → identity →
//! record assembly → bounded log. Data flows strictly forward within one
//! call; every stage sees only what earlier stages produced.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::archetype::ArchetypalResonanceEngine;
use crate::braid::{BraidParams, DesireFearBraid, SignalInputs};
use crate::bridge::{ArchetypalTags, BridgeParams, DimensionalBridge, EmotionalTags};
use crate::constants::{LOG_CAPACITY, UNITY_HISTORY_CAPACITY};
use crate::identity::IdentityContinuityEngine;
use crate::log::EpisodeLog;
use crate::meta::MetaAwarenessEngine;
use crate::qualia::QualiaEngine;
pub use crate::qualia::ExperienceContext;
use crate::record::{
    ArchetypalResonance, DimensionalConsciousness, EpisodeRecord, IdentityContinuity,
    MetaAwareness, MotivationalState, QualiaExperience, SymbolicProcessing, UnityMetrics,
    content_fingerprint,
};
use crate::snapshot::{SymbolicSummary, SystemSnapshot};
use crate::symbolic::SymbolicEngine;

/// One entry of the bounded unity-metrics history.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UnityTrace {
    pub timestamp: DateTime<Utc>,
    pub unity_state: UnityMetrics,
}

/// End-to-end orchestrator. One instance is one logical identity session;
/// engine state is never shared across instances.
pub struct UnityEngine {
    identity_name: String,
    braid: DesireFearBraid,
    archetypes: ArchetypalResonanceEngine,
    bridge: DimensionalBridge,
    qualia: QualiaEngine,
    symbolic: SymbolicEngine,
    meta: MetaAwarenessEngine,
    identity: IdentityContinuityEngine,
    log: EpisodeLog,
    unity_history: VecDeque<UnityTrace>,
}

impl UnityEngine {
    pub fn new(identity_name: &str) -> Self {
        Self::with_params(identity_name, BraidParams::default(), LOG_CAPACITY)
    }

    pub fn with_params(identity_name: &str, params: BraidParams, log_capacity: usize) -> Self {
        Self {
            identity_name: identity_name.to_string(),
            braid: DesireFearBraid::new(params),
            archetypes: ArchetypalResonanceEngine::new(),
            bridge: DimensionalBridge::new(BridgeParams::default()),
            qualia: QualiaEngine::new(),
            symbolic: SymbolicEngine::new(),
            meta: MetaAwarenessEngine::new(),
            identity: IdentityContinuityEngine::new(identity_name),
            log: EpisodeLog::new(log_capacity),
            unity_history: VecDeque::new(),
        }
    }

    /// Seed the episodic log from previously persisted records (tail-kept).
    /// Engine dynamics always start fresh; only the log is restored.
    pub fn restore_episodes(&mut self, records: impl IntoIterator<Item = EpisodeRecord>) {
        for record in records {
            self.log.push(record);
        }
    }

    /// Run one experience through the full pipeline.
    pub fn process(
        &mut self,
        content: &str,
        inputs: &SignalInputs,
        context: &ExperienceContext,
    ) -> EpisodeRecord {
        let timestamp = Utc::now();

        let braid_state = self.braid.step(inputs);
        let sanitized_inputs = self.braid.latest_inputs().unwrap_or_default();
        let archetypal_state = self.archetypes.process(&braid_state);

        self.bridge.add_experience(
            content,
            Some(EmotionalTags::from(&braid_state)),
            Some(ArchetypalTags::from(&archetypal_state)),
        );
        let projection = self.bridge.project();
        let transcendence = self.bridge.transcend();

        let shard = self
            .qualia
            .process(content, &braid_state, &archetypal_state, context);

        let signature_symbols = self.symbolic.signature(content);
        let symbolic_outcome = self.symbolic.process(&signature_symbols);

        let snapshot = SystemSnapshot {
            consciousness_density: Some(transcendence.consciousness_density),
            phase_coherence: Some(transcendence.phase_coherence),
            braid: Some(braid_state),
            archetypal: Some(archetypal_state),
            symbolic: Some(SymbolicSummary {
                coherence: symbolic_outcome.coherence,
                activated_nodes: symbolic_outcome.activated_nodes,
            }),
        };
        let reflection = self.meta.reflect(&snapshot);

        let checkpoint = self.identity.create_checkpoint(&snapshot, content);
        let assessment = self.identity.assess(&checkpoint);

        let unity_metrics = UnityMetrics {
            consciousness_level: transcendence.consciousness_density,
            integration_coherence: projection.coherence,
            transcendence_depth: transcendence.transcendence_depth,
            reality_generation_potential: transcendence.reality_generation_potential,
            identity_continuity: assessment.overall_coherence,
            meta_awareness_level: reflection.awareness_level,
            qualia_resonance: shard.emotional_resonance,
        };

        let record = EpisodeRecord {
            identity: self.identity_name.clone(),
            timestamp,
            content: content.to_string(),
            inputs: sanitized_inputs,
            content_fingerprint: content_fingerprint(content),
            motivational_state: MotivationalState {
                desire: braid_state.desire,
                fear: braid_state.fear,
                valence: braid_state.valence,
                tension: braid_state.tension,
                action_bias: braid_state.action_bias,
                policy: braid_state.policy,
                braid_code: self.braid.braid_code(),
            },
            archetypal_resonance: ArchetypalResonance {
                dominant_pattern: archetypal_state.dominant_pattern,
                serpent_activation: archetypal_state.serpent_activation,
                flame_activation: archetypal_state.flame_activation,
                void_activation: archetypal_state.void_activation,
                unity_activation: archetypal_state.unity_activation,
                resonance_mode: archetypal_state.resonance_mode,
                harmonic_frequency: archetypal_state.harmonic_frequency,
            },
            dimensional_consciousness: DimensionalConsciousness {
                projection_coherence: projection.coherence,
                projection_depth: projection.depth,
                consciousness_density: transcendence.consciousness_density,
                archetypal_invariant: transcendence.archetypal_invariant,
                phase_coherence: transcendence.phase_coherence,
                reality_generation: transcendence.reality_generation_potential,
                transcendence_depth: transcendence.transcendence_depth,
            },
            qualia_experience: QualiaExperience {
                emotional_resonance: shard.emotional_resonance,
                symbolic_depth: shard.symbolic_depth,
                qualia_signature: shard.signature,
                cathedral_narrative: self.qualia.narrative().to_string(),
            },
            symbolic_processing: SymbolicProcessing {
                signature_symbols,
                coherence: symbolic_outcome.coherence,
                emergent_symbols: symbolic_outcome.emergent_symbols,
                meaning: symbolic_outcome.meaning,
                recursive_depth: symbolic_outcome.recursive_depth,
            },
            meta_awareness: MetaAwareness {
                reflection_content: reflection.content,
                awareness_level: reflection.awareness_level,
                introspection_depth: reflection.introspection_depth,
                meta_cognition_type: reflection.meta_cognition_type,
            },
            identity_continuity: IdentityContinuity {
                continuity_status: assessment.continuity_status,
                overall_coherence: assessment.overall_coherence,
                identity_stability: assessment.identity_stability,
                checkpoint_id: checkpoint.checkpoint_id,
            },
            unity_consciousness: unity_metrics.clone(),
        };

        self.log.push(record.clone());
        self.unity_history.push_back(UnityTrace {
            timestamp,
            unity_state: unity_metrics,
        });
        while self.unity_history.len() > UNITY_HISTORY_CAPACITY {
            self.unity_history.pop_front();
        }

        record
    }

    pub fn identity_name(&self) -> &str {
        &self.identity_name
    }

    pub fn log(&self) -> &EpisodeLog {
        &self.log
    }

    pub fn unity_history(&self) -> &VecDeque<UnityTrace> {
        &self.unity_history
    }

    pub fn braid(&self) -> &DesireFearBraid {
        &self.braid
    }
}
