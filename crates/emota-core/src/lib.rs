//! EMOTA affective/cognitive scoring pipeline.
//!
//! Converts free-form text plus a handful of bounded numeric signals into a
//! structured record describing the state of a simulated affective system.
//! Several independently-stateful engines — a coupled desire/fear braid, an
//! archetypal resonance classifier, a two-stage dimensional bridge, a qualia
//! mapper, a symbolic graph, meta-awareness and identity continuity — are
//! composed into one orchestrated transform with strict forward data flow.
//!
//! Zero I/O — pure math engines with no opinions about transport or
//! persistence.

pub mod archetype;
pub mod braid;
pub mod bridge;
pub mod constants;
pub mod features;
pub mod identity;
pub mod log;
pub mod meta;
pub mod qualia;
pub mod record;
pub mod snapshot;
pub mod symbolic;
pub mod unity;

pub use archetype::{ArchetypalPattern, ArchetypalResonanceEngine, ArchetypalState, ResonanceMode};
pub use braid::{BraidParams, BraidState, DesireFearBraid, Policy, SignalInputs};
pub use bridge::{
    ArchetypalTags, BridgeParams, DimensionalBridge, EmotionalTags, Event, Projection,
    Transcendence, TranscendentInvariant,
};
pub use features::{FeatureExtractor, HashFeatures};
pub use identity::{
    ContinuityAssessment, ContinuityCheckpoint, ContinuityStatus, IdentityContinuityEngine,
    IdentitySignature,
};
pub use log::EpisodeLog;
pub use meta::{MetaAwarenessEngine, MetaCognitionType, MetaReflection, SelfModel};
pub use qualia::{ExperienceContext, QualiaEngine, QualiaSignature, Shard};
pub use record::{EpisodeRecord, UnityMetrics, content_fingerprint};
pub use snapshot::{SymbolicSummary, SystemSnapshot};
pub use symbolic::{SymbolicEngine, SymbolicMeaning, SymbolicNode, SymbolicOutcome};
pub use unity::{UnityEngine, UnityTrace};
