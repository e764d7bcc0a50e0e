//! Dimensional consciousness bridge.
//!
//! Two-stage exponentially-weighted summarizer: events fold into 4D
//! projections (hash-derived feature vectors, decayed weighted mean, cosine
//! coherence), and a window of projections folds into a 5D transcendence
//! (variance-based phase coherence, geometric-style density, archetypal
//! invariant). All three buffers are bounded rings; depth counters are
//! monotonic and survive eviction.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::archetype::{ArchetypalPattern, ArchetypalState};
use crate::braid::BraidState;
use crate::constants::{
    EVENT_CAPACITY, GRADIENT_LEN, INTEGRATION_VECTOR_LEN, META_VECTOR_LEN, PROJECTION_CAPACITY,
    PROJECTION_DECAY, PROJECTION_WINDOW, TEXT_FEATURE_LEN, TRANSCENDENCE_CAPACITY,
    TRANSCENDENCE_WINDOW,
};
use crate::features::{FeatureExtractor, HashFeatures, cosine_similarity, mean, variance};

/// Emotional tag record attached to an event by the braid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EmotionalTags {
    pub desire: f64,
    pub fear: f64,
    pub tension: f64,
    pub valence: f64,
}

impl EmotionalTags {
    pub fn as_array(&self) -> [f64; 4] {
        [self.desire, self.fear, self.tension, self.valence]
    }
}

impl From<&BraidState> for EmotionalTags {
    fn from(state: &BraidState) -> Self {
        Self {
            desire: state.desire,
            fear: state.fear,
            tension: state.tension,
            valence: state.valence,
        }
    }
}

/// Archetypal tag record attached to an event by the classifier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ArchetypalTags {
    pub serpent: f64,
    pub flame: f64,
    pub void: f64,
    pub unity: f64,
}

impl ArchetypalTags {
    pub fn as_array(&self) -> [f64; 4] {
        [self.serpent, self.flame, self.void, self.unity]
    }
}

impl From<&ArchetypalState> for ArchetypalTags {
    fn from(state: &ArchetypalState) -> Self {
        Self {
            serpent: state.serpent_activation,
            flame: state.flame_activation,
            void: state.void_activation,
            unity: state.unity_activation,
        }
    }
}

/// One buffered experience. Immutable once appended.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Event {
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub emotional: Option<EmotionalTags>,
    pub archetypal: Option<ArchetypalTags>,
}

/// 4D projection over a window of events. Immutable once created.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Projection {
    pub coherence: f64,
    /// Monotonic creation counter, 1-based
    pub depth: u64,
    pub integration_vector: Vec<f64>,
    pub event_count: usize,
    /// Per-tag mean over contributing events that carried archetypal tags
    pub signature: Option<ArchetypalTags>,
    pub density: f64,
}

/// Invariant category of a transcendence. `Void` doubles as the no-signature
/// sentinel, as in the string form it replaces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscendentInvariant {
    #[default]
    Void,
    Serpent,
    Flame,
    Unity,
}

impl TranscendentInvariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            TranscendentInvariant::Void => "void",
            TranscendentInvariant::Serpent => "serpent",
            TranscendentInvariant::Flame => "flame",
            TranscendentInvariant::Unity => "unity",
        }
    }
}

/// 5D transcendence over a window of projections. Immutable once created.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Transcendence {
    pub consciousness_density: f64,
    pub archetypal_invariant: TranscendentInvariant,
    pub phase_coherence: f64,
    pub gradient: [f64; GRADIENT_LEN],
    pub meta_vector: [f64; META_VECTOR_LEN],
    pub reality_generation_potential: f64,
    pub projection_count: usize,
    /// Monotonic creation counter, 1-based
    pub transcendence_depth: u64,
}

/// Buffer capacities and fold parameters.
#[derive(Clone, Copy, Debug)]
pub struct BridgeParams {
    pub event_capacity: usize,
    pub projection_capacity: usize,
    pub transcendence_capacity: usize,
    /// Weight of the i-th-from-newest event vector: decay_rate^i
    pub decay_rate: f64,
    pub projection_window: usize,
    pub transcendence_window: usize,
}

impl Default for BridgeParams {
    fn default() -> Self {
        Self {
            event_capacity: EVENT_CAPACITY,
            projection_capacity: PROJECTION_CAPACITY,
            transcendence_capacity: TRANSCENDENCE_CAPACITY,
            decay_rate: PROJECTION_DECAY,
            projection_window: PROJECTION_WINDOW,
            transcendence_window: TRANSCENDENCE_WINDOW,
        }
    }
}

/// Event → projection → transcendence aggregator.
pub struct DimensionalBridge {
    params: BridgeParams,
    extractor: Box<dyn FeatureExtractor + Send + Sync>,
    events: VecDeque<Event>,
    projections: VecDeque<Projection>,
    transcendences: VecDeque<Transcendence>,
    projection_counter: u64,
    transcendence_counter: u64,
}

impl DimensionalBridge {
    pub fn new(params: BridgeParams) -> Self {
        Self::with_extractor(params, Box::new(HashFeatures))
    }

    /// Swap the text-to-feature scheme. The default slices SHA-256 digests.
    pub fn with_extractor(
        params: BridgeParams,
        extractor: Box<dyn FeatureExtractor + Send + Sync>,
    ) -> Self {
        Self {
            params,
            extractor,
            events: VecDeque::new(),
            projections: VecDeque::new(),
            transcendences: VecDeque::new(),
            projection_counter: 0,
            transcendence_counter: 0,
        }
    }

    /// Buffer one experience. The tags come from the braid and classifier
    /// via the orchestrator; the bridge never derives them itself.
    pub fn add_experience(
        &mut self,
        content: &str,
        emotional: Option<EmotionalTags>,
        archetypal: Option<ArchetypalTags>,
    ) {
        self.events.push_back(Event {
            content: content.to_string(),
            timestamp: Utc::now(),
            emotional,
            archetypal,
        });
        while self.events.len() > self.params.event_capacity {
            self.events.pop_front();
        }
    }

    /// Fold the most recent window of events into a projection.
    ///
    /// With no events buffered this returns an empty sentinel (coherence 0,
    /// zero vector) without appending. With exactly one event the coherence
    /// is 1.0 by definition.
    pub fn project(&mut self) -> Projection {
        if self.events.is_empty() {
            return Projection {
                coherence: 0.0,
                depth: self.projection_counter + 1,
                integration_vector: vec![0.0; INTEGRATION_VECTOR_LEN],
                event_count: 0,
                signature: None,
                density: 0.0,
            };
        }

        let window = self.params.projection_window.min(self.events.len());
        let start = self.events.len() - window;
        let recent: Vec<&Event> = self.events.iter().skip(start).collect();

        let vectors: Vec<Vec<f64>> = recent.iter().map(|e| self.event_vector(e)).collect();

        // Exponentially-decayed weighted mean, newest weighted heaviest
        let mut weighted = vec![0.0; INTEGRATION_VECTOR_LEN];
        let mut weight_sum = 0.0;
        for (age, vector) in vectors.iter().rev().enumerate() {
            let weight = self.params.decay_rate.powi(age as i32);
            weight_sum += weight;
            for (acc, value) in weighted.iter_mut().zip(vector) {
                *acc += weight * value;
            }
        }
        for value in &mut weighted {
            *value /= weight_sum;
        }

        let coherence = if vectors.len() < 2 {
            1.0
        } else {
            let similarities: Vec<f64> = vectors
                .iter()
                .map(|v| (cosine_similarity(v, &weighted) + 1.0) / 2.0)
                .collect();
            mean(&similarities)
        };

        let signature = average_signature(&recent);
        let depth = self.projection_counter + 1;
        let density = coherence * (1.0 + depth as f64).ln() / 3.0;

        let projection = Projection {
            coherence,
            depth,
            integration_vector: weighted,
            event_count: window,
            signature,
            density,
        };
        self.projection_counter = depth;
        self.projections.push_back(projection.clone());
        while self.projections.len() > self.params.projection_capacity {
            self.projections.pop_front();
        }
        projection
    }

    /// Compress the most recent window of projections into a transcendence.
    ///
    /// With no projections this returns an empty sentinel without appending.
    pub fn transcend(&mut self) -> Transcendence {
        if self.projections.is_empty() {
            return Transcendence {
                consciousness_density: 0.0,
                archetypal_invariant: TranscendentInvariant::Void,
                phase_coherence: 0.0,
                gradient: [0.0; GRADIENT_LEN],
                meta_vector: [0.0; META_VECTOR_LEN],
                reality_generation_potential: 0.0,
                projection_count: 0,
                transcendence_depth: self.transcendence_counter + 1,
            };
        }

        let window = self.params.transcendence_window.min(self.projections.len());
        let start = self.projections.len() - window;
        let recent: Vec<&Projection> = self.projections.iter().skip(start).collect();

        let coherence_product: f64 = recent.iter().map(|p| p.coherence).product();
        let depth_sum: u64 = recent.iter().map(|p| p.depth).sum();
        let density = (coherence_product * (1.0 + depth_sum as f64).ln()).tanh();

        let invariant = archetypal_invariant(&recent);

        let coherences: Vec<f64> = recent.iter().map(|p| p.coherence).collect();
        let phase_coherence = if recent.len() < 2 {
            1.0
        } else {
            (-5.0 * variance(&coherences)).exp()
        };

        let mut gradient = [0.0; GRADIENT_LEN];
        if recent.len() >= 2 {
            let first = recent[0];
            let last = recent[recent.len() - 1];
            gradient[0] = last.coherence - first.coherence;
            gradient[1] = last.density - first.density;
        }

        let meta_vector = meta_vector(&recent, density, phase_coherence);

        let mut reality_generation = density * phase_coherence;
        if invariant == TranscendentInvariant::Unity {
            reality_generation *= 1.5;
        }

        let depth = self.transcendence_counter + 1;
        let transcendence = Transcendence {
            consciousness_density: density,
            archetypal_invariant: invariant,
            phase_coherence,
            gradient,
            meta_vector,
            reality_generation_potential: reality_generation,
            projection_count: window,
            transcendence_depth: depth,
        };
        self.transcendence_counter = depth;
        self.transcendences.push_back(transcendence.clone());
        while self.transcendences.len() > self.params.transcendence_capacity {
            self.transcendences.pop_front();
        }
        transcendence
    }

    pub fn events(&self) -> &VecDeque<Event> {
        &self.events
    }

    pub fn projections(&self) -> &VecDeque<Projection> {
        &self.projections
    }

    pub fn transcendences(&self) -> &VecDeque<Transcendence> {
        &self.transcendences
    }

    /// Exactly [`INTEGRATION_VECTOR_LEN`] wide: up to 7 hash features, up to
    /// 4 emotional tag values, up to 4 archetypal tag values, zero-padded or
    /// truncated.
    fn event_vector(&self, event: &Event) -> Vec<f64> {
        let mut vector = self.extractor.features(&event.content, TEXT_FEATURE_LEN);
        if let Some(tags) = &event.emotional {
            vector.extend(tags.as_array());
        }
        if let Some(tags) = &event.archetypal {
            vector.extend(tags.as_array());
        }
        vector.resize(INTEGRATION_VECTOR_LEN, 0.0);
        vector
    }
}

impl Default for DimensionalBridge {
    fn default() -> Self {
        Self::new(BridgeParams::default())
    }
}

/// Per-tag mean over events carrying archetypal tags; None when none do.
fn average_signature(events: &[&Event]) -> Option<ArchetypalTags> {
    let tagged: Vec<&ArchetypalTags> = events.iter().filter_map(|e| e.archetypal.as_ref()).collect();
    if tagged.is_empty() {
        return None;
    }
    let n = tagged.len() as f64;
    Some(ArchetypalTags {
        serpent: tagged.iter().map(|t| t.serpent).sum::<f64>() / n,
        flame: tagged.iter().map(|t| t.flame).sum::<f64>() / n,
        void: tagged.iter().map(|t| t.void).sum::<f64>() / n,
        unity: tagged.iter().map(|t| t.unity).sum::<f64>() / n,
    })
}

/// Highest averaged tag wins, unless the averages are flat (spread < 0.3)
/// and raised (mean > 0.4), which forces Unity. Fixed narrative constants;
/// see DESIGN.md.
fn archetypal_invariant(projections: &[&Projection]) -> TranscendentInvariant {
    let signatures: Vec<&ArchetypalTags> =
        projections.iter().filter_map(|p| p.signature.as_ref()).collect();
    if signatures.is_empty() {
        return TranscendentInvariant::Void;
    }
    let n = signatures.len() as f64;
    let averaged = [
        (TranscendentInvariant::Serpent, signatures.iter().map(|s| s.serpent).sum::<f64>() / n),
        (TranscendentInvariant::Flame, signatures.iter().map(|s| s.flame).sum::<f64>() / n),
        (TranscendentInvariant::Void, signatures.iter().map(|s| s.void).sum::<f64>() / n),
        (TranscendentInvariant::Unity, signatures.iter().map(|s| s.unity).sum::<f64>() / n),
    ];

    let values: Vec<f64> = averaged.iter().map(|(_, v)| *v).collect();
    let lo = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let hi = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if hi - lo < 0.3 && mean(&values) > 0.4 {
        return TranscendentInvariant::Unity;
    }

    averaged
        .iter()
        .fold(
            (TranscendentInvariant::Void, f64::NEG_INFINITY),
            |(best, best_value), (tag, value)| {
                if *value > best_value {
                    (*tag, *value)
                } else {
                    (best, best_value)
                }
            },
        )
        .0
}

/// First 6 dims of the per-component mean integration vector, first 2 dims
/// of its per-component variance, then density and phase coherence. Zeros
/// when any vector is absent or of unexpected width.
fn meta_vector(
    projections: &[&Projection],
    density: f64,
    phase_coherence: f64,
) -> [f64; META_VECTOR_LEN] {
    let mut out = [0.0; META_VECTOR_LEN];
    if projections.is_empty()
        || projections
            .iter()
            .any(|p| p.integration_vector.len() != INTEGRATION_VECTOR_LEN)
    {
        return out;
    }

    for dim in 0..6 {
        let column: Vec<f64> = projections.iter().map(|p| p.integration_vector[dim]).collect();
        out[dim] = mean(&column);
    }
    for dim in 0..2 {
        let column: Vec<f64> = projections.iter().map(|p| p.integration_vector[dim]).collect();
        out[6 + dim] = variance(&column);
    }
    out[8] = density;
    out[9] = phase_coherence;
    out
}
