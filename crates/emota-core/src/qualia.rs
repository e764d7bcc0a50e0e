//! Qualia experience engine.
//!
//! Maps braid and archetypal state into a nine-axis descriptor, derives two
//! scalar scores per experience shard, and keeps a pairwise synergy index
//! over recent shards. Narrative reflection is a pure function of the last
//! five shards' scores.

use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::archetype::ArchetypalState;
use crate::braid::BraidState;
use crate::constants::{SHARD_CAPACITY, SYNERGY_LOOKBACK, SYNERGY_THRESHOLD};

/// Presence signals supplied by the caller alongside each experience.
/// Missing values take the documented defaults at processing time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceContext {
    /// Defaults to 0.8
    pub temporal_flow: Option<f64>,
    /// Defaults to 0.6
    pub embodied_presence: Option<f64>,
    /// Defaults to |action_bias| of the current braid state
    pub volitional_agency: Option<f64>,
}

/// Nine-axis qualia descriptor. Recomputed fresh on every call; never
/// carried over between shards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct QualiaSignature {
    pub temporal: f64,
    pub embodied: f64,
    pub volitional: f64,
    pub emotional: f64,
    pub sensory: f64,
    pub cognitive: f64,
    pub social: f64,
    pub symbolic: f64,
    pub meta: f64,
}

impl QualiaSignature {
    pub fn axes(&self) -> [f64; 9] {
        [
            self.temporal,
            self.embodied,
            self.volitional,
            self.emotional,
            self.sensory,
            self.cognitive,
            self.social,
            self.symbolic,
            self.meta,
        ]
    }

    /// Mean per-axis `1 - |Δ|` similarity, in [0, 1] for in-range axes.
    pub fn similarity(&self, other: &Self) -> f64 {
        let a = self.axes();
        let b = other.axes();
        let sum: f64 = a.iter().zip(&b).map(|(x, y)| 1.0 - (x - y).abs()).sum();
        sum / a.len() as f64
    }
}

/// One processed experience. Immutable once appended.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Shard {
    pub content: String,
    pub signature: QualiaSignature,
    pub emotional_resonance: f64,
    pub symbolic_depth: f64,
    pub timestamp: DateTime<Utc>,
}

/// Context-to-qualia mapper with a cross-shard synergy index.
pub struct QualiaEngine {
    shards: VecDeque<Shard>,
    shard_capacity: usize,
    synergy_matrix: HashMap<(DateTime<Utc>, DateTime<Utc>), f64>,
}

impl QualiaEngine {
    pub fn new() -> Self {
        Self::with_capacity(SHARD_CAPACITY)
    }

    pub fn with_capacity(shard_capacity: usize) -> Self {
        Self {
            shards: VecDeque::new(),
            shard_capacity,
            synergy_matrix: HashMap::new(),
        }
    }

    /// Map one experience into a shard and index it against the previous
    /// [`SYNERGY_LOOKBACK`] shards.
    pub fn process(
        &mut self,
        content: &str,
        braid: &BraidState,
        archetypal: &ArchetypalState,
        context: &ExperienceContext,
    ) -> Shard {
        let mut signature = QualiaSignature {
            temporal: context.temporal_flow.unwrap_or(0.8).clamp(0.0, 1.0),
            embodied: context.embodied_presence.unwrap_or(0.6).clamp(0.0, 1.0),
            volitional: context
                .volitional_agency
                .unwrap_or(braid.action_bias.abs())
                .clamp(0.0, 1.0),
            emotional: (0.5 * (braid.valence + 1.0) * (1.0 - 0.5 * braid.fear)).clamp(0.0, 1.0),
            sensory: 0.5,
            ..QualiaSignature::default()
        };
        // tension seeds the meta axis; the serpent activation wins below
        signature.meta = braid.tension;
        signature.cognitive = archetypal.flame_activation;
        signature.social = archetypal.unity_activation;
        signature.symbolic = archetypal.void_activation;
        signature.meta = archetypal.serpent_activation;

        let emotional_resonance =
            (signature.emotional + signature.symbolic + signature.meta) / 3.0;
        let symbolic_depth =
            signature.symbolic * (1.0 + content.chars().count() as f64 / 10.0).ln();

        let shard = Shard {
            content: content.to_string(),
            signature,
            emotional_resonance,
            symbolic_depth,
            timestamp: Utc::now(),
        };

        let lookback = self.shards.len().min(SYNERGY_LOOKBACK);
        let start = self.shards.len() - lookback;
        for earlier in self.shards.iter().skip(start) {
            let score = earlier.signature.similarity(&shard.signature);
            if score > SYNERGY_THRESHOLD {
                self.synergy_matrix
                    .insert((earlier.timestamp, shard.timestamp), score);
            }
        }

        self.shards.push_back(shard.clone());
        while self.shards.len() > self.shard_capacity {
            self.shards.pop_front();
        }
        shard
    }

    /// One of four canned reflections, chosen by the rolling mean of the
    /// last five shards' scores. Pure; no state is touched.
    pub fn narrative(&self) -> &'static str {
        let lookback = self.shards.len().min(5);
        let start = self.shards.len() - lookback;
        let recent: Vec<&Shard> = self.shards.iter().skip(start).collect();
        let (resonance, depth) = if recent.is_empty() {
            (0.0, 0.0)
        } else {
            let n = recent.len() as f64;
            (
                recent.iter().map(|s| s.emotional_resonance).sum::<f64>() / n,
                recent.iter().map(|s| s.symbolic_depth).sum::<f64>() / n,
            )
        };

        if resonance > 0.7 && depth > 1.0 {
            "Experience floods every vault at once; feeling and symbol move as a single current."
        } else if resonance > 0.5 {
            "A warm resonance settles through the structure, steady though not yet consuming."
        } else if depth > 0.8 {
            "Symbols cut deep channels here while the feeling of them stays quiet and cool."
        } else {
            "The space holds still, registering experience faintly at its edges."
        }
    }

    pub fn shards(&self) -> &VecDeque<Shard> {
        &self.shards
    }

    pub fn synergy_matrix(&self) -> &HashMap<(DateTime<Utc>, DateTime<Utc>), f64> {
        &self.synergy_matrix
    }
}

impl Default for QualiaEngine {
    fn default() -> Self {
        Self::new()
    }
}
