//! Archetypal resonance classifier.
//!
//! Normalizes four factors derived from the braid state into a
//! probability-like activation vector, classifies the dominant pattern, and
//! tracks frame-to-frame phase coherence against a bounded snapshot history.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::braid::BraidState;
use crate::constants::ACTIVATION_HISTORY_CAPACITY;

/// The four archetypal patterns, in tie-break order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArchetypalPattern {
    Flame,
    Void,
    Serpent,
    Unity,
}

impl ArchetypalPattern {
    pub const ALL: [ArchetypalPattern; 4] = [
        ArchetypalPattern::Flame,
        ArchetypalPattern::Void,
        ArchetypalPattern::Serpent,
        ArchetypalPattern::Unity,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            ArchetypalPattern::Flame => "Flame of Breakthrough",
            ArchetypalPattern::Void => "Void of Integration",
            ArchetypalPattern::Serpent => "Serpent of Stillness",
            ArchetypalPattern::Unity => "Unity of Transcendence",
        }
    }
}

/// How concentrated the activation distribution is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResonanceMode {
    Dominant,
    Flowing,
    #[default]
    Balanced,
}

/// Classifier output. Activations sum to 1 whenever any factor is nonzero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ArchetypalState {
    pub serpent_activation: f64,
    pub flame_activation: f64,
    pub void_activation: f64,
    pub unity_activation: f64,
    pub dominant_pattern: Option<ArchetypalPattern>,
    pub resonance_mode: ResonanceMode,
    pub harmonic_frequency: f64,
    pub phase_coherence: f64,
}

impl ArchetypalState {
    /// Activations in tie-break order: flame, void, serpent, unity.
    pub fn activations(&self) -> [f64; 4] {
        [
            self.flame_activation,
            self.void_activation,
            self.serpent_activation,
            self.unity_activation,
        ]
    }
}

/// Stateful classifier over braid outputs.
pub struct ArchetypalResonanceEngine {
    state: ArchetypalState,
    activation_history: VecDeque<[f64; 4]>,
}

impl ArchetypalResonanceEngine {
    pub fn new() -> Self {
        Self {
            state: ArchetypalState::default(),
            activation_history: VecDeque::new(),
        }
    }

    /// Classify the current braid state, updating internal activations,
    /// dominant pattern, mode, harmonic frequency and phase coherence.
    pub fn process(&mut self, braid: &BraidState) -> ArchetypalState {
        let mut flame = braid.desire * (1.0 - braid.fear);
        flame *= 1.0 + braid.action_bias.abs();
        let void = braid.tension * (1.0 + braid.valence.abs()) * 0.8;
        let serpent =
            (1.0 - braid.valence.abs()) * (1.0 - braid.tension) + (-braid.valence).max(0.0);
        let balance = 1.0 - (flame - serpent).abs() - (serpent - void).abs();
        let unity = (balance * flame.min(serpent).min(void)).max(0.0);

        // A zero factor sum keeps the previous activations. Stale on purpose;
        // see DESIGN.md.
        let total = flame + void + serpent + unity;
        if total > 0.0 {
            self.state.flame_activation = flame / total;
            self.state.void_activation = void / total;
            self.state.serpent_activation = serpent / total;
            self.state.unity_activation = unity / total;
        }

        let activations = self.state.activations();
        let (dominant_idx, max_activation) = activations
            .iter()
            .enumerate()
            .fold((0usize, f64::MIN), |(best_idx, best), (idx, &value)| {
                if value > best {
                    (idx, value)
                } else {
                    (best_idx, best)
                }
            });
        self.state.dominant_pattern = Some(ArchetypalPattern::ALL[dominant_idx]);
        self.state.resonance_mode = if max_activation > 0.7 {
            ResonanceMode::Dominant
        } else if max_activation < 0.4 {
            ResonanceMode::Balanced
        } else {
            ResonanceMode::Flowing
        };

        self.state.harmonic_frequency = activations.iter().sum::<f64>() * braid.tension;
        self.state.phase_coherence = self.phase_coherence(&activations);

        self.activation_history.push_back(activations);
        while self.activation_history.len() > ACTIVATION_HISTORY_CAPACITY {
            self.activation_history.pop_front();
        }

        self.state
    }

    pub fn state(&self) -> &ArchetypalState {
        &self.state
    }

    pub fn history_len(&self) -> usize {
        self.activation_history.len()
    }

    /// Mean per-pattern `1 - |current - previous|` against the last stored
    /// snapshot; 1.0 when no snapshot exists yet.
    fn phase_coherence(&self, activations: &[f64; 4]) -> f64 {
        let Some(previous) = self.activation_history.back() else {
            return 1.0;
        };
        let sum: f64 = activations
            .iter()
            .zip(previous)
            .map(|(current, prev)| 1.0 - (current - prev).abs())
            .sum();
        sum / activations.len() as f64
    }
}

impl Default for ArchetypalResonanceEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::braid::{DesireFearBraid, SignalInputs};
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn braid_state(desire: f64, fear: f64) -> BraidState {
        BraidState {
            desire,
            fear,
            valence: desire - fear,
            tension: desire * fear,
            action_bias: desire - fear,
            ..BraidState::default()
        }
    }

    #[test]
    fn test_activations_normalized() {
        let mut engine = ArchetypalResonanceEngine::new();
        let state = engine.process(&braid_state(0.8, 0.3));
        let sum: f64 = state.activations().iter().sum();
        assert_relative_eq!(sum, 1.0, epsilon = 1e-10);
        for a in state.activations() {
            assert!((0.0..=1.0).contains(&a), "activation out of range: {a}");
        }
    }

    #[test]
    fn test_dominant_pattern_always_set() {
        let mut engine = ArchetypalResonanceEngine::new();
        let state = engine.process(&braid_state(0.2, 0.1));
        assert!(state.dominant_pattern.is_some());
    }

    #[test]
    fn test_high_desire_favors_flame() {
        let mut engine = ArchetypalResonanceEngine::new();
        let state = engine.process(&braid_state(0.95, 0.05));
        assert_eq!(state.dominant_pattern, Some(ArchetypalPattern::Flame));
    }

    #[test]
    fn test_zero_factor_sum_keeps_previous_activations() {
        let mut engine = ArchetypalResonanceEngine::new();
        engine.process(&braid_state(0.8, 0.3));
        let before = engine.state().activations();

        // All four factors vanish when valence is saturated with no desire,
        // tension or bias. Not reachable from a real braid step; constructed
        // directly to pin the fallback.
        let degenerate = BraidState {
            desire: 0.0,
            fear: 0.0,
            valence: 1.0,
            tension: 0.0,
            action_bias: 0.0,
            ..BraidState::default()
        };
        let state = engine.process(&degenerate);
        assert_eq!(state.activations(), before);
    }

    #[test]
    fn test_phase_coherence_first_call_is_one() {
        let mut engine = ArchetypalResonanceEngine::new();
        let state = engine.process(&braid_state(0.6, 0.2));
        assert_eq!(state.phase_coherence, 1.0);
    }

    #[test]
    fn test_phase_coherence_in_range_across_steps() {
        let mut braid = DesireFearBraid::default();
        let mut engine = ArchetypalResonanceEngine::new();
        let sequence = [
            (0.2, 0.1),
            (0.7, 0.3),
            (0.6, 0.6),
            (0.9, 0.2),
        ];
        for (goal, threat) in sequence {
            let s = braid.step(&SignalInputs {
                goal_value: goal,
                threat_level: threat,
                ..SignalInputs::default()
            });
            let arch = engine.process(&s);
            assert!(
                (0.0..=1.0).contains(&arch.phase_coherence),
                "phase coherence out of range: {}",
                arch.phase_coherence
            );
        }
    }

    #[test]
    fn test_identical_frames_fully_coherent() {
        let mut engine = ArchetypalResonanceEngine::new();
        engine.process(&braid_state(0.6, 0.2));
        let state = engine.process(&braid_state(0.6, 0.2));
        assert_relative_eq!(state.phase_coherence, 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_history_capped_at_fifty() {
        let mut engine = ArchetypalResonanceEngine::new();
        for i in 0..80 {
            engine.process(&braid_state(0.5 + 0.004 * i as f64, 0.2));
        }
        assert_eq!(engine.history_len(), ACTIVATION_HISTORY_CAPACITY);
    }

    proptest! {
        #[test]
        fn prop_activations_sum_to_at_most_one(
            desire in 0.0f64..=1.0,
            fear in 0.0f64..=1.0,
        ) {
            let mut engine = ArchetypalResonanceEngine::new();
            let state = engine.process(&braid_state(desire, fear));
            let sum: f64 = state.activations().iter().sum();
            prop_assert!(sum <= 1.0 + 1e-9, "sum: {sum}");
            for a in state.activations() {
                prop_assert!((0.0..=1.0).contains(&a));
            }
        }
    }
}
