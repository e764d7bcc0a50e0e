//! Coupled desire/fear oscillator with hysteresis-banded binary outputs.
//!
//! Two drives integrate under explicit Euler with self-decay and
//! cross-coupling, clamp to [0, 1], and derive valence, tension and an
//! action bias that selects a policy. Two hysteresis bits track each drive
//! through a two-threshold band so they cannot flicker near a boundary.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::BRAID_HISTORY_CAPACITY;

/// Tunables for the braid. Loaded once at construction; immutable afterward.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BraidParams {
    pub dt: f64,
    pub self_decay: f64,
    pub coupling: f64,
    pub arousal_gain: f64,
    pub bias_desire: f64,
    pub bias_fear: f64,
    pub tension_weight: f64,
    pub act_threshold: f64,
    pub investigate_band: f64,
    /// Hysteresis bit turns on at or above this value
    pub bin_on: f64,
    /// Hysteresis bit turns off below this value
    pub bin_off: f64,
}

impl Default for BraidParams {
    fn default() -> Self {
        Self {
            dt: 1.0,
            self_decay: 0.25,
            coupling: 0.45,
            arousal_gain: 0.8,
            bias_desire: 0.02,
            bias_fear: 0.02,
            tension_weight: 0.6,
            act_threshold: 0.15,
            investigate_band: 0.08,
            bin_on: 0.62,
            bin_off: 0.48,
        }
    }
}

/// External drive signals. Missing fields default to 0; out-of-range values
/// are clamped by the braid, never rejected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalInputs {
    pub goal_value: f64,
    pub threat_level: f64,
    pub novelty: f64,
    pub uncertainty: f64,
    pub safety_evidence: f64,
    pub gain_evidence: f64,
}

impl SignalInputs {
    /// Every signal clamped to [0, 1].
    pub fn sanitized(&self) -> Self {
        Self {
            goal_value: self.goal_value.clamp(0.0, 1.0),
            threat_level: self.threat_level.clamp(0.0, 1.0),
            novelty: self.novelty.clamp(0.0, 1.0),
            uncertainty: self.uncertainty.clamp(0.0, 1.0),
            safety_evidence: self.safety_evidence.clamp(0.0, 1.0),
            gain_evidence: self.gain_evidence.clamp(0.0, 1.0),
        }
    }
}

/// Action policy selected from the action bias each step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Policy {
    Approach,
    Avoid,
    Investigate,
    #[default]
    Pause,
}

impl Policy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Policy::Approach => "approach",
            Policy::Avoid => "avoid",
            Policy::Investigate => "investigate",
            Policy::Pause => "pause",
        }
    }
}

/// Mutable braid state. Updated in place on every step; never reset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BraidState {
    pub desire: f64,
    pub fear: f64,
    pub valence: f64,
    pub tension: f64,
    pub action_bias: f64,
    pub policy: Policy,
    pub desire_bit: u8,
    pub fear_bit: u8,
}

/// One step's record: when it ran, what it produced, what fed it.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct BraidHistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub state: BraidState,
    pub inputs: SignalInputs,
}

/// Coupled desire/fear state machine.
pub struct DesireFearBraid {
    params: BraidParams,
    state: BraidState,
    history: VecDeque<BraidHistoryEntry>,
    history_capacity: usize,
}

impl DesireFearBraid {
    pub fn new(params: BraidParams) -> Self {
        Self::with_history_capacity(params, BRAID_HISTORY_CAPACITY)
    }

    /// History is a bounded ring; the oldest entries are evicted first.
    pub fn with_history_capacity(params: BraidParams, history_capacity: usize) -> Self {
        Self {
            params,
            state: BraidState::default(),
            history: VecDeque::new(),
            history_capacity,
        }
    }

    /// Advance one step. Inputs are clamped to [0, 1]; no input is rejected.
    pub fn step(&mut self, inputs: &SignalInputs) -> BraidState {
        let p = self.params;
        let i = inputs.sanitized();

        let desire_drive = p.arousal_gain
            * (i.goal_value + 0.5 * i.novelty + 0.3 * i.uncertainty + 0.6 * i.gain_evidence)
            + p.bias_desire;
        let fear_drive = p.arousal_gain
            * (i.threat_level + 0.5 * i.uncertainty + 0.2 * i.novelty - 0.7 * i.safety_evidence)
            + p.bias_fear;

        let s = &mut self.state;
        let d_next = s.desire + p.dt * (desire_drive - p.self_decay * s.desire - p.coupling * s.fear);
        let f_next = s.fear + p.dt * (fear_drive - p.self_decay * s.fear - p.coupling * s.desire);
        s.desire = d_next.clamp(0.0, 1.0);
        s.fear = f_next.clamp(0.0, 1.0);

        s.valence = s.desire - s.fear;
        s.tension = s.desire * s.fear;
        s.action_bias = s.valence * (1.0 - p.tension_weight * s.tension);

        let ab = s.action_bias;
        s.policy = if ab.abs() < p.investigate_band {
            Policy::Investigate
        } else if ab >= p.act_threshold {
            Policy::Approach
        } else if ab <= -p.act_threshold {
            Policy::Avoid
        } else {
            Policy::Pause
        };

        s.desire_bit = hysteresis_bit(s.desire, s.desire_bit, p.bin_on, p.bin_off);
        s.fear_bit = hysteresis_bit(s.fear, s.fear_bit, p.bin_on, p.bin_off);

        let state = self.state;
        self.history.push_back(BraidHistoryEntry {
            timestamp: Utc::now(),
            state,
            inputs: i,
        });
        while self.history.len() > self.history_capacity {
            self.history.pop_front();
        }
        state
    }

    /// The two hysteresis bits packed as `(desire << 1) | fear`.
    pub fn braid_code(&self) -> u8 {
        (self.state.desire_bit << 1) | self.state.fear_bit
    }

    pub fn state(&self) -> &BraidState {
        &self.state
    }

    pub fn params(&self) -> &BraidParams {
        &self.params
    }

    /// Sanitized inputs of the most recent step, if any.
    pub fn latest_inputs(&self) -> Option<SignalInputs> {
        self.history.back().map(|entry| entry.inputs)
    }

    pub fn history(&self) -> &VecDeque<BraidHistoryEntry> {
        &self.history
    }
}

impl Default for DesireFearBraid {
    fn default() -> Self {
        Self::new(BraidParams::default())
    }
}

/// Sticky bit: a set bit stays set until the value drops below `off`; a
/// clear bit stays clear until the value rises to `on`.
fn hysteresis_bit(value: f64, previous: u8, on: f64, off: f64) -> u8 {
    if previous == 1 {
        u8::from(value >= off)
    } else {
        u8::from(value >= on)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn inputs(goal: f64, threat: f64) -> SignalInputs {
        SignalInputs {
            goal_value: goal,
            threat_level: threat,
            ..SignalInputs::default()
        }
    }

    #[test]
    fn test_drives_stay_in_unit_interval() {
        let mut braid = DesireFearBraid::default();
        for _ in 0..20 {
            let s = braid.step(&inputs(1.0, 1.0));
            assert!((0.0..=1.0).contains(&s.desire), "desire: {}", s.desire);
            assert!((0.0..=1.0).contains(&s.fear), "fear: {}", s.fear);
        }
    }

    #[test]
    fn test_out_of_range_inputs_clamped() {
        let mut braid = DesireFearBraid::default();
        let s = braid.step(&inputs(42.0, -7.0));
        assert!((0.0..=1.0).contains(&s.desire));
        assert!((0.0..=1.0).contains(&s.fear));
        let recorded = braid.latest_inputs().unwrap();
        assert_eq!(recorded.goal_value, 1.0);
        assert_eq!(recorded.threat_level, 0.0);
    }

    #[test]
    fn test_goal_raises_desire_policy_approach() {
        let mut braid = DesireFearBraid::default();
        for _ in 0..5 {
            braid.step(&inputs(0.9, 0.0));
        }
        let s = braid.state();
        assert!(s.desire > 0.5, "desire: {}", s.desire);
        assert_eq!(s.policy, Policy::Approach);
    }

    #[test]
    fn test_threat_raises_fear_policy_avoid() {
        let mut braid = DesireFearBraid::default();
        for _ in 0..5 {
            braid.step(&inputs(0.0, 0.9));
        }
        let s = braid.state();
        assert!(s.fear > 0.5, "fear: {}", s.fear);
        assert_eq!(s.policy, Policy::Avoid);
    }

    #[test]
    fn test_idle_policy_investigate() {
        let mut braid = DesireFearBraid::default();
        let s = braid.step(&SignalInputs::default());
        // biases alone leave the action bias inside the investigate band
        assert!(s.action_bias.abs() < braid.params().investigate_band);
        assert_eq!(s.policy, Policy::Investigate);
    }

    #[test]
    fn test_hysteresis_bit_band() {
        // bin_on = 0.62, bin_off = 0.48: the bit must not flip inside the band
        assert_eq!(hysteresis_bit(0.61, 0, 0.62, 0.48), 0);
        assert_eq!(hysteresis_bit(0.62, 0, 0.62, 0.48), 1);
        assert_eq!(hysteresis_bit(0.50, 1, 0.62, 0.48), 1);
        assert_eq!(hysteresis_bit(0.48, 1, 0.62, 0.48), 1);
        assert_eq!(hysteresis_bit(0.47, 1, 0.62, 0.48), 0);
    }

    #[test]
    fn test_desire_bit_sticky_across_steps() {
        let mut braid = DesireFearBraid::default();
        for _ in 0..6 {
            braid.step(&inputs(0.9, 0.0));
        }
        assert_eq!(braid.state().desire_bit, 1);

        // back off the goal; desire decays but the bit holds until < bin_off
        let mut flips = 0;
        let mut previous = 1;
        for _ in 0..30 {
            let s = braid.step(&SignalInputs::default());
            if s.desire_bit != previous {
                flips += 1;
                previous = s.desire_bit;
                assert!(
                    s.desire < braid.params().bin_off,
                    "bit dropped at desire = {}, above bin_off",
                    s.desire
                );
            }
        }
        assert!(flips <= 1, "bit flickered: {flips} flips");
    }

    #[test]
    fn test_braid_code_packs_bits() {
        let mut braid = DesireFearBraid::default();
        for _ in 0..6 {
            braid.step(&inputs(0.9, 0.0));
        }
        let s = braid.state();
        assert_eq!(s.desire_bit, 1);
        assert_eq!(s.fear_bit, 0);
        assert_eq!(braid.braid_code(), 0b10);
    }

    #[test]
    fn test_history_ring_bounded() {
        let mut braid = DesireFearBraid::with_history_capacity(BraidParams::default(), 4);
        for _ in 0..10 {
            braid.step(&SignalInputs::default());
        }
        assert_eq!(braid.history().len(), 4);
    }

    #[test]
    fn test_deterministic_given_same_construction() {
        let mut a = DesireFearBraid::default();
        let mut b = DesireFearBraid::default();
        for _ in 0..8 {
            let sa = a.step(&inputs(0.7, 0.1));
            let sb = b.step(&inputs(0.7, 0.1));
            assert_eq!(sa, sb);
        }
    }

    proptest! {
        #[test]
        fn prop_drives_always_clamped(
            goal in -10.0f64..10.0,
            threat in -10.0f64..10.0,
            novelty in -10.0f64..10.0,
            uncertainty in -10.0f64..10.0,
            safety in -10.0f64..10.0,
            gain in -10.0f64..10.0,
        ) {
            let mut braid = DesireFearBraid::default();
            for _ in 0..3 {
                let s = braid.step(&SignalInputs {
                    goal_value: goal,
                    threat_level: threat,
                    novelty,
                    uncertainty,
                    safety_evidence: safety,
                    gain_evidence: gain,
                });
                prop_assert!((0.0..=1.0).contains(&s.desire));
                prop_assert!((0.0..=1.0).contains(&s.fear));
                prop_assert!((0.0..=1.0).contains(&s.tension));
                prop_assert!((-1.0..=1.0).contains(&s.valence));
            }
        }
    }
}
