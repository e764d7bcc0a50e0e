//! Integration tests exercising the full pipeline:
//! braid → classifier → bridge → qualia → symbolic → meta → identity,
//! through the public orchestrator surface.

use emota_core::{
    ArchetypalPattern, ExperienceContext, SignalInputs, SymbolicEngine, UnityEngine,
};

fn goal_inputs() -> SignalInputs {
    SignalInputs {
        goal_value: 0.7,
        threat_level: 0.1,
        ..SignalInputs::default()
    }
}

/// A fresh pipeline classifies a dominant pattern on the very first call.
#[test]
fn fresh_pipeline_classifies_dominant_pattern() {
    let mut engine = UnityEngine::new("Prime");
    let record = engine.process(
        "Setting out toward an interesting goal",
        &goal_inputs(),
        &ExperienceContext::default(),
    );

    let dominant = record.archetypal_resonance.dominant_pattern;
    assert!(dominant.is_some(), "dominant pattern must be classified");
    assert!(ArchetypalPattern::ALL.contains(&dominant.unwrap()));
}

/// Two freshly constructed pipelines fed identical inputs produce
/// byte-identical motivational and resonance sub-records.
#[test]
fn identical_runs_are_deterministic() {
    let mut a = UnityEngine::new("Prime");
    let mut b = UnityEngine::new("Prime");
    let context = ExperienceContext::default();

    let ra = a.process("the same experience", &goal_inputs(), &context);
    let rb = b.process("the same experience", &goal_inputs(), &context);

    let motivational_a = serde_json::to_string(&ra.motivational_state).unwrap();
    let motivational_b = serde_json::to_string(&rb.motivational_state).unwrap();
    assert_eq!(motivational_a, motivational_b);

    let resonance_a = serde_json::to_string(&ra.archetypal_resonance).unwrap();
    let resonance_b = serde_json::to_string(&rb.archetypal_resonance).unwrap();
    assert_eq!(resonance_a, resonance_b);

    assert_eq!(ra.content_fingerprint, rb.content_fingerprint);
}

/// Probability-like outputs stay in range across a varied run.
#[test]
fn scalar_invariants_hold_across_runs() {
    let mut engine = UnityEngine::new("Prime");
    let scenarios = [
        (0.2, 0.1, "a quiet beginning"),
        (0.9, 0.0, "a strong pull toward the goal"),
        (0.1, 0.9, "an overwhelming threat appears"),
        (0.6, 0.6, "torn between promise and danger"),
        (0.0, 0.0, "nothing in particular happens"),
    ];

    for (goal, threat, content) in scenarios {
        let record = engine.process(
            content,
            &SignalInputs {
                goal_value: goal,
                threat_level: threat,
                ..SignalInputs::default()
            },
            &ExperienceContext::default(),
        );

        let m = &record.motivational_state;
        assert!((0.0..=1.0).contains(&m.desire));
        assert!((0.0..=1.0).contains(&m.fear));
        assert!((-1.0..=1.0).contains(&m.valence));

        let r = &record.archetypal_resonance;
        let activation_sum = r.serpent_activation
            + r.flame_activation
            + r.void_activation
            + r.unity_activation;
        assert!(activation_sum <= 1.0 + 1e-9, "activation sum: {activation_sum}");

        let d = &record.dimensional_consciousness;
        assert!((0.0..=1.0).contains(&d.phase_coherence));
        assert!((0.0..=1.0).contains(&d.projection_coherence));

        assert!((0.0..=1.0).contains(&record.meta_awareness.awareness_level));
        assert!((0.0..=1.0).contains(&record.identity_continuity.overall_coherence));
        assert!((0.0..=1.0).contains(&record.identity_continuity.identity_stability));
    }
}

/// Depth counters advance monotonically with each processed experience.
#[test]
fn depth_counters_advance() {
    let mut engine = UnityEngine::new("Prime");
    let context = ExperienceContext::default();

    let first = engine.process("first", &goal_inputs(), &context);
    let second = engine.process("second", &goal_inputs(), &context);
    let third = engine.process("third", &goal_inputs(), &context);

    assert_eq!(first.dimensional_consciousness.projection_depth, 1);
    assert_eq!(second.dimensional_consciousness.projection_depth, 2);
    assert_eq!(third.dimensional_consciousness.projection_depth, 3);
    assert!(
        third.dimensional_consciousness.transcendence_depth
            > first.dimensional_consciousness.transcendence_depth
    );
}

/// Text mentioning transcendence and unity carries both glyphs in its
/// symbolic signature.
#[test]
fn signature_includes_eternity_and_unity_glyphs() {
    let engine = SymbolicEngine::new();
    let signature = engine.signature("to transcend is to find unity");
    assert!(signature.contains(&"∞".to_string()));
    assert!(signature.contains(&"◈".to_string()));

    let mut pipeline = UnityEngine::new("Prime");
    let record = pipeline.process(
        "to transcend is to find unity",
        &goal_inputs(),
        &ExperienceContext::default(),
    );
    assert!(record.symbolic_processing.signature_symbols.contains(&"∞".to_string()));
    assert!(record.symbolic_processing.signature_symbols.contains(&"◈".to_string()));
}

/// Records survive a JSON round trip intact.
#[test]
fn record_serde_roundtrip() {
    let mut engine = UnityEngine::new("Prime");
    let record = engine.process("round trip", &goal_inputs(), &ExperienceContext::default());

    let json = serde_json::to_string(&record).unwrap();
    let reloaded: emota_core::EpisodeRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(record, reloaded);
}

/// The episodic log inside the orchestrator honors its capacity.
#[test]
fn episode_log_capacity_respected() {
    let mut engine = UnityEngine::with_params(
        "Prime",
        emota_core::BraidParams::default(),
        3,
    );
    for i in 0..9 {
        engine.process(&format!("episode {i}"), &goal_inputs(), &ExperienceContext::default());
    }
    assert_eq!(engine.log().len(), 3);
    let contents: Vec<&str> = engine.log().iter().map(|r| r.content.as_str()).collect();
    assert_eq!(contents, vec!["episode 6", "episode 7", "episode 8"]);
}
