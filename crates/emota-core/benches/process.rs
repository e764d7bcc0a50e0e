use criterion::{Criterion, criterion_group, criterion_main};

use emota_core::{ExperienceContext, SignalInputs, UnityEngine};

fn bench_process(c: &mut Criterion) {
    c.bench_function("unity_process", |b| {
        let mut engine = UnityEngine::new("bench");
        let inputs = SignalInputs {
            goal_value: 0.7,
            threat_level: 0.1,
            novelty: 0.3,
            ..SignalInputs::default()
        };
        let context = ExperienceContext::default();
        b.iter(|| {
            engine.process(
                "a transcendent unity emerges to bridge stillness and wonder",
                &inputs,
                &context,
            )
        });
    });
}

criterion_group!(benches, bench_process);
criterion_main!(benches);
