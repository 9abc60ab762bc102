use criterion::{black_box, criterion_group, criterion_main, Criterion};
use vizij_tween_core::{
    shared, Ease, Engine, LoopType, SequenceSettings, SharedValue, TweenSettings,
};

fn looping() -> TweenSettings {
    TweenSettings::default()
        .with_ease(Ease::InOutCubic)
        .with_loops(-1, LoopType::Yoyo)
}

fn bench_floats(c: &mut Criterion) {
    let mut engine = Engine::default();
    let cells: Vec<SharedValue> = (0..1000).map(|i| shared(i as f32)).collect();
    for cell in &cells {
        engine.to(cell.clone(), 100.0f32, 2.0, looping()).unwrap();
    }
    c.bench_function("update_1000_float_tweens", |b| {
        b.iter(|| {
            engine.update(black_box(1.0 / 60.0));
        })
    });
}

fn bench_vectors(c: &mut Criterion) {
    let mut engine = Engine::default();
    let cells: Vec<SharedValue> = (0..1000).map(|_| shared([0.0f32, 0.0, 0.0])).collect();
    for cell in &cells {
        engine
            .to(cell.clone(), [1.0f32, 2.0, 3.0], 2.0, looping())
            .unwrap();
    }
    c.bench_function("update_1000_vec3_tweens", |b| {
        b.iter(|| {
            engine.update(black_box(1.0 / 60.0));
        })
    });
}

fn bench_sequences(c: &mut Criterion) {
    let mut engine = Engine::default();
    let settings = TweenSettings::default().with_ease(Ease::OutQuad);
    for _ in 0..100 {
        let mut seq = engine
            .sequence(SequenceSettings::default().with_loops(-1, LoopType::Restart))
            .unwrap();
        for _ in 0..10 {
            let tween = engine
                .create_default_tween(shared(0.0f32), 1.0f32, 0.2, settings.clone())
                .unwrap();
            seq.append(tween).unwrap();
        }
        engine.add_sequence(seq);
    }
    c.bench_function("update_100_sequences_of_10", |b| {
        b.iter(|| {
            engine.update(black_box(1.0 / 60.0));
        })
    });
}

criterion_group!(benches, bench_floats, bench_vectors, bench_sequences);
criterion_main!(benches);
