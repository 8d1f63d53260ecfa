use std::collections::HashMap;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};
use yao_circuits::circuits;
use yao_garble_core::{evaluate, garble, GarblerOutput};

fn criterion_benchmark(c: &mut Criterion) {
    let mut gb_group = c.benchmark_group("garble");

    let mut rng = StdRng::seed_from_u64(0);
    let circ = circuits::dot_product(10, 4, 16).unwrap();

    gb_group.bench_function("dot_product_10x4", |b| {
        b.iter(|| black_box(garble(&mut rng, &circ).unwrap()))
    });

    drop(gb_group);

    let mut ev_group = c.benchmark_group("evaluate");

    ev_group.bench_function("dot_product_10x4", |b| {
        let GarblerOutput { labels, circuit } = garble(&mut rng, &circ).unwrap();
        let inputs: HashMap<_, _> = circ
            .inputs()
            .iter()
            .map(|wire| (wire.clone(), labels.encode(wire, rng.gen()).unwrap()))
            .collect();

        b.iter(|| black_box(evaluate(&circ, &circuit, inputs.clone()).unwrap()))
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = criterion_benchmark
}
criterion_main!(benches);
