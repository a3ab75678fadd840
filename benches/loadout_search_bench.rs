//! Compare one worker against every core on a full Anaconda search.
//!
//! Run with: `cargo bench --bench loadout_search`
//! Or quick comparison: `cargo run --release --bin benchmark_parallel_speedup` (see src/bin)

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use shieldtester::data::DataCatalog;
use shieldtester::optimizer::{compute, compute_sequential, SearchOptions, TestCase};
use shieldtester::survivability::DamageProfile;

const CATALOG: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/shield_data.json");

fn attacked(catalog: &DataCatalog) -> TestCase<'_> {
    let mut test_case = catalog.select_ship("Anaconda").expect("bundled ship");
    test_case.set_generator_class(7).expect("class 7 fits");
    test_case.set_number_of_boosters(6).expect("6 boosters fit");
    test_case
        .set_damage_profile(DamageProfile {
            explosive: 20.0,
            kinetic: 60.0,
            thermal: 80.0,
            absolute: 10.0,
            effectiveness: 0.65,
        })
        .expect("valid damage");
    test_case
}

fn bench_loadout_search(c: &mut Criterion) {
    let catalog = DataCatalog::load(CATALOG).expect("bundled catalog");
    let test_case = attacked(&catalog);
    let options = SearchOptions::default();

    let mut group = c.benchmark_group("loadout_search");
    group.sample_size(20);
    group.measurement_time(std::time::Duration::from_secs(10));

    group.bench_function("one_worker", |b| {
        b.iter(|| black_box(compute_sequential(&test_case, &options).expect("search")));
    });

    group.bench_function("all_cores", |b| {
        b.iter(|| black_box(compute(&test_case, &options).expect("search")));
    });

    group.finish();
}

criterion_group!(benches, bench_loadout_search);
criterion_main!(benches);
