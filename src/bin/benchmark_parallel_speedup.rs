//! Run the loadout search once on one worker and once on every core, then print timings and speedup.
//!
//! Usage: cargo run --release --bin benchmark_parallel_speedup [ship] [boosters]
//!
//! Run from the project root so data/shield_data.json is found, or set SHIELDTESTER_DATA.

use std::env;
use std::process;
use std::time::Instant;

use shieldtester::config::Settings;
use shieldtester::data::DataCatalog;
use shieldtester::optimizer::{compute, compute_sequential, SearchOptions};
use shieldtester::survivability::DamageProfile;

fn main() {
    let mut args = env::args().skip(1);
    let ship = args.next().unwrap_or_else(|| "Anaconda".to_string());
    let boosters: Option<usize> = args.next().and_then(|raw| raw.parse().ok());

    let settings = Settings::from_env();
    let catalog = match DataCatalog::load(&settings.data_path) {
        Ok(catalog) => catalog,
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(1);
        }
    };
    let mut test_case = match catalog.select_ship(&ship) {
        Ok(test_case) => test_case,
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(1);
        }
    };
    if let Some(count) = boosters {
        if let Err(err) = test_case.set_number_of_boosters(count) {
            eprintln!("error: {err}");
            process::exit(2);
        }
    }
    let damage = DamageProfile {
        explosive: 20.0,
        kinetic: 60.0,
        thermal: 80.0,
        absolute: 10.0,
        effectiveness: 0.65,
    };
    if let Err(err) = test_case.set_damage_profile(damage) {
        eprintln!("error: {err}");
        process::exit(2);
    }

    let options = SearchOptions {
        max_cores: settings.max_cores,
        ..SearchOptions::default()
    };
    let n = test_case.number_of_tests(None);
    println!(
        "Loadout search: {} loadouts (ship={}, boosters={})",
        n,
        ship,
        test_case.number_of_boosters_to_test
    );
    println!();

    let t0 = Instant::now();
    let sequential = match compute_sequential(&test_case, &options) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(3);
        }
    };
    let elapsed_seq = t0.elapsed();
    let seq_ms = elapsed_seq.as_secs_f64() * 1000.0;
    println!(
        "Sequential:  {:.2} ms  ({:.1} loadouts/s)",
        seq_ms,
        n as f64 / elapsed_seq.as_secs_f64()
    );

    let t0 = Instant::now();
    let parallel = match compute(&test_case, &options) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(3);
        }
    };
    let elapsed_par = t0.elapsed();
    let par_ms = elapsed_par.as_secs_f64() * 1000.0;
    println!(
        "Parallel:    {:.2} ms  ({:.1} loadouts/s)",
        par_ms,
        n as f64 / elapsed_par.as_secs_f64()
    );

    println!();
    println!("Speedup:     {:.2}x faster (parallel vs sequential)", seq_ms / par_ms);

    if sequential.loadout != parallel.loadout || sequential.metrics != parallel.metrics {
        eprintln!("sequential and parallel searches picked different loadouts");
        process::exit(1);
    }
    println!("(Results match sequential vs parallel)");
}
