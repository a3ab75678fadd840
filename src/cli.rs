use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use clap::error::ErrorKind;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use crate::config::Settings;
use crate::data::validate::validate_catalog_file;
use crate::data::DataCatalog;
use crate::error::{Error, Result};
use crate::export::ExportRegistry;
use crate::optimizer::{compute_with_hooks, SearchHooks, SearchOptions, SearchOutcome, TestCase, TestResult};
use crate::parallel::Progress;
use crate::report::{write_log, LogOptions};
use crate::survivability::{DamageProfile, GuardianPlacement, HitpointBonuses, ModelParameters};

const EXIT_OK: i32 = 0;
const EXIT_FAILURE: i32 = 1;
const EXIT_USAGE: i32 = 2;
const EXIT_NO_RESULT: i32 = 3;

const PROGRESS_POLL: Duration = Duration::from_millis(100);
/// Polls between progress log lines.
const PROGRESS_LOG_EVERY: u32 = 20;

#[derive(Parser, Debug)]
#[command(name = "shieldtester", version, about = "Find the best shield loadout for a ship")]
pub struct Cli {
    /// Catalog JSON (overrides SHIELDTESTER_DATA).
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List ship names, imported ships first.
    Ships,
    /// Print the shield generator classes a ship can mount.
    Classes { ship: String },
    /// Print how many loadouts a test would score.
    Count {
        ship: String,
        #[command(flatten)]
        test: TestArgs,
    },
    /// Search for the best loadout.
    Test {
        ship: String,
        #[command(flatten)]
        test: TestArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Import a journal Loadout event and test the imported ship.
    Import {
        file: PathBuf,
        #[command(flatten)]
        test: TestArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Check a catalog file for errors and warnings.
    Validate { path: Option<PathBuf> },
}

#[derive(Args, Debug, Clone, Default)]
pub struct TestArgs {
    /// Boosters per loadout (default: every utility slot).
    #[arg(long)]
    pub boosters: Option<usize>,
    /// Generator class, or a range such as 5-7 (default: largest).
    #[arg(long, value_parser = parse_class_range)]
    pub class: Option<(u8, u8)>,
    #[arg(long)]
    pub no_prismatics: bool,
    /// Only test generators with this rating; repeatable.
    #[arg(long = "rating")]
    pub ratings: Vec<char>,
    /// Test every booster variant instead of the short list.
    #[arg(long)]
    pub full_list: bool,
    #[arg(long, default_value_t = 0.0)]
    pub explosive: f64,
    #[arg(long, default_value_t = 0.0)]
    pub kinetic: f64,
    #[arg(long, default_value_t = 0.0)]
    pub thermal: f64,
    #[arg(long, default_value_t = 0.0)]
    pub absolute: f64,
    /// Share of incoming damage that lands, 0-1.
    #[arg(long, default_value_t = 0.65)]
    pub effectiveness: f64,
    /// Guardian shield reinforcement hitpoints.
    #[arg(long, default_value_t = 0.0)]
    pub guardian: f64,
    /// Let boosters multiply the guardian reinforcement.
    #[arg(long)]
    pub guardian_boosted: bool,
    /// Shield cell bank hitpoints.
    #[arg(long, default_value_t = 0.0)]
    pub scb: f64,
    /// Worker threads; 0 uses every core.
    #[arg(long, default_value_t = 0)]
    pub cores: usize,
    /// Quick test: only search the best N generators.
    #[arg(long)]
    pub prelim: Option<usize>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    #[arg(long)]
    pub json: bool,
    /// Append the run to a log file in SHIELDTESTER_LOG_DIR.
    #[arg(long)]
    pub log: bool,
    #[arg(long, requires = "log")]
    pub log_name: Option<String>,
    #[arg(long, requires = "log_name")]
    pub time_and_name: bool,
    /// Include an export link for this service (coriolis, edsy).
    #[arg(long)]
    pub link: Option<String>,
}

#[derive(Debug, Serialize)]
struct TestReport<'r> {
    ship: &'r str,
    number_of_tests: u64,
    result: &'r TestResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    log_file: Option<PathBuf>,
}

pub fn parse_command(args: &[String]) -> std::result::Result<Cli, clap::Error> {
    Cli::try_parse_from(args)
}

pub fn run_with_args(args: &[String]) -> i32 {
    let cli = match parse_command(args) {
        Ok(cli) => cli,
        Err(err) => {
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => EXIT_OK,
                _ => EXIT_USAGE,
            };
            let _ = err.print();
            return code;
        }
    };

    let mut settings = Settings::from_env();
    if let Some(path) = cli.data {
        settings.data_path = path;
    }

    let outcome = match cli.command {
        Command::Validate { path } => {
            return handle_validate(path.as_deref().unwrap_or(settings.data_path.as_path()))
        }
        Command::Ships => handle_ships(&settings),
        Command::Classes { ship } => handle_classes(&settings, &ship),
        Command::Count { ship, test } => handle_count(&settings, &ship, &test),
        Command::Test { ship, test, output } => {
            load_catalog(&settings).and_then(|catalog| handle_test(&settings, &catalog, &ship, &test, &output))
        }
        Command::Import { file, test, output } => handle_import(&settings, &file, &test, &output),
    };

    match outcome {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            exit_code(&err)
        }
    }
}

fn exit_code(err: &Error) -> i32 {
    match err {
        Error::NoValidLoadout | Error::Cancelled => EXIT_NO_RESULT,
        _ => EXIT_FAILURE,
    }
}

fn load_catalog(settings: &Settings) -> Result<DataCatalog> {
    Ok(DataCatalog::load(&settings.data_path)?)
}

fn handle_ships(settings: &Settings) -> Result<i32> {
    let catalog = load_catalog(settings)?;
    for name in catalog.ship_names() {
        println!("{name}");
    }
    Ok(EXIT_OK)
}

fn handle_classes(settings: &Settings, ship: &str) -> Result<i32> {
    let catalog = load_catalog(settings)?;
    let test_case = catalog.select_ship(ship)?;
    let (min_class, max_class) = test_case.compatible_classes();
    println!("{min_class}-{max_class}");
    Ok(EXIT_OK)
}

fn handle_count(settings: &Settings, ship: &str, args: &TestArgs) -> Result<i32> {
    let catalog = load_catalog(settings)?;
    let mut test_case = catalog.select_ship(ship)?;
    configure(&mut test_case, args)?;
    println!("{}", test_case.number_of_tests(args.prelim));
    Ok(EXIT_OK)
}

fn handle_import(settings: &Settings, file: &Path, args: &TestArgs, output: &OutputArgs) -> Result<i32> {
    let mut catalog = load_catalog(settings)?;
    let raw = fs::read_to_string(file)?;
    let event: serde_json::Value =
        serde_json::from_str(&raw).map_err(|err| Error::Catalog(err.into()))?;
    let name = catalog.import_loadout(&event)?;
    if !output.json {
        println!("imported: {name}");
    }
    handle_test(settings, &catalog, &name, args, output)
}

/// Parse `6` or `5-7`.
fn parse_class_range(raw: &str) -> std::result::Result<(u8, u8), String> {
    let class = |value: &str| {
        value
            .trim()
            .parse::<u8>()
            .map_err(|_| format!("'{raw}' is not a class or class range"))
    };
    match raw.split_once('-') {
        Some((min, max)) => Ok((class(min)?, class(max)?)),
        None => class(raw).map(|value| (value, value)),
    }
}

fn configure(test_case: &mut TestCase<'_>, args: &TestArgs) -> Result<()> {
    if let Some((min, max)) = args.class {
        test_case.set_generator_class_range(min, max)?;
    }
    test_case.set_prismatics(!args.no_prismatics);
    if !args.ratings.is_empty() {
        test_case.set_rating_filter(args.ratings.iter().copied())?;
    }
    test_case.set_short_list(!args.full_list);
    if let Some(boosters) = args.boosters {
        test_case.set_number_of_boosters(boosters)?;
    }
    test_case.set_damage_profile(DamageProfile {
        explosive: args.explosive,
        kinetic: args.kinetic,
        thermal: args.thermal,
        absolute: args.absolute,
        effectiveness: args.effectiveness,
    })?;
    test_case.set_hitpoint_bonuses(HitpointBonuses {
        guardian: args.guardian,
        shield_cell_bank: args.scb,
    })?;
    Ok(())
}

fn search_options(settings: &Settings, args: &TestArgs) -> SearchOptions {
    SearchOptions {
        cores: args.cores,
        max_cores: settings.max_cores,
        prelim: args.prelim,
        params: ModelParameters {
            guardian_placement: if args.guardian_boosted {
                GuardianPlacement::Boosted
            } else {
                GuardianPlacement::Flat
            },
            ..ModelParameters::default()
        },
    }
}

/// Run the search on a scoped thread and log progress while waiting.
fn run_search(test_case: &TestCase<'_>, options: &SearchOptions) -> Result<SearchOutcome> {
    let progress = Progress::new();
    thread::scope(|scope| {
        let search = scope.spawn(|| {
            compute_with_hooks(
                test_case,
                options,
                SearchHooks {
                    progress: Some(&progress),
                    cancel: None,
                },
            )
        });
        let mut polls = 0u32;
        while !search.is_finished() {
            thread::sleep(PROGRESS_POLL);
            polls += 1;
            if polls % PROGRESS_LOG_EVERY == 0 {
                info!(
                    completed = progress.completed(),
                    total = progress.total(),
                    "search progress {:.0}%",
                    progress.fraction() * 100.0
                );
            }
        }
        joined_search(search.join())
    })
}

fn joined_search(joined: thread::Result<Result<SearchOutcome>>) -> Result<SearchOutcome> {
    joined.unwrap_or_else(|panic| {
        let message = panic
            .downcast_ref::<&str>()
            .map(|message| message.to_string())
            .or_else(|| panic.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        Err(Error::SearchPanicked(message))
    })
}

fn handle_test(
    settings: &Settings,
    catalog: &DataCatalog,
    ship: &str,
    args: &TestArgs,
    output: &OutputArgs,
) -> Result<i32> {
    let mut test_case = catalog.select_ship(ship)?;
    configure(&mut test_case, args)?;
    let options = search_options(settings, args);
    let number_of_tests = test_case.number_of_tests(args.prelim);

    if !output.json {
        println!("{}", test_case.summary());
        println!("Shield loadouts to be tested: [{number_of_tests}]");
        println!();
    }

    let result = match run_search(&test_case, &options)? {
        SearchOutcome::Completed(result) => result,
        SearchOutcome::Cancelled => return Err(Error::Cancelled),
    };

    let registry = ExportRegistry::default();
    let link = match &output.link {
        Some(service) => Some(registry.produce_link(&result.loadout, service)?),
        None => None,
    };
    let log_file = if output.log {
        let options = LogOptions {
            filename: output.log_name.clone(),
            time_and_name: output.time_and_name,
            export_service: output.link.clone(),
        };
        Some(write_log(&settings.log_dir, &test_case, &result, &options, &registry)?)
    } else {
        None
    };

    if output.json {
        let report = TestReport {
            ship: test_case.ship().display_name(),
            number_of_tests,
            result: &result,
            link,
            log_file,
        };
        let payload =
            serde_json::to_string_pretty(&report).map_err(|err| Error::Output(err.to_string()))?;
        println!("{payload}");
    } else {
        println!("{}", result.summary());
        if let Some(link) = link {
            println!();
            println!("{link}");
        }
        if let Some(path) = log_file {
            println!();
            println!("log written to {}", path.display());
        }
    }
    Ok(EXIT_OK)
}

fn handle_validate(path: &Path) -> i32 {
    match validate_catalog_file(path) {
        Ok(report) if !report.has_errors() => {
            for diagnostic in report.warnings() {
                eprintln!("- {diagnostic}");
            }
            println!("validation passed: {}", path.display());
            EXIT_OK
        }
        Ok(report) => {
            let errors = report.errors().count();
            eprintln!("validation failed: {errors} error(s)");
            for diagnostic in &report.diagnostics {
                eprintln!("- {diagnostic}");
            }
            EXIT_FAILURE
        }
        Err(err) => {
            eprintln!("validation failed: {err}");
            EXIT_FAILURE
        }
    }
}
