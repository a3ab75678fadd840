use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for the shield tester library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// No ship (catalog or imported) matches the requested name.
    #[error("unknown ship: {name}")]
    UnknownShip { name: String },

    /// The test case cannot be used as configured.
    #[error("invalid test configuration: {0}")]
    Configuration(#[from] ConfigError),

    /// The loadout generator produced no candidates for the test case.
    #[error("no valid loadout: the test case yields no shield generator and booster combinations")]
    NoValidLoadout,

    /// The data catalog could not be loaded.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// A search was cancelled where the caller expected a result.
    #[error("search cancelled")]
    Cancelled,

    /// A worker hit an unusable score and aborted the search.
    #[error(transparent)]
    Search(#[from] SearchError),

    /// The worker thread pool could not be created.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// The background search thread panicked before returning a result.
    #[error("search thread panicked: {0}")]
    SearchPanicked(String),

    /// A result could not be rendered for output.
    #[error("failed to render output: {0}")]
    Output(String),

    /// Building an export link failed.
    #[error("failed to encode loadout for export: {0}")]
    Export(String),

    /// Wrapper for IO errors (log sink).
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Problems with a caller-supplied test case, reported before a search starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("shield generator class {class} is outside the compatible range {min}-{max}")]
    GeneratorClassOutOfRange { class: u8, min: u8, max: u8 },

    #[error("invalid shield generator class range {min}-{max}")]
    InvalidClassRange { min: u8, max: u8 },

    #[error("ship '{ship}' cannot mount any shield generator in the catalog")]
    NoCompatibleGeneratorClass { ship: String },

    #[error("no shield generator in the catalog has rating {rating}")]
    UnknownRating { rating: char },

    #[error("{requested} boosters requested but ship has {slots} utility slots")]
    TooManyBoosters { requested: usize, slots: usize },

    #[error("{field} must be a finite, non-negative number (got {value})")]
    InvalidValue { field: &'static str, value: f64 },

    #[error("damage effectiveness must be between 0 and 1 (got {0})")]
    DamageEffectivenessOutOfRange(f64),

    #[error("unknown export service '{0}'")]
    UnknownExportService(String),
}

/// Failures while loading or importing catalog data.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("unable to read catalog '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid catalog data: {0}")]
    Invalid(String),

    #[error("loadout event cannot be imported: {0}")]
    Import(String),
}

/// Errors raised by a search worker.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    #[error("non-finite score for '{generator}' with boosters {boosters:?}")]
    NonFiniteScore {
        generator: String,
        boosters: Vec<usize>,
    },
}
