pub mod combinations;
pub mod loadout_generator;
pub mod ranking;
pub mod result;
pub mod search;
pub mod test_case;

pub use loadout_generator::{number_of_tests, CandidateSpace};
pub use result::{Loadout, TestResult};
pub use search::{
    compute, compute_sequential, compute_with_hooks, SearchHooks, SearchOptions, SearchOutcome,
    CANCEL_CHECK_INTERVAL,
};
pub use test_case::TestCase;
