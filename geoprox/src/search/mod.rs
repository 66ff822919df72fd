//! Distance search over paged WFS layers.
//!
//! [`PagedSearch`] drives the page loop, [`aggregate`] turns the accepted
//! features into the final ordered report and [`SearchSession`] keeps one
//! search per front end alive at a time.

pub mod aggregate;
mod error;
mod orchestrator;
mod session;
mod settings;
mod types;

pub use error::{SearchError, SearchFailure};
pub use orchestrator::{PagedSearch, SearchHandle};
pub use session::SearchSession;
pub use settings::{
    SearchSettings, DEFAULT_MAX_DISTANCE_M, DEFAULT_PAGE_DELAY_MS, DEFAULT_PAGE_SIZE,
    DEFAULT_PROGRESS_CAPACITY,
};
pub use types::{
    ScoredFeature, SearchOutcome, SearchProgress, SearchRequest, SearchResult, SearchState,
};
