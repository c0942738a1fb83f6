//! Filter: entry selection, ordering and pagination for display.

pub mod engine;
pub mod page;

pub use engine::{EntryQuery, FilterError, KeywordMatcher, SortOrder};
pub use page::{paginate, Page, DEFAULT_PER_PAGE};
