pub mod config;
pub mod constituents;
pub mod error;
pub mod filters;
pub mod listing;
pub mod pager;
pub mod store;
pub mod time_format;
pub mod validation;

pub use config::IndyConfig;
pub use constituents::{ConstituentEditor, EditError, EditOp, Outcome};
pub use error::{IndyError, Result};
pub use listing::{search_by_key, sort_by_prop, sort_endpoints, SortProp};
pub use pager::{PageRequest, PagerState, ScrollPosition, StorePager};
pub use store::{DisableTimeout, DisableTimeoutList, Store, StoreKey, StorePage, StoreType, VersionInfo};
pub use time_format::{seconds_to_duration, timestamp_to_current_as_duration, timestamp_to_date_format};
pub use validation::{FormMode, StoreForm, ValidationError};
