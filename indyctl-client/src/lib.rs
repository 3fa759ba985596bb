//! indyctl-client: typed access to the repository manager admin API
//!
//! Every call returns `Result<ApiResult<T>, ClientError>`:
//! - `Ok(ApiResult::Success(T))` for 2xx responses
//! - `Ok(ApiResult::Failure { status, message })` for 4xx/5xx responses
//! - `Err(ClientError)` only when the request itself could not complete
//!
//! Calls made on behalf of an editing or listing flow go through a
//! [`Session`], so a response that arrives after the flow is closed is
//! discarded instead of applied.

pub mod client;
pub mod error;
pub mod group;
pub mod listing;
pub mod result;
pub mod session;

pub use client::IndyClient;
pub use error::ClientError;
pub use group::{load_group_editor, new_group_editor, GroupEditView};
pub use listing::{fetch_all, StoreListing, StorePageSource};
pub use result::{ApiFailure, ApiResult};
pub use session::{CancelHandle, Session};
