//! Loading a group into the constituent editor

use indyctl_core::{ConstituentEditor, Store, StoreKey, StoreType};

use crate::client::IndyClient;
use crate::error::ClientError;
use crate::result::ApiResult;
use crate::session::Session;

/// Everything the group edit form needs
#[derive(Debug, Clone, PartialEq)]
pub struct GroupEditView {
    pub store: Store,
    pub editor: ConstituentEditor,
    /// Epoch millis at which a disabled group is re-enabled
    pub disable_expiration: Option<i64>,
}

impl GroupEditView {
    /// The store with the edited constituents written back, ready to submit.
    pub fn to_store(&self) -> Store {
        let mut store = self.store.clone();
        store.package_type = self.editor.package_type().to_string();
        store.key = Some(self.editor.group().to_string());
        self.editor.apply_to(&mut store);
        store
    }
}

/// Load an existing group with its candidates and disable timeout.
///
/// Only the group fetch is fatal. A failed candidate query leaves the
/// available list empty; a missing timeout leaves the expiration unset.
pub async fn load_group_editor(
    client: &IndyClient,
    session: &Session,
    package_type: &str,
    name: &str,
) -> Result<ApiResult<GroupEditView>, ClientError> {
    let key = StoreKey::new(package_type, StoreType::Group, name);

    let store = match session.guard(client.get_store(&key)).await?? {
        ApiResult::Success(store) => store,
        ApiResult::Failure(failure) => {
            tracing::warn!(%key, "failed to load group: {}", failure);
            return Ok(ApiResult::Failure(failure));
        }
    };

    let candidates = candidates(client, session, Some(package_type)).await?;
    let editor = ConstituentEditor::from_store(&store, candidates);

    let disable_expiration = match session.guard(client.get_store_timeout(&key)).await?? {
        ApiResult::Success(timeout) => timeout.expiration,
        ApiResult::Failure(failure) => {
            tracing::debug!(%key, "no disable timeout: {}", failure);
            None
        }
    };

    Ok(ApiResult::Success(GroupEditView {
        store,
        editor,
        disable_expiration,
    }))
}

/// Start a new group; every store of every package type is a candidate.
pub async fn new_group_editor(
    client: &IndyClient,
    session: &Session,
    package_type: &str,
    name: &str,
) -> Result<GroupEditView, ClientError> {
    let key = StoreKey::new(package_type, StoreType::Group, name);
    let candidates = candidates(client, session, None).await?;
    let store = Store::new(&key);
    let editor = ConstituentEditor::from_store(&store, candidates);

    Ok(GroupEditView {
        store,
        editor,
        disable_expiration: None,
    })
}

async fn candidates(
    client: &IndyClient,
    session: &Session,
    package_type: Option<&str>,
) -> Result<Vec<StoreKey>, ClientError> {
    match session.guard(client.get_endpoints(package_type)).await?? {
        ApiResult::Success(page) => Ok(page.items.iter().map(Store::store_key).collect()),
        ApiResult::Failure(failure) => {
            tracing::warn!("getting available constituents failed: {}", failure);
            Ok(Vec::new())
        }
    }
}
