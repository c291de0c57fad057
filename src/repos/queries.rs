/*
 * Responsibility
 * - 複数テーブルをまたぐ読み取り (implicit / lambda handler で共有)
 */
use std::sync::Arc;

use uuid::Uuid;

use crate::repos::entities::{Connection, Dispenser};
use crate::repos::error::RepoError;
use crate::repos::repo::Repo;
use crate::repos::store::{Filter, Page, RecordStore};

/// Dispensers referenced by the account's live connections, in connection order.
pub async fn account_dispensers(
    store: &Arc<dyn RecordStore>,
    account_id: Uuid,
    page: Option<Page>,
) -> Result<Vec<Dispenser>, RepoError> {
    let connections = Repo::<Connection>::new(store.clone())
        .find(Filter::new().eq("account_id", account_id), page)
        .await?;

    let dispensers = Repo::<Dispenser>::new(store.clone());
    let mut found = Vec::with_capacity(connections.len());
    for connection in connections {
        match dispensers.get(connection.dispenser_id).await {
            Ok(dispenser) => found.push(dispenser),
            Err(RepoError::NotFound(_)) => continue,
            Err(err) => return Err(err),
        }
    }

    Ok(found)
}

pub async fn account_dispenser(
    store: &Arc<dyn RecordStore>,
    account_id: Uuid,
    dispenser_id: Uuid,
) -> Result<Dispenser, RepoError> {
    Repo::<Connection>::new(store.clone())
        .find_one(
            Filter::new()
                .eq("account_id", account_id)
                .eq("dispenser_id", dispenser_id),
        )
        .await
        .map_err(|err| match err {
            RepoError::NotFound(_) => RepoError::NotFound("dispenser"),
            other => other,
        })?;

    Repo::<Dispenser>::new(store.clone()).get(dispenser_id).await
}
