//! Running a `find` off the calling thread.

use joinery_foundation::{QueryPart, QueryResults};
use joinery_sources::DatasourceRef;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::debug;

/// Runs `source.find(query)` on the blocking pool of `handle`.
///
/// The task cannot be cancelled once started; dropping the handle only
/// detaches it.
#[must_use]
pub fn spawn_find(
    handle: &Handle,
    source: DatasourceRef,
    query: Vec<QueryPart>,
) -> JoinHandle<QueryResults> {
    handle.spawn_blocking(move || {
        debug!(datasource = source.name(), parts = query.len(), "background find");
        source.find(&query)
    })
}
