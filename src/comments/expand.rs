//! Batch resolution of placeholder children.

use std::collections::HashSet;
use tracing::{debug, warn};

use super::collect::{Collected, collect_listing};
use crate::client::Upstream;
use crate::fullname::Fullname;

/// Largest number of child ids sent in one `morechildren` request.
pub const MORE_CHILDREN_BATCH: usize = 100;

/// Fetches child comments for `ids` in chunks and collects them.
///
/// Chunks are requested in order and merged in that order. A chunk that
/// fails (missing, timed out, or any other transport error) is logged and
/// skipped; the remaining chunks still run.
///
/// # Arguments
///
/// * `upstream`: Client issuing the batch requests
/// * `link`: Fullname of the post the children belong to
/// * `ids`: Bare child ids to fetch
///
/// # Returns
///
/// Comments and placeholders from every chunk that succeeded
pub fn expand_more_children<U>(upstream: &U, link: &Fullname, ids: &[String]) -> Collected
where
    U: Upstream + ?Sized,
{
    let mut merged = Collected::default();
    let no_wanted = HashSet::new();

    for (batch, chunk) in ids.chunks(MORE_CHILDREN_BATCH).enumerate() {
        match upstream.fetch_more_children(link, chunk) {
            Ok(things) => {
                debug!(%link, batch, things = things.len(), "fetched more children");
                merged.merge(collect_listing(&things, &no_wanted));
            }
            Err(err) => {
                warn!(%link, batch, size = chunk.len(), error = %err, "skipping failed morechildren batch");
            }
        }
    }

    merged
}
