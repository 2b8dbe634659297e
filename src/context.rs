use std::sync::Arc;

use crate::snapshot::SnapshotPath;
use crate::store::Store;

/// State shared by every connection: the store and the read-only snapshot location.
#[derive(Clone)]
pub struct Context {
    pub store: Store,
    pub snapshot: Arc<SnapshotPath>,
}

impl Context {
    pub fn new(store: Store, snapshot: SnapshotPath) -> Context {
        Context {
            store,
            snapshot: Arc::new(snapshot),
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Context::new(Store::new(), SnapshotPath::new(".", "dump.rdb"))
    }
}
