use crate::storage::FileStore;
use crate::store::EntryStore;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<EntryStore<FileStore>>>,
}

impl AppState {
    pub fn new(store: EntryStore<FileStore>) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }
}
