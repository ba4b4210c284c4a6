/// The in-memory editing session
///
/// One session object owns both mutable maps and is constructed explicitly
/// by the application shell; there is no ambient global state. Everything
/// here is discarded when the process exits (margins survive only through
/// explicit JSON export).

use super::bezels::BezelRegistry;
use super::margins::MarginStore;

#[derive(Debug, Default)]
pub struct Session {
    pub margins: MarginStore,
    pub bezels: BezelRegistry,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }
}
