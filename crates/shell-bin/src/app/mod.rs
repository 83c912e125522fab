//! Application wiring for the shell core.

mod init;
mod lifecycle;

pub use init::run_shell;
pub use lifecycle::{end_session, show_status, EndSession};

use session_storage::{FileStorage, KeyValueStorage, MemoryStorage, SessionStore};
use shell_config_and_utils::Paths;
use std::sync::Arc;
use tracing::info;

/// Open the session store under `paths`, or an in-memory one.
fn open_store(
    paths: &Paths,
    ephemeral: bool,
) -> Result<Arc<SessionStore>, Box<dyn std::error::Error>> {
    let storage: Box<dyn KeyValueStorage> = if ephemeral {
        info!("Using in-memory session store");
        Box::new(MemoryStorage::new())
    } else {
        paths.ensure_dirs()?;
        let path = paths.session_store_file();
        info!(path = %path.display(), "Opening session store");
        Box::new(FileStorage::open(path)?)
    };
    Ok(Arc::new(SessionStore::new(storage)))
}
