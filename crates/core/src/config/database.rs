//! Diagnostic database discovery and loading

use super::schema::DatabaseConfig;
use crate::error::{Error, Result, ResultExt};
use autodiag_search::RecordStore;
use std::path::{Path, PathBuf};

/// Resolve the database path.
///
/// An explicit path (command line first, then `database.path`) wins as-is;
/// otherwise the first candidate that exists is used. Relative paths are
/// resolved against `base`.
pub fn locate_database(
    base: &Path,
    explicit: Option<&Path>,
    config: &DatabaseConfig,
) -> Result<PathBuf> {
    if let Some(path) = explicit.or(config.path.as_deref().map(Path::new)) {
        return Ok(base.join(path));
    }

    config
        .candidates
        .iter()
        .map(|candidate| base.join(candidate))
        .find(|path| path.is_file())
        .ok_or_else(|| Error::database_not_found(&config.candidates))
}

/// Locate and load the record store.
pub fn open_database(
    base: &Path,
    explicit: Option<&Path>,
    config: &DatabaseConfig,
) -> Result<(PathBuf, RecordStore)> {
    let path = locate_database(base, explicit, config)?;
    let store = RecordStore::load(&path).context(format!("While loading {}", path.display()))?;

    tracing::debug!(path = %path.display(), records = store.len(), "Database opened");
    Ok((path, store))
}
