use std::path::Path;

use super::filename::extract;
use super::loader::load_file;
use super::model::{ResultTable, RunGroup};

/// Group tables by `[K][variant]`.
///
/// Files whose names cannot be parsed are skipped with a warning. When two
/// files map to the same key the later one wins.
pub fn group(files: impl IntoIterator<Item = ResultTable>) -> RunGroup {
    let mut groups = RunGroup::new();
    for table in files {
        let key = match extract(&table.filename) {
            Ok(key) => key,
            Err(e) => {
                log::warn!("skipping {}: {e}", table.filename);
                continue;
            }
        };
        let slot = groups.entry(key.parameter).or_default();
        if let Some(previous) = slot.get(&key.variant) {
            log::warn!(
                "{key}: {} replaces {}",
                table.filename,
                previous.filename
            );
        }
        log::debug!("{} → {key}", table.filename);
        slot.insert(key.variant, table);
    }
    groups
}

/// Load each path and group the ones that load.
///
/// Unreadable or malformed files are skipped with a warning.
pub fn group_paths<P: AsRef<Path>>(paths: &[P]) -> RunGroup {
    let tables = paths.iter().filter_map(|path| {
        let path = path.as_ref();
        match load_file(path) {
            Ok(table) => Some(table),
            Err(e) => {
                log::warn!("skipping {}: {e:#}", path.display());
                None
            }
        }
    });
    group(tables)
}
