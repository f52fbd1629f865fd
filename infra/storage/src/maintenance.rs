use std::path::Path;
use std::time::{Duration, SystemTime};
use walkdir::WalkDir;

/// Infix of in-flight write files: `<key>.bin.candortmp.<n>`.
pub(crate) const TMP_MARKER: &str = ".candortmp.";

pub(crate) const DEFAULT_STALE_AFTER: Duration = Duration::from_secs(300);

/// Deletes temp files under `root` whose last modification is more than `stale_after` before
/// `now`. Files with an unreadable timestamp count as stale. Returns how many were deleted.
pub(crate) fn sweep(root: &Path, now: SystemTime, stale_after: Duration) -> usize {
    WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.file_name().to_str().is_some_and(|name| name.contains(TMP_MARKER)))
        .filter(|entry| {
            let modified = entry.metadata().ok().and_then(|meta| meta.modified().ok());
            modified.and_then(|at| now.duration_since(at).ok()).is_none_or(|age| age > stale_after)
        })
        .filter(|entry| match std::fs::remove_file(entry.path()) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(path = %entry.path().display(), error = %err, "Cannot remove temp file");
                false
            },
        })
        .count()
}
