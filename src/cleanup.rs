use std::path::{Path, PathBuf};

/// Removal of a data directory that a resolve call created.
///
/// Running it is best effort: the directory is only removed when it is empty,
/// and every failure (not empty, permission denied, already gone) is
/// discarded without being logged.
#[derive(Debug)]
pub struct DataDirCleanup {
    path: PathBuf,
}

impl DataDirCleanup {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn run(self) {
        let _ = std::fs::remove_dir(&self.path);
    }
}

/// Deferred cleanups owned by the host program.
///
/// Whatever is still pending when the registry is dropped gets run, so a
/// registry held in `main` gives removal at normal termination. Nothing is
/// deduplicated; each auto-created directory adds its own entry.
#[derive(Debug, Default)]
pub struct Cleanups {
    pending: Vec<DataDirCleanup>,
}

impl Cleanups {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, cleanup: DataDirCleanup) {
        self.pending.push(cleanup);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.pending.iter().map(DataDirCleanup::path)
    }

    /// Run every pending cleanup, most recently registered first.
    pub fn run(mut self) {
        self.run_pending();
    }

    /// Disarm every pending cleanup and hand back the directories.
    pub fn forget(mut self) -> Vec<PathBuf> {
        self.pending.drain(..).map(|c| c.path).collect()
    }

    fn run_pending(&mut self) {
        while let Some(cleanup) = self.pending.pop() {
            cleanup.run();
        }
    }
}

impl Drop for Cleanups {
    fn drop(&mut self) {
        self.run_pending();
    }
}
