use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use test_context::AsyncTestContext;

/// A throwaway key provisioning directory, removed on teardown.
pub struct KeyDirectoryContext {
    directory: TempDir,
}

impl KeyDirectoryContext {
    pub fn path(&self) -> &Path {
        self.directory.path()
    }

    pub fn write_key(&self, file_name: &str, pem: &str) -> PathBuf {
        let path = self.directory.path().join(file_name);
        fs::write(&path, pem).expect("Failed to write key file");
        path
    }

    pub fn remove_key(&self, file_name: &str) {
        fs::remove_file(self.directory.path().join(file_name)).expect("Failed to remove key file");
    }
}

impl AsyncTestContext for KeyDirectoryContext {
    async fn setup() -> Self {
        let directory = tempfile::tempdir().expect("Failed to create key directory");
        KeyDirectoryContext { directory }
    }
}
