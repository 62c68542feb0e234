//! Shared helpers for storage and service tests.

use std::sync::Arc;
use tempfile::TempDir;

use super::CsvConnection;

/// Fresh connection on a temp directory. Keep the `TempDir` alive for the
/// duration of the test or the files vanish under the repositories.
pub fn test_connection() -> (Arc<CsvConnection>, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let connection = Arc::new(CsvConnection::new(temp_dir.path()).unwrap());
    (connection, temp_dir)
}
