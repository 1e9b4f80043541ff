//! Shared test utilities for integration and E2E tests.
//!
//! This module provides common fixtures, helper functions, and canned
//! metadata to reduce duplication across test files.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[tokio::test(flavor = "multi_thread")]
//! async fn test_example() {
//!     let server = MockServer::start().await;
//!     let fixture = TestFixture::new().with_endpoint(&server.uri());
//!     fixture.command().arg("reload").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::fragments;
    pub use super::TestFixture;
}

/// Metadata fragments as the file-backed plugins write them.
#[allow(dead_code)]
pub mod fragments {
    pub const VERSION: &str = "version: 3\n";

    pub const TABLES: &str = "- table:\n    schema: public\n    name: users\n";

    pub const ACTIONS: &str = "- name: login\n  definition:\n    handler: http://auth/login\n";

    /// Remote `export_metadata` response matching the fragments above.
    pub const EXPORT_RESPONSE: &str = r#"{
        "version": 3,
        "tables": [{"table": {"schema": "public", "name": "users"}}],
        "actions": [{"name": "login", "definition": {"handler": "http://auth/login"}}]
    }"#;
}

/// A test fixture that provides a temporary directory with a config file and
/// a metadata directory.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Add a `.metasync.yaml` configuration file with the given content.
    pub fn with_config(self, content: &str) -> Self {
        self.temp_dir
            .child(".metasync.yaml")
            .write_str(content)
            .expect("Failed to write config file");
        self
    }

    /// Add a minimal configuration pointing at `endpoint`.
    pub fn with_endpoint(self, endpoint: &str) -> Self {
        self.with_config(&format!("endpoint: {}\n", endpoint))
    }

    /// Add a fragment file to the metadata directory.
    pub fn with_fragment(self, name: &str, content: &str) -> Self {
        self.temp_dir
            .child("metadata")
            .child(name)
            .write_str(content)
            .expect("Failed to write fragment");
        self
    }

    /// Add the version, tables and actions fragments.
    pub fn with_sample_metadata(self) -> Self {
        self.with_fragment("version.yaml", fragments::VERSION)
            .with_fragment("tables.yaml", fragments::TABLES)
            .with_fragment("actions.yaml", fragments::ACTIONS)
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Get the path to the config file.
    pub fn config_path(&self) -> PathBuf {
        self.temp_dir.path().join(".metasync.yaml")
    }

    /// Get the path to the metadata directory.
    pub fn metadata_dir(&self) -> PathBuf {
        self.temp_dir.path().join("metadata")
    }

    /// Get a child path of the fixture directory, for `assert_fs` assertions.
    pub fn child_path(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Read a file from the metadata directory.
    pub fn read_fragment(&self, name: &str) -> String {
        std::fs::read_to_string(self.metadata_dir().join(name)).expect("Failed to read fragment")
    }

    /// Create a command running in this fixture's directory, without colors
    /// and without environment overrides leaking in from the host.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("metasync");
        cmd.current_dir(self.path())
            .env_remove("METASYNC_CONFIG")
            .env_remove("METASYNC_ENDPOINT")
            .env_remove("METASYNC_ADMIN_SECRET")
            .env_remove("RUST_LOG")
            .arg("--color")
            .arg("never");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_with_config() {
        let fixture = TestFixture::new().with_endpoint("http://localhost:8080");
        assert!(fixture.config_path().exists());
    }

    #[test]
    fn test_fixture_sample_metadata() {
        let fixture = TestFixture::new().with_sample_metadata();
        assert_eq!(fixture.read_fragment("version.yaml"), fragments::VERSION);
        assert!(fixture.metadata_dir().join("tables.yaml").exists());
    }

    #[test]
    fn test_export_response_is_valid_json() {
        serde_json::from_str::<serde_json::Value>(fragments::EXPORT_RESPONSE)
            .expect("EXPORT_RESPONSE should be valid JSON");
    }
}
