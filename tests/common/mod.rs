#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{TempDir, tempdir};

pub const COUNTRIES: &str = "France\nGermany\nIndia\nUnited Kingdom\nUnited States\n";
pub const LEGAL_SUFFIXES: &str = "gmbh\nco\nkg\nltd\npvt ltd\ninc\nllc\nag\n";

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Same as [`TestWorkspace::new`] with `Countries.txt` and `legal.txt` in place.
    pub fn with_reference_data() -> Self {
        let workspace = Self::new();
        workspace.write("Countries.txt", COUNTRIES);
        workspace.write("legal.txt", LEGAL_SUFFIXES);
        workspace
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }
}

/// Contacts table mixing phones, companies, countries and dates.
pub fn contacts_csv() -> String {
    [
        "id,company,phone,country,signed_on,notes",
        "1,Enno Roggemann GmbH & Co. KG,+49 40 123456,Germany,2024-01-15,first",
        "2,Acme Ltd,+44 20 7946 0958,\"London, United Kingdom\",15/02/2024,",
        "3,Tata Pvt Ltd,+91 98765 43210,India,\"Mar 3, 2024\",x",
        "4,Blue Ocean Inc,+1 415 555 1234,United States,2024/04/01,y",
        "5,,0712345678,France,01-05-2024,z",
    ]
    .join("\n")
        + "\n"
}
