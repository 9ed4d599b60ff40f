use std::path::{Path, PathBuf};

use esc_core::errors::EscError;
use serde::{Deserialize, Serialize};

use crate::write::write_atomic;

/// File name of the sweep manifest read by the simulator's batch tooling.
pub const MANIFEST_FILE_NAME: &str = "vspace.in";

/// Top-level description of a sweep, written next to the sweep directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepManifest {
    /// Name of the sweep directory.
    pub dest_dir_name: String,
    /// Trial name prefixing every run directory.
    pub trial_name: String,
    /// Varied body files.
    pub body_files: Vec<String>,
    /// Axis names, declared as placeholder parameters.
    pub parameters: Vec<String>,
    /// Input file declaring the body files, if any.
    pub primary_file: Option<String>,
}

impl SweepManifest {
    /// Manifest location for a sweep rooted at `destination`.
    pub fn path_for(destination: &Path) -> PathBuf {
        destination
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(MANIFEST_FILE_NAME)
    }

    /// Renders the manifest text. Sections are separated by one blank line;
    /// empty sections are left out.
    pub fn render(&self) -> String {
        let header = vec![
            "# dummy file workaround for BigPlanet.".to_string(),
            format!("sDestFolder {}", self.dest_dir_name),
            format!("sTrialName {}", self.trial_name),
        ];
        let bodies = self
            .body_files
            .iter()
            .map(|body| format!("sBodyFile {body}"))
            .collect();
        let parameters = self
            .parameters
            .iter()
            .enumerate()
            .map(|(n, name)| format!("PARAMETER_{n} [0, 0, n0] {name}"))
            .collect();
        let primary = self
            .primary_file
            .iter()
            .map(|primary| format!("sPrimaryFile {primary}"))
            .collect();
        let sections: Vec<Vec<String>> = vec![header, bodies, parameters, primary];
        let mut text = sections
            .into_iter()
            .filter(|section| !section.is_empty())
            .map(|section| section.join("\n"))
            .collect::<Vec<_>>()
            .join("\n\n");
        text.push('\n');
        text
    }

    /// Writes (or overwrites) the manifest at `path`.
    pub fn write(&self, path: &Path) -> Result<(), EscError> {
        write_atomic(path, &self.render())
    }
}
