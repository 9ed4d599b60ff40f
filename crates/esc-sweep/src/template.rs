use std::fs;
use std::path::Path;

use esc_core::errors::{ErrorInfo, EscError};
use serde::{Deserialize, Serialize};

/// Marker before which varied options are injected.
pub const DEFAULT_MARKER: &str = "saOutputOrder";

/// Substring identifying the primary simulator input file.
pub const BODY_FILES_MARKER: &str = "saBodyFiles";

/// A simulator input file held in memory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateDocument {
    file_name: String,
    contents: String,
}

impl TemplateDocument {
    /// Creates a document from its base file name and text.
    pub fn new(file_name: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            contents: contents.into(),
        }
    }

    /// Reads a document from disk, keeping only the base name.
    pub fn read(path: &Path) -> Result<Self, EscError> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| {
                EscError::Configuration(
                    ErrorInfo::new("template-name", "template path has no file name")
                        .with_path(path),
                )
            })?;
        let contents =
            fs::read_to_string(path).map_err(|err| EscError::io("template-read", path, err))?;
        Ok(Self::new(file_name, contents))
    }

    /// Base file name.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Document text.
    pub fn contents(&self) -> &str {
        &self.contents
    }

    /// True when this is the primary input file (it declares the body files).
    pub fn declares_body_files(&self) -> bool {
        self.contents.contains(BODY_FILES_MARKER)
    }

    /// Returns a copy of the document with `block` inserted immediately before
    /// the first occurrence of `marker`.
    ///
    /// Whitespace at the splice point and around the block is normalized to a
    /// single blank line on each side of the block; the marker is followed by
    /// a single space and the remainder of its line.
    pub fn splice(&self, block: &str, marker: &str) -> Result<String, EscError> {
        let Some(position) = self.contents.find(marker) else {
            return Err(EscError::MissingMarker(
                ErrorInfo::new("template-marker", "template has no insertion marker")
                    .with_context("file", self.file_name.clone())
                    .with_context("marker", marker),
            ));
        };
        let head = self.contents[..position].trim_end();
        let tail = self.contents[position + marker.len()..].trim_start();
        let block = block.trim();

        let mut output = String::with_capacity(self.contents.len() + block.len() + 8);
        output.push_str(head);
        if !head.is_empty() {
            output.push_str("\n\n");
        }
        if !block.is_empty() {
            output.push_str(block);
            output.push_str("\n\n");
        }
        output.push_str(marker);
        if !tail.is_empty() {
            output.push(' ');
            output.push_str(tail);
        }
        Ok(output)
    }
}
