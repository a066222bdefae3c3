//! Exclusion list of repositories that must stay in the source organization
use std::{collections::HashSet, fs::read_to_string, io::ErrorKind, path::Path};

use crate::reporter::Reporter;

/// Bare repository names (no organization prefix) excluded from a migration
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExceptionSet {
    /// Excluded names
    names: HashSet<String>,
}

impl ExceptionSet {
    /// Parse the content of an exceptions file.
    ///
    /// One name per line, surrounding whitespace ignored. Blank lines and
    /// lines starting with `#` are skipped.
    pub fn parse(contents: &str) -> Self {
        contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .collect()
    }

    /// Whether `name` is excluded
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Number of excluded names
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether nothing is excluded
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Excluded names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.names.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl<S: Into<String>> FromIterator<S> for ExceptionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Load the exceptions file at `path`.
///
/// A file that can't be read never aborts the run: a warning is reported and
/// an empty set is returned.
pub fn load_exceptions(path: &Path, reporter: &dyn Reporter) -> ExceptionSet {
    match read_to_string(path) {
        Ok(contents) => ExceptionSet::parse(&contents),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            reporter.warning(&format!(
                "Exceptions file {} not found. No exceptions will be applied.",
                path.display()
            ));
            ExceptionSet::default()
        }
        Err(e) => {
            reporter.warning(&format!(
                "Unable to read exceptions file {}: {e}. No exceptions will be applied.",
                path.display()
            ));
            ExceptionSet::default()
        }
    }
}
