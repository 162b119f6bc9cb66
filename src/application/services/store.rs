//! JSON case store
//!
//! One pretty-printed JSON document per case inside the configured cases directory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use itertools::Itertools;
use tracing::{debug, info, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::case::CASE_EXTENSION;
use crate::domain::Case;
use crate::infrastructure::traits::FileSystem;

/// Loads, saves and lists persisted cases.
pub struct CaseStore {
    fs: Arc<dyn FileSystem>,
    cases_dir: PathBuf,
    pretty: bool,
}

impl CaseStore {
    /// Create a new store over `cases_dir`.
    pub fn new(fs: Arc<dyn FileSystem>, cases_dir: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            cases_dir: cases_dir.into(),
            pretty: true,
        }
    }

    /// Write compact instead of indented JSON.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn cases_dir(&self) -> &Path {
        &self.cases_dir
    }

    pub fn case_path(&self, filename: &str) -> PathBuf {
        self.cases_dir.join(filename)
    }

    /// Persist `case`, generating its filename on first save.
    ///
    /// The document is written to a sibling `.tmp` file and renamed over the
    /// target, so a failed write leaves the previous version in place.
    /// Returns the filename.
    #[instrument(skip(self, case), fields(case = %case.name))]
    pub fn save(&self, case: &mut Case) -> ApplicationResult<String> {
        let filename = case.ensure_filename().to_string();

        self.fs
            .create_dir_all(&self.cases_dir)
            .with_path_context("create cases directory", &self.cases_dir)?;

        let json = if self.pretty {
            serde_json::to_string_pretty(case)
        } else {
            serde_json::to_string(case)
        }
        .map_err(|e| ApplicationError::OperationFailed {
            context: format!("serialize case {}", filename),
            source: Box::new(e),
        })?;

        let target = self.case_path(&filename);
        let tmp = target.with_extension(format!("{}.tmp", CASE_EXTENSION));
        let written = self.fs.write(&tmp, &json);
        if written.is_err() {
            let _ = self.fs.remove_file(&tmp);
        }
        written.with_path_context("write case", &tmp)?;
        self.fs
            .rename(&tmp, &target)
            .with_path_context("replace case", &target)?;

        info!("saved case to {}", target.display());
        Ok(filename)
    }

    /// Read a case back as stored, defaulting absent fields and refreshing row totals.
    #[instrument(skip(self))]
    pub fn load(&self, filename: &str) -> ApplicationResult<Case> {
        let path = self.case_path(filename);
        let load_failed = |source: Box<dyn std::error::Error + Send + Sync>| {
            ApplicationError::LoadFailed {
                filename: filename.to_string(),
                source,
            }
        };

        if !self.fs.exists(&path) {
            return Err(load_failed(
                format!("file not found: {}", path.display()).into(),
            ));
        }
        let content = self
            .fs
            .read_to_string(&path)
            .map_err(|e| load_failed(Box::new(e)))?;
        let mut case: Case =
            serde_json::from_str(&content).map_err(|e| load_failed(Box::new(e)))?;

        case.filename = filename.to_string();
        case.rehydrate();
        debug!("loaded case '{}' from {}", case.name, path.display());
        Ok(case)
    }

    /// Case filenames, newest first (the embedded timestamp sorts descending).
    pub fn list(&self) -> ApplicationResult<Vec<String>> {
        if !self.fs.is_dir(&self.cases_dir) {
            debug!("list: {} does not exist", self.cases_dir.display());
            return Ok(Vec::new());
        }
        let files = self
            .fs
            .list_files(&self.cases_dir)
            .with_path_context("list cases", &self.cases_dir)?;

        Ok(files
            .iter()
            .filter(|p| p.extension().is_some_and(|ext| ext == CASE_EXTENSION))
            .filter_map(|p| p.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .sorted_by(|a, b| b.cmp(a))
            .collect())
    }

    /// Most recent case filename, if any.
    pub fn latest(&self) -> ApplicationResult<Option<String>> {
        Ok(self.list()?.into_iter().next())
    }
}
