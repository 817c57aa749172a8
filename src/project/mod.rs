//! Batch driver: directory scan, file loading, and the run loop.
//!
//! [`ReverseEngineer`] ties a [`SourceParser`] to the two-phase model
//! builder. One call to [`ReverseEngineer::analyze_directory`] enumerates
//! the source files, parses and translates each in turn, and resolves the
//! whole batch once every file has contributed.
//!
//! Failure handling splits by kind: filesystem problems (a missing
//! directory, an unreadable file, a failed walk) abort the run, while a
//! parse failure only skips its file. A file that fails to parse late in
//! the batch leaves every earlier contribution in the model.

use std::io;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::ast::SourceParser;
use crate::base::FileId;
use crate::model::{Analyzer, AnalyzerOptions, Model};

// ============================================================================
// ERRORS
// ============================================================================

/// Fatal error of a batch run.
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("directory walk failed")]
    Walk(#[from] walkdir::Error),
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

// ============================================================================
// SOURCE SET
// ============================================================================

/// The enumerated source files of one batch, in discovery order.
///
/// Ids are dense and assigned in insertion order, so they double as the
/// translation order of the batch.
#[derive(Debug, Default)]
pub struct SourceSet {
    files: IndexMap<FileId, PathBuf>,
}

impl SourceSet {
    /// Register a path and assign it the next id.
    pub fn insert(&mut self, path: PathBuf) -> FileId {
        let id = FileId::new(self.files.len() as u32);
        self.files.insert(id, path);
        id
    }

    /// Number of registered files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// The path registered under `id`.
    pub fn path(&self, id: FileId) -> Option<&Path> {
        self.files.get(&id).map(PathBuf::as_path)
    }

    /// Iterate files in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = (FileId, &Path)> {
        self.files.iter().map(|(&id, path)| (id, path.as_path()))
    }
}

/// Enumerate all files under `root` whose extension matches, depth-first.
///
/// The extension comparison is case-insensitive, so `Main.JAVA` is picked
/// up alongside `Main.java`. Entries are visited in file-name order, which
/// pins the translation order (and so the id assignment) for a given tree.
/// Walk errors are fatal.
pub fn collect_sources(root: &Path, extension: &str) -> Result<SourceSet, ProjectError> {
    if !root.is_dir() {
        return Err(ProjectError::NotADirectory(root.to_path_buf()));
    }

    let mut sources = SourceSet::default();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let matches = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));
        if matches {
            sources.insert(entry.into_path());
        }
    }
    debug!(files = sources.len(), root = %root.display(), "enumerated sources");
    Ok(sources)
}

// ============================================================================
// RUN LOOP
// ============================================================================

/// The batch entry point: a parser plus the run options.
pub struct ReverseEngineer<P> {
    parser: P,
    options: AnalyzerOptions,
}

impl<P: SourceParser> ReverseEngineer<P> {
    pub fn new(parser: P, options: AnalyzerOptions) -> Self {
        Self { parser, options }
    }

    /// Reverse one directory tree into a model.
    ///
    /// Every matching file is read and parsed; each parsed unit is
    /// translated immediately. Deferred references resolve only after the
    /// last file, so files may reference types in any order.
    pub fn analyze_directory(&self, root: &Path) -> Result<Model, ProjectError> {
        let sources = collect_sources(root, self.parser.file_extension())?;
        info!(files = sources.len(), root = %root.display(), "starting batch");

        let mut analyzer = Analyzer::new(self.options.clone());
        let mut skipped = 0usize;
        for (file, path) in sources.iter() {
            let text = std::fs::read_to_string(path).map_err(|source| ProjectError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            match self.parser.parse(&text) {
                Ok(unit) => analyzer.add_unit(file, &unit),
                Err(error) => {
                    warn!(path = %path.display(), %error, "parse failed, skipping file");
                    skipped += 1;
                }
            }
        }

        info!(
            translated = sources.len() - skipped,
            skipped,
            pending = analyzer.pending().len(),
            "translation complete, resolving"
        );
        Ok(analyzer.finish())
    }
}
