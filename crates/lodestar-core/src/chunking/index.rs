//! The code index the chunking engine consults.
//!
//! Resolving a symbol name to its text and span is an external concern.
//! [`SymbolIndex`] is the seam; [`InMemoryIndex`] serves embedded callers
//! and tests, [`WorkspaceIndex`] reads files from disk and takes symbol
//! spans from a JSON symbol map produced by an external indexer.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use log::debug;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    error::{LodestarError, Result},
    models::{Scope, ScopeKind},
};

/// Where a symbol lives.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct SymbolLocation {
    pub name: String,
    pub file_path: String,
    pub start_line: usize,
    pub end_line: usize,
}

/// A resolved symbol with its source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolInfo {
    pub location: SymbolLocation,
    /// Text of lines `start_line..=end_line`
    pub text: String,
    /// Line count of the whole file holding the symbol
    pub file_lines: usize,
}

/// What a scope descriptor points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeResolution {
    Global,
    /// Files belonging to a module directory
    Module { files: Vec<String> },
    /// A file, optionally restricted to an inclusive line range
    File {
        path: String,
        range: Option<(usize, usize)>,
    },
    Symbol { name: String },
    /// A glob-like selector the index cannot expand
    Pattern { pattern: String },
    Unresolved { reason: String },
}

/// Splits `path:START-END` into its parts. Selectors without a valid
/// range are returned whole.
pub fn parse_file_selector(selector: &str) -> (String, Option<(usize, usize)>) {
    if let Some((path, range)) = selector.rsplit_once(':') {
        if let Some((start, end)) = range.split_once('-') {
            if let (Ok(start), Ok(end)) = (start.trim().parse::<usize>(), end.trim().parse()) {
                if start >= 1 && start <= end {
                    return (path.to_string(), Some((start, end)));
                }
            }
        }
    }
    (selector.to_string(), None)
}

/// Whether a selector is a glob-like pattern rather than a concrete path.
pub(crate) fn is_pattern(selector: &str) -> bool {
    selector.contains(['*', '?', '['])
}

/// Returns lines `start..=end` (1-based) of `text`.
pub fn slice_lines(text: &str, start: usize, end: usize) -> String {
    text.lines()
        .skip(start.saturating_sub(1))
        .take(end.saturating_sub(start) + 1)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Source of symbol and file content for the chunking engine.
pub trait SymbolIndex: Send + Sync {
    /// Resolves a symbol name to its location and text.
    fn lookup_symbol(&self, name: &str) -> Option<SymbolInfo>;

    /// Reads a whole file.
    fn read_file(&self, path: &str) -> Option<String>;

    /// Lists the files of a module directory.
    fn module_files(&self, module: &str) -> Vec<String>;

    /// Resolves a scope descriptor into something chunkable.
    fn resolve_scope(&self, scope: &Scope) -> ScopeResolution {
        let selector = scope.selector.trim();
        match scope.kind {
            ScopeKind::Global => ScopeResolution::Global,
            _ if is_pattern(selector) => ScopeResolution::Pattern {
                pattern: selector.to_string(),
            },
            ScopeKind::Symbol => ScopeResolution::Symbol {
                name: selector.to_string(),
            },
            ScopeKind::File => {
                let (path, range) = parse_file_selector(selector);
                ScopeResolution::File { path, range }
            }
            ScopeKind::Module => {
                let files = self.module_files(selector);
                if files.is_empty() {
                    ScopeResolution::Unresolved {
                        reason: format!("module '{selector}' has no files in the index"),
                    }
                } else {
                    ScopeResolution::Module { files }
                }
            }
        }
    }
}

/// Index over files and symbols registered in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIndex {
    files: HashMap<String, String>,
    symbols: HashMap<String, SymbolLocation>,
}

impl InMemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a file's full text.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<String>, text: impl Into<String>) -> Self {
        self.files.insert(path.into(), text.into());
        self
    }

    /// Registers a symbol span inside an already registered file.
    #[must_use]
    pub fn with_symbol(mut self, location: SymbolLocation) -> Self {
        self.symbols.insert(location.name.clone(), location);
        self
    }
}

impl SymbolIndex for InMemoryIndex {
    fn lookup_symbol(&self, name: &str) -> Option<SymbolInfo> {
        let location = self.symbols.get(name)?;
        let file = self.files.get(&location.file_path)?;
        Some(SymbolInfo {
            text: slice_lines(file, location.start_line, location.end_line),
            file_lines: file.lines().count(),
            location: location.clone(),
        })
    }

    fn read_file(&self, path: &str) -> Option<String> {
        self.files.get(path).cloned()
    }

    fn module_files(&self, module: &str) -> Vec<String> {
        let prefix = format!("{}/", module.trim_end_matches('/'));
        let mut files: Vec<String> = self
            .files
            .keys()
            .filter(|path| {
                path.strip_prefix(&prefix)
                    .is_some_and(|rest| !rest.contains('/'))
            })
            .cloned()
            .collect();
        files.sort();
        files
    }
}

/// Index over a directory on disk plus an optional symbol map.
#[derive(Debug, Clone)]
pub struct WorkspaceIndex {
    root: PathBuf,
    symbols: HashMap<String, SymbolLocation>,
}

impl WorkspaceIndex {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            symbols: HashMap::new(),
        }
    }

    /// Loads symbol spans from a JSON array of [`SymbolLocation`].
    pub fn with_symbol_map(mut self, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw =
            fs::read_to_string(path).map_err(|e| LodestarError::file_system(path, e))?;
        let locations: Vec<SymbolLocation> = serde_json::from_str(&raw)?;
        debug!("Loaded {} symbols from {}", locations.len(), path.display());
        self.symbols = locations
            .into_iter()
            .map(|location| (location.name.clone(), location))
            .collect();
        Ok(self)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves `path` against the root. Absolute paths, `..` segments and
    /// symlinks that leave the root resolve to `None`.
    fn contained(&self, path: &str) -> Option<PathBuf> {
        let root = self.root.canonicalize().ok()?;
        let candidate = root.join(path).canonicalize().ok()?;
        if candidate.starts_with(&root) {
            Some(candidate)
        } else {
            debug!("Refusing '{path}': outside {}", root.display());
            None
        }
    }
}

impl SymbolIndex for WorkspaceIndex {
    fn lookup_symbol(&self, name: &str) -> Option<SymbolInfo> {
        let location = self.symbols.get(name)?;
        let file = self.read_file(&location.file_path)?;
        Some(SymbolInfo {
            text: slice_lines(&file, location.start_line, location.end_line),
            file_lines: file.lines().count(),
            location: location.clone(),
        })
    }

    fn read_file(&self, path: &str) -> Option<String> {
        fs::read_to_string(self.contained(path)?).ok()
    }

    fn module_files(&self, module: &str) -> Vec<String> {
        let Some(dir) = self.contained(module) else {
            return Vec::new();
        };
        let Ok(entries) = fs::read_dir(dir) else {
            return Vec::new();
        };
        let module = module.trim_end_matches('/');
        let mut files: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_ok_and(|ft| ft.is_file()))
            .map(|entry| format!("{}/{}", module, entry.file_name().to_string_lossy()))
            .collect();
        files.sort();
        files
    }
}
