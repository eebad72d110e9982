use crate::error::{CatalogError, ParseError};
use crate::parsers::{ProjectSettings, SyntaxProvider, SyntaxTree};
use std::fs::DirEntry;
use std::path::{Path, PathBuf};

/// One parsed source file
#[derive(Debug, Clone)]
pub struct SourceUnit {
    /// Path relative to the repository root, forward slashes
    pub path: String,
    pub text: String,
    pub tree: SyntaxTree,
}

impl SourceUnit {
    /// Test files: `*.spec.*` and `*.test.*`
    pub fn is_test_unit(&self) -> bool {
        let file_name = self.path.rsplit('/').next().unwrap_or(&self.path);
        file_name.contains(".spec.") || file_name.contains(".test.")
    }
}

/// Reads a text file, dropping a leading UTF-8 byte order mark
pub fn read_source(path: &Path) -> std::io::Result<String> {
    let text = std::fs::read_to_string(path)?;
    Ok(match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    })
}

/// Discovers and parses the source files under `<repo>/src`
pub struct SourceCatalog {
    repo_root: PathBuf,
    extensions: Vec<String>,
    settings: ProjectSettings,
}

impl SourceCatalog {
    pub fn new(repo_root: impl Into<PathBuf>, extensions: &[String]) -> Self {
        let repo_root = repo_root.into();
        let settings = ProjectSettings::load(&repo_root);
        Self {
            repo_root,
            extensions: extensions.to_vec(),
            settings,
        }
    }

    pub fn source_dir(&self) -> PathBuf {
        self.repo_root.join("src")
    }

    /// Lists matching files in traversal order (entries sorted by name per directory)
    pub fn discover(&self) -> Result<Vec<PathBuf>, CatalogError> {
        let src_dir = self.source_dir();
        if !src_dir.is_dir() {
            return Err(CatalogError::MissingSourceDir(src_dir));
        }

        let mut files = Vec::new();
        self.walk(&src_dir, &mut files)?;
        tracing::debug!(count = files.len(), dir = %src_dir.display(), "Discovered source files");
        Ok(files)
    }

    /// Only an unreadable `src` itself is fatal; nested directories that
    /// cannot be listed are logged and skipped.
    fn walk(&self, dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), CatalogError> {
        let entries = std::fs::read_dir(dir)
            .and_then(|entries| entries.collect::<Result<Vec<_>, _>>())
            .map_err(|source| CatalogError::Walk {
                path: dir.to_path_buf(),
                source,
            })?;
        self.walk_entries(entries, files);
        Ok(())
    }

    fn walk_entries(&self, mut entries: Vec<DirEntry>, files: &mut Vec<PathBuf>) {
        entries.sort_by_key(|entry| entry.file_name());

        for entry in entries {
            let path = entry.path();
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if self.settings.is_excluded(&self.relative(&path)) {
                tracing::debug!(path = %path.display(), "Excluded by tsconfig");
                continue;
            }

            // Symlinks are not followed, so every file is visited once
            let file_type = match entry.file_type() {
                Ok(file_type) => file_type,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Cannot stat entry, skipping");
                    continue;
                }
            };

            if file_type.is_dir() {
                if name == "node_modules" || name.starts_with('.') {
                    continue;
                }
                if let Err(e) = self.walk(&path, files) {
                    tracing::warn!(error = %e, "Skipping unreadable directory");
                }
            } else if file_type.is_symlink() && path.is_dir() {
                tracing::debug!(path = %path.display(), "Not following directory symlink");
            } else if self.has_wanted_extension(&path) {
                files.push(path);
            }
        }
    }

    fn has_wanted_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.extensions.iter().any(|wanted| wanted == ext))
            .unwrap_or(false)
    }

    /// Repo-relative path with forward slashes
    pub fn relative(&self, path: &Path) -> String {
        path.strip_prefix(&self.repo_root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/")
    }

    /// Reads and parses one file
    pub fn load_unit(
        &self,
        provider: &dyn SyntaxProvider,
        path: &Path,
    ) -> Result<SourceUnit, ParseError> {
        let text = read_source(path).map_err(|source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let tree = provider.parse(path, &text)?;
        Ok(SourceUnit {
            path: self.relative(path),
            text,
            tree,
        })
    }

    /// Parses every discovered file, skipping the ones that fail
    pub fn load(&self, provider: &dyn SyntaxProvider) -> Result<Vec<SourceUnit>, CatalogError> {
        self.load_with_progress(provider, |_| {})
    }

    /// Like [`SourceCatalog::load`], calling `on_file` before each file is parsed
    pub fn load_with_progress<F>(
        &self,
        provider: &dyn SyntaxProvider,
        mut on_file: F,
    ) -> Result<Vec<SourceUnit>, CatalogError>
    where
        F: FnMut(&Path),
    {
        let files = self.discover()?;
        let mut units = Vec::with_capacity(files.len());

        for path in &files {
            on_file(path);
            match self.load_unit(provider, path) {
                Ok(unit) => {
                    tracing::debug!(file = %unit.path, classes = unit.tree.classes.len(), "Parsed unit");
                    units.push(unit);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unparsable file");
                }
            }
        }

        tracing::info!(parsed = units.len(), discovered = files.len(), "Source catalog loaded");
        Ok(units)
    }
}
