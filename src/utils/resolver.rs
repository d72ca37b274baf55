//! Locating a PDF whose nominal path may not exist on this device.
//!
//! Host apps often hand over a path that is only valid in another sandbox
//! (an asset URI, a download folder on a different mount). The resolver
//! tries the nominal path, then a fixed list of fallback directories joined
//! with the file name, then the bare file name, and finally walks a set of
//! search roots looking for a file with the same name.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::ResolverConfig;

/// Filesystem existence checks, abstracted so probing order can be observed
pub trait FileProbe: std::fmt::Debug {
    /// Whether `path` exists
    fn exists(&self, path: &Path) -> bool;
}

/// [`FileProbe`] backed by the real filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct FsProbe;

impl FileProbe for FsProbe {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// Outcome of path resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The file was found; `attempted` lists what was probed before it
    Found { path: PathBuf, attempted: Vec<String> },

    /// Nothing matched; `attempted` lists every candidate and search pattern
    NotFound { attempted: Vec<String> },
}

impl Resolution {
    /// The resolved path, if any
    pub fn path(&self) -> Option<&Path> {
        match self {
            Resolution::Found { path, .. } => Some(path),
            Resolution::NotFound { .. } => None,
        }
    }

    /// Everything probed during resolution
    pub fn attempted(&self) -> &[String] {
        match self {
            Resolution::Found { attempted, .. } | Resolution::NotFound { attempted } => attempted,
        }
    }
}

/// Resolves nominal PDF paths against fallback locations
#[derive(Debug)]
pub struct PathResolver<P: FileProbe = FsProbe> {
    fallback_dirs: Vec<PathBuf>,
    search_roots: Vec<PathBuf>,
    max_search_depth: usize,
    probe: P,
}

impl PathResolver<FsProbe> {
    /// Create a resolver over the real filesystem
    pub fn new(config: &ResolverConfig) -> Self {
        Self::with_probe(config, FsProbe)
    }
}

impl<P: FileProbe> PathResolver<P> {
    /// Create a resolver with a custom existence probe
    pub fn with_probe(config: &ResolverConfig, probe: P) -> Self {
        Self {
            fallback_dirs: config.fallback_dirs.clone(),
            search_roots: config.search_roots.clone(),
            max_search_depth: config.max_search_depth,
            probe,
        }
    }

    /// The probe in use
    pub fn probe(&self) -> &P {
        &self.probe
    }

    /// Ordered candidate list for a nominal path: the path itself, each
    /// fallback directory joined with the file name, then the file name alone.
    /// Each path appears once.
    pub fn candidates(&self, nominal: &str) -> Vec<PathBuf> {
        let nominal_path = PathBuf::from(nominal);
        let mut candidates = vec![nominal_path.clone()];

        if let Some(name) = nominal_path.file_name() {
            let fallbacks = self.fallback_dirs.iter().map(|dir| dir.join(name));
            for candidate in fallbacks.chain(std::iter::once(PathBuf::from(name))) {
                if !candidates.contains(&candidate) {
                    candidates.push(candidate);
                }
            }
        }

        candidates
    }

    /// Resolve `nominal` to an existing file
    pub fn resolve(&self, nominal: &str) -> Resolution {
        let nominal_path = Path::new(nominal);
        if self.probe.exists(nominal_path) {
            return Resolution::Found {
                path: nominal_path.to_path_buf(),
                attempted: Vec::new(),
            };
        }

        tracing::warn!("File not found at: {}", nominal);

        let mut attempted = vec![nominal.to_string()];
        for candidate in self.candidates(nominal).into_iter().skip(1) {
            let shown = candidate.display().to_string();
            tracing::debug!("Checking path: {}", shown);
            attempted.push(shown);

            if self.probe.exists(&candidate) {
                tracing::info!("Found PDF at: {}", candidate.display());
                return Resolution::Found {
                    path: candidate,
                    attempted,
                };
            }
        }

        let Some(name) = nominal_path.file_name() else {
            return Resolution::NotFound { attempted };
        };

        for root in &self.search_roots {
            attempted.push(format!("{}/**/{}", root.display(), name.to_string_lossy()));

            if let Some(found) = self.search_root(root, name) {
                tracing::info!("Found PDF by search: {}", found.display());
                return Resolution::Found {
                    path: found,
                    attempted,
                };
            }
        }

        Resolution::NotFound { attempted }
    }

    /// Depth-bounded walk of `root` for a file called `name`
    fn search_root(&self, root: &Path, name: &std::ffi::OsStr) -> Option<PathBuf> {
        if !self.probe.exists(root) {
            return None;
        }

        WalkDir::new(root)
            .max_depth(self.max_search_depth)
            .follow_links(false)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::trace!("Skipping unreadable entry under {}: {}", root.display(), e);
                    None
                }
            })
            .find(|entry| entry.file_type().is_file() && entry.file_name() == name)
            .map(|entry| entry.into_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashSet;
    use tempfile::tempdir;

    /// Probe over a fixed set of existing paths that records every call
    #[derive(Debug, Default)]
    struct RecordingProbe {
        existing: HashSet<PathBuf>,
        calls: RefCell<Vec<PathBuf>>,
    }

    impl RecordingProbe {
        fn with(paths: &[&str]) -> Self {
            Self {
                existing: paths.iter().map(PathBuf::from).collect(),
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl FileProbe for RecordingProbe {
        fn exists(&self, path: &Path) -> bool {
            self.calls.borrow_mut().push(path.to_path_buf());
            self.existing.contains(path)
        }
    }

    fn config(fallback_dirs: &[&str], search_roots: Vec<PathBuf>) -> ResolverConfig {
        ResolverConfig {
            fallback_dirs: fallback_dirs.iter().map(PathBuf::from).collect(),
            search_roots,
            max_search_depth: 4,
        }
    }

    #[test]
    fn test_existing_path_returned_without_probing_alternates() {
        let probe = RecordingProbe::with(&["/docs/report.pdf"]);
        let resolver = PathResolver::with_probe(&config(&["/sdcard/Download"], vec![]), probe);

        let resolution = resolver.resolve("/docs/report.pdf");

        assert_eq!(resolution.path(), Some(Path::new("/docs/report.pdf")));
        assert!(resolution.attempted().is_empty());
        assert_eq!(resolver.probe().calls.borrow().len(), 1);
    }

    #[test]
    fn test_candidate_order() {
        let resolver = PathResolver::new(&config(&["/android_asset", "/sdcard/Download"], vec![]));
        let candidates = resolver.candidates("/missing/dir/report.pdf");

        assert_eq!(
            candidates,
            vec![
                PathBuf::from("/missing/dir/report.pdf"),
                PathBuf::from("/android_asset/report.pdf"),
                PathBuf::from("/sdcard/Download/report.pdf"),
                PathBuf::from("report.pdf"),
            ]
        );
    }

    #[test]
    fn test_bare_file_name_probed_once() {
        let probe = RecordingProbe::with(&[]);
        let resolver = PathResolver::with_probe(&config(&["/sdcard/Download"], vec![]), probe);

        let resolution = resolver.resolve("report.pdf");

        assert_eq!(resolution.attempted(), ["report.pdf", "/sdcard/Download/report.pdf"]);
        assert_eq!(
            *resolver.probe().calls.borrow(),
            vec![PathBuf::from("report.pdf"), PathBuf::from("/sdcard/Download/report.pdf")]
        );
    }

    #[test]
    fn test_nominal_inside_fallback_dir_not_repeated() {
        let resolver = PathResolver::new(&config(&["/sdcard/Download", "/data"], vec![]));
        let candidates = resolver.candidates("/sdcard/Download/report.pdf");

        assert_eq!(
            candidates,
            vec![
                PathBuf::from("/sdcard/Download/report.pdf"),
                PathBuf::from("/data/report.pdf"),
                PathBuf::from("report.pdf"),
            ]
        );
    }

    #[test]
    fn test_first_existing_fallback_wins() {
        let probe = RecordingProbe::with(&["/b/report.pdf", "/c/report.pdf"]);
        let resolver = PathResolver::with_probe(&config(&["/a", "/b", "/c"], vec![]), probe);

        match resolver.resolve("/x/report.pdf") {
            Resolution::Found { path, attempted } => {
                assert_eq!(path, PathBuf::from("/b/report.pdf"));
                assert_eq!(attempted, vec!["/x/report.pdf", "/a/report.pdf", "/b/report.pdf"]);
            }
            other => panic!("expected Found, got {:?}", other),
        }
    }

    #[test]
    fn test_search_roots_find_nested_file() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("one").join("two");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("needle.pdf"), b"%PDF-1.4").unwrap();

        let resolver = PathResolver::new(&config(&[], vec![dir.path().to_path_buf()]));
        let resolution = resolver.resolve("/nowhere/needle.pdf");

        assert_eq!(resolution.path(), Some(nested.join("needle.pdf").as_path()));
    }

    #[test]
    fn test_not_found_lists_attempts() {
        let dir = tempdir().unwrap();
        let resolver = PathResolver::new(&config(&["/definitely/not/here"], vec![dir.path().to_path_buf()]));

        let resolution = resolver.resolve("/no/such/file-4f1c.pdf");

        match resolution {
            Resolution::NotFound { attempted } => {
                assert_eq!(attempted[0], "/no/such/file-4f1c.pdf");
                assert_eq!(attempted[1], "/definitely/not/here/file-4f1c.pdf");
                assert_eq!(attempted[2], "file-4f1c.pdf");
                assert!(attempted[3].ends_with("/**/file-4f1c.pdf"));
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
    }
}
