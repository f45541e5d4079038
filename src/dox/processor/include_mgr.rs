//! Resolution and loading of `@include` and `@snippet` targets.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::PathBuf;

use once_cell::sync::Lazy;
use regex::Regex;

/// Snippets are delimited by two identical marker lines: `//![Name]`.
static SNIPPET_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*//!\[(?P<name>[^\]]*)\]\s*$").expect("static regex"));

/// Loads files referenced from annotation text, resolving relative paths
/// against an ordered list of include directories (first match wins).
#[derive(Debug, Default)]
pub struct IncludeManager {
    include_dirs: Vec<PathBuf>,
    file_cache: HashMap<String, String>,
}

impl IncludeManager {
    pub fn new(include_dirs: Vec<PathBuf>) -> IncludeManager {
        IncludeManager {
            include_dirs,
            file_cache: HashMap::new(),
        }
    }

    /// The first include directory containing `rel`, joined with it.
    pub fn resolve(&self, rel: &str) -> Option<PathBuf> {
        self.include_dirs
            .iter()
            .map(|dir| dir.join(rel))
            .find(|p| p.is_file())
    }

    /// Load a whole file for `@include`.
    pub fn load_file(&mut self, rel: &str) -> Result<String, IncludeError> {
        if let Some(text) = self.file_cache.get(rel) {
            return Ok(text.clone());
        }
        let path = self.resolve(rel).ok_or_else(|| IncludeError {
            path: rel.to_string(),
            msg: "not found in any include directory".to_string(),
        })?;
        let text = fs::read_to_string(&path).map_err(|e| IncludeError {
            path: rel.to_string(),
            msg: e.to_string(),
        })?;
        self.file_cache.insert(rel.to_string(), text.clone());
        Ok(text)
    }

    /// Load the lines strictly between two `//![name]` marker lines,
    /// preserving indentation.
    pub fn load_snippet(&mut self, rel: &str, name: &str) -> Result<String, IncludeError> {
        let text = self.load_file(rel)?;
        let mut collected: Vec<&str> = Vec::new();
        let mut inside = false;
        let mut markers = 0usize;
        for line in text.lines() {
            if let Some(caps) = SNIPPET_MARKER.captures(line) {
                if &caps["name"] == name {
                    markers += 1;
                    if markers == 2 {
                        return Ok(collected.join("\n"));
                    }
                    inside = true;
                    continue;
                }
            }
            if inside {
                collected.push(line);
            }
        }
        Err(IncludeError {
            path: rel.to_string(),
            msg: format!(
                "snippet {:?} needs two marker lines, found {}",
                name, markers
            ),
        })
    }
}

/// Raised when an inclusion target cannot be resolved or read.
#[derive(Debug, Clone)]
pub struct IncludeError {
    pub path: String,
    pub msg: String,
}

impl fmt::Display for IncludeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot include {:?}: {}", self.path, self.msg)
    }
}

impl std::error::Error for IncludeError {}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // Minimal scratch-dir guard; std has no tempdir and the crate does not
    // need one outside this test.
    struct TempDirGuard {
        path: PathBuf,
    }

    impl TempDirGuard {
        fn new() -> TempDirGuard {
            static COUNTER: AtomicUsize = AtomicUsize::new(0);
            let path = std::env::temp_dir().join(format!(
                "dox-include-test-{}-{}",
                std::process::id(),
                COUNTER.fetch_add(1, Ordering::Relaxed)
            ));
            std::fs::create_dir_all(&path).unwrap();
            TempDirGuard { path }
        }
    }

    impl Drop for TempDirGuard {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.path);
        }
    }

    fn manager_with(content: &str) -> (TempDirGuard, IncludeManager) {
        let guard = TempDirGuard::new();
        std::fs::write(guard.path.join("demo.cpp"), content).unwrap();
        let mgr = IncludeManager::new(vec![guard.path.clone()]);
        (guard, mgr)
    }

    #[test]
    fn test_load_file() {
        let (_guard, mut mgr) = manager_with("int main() { return 0; }\n");
        assert_eq!(
            mgr.load_file("demo.cpp").unwrap(),
            "int main() { return 0; }\n"
        );
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let (_guard, mut mgr) = manager_with("x");
        assert!(mgr.load_file("nope.cpp").is_err());
    }

    #[test]
    fn test_load_snippet_between_markers() {
        let content = "\
int main()
{
    //![Print to stdout]
    std::cout << \"hi\";
    //![Print to stdout]
    return 0;
}
";
        let (_guard, mut mgr) = manager_with(content);
        assert_eq!(
            mgr.load_snippet("demo.cpp", "Print to stdout").unwrap(),
            "    std::cout << \"hi\";"
        );
    }

    #[test]
    fn test_snippet_with_single_marker_is_an_error() {
        let (_guard, mut mgr) = manager_with("//![Only once]\ncode\n");
        let err = mgr.load_snippet("demo.cpp", "Only once").unwrap_err();
        assert!(err.msg.contains("two marker lines"));
    }
}
