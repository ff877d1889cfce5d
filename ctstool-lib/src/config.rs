use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Expectations file used when neither a flag nor the config names one
pub const DEFAULT_EXPECTATIONS: &str = "webgpu-cts/expectations.txt";
/// Checkout of the conformance test suite sources
pub const DEFAULT_CTS_DIR: &str = "third_party/webgpu-cts";
/// Generated list of test queries
pub const DEFAULT_TEST_LIST: &str = "third_party/gn/webgpu-cts/test_list.txt";
/// Suite directory under `<cts_dir>/src`
pub const DEFAULT_SUITE: &str = "webgpu";

/// Tool configuration loaded from YAML.
///
/// Every field is optional. Relative paths are resolved against the root
/// directory passed to [`Config::resolve`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Path to the expectations file
    #[serde(default)]
    pub expectations: Option<PathBuf>,
    /// Path to the CTS checkout
    #[serde(default)]
    pub cts_dir: Option<PathBuf>,
    /// Path the test list is written to
    #[serde(default)]
    pub test_list: Option<PathBuf>,
    /// Name of the test suite to list
    #[serde(default)]
    pub suite: Option<String>,
}

/// Fully resolved paths, after applying defaults
#[derive(Debug, Clone, PartialEq)]
pub struct Paths {
    pub expectations: PathBuf,
    pub cts_dir: PathBuf,
    pub test_list: PathBuf,
    pub suite: String,
}

impl Config {
    /// Fill in defaults for unset fields and anchor relative paths at `root`
    pub fn resolve(&self, root: &Path) -> Paths {
        let anchor = |path: Option<&PathBuf>, default: &str| {
            let path = path.cloned().unwrap_or_else(|| PathBuf::from(default));
            if path.is_absolute() {
                path
            } else {
                root.join(path)
            }
        };

        Paths {
            expectations: anchor(self.expectations.as_ref(), DEFAULT_EXPECTATIONS),
            cts_dir: anchor(self.cts_dir.as_ref(), DEFAULT_CTS_DIR),
            test_list: anchor(self.test_list.as_ref(), DEFAULT_TEST_LIST),
            suite: self
                .suite
                .clone()
                .unwrap_or_else(|| DEFAULT_SUITE.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_defaults() {
        let paths = Config::default().resolve(Path::new("/src/dawn"));

        assert_eq!(
            paths.expectations,
            PathBuf::from("/src/dawn/webgpu-cts/expectations.txt")
        );
        assert_eq!(paths.cts_dir, PathBuf::from("/src/dawn/third_party/webgpu-cts"));
        assert_eq!(
            paths.test_list,
            PathBuf::from("/src/dawn/third_party/gn/webgpu-cts/test_list.txt")
        );
        assert_eq!(paths.suite, "webgpu");
    }

    #[test]
    fn test_resolve_keeps_absolute_paths() {
        let config = Config {
            expectations: Some(PathBuf::from("/tmp/expectations.txt")),
            cts_dir: Some(PathBuf::from("cts")),
            test_list: None,
            suite: Some("unittests".to_string()),
        };
        let paths = config.resolve(Path::new("/root"));

        assert_eq!(paths.expectations, PathBuf::from("/tmp/expectations.txt"));
        assert_eq!(paths.cts_dir, PathBuf::from("/root/cts"));
        assert_eq!(paths.suite, "unittests");
    }
}
