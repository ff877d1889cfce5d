//! Tooling for conformance test suites: identifier case conversion,
//! expectations file loading and saving, and test list generation.

pub mod case;
pub mod config;
pub mod config_loader;
pub mod expectations;
pub mod test_list;

pub use case::{pascal_case, snake_case};
pub use config::{Config, Paths};
pub use config_loader::{parse_config_file, parse_config_string};
pub use expectations::{Chunk, Content, Expectation};

use anyhow::Result;
use std::path::Path;

/// Load an expectations file and write it back with normalized spacing.
///
/// Returns the number of expectations in the file.
pub async fn format_expectations<P: AsRef<Path>>(path: P) -> Result<usize> {
    let content = expectations::load(&path).await?;
    expectations::save(&path, &content).await?;

    let count = content.expectations().count();
    tracing::info!(path = %path.as_ref().display(), count, "formatted expectations");
    Ok(count)
}

/// Generate the test list for `suite` from `cts_dir` and write it to `output`.
///
/// Returns the number of queries written.
pub async fn generate_test_list<P: AsRef<Path>>(
    cts_dir: &Path,
    suite: &str,
    output: P,
) -> Result<usize> {
    let queries = test_list::generate(cts_dir, suite)?;
    test_list::write(&output, &queries).await?;

    tracing::info!(
        output = %output.as_ref().display(),
        count = queries.len(),
        "wrote test list"
    );
    Ok(queries.len())
}
