use crate::case::pascal_case;
use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;
use walkdir::WalkDir;

const SPEC_SUFFIX: &str = ".spec.ts";

/// List one wildcard query per spec file under `<cts_dir>/src/<suite>`.
///
/// `src/webgpu/api/operation/buffers/map.spec.ts` becomes
/// `webgpu:api,operation,buffers,map:*`. The result is sorted.
pub fn generate(cts_dir: &Path, suite: &str) -> Result<Vec<String>> {
    validate_suite_name(suite)?;

    let root = cts_dir.join("src").join(suite);
    if !root.is_dir() {
        anyhow::bail!("Suite directory '{}' does not exist", root.display());
    }

    let mut queries = Vec::new();
    for entry in WalkDir::new(&root).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry.path().strip_prefix(&root)?;
        let mut parts: Vec<String> = relative
            .iter()
            .map(|part| part.to_string_lossy().into_owned())
            .collect();

        let Some(file) = parts.pop() else { continue };
        let Some(stem) = file.strip_suffix(SPEC_SUFFIX) else {
            continue;
        };
        parts.push(stem.to_string());

        queries.push(format!("{}:{}:*", suite, parts.join(",")));
    }

    queries.sort();
    queries.dedup();

    tracing::debug!(root = %root.display(), count = queries.len(), "generated test list");
    Ok(queries)
}

/// Check that `suite` can be used both as a single directory name under
/// `<cts_dir>/src` and as the first component of a query
pub fn validate_suite_name(suite: &str) -> Result<()> {
    if suite.is_empty() {
        anyhow::bail!("Suite name cannot be empty");
    }
    if suite == "." || suite == ".." {
        anyhow::bail!("Suite name '{}' is not a directory name", suite);
    }
    if let Some(ch) = suite
        .chars()
        .find(|c| matches!(c, ':' | ',' | '*' | '/' | '\\'))
    {
        anyhow::bail!("Suite name '{}' contains invalid character '{}'", suite, ch);
    }
    Ok(())
}

/// Write `queries` one per line, creating parent directories as needed
pub async fn write<P: AsRef<Path>>(path: P, queries: &[String]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let mut content = String::new();
    for query in queries {
        content.push_str(query);
        content.push('\n');
    }

    fs::write(path, content)
        .await
        .with_context(|| format!("Failed to write test list: {}", path.display()))?;
    Ok(())
}

/// PascalCase identifier for a query, e.g. `webgpu:api,operation:*` gives
/// `WebgpuApiOperation`
pub fn identifier(query: &str) -> String {
    let words: String = query
        .chars()
        .map(|c| match c {
            ':' | ',' | '*' | '/' | '.' | '-' | ';' | '=' => '_',
            c => c,
        })
        .collect();
    pascal_case(&words)
}
