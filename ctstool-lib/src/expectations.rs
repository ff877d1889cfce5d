//! Line-oriented test expectations files.
//!
//! ```text
//! # Comment lines are kept verbatim.
//! crbug.com/1234 [ intel win ] webgpu:api,operation,buffers:* [ Failure ]  # flaky
//! ```
//!
//! Chunks are runs of non-blank lines. The loader keeps the file's structure
//! so that saving a loaded file only normalizes spacing.

use anyhow::{Context, Result};
use regex::Regex;
use std::fmt;
use std::path::Path;
use std::sync::OnceLock;
use tokio::fs;

fn bug_regex() -> &'static Regex {
    static BUG: OnceLock<Regex> = OnceLock::new();
    BUG.get_or_init(|| {
        Regex::new(r"^(?:crbug\.com/|dawn:|tint:|b/|https?://)\S+$").expect("bug pattern is valid")
    })
}

/// A single expectation line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expectation {
    /// 1-based line number in the source file, 0 when built in memory
    pub line: usize,
    pub bug: Option<String>,
    pub tags: Vec<String>,
    pub query: String,
    pub status: Vec<String>,
    /// Text after the trailing `#`
    pub comment: Option<String>,
}

/// Leading comment lines followed by expectation lines
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chunk {
    pub comments: Vec<String>,
    pub expectations: Vec<Expectation>,
}

impl Chunk {
    fn is_empty(&self) -> bool {
        self.comments.is_empty() && self.expectations.is_empty()
    }
}

/// The parsed content of an expectations file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Content {
    pub chunks: Vec<Chunk>,
}

impl Content {
    /// All expectations in file order
    pub fn expectations(&self) -> impl Iterator<Item = &Expectation> {
        self.chunks.iter().flat_map(|c| c.expectations.iter())
    }

    /// Parse the text of an expectations file
    pub fn parse(text: &str) -> Result<Self> {
        let mut chunks = Vec::new();
        let mut current = Chunk::default();

        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();

            if line.is_empty() {
                if !current.is_empty() {
                    chunks.push(std::mem::take(&mut current));
                }
                continue;
            }

            if line.starts_with('#') {
                // A comment after expectations opens the next chunk
                if !current.expectations.is_empty() {
                    chunks.push(std::mem::take(&mut current));
                }
                current.comments.push(line.to_string());
                continue;
            }

            let expectation =
                parse_expectation(line, index + 1).with_context(|| format!("line {}", index + 1))?;
            current.expectations.push(expectation);
        }

        if !current.is_empty() {
            chunks.push(current);
        }

        Ok(Self { chunks })
    }
}

fn parse_expectation(line: &str, line_number: usize) -> Result<Expectation> {
    let (body, comment) = match line.split_once('#') {
        Some((body, comment)) => (body, Some(comment.trim().to_string())),
        None => (line, None),
    };

    // Brackets may touch their contents, e.g. `[win]`
    let spaced = body.replace('[', " [ ").replace(']', " ] ");
    let mut tokens = spaced.split_whitespace().peekable();

    let bug = if tokens.peek().is_some_and(|token| bug_regex().is_match(token)) {
        tokens.next().map(str::to_string)
    } else {
        None
    };

    let tags = if tokens.peek() == Some(&"[") {
        tokens.next();
        collect_bracketed(&mut tokens, "tag list")?
    } else {
        Vec::new()
    };

    let query = match tokens.next() {
        Some("[" | "]") | None => anyhow::bail!("missing test query"),
        Some(query) => query.to_string(),
    };

    let status = match tokens.next() {
        Some("[") => {
            let status = collect_bracketed(&mut tokens, "status list")?;
            if status.is_empty() {
                anyhow::bail!("empty status list for '{}'", query);
            }
            status
        }
        Some(token) => anyhow::bail!("unexpected '{}' after query '{}'", token, query),
        None => Vec::new(),
    };

    if let Some(token) = tokens.next() {
        anyhow::bail!("unexpected '{}' after status list", token);
    }

    Ok(Expectation {
        line: line_number,
        bug,
        tags,
        query,
        status,
        comment,
    })
}

/// Consume tokens up to and including the closing `]`
fn collect_bracketed<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    what: &str,
) -> Result<Vec<String>> {
    let mut items = Vec::new();
    for token in tokens {
        match token {
            "]" => return Ok(items),
            "[" => anyhow::bail!("nested '[' in {}", what),
            _ => items.push(token.to_string()),
        }
    }
    anyhow::bail!("unterminated {}", what)
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::new();
        if let Some(bug) = &self.bug {
            parts.push(bug.clone());
        }
        if !self.tags.is_empty() {
            parts.push(format!("[ {} ]", self.tags.join(" ")));
        }
        parts.push(self.query.clone());
        if !self.status.is_empty() {
            parts.push(format!("[ {} ]", self.status.join(" ")));
        }
        write!(f, "{}", parts.join(" "))?;

        match self.comment.as_deref() {
            Some("") => write!(f, "  #"),
            Some(comment) => write!(f, "  # {}", comment),
            None => Ok(()),
        }
    }
}

impl fmt::Display for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, chunk) in self.chunks.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for comment in &chunk.comments {
                writeln!(f, "{}", comment)?;
            }
            for expectation in &chunk.expectations {
                writeln!(f, "{}", expectation)?;
            }
        }
        Ok(())
    }
}

/// Load and parse an expectations file
pub async fn load<P: AsRef<Path>>(path: P) -> Result<Content> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read expectations file: {}", path.display()))?;

    let content = Content::parse(&text)
        .with_context(|| format!("Failed to parse expectations file: {}", path.display()))?;

    tracing::debug!(
        path = %path.display(),
        chunks = content.chunks.len(),
        "loaded expectations"
    );
    Ok(content)
}

/// Write `content` to `path`, replacing any existing file
pub async fn save<P: AsRef<Path>>(path: P, content: &Content) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, content.to_string())
        .await
        .with_context(|| format!("Failed to write expectations file: {}", path.display()))?;

    tracing::debug!(path = %path.display(), "saved expectations");
    Ok(())
}
