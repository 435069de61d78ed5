//! Anchored text splicing into aggregate files.
//!
//! Aggregate files (the route table, the menu store module, the router store
//! module) are owned by the host project. The generator only ever inserts a
//! rendered fragment right after a known anchor and leaves every other byte
//! alone. Splicing is not idempotent: running it twice inserts two copies.

use std::collections::HashMap;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use regex::Regex;

use crate::error::{IoResultExt, ScaffoldError, ScaffoldResult};
use crate::writer::{atomic_write, content_hash};

/// Maps the span of the anchor match to the byte offset where the fragment
/// goes.
pub type InsertionOffset = fn(Range<usize>) -> usize;

#[derive(Debug, Clone)]
pub struct AnchorSpec {
    pattern: Regex,
    insertion_offset: InsertionOffset,
}

impl AnchorSpec {
    pub fn new(pattern: Regex, insertion_offset: InsertionOffset) -> Self {
        Self {
            pattern,
            insertion_offset,
        }
    }

    /// Inserts immediately after the first match of `pattern`.
    pub fn after(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self::new(Regex::new(pattern)?, |span| span.end))
    }

    /// Inserts immediately after the first occurrence of `text`.
    pub fn after_literal(text: &str) -> Self {
        let pattern =
            Regex::new(&regex::escape(text)).expect("escaped literal is a valid pattern");
        Self::new(pattern, |span| span.end)
    }

    /// `routes/api.php`: the opening of the authenticated route group.
    pub fn route_table() -> &'static AnchorSpec {
        &ROUTE_TABLE
    }

    /// `src/store/modules/menu.js`: the opening of the menu item list.
    pub fn menu_items() -> &'static AnchorSpec {
        &MENU_ITEMS
    }

    /// `src/store/modules/router.js`: the opening of the route item list.
    pub fn router_items() -> &'static AnchorSpec {
        &ROUTER_ITEMS
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Byte offset of the insertion point in `text`, if the anchor is present.
    pub fn locate(&self, text: &str) -> Option<usize> {
        let found = self.pattern.find(text)?;
        let offset = (self.insertion_offset)(found.range());
        (offset <= text.len() && text.is_char_boundary(offset)).then_some(offset)
    }
}

static ROUTE_TABLE: Lazy<AnchorSpec> =
    Lazy::new(|| AnchorSpec::after_literal("    Route::middleware(['auth'])->group(function () {\n"));

static MENU_ITEMS: Lazy<AnchorSpec> = Lazy::new(|| AnchorSpec::after_literal("items: [\n"));

static ROUTER_ITEMS: Lazy<AnchorSpec> = Lazy::new(|| AnchorSpec::after_literal("items: [\n"));

/// Inserts `fragment` at the anchor's insertion point. Bytes before and after
/// the insertion point are preserved exactly.
pub fn splice(existing: &str, anchor: &AnchorSpec, fragment: &str) -> ScaffoldResult<String> {
    let offset = anchor.locate(existing).ok_or_else(|| anchor_missing(anchor))?;
    Ok(insert_at(existing, offset, fragment))
}

fn anchor_missing(anchor: &AnchorSpec) -> ScaffoldError {
    ScaffoldError::AnchorNotFound {
        anchor: anchor.pattern().to_string(),
        path: None,
    }
}

fn insert_at(existing: &str, offset: usize, fragment: &str) -> String {
    let mut spliced = String::with_capacity(existing.len() + fragment.len());
    spliced.push_str(&existing[..offset]);
    spliced.push_str(fragment);
    spliced.push_str(&existing[offset..]);
    spliced
}

/// Per-path async locks serializing read-modify-write cycles within this
/// process.
static FILE_LOCKS: Lazy<Mutex<HashMap<PathBuf, Arc<tokio::sync::Mutex<()>>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

fn lock_for(path: &Path) -> Arc<tokio::sync::Mutex<()>> {
    let key = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    FILE_LOCKS.lock().entry(key).or_default().clone()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpliceOutcome {
    pub path: PathBuf,
    pub offset: usize,
    pub inserted_bytes: usize,
    pub content_hash: String,
}

/// A host-owned file that receives generated fragments.
#[derive(Debug, Clone)]
pub struct AggregateFile {
    path: PathBuf,
}

impl AggregateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Splices `fragment` into the file under its path lock. The new content
    /// replaces the file atomically; when the anchor is missing the file is
    /// left untouched.
    pub async fn splice(&self, anchor: &AnchorSpec, fragment: &str) -> ScaffoldResult<SpliceOutcome> {
        let lock = lock_for(&self.path);
        let _guard = lock.lock().await;

        let existing = tokio::fs::read_to_string(&self.path).await.at(&self.path)?;
        let offset = anchor
            .locate(&existing)
            .ok_or_else(|| anchor_missing(anchor).at_path(&self.path))?;
        let updated = insert_at(&existing, offset, fragment);

        let target = self.path.clone();
        let hash = content_hash(&updated);
        tokio::task::spawn_blocking(move || atomic_write(&target, &updated))
            .await
            .map_err(|join| ScaffoldError::filesystem(&self.path, std::io::Error::other(join)))??;

        tracing::debug!(
            path = %self.path.display(),
            offset,
            inserted_bytes = fragment.len(),
            "spliced fragment"
        );
        Ok(SpliceOutcome {
            path: self.path.clone(),
            offset,
            inserted_bytes: fragment.len(),
            content_hash: hash,
        })
    }
}
