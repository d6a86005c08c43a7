//! Template resolution and loading.
//!
//! Turns a user-supplied template reference (`example`, `example.md`,
//! `./skeletons/echo.py`, …) into the skeleton text handed to the generation
//! service.
//!
//! # Resolution order
//!
//! For a reference without a known extension, both `<ref>.md` and `<ref>.py`
//! are tried. Each candidate name is looked up in priority order:
//!
//! 1. The reference as given (absolute path or relative to CWD).
//! 2. **`$MCPGEN_TEMPLATES_DIR`** — environment variable override. Set this
//!    in `.env` or your shell profile to point at a template collection.
//! 3. **`./templates`** — relative to the current working directory.
//!
//! The first candidate that exists and reads cleanly wins; unreadable
//! candidates emit a `WARN` log and are skipped — they do not fail the load.
//!
//! Markdown templates are assembled into source text (front matter split,
//! fenced blocks merged, imports first); `.py` templates are used verbatim.
//! When nothing resolves, or a markdown template assembles to nothing, the
//! built-in skeleton is returned so generation always has a structural
//! example to anchor on.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use mcpgen_core::domain::{FrontMatter, Template};

use crate::builtin_template::DEFAULT_SERVICE_TEMPLATE;

/// Environment variable naming an extra template search directory.
pub const TEMPLATES_DIR_ENV: &str = "MCPGEN_TEMPLATES_DIR";

/// Where a loaded skeleton came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateOrigin {
    /// Assembled from a markdown template file.
    Markdown(PathBuf),
    /// A plain source template, used verbatim.
    Source(PathBuf),
    /// The embedded fallback skeleton.
    Builtin,
}

impl fmt::Display for TemplateOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Markdown(p) => write!(f, "markdown template {}", p.display()),
            Self::Source(p) => write!(f, "source template {}", p.display()),
            Self::Builtin => write!(f, "built-in template"),
        }
    }
}

/// A resolved template ready for prompt building.
#[derive(Debug, Clone)]
pub struct LoadedTemplate {
    /// Skeleton text spliced into the generation prompt.
    pub skeleton: String,
    /// Front-matter metadata (empty for `.py` and builtin templates).
    pub metadata: FrontMatter,
    pub origin: TemplateOrigin,
}

/// Resolves template references against a set of search directories.
pub struct TemplateLoader {
    search_dirs: Vec<PathBuf>,
}

impl TemplateLoader {
    /// Loader with the default search path (env override + `./templates`).
    pub fn new() -> Self {
        let mut search_dirs = Vec::new();
        if let Ok(dir) = std::env::var(TEMPLATES_DIR_ENV) {
            if !dir.is_empty() {
                search_dirs.push(PathBuf::from(dir));
            }
        }
        search_dirs.push(PathBuf::from("./templates"));
        Self { search_dirs }
    }

    /// Loader with an explicit search path (used by tests).
    pub fn with_search_dirs(search_dirs: Vec<PathBuf>) -> Self {
        Self { search_dirs }
    }

    /// Resolve and load a template reference.
    ///
    /// Never fails: the built-in skeleton is the terminal fallback.
    #[instrument(skip(self))]
    pub fn load(&self, reference: &str) -> LoadedTemplate {
        for candidate in self.candidates(reference) {
            if !candidate.is_file() {
                continue;
            }
            match std::fs::read_to_string(&candidate) {
                Ok(content) => {
                    info!(path = %candidate.display(), "Template resolved");
                    return into_loaded(candidate, content);
                }
                Err(e) => {
                    // One unreadable candidate must not block the others.
                    warn!(path = %candidate.display(), error = %e, "Skipping unreadable template candidate");
                }
            }
        }

        warn!(reference, "Template not found, using built-in skeleton");
        LoadedTemplate {
            skeleton: DEFAULT_SERVICE_TEMPLATE.to_string(),
            metadata: FrontMatter::default(),
            origin: TemplateOrigin::Builtin,
        }
    }

    /// Candidate paths in priority order.
    fn candidates(&self, reference: &str) -> Vec<PathBuf> {
        let names: Vec<String> = if has_known_extension(reference) {
            vec![reference.to_string()]
        } else {
            // Extension inference: markdown first, then plain source.
            vec![format!("{reference}.md"), format!("{reference}.py")]
        };

        let mut paths = Vec::new();
        for name in &names {
            paths.push(PathBuf::from(name));
        }
        for dir in &self.search_dirs {
            for name in &names {
                paths.push(dir.join(name));
            }
        }
        debug!(count = paths.len(), "Template candidates built");
        paths
    }
}

impl Default for TemplateLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn into_loaded(path: PathBuf, content: String) -> LoadedTemplate {
    if path.extension().is_some_and(|e| e == "md") {
        let template = Template::parse(&content);
        let skeleton = template.assemble();
        if skeleton.is_empty() {
            // A markdown template with no code blocks gives the model
            // nothing to anchor on; fall back rather than prompt with "".
            warn!(path = %path.display(), "Markdown template has no code blocks, using built-in skeleton");
            return LoadedTemplate {
                skeleton: DEFAULT_SERVICE_TEMPLATE.to_string(),
                metadata: template.metadata,
                origin: TemplateOrigin::Builtin,
            };
        }
        LoadedTemplate {
            skeleton,
            metadata: template.metadata,
            origin: TemplateOrigin::Markdown(path),
        }
    } else {
        LoadedTemplate {
            skeleton: content,
            metadata: FrontMatter::default(),
            origin: TemplateOrigin::Source(path),
        }
    }
}

fn has_known_extension(reference: &str) -> bool {
    Path::new(reference)
        .extension()
        .is_some_and(|e| e == "md" || e == "py")
}

// ── tests ─────────────────────────────────────────────────────────────────────
