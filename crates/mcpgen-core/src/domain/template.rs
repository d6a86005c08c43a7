//! Template domain model: markdown skeletons become ordered source fragments.
//!
//! A template is either a plain source file (used verbatim, never parsed
//! here) or a markdown document with an optional front-matter block followed
//! by headed sections containing fenced code blocks. This module turns the
//! markdown form into a [`Template`]: an ordered list of [`Fragment`]s plus
//! the parsed [`FrontMatter`].
//!
//! ## Scanning model
//!
//! Parsing is a single line-oriented state machine with three states:
//!
//! ```text
//! InsideMetadata ──"---"──▶ SeekingFence ──"```"──▶ InsideFence
//!        │                       ▲                       │
//!        │ EOF                   └───────"```"───────────┘
//!        ▼
//!  (discard metadata, rescan whole text in plain-fragment mode)
//! ```
//!
//! The unterminated cases are deliberate terminal conditions, not implicit
//! fallthrough:
//!
//! - An unterminated front-matter block means the whole document is treated
//!   as having no metadata at all; the text is rescanned from the top in
//!   plain-fragment mode.
//! - An unterminated fence at end-of-document is discarded — it cannot be
//!   delimited, so it never becomes a fragment.
//!
//! Nested fences are undefined upstream; scanning is greedy: the first fence
//! line after an opener closes the block, so an "inner" opener terminates
//! the current fragment and the next fence line starts a new one.

use std::fmt;

use serde::Serialize;

// ── Front matter ──────────────────────────────────────────────────────────────

/// Flat `key: value` metadata parsed from the front-matter block.
///
/// Entries keep document order. Keys are free-form (the conventional set is
/// `service_name`, `description`, `author`, `version`), and nothing in
/// assembly depends on them — they are carried for display and logging only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FrontMatter {
    entries: Vec<(String, String)>,
}

impl FrontMatter {
    /// Look up a value by key (first occurrence wins).
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// `true` when no metadata block was present (or it was malformed).
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of parsed keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterate entries in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

// ── Fragments ─────────────────────────────────────────────────────────────────

/// One fenced code block together with its heading context.
///
/// `index` is the block's ordinal position in the document, counted over all
/// fragments regardless of heading. The body is the fence content exactly as
/// written — assembly concatenates, it never rewrites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Text of the nearest preceding heading, if any.
    pub heading: Option<String>,
    /// Zero-based document ordinal.
    pub index: usize,
    /// Verbatim fence content (without the delimiter lines).
    pub body: String,
}

impl Fragment {
    /// Import fragments are promoted to the front of the assembled output.
    ///
    /// The predicate is a case-insensitive substring match on the heading:
    /// `Imports`, `import section`, and `IMPORTANT IMPORTS` all qualify.
    pub fn is_import(&self) -> bool {
        self.heading
            .as_deref()
            .is_some_and(|h| h.to_lowercase().contains("import"))
    }

    /// Comment label emitted above the fragment body.
    fn label(&self) -> String {
        match &self.heading {
            Some(h) => h.clone(),
            None => format!("code block {}", self.index + 1),
        }
    }
}

// ── Template ──────────────────────────────────────────────────────────────────

/// A parsed template: front-matter metadata plus ordered fragments.
///
/// Parsing never fails — malformed input degrades to fewer (possibly zero)
/// fragments, and callers decide whether an empty result is an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Template {
    pub metadata: FrontMatter,
    pub fragments: Vec<Fragment>,
}

impl Template {
    /// Parse markdown template text.
    pub fn parse(text: &str) -> Self {
        let lines: Vec<&str> = text.lines().collect();

        match scan(&lines, true) {
            Scan::Done {
                metadata,
                fragments,
            } => Self {
                metadata,
                fragments,
            },
            // Unterminated front matter: the whole text is body.
            Scan::UnterminatedMetadata => match scan(&lines, false) {
                Scan::Done {
                    metadata,
                    fragments,
                } => Self {
                    metadata,
                    fragments,
                },
                Scan::UnterminatedMetadata => unreachable!("metadata disabled on rescan"),
            },
        }
    }

    /// Assemble the fragments into a single source text.
    ///
    /// Import-tagged fragments come first; within each partition, document
    /// order is preserved (stable sort on a two-value key). Each fragment is
    /// preceded by a `# <heading>` comment line and fragments are separated
    /// by one blank line. Zero fragments assemble to the empty string.
    pub fn assemble(&self) -> String {
        if self.fragments.is_empty() {
            return String::new();
        }

        let mut ordered: Vec<&Fragment> = self.fragments.iter().collect();
        ordered.sort_by_key(|f| if f.is_import() { 0u8 } else { 1u8 });

        ordered
            .iter()
            .map(|f| format!("# {}\n{}", f.label(), f.body))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Convenience: parse and assemble in one step.
    pub fn assemble_text(text: &str) -> String {
        Self::parse(text).assemble()
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "template ({} metadata keys, {} fragments)",
            self.metadata.len(),
            self.fragments.len()
        )
    }
}

// ── Scanner ───────────────────────────────────────────────────────────────────

/// Line-scanner states. See the module docs for the transition diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    SeekingFence,
    InsideFence,
    InsideMetadata,
}

enum Scan {
    Done {
        metadata: FrontMatter,
        fragments: Vec<Fragment>,
    },
    /// Front matter opened but never closed; caller rescans without it.
    UnterminatedMetadata,
}

const METADATA_DELIMITER: &str = "---";

fn scan(lines: &[&str], allow_metadata: bool) -> Scan {
    let mut state = ScanState::SeekingFence;
    let mut start = 0;

    if allow_metadata && lines.first().map(|l| l.trim_end()) == Some(METADATA_DELIMITER) {
        state = ScanState::InsideMetadata;
        start = 1;
    }

    let mut entries: Vec<(String, String)> = Vec::new();
    let mut fragments: Vec<Fragment> = Vec::new();
    let mut heading: Option<String> = None;
    let mut fence_body: Vec<&str> = Vec::new();

    for line in &lines[start..] {
        match state {
            ScanState::InsideMetadata => {
                if line.trim_end() == METADATA_DELIMITER {
                    state = ScanState::SeekingFence;
                } else if let Some((key, value)) = line.split_once(':') {
                    let key = key.trim();
                    if !key.is_empty() {
                        entries.push((key.to_string(), value.trim().to_string()));
                    }
                }
                // Lines without a colon are skipped, not errors.
            }
            ScanState::SeekingFence => {
                if is_fence(line) {
                    state = ScanState::InsideFence;
                    fence_body.clear();
                } else if let Some(text) = heading_text(line) {
                    heading = Some(text.to_string());
                }
            }
            ScanState::InsideFence => {
                // Greedy: any fence line closes, language-tagged or not.
                if is_fence(line) {
                    fragments.push(Fragment {
                        heading: heading.clone(),
                        index: fragments.len(),
                        body: fence_body.join("\n"),
                    });
                    state = ScanState::SeekingFence;
                } else {
                    fence_body.push(line);
                }
            }
        }
    }

    match state {
        // A fence still open at EOF cannot be delimited; its content is lost.
        ScanState::InsideFence | ScanState::SeekingFence => Scan::Done {
            metadata: FrontMatter { entries },
            fragments,
        },
        ScanState::InsideMetadata => Scan::UnterminatedMetadata,
    }
}

/// A fence delimiter line: three backticks at the start, optionally followed
/// by a language tag (which is ignored).
fn is_fence(line: &str) -> bool {
    line.trim_end().starts_with("```")
}

/// Extract heading text from a line starting with one or more `#` markers.
fn heading_text(line: &str) -> Option<&str> {
    let stripped = line.trim_start_matches('#');
    if stripped.len() == line.len() {
        return None; // no leading '#'
    }
    let text = stripped.trim();
    (!text.is_empty()).then_some(text)
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment_bodies(t: &Template) -> Vec<&str> {
        t.fragments.iter().map(|f| f.body.as_str()).collect()
    }

    // ── front matter ──────────────────────────────────────────────────────

    #[test]
    fn front_matter_parses_flat_keys() {
        let text = "---\nservice_name: foo\nversion: 1.0.0\n---\n";
        let t = Template::parse(text);
        assert_eq!(t.metadata.get("service_name"), Some("foo"));
        assert_eq!(t.metadata.get("version"), Some("1.0.0"));
        assert_eq!(t.metadata.len(), 2);
    }

    #[test]
    fn front_matter_is_excluded_from_fragment_scan() {
        let text = "---\nservice_name: foo\n---\n# Main\n```python\nbody\n```\n";
        let t = Template::parse(text);
        assert_eq!(t.metadata.get("service_name"), Some("foo"));
        assert_eq!(fragment_bodies(&t), vec!["body"]);
    }

    #[test]
    fn unterminated_front_matter_falls_back_to_plain_mode() {
        // No closing delimiter: the whole text is body, metadata is empty.
        let text = "---\nservice_name: foo\n# Main\n```python\nbody\n```";
        let t = Template::parse(text);
        assert!(t.metadata.is_empty());
        assert_eq!(fragment_bodies(&t), vec!["body"]);
    }

    #[test]
    fn metadata_lines_without_colon_are_skipped() {
        let text = "---\njust a stray line\nauthor: bob\n---\n";
        let t = Template::parse(text);
        assert_eq!(t.metadata.len(), 1);
        assert_eq!(t.metadata.get("author"), Some("bob"));
    }

    #[test]
    fn metadata_value_may_contain_colons() {
        let text = "---\nbase_url: http://localhost:8080/v1\n---\n";
        let t = Template::parse(text);
        assert_eq!(t.metadata.get("base_url"), Some("http://localhost:8080/v1"));
    }

    // ── fragment extraction ───────────────────────────────────────────────

    #[test]
    fn fragments_keep_document_order_without_import_headings() {
        let text = "\
# First
```python
a = 1
```
# Second
```python
b = 2
```
# Third
```python
c = 3
```
";
        let t = Template::parse(text);
        assert_eq!(fragment_bodies(&t), vec!["a = 1", "b = 2", "c = 3"]);
        assert_eq!(t.assemble(), "# First\na = 1\n\n# Second\nb = 2\n\n# Third\nc = 3");
    }

    #[test]
    fn heading_context_tracks_most_recent_heading() {
        let text = "\
## Setup
some prose
```python
x
```
```python
y
```
";
        let t = Template::parse(text);
        assert_eq!(t.fragments[0].heading.as_deref(), Some("Setup"));
        // Second fence is still under the same heading.
        assert_eq!(t.fragments[1].heading.as_deref(), Some("Setup"));
    }

    #[test]
    fn fragment_without_heading_gets_ordinal_label() {
        let text = "```python\nfirst\n```\n";
        let t = Template::parse(text);
        assert_eq!(t.fragments[0].heading, None);
        assert_eq!(t.assemble(), "# code block 1\nfirst");
    }

    #[test]
    fn language_tag_is_optional() {
        let text = "# A\n```\nplain\n```\n";
        let t = Template::parse(text);
        assert_eq!(fragment_bodies(&t), vec!["plain"]);
    }

    #[test]
    fn unterminated_fence_is_discarded() {
        let text = "# A\n```python\nkept-out\n";
        let t = Template::parse(text);
        assert!(t.fragments.is_empty());
        assert_eq!(t.assemble(), "");
    }

    #[test]
    fn unterminated_fence_does_not_discard_earlier_fragments() {
        let text = "```python\nok\n```\n```python\nlost\n";
        let t = Template::parse(text);
        assert_eq!(fragment_bodies(&t), vec!["ok"]);
    }

    #[test]
    fn nested_fence_is_closed_greedily() {
        // The "inner" opener closes the first block. "inner" itself then sits
        // outside any fence, and the trailing delimiter opens a fence that
        // never closes — so only "outer" survives.
        let text = "```python\nouter\n```python\ninner\n```\n";
        let t = Template::parse(text);
        assert_eq!(fragment_bodies(&t), vec!["outer"]);
    }

    // ── import-first partition ────────────────────────────────────────────

    #[test]
    fn import_fragments_assemble_first_keeping_relative_order() {
        let text = "\
# Imports
```python
imp1
```
# Main
```python
mainbody
```
# Imports
```python
imp2
```
";
        let assembled = Template::assemble_text(text);
        assert_eq!(
            assembled,
            "# Imports\nimp1\n\n# Imports\nimp2\n\n# Main\nmainbody"
        );
    }

    #[test]
    fn import_match_is_case_insensitive_substring() {
        for heading in ["IMPORTS", "import section", "Required Imports"] {
            let f = Fragment {
                heading: Some(heading.to_string()),
                index: 0,
                body: String::new(),
            };
            assert!(f.is_import(), "heading {heading:?} should be import-tagged");
        }
        let f = Fragment {
            heading: Some("Main".to_string()),
            index: 0,
            body: String::new(),
        };
        assert!(!f.is_import());
    }

    // ── degenerate inputs ─────────────────────────────────────────────────

    #[test]
    fn empty_document_assembles_to_empty_string() {
        assert_eq!(Template::assemble_text(""), "");
    }

    #[test]
    fn document_without_fences_assembles_to_empty_string() {
        let text = "# Heading\n\nJust prose, no code at all.\n";
        assert_eq!(Template::assemble_text(text), "");
    }

    #[test]
    fn fragment_bodies_are_not_mutated() {
        let text = "```python\n  indented = True\n\ntrailing_blank_kept = True\n```\n";
        let t = Template::parse(text);
        assert_eq!(
            t.fragments[0].body,
            "  indented = True\n\ntrailing_blank_kept = True"
        );
    }
}
