//! Integration tests for mcpgen-core.
//!
//! Exercises the public API end-to-end: template parsing + assembly feeding
//! the generate service through test doubles.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use mcpgen_core::{
    application::ports::{CompletionClient, CompletionRequest, Filesystem},
    prelude::*,
};

// ── doubles ───────────────────────────────────────────────────────────────────

struct EchoClient {
    response: String,
}

#[async_trait]
impl CompletionClient for EchoClient {
    async fn complete(&self, _request: &CompletionRequest) -> McpgenResult<String> {
        Ok(self.response.clone())
    }
}

#[derive(Default, Clone)]
struct RecordingFilesystem {
    files: Arc<Mutex<Vec<(PathBuf, String)>>>,
}

impl Filesystem for RecordingFilesystem {
    fn create_dir_all(&self, _path: &Path) -> McpgenResult<()> {
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> McpgenResult<()> {
        self.files
            .lock()
            .unwrap()
            .push((path.to_path_buf(), content.to_string()));
        Ok(())
    }

    fn exists(&self, _path: &Path) -> bool {
        false
    }
}

// ── template properties ───────────────────────────────────────────────────────

#[test]
fn n_fragments_without_import_headings_keep_document_order() {
    let text = "\
# Alpha
```python
a
```
# Beta
```python
b
```
# Gamma
```python
c
```
# Delta
```python
d
```
";
    let template = Template::parse(text);
    assert_eq!(template.fragments.len(), 4);
    assert_eq!(
        template.assemble(),
        "# Alpha\na\n\n# Beta\nb\n\n# Gamma\nc\n\n# Delta\nd"
    );
}

#[test]
fn import_fragments_lead_regardless_of_position() {
    let text = "\
# Main
```python
mainbody
```
# Imports
```python
imp1
```
";
    let assembled = Template::assemble_text(text);
    let imports_at = assembled.find("imp1").unwrap();
    let main_at = assembled.find("mainbody").unwrap();
    assert!(imports_at < main_at, "imports must precede other fragments");
}

#[test]
fn metadata_parses_and_stays_out_of_the_output() {
    let text = "\
---
service_name: foo
version: 1.0.0
---
# Main
```python
body
```
";
    let template = Template::parse(text);
    assert_eq!(template.metadata.get("service_name"), Some("foo"));
    assert_eq!(template.metadata.get("version"), Some("1.0.0"));

    let assembled = template.assemble();
    assert!(!assembled.contains("service_name"));
    assert_eq!(assembled, "# Main\nbody");
}

// ── full generation round trip (through doubles) ──────────────────────────────

#[tokio::test]
async fn generate_and_save_round_trip() {
    let skeleton = Template::assemble_text(
        "# Imports\n```python\nimport mcp\n```\n# Main\n```python\nmcp.run()\n```\n",
    );
    assert_eq!(skeleton, "# Imports\nimport mcp\n\n# Main\nmcp.run()");

    let filesystem = RecordingFilesystem::default();
    let files = Arc::clone(&filesystem.files);
    let service = GenerateService::new(
        Box::new(EchoClient {
            response: "```python\nimport mcp\n\nmcp.run()\n```".into(),
        }),
        Box::new(filesystem),
    );

    let code = service
        .generate("a trivial runner", &skeleton)
        .await
        .unwrap();
    let path = service.save(&code, "runner", Path::new("/out")).unwrap();

    assert_eq!(path, PathBuf::from("/out/runner.py"));
    let written = files.lock().unwrap();
    assert_eq!(written.len(), 1);
    assert!(written[0].1.contains("import mcp"));
}
