//! Generate Service - main application orchestrator.
//!
//! This service coordinates the generation workflow:
//! 1. Validate the description
//! 2. Build the prompt around the template skeleton
//! 3. Call the completion endpoint (once, no retry)
//! 4. Extract code from the response
//! 5. Write the result to disk
//!
//! It implements the driving port (incoming) and uses driven ports (outgoing).

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{CompletionClient, CompletionRequest, Filesystem},
    },
    domain::{DomainError, prompt},
    error::{McpgenError, McpgenResult},
};

/// Main generation service.
///
/// Adapters are injected at construction so the service never touches
/// ambient global state and stays independently testable.
pub struct GenerateService {
    client: Box<dyn CompletionClient>,
    filesystem: Box<dyn Filesystem>,
}

impl GenerateService {
    /// Create a new generate service with the given adapters.
    pub fn new(client: Box<dyn CompletionClient>, filesystem: Box<dyn Filesystem>) -> Self {
        Self { client, filesystem }
    }

    /// Generate service source code from a natural-language description.
    ///
    /// `skeleton` is the assembled (or verbatim) template text anchoring the
    /// structure of the result. Returns the extracted source, never the raw
    /// model response.
    #[instrument(skip_all, fields(description_len = description.len()))]
    pub async fn generate(&self, description: &str, skeleton: &str) -> McpgenResult<String> {
        if description.trim().is_empty() {
            return Err(DomainError::EmptyDescription.into());
        }

        let request = CompletionRequest {
            system: prompt::SYSTEM_PROMPT.to_string(),
            user: prompt::build_prompt(description, skeleton),
            temperature: prompt::TEMPERATURE,
        };

        info!("Requesting code generation");
        let response = self.client.complete(&request).await?;
        debug!(response_len = response.len(), "Completion received");

        let code = prompt::extract_code(&response).map_err(McpgenError::Domain)?;
        info!(code_len = code.len(), "Code extracted from completion");
        Ok(code)
    }

    /// Save generated code to `<directory>/<file_name>`, appending a `.py`
    /// extension when missing. Returns the full path written.
    #[instrument(skip(self, code), fields(file = %file_name))]
    pub fn save(&self, code: &str, file_name: &str, directory: &Path) -> McpgenResult<PathBuf> {
        if code.trim().is_empty() {
            return Err(ApplicationError::EmptyGeneration.into());
        }

        let file_name = if file_name.ends_with(".py") {
            file_name.to_string()
        } else {
            format!("{file_name}.py")
        };

        self.filesystem.create_dir_all(directory)?;
        let path = directory.join(file_name);
        self.filesystem.write_file(&path, code)?;

        info!(path = %path.display(), "Generated code saved");
        Ok(path)
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    /// Completion double returning a canned response and recording requests.
    struct FakeClient {
        response: String,
        seen: Arc<Mutex<Vec<CompletionRequest>>>,
    }

    impl FakeClient {
        fn with_response(response: &str) -> Self {
            Self {
                response: response.to_string(),
                seen: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait]
    impl CompletionClient for FakeClient {
        async fn complete(&self, request: &CompletionRequest) -> McpgenResult<String> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(self.response.clone())
        }
    }

    /// Completion double that always fails, proving no-retry behavior.
    struct FailingClient;

    #[async_trait]
    impl CompletionClient for FailingClient {
        async fn complete(&self, _request: &CompletionRequest) -> McpgenResult<String> {
            Err(ApplicationError::CompletionFailed {
                reason: "connection refused".into(),
            }
            .into())
        }
    }

    /// In-memory filesystem recording writes.
    #[derive(Default)]
    struct FakeFilesystem {
        files: Arc<Mutex<Vec<(PathBuf, String)>>>,
    }

    impl Filesystem for FakeFilesystem {
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

    fn service_with(response: &str) -> GenerateService {
        GenerateService::new(
            Box::new(FakeClient::with_response(response)),
            Box::new(FakeFilesystem::default()),
        )
    }

    #[tokio::test]
    async fn generate_extracts_fenced_code() {
        let service = service_with("```python\nprint('ok')\n```");
        let code = service.generate("an echo service", "skeleton").await.unwrap();
        assert_eq!(code, "print('ok')");
    }

    #[tokio::test]
    async fn generate_rejects_empty_description() {
        let service = service_with("```python\nx\n```");
        let err = service.generate("   ", "skeleton").await.unwrap_err();
        assert!(matches!(
            err,
            McpgenError::Domain(DomainError::EmptyDescription)
        ));
    }

    #[tokio::test]
    async fn generate_surfaces_completion_failure() {
        let service = GenerateService::new(
            Box::new(FailingClient),
            Box::new(FakeFilesystem::default()),
        );
        let err = service.generate("a service", "skeleton").await.unwrap_err();
        assert!(matches!(
            err,
            McpgenError::Application(ApplicationError::CompletionFailed { .. })
        ));
    }

    #[tokio::test]
    async fn generate_rejects_prose_only_response() {
        let service = service_with("Sorry, cannot help with that.");
        let err = service.generate("a service", "skeleton").await.unwrap_err();
        assert!(matches!(
            err,
            McpgenError::Domain(DomainError::NoCodeInResponse)
        ));
    }

    #[tokio::test]
    async fn prompt_carries_description_and_skeleton() {
        let client = FakeClient::with_response("```python\nx\n```");
        let seen = Arc::clone(&client.seen);
        let service = GenerateService::new(Box::new(client), Box::new(FakeFilesystem::default()));
        service.generate("weather lookup", "import mcp").await.unwrap();

        let requests = seen.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].user.contains("weather lookup"));
        assert!(requests[0].user.contains("import mcp"));
        assert_eq!(requests[0].system, prompt::SYSTEM_PROMPT);
    }

    #[test]
    fn save_appends_py_extension() {
        let fs = FakeFilesystem::default();
        let files = Arc::clone(&fs.files);
        let service = GenerateService::new(
            Box::new(FakeClient::with_response("")),
            Box::new(fs),
        );

        let path = service
            .save("print('x')", "my_service", Path::new("/tmp/out"))
            .unwrap();
        assert_eq!(path, PathBuf::from("/tmp/out/my_service.py"));
        assert_eq!(files.lock().unwrap()[0].1, "print('x')");
    }

    #[test]
    fn save_rejects_empty_code() {
        let service = service_with("");
        let err = service.save("  \n ", "svc", Path::new("/tmp")).unwrap_err();
        assert!(matches!(
            err,
            McpgenError::Application(ApplicationError::EmptyGeneration)
        ));
    }
}
