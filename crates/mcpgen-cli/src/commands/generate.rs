//! Implementation of the `mcpgen generate` command.
//!
//! Responsibility: translate CLI arguments into config + template inputs,
//! call the core generate service, and display results. No business logic
//! lives here.

use tracing::{debug, info, instrument};

use mcpgen_adapters::{LocalFilesystem, OpenAiClient, TemplateLoader, TemplateOrigin};
use mcpgen_core::application::GenerateService;

use crate::{
    cli::{GenerateArgs, global::GlobalArgs},
    config::{AppConfig, EnvSnapshot, LlmOverrides},
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute the `mcpgen generate` command.
///
/// Dispatch sequence:
/// 1. Resolve LLM settings (flags > file > env > defaults)
/// 2. Require an API key before anything touches the network
/// 3. Resolve and load the template skeleton
/// 4. Generate via the core service
/// 5. Save and print next-steps guidance
#[instrument(skip_all, fields(output = %args.output))]
pub async fn execute(
    args: GenerateArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    // 1. Resolve configuration layers.
    let overrides = LlmOverrides {
        api_key: args.api_key.clone(),
        model: args.model.clone(),
        base_url: args.base_url.clone(),
    };
    let resolved = config.resolve_llm(&overrides, &EnvSnapshot::capture());
    debug!(model = %resolved.model, "LLM settings resolved");

    // 2. Credentials are a precondition, checked before any network call.
    let llm_config = resolved
        .require_key()
        .ok_or(CliError::Core(
            mcpgen_core::application::ApplicationError::MissingApiKey.into(),
        ))?;

    // 3. Load the template skeleton.
    let loaded = TemplateLoader::new().load(&args.template);
    if !loaded.metadata.is_empty() {
        for (key, value) in loaded.metadata.iter() {
            debug!(key, value, "Template metadata");
        }
    }
    if loaded.origin == TemplateOrigin::Builtin && args.template != "example.md" {
        // The user named a template that didn't resolve to anything usable.
        output.warning(&format!(
            "Falling back to the built-in skeleton (template '{}' missing or empty)",
            args.template
        ))?;
    }
    if !global.quiet {
        output.info(&format!("Using {}", loaded.origin))?;
    }

    // 4. Generate.
    let client = OpenAiClient::new(llm_config).map_err(CliError::Core)?;
    let service = GenerateService::new(Box::new(client), Box::new(LocalFilesystem::new()));

    output.header(&format!("Generating '{}'...", args.output))?;
    info!(template = %loaded.origin, "Generation started");

    let code = service
        .generate(&args.description, &loaded.skeleton)
        .await
        .map_err(CliError::Core)?;

    // 5. Save + next steps.
    let path = service
        .save(&code, &args.output, &args.directory)
        .map_err(CliError::Core)?;

    info!(path = %path.display(), "Generation completed");
    output.success(&format!("Code generated: {}", path.display()))?;

    if !global.quiet {
        output.print("")?;
        output.print("Next steps:")?;
        output.print("  mcpgen install -r requirements.txt  # if needed")?;
        output.print(&format!("  mcpgen run {}", path.display()))?;
    }

    Ok(())
}
