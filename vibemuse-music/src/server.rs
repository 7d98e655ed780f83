//! MCP Server implementation for the Music server.
//!
//! This module provides the MCP server handler that exposes:
//! - `music_generate` tool for direct style + description generation
//! - `vibe_generate` tool for sensor-driven generation via the brief resolver

use crate::handler::{
    DEFAULT_DURATION_SECS, GeneratedTrack, MusicGenerateParams, MusicHandler,
};
use rmcp::{
    ErrorData as McpError, ServerHandler,
    model::{
        CallToolResult, Content, ListResourcesResult, ReadResourceResult, ServerCapabilities,
        ServerInfo,
    },
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{debug, info};
use vibemuse_brief::{
    CreativeMusicBrief, PromptMetadata, RoomStats, VibeDecision, WeatherSnapshot, resolve,
};
use vibemuse_common::config::Config;
use vibemuse_common::styles::StyleRegistry;

/// MCP Server for music generation.
#[derive(Clone)]
pub struct MusicServer {
    /// Handler for music generation operations
    handler: Arc<MusicHandler>,
}

/// Tool parameters wrapper for music_generate.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct MusicGenerateToolParams {
    /// Music style (upbeat/chill/cozy/dynamic/ambient/classical/rock/jazz/electronic/acoustic)
    pub style: String,
    /// Custom description for the music to be generated
    pub description: String,
    /// Duration of the track in seconds (5-180, default 60)
    #[serde(default)]
    pub duration_seconds: Option<u16>,
    /// Output file path for saving locally
    #[serde(default)]
    pub output_file: Option<String>,
}

impl From<MusicGenerateToolParams> for MusicGenerateParams {
    fn from(params: MusicGenerateToolParams) -> Self {
        Self {
            style: params.style,
            description: params.description,
            duration_seconds: params.duration_seconds.unwrap_or(DEFAULT_DURATION_SECS),
            output_file: params.output_file,
        }
    }
}

/// Tool parameters wrapper for vibe_generate.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct VibeGenerateToolParams {
    /// Room sensor snapshot driving the brief
    pub stats: RoomStats,
    /// Caller-supplied overrides for any brief field
    #[serde(default)]
    pub prompt_metadata: Option<PromptMetadata>,
    /// Previous vibe decision from upstream analysis
    #[serde(default)]
    pub decision: Option<VibeDecision>,
    /// Current weather context
    #[serde(default)]
    pub weather: Option<WeatherSnapshot>,
    /// Fully formed brief to refine instead of deriving a fresh one
    #[serde(default)]
    pub existing_brief: Option<CreativeMusicBrief>,
    /// Duration of the track in seconds (5-180, default 60)
    #[serde(default)]
    pub duration_seconds: Option<u16>,
}

/// Response payload of the vibe_generate tool.
///
/// The resolved brief is always present, even when generation fails, so the
/// caller can fall back to a local playlist that matches the brief.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VibeGenerateResponse {
    /// Whether a track was generated
    pub success: bool,
    /// The resolved creative brief
    pub brief: CreativeMusicBrief,
    /// Metadata of the generated track, when generation succeeded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub music: Option<GeneratedTrack>,
    /// Error description, when generation failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MusicServer {
    /// Create a new MusicServer with the given configuration.
    pub fn new(config: Config) -> Self {
        Self {
            handler: Arc::new(MusicHandler::new(config)),
        }
    }

    /// Generate music from a style and description.
    pub async fn generate_music(
        &self,
        params: MusicGenerateToolParams,
    ) -> Result<CallToolResult, McpError> {
        info!(style = %params.style, "Generating music");

        let gen_params: MusicGenerateParams = params.into();
        let track = self.handler.generate_music(gen_params).await.map_err(|e| {
            McpError::internal_error(format!("Music generation failed: {}", e), None)
        })?;

        let json = serde_json::to_string(&track)
            .map_err(|e| McpError::internal_error(format!("Failed to serialize result: {}", e), None))?;

        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    /// Resolve a creative brief from sensor readings and generate a track for it.
    pub async fn generate_vibe_music(
        &self,
        params: VibeGenerateToolParams,
    ) -> Result<CallToolResult, McpError> {
        let brief = resolve(
            &params.stats,
            params.prompt_metadata.as_ref(),
            params.decision.as_ref(),
            params.weather.as_ref(),
            params.existing_brief.as_ref(),
        );

        info!(
            style = %brief.style,
            vibe = %brief.vibe,
            bpm = brief.target_bpm,
            "Resolved creative brief"
        );

        let duration = params.duration_seconds.unwrap_or(DEFAULT_DURATION_SECS);
        let prompt = generation_prompt(&brief);

        let result = self.handler.generate_raw(&prompt, duration, None).await;
        let response = match result {
            Ok(track) => VibeGenerateResponse {
                success: true,
                brief,
                music: Some(track),
                error: None,
            },
            Err(e) => VibeGenerateResponse {
                success: false,
                brief,
                music: None,
                error: Some(e.to_string()),
            },
        };

        let json = serde_json::to_string(&response)
            .map_err(|e| McpError::internal_error(format!("Failed to serialize response: {}", e), None))?;

        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

/// Assemble the generation prompt for a resolved brief.
///
/// Known style tags contribute their registry base prompt; the brief's own
/// description, instrumentation, mood, and weather context follow.
fn generation_prompt(brief: &CreativeMusicBrief) -> String {
    let mut prompt = match StyleRegistry::resolve(&brief.style) {
        Some(style) => format!("{}. {}", style.prompt, brief.description),
        None => brief.description.clone(),
    };

    if !brief.instrumentation_hints.is_empty() {
        prompt.push_str(&format!(
            " Instrumentation: {}.",
            brief.instrumentation_hints.join(", ")
        ));
    }
    if !brief.mood_keywords.is_empty() {
        prompt.push_str(&format!(" Mood: {}.", brief.mood_keywords.join(", ")));
    }
    if let Some(weather) = &brief.weather_summary {
        prompt.push_str(&format!(" Weather outside: {}.", weather));
    }

    prompt
}

impl ServerHandler for MusicServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Music generation server backed by the ElevenLabs Music API. \
                 Use the music_generate tool to create a track from a style and \
                 description, or the vibe_generate tool to derive a creative \
                 brief from room sensor readings and generate a matching track."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    fn list_tools(
        &self,
        _params: Option<rmcp::model::PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<rmcp::model::ListToolsResult, McpError>> + Send + '_
    {
        async move {
            use rmcp::model::{ListToolsResult, Tool};
            use schemars::schema_for;

            let music_schema = tool_schema(serde_json::to_value(schema_for!(MusicGenerateToolParams)));
            let vibe_schema = tool_schema(serde_json::to_value(schema_for!(VibeGenerateToolParams)));

            Ok(ListToolsResult {
                tools: vec![
                    Tool {
                        name: Cow::Borrowed("music_generate"),
                        description: Some(Cow::Borrowed(
                            "Generate an instrumental music track from a style and a \
                             custom description. Returns the saved file path, MIME \
                             type, and duration as JSON.",
                        )),
                        input_schema: music_schema,
                        annotations: None,
                        icons: None,
                        meta: None,
                        output_schema: None,
                        title: None,
                    },
                    Tool {
                        name: Cow::Borrowed("vibe_generate"),
                        description: Some(Cow::Borrowed(
                            "Resolve a creative brief from room sensor readings \
                             (plus optional overrides, a previous vibe decision, \
                             and weather) and generate a matching instrumental \
                             track. Returns the brief and track metadata as JSON.",
                        )),
                        input_schema: vibe_schema,
                        annotations: None,
                        icons: None,
                        meta: None,
                        output_schema: None,
                        title: None,
                    },
                ],
                next_cursor: None,
                meta: None,
            })
        }
    }

    fn call_tool(
        &self,
        params: rmcp::model::CallToolRequestParam,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        async move {
            match params.name.as_ref() {
                "music_generate" => {
                    let tool_params: MusicGenerateToolParams = parse_tool_params(params.arguments)?;
                    self.generate_music(tool_params).await
                }
                "vibe_generate" => {
                    let tool_params: VibeGenerateToolParams = parse_tool_params(params.arguments)?;
                    self.generate_vibe_music(tool_params).await
                }
                _ => Err(McpError::invalid_params(
                    format!("Unknown tool: {}", params.name),
                    None,
                )),
            }
        }
    }

    fn list_resources(
        &self,
        _params: Option<rmcp::model::PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListResourcesResult, McpError>> + Send + '_ {
        async move {
            debug!("Listing resources (none available for music server)");

            Ok(ListResourcesResult {
                resources: vec![],
                next_cursor: None,
                meta: None,
            })
        }
    }

    fn read_resource(
        &self,
        params: rmcp::model::ReadResourceRequestParam,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ReadResourceResult, McpError>> + Send + '_ {
        async move {
            let uri = &params.uri;
            debug!(uri = %uri, "Reading resource");

            Err(McpError::resource_not_found(
                format!("Unknown resource: {}", uri),
                None,
            ))
        }
    }
}

/// Convert a schemars schema value into the map rmcp tools expect.
fn tool_schema(
    schema: Result<serde_json::Value, serde_json::Error>,
) -> Arc<serde_json::Map<String, serde_json::Value>> {
    match schema {
        Ok(serde_json::Value::Object(map)) => Arc::new(map),
        _ => Arc::new(serde_json::Map::new()),
    }
}

/// Deserialize tool arguments, mapping absence and shape errors to invalid-params.
fn parse_tool_params<T: serde::de::DeserializeOwned>(
    arguments: Option<serde_json::Map<String, serde_json::Value>>,
) -> Result<T, McpError> {
    arguments
        .map(|args| serde_json::from_value(serde_json::Value::Object(args)))
        .transpose()
        .map_err(|e| McpError::invalid_params(format!("Invalid parameters: {}", e), None))?
        .ok_or_else(|| McpError::invalid_params("Missing parameters", None))
}
