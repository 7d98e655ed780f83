//! MCP Server implementation for the Weather server.
//!
//! This module provides the MCP server handler that exposes:
//! - `get_weather` tool for current weather with music-bucket classification

use crate::handler::WeatherHandler;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    model::{
        CallToolResult, Content, ListResourcesResult, ReadResourceResult, ServerCapabilities,
        ServerInfo,
    },
};
use schemars::JsonSchema;
use serde::Deserialize;
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{debug, info};
use vibemuse_common::config::Config;

/// MCP Server for weather lookups.
#[derive(Clone)]
pub struct WeatherServer {
    /// Handler for weather lookup operations
    handler: Arc<WeatherHandler>,
}

/// Tool parameters wrapper for get_weather.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetWeatherToolParams {
    /// City name (e.g., 'London', 'New York', 'Tokyo')
    pub city: String,
}

impl WeatherServer {
    /// Create a new WeatherServer with the given configuration.
    pub fn new(config: Config) -> Self {
        Self {
            handler: Arc::new(WeatherHandler::new(config)),
        }
    }

    /// Fetch and classify current weather for a city.
    pub async fn get_weather(
        &self,
        params: GetWeatherToolParams,
    ) -> Result<CallToolResult, McpError> {
        info!(city = %params.city, "Looking up weather");

        let report = self.handler.get_weather(&params.city).await.map_err(|e| {
            McpError::internal_error(format!("Weather lookup failed: {}", e), None)
        })?;

        let json = serde_json::to_string(&report)
            .map_err(|e| McpError::internal_error(format!("Failed to serialize report: {}", e), None))?;

        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

impl ServerHandler for WeatherServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Weather lookup server backed by the OpenWeatherMap API. Use the \
                 get_weather tool to fetch current conditions for a city along \
                 with a weather bucket (sunny/cloudy/rainy/windy/night) for \
                 music selection."
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

            let schema = schema_for!(GetWeatherToolParams);
            let schema_value = serde_json::to_value(&schema).unwrap_or_default();

            let input_schema = match schema_value {
                serde_json::Value::Object(map) => Arc::new(map),
                _ => Arc::new(serde_json::Map::new()),
            };

            Ok(ListToolsResult {
                tools: vec![Tool {
                    name: Cow::Borrowed("get_weather"),
                    description: Some(Cow::Borrowed(
                        "Get current weather for a city and return conditions plus \
                         a weather bucket (sunny/cloudy/rainy/windy/night) as JSON.",
                    )),
                    input_schema,
                    annotations: None,
                    icons: None,
                    meta: None,
                    output_schema: None,
                    title: None,
                }],
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
                "get_weather" => {
                    let tool_params: GetWeatherToolParams = params
                        .arguments
                        .map(|args| serde_json::from_value(serde_json::Value::Object(args)))
                        .transpose()
                        .map_err(|e| {
                            McpError::invalid_params(format!("Invalid parameters: {}", e), None)
                        })?
                        .ok_or_else(|| McpError::invalid_params("Missing parameters", None))?;

                    self.get_weather(tool_params).await
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
            debug!("Listing resources (none available for weather server)");

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
