use std::sync::Arc;

use rmcp::{
    Error as McpError, RoleServer, ServerHandler, model::*, service::RequestContext,
};
use schemars::{JsonSchema, SchemaGenerator};
use serde::{Deserialize, Serialize};

use crate::docs::DocLibrary;
use crate::entity::{self, EntityState};
use crate::ha::HaClient;
use crate::health::HealthMonitor;
use crate::repo::{self, ConfigRepo};
use crate::settings::Settings;

// JSON Schema generation for tool inputs, draft 2020-12 via schemars 0.9.
fn schema_for_type<T: JsonSchema>() -> serde_json::Map<String, serde_json::Value> {
    let schema = SchemaGenerator::default().into_root_schema_for::<T>();
    let object = serde_json::to_value(schema).expect("failed to serialize schema");
    match object {
        serde_json::Value::Object(object) => object,
        _ => panic!("unexpected schema value"),
    }
}

const MULTI_MATCH_LIMIT: usize = 20;
const SCRIPT_ACTION_LIMIT: usize = 5;
const DEFAULT_HISTORY_HOURS: i64 = 24;

// =============================================================================
// Tool Argument Structs
// =============================================================================

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ReadConfigArgs {
    /// Config file name, e.g. "house_mode.yaml" or "packages/house_mode.yaml".
    /// The .yaml extension is optional.
    pub filename: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ListPackagesArgs {}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ListAutomationsArgs {}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ListScriptsArgs {}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SearchConfigArgs {
    /// Case-insensitive regex, e.g. "quiet_hours" or "brightness_pct"
    pub pattern: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetEntityStateArgs {
    /// Full entity ID (e.g. "light.front_porch") or a free-text search term
    /// (e.g. "porch light") matched against entity IDs and friendly names
    pub entity_id: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetEntitiesByDomainArgs {
    /// Entity domain, e.g. "light", "switch", "automation", "sensor"
    pub domain: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetAreaStateArgs {
    /// Area name as listed in the repo's areas.yaml, e.g. "living room"
    pub area: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetEntityHistoryArgs {
    /// Full entity ID to fetch history for
    pub entity_id: String,
    /// Look-back window in hours (default: 24)
    #[serde(default)]
    pub hours: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct RenderTemplateArgs {
    /// Jinja template to render server-side, e.g. "{{ states('sun.sun') }}"
    pub template: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ReadDocArgs {
    /// Doc filename under docs/, e.g. "system_map.md". The "docs/" prefix and
    /// ".md" extension are optional.
    pub filename: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetSystemMapArgs {}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GenerateHealthReportArgs {}

// =============================================================================
// Service
// =============================================================================

/// The MCP tool surface: read-only views of the config repo, the docs
/// directory, and live Home Assistant state.
#[derive(Clone)]
pub struct HomewatchService {
    repo: Arc<ConfigRepo>,
    docs: Arc<DocLibrary>,
    ha: HaClient,
    health: Arc<HealthMonitor>,
}

fn internal(error: anyhow::Error) -> McpError {
    McpError::internal_error(error.to_string(), None)
}

fn text_result(text: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text.into())])
}

impl HomewatchService {
    pub fn new(settings: &Settings) -> Self {
        let ha = HaClient::new(settings);
        Self {
            repo: Arc::new(ConfigRepo::new(settings.repo_path.clone())),
            docs: Arc::new(DocLibrary::new(&settings.repo_path)),
            health: Arc::new(HealthMonitor::new(ha.clone(), settings.data_dir.clone())),
            ha,
        }
    }

    // =============================================================================
    // Config Tools
    // =============================================================================

    async fn read_config(&self, args: ReadConfigArgs) -> Result<CallToolResult, McpError> {
        match self.repo.read_raw(&args.filename).map_err(internal)? {
            Some(content) => Ok(text_result(content)),
            None => {
                let available: Vec<String> = self
                    .repo
                    .config_files()
                    .iter()
                    .map(|p| format!("  - {}", self.repo.relative(p)))
                    .collect();
                Ok(text_result(format!(
                    "File '{}' not found.\n\nAvailable config files:\n{}",
                    args.filename,
                    available.join("\n")
                )))
            }
        }
    }

    async fn list_packages(&self) -> Result<CallToolResult, McpError> {
        let Some(summaries) = self.repo.package_summaries() else {
            return Ok(text_result("No packages/ directory found."));
        };

        let lines: Vec<String> = summaries
            .iter()
            .map(|pkg| match &pkg.parts {
                None => format!("- {}: (empty or parse error)", pkg.name),
                Some(parts) if parts.is_empty() => format!("- **{}**: config only", pkg.name),
                Some(parts) => format!("- **{}**: {}", pkg.name, parts.join(", ")),
            })
            .collect();
        Ok(text_result(lines.join("\n")))
    }

    async fn list_automations(&self) -> Result<CallToolResult, McpError> {
        let mut automations = self.repo.extract_automations();
        if automations.is_empty() {
            return Ok(text_result("No automations found."));
        }
        automations.sort_by(|a, b| (&a.file, &a.alias).cmp(&(&b.file, &b.alias)));

        let mut lines = Vec::new();
        let mut current_file = String::new();
        for auto in &automations {
            if auto.file != current_file {
                current_file = auto.file.clone();
                lines.push(format!("\n### {current_file}"));
            }
            let triggers = if auto.triggers.is_empty() {
                "none".to_string()
            } else {
                auto.triggers.join("; ")
            };
            lines.push(format!("- **{}** (id: {})", auto.alias, auto.id));
            lines.push(format!("  Triggers: {triggers}"));
        }
        Ok(text_result(lines.join("\n")))
    }

    async fn list_scripts(&self) -> Result<CallToolResult, McpError> {
        let mut scripts = self.repo.extract_scripts();
        if scripts.is_empty() {
            return Ok(text_result("No scripts found."));
        }
        scripts.sort_by(|a, b| (&a.file, &a.name).cmp(&(&b.file, &b.name)));

        let mut lines = Vec::new();
        let mut current_file = String::new();
        for script in &scripts {
            if script.file != current_file {
                current_file = script.file.clone();
                lines.push(format!("\n### {current_file}"));
            }
            let alias = if script.alias.is_empty() {
                String::new()
            } else {
                format!(" ({})", script.alias)
            };
            lines.push(format!("- **{}**{}", script.name, alias));
            for action in script.actions.iter().take(SCRIPT_ACTION_LIMIT) {
                lines.push(format!("  - {action}"));
            }
            if script.actions.len() > SCRIPT_ACTION_LIMIT {
                lines.push(format!(
                    "  - ... and {} more",
                    script.actions.len() - SCRIPT_ACTION_LIMIT
                ));
            }
        }
        Ok(text_result(lines.join("\n")))
    }

    async fn search_config(&self, args: SearchConfigArgs) -> Result<CallToolResult, McpError> {
        let hits = self
            .repo
            .search(&args.pattern)
            .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
        if hits.is_empty() {
            return Ok(text_result(format!(
                "No matches found for '{}'.",
                args.pattern
            )));
        }

        let mut lines = vec![format!(
            "Found {} match(es) for '{}':\n",
            hits.len(),
            args.pattern
        )];
        let mut current_file = String::new();
        for hit in &hits {
            if hit.file != current_file {
                current_file = hit.file.clone();
                lines.push(format!("\n**{current_file}:**"));
            }
            lines.push(format!("  line {}: {}", hit.line, hit.text));
        }
        Ok(text_result(lines.join("\n")))
    }

    // =============================================================================
    // State Tools
    // =============================================================================

    async fn get_entity_state(&self, args: GetEntityStateArgs) -> Result<CallToolResult, McpError> {
        // Full entity ids go straight to the single-state endpoint.
        if entity::looks_like_entity_id(&args.entity_id) {
            if let Some(state) = self.ha.get_state(&args.entity_id).await.map_err(internal)? {
                return Ok(text_result(entity::format_state(&state)));
            }
        }

        let states = self.ha.get_states().await.map_err(internal)?;
        let matches = entity::find_matches(&states, &args.entity_id);
        match matches.len() {
            0 => Ok(text_result(format!(
                "No entity found matching '{}'.",
                args.entity_id
            ))),
            1 => Ok(text_result(entity::format_state(matches[0]))),
            n => {
                let mut lines = vec![format!(
                    "Found {} entities matching '{}':\n",
                    n, args.entity_id
                )];
                for state in matches.iter().take(MULTI_MATCH_LIMIT) {
                    lines.push(format!(
                        "- **{}** ({}): {}",
                        state.entity_id,
                        state.friendly_name(),
                        state.state
                    ));
                }
                if n > MULTI_MATCH_LIMIT {
                    lines.push(format!("... and {} more", n - MULTI_MATCH_LIMIT));
                }
                Ok(text_result(lines.join("\n")))
            }
        }
    }

    async fn get_entities_by_domain(
        &self,
        args: GetEntitiesByDomainArgs,
    ) -> Result<CallToolResult, McpError> {
        let states = self.ha.get_states().await.map_err(internal)?;
        let matches = entity::by_domain(&states, &args.domain);
        if matches.is_empty() {
            return Ok(text_result(format!(
                "No entities found for domain '{}'.",
                args.domain
            )));
        }

        let mut lines = vec![format!("**{}** — {} entities:\n", args.domain, matches.len())];
        for state in matches {
            lines.push(format!(
                "- `{}`: **{}** ({})",
                state.entity_id,
                state.state,
                state.friendly_name()
            ));
        }
        Ok(text_result(lines.join("\n")))
    }

    async fn get_area_state(&self, args: GetAreaStateArgs) -> Result<CallToolResult, McpError> {
        let Some(area_map) = self.repo.area_map().map_err(internal)? else {
            return Ok(text_result(
                "No areas.yaml found in the config repo. Add one mapping area names to \
                 entity id prefixes to enable area lookups.",
            ));
        };

        let key = repo::normalize_area(&args.area);
        let Some(prefixes) = area_map.get(&key) else {
            let known: Vec<&str> = area_map.keys().map(String::as_str).collect();
            return Ok(text_result(format!(
                "Unknown area '{}'.\n\nKnown areas: {}",
                args.area,
                known.join(", ")
            )));
        };

        let states = self.ha.get_states().await.map_err(internal)?;
        let mut matches: Vec<&EntityState> = states
            .iter()
            .filter(|s| prefixes.iter().any(|p| s.entity_id.starts_with(p.as_str())))
            .collect();
        if matches.is_empty() {
            return Ok(text_result(format!(
                "No entities found for area '{}'.",
                args.area
            )));
        }
        matches.sort_by(|a, b| a.entity_id.cmp(&b.entity_id));

        let mut lines = vec![format!("**{}** — {} entities:\n", args.area, matches.len())];
        for state in matches {
            lines.push(format!(
                "- `{}`: **{}**{} ({})",
                state.entity_id,
                state.state,
                entity::detail_suffix(state),
                state.friendly_name()
            ));
        }
        Ok(text_result(lines.join("\n")))
    }

    async fn get_entity_history(
        &self,
        args: GetEntityHistoryArgs,
    ) -> Result<CallToolResult, McpError> {
        let hours = args.hours.unwrap_or(DEFAULT_HISTORY_HOURS);
        if hours <= 0 {
            return Err(McpError::invalid_params(
                format!("hours must be positive, got {hours}"),
                None,
            ));
        }

        let points = self
            .ha
            .get_history(&args.entity_id, hours)
            .await
            .map_err(internal)?;
        if points.is_empty() {
            return Ok(text_result(format!(
                "No history found for '{}' in the last {} hours.",
                args.entity_id, hours
            )));
        }

        let mut lines = vec![format!(
            "**{}** — {} state change(s) in the last {}h:\n",
            args.entity_id,
            points.len(),
            hours
        )];
        for point in &points {
            let state = point.get("state").and_then(|v| v.as_str()).unwrap_or("?");
            let when = point
                .get("last_changed")
                .or_else(|| point.get("last_updated"))
                .and_then(|v| v.as_str())
                .unwrap_or("");
            lines.push(format!("- {when}: **{state}**"));
        }
        Ok(text_result(lines.join("\n")))
    }

    async fn render_template(&self, args: RenderTemplateArgs) -> Result<CallToolResult, McpError> {
        let rendered = self
            .ha
            .render_template(&args.template)
            .await
            .map_err(internal)?;
        Ok(text_result(rendered))
    }

    // =============================================================================
    // Doc Tools
    // =============================================================================

    async fn read_doc(&self, args: ReadDocArgs) -> Result<CallToolResult, McpError> {
        match self.docs.read(&args.filename).map_err(internal)? {
            Some(content) => Ok(text_result(content)),
            None => {
                let available: Vec<String> = self
                    .docs
                    .available()
                    .into_iter()
                    .map(|doc| format!("  - {doc}"))
                    .collect();
                Ok(text_result(format!(
                    "File '{}' not found in docs/.\n\nAvailable docs:\n{}",
                    args.filename,
                    available.join("\n")
                )))
            }
        }
    }

    async fn get_system_map(&self) -> Result<CallToolResult, McpError> {
        self.read_doc(ReadDocArgs {
            filename: "system_map.md".to_string(),
        })
        .await
    }

    // =============================================================================
    // Health Tools
    // =============================================================================

    async fn generate_health_report(&self) -> Result<CallToolResult, McpError> {
        let report = self.health.generate().await.map_err(internal)?;
        Ok(text_result(report.to_markdown()))
    }
}

impl ServerHandler for HomewatchService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Read-only tools for a Home Assistant setup. Config tools read YAML from \
                 the ha-config repository clone; state tools query the Home Assistant REST \
                 API for live data; doc tools read the repository's docs/ directory; \
                 generate_health_report runs an error-log diagnostic with trend comparison."
                    .into(),
            ),
        }
    }

    async fn initialize(
        &self,
        _request: InitializeRequestParam,
        context: RequestContext<RoleServer>,
    ) -> Result<InitializeResult, McpError> {
        if let Some(http_request_part) = context.extensions.get::<axum::http::request::Parts>() {
            let initialize_headers = &http_request_part.headers;
            let initialize_uri = &http_request_part.uri;
            tracing::info!(?initialize_headers, %initialize_uri, "initialize from http server");
        }
        Ok(self.get_info())
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        let tools = vec![
            Tool {
                name: "read_config".into(),
                description: Some("Read a Home Assistant config file and return its raw YAML content".into()),
                input_schema: Arc::new(schema_for_type::<ReadConfigArgs>()),
                annotations: None,
            },
            Tool {
                name: "list_packages".into(),
                description: Some("List all HA package files with their automation, helper, and script counts".into()),
                input_schema: Arc::new(schema_for_type::<ListPackagesArgs>()),
                annotations: None,
            },
            Tool {
                name: "list_automations".into(),
                description: Some("List all automations across all config files with trigger summaries".into()),
                input_schema: Arc::new(schema_for_type::<ListAutomationsArgs>()),
                annotations: None,
            },
            Tool {
                name: "list_scripts".into(),
                description: Some("List all scripts with their key actions".into()),
                input_schema: Arc::new(schema_for_type::<ListScriptsArgs>()),
                annotations: None,
            },
            Tool {
                name: "search_config".into(),
                description: Some("Search all files in the config repo for a case-insensitive regex, returning file/line matches".into()),
                input_schema: Arc::new(schema_for_type::<SearchConfigArgs>()),
                annotations: None,
            },
            Tool {
                name: "get_entity_state".into(),
                description: Some("Get the current state of an entity by full id or fuzzy name search".into()),
                input_schema: Arc::new(schema_for_type::<GetEntityStateArgs>()),
                annotations: None,
            },
            Tool {
                name: "get_entities_by_domain".into(),
                description: Some("List all entities in a domain with their current state".into()),
                input_schema: Arc::new(schema_for_type::<GetEntitiesByDomainArgs>()),
                annotations: None,
            },
            Tool {
                name: "get_area_state".into(),
                description: Some("Get the state of all entities in a home area (per the repo's areas.yaml mapping)".into()),
                input_schema: Arc::new(schema_for_type::<GetAreaStateArgs>()),
                annotations: None,
            },
            Tool {
                name: "get_entity_history".into(),
                description: Some("Get an entity's state changes over the last N hours (default 24)".into()),
                input_schema: Arc::new(schema_for_type::<GetEntityHistoryArgs>()),
                annotations: None,
            },
            Tool {
                name: "render_template".into(),
                description: Some("Render a Jinja template on the Home Assistant server (read-only)".into()),
                input_schema: Arc::new(schema_for_type::<RenderTemplateArgs>()),
                annotations: None,
            },
            Tool {
                name: "read_doc".into(),
                description: Some("Read a documentation file from the repo's docs/ directory".into()),
                input_schema: Arc::new(schema_for_type::<ReadDocArgs>()),
                annotations: None,
            },
            Tool {
                name: "get_system_map".into(),
                description: Some("Return the full system architecture map (docs/system_map.md)".into()),
                input_schema: Arc::new(schema_for_type::<GetSystemMapArgs>()),
                annotations: None,
            },
            Tool {
                name: "generate_health_report".into(),
                description: Some("Run a health diagnostic against Home Assistant: error/warning counts, top issues, and trend vs the previous run".into()),
                input_schema: Arc::new(schema_for_type::<GenerateHealthReportArgs>()),
                annotations: None,
            },
        ];

        Ok(ListToolsResult {
            tools,
            next_cursor: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let arguments = request.arguments.unwrap_or_default();

        match request.name.as_ref() {
            "read_config" => {
                let args: ReadConfigArgs = serde_json::from_value(serde_json::Value::Object(arguments))
                    .map_err(|e| McpError::invalid_params(
                        format!("read_config: Invalid arguments - {}. Expected: {{\"filename\": \"string\"}}", e),
                        None,
                    ))?;
                self.read_config(args).await
            }
            "list_packages" => {
                let _args: ListPackagesArgs = serde_json::from_value(serde_json::Value::Object(arguments))
                    .map_err(|e| McpError::invalid_params(
                        format!("list_packages: Invalid arguments - {}. Expected: {{}}", e),
                        None,
                    ))?;
                self.list_packages().await
            }
            "list_automations" => {
                let _args: ListAutomationsArgs = serde_json::from_value(serde_json::Value::Object(arguments))
                    .map_err(|e| McpError::invalid_params(
                        format!("list_automations: Invalid arguments - {}. Expected: {{}}", e),
                        None,
                    ))?;
                self.list_automations().await
            }
            "list_scripts" => {
                let _args: ListScriptsArgs = serde_json::from_value(serde_json::Value::Object(arguments))
                    .map_err(|e| McpError::invalid_params(
                        format!("list_scripts: Invalid arguments - {}. Expected: {{}}", e),
                        None,
                    ))?;
                self.list_scripts().await
            }
            "search_config" => {
                let args: SearchConfigArgs = serde_json::from_value(serde_json::Value::Object(arguments))
                    .map_err(|e| McpError::invalid_params(
                        format!("search_config: Invalid arguments - {}. Expected: {{\"pattern\": \"string (regex)\"}}", e),
                        None,
                    ))?;
                self.search_config(args).await
            }
            "get_entity_state" => {
                let args: GetEntityStateArgs = serde_json::from_value(serde_json::Value::Object(arguments))
                    .map_err(|e| McpError::invalid_params(
                        format!("get_entity_state: Invalid arguments - {}. Expected: {{\"entity_id\": \"string\"}}", e),
                        None,
                    ))?;
                self.get_entity_state(args).await
            }
            "get_entities_by_domain" => {
                let args: GetEntitiesByDomainArgs = serde_json::from_value(serde_json::Value::Object(arguments))
                    .map_err(|e| McpError::invalid_params(
                        format!("get_entities_by_domain: Invalid arguments - {}. Expected: {{\"domain\": \"string\"}}", e),
                        None,
                    ))?;
                self.get_entities_by_domain(args).await
            }
            "get_area_state" => {
                let args: GetAreaStateArgs = serde_json::from_value(serde_json::Value::Object(arguments))
                    .map_err(|e| McpError::invalid_params(
                        format!("get_area_state: Invalid arguments - {}. Expected: {{\"area\": \"string\"}}", e),
                        None,
                    ))?;
                self.get_area_state(args).await
            }
            "get_entity_history" => {
                let args: GetEntityHistoryArgs = serde_json::from_value(serde_json::Value::Object(arguments))
                    .map_err(|e| McpError::invalid_params(
                        format!("get_entity_history: Invalid arguments - {}. Expected: {{\"entity_id\": \"string\", \"hours\": number (optional)}}", e),
                        None,
                    ))?;
                self.get_entity_history(args).await
            }
            "render_template" => {
                let args: RenderTemplateArgs = serde_json::from_value(serde_json::Value::Object(arguments))
                    .map_err(|e| McpError::invalid_params(
                        format!("render_template: Invalid arguments - {}. Expected: {{\"template\": \"string\"}}", e),
                        None,
                    ))?;
                self.render_template(args).await
            }
            "read_doc" => {
                let args: ReadDocArgs = serde_json::from_value(serde_json::Value::Object(arguments))
                    .map_err(|e| McpError::invalid_params(
                        format!("read_doc: Invalid arguments - {}. Expected: {{\"filename\": \"string\"}}", e),
                        None,
                    ))?;
                self.read_doc(args).await
            }
            "get_system_map" => {
                let _args: GetSystemMapArgs = serde_json::from_value(serde_json::Value::Object(arguments))
                    .map_err(|e| McpError::invalid_params(
                        format!("get_system_map: Invalid arguments - {}. Expected: {{}}", e),
                        None,
                    ))?;
                self.get_system_map().await
            }
            "generate_health_report" => {
                let _args: GenerateHealthReportArgs = serde_json::from_value(serde_json::Value::Object(arguments))
                    .map_err(|e| McpError::invalid_params(
                        format!("generate_health_report: Invalid arguments - {}. Expected: {{}}", e),
                        None,
                    ))?;
                self.generate_health_report().await
            }
            unknown_tool => {
                let available_tools = vec![
                    "read_config",
                    "list_packages",
                    "list_automations",
                    "list_scripts",
                    "search_config",
                    "get_entity_state",
                    "get_entities_by_domain",
                    "get_area_state",
                    "get_entity_history",
                    "render_template",
                    "read_doc",
                    "get_system_map",
                    "generate_health_report",
                ];
                Err(McpError::invalid_params(
                    format!(
                        "Unknown tool: '{}'. Available tools: {}",
                        unknown_tool,
                        available_tools.join(", ")
                    ),
                    None,
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_schemas_are_objects_with_properties() {
        let schema = schema_for_type::<ReadConfigArgs>();
        assert_eq!(schema.get("type").and_then(|v| v.as_str()), Some("object"));
        let properties = schema.get("properties").and_then(|v| v.as_object()).unwrap();
        assert!(properties.contains_key("filename"));
    }

    #[test]
    fn no_arg_tools_have_object_schemas() {
        let schema = schema_for_type::<ListPackagesArgs>();
        assert_eq!(schema.get("type").and_then(|v| v.as_str()), Some("object"));
    }
}
