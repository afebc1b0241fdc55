//! Endpoint catalog of the SnapLLM service.
//!
//! The catalog is compiled in and never mutated. Declaration order is the
//! default display order.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{DomainError, DomainResult};
use crate::request::HttpMethod;

/// Closed set of endpoint categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointCategory {
    /// Liveness and server information.
    Health,
    /// Server configuration.
    Config,
    /// Model lifecycle and cache management.
    Models,
    /// Text generation.
    Inference,
    /// Multimodal (image + text) generation.
    Vision,
    /// Image and video diffusion.
    Diffusion,
    /// Context cache ingestion and queries.
    Contexts,
}

impl EndpointCategory {
    /// All categories in display order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Health,
            Self::Config,
            Self::Models,
            Self::Inference,
            Self::Vision,
            Self::Diffusion,
            Self::Contexts,
        ]
    }

    /// Returns the lowercase key used on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Health => "health",
            Self::Config => "config",
            Self::Models => "models",
            Self::Inference => "inference",
            Self::Vision => "vision",
            Self::Diffusion => "diffusion",
            Self::Contexts => "contexts",
        }
    }
}

impl fmt::Display for EndpointCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EndpointCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        let wanted = s.trim().to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| DomainError::UnknownCategory(s.to_string()))
    }
}

/// Category filter with `all` as the wildcard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// Every category matches.
    #[default]
    All,
    /// Only the given category matches.
    Only(EndpointCategory),
}

impl CategoryFilter {
    /// Returns true if the category passes this filter.
    #[must_use]
    pub fn matches(self, category: EndpointCategory) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Only)
        }
    }
}

/// Identity of a catalog endpoint. One variant per entry.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointId {
    Health,
    ApiInfo,
    ServerMetrics,
    ConfigGet,
    ConfigUpdate,
    ConfigRecommendations,
    ModelsList,
    #[serde(rename = "openai_models")]
    OpenAiModels,
    ModelLoad,
    ModelSwitch,
    ModelUnload,
    ModelsScan,
    ModelDelete,
    CacheStats,
    CacheClear,
    ChatCompletions,
    Messages,
    Generate,
    GenerateBatch,
    VisionGenerate,
    DiffusionGenerate,
    DiffusionVideo,
    ImageFetch,
    ContextsList,
    ContextsStats,
    ContextGet,
    ContextIngest,
    ContextQuery,
    ContextPromote,
    ContextDemote,
    ContextDelete,
}

impl EndpointId {
    /// Returns the stable snake_case key of this endpoint.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Health => "health",
            Self::ApiInfo => "api_info",
            Self::ServerMetrics => "server_metrics",
            Self::ConfigGet => "config_get",
            Self::ConfigUpdate => "config_update",
            Self::ConfigRecommendations => "config_recommendations",
            Self::ModelsList => "models_list",
            Self::OpenAiModels => "openai_models",
            Self::ModelLoad => "model_load",
            Self::ModelSwitch => "model_switch",
            Self::ModelUnload => "model_unload",
            Self::ModelsScan => "models_scan",
            Self::ModelDelete => "model_delete",
            Self::CacheStats => "cache_stats",
            Self::CacheClear => "cache_clear",
            Self::ChatCompletions => "chat_completions",
            Self::Messages => "messages",
            Self::Generate => "generate",
            Self::GenerateBatch => "generate_batch",
            Self::VisionGenerate => "vision_generate",
            Self::DiffusionGenerate => "diffusion_generate",
            Self::DiffusionVideo => "diffusion_video",
            Self::ImageFetch => "image_fetch",
            Self::ContextsList => "contexts_list",
            Self::ContextsStats => "contexts_stats",
            Self::ContextGet => "context_get",
            Self::ContextIngest => "context_ingest",
            Self::ContextQuery => "context_query",
            Self::ContextPromote => "context_promote",
            Self::ContextDemote => "context_demote",
            Self::ContextDelete => "context_delete",
        }
    }
}

impl fmt::Display for EndpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for EndpointId {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        let wanted = s.trim();
        ENDPOINTS
            .iter()
            .map(|e| e.id)
            .find(|id| id.key() == wanted)
            .ok_or_else(|| DomainError::UnknownEndpoint(s.to_string()))
    }
}

/// Immutable description of one HTTP route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Endpoint {
    /// Unique key.
    pub id: EndpointId,
    /// Display name.
    pub name: &'static str,
    /// HTTP method.
    pub method: HttpMethod,
    /// Path relative to the base URL, may embed `{name}` placeholders.
    pub path: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Category used for filtering and badge counts.
    pub category: EndpointCategory,
}

impl Endpoint {
    /// Returns true if `term` occurs in the name, path or description,
    /// ignoring case. An empty term matches everything.
    #[must_use]
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        term.is_empty()
            || self.name.to_lowercase().contains(&term)
            || self.path.to_lowercase().contains(&term)
            || self.description.to_lowercase().contains(&term)
    }
}

const fn endpoint(
    id: EndpointId,
    name: &'static str,
    method: HttpMethod,
    path: &'static str,
    description: &'static str,
    category: EndpointCategory,
) -> Endpoint {
    Endpoint {
        id,
        name,
        method,
        path,
        description,
        category,
    }
}

use EndpointCategory as C;
use EndpointId as E;
use HttpMethod::{Delete, Get, Post};

static ENDPOINTS: &[Endpoint] = &[
    endpoint(
        E::Health,
        "Health Check",
        Get,
        "/health",
        "Server liveness and loaded model summary",
        C::Health,
    ),
    endpoint(E::ApiInfo, "API Info", Get, "/api", "Service version and route index", C::Health),
    endpoint(
        E::ServerMetrics,
        "Server Metrics",
        Get,
        "/api/v1/server/metrics",
        "Request counters, latency and memory usage",
        C::Health,
    ),
    endpoint(
        E::ConfigGet,
        "Get Config",
        Get,
        "/api/v1/config",
        "Current server, workspace and runtime configuration",
        C::Config,
    ),
    endpoint(
        E::ConfigUpdate,
        "Update Config",
        Post,
        "/api/v1/config",
        "Update runtime configuration fields",
        C::Config,
    ),
    endpoint(
        E::ConfigRecommendations,
        "Config Recommendations",
        Get,
        "/api/v1/config/recommendations",
        "Suggested settings for the detected hardware",
        C::Config,
    ),
    endpoint(
        E::ModelsList,
        "List Models",
        Get,
        "/api/v1/models",
        "Models known to the server and their load state",
        C::Models,
    ),
    endpoint(
        E::OpenAiModels,
        "List Models (OpenAI)",
        Get,
        "/v1/models",
        "OpenAI-compatible model listing",
        C::Models,
    ),
    endpoint(
        E::ModelLoad,
        "Load Model",
        Post,
        "/api/v1/models/load",
        "Load a GGUF model into the workspace",
        C::Models,
    ),
    endpoint(
        E::ModelSwitch,
        "Switch Model",
        Post,
        "/api/v1/models/switch",
        "Make a loaded model the active one",
        C::Models,
    ),
    endpoint(
        E::ModelUnload,
        "Unload Model",
        Post,
        "/api/v1/models/unload",
        "Release a loaded model",
        C::Models,
    ),
    endpoint(
        E::ModelsScan,
        "Scan Models Folder",
        Post,
        "/api/v1/models/scan",
        "Discover model files in a folder",
        C::Models,
    ),
    endpoint(
        E::ModelDelete,
        "Delete Model",
        Delete,
        "/api/v1/models/{model_id}",
        "Unload and forget a model",
        C::Models,
    ),
    endpoint(
        E::CacheStats,
        "Cache Stats",
        Get,
        "/api/v1/models/cache/stats",
        "Tensor cache hit rates and sizes",
        C::Models,
    ),
    endpoint(
        E::CacheClear,
        "Clear Cache",
        Post,
        "/api/v1/models/cache/clear",
        "Drop all cached model tensors",
        C::Models,
    ),
    endpoint(
        E::ChatCompletions,
        "Chat Completions",
        Post,
        "/v1/chat/completions",
        "OpenAI-compatible chat completion",
        C::Inference,
    ),
    endpoint(
        E::Messages,
        "Messages",
        Post,
        "/v1/messages",
        "Anthropic-compatible messages API",
        C::Inference,
    ),
    endpoint(
        E::Generate,
        "Generate",
        Post,
        "/api/v1/generate",
        "Raw prompt text generation",
        C::Inference,
    ),
    endpoint(
        E::GenerateBatch,
        "Batch Generate",
        Post,
        "/api/v1/generate/batch",
        "Several conversations in one call",
        C::Inference,
    ),
    endpoint(
        E::VisionGenerate,
        "Vision Generate",
        Post,
        "/api/v1/vision/generate",
        "Answer a prompt about an image",
        C::Vision,
    ),
    endpoint(
        E::DiffusionGenerate,
        "Generate Image",
        Post,
        "/api/v1/diffusion/generate",
        "Text-to-image diffusion",
        C::Diffusion,
    ),
    endpoint(
        E::DiffusionVideo,
        "Generate Video",
        Post,
        "/api/v1/diffusion/video",
        "Text-to-video diffusion",
        C::Diffusion,
    ),
    endpoint(
        E::ImageFetch,
        "Fetch Image",
        Get,
        "/api/v1/images/{filename}",
        "Download a generated image",
        C::Diffusion,
    ),
    endpoint(
        E::ContextsList,
        "List Contexts",
        Get,
        "/api/v1/contexts",
        "Ingested contexts and their tiers",
        C::Contexts,
    ),
    endpoint(
        E::ContextsStats,
        "Context Stats",
        Get,
        "/api/v1/contexts/stats",
        "Context cache memory and hit statistics",
        C::Contexts,
    ),
    endpoint(
        E::ContextGet,
        "Get Context",
        Get,
        "/api/v1/contexts/{context_id}",
        "Details of one ingested context",
        C::Contexts,
    ),
    endpoint(
        E::ContextIngest,
        "Ingest Context",
        Post,
        "/api/v1/contexts/ingest",
        "Precompute the KV cache for a document",
        C::Contexts,
    ),
    endpoint(
        E::ContextQuery,
        "Query Context",
        Post,
        "/api/v1/contexts/{context_id}/query",
        "Ask a question against a cached context",
        C::Contexts,
    ),
    endpoint(
        E::ContextPromote,
        "Promote Context",
        Post,
        "/api/v1/contexts/{context_id}/promote",
        "Move a context to a hotter tier",
        C::Contexts,
    ),
    endpoint(
        E::ContextDemote,
        "Demote Context",
        Post,
        "/api/v1/contexts/{context_id}/demote",
        "Move a context to a colder tier",
        C::Contexts,
    ),
    endpoint(
        E::ContextDelete,
        "Delete Context",
        Delete,
        "/api/v1/contexts/{context_id}",
        "Remove a cached context",
        C::Contexts,
    ),
];

/// Ordered registry of endpoint descriptors.
#[derive(Debug, Clone, Copy)]
pub struct EndpointCatalog {
    endpoints: &'static [Endpoint],
}

impl EndpointCatalog {
    /// Returns the compiled-in SnapLLM catalog.
    #[must_use]
    pub const fn builtin() -> Self {
        Self {
            endpoints: ENDPOINTS,
        }
    }

    /// All endpoints in declaration order.
    #[must_use]
    pub const fn list(&self) -> &'static [Endpoint] {
        self.endpoints
    }

    /// Endpoints matching both the category filter and the search term.
    #[must_use]
    pub fn filter(&self, category: CategoryFilter, search: &str) -> Vec<&'static Endpoint> {
        self.endpoints
            .iter()
            .filter(|e| category.matches(e.category) && e.matches_search(search))
            .collect()
    }

    /// Endpoint count per category over the whole catalog.
    #[must_use]
    pub fn counts_by_category(&self) -> BTreeMap<EndpointCategory, usize> {
        let mut counts: BTreeMap<_, _> = EndpointCategory::all().iter().map(|c| (*c, 0)).collect();
        for endpoint in self.endpoints {
            *counts.entry(endpoint.category).or_default() += 1;
        }
        counts
    }

    /// Looks up an endpoint by id.
    #[must_use]
    pub fn get(&self, id: EndpointId) -> Option<&'static Endpoint> {
        self.endpoints.iter().find(|e| e.id == id)
    }

    /// Finds the endpoint whose method and path match exactly.
    #[must_use]
    pub fn find_by_route(&self, method: HttpMethod, path: &str) -> Option<&'static Endpoint> {
        self.endpoints
            .iter()
            .find(|e| e.method == method && e.path == path)
    }
}

impl Default for EndpointCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
