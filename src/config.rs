use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, VtError};

pub const PROJECT_CONFIG_FILE: &str = "vtube.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub endpoint: EndpointConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

impl Config {
    /// Load configuration from disk and the process environment.
    ///
    /// An explicit path (or `VT_CONFIG`) replaces the global and project
    /// files entirely; environment overrides always apply last.
    pub fn load(explicit_path: Option<&Path>, project_dir: &Path) -> Result<Self> {
        Self::load_with_env(explicit_path, project_dir, |key| std::env::var(key).ok())
    }

    pub fn load_with_env<F>(explicit_path: Option<&Path>, project_dir: &Path, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| env("VT_CONFIG").map(PathBuf::from));

        if let Some(path) = explicit {
            let patch = Self::load_patch(&path)?.ok_or_else(|| {
                VtError::MissingConfig(format!("config file {} not found", path.display()))
            })?;
            config.merge_patch(patch);
        } else {
            if let Some(global) = Self::load_global()? {
                config.merge_patch(global);
            }
            if let Some(project) = Self::load_patch(&project_dir.join(PROJECT_CONFIG_FILE))? {
                config.merge_patch(project);
            }
        }

        config.apply_env_overrides(&env)?;
        config.validate()?;

        Ok(config)
    }

    fn load_global() -> Result<Option<ConfigPatch>> {
        let Some(dir) = dirs::config_dir() else {
            return Ok(None);
        };
        Self::load_patch(&dir.join("vtube/config.toml"))
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|err| VtError::Config(format!("read config {}: {err}", path.display())))?;
        let patch = toml::from_str(&raw)
            .map_err(|err| VtError::Config(format!("parse config {}: {err}", path.display())))?;
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.endpoint {
            self.endpoint.merge(patch);
        }
        if let Some(patch) = patch.feed {
            self.feed.merge(patch);
        }
        if let Some(patch) = patch.search {
            self.search.merge(patch);
        }
    }

    fn apply_env_overrides<F>(&mut self, env: &F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = env("VT_ENDPOINT_URL") {
            self.endpoint.url = value;
        }
        if let Some(value) = parse_env::<u16, _>(env, "VT_ENDPOINT_PORT")? {
            self.endpoint.port = Some(value);
        }
        if let Some(value) = parse_env::<u64, _>(env, "VT_ENDPOINT_TIMEOUT_SECS")? {
            self.endpoint.timeout_secs = Some(value);
        }

        if let Some(value) = env("VT_FEED_NAMESPACE") {
            self.feed.namespace = value;
        }
        if let Some(value) = env("VT_FEED_DOCUMENT_TYPE") {
            self.feed.document_type = value;
        }

        if let Some(value) = parse_env::<usize, _>(env, "VT_SEARCH_HITS")? {
            self.search.hits = value;
        }
        if let Some(value) = parse_env::<usize, _>(env, "VT_SEARCH_TARGET_HITS")? {
            self.search.target_hits = value;
        }
        if let Some(value) = env("VT_SEARCH_EMBEDDING_FIELD") {
            self.search.embedding_field = value;
        }
        if let Some(value) = env("VT_SEARCH_DISPLAY_FIELDS") {
            self.search.display_fields = split_list(&value);
        }

        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.endpoint.url.trim().is_empty() {
            return Err(VtError::Config(
                "endpoint url is empty; set [endpoint].url".to_string(),
            ));
        }
        if self.endpoint.timeout_secs == Some(0) {
            return Err(VtError::Config(
                "endpoint timeout_secs must be at least 1; omit it for no timeout".to_string(),
            ));
        }
        if self.feed.namespace.trim().is_empty() || self.feed.document_type.trim().is_empty() {
            return Err(VtError::Config(
                "feed namespace and document_type must be non-empty".to_string(),
            ));
        }
        if self.search.embedding_field.trim().is_empty() {
            return Err(VtError::Config(
                "search embedding_field is empty".to_string(),
            ));
        }
        if self.search.display_fields.is_empty() {
            return Err(VtError::Config(
                "search display_fields must name at least one field".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_port")]
    pub port: Option<u16>,
    /// Unset means the HTTP client's own default applies.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            port: default_port(),
            timeout_secs: None,
        }
    }
}

impl EndpointConfig {
    /// Base URL with the port folded in, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> String {
        let url = self.url.trim_end_matches('/');
        match self.port {
            Some(port) if !has_explicit_port(url) => format!("{url}:{port}"),
            _ => url.to_string(),
        }
    }

    fn merge(&mut self, patch: EndpointPatch) {
        if let Some(value) = patch.url {
            self.url = value;
        }
        if let Some(value) = patch.port {
            self.port = Some(value);
        }
        if let Some(value) = patch.timeout_secs {
            self.timeout_secs = Some(value);
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(default = "default_document_type")]
    pub document_type: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            document_type: default_document_type(),
        }
    }
}

impl FeedConfig {
    fn merge(&mut self, patch: FeedPatch) {
        if let Some(value) = patch.namespace {
            self.namespace = value;
        }
        if let Some(value) = patch.document_type {
            self.document_type = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_hits")]
    pub hits: usize,
    #[serde(default = "default_target_hits")]
    pub target_hits: usize,
    #[serde(default = "default_embedding_field")]
    pub embedding_field: String,
    #[serde(default = "default_display_fields")]
    pub display_fields: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            hits: default_hits(),
            target_hits: default_target_hits(),
            embedding_field: default_embedding_field(),
            display_fields: default_display_fields(),
        }
    }
}

impl SearchConfig {
    fn merge(&mut self, patch: SearchPatch) {
        if let Some(value) = patch.hits {
            self.hits = value;
        }
        if let Some(value) = patch.target_hits {
            self.target_hits = value;
        }
        if let Some(value) = patch.embedding_field {
            self.embedding_field = value;
        }
        if let Some(values) = patch.display_fields {
            self.display_fields = values;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigPatch {
    pub endpoint: Option<EndpointPatch>,
    pub feed: Option<FeedPatch>,
    pub search: Option<SearchPatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct EndpointPatch {
    pub url: Option<String>,
    pub port: Option<u16>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct FeedPatch {
    pub namespace: Option<String>,
    pub document_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SearchPatch {
    pub hits: Option<usize>,
    pub target_hits: Option<usize>,
    pub embedding_field: Option<String>,
    pub display_fields: Option<Vec<String>>,
}

fn default_url() -> String {
    "http://localhost".to_string()
}

const fn default_port() -> Option<u16> {
    Some(8080)
}

fn default_namespace() -> String {
    "hybrid-search".to_string()
}

fn default_document_type() -> String {
    "doc".to_string()
}

const fn default_hits() -> usize {
    5
}

const fn default_target_hits() -> usize {
    100
}

fn default_embedding_field() -> String {
    "embedding".to_string()
}

fn default_display_fields() -> Vec<String> {
    ["doc_id", "title", "text", "views", "likes", "comment_count"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn has_explicit_port(url: &str) -> bool {
    let authority = url.split_once("://").map_or(url, |(_, rest)| rest);
    let host = authority.split('/').next().unwrap_or(authority);
    // Bracketed IPv6 hosts carry colons of their own.
    let host = host.rsplit_once(']').map_or(host, |(_, tail)| tail);
    host.contains(':')
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn parse_env<T, F>(env: &F, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match env(key) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|err| VtError::Config(format!("invalid {key} value {value}: {err}"))),
        None => Ok(None),
    }
}
