use anyhow::bail;
use clap::{Parser, ValueEnum};
use seqpage::notion::DEFAULT_BASE_URL;
use seqpage::{DEFAULT_SEQUENCE_PROPERTY, DEFAULT_TITLE_PROPERTY, MAX_PAGES_PER_REQUEST};
use std::collections::BTreeMap;

/// Runtime configuration for the `seqpage-server` binary.
///
/// All values are parsed from CLI arguments or environment variables (a
/// `.env` file is loaded first). Database identifiers are not flags: every
/// `NOTION_<NAME>_DATABASE_ID` variable registers a database under `<name>`.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "seqpage-server",
    version,
    about = "An HTTP trigger that appends sequentially-numbered pages to Notion databases"
)]
pub struct CliArgs {
    /// Notion integration token.
    ///
    /// The server starts without it, but every request is answered with a
    /// 500 until it is provided.
    ///
    /// Environment variable: `NOTION_API_KEY`
    #[arg(long, env = "NOTION_API_KEY", hide_env_values = true)]
    pub notion_api_key: Option<String>,

    /// Root of the Notion REST API.
    ///
    /// Environment variable: `NOTION_BASE_URL`
    #[arg(long, env = "NOTION_BASE_URL", default_value_t = String::from(DEFAULT_BASE_URL))]
    pub notion_base_url: String,

    /// Database selected when a request carries no `db` parameter.
    ///
    /// Environment variable: `DEFAULT_DATABASE`
    #[arg(long, env = "DEFAULT_DATABASE", default_value_t = String::from("ileen"))]
    pub default_database: String,

    /// Title property left blank on every created page.
    ///
    /// Environment variable: `TITLE_PROPERTY`
    #[arg(long, env = "TITLE_PROPERTY", default_value_t = String::from(DEFAULT_TITLE_PROPERTY))]
    pub title_property: String,

    /// Numeric property holding the sequence number.
    ///
    /// Environment variable: `SEQUENCE_PROPERTY`
    #[arg(long, env = "SEQUENCE_PROPERTY", default_value_t = String::from(DEFAULT_SEQUENCE_PROPERTY))]
    pub sequence_property: String,

    /// Largest `count` a single request may ask for.
    ///
    /// Environment variable: `MAX_PAGES_PER_REQUEST`
    #[arg(long, env = "MAX_PAGES_PER_REQUEST", default_value_t = MAX_PAGES_PER_REQUEST)]
    pub max_pages_per_request: u32,

    /// Run each database's read-then-write round trip under an in-process
    /// lock so concurrent requests cannot hand out the same number.
    ///
    /// Environment variable: `SERIALIZE_CREATES`
    #[arg(long, env = "SERIALIZE_CREATES", default_value_t = false)]
    pub serialize_creates: bool,

    /// Address to listen on.
    ///
    /// Environment variable: `SERVER_ADDR`
    #[arg(long, env = "SERVER_ADDR", default_value_t = String::from("0.0.0.0:5001"))]
    pub server_addr: String,

    /// Keep pages in memory instead of calling Notion. No API key is needed.
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Log output format.
    ///
    /// Environment variable: `LOG_FORMAT`
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Short database names mapped to Notion database ids.
///
/// Names are stored lowercase and looked up case-insensitively. Built once at
/// startup and never mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatabaseRegistry {
    default_name: String,
    databases: BTreeMap<String, String>,
}

impl DatabaseRegistry {
    pub fn new(default_name: &str) -> Self {
        Self {
            default_name: default_name.trim().to_lowercase(),
            databases: BTreeMap::new(),
        }
    }

    pub fn with_database(mut self, name: &str, database_id: &str) -> Self {
        self.databases
            .insert(name.trim().to_lowercase(), database_id.trim().to_string());
        self
    }

    /// Collects every non-empty `NOTION_<NAME>_DATABASE_ID` entry.
    pub fn from_vars<I, K, V>(default_name: &str, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut registry = Self::new(default_name);
        for (key, value) in vars {
            let Some(name) = key
                .as_ref()
                .strip_prefix("NOTION_")
                .and_then(|rest| rest.strip_suffix("_DATABASE_ID"))
            else {
                continue;
            };
            if name.is_empty() || value.as_ref().trim().is_empty() {
                continue;
            }
            registry = registry.with_database(name, value.as_ref());
        }
        registry
    }

    /// Looks up `selector`, falling back to the default name.
    pub fn resolve(&self, selector: Option<&str>) -> Option<&str> {
        let name = match selector {
            Some(s) => s.trim().to_lowercase(),
            None => self.default_name.clone(),
        };
        self.databases.get(&name).map(String::as_str)
    }

    pub fn default_name(&self) -> &str {
        &self.default_name
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.databases.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.databases.is_empty()
    }
}

#[derive(Clone)]
pub struct ServerConfig {
    pub notion_api_key: Option<String>,
    pub notion_base_url: String,
    pub registry: DatabaseRegistry,
    pub title_property: String,
    pub sequence_property: String,
    pub max_pages_per_request: u32,
    pub serialize_creates: bool,
    pub server_addr: String,
    pub dry_run: bool,
}

impl ServerConfig {
    /// Builds the configuration from parsed arguments and an environment
    /// snapshot used for the database registry.
    pub fn from_args<I, K, V>(args: CliArgs, vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        if args.max_pages_per_request == 0 {
            bail!("MAX_PAGES_PER_REQUEST must be greater than 0");
        }
        if args.title_property.trim().is_empty() {
            bail!("TITLE_PROPERTY must not be empty");
        }
        if args.sequence_property.trim().is_empty() {
            bail!("SEQUENCE_PROPERTY must not be empty");
        }
        if args.server_addr.trim().is_empty() {
            bail!("SERVER_ADDR must not be empty");
        }

        Ok(Self {
            notion_api_key: args.notion_api_key.filter(|key| !key.trim().is_empty()),
            notion_base_url: args.notion_base_url,
            registry: DatabaseRegistry::from_vars(&args.default_database, vars),
            title_property: args.title_property,
            sequence_property: args.sequence_property,
            max_pages_per_request: args.max_pages_per_request,
            serialize_creates: args.serialize_creates,
            server_addr: args.server_addr,
            dry_run: args.dry_run,
        })
    }

    /// Settings whose absence makes every request fail with a 500.
    pub fn missing_settings(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.notion_api_key.is_none() && !self.dry_run {
            missing.push("NOTION_API_KEY");
        }
        if self.registry.is_empty() {
            missing.push("NOTION_<NAME>_DATABASE_ID");
        }
        missing
    }
}

impl TryFrom<CliArgs> for ServerConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        Self::from_args(args, std::env::vars())
    }
}

impl core::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ServerConfig")
            .field(
                "notion_api_key",
                &self.notion_api_key.as_ref().map(|_| "<redacted>"),
            )
            .field("notion_base_url", &self.notion_base_url)
            .field("registry", &self.registry)
            .field("title_property", &self.title_property)
            .field("sequence_property", &self.sequence_property)
            .field("max_pages_per_request", &self.max_pages_per_request)
            .field("serialize_creates", &self.serialize_creates)
            .field("server_addr", &self.server_addr)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}
