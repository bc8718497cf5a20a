use crate::domain::error::{CpeError, Result};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetLevel {
    pub target: String,
    pub level: LevelFilter,
}

/// Logging setup handed to the entry point. Nothing else in the crate
/// touches subscriber state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub level: LevelFilter,
    pub targets: Vec<TargetLevel>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::WARN,
            targets: vec![TargetLevel {
                target: "cpe::services::executor".to_string(),
                level: LevelFilter::INFO,
            }],
        }
    }
}

/// Accepts Python-style names (`warning`, `critical`) alongside tracing's.
pub fn parse_level(raw: &str) -> Result<LevelFilter> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok(LevelFilter::TRACE),
        "debug" => Ok(LevelFilter::DEBUG),
        "info" => Ok(LevelFilter::INFO),
        "warning" | "warn" => Ok(LevelFilter::WARN),
        "error" | "critical" | "fatal" => Ok(LevelFilter::ERROR),
        "off" | "none" => Ok(LevelFilter::OFF),
        other => Err(CpeError::Config(format!("unknown log level `{other}`"))),
    }
}

impl LogConfig {
    pub fn from_level(raw: &str) -> Result<Self> {
        let level = parse_level(raw)?;
        let targets = Self::default()
            .targets
            .into_iter()
            .filter(|t| level != LevelFilter::OFF && t.level > level)
            .collect();
        Ok(Self { level, targets })
    }

    pub fn with_target(mut self, target: impl Into<String>, level: LevelFilter) -> Self {
        self.targets.push(TargetLevel {
            target: target.into(),
            level,
        });
        self
    }

    /// `EnvFilter` directive string, e.g. `warn,cpe::services::executor=info`.
    pub fn directives(&self) -> String {
        let mut out = vec![self.level.to_string().to_ascii_lowercase()];
        out.extend(
            self.targets
                .iter()
                .map(|t| format!("{}={}", t.target, t.level.to_string().to_ascii_lowercase())),
        );
        out.join(",")
    }

    /// Install the global subscriber. Logs go to stderr.
    pub fn init(&self) -> anyhow::Result<()> {
        let filter = EnvFilter::try_new(self.directives())?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to install logger: {e}"))
    }
}
