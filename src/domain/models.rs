use crate::cli::EngineCommand;
use crate::domain::constants::{
    CACHE_ROOT, DEFAULT_PROFILE, DEFAULT_REGION, DEFAULT_REGIONS, OUTPUT_ROOT, REPORT_FORMAT,
    REPORT_OUTPUT_DIR,
};
use crate::domain::error::{CpeError, Result};
use serde::Serialize;
use serde_yaml::Value;
use std::path::{Path, PathBuf};

/// Parsed policy file. `Null` (or any other empty value) means absent/empty.
pub type PolicyDocument = Value;
/// Parsed mode file, attached verbatim under each policy's `mode` key.
pub type ModeDocument = Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeBinding {
    pub mode: String,
    pub policy_files: Vec<String>,
}

/// `policy-modes.yaml`: mode id -> policy file ids, in manifest order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModeIndex {
    pub bindings: Vec<ModeBinding>,
}

impl ModeIndex {
    pub fn from_value(source: &Path, value: Value) -> Result<Self> {
        let mapping = match value {
            Value::Mapping(m) => m,
            Value::Null => return Ok(Self::default()),
            _ => return Err(CpeError::shape(source, "manifest must be a mapping")),
        };
        let mut bindings = Vec::with_capacity(mapping.len());
        for (key, files) in mapping {
            let Value::String(mode) = key else {
                return Err(CpeError::shape(source, "mode identifiers must be strings"));
            };
            let policy_files: Vec<String> = serde_yaml::from_value(files).map_err(|e| {
                CpeError::shape(
                    source,
                    format!("mode `{mode}` must list policy file names: {e}"),
                )
            })?;
            bindings.push(ModeBinding { mode, policy_files });
        }
        Ok(Self { bindings })
    }
}

/// Result of a compile + validate pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// Paths relative to the staging directory, in walk order.
    InvalidPolicies(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BaseOptions {
    pub configs: Vec<PathBuf>,
    pub output_dir: String,
    pub profile: Option<String>,
    pub regions: Vec<String>,
    pub region: String,
    pub cache: Option<PathBuf>,
    pub cache_period: u32,
    pub policy_filters: Vec<String>,
    pub resource_types: Vec<String>,
    pub debug: bool,
}

impl Default for BaseOptions {
    fn default() -> Self {
        Self {
            configs: vec![],
            output_dir: OUTPUT_ROOT.to_string(),
            profile: None,
            regions: DEFAULT_REGIONS.iter().map(|r| r.to_string()).collect(),
            region: DEFAULT_REGION.to_string(),
            cache: None,
            cache_period: 0,
            policy_filters: vec![],
            resource_types: vec![],
            debug: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunOptions {
    pub skip_validation: bool,
    pub dryrun: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            skip_validation: true,
            dryrun: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportOptions {
    pub days: u32,
    pub fields: Vec<String>,
    pub no_default_fields: bool,
    pub format: String,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            days: 1,
            fields: vec![],
            no_default_fields: false,
            format: REPORT_FORMAT.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "command", rename_all = "lowercase")]
pub enum CommandOptions {
    Run(RunOptions),
    Report(ReportOptions),
}

/// Engine invocation parameters. Values are never mutated in place;
/// every `with_*` returns a new config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionConfig {
    pub base: BaseOptions,
    pub options: CommandOptions,
}

impl ExecutionConfig {
    pub fn run(options: RunOptions) -> Self {
        Self {
            base: BaseOptions::default(),
            options: CommandOptions::Run(options),
        }
    }

    pub fn report(options: ReportOptions) -> Self {
        Self {
            base: BaseOptions {
                output_dir: REPORT_OUTPUT_DIR.to_string(),
                ..BaseOptions::default()
            },
            options: CommandOptions::Report(options),
        }
    }

    pub fn command(&self) -> EngineCommand {
        match self.options {
            CommandOptions::Run(_) => EngineCommand::Run,
            CommandOptions::Report(_) => EngineCommand::Report,
        }
    }

    pub fn with_profile(self, profile: Option<String>) -> Self {
        self.with_base(|b| BaseOptions { profile, ..b })
    }

    pub fn with_regions(self, regions: Vec<String>) -> Self {
        self.with_base(|b| BaseOptions { regions, ..b })
    }

    pub fn with_cache(self, cache: PathBuf) -> Self {
        self.with_base(|b| BaseOptions {
            cache: Some(cache),
            ..b
        })
    }

    pub fn with_configs(self, configs: Vec<PathBuf>) -> Self {
        self.with_base(|b| BaseOptions { configs, ..b })
    }

    pub fn with_output_dir(self, output_dir: impl Into<String>) -> Self {
        let output_dir = output_dir.into();
        self.with_base(|b| BaseOptions { output_dir, ..b })
    }

    pub fn with_policy_filters(self, policy_filters: Vec<String>) -> Self {
        self.with_base(|b| BaseOptions { policy_filters, ..b })
    }

    pub fn with_resource_types(self, resource_types: Vec<String>) -> Self {
        self.with_base(|b| BaseOptions { resource_types, ..b })
    }

    pub fn with_debug(self, debug: bool) -> Self {
        self.with_base(|b| BaseOptions { debug, ..b })
    }

    fn with_base(self, f: impl FnOnce(BaseOptions) -> BaseOptions) -> Self {
        Self {
            base: f(self.base),
            options: self.options,
        }
    }

    /// Profile name used for namespacing cache and output paths.
    pub fn profile_name(&self) -> &str {
        self.base.profile.as_deref().unwrap_or(DEFAULT_PROFILE)
    }

    /// Derive the config for one staged policy file. `root` anchors the
    /// cache and output trees (normally the project directory).
    pub fn for_policy(&self, root: &Path, policy_file: &Path) -> Self {
        let profile = self.profile_name().to_string();
        self.clone()
            .with_cache(root.join(cache_path(&profile, policy_file)))
            .with_configs(vec![policy_file.to_path_buf()])
            .with_output_dir(
                root.join(OUTPUT_ROOT)
                    .join(&profile)
                    .to_string_lossy()
                    .to_string(),
            )
    }
}

/// `.cache/{profile}/{stem}.cache`. Distinct policy stems never share a
/// cache file under one profile.
pub fn cache_path(profile: &str, policy_file: &Path) -> PathBuf {
    let stem = policy_file
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    PathBuf::from(CACHE_ROOT)
        .join(profile)
        .join(format!("{stem}.cache"))
}
