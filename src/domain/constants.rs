/// Manifest mapping each mode to the policy files it applies to.
pub const POLICY_MODE_FILE: &str = "policy-modes.yaml";
pub const POLICY_DIR: &str = "policies";
pub const MODE_DIR: &str = "modes";

/// Suffix every policy/mode identifier is normalized to before reading.
pub const YAML_SUFFIX: &str = "yaml";

pub const STAGING_PREFIX: &str = "c7n-";

pub const CACHE_ROOT: &str = ".cache";
pub const OUTPUT_ROOT: &str = "output";
pub const DEFAULT_PROFILE: &str = "default";

pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_REGIONS: [&str; 4] = ["us-east-1", "us-east-2", "us-west-1", "us-west-2"];

pub const REPORT_OUTPUT_DIR: &str = "s3://c7n-test/v2020.04.02";
pub const REPORT_FORMAT: &str = "csv";

pub const DEFAULT_ENGINE_BIN: &str = "custodian";

pub const CI_POLICY_DIR: &str = "policies";
pub const CI_MODE_FILE: &str = "policy.modes/periodic.yml";
