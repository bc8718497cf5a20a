#![allow(dead_code)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Stand-in for `custodian`: records argv, rejects policies mentioning
/// `not-a-resource`, and fails `run` when `CPE_STUB_FAIL` is set.
const STUB_ENGINE: &str = r#"#!/bin/sh
printf '%s\n' "$*" >> "$CPE_STUB_LOG"
if [ "$1" = "validate" ]; then
  if grep -q "not-a-resource" "$2"; then
    echo "invalid resource type" >&2
    exit 1
  fi
  exit 0
fi
if [ "$1" = "run" ] && [ -n "$CPE_STUB_FAIL" ]; then
  exit 3
fi
exit 0
"#;

pub struct TestEnv {
    _tmp: TempDir,
    pub root: PathBuf,
    pub engine: PathBuf,
    pub log: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let root = tmp.path().join("project");
        fs::create_dir_all(root.join("modes")).expect("create modes dir");
        fs::create_dir_all(root.join("policies")).expect("create policies dir");
        // cwd is reported resolved, so compare against the resolved path
        let root = fs::canonicalize(&root).expect("resolve project dir");

        let engine = tmp.path().join("custodian");
        write_executable(&engine, STUB_ENGINE);
        let log = tmp.path().join("engine.log");

        Self {
            _tmp: tmp,
            root,
            engine,
            log,
        }
    }

    /// Project with one `periodic` mode applied to `policies` (name, resource).
    pub fn with_policies(policies: &[(&str, &str)]) -> Self {
        let env = Self::new();
        let names: Vec<&str> = policies.iter().map(|(n, _)| *n).collect();
        env.write(
            "policy-modes.yaml",
            &format!("periodic: [{}]\n", names.join(", ")),
        );
        env.write("modes/periodic.yaml", "schedule: rate(1 day)\n");
        for (name, resource) in policies {
            env.write(
                &format!("policies/{name}.yaml"),
                &format!("policies:\n  - name: {name}\n    resource: {resource}\n"),
            );
        }
        env
    }

    pub fn write(&self, rel: &str, body: &str) {
        let p = self.root.join(rel);
        fs::create_dir_all(p.parent().expect("fixture parent")).expect("create fixture dir");
        fs::write(p, body).expect("write fixture");
    }

    pub fn remove(&self, rel: &str) {
        fs::remove_file(self.root.join(rel)).expect("remove fixture");
    }

    fn isolated(&self, mut cmd: Command) -> Command {
        cmd.current_dir(&self.root)
            .env_remove("AWS_PROFILE")
            .env_remove("CPE_DRYRUN")
            .env_remove("CPE_LOGLEVEL")
            .env_remove("CPE_STUB_FAIL")
            .env("CPE_CUSTODIAN", &self.engine)
            .env("CPE_STUB_LOG", &self.log);
        cmd
    }

    pub fn cmd(&self) -> Command {
        self.isolated(cargo_bin_cmd!("cpe"))
    }

    pub fn validate_cmd(&self) -> Command {
        self.isolated(cargo_bin_cmd!("cpe-validate"))
    }

    /// Engine invocations, one argv line each.
    pub fn calls(&self) -> Vec<String> {
        fs::read_to_string(&self.log)
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    pub fn calls_for(&self, command: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.split(' ').next() == Some(command))
            .collect()
    }
}

fn write_executable(path: &Path, body: &str) {
    fs::write(path, body).expect("write stub engine");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).expect("chmod stub engine");
    }
}
