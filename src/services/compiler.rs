use crate::domain::error::Result;
use crate::domain::models::{ModeDocument, ModeIndex};
use crate::services::loader::{read_yaml, read_yaml_verbatim, write_yaml, yaml_files, yaml_path};
use crate::services::merge::apply_mode;
use serde_yaml::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Compile every manifest binding into `out_dir`.
///
/// A missing or malformed mode aborts. A missing policy file compiles to an
/// empty document. A policy file listed under several modes is written once
/// per listing, so the last mode in manifest order wins.
pub fn compile(
    mode_index_file: &Path,
    mode_dir: &Path,
    policy_dir: &Path,
    out_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let index = ModeIndex::from_value(
        &yaml_path(mode_index_file),
        read_yaml(mode_index_file)?,
    )?;
    compile_index(&index, mode_dir, policy_dir, out_dir)
}

pub fn compile_index(
    index: &ModeIndex,
    mode_dir: &Path,
    policy_dir: &Path,
    out_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    let mut claimed: HashMap<&str, &str> = HashMap::new();

    for binding in &index.bindings {
        let mode = read_yaml(&mode_dir.join(&binding.mode))?;
        tracing::debug!(mode = %binding.mode, policies = binding.policy_files.len(), "applying mode");

        for policy_id in &binding.policy_files {
            let previous = claimed.insert(policy_id, &binding.mode);
            if let Some(previous) = previous.filter(|p| *p != binding.mode) {
                tracing::warn!(
                    policy = %policy_id,
                    previous = %previous,
                    mode = %binding.mode,
                    "policy file listed under more than one mode; last mode wins"
                );
            }
            let source = yaml_path(&policy_dir.join(policy_id));
            let policy = read_policy(&source)?;
            let compiled = apply_mode(&source, &policy, &mode)?;
            let target = yaml_path(&out_dir.join(policy_id));
            write_yaml(&target, &compiled)?;
            if !written.contains(&target) {
                written.push(target);
            }
        }
    }
    Ok(written)
}

/// Apply one mode to every `*.yaml` under `policy_dir`, mirroring the
/// relative layout into `out_dir`.
pub fn compile_tree(policy_dir: &Path, mode: &ModeDocument, out_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for source in yaml_files(policy_dir) {
        let relative = source.strip_prefix(policy_dir).unwrap_or(&source);
        let compiled = apply_mode(&source, &read_yaml_verbatim(&source)?, mode)?;
        let target = out_dir.join(relative);
        write_yaml(&target, &compiled)?;
        written.push(target);
    }
    Ok(written)
}

fn read_policy(path: &Path) -> Result<Value> {
    match read_yaml(path) {
        Err(e) if e.is_not_found() => {
            tracing::warn!(path = %path.display(), "policy file missing; compiling empty document");
            Ok(Value::Null)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::CpeError;
    use crate::services::test_support::capture_warnings;
    use tempfile::TempDir;

    struct Project {
        _tmp: TempDir,
        root: PathBuf,
        out: PathBuf,
    }

    impl Project {
        fn new() -> Self {
            let tmp = TempDir::new().expect("temp dir");
            let root = tmp.path().join("project");
            let out = tmp.path().join("stage");
            std::fs::create_dir_all(root.join("modes")).expect("modes dir");
            std::fs::create_dir_all(root.join("policies")).expect("policies dir");
            std::fs::create_dir_all(&out).expect("stage dir");
            Self {
                _tmp: tmp,
                root,
                out,
            }
        }

        fn write(&self, rel: &str, body: &str) {
            let p = self.root.join(rel);
            std::fs::create_dir_all(p.parent().expect("parent")).expect("mkdir");
            std::fs::write(p, body).expect("write fixture");
        }

        fn compile(&self) -> Result<Vec<PathBuf>> {
            compile(
                &self.root.join("policy-modes.yaml"),
                &self.root.join("modes"),
                &self.root.join("policies"),
                &self.out,
            )
        }

        fn staged(&self, rel: &str) -> Value {
            let raw = std::fs::read_to_string(self.out.join(rel)).expect("staged file");
            serde_yaml::from_str(&raw).expect("staged yaml")
        }
    }

    #[test]
    fn compiles_single_mode_end_to_end() {
        let p = Project::new();
        p.write("policy-modes.yaml", "periodic: [policy1]\n");
        p.write("modes/periodic.yaml", "schedule: rate(1 day)\n");
        p.write("policies/policy1.yaml", "policies:\n  - name: p1\n    resource: ec2\n");

        let written = p.compile().expect("compile");
        assert_eq!(written, vec![p.out.join("policy1.yaml")]);

        let expected: Value = serde_yaml::from_str(
            "policies:\n  - name: p1\n    resource: ec2\n    mode:\n      schedule: rate(1 day)\n",
        )
        .expect("yaml");
        assert_eq!(p.staged("policy1.yaml"), expected);
    }

    #[test]
    fn nested_policy_ids_keep_their_directories() {
        let p = Project::new();
        p.write("policy-modes.yaml", "periodic: [team/ec2]\n");
        p.write("modes/periodic.yaml", "type: periodic\n");
        p.write("policies/team/ec2.yaml", "policies:\n  - name: ec2-tag\n    resource: ec2\n");

        p.compile().expect("compile");
        assert!(p.out.join("team/ec2.yaml").is_file());
    }

    #[test]
    fn duplicate_reference_keeps_last_mode() {
        let p = Project::new();
        p.write("policy-modes.yaml", "periodic: [x]\ncloudtrail: [x]\n");
        p.write("modes/periodic.yaml", "type: periodic\n");
        p.write("modes/cloudtrail.yaml", "type: cloudtrail\n");
        p.write("policies/x.yaml", "policies:\n  - name: x\n    resource: s3\n");

        let written = p.compile().expect("compile");
        assert_eq!(written.len(), 1);
        assert_eq!(
            p.staged("x.yaml")["policies"][0]["mode"]["type"],
            Value::from("cloudtrail")
        );
    }

    #[test]
    fn missing_policy_compiles_to_empty_mapping() {
        let p = Project::new();
        p.write("policy-modes.yaml", "periodic: [ghost]\n");
        p.write("modes/periodic.yaml", "type: periodic\n");

        p.compile().expect("compile");
        assert_eq!(p.staged("ghost.yaml"), Value::Mapping(Default::default()));
    }

    #[test]
    fn missing_mode_aborts() {
        let p = Project::new();
        p.write("policy-modes.yaml", "periodic: [policy1]\n");
        p.write("policies/policy1.yaml", "policies: []\n");

        let err = p.compile().unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn missing_manifest_aborts() {
        let p = Project::new();
        assert!(p.compile().unwrap_err().is_not_found());
    }

    #[test]
    fn duplicate_reference_warning_names_both_modes() {
        let p = Project::new();
        p.write("policy-modes.yaml", "periodic: [x]\ncloudtrail: [x]\n");
        p.write("modes/periodic.yaml", "type: periodic\n");
        p.write("modes/cloudtrail.yaml", "type: cloudtrail\n");
        p.write("policies/x.yaml", "policies:\n  - name: x\n    resource: s3\n");

        let (result, logged) = capture_warnings(|| p.compile());
        result.expect("compile");
        assert!(logged.contains("more than one mode"), "{logged}");
        assert!(logged.contains("previous=periodic"), "{logged}");
        assert!(logged.contains("mode=cloudtrail"), "{logged}");
    }

    #[test]
    fn repeated_listing_under_one_mode_is_not_a_conflict() {
        let p = Project::new();
        p.write("policy-modes.yaml", "periodic: [x, x]\n");
        p.write("modes/periodic.yaml", "type: periodic\n");
        p.write("policies/x.yaml", "policies:\n  - name: x\n    resource: s3\n");

        let (result, logged) = capture_warnings(|| p.compile());
        assert_eq!(result.expect("compile"), vec![p.out.join("x.yaml")]);
        assert!(!logged.contains("more than one mode"), "{logged}");
    }

    #[test]
    fn malformed_mode_aborts() {
        let p = Project::new();
        p.write("policy-modes.yaml", "periodic: [policy1]\n");
        p.write("modes/periodic.yaml", "type: [periodic\n");

        assert!(matches!(p.compile().unwrap_err(), CpeError::Parse { .. }));
    }

    #[test]
    fn compile_tree_applies_one_mode_to_every_file() {
        let p = Project::new();
        p.write("policies/a.yaml", "policies:\n  - name: a\n    resource: ec2\n");
        p.write("policies/nested/b.yaml", "policies:\n  - name: b\n    resource: s3\n");
        p.write("policies/notes.txt", "ignored");
        let mode: Value = serde_yaml::from_str("type: periodic\n").expect("yaml");

        let written = compile_tree(&p.root.join("policies"), &mode, &p.out).expect("compile");
        assert_eq!(written, vec![p.out.join("a.yaml"), p.out.join("nested/b.yaml")]);
        assert_eq!(
            p.staged("nested/b.yaml")["policies"][0]["mode"]["type"],
            Value::from("periodic")
        );
    }
}
