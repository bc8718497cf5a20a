use crate::domain::error::{CpeError, Result};
use crate::domain::models::{ModeDocument, PolicyDocument};
use serde_yaml::{Mapping, Value};
use std::path::Path;

const POLICIES_KEY: &str = "policies";
const MODE_KEY: &str = "mode";

fn is_empty(doc: &Value) -> bool {
    match doc {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Sequence(s) => s.is_empty(),
        Value::Mapping(m) => m.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::Tagged(_) => false,
    }
}

/// Attach `mode` to every entry of `policy.policies`.
///
/// An empty or absent policy document yields an empty mapping. Entries keep
/// their order and any existing `mode` key is replaced. `source` is only used
/// for error messages.
pub fn apply_mode(
    source: &Path,
    policy: &PolicyDocument,
    mode: &ModeDocument,
) -> Result<PolicyDocument> {
    if is_empty(policy) {
        return Ok(Value::Mapping(Mapping::new()));
    }
    let entries = policy
        .get(POLICIES_KEY)
        .and_then(Value::as_sequence)
        .ok_or_else(|| CpeError::shape(source, "expected a `policies` sequence"))?;

    let mut merged = Vec::with_capacity(entries.len());
    for entry in entries {
        let Value::Mapping(fields) = entry else {
            return Err(CpeError::shape(source, "policy entries must be mappings"));
        };
        let mut fields = fields.clone();
        fields.insert(Value::from(MODE_KEY), mode.clone());
        merged.push(Value::Mapping(fields));
    }

    let mut out = Mapping::new();
    out.insert(Value::from(POLICIES_KEY), Value::Sequence(merged));
    Ok(Value::Mapping(out))
}
