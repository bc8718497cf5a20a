/// Aggregated failure listing, e.g.
///
/// ```text
/// INVALID POLICIES:
/// - team/ec2.yaml
/// ```
pub fn format_invalid(invalid: &[String]) -> anyhow::Result<String> {
    Ok(format!("INVALID POLICIES:\n{}", serde_yaml::to_string(invalid)?))
}

pub fn print_invalid(invalid: &[String]) -> anyhow::Result<()> {
    eprint!("{}", format_invalid(invalid)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::format_invalid;

    #[test]
    fn listing_is_a_yaml_sequence() {
        let out = format_invalid(&["a.yaml".to_string(), "team/b.yaml".to_string()]).expect("format");
        assert_eq!(out, "INVALID POLICIES:\n- a.yaml\n- team/b.yaml\n");
    }
}
