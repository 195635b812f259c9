use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use startup_valuation_core::benchmarks::{IndustryEntry, StaticMarketData};

/// Read a JSON file into a typed struct.
pub fn read_json<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;
    let value: T = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?;
    Ok(value)
}

/// Load an industry benchmark table. `.yaml`/`.yml` files are read as YAML,
/// anything else as JSON.
pub fn read_benchmarks(path: &str) -> Result<StaticMarketData, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;
    let entries = parse_benchmarks(&contents, is_yaml(&canonical))
        .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?;
    Ok(StaticMarketData::from_entries(entries))
}

fn parse_benchmarks(
    contents: &str,
    yaml: bool,
) -> Result<BTreeMap<String, IndustryEntry>, Box<dyn std::error::Error>> {
    if yaml {
        Ok(serde_yaml::from_str(contents)?)
    } else {
        Ok(serde_json::from_str(contents)?)
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

/// Resolve relative paths against the working directory and require a file.
fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let canonical = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !canonical.exists() {
        return Err(format!("File not found: {}", canonical.display()).into());
    }

    if !canonical.is_file() {
        return Err(format!("Not a file: {}", canonical.display()).into());
    }

    Ok(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_table() {
        let yaml = "\
SaaS:
  revenue: 12
  users: 300
  growth: 1.8
  insights: Retention drives multiples.
fintech:
  revenue: 8
  users: 200
  growth: 1.4
  beta: 1.4
";
        let entries = parse_benchmarks(yaml, true).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries["SaaS"].multipliers.revenue.to_string(), "12");
        assert_eq!(entries["SaaS"].multipliers.beta.to_string(), "1.2");
        assert_eq!(
            entries["SaaS"].insights.as_deref(),
            Some("Retention drives multiples.")
        );
    }

    #[test]
    fn test_parse_json_table() {
        let json = r#"{"ecommerce": {"revenue": 3, "users": 50, "growth": 1.1}}"#;
        let entries = parse_benchmarks(json, false).unwrap();
        assert_eq!(entries["ecommerce"].multipliers.users.to_string(), "50");
    }

    #[test]
    fn test_yaml_extension_detection() {
        assert!(is_yaml(Path::new("bench.yaml")));
        assert!(is_yaml(Path::new("bench.yml")));
        assert!(!is_yaml(Path::new("bench.json")));
    }

    #[test]
    fn test_missing_file() {
        let err = read_benchmarks("/nonexistent/benchmarks.yaml").unwrap_err();
        assert!(err.to_string().contains("File not found"));
    }
}
