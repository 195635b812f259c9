pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Typed input from `--input <path>`, else piped stdin.
pub fn load<T: DeserializeOwned>(path: Option<&str>) -> Result<T, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return file::read_json(path);
    }
    match stdin::read_stdin()? {
        Some(value) => Ok(serde_json::from_value(value)?),
        None => Err("--input is required (or pipe JSON on stdin)".into()),
    }
}
