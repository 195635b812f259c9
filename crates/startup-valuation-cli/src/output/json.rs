use serde_json::Value;

/// Valuation output as indented JSON, newline-terminated so piped consumers
/// see a complete document.
pub(crate) fn render_json(value: &Value) -> Result<String, serde_json::Error> {
    let mut rendered = serde_json::to_string_pretty(value)?;
    rendered.push('\n');
    Ok(rendered)
}

pub fn print_json(value: &Value) {
    match render_json(value) {
        Ok(s) => print!("{s}"),
        Err(e) => eprintln!("JSON serialization error: {e}"),
    }
}
