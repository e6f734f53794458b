use super::ReportPayload;
use crate::error::PipelineError;

const TEMPLATE: &str = include_str!("template.html");

/// The one spot in the shell that receives data.
pub const DATA_PLACEHOLDER: &str = "__COMPARISON_DATA__";

pub fn render_html(payload: &ReportPayload) -> Result<String, PipelineError> {
    let blob = serde_json::to_string_pretty(payload)?;
    Ok(TEMPLATE.replacen(DATA_PLACEHOLDER, &escape_script_json(&blob), 1))
}

/// Keeps a JSON document inert inside `<script>`: no `</script>`, `<!--` or line
/// separators can survive. The output is still valid JSON with the same value.
pub fn escape_script_json(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for ch in json.chars() {
        match ch {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c => out.push(c),
        }
    }
    out
}
