use crate::types_diff::CommitDiff;

pub mod markdown;
pub mod text;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Markdown,
}

/// Renders a commit diff; `stat_only` drops the patch bodies.
pub fn render(diff: &CommitDiff, format: OutputFormat, stat_only: bool) -> String {
    match format {
        OutputFormat::Text => text::format(diff, stat_only),
        OutputFormat::Markdown => markdown::format(diff, stat_only),
        OutputFormat::Json => match serde_json::to_string_pretty(diff) {
            Ok(json) => json,
            Err(e) => {
                log::error!("serializing commit diff {} failed: {e}", diff.short_hash);
                String::new()
            }
        },
    }
}
