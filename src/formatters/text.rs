use crate::types_diff::{ChangeStatus, CommitDiff, FileDiff};
use std::io::IsTerminal;

pub fn format(d: &CommitDiff, stat_only: bool) -> String {
    format_with(d, stat_only, &Colors::enabled())
}

fn format_with(d: &CommitDiff, stat_only: bool, colors: &Colors) -> String {
    let mut lines = Vec::new();

    lines.push(colors.bold(&format!("📝 Commit: {}", d.commit_hash)));
    lines.push(format!("👤 Author: {} <{}>", d.author, d.email));
    lines.push(format!("📅 Date:   {}", d.timestamp.to_rfc3339()));
    if !d.parent_hashes.is_empty() {
        let parents: Vec<String> = d
            .parent_hashes
            .iter()
            .map(|p| p.chars().take(7).collect())
            .collect();
        lines.push(format!("🔗 Parent: {}", parents.join(" ")));
    }
    lines.push(String::new());
    for l in d.message.lines() {
        lines.push(format!("    {l}"));
    }
    lines.push(String::new());

    if d.file_diffs.is_empty() {
        lines.push("(no file changes)".to_string());
        return lines.join("\n");
    }

    // Column widths for the +/- counters
    let add_w = d
        .file_diffs
        .iter()
        .map(|f| f.additions.to_string().len())
        .max()
        .unwrap_or(1)
        + 1;
    let del_w = d
        .file_diffs
        .iter()
        .map(|f| f.deletions.to_string().len())
        .max()
        .unwrap_or(1)
        + 1;

    for f in &d.file_diffs {
        lines.push(format_row(f, add_w, del_w, colors));
    }
    let separator = "-".repeat(40);
    lines.push(separator);
    lines.push(format!(
        "📊 {} file(s) changed, {}, {}",
        d.files_changed,
        colors.paint(&format!("{} insertion(s)(+)", d.insertions), "32"),
        colors.paint(&format!("{} deletion(s)(-)", d.deletions), "31"),
    ));

    if !stat_only {
        for f in &d.file_diffs {
            lines.push(String::new());
            lines.push(colors.bold(&format!("📄 {} [{}]", f.file_name, f.status.as_str())));
            push_patch(&mut lines, &f.diff, colors);
        }
    }

    lines.join("\n")
}

fn format_row(f: &FileDiff, add_w: usize, del_w: usize, colors: &Colors) -> String {
    let adds = format!("{:>w$}", format!("+{}", f.additions), w = add_w);
    let dels = format!("{:>w$}", format!("-{}", f.deletions), w = del_w);
    let name = match (&f.status, &f.old_file_name) {
        (ChangeStatus::Renamed, Some(old)) => format!("{old} → {}", f.file_name),
        _ => f.file_name.clone(),
    };
    let detail = if f.is_binary {
        "binary".to_string()
    } else {
        f.language.clone()
    };
    format!(
        "  {}  {} {}  {}  ({})",
        colors.paint(&f.status.letter().to_string(), status_code(f.status)),
        colors.paint(&adds, "32"),
        colors.paint(&dels, "31"),
        name,
        detail
    )
}

fn push_patch(lines: &mut Vec<String>, patch: &str, colors: &Colors) {
    for l in patch.lines() {
        let painted = if l.starts_with("+++") || l.starts_with("---") || l.starts_with("diff --git") {
            colors.bold(l)
        } else if l.starts_with('+') {
            colors.paint(l, "32")
        } else if l.starts_with('-') {
            colors.paint(l, "31")
        } else if l.starts_with("@@") {
            colors.paint(l, "36")
        } else {
            l.to_string()
        };
        lines.push(painted);
    }
}

fn status_code(s: ChangeStatus) -> &'static str {
    match s {
        ChangeStatus::Added => "92",
        ChangeStatus::Deleted => "91",
        ChangeStatus::Renamed | ChangeStatus::Copied => "96",
        ChangeStatus::Modified | ChangeStatus::Typechange => "93",
    }
}

struct Colors {
    enabled: bool,
}

impl Colors {
    fn enabled() -> Self {
        let force = std::env::var("CLICOLOR_FORCE")
            .ok()
            .filter(|v| v != "0")
            .is_some();
        let no_color = std::env::var_os("NO_COLOR").is_some();
        let clicolor_zero = std::env::var("CLICOLOR")
            .ok()
            .is_some_and(|v| v == "0");
        let term = std::io::stdout().is_terminal();
        let enabled = if force {
            true
        } else if no_color || clicolor_zero {
            false
        } else {
            term
        };
        Colors { enabled }
    }

    fn paint(&self, s: &str, code: &str) -> String {
        if self.enabled {
            format!("\x1b[{code}m{s}\x1b[0m")
        } else {
            s.to_string()
        }
    }

    fn bold(&self, s: &str) -> String {
        self.paint(s, "1")
    }
}
