use std::fmt::Write as _;

use crate::types_diff::CommitDiff;

pub fn format(d: &CommitDiff, stat_only: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "### Commit `{}`: {}", d.short_hash, d.subject());
    let _ = writeln!(out, "- Author: {} <{}>", d.author, d.email);
    let _ = writeln!(out, "- Date: {}", d.timestamp.to_rfc3339());
    let _ = writeln!(
        out,
        "- Files: {} · Insertions: +{} · Deletions: -{}\n",
        d.files_changed, d.insertions, d.deletions
    );

    if !d.languages.is_empty() {
        out.push_str("#### Languages\n");
        out.push_str("| Language | files | + | - |\n");
        out.push_str("|---------:|-----:|--:|--:|\n");
        for (lang, s) in &d.languages {
            let _ = writeln!(out, "| {} | {} | {} | {} |", lang, s.files, s.additions, s.deletions);
        }
        out.push('\n');
    }

    if !d.file_diffs.is_empty() {
        out.push_str("#### Files\n");
        out.push_str("| File | status | language | scan profile | + | - |\n");
        out.push_str("|------|:------:|:--------:|:------------:|--:|--:|\n");
        for f in &d.file_diffs {
            let name = match &f.old_file_name {
                Some(old) => format!("{old} → {}", f.file_name),
                None => f.file_name.clone(),
            };
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} | {} | {} |",
                name,
                f.status.as_str(),
                f.language,
                f.scan_profile,
                f.additions,
                f.deletions
            );
        }
    }

    if !stat_only && !d.file_diffs.is_empty() {
        out.push_str("\n<details><summary>Patches</summary>\n\n");
        for f in &d.file_diffs {
            let fence = "`".repeat(fence_len(&f.diff));
            let _ = writeln!(out, "{fence}diff\n{}\n{fence}", f.diff.trim_end());
        }
        out.push_str("\n</details>\n");
    }

    out.trim_end().to_string()
}

// A fence must be longer than any backtick run inside the block.
fn fence_len(body: &str) -> usize {
    let longest = body
        .split(|c| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    longest.max(2) + 1
}
