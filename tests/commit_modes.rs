mod common;

use common::{commit_file, git, init_repo, run, stderr, stdout};

#[test]
fn latest_commit_is_the_default() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    init_repo(root);
    commit_file(root, "a.rs", "fn main() {}\n", "initial");
    let head = commit_file(root, "a.rs", "// hi\nfn main() {}\n", "comment");

    let out = run(root, &["--json"]);
    assert!(out.status.success(), "failed: {}", stderr(&out));

    let v: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(v["commit_hash"], head.as_str());
    assert_eq!(v["message"], "comment");
    assert_eq!(v["files_changed"], 1);
    assert_eq!(v["insertions"], 1);
    assert_eq!(v["file_diffs"][0]["file_name"], "a.rs");
    assert_eq!(v["file_diffs"][0]["language"], "Rust");

    let log = stderr(&out);
    assert!(log.contains("Analyzing latest commit..."));
    assert_eq!(log.matches("Analysis complete!").count(), 1);
}

#[test]
fn specific_commit_from_explicit_repo_path() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("repo");
    std::fs::create_dir_all(&root).unwrap();
    init_repo(&root);
    let first = commit_file(&root, "app.py", "print(1)\n", "initial");
    commit_file(&root, "app.py", "print(2)\n", "change");

    // run from outside the repository
    let elsewhere = tempfile::tempdir().unwrap();
    let repo_arg = root.to_string_lossy().to_string();
    let out = run(
        elsewhere.path(),
        &["--repo", &repo_arg, "--commit", &first[..8], "--json"],
    );
    assert!(out.status.success(), "failed: {}", stderr(&out));

    let v: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(v["commit_hash"], first.as_str());
    assert_eq!(v["parent_hashes"].as_array().unwrap().len(), 0);
    assert_eq!(v["file_diffs"][0]["status"], "added");
    assert!(stderr(&out).contains(&format!("Analyzing commit: {}", &first[..8])));
}

#[test]
fn renames_are_detected() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    init_repo(root);
    commit_file(
        root,
        "old_name.txt",
        "line one\nline two\nline three\nline four\n",
        "initial",
    );
    git(root, &["mv", "old_name.txt", "new_name.txt"]);
    git(root, &["commit", "-m", "rename"]);

    let out = run(root, &["--json"]);
    assert!(out.status.success(), "failed: {}", stderr(&out));
    let v: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    let f = &v["file_diffs"][0];
    assert_eq!(f["status"], "renamed");
    assert_eq!(f["file_name"], "new_name.txt");
    assert_eq!(f["old_file_name"], "old_name.txt");
}

#[test]
fn unknown_commit_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    init_repo(root);
    commit_file(root, "a.txt", "a\n", "initial");

    let out = run(root, &["--commit", "no-such-revision"]);
    assert_eq!(out.status.code(), Some(1));
    let log = stderr(&out);
    assert!(log.contains("Error getting commit diff: commit not found: no-such-revision"));
    assert!(!log.contains("Analysis complete!"));
    assert!(stdout(&out).is_empty());
}

#[test]
fn empty_repository_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    init_repo(dir.path());

    let out = run(dir.path(), &[]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("Error getting latest commit diff: repository has no commits yet"));
}

#[test]
fn missing_repository_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing");
    let repo_arg = missing.to_string_lossy().to_string();

    let out = run(dir.path(), &["--repo", &repo_arg]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("no git repository found"));
}

#[test]
fn text_and_markdown_output() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    init_repo(root);
    commit_file(root, "infra/main.tf", "resource \"a\" \"b\" {}\n", "add infra");

    let text = run(root, &[]);
    assert!(text.status.success(), "failed: {}", stderr(&text));
    let s = stdout(&text);
    assert!(s.starts_with("📝 Commit: "));
    assert!(s.contains("    add infra"));
    assert!(s.contains("infra/main.tf  (Terraform)"));
    assert!(s.contains("+resource \"a\" \"b\" {}"));
    assert!(!s.contains('\x1b'));

    let stat = run(root, &["--stat"]);
    assert!(!stdout(&stat).contains("+resource"));

    let md = run(root, &["--markdown"]);
    assert!(md.status.success());
    let s = stdout(&md);
    assert!(s.starts_with("### Commit `"));
    assert!(s.contains("| infra/main.tf | added | Terraform | p/terraform | 1 | 0 |"));
}

#[test]
fn conflicting_formats_are_a_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let out = run(dir.path(), &["--json", "--markdown"]);
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn merge_commit_shows_only_side_branch_changes() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    init_repo(root);
    commit_file(root, "base.txt", "base\n", "initial");
    git(root, &["checkout", "-b", "side"]);
    commit_file(root, "side.txt", "side\n", "side work");
    git(root, &["checkout", "main"]);
    let mainline = commit_file(root, "main.txt", "main\n", "main work");
    git(root, &["merge", "--no-ff", "side", "-m", "merge side"]);
    let merge = git(root, &["rev-parse", "HEAD"]);

    let out = run(root, &["--json"]);
    assert!(out.status.success(), "failed: {}", stderr(&out));
    let v: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(v["commit_hash"], merge.as_str());

    let parents = v["parent_hashes"].as_array().unwrap();
    assert_eq!(parents.len(), 2);
    assert_eq!(parents[0], mainline.as_str());

    let files: Vec<&str> = v["file_diffs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["file_name"].as_str().unwrap())
        .collect();
    assert_eq!(files, vec!["side.txt"]);
    assert_eq!(v["file_diffs"][0]["status"], "added");
}
