#![allow(clippy::must_use_candidate)]

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::Path;

pub const UNKNOWN_LANGUAGE: &str = "Unknown";

pub const PROFILE_TERRAFORM: &str = "p/terraform";
pub const PROFILE_KUBERNETES: &str = "p/kubernetes";
pub const PROFILE_DOCKER: &str = "p/docker";
pub const PROFILE_DEFAULT: &str = "p/default";

// (language, extensions, special file names)
const LANGUAGES: &[(&str, &[&str], &[&str])] = &[
    ("Rust", &["rs"], &[]),
    ("Go", &["go"], &[]),
    ("Python", &["py", "pyi", "pyw"], &[]),
    ("JavaScript", &["js", "mjs", "cjs", "jsx"], &[]),
    ("TypeScript", &["ts", "tsx", "mts", "cts"], &[]),
    ("Java", &["java"], &[]),
    ("Kotlin", &["kt", "kts"], &[]),
    ("C", &["c", "h"], &[]),
    ("C++", &["cc", "cpp", "cxx", "hpp", "hh", "hxx"], &[]),
    ("C#", &["cs"], &[]),
    ("Ruby", &["rb"], &["gemfile", "rakefile"]),
    ("PHP", &["php"], &[]),
    ("Swift", &["swift"], &[]),
    ("Shell", &["sh", "bash", "zsh"], &[]),
    ("SQL", &["sql"], &[]),
    ("HTML", &["html", "htm"], &[]),
    ("CSS", &["css", "scss", "sass"], &[]),
    ("JSON", &["json"], &[]),
    ("YAML", &["yml", "yaml"], &[]),
    ("TOML", &["toml"], &["cargo.lock"]),
    ("Markdown", &["md", "markdown"], &[]),
    ("Terraform", &["tf", "tfvars"], &[]),
    ("Dockerfile", &["dockerfile"], &["dockerfile", "containerfile"]),
    ("Makefile", &["mk"], &["makefile", "gnumakefile"]),
    ("Text", &["txt"], &[]),
];

struct Registry {
    by_ext: HashMap<&'static str, &'static str>,
    by_name: HashMap<&'static str, &'static str>,
}

static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let mut by_ext = HashMap::new();
    let mut by_name = HashMap::new();
    for (lang, exts, names) in LANGUAGES {
        for ext in *exts {
            by_ext.insert(*ext, *lang);
        }
        for name in *names {
            by_name.insert(*name, *lang);
        }
    }
    Registry { by_ext, by_name }
});

fn lower_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}

/// Language label for a repository-relative path.
pub fn language_for_path(path: &Path) -> &'static str {
    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
        let lower = name.to_ascii_lowercase();
        if let Some(lang) = REGISTRY.by_name.get(lower.as_str()) {
            return *lang;
        }
        // Dockerfile.dev, Dockerfile.prod, ...
        if lower.starts_with("dockerfile.") {
            return "Dockerfile";
        }
    }
    lower_extension(path)
        .and_then(|ext| REGISTRY.by_ext.get(ext.as_str()).copied())
        .unwrap_or(UNKNOWN_LANGUAGE)
}

/// Rule-set a downstream scanner should apply to this file.
pub fn scan_profile_for_path(path: &Path) -> &'static str {
    let full = path.to_string_lossy().to_ascii_lowercase();
    match lower_extension(path).as_deref() {
        Some("tf" | "tfvars") => return PROFILE_TERRAFORM,
        Some("yml" | "yaml") if full.contains("k8s") || full.contains("kubernetes") => {
            return PROFILE_KUBERNETES;
        }
        _ => {}
    }
    if full.contains("dockerfile") {
        return PROFILE_DOCKER;
    }
    PROFILE_DEFAULT
}
