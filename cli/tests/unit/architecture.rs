//! Structural tests for architectural boundary enforcement.
//!
//! These tests scan source files to verify that the layer boundaries hold:
//! domain depends on nothing, application only on domain, and infra never on
//! the presentation layers.

use std::path::{Path, PathBuf};

fn src_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("src")
}

/// Collect all `.rs` files under a directory recursively.
fn collect_rs_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                files.extend(collect_rs_files(&path));
            } else if path.extension().and_then(|e| e.to_str()) == Some("rs") {
                files.push(path);
            }
        }
    }
    files
}

/// Non-comment lines that appear before the first `#[cfg(test)]`.
fn production_lines(path: &Path) -> Vec<String> {
    let Ok(content) = std::fs::read_to_string(path) else {
        return Vec::new();
    };
    content
        .lines()
        .take_while(|l| !l.trim().starts_with("#[cfg(test)]"))
        .filter(|l| {
            let trimmed = l.trim();
            !trimmed.starts_with("//") && !trimmed.starts_with("/*") && !trimmed.starts_with('*')
        })
        .map(String::from)
        .collect()
}

fn violations(layer: &str, forbidden: &[&str]) -> Vec<String> {
    let mut found = Vec::new();
    for file in collect_rs_files(&src_dir().join(layer)) {
        for line in production_lines(&file) {
            for pattern in forbidden {
                if line.contains(pattern) {
                    found.push(format!("{}: {}", file.display(), line.trim()));
                }
            }
        }
    }
    found
}

#[test]
fn test_domain_has_no_outward_or_io_dependencies() {
    let found = violations(
        "domain",
        &[
            "crate::application",
            "crate::infra",
            "crate::commands",
            "crate::output",
            "tokio",
            "std::fs",
            "std::net",
            "std::process",
            "ssh2",
        ],
    );
    assert!(found.is_empty(), "domain imports outward:\n{}", found.join("\n"));
}

#[test]
fn test_application_does_not_depend_on_infra_or_presentation() {
    let found = violations(
        "application",
        &["crate::infra", "crate::commands", "crate::output", "ssh2"],
    );
    assert!(found.is_empty(), "application imports outward:\n{}", found.join("\n"));
}

#[test]
fn test_infra_does_not_depend_on_presentation() {
    let found = violations("infra", &["crate::commands", "crate::output"]);
    assert!(found.is_empty(), "infra imports presentation:\n{}", found.join("\n"));
}

#[test]
fn test_ssh_library_is_confined_to_infra() {
    let mut found = Vec::new();
    for layer in ["commands", "output"] {
        found.extend(violations(layer, &["ssh2::"]));
    }
    assert!(found.is_empty(), "ssh2 used outside infra:\n{}", found.join("\n"));
}
