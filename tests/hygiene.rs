//! Hygiene: scans production sources for patterns the crate does not allow.
//!
//! Every pattern has a budget (all zero today). Test files (`*_test.rs`) are
//! exempt. A budget only ever goes down.

use std::fs;
use std::path::Path;

struct Budget {
    pattern: &'static str,
    max: usize,
    why: &'static str,
}

const BUDGETS: &[Budget] = &[
    // Panics.
    Budget { pattern: ".unwrap()", max: 0, why: "propagate with ? instead" },
    Budget { pattern: ".expect(", max: 0, why: "propagate with ? instead" },
    Budget { pattern: "panic!(", max: 0, why: "return an error instead" },
    Budget { pattern: "unreachable!(", max: 0, why: "make the state unrepresentable" },
    Budget { pattern: "todo!(", max: 0, why: "unfinished code" },
    Budget { pattern: "unimplemented!(", max: 0, why: "unfinished code" },
    // Silent loss.
    Budget { pattern: "let _ =", max: 0, why: "inspect or log the result" },
    Budget { pattern: ".ok()", max: 0, why: "inspect or log the error" },
    // Output goes through tracing.
    Budget { pattern: "println!(", max: 0, why: "use tracing" },
    Budget { pattern: "eprintln!(", max: 0, why: "use tracing" },
    Budget { pattern: "dbg!(", max: 0, why: "leftover debugging" },
    // Structure.
    Budget { pattern: "#[allow(dead_code)]", max: 0, why: "delete unused code" },
];

struct SourceFile {
    path: String,
    content: String,
}

fn collect(dir: &Path, out: &mut Vec<SourceFile>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect(&path, out);
            continue;
        }
        let path_str = path.to_string_lossy().to_string();
        if !path_str.ends_with(".rs") || path_str.ends_with("_test.rs") {
            continue;
        }
        if let Ok(content) = fs::read_to_string(&path) {
            out.push(SourceFile { path: path_str, content });
        }
    }
}

fn production_sources() -> Vec<SourceFile> {
    let mut files = Vec::new();
    collect(&Path::new(env!("CARGO_MANIFEST_DIR")).join("src"), &mut files);
    files
}

fn hits(files: &[SourceFile], pattern: &str) -> Vec<(String, usize)> {
    files
        .iter()
        .filter_map(|file| {
            let count = file.content.lines().filter(|line| line.contains(pattern)).count();
            (count > 0).then(|| (file.path.clone(), count))
        })
        .collect()
}

#[test]
fn sources_are_found() {
    let files = production_sources();
    assert!(files.iter().any(|f| f.path.ends_with("lib.rs")));
    assert!(files.iter().any(|f| f.path.ends_with("selection.rs")));
    assert!(!files.iter().any(|f| f.path.ends_with("_test.rs")));
}

#[test]
fn budgets_hold() {
    let files = production_sources();
    let mut failures = Vec::new();
    for budget in BUDGETS {
        let found = hits(&files, budget.pattern);
        let count: usize = found.iter().map(|(_, c)| c).sum();
        if count > budget.max {
            let listing: Vec<String> = found.iter().map(|(path, c)| format!("    {path}: {c}")).collect();
            failures.push(format!(
                "{} budget exceeded: found {count}, max {} ({})\n{}",
                budget.pattern,
                budget.max,
                budget.why,
                listing.join("\n")
            ));
        }
    }
    assert!(failures.is_empty(), "{}", failures.join("\n"));
}

#[test]
fn every_module_has_a_doc() {
    let undocumented: Vec<String> = production_sources()
        .into_iter()
        .filter(|f| !f.content.trim_start().starts_with("//!"))
        .map(|f| f.path)
        .collect();
    assert!(undocumented.is_empty(), "modules without a //! doc:\n{}", undocumented.join("\n"));
}

#[test]
fn fmt_subscriber_is_native_only() {
    let files = production_sources();
    for file in &files {
        let lines: Vec<&str> = file.content.lines().collect();
        for (i, line) in lines.iter().enumerate() {
            if !line.contains("tracing_subscriber::fmt") {
                continue;
            }
            let gated = lines[..i]
                .iter()
                .rev()
                .find(|l| l.trim_start().starts_with("#[cfg("))
                .is_some_and(|l| l.contains("not(target_arch = \"wasm32\")"));
            assert!(gated, "{}:{} installs the fmt subscriber without a native-only cfg", file.path, i + 1);
        }
    }
}

/// Every crate named in `Cargo.toml`'s dependency tables (not dev-dependencies).
fn declared_dependencies() -> Vec<String> {
    let manifest = fs::read_to_string(Path::new(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml")).unwrap();
    let mut deps = Vec::new();
    let mut in_deps = false;
    for line in manifest.lines().map(str::trim) {
        if line.starts_with('[') {
            let header = line.trim_matches(|c| c == '[' || c == ']');
            if let Some(name) = header.strip_prefix("dependencies.") {
                deps.push(name.to_owned());
                in_deps = false;
            } else {
                in_deps = header == "dependencies" || (header.ends_with(".dependencies") && !header.contains("dev-"));
            }
            continue;
        }
        if in_deps {
            if let Some((name, _)) = line.split_once('=') {
                deps.push(name.trim().to_owned());
            }
        }
    }
    deps
}

#[test]
fn declared_dependencies_are_used() {
    let files = production_sources();
    let unused: Vec<String> = declared_dependencies()
        .into_iter()
        .filter(|dep| {
            let path = format!("{}::", dep.replace('-', "_"));
            !files.iter().any(|f| f.content.contains(&path))
        })
        .collect();
    assert!(unused.is_empty(), "dependencies never referenced from src/: {unused:?}");
}
