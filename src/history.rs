//! Session archive.
//!
//! Each archived `learn` run gets its own directory under `history.dir`,
//! named `YYYY-MM-DD_HHMMSS_<mode>` in local time, holding copies of the
//! input documents. Names sort chronologically, so listing newest first is
//! a reverse lexical sort.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

/// One archived session directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Directory name, e.g. `2025-03-01_142233_learn`.
    pub name: String,
    /// Trailing mode segment of the name (`learn`).
    pub mode: String,
    pub path: PathBuf,
    /// File names inside the directory, sorted.
    pub files: Vec<String>,
}

/// Directory name for a session started at `at`.
pub fn session_dir_name(at: DateTime<Local>, mode: &str) -> String {
    format!("{}_{}", at.format("%Y-%m-%d_%H%M%S"), mode)
}

/// Copy `files` into a new session directory under `history_dir`.
///
/// Each entry is `(label, source)`; the copy is named after the label and
/// keeps the source extension, so `("original", "ch3.md")` lands as
/// `original.md`. A numeric suffix (`_2`, `_3`, ...) is appended to the
/// directory name if a session with the same timestamp already exists.
pub fn archive_session(history_dir: &Path, mode: &str, files: &[(&str, &Path)]) -> Result<PathBuf> {
    let base = session_dir_name(Local::now(), mode);
    let folder = unique_dir(history_dir, &base);
    std::fs::create_dir_all(&folder)
        .with_context(|| format!("Failed to create session directory: {}", folder.display()))?;

    for (label, src) in files {
        let name = match src.extension() {
            Some(ext) => format!("{}.{}", label, ext.to_string_lossy()),
            None => label.to_string(),
        };
        let dest = folder.join(name);
        std::fs::copy(src, &dest).with_context(|| {
            format!("Failed to archive {} to {}", src.display(), dest.display())
        })?;
    }

    tracing::info!(path = %folder.display(), files = files.len(), "session archived");
    Ok(folder)
}

fn unique_dir(history_dir: &Path, base: &str) -> PathBuf {
    let mut candidate = history_dir.join(base);
    let mut n = 2;
    while candidate.exists() {
        candidate = history_dir.join(format!("{}_{}", base, n));
        n += 1;
    }
    candidate
}

/// List archived sessions, newest first. A missing directory is empty.
pub fn list_history(history_dir: &Path) -> Result<Vec<Session>> {
    if !history_dir.exists() {
        return Ok(Vec::new());
    }

    let entries = std::fs::read_dir(history_dir)
        .with_context(|| format!("Failed to read history directory: {}", history_dir.display()))?;

    let mut sessions = Vec::new();
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        if !path.is_dir() || name.starts_with('.') {
            continue;
        }

        let mut files: Vec<String> = std::fs::read_dir(&path)
            .with_context(|| format!("Failed to read session: {}", path.display()))?
            .filter_map(|f| f.ok())
            .filter(|f| f.path().is_file())
            .map(|f| f.file_name().to_string_lossy().into_owned())
            .collect();
        files.sort();

        sessions.push(Session {
            mode: session_mode(&name).to_string(),
            name,
            path,
            files,
        });
    }

    sessions.sort_by(|a, b| b.name.cmp(&a.name));
    Ok(sessions)
}

/// `2025-03-01_142233_learn` → `learn`; `..._learn_2` → `learn`.
fn session_mode(name: &str) -> &str {
    let mut parts = name.splitn(3, '_');
    let _date = parts.next();
    let _time = parts.next();
    let rest = parts.next().unwrap_or("");
    match rest.rsplit_once('_') {
        Some((mode, suffix)) if suffix.chars().all(|c| c.is_ascii_digit()) => mode,
        _ => rest,
    }
}

/// CLI entry point for `sted history`.
pub fn run_history(history_dir: &Path) -> Result<()> {
    let sessions = list_history(history_dir)?;
    if sessions.is_empty() {
        println!("No archived sessions yet.");
        return Ok(());
    }

    println!("{} archived session(s):", sessions.len());
    println!();
    for session in &sessions {
        println!("  {}  [{}]", session.name, session.mode);
        for file in &session.files {
            println!("    - {}", file);
        }
        println!();
    }
    Ok(())
}
