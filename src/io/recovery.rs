use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use tempfile::NamedTempFile;

/// File name of the recovery log, kept next to the task file.
pub const RECOVERY_LOG: &str = ".todo_recovery.log";

/// Self-documenting header written at the top of a new recovery log.
const FILE_HEADER: &str = "\
<!-- todo recovery log: append-only error recovery data
     This file captures task data the app could not keep:
     unreadable task files, failed saves, and deleted tasks.
     Safe to delete if empty or stale. -->

---
";

/// Size past which the log is trimmed before the next append (1 MB).
const MAX_LOG_SIZE: u64 = 1_048_576;

/// Entries older than this are dropped whenever the log is trimmed.
const PRUNE_AGE_DAYS: i64 = 30;

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// Category of a recovery entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryCategory {
    /// The task file existed but could not be parsed
    Parser,
    /// A save failed; the body holds what should have been written
    Write,
    /// A task was deleted by the user
    Delete,
}

impl fmt::Display for RecoveryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecoveryCategory::Parser => write!(f, "parser"),
            RecoveryCategory::Write => write!(f, "write"),
            RecoveryCategory::Delete => write!(f, "delete"),
        }
    }
}

impl RecoveryCategory {
    pub fn parse_category(s: &str) -> Option<Self> {
        match s {
            "parser" => Some(RecoveryCategory::Parser),
            "write" => Some(RecoveryCategory::Write),
            "delete" => Some(RecoveryCategory::Delete),
            _ => None,
        }
    }
}

/// A single entry in the recovery log.
#[derive(Debug, Clone)]
pub struct RecoveryEntry {
    pub timestamp: DateTime<Utc>,
    pub category: RecoveryCategory,
    pub description: String,
    pub fields: Vec<(String, String)>,
    pub body: String,
}

pub fn recovery_log_path(dir: &Path) -> PathBuf {
    dir.join(RECOVERY_LOG)
}

// ---------------------------------------------------------------------------
// Atomic file write
// ---------------------------------------------------------------------------

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry formatting
// ---------------------------------------------------------------------------

impl RecoveryEntry {
    /// Format this entry as a markdown block for the recovery log.
    fn to_markdown(&self) -> String {
        let mut out = String::new();

        out.push_str(&format!(
            "## {} — {}: {}\n",
            self.timestamp
                .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            self.category,
            self.description,
        ));
        out.push('\n');

        for (key, value) in &self.fields {
            out.push_str(&format!("{}: {}\n", key, value));
        }

        if !self.body.is_empty() {
            out.push('\n');
            out.push_str("```text\n");
            out.push_str(&self.body);
            if !self.body.ends_with('\n') {
                out.push('\n');
            }
            out.push_str("```\n");
        }

        out.push('\n');
        out.push_str("---\n");
        out
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Append a recovery entry to the log. Errors are swallowed and printed to stderr.
pub fn log_recovery(dir: &Path, entry: RecoveryEntry) {
    if let Err(e) = log_recovery_inner(dir, entry) {
        eprintln!("warning: could not write to recovery log: {}", e);
    }
}

fn log_recovery_inner(dir: &Path, entry: RecoveryEntry) -> io::Result<()> {
    log_recovery_capped(dir, entry, MAX_LOG_SIZE)
}

fn log_recovery_capped(dir: &Path, entry: RecoveryEntry, max_size: u64) -> io::Result<()> {
    let path = recovery_log_path(dir);
    if let Ok(meta) = fs::metadata(&path)
        && meta.len() > max_size
        && let Err(e) = trim_log(&path, max_size)
    {
        eprintln!("warning: could not trim recovery log: {}", e);
    }

    let needs_header = fs::metadata(&path).map_or(true, |m| m.len() == 0);

    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    if needs_header {
        file.write_all(FILE_HEADER.as_bytes())?;
    }
    file.write_all(entry.to_markdown().as_bytes())?;
    Ok(())
}

/// Log a deleted task so it can be restored by hand.
pub fn log_task_deletion(dir: &Path, task_id: &str, task_source: &str) {
    log_recovery(
        dir,
        RecoveryEntry {
            timestamp: Utc::now(),
            category: RecoveryCategory::Delete,
            description: format!("task {} deleted", task_id),
            fields: vec![("Task".to_string(), task_id.to_string())],
            body: task_source.to_string(),
        },
    );
}

// ---------------------------------------------------------------------------
// Trimming
// ---------------------------------------------------------------------------

/// Rewrite the log without stale entries, then without the oldest ones
/// until it is at most half of `max_size`. The newest entry always stays.
fn trim_log(path: &Path, max_size: u64) -> io::Result<()> {
    let content = fs::read_to_string(path)?;
    let cutoff = Utc::now() - Duration::days(PRUNE_AGE_DAYS);
    let trimmed = trim_entries(&content, cutoff, (max_size / 2) as usize);
    atomic_write(path, trimmed.as_bytes())
}

/// Keep the file header and the entries at or after `cutoff`, dropping the
/// oldest survivors while the result is longer than `target` bytes.
fn trim_entries(content: &str, cutoff: DateTime<Utc>, target: usize) -> String {
    let (header, blocks) = split_entries(content);
    let header = if header.trim().is_empty() { FILE_HEADER } else { header };

    let mut kept: Vec<&str> = blocks
        .into_iter()
        .filter(|(ts, _)| *ts >= cutoff)
        .map(|(_, block)| block)
        .collect();

    let mut size = header.len() + kept.iter().map(|b| b.len()).sum::<usize>();
    let mut oldest = 0;
    while size > target && kept.len() - oldest > 1 {
        size -= kept[oldest].len();
        oldest += 1;
    }
    kept.drain(..oldest);

    let mut out = String::with_capacity(size);
    out.push_str(header);
    for block in kept {
        out.push_str(block);
    }
    out
}

/// Split log content into the text before the first entry and the raw
/// text of each entry with its timestamp. Headers inside fenced bodies
/// do not start an entry.
fn split_entries(content: &str) -> (&str, Vec<(DateTime<Utc>, &str)>) {
    let mut starts: Vec<(usize, DateTime<Utc>)> = Vec::new();
    let mut in_code_block = false;
    let mut offset = 0;

    for line in content.split_inclusive('\n') {
        let text = line.trim_end_matches(['\n', '\r']);
        if in_code_block {
            if text == "```" {
                in_code_block = false;
            }
        } else if text.starts_with("```") {
            in_code_block = true;
        } else if let Some(header) = text.strip_prefix("## ")
            && let Some((timestamp, _, _)) = parse_entry_header(header)
        {
            starts.push((offset, timestamp));
        }
        offset += line.len();
    }

    let head_end = starts.first().map_or(content.len(), |(pos, _)| *pos);
    let blocks = starts
        .iter()
        .enumerate()
        .map(|(i, (pos, ts))| {
            let end = starts.get(i + 1).map_or(content.len(), |(next, _)| *next);
            (*ts, &content[*pos..end])
        })
        .collect();
    (&content[..head_end], blocks)
}

// ---------------------------------------------------------------------------
// Reading entries
// ---------------------------------------------------------------------------

/// Read recovery entries, most recent first.
pub fn read_recovery_entries(dir: &Path, limit: Option<usize>) -> Vec<RecoveryEntry> {
    let content = match fs::read_to_string(recovery_log_path(dir)) {
        Ok(c) => c,
        Err(_) => return Vec::new(),
    };

    let mut entries = parse_entries(&content);
    if let Some(n) = limit {
        let skip = entries.len().saturating_sub(n);
        entries = entries.into_iter().skip(skip).collect();
    }
    entries.reverse();
    entries
}

/// Number of entries in the recovery log (0 if there is no log).
pub fn recovery_entry_count(dir: &Path) -> usize {
    fs::read_to_string(recovery_log_path(dir))
        .map(|content| parse_entries(&content).len())
        .unwrap_or(0)
}

/// Highest numeric task identifier the log records as deleted.
pub fn highest_deleted_id(dir: &Path) -> Option<u64> {
    let content = fs::read_to_string(recovery_log_path(dir)).ok()?;
    parse_entries(&content)
        .iter()
        .filter(|e| e.category == RecoveryCategory::Delete)
        .filter_map(|e| {
            e.fields
                .iter()
                .find(|(key, _)| key == "Task")
                .and_then(|(_, id)| id.parse::<u64>().ok())
        })
        .max()
}

/// Parse all entries from the log content, oldest first.
fn parse_entries(content: &str) -> Vec<RecoveryEntry> {
    let mut entries = Vec::new();
    let mut lines = content.lines();

    while let Some(line) = lines.next() {
        let Some(header) = line.strip_prefix("## ") else {
            continue;
        };
        let Some((timestamp, category, description)) = parse_entry_header(header) else {
            continue;
        };

        let mut fields = Vec::new();
        let mut body = String::new();
        let mut in_code_block = false;

        for line in lines.by_ref() {
            if !in_code_block && (line == "---" || line.starts_with("## ")) {
                break;
            }

            if in_code_block {
                if line == "```" {
                    in_code_block = false;
                } else {
                    if !body.is_empty() {
                        body.push('\n');
                    }
                    body.push_str(line);
                }
                continue;
            }

            if line.starts_with("```") {
                in_code_block = true;
                continue;
            }

            if let Some((key, value)) = line.trim().split_once(": ") {
                fields.push((key.to_string(), value.to_string()));
            }
        }

        entries.push(RecoveryEntry {
            timestamp,
            category,
            description,
            fields,
            body,
        });
    }

    entries
}

/// Parse an entry header: `<timestamp> — <category>: <description>`
fn parse_entry_header(header: &str) -> Option<(DateTime<Utc>, RecoveryCategory, String)> {
    let (timestamp_str, rest) = header.split_once(" — ")?;
    let timestamp = DateTime::parse_from_rfc3339(timestamp_str)
        .ok()?
        .with_timezone(&Utc);
    let (category_str, description) = rest.split_once(": ")?;
    let category = RecoveryCategory::parse_category(category_str)?;
    Some((timestamp, category, description.to_string()))
}
