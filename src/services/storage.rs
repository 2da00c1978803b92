use crate::domain::errors::CurateError;
use crate::domain::models::Entry;
use std::io::Write;
use std::path::Path;

/// Append one event to the audit trail. Best-effort: failures are logged and
/// never abort the command that triggered them.
pub fn audit(path: &Path, action: &str, data: serde_json::Value) {
    let event = serde_json::json!({
        "ts": chrono::Utc::now().to_rfc3339(),
        "action": action,
        "data": data
    });
    let line = format!("{}\n", event);
    let res = ensure_parent(path).and_then(|_| {
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .and_then(|mut f| f.write_all(line.as_bytes()))
            .map_err(Into::into)
    });
    if let Err(e) = res {
        tracing::warn!(path = %path.display(), error = %e, "could not write audit event");
    }
}

pub fn ensure_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Replace `path` with `contents` through a temp file in the same directory,
/// so readers see either the old file or the new one.
pub fn write_atomic(path: &Path, contents: &[u8]) -> anyhow::Result<()> {
    ensure_parent(path)?;
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

pub fn encode_jsonl(entries: &[Entry]) -> anyhow::Result<String> {
    let mut out = String::new();
    for e in entries {
        out.push_str(&serde_json::to_string(e)?);
        out.push('\n');
    }
    Ok(out)
}

pub fn encode_pretty(entries: &[Entry]) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(entries)?)
}

pub fn append_jsonl(path: &Path, entries: &[Entry]) -> anyhow::Result<()> {
    ensure_parent(path)?;
    let body = encode_jsonl(entries)?;
    let mut f = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    f.write_all(body.as_bytes())?;
    Ok(())
}

pub fn write_jsonl(path: &Path, entries: &[Entry]) -> anyhow::Result<()> {
    write_atomic(path, encode_jsonl(entries)?.as_bytes())
}

pub fn write_pretty(path: &Path, entries: &[Entry]) -> anyhow::Result<()> {
    write_atomic(path, encode_pretty(entries)?.as_bytes())
}

/// Line-delimited read where corruption is fatal. A missing file is an empty
/// collection.
pub fn read_jsonl_strict(path: &Path) -> anyhow::Result<Vec<Entry>> {
    if !path.exists() {
        return Ok(vec![]);
    }
    let raw = std::fs::read_to_string(path)?;
    parse_jsonl(path, &raw).map_err(Into::into)
}

/// Line-delimited read where corruption degrades to an empty collection.
pub fn read_jsonl_tolerant(path: &Path) -> Vec<Entry> {
    if !path.exists() {
        return vec![];
    }
    match std::fs::read_to_string(path)
        .map_err(anyhow::Error::from)
        .and_then(|raw| parse_jsonl(path, &raw).map_err(Into::into))
    {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "unreadable line-delimited file treated as empty");
            vec![]
        }
    }
}

pub fn parse_jsonl(path: &Path, raw: &str) -> Result<Vec<Entry>, CurateError> {
    let mut items = Vec::new();
    for (i, line) in raw.lines().enumerate() {
        let s = line.trim();
        if s.is_empty() {
            continue;
        }
        let malformed = |reason: String| CurateError::MalformedLine {
            path: path.to_path_buf(),
            line: i + 1,
            reason,
        };
        match serde_json::from_str::<serde_json::Value>(s) {
            Ok(serde_json::Value::Object(map)) => items.push(map),
            Ok(_) => return Err(malformed("expected a JSON object".to_string())),
            Err(e) => return Err(malformed(e.to_string())),
        }
    }
    Ok(items)
}

/// Array read where the file must hold a JSON array of objects.
pub fn read_pretty_strict(path: &Path) -> anyhow::Result<Vec<Entry>> {
    let raw = std::fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&raw)?;
    let serde_json::Value::Array(items) = value else {
        anyhow::bail!("{}: expected a JSON array of objects", path.display());
    };
    items
        .into_iter()
        .enumerate()
        .map(|(i, v)| match v {
            serde_json::Value::Object(map) => Ok(map),
            _ => Err(anyhow::anyhow!(
                "{}: item {} is not a JSON object",
                path.display(),
                i
            )),
        })
        .collect()
}

/// Array read where a missing or malformed file is an empty collection.
pub fn read_pretty_tolerant(path: &Path) -> Vec<Entry> {
    if !path.exists() {
        return vec![];
    }
    match read_pretty_strict(path) {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "unreadable array file treated as empty");
            vec![]
        }
    }
}

pub fn sha256_file(path: &Path) -> anyhow::Result<String> {
    use sha2::{Digest, Sha256};
    let bytes = std::fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(hex::encode(hasher.finalize()))
}
