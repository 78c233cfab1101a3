use crate::Result;
use anyhow::Context;
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Write a file.
pub(crate) fn write(path: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, contents)
        .context(format!("Unable to write to {}", path.to_string_lossy()))
}

/// Write a file by writing a sibling temporary file and renaming it over `path`, so readers see
/// either the old or the new contents.
pub(crate) fn write_atomic(path: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> Result<()> {
    let path = path.as_ref();
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    write(&tmp, contents)?;
    rename(&tmp, path)
}

/// Read a file to a `String`.
pub fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file at {}", path.display()))
}

/// Deserialize a JSON file into type `T`.
pub fn deserialize<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned,
{
    let content = read(path)?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON file at {}", path.display()))
}

/// Basically move a file. Renames `from` -> `to`.
pub fn rename(from: impl AsRef<Path>, to: impl AsRef<Path>) -> Result<()> {
    std::fs::rename(from.as_ref(), to.as_ref()).with_context(|| {
        format!(
            "Unable to move file from '{}' to '{}'",
            from.as_ref().to_string_lossy(),
            to.as_ref().to_string_lossy()
        )
    })
}

pub(crate) fn make_dir(p: &Path) -> Result<()> {
    std::fs::create_dir_all(p)
        .with_context(|| format!("Unable to create directory at {}", p.to_string_lossy()))
}

pub(crate) fn canonicalize(p: &Path) -> Result<PathBuf> {
    std::fs::canonicalize(p)
        .with_context(|| format!("Unable to canonicalize the path {}", p.to_string_lossy()))
}

/// Returns today's local calendar date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub(crate) fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Generates a transaction ID of the form `txn_<unix millis>_<9 random characters>`.
///
/// Uniqueness relies on the clock and the random suffix, nothing checks for collisions.
pub fn generate_transaction_id() -> String {
    let millis = now().timestamp_millis();
    let random = Uuid::new_v4().simple().to_string();
    format!("txn_{millis}_{}", &random[..9])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DATE_FORMAT;
    use tempfile::TempDir;

    #[test]
    fn test_generate_transaction_id_shape() {
        let id = generate_transaction_id();
        let parts: Vec<&str> = id.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "txn");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 9);
        assert!(parts[2]
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_generate_transaction_id_unique() {
        let a = generate_transaction_id();
        let b = generate_transaction_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_today_formats_as_date() {
        let s = today().format(DATE_FORMAT).to_string();
        assert_eq!(s.len(), 10);
        assert_eq!(NaiveDate::parse_from_str(&s, DATE_FORMAT).unwrap(), today());
    }

    #[test]
    fn test_write_atomic_replaces() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.json");
        write_atomic(&path, "one").unwrap();
        write_atomic(&path, "two").unwrap();
        assert_eq!(read(&path).unwrap(), "two");
        assert!(!dir.path().join("data.json.tmp").exists());
    }

    #[test]
    fn test_deserialize_bad_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        write(&path, "{not json").unwrap();
        let err = deserialize::<serde_json::Value>(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse JSON file"));
    }
}
