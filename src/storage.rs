// File: ./src/storage.rs
/*!
Collaborator seams around the transcoder.

Fetching raw calendars and publishing finished ones are not part of the
transformation core. The runner only sees the two traits below. The
directory-backed implementations let the bundled binary work against files
downloaded (and later uploaded) by other tools.
*/

use crate::model::RosterEntry;
use crate::model::roster::sanitize;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Returns the raw upstream calendar text for a roster entry.
pub trait CalendarFetcher: Send + Sync {
    fn fetch(&self, entry: &RosterEntry) -> Result<String>;
}

/// Replaces the whole event set of `target` with `document`.
pub trait CalendarPublisher: Send + Sync {
    fn publish(&self, target: &str, entry: &RosterEntry, document: &str) -> Result<()>;
}

/// Writes via a sibling temp file and a rename, so readers never see a partial file.
pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> Result<()> {
    let path = path.as_ref();
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, contents)?;
    fs::rename(tmp_path, path)?;
    Ok(())
}

/// Reads `<dir>/<file_stem>.ics`.
#[derive(Debug, Clone)]
pub struct DirectoryFetcher {
    dir: PathBuf,
}

impl DirectoryFetcher {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, entry: &RosterEntry) -> PathBuf {
        self.dir.join(format!("{}.ics", entry.file_stem()))
    }
}

impl CalendarFetcher for DirectoryFetcher {
    fn fetch(&self, entry: &RosterEntry) -> Result<String> {
        let path = self.path_for(entry);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read calendar '{}'", path.display()))?;

        if data.trim().is_empty() {
            anyhow::bail!(
                "Downloaded file '{}' is empty. The calendar may not exist upstream.",
                path.display()
            );
        }
        if !data.contains("BEGIN:VCALENDAR") {
            anyhow::bail!(
                "'{}' is not a valid ICS file ({} bytes, no VCALENDAR). Upstream may have returned an error page.",
                path.display(),
                data.len()
            );
        }

        log::debug!(
            "Fetched {} ({} bytes) for {}",
            path.display(),
            data.len(),
            entry.team_path()
        );
        Ok(data)
    }
}

/// Writes `<dir>/<target>.ics`, replacing any previous document for that target.
#[derive(Debug, Clone)]
pub struct DirectoryPublisher {
    dir: PathBuf,
}

impl DirectoryPublisher {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, target: &str) -> PathBuf {
        // Calendar ids look like "abc123@group.calendar.google.com".
        self.dir
            .join(format!("{}.ics", sanitize(target, &['@', '.', '-', '_'])))
    }
}

impl CalendarPublisher for DirectoryPublisher {
    fn publish(&self, target: &str, entry: &RosterEntry, document: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create directory: {:?}", self.dir))?;
        let path = self.path_for(target);
        atomic_write(&path, document)
            .with_context(|| format!("Failed to write '{}'", path.display()))?;
        log::info!("Published {} to {}", entry.name, path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{AppContext, TestContext};

    #[test]
    fn test_fetch_rejects_error_pages() {
        let ctx = TestContext::new();
        let dir = ctx.get_download_dir().unwrap();
        fs::create_dir_all(&dir).unwrap();
        let entry = RosterEntry::new("Blocked", "1/2");
        let fetcher = DirectoryFetcher::new(&dir);

        fs::write(fetcher.path_for(&entry), "<html>challenge</html>").unwrap();
        let err = fetcher.fetch(&entry).unwrap_err();
        assert!(err.to_string().contains("not a valid ICS file"));

        fs::write(fetcher.path_for(&entry), "").unwrap();
        assert!(fetcher.fetch(&entry).is_err());
    }

    #[test]
    fn test_publish_replaces_previous_document() {
        let ctx = TestContext::new();
        let publisher = DirectoryPublisher::new(ctx.get_output_dir().unwrap());
        let entry = RosterEntry::new("Team", "1/2");

        publisher.publish("cal@group.example", &entry, "first").unwrap();
        publisher.publish("cal@group.example", &entry, "second").unwrap();

        let path = publisher.path_for("cal@group.example");
        assert!(path.ends_with("cal@group.example.ics"));
        assert_eq!(fs::read_to_string(path).unwrap(), "second");
    }
}
