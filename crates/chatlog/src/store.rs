//! The transcript store: a flat Markdown file of timestamped message blocks.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Local;

/// Default file name of the backing transcript resource.
pub const DEFAULT_HISTORY_FILE: &str = "chat_history.md";

const TITLE_LINE: &str = "# Chat History";
const DELIMITER: &str = "---";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Authors that never count as the human side of the conversation.
const EXCLUDED_AUTHORS: &[&str] = &["assistant", "ai", "system", "bot"];

/// One timestamped, authored message block in the transcript.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    /// The heading line's timestamp text, kept verbatim.
    pub timestamp: String,
    /// The author name.
    pub author: String,
    /// The first line of the message body.
    pub body: String,
}

/// A message waiting to be appended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Draft {
    /// The author name.
    pub author: String,
    /// The message body.
    pub body: String,
    /// Timestamp stored verbatim; the current time is used when `None`.
    pub timestamp: Option<String>,
}

/// A transcript backed by a single Markdown file.
///
/// The store is constructed with the path it owns and is cheap to clone, so
/// each tool can carry its own copy. Exclusive, unsynchronized access to the
/// file is assumed: concurrent writers can interleave and corrupt the block
/// structure.
#[derive(Clone, Debug)]
pub struct TranscriptStore {
    path: PathBuf,
}

impl TranscriptStore {
    /// Creates a store backed by the file at `path`.
    ///
    /// The file itself is created lazily on first access.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path of the backing file.
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the backing file with a fresh header if it does not exist.
    ///
    /// Calling this repeatedly never duplicates the header.
    pub fn ensure_exists(&self) -> io::Result<()> {
        if self.path.exists() {
            return Ok(());
        }
        fs::write(&self.path, header("Created at"))?;
        debug!("created transcript at {}", self.path.display());
        Ok(())
    }

    /// Appends one entry block to the transcript.
    pub fn append(
        &self,
        author: &str,
        body: &str,
        timestamp: Option<&str>,
    ) -> io::Result<()> {
        self.ensure_exists()?;
        let timestamp = match timestamp {
            Some(timestamp) => timestamp.to_owned(),
            None => now_timestamp(),
        };
        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        file.write_all(entry_block(&timestamp, author, body).as_bytes())
    }

    /// Appends every draft in input order within one open handle.
    ///
    /// There is no rollback: drafts written before a failure stay in the
    /// file. Returns the number of entries written.
    pub fn append_batch(&self, drafts: &[Draft]) -> io::Result<usize> {
        self.ensure_exists()?;
        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        let mut written = 0;
        for draft in drafts {
            let timestamp = match &draft.timestamp {
                Some(timestamp) => timestamp.clone(),
                None => now_timestamp(),
            };
            let block = entry_block(&timestamp, &draft.author, &draft.body);
            file.write_all(block.as_bytes())?;
            written += 1;
        }
        Ok(written)
    }

    /// Returns the full transcript content verbatim.
    pub fn read(&self) -> io::Result<String> {
        self.ensure_exists()?;
        fs::read_to_string(&self.path)
    }

    /// Returns the last `limit` lines of the raw content.
    ///
    /// This is a line-count tail, not an entry-count tail: one entry spans
    /// several lines, so `limit` does not equal a number of entries. A
    /// `limit` beyond the total line count returns everything.
    pub fn tail(&self, limit: usize) -> io::Result<String> {
        let content = self.read()?;
        let lines: Vec<&str> = content.split('\n').collect();
        let start = lines.len().saturating_sub(limit);
        Ok(lines[start..].join("\n"))
    }

    /// Parses every entry block out of the transcript.
    pub fn entries(&self) -> io::Result<Vec<Entry>> {
        Ok(parse_entries(&self.read()?))
    }

    /// Returns the second-most-recent message authored by a human.
    ///
    /// Entries whose author matches the excluded set are skipped. The most
    /// recent qualifying entry is taken to be the message currently being
    /// answered, so the one before it is the lookup target; when only one
    /// qualifying entry exists, its body is returned.
    pub fn last_user_message(&self) -> io::Result<Option<String>> {
        let mut qualifying: Vec<Entry> = self
            .entries()?
            .into_iter()
            .filter(|entry| !is_excluded(&entry.author))
            .collect();
        let message = match qualifying.len() {
            0 => None,
            1 => Some(qualifying.remove(0).body),
            len => Some(qualifying.swap_remove(len - 2).body),
        };
        Ok(message)
    }

    /// Overwrites the transcript with a fresh header.
    ///
    /// Every prior entry is discarded unconditionally and irrecoverably.
    pub fn clear(&self) -> io::Result<()> {
        fs::write(&self.path, header("Recreated at"))?;
        debug!("cleared transcript at {}", self.path.display());
        Ok(())
    }
}

fn header(marker: &str) -> String {
    format!(
        "{TITLE_LINE}\n\n*{marker}: {}*\n\n{DELIMITER}\n\n",
        now_timestamp()
    )
}

fn entry_block(timestamp: &str, author: &str, body: &str) -> String {
    format!("## {timestamp}\n\n**{author}**: {body}\n\n{DELIMITER}\n\n")
}

fn now_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

fn is_excluded(author: &str) -> bool {
    EXCLUDED_AUTHORS
        .iter()
        .any(|excluded| author.eq_ignore_ascii_case(excluded))
}

/// Recognizes the three-line block grammar: a `## ` heading line, a blank
/// line, then a `**<author>**: <message>` line where the author contains no
/// `*`. Malformed blocks are skipped silently, and only the first line of a
/// multi-line body is captured.
fn parse_entries(content: &str) -> Vec<Entry> {
    let lines: Vec<&str> = content.lines().collect();
    let mut entries = Vec::new();
    let mut index = 0;
    while index + 2 < lines.len() {
        let Some(timestamp) = lines[index].strip_prefix("## ") else {
            index += 1;
            continue;
        };
        if !lines[index + 1].trim().is_empty() {
            index += 1;
            continue;
        }
        let Some((author, body)) = parse_message_line(lines[index + 2]) else {
            index += 1;
            continue;
        };
        entries.push(Entry {
            timestamp: timestamp.to_owned(),
            author,
            body,
        });
        index += 3;
    }
    entries
}

fn parse_message_line(line: &str) -> Option<(String, String)> {
    let rest = line.strip_prefix("**")?;
    let (author, body) = rest.split_once("**: ")?;
    if author.contains('*') {
        return None;
    }
    Some((author.to_owned(), body.to_owned()))
}
