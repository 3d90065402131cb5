//! Local save target for downloaded documents

use log::{debug, warn};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Where downloaded content ends up
///
/// The client-side equivalent of a browser's save-as: called only after a
/// successful response.
pub trait SaveTarget: Send + Sync {
    /// Store `content` under (a variant of) `filename`, returning the final path
    fn save(&self, filename: &str, content: &[u8]) -> io::Result<PathBuf>;
}

/// Saves into a directory, never overwriting an existing file
///
/// A clash gets a numbered name: `report.pdf`, `report (1).pdf`, ...
pub struct DownloadDir {
    dir: PathBuf,
    open_after_save: bool,
}

/// Give up on numbering after this many clashes
const MAX_NAME_ATTEMPTS: u32 = 1000;

impl DownloadDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            open_after_save: false,
        }
    }

    /// Hand each saved file to the platform's default application
    pub fn open_after_save(mut self, open: bool) -> Self {
        self.open_after_save = open;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl SaveTarget for DownloadDir {
    fn save(&self, filename: &str, content: &[u8]) -> io::Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let name = sanitize_filename(filename);

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let path = self.dir.join(numbered(&name, attempt));
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    file.write_all(content)?;
                    file.flush()?;
                    debug!("Saved {} bytes to {}", content.len(), path.display());
                    if self.open_after_save {
                        if let Err(e) = open::that_detached(&path) {
                            warn!("Failed to open {}: {}", path.display(), e);
                        }
                    }
                    return Ok(path);
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e),
            }
        }

        Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("No free file name for {name}"),
        ))
    }
}

/// Reduce a server-provided name to a single safe path component
pub fn sanitize_filename(filename: &str) -> String {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| match c {
            ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let trimmed = cleaned.trim().trim_matches('.');
    if trimmed.is_empty() {
        "document".to_string()
    } else {
        trimmed.to_string()
    }
}

fn numbered(name: &str, attempt: u32) -> String {
    if attempt == 0 {
        return name.to_string();
    }
    match name.rfind('.') {
        Some(dot) if dot > 0 => format!("{} ({}){}", &name[..dot], attempt, &name[dot..]),
        _ => format!("{name} ({attempt})"),
    }
}
