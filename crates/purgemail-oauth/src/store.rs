//! Persistent credential storage.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::token::Token;

/// Default credential location, relative to the working directory.
pub const DEFAULT_TOKEN_PATH: &str = "token.json";

/// Durable storage for a single credential.
pub trait TokenStore {
    /// Loads the stored credential.
    ///
    /// Returns `None` when nothing usable is stored, including when the
    /// record exists but cannot be parsed.
    fn load(&self) -> Option<Token>;

    /// Replaces the stored credential.
    ///
    /// # Errors
    ///
    /// Returns an error if the credential could not be written.
    fn save(&self, token: &Token) -> Result<()>;
}

/// JSON file backed [`TokenStore`].
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Creates a store at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileTokenStore {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_PATH)
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<Token> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                debug!("No stored credential at {}: {e}", self.path.display());
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(token) => Some(token),
            Err(e) => {
                warn!(
                    "Ignoring unparsable credential file {}: {e}",
                    self.path.display()
                );
                None
            }
        }
    }

    fn save(&self, token: &Token) -> Result<()> {
        info!("Saving credential file to: {}", self.path.display());

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(&self.path)?;
        serde_json::to_writer(&mut file, token)?;
        file.write_all(b"\n")?;
        file.sync_all()?;
        Ok(())
    }
}
