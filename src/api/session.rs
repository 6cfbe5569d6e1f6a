use std::fs;
use std::path::PathBuf;

use tracing::{debug, warn};

// Explicit session object holding the bearer token, passed to whichever
// component attaches authorization. Persisted to a single file so the token
// survives restarts; cleared on logout and on any 401.
#[derive(Debug)]
pub struct Session {
    token: Option<String>,
    path: PathBuf,
}

impl Session {
    pub fn load(path: PathBuf) -> Self {
        let token = match fs::read_to_string(&path) {
            Ok(contents) => {
                let trimmed = contents.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    debug!(path = %path.display(), "restored stored credential");
                    Some(trimmed.to_string())
                }
            }
            Err(_) => None,
        };
        Self { token, path }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    // Persistence is best effort; a write failure keeps the in-memory token
    // for the current session.
    pub fn store(&mut self, token: String) {
        if let Err(err) = fs::write(&self.path, &token) {
            warn!(path = %self.path.display(), error = %err, "failed to persist credential");
        }
        self.token = Some(token);
    }

    pub fn clear(&mut self) {
        self.token = None;
        match fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "stored credential removed"),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "failed to remove credential")
            }
        }
    }
}
