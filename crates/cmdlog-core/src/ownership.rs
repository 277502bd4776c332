//! Post-create hooks for the log file
//!
//! When an editor runs under `sudo`, a freshly created log file belongs to
//! root. [`SudoOwnership`] hands it back to the invoking user using the
//! `SUDO_UID`/`SUDO_GID` variables sudo exports. Hooks are best-effort: the
//! logger ignores their errors.

use std::fs::File;
use std::io;
use std::path::Path;
use tracing::debug;

/// Runs once each time the log file is opened, before the header is written
pub trait PostCreateHook: Send {
    /// Adjust the freshly opened file
    fn after_open(&self, file: &File, path: &Path) -> io::Result<()>;
}

/// Hook that does nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHook;

impl PostCreateHook for NoopHook {
    fn after_open(&self, _file: &File, _path: &Path) -> io::Result<()> {
        Ok(())
    }
}

/// Numeric owner to apply; `None` leaves that id unchanged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OwnerIds {
    /// User id
    pub uid: Option<u32>,
    /// Group id
    pub gid: Option<u32>,
}

impl OwnerIds {
    /// Read `SUDO_UID`/`SUDO_GID` through `lookup`
    ///
    /// Missing or unparsable values become `None`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let id = |name: &str| lookup(name).and_then(|value| value.trim().parse::<u32>().ok());
        Self {
            uid: id("SUDO_UID"),
            gid: id("SUDO_GID"),
        }
    }

    /// Whether there is anything to change
    pub fn is_empty(&self) -> bool {
        self.uid.is_none() && self.gid.is_none()
    }
}

/// Chowns the log file to the sudo-invoking user when running as root
pub struct SudoOwnership {
    is_privileged: Box<dyn Fn() -> bool + Send>,
    lookup: Box<dyn Fn(&str) -> Option<String> + Send>,
}

impl SudoOwnership {
    /// Hook that checks the real effective uid and process environment
    pub fn from_env() -> Self {
        Self {
            is_privileged: Box::new(effective_uid_is_root),
            lookup: Box::new(|name| std::env::var(name).ok()),
        }
    }

    /// Hook with an injected privilege check and variable lookup
    pub fn with<P, L>(is_privileged: P, lookup: L) -> Self
    where
        P: Fn() -> bool + Send + 'static,
        L: Fn(&str) -> Option<String> + Send + 'static,
    {
        Self {
            is_privileged: Box::new(is_privileged),
            lookup: Box::new(lookup),
        }
    }

    /// Owner the hook would apply, or `None` when not running privileged
    pub fn target_owner(&self) -> Option<OwnerIds> {
        if !(self.is_privileged)() {
            return None;
        }
        let ids = OwnerIds::from_lookup(&*self.lookup);
        (!ids.is_empty()).then_some(ids)
    }
}

impl std::fmt::Debug for SudoOwnership {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SudoOwnership").finish_non_exhaustive()
    }
}

impl PostCreateHook for SudoOwnership {
    fn after_open(&self, file: &File, path: &Path) -> io::Result<()> {
        let Some(ids) = self.target_owner() else {
            return Ok(());
        };
        debug!(
            "Handing {} to uid {:?} gid {:?}",
            path.display(),
            ids.uid,
            ids.gid
        );
        chown_file(file, ids)
    }
}

#[cfg(unix)]
fn effective_uid_is_root() -> bool {
    // SAFETY: geteuid has no preconditions and cannot fail
    unsafe { libc::geteuid() == 0 }
}

#[cfg(not(unix))]
fn effective_uid_is_root() -> bool {
    false
}

#[cfg(unix)]
fn chown_file(file: &File, ids: OwnerIds) -> io::Result<()> {
    std::os::unix::fs::fchown(file, ids.uid, ids.gid)
}

#[cfg(not(unix))]
fn chown_file(_file: &File, _ids: OwnerIds) -> io::Result<()> {
    Ok(())
}
