//! Owner-only permissions for files holding user secrets.

use std::borrow::Cow;
use std::io;
use std::path::Path;

#[aegis_derive::aegis_error]
pub enum PermissionError {
    #[error("Permission change failed{}: {source}", format_context(.context))]
    Io { source: io::Error, context: Option<Cow<'static, str>> },
}

/// Read/write for the owner, nothing for group or others.
pub const OWNER_READ_WRITE: u32 = 0o600;

/// What happened to a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hardening {
    /// Mode was changed to owner read/write.
    Restricted,
    /// Mode already was owner read/write.
    Unchanged,
    /// The file does not exist.
    Missing,
    /// The platform has no POSIX permission bits.
    Unsupported,
}

/// Restricts `path` to [`OWNER_READ_WRITE`]. Safe to call repeatedly.
pub fn restrict_to_owner(path: &Path) -> Result<Hardening, PermissionError> {
    let metadata = match path.metadata() {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Hardening::Missing),
        Err(source) => {
            return Err(PermissionError::Io {
                source,
                context: Some(format!("Failed to stat {}", path.display()).into()),
            });
        },
    };

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let mut permissions = metadata.permissions();
        if permissions.mode() & 0o777 == OWNER_READ_WRITE {
            return Ok(Hardening::Unchanged);
        }
        if permissions.mode() & 0o077 != 0 {
            tracing::warn!(
                path = %path.display(),
                mode = format_args!("{:o}", permissions.mode() & 0o777),
                "Settings file accessible to group or others"
            );
        }
        permissions.set_mode(OWNER_READ_WRITE);
        std::fs::set_permissions(path, permissions)
            .context(format!("Failed to restrict {}", path.display()))?;
        tracing::debug!(path = %path.display(), "Permissions restricted to owner");
        Ok(Hardening::Restricted)
    }

    #[cfg(not(unix))]
    {
        let _ = metadata;
        Ok(Hardening::Unsupported)
    }
}

/// Applies [`restrict_to_owner`] to every path, stopping at the first error.
pub fn restrict_all<'a>(
    paths: impl IntoIterator<Item = &'a Path>,
) -> Result<Vec<Hardening>, PermissionError> {
    paths.into_iter().map(restrict_to_owner).collect()
}
