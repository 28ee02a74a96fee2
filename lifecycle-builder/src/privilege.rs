//! Refuses to run buildpack code with elevated privileges.

/// Reports the privilege level of the running process.
pub trait PrivilegeQuery {
    /// Returns `true` if the process holds elevated (root) privileges.
    fn is_privileged(&self) -> bool;
}

/// Queries the privileges of the current process.
///
/// On unix, the process is privileged if its effective user id is `0`. Other platforms are
/// never considered privileged.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessPrivileges;

impl PrivilegeQuery for ProcessPrivileges {
    #[cfg(unix)]
    fn is_privileged(&self) -> bool {
        nix::unistd::Uid::effective().is_root()
    }

    #[cfg(not(unix))]
    fn is_privileged(&self) -> bool {
        false
    }
}

#[derive(thiserror::Error, Debug, Eq, PartialEq)]
pub enum PrivilegeError {
    #[error("refusing to run as root")]
    Privileged,
}

/// Fails if the given query reports elevated privileges.
pub fn ensure_not_privileged(query: &impl PrivilegeQuery) -> Result<(), PrivilegeError> {
    if query.is_privileged() {
        Err(PrivilegeError::Privileged)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedPrivileges(bool);

    impl PrivilegeQuery for FixedPrivileges {
        fn is_privileged(&self) -> bool {
            self.0
        }
    }

    #[test]
    fn privileged_process_is_refused() {
        let error = ensure_not_privileged(&FixedPrivileges(true)).unwrap_err();

        assert_eq!(error, PrivilegeError::Privileged);
        assert_eq!(error.to_string(), "refusing to run as root");
    }

    #[test]
    fn unprivileged_process_passes() {
        assert_eq!(ensure_not_privileged(&FixedPrivileges(false)), Ok(()));
    }
}
