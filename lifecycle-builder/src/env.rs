use std::collections::BTreeMap;
use std::env;
use std::env::VarsOs;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::Path;

/// Variables from `<platform>/env` with these names are prepended to the existing value instead
/// of replacing it.
const PATH_LIKE_VARIABLES: &[&str] = &[
    "PATH",
    "LD_LIBRARY_PATH",
    "LIBRARY_PATH",
    "CPATH",
    "PKG_CONFIG_PATH",
];

pub(crate) const PATH_LIST_SEPARATOR: &str = ":";

/// A collection of environment variables.
///
/// The build stage captures the environment of its own process exactly once and hands the
/// snapshot to the execution engine. Later modifications of the process environment are not
/// reflected in a snapshot.
///
/// # Examples
/// ```
/// use lifecycle_builder::Env;
///
/// let mut env = Env::new();
/// env.insert("FOO", "BAR");
///
/// assert_eq!(env.get_string_lossy("FOO"), Some(String::from("BAR")));
/// assert!(!env.contains_key("BAZ"));
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Env {
    inner: BTreeMap<OsString, OsString>,
}

impl Env {
    /// Creates a new `Env` from all the environment variables of the current process.
    ///
    /// See [`std::env::vars_os`]
    #[must_use]
    pub fn from_current() -> Self {
        env::vars_os().into()
    }

    /// Creates an empty `Env` struct.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a key-value pair into the environment, overriding the value if `key` was already
    /// present.
    pub fn insert(&mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> &mut Self {
        self.inner.insert(key.into(), value.into());
        self
    }

    /// Returns the value corresponding to the given key.
    #[must_use]
    pub fn get(&self, key: impl AsRef<OsStr>) -> Option<&OsString> {
        self.inner.get(key.as_ref())
    }

    /// Returns the value corresponding to the given key, interpreted as Unicode data.
    ///
    /// See [`OsStr::to_string_lossy`] for details.
    #[must_use]
    pub fn get_string_lossy(&self, key: impl AsRef<OsStr>) -> Option<String> {
        self.get(key)
            .map(|os_string| os_string.to_string_lossy().to_string())
    }

    /// Returns true if the environment contains a value for the specified key.
    #[must_use]
    pub fn contains_key(&self, key: impl AsRef<OsStr>) -> bool {
        self.inner.contains_key(key.as_ref())
    }

    #[must_use]
    pub fn iter(&self) -> std::collections::btree_map::Iter<'_, OsString, OsString> {
        self.inner.iter()
    }

    /// Returns a copy of this environment with the user-provided variables from
    /// `<platform_dir>/env` applied.
    ///
    /// Each regular file in that directory is one variable, named after the file. A missing
    /// `env` directory is not an error.
    pub fn with_platform_env(&self, platform_dir: impl AsRef<Path>) -> io::Result<Self> {
        let mut result = self.clone();

        let entries = match fs::read_dir(platform_dir.as_ref().join("env")) {
            Ok(entries) => entries,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(result),
            Err(error) => return Err(error),
        };

        for entry in entries {
            let path = entry?.path();

            // k8s volume mounts will mount a directory symlink in, so we need to check
            // that it's actually a file
            if !path.is_file() {
                continue;
            }

            if let Some(name) = path.file_name() {
                #[cfg(target_family = "unix")]
                let value = {
                    use std::os::unix::ffi::OsStringExt;
                    OsString::from_vec(fs::read(&path)?)
                };
                #[cfg(not(target_family = "unix"))]
                let value = OsString::from(fs::read_to_string(&path)?);

                let is_path_like = name
                    .to_str()
                    .is_some_and(|name| PATH_LIKE_VARIABLES.contains(&name));

                match result.get(name).cloned() {
                    Some(previous) if is_path_like && !previous.is_empty() => {
                        let mut joined = value;
                        joined.push(PATH_LIST_SEPARATOR);
                        joined.push(previous);
                        result.insert(name, joined);
                    }
                    _ => {
                        result.insert(name, value);
                    }
                }
            }
        }

        Ok(result)
    }
}

impl From<VarsOs> for Env {
    fn from(vars_os: VarsOs) -> Self {
        Self {
            inner: vars_os.collect(),
        }
    }
}

impl<K: Into<OsString>, V: Into<OsString>> FromIterator<(K, V)> for Env {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            inner: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Env {
    type Item = (&'a OsString, &'a OsString);
    type IntoIter = std::collections::btree_map::Iter<'a, OsString, OsString>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(target_family = "unix")]
    fn into_iterator() {
        use std::process::Command;

        let mut env = Env::new();
        env.insert("FOO", "FOO");
        env.insert("FOO", "BAR");
        env.insert("BAZ", "BLAH");

        let output = Command::new("printenv")
            .env_clear()
            .envs(&env)
            .output()
            .unwrap();

        assert_eq!(
            "BAZ=BLAH\nFOO=BAR\n",
            String::from_utf8_lossy(&output.stdout)
        );
    }

    #[test]
    fn snapshot_is_not_affected_by_later_changes() {
        let env = Env::from_iter([("FOO", "BAR")]);
        let mut copy = env.clone();
        copy.insert("FOO", "CHANGED");

        assert_eq!(env.get_string_lossy("FOO"), Some(String::from("BAR")));
    }

    #[test]
    fn with_platform_env_overrides_and_prepends() {
        let temp_dir = tempfile::tempdir().unwrap();
        let env_dir = temp_dir.path().join("env");
        fs::create_dir(&env_dir).unwrap();
        fs::write(env_dir.join("JAVA_OPTS"), "-Xmx1g").unwrap();
        fs::write(env_dir.join("PATH"), "/platform/bin").unwrap();
        fs::create_dir(env_dir.join("some-dir")).unwrap();

        let env = Env::from_iter([("JAVA_OPTS", "-Xmx512m"), ("PATH", "/usr/bin")]);
        let result = env.with_platform_env(temp_dir.path()).unwrap();

        assert_eq!(
            result.get_string_lossy("JAVA_OPTS"),
            Some(String::from("-Xmx1g"))
        );
        assert_eq!(
            result.get_string_lossy("PATH"),
            Some(String::from("/platform/bin:/usr/bin"))
        );
        assert!(!result.contains_key("some-dir"));
        assert_eq!(env.get_string_lossy("PATH"), Some(String::from("/usr/bin")));
    }

    #[test]
    #[cfg(target_family = "unix")]
    fn with_platform_env_keeps_non_utf8_values() {
        use std::os::unix::ffi::OsStringExt;

        let temp_dir = tempfile::tempdir().unwrap();
        let env_dir = temp_dir.path().join("env");
        fs::create_dir(&env_dir).unwrap();
        fs::write(env_dir.join("RAW"), [0x66, 0x6f, 0x80]).unwrap();

        let result = Env::new().with_platform_env(temp_dir.path()).unwrap();

        assert_eq!(
            result.get("RAW"),
            Some(&OsString::from_vec(vec![0x66, 0x6f, 0x80]))
        );
    }

    #[test]
    fn with_platform_env_doesnt_blow_up_if_platform_env_is_missing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let env = Env::from_iter([("FOO", "BAR")]);

        assert_eq!(env.with_platform_env(temp_dir.path()).unwrap(), env);
    }
}
