use crate::newtypes::lifecycle_newtype;

lifecycle_newtype!(
    /// The ID of a buildpack.
    ///
    /// It MUST only contain numbers, letters, and the characters `.`, `/`, and `-`.
    /// It also MUST NOT be `config` or `app`.
    ///
    /// # Examples
    /// ```
    /// use lifecycle_data::buildpack::BuildpackId;
    ///
    /// let buildpack_id: BuildpackId = "heroku/jvm".parse().unwrap();
    /// assert_eq!(buildpack_id.escaped(), "heroku_jvm");
    ///
    /// let invalid: Result<BuildpackId, _> = "app".parse();
    /// assert!(invalid.is_err());
    /// ```
    BuildpackId,
    BuildpackIdError,
    r"^(?!app$|config$)[[:alnum:]./-]+$"
);

impl BuildpackId {
    /// The id in a form that can be used as a single path component, with `/` replaced by `_`.
    ///
    /// Buildpack directories in the buildpacks directory and the per-buildpack directories in
    /// the layers directory are named this way.
    #[must_use]
    pub fn escaped(&self) -> String {
        self.replace('/', "_")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn buildpack_id_does_not_allow_app() {
        let result = BuildpackId::from_str("app");
        assert!(result.is_err());
    }

    #[test]
    fn buildpack_id_does_not_allow_config() {
        let result = BuildpackId::from_str("config");
        assert!(result.is_err());
    }

    #[test]
    fn buildpack_id_allows_app_and_config_as_parts() {
        assert!(BuildpackId::from_str("app/config").is_ok());
        assert!(BuildpackId::from_str("heroku/app").is_ok());
    }

    #[test]
    fn buildpack_id_rejects_whitespace() {
        assert_eq!(
            BuildpackId::from_str("heroku java"),
            Err(BuildpackIdError::InvalidValue(String::from("heroku java")))
        );
    }

    #[test]
    fn escaped_replaces_all_slashes() {
        let id = BuildpackId::from_str("example.com/org/node").unwrap();
        assert_eq!(id.escaped(), "example.com_org_node");
    }
}
