use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// A Buildpack API or Platform API version.
///
/// This MUST be in form `<major>.<minor>` or `<major>`, where `<major>` is equivalent to `<major>.0`.
/// Versions are ordered by major, then minor component, so `0.10` is newer than `0.9`.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[serde(try_from = "String", into = "String")]
pub struct ApiVersion {
    pub major: u32,
    pub minor: u32,
}

impl ApiVersion {
    #[must_use]
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

impl FromStr for ApiVersion {
    type Err = ApiVersionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        // Not using the `semver` crate, since API versions are not of form `X.Y.Z`.
        // If no minor version is specified, it defaults to `0`.
        let (major, minor) = value.split_once('.').unwrap_or((value, "0"));

        let parse_component = |component: &str| {
            // `u32::from_str` accepts a leading `+`, which is not a valid API version.
            if component.is_empty() || !component.bytes().all(|byte| byte.is_ascii_digit()) {
                return Err(ApiVersionError::InvalidApiVersion(String::from(value)));
            }

            component
                .parse()
                .map_err(|_| ApiVersionError::InvalidApiVersion(String::from(value)))
        };

        Ok(Self {
            major: parse_component(major)?,
            minor: parse_component(minor)?,
        })
    }
}

impl TryFrom<String> for ApiVersion {
    type Error = ApiVersionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ApiVersion> for String {
    fn from(api_version: ApiVersion) -> Self {
        api_version.to_string()
    }
}

impl Display for ApiVersion {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}.{}", self.major, self.minor)
    }
}

#[derive(thiserror::Error, Debug, Eq, PartialEq)]
pub enum ApiVersionError {
    #[error("Invalid API version: `{0}`")]
    InvalidApiVersion(String),
}
