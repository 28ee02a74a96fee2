/// Macro to generate a newtype backed by `String` that is validated by a regular expression.
///
/// Automatically implements the following traits for the newtype:
/// - [`Clone`]
/// - [`Debug`]
/// - [`Display`](std::fmt::Display)
/// - [`Eq`]
/// - [`Hash`]
/// - [`Ord`]
/// - [`PartialEq`]
/// - [`PartialOrd`]
/// - [`serde::Deserialize`]
/// - [`serde::Serialize`]
/// - [`FromStr`](std::str::FromStr)
/// - [`Borrow<str>`](std::borrow::Borrow<str>)
/// - [`Deref<Target=String>`]
/// - [`AsRef<str>`]
///
/// Values are validated whenever they are parsed or deserialized, so an instance of the newtype
/// always holds a valid value. The regular expression is compiled once per newtype.
///
/// # Usage:
/// ```compile_fail
/// use crate::newtypes::lifecycle_newtype;
///
/// lifecycle_newtype!(
///     /// RustDoc for the newtype itself (optional)
///     BuildpackId,
///     /// RustDoc for the newtype error (optional)
///     BuildpackIdError,
///     // The regular expression that must match for the String to be valid. Uses the `fancy_regex`
///     // crate which supports negative lookarounds.
///     r"^[[:alnum:]./-]+$",
/// );
///
/// let bp_id = "bar".parse::<BuildpackId>().unwrap();
/// ```
macro_rules! lifecycle_newtype {
    (
        $(#[$type_attributes:meta])*
        $name:ident,
        $(#[$error_type_attributes:meta])*
        $error_name:ident,
        $regex:expr
    ) => {
        #[derive(Debug, Eq, PartialEq, ::serde::Serialize, Clone, Hash)]
        $(#[$type_attributes])*
        #[allow(unreachable_pub)]
        pub struct $name(String);

        #[derive(::thiserror::Error, Debug, Eq, PartialEq)]
        $(#[$error_type_attributes])*
        #[allow(unreachable_pub)]
        pub enum $error_name {
            InvalidValue(String),
        }

        impl ::std::fmt::Display for $error_name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
                match self {
                    Self::InvalidValue(value) => {
                        ::std::write!(f, "Invalid {}: `{}`", stringify!($name), value)
                    }
                }
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $error_name;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                static REGEX: ::std::sync::OnceLock<Option<::fancy_regex::Regex>> =
                    ::std::sync::OnceLock::new();

                let is_valid = REGEX
                    .get_or_init(|| ::fancy_regex::Regex::new($regex).ok())
                    .as_ref()
                    .is_some_and(|regex| regex.is_match(value).unwrap_or(false));

                if is_valid {
                    Ok(Self(String::from(value)))
                } else {
                    Err($error_name::InvalidValue(String::from(value)))
                }
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
                String::deserialize(d)?
                    .parse::<$name>()
                    .map_err(::serde::de::Error::custom)
            }
        }

        impl ::std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl ::std::ops::Deref for $name {
            type Target = String;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl ::std::convert::AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
                ::std::write!(f, "{}", self.0)
            }
        }

        impl ::std::cmp::Ord for $name {
            fn cmp(&self, other: &Self) -> ::std::cmp::Ordering {
                self.0.cmp(&other.0)
            }
        }

        impl ::std::cmp::PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<::std::cmp::Ordering> {
                Some(self.cmp(other))
            }
        }
    };
}

pub(crate) use lifecycle_newtype;

#[cfg(test)]
mod tests {
    use serde_test::{Token, assert_de_tokens, assert_de_tokens_error, assert_ser_tokens};

    lifecycle_newtype!(
        StageName,
        StageNameError,
        r"^(?!rebase$)[a-z][a-z-]*$"
    );

    fn stage(value: &str) -> StageName {
        value.parse().unwrap()
    }

    #[test]
    fn parse() {
        assert!("build".parse::<StageName>().is_ok());
        assert!("pre-export".parse::<StageName>().is_ok());

        assert_eq!(
            "Build".parse::<StageName>(),
            Err(StageNameError::InvalidValue(String::from("Build")))
        );

        assert_eq!(
            "rebase".parse::<StageName>(),
            Err(StageNameError::InvalidValue(String::from("rebase")))
        );
    }

    #[test]
    fn repeated_parsing() {
        for _ in 0..3 {
            assert!("export".parse::<StageName>().is_ok());
            assert!("".parse::<StageName>().is_err());
        }
    }

    #[test]
    fn error_message_names_the_type() {
        assert_eq!(
            "Build".parse::<StageName>().unwrap_err().to_string(),
            "Invalid StageName: `Build`"
        );
    }

    #[test]
    fn deref_and_borrow() {
        fn takes_str(value: &str) -> usize {
            value.len()
        }

        let detect = stage("detect");
        assert_eq!(takes_str(&detect), 6);
        assert_eq!(detect.as_str(), "detect");
    }

    #[test]
    fn ord() {
        let mut stages = [stage("export"), stage("build"), stage("detect")];
        stages.sort();

        assert_eq!([stage("build"), stage("detect"), stage("export")], stages);
    }

    #[test]
    fn serde() {
        assert_ser_tokens(
            &stage("build"),
            &[
                Token::NewtypeStruct { name: "StageName" },
                Token::Str("build"),
            ],
        );
        assert_de_tokens(&stage("analyze"), &[Token::Str("analyze")]);

        assert_de_tokens_error::<StageName>(
            &[Token::Str("rebase")],
            "Invalid StageName: `rebase`",
        );
    }
}
