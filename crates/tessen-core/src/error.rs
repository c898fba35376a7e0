use thiserror::Error;

/// Errors raised while turning loaded settings into reader and writer options.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CoreError {
    /// A version token in the configuration is not `2.1`, `3.0` or `4.0`.
    #[error("{setting}: unknown vCard version \"{value}\"")]
    UnknownVersion {
        setting: &'static str,
        value: String,
    },
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
