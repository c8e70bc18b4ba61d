use {
    crate::{Error, Result, routing::is_valid_path},
    serde::Deserialize,
};

///
/// Configuration applied to every `Router` built through `Router::with_config`.
///
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct RouterConfig {
    /// Path prefix prepended to every route registered after construction,
    /// e.g. `/api`. The bare root path `/` is treated as "no prefix".
    #[serde(default)]
    pub prefix: Option<String>,
}

impl RouterConfig {
    /// Rejects a prefix that would never be accepted by `Router::set_prefix`,
    /// so that a typo in a config file is reported instead of silently ignored.
    pub fn validate(&self) -> Result<()> {
        match &self.prefix {
            Some(prefix) if !is_valid_path(prefix) => Err(Error::config(format!(
                "router prefix '{prefix}' is not a valid route path"
            ))),
            _ => Ok(()),
        }
    }
}
