use serde::Deserialize;

/// Settings for the request boundary.
///
/// Every field has a default, so a host can deserialize a partial document
/// (or nothing at all) and get a working boundary.
///
/// # Examples
///
/// ```
/// use pipeline_core::BoundaryConfig;
///
/// let config: BoundaryConfig =
///     serde_json::from_str(r#"{ "unhandled_message": "Something went wrong" }"#).unwrap();
///
/// assert_eq!(config.unhandled_message, "Something went wrong");
/// assert_eq!(config.not_found_message, "Resource not found");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BoundaryConfig {
    /// Message returned to callers for every unhandled failure
    pub unhandled_message: String,
    /// Message used when a handler reports a missing resource without detail
    pub not_found_message: String,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            unhandled_message: "An unexpected error occurred".to_string(),
            not_found_message: "Resource not found".to_string(),
        }
    }
}
