/// Convenience result type used across phototag.
pub type PhototagResult<T> = Result<T, PhototagError>;

/// Top-level error taxonomy used by the layout and compositing APIs.
#[derive(thiserror::Error, Debug)]
pub enum PhototagError {
    /// Invalid render configuration or input data.
    #[error("validation error: {0}")]
    Validation(String),

    /// A required image could not be loaded or decoded. Fatal for the render.
    #[error("resource load failed for '{url}': {reason}")]
    ResourceLoad {
        /// Resolved URL of the failing resource.
        url: String,
        /// Loader or decoder message.
        reason: String,
    },

    /// The configured font family could not be made ready.
    #[error("font error: {0}")]
    Font(String),

    /// Errors raised by a drawing backend while compositing.
    #[error("render error: {0}")]
    Render(String),

    /// An operation was requested in a render state that does not allow it.
    #[error("state error: {0}")]
    State(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PhototagError {
    /// Build a [`PhototagError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PhototagError::ResourceLoad`] value.
    pub fn resource_load(url: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::ResourceLoad {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Build a [`PhototagError::Font`] value.
    pub fn font(msg: impl Into<String>) -> Self {
        Self::Font(msg.into())
    }

    /// Build a [`PhototagError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`PhototagError::State`] value.
    pub fn state(msg: impl Into<String>) -> Self {
        Self::State(msg.into())
    }

    /// True for [`PhototagError::ResourceLoad`].
    pub fn is_resource_load(&self) -> bool {
        matches!(self, Self::ResourceLoad { .. })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
