use thiserror::Error;

/// Conversion failures. Every variant is fatal: the conversion aborts with
/// no partial output and no recovery.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DeckError {
    /// A token that is structurally incompatible with the flat text-run
    /// model reached the flattening path.
    #[error("'{kind}' tokens cannot be flattened into text runs")]
    UnsupportedToken { kind: &'static str },
    /// Inline markup other than the recognized line-break tag.
    #[error("unsupported inline markup {0:?}; only <br/> is recognized")]
    UnsupportedMarkup(String),
    /// Image-to-slide conversion is an explicit stub.
    #[error("image slides are not implemented")]
    NotImplemented,
}
