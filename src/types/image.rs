//! Image types: the raw markup descriptor and the persisted records.

use serde::{Deserialize, Serialize};

/// Attributes of an `<img>` element as they appeared in the infobox,
/// before any resolution against the site base URL.
///
/// All fields are raw attribute strings; interpretation (absolutizing,
/// integer parsing, srcset splitting) belongs to the image resolver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawImage {
    pub src: Option<String>,
    pub srcset: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
}

/// Fields for an image about to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewImage {
    /// Absolute URL of the canonical rendition. Empty when the markup
    /// carried no `src`.
    pub primary_src: String,

    pub width: Option<i64>,
    pub height: Option<i64>,
}

/// A persisted image.
///
/// Owns an ordered set of [`ImageVariant`]s; when that set is non-empty
/// it always contains `primary_src` itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Store-generated identifier.
    pub id: i64,

    /// Absolute URL of the canonical rendition.
    pub primary_src: String,

    pub width: Option<i64>,
    pub height: Option<i64>,
}

/// One alternate-resolution URL of a persisted image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageVariant {
    /// Store-generated identifier.
    pub id: i64,

    /// Owning image.
    pub image_id: i64,

    /// Absolute variant URL.
    pub url: String,
}
