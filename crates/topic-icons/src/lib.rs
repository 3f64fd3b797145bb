//! Topic and message icon resolution.
//!
//! Maps an icon identifier ("smiley", "xx", ...) to a display name and an
//! image URL below the active theme, falling back to the default theme when
//! the asset is missing and to a default icon when the identifier is unknown.

pub mod defaults;
pub mod probe;
mod resolver;
#[cfg(test)]
mod tests;

pub use probe::{AssetProbe, FsProbe};
pub use resolver::{MessageTopicIcons, MessageTopicIconsBuilder};

use serde::{Deserialize, Serialize};

/// A resolved icon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconEntry {
    pub name: String,
    pub url: String,
}

/// A board-specific icon definition. Only `first_icon` is read; any other
/// fields in the source data are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomIcon {
    pub first_icon: String,
}

impl CustomIcon {
    pub fn new(first_icon: impl Into<String>) -> Self {
        Self {
            first_icon: first_icon.into(),
        }
    }
}
