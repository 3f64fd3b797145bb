//! Icons shipped with every theme.

/// Icon used when a requested identifier is unknown.
pub const DEFAULT_ICON: &str = "xx";

/// Built-in topic icons, in display order.
pub const STABLE_ICONS: &[&str] = &[
    "xx",
    "thumbup",
    "thumbdown",
    "exclamation",
    "question",
    "lamp",
    "smiley",
    "angry",
    "cheesy",
    "grin",
    "sad",
    "wink",
    "poll",
    "moved",
    "recycled",
    "wireless",
    "clip",
];
