use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use forum_settings::ThemeConfig;

use crate::defaults::{DEFAULT_ICON, STABLE_ICONS};
use crate::probe::{AssetProbe, FsProbe};
use crate::{CustomIcon, IconEntry};

type IconHook = Box<dyn FnOnce(&mut Vec<String>)>;

/// Resolved topic/message icons for one page render.
///
/// Two lookup policies share the same entry table:
/// - [`get`](Self::get) computes and caches an entry for unknown identifiers;
/// - [`icon_url`](Self::icon_url) / [`icon_name`](Self::icon_name) answer
///   unknown identifiers with the default icon and cache nothing.
pub struct MessageTopicIcons {
    check: bool,
    theme_dir: PathBuf,
    images_url: String,
    default_images_url: String,
    default_icon: String,
    probe: Box<dyn AssetProbe>,
    entries: Vec<IconEntry>,
    index: HashMap<String, usize>,
    default_idx: usize,
}

impl MessageTopicIcons {
    /// Start building a resolver from the theme and default-theme image URLs.
    pub fn builder(
        images_url: impl Into<String>,
        default_images_url: impl Into<String>,
    ) -> MessageTopicIconsBuilder {
        MessageTopicIconsBuilder {
            check: false,
            theme_dir: PathBuf::new(),
            images_url: images_url.into(),
            default_images_url: default_images_url.into(),
            custom: Vec::new(),
            default_icon: DEFAULT_ICON.to_string(),
            probe: Box::new(FsProbe),
            hook: None,
        }
    }

    /// Builder preloaded with the theme directory and both image URLs.
    pub fn from_theme(theme: &ThemeConfig) -> MessageTopicIconsBuilder {
        Self::builder(theme.images_url.clone(), theme.default_images_url.clone())
            .theme_dir(theme.theme_dir.clone())
    }

    /// Look up an icon, computing and caching an entry when it is not known yet.
    pub fn get(&mut self, icon: &str) -> &IconEntry {
        let idx = match self.index.get(icon).copied() {
            Some(idx) => idx,
            None => {
                let idx = self.insert(icon);
                tracing::debug!(icon, url = %self.entries[idx].url, "Added topic icon on demand");
                idx
            }
        };
        &self.entries[idx]
    }

    /// URL of the icon, or of the default icon when unknown.
    pub fn icon_url(&self, icon: &str) -> &str {
        &self.entry_or_default(icon).url
    }

    /// Name of the icon, or the default icon name when unknown.
    pub fn icon_name(&self, icon: &str) -> &str {
        &self.entry_or_default(icon).name
    }

    /// Entry for an identifier without any fallback.
    pub fn lookup(&self, icon: &str) -> Option<&IconEntry> {
        self.index.get(icon).map(|&idx| &self.entries[idx])
    }

    pub fn contains(&self, icon: &str) -> bool {
        self.index.contains_key(icon)
    }

    pub fn default_icon(&self) -> &str {
        &self.default_icon
    }

    /// The default icon's entry.
    pub fn default_entry(&self) -> &IconEntry {
        &self.entries[self.default_idx]
    }

    /// All entries in insertion order: built-ins, custom icons, hook
    /// additions, then anything added through [`get`](Self::get).
    pub fn entries(&self) -> &[IconEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &IconEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry_or_default(&self, icon: &str) -> &IconEntry {
        self.lookup(icon).unwrap_or_else(|| self.default_entry())
    }

    fn insert(&mut self, icon: &str) -> usize {
        let entry = self.compute_entry(icon);
        let idx = self.entries.len();
        self.entries.push(entry);
        self.index.insert(icon.to_string(), idx);
        idx
    }

    fn compute_entry(&self, icon: &str) -> IconEntry {
        let file = format!("{icon}.png");
        let base = if !self.check {
            &self.images_url
        } else if self
            .probe
            .exists(&self.theme_dir.join("images").join("post").join(&file))
        {
            &self.images_url
        } else {
            &self.default_images_url
        };

        IconEntry {
            name: icon.to_string(),
            url: format!("{base}/post/{file}"),
        }
    }
}

impl fmt::Debug for MessageTopicIcons {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageTopicIcons")
            .field("check", &self.check)
            .field("theme_dir", &self.theme_dir)
            .field("images_url", &self.images_url)
            .field("default_images_url", &self.default_images_url)
            .field("default_icon", &self.default_icon)
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

/// Builder for [`MessageTopicIcons`].
pub struct MessageTopicIconsBuilder {
    check: bool,
    theme_dir: PathBuf,
    images_url: String,
    default_images_url: String,
    custom: Vec<CustomIcon>,
    default_icon: String,
    probe: Box<dyn AssetProbe>,
    hook: Option<IconHook>,
}

impl MessageTopicIconsBuilder {
    /// Builder: verify each icon exists in the theme before using its URL.
    pub fn icon_check(mut self, val: bool) -> Self {
        self.check = val;
        self
    }

    /// Builder: set the active theme directory.
    pub fn theme_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.theme_dir = dir.into();
        self
    }

    /// Builder: icons to load in addition to the built-in set.
    pub fn custom_icons(mut self, custom: impl IntoIterator<Item = CustomIcon>) -> Self {
        self.custom.extend(custom);
        self
    }

    /// Builder: set the icon returned for unknown identifiers.
    pub fn default_icon(mut self, icon: impl Into<String>) -> Self {
        self.default_icon = icon.into();
        self
    }

    /// Builder: replace the filesystem existence check.
    pub fn probe(mut self, probe: impl AssetProbe + 'static) -> Self {
        self.probe = Box::new(probe);
        self
    }

    /// Builder: callback that may add to the list of known icon identifiers
    /// before their entries are computed.
    pub fn icon_hook(mut self, hook: impl FnOnce(&mut Vec<String>) + 'static) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }

    pub fn build(self) -> MessageTopicIcons {
        let mut names: Vec<String> = STABLE_ICONS.iter().map(|s| s.to_string()).collect();
        names.extend(self.custom.into_iter().map(|icon| icon.first_icon));
        if let Some(hook) = self.hook {
            hook(&mut names);
        }

        let mut icons = MessageTopicIcons {
            check: self.check,
            theme_dir: self.theme_dir,
            images_url: self.images_url,
            default_images_url: self.default_images_url,
            default_icon: self.default_icon,
            probe: self.probe,
            entries: Vec::with_capacity(names.len()),
            index: HashMap::with_capacity(names.len()),
            default_idx: 0,
        };

        for name in &names {
            if !icons.index.contains_key(name.as_str()) {
                icons.insert(name);
            }
        }

        let default_icon = icons.default_icon.clone();
        icons.default_idx = match icons.index.get(default_icon.as_str()).copied() {
            Some(idx) => idx,
            None => {
                tracing::warn!(icon = %default_icon, "Default topic icon is not a known icon");
                icons.insert(&default_icon)
            }
        };

        tracing::debug!(count = icons.len(), check = icons.check, "Topic icons loaded");
        icons
    }
}
