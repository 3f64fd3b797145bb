use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use forum_settings::ThemeConfig;

use super::defaults::STABLE_ICONS;
use super::*;

const IMAGES: &str = "https://x/images";
const DEFAULT_IMAGES: &str = "https://x/default/images";

fn unchecked() -> MessageTopicIcons {
    MessageTopicIcons::builder(IMAGES, DEFAULT_IMAGES).build()
}

/// Resolver whose probe reports only `present` icons as existing.
fn checked(present: &'static [&'static str]) -> MessageTopicIcons {
    MessageTopicIcons::builder(IMAGES, DEFAULT_IMAGES)
        .icon_check(true)
        .theme_dir("/themes/dark")
        .probe(move |path: &Path| {
            present
                .iter()
                .any(|icon| path == Path::new(&format!("/themes/dark/images/post/{icon}.png")))
        })
        .build()
}

#[test]
fn test_builtin_icons_urls() {
    let icons = unchecked();
    for &icon in STABLE_ICONS {
        let url = icons.icon_url(icon);
        assert!(url.ends_with(&format!("/post/{icon}.png")), "{url}");
        assert_eq!(icons.icon_name(icon), icon);
    }
    assert_eq!(icons.len(), 17);
}

#[test]
fn test_unchecked_always_uses_theme_images() {
    let icons = MessageTopicIcons::builder(IMAGES, DEFAULT_IMAGES)
        .probe(|_: &Path| -> bool { panic!("probe must not be called") })
        .build();

    assert_eq!(icons.icon_url("smiley"), "https://x/images/post/smiley.png");
    assert_eq!(icons.icon_url("nonexistent"), "https://x/images/post/xx.png");
}

#[test]
fn test_checked_falls_back_to_default_images() {
    let icons = checked(&["smiley"]);
    assert_eq!(icons.icon_url("smiley"), "https://x/images/post/smiley.png");
    assert_eq!(icons.icon_url("grin"), "https://x/default/images/post/grin.png");
}

#[test]
fn test_probe_receives_theme_path() {
    let seen: Rc<RefCell<Vec<PathBuf>>> = Rc::default();
    let log = Rc::clone(&seen);
    let _icons = MessageTopicIcons::builder(IMAGES, DEFAULT_IMAGES)
        .icon_check(true)
        .theme_dir("/srv/forum/themes/default")
        .probe(move |path: &Path| {
            log.borrow_mut().push(path.to_path_buf());
            true
        })
        .build();

    let seen = seen.borrow();
    assert_eq!(seen.len(), 17);
    assert_eq!(
        seen[0],
        PathBuf::from("/srv/forum/themes/default/images/post/xx.png")
    );
}

#[test]
fn test_default_on_miss() {
    let icons = unchecked();
    assert_eq!(icons.icon_name("nonexistent"), "xx");
    assert_eq!(icons.icon_url("nonexistent"), icons.default_entry().url);
    // nothing cached on this path
    assert!(!icons.contains("nonexistent"));
    assert_eq!(icons.len(), 17);
}

#[test]
fn test_synthesize_on_miss() {
    let mut icons = unchecked();
    let entry = icons.get("rocket").clone();
    assert_eq!(
        entry,
        IconEntry {
            name: "rocket".into(),
            url: "https://x/images/post/rocket.png".into(),
        }
    );
    assert!(icons.contains("rocket"));
    assert_eq!(icons.len(), 18);

    // once cached, the default-on-miss accessors see it too
    assert_eq!(icons.icon_name("rocket"), "rocket");
}

#[test]
fn test_synthesized_entry_is_cached() {
    let calls = Rc::new(RefCell::new(0usize));
    let counter = Rc::clone(&calls);
    let mut icons = MessageTopicIcons::builder(IMAGES, DEFAULT_IMAGES)
        .icon_check(true)
        .theme_dir("/t")
        .probe(move |_: &Path| {
            *counter.borrow_mut() += 1;
            false
        })
        .build();

    let before = *calls.borrow();
    let first = icons.get("rocket").clone();
    let second = icons.get("rocket").clone();

    assert_eq!(first, second);
    assert_eq!(first.url, "https://x/default/images/post/rocket.png");
    assert_eq!(*calls.borrow(), before + 1);
}

#[test]
fn test_get_known_icon_does_not_recompute() {
    let mut icons = unchecked();
    assert_eq!(icons.get("lamp").url, "https://x/images/post/lamp.png");
    assert_eq!(icons.len(), 17);
}

#[test]
fn test_custom_icons_merge() {
    let icons = MessageTopicIcons::builder(IMAGES, DEFAULT_IMAGES)
        .custom_icons([CustomIcon::new("rocket"), CustomIcon::new("smiley")])
        .build();

    assert_eq!(icons.len(), 18);
    assert_eq!(icons.entries()[17].name, "rocket");
    assert_eq!(icons.icon_url("rocket"), "https://x/images/post/rocket.png");
    let names: Vec<&str> = icons.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(&names[..17], STABLE_ICONS);
}

#[test]
fn test_custom_icon_extra_fields_ignored() {
    let custom: Vec<CustomIcon> = serde_json::from_str(
        r#"[{"first_icon": "rocket", "title": "Rocket", "id_board": 3}]"#,
    )
    .unwrap();
    assert_eq!(custom, vec![CustomIcon::new("rocket")]);
}

#[test]
fn test_icon_hook_adds_icons() {
    let icons = MessageTopicIcons::builder(IMAGES, DEFAULT_IMAGES)
        .icon_hook(|names| names.push("addon".to_string()))
        .build();

    assert!(icons.contains("addon"));
    assert_eq!(icons.icon_name("addon"), "addon");
}

#[test]
fn test_custom_default_icon() {
    let icons = MessageTopicIcons::builder(IMAGES, DEFAULT_IMAGES)
        .default_icon("question")
        .build();

    assert_eq!(icons.default_icon(), "question");
    assert_eq!(icons.icon_name("nope"), "question");
    assert_eq!(icons.icon_url("nope"), "https://x/images/post/question.png");
}

#[test]
fn test_unknown_default_icon_is_materialized() {
    let icons = MessageTopicIcons::builder(IMAGES, DEFAULT_IMAGES)
        .default_icon("star")
        .build();

    assert!(icons.contains("star"));
    assert_eq!(icons.icon_url("nope"), "https://x/images/post/star.png");
}

#[test]
fn test_from_theme_with_real_files() {
    let dir = tempfile::tempdir().unwrap();
    let post = dir.path().join("images").join("post");
    std::fs::create_dir_all(&post).unwrap();
    std::fs::write(post.join("smiley.png"), b"png").unwrap();

    let theme = ThemeConfig {
        theme_dir: dir.path().to_path_buf(),
        images_url: IMAGES.into(),
        default_images_url: DEFAULT_IMAGES.into(),
    };
    let icons = MessageTopicIcons::from_theme(&theme).icon_check(true).build();

    assert_eq!(icons.icon_url("smiley"), "https://x/images/post/smiley.png");
    assert_eq!(icons.icon_url("sad"), "https://x/default/images/post/sad.png");
}

#[test]
fn test_entry_serializes() {
    let icons = unchecked();
    let json = serde_json::to_value(icons.default_entry()).unwrap();
    assert_eq!(json["name"], "xx");
    assert_eq!(json["url"], "https://x/images/post/xx.png");
}
