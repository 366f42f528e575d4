//! Site settings documents: seasonal themes, gallery backgrounds, fonts and
//! the active season
//!
//! Each document is stored whole under its own key. Updates name the document
//! through [`SettingsKind`], and the payload is parsed into the matching
//! [`SettingsDocument`] variant before anything is written.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::project::Category;

/// Seasonal look of the site
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    #[default]
    Default,
    Winter,
    Summer,
    Rainy,
    Spring,
}

impl Season {
    pub const ALL: [Season; 5] = [
        Season::Default,
        Season::Winter,
        Season::Summer,
        Season::Rainy,
        Season::Spring,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Season::Default => "default",
            Season::Winter => "winter",
            Season::Summer => "summer",
            Season::Rainy => "rainy",
            Season::Spring => "spring",
        }
    }

    /// Northern-hemisphere season for a calendar month (1 = January)
    pub fn from_month(month: u32) -> Season {
        match month {
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            9..=11 => Season::Rainy,
            _ => Season::Winter,
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Season {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Season::ALL
            .into_iter()
            .find(|season| season.as_str() == s)
            .ok_or_else(|| format!("Unknown season: {}", s))
    }
}

/// Colour palette applied for one season
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Theme {
    pub bg_primary: String,
    pub bg_secondary: String,
    pub bg_card: String,
    pub accent_primary: String,
    pub accent_secondary: String,
    pub text_secondary: String,
}

impl Theme {
    fn new(colours: [&str; 6]) -> Self {
        let [bg_primary, bg_secondary, bg_card, accent_primary, accent_secondary, text_secondary] =
            colours.map(str::to_string);
        Theme {
            bg_primary,
            bg_secondary,
            bg_card,
            accent_primary,
            accent_secondary,
            text_secondary,
        }
    }

    /// Wire name and value of every colour
    pub fn colours(&self) -> [(&'static str, &str); 6] {
        [
            ("bgPrimary", self.bg_primary.as_str()),
            ("bgSecondary", self.bg_secondary.as_str()),
            ("bgCard", self.bg_card.as_str()),
            ("accentPrimary", self.accent_primary.as_str()),
            ("accentSecondary", self.accent_secondary.as_str()),
            ("textSecondary", self.text_secondary.as_str()),
        ]
    }

    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in self.colours() {
            if !is_css_colour(value) {
                return Err(format!("Invalid colour for {}: {}", name, value));
            }
        }
        Ok(())
    }
}

/// The palette of the `default` season
impl Default for Theme {
    fn default() -> Self {
        Theme::new([
            "#0a0a0b",
            "#111113",
            "#161618",
            "#8b5cf6",
            "#06b6d4",
            "rgba(255, 255, 255, 0.6)",
        ])
    }
}

/// Accepts `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `rgb(...)` and `rgba(...)`
pub fn is_css_colour(value: &str) -> bool {
    static COLOUR_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = COLOUR_REGEX.get_or_init(|| {
        Regex::new(
            r"^(?:#(?:[0-9a-fA-F]{3,4}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})|rgba?\(\s*\d{1,3}\s*,\s*\d{1,3}\s*,\s*\d{1,3}\s*(?:,\s*(?:0|1|0?\.\d+|1\.0+)\s*)?\))$",
        )
        .expect("Failed to compile colour regex")
    });
    regex.is_match(value.trim())
}

pub type Themes = BTreeMap<Season, Theme>;

/// Background image URL per gallery; empty means the built-in background
pub type Backgrounds = BTreeMap<Category, String>;

/// Font families used by the site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Fonts {
    pub heading: String,
    pub body: String,
}

impl Fonts {
    pub fn validate(&self) -> Result<(), String> {
        for (name, family) in [("heading", &self.heading), ("body", &self.body)] {
            if !is_font_family(family) {
                return Err(format!("Invalid font family for {}: {}", name, family));
            }
        }
        Ok(())
    }
}

/// Accepts family names made of letters, digits, spaces and hyphens
pub fn is_font_family(value: &str) -> bool {
    static FONT_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = FONT_REGEX.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9 \-]{0,63}$").expect("Failed to compile font regex")
    });
    regex.is_match(value)
}

impl Default for Fonts {
    fn default() -> Self {
        Fonts {
            heading: "Syne".to_string(),
            body: "Space Grotesk".to_string(),
        }
    }
}

/// Palettes used until an admin saves their own
pub fn default_themes() -> Themes {
    Themes::from([
        (Season::Default, Theme::default()),
        (
            Season::Winter,
            Theme::new([
                "#0a1628",
                "#0f1f35",
                "#152842",
                "#60a5fa",
                "#38bdf8",
                "rgba(200, 220, 255, 0.6)",
            ]),
        ),
        (
            Season::Summer,
            Theme::new([
                "#1a0f00",
                "#2d1800",
                "#3d2200",
                "#f59e0b",
                "#fbbf24",
                "rgba(255, 220, 180, 0.6)",
            ]),
        ),
        (
            Season::Rainy,
            Theme::new([
                "#0a0d12",
                "#0f1419",
                "#151c25",
                "#64748b",
                "#475569",
                "rgba(180, 190, 200, 0.6)",
            ]),
        ),
        (
            Season::Spring,
            Theme::new([
                "#0f0a14",
                "#1a1020",
                "#251530",
                "#f472b6",
                "#fb7185",
                "rgba(255, 200, 220, 0.6)",
            ]),
        ),
    ])
}

/// Everything the public site needs to style itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsBundle {
    pub themes: Themes,
    pub backgrounds: Backgrounds,
    pub fonts: Fonts,
    pub season: Season,
}

impl Default for SettingsBundle {
    fn default() -> Self {
        SettingsBundle {
            themes: default_themes(),
            backgrounds: Backgrounds::new(),
            fonts: Fonts::default(),
            season: Season::Default,
        }
    }
}

/// The settings documents an admin may replace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingsKind {
    Themes,
    Backgrounds,
    Fonts,
    Season,
}

impl SettingsKind {
    pub const ALL: [SettingsKind; 4] = [
        SettingsKind::Themes,
        SettingsKind::Backgrounds,
        SettingsKind::Fonts,
        SettingsKind::Season,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SettingsKind::Themes => "themes",
            SettingsKind::Backgrounds => "backgrounds",
            SettingsKind::Fonts => "fonts",
            SettingsKind::Season => "season",
        }
    }

    /// Store key holding this document
    pub fn key(self) -> String {
        format!("settings:{}", self.as_str())
    }
}

impl fmt::Display for SettingsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingsKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SettingsKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| "Invalid settings type".to_string())
    }
}

/// A validated settings document, ready to be stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsDocument {
    Themes(Themes),
    Backgrounds(Backgrounds),
    Fonts(Fonts),
    Season(Season),
}

impl SettingsDocument {
    /// Parse and validate `data` as the document named by `kind`
    pub fn parse(kind: SettingsKind, data: Value) -> Result<Self, String> {
        let invalid = |e: serde_json::Error| format!("Invalid {} data: {}", kind, e);

        let document = match kind {
            SettingsKind::Themes => {
                let themes: Themes = serde_json::from_value(data).map_err(invalid)?;
                for (season, theme) in &themes {
                    theme
                        .validate()
                        .map_err(|e| format!("Invalid {} theme: {}", season, e))?;
                }
                SettingsDocument::Themes(themes)
            }
            SettingsKind::Backgrounds => {
                SettingsDocument::Backgrounds(serde_json::from_value(data).map_err(invalid)?)
            }
            SettingsKind::Fonts => {
                let fonts: Fonts = serde_json::from_value(data).map_err(invalid)?;
                fonts.validate()?;
                SettingsDocument::Fonts(fonts)
            }
            SettingsKind::Season => {
                SettingsDocument::Season(serde_json::from_value(data).map_err(invalid)?)
            }
        };

        Ok(document)
    }

    pub fn kind(&self) -> SettingsKind {
        match self {
            SettingsDocument::Themes(_) => SettingsKind::Themes,
            SettingsDocument::Backgrounds(_) => SettingsKind::Backgrounds,
            SettingsDocument::Fonts(_) => SettingsKind::Fonts,
            SettingsDocument::Season(_) => SettingsKind::Season,
        }
    }

    /// The document as it is written to the store
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        match self {
            SettingsDocument::Themes(themes) => serde_json::to_value(themes),
            SettingsDocument::Backgrounds(backgrounds) => serde_json::to_value(backgrounds),
            SettingsDocument::Fonts(fonts) => serde_json::to_value(fonts),
            SettingsDocument::Season(season) => serde_json::to_value(season),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_bundle_wire_format() {
        let value = serde_json::to_value(SettingsBundle::default()).unwrap();
        assert_eq!(value["season"], json!("default"));
        assert_eq!(value["fonts"], json!({"heading": "Syne", "body": "Space Grotesk"}));
        assert_eq!(value["backgrounds"], json!({}));
        assert_eq!(value["themes"]["winter"]["accentPrimary"], json!("#60a5fa"));
        assert_eq!(value["themes"].as_object().unwrap().len(), 5);
    }

    #[test]
    fn test_default_themes_are_valid() {
        for theme in default_themes().values() {
            assert_eq!(theme.validate(), Ok(()));
        }
    }

    #[test]
    fn test_settings_kind_is_closed() {
        assert_eq!("fonts".parse::<SettingsKind>(), Ok(SettingsKind::Fonts));
        assert_eq!(
            "projects".parse::<SettingsKind>(),
            Err("Invalid settings type".to_string())
        );
        assert!("Themes".parse::<SettingsKind>().is_err());
        assert_eq!(SettingsKind::Season.key(), "settings:season");
    }

    #[test]
    fn test_parse_documents() {
        let season = SettingsDocument::parse(SettingsKind::Season, json!("winter")).unwrap();
        assert_eq!(season, SettingsDocument::Season(Season::Winter));

        let backgrounds = SettingsDocument::parse(
            SettingsKind::Backgrounds,
            json!({"REELS": "https://cdn.example.com/reels.jpg", "POSTERS": ""}),
        )
        .unwrap();
        assert_eq!(backgrounds.kind(), SettingsKind::Backgrounds);

        let fonts = SettingsDocument::parse(
            SettingsKind::Fonts,
            json!({"heading": "Inter", "body": "Inter"}),
        )
        .unwrap();
        assert_eq!(
            fonts.to_value().unwrap(),
            json!({"heading": "Inter", "body": "Inter"})
        );
    }

    #[test]
    fn test_parse_rejects_unknown_keys_and_values() {
        assert!(SettingsDocument::parse(SettingsKind::Season, json!("autumn")).is_err());
        assert!(
            SettingsDocument::parse(SettingsKind::Backgrounds, json!({"MUSIC": "x.jpg"})).is_err()
        );
        assert!(
            SettingsDocument::parse(
                SettingsKind::Fonts,
                json!({"heading": "Syne", "body": "Inter", "mono": "Fira"})
            )
            .is_err()
        );
        assert!(
            SettingsDocument::parse(SettingsKind::Fonts, json!({"heading": "", "body": "Inter"}))
                .is_err()
        );

        let mut theme = serde_json::to_value(&default_themes()[&Season::Default]).unwrap();
        theme["bgCard"] = json!("url(javascript:alert(1))");
        let err = SettingsDocument::parse(SettingsKind::Themes, json!({ "default": theme }))
            .unwrap_err();
        assert!(err.contains("bgCard"));
    }

    #[test]
    fn test_css_colours() {
        assert!(is_css_colour("#fff"));
        assert!(is_css_colour("#8b5cf6"));
        assert!(is_css_colour("#8b5cf680"));
        assert!(is_css_colour("rgb(1, 2, 3)"));
        assert!(is_css_colour("rgba(255, 255, 255, 0.6)"));
        assert!(!is_css_colour("#12"));
        assert!(!is_css_colour("red; background: url(x)"));
    }

    #[test]
    fn test_font_families() {
        assert!(is_font_family("Syne"));
        assert!(is_font_family("Space Grotesk"));
        assert!(is_font_family("IBM Plex Sans-Condensed"));
        assert!(!is_font_family(""));
        assert!(!is_font_family(" Inter"));
        assert!(!is_font_family("Inter;}"));
        assert!(!is_font_family("Inter\n--bg-primary: red"));
        assert!(!is_font_family("'Inter'"));

        let err = SettingsDocument::parse(
            SettingsKind::Fonts,
            json!({"heading": "Syne", "body": "x; } body { display: none"}),
        )
        .unwrap_err();
        assert!(err.contains("body"));
    }

    #[test]
    fn test_season_from_month() {
        assert_eq!(Season::from_month(1), Season::Winter);
        assert_eq!(Season::from_month(3), Season::Spring);
        assert_eq!(Season::from_month(7), Season::Summer);
        assert_eq!(Season::from_month(10), Season::Rainy);
        assert_eq!(Season::from_month(12), Season::Winter);
    }
}
