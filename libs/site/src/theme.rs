//! Theme resolution and presentation variables

use common::models::{Fonts, Season, Theme, Themes, settings::is_font_family};

/// Theme for `season`, falling back to the `default` theme, then to the
/// built-in palette
pub fn resolve_theme(themes: &Themes, season: Season) -> Theme {
    themes
        .get(&season)
        .or_else(|| themes.get(&Season::Default))
        .cloned()
        .unwrap_or_default()
}

/// Presentation variables for a theme and font pair, in application order
pub fn css_variables(theme: &Theme, fonts: &Fonts) -> Vec<(&'static str, String)> {
    let defaults = Fonts::default();
    vec![
        ("--bg-primary", theme.bg_primary.clone()),
        ("--bg-secondary", theme.bg_secondary.clone()),
        ("--bg-card", theme.bg_card.clone()),
        ("--accent-primary", theme.accent_primary.clone()),
        ("--accent-secondary", theme.accent_secondary.clone()),
        ("--text-secondary", theme.text_secondary.clone()),
        (
            "--accent-gradient",
            format!(
                "linear-gradient(135deg, {} 0%, {} 100%)",
                theme.accent_primary, theme.accent_secondary
            ),
        ),
        ("--glow-primary", with_alpha(&theme.accent_primary, 0.4)),
        ("--glow-secondary", with_alpha(&theme.accent_secondary, 0.3)),
        ("--island-active-bg", theme.accent_primary.clone()),
        ("--island-active-text", theme.bg_primary.clone()),
        ("--font-heading", font_stack(&fonts.heading, &defaults.heading)),
        ("--font-body", font_stack(&fonts.body, &defaults.body)),
    ]
}

/// Render variables as a `:root` rule
pub fn render_root_rule(variables: &[(&'static str, String)]) -> String {
    let mut css = String::from(":root {\n");
    for (name, value) in variables {
        css.push_str(&format!("  {}: {};\n", name, value));
    }
    css.push('}');
    css
}

/// Families that would not survive inside the rule use `fallback`
fn font_stack(family: &str, fallback: &str) -> String {
    let family = if is_font_family(family) { family } else { fallback };
    format!("'{}', sans-serif", family)
}

/// Re-express a colour as `rgba(r, g, b, alpha)`
///
/// Hex colours (`#rgb`, `#rrggbb`, with or without alpha digits) and
/// `rgb()`/`rgba()` colours are converted; anything else is returned as is.
pub fn with_alpha(colour: &str, alpha: f32) -> String {
    match rgb_components(colour.trim()) {
        Some((r, g, b)) => format!("rgba({}, {}, {}, {})", r, g, b, alpha),
        None => colour.to_string(),
    }
}

fn rgb_components(colour: &str) -> Option<(u8, u8, u8)> {
    if let Some(hex) = colour.strip_prefix('#') {
        let channel = |digits: &str| u8::from_str_radix(digits, 16).ok();
        return match hex.len() {
            3 | 4 => {
                let double = |index: usize| {
                    let digit = hex.get(index..index + 1)?;
                    channel(&digit.repeat(2))
                };
                Some((double(0)?, double(1)?, double(2)?))
            }
            6 | 8 => Some((
                channel(hex.get(0..2)?)?,
                channel(hex.get(2..4)?)?,
                channel(hex.get(4..6)?)?,
            )),
            _ => None,
        };
    }

    let inner = colour
        .strip_prefix("rgba(")
        .or_else(|| colour.strip_prefix("rgb("))?
        .strip_suffix(')')?;
    let mut parts = inner.split(',').map(|part| part.trim().parse::<u8>().ok());
    Some((parts.next()??, parts.next()??, parts.next()??))
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::models::default_themes;

    #[test]
    fn test_resolve_theme_falls_back_to_default() {
        let themes = default_themes();
        assert_eq!(resolve_theme(&themes, Season::Winter).bg_primary, "#0a1628");

        let mut only_default = Themes::new();
        only_default.insert(Season::Default, themes[&Season::Summer].clone());
        assert_eq!(
            resolve_theme(&only_default, Season::Winter),
            themes[&Season::Summer]
        );

        assert_eq!(resolve_theme(&Themes::new(), Season::Rainy), Theme::default());
    }

    #[test]
    fn test_with_alpha() {
        assert_eq!(with_alpha("#8b5cf6", 0.4), "rgba(139, 92, 246, 0.4)");
        assert_eq!(with_alpha("#fff", 0.3), "rgba(255, 255, 255, 0.3)");
        assert_eq!(with_alpha("#06b6d4ff", 0.3), "rgba(6, 182, 212, 0.3)");
        assert_eq!(
            with_alpha("rgba(255, 200, 220, 0.6)", 0.4),
            "rgba(255, 200, 220, 0.4)"
        );
        assert_eq!(with_alpha("tomato", 0.4), "tomato");
        assert_eq!(with_alpha("#zzzzzz", 0.4), "#zzzzzz");
    }

    #[test]
    fn test_css_variables() {
        let theme = Theme::default();
        let variables = css_variables(&theme, &Fonts::default());
        let get = |name: &str| {
            variables
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.as_str())
        };

        assert_eq!(get("--bg-primary"), Some("#0a0a0b"));
        assert_eq!(
            get("--accent-gradient"),
            Some("linear-gradient(135deg, #8b5cf6 0%, #06b6d4 100%)")
        );
        assert_eq!(get("--glow-primary"), Some("rgba(139, 92, 246, 0.4)"));
        assert_eq!(get("--glow-secondary"), Some("rgba(6, 182, 212, 0.3)"));
        assert_eq!(get("--island-active-bg"), Some("#8b5cf6"));
        assert_eq!(get("--island-active-text"), Some("#0a0a0b"));
        assert_eq!(get("--font-heading"), Some("'Syne', sans-serif"));
        assert_eq!(get("--font-body"), Some("'Space Grotesk', sans-serif"));

        let injected = Fonts {
            heading: "Inter; } body { display: none".to_string(),
            body: "Work Sans".to_string(),
        };
        let variables_with_bad_font = css_variables(&theme, &injected);
        assert!(variables_with_bad_font.contains(&("--font-heading", "'Syne', sans-serif".to_string())));
        assert!(variables_with_bad_font.contains(&("--font-body", "'Work Sans', sans-serif".to_string())));

        let css = render_root_rule(&variables);
        assert!(css.starts_with(":root {\n  --bg-primary: #0a0a0b;\n"));
        assert!(css.ends_with("}"));
    }
}
