//! Renderer configuration.
//!
//! Handles loading, validating, and merging `config.toml`. The parser has no
//! configuration: the markup alone decides the document. What can be tuned
//! is how the page looks and what its fixed headings say.
//!
//! ## Config File Location
//!
//! `config.toml` is looked up next to the walkthrough source, or passed
//! explicitly with `--config`:
//!
//! ```text
//! walkthroughs/
//! ├── config.toml          # Optional, applies to every walkthrough here
//! ├── lighthouse.wt
//! └── images/
//!     └── boat.png
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [labels]
//! checklist_heading = "Checklist"
//! by_section_heading = "All collectibles by section"
//! by_type_heading = "All collectibles by type"
//! dark_mode_toggle = "Dark mode"
//!
//! [colors.light]
//! background = "#f3f4f6"
//! text = "#111827"
//! text_muted = "#6b7280"
//! border = "#d1d5db"
//! link = "#4338ca"
//! accent = "#4f46e5"
//!
//! [colors.dark]
//! background = "#4b5563"
//! text = "#f9fafb"
//! text_muted = "#d1d5db"
//! border = "#6b7280"
//! link = "#c7d2fe"
//! accent = "#818cf8"
//! ```
//!
//! Config files are sparse: override just the values you want. Unknown keys
//! are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Renderer configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WalkthroughConfig {
    /// Fixed headings and button text.
    pub labels: LabelsConfig,
    /// Color schemes for light and dark modes.
    pub colors: ColorConfig,
}

impl WalkthroughConfig {
    /// Reject values the renderer cannot use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let labels = [
            ("labels.checklist_heading", &self.labels.checklist_heading),
            ("labels.by_section_heading", &self.labels.by_section_heading),
            ("labels.by_type_heading", &self.labels.by_type_heading),
            ("labels.dark_mode_toggle", &self.labels.dark_mode_toggle),
        ];
        for (key, value) in labels {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
        }
        Ok(())
    }
}

/// Headings rendered around the checklists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LabelsConfig {
    /// Heading of the checklist shown after each section.
    pub checklist_heading: String,
    /// Heading of the per-section rollup at the end of the page.
    pub by_section_heading: String,
    /// Heading of the per-type rollup at the end of the page.
    pub by_type_heading: String,
    /// Label of the dark mode switch.
    pub dark_mode_toggle: String,
}

impl Default for LabelsConfig {
    fn default() -> Self {
        Self {
            checklist_heading: "Checklist".to_string(),
            by_section_heading: "All collectibles by section".to_string(),
            by_type_heading: "All collectibles by type".to_string(),
            dark_mode_toggle: "Dark mode".to_string(),
        }
    }
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub light: ColorScheme,
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    pub background: String,
    pub text: String,
    /// Secondary text: rollup section prefixes, counters.
    pub text_muted: String,
    pub border: String,
    pub link: String,
    /// Checkbox and toggle color.
    pub accent: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#f3f4f6".to_string(),
            text: "#111827".to_string(),
            text_muted: "#6b7280".to_string(),
            border: "#d1d5db".to_string(),
            link: "#4338ca".to_string(),
            accent: "#4f46e5".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#4b5563".to_string(),
            text: "#f9fafb".to_string(),
            text_muted: "#d1d5db".to_string(),
            border: "#6b7280".to_string(),
            link: "#c7d2fe".to_string(),
            accent: "#818cf8".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(WalkthroughConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value. `Ok(None)` if it does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<WalkthroughConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: WalkthroughConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the config file at `path`, falling back to defaults when it is absent.
pub fn load_config_file(path: &Path) -> Result<WalkthroughConfig, ConfigError> {
    resolve_config(load_raw_config(path)?)
}

/// Load `config.toml` from the directory containing the walkthrough source.
pub fn load_config_for(source: &Path) -> Result<WalkthroughConfig, ConfigError> {
    let dir = source.parent().unwrap_or_else(|| Path::new("."));
    load_config_file(&dir.join(CONFIG_FILE_NAME))
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Walkthrough Configuration
# =========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file next to your walkthrough source as config.toml,
# or pass it explicitly with --config.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Labels
# ---------------------------------------------------------------------------
[labels]
# Heading of the checklist printed after every section.
checklist_heading = "Checklist"

# Headings of the two rollups at the end of the page.
by_section_heading = "All collectibles by section"
by_type_heading = "All collectibles by type"

# Text next to the dark mode switch.
dark_mode_toggle = "Dark mode"

# ---------------------------------------------------------------------------
# Colors - Light mode
# ---------------------------------------------------------------------------
[colors.light]
background = "#f3f4f6"
text = "#111827"
text_muted = "#6b7280"    # Rollup section prefixes, counters
border = "#d1d5db"
link = "#4338ca"
accent = "#4f46e5"        # Checkboxes, dark mode switch

# ---------------------------------------------------------------------------
# Colors - Dark mode (toggled on the page, remembered by the browser)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#4b5563"
text = "#f9fafb"
text_muted = "#d1d5db"
border = "#6b7280"
link = "#c7d2fe"
accent = "#818cf8"
"##
}

/// Generate CSS custom properties from color config.
///
/// Dark mode is a class on `<html>` rather than a media query because the
/// page has its own toggle.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
    --color-bg: {light_bg};
    --color-text: {light_text};
    --color-text-muted: {light_text_muted};
    --color-border: {light_border};
    --color-link: {light_link};
    --color-accent: {light_accent};
}}

:root.dark {{
    --color-bg: {dark_bg};
    --color-text: {dark_text};
    --color-text-muted: {dark_text_muted};
    --color-border: {dark_border};
    --color-link: {dark_link};
    --color-accent: {dark_accent};
}}"#,
        light_bg = colors.light.background,
        light_text = colors.light.text,
        light_text_muted = colors.light.text_muted,
        light_border = colors.light.border,
        light_link = colors.light.link,
        light_accent = colors.light.accent,
        dark_bg = colors.dark.background,
        dark_text = colors.dark.text,
        dark_text_muted = colors.dark.text_muted,
        dark_border = colors.dark.border,
        dark_link = colors.dark.link,
        dark_accent = colors.dark.accent,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_labels() {
        let config = WalkthroughConfig::default();
        assert_eq!(config.labels.checklist_heading, "Checklist");
        assert_eq!(config.labels.by_type_heading, "All collectibles by type");
    }

    #[test]
    fn parse_partial_config() {
        let toml = r##"
[colors.light]
background = "#fafafa"
"##;
        let config: WalkthroughConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.colors.light.background, "#fafafa");
        assert_eq!(config.colors.light.text, "#111827");
        assert_eq!(config.colors.dark.background, "#4b5563");
        assert_eq!(config.labels, LabelsConfig::default());
    }

    #[test]
    fn stock_config_matches_defaults() {
        let parsed: WalkthroughConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(parsed, WalkthroughConfig::default());
    }

    #[test]
    fn generate_css_uses_config_colors() {
        let mut colors = ColorConfig::default();
        colors.light.background = "#f0f0f0".to_string();
        colors.dark.background = "#1a1a1a".to_string();

        let css = generate_color_css(&colors);
        assert!(css.contains("--color-bg: #f0f0f0"));
        assert!(css.contains("--color-bg: #1a1a1a"));
        assert!(css.contains(":root.dark"));
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config_for(&tmp.path().join("game.wt")).unwrap();
        assert_eq!(config, WalkthroughConfig::default());
    }

    #[test]
    fn load_config_reads_file_next_to_source() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE_NAME),
            r##"
[labels]
checklist_heading = "Collectibles"

[colors.dark]
accent = "#ff00ff"
"##,
        )
        .unwrap();

        let config = load_config_for(&tmp.path().join("game.wt")).unwrap();
        assert_eq!(config.labels.checklist_heading, "Collectibles");
        assert_eq!(config.labels.by_section_heading, "All collectibles by section");
        assert_eq!(config.colors.dark.accent, "#ff00ff");
        assert_eq!(config.colors.dark.text, "#f9fafb");
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "this is not valid toml [[[").unwrap();

        let result = load_config_file(&path);
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn empty_label_rejected() {
        let overlay: toml::Value = toml::from_str("[labels]\nchecklist_heading = \"  \"").unwrap();
        let result = resolve_config(Some(overlay));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn unknown_key_rejected() {
        let overlay: toml::Value = toml::from_str("[labels]\nchecklist_title = \"x\"").unwrap();
        assert!(resolve_config(Some(overlay)).is_err());
    }

    #[test]
    fn unknown_section_rejected() {
        let overlay: toml::Value = toml::from_str("[fonts]\nsans = true").unwrap();
        assert!(resolve_config(Some(overlay)).is_err());
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("a = 1\nb = 2").unwrap();
        let overlay: toml::Value = toml::from_str("b = 3").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"].as_integer(), Some(1));
        assert_eq!(merged["b"].as_integer(), Some(3));
    }

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value =
            toml::from_str("[colors.light]\nbackground = \"#fff\"\ntext = \"#000\"").unwrap();
        let overlay: toml::Value = toml::from_str("[colors.light]\ntext = \"#111\"").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["colors"]["light"]["background"].as_str(), Some("#fff"));
        assert_eq!(merged["colors"]["light"]["text"].as_str(), Some("#111"));
    }
}
