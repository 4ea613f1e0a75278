//! Centralized viewer options with TOML preset support.
//!
//! Camera, selection, outline and keybinding settings are consolidated
//! here. Options serialize to/from TOML for presets stored in
//! `assets/presets/`.

mod camera;
mod keybindings;
mod outline;
mod selection;

use std::path::Path;

pub use camera::CameraOptions;
pub use keybindings::KeybindingOptions;
pub use outline::OutlineOptions;
use schemars::JsonSchema;
pub use selection::SelectionOptions;
use serde::{Deserialize, Serialize};

use crate::error::ViewerError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[outline]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Camera projection and orbit control parameters.
    pub camera: CameraOptions,
    /// Picking and gesture parameters.
    pub selection: SelectionOptions,
    /// Hover and selection outline appearance.
    pub outline: OutlineOptions,
    /// Keyboard binding options.
    #[schemars(skip)]
    pub keybindings: KeybindingOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Parse options from a TOML string. Missing fields use defaults.
    pub fn from_toml(content: &str) -> Result<Self, ViewerError> {
        let mut options: Self = toml::from_str(content)
            .map_err(|e| ViewerError::OptionsParse(e.to_string()))?;
        options.keybindings.rebuild_reverse_map();
        Ok(options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, ViewerError> {
        let content =
            std::fs::read_to_string(path).map_err(ViewerError::Io)?;
        let options = Self::from_toml(&content)?;
        log::info!("loaded options from {}", path.display());
        Ok(options)
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), ViewerError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ViewerError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ViewerError::Io)?;
        }
        std::fs::write(path, content).map_err(ViewerError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyAction;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed = Options::from_toml(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[selection]
click_threshold_px = 8.0
";
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(opts.selection.click_threshold_px, 8.0);
        // Everything else should be default
        assert_eq!(opts.selection.double_click_ms, 300);
        assert_eq!(opts.camera.fovy, 75.0);
        assert_eq!(opts.outline.hover_opacity, 0.8);
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let err = Options::from_toml("[camera]\nfovy = \"wide\"").unwrap_err();
        assert!(matches!(err, ViewerError::OptionsParse(_)));
    }

    #[test]
    fn keybinding_lookup() {
        let opts = Options::default();
        assert_eq!(
            opts.keybindings.lookup("KeyS"),
            Some(KeyAction::ToggleSelecting)
        );
        assert_eq!(
            opts.keybindings.lookup("KeyX"),
            Some(KeyAction::SwitchContexts)
        );
        assert_eq!(opts.keybindings.lookup("KeyZ"), None);
    }

    #[test]
    fn loaded_keybindings_rebuild_reverse_map() {
        let toml_str = r#"
[keybindings.bindings]
toggle_selecting = "KeyP"
"#;
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(
            opts.keybindings.lookup("KeyP"),
            Some(KeyAction::ToggleSelecting)
        );
        assert_eq!(opts.keybindings.lookup("KeyS"), None);
    }

    #[test]
    fn save_load_and_list_presets() {
        let dir = std::env::temp_dir()
            .join(format!("detview-presets-{}", std::process::id()));
        let mut opts = Options::default();
        opts.outline.hover_opacity = 0.5;
        opts.save(&dir.join("dim.toml")).unwrap();
        let loaded = Options::load(&dir.join("dim.toml")).unwrap();
        assert_eq!(loaded, opts);
        assert_eq!(Options::list_presets(&dir), vec!["dim".to_owned()]);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn bundled_presets_parse() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/presets");
        let names = Options::list_presets(&dir);
        assert!(names.contains(&"presentation".to_owned()));
        for name in names {
            let opts = Options::load(&dir.join(format!("{name}.toml"))).unwrap();
            assert!(opts.camera.fovy > 0.0, "{name}");
        }
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("camera"));
        assert!(props.contains_key("selection"));
        assert!(props.contains_key("outline"));
        assert!(!props.contains_key("keybindings"));

        let camera = &props["camera"]["properties"];
        assert!(camera.get("fovy").is_some());
        assert!(camera.get("znear").is_none());
    }
}
