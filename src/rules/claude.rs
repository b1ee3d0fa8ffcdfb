//! The Claude project-configuration scheme
//!
//! Current layout:
//! - `.claude/settings.json` — project settings, JSON object with
//!   `"version": 2`
//! - `.claude/settings.local.json` — per-user overrides, never migrated
//! - `CLAUDE.md` / `CLAUDE.local.md` — instructions and their local variant
//! - `.claude/commands/*.md` — one command per markdown file
//!
//! Legacy layout: a single `.claude.json` at the project root, or a
//! `.claude/settings.json` without a version field. Conversion inserts the
//! version field and relocates root-level settings into `.claude/`.

use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use crate::models::ArtifactKind;

use super::{Ruleset, ScanLocation};

/// Settings schema version the current scheme expects
pub const CURRENT_SETTINGS_VERSION: u64 = 2;

const LEGACY_SETTINGS: &str = ".claude.json";
const CURRENT_SETTINGS: &str = ".claude/settings.json";
const LOCAL_SETTINGS: &str = ".claude/settings.local.json";
const INSTRUCTIONS: &str = "CLAUDE.md";
const LOCAL_INSTRUCTIONS: &str = "CLAUDE.local.md";
const COMMANDS_DIR: &str = ".claude/commands";

/// Ruleset for the current Claude configuration scheme
#[derive(Debug, Clone, Default)]
pub struct ClaudeRules;

impl ClaudeRules {
    pub fn new() -> Self {
        Self
    }
}

impl Ruleset for ClaudeRules {
    fn name(&self) -> &str {
        "claude"
    }

    fn locations(&self) -> Vec<ScanLocation> {
        vec![
            ScanLocation::File(PathBuf::from(LEGACY_SETTINGS)),
            ScanLocation::File(PathBuf::from(CURRENT_SETTINGS)),
            ScanLocation::File(PathBuf::from(LOCAL_SETTINGS)),
            ScanLocation::File(PathBuf::from(INSTRUCTIONS)),
            ScanLocation::File(PathBuf::from(LOCAL_INSTRUCTIONS)),
            ScanLocation::Dir(PathBuf::from(COMMANDS_DIR)),
        ]
    }

    fn classify(&self, path: &Path, content: &[u8]) -> ArtifactKind {
        if path == Path::new(LEGACY_SETTINGS) {
            return match json_object(content) {
                Some(_) => ArtifactKind::Legacy,
                None => ArtifactKind::Unknown,
            };
        }

        if path == Path::new(CURRENT_SETTINGS) {
            return match json_object(content) {
                Some(obj) => match obj.get("version") {
                    None => ArtifactKind::Legacy,
                    Some(v) => match v.as_u64() {
                        Some(n) if n >= CURRENT_SETTINGS_VERSION => ArtifactKind::Current,
                        Some(_) => ArtifactKind::Legacy,
                        // A version field that isn't a number is nothing
                        // this scheme ever wrote
                        None => ArtifactKind::Unknown,
                    },
                },
                None => ArtifactKind::Unknown,
            };
        }

        if path == Path::new(LOCAL_SETTINGS) {
            return match json_object(content) {
                Some(_) => ArtifactKind::Custom,
                None => ArtifactKind::Unknown,
            };
        }

        if path == Path::new(INSTRUCTIONS) {
            return ArtifactKind::Current;
        }

        if path == Path::new(LOCAL_INSTRUCTIONS) {
            return ArtifactKind::Custom;
        }

        if path.starts_with(COMMANDS_DIR) {
            return if path.extension().map_or(false, |ext| ext == "md") {
                ArtifactKind::Current
            } else {
                ArtifactKind::Unknown
            };
        }

        ArtifactKind::Unknown
    }

    fn target_for(&self, path: &Path) -> Option<PathBuf> {
        if path == Path::new(LEGACY_SETTINGS) {
            Some(PathBuf::from(CURRENT_SETTINGS))
        } else {
            None
        }
    }

    fn render_current(&self, path: &Path, content: &[u8]) -> Option<String> {
        if path == Path::new(LEGACY_SETTINGS) || path == Path::new(CURRENT_SETTINGS) {
            let mut obj = json_object(content)?;
            obj.insert(
                "version".to_string(),
                Value::from(CURRENT_SETTINGS_VERSION),
            );
            render_object(&obj)
        } else {
            None
        }
    }

    fn stock_content(&self, path: &Path) -> Option<String> {
        if path == Path::new(CURRENT_SETTINGS) {
            let mut obj = Map::new();
            obj.insert(
                "version".to_string(),
                Value::from(CURRENT_SETTINGS_VERSION),
            );
            render_object(&obj)
        } else if path == Path::new(LOCAL_SETTINGS) {
            Some("{}\n".to_string())
        } else {
            None
        }
    }

    fn merge(&self, path: &Path, legacy: &[u8], existing: &[u8]) -> Option<String> {
        if path != Path::new(LEGACY_SETTINGS) && path != Path::new(CURRENT_SETTINGS) {
            return None;
        }

        let legacy_obj = json_object(legacy)?;
        let existing_obj = json_object(existing)?;

        // Shallow key union; whatever already occupies the destination wins
        let mut merged = legacy_obj;
        for (key, value) in existing_obj {
            merged.insert(key, value);
        }
        merged.insert(
            "version".to_string(),
            Value::from(CURRENT_SETTINGS_VERSION),
        );

        render_object(&merged)
    }

    fn custom_counterpart(&self, path: &Path) -> Option<PathBuf> {
        if path == Path::new(LEGACY_SETTINGS) || path == Path::new(CURRENT_SETTINGS) {
            Some(PathBuf::from(LOCAL_SETTINGS))
        } else if path == Path::new(INSTRUCTIONS) {
            Some(PathBuf::from(LOCAL_INSTRUCTIONS))
        } else {
            None
        }
    }
}

/// Parse content as a JSON object
fn json_object(content: &[u8]) -> Option<Map<String, Value>> {
    match serde_json::from_slice::<Value>(content) {
        Ok(Value::Object(obj)) => Some(obj),
        _ => None,
    }
}

/// Pretty-print an object with a trailing newline
fn render_object(obj: &Map<String, Value>) -> Option<String> {
    serde_json::to_string_pretty(&Value::Object(obj.clone()))
        .ok()
        .map(|s| s + "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> ClaudeRules {
        ClaudeRules::new()
    }

    #[test]
    fn test_classify_legacy_root_settings() {
        let path = Path::new(".claude.json");
        assert_eq!(
            rules().classify(path, br#"{"model": "opus"}"#),
            ArtifactKind::Legacy
        );
        assert_eq!(rules().classify(path, b"not json"), ArtifactKind::Unknown);
        assert_eq!(rules().classify(path, b"[1, 2]"), ArtifactKind::Unknown);
    }

    #[test]
    fn test_classify_current_settings() {
        let path = Path::new(".claude/settings.json");
        assert_eq!(
            rules().classify(path, br#"{"version": 2}"#),
            ArtifactKind::Current
        );
        assert_eq!(
            rules().classify(path, br#"{"version": 3, "extra": true}"#),
            ArtifactKind::Current
        );
        assert_eq!(
            rules().classify(path, br#"{"version": 1}"#),
            ArtifactKind::Legacy
        );
        assert_eq!(
            rules().classify(path, br#"{"model": "opus"}"#),
            ArtifactKind::Legacy
        );
        assert_eq!(
            rules().classify(path, br#"{"version": "two"}"#),
            ArtifactKind::Unknown
        );
        assert_eq!(rules().classify(path, b"garbage"), ArtifactKind::Unknown);
    }

    #[test]
    fn test_classify_local_settings() {
        let path = Path::new(".claude/settings.local.json");
        assert_eq!(
            rules().classify(path, br#"{"allowList": []}"#),
            ArtifactKind::Custom
        );
        assert_eq!(rules().classify(path, b"oops"), ArtifactKind::Unknown);
    }

    #[test]
    fn test_classify_markdown() {
        assert_eq!(
            rules().classify(Path::new("CLAUDE.md"), b"# Project notes\n"),
            ArtifactKind::Current
        );
        assert_eq!(
            rules().classify(Path::new("CLAUDE.local.md"), b"# Mine\n"),
            ArtifactKind::Custom
        );
    }

    #[test]
    fn test_classify_commands() {
        assert_eq!(
            rules().classify(Path::new(".claude/commands/review.md"), b"Review this"),
            ArtifactKind::Current
        );
        assert_eq!(
            rules().classify(Path::new(".claude/commands/script.sh"), b"#!/bin/sh"),
            ArtifactKind::Unknown
        );
    }

    #[test]
    fn test_target_relocates_root_settings_only() {
        assert_eq!(
            rules().target_for(Path::new(".claude.json")),
            Some(PathBuf::from(".claude/settings.json"))
        );
        assert_eq!(rules().target_for(Path::new(".claude/settings.json")), None);
        assert_eq!(rules().target_for(Path::new("CLAUDE.md")), None);
    }

    #[test]
    fn test_render_inserts_version() {
        let rendered = rules()
            .render_current(Path::new(".claude.json"), br#"{"model": "opus"}"#)
            .unwrap();
        let value: Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["version"], Value::from(CURRENT_SETTINGS_VERSION));
        assert_eq!(value["model"], Value::from("opus"));
        assert!(rendered.ends_with('\n'));
    }

    #[test]
    fn test_render_refuses_non_objects() {
        assert!(rules()
            .render_current(Path::new(".claude.json"), b"[]")
            .is_none());
        assert!(rules()
            .render_current(Path::new("CLAUDE.md"), b"# notes")
            .is_none());
    }

    #[test]
    fn test_rendered_output_classifies_current() {
        let rendered = rules()
            .render_current(Path::new(".claude.json"), br#"{"model": "opus"}"#)
            .unwrap();
        assert_eq!(
            rules().classify(Path::new(".claude/settings.json"), rendered.as_bytes()),
            ArtifactKind::Current
        );
    }

    #[test]
    fn test_merge_existing_wins() {
        let merged = rules()
            .merge(
                Path::new(".claude.json"),
                br#"{"model": "opus", "theme": "dark"}"#,
                br#"{"theme": "light"}"#,
            )
            .unwrap();
        let value: Value = serde_json::from_str(&merged).unwrap();
        assert_eq!(value["model"], Value::from("opus"));
        assert_eq!(value["theme"], Value::from("light"));
        assert_eq!(value["version"], Value::from(CURRENT_SETTINGS_VERSION));
    }

    #[test]
    fn test_merge_declared_for_settings_only() {
        assert!(rules()
            .merge(Path::new("CLAUDE.md"), b"# a", b"# b")
            .is_none());
        assert!(rules()
            .merge(Path::new(".claude.json"), b"not json", b"{}")
            .is_none());
    }

    #[test]
    fn test_stock_content() {
        let stock = rules()
            .stock_content(Path::new(".claude/settings.json"))
            .unwrap();
        assert_eq!(
            rules().classify(Path::new(".claude/settings.json"), stock.as_bytes()),
            ArtifactKind::Current
        );

        assert_eq!(
            rules()
                .stock_content(Path::new(".claude/settings.local.json"))
                .unwrap(),
            "{}\n"
        );
        assert!(rules().stock_content(Path::new("CLAUDE.local.md")).is_none());
    }

    #[test]
    fn test_custom_counterparts() {
        assert_eq!(
            rules().custom_counterpart(Path::new(".claude.json")),
            Some(PathBuf::from(".claude/settings.local.json"))
        );
        assert_eq!(
            rules().custom_counterpart(Path::new("CLAUDE.md")),
            Some(PathBuf::from("CLAUDE.local.md"))
        );
        assert_eq!(
            rules().custom_counterpart(Path::new(".claude/commands/go.md")),
            None
        );
    }
}
