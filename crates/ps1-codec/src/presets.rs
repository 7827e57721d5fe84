use std::collections::HashMap;

use tracing::debug;

use crate::element::BuilderState;
use crate::error::{
    CodecError,
    Result,
};
use crate::parser;

/// Built-in prompt strings loadable by name.
pub struct PresetManager {
    builtin_presets: HashMap<&'static str, &'static str>,
}

impl Default for PresetManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PresetManager {
    pub fn new() -> Self {
        let mut builtin_presets = HashMap::new();
        builtin_presets.insert("minimal", "\\$ ");
        builtin_presets.insert("classic", "\\u@\\h:\\w\\$ ");
        builtin_presets.insert(
            "colorful",
            "\\[\\e[1;32m\\]\\u@\\h\\[\\e[0m\\]:\\[\\e[1;34m\\]\\w\\[\\e[0m\\]\\$ ",
        );
        builtin_presets.insert(
            "git",
            "\\[\\e[36m\\]\\w\\[\\e[0m\\] \\[\\e[33m\\]$(git branch --show-current 2>/dev/null)\\[\\e[0m\\] \\$ ",
        );
        builtin_presets.insert(
            "two-line",
            "\\[\\e[2m\\][\\t]\\[\\e[0m\\] \\u@\\H \\[\\e[1m\\]\\w\\[\\e[0m\\]\\n\\[\\e[35m\\]\u{276f}\\[\\e[0m\\] ",
        );

        Self { builtin_presets }
    }

    pub fn list_presets(&self) -> Vec<&'static str> {
        let mut presets: Vec<_> = self.builtin_presets.keys().copied().collect();
        presets.sort_unstable();
        presets
    }

    /// Raw prompt string of a preset.
    pub fn load_raw(&self, name: &str) -> Result<&'static str> {
        self.builtin_presets
            .get(name)
            .copied()
            .ok_or_else(|| CodecError::PresetNotFound(name.to_string()))
    }

    /// Preset decoded into a builder state.
    pub fn load_preset(&self, name: &str) -> Result<BuilderState> {
        let raw = self.load_raw(name)?;
        debug!(name, "loading preset");
        Ok(parser::parse(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementKind;
    use crate::generator;

    #[test]
    fn test_load_preset_non_existent() {
        let manager = PresetManager::new();

        let result = manager.load_raw("non_existent");
        assert_eq!(result, Err(CodecError::PresetNotFound("non_existent".to_string())));
        assert!(
            manager
                .load_preset("non_existent")
                .unwrap_err()
                .to_string()
                .contains("Preset 'non_existent' not found")
        );
    }

    #[test]
    fn test_load_raw_builtin() {
        let manager = PresetManager::new();
        assert_eq!(manager.load_raw("minimal").unwrap(), "\\$ ");
        assert_eq!(manager.load_raw("classic").unwrap(), "\\u@\\h:\\w\\$ ");
    }

    #[test]
    fn test_list_presets_sorted() {
        let manager = PresetManager::new();
        assert_eq!(
            manager.list_presets(),
            vec!["classic", "colorful", "git", "minimal", "two-line"]
        );
    }

    #[test]
    fn test_git_preset_elements() {
        let state = PresetManager::new().load_preset("git").unwrap();
        let kinds: Vec<_> = state.elements.iter().map(|element| element.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ElementKind::WorkingDirectory,
                ElementKind::Text,
                ElementKind::GitBranch,
                ElementKind::Text,
                ElementKind::PromptSign,
                ElementKind::Text,
            ]
        );
        assert!(state.elements[0].style.is_some());
        assert!(state.elements[1].style.is_none());
    }

    #[test]
    fn test_presets_are_stable_after_one_cycle() {
        let manager = PresetManager::new();
        for name in manager.list_presets() {
            let first = generator::generate(&manager.load_preset(name).unwrap()).unwrap();
            let second = generator::generate(&parser::parse(&first)).unwrap();
            assert_eq!(first, second, "{name}");
        }
    }
}
