//! # Keyboard Shortcuts
//!
//! Shortcut descriptions (`"mod-shift-z"`) and the key-event normalization
//! that matches them. The `mod` token resolves to the platform primary
//! modifier (Cmd on mac, Ctrl elsewhere), so command definitions stay
//! platform-neutral.

use serde::{Deserialize, Serialize};

/// Host platform, for primary-modifier resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
    Mac,
    Other,
}

impl Platform {
    /// Platform of the running process.
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::Mac
        } else {
            Platform::Other
        }
    }
}

/// A normalized key press as delivered by the UI layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyInput {
    /// Key name, case-insensitive (`"z"`, `"enter"`, `"arrowdown"`).
    pub key: String,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl KeyInput {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ctrl: false,
            alt: false,
            shift: false,
            meta: false,
        }
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn meta(mut self) -> Self {
        self.meta = true;
        self
    }
}

/// A platform-neutral shortcut description: dash-separated modifier tokens
/// (`mod`, `ctrl`, `alt`, `shift`, `meta`) followed by a key name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Shortcut(pub &'static str);

impl Shortcut {
    /// Whether `input` triggers this shortcut on `platform`.
    ///
    /// Unknown modifier tokens make the shortcut unmatched rather than
    /// panicking: a bad built-in definition shows up in tests, not at a
    /// user's keystroke.
    pub fn matches(&self, platform: Platform, input: &KeyInput) -> bool {
        let mut want_ctrl = false;
        let mut want_alt = false;
        let mut want_shift = false;
        let mut want_meta = false;
        let mut want_key: Option<&str> = None;

        for token in self.0.split('-') {
            match token {
                "mod" => match platform {
                    Platform::Mac => want_meta = true,
                    Platform::Other => want_ctrl = true,
                },
                "ctrl" => want_ctrl = true,
                "alt" => want_alt = true,
                "shift" => want_shift = true,
                "meta" => want_meta = true,
                key => {
                    if want_key.is_some() {
                        return false;
                    }
                    want_key = Some(key);
                }
            }
        }

        let Some(key) = want_key.filter(|k| !k.is_empty()) else {
            return false;
        };

        input.key.eq_ignore_ascii_case(key)
            && input.ctrl == want_ctrl
            && input.alt == want_alt
            && input.shift == want_shift
            && input.meta == want_meta
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mod_resolves_per_platform() {
        let shortcut = Shortcut("mod-z");
        assert!(shortcut.matches(Platform::Other, &KeyInput::new("z").ctrl()));
        assert!(!shortcut.matches(Platform::Other, &KeyInput::new("z").meta()));

        assert!(shortcut.matches(Platform::Mac, &KeyInput::new("z").meta()));
        assert!(!shortcut.matches(Platform::Mac, &KeyInput::new("z").ctrl()));
    }

    #[test]
    fn test_extra_modifiers_do_not_match() {
        let shortcut = Shortcut("mod-z");
        assert!(!shortcut.matches(Platform::Other, &KeyInput::new("z").ctrl().shift()));
    }

    #[test]
    fn test_multi_modifier_shortcut() {
        let shortcut = Shortcut("mod-shift-z");
        assert!(shortcut.matches(Platform::Other, &KeyInput::new("Z").ctrl().shift()));
        assert!(!shortcut.matches(Platform::Other, &KeyInput::new("z").ctrl()));
    }

    #[test]
    fn test_key_name_is_case_insensitive() {
        let shortcut = Shortcut("mod-enter");
        assert!(shortcut.matches(Platform::Other, &KeyInput::new("Enter").ctrl()));
    }

    #[test]
    fn test_malformed_shortcut_never_matches() {
        let shortcut = Shortcut("mod-");
        assert!(!shortcut.matches(Platform::Other, &KeyInput::new("").ctrl()));
    }
}
