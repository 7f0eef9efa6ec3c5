use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Key binding configuration
#[derive(Debug, Clone)]
pub struct KeyBinding {
    pub key: KeyCode,
    pub modifiers: KeyModifiers,
    pub description: String,
}

impl KeyBinding {
    pub fn new(key: KeyCode, modifiers: KeyModifiers, description: &str) -> Self {
        Self {
            key,
            modifiers,
            description: description.to_string(),
        }
    }

    pub fn matches(&self, event: &KeyEvent) -> bool {
        self.key == event.code && self.modifiers == event.modifiers
    }
}

/// Application key mappings
#[derive(Debug, Clone)]
pub struct KeyMap {
    /// Quit application
    pub quit: KeyBinding,

    /// Quit while no dialog is open
    pub quit_idle: KeyBinding,

    /// Show help
    pub help: KeyBinding,

    /// Open the dialog stack
    pub open: KeyBinding,

    /// Alternative open key
    pub open_alt: KeyBinding,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            quit: KeyBinding::new(
                KeyCode::Char('c'),
                KeyModifiers::CONTROL,
                "Ctrl+C  Quit application"
            ),
            quit_idle: KeyBinding::new(
                KeyCode::Char('q'),
                KeyModifiers::NONE,
                "q       Quit (when no dialog is open)"
            ),
            help: KeyBinding::new(
                KeyCode::Char('g'),
                KeyModifiers::CONTROL,
                "Ctrl+G  Show/hide help"
            ),
            open: KeyBinding::new(
                KeyCode::Enter,
                KeyModifiers::NONE,
                "Enter   Show the dialogs"
            ),
            open_alt: KeyBinding::new(
                KeyCode::Char('o'),
                KeyModifiers::NONE,
                "o       Show the dialogs"
            ),
        }
    }
}

impl KeyMap {
    /// Check if the event should quit the application
    pub fn should_quit(&self, event: &KeyEvent, dialogs_open: bool) -> bool {
        self.quit.matches(event) || (!dialogs_open && self.quit_idle.matches(event))
    }

    /// Check if the event should show help
    pub fn should_show_help(&self, event: &KeyEvent) -> bool {
        self.help.matches(event)
    }

    /// Check if the event should open the dialog stack
    pub fn should_open(&self, event: &KeyEvent) -> bool {
        self.open.matches(event) || self.open_alt.matches(event)
    }

    /// Get help text for all key bindings
    pub fn help_text(&self) -> String {
        [
            &self.quit,
            &self.quit_idle,
            &self.help,
            &self.open,
            &self.open_alt,
        ]
        .iter()
        .map(|binding| binding.description.as_str())
        .collect::<Vec<_>>()
        .join("\n")
    }
}
