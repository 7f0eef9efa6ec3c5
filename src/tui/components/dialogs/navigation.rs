//! Previous/Next controls for a dialog frame
//!
//! Every frame in the stack carries both buttons. Only the current frame
//! can have enabled buttons; the others draw theirs disabled so the layout
//! never shifts as the cursor moves.

use super::sequence::StackCallbacks;
use super::types::NavigationAction;
use crate::tui::styles::Theme;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::Span,
    widgets::Widget,
};
use std::collections::HashMap;
use unicode_width::UnicodeWidthStr;

pub const PREVIOUS_LABEL: &str = " ◀ Previous ";
pub const NEXT_LABEL: &str = " Next ▶ ";

/// Which of the two frame buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonKind {
    Previous,
    Next,
}

impl ButtonKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Previous => PREVIOUS_LABEL,
            Self::Next => NEXT_LABEL,
        }
    }
}

/// Inputs deciding which buttons of one frame are live
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationProps {
    pub is_current_frame: bool,
    pub can_advance: bool,
    pub can_retreat: bool,
}

/// One rendered action; always present, possibly disabled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionButton {
    pub kind: ButtonKind,
    pub enabled: bool,
}

impl ActionButton {
    pub fn label(&self) -> &'static str {
        self.kind.label()
    }

    pub fn width(&self) -> u16 {
        self.label().width() as u16
    }
}

/// The Previous/Next pair for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationButtons {
    pub previous: ActionButton,
    pub next: ActionButton,
}

impl NavigationButtons {
    pub fn new(props: NavigationProps) -> Self {
        Self {
            previous: ActionButton {
                kind: ButtonKind::Previous,
                enabled: props.is_current_frame && props.can_retreat,
            },
            next: ActionButton {
                kind: ButtonKind::Next,
                enabled: props.is_current_frame && props.can_advance,
            },
        }
    }

    pub fn button(&self, kind: ButtonKind) -> &ActionButton {
        match kind {
            ButtonKind::Previous => &self.previous,
            ButtonKind::Next => &self.next,
        }
    }

    /// Press a button; fires its callback once when enabled
    pub fn activate<C: StackCallbacks + ?Sized>(&self, kind: ButtonKind, callbacks: &mut C) -> bool {
        if !self.button(kind).enabled {
            return false;
        }

        match kind {
            ButtonKind::Previous => callbacks.on_previous(),
            ButtonKind::Next => callbacks.on_next(),
        }
        true
    }
}

/// Where each footer button landed on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FooterAreas {
    pub previous: Rect,
    pub next: Rect,
}

impl FooterAreas {
    /// Previous hugs the left edge, Next the right edge
    pub fn calculate(buttons: &NavigationButtons, area: Rect) -> Self {
        let previous_width = buttons.previous.width().min(area.width);
        let next_width = buttons.next.width().min(area.width.saturating_sub(previous_width));

        Self {
            previous: Rect {
                x: area.x,
                y: area.y,
                width: previous_width,
                height: area.height.min(1),
            },
            next: Rect {
                x: area.x + area.width - next_width,
                y: area.y,
                width: next_width,
                height: area.height.min(1),
            },
        }
    }

    pub fn button_at(&self, x: u16, y: u16) -> Option<ButtonKind> {
        if contains(self.previous, x, y) {
            Some(ButtonKind::Previous)
        } else if contains(self.next, x, y) {
            Some(ButtonKind::Next)
        } else {
            None
        }
    }
}

pub(crate) fn contains(area: Rect, x: u16, y: u16) -> bool {
    x >= area.x && x < area.x + area.width && y >= area.y && y < area.y + area.height
}

/// Footer widget drawing both buttons of a frame
pub struct NavigationFooter<'a> {
    buttons: NavigationButtons,
    theme: &'a Theme,
}

impl<'a> NavigationFooter<'a> {
    pub fn new(buttons: NavigationButtons, theme: &'a Theme) -> Self {
        Self { buttons, theme }
    }
}

impl Widget for NavigationFooter<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let areas = FooterAreas::calculate(&self.buttons, area);
        for (button, button_area) in [
            (self.buttons.previous, areas.previous),
            (self.buttons.next, areas.next),
        ] {
            let style = if button.enabled {
                self.theme.button_style()
            } else {
                self.theme.disabled_button_style()
            };
            buf.set_span(
                button_area.x,
                button_area.y,
                &Span::styled(button.label(), style),
                button_area.width,
            );
        }
    }
}

/// Key binding for navigation actions
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub key_code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(key_code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { key_code, modifiers }
    }

    pub fn from_key_event(event: KeyEvent) -> Self {
        Self {
            key_code: event.code,
            modifiers: event.modifiers,
        }
    }
}

/// Keyboard bindings for stepping through an open stack
#[derive(Debug, Clone)]
pub struct DialogKeyMap {
    key_bindings: HashMap<KeyBinding, NavigationAction>,
}

impl DialogKeyMap {
    pub fn new() -> Self {
        let mut key_map = Self {
            key_bindings: HashMap::new(),
        };
        key_map.setup_default_bindings();
        key_map
    }

    fn setup_default_bindings(&mut self) {
        self.bind_key(KeyCode::Right, KeyModifiers::NONE, NavigationAction::Next);
        self.bind_key(KeyCode::Char('l'), KeyModifiers::NONE, NavigationAction::Next);
        self.bind_key(KeyCode::Tab, KeyModifiers::NONE, NavigationAction::Next);

        self.bind_key(KeyCode::Left, KeyModifiers::NONE, NavigationAction::Previous);
        self.bind_key(KeyCode::Char('h'), KeyModifiers::NONE, NavigationAction::Previous);
        self.bind_key(KeyCode::BackTab, KeyModifiers::SHIFT, NavigationAction::Previous);

        self.bind_key(KeyCode::Esc, KeyModifiers::NONE, NavigationAction::CloseAll);
    }

    pub fn bind_key(&mut self, key_code: KeyCode, modifiers: KeyModifiers, action: NavigationAction) {
        self.key_bindings
            .insert(KeyBinding::new(key_code, modifiers), action);
    }

    pub fn unbind_key(&mut self, key_code: KeyCode, modifiers: KeyModifiers) {
        self.key_bindings
            .remove(&KeyBinding::new(key_code, modifiers));
    }

    pub fn get_action(&self, event: KeyEvent) -> Option<NavigationAction> {
        self.key_bindings
            .get(&KeyBinding::from_key_event(event))
            .copied()
    }

    /// Bindings grouped by action, for help text
    pub fn help_entries(&self) -> Vec<(NavigationAction, Vec<String>)> {
        [NavigationAction::Previous, NavigationAction::Next, NavigationAction::CloseAll]
            .into_iter()
            .map(|action| {
                let mut keys: Vec<String> = self
                    .key_bindings
                    .iter()
                    .filter(|(_, bound)| **bound == action)
                    .map(|(binding, _)| describe_key(binding.key_code))
                    .collect();
                keys.sort();
                (action, keys)
            })
            .collect()
    }
}

impl Default for DialogKeyMap {
    fn default() -> Self {
        Self::new()
    }
}

fn describe_key(code: KeyCode) -> String {
    match code {
        KeyCode::Right => "→".to_string(),
        KeyCode::Left => "←".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::BackTab => "Shift+Tab".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Char(c) => c.to_string(),
        other => format!("{:?}", other),
    }
}
