//! Stack renderer
//!
//! [`DialogStack`] draws the visible dialogs of a [`SequenceState`] as a
//! layered cascade over a dimmed backdrop. [`DialogStackComponent`] owns the
//! store and turns keys and clicks into store operations.

use super::layer::{FrameLayer, StackGeometry, StackHit, StackLayout};
use super::navigation::{ButtonKind, DialogKeyMap, NavigationButtons, NavigationFooter, NavigationProps};
use super::sequence::{DialogSequence, DialogSequenceStore, SequenceState, StackCallbacks, StackPhase};
use super::types::NavigationAction;
use crate::tui::{
    components::{Component, ComponentState},
    styles::Theme,
    Frame,
};
use anyhow::Result;
use async_trait::async_trait;
use crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::Span,
    widgets::{Block, Borders, Clear, Widget},
};
use tracing::debug;

/// Widget drawing every dialog up to the cursor
pub struct DialogStack<'a> {
    state: &'a SequenceState,
    geometry: &'a StackGeometry,
    theme: &'a Theme,
}

impl<'a> DialogStack<'a> {
    pub fn new(state: &'a SequenceState, geometry: &'a StackGeometry, theme: &'a Theme) -> Self {
        Self {
            state,
            geometry,
            theme,
        }
    }

    fn render_frame(&self, layer: &FrameLayer, buf: &mut Buffer) {
        Clear.render(layer.area, buf);

        let border_style = if layer.is_current {
            self.theme.focused_border_style()
        } else {
            self.theme.border_style()
        };
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .style(self.theme.base_style())
            .title(Span::styled(format!(" {} ", layer.title), self.theme.title_style()))
            .render(layer.area, buf);

        let content = layer.content_area();
        for (row, line) in layer
            .description_lines
            .iter()
            .take(usize::from(content.height))
            .enumerate()
        {
            buf.set_stringn(
                content.x,
                content.y + row as u16,
                line,
                usize::from(content.width),
                self.theme.dim_text_style(),
            );
        }

        NavigationFooter::new(layer.buttons, self.theme).render(layer.footer_area(), buf);
    }
}

impl Widget for DialogStack<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.state.is_open() {
            return;
        }

        Block::default()
            .style(self.theme.backdrop_style())
            .render(area, buf);

        let layout = StackLayout::calculate(self.state, self.geometry, area);
        for layer in layout.layers() {
            self.render_frame(layer, buf);
        }
    }
}

/// Render a state into plain text rows, trailing spaces trimmed
pub fn snapshot(state: &SequenceState, geometry: &StackGeometry, width: u16, height: u16) -> Vec<String> {
    let area = Rect::new(0, 0, width, height);
    let mut buf = Buffer::empty(area);
    DialogStack::new(state, geometry, &Theme::default()).render(area, &mut buf);

    (0..height)
        .map(|y| {
            let row: String = (0..width).map(|x| buf.get(x, y).symbol()).collect();
            row.trim_end().to_string()
        })
        .collect()
}

/// The mounted stack: store, geometry and key bindings
pub struct DialogStackComponent {
    state: ComponentState,
    store: DialogSequenceStore,
    geometry: StackGeometry,
    key_map: DialogKeyMap,
}

impl DialogStackComponent {
    pub fn new(sequence: DialogSequence, geometry: StackGeometry) -> Self {
        Self {
            state: ComponentState::new(),
            store: DialogSequenceStore::new(sequence),
            geometry,
            key_map: DialogKeyMap::default(),
        }
    }

    pub fn store(&self) -> &DialogSequenceStore {
        &self.store
    }

    pub fn geometry(&self) -> &StackGeometry {
        &self.geometry
    }

    pub fn key_map(&self) -> &DialogKeyMap {
        &self.key_map
    }

    pub fn phase(&self) -> StackPhase {
        self.store.phase()
    }

    pub fn is_open(&self) -> bool {
        self.store.state().is_open()
    }

    pub fn open(&mut self) {
        self.store.open();
    }

    /// Layout for the area the stack was last drawn into
    pub fn layout(&self) -> StackLayout {
        StackLayout::calculate(self.store.state(), &self.geometry, self.state.size)
    }

    /// Apply a navigation action through the current frame's buttons
    pub fn handle_action(&mut self, action: NavigationAction) -> bool {
        if !self.is_open() {
            return false;
        }

        let buttons = NavigationButtons::new(NavigationProps {
            is_current_frame: true,
            can_advance: self.store.can_advance(),
            can_retreat: self.store.can_retreat(),
        });

        match action {
            NavigationAction::Next => buttons.activate(ButtonKind::Next, &mut self.store),
            NavigationAction::Previous => buttons.activate(ButtonKind::Previous, &mut self.store),
            NavigationAction::CloseAll => {
                self.store.on_close();
                true
            }
        }
    }

    /// Route a click at a screen position; returns what was hit
    pub fn handle_click(&mut self, x: u16, y: u16) -> Option<StackHit> {
        let layout = self.layout();
        let hit = layout.hit_test(x, y)?;
        debug!(x, y, ?hit, "Dialog stack click");

        match hit {
            StackHit::Backdrop => self.store.on_close(),
            StackHit::PreviousButton(position) | StackHit::NextButton(position) => {
                let kind = if matches!(hit, StackHit::PreviousButton(_)) {
                    ButtonKind::Previous
                } else {
                    ButtonKind::Next
                };
                if let Some(layer) = layout.layers().iter().find(|l| l.position == position) {
                    layer.buttons.activate(kind, &mut self.store);
                }
            }
            StackHit::Frame(_) => {}
        }

        Some(hit)
    }
}

#[async_trait]
impl Component for DialogStackComponent {
    async fn handle_key_event(&mut self, event: KeyEvent) -> Result<()> {
        if let Some(action) = self.key_map.get_action(event) {
            self.handle_action(action);
        }
        Ok(())
    }

    async fn handle_mouse_event(&mut self, event: MouseEvent) -> Result<()> {
        if let MouseEventKind::Down(MouseButton::Left) = event.kind {
            self.handle_click(event.column, event.row);
        }
        Ok(())
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        self.state.size = area;
        frame.render_widget(DialogStack::new(self.store.state(), &self.geometry, theme), area);
    }

    fn size(&self) -> Rect {
        self.state.size
    }

    fn set_size(&mut self, size: Rect) {
        self.state.size = size;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::components::dialogs::types::default_descriptors;
    use crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::{backend::TestBackend, Terminal};

    fn component() -> DialogStackComponent {
        let mut component = DialogStackComponent::new(
            DialogSequence::new(default_descriptors()).unwrap(),
            StackGeometry::default(),
        );
        component.set_size(Rect::new(0, 0, 80, 24));
        component
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn screen(component: &DialogStackComponent) -> String {
        snapshot(component.store().state(), component.geometry(), 80, 24).join("\n")
    }

    #[test]
    fn test_closed_stack_renders_nothing() {
        let component = component();
        assert!(screen(&component).trim().is_empty());
    }

    #[test]
    fn test_open_stack_shows_only_visible_dialogs() {
        let mut component = component();
        component.open();
        component.handle_action(NavigationAction::Next);

        let text = screen(&component);
        assert!(text.contains("I'm first dialog"));
        assert!(text.contains("I'm second dialog"));
        assert!(!text.contains("I'm third dialog"));
        assert!(text.contains("With a fancy description"));
    }

    #[test]
    fn test_background_titles_peek_out() {
        let mut component = component();
        component.open();
        component.handle_action(NavigationAction::Next);
        component.handle_action(NavigationAction::Next);

        let rows = snapshot(component.store().state(), component.geometry(), 80, 24);
        let row_of = |title: &str| rows.iter().position(|row| row.contains(title));
        let first = row_of("I'm first dialog").unwrap();
        let second = row_of("I'm second dialog").unwrap();
        let third = row_of("I'm third dialog").unwrap();
        assert_eq!(second, first + 1);
        assert_eq!(third, second + 1);
    }

    #[test]
    fn test_buttons_drawn_on_every_frame_state() {
        let mut component = component();
        component.open();
        let text = screen(&component);
        assert!(text.contains("Previous"));
        assert!(text.contains("Next"));

        component.handle_action(NavigationAction::Next);
        component.handle_action(NavigationAction::Next);
        let text = screen(&component);
        assert!(text.contains("Previous"));
        assert!(text.contains("Next"));
    }

    #[test]
    fn test_actions_respect_bounds() {
        let mut component = component();
        component.open();
        assert!(!component.handle_action(NavigationAction::Previous));
        assert_eq!(component.phase(), StackPhase::Open(0));

        assert!(component.handle_action(NavigationAction::Next));
        assert!(component.handle_action(NavigationAction::Next));
        assert!(!component.handle_action(NavigationAction::Next));
        assert_eq!(component.phase(), StackPhase::Open(2));
    }

    #[test]
    fn test_actions_ignored_while_closed() {
        let mut component = component();
        assert!(!component.handle_action(NavigationAction::Next));
        assert!(!component.handle_action(NavigationAction::CloseAll));
        assert_eq!(component.phase(), StackPhase::Closed);
    }

    #[tokio::test]
    async fn test_backdrop_click_closes_from_last_dialog() {
        let mut component = component();
        component.open();
        component.handle_action(NavigationAction::Next);
        component.handle_action(NavigationAction::Next);
        assert_eq!(component.phase(), StackPhase::Open(2));

        component.handle_mouse_event(click(0, 0)).await.unwrap();
        assert_eq!(component.phase(), StackPhase::Closed);
    }

    #[tokio::test]
    async fn test_clicking_buttons_navigates() {
        let mut component = component();
        component.open();

        let next = component.layout().current_layer().unwrap().footer.next;
        component.handle_mouse_event(click(next.x, next.y)).await.unwrap();
        assert_eq!(component.phase(), StackPhase::Open(1));

        let previous = component.layout().current_layer().unwrap().footer.previous;
        component
            .handle_mouse_event(click(previous.x, previous.y))
            .await
            .unwrap();
        assert_eq!(component.phase(), StackPhase::Open(0));
    }

    #[tokio::test]
    async fn test_clicking_disabled_previous_is_noop() {
        let mut component = component();
        component.open();

        let previous = component.layout().current_layer().unwrap().footer.previous;
        let hit = component.handle_click(previous.x, previous.y);
        assert_eq!(hit, Some(StackHit::PreviousButton(0)));
        assert_eq!(component.phase(), StackPhase::Open(0));
    }

    #[tokio::test]
    async fn test_clicking_frame_body_keeps_stack_open() {
        let mut component = component();
        component.open();
        component.handle_action(NavigationAction::Next);

        let body = component.layout().current_layer().unwrap().content_area();
        let hit = component.handle_click(body.x, body.y);
        assert_eq!(hit, Some(StackHit::Frame(1)));
        assert_eq!(component.phase(), StackPhase::Open(1));
    }

    #[tokio::test]
    async fn test_keys_drive_navigation() {
        let mut component = component();
        component.open();

        component.handle_key_event(key(KeyCode::Right)).await.unwrap();
        assert_eq!(component.phase(), StackPhase::Open(1));
        component.handle_key_event(key(KeyCode::Left)).await.unwrap();
        assert_eq!(component.phase(), StackPhase::Open(0));
        component.handle_key_event(key(KeyCode::Esc)).await.unwrap();
        assert_eq!(component.phase(), StackPhase::Closed);
    }

    #[test]
    fn test_render_through_terminal_records_area() {
        let backend = TestBackend::new(60, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut component = component();
        let theme = Theme::default();
        component.open();

        terminal
            .draw(|f| {
                let area = f.size();
                component.render(f, area, &theme);
            })
            .unwrap();

        assert_eq!(component.size(), Rect::new(0, 0, 60, 20));
        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        assert!(text.contains("I'm first dialog"));
    }
}
