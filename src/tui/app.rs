use crate::config::Config;
use crate::tui::{
    components::{
        dialogs::{navigation::contains, DialogSequence, DialogStackComponent, StackPhase},
        Component,
    },
    events::Event,
    keys::KeyMap,
    styles::Theme,
    utils::layout::{centered_rect, centered_rect_percent},
    Frame,
};
use anyhow::Result;
use crossterm::event::{MouseButton, MouseEventKind};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::widgets::{Block, Borders, Paragraph};
use tracing::debug;

const TRIGGER_LABEL: &str = "Show me";

/// Main application state and controller
pub struct App {
    /// Whether the application should quit
    pub should_quit: bool,

    /// Key mappings for the application
    pub key_map: KeyMap,

    /// The dialog stack mounted over the main area
    pub dialogs: DialogStackComponent,

    /// Current theme for styling
    pub theme: Theme,

    /// Application configuration
    pub config: AppConfig,

    /// Where the "Show me" button was last drawn
    trigger_area: Rect,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Show help text
    pub show_help: bool,

    /// Enable mouse support
    pub mouse_enabled: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            show_help: false,
            mouse_enabled: true,
        }
    }
}

impl App {
    /// Create a new application instance
    pub fn new(config: &Config) -> Result<Self> {
        let sequence = DialogSequence::new(config.dialogs.clone())?;
        let dialogs = DialogStackComponent::new(sequence, config.geometry());

        Ok(Self {
            should_quit: false,
            key_map: KeyMap::default(),
            dialogs,
            theme: Theme::default(),
            config: AppConfig {
                show_help: false,
                mouse_enabled: config.mouse_enabled,
            },
            trigger_area: Rect::default(),
        })
    }

    /// Handle incoming events
    pub async fn handle_event(&mut self, event: Event) -> Result<bool> {
        match event {
            Event::Key(key_event) => {
                if self.key_map.should_quit(&key_event, self.dialogs.is_open()) {
                    self.should_quit = true;
                    return Ok(true);
                }

                if self.key_map.should_show_help(&key_event) {
                    self.config.show_help = !self.config.show_help;
                    return Ok(false);
                }

                // An open stack is modal: it takes every remaining key
                if self.dialogs.is_open() {
                    self.dialogs.handle_key_event(key_event).await?;
                } else if self.key_map.should_open(&key_event) {
                    self.dialogs.open();
                }
            }

            Event::Mouse(mouse_event) => {
                if self.config.mouse_enabled {
                    if self.dialogs.is_open() {
                        self.dialogs.handle_mouse_event(mouse_event).await?;
                    } else if let MouseEventKind::Down(MouseButton::Left) = mouse_event.kind {
                        if contains(self.trigger_area, mouse_event.column, mouse_event.row) {
                            debug!("Trigger clicked");
                            self.dialogs.open();
                        }
                    }
                }
            }

            // The next draw picks up the new frame size
            Event::Resize(..) | Event::Tick => {}
        }

        Ok(self.should_quit)
    }

    /// Render the application UI
    pub fn render(&mut self, frame: &mut Frame) {
        // Create main layout
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),      // Main content
                Constraint::Length(1),   // Status bar
            ])
            .split(frame.size());

        self.render_main(frame, chunks[0]);
        self.dialogs.render(frame, chunks[0], &self.theme);

        // Render status bar
        self.render_status_bar(frame, chunks[1]);

        // Render help overlay if enabled
        if self.config.show_help {
            self.render_help_overlay(frame);
        }
    }

    /// Render the page behind the dialogs, with its trigger button
    fn render_main(&mut self, frame: &mut Frame, area: Rect) {
        let page = Block::default()
            .borders(Borders::ALL)
            .title("Dialog Stack")
            .style(self.theme.base_style());
        frame.render_widget(page, area);

        self.trigger_area = centered_rect(TRIGGER_LABEL.len() as u16 + 4, 3, area);
        let trigger = Paragraph::new(TRIGGER_LABEL)
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(self.theme.border_style()),
            )
            .style(self.theme.text_style());
        frame.render_widget(trigger, self.trigger_area);
    }

    /// Render the status bar
    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let len = self.dialogs.store().state().sequence().len();
        let position = match self.dialogs.phase() {
            StackPhase::Closed => "closed".to_string(),
            StackPhase::Open(index) => format!("dialog {} of {}", index + 1, len),
        };
        let status_text = format!("Stack: {} | Press Ctrl+G for help | Ctrl+C to quit", position);

        let status_paragraph = Paragraph::new(status_text)
            .style(self.theme.status_bar_style());

        frame.render_widget(status_paragraph, area);
    }

    /// Render help overlay
    fn render_help_overlay(&self, frame: &mut Frame) {
        let help_area = centered_rect_percent(60, 50, frame.size());

        let mut help_text = self.key_map.help_text();
        for (action, keys) in self.dialogs.key_map().help_entries() {
            help_text.push_str(&format!("\n{:<8}{:?}", keys.join("/"), action));
        }

        let help_block = Block::default()
            .borders(Borders::ALL)
            .title("Help")
            .style(self.theme.help_style());

        let help_paragraph = Paragraph::new(help_text)
            .block(help_block)
            .style(self.theme.text_style());

        frame.render_widget(ratatui::widgets::Clear, help_area);
        frame.render_widget(help_paragraph, help_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
    use ratatui::{backend::TestBackend, Terminal};

    fn app() -> App {
        App::new(&Config::default()).unwrap()
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn click(column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn draw(app: &mut App) -> Terminal<TestBackend> {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        terminal
    }

    #[tokio::test]
    async fn test_enter_opens_and_escape_closes() {
        let mut app = app();
        assert!(!app.handle_event(key(KeyCode::Enter)).await.unwrap());
        assert_eq!(app.dialogs.phase(), StackPhase::Open(0));

        app.handle_event(key(KeyCode::Right)).await.unwrap();
        assert_eq!(app.dialogs.phase(), StackPhase::Open(1));

        app.handle_event(key(KeyCode::Esc)).await.unwrap();
        assert_eq!(app.dialogs.phase(), StackPhase::Closed);
    }

    #[tokio::test]
    async fn test_q_does_not_quit_while_dialogs_open() {
        let mut app = app();
        app.handle_event(key(KeyCode::Char('o'))).await.unwrap();
        assert!(!app.handle_event(key(KeyCode::Char('q'))).await.unwrap());

        app.handle_event(key(KeyCode::Esc)).await.unwrap();
        assert!(app.handle_event(key(KeyCode::Char('q'))).await.unwrap());
    }

    #[tokio::test]
    async fn test_trigger_click_opens_and_backdrop_click_closes() {
        let mut app = app();
        draw(&mut app);

        let trigger = app.trigger_area;
        app.handle_event(click(trigger.x + 1, trigger.y + 1)).await.unwrap();
        assert_eq!(app.dialogs.phase(), StackPhase::Open(0));

        app.handle_event(key(KeyCode::Right)).await.unwrap();
        app.handle_event(key(KeyCode::Right)).await.unwrap();
        assert_eq!(app.dialogs.phase(), StackPhase::Open(2));

        draw(&mut app);
        app.handle_event(click(0, 0)).await.unwrap();
        assert_eq!(app.dialogs.phase(), StackPhase::Closed);
    }

    #[tokio::test]
    async fn test_mouse_can_be_disabled() {
        let mut app = app();
        app.config.mouse_enabled = false;
        draw(&mut app);

        let trigger = app.trigger_area;
        app.handle_event(click(trigger.x + 1, trigger.y + 1)).await.unwrap();
        assert_eq!(app.dialogs.phase(), StackPhase::Closed);
    }

    #[tokio::test]
    async fn test_status_bar_tracks_cursor() {
        let mut app = app();
        app.handle_event(key(KeyCode::Enter)).await.unwrap();
        app.handle_event(key(KeyCode::Right)).await.unwrap();

        let terminal = draw(&mut app);
        let buffer = terminal.backend().buffer();
        let last_row: String = (0..80).map(|x| buffer.get(x, 23).symbol()).collect();
        assert!(last_row.contains("dialog 2 of 3"));
    }

    #[tokio::test]
    async fn test_status_bar_reports_closed_after_close_all() {
        let mut app = app();
        app.handle_event(key(KeyCode::Enter)).await.unwrap();
        app.handle_event(Event::Resize(80, 24)).await.unwrap();
        assert_eq!(app.dialogs.phase(), StackPhase::Open(0));

        app.handle_event(key(KeyCode::Esc)).await.unwrap();
        let terminal = draw(&mut app);
        let buffer = terminal.backend().buffer();
        let last_row: String = (0..80).map(|x| buffer.get(x, 23).symbol()).collect();
        assert!(last_row.contains("Stack: closed"));
    }
}
