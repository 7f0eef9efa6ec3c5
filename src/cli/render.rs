use anyhow::Result;
use clap::{Args, ValueEnum};
use tracing::debug;

use crate::config::Config;
use crate::tui::components::dialogs::{
    stack::snapshot, DialogSequence, DialogSequenceStore, StackPhase,
};

/// Store operations that can be replayed from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StackAction {
    /// Open the stack at the first dialog
    Open,
    /// Step to the next dialog
    Next,
    /// Step back to the previous dialog
    #[value(alias = "prev")]
    Previous,
    /// Close every dialog
    #[value(alias = "backdrop")]
    Close,
}

/// Print the stack after a series of actions, without a terminal UI
#[derive(Debug, Args)]
pub struct RenderCommand {
    /// Actions to apply in order, comma separated
    #[arg(short = 'a', long = "actions", value_enum, value_delimiter = ',', default_value = "open")]
    pub actions: Vec<StackAction>,

    /// Width of the rendered area in columns
    #[arg(long, default_value_t = 80)]
    pub width: u16,

    /// Height of the rendered area in rows
    #[arg(long, default_value_t = 24)]
    pub height: u16,
}

impl RenderCommand {
    pub async fn execute(&self, config: &Config) -> Result<()> {
        debug!("Executing render command");

        let lines = self.render(config)?;
        for line in lines {
            println!("{}", line);
        }

        Ok(())
    }

    /// Replay the actions and return the rendered rows plus a summary line
    pub fn render(&self, config: &Config) -> Result<Vec<String>> {
        let sequence = DialogSequence::new(config.dialogs.clone())?;
        let mut store = DialogSequenceStore::new(sequence);

        for action in &self.actions {
            apply(&mut store, *action);
        }

        let mut lines = snapshot(store.state(), &config.geometry(), self.width, self.height);
        lines.push(match store.phase() {
            StackPhase::Closed => "[closed]".to_string(),
            StackPhase::Open(index) => format!(
                "[open {}/{}]",
                index + 1,
                store.state().sequence().len()
            ),
        });
        Ok(lines)
    }
}

fn apply(store: &mut DialogSequenceStore, action: StackAction) {
    match action {
        StackAction::Open => store.open(),
        StackAction::Next => store.advance(),
        StackAction::Previous => store.retreat(),
        StackAction::Close => store.close_all(),
    }
}
