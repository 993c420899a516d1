use crate::model::Scene;
use crate::sim::PlayerAction;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};

#[derive(Clone, Debug)]
pub(crate) struct InputEvent {
    pub(crate) key: KeyCode,
    pub(crate) mods: KeyModifiers,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    Act(PlayerAction),
    PromptChar(char),
    PromptBackspace,
    PromptCommit,
    NewPet,
    Redraw,
    Quit,
}

/// Blocks until the next key press or resize. Nothing advances while we wait.
pub(crate) fn wait_for_input() -> anyhow::Result<Option<InputEvent>> {
    loop {
        match event::read()? {
            Event::Key(k) if k.kind == KeyEventKind::Press || k.kind == KeyEventKind::Repeat => {
                return Ok(Some(InputEvent {
                    key: k.code,
                    mods: k.modifiers,
                }));
            }
            Event::Resize(_, _) => return Ok(None),
            _ => {}
        }
    }
}

pub(crate) fn map_event(scene: Scene, ev: Option<InputEvent>) -> Option<Command> {
    let Some(ev) = ev else {
        return Some(Command::Redraw);
    };

    if matches!(ev.key, KeyCode::Char('c') | KeyCode::Char('C'))
        && ev.mods.contains(KeyModifiers::CONTROL)
    {
        return Some(Command::Quit);
    }

    match scene {
        Scene::Prompt => match ev.key {
            KeyCode::Enter => Some(Command::PromptCommit),
            KeyCode::Backspace => Some(Command::PromptBackspace),
            KeyCode::Esc => Some(Command::Quit),
            KeyCode::Char(ch) if !ch.is_control() => Some(Command::PromptChar(ch)),
            _ => None,
        },
        Scene::Main => match ev.key {
            KeyCode::Char('f') | KeyCode::Char('F') => Some(Command::Act(PlayerAction::Feed)),
            KeyCode::Char('p') | KeyCode::Char('P') => Some(Command::Act(PlayerAction::Play)),
            KeyCode::Char('n') | KeyCode::Char('N') => Some(Command::Act(PlayerAction::Nap)),
            KeyCode::Char('t') | KeyCode::Char('T') => {
                Some(Command::Act(PlayerAction::TimePasses))
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Command::Quit),
            _ => None,
        },
        Scene::Dead => match ev.key {
            KeyCode::Char('r') | KeyCode::Char('R') => Some(Command::NewPet),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Command::Quit),
            _ => None,
        },
    }
}
