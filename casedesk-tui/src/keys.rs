//! Key bindings shared by the list, form and viewer screens.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    NextView,
    PrevView,
    SwitchView(usize),
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    FirstPage,
    LastPage,
    OpenHelp,
    OpenSearch,
    OpenViewer,
    ChangeStatus,
    ShowHearings,
    AddHearing,
    Export,
    NewItem,
    AttachFile,
    RemoveFile,
    Submit,
    Refresh,
    Confirm,
    Cancel,
}

pub fn map_key(event: KeyEvent) -> Option<Action> {
    let KeyEvent {
        code, modifiers, ..
    } = event;

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') => Some(Action::Cancel),
            KeyCode::Char('r') => Some(Action::Refresh),
            KeyCode::Char('s') => Some(Action::Submit),
            _ => None,
        };
    }

    match code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('?') => Some(Action::OpenHelp),
        KeyCode::Char('/') => Some(Action::OpenSearch),
        KeyCode::Char('v') => Some(Action::OpenViewer),
        KeyCode::Char('s') => Some(Action::ChangeStatus),
        KeyCode::Char('H') => Some(Action::ShowHearings),
        KeyCode::Char('a') => Some(Action::AddHearing),
        KeyCode::Char('x') => Some(Action::Export),
        KeyCode::Char('n') => Some(Action::NewItem),
        KeyCode::Char('f') => Some(Action::AttachFile),
        KeyCode::Char('d') => Some(Action::RemoveFile),
        KeyCode::Enter => Some(Action::Confirm),
        KeyCode::Esc => Some(Action::Cancel),
        KeyCode::Tab => Some(Action::NextView),
        KeyCode::BackTab => Some(Action::PrevView),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::MoveDown),
        KeyCode::Left | KeyCode::Char('h') | KeyCode::PageUp => Some(Action::MoveLeft),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::PageDown => Some(Action::MoveRight),
        KeyCode::Home => Some(Action::FirstPage),
        KeyCode::End => Some(Action::LastPage),
        KeyCode::Char(c @ '1'..='9') => Some(Action::SwitchView(c as usize - '1' as usize)),
        _ => None,
    }
}
