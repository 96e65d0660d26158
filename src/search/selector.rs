//! Keyboard/pointer selection over the visible candidate list.

/// Discrete navigation input, already decoded from terminal events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavEvent {
    Down,
    Up,
    Enter,
    Escape,
    /// Pointer press outside the search bar and its panel.
    OutsideClick,
    /// Pointer press on the candidate at this list position.
    Click(usize),
}

/// Result of feeding one event through the highlight state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Event does not apply in the current state.
    Ignored,
    Highlight(Option<usize>),
    Commit(usize),
    /// Close the panel; `blur` also drops input focus.
    Dismiss { blur: bool },
}

pub fn move_down(highlighted: Option<usize>, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    match highlighted {
        None => Some(0),
        Some(i) => Some((i + 1).min(len - 1)),
    }
}

pub fn move_up(highlighted: Option<usize>) -> Option<usize> {
    match highlighted {
        None | Some(0) => None,
        Some(i) => Some(i - 1),
    }
}

/// Transition for `event` given the current highlight, list length and panel
/// visibility. Keyboard events only act while the panel is open; a click on a
/// listed candidate commits it regardless of the highlight.
pub fn step(event: NavEvent, highlighted: Option<usize>, len: usize, panel_open: bool) -> Selection {
    match event {
        NavEvent::Click(index) if index < len => Selection::Commit(index),
        NavEvent::Click(_) => Selection::Ignored,
        _ if !panel_open => Selection::Ignored,
        NavEvent::Down => Selection::Highlight(move_down(highlighted, len)),
        NavEvent::Up => Selection::Highlight(move_up(highlighted)),
        NavEvent::Enter => match highlighted {
            Some(i) if i < len => Selection::Commit(i),
            _ => Selection::Ignored,
        },
        NavEvent::Escape => Selection::Dismiss { blur: true },
        NavEvent::OutsideClick => Selection::Dismiss { blur: false },
    }
}
