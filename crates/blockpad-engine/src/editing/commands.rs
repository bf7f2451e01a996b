//! Named editing commands and their default key bindings.
//!
//! Keys are written `Ctrl-Alt-Shift-Key`, modifiers in that order, letters
//! lower case (`Ctrl-Shift-k`, `Alt-Up`, `Ctrl-Enter`).

use std::collections::HashMap;

use crate::editing::{Document, Transaction, blocks, lines, navigation};

/// A command a key can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    NextBlock,
    PreviousBlock,
    SelectNextBlock,
    SelectPreviousBlock,
    AddBlockAfterCurrent,
    AddBlockBeforeCurrent,
    AddBlockAfterLast,
    AddBlockBeforeFirst,
    InsertBlockAtCursor,
    DeleteBlock,
    MoveBlockUp,
    MoveBlockDown,
    MoveLineUp,
    MoveLineDown,
    DeleteLine,
    TransposeChars,
    SelectAll,
    CycleLanguage,
    ToggleAuto,
    CursorCharForward,
    CursorCharBackward,
}

impl Command {
    pub const ALL: &'static [Command] = &[
        Command::NextBlock,
        Command::PreviousBlock,
        Command::SelectNextBlock,
        Command::SelectPreviousBlock,
        Command::AddBlockAfterCurrent,
        Command::AddBlockBeforeCurrent,
        Command::AddBlockAfterLast,
        Command::AddBlockBeforeFirst,
        Command::InsertBlockAtCursor,
        Command::DeleteBlock,
        Command::MoveBlockUp,
        Command::MoveBlockDown,
        Command::MoveLineUp,
        Command::MoveLineDown,
        Command::DeleteLine,
        Command::TransposeChars,
        Command::SelectAll,
        Command::CycleLanguage,
        Command::ToggleAuto,
        Command::CursorCharForward,
        Command::CursorCharBackward,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Command::NextBlock => "gotoNextBlock",
            Command::PreviousBlock => "gotoPreviousBlock",
            Command::SelectNextBlock => "selectNextBlock",
            Command::SelectPreviousBlock => "selectPreviousBlock",
            Command::AddBlockAfterCurrent => "addNewBlockAfterCurrent",
            Command::AddBlockBeforeCurrent => "addNewBlockBeforeCurrent",
            Command::AddBlockAfterLast => "addNewBlockAfterLast",
            Command::AddBlockBeforeFirst => "addNewBlockBeforeFirst",
            Command::InsertBlockAtCursor => "insertNewBlockAtCursor",
            Command::DeleteBlock => "deleteBlock",
            Command::MoveBlockUp => "moveCurrentBlockUp",
            Command::MoveBlockDown => "moveCurrentBlockDown",
            Command::MoveLineUp => "moveLineUp",
            Command::MoveLineDown => "moveLineDown",
            Command::DeleteLine => "deleteLine",
            Command::TransposeChars => "transposeChars",
            Command::SelectAll => "selectAll",
            Command::CycleLanguage => "cycleLanguage",
            Command::ToggleAuto => "toggleAutoDetect",
            Command::CursorCharForward => "cursorCharForward",
            Command::CursorCharBackward => "cursorCharBackward",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.name() == name)
    }

    /// The transaction this command produces against `doc`.
    pub fn apply(self, doc: &Document) -> Option<Transaction> {
        match self {
            Command::NextBlock => navigation::next_block(doc),
            Command::PreviousBlock => navigation::previous_block(doc),
            Command::SelectNextBlock => navigation::select_next_block(doc),
            Command::SelectPreviousBlock => navigation::select_previous_block(doc),
            Command::AddBlockAfterCurrent => blocks::add_block_after_current(doc),
            Command::AddBlockBeforeCurrent => blocks::add_block_before_current(doc),
            Command::AddBlockAfterLast => blocks::add_block_after_last(doc),
            Command::AddBlockBeforeFirst => blocks::add_block_before_first(doc),
            Command::InsertBlockAtCursor => blocks::insert_block_at_cursor(doc),
            Command::DeleteBlock => blocks::delete_current_block(doc),
            Command::MoveBlockUp => blocks::move_current_block_up(doc),
            Command::MoveBlockDown => blocks::move_current_block_down(doc),
            Command::MoveLineUp => lines::move_line_up(doc),
            Command::MoveLineDown => lines::move_line_down(doc),
            Command::DeleteLine => lines::delete_line(doc),
            Command::TransposeChars => lines::transpose_chars(doc),
            Command::SelectAll => navigation::select_all(doc),
            Command::CycleLanguage => blocks::cycle_language(doc),
            Command::ToggleAuto => blocks::toggle_auto(doc),
            Command::CursorCharForward => navigation::cursor_char_forward(doc),
            Command::CursorCharBackward => navigation::cursor_char_backward(doc),
        }
    }
}

/// Default bindings.
pub const DEFAULT_BINDINGS: &[(&str, Command)] = &[
    ("Ctrl-Down", Command::NextBlock),
    ("Ctrl-Up", Command::PreviousBlock),
    ("Ctrl-Shift-Down", Command::SelectNextBlock),
    ("Ctrl-Shift-Up", Command::SelectPreviousBlock),
    ("Ctrl-Enter", Command::AddBlockAfterCurrent),
    ("Alt-Shift-Enter", Command::AddBlockBeforeCurrent),
    ("Ctrl-Shift-Enter", Command::AddBlockAfterLast),
    ("Alt-Enter", Command::AddBlockBeforeFirst),
    ("Ctrl-Alt-Enter", Command::InsertBlockAtCursor),
    ("Ctrl-Shift-d", Command::DeleteBlock),
    ("Ctrl-Alt-Up", Command::MoveBlockUp),
    ("Ctrl-Alt-Down", Command::MoveBlockDown),
    ("Alt-Up", Command::MoveLineUp),
    ("Alt-Down", Command::MoveLineDown),
    ("Ctrl-Shift-k", Command::DeleteLine),
    ("Ctrl-t", Command::TransposeChars),
    ("Ctrl-a", Command::SelectAll),
    ("Ctrl-l", Command::CycleLanguage),
    ("Ctrl-Shift-l", Command::ToggleAuto),
    ("Right", Command::CursorCharForward),
    ("Left", Command::CursorCharBackward),
];

/// Key to command lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keymap {
    bindings: HashMap<String, Command>,
}

impl Keymap {
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Bind `key`, replacing whatever it was bound to.
    pub fn bind(&mut self, key: impl Into<String>, command: Command) {
        self.bindings.insert(key.into(), command);
    }

    pub fn unbind(&mut self, key: &str) -> Option<Command> {
        self.bindings.remove(key)
    }

    pub fn lookup(&self, key: &str) -> Option<Command> {
        self.bindings.get(key).copied()
    }

    /// Keys bound to `command`, sorted.
    pub fn keys_for(&self, command: Command) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .bindings
            .iter()
            .filter(|(_, c)| **c == command)
            .map(|(k, _)| k.as_str())
            .collect();
        keys.sort_unstable();
        keys
    }
}

impl Default for Keymap {
    fn default() -> Self {
        let mut keymap = Self::empty();
        for (key, command) in DEFAULT_BINDINGS {
            keymap.bind(*key, *command);
        }
        keymap
    }
}
