use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use blockpad_config::DetectionSettings;
use blockpad_engine::editing::commands::{Command, Keymap};
use blockpad_engine::editing::{SelectionRange, clipboard};
use blockpad_engine::{
    Document, LanguageDetector, Origin, Selection, Span, Splice, Transaction, io,
};
use crossterm::event::{KeyEvent, KeyEventKind};

use crate::keys::{key_name, typed_text};

/// Editor actions that live in the front end rather than the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Save,
    Quit,
    Copy,
    Cut,
    Paste,
    Backspace,
    DeleteForward,
    LineUp,
    LineDown,
    LineStart,
    LineEnd,
}

const APP_BINDINGS: &[(&str, Action)] = &[
    ("Ctrl-s", Action::Save),
    ("Ctrl-q", Action::Quit),
    ("Esc", Action::Quit),
    ("Ctrl-c", Action::Copy),
    ("Ctrl-x", Action::Cut),
    ("Ctrl-v", Action::Paste),
    ("Backspace", Action::Backspace),
    ("Delete", Action::DeleteForward),
    ("Up", Action::LineUp),
    ("Down", Action::LineDown),
    ("Home", Action::LineStart),
    ("End", Action::LineEnd),
];

pub struct App {
    pub doc: Document,
    detector: LanguageDetector,
    keymap: Keymap,
    path: PathBuf,
    dirty: bool,
    /// Internal clipboard.
    register: String,
    pub status: String,
    pub should_quit: bool,
}

impl App {
    /// An app with detection running on a worker thread.
    pub fn new(doc: Document, path: PathBuf, detection: DetectionSettings) -> Result<Self> {
        let detector = LanguageDetector::spawn(detection)?;
        Ok(Self::with_detector(doc, path, detector))
    }

    pub fn with_detector(doc: Document, path: PathBuf, detector: LanguageDetector) -> Self {
        Self {
            doc,
            detector,
            keymap: Keymap::default(),
            path,
            dirty: false,
            register: String::new(),
            status: String::new(),
            should_quit: false,
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn detecting(&self) -> bool {
        self.detector.pending_count() > 0
    }

    pub fn handle_key(&mut self, key: &KeyEvent, now: Instant) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }
        let Some(name) = key_name(key) else {
            return Ok(());
        };

        if let Some((_, action)) = APP_BINDINGS.iter().find(|(k, _)| *k == name) {
            return self.perform(*action, now);
        }
        if let Some(command) = self.keymap.lookup(&name) {
            self.command(command, now);
            return Ok(());
        }
        if let Some(text) = typed_text(key) {
            let transaction = insert_text(&self.doc, &text);
            self.apply(Some(transaction), now);
        }
        Ok(())
    }

    /// One event-loop tick: let the detector apply what it has.
    pub fn tick(&mut self, now: Instant) {
        let transaction = self.detector.poll(&self.doc, now);
        if self.apply(transaction, now)
            && let Some(block) = self.doc.current_block()
        {
            self.status = format!("detected {}", block.language.name);
        }
    }

    pub fn save(&mut self) -> Result<()> {
        io::save_document(&self.path, &self.doc.text())?;
        self.dirty = false;
        self.status = format!("saved {}", self.path.display());
        Ok(())
    }

    /// Stop the detector and save unsaved changes.
    pub fn shutdown(&mut self) -> Result<()> {
        self.detector.close();
        if self.dirty {
            self.save()?;
        }
        Ok(())
    }

    fn command(&mut self, command: Command, now: Instant) {
        if !self.apply(command.apply(&self.doc), now) {
            log::debug!("{} did nothing", command.name());
        }
    }

    fn perform(&mut self, action: Action, now: Instant) -> Result<()> {
        match action {
            Action::Save => self.save()?,
            Action::Quit => self.should_quit = true,
            Action::Copy => {
                self.register = clipboard::copy(&self.doc);
                self.status = format!("copied {} chars", self.register.chars().count());
            }
            Action::Cut => {
                let (text, transaction) = clipboard::cut(&self.doc);
                self.register = text;
                self.apply(transaction, now);
            }
            Action::Paste => {
                let transaction = clipboard::paste(&self.doc, &self.register);
                self.apply(transaction, now);
            }
            Action::Backspace => {
                let transaction = delete(&self.doc, false);
                self.apply(transaction, now);
            }
            Action::DeleteForward => {
                let transaction = delete(&self.doc, true);
                self.apply(transaction, now);
            }
            Action::LineUp => {
                let transaction = vertical(&self.doc, false);
                self.apply(transaction, now);
            }
            Action::LineDown => {
                let transaction = vertical(&self.doc, true);
                self.apply(transaction, now);
            }
            Action::LineStart => {
                let transaction = line_edge(&self.doc, false);
                self.apply(transaction, now);
            }
            Action::LineEnd => {
                let transaction = line_edge(&self.doc, true);
                self.apply(transaction, now);
            }
        }
        Ok(())
    }

    fn apply(&mut self, transaction: Option<Transaction>, now: Instant) -> bool {
        let Some(patch) = self.doc.run_patch(transaction) else {
            return false;
        };
        self.dirty |= patch.doc_changed;
        self.detector.observe(&patch, now);
        true
    }
}

/// Replace every selection range with `text`, cursors after it.
fn insert_text(doc: &Document, text: &str) -> Transaction {
    let ranges = doc.selection().ranges();
    let mut order: Vec<usize> = (0..ranges.len()).collect();
    order.sort_by_key(|&i| ranges[i].from());

    let inserted = text.chars().count();
    let mut cursors = vec![SelectionRange::cursor(0); ranges.len()];
    let mut splices = Vec::with_capacity(ranges.len());
    let mut shift: isize = 0;
    for i in order {
        let span = ranges[i].span();
        cursors[i] = SelectionRange::cursor(span.start.saturating_add_signed(shift) + inserted);
        shift += inserted as isize - span.len() as isize;
        splices.push(Splice::replace(span, text));
    }

    Transaction::new(Origin::Input)
        .with_changes(splices)
        .with_selection(Selection::new(cursors, doc.selection().main_index()))
}

/// Backspace or forward delete on the main range.
fn delete(doc: &Document, forward: bool) -> Option<Transaction> {
    let main = doc.selection().main();
    let span = if !main.is_empty() {
        main.span()
    } else if forward {
        if main.head >= doc.len_chars() {
            return None;
        }
        Span::new(main.head, main.head + 1)
    } else {
        Span::new(main.head.checked_sub(1)?, main.head)
    };
    Some(Transaction::new(Origin::Delete).with_change(Splice::delete(span)))
}

/// Length of rope line `line` without its line break.
fn line_len(doc: &Document, line: usize) -> usize {
    let rope = doc.rope();
    let len = rope.line(line).len_chars();
    if line + 1 < rope.len_lines() {
        len.saturating_sub(1)
    } else {
        len
    }
}

fn vertical(doc: &Document, down: bool) -> Option<Transaction> {
    let rope = doc.rope();
    let head = doc.selection().main().head;
    let line = rope.char_to_line(head);
    let column = head - rope.line_to_char(line);

    let target = if down {
        line + 1
    } else {
        line.checked_sub(1)?
    };
    if target >= rope.len_lines() {
        return None;
    }
    let pos = rope.line_to_char(target) + column.min(line_len(doc, target));
    Some(Transaction::select(Selection::cursor(pos), Origin::Navigate))
}

fn line_edge(doc: &Document, end: bool) -> Option<Transaction> {
    let rope = doc.rope();
    let head = doc.selection().main().head;
    let line = rope.char_to_line(head);
    let start = rope.line_to_char(line);
    let pos = if end {
        start + line_len(doc, line)
    } else {
        start
    };
    (pos != head).then(|| Transaction::select(Selection::cursor(pos), Origin::Select))
}
