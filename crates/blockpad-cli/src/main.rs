mod app;
mod keys;

use anyhow::Result;
use blockpad_config::Config;
use blockpad_engine::{Document, io, language};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Position},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use std::{
    env,
    fs::OpenOptions,
    io::{Stdout, stdout},
    path::PathBuf,
    process,
    time::{Duration, Instant},
};

use app::App;

const TICK: Duration = Duration::from_millis(100);

struct Args {
    dump: bool,
    path: Option<PathBuf>,
}

fn parse_args() -> Args {
    let args: Vec<String> = env::args().collect();
    let mut parsed = Args {
        dump: false,
        path: None,
    };
    for arg in &args[1..] {
        match arg.as_str() {
            "--dump" => parsed.dump = true,
            flag if flag.starts_with('-') => usage(&args[0]),
            path if parsed.path.is_none() => parsed.path = Some(PathBuf::from(path)),
            _ => usage(&args[0]),
        }
    }
    parsed
}

fn usage(program: &str) -> ! {
    eprintln!("Usage: {program} [--dump] [document-path]");
    process::exit(1);
}

/// Log to a file next to the config: the terminal belongs to the UI.
fn init_file_logging() {
    let log_path = Config::config_path().with_file_name("blockpad.log");
    if let Some(parent) = log_path.parent()
        && std::fs::create_dir_all(parent).is_err()
    {
        return;
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_path) else {
        return;
    };
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
}

fn init_stderr_logging() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
}

/// Config from the file, or a fresh one saved for next time.
fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config_path = Config::config_path();
    log::info!("Config path: {}", config_path.display());

    let config = match (Config::load()?, path) {
        (Some(mut config), Some(path)) => {
            config.document_path = path;
            config
        }
        (Some(config), None) => config,
        (None, Some(path)) => Config::new(path),
        (None, None) => {
            let config = Config::new(Config::default_document_path());
            config.save()?;
            log::info!("Created config file at {}", config_path.display());
            config
        }
    };
    Ok(config)
}

fn dump(doc: &Document) {
    for (i, block) in doc.blocks().iter().enumerate() {
        let content = doc.block_content(block);
        let first_line = content.lines().next().unwrap_or("");
        println!(
            "{i}\t{}{}\tdelimiter {}\tcontent {}\t{first_line:?}",
            block.language.name,
            if block.language.auto { "-a" } else { "" },
            block.delimiter,
            block.content,
        );
    }
}

fn main() -> Result<()> {
    let args = parse_args();
    if args.dump {
        init_stderr_logging();
    } else {
        init_file_logging();
    }
    log::info!("blockpad starting up");

    let config = load_config(args.path)?;
    let text = io::load_document(&config.document_path)?;
    let doc = Document::with_settings(&text, &config.editor);

    if args.dump {
        dump(&doc);
        return Ok(());
    }

    let mut app = App::new(doc, config.document_path.clone(), config.detection.clone())?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let res = run_app(&mut terminal, &mut app);
    let saved = app.shutdown();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }
    saved
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|f| ui(f, app))?;

        if event::poll(TICK)?
            && let Event::Key(key) = event::read()?
            && let Err(err) = app.handle_key(&key, Instant::now())
        {
            log::warn!("{err:#}");
            app.status = format!("error: {err}");
        }
        app.tick(Instant::now());
    }
    Ok(())
}

fn ui(f: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(2)])
        .split(f.area());
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(rows[0]);

    let doc = &app.doc;
    let current = doc.current_block_index();

    // Block list panel
    let items: Vec<ListItem> = doc
        .blocks()
        .iter()
        .map(|block| {
            let content = doc.block_content(block);
            let first_line = content.lines().next().unwrap_or("");
            let label = language::label(&block.language.name).unwrap_or("?");
            let auto = if block.language.auto { " (auto)" } else { "" };
            ListItem::new(vec![
                Line::from(Span::styled(
                    format!("{label}{auto}"),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::raw(format!("  {first_line}"))),
            ])
        })
        .collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Blocks"))
        .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));
    let mut list_state = ListState::default();
    list_state.select(Some(current));
    f.render_stateful_widget(list, columns[0], &mut list_state);

    // Content panel
    if let Some(block) = doc.current_block() {
        let content = doc.block_content(block);
        let head = doc.selection().main().head;
        let before: String = content
            .chars()
            .take(head.saturating_sub(block.content.start))
            .collect();
        let cursor_line = before.matches('\n').count();
        let cursor_column = before.rsplit('\n').next().map_or(0, |l| l.chars().count());

        let inner_height = columns[1].height.saturating_sub(2) as usize;
        let scroll = cursor_line.saturating_sub(inner_height.saturating_sub(1));

        let lines: Vec<Line> = content
            .split('\n')
            .map(|line| Line::from(line.to_string()))
            .collect();
        let title = format!(
            "{}{}",
            block.language.name,
            if block.language.auto { "-a" } else { "" }
        );
        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(title))
            .scroll((scroll as u16, 0));
        f.render_widget(paragraph, columns[1]);

        f.set_cursor_position(Position::new(
            columns[1].x + 1 + cursor_column as u16,
            columns[1].y + 1 + (cursor_line - scroll) as u16,
        ));
    }

    // Status and help
    let dirty = if app.is_dirty() { " [+]" } else { "" };
    let detecting = if app.detecting() { " detecting…" } else { "" };
    let status = Line::from(vec![
        Span::raw(format!("{}{dirty}{detecting} ", app.path().display())),
        Span::styled(app.status.clone(), Style::default().fg(Color::Cyan)),
    ]);
    let help = Line::from(
        "Ctrl-s: Save | Esc: Quit | Ctrl-↑/↓: Block | Ctrl-Enter: New | Ctrl-Shift-d: Delete | Ctrl-l: Language",
    );
    f.render_widget(Paragraph::new(vec![status, help]), rows[1]);
}
