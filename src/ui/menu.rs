use anyhow::{Context, Result};
use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use std::{
    io,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::shared::constants;
use crate::utils::file_utils;

type UiTerminal = Terminal<CrosstermBackend<io::Stderr>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Splash,
    Video,
    Level,
    Output,
    Confirm,
}

impl Step {
    fn title(self) -> &'static str {
        match self {
            Step::Splash => "Start",
            Step::Video => "Input",
            Step::Level => "Level",
            Step::Output => "Output",
            Step::Confirm => "Confirm",
        }
    }

    fn progress(self) -> &'static str {
        match self {
            Step::Splash => "0/4",
            Step::Video => "1/4",
            Step::Level => "2/4",
            Step::Output => "3/4",
            Step::Confirm => "4/4",
        }
    }
}

pub struct MenuSelection {
    pub input: PathBuf,
    pub output: PathBuf,
    pub level: u32,
}

struct MenuApp {
    step: Step,
    status: String,
    should_quit: bool,
    video_files: Vec<PathBuf>,
    video_index: usize,
    level_input: String,
    level: u32,
    output_input: String,
    selection: Option<MenuSelection>,
}

impl MenuApp {
    fn load() -> Result<Self> {
        let video_files = file_utils::scan_videos(Path::new("."))?;

        Ok(Self {
            step: Step::Splash,
            status: "Enter to start, Esc to quit".to_string(),
            should_quit: false,
            video_files,
            video_index: 0,
            level_input: String::new(),
            level: 0,
            output_input: constants::DEFAULT_OUTPUT_FILE.to_string(),
            selection: None,
        })
    }

    fn on_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('q') if self.step != Step::Output => {
                // 'q' is a valid filename character on the Output step
                self.should_quit = true;
                return;
            }
            _ => {}
        }

        match self.step {
            Step::Splash => {
                if key == KeyCode::Enter {
                    self.step = Step::Video;
                    self.status = "Pick the MP4 file to pixelate".to_string();
                }
            }
            Step::Video => self.handle_video_select(key),
            Step::Level => self.handle_level_input(key),
            Step::Output => self.handle_output_input(key),
            Step::Confirm => self.handle_confirm(key),
        }
    }

    fn handle_video_select(&mut self, key: KeyCode) {
        match key {
            KeyCode::Up | KeyCode::Char('k') => {
                self.video_index = self.video_index.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.video_index + 1 < self.video_files.len() {
                    self.video_index += 1;
                }
            }
            KeyCode::Enter => {
                self.step = Step::Level;
                self.status = format!("Enter a pixelation level ({})", constants::MENU_LEVEL_HINT);
            }
            _ => {}
        }
    }

    fn handle_level_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Backspace => {
                self.level_input.pop();
            }
            KeyCode::Char(c) if c.is_ascii_digit() => {
                self.level_input.push(c);
            }
            KeyCode::Enter => match parse_level(&self.level_input) {
                Some(level) => {
                    self.level = level;
                    self.step = Step::Output;
                    self.status = "Name the output file".to_string();
                }
                None => {
                    self.status = "Level must be a positive integer".to_string();
                }
            },
            _ => {}
        }
    }

    fn handle_output_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Backspace => {
                self.output_input.pop();
            }
            KeyCode::Char(c) if c.is_ascii_alphanumeric() || "._- ".contains(c) => {
                self.output_input.push(c);
            }
            KeyCode::Enter => match normalize_output_name(&self.output_input) {
                Some(name) => {
                    self.output_input = name;
                    self.step = Step::Confirm;
                    self.status = "Enter to run, Backspace to go back, Esc to quit".to_string();
                }
                None => {
                    self.status = "Output filename cannot be empty".to_string();
                }
            },
            _ => {}
        }
    }

    fn handle_confirm(&mut self, key: KeyCode) {
        match key {
            KeyCode::Backspace => {
                self.step = Step::Output;
                self.status = "Name the output file".to_string();
            }
            KeyCode::Enter => {
                self.selection = Some(MenuSelection {
                    input: self.video_files[self.video_index].clone(),
                    output: PathBuf::from(&self.output_input),
                    level: self.level,
                });
                self.should_quit = true;
            }
            _ => {}
        }
    }
}

/// Accepts a positive integer, rejects everything else (`0`, `-5`,
/// `abc`, empty input).
fn parse_level(input: &str) -> Option<u32> {
    match input.trim().parse::<u32>() {
        Ok(level) if level >= 1 => Some(level),
        _ => None,
    }
}

/// Trims the typed filename and appends `.mp4` when no extension was
/// given. Returns `None` for an empty name.
fn normalize_output_name(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    if Path::new(trimmed).extension().is_some() {
        Some(trimmed.to_string())
    } else {
        Some(format!("{}.mp4", trimmed))
    }
}

pub fn run_menu() -> Result<Option<MenuSelection>> {
    let mut app = MenuApp::load()?;

    if app.video_files.is_empty() {
        eprintln!("❌ No MP4 files found in the current directory.");
        return Ok(None);
    }

    let mut terminal = setup_terminal()?;
    let run_result = run_app(&mut terminal, &mut app);
    let restore_result = restore_terminal(&mut terminal);

    if let Err(err) = restore_result {
        crate::utils::logger::error(&format!("failed to restore terminal after menu: {}", err));
    }

    run_result?;

    Ok(app.selection)
}

fn setup_terminal() -> Result<UiTerminal> {
    enable_raw_mode().context("failed to enable raw mode")?;

    let mut stderr = io::stderr();
    execute!(stderr, EnterAlternateScreen, Hide).context("failed to switch to alternate screen")?;

    let backend = CrosstermBackend::new(stderr);
    let terminal = Terminal::new(backend).context("failed to initialize terminal backend")?;

    Ok(terminal)
}

fn restore_terminal(terminal: &mut UiTerminal) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, Show)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;
    Ok(())
}

fn run_app(terminal: &mut UiTerminal, app: &mut MenuApp) -> Result<()> {
    loop {
        terminal.draw(|frame| draw_menu(frame, app))?;

        if app.should_quit {
            break;
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key.code);
                }
            }
        }
    }

    Ok(())
}

fn draw_menu(frame: &mut Frame<'_>, app: &MenuApp) {
    let area = frame.size();

    let block = Block::default().borders(Borders::ALL).title(Span::styled(
        format!(
            " {} | {} ({}) ",
            constants::APP_NAME,
            app.step.title(),
            app.step.progress()
        ),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8),
            Constraint::Min(8),
            Constraint::Length(3),
        ])
        .split(inner);

    draw_logo(frame, layout[0]);

    match app.step {
        Step::Splash => draw_splash(frame, layout[1]),
        Step::Video => draw_video_list(frame, layout[1], app),
        Step::Level => draw_level_input(frame, layout[1], app),
        Step::Output => draw_output_input(frame, layout[1], app),
        Step::Confirm => draw_confirm(frame, layout[1], app),
    }

    draw_footer(frame, layout[2], &app.status);
}

fn draw_logo(frame: &mut Frame<'_>, area: Rect) {
    let lines: Vec<Line<'_>> = constants::MENU_LOGO
        .iter()
        .map(|line| {
            Line::from(Span::styled(
                *line,
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            ))
        })
        .collect();

    let logo = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(logo, area);
}

fn draw_splash(frame: &mut Frame<'_>, area: Rect) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "Block-pixelate an MP4 video",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Enter: start"),
        Line::from("Esc / q: quit"),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });

    frame.render_widget(content, area);
}

fn draw_video_list(frame: &mut Frame<'_>, area: Rect, app: &MenuApp) {
    let items: Vec<ListItem<'_>> = app
        .video_files
        .iter()
        .map(|path| {
            ListItem::new(Line::from(
                path.file_name()
                    .map(|f| f.to_string_lossy().to_string())
                    .unwrap_or_else(|| path.to_string_lossy().to_string()),
            ))
        })
        .collect();

    draw_select_list(frame, area, "Select input video", items, app.video_index);
}

fn draw_level_input(frame: &mut Frame<'_>, area: Rect, app: &MenuApp) {
    let input_block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Pixelation level ({})", constants::MENU_LEVEL_HINT));

    let text = if app.level_input.is_empty() {
        "_".to_string()
    } else {
        format!("{}_", app.level_input)
    };

    let input = Paragraph::new(text)
        .block(input_block)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true });

    frame.render_widget(input, area);
}

fn draw_output_input(frame: &mut Frame<'_>, area: Rect, app: &MenuApp) {
    let input_block = Block::default()
        .borders(Borders::ALL)
        .title("Output filename");

    let text = if app.output_input.is_empty() {
        "_".to_string()
    } else {
        format!("{}_", app.output_input)
    };

    let input = Paragraph::new(text)
        .block(input_block)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true });

    frame.render_widget(input, area);
}

fn draw_confirm(frame: &mut Frame<'_>, area: Rect, app: &MenuApp) {
    let video = app.video_files[app.video_index]
        .file_name()
        .map(|f| f.to_string_lossy().to_string())
        .unwrap_or_else(|| {
            app.video_files[app.video_index]
                .to_string_lossy()
                .to_string()
        });

    let confirm = Paragraph::new(vec![
        Line::from(Span::styled(
            "Run settings",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!("Input:  {}", video)),
        Line::from(format!("Level:  {}", app.level)),
        Line::from(format!("Output: {}", app.output_input)),
        Line::from(""),
        Line::from("Enter: run   Backspace: back   Esc: quit"),
    ])
    .block(Block::default().borders(Borders::ALL));

    frame.render_widget(confirm, area);
}

fn draw_select_list(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &'static str,
    items: Vec<ListItem<'_>>,
    selected: usize,
) {
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    let mut state = ListState::default();
    state.select(Some(selected));
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_footer(frame: &mut Frame<'_>, area: Rect, status: &str) {
    let footer = Paragraph::new(Line::from(vec![
        Span::styled(
            "[↑↓/j,k] move  [Enter] select  [Esc] quit  ",
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(status, Style::default().fg(Color::White)),
    ]))
    .alignment(Alignment::Left)
    .wrap(Wrap { trim: true });

    frame.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_parsing_rejects_invalid_input() {
        assert_eq!(parse_level("5"), Some(5));
        assert_eq!(parse_level(" 50 "), Some(50));
        assert_eq!(parse_level("0"), None);
        assert_eq!(parse_level("-5"), None);
        assert_eq!(parse_level("abc"), None);
        assert_eq!(parse_level(""), None);
    }

    #[test]
    fn output_name_gets_default_extension() {
        assert_eq!(
            normalize_output_name("blocky"),
            Some("blocky.mp4".to_string())
        );
        assert_eq!(
            normalize_output_name("blocky.mp4"),
            Some("blocky.mp4".to_string())
        );
        assert_eq!(normalize_output_name("  "), None);
    }
}
