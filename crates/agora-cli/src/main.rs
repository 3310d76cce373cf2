mod view;

use agora_config::{Config, ConfigError};
use agora_engine::content::{self, ValidationOptions};
use agora_engine::forum::{Forum, ForumSettings, Post};
use agora_engine::io::{self, FileStore};
use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use std::{
    env,
    io::{Stdout, stdout},
    path::{Path, PathBuf},
    process,
};

struct App {
    forum: Forum<FileStore>,
    posts: Vec<Post>,
    post_list_state: ListState,
    current_content: Vec<Line<'static>>,
}

impl App {
    fn new(forum: Forum<FileStore>) -> Result<Self> {
        let posts = all_posts(&forum)?;

        let mut app = Self {
            forum,
            posts,
            post_list_state: ListState::default(),
            current_content: Vec::new(),
        };

        if !app.posts.is_empty() {
            app.post_list_state.select(Some(0));
            app.update_content_for_selection();
        }

        Ok(app)
    }

    fn next_post(&mut self) {
        if self.posts.is_empty() {
            return;
        }
        let i = match self.post_list_state.selected() {
            Some(i) => (i + 1) % self.posts.len(),
            None => 0,
        };
        self.post_list_state.select(Some(i));
        self.update_content_for_selection();
    }

    fn previous_post(&mut self) {
        if self.posts.is_empty() {
            return;
        }
        let i = match self.post_list_state.selected() {
            Some(0) | None => self.posts.len() - 1,
            Some(i) => i - 1,
        };
        self.post_list_state.select(Some(i));
        self.update_content_for_selection();
    }

    fn update_content_for_selection(&mut self) {
        if let Some(index) = self.post_list_state.selected()
            && let Some(post) = self.posts.get(index)
        {
            self.current_content = match self.post_lines(post) {
                Ok(lines) => lines,
                Err(e) => vec![Line::from(format!("Error loading post: {e}"))],
            };
        }
    }

    fn author_name(&self, author_id: &str) -> String {
        self.forum
            .get_user(author_id)
            .map(|user| user.name)
            .unwrap_or_else(|_| "unknown".to_string())
    }

    fn post_lines(&self, post: &Post) -> Result<Vec<Line<'static>>> {
        let mut lines = vec![
            Line::from(Span::styled(
                post.title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!(
                    "by {} on {}",
                    self.author_name(&post.author_id),
                    post.created_at.format("%Y-%m-%d %H:%M")
                ),
                Style::default().fg(Color::DarkGray),
            )),
            Line::default(),
        ];
        lines.extend(view::element_lines(&content::render(&post.content), ""));

        let comments = self.forum.list_comments(&post.id)?;
        let depths = view::reply_depths(&comments);
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            format!("Comments ({})", comments.len()),
            Style::default().add_modifier(Modifier::UNDERLINED),
        )));

        for comment in &comments {
            let indent = "  ".repeat(depths.get(&comment.id).copied().unwrap_or(0) + 1);
            lines.push(Line::from(Span::styled(
                format!("{indent}{}:", self.author_name(&comment.author_id)),
                Style::default().fg(Color::Cyan),
            )));
            lines.extend(view::element_lines(
                &content::render(&comment.content),
                &indent,
            ));
        }

        Ok(lines)
    }
}

/// Walk the paged listing so the post list shows everything, newest first.
fn all_posts(forum: &Forum<FileStore>) -> Result<Vec<Post>> {
    let page_size = forum.settings().page_size;
    let mut posts = Vec::new();
    for page in 1.. {
        let batch = forum.list_posts(page, None)?;
        let last_page = batch.len() < page_size;
        posts.extend(batch);
        if last_page {
            break;
        }
    }
    Ok(posts)
}

/// What the command line asked for.
#[derive(Debug, PartialEq)]
enum Command {
    /// Print a document file as text and HTML.
    Render(PathBuf),
    /// Browse a data dir, or the one named in the config file.
    Browse(Option<PathBuf>),
}

/// `None` means the arguments fit no command and usage should be shown.
fn parse_command(args: &[String]) -> Option<Command> {
    match args {
        [_] => Some(Command::Browse(None)),
        [_, command] if command == "render" => None,
        [_, data_path] => Some(Command::Browse(Some(PathBuf::from(data_path)))),
        [_, command, file] if command == "render" => Some(Command::Render(PathBuf::from(file))),
        _ => None,
    }
}

/// Limits for a data dir given on the command line. A broken config file
/// does not block browsing, but it is reported.
fn settings_from(loaded: Result<Option<Config>, ConfigError>) -> ForumSettings {
    match loaded {
        Ok(Some(config)) => config.forum_settings(),
        Ok(None) => ForumSettings::default(),
        Err(e) => {
            log::warn!("Ignoring config file, using default limits: {e}");
            ForumSettings::default()
        }
    }
}

fn print_usage(program: &str) {
    eprintln!("Usage: {program} [data-folder-path]");
    eprintln!("       {program} render <content.json>");
}

/// Validate a document file, then print its text and HTML.
fn render_file(path: &Path) -> Result<()> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value = content::parse_json(&json)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;
    let accepted = content::accept(&value, &ValidationOptions::default())
        .with_context(|| format!("{} was rejected", path.display()))?;

    println!("{}", accepted.raw_text);
    println!("{}", content::render_html(&accepted.document));
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("agora-cli");
    let command = match parse_command(&args) {
        Some(Command::Render(path)) => return render_file(&path),
        Some(Command::Browse(data_path)) => data_path,
        None => {
            print_usage(program);
            process::exit(1);
        }
    };

    // Determine data path from CLI args or config file
    let config_path = Config::config_path();

    let data_path;
    let settings;
    let from_config;

    if let Some(path) = command {
        data_path = path;
        // Limits still come from the config file when there is one
        settings = settings_from(Config::load());
        from_config = false;
    } else {
        match Config::load() {
            Ok(Some(config)) => {
                settings = config.forum_settings();
                data_path = config.data_path;
                from_config = true;
            }
            Ok(None) => {
                eprintln!("Error: No data path provided and no config file found");
                eprintln!("Usage: {program} <data-folder-path>");
                eprintln!("Or create a config file at {}", config_path.display());
                process::exit(1);
            }
            Err(e) => {
                eprintln!("Error: Failed to load config file: {e}");
                eprintln!("Usage: {program} <data-folder-path>");
                process::exit(1);
            }
        }
    }

    if let Err(e) = io::validate_data_dir(&data_path) {
        let source = if from_config {
            format!(" from config file '{}'", config_path.display())
        } else {
            String::new()
        };
        eprintln!(
            "Error: Data path '{}'{} is invalid: {e}",
            data_path.display(),
            source
        );
        process::exit(1);
    }

    log::info!("opening forum data at {}", data_path.display());
    let forum = Forum::with_settings(FileStore::open(&data_path)?, settings);
    let mut app = App::new(forum)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => app.next_post(),
                KeyCode::Up | KeyCode::Char('k') => app.previous_post(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(f.area());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(rows[0]);

    // Post list panel
    let post_items: Vec<ListItem> = app
        .posts
        .iter()
        .map(|post| {
            ListItem::new(vec![
                Line::from(Span::raw(post.title.clone())),
                Line::from(Span::styled(
                    app.forum.post_preview(post),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
        })
        .collect();

    let posts_list = List::new(post_items)
        .block(Block::default().borders(Borders::ALL).title("Posts"))
        .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));

    f.render_stateful_widget(posts_list, columns[0], &mut app.post_list_state);

    // Post panel
    let content_text = if app.current_content.is_empty() {
        vec![Line::from("No posts yet")]
    } else {
        app.current_content.clone()
    };

    let content = Paragraph::new(content_text)
        .block(Block::default().borders(Borders::ALL).title("Post"))
        .wrap(Wrap { trim: false });

    f.render_widget(content, columns[1]);

    let help = Paragraph::new(Line::from("q: Quit | ↑/k: Previous | ↓/j: Next"));
    f.render_widget(help, rows[1]);
}
