mod app;
mod event;
mod ui;

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::{Parser, ValueEnum};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use rust_i18n::t;
use tracing::{error, info, warn};

use skyryba::config::Config;
use skyryba::session::Identity;
use skyryba::task::remote::RemoteTasks;
use skyryba::task::source::{BundledTasks, FileTasks};
use skyryba::task::{TaskKind, TaskSource, upload};
use skyryba::telemetry;

use app::{App, AppScreen};
use event::{AppEvent, EventHandler};
use ui::components::options_bar::OptionsBar;
use ui::components::progress_bar::ProgressBar;
use ui::components::sentence_view::SentenceView;
use ui::components::summary::Summary;
use ui::components::task_review::TaskReview;
use ui::layout::{AppLayout, ExerciseLayout, pack_hint_lines};

rust_i18n::i18n!("locales", fallback = "en");

#[derive(Clone, Copy, Debug, ValueEnum)]
enum KindArg {
    Punctuation,
    Spelling,
}

impl From<KindArg> for TaskKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Punctuation => TaskKind::Punctuation,
            KindArg::Spelling => TaskKind::Spelling,
        }
    }
}

#[derive(Parser)]
#[command(
    name = "skyryba",
    version,
    about = "Terminal tutor for Lithuanian punctuation and spelling"
)]
struct Cli {
    #[arg(short, long, value_enum, help = "Skip the menu and start this exercise")]
    kind: Option<KindArg>,

    #[arg(long, value_name = "PATH", help = "Load tasks from a JSON file")]
    tasks: Option<PathBuf>,

    #[arg(
        long,
        value_name = "URL",
        conflicts_with = "tasks",
        help = "Download tasks from a URL (cached for offline use)"
    )]
    url: Option<String>,

    #[arg(short, long, help = "Learner name; progress is saved under it")]
    name: Option<String>,

    #[arg(long, conflicts_with = "name", help = "Practice without saving progress")]
    guest: bool,

    #[arg(short, long, help = "Interface language (lt, en)")]
    locale: Option<String>,

    #[arg(short, long, help = "Seconds per task, 0 disables the timer")]
    seconds: Option<u64>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(
        long,
        value_name = "PATH",
        help = "Check a task file (use --kind for spelling) and exit"
    )]
    validate: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.validate {
        let kind = cli.kind.map(TaskKind::from).unwrap_or(TaskKind::Punctuation);
        return match upload::load_file(path, kind) {
            Ok(tasks) => {
                println!("{}: {} {} tasks OK", path.display(), tasks.len(), kind.as_str());
                Ok(())
            }
            Err(err) => {
                eprintln!("{}: {err}", path.display());
                std::process::exit(1);
            }
        };
    }

    if let Err(err) = telemetry::init_tracing(&telemetry::default_log_dir()) {
        eprintln!("logging disabled: {err}");
    }

    let mut config = Config::load().unwrap_or_else(|err| {
        warn!(error = %err, "unreadable config, using defaults");
        Config::default()
    });
    if let Some(name) = cli.name {
        config.learner_name = Some(name);
    }
    if cli.guest {
        config.learner_name = None;
    }
    if let Some(locale) = cli.locale {
        config.locale = locale;
    }
    if let Some(seconds) = cli.seconds {
        config.seconds_per_task = seconds;
    }
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    let locales = rust_i18n::available_locales!();
    config.validate(&locales);
    rust_i18n::set_locale(&config.locale);

    let theme = ui::theme::Theme::load(&config.theme).unwrap_or_default();
    let theme: &'static ui::theme::Theme = Box::leak(Box::new(theme));

    let source: Box<dyn TaskSource> = match (cli.tasks, cli.url) {
        (Some(path), _) => Box::new(FileTasks::new(path)),
        (None, Some(url)) => Box::new(RemoteTasks::new(url)),
        (None, None) => Box::new(BundledTasks),
    };

    let mut app = App::new(config, theme, source);
    if let Some(kind) = cli.kind {
        app.start_exercise(kind.into());
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        error!(error = %err, "terminal loop failed");
        eprintln!("Error: {err:?}");
    }
    info!("bye");

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => {
                handle_key(app, key);
                // Ticks pause while keys keep arriving.
                app.tick(Instant::now());
            }
            AppEvent::Tick(now) => app.tick(now),
            AppEvent::Resize => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Menu => handle_menu_key(app, key),
        AppScreen::Exercise => handle_exercise_key(app, key),
        AppScreen::Summary => handle_summary_key(app, key),
        AppScreen::Review => handle_review_key(app, key),
    }
}

fn digit(code: KeyCode) -> Option<usize> {
    match code {
        KeyCode::Char(ch) => ch.to_digit(10).map(|d| d as usize),
        _ => None,
    }
}

fn handle_menu_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('1') => app.start_exercise(TaskKind::Punctuation),
        KeyCode::Char('2') => app.start_exercise(TaskKind::Spelling),
        KeyCode::Up | KeyCode::Char('k') => app.menu.prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu.next(),
        KeyCode::Enter => app.start_exercise(app.menu.selected_kind()),
        _ => {}
    }
}

fn handle_exercise_key(app: &mut App, key: KeyEvent) {
    if let Some(number) = digit(key.code) {
        app.choose_option(number);
        return;
    }
    let editable = app.kind_is_editable();
    match key.code {
        KeyCode::Esc => app.go_to_menu(),
        KeyCode::Enter => app.submit(),
        KeyCode::Tab => app.skip(),
        KeyCode::Left if editable => app.move_gap(-1),
        KeyCode::Right if editable => app.move_gap(1),
        KeyCode::Left | KeyCode::Up => app.move_option(-1),
        KeyCode::Right | KeyCode::Down => app.move_option(1),
        KeyCode::Backspace | KeyCode::Delete => app.delete_mark(),
        // Marks can also be typed directly.
        KeyCode::Char(ch) if editable => {
            let mark = ch.to_string();
            if app.current_options().contains(&mark) {
                app.insert_mark(&mark);
            }
        }
        _ => {}
    }
}

fn handle_summary_key(app: &mut App, key: KeyEvent) {
    // Tasks are numbered from one on screen.
    if let Some(number) = digit(key.code).filter(|n| *n > 0) {
        app.review(number - 1);
        return;
    }
    match key.code {
        KeyCode::Char('r') => app.restart(),
        KeyCode::Char('q') | KeyCode::Esc => app.go_to_menu(),
        KeyCode::Up | KeyCode::Char('k') => app.move_summary_selection(-1),
        KeyCode::Down | KeyCode::Char('j') => app.move_summary_selection(1),
        KeyCode::Enter => app.review(app.summary_selected),
        _ => {}
    }
}

fn handle_review_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => app.close_review(),
        KeyCode::Left | KeyCode::Up => app.review_step(-1),
        KeyCode::Right | KeyCode::Down => app.review_step(1),
        KeyCode::Char('r') => app.restart(),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    let hints = footer_hints(app);
    let hint_refs: Vec<&str> = hints.iter().map(String::as_str).collect();
    let footer_lines = pack_hint_lines(&hint_refs, area.width as usize);
    let layout = AppLayout::new(area, footer_lines.len() as u16);

    render_header(frame, app, layout.header);

    match app.screen {
        AppScreen::Menu => {
            let menu_area = ui::layout::centered_rect(50, 70, layout.main);
            frame.render_widget(&app.menu, menu_area);
        }
        AppScreen::Exercise => render_exercise(frame, app, layout.main),
        AppScreen::Summary => render_summary(frame, app, layout.main),
        AppScreen::Review => render_review(frame, app, layout.main),
    }

    let footer: Vec<Line> = footer_lines
        .into_iter()
        .map(|l| Line::from(Span::styled(l, Style::default().fg(colors.text_pending()))))
        .collect();
    frame.render_widget(Paragraph::new(footer), layout.footer);
}

fn footer_hints(app: &App) -> Vec<String> {
    let keys: &[&str] = match app.screen {
        AppScreen::Menu => &["footer.start", "footer.select", "footer.quit"],
        AppScreen::Exercise if app.kind_is_editable() => &[
            "footer.gap",
            "footer.insert",
            "footer.remove",
            "footer.submit",
            "footer.skip",
            "footer.menu",
        ],
        AppScreen::Exercise => &[
            "footer.answer",
            "footer.choose",
            "footer.submit",
            "footer.skip",
            "footer.menu",
        ],
        AppScreen::Summary => &[
            "footer.select",
            "footer.review",
            "footer.restart",
            "footer.menu",
        ],
        AppScreen::Review => &["footer.browse", "footer.back", "footer.restart"],
    };
    keys.iter().map(|k| t!(*k).into_owned()).collect()
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let colors = &app.theme.colors;

    let who = match &app.identity {
        Identity::Guest => t!("header.guest").into_owned(),
        Identity::Learner { name } => name.clone(),
    };
    let info = match app.screen {
        AppScreen::Exercise => t!(
            "header.exercise",
            kind = t!(format!("kind.{}", app.session.task_kind().as_str())),
            current = app.session.current_index() + 1,
            total = app.session.tasks().len(),
            score = app.session.score()
        )
        .into_owned(),
        _ => t!(
            "header.profile",
            best = app.profile.high_score,
            streak = app.profile.streak_days,
            accuracy = format!("{:.0}", app.profile.accuracy())
        )
        .into_owned(),
    };

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " skyryba ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {who} | {info} | {}", app.source.describe()),
            Style::default()
                .fg(colors.text_pending())
                .bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, area);
}

fn render_exercise(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let colors = &app.theme.colors;
    let Some(task) = app.session.current_task() else {
        return;
    };

    let layout = ExerciseLayout::new(area, app.timer.is_enabled());

    let title = match &task.topic {
        Some(topic) => format!("{} | {topic}", t!(format!("kind.{}", task.kind.as_str()))),
        None => t!(format!("kind.{}", task.kind.as_str())).into_owned(),
    };
    frame.render_widget(SentenceView::new(task, title, app.theme), layout.sentence);

    if let Some(flash) = &app.flash {
        let (text, color) = if flash.correct {
            (
                format!(" {} +{}", t!("feedback.correct"), flash.points),
                colors.success(),
            )
        } else {
            (
                format!(
                    " {}",
                    t!("feedback.incorrect", answer = flash.correct_answer)
                ),
                colors.error(),
            )
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(text, Style::default().fg(color)))),
            layout.feedback,
        );
    }

    let selected = (!task.kind.is_editable()).then_some(app.option_cursor);
    frame.render_widget(
        OptionsBar::new(&task.options, t!("exercise.options"), app.theme).selected(selected),
        layout.options,
    );

    if let Some(timer_area) = layout.timer {
        let now = Instant::now();
        let bar = ProgressBar::new(
            &t!("exercise.time"),
            &app.timer.display(now),
            app.timer.ratio(now),
            app.theme,
        );
        frame.render_widget(bar, timer_area);
    }
}

fn render_summary(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let Some(result) = app.session.result() else {
        return;
    };
    let profile = (!app.identity.is_guest()).then_some(&app.profile);
    let centered = ui::layout::centered_rect(70, 80, area);
    let summary = Summary::new(result, app.session.tasks(), app.summary_selected, app.theme)
        .profile(profile)
        .message(app.feedback_message());
    frame.render_widget(summary, centered);
}

fn render_review(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let Some(task) = app.session.current_task() else {
        return;
    };
    let centered = ui::layout::centered_rect(80, 90, area);
    let review = TaskReview::new(
        task,
        app.session.current_index(),
        app.session.tasks().len(),
        app.theme,
    );
    frame.render_widget(review, centered);
}
