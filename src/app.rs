use std::sync::mpsc;
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rust_i18n::t;
use tracing::{info, warn};

use skyryba::config::Config;
use skyryba::session::{
    BackgroundSink, Countdown, ExerciseSession, Feedback, Identity, Mode, NullSink, ProgressSink,
    SessionResult,
};
use skyryba::store::schema::ProfileData;
use skyryba::store::{JsonStore, StoreSink};
use skyryba::task::{self, TaskKind, TaskSource};

use crate::ui::components::menu::Menu;
use crate::ui::theme::Theme;

/// How long the verdict for the previous answer stays on screen.
const FLASH_DURATION: Duration = Duration::from_secs(3);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Menu,
    Exercise,
    Summary,
    Review,
}

/// Verdict shown under the sentence after an answer moves the session on.
#[derive(Clone, Debug)]
pub struct Flash {
    pub correct: bool,
    pub points: u32,
    pub correct_answer: String,
    pub shown_at: Instant,
}

pub struct App {
    pub screen: AppScreen,
    pub menu: Menu<'static>,
    pub theme: &'static Theme,
    pub config: Config,
    pub identity: Identity,
    pub profile: ProfileData,
    pub store: Option<JsonStore>,
    pub session: ExerciseSession,
    pub source: Box<dyn TaskSource>,
    pub kind: TaskKind,
    pub timer: Countdown,
    pub gap_cursor: usize,
    pub option_cursor: usize,
    pub summary_selected: usize,
    pub flash: Option<Flash>,
    pub should_quit: bool,
    timer_task: Option<usize>,
    saved: Option<mpsc::Receiver<SessionResult>>,
    rng: SmallRng,
}

impl App {
    pub fn new(config: Config, theme: &'static Theme, source: Box<dyn TaskSource>) -> Self {
        let identity = Identity::from_name(config.learner_name.as_deref());
        let store = JsonStore::new()
            .inspect_err(|err| warn!(error = %err, "progress store unavailable"))
            .ok();

        let profile = match (&store, &identity) {
            (Some(store), Identity::Learner { name }) => store.load_profile(name),
            _ => ProfileData::default(),
        };

        let (sink, saved): (Box<dyn ProgressSink>, _) = match &store {
            Some(store) => {
                let (sink, saved) =
                    BackgroundSink::spawn(StoreSink::new(store.clone(), identity.clone()));
                (Box::new(sink), Some(saved))
            }
            None => (Box::new(NullSink), None),
        };
        let session = ExerciseSession::new(sink).with_multiplier(config.score_multiplier);

        info!(
            source = %source.describe(),
            guest = identity.is_guest(),
            "app ready"
        );

        Self {
            screen: AppScreen::Menu,
            menu: Menu::new(theme),
            theme,
            timer: Countdown::new(config.seconds_per_task),
            config,
            identity,
            profile,
            store,
            session,
            source,
            kind: TaskKind::Punctuation,
            gap_cursor: 0,
            option_cursor: 0,
            summary_selected: 0,
            flash: None,
            should_quit: false,
            timer_task: None,
            saved,
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn start_exercise(&mut self, kind: TaskKind) {
        self.kind = kind;
        let tasks = match self.source.load(kind) {
            Ok(tasks) => tasks,
            Err(err) => {
                warn!(source = %self.source.describe(), error = %err, "could not load tasks");
                self.menu.notice = Some(t!("notice.load_failed", error = err.to_string()).into_owned());
                return;
            }
        };
        let tasks = task::prepare(
            tasks,
            self.config.shuffle_tasks,
            self.config.tasks_per_session,
            &mut self.rng,
        );
        self.menu.notice = None;
        self.flash = None;
        self.summary_selected = 0;
        self.timer_task = None;
        self.session.start(tasks);
        self.sync(Instant::now());
    }

    pub fn restart(&mut self) {
        self.flash = None;
        self.summary_selected = 0;
        self.timer_task = None;
        self.session.restart();
        self.sync(Instant::now());
    }

    pub fn go_to_menu(&mut self) {
        self.timer.stop();
        self.timer_task = None;
        self.screen = AppScreen::Menu;
    }

    /// Move the gap cursor by `delta` gaps and select the gap under it.
    pub fn move_gap(&mut self, delta: isize) {
        let count = self
            .session
            .current_task()
            .map(|t| t.highlights.len())
            .unwrap_or(0);
        if count == 0 {
            return;
        }
        self.gap_cursor = self
            .gap_cursor
            .saturating_add_signed(delta)
            .min(count - 1);
        self.select_gap_under_cursor();
    }

    fn select_gap_under_cursor(&mut self) {
        let space_index = self
            .session
            .current_task()
            .and_then(|t| t.highlights.nth(self.gap_cursor))
            .map(|h| h.space_index);
        if let Some(space_index) = space_index {
            self.session.select_gap(space_index);
        }
    }

    pub fn move_option(&mut self, delta: isize) {
        let count = self.current_options().len();
        if count == 0 {
            return;
        }
        self.option_cursor = self
            .option_cursor
            .saturating_add_signed(delta)
            .min(count - 1);
    }

    pub fn current_options(&self) -> &[String] {
        self.session
            .current_task()
            .map(|t| t.options.as_slice())
            .unwrap_or(&[])
    }

    /// Digit key: insert the numbered mark, or answer with the numbered
    /// option when the task is multiple choice.
    pub fn choose_option(&mut self, number: usize) {
        let Some(option) = number
            .checked_sub(1)
            .and_then(|i| self.current_options().get(i))
            .cloned()
        else {
            return;
        };
        if self.kind_is_editable() {
            self.insert_mark(&option);
        } else {
            self.submit_with(Some(&option));
        }
    }

    pub fn insert_mark(&mut self, mark: &str) {
        if self.session.insert_mark(mark).changed() {
            self.select_gap_under_cursor();
        }
    }

    pub fn delete_mark(&mut self) {
        if self.session.delete_mark().changed() {
            self.select_gap_under_cursor();
        }
    }

    /// Enter: punctuation tasks are graded on their text, others on the
    /// option under the cursor.
    pub fn submit(&mut self) {
        if self.kind_is_editable() {
            self.submit_with(None);
        } else {
            let option = self.current_options().get(self.option_cursor).cloned();
            self.submit_with(option.as_deref());
        }
    }

    fn submit_with(&mut self, selected: Option<&str>) {
        let Some(verdict) = self.session.submit_answer(selected) else {
            return;
        };
        let correct_answer = self
            .session
            .tasks()
            .get(verdict.task_index)
            .map(|t| t.correct_answer.clone())
            .unwrap_or_default();
        self.flash = Some(Flash {
            correct: verdict.correct,
            points: verdict.points,
            correct_answer,
            shown_at: Instant::now(),
        });
        self.sync(Instant::now());
    }

    pub fn skip(&mut self) {
        self.flash = None;
        self.session.skip();
        self.sync(Instant::now());
    }

    pub fn move_summary_selection(&mut self, delta: isize) {
        let count = self.session.tasks().len();
        if count == 0 {
            return;
        }
        self.summary_selected = self
            .summary_selected
            .saturating_add_signed(delta)
            .min(count - 1);
    }

    pub fn review(&mut self, index: usize) {
        if self.session.jump_to_task(index) {
            self.summary_selected = index;
        }
        self.sync(Instant::now());
    }

    pub fn review_step(&mut self, delta: isize) {
        let count = self.session.tasks().len();
        let index = self.session.current_index().saturating_add_signed(delta);
        if index < count {
            self.review(index);
        }
    }

    pub fn close_review(&mut self) {
        self.session.close_review();
        self.sync(Instant::now());
    }

    /// Called on every tick: drives the countdown, clears stale flashes and
    /// picks up progress the background writer has saved.
    pub fn tick(&mut self, now: Instant) {
        let saved = self.saved.as_ref().map_or(0, |rx| rx.try_iter().count());
        if saved > 0 {
            self.reload_profile();
        }
        if self
            .flash
            .as_ref()
            .is_some_and(|f| now.saturating_duration_since(f.shown_at) > FLASH_DURATION)
        {
            self.flash = None;
        }
        if self.screen == AppScreen::Exercise && self.timer.poll_expired(now) {
            info!(task = self.session.current_index(), "time ran out");
            self.session.time_expired();
            self.sync(now);
        }
    }

    pub fn kind_is_editable(&self) -> bool {
        self.session
            .current_task()
            .map(|t| t.kind.is_editable())
            .unwrap_or(false)
    }

    /// Feedback left on the session, rendered in the active locale.
    pub fn feedback_message(&self) -> Option<String> {
        self.session.feedback().map(|feedback| match feedback {
            Feedback::Correct => t!("feedback.correct").into_owned(),
            Feedback::Incorrect { correct_answer } => {
                t!("feedback.incorrect", answer = correct_answer).into_owned()
            }
            Feedback::InvalidTaskIndex { index } => {
                t!("feedback.invalid_task", number = index + 1).into_owned()
            }
        })
    }

    /// Bring screen, timer and cursors in line with the session after any
    /// state change.
    fn sync(&mut self, now: Instant) {
        self.screen = match self.session.mode() {
            Mode::NotStarted => AppScreen::Menu,
            Mode::Practicing => AppScreen::Exercise,
            Mode::Reviewing => AppScreen::Review,
            Mode::Summary => AppScreen::Summary,
        };

        if self.screen == AppScreen::Exercise {
            let index = self.session.current_index();
            if self.timer_task != Some(index) {
                self.timer_task = Some(index);
                self.timer.reset(now);
                self.gap_cursor = 0;
                self.option_cursor = 0;
                self.select_gap_under_cursor();
            }
        } else {
            self.timer.stop();
            self.timer_task = None;
        }
    }

    fn reload_profile(&mut self) {
        let (Some(store), Identity::Learner { name }) = (&self.store, &self.identity) else {
            return;
        };
        self.profile = store.load_profile(name);
    }
}
