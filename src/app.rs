use std::ops::Range;
use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEventKind};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::action::Action;
use crate::error::Result;
use crate::event::Event;
use crate::nav::Navigator;
use crate::paging::{PageOutcome, PageRequest, PagedList};
use crate::source::RepoSource;
use crate::types::Repository;
use crate::ui::Viewport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Repos, // Repository list for one user
    About, // Version and key bindings
}

pub struct App {
    pub screen: Screen,
    pub repos: PagedList<Repository>,
    pub selected: usize,
    pub offset: usize,
    pub prompt: Option<String>,
    pub notice: Option<String>,
    pub error: Option<String>,
    pub should_quit: bool,
    visible: Range<usize>,
    initial_user: Option<String>,
    lookup: u64,
    source: Arc<dyn RepoSource>,
    navigator: Arc<dyn Navigator>,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl App {
    pub fn new(
        source: Arc<dyn RepoSource>,
        navigator: Arc<dyn Navigator>,
        action_tx: mpsc::UnboundedSender<Action>,
        page_size: usize,
        user: Option<String>,
    ) -> Self {
        Self {
            screen: Screen::Repos,
            repos: PagedList::new(page_size),
            selected: 0,
            offset: 0,
            prompt: None,
            notice: None,
            error: None,
            should_quit: false,
            visible: 0..0,
            initial_user: user,
            lookup: 0,
            source,
            navigator,
            action_tx,
        }
    }

    pub fn handle_event(&self, event: Event) -> Action {
        match event {
            Event::Init => Action::Load,
            Event::Key(key) => self.handle_key(key),
            Event::Scroll(kind) if self.prompt.is_none() && self.screen == Screen::Repos => {
                match kind {
                    MouseEventKind::ScrollDown => Action::ScrollDown,
                    MouseEventKind::ScrollUp => Action::ScrollUp,
                    _ => Action::None,
                }
            }
            _ => Action::None,
        }
    }

    fn handle_key(&self, key: KeyEvent) -> Action {
        if self.prompt.is_some() {
            return match key.code {
                KeyCode::Enter => Action::PromptConfirm,
                KeyCode::Esc => Action::PromptCancel,
                KeyCode::Backspace => Action::PromptBackspace,
                KeyCode::Char(c) => Action::PromptInput(c),
                _ => Action::None,
            };
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('d') => Action::PageDown,
                KeyCode::Char('u') => Action::PageUp,
                _ => Action::None,
            };
        }

        if self.screen == Screen::About {
            return match key.code {
                KeyCode::Char('q') | KeyCode::Esc => Action::Back,
                _ => Action::None,
            };
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Action::Back,
            KeyCode::Char('j') | KeyCode::Down => Action::ScrollDown,
            KeyCode::Char('k') | KeyCode::Up => Action::ScrollUp,
            KeyCode::Char('g') | KeyCode::Home => Action::GoToTop,
            KeyCode::Char('G') | KeyCode::End => Action::GoToBottom,
            KeyCode::PageDown => Action::PageDown,
            KeyCode::PageUp => Action::PageUp,
            KeyCode::Enter | KeyCode::Char('o') => Action::OpenInBrowser,
            KeyCode::Char('y') => Action::YankUrl,
            KeyCode::Char('r') => Action::Refresh,
            KeyCode::Char('u') => Action::EnterUserPrompt,
            KeyCode::Char('i') => Action::ShowAbout,
            _ => Action::None,
        }
    }

    pub fn update(&mut self, action: Action) {
        if action.is_user_input() {
            self.error = None;
            self.notice = None;
        }

        let moves_selection = matches!(
            action,
            Action::ScrollUp
                | Action::ScrollDown
                | Action::PageUp
                | Action::PageDown
                | Action::GoToTop
                | Action::GoToBottom
        );

        match action {
            Action::Back => match self.screen {
                Screen::Repos => self.should_quit = true,
                Screen::About => self.screen = Screen::Repos,
            },
            Action::ScrollUp => {
                self.selected = self.selected.saturating_sub(1);
            }
            Action::ScrollDown => {
                self.select(self.selected + 1);
            }
            Action::PageUp => {
                self.selected = self.selected.saturating_sub(self.half_page());
            }
            Action::PageDown => {
                self.select(self.selected + self.half_page());
            }
            Action::GoToTop => {
                self.selected = 0;
            }
            Action::GoToBottom => {
                self.select(usize::MAX);
            }

            Action::Load => match self.initial_user.take() {
                Some(user) => {
                    let request = self.repos.start(&user);
                    self.begin(request);
                }
                None => self.spawn_resolve_user(),
            },
            Action::UserResolved(lookup, user) => {
                if lookup == self.lookup {
                    let request = self.repos.start(&user);
                    self.begin(request);
                } else {
                    debug!(user = %user, "ignoring login from an outdated lookup");
                }
            }
            Action::Refresh => match self.repos.user().map(str::to_string) {
                Some(user) => self.show_user(&user),
                None => self.spawn_resolve_user(),
            },
            Action::PageFetched(request, result) => {
                self.on_page_fetched(request, result);
            }
            Action::RowsVisible(viewport) => {
                self.on_viewport(viewport);
            }

            Action::OpenInBrowser => {
                if let Some(repo) = self.selected_repo().filter(|_| self.screen == Screen::Repos) {
                    let name = repo.full_name();
                    match self.navigator.open_url(&repo.url) {
                        Ok(()) => self.notice = Some(format!("Opened {}", name)),
                        Err(e) => self.error = Some(e.to_string()),
                    }
                }
            }
            Action::YankUrl => {
                if let Some(url) = self.selected_url() {
                    match self.navigator.copy_to_clipboard(&url) {
                        Ok(()) => self.notice = Some(format!("Copied {}", url)),
                        Err(e) => self.error = Some(e.to_string()),
                    }
                }
            }
            Action::ShowAbout => {
                self.screen = Screen::About;
            }

            Action::EnterUserPrompt => {
                self.prompt = Some(String::new());
            }
            Action::PromptInput(c) => {
                if let Some(input) = &mut self.prompt {
                    input.push(c);
                }
            }
            Action::PromptBackspace => {
                if let Some(input) = &mut self.prompt {
                    input.pop();
                }
            }
            Action::PromptConfirm => {
                if let Some(input) = self.prompt.take() {
                    self.show_user(&input);
                }
            }
            Action::PromptCancel => {
                self.prompt = None;
            }

            Action::Error(msg) => {
                self.error = Some(msg);
            }
            Action::None => {}
        }

        if moves_selection {
            self.retry_failed_page();
        }
    }

    pub fn selected_repo(&self) -> Option<&Repository> {
        self.repos.get(self.selected)
    }

    fn selected_url(&self) -> Option<String> {
        match self.screen {
            Screen::Repos => self.selected_repo().map(|r| r.url.clone()),
            Screen::About => None,
        }
    }

    fn select(&mut self, index: usize) {
        self.selected = index.min(self.repos.len().saturating_sub(1));
    }

    fn half_page(&self) -> usize {
        (self.visible.len() / 2).max(1)
    }

    /// Throw away the current list and load page 1 for `user`.
    fn show_user(&mut self, user: &str) {
        let result = self.repos.reset(user);
        if result.is_ok() {
            self.lookup += 1;
            self.screen = Screen::Repos;
            self.selected = 0;
            self.offset = 0;
            self.visible = 0..0;
        }
        self.begin(result);
    }

    fn begin(&mut self, request: Result<PageRequest>) {
        match request {
            Ok(request) => self.spawn_fetch(request),
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    /// Report every row that just came on screen, in ascending order.
    fn on_viewport(&mut self, viewport: Viewport) {
        self.offset = viewport.offset;
        if viewport.rows == self.visible {
            return;
        }

        let previous = std::mem::replace(&mut self.visible, viewport.rows.clone());
        for index in viewport.rows {
            if previous.contains(&index) {
                continue;
            }
            if let Some(request) = self.repos.report_visible(index) {
                self.spawn_fetch(request);
            }
        }
    }

    /// After a failed page, moving the selection re-reports the last visible
    /// row, so a list that fits on one screen can still retry.
    fn retry_failed_page(&mut self) {
        if self.repos.last_error().is_none() || self.visible.is_empty() {
            return;
        }
        if let Some(request) = self.repos.report_visible(self.visible.end - 1) {
            self.spawn_fetch(request);
        }
    }

    fn on_page_fetched(&mut self, request: PageRequest, result: Result<Vec<Repository>>) {
        match self.repos.complete(&request, result) {
            PageOutcome::Appended { page, count } => {
                debug!(user = %request.user, page, count, "page appended");
            }
            PageOutcome::Exhausted => {
                debug!(user = %request.user, page = request.page, "no more pages");
            }
            PageOutcome::Failed(msg) => {
                warn!(user = %request.user, page = request.page, "page fetch failed: {}", msg);
                self.error = Some(msg);
            }
            PageOutcome::Stale => {}
        }
        self.select(self.selected);
    }

    fn spawn_fetch(&self, request: PageRequest) {
        let tx = self.action_tx.clone();
        let source = Arc::clone(&self.source);
        let per_page = self.repos.page_size() as u8;
        tokio::spawn(async move {
            let result = source
                .fetch_page(&request.user, request.page, per_page)
                .await;
            tx.send(Action::PageFetched(request, result)).ok();
        });
    }

    fn spawn_resolve_user(&mut self) {
        self.lookup += 1;
        let lookup = self.lookup;
        let tx = self.action_tx.clone();
        let source = Arc::clone(&self.source);
        tokio::spawn(async move {
            let action = match source.current_user().await {
                Ok(Some(login)) => Action::UserResolved(lookup, login),
                Ok(None) => Action::Error(
                    "No user given and no token to find one: pass a login or press u".to_string(),
                ),
                Err(e) => Action::from(e),
            };
            tx.send(action).ok();
        });
    }
}
