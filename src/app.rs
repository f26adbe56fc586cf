use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::config::Config;
use crate::games::boss_quiz::BossQuiz;
use crate::games::memory::PlanetMemory;
use crate::games::sky_defense::SkyDefense;
use crate::games::Game;
use crate::intro::Intro;

pub const GAME_COUNT: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tab {
    Home,
    Memory,
    BossQuiz,
    SkyDefense,
}

impl Tab {
    pub fn all() -> &'static [Tab] {
        &[Tab::Home, Tab::Memory, Tab::BossQuiz, Tab::SkyDefense]
    }

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Home => " Home ",
            Tab::Memory => " Planet Memory ",
            Tab::BossQuiz => " Boss Quiz ",
            Tab::SkyDefense => " Sky Defense ",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Home => 0,
            Tab::Memory => 1,
            Tab::BossQuiz => 2,
            Tab::SkyDefense => 3,
        }
    }

    /// Tab for the gallery tile at `game` (0-based).
    pub fn for_game(game: usize) -> Tab {
        match game {
            0 => Tab::Memory,
            1 => Tab::BossQuiz,
            2 => Tab::SkyDefense,
            _ => Tab::Home,
        }
    }
}

pub struct App {
    pub should_quit: bool,
    pub current_tab: Tab,
    pub selected_game: usize, // 0-2 for gallery tile selection
    pub intro: Intro,
    pub memory: PlanetMemory,
    pub boss_quiz: BossQuiz,
    pub sky_defense: SkyDefense,
    // last observed game-over flag per game, for edge detection
    finished: [bool; GAME_COUNT],
}

impl App {
    pub fn new(config: &Config) -> Self {
        // one seed per game
        let seed = |offset: u64| config.seed.map(|s| s.wrapping_add(offset));
        Self {
            should_quit: false,
            current_tab: Tab::Home,
            selected_game: 0,
            intro: Intro::new(config.skip_intro),
            memory: PlanetMemory::new(seed(0)),
            boss_quiz: BossQuiz::new(seed(1)),
            sky_defense: SkyDefense::new(seed(2)),
            finished: [false; GAME_COUNT],
        }
    }

    pub fn on_tick(&mut self, dt: Duration) {
        match self.current_tab {
            Tab::Home => self.intro.update(dt),
            Tab::Memory => self.memory.update(dt),
            Tab::BossQuiz => self.boss_quiz.update(dt),
            Tab::SkyDefense => self.sky_defense.update(dt),
        }
        self.check_finished();
    }

    fn game(&self, idx: usize) -> Option<&dyn Game> {
        match idx {
            0 => Some(&self.memory),
            1 => Some(&self.boss_quiz),
            2 => Some(&self.sky_defense),
            _ => None,
        }
    }

    /// Logs each game once as it enters its end state, and re-arms after a restart.
    fn check_finished(&mut self) {
        for idx in 0..GAME_COUNT {
            let Some(game) = self.game(idx) else {
                continue;
            };
            let (over, score) = (game.is_game_over(), game.get_score());
            if over && !self.finished[idx] {
                tracing::info!(game = Tab::for_game(idx).title().trim(), score, "game finished");
            }
            self.finished[idx] = over;
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        // Ctrl+C always quits
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        // Any key finishes the intro, and that key is spent
        if self.current_tab == Tab::Home && self.intro.is_playing() {
            self.intro.skip();
            return;
        }

        // Global keys
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                if self.current_tab == Tab::Home {
                    self.should_quit = true;
                    return;
                }
            }
            KeyCode::Tab => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    self.prev_tab();
                } else {
                    self.next_tab();
                }
                return;
            }
            KeyCode::BackTab => {
                self.prev_tab();
                return;
            }
            KeyCode::Esc => {
                if self.current_tab != Tab::Home {
                    self.current_tab = Tab::Home;
                    return;
                }
            }
            _ => {}
        }

        // Gallery shortcuts and navigation
        if self.current_tab == Tab::Home && key.modifiers.is_empty() {
            match key.code {
                KeyCode::Char(c @ '1'..='3') => {
                    let game = (c as u8 - b'1') as usize;
                    self.selected_game = game;
                    self.launch(game);
                }
                KeyCode::Right | KeyCode::Down => {
                    self.selected_game = (self.selected_game + 1) % GAME_COUNT;
                }
                KeyCode::Left | KeyCode::Up => {
                    self.selected_game = (self.selected_game + GAME_COUNT - 1) % GAME_COUNT;
                }
                KeyCode::Enter => self.launch(self.selected_game),
                _ => {}
            }
            return;
        }

        // Forward to active game
        match self.current_tab {
            Tab::Home => {}
            Tab::Memory => self.memory.handle_input(key),
            Tab::BossQuiz => self.boss_quiz.handle_input(key),
            Tab::SkyDefense => self.sky_defense.handle_input(key),
        }
        self.check_finished();
    }

    fn launch(&mut self, game: usize) {
        self.current_tab = Tab::for_game(game);
        tracing::debug!(tab = self.current_tab.title().trim(), "launching game");
    }

    fn next_tab(&mut self) {
        let tabs = Tab::all();
        let idx = self.current_tab.index();
        self.current_tab = tabs[(idx + 1) % tabs.len()];
    }

    fn prev_tab(&mut self) {
        let tabs = Tab::all();
        let idx = self.current_tab.index();
        self.current_tab = tabs[(idx + tabs.len() - 1) % tabs.len()];
    }
}
