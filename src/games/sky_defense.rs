use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::content::{ENEMIES_PER_WAVE, ENEMY_ICONS, WORD_LISTS};
use crate::engine::{Arena, EntityId, Ending, Fired, Outcome, Scheduler, TimerId};
use crate::games::{seeded_rng, Game};

const FIELD_W: f32 = 800.0;
const FIELD_H: f32 = 400.0;
const ENEMY_MARGIN: f32 = 100.0;

const FRAME_MS: u64 = 16; // ~60 FPS
const CASTLE_HP: u32 = 100;
const HIT_DAMAGE: u32 = 10;
const POINTS_PER_LETTER: u32 = 10;
const WAVE_BANNER_MS: u64 = 2000;
const WAVE_PAUSE_MS: u64 = 2000;
const LASER_MS: u64 = 200;
const ERROR_FLASH_MS: u64 = 200;
const SHAKE_MS: u64 = 500;

/// Word lists and enemy quotas, indexed by wave (1-based). Waves past the
/// end of either table reuse its last entry.
#[derive(Clone, Debug)]
pub struct WaveTable {
    word_lists: Vec<&'static [&'static str]>,
    enemies_per_wave: Vec<u32>,
}

impl WaveTable {
    /// Empty word lists are dropped; with nothing left the built-in tables are used.
    pub fn new(word_lists: Vec<&'static [&'static str]>, enemies_per_wave: Vec<u32>) -> Self {
        let word_lists: Vec<_> = word_lists.into_iter().filter(|list| !list.is_empty()).collect();
        if word_lists.is_empty() || enemies_per_wave.is_empty() {
            return Self::default();
        }
        Self {
            word_lists,
            enemies_per_wave,
        }
    }

    pub fn waves(&self) -> u32 {
        self.word_lists.len() as u32
    }

    pub fn word_list(&self, wave: u32) -> &'static [&'static str] {
        let index = (wave.max(1) as usize - 1).min(self.word_lists.len() - 1);
        self.word_lists[index]
    }

    pub fn quota(&self, wave: u32) -> u32 {
        let index = (wave.max(1) as usize - 1).min(self.enemies_per_wave.len() - 1);
        self.enemies_per_wave[index]
    }

    pub fn spawn_interval_ms(wave: u32) -> u64 {
        2500u64.saturating_sub(wave as u64 * 500).max(800)
    }
}

impl Default for WaveTable {
    fn default() -> Self {
        Self {
            word_lists: WORD_LISTS.to_vec(),
            enemies_per_wave: ENEMIES_PER_WAVE.to_vec(),
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum DefenseEvent {
    Frame,
    BeginSpawning,
    Spawn,
    NextWave,
    LaserFade(EntityId),
    FlashEnd,
    ShakeEnd,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WavePhase {
    /// "WAVE n" banner is up; nothing spawns yet.
    Banner,
    InProgress,
    Cleared,
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub word: &'static str,
    pub icon: char,
    pub x: f32,
    pub y: f32,
    pub speed: f32,
    pub from_left: bool,
}

#[derive(Clone, Debug)]
struct Laser {
    to_x: f32,
    to_y: f32,
}

/// Outcome of one buffer edit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Typed {
    Ignored,
    Progress,
    Destroyed { points: u32 },
    Rejected,
}

pub struct SkyDefense {
    waves: WaveTable,
    score: u32,
    castle_hp: u32,
    wave: u32,
    waves_cleared: u32,
    phase: WavePhase,
    spawned_this_wave: u32,
    enemies: Arena<Enemy>,
    lasers: Arena<Laser>,
    buffer: String,
    spawn_timer: Option<TimerId>,
    flash_timer: Option<TimerId>,
    shake_timer: Option<TimerId>,
    frames: u64,
    ending: Ending,
    scheduler: Scheduler<DefenseEvent>,
    rng: StdRng,
}

impl SkyDefense {
    pub fn new(seed: Option<u64>) -> Self {
        Self::with_waves(seed, WaveTable::default())
    }

    pub fn with_waves(seed: Option<u64>, waves: WaveTable) -> Self {
        let mut game = Self {
            waves,
            score: 0,
            castle_hp: CASTLE_HP,
            wave: 1,
            waves_cleared: 0,
            phase: WavePhase::Banner,
            spawned_this_wave: 0,
            enemies: Arena::new(),
            lasers: Arena::new(),
            buffer: String::new(),
            spawn_timer: None,
            flash_timer: None,
            shake_timer: None,
            frames: 0,
            ending: Ending::default(),
            scheduler: Scheduler::new(),
            rng: seeded_rng(seed),
        };
        game.init();
        game
    }

    pub fn init(&mut self) {
        let generation = self.scheduler.reset();

        self.score = 0;
        self.castle_hp = CASTLE_HP;
        self.wave = 1;
        self.waves_cleared = 0;
        self.spawned_this_wave = 0;
        self.enemies.clear();
        self.lasers.clear();
        self.buffer.clear();
        self.spawn_timer = None;
        self.flash_timer = None;
        self.shake_timer = None;
        self.frames = 0;
        self.ending.clear();

        self.scheduler.every(FRAME_MS, DefenseEvent::Frame);
        self.start_wave();
        tracing::debug!(generation = generation.value(), waves = self.waves.waves(), "sky defense started");
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn castle_hp(&self) -> u32 {
        self.castle_hp
    }

    pub fn wave(&self) -> u32 {
        self.wave
    }

    pub fn waves_cleared(&self) -> u32 {
        self.waves_cleared
    }

    pub fn phase(&self) -> WavePhase {
        self.phase
    }

    pub fn spawned_this_wave(&self) -> u32 {
        self.spawned_this_wave
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn enemies(&self) -> impl Iterator<Item = (EntityId, &Enemy)> {
        self.enemies.iter()
    }

    pub fn enemy_count(&self) -> usize {
        self.enemies.len()
    }

    pub fn laser_count(&self) -> usize {
        self.lasers.len()
    }

    pub fn is_error_flash(&self) -> bool {
        self.flash_timer.is_some()
    }

    pub fn is_shaking(&self) -> bool {
        self.shake_timer.is_some()
    }

    pub fn is_spawning(&self) -> bool {
        self.spawn_timer.is_some_and(|id| self.scheduler.is_pending(id))
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.ending.outcome()
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending()
    }

    /// Length of the typed prefix to highlight on this enemy's word.
    pub fn typed_prefix(&self, id: EntityId) -> usize {
        match self.enemies.get(id) {
            Some(enemy) if !self.buffer.is_empty() && enemy.word.starts_with(&self.buffer) => self.buffer.len(),
            _ => 0,
        }
    }

    pub fn type_char(&mut self, c: char) -> Typed {
        if self.ending.is_over() {
            return Typed::Ignored;
        }
        self.buffer.push(c);
        self.resolve_input()
    }

    pub fn backspace(&mut self) -> Typed {
        if self.ending.is_over() || self.buffer.pop().is_none() {
            return Typed::Ignored;
        }
        self.resolve_input()
    }

    /// Matches the buffer against live words in spawn order. The first exact
    /// match is shot down; a buffer that prefixes nothing loses its last char.
    fn resolve_input(&mut self) -> Typed {
        if self.buffer.is_empty() {
            return Typed::Progress;
        }

        let mut found = false;
        for id in self.enemies.ids() {
            let Some(enemy) = self.enemies.get(id) else {
                continue;
            };
            if !enemy.word.starts_with(&self.buffer) {
                continue;
            }
            found = true;
            if enemy.word == self.buffer {
                let points = self.destroy(id);
                self.buffer.clear();
                self.check_wave_completion();
                return Typed::Destroyed { points };
            }
        }

        if !found {
            self.buffer.pop();
            if let Some(id) = self.flash_timer.take() {
                self.scheduler.cancel(id);
            }
            self.flash_timer = Some(self.scheduler.after(ERROR_FLASH_MS, DefenseEvent::FlashEnd));
            return Typed::Rejected;
        }
        Typed::Progress
    }

    fn destroy(&mut self, id: EntityId) -> u32 {
        let Some(enemy) = self.enemies.remove(id) else {
            return 0;
        };
        let points = enemy.word.len() as u32 * POINTS_PER_LETTER;
        self.score += points;

        let laser = self.lasers.insert(Laser {
            to_x: enemy.x,
            to_y: enemy.y,
        });
        self.scheduler.after(LASER_MS, DefenseEvent::LaserFade(laser));
        tracing::debug!(word = enemy.word, points, score = self.score, "enemy shot down");
        points
    }

    fn start_wave(&mut self) {
        self.phase = WavePhase::Banner;
        self.scheduler.after(WAVE_BANNER_MS, DefenseEvent::BeginSpawning);
        tracing::info!(wave = self.wave, "wave incoming");
    }

    fn begin_spawning(&mut self) {
        self.phase = WavePhase::InProgress;
        self.spawned_this_wave = 0;
        let interval = WaveTable::spawn_interval_ms(self.wave);
        self.spawn_timer = Some(self.scheduler.every(interval, DefenseEvent::Spawn));
    }

    fn stop_spawning(&mut self) {
        if let Some(id) = self.spawn_timer.take() {
            self.scheduler.cancel(id);
        }
    }

    fn spawn_enemy(&mut self) {
        let quota = self.waves.quota(self.wave);
        if self.spawned_this_wave >= quota {
            self.stop_spawning();
            return;
        }

        let list = self.waves.word_list(self.wave);
        let Some(&word) = list.choose(&mut self.rng) else {
            self.stop_spawning();
            return;
        };
        let from_left = self.rng.gen_bool(0.5);
        let enemy = Enemy {
            word,
            icon: ENEMY_ICONS[self.rng.gen_range(0..ENEMY_ICONS.len())],
            x: if from_left { -ENEMY_MARGIN } else { FIELD_W + ENEMY_MARGIN },
            y: 50.0 + self.rng.gen::<f32>() * 200.0,
            speed: 0.8 + (self.wave - 1) as f32 * 0.4 + self.rng.gen::<f32>() * 0.3,
            from_left,
        };
        self.enemies.insert(enemy);
        self.spawned_this_wave += 1;

        if self.spawned_this_wave >= quota {
            self.stop_spawning();
        }
    }

    fn target_x() -> f32 {
        FIELD_W / 2.0 - 50.0
    }

    /// One frame: planes advance; any that reach the castle hurt it.
    fn step(&mut self) {
        self.frames += 1;
        let target = Self::target_x();

        for id in self.enemies.ids() {
            let Some(enemy) = self.enemies.get_mut(id) else {
                continue;
            };
            let arrived = if enemy.from_left {
                enemy.x += enemy.speed;
                enemy.x >= target
            } else {
                enemy.x -= enemy.speed;
                enemy.x <= target + ENEMY_MARGIN
            };
            if !arrived {
                continue;
            }

            self.enemies.remove(id);
            self.castle_hp = self.castle_hp.saturating_sub(HIT_DAMAGE);
            if let Some(timer) = self.shake_timer.take() {
                self.scheduler.cancel(timer);
            }
            self.shake_timer = Some(self.scheduler.after(SHAKE_MS, DefenseEvent::ShakeEnd));

            if self.castle_hp == 0 {
                self.conclude(Outcome::Defeat);
                return;
            }
            self.check_wave_completion();
        }
    }

    fn check_wave_completion(&mut self) {
        if !self.enemies.is_empty()
            || self.phase != WavePhase::InProgress
            || self.spawned_this_wave < self.waves.quota(self.wave)
        {
            return;
        }

        self.phase = WavePhase::Cleared;
        self.stop_spawning();
        self.waves_cleared += 1;
        self.wave += 1;
        tracing::info!(cleared = self.waves_cleared, score = self.score, "wave cleared");

        if self.wave > self.waves.waves() {
            self.conclude(Outcome::Victory);
        } else {
            self.scheduler.after(WAVE_PAUSE_MS, DefenseEvent::NextWave);
        }
    }

    fn conclude(&mut self, outcome: Outcome) {
        if !self.ending.conclude(outcome) {
            return;
        }
        self.scheduler.stop();
        // stopping drops every LaserFade, so the beams go with it
        self.lasers.clear();
        self.spawn_timer = None;
        self.flash_timer = None;
        self.shake_timer = None;
        tracing::info!(?outcome, score = self.score, castle_hp = self.castle_hp, "sky defense finished");
    }

    fn on_timer(&mut self, fired: Fired<DefenseEvent>) {
        if !self.scheduler.is_current(&fired) || self.ending.is_over() {
            return;
        }
        match fired.event {
            DefenseEvent::Frame => self.step(),
            DefenseEvent::BeginSpawning => self.begin_spawning(),
            DefenseEvent::Spawn => self.spawn_enemy(),
            DefenseEvent::NextWave => self.start_wave(),
            DefenseEvent::LaserFade(id) => {
                self.lasers.remove(id);
            }
            DefenseEvent::FlashEnd => self.flash_timer = None,
            DefenseEvent::ShakeEnd => self.shake_timer = None,
        }
    }

    fn render_field(&self, width: usize, height: usize) -> Vec<Line<'static>> {
        let w = width;
        let h = height;
        if w == 0 || h == 0 {
            return Vec::new();
        }
        let sx = w as f32 / FIELD_W;
        let sy = h as f32 / FIELD_H;
        let night = Color::Rgb(12, 14, 34);

        let mut grid: Vec<Vec<(char, Style)>> = vec![vec![(' ', Style::default().bg(night)); w]; h];

        // Stars
        for (y, row) in grid.iter_mut().enumerate() {
            for (x, cell) in row.iter_mut().enumerate() {
                if (x * 31 + y * 17) % 53 == 0 {
                    *cell = ('·', Style::default().fg(Color::Rgb(90, 90, 130)).bg(night));
                }
            }
        }

        // Castle, centered at the bottom
        let castle = [
            " ▄ ▄ ▄ ▄ ",
            " █▄█▄█▄█ ",
            " ███▀███ ",
            "▐███▄███▌",
            "▐███████▌",
        ];
        let hurt = self.castle_hp <= 30;
        let castle_color = if self.is_shaking() {
            Color::Rgb(255, 90, 90)
        } else if hurt {
            Color::Rgb(200, 140, 120)
        } else {
            Color::Rgb(170, 170, 190)
        };
        let jolt = if self.is_shaking() && self.frames % 4 < 2 { 1 } else { 0 };
        let castle_w = castle[0].chars().count();
        let castle_x = (w / 2).saturating_sub(castle_w / 2) + jolt;
        let castle_y = h.saturating_sub(castle.len());
        for (dy, row) in castle.iter().enumerate() {
            for (dx, ch) in row.chars().enumerate() {
                let (x, y) = (castle_x + dx, castle_y + dy);
                if x < w && y < h && ch != ' ' {
                    grid[y][x] = (ch, Style::default().fg(castle_color).bg(night));
                }
            }
        }

        // Lasers from the castle top to where the plane was
        let origin_x = (w / 2) as f32;
        let origin_y = castle_y as f32;
        for (_, laser) in self.lasers.iter() {
            let tx = laser.to_x * sx;
            let ty = laser.to_y * sy;
            let steps = ((tx - origin_x).abs().max((ty - origin_y).abs()) as usize).max(1);
            for i in 0..=steps {
                let t = i as f32 / steps as f32;
                let x = (origin_x + (tx - origin_x) * t) as isize;
                let y = (origin_y + (ty - origin_y) * t) as isize;
                if x >= 0 && y >= 0 && (x as usize) < w && (y as usize) < h {
                    let ch = if i == steps { '✸' } else { '•' };
                    grid[y as usize][x as usize] = (
                        ch,
                        Style::default().fg(Color::Rgb(255, 107, 107)).bg(night).add_modifier(Modifier::BOLD),
                    );
                }
            }
        }

        // Planes with their word tag underneath
        for (id, enemy) in self.enemies.iter() {
            let ex = (enemy.x * sx) as isize;
            let ey = (enemy.y * sy) as isize;
            if ey < 0 || ey as usize >= h {
                continue;
            }
            let ey = ey as usize;
            if ex >= 0 && (ex as usize) < w {
                grid[ey][ex as usize] = (
                    enemy.icon,
                    Style::default().fg(Color::Rgb(230, 230, 250)).bg(night).add_modifier(Modifier::BOLD),
                );
            }

            let tag_y = ey + 1;
            if tag_y >= h {
                continue;
            }
            let typed = self.typed_prefix(id);
            let word_len = enemy.word.chars().count() as isize;
            let start = ex - word_len / 2;
            for (i, ch) in enemy.word.chars().enumerate() {
                let x = start + i as isize;
                if x < 0 || x as usize >= w {
                    continue;
                }
                let style = if i < typed {
                    Style::default().fg(Color::Rgb(80, 255, 120)).bg(Color::Rgb(20, 40, 25)).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White).bg(Color::Rgb(40, 40, 60))
                };
                grid[tag_y][x as usize] = (ch, style);
            }
        }

        grid.into_iter()
            .map(|row| {
                let spans: Vec<Span<'static>> = row
                    .into_iter()
                    .map(|(ch, style)| Span::styled(String::from(ch), style))
                    .collect();
                Line::from(spans)
            })
            .collect()
    }
}

impl Game for SkyDefense {
    fn update(&mut self, dt: Duration) {
        self.scheduler.advance_by(dt);
        while let Some(fired) = self.scheduler.pop_due() {
            self.on_timer(fired);
        }
    }

    fn handle_input(&mut self, key: KeyEvent) {
        if self.ending.is_over() {
            if key.code == KeyCode::Enter {
                self.init();
            }
            return;
        }
        match key.code {
            KeyCode::Backspace => {
                self.backspace();
            }
            KeyCode::Char(c) if c.is_alphabetic() && !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.type_char(c.to_ascii_lowercase());
            }
            _ => {}
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(90, 120, 220)))
            .title(" ✈ Sky Defense ")
            .title_style(
                Style::default()
                    .fg(Color::Rgb(140, 170, 255))
                    .add_modifier(Modifier::BOLD),
            );
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(8),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(inner);

        let hp_color = if self.castle_hp > 50 {
            Color::Green
        } else if self.castle_hp > 20 {
            Color::Yellow
        } else {
            Color::Red
        };
        let status = Line::from(vec![
            Span::styled(" ✈ ", Style::default()),
            Span::styled(
                format!("SCORE: {} ", self.score),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("🏰 CASTLE HP: {}% ", self.castle_hp),
                Style::default().fg(hp_color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("WAVE: {}/{} ", self.wave.min(self.waves.waves()), self.waves.waves()),
                Style::default().fg(Color::Cyan),
            ),
        ]);
        frame.render_widget(Paragraph::new(status), chunks[0]);

        let lines = self.render_field(chunks[1].width as usize, chunks[1].height as usize);
        frame.render_widget(Paragraph::new(lines), chunks[1]);

        if let Some(outcome) = self.ending.outcome() {
            let (title, color, message) = match outcome {
                Outcome::Victory => (" 🏆 VICTORY! ", Color::Rgb(255, 220, 80), "You defended the skies!"),
                Outcome::Defeat => (" 💀 GAME OVER ", Color::Rgb(255, 80, 80), "The castle has fallen."),
            };
            crate::ui::render_overlay(
                frame,
                chunks[1],
                title,
                color,
                vec![
                    Line::from(""),
                    Line::from(Span::styled(message, Style::default().fg(Color::White).add_modifier(Modifier::BOLD))),
                    Line::from(Span::styled(
                        format!("Final Score: {}", self.score),
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                    )),
                    Line::from(""),
                    Line::from(Span::styled("Press ENTER to restart", Style::default().fg(Color::Rgb(100, 100, 130)))),
                ],
            );
        } else if self.phase == WavePhase::Banner {
            crate::ui::render_overlay(
                frame,
                chunks[1],
                " ✈ ",
                Color::Rgb(140, 170, 255),
                vec![
                    Line::from(""),
                    Line::from(Span::styled(
                        format!("WAVE {}", self.wave),
                        Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD),
                    )),
                ],
            );
        }

        let input_style = if self.is_error_flash() {
            Style::default().fg(Color::White).bg(Color::Rgb(127, 29, 29))
        } else {
            Style::default().fg(Color::White).bg(Color::Rgb(45, 55, 72))
        };
        let input = Line::from(vec![
            Span::styled(" ⌨ ", Style::default()),
            Span::styled(format!(" > {}_ ", self.buffer), input_style.add_modifier(Modifier::BOLD)),
        ]);
        frame.render_widget(Paragraph::new(input), chunks[2]);

        let help = Line::from(vec![
            Span::styled(" Type the words to shoot planes down ", Style::default().fg(Color::DarkGray)),
            Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
            Span::styled("Backspace Erase ", Style::default().fg(Color::DarkGray)),
            Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
            Span::styled("Esc Menu", Style::default().fg(Color::DarkGray)),
        ]);
        frame.render_widget(Paragraph::new(help), chunks[3]);
    }

    fn reset(&mut self) {
        self.init();
    }

    fn get_score(&self) -> u32 {
        self.score
    }

    fn is_game_over(&self) -> bool {
        self.ending.is_over()
    }
}
