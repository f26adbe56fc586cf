use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent};
use rand::rngs::StdRng;
use rand::Rng;
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::content::{self, HeadShape, QUESTIONS};
use crate::engine::{Arena, Ending, Fired, Outcome, Scheduler, TimerId};
use crate::games::{seeded_rng, Game};

// Logical canvas the scene is laid out on; scaled to the terminal at render.
const CANVAS_W: f32 = 800.0;
const CANVAS_H: f32 = 400.0;
const GROUND_Y: f32 = 380.0;

const FRAME_MS: u64 = 16; // ~60 FPS
const START_LIVES: u32 = 3;
const PROJECTILE_SPEED: f32 = 15.0;
const SHAKE_MS: u64 = 500;
const NEXT_BOSS_MS: u64 = 1000;
const EXPLOSION_PARTICLES: usize = 30;
const PARTICLE_FADE: f32 = 0.03;
const BACKGROUND_DRIFT: f32 = 0.5;

const PLAYER_X: f32 = 50.0;
const PLAYER_Y: f32 = 320.0;
const PLAYER_W: f32 = 55.0;

const SKY: Color = Color::Rgb(104, 176, 232);

#[derive(Clone, Copy, Debug)]
enum QuizEvent {
    Frame,
    ShakeEnd,
    NextBoss,
}

#[derive(Clone, Debug)]
pub struct Boss {
    pub index: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub dead: bool,
}

impl Boss {
    fn for_index(index: usize) -> Self {
        let is_final = index + 1 >= QUESTIONS.len();
        Self {
            index,
            x: 680.0,
            y: if is_final { 240.0 } else { 300.0 },
            width: if is_final { 100.0 } else { 60.0 },
            height: if is_final { 120.0 } else { 80.0 },
            dead: false,
        }
    }
}

#[derive(Clone, Debug)]
struct Projectile {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

#[derive(Clone, Debug)]
struct Particle {
    x: f32,
    y: f32,
    dx: f32,
    dy: f32,
    radius: f32,
    alpha: f32,
    spark: u8,
}

/// Result of submitting an answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Answer {
    Ignored,
    Fired,
    Wrong,
    Defeat,
}

pub struct BossQuiz {
    lives: u32,
    boss: Boss,
    bosses_defeated: u32,
    projectiles: Arena<Projectile>,
    particles: Arena<Particle>,
    background_offset: f32,
    selected: usize,
    shaking: bool,
    shake_timer: Option<TimerId>,
    paused: bool,
    frames: u64,
    ending: Ending,
    scheduler: Scheduler<QuizEvent>,
    rng: StdRng,
}

impl BossQuiz {
    pub fn new(seed: Option<u64>) -> Self {
        let mut game = Self {
            lives: START_LIVES,
            boss: Boss::for_index(0),
            bosses_defeated: 0,
            projectiles: Arena::new(),
            particles: Arena::new(),
            background_offset: 0.0,
            selected: 0,
            shaking: false,
            shake_timer: None,
            paused: false,
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

        self.lives = START_LIVES;
        self.boss = Boss::for_index(0);
        self.bosses_defeated = 0;
        self.projectiles.clear();
        self.particles.clear();
        self.background_offset = 0.0;
        self.selected = 0;
        self.shaking = false;
        self.shake_timer = None;
        self.paused = false;
        self.frames = 0;
        self.ending.clear();

        self.scheduler.every(FRAME_MS, QuizEvent::Frame);
        tracing::debug!(generation = generation.value(), "boss quiz started");
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn boss(&self) -> &Boss {
        &self.boss
    }

    pub fn boss_count(&self) -> usize {
        QUESTIONS.len()
    }

    pub fn bosses_defeated(&self) -> u32 {
        self.bosses_defeated
    }

    pub fn question(&self) -> &'static content::Question {
        content::question(self.boss.index)
    }

    pub fn projectiles_in_flight(&self) -> usize {
        self.projectiles.len()
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn is_shaking(&self) -> bool {
        self.shaking
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

    /// Answers are refused while a shot is in flight or the boss is going down.
    pub fn is_locked(&self) -> bool {
        !self.projectiles.is_empty() || self.boss.dead
    }

    pub fn answer(&mut self, choice: usize) -> Answer {
        if self.ending.is_over() || self.paused || self.is_locked() {
            return Answer::Ignored;
        }
        let question = self.question();
        if choice >= question.answers.len() {
            return Answer::Ignored;
        }

        if choice == question.correct {
            self.projectiles.insert(Projectile {
                x: PLAYER_X + PLAYER_W - 5.0,
                y: PLAYER_Y + 32.0,
                width: 15.0,
                height: 5.0,
            });
            return Answer::Fired;
        }

        self.lives = self.lives.saturating_sub(1);
        self.shake();
        if self.lives == 0 {
            self.conclude(Outcome::Defeat);
            return Answer::Defeat;
        }
        // same question again
        self.selected = 0;
        Answer::Wrong
    }

    fn shake(&mut self) {
        if let Some(id) = self.shake_timer.take() {
            self.scheduler.cancel(id);
        }
        self.shaking = true;
        self.shake_timer = Some(self.scheduler.after(SHAKE_MS, QuizEvent::ShakeEnd));
    }

    fn conclude(&mut self, outcome: Outcome) {
        if !self.ending.conclude(outcome) {
            return;
        }
        self.scheduler.stop();
        self.shaking = false;
        self.shake_timer = None;
        tracing::info!(?outcome, bosses = self.bosses_defeated, lives = self.lives, "boss quiz finished");
    }

    /// Marks the current boss defeated. Returns false if it already was.
    fn defeat_boss(&mut self) -> bool {
        if self.boss.dead {
            return false;
        }
        self.boss.dead = true;
        self.bosses_defeated += 1;

        let cx = self.boss.x + self.boss.width / 2.0;
        let cy = self.boss.y + self.boss.height / 2.0;
        for _ in 0..EXPLOSION_PARTICLES {
            let particle = Particle {
                x: cx,
                y: cy,
                dx: (self.rng.gen::<f32>() - 0.5) * 8.0,
                dy: (self.rng.gen::<f32>() - 0.5) * 8.0,
                radius: self.rng.gen::<f32>() * 5.0 + 2.0,
                alpha: 1.0,
                spark: self.rng.gen_range(0..3),
            };
            self.particles.insert(particle);
        }

        self.scheduler.after(NEXT_BOSS_MS, QuizEvent::NextBoss);
        tracing::debug!(boss = self.boss.index, "boss defeated");
        true
    }

    /// One animation frame: scroll, move shots, resolve hits, fade sparks.
    fn step(&mut self) {
        self.frames += 1;
        self.background_offset -= BACKGROUND_DRIFT;

        for id in self.projectiles.ids() {
            let Some(shot) = self.projectiles.get_mut(id) else {
                continue;
            };
            shot.x += PROJECTILE_SPEED;
            let x = shot.x;

            if x > self.boss.x && !self.boss.dead {
                self.projectiles.remove(id);
                self.defeat_boss();
            } else if x > CANVAS_W {
                self.projectiles.remove(id);
            }
        }

        for id in self.particles.ids() {
            let spark = self.rng.gen_range(0..3);
            let Some(p) = self.particles.get_mut(id) else {
                continue;
            };
            p.x += p.dx;
            p.y += p.dy;
            p.alpha -= PARTICLE_FADE;
            p.spark = spark;
            if p.alpha <= 0.0 {
                self.particles.remove(id);
            }
        }
    }

    fn next_boss(&mut self) {
        let index = self.boss.index + 1;
        if index >= QUESTIONS.len() {
            self.boss.index = index;
            self.conclude(Outcome::Victory);
            return;
        }
        self.projectiles.clear();
        self.boss = Boss::for_index(index);
        self.selected = 0;
    }

    fn on_timer(&mut self, fired: Fired<QuizEvent>) {
        if !self.scheduler.is_current(&fired) || self.ending.is_over() {
            return;
        }
        match fired.event {
            QuizEvent::Frame => self.step(),
            QuizEvent::ShakeEnd => {
                self.shaking = false;
                self.shake_timer = None;
            }
            QuizEvent::NextBoss => self.next_boss(),
        }
    }

    fn render_field(&self, width: usize, height: usize) -> Vec<Line<'static>> {
        let w = width;
        let h = height;
        if w == 0 || h == 0 {
            return Vec::new();
        }
        let sx = w as f32 / CANVAS_W;
        let sy = h as f32 / CANVAS_H;

        let mut grid: Vec<Vec<(char, Style)>> = vec![vec![(' ', Style::default().bg(SKY)); w]; h];

        // Parallax layers, sampled at each cell's center in canvas space
        let hill_offset = (self.background_offset * 0.2) % 200.0;
        let tree_offset = (self.background_offset * 0.5) % 150.0;
        for y in 0..h {
            let cy = (y as f32 + 0.5) / sy;
            for x in 0..w {
                let cx = (x as f32 + 0.5) / sx;

                if cy >= GROUND_Y {
                    grid[y][x] = (' ', Style::default().bg(Color::Rgb(74, 46, 31)));
                    continue;
                }

                let dx = (cx - hill_offset).rem_euclid(200.0);
                let dx = dx.min(200.0 - dx);
                let dy = GROUND_Y - cy;
                if dx * dx + dy * dy < 100.0 * 100.0 {
                    grid[y][x] = (' ', Style::default().bg(Color::Rgb(44, 111, 59)));
                }

                let tx = (cx - tree_offset).rem_euclid(150.0);
                let trunk = tx < 20.0 && cy >= 320.0;
                let lx = (tx - 10.0).abs().min(150.0 - (tx - 10.0).abs());
                let ly = cy - 320.0;
                let leaves = lx * lx + ly * ly < 30.0 * 30.0;
                if trunk || leaves {
                    let ch = if leaves && !trunk { '♣' } else { ' ' };
                    grid[y][x] = (
                        ch,
                        Style::default().fg(Color::Rgb(40, 100, 50)).bg(Color::Rgb(30, 77, 41)),
                    );
                }
            }
        }

        let mut fill = |x: f32, y: f32, rw: f32, rh: f32, ch: char, style: Style| {
            let x0 = (x * sx).floor().max(0.0) as usize;
            let y0 = (y * sy).floor().max(0.0) as usize;
            let x1 = ((x + rw) * sx).ceil().max(0.0) as usize;
            let y1 = ((y + rh) * sy).ceil().max(0.0) as usize;
            for row in grid.iter_mut().take(y1.min(h)).skip(y0) {
                for cell in row.iter_mut().take(x1.min(w)).skip(x0) {
                    *cell = (ch, style);
                }
            }
        };

        // Player
        let solid = |c: Color| Style::default().fg(c).bg(SKY);
        fill(PLAYER_X + 5.0, PLAYER_Y, 20.0, 10.0, '▀', solid(Color::Rgb(255, 77, 77)));
        fill(PLAYER_X + 5.0, PLAYER_Y + 10.0, 20.0, 15.0, '█', solid(Color::Rgb(255, 200, 124)));
        fill(PLAYER_X, PLAYER_Y + 25.0, 30.0, 20.0, '█', solid(Color::Rgb(0, 102, 204)));
        fill(PLAYER_X + 5.0, PLAYER_Y + 45.0, 20.0, 15.0, '█', solid(Color::Rgb(51, 51, 51)));
        fill(PLAYER_X + 25.0, PLAYER_Y + 28.0, 30.0, 8.0, '▬', solid(Color::Rgb(74, 74, 74)));

        // Boss
        if !self.boss.dead {
            let b = &self.boss;
            let kind = content::boss_kind(b.index);
            let body = solid(kind.body_color);
            let head = solid(kind.head_color).add_modifier(Modifier::BOLD);
            match kind.head {
                HeadShape::Crowned => {
                    fill(b.x - 10.0, b.y, b.width, b.height, '█', body);
                    fill(b.x + b.width / 2.0 - 50.0, b.y - 55.0, 80.0, 60.0, '█', head);
                    let eyes = solid(Color::Yellow).add_modifier(Modifier::BOLD);
                    fill(b.x + 25.0, b.y - 35.0, 15.0, 8.0, '▚', eyes);
                    fill(b.x + 65.0, b.y - 35.0, 15.0, 8.0, '▞', eyes);
                    fill(b.x + 30.0, b.y - 5.0, 30.0, 6.0, '⌒', solid(Color::Black));
                }
                shape => {
                    fill(b.x, b.y + 20.0, 60.0, 60.0, '█', body);
                    match shape {
                        HeadShape::Round => fill(b.x + 15.0, b.y - 5.0, 30.0, 30.0, '●', head),
                        HeadShape::Square => fill(b.x + 15.0, b.y, 30.0, 30.0, '■', head),
                        HeadShape::Triangle => fill(b.x + 10.0, b.y - 10.0, 40.0, 30.0, '▲', head),
                        HeadShape::TwinEyes => {
                            fill(b.x + 10.0, b.y, 20.0, 20.0, '◉', head);
                            fill(b.x + 30.0, b.y, 20.0, 20.0, '◉', head);
                        }
                        HeadShape::Horns => {
                            fill(b.x + 15.0, b.y + 5.0, 30.0, 30.0, '█', head);
                            fill(b.x, b.y - 10.0, 15.0, 15.0, '◥', head);
                            fill(b.x + 45.0, b.y - 10.0, 15.0, 15.0, '◤', head);
                        }
                        HeadShape::Crowned => {}
                    }
                }
            }
        }

        for (_, shot) in self.projectiles.iter() {
            fill(shot.x, shot.y, shot.width, shot.height, '━', solid(Color::Yellow).add_modifier(Modifier::BOLD));
        }

        for (_, p) in self.particles.iter() {
            let color = match p.spark {
                0 => Color::Rgb(255, 255, 0),
                1 => Color::Rgb(255, 136, 0),
                _ => Color::Rgb(255, 0, 0),
            };
            let ch = if p.alpha > 0.6 { '✸' } else if p.alpha > 0.3 { '*' } else { '·' };
            fill(p.x - p.radius, p.y - p.radius, p.radius * 2.0, p.radius * 2.0, ch, solid(color));
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

    fn render_quiz(&self, frame: &mut Frame, area: Rect) {
        let question = self.question();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(area);

        let prompt = Line::from(vec![
            Span::styled(" ❓ ", Style::default()),
            Span::styled(
                question.prompt,
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
        ]);
        frame.render_widget(Paragraph::new(prompt).alignment(Alignment::Center), chunks[0]);

        let colors = [
            Color::Rgb(37, 99, 235),
            Color::Rgb(22, 163, 74),
            Color::Rgb(220, 38, 38),
            Color::Rgb(202, 138, 4),
        ];
        let mut spans = Vec::new();
        for (i, value) in question.answers.iter().enumerate() {
            let mut style = Style::default().fg(Color::White).bg(colors[i]).add_modifier(Modifier::BOLD);
            if i == self.selected && !self.is_locked() {
                style = style.add_modifier(Modifier::UNDERLINED | Modifier::REVERSED);
            }
            if self.is_locked() {
                style = style.add_modifier(Modifier::DIM);
            }
            spans.push(Span::styled(format!(" [{}] {:>4} ", i + 1, value), style));
            spans.push(Span::raw("  "));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)).alignment(Alignment::Center), chunks[1]);
    }
}

impl Game for BossQuiz {
    fn update(&mut self, dt: Duration) {
        if self.paused {
            return;
        }
        self.scheduler.advance_by(dt);
        while let Some(fired) = self.scheduler.pop_due() {
            self.on_timer(fired);
        }
    }

    fn handle_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('r') | KeyCode::Char('R') => self.init(),
            KeyCode::Char('p') | KeyCode::Char('P') => {
                if !self.ending.is_over() {
                    self.paused = !self.paused;
                }
            }
            _ => {
                if self.ending.is_over() {
                    if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                        self.init();
                    }
                    return;
                }
                if self.paused {
                    return;
                }
                match key.code {
                    KeyCode::Char(c @ '1'..='4') => {
                        let choice = c as usize - '1' as usize;
                        self.selected = choice;
                        self.answer(choice);
                    }
                    KeyCode::Left => self.selected = (self.selected + 3) % 4,
                    KeyCode::Right => self.selected = (self.selected + 1) % 4,
                    KeyCode::Enter | KeyCode::Char(' ') => {
                        self.answer(self.selected);
                    }
                    _ => {}
                }
            }
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let border = if self.shaking { Color::Rgb(255, 80, 80) } else { Color::Rgb(80, 160, 230) };
        // jolt the whole panel sideways while shaking
        let area = if self.shaking && self.frames % 4 < 2 && area.width > 2 {
            Rect::new(area.x + 1, area.y, area.width - 1, area.height)
        } else {
            area
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border))
            .title(" 🎯 Boss Quiz ")
            .title_style(
                Style::default()
                    .fg(Color::Rgb(120, 200, 255))
                    .add_modifier(Modifier::BOLD),
            );
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(8),
                Constraint::Length(2),
                Constraint::Length(1),
            ])
            .split(inner);

        let stars = format!(
            "{}{}",
            "★".repeat(self.lives as usize),
            "☆".repeat(START_LIVES.saturating_sub(self.lives) as usize)
        );
        let boss_no = (self.boss.index + 1).min(self.boss_count());
        let status = Line::from(vec![
            Span::styled(" 🎯 ", Style::default()),
            Span::styled(
                format!("Lives: {} ", stars),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("Boss: {}/{} ", boss_no, self.boss_count()),
                Style::default().fg(Color::Rgb(255, 120, 160)).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{} ", content::boss_kind(self.boss.index).name),
                Style::default().fg(Color::Cyan),
            ),
        ]);
        frame.render_widget(Paragraph::new(status), chunks[0]);

        let lines = self.render_field(chunks[1].width as usize, chunks[1].height as usize);
        frame.render_widget(Paragraph::new(lines), chunks[1]);

        if let Some(outcome) = self.ending.outcome() {
            let (title, color, message) = match outcome {
                Outcome::Victory => (" 🏆 YOU WIN! ", Color::Rgb(255, 220, 80), "MISSION COMPLETE!"),
                Outcome::Defeat => (" 💀 GAME OVER ", Color::Rgb(255, 80, 80), "Out of lives."),
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
                        format!("Bosses defeated: {}/{}", self.bosses_defeated, self.boss_count()),
                        Style::default().fg(Color::Yellow),
                    )),
                    Line::from(""),
                    Line::from(Span::styled("Press ENTER to restart", Style::default().fg(Color::Rgb(100, 100, 130)))),
                ],
            );
        } else {
            self.render_quiz(frame, chunks[2]);
        }

        let help = if self.paused {
            Line::from(Span::styled(
                " ⏸ PAUSED - Press P to resume ",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ))
        } else {
            Line::from(vec![
                Span::styled(" 1-4 Answer ", Style::default().fg(Color::DarkGray)),
                Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
                Span::styled("← → Select ", Style::default().fg(Color::DarkGray)),
                Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
                Span::styled("ENTER Fire ", Style::default().fg(Color::DarkGray)),
                Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
                Span::styled("P Pause ", Style::default().fg(Color::DarkGray)),
                Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
                Span::styled("R Restart ", Style::default().fg(Color::DarkGray)),
                Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
                Span::styled("Esc Menu", Style::default().fg(Color::DarkGray)),
            ])
        };
        frame.render_widget(Paragraph::new(help), chunks[3]);
    }

    fn reset(&mut self) {
        self.init();
    }

    fn get_score(&self) -> u32 {
        self.bosses_defeated
    }

    fn is_game_over(&self) -> bool {
        self.ending.is_over()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game() -> BossQuiz {
        BossQuiz::new(Some(3))
    }

    fn correct(g: &BossQuiz) -> usize {
        g.question().correct
    }

    fn wrong(g: &BossQuiz) -> usize {
        (g.question().correct + 1) % 4
    }

    /// Runs frames until the current shot lands.
    fn land_shot(g: &mut BossQuiz) {
        for _ in 0..200 {
            if g.boss().dead {
                return;
            }
            g.update(Duration::from_millis(FRAME_MS));
        }
        panic!("shot never landed");
    }

    #[test]
    fn test_correct_answer_fires_and_defeats_boss() {
        let mut g = game();
        assert_eq!(g.answer(correct(&g)), Answer::Fired);
        assert_eq!(g.projectiles_in_flight(), 1);
        assert!(g.is_locked());

        land_shot(&mut g);
        assert_eq!(g.projectiles_in_flight(), 0);
        assert_eq!(g.bosses_defeated(), 1);
        assert_eq!(g.particle_count(), EXPLOSION_PARTICLES);
        assert_eq!(g.lives(), 3);
    }

    #[test]
    fn test_answers_refused_while_shot_in_flight() {
        let mut g = game();
        g.answer(correct(&g));
        assert_eq!(g.answer(correct(&g)), Answer::Ignored);
        assert_eq!(g.answer(wrong(&g)), Answer::Ignored);
        assert_eq!(g.lives(), 3);
        assert_eq!(g.projectiles_in_flight(), 1);
    }

    #[test]
    fn test_defeat_is_idempotent() {
        let mut g = game();
        assert!(g.defeat_boss());
        let timers = g.pending_timers();
        assert!(!g.defeat_boss());
        assert_eq!(g.bosses_defeated(), 1);
        assert_eq!(g.particle_count(), EXPLOSION_PARTICLES);
        assert_eq!(g.pending_timers(), timers);
    }

    #[test]
    fn test_simultaneous_hits_defeat_once() {
        let mut g = game();
        // three shots cross the boss bound on the same frame
        for dx in [0.0, 2.0, 4.0] {
            g.projectiles.insert(Projectile {
                x: g.boss.x - 10.0 + dx,
                y: 352.0,
                width: 15.0,
                height: 5.0,
            });
        }
        g.step();
        assert_eq!(g.bosses_defeated(), 1);
        // the first one is consumed, the rest fly on until the next boss
        assert_eq!(g.projectiles_in_flight(), 2);

        g.update(Duration::from_millis(NEXT_BOSS_MS));
        assert_eq!(g.boss().index, 1);
        assert!(!g.boss().dead);
        assert_eq!(g.projectiles_in_flight(), 0);
        assert_eq!(g.bosses_defeated(), 1);
    }

    #[test]
    fn test_wrong_answer_costs_life_and_shakes() {
        let mut g = game();
        assert_eq!(g.answer(wrong(&g)), Answer::Wrong);
        assert_eq!(g.lives(), 2);
        assert!(g.is_shaking());
        g.update(Duration::from_millis(SHAKE_MS));
        assert!(!g.is_shaking());
        // same boss, same question
        assert_eq!(g.boss().index, 0);
    }

    #[test]
    fn test_last_life_ends_game_once() {
        let mut g = game();
        g.answer(wrong(&g));
        g.answer(wrong(&g));
        assert_eq!(g.answer(wrong(&g)), Answer::Defeat);
        assert_eq!(g.lives(), 0);
        assert_eq!(g.outcome(), Some(Outcome::Defeat));
        assert!(!g.is_running());
        assert_eq!(g.answer(wrong(&g)), Answer::Ignored);
        assert_eq!(g.lives(), 0);
        assert_eq!(g.pending_timers(), 0);
    }

    #[test]
    fn test_six_bosses_then_victory() {
        let mut g = game();
        for round in 0..6 {
            assert_eq!(g.boss().index, round);
            assert_eq!(g.answer(correct(&g)), Answer::Fired);
            land_shot(&mut g);
            g.update(Duration::from_millis(NEXT_BOSS_MS));
        }
        assert_eq!(g.bosses_defeated(), 6);
        assert_eq!(g.outcome(), Some(Outcome::Victory));
        assert!(!g.is_running());
        assert_eq!(g.pending_timers(), 0);
    }

    #[test]
    fn test_final_boss_is_larger() {
        let boss = Boss::for_index(5);
        assert_eq!((boss.width, boss.height, boss.y), (100.0, 120.0, 240.0));
        let mini = Boss::for_index(0);
        assert_eq!((mini.width, mini.height, mini.y), (60.0, 80.0, 300.0));
    }

    #[test]
    fn test_particles_fade_out() {
        let mut g = game();
        g.defeat_boss();
        // 1.0 / 0.03 rounds up to 34 frames
        for _ in 0..34 {
            g.step();
        }
        assert_eq!(g.particle_count(), 0);
    }

    #[test]
    fn test_restart_cancels_pending_boss_transition() {
        let mut g = game();
        g.answer(correct(&g));
        land_shot(&mut g);
        g.init();
        g.update(Duration::from_millis(NEXT_BOSS_MS * 2));
        assert_eq!(g.boss().index, 0);
        assert!(!g.boss().dead);
        assert_eq!(g.lives(), 3);
        assert_eq!(g.bosses_defeated(), 0);
        assert_eq!(g.particle_count(), 0);
        assert_eq!(g.pending_timers(), 1);
    }

    #[test]
    fn test_render_field_fits_requested_size() {
        let g = game();
        let lines = g.render_field(80, 20);
        assert_eq!(lines.len(), 20);
        assert!(lines.iter().all(|l| l.spans.len() == 80));
    }
}
