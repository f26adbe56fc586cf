use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::content::PLANETS;
use crate::engine::{Arena, EntityId, Ending, Fired, Outcome, Scheduler};
use crate::games::{seeded_rng, Game};

const GRID_COLS: usize = 4;
const FLIP_BACK_MS: u64 = 1000;
const CLOCK_MS: u64 = 1000;

#[derive(Clone, Copy, Debug)]
enum MemoryEvent {
    ClockSecond,
    FlipBack(EntityId, EntityId),
}

#[derive(Clone, Debug)]
pub struct Card {
    pub planet: &'static str,
    pub flipped: bool,
    pub matched: bool,
}

/// What a flip request turned into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flip {
    Ignored,
    Revealed,
    Matched,
    Mismatched,
    Won,
}

pub struct PlanetMemory {
    cards: Arena<Card>,
    board: Vec<EntityId>,
    pending: Vec<EntityId>,
    matched_pairs: u32,
    moves: u32,
    seconds: u32,
    // set while a pair is being resolved
    locked: bool,
    paused: bool,
    cursor: usize,
    ending: Ending,
    scheduler: Scheduler<MemoryEvent>,
    rng: StdRng,
}

impl PlanetMemory {
    pub fn new(seed: Option<u64>) -> Self {
        let mut game = Self {
            cards: Arena::new(),
            board: Vec::new(),
            pending: Vec::with_capacity(2),
            matched_pairs: 0,
            moves: 0,
            seconds: 0,
            locked: false,
            paused: false,
            cursor: 0,
            ending: Ending::default(),
            scheduler: Scheduler::new(),
            rng: seeded_rng(seed),
        };
        game.init();
        game
    }

    /// Start a fresh session: cancel the previous session's timers, deal a
    /// new shuffled deck and restart the clock.
    pub fn init(&mut self) {
        let generation = self.scheduler.reset();

        self.cards.clear();
        self.board.clear();
        self.pending.clear();
        self.matched_pairs = 0;
        self.moves = 0;
        self.seconds = 0;
        self.locked = false;
        self.paused = false;
        self.cursor = 0;
        self.ending.clear();

        let mut deck: Vec<&'static str> = PLANETS.iter().chain(PLANETS.iter()).copied().collect();
        deck.shuffle(&mut self.rng);
        for planet in deck {
            let id = self.cards.insert(Card {
                planet,
                flipped: false,
                matched: false,
            });
            self.board.push(id);
        }

        self.scheduler.every(CLOCK_MS, MemoryEvent::ClockSecond);
        tracing::debug!(generation = generation.value(), cards = self.board.len(), "planet memory dealt");
    }

    pub fn board(&self) -> &[EntityId] {
        &self.board
    }

    pub fn card(&self, id: EntityId) -> Option<&Card> {
        self.cards.get(id)
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn seconds(&self) -> u32 {
        self.seconds
    }

    pub fn matched_pairs(&self) -> u32 {
        self.matched_pairs
    }

    pub fn total_pairs(&self) -> u32 {
        (self.board.len() / 2) as u32
    }

    pub fn is_locked(&self) -> bool {
        self.locked
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

    /// Turn a card face up. The second card of a pair locks input until the
    /// pair resolves.
    pub fn flip(&mut self, id: EntityId) -> Flip {
        if self.ending.is_over() || self.locked || self.paused {
            return Flip::Ignored;
        }
        let Some(card) = self.cards.get_mut(id) else {
            return Flip::Ignored;
        };
        if card.flipped || card.matched {
            return Flip::Ignored;
        }
        card.flipped = true;
        self.pending.push(id);

        if self.pending.len() < 2 {
            return Flip::Revealed;
        }

        self.locked = true;
        self.moves += 1;
        self.check_for_match()
    }

    fn check_for_match(&mut self) -> Flip {
        let (first, second) = (self.pending[0], self.pending[1]);
        let same = match (self.cards.get(first), self.cards.get(second)) {
            (Some(a), Some(b)) => a.planet == b.planet,
            _ => false,
        };

        if !same {
            self.scheduler.after(FLIP_BACK_MS, MemoryEvent::FlipBack(first, second));
            return Flip::Mismatched;
        }

        for id in [first, second] {
            if let Some(card) = self.cards.get_mut(id) {
                card.matched = true;
            }
        }
        self.matched_pairs += 1;
        self.pending.clear();
        self.locked = false;

        if self.check_for_win() {
            Flip::Won
        } else {
            Flip::Matched
        }
    }

    fn check_for_win(&mut self) -> bool {
        if self.matched_pairs < self.total_pairs() {
            return false;
        }
        if self.ending.conclude(Outcome::Victory) {
            self.scheduler.stop();
            tracing::info!(seconds = self.seconds, moves = self.moves, "planet memory cleared");
        }
        true
    }

    fn on_timer(&mut self, fired: Fired<MemoryEvent>) {
        if !self.scheduler.is_current(&fired) || self.ending.is_over() {
            return;
        }
        match fired.event {
            MemoryEvent::ClockSecond => self.seconds += 1,
            MemoryEvent::FlipBack(first, second) => {
                for id in [first, second] {
                    if let Some(card) = self.cards.get_mut(id) {
                        if !card.matched {
                            card.flipped = false;
                        }
                    }
                }
                self.pending.clear();
                self.locked = false;
            }
        }
    }

    fn move_cursor(&mut self, dx: isize, dy: isize) {
        let len = self.board.len();
        if len == 0 {
            return;
        }
        let rows = (len + GRID_COLS - 1) / GRID_COLS;
        let col = (self.cursor % GRID_COLS) as isize;
        let row = (self.cursor / GRID_COLS) as isize;
        let col = (col + dx).rem_euclid(GRID_COLS as isize) as usize;
        let row = (row + dy).rem_euclid(rows as isize) as usize;
        self.cursor = (row * GRID_COLS + col).min(len - 1);
    }

    fn render_card(&self, frame: &mut Frame, area: Rect, index: usize) {
        let Some(card) = self.board.get(index).and_then(|id| self.cards.get(*id)) else {
            return;
        };
        let selected = index == self.cursor && !self.ending.is_over();

        let (border_color, bg) = if card.matched {
            (Color::Rgb(80, 220, 120), Color::Rgb(15, 40, 25))
        } else if card.flipped {
            (Color::Rgb(80, 200, 255), Color::Rgb(15, 25, 45))
        } else {
            (Color::Rgb(120, 80, 200), Color::Rgb(30, 20, 50))
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(if selected { BorderType::Double } else { BorderType::Rounded })
            .border_style(Style::default().fg(if selected { Color::Rgb(255, 220, 80) } else { border_color }))
            .style(Style::default().bg(bg));
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.height == 0 {
            return;
        }

        let face = if card.flipped || card.matched {
            Span::styled(card.planet, Style::default())
        } else {
            Span::styled("?", Style::default().fg(Color::Rgb(200, 160, 255)).add_modifier(Modifier::BOLD))
        };
        let pad = inner.height.saturating_sub(1) / 2;
        let face_area = Rect::new(inner.x, inner.y + pad, inner.width, 1);
        frame.render_widget(Paragraph::new(Line::from(face)).alignment(Alignment::Center), face_area);
    }
}

impl Game for PlanetMemory {
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
                    KeyCode::Left => self.move_cursor(-1, 0),
                    KeyCode::Right => self.move_cursor(1, 0),
                    KeyCode::Up => self.move_cursor(0, -1),
                    KeyCode::Down => self.move_cursor(0, 1),
                    KeyCode::Enter | KeyCode::Char(' ') => {
                        if let Some(&id) = self.board.get(self.cursor) {
                            self.flip(id);
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(120, 80, 200)))
            .title(" 🪐 Planet Memory ")
            .title_style(
                Style::default()
                    .fg(Color::Rgb(200, 160, 255))
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
            ])
            .split(inner);

        let status = Line::from(vec![
            Span::styled(" 🪐 ", Style::default()),
            Span::styled(
                format!("Moves: {} ", self.moves),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(format!("⏱ Time: {}s ", self.seconds), Style::default().fg(Color::Cyan)),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("Pairs: {}/{} ", self.matched_pairs, self.total_pairs()),
                Style::default().fg(Color::Green),
            ),
        ]);
        frame.render_widget(Paragraph::new(status), chunks[0]);

        // Board: fixed-size cards centered in the field
        let field = chunks[1];
        let rows = (self.board.len() + GRID_COLS - 1) / GRID_COLS;
        if rows > 0 {
            let card_w = (field.width / GRID_COLS as u16).clamp(5, 12);
            let card_h = (field.height / rows as u16).clamp(3, 5);
            let board_w = card_w * GRID_COLS as u16;
            let board_h = card_h * rows as u16;
            let ox = field.x + field.width.saturating_sub(board_w) / 2;
            let oy = field.y + field.height.saturating_sub(board_h) / 2;
            for index in 0..self.board.len() {
                let col = (index % GRID_COLS) as u16;
                let row = (index / GRID_COLS) as u16;
                let x = ox + col * card_w;
                let y = oy + row * card_h;
                if x + card_w > field.x + field.width || y + card_h > field.y + field.height {
                    continue;
                }
                self.render_card(frame, Rect::new(x, y, card_w, card_h), index);
            }
        }

        if self.ending.is_over() {
            crate::ui::render_overlay(
                frame,
                field,
                " 🚀 ALL PAIRS FOUND! ",
                Color::Rgb(80, 220, 120),
                vec![
                    Line::from(""),
                    Line::from(Span::styled(
                        format!("You found all pairs in {} seconds", self.seconds),
                        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(
                        format!("with {} moves!", self.moves),
                        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                    )),
                    Line::from(""),
                    Line::from(Span::styled(
                        "Press ENTER to play again",
                        Style::default().fg(Color::Rgb(100, 100, 130)),
                    )),
                ],
            );
        }

        let help = if self.paused {
            Line::from(Span::styled(
                " ⏸ PAUSED - Press P to resume ",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ))
        } else {
            Line::from(vec![
                Span::styled(" ↑ ↓ ← → Move ", Style::default().fg(Color::DarkGray)),
                Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
                Span::styled("SPACE Flip ", Style::default().fg(Color::DarkGray)),
                Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
                Span::styled("P Pause ", Style::default().fg(Color::DarkGray)),
                Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
                Span::styled("R Restart ", Style::default().fg(Color::DarkGray)),
                Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
                Span::styled("Esc Menu", Style::default().fg(Color::DarkGray)),
            ])
        };
        frame.render_widget(Paragraph::new(help), chunks[2]);
    }

    fn reset(&mut self) {
        self.init();
    }

    fn get_score(&self) -> u32 {
        self.matched_pairs
    }

    fn is_game_over(&self) -> bool {
        self.ending.is_over()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Generation, TimerId};

    fn game() -> PlanetMemory {
        PlanetMemory::new(Some(7))
    }

    /// Board ids of a matching pair and of a card that doesn't match the first.
    fn pair_and_stranger(g: &PlanetMemory) -> (EntityId, EntityId, EntityId) {
        let first = g.board()[0];
        let planet = g.card(first).unwrap().planet;
        let twin = *g.board()[1..].iter().find(|id| g.card(**id).unwrap().planet == planet).unwrap();
        let stranger = *g.board().iter().find(|id| g.card(**id).unwrap().planet != planet).unwrap();
        (first, twin, stranger)
    }

    fn all_pairs(g: &PlanetMemory) -> Vec<(EntityId, EntityId)> {
        let mut pairs = Vec::new();
        for &planet in PLANETS.iter() {
            let ids: Vec<EntityId> = g.board().iter().copied().filter(|id| g.card(*id).unwrap().planet == planet).collect();
            pairs.push((ids[0], ids[1]));
        }
        pairs
    }

    #[test]
    fn test_deal_has_every_planet_twice() {
        let g = game();
        assert_eq!(g.board().len(), 16);
        assert_eq!(g.total_pairs(), 8);
        for planet in PLANETS {
            let count = g.board().iter().filter(|id| g.card(**id).unwrap().planet == planet).count();
            assert_eq!(count, 2);
        }
        assert!(g.is_running());
        assert_eq!(g.pending_timers(), 1);
    }

    #[test]
    fn test_equal_keys_match_and_count_once() {
        let mut g = game();
        let (a, b, _) = pair_and_stranger(&g);
        assert_eq!(g.flip(a), Flip::Revealed);
        assert_eq!(g.flip(b), Flip::Matched);
        assert_eq!(g.matched_pairs(), 1);
        assert_eq!(g.moves(), 1);
        assert!(g.card(a).unwrap().matched && g.card(b).unwrap().matched);
        assert!(!g.is_locked());
        // matched cards can't be flipped again
        assert_eq!(g.flip(a), Flip::Ignored);
        assert_eq!(g.matched_pairs(), 1);
    }

    #[test]
    fn test_mismatch_flips_back_after_delay() {
        let mut g = game();
        let (a, _, c) = pair_and_stranger(&g);
        g.flip(a);
        assert_eq!(g.flip(c), Flip::Mismatched);
        assert!(g.is_locked());
        assert_eq!(g.moves(), 1);

        g.update(Duration::from_millis(999));
        assert!(g.card(a).unwrap().flipped);
        assert!(g.is_locked());

        g.update(Duration::from_millis(1));
        assert!(!g.card(a).unwrap().flipped);
        assert!(!g.card(c).unwrap().flipped);
        assert!(!g.is_locked());
        assert_eq!(g.matched_pairs(), 0);
        assert_eq!(g.moves(), 1);
    }

    #[test]
    fn test_third_card_refused_while_pair_pending() {
        let mut g = game();
        let (a, b, c) = pair_and_stranger(&g);
        g.flip(a);
        g.flip(c);
        assert_eq!(g.flip(b), Flip::Ignored);
        assert!(!g.card(b).unwrap().flipped);
    }

    #[test]
    fn test_same_card_twice_is_ignored() {
        let mut g = game();
        let a = g.board()[0];
        assert_eq!(g.flip(a), Flip::Revealed);
        assert_eq!(g.flip(a), Flip::Ignored);
        assert_eq!(g.moves(), 0);
    }

    #[test]
    fn test_win_fires_once_and_stops_scheduler() {
        let mut g = game();
        let pairs = all_pairs(&g);
        let mut wins = 0;
        for (a, b) in pairs {
            g.flip(a);
            if g.flip(b) == Flip::Won {
                wins += 1;
            }
        }
        assert_eq!(wins, 1);
        assert_eq!(g.matched_pairs(), 8);
        assert_eq!(g.outcome(), Some(Outcome::Victory));
        assert!(!g.is_running());
        assert_eq!(g.pending_timers(), 0);

        let seconds = g.seconds();
        g.update(Duration::from_secs(5));
        assert_eq!(g.seconds(), seconds);
        assert!(g.is_game_over());
    }

    #[test]
    fn test_clock_ticks_every_second() {
        let mut g = game();
        g.update(Duration::from_millis(2500));
        assert_eq!(g.seconds(), 2);
    }

    #[test]
    fn test_restart_matches_fresh_shape() {
        let mut g = game();
        let pairs = all_pairs(&g);
        for (a, b) in pairs.into_iter().take(3) {
            g.flip(a);
            g.flip(b);
        }
        g.update(Duration::from_millis(3000));
        g.init();
        g.init();

        let fresh = game();
        assert_eq!(g.board().len(), fresh.board().len());
        assert_eq!(g.moves(), 0);
        assert_eq!(g.seconds(), 0);
        assert_eq!(g.matched_pairs(), 0);
        assert!(!g.is_locked());
        assert_eq!(g.outcome(), None);
        assert_eq!(g.pending_timers(), fresh.pending_timers());
        assert!(g.board().iter().all(|id| {
            let card = g.card(*id).unwrap();
            !card.flipped && !card.matched
        }));
    }

    #[test]
    fn test_stale_flip_back_does_not_touch_new_session() {
        let mut g = game();
        let (a, _, c) = pair_and_stranger(&g);
        g.flip(a);
        g.flip(c);
        let old_generation = g.scheduler.generation();

        g.init();
        let (x, _, _) = pair_and_stranger(&g);
        g.flip(x);

        // a flip-back left over from the previous deal
        g.on_timer(Fired {
            id: TimerId(u64::MAX),
            event: MemoryEvent::FlipBack(x, x),
            generation: old_generation,
            at_ms: 0,
        });
        assert!(g.card(x).unwrap().flipped);

        // and the clock from the old session
        g.on_timer(Fired {
            id: TimerId(u64::MAX),
            event: MemoryEvent::ClockSecond,
            generation: Generation::default(),
            at_ms: 0,
        });
        assert_eq!(g.seconds(), 0);
    }

    #[test]
    fn test_restart_during_pending_flip_back_unlocks() {
        let mut g = game();
        let (a, _, c) = pair_and_stranger(&g);
        g.flip(a);
        g.flip(c);
        g.init();
        assert!(!g.is_locked());
        g.update(Duration::from_millis(1500));
        assert_eq!(g.moves(), 0);
        assert!(g.board().iter().all(|id| !g.card(*id).unwrap().flipped));
    }

    #[test]
    fn test_keyboard_cursor_flips_selected_card() {
        use crossterm::event::KeyModifiers;
        let mut g = game();
        g.handle_input(KeyEvent::new(KeyCode::Right, KeyModifiers::NONE));
        g.handle_input(KeyEvent::new(KeyCode::Down, KeyModifiers::NONE));
        g.handle_input(KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE));
        let id = g.board()[GRID_COLS + 1];
        assert!(g.card(id).unwrap().flipped);

        // wraps around the left edge
        g.handle_input(KeyEvent::new(KeyCode::Left, KeyModifiers::NONE));
        g.handle_input(KeyEvent::new(KeyCode::Left, KeyModifiers::NONE));
        assert_eq!(g.cursor, GRID_COLS + 3);
    }
}
