pub mod boss_quiz;
pub mod memory;
pub mod sky_defense;

use std::time::Duration;

use crossterm::event::KeyEvent;
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::prelude::*;

pub trait Game {
    /// Advance the game's timers by `dt` and run whatever came due.
    fn update(&mut self, dt: Duration);
    fn handle_input(&mut self, key: KeyEvent);
    fn render(&mut self, frame: &mut Frame, area: Rect);
    fn reset(&mut self);
    fn get_score(&self) -> u32;
    fn is_game_over(&self) -> bool;
}

pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
