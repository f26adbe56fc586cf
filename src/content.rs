//! Static game content: decks, question bank, boss roster and word lists.
//! Read-only; lookups past the end of a table clamp to its last entry.

use ratatui::style::Color;

pub const PLANETS: [&str; 8] = ["🌍", "🪐", "🚀", "⭐", "🌕", "🌞", "🌠", "🛸"];

pub struct Question {
    pub prompt: &'static str,
    pub answers: [u32; 4],
    pub correct: usize,
}

pub const QUESTIONS: [Question; 6] = [
    Question { prompt: "3 + 8 = ?", answers: [11, 10, 12, 9], correct: 0 },
    Question { prompt: "15 - 6 = ?", answers: [8, 9, 10, 7], correct: 1 },
    Question { prompt: "7 x 4 = ?", answers: [28, 32, 21, 24], correct: 0 },
    Question { prompt: "36 / 6 = ?", answers: [6, 7, 5, 8], correct: 0 },
    Question { prompt: "9 x 9 = ?", answers: [81, 72, 80, 90], correct: 0 },
    // final boss
    Question { prompt: "12 x 11 = ?", answers: [121, 132, 122, 144], correct: 1 },
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeadShape {
    Round,
    Square,
    Triangle,
    TwinEyes,
    Horns,
    Crowned,
}

pub struct BossKind {
    pub name: &'static str,
    pub head: HeadShape,
    pub head_color: Color,
    pub body_color: Color,
}

pub const BOSS_ROSTER: [BossKind; 6] = [
    BossKind { name: "Blob", head: HeadShape::Round, head_color: Color::Rgb(76, 175, 80), body_color: Color::Rgb(62, 142, 65) },
    BossKind { name: "Cube", head: HeadShape::Square, head_color: Color::Rgb(33, 150, 243), body_color: Color::Rgb(11, 125, 218) },
    BossKind { name: "Spike", head: HeadShape::Triangle, head_color: Color::Rgb(244, 67, 54), body_color: Color::Rgb(211, 47, 47) },
    BossKind { name: "Gazer", head: HeadShape::TwinEyes, head_color: Color::Rgb(255, 235, 59), body_color: Color::Rgb(251, 192, 45) },
    BossKind { name: "Horned", head: HeadShape::Horns, head_color: Color::Rgb(156, 39, 176), body_color: Color::Rgb(123, 31, 162) },
    BossKind { name: "Overlord", head: HeadShape::Crowned, head_color: Color::Rgb(233, 30, 99), body_color: Color::Rgb(194, 24, 91) },
];

pub const WORD_LISTS: [&[&str]; 3] = [
    &["jet", "sky", "fly", "air", "wing", "fast", "high", "blue"],
    &["pilot", "engine", "cloud", "flight", "speed", "sonic", "eagle", "rocket"],
    &["airplane", "propeller", "altitude", "tailwind", "velocity", "squadron", "aviation", "supersonic"],
];

pub const ENEMIES_PER_WAVE: [u32; 3] = [8, 12, 15];

pub const ENEMY_ICONS: [char; 4] = ['✈', '➤', '➣', '➢'];

pub fn question(index: usize) -> &'static Question {
    &QUESTIONS[index.min(QUESTIONS.len() - 1)]
}

pub fn boss_kind(index: usize) -> &'static BossKind {
    &BOSS_ROSTER[index.min(BOSS_ROSTER.len() - 1)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookups_clamp_to_last_entry() {
        assert_eq!(question(99).prompt, "12 x 11 = ?");
        assert_eq!(boss_kind(42).head, HeadShape::Crowned);
    }

    #[test]
    fn test_every_question_has_a_valid_answer_index() {
        for q in &QUESTIONS {
            assert!(q.correct < q.answers.len());
        }
        assert_eq!(QUESTIONS.len(), BOSS_ROSTER.len());
    }

    #[test]
    fn test_wave_tables_line_up() {
        assert_eq!(WORD_LISTS.len(), ENEMIES_PER_WAVE.len());
        assert!(WORD_LISTS.iter().all(|list| !list.is_empty()));
    }
}
