use std::collections::HashMap;
use std::time::Duration;

use minicade::engine::{EntityId, Outcome};
use minicade::games::boss_quiz::{Answer, BossQuiz};
use minicade::games::memory::{Flip, PlanetMemory};
use minicade::games::sky_defense::{SkyDefense, Typed, WavePhase};
use minicade::games::Game;

const FRAME: Duration = Duration::from_millis(16);

fn pairs(game: &PlanetMemory) -> Vec<(EntityId, EntityId)> {
    let mut by_planet: HashMap<&str, Vec<EntityId>> = HashMap::new();
    for &id in game.board() {
        let planet = game.card(id).unwrap().planet;
        by_planet.entry(planet).or_default().push(id);
    }
    by_planet.into_values().map(|ids| (ids[0], ids[1])).collect()
}

#[test]
fn memory_win_fires_once_and_stops_the_clock() {
    let mut game = PlanetMemory::new(Some(7));
    game.update(Duration::from_millis(2500));

    let all = pairs(&game);
    assert_eq!(all.len(), 8);
    let mut wins = 0;
    for (a, b) in all {
        assert_eq!(game.flip(a), Flip::Revealed);
        if game.flip(b) == Flip::Won {
            wins += 1;
        }
    }
    assert_eq!(wins, 1);
    assert_eq!(game.matched_pairs(), 8);
    assert_eq!(game.outcome(), Some(Outcome::Victory));
    assert!(game.is_game_over());
    assert!(!game.is_running());

    let seconds = game.seconds();
    game.update(Duration::from_secs(5));
    assert_eq!(game.seconds(), seconds);
}

#[test]
fn memory_mismatch_is_undone_after_the_delay() {
    let mut game = PlanetMemory::new(Some(3));
    let all = pairs(&game);
    let (a, b) = (all[0].0, all[1].0);
    game.flip(a);
    assert_eq!(game.flip(b), Flip::Mismatched);
    assert_eq!(game.moves(), 1);
    assert_eq!(game.flip(all[2].0), Flip::Ignored);

    game.update(Duration::from_millis(999));
    assert!(game.card(a).unwrap().flipped);
    game.update(Duration::from_millis(1));
    assert!(!game.card(a).unwrap().flipped && !game.card(b).unwrap().flipped);
    assert_eq!(game.matched_pairs(), 0);
}

#[test]
fn memory_restart_discards_pending_flip_back() {
    let mut game = PlanetMemory::new(Some(3));
    let all = pairs(&game);
    game.flip(all[0].0);
    game.flip(all[1].0);
    game.reset();

    let fresh = pairs(&game);
    game.flip(fresh[0].0);
    game.update(Duration::from_millis(1000));
    // the old flip-back would have cleared this pending card
    assert!(game.card(fresh[0].0).unwrap().flipped);
    assert_eq!(game.moves(), 0);
    assert_eq!(game.seconds(), 1);
}

#[test]
fn boss_quiz_six_correct_answers_win() {
    let mut game = BossQuiz::new(Some(1));
    let mut fired = 0;
    for _ in 0..10_000 {
        if game.outcome().is_some() {
            break;
        }
        if !game.is_locked() {
            let correct = game.question().correct;
            assert_eq!(game.answer(correct), Answer::Fired);
            fired += 1;
        }
        game.update(FRAME);
    }
    assert_eq!(fired, 6);
    assert_eq!(game.bosses_defeated(), 6);
    assert_eq!(game.outcome(), Some(Outcome::Victory));
    assert_eq!(game.lives(), 3);
    assert_eq!(game.pending_timers(), 0);
}

#[test]
fn boss_quiz_three_wrong_answers_lose() {
    let mut game = BossQuiz::new(Some(1));
    let wrong = (game.question().correct + 1) % 4;
    assert_eq!(game.answer(wrong), Answer::Wrong);
    assert_eq!(game.answer(wrong), Answer::Wrong);
    assert_eq!(game.answer(wrong), Answer::Defeat);
    assert_eq!(game.lives(), 0);
    assert_eq!(game.answer(wrong), Answer::Ignored);
    assert_eq!(game.outcome(), Some(Outcome::Defeat));
}

/// Types every live word as soon as it appears until the session ends.
fn play_sky_defense(game: &mut SkyDefense) -> u32 {
    let mut wave_changes = 0;
    let mut last_wave = game.wave();
    for _ in 0..20_000 {
        if game.outcome().is_some() {
            break;
        }
        game.update(FRAME);
        let words: Vec<&'static str> = game.enemies().map(|(_, e)| e.word).collect();
        for word in words {
            let mut last = Typed::Ignored;
            for c in word.chars() {
                last = game.type_char(c);
            }
            assert!(matches!(last, Typed::Destroyed { .. }), "{word} was not destroyed");
        }
        if game.wave() != last_wave {
            wave_changes += 1;
            last_wave = game.wave();
        }
    }
    wave_changes
}

#[test]
fn sky_defense_clears_three_waves_then_wins() {
    let mut game = SkyDefense::new(Some(99));
    let wave_changes = play_sky_defense(&mut game);

    assert_eq!(wave_changes, 3);
    assert_eq!(game.waves_cleared(), 3);
    assert_eq!(game.outcome(), Some(Outcome::Victory));
    assert_eq!(game.castle_hp(), 100);
    assert!(!game.is_spawning());
    assert_eq!(game.pending_timers(), 0);
    assert!(game.score() > 0);
    assert_eq!(game.enemy_count(), 0);
    assert_eq!(game.laser_count(), 0);
}

#[test]
fn sky_defense_undefended_castle_falls_once() {
    let mut game = SkyDefense::new(Some(4));
    for _ in 0..40_000 {
        if game.is_game_over() {
            break;
        }
        game.update(FRAME);
    }
    assert_eq!(game.outcome(), Some(Outcome::Defeat));
    assert_eq!(game.castle_hp(), 0);
    game.update(Duration::from_secs(30));
    assert_eq!(game.castle_hp(), 0);
    assert_eq!(game.outcome(), Some(Outcome::Defeat));
}

#[test]
fn sky_defense_restart_mid_wave_is_clean() {
    let mut game = SkyDefense::new(Some(12));
    game.update(Duration::from_millis(9000));
    assert_eq!(game.phase(), WavePhase::InProgress);
    assert!(game.enemy_count() > 0);

    game.reset();
    game.reset();
    assert_eq!(game.enemy_count(), 0);
    assert_eq!(game.score(), 0);
    assert_eq!(game.castle_hp(), 100);
    assert_eq!(game.wave(), 1);

    game.update(Duration::from_millis(1999));
    assert_eq!(game.phase(), WavePhase::Banner);
    assert_eq!(game.enemy_count(), 0);
}
