//! Sequence and death-processing tests.
//!
//! Every phase ends with a death check, deaths resolve in play order and
//! reactions see the board as it is after each phase.

mod common;

use std::sync::{Arc, Mutex};

use ccg_kernel::core::{Action, EntityId, IllegalAction, KernelError, KernelResult, PlayerId};
use ccg_kernel::game::Game;
use ccg_kernel::sequence::{Phase, PhaseKind, Sequence, SequenceKind};
use ccg_kernel::triggers::{DamageTaken, Lifetime, MinionDied, MinionSummoned, TriggerContext};
use ccg_kernel::zones::Zone;

use common::*;

type Log<T> = Arc<Mutex<Vec<T>>>;

fn watch_deaths(game: &mut Game) -> Log<(EntityId, Option<PhaseKind>)> {
    let log: Log<(EntityId, Option<PhaseKind>)> = Arc::default();
    let sink = Arc::clone(&log);
    let watcher = game.player(PlayerId::SECOND).hero;
    game.register_trigger::<MinionDied, _>(watcher, Lifetime::Persistent, move |game, _, died| {
        let phase = game.sequences().current().and_then(|f| f.phase);
        sink.lock().unwrap().push((died.minion, phase));
        Ok(())
    });
    log
}

/// A battlecry kill is resolved in the battlecry phase, before the minion
/// counts as summoned.
#[test]
fn test_battlecry_kill_resolves_in_its_phase() {
    let mut game = empty_game();
    let wisp = summon(&mut game, PlayerId::SECOND, WISP);
    let deaths = watch_deaths(&mut game);

    let sniper = in_hand(&mut game, PlayerId::FIRST, SNIPER);
    play(&mut game, sniper, Some(wisp)).unwrap();

    assert_eq!(*deaths.lock().unwrap(), vec![(wisp, Some(PhaseKind::Battlecry))]);
    assert_eq!(game.board(PlayerId::FIRST), vec![sniper]);
    assert!(game.board(PlayerId::SECOND).is_empty());
    assert!(game.sequences().is_idle());
}

/// Simultaneous deaths resolve in ascending entity id.
#[test]
fn test_deaths_resolve_in_play_order() {
    let mut game = empty_game();
    let ids: Vec<EntityId> = (0..3).map(|_| summon(&mut game, PlayerId::SECOND, SQUIRE)).collect();
    let deaths = watch_deaths(&mut game);

    let strike = in_hand(&mut game, PlayerId::FIRST, FLAMESTRIKE);
    play(&mut game, strike, None).unwrap();

    let order: Vec<EntityId> = deaths.lock().unwrap().iter().map(|(id, _)| *id).collect();
    assert_eq!(order, ids);
    assert_eq!(game.player(PlayerId::SECOND).corpses.count(), 3);
    assert_eq!(game.zone_of(strike), Some(Zone::Graveyard));
}

/// A deathrattle runs after its minion has left the board.
#[test]
fn test_deathrattle_summons_into_freed_slot() {
    let mut game = empty_game();
    for _ in 0..6 {
        summon(&mut game, PlayerId::SECOND, SQUIRE);
    }
    let golem = summon(&mut game, PlayerId::SECOND, HARVEST);
    assert_eq!(game.board(PlayerId::SECOND).len(), 7);

    game.destroy(golem).unwrap();
    game.process_deaths().unwrap();

    let board = game.board(PlayerId::SECOND);
    assert_eq!(board.len(), 7);
    let token = game.entity(*board.last().unwrap()).unwrap();
    assert_eq!(token.card_id.as_str(), WISP);
}

/// Deaths caused by a death reaction are picked up by a later pass.
#[test]
fn test_chained_deaths_settle() {
    let mut game = empty_game();
    let first = summon(&mut game, PlayerId::SECOND, WISP);
    let second = summon(&mut game, PlayerId::SECOND, WISP);

    let watcher = game.player(PlayerId::FIRST).hero;
    game.register_trigger::<MinionDied, _>(watcher, Lifetime::Persistent, move |game, _, died| {
        if died.minion == first {
            game.deal_damage(None, second, 1)?;
        }
        Ok(())
    });

    game.deal_damage(None, first, 1).unwrap();
    game.process_deaths().unwrap();
    assert!(game.board(PlayerId::SECOND).is_empty());
}

/// A reaction that triggers itself runs once per outer event.
#[test]
fn test_reentrant_reaction_is_skipped() {
    let mut game = empty_game();
    let yeti = summon(&mut game, PlayerId::FIRST, YETI);

    game.register_trigger::<DamageTaken, _>(yeti, Lifetime::InPlay, |game, ctx, hit| {
        if hit.target == ctx.source {
            game.deal_damage(None, ctx.source, 1)?;
        }
        Ok(())
    });

    game.deal_damage(None, yeti, 1).unwrap();
    assert_eq!(game.health(yeti), 3);
}

/// Summon reactions see a minion that survived its own play.
#[test]
fn test_after_summon_fires_for_survivor() {
    let mut game = empty_game();
    let seen: Log<EntityId> = Arc::default();
    let sink = Arc::clone(&seen);
    let hero = game.player(PlayerId::FIRST).hero;
    game.register_trigger::<MinionSummoned, _>(
        hero,
        Lifetime::Persistent,
        move |_: &mut Game, _: &TriggerContext, ev: &MinionSummoned| -> KernelResult<()> {
            sink.lock().unwrap().push(ev.minion);
            Ok(())
        },
    );

    let yeti = in_hand(&mut game, PlayerId::FIRST, YETI);
    play(&mut game, yeti, None).unwrap();
    assert_eq!(*seen.lock().unwrap(), vec![yeti]);
}

/// Card code can run its own sequence; each phase still checks deaths.
#[test]
fn test_custom_sequence_checks_deaths_per_phase() {
    let mut game = empty_game();
    let wisp = summon(&mut game, PlayerId::SECOND, WISP);

    let sequence = Sequence::new(SequenceKind::Effect)
        .then(Phase::new(PhaseKind::Custom).step("hit", move |g| g.deal_damage(None, wisp, 1).map(|_| ())))
        .then(Phase::new(PhaseKind::Custom).step("check", move |g| {
            assert_eq!(g.zone_of(wisp), Some(Zone::Graveyard));
            Ok(())
        }));

    game.run_sequence(sequence).unwrap();
    assert_eq!(game.sequences().completed(), 1);
}

/// A sequence started while deaths are resolving still checks deaths at
/// the end of each of its phases.
#[test]
fn test_nested_sequence_checks_deaths() {
    let mut game = empty_game();
    let first = summon(&mut game, PlayerId::SECOND, WISP);
    let victim = summon(&mut game, PlayerId::SECOND, YETI);
    let seen: Log<Option<Zone>> = Arc::default();

    let sink = Arc::clone(&seen);
    let watcher = game.player(PlayerId::FIRST).hero;
    game.register_trigger::<MinionDied, _>(watcher, Lifetime::Persistent, move |game, _, died| {
        if died.minion != first {
            return Ok(());
        }
        let sink = Arc::clone(&sink);
        let sequence = Sequence::new(SequenceKind::Effect)
            .then(Phase::new(PhaseKind::Custom).step("hit", move |g| g.deal_damage(None, victim, 10).map(|_| ())))
            .then(Phase::new(PhaseKind::Custom).step("look", move |g| {
                sink.lock().unwrap().push(g.zone_of(victim));
                Ok(())
            }));
        game.run_sequence(sequence)
    });

    game.destroy(first).unwrap();
    game.process_deaths().unwrap();

    assert_eq!(*seen.lock().unwrap(), vec![Some(Zone::Graveyard)]);
    assert!(game.board(PlayerId::SECOND).is_empty());
}

/// A minion killed by another's battlecry is already gone when the
/// summon reaction looks at the board.
#[test]
fn test_after_summon_sees_battlecry_victim_dead() {
    let mut game = empty_game();
    let wisp = summon(&mut game, PlayerId::SECOND, WISP);
    let seen: Log<(Option<Zone>, Vec<EntityId>)> = Arc::default();

    let sink = Arc::clone(&seen);
    let hero = game.player(PlayerId::FIRST).hero;
    game.register_trigger::<MinionSummoned, _>(hero, Lifetime::Persistent, move |game, _, _| {
        sink.lock().unwrap().push((game.zone_of(wisp), game.board(PlayerId::SECOND)));
        Ok(())
    });

    let sniper = in_hand(&mut game, PlayerId::FIRST, SNIPER);
    play(&mut game, sniper, Some(wisp)).unwrap();

    assert_eq!(*seen.lock().unwrap(), vec![(Some(Zone::Graveyard), Vec::new())]);
}

/// A spell that needs a target cannot be cast at an untargetable one, and
/// the rejection changes nothing.
#[test]
fn test_illegal_target_leaves_state() {
    let mut game = empty_game();
    let faerie = summon(&mut game, PlayerId::SECOND, FAERIE);
    let fireball = in_hand(&mut game, PlayerId::FIRST, FIREBALL);
    let before = game.clone();

    let err = play(&mut game, fireball, Some(faerie)).unwrap_err();
    assert_eq!(err, KernelError::Illegal(IllegalAction::InvalidTarget(faerie)));
    assert_eq!(play(&mut game, fireball, None).unwrap_err(), KernelError::Illegal(IllegalAction::TargetRequired));

    assert_eq!(game.hand(PlayerId::FIRST), before.hand(PlayerId::FIRST));
    assert_eq!(game.player(PlayerId::FIRST).mana, before.player(PlayerId::FIRST).mana);
    assert_eq!(game.history().len(), 0);
    assert_eq!(game.sequences().started(), before.sequences().started());
}

/// Minion battlecries may go untargeted when nothing can be chosen.
#[test]
fn test_battlecry_without_candidates() {
    let mut game = empty_game();
    let hero_first = game.player(PlayerId::FIRST).hero;
    let hero_second = game.player(PlayerId::SECOND).hero;
    for hero in [hero_first, hero_second] {
        game.require_entity_mut(hero).unwrap().keywords.immune = true;
    }

    let sniper = in_hand(&mut game, PlayerId::FIRST, SNIPER);
    assert!(game
        .check_legal(&Action::PlayCard { card: sniper, target: None, position: None })
        .is_ok());
}
