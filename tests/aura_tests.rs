//! Aura tests.
//!
//! Stats are computed on every read, so adding or removing an aura source
//! changes what other minions read immediately.

mod common;

use ccg_kernel::core::PlayerId;
use ccg_kernel::zones::Zone;

use common::*;

/// Two champions stack; losing one drops the buff by one.
#[test]
fn test_auras_stack_and_unstack() {
    let mut game = empty_game();
    let squire = summon(&mut game, PlayerId::FIRST, SQUIRE);
    assert_eq!(stats(&game, squire), (2, 3));

    let first = summon(&mut game, PlayerId::FIRST, CHAMPION);
    let second = summon(&mut game, PlayerId::FIRST, CHAMPION);
    assert_eq!(stats(&game, squire), (4, 5));
    // Each champion buffs the other but not itself.
    assert_eq!(stats(&game, first), (7, 7));

    game.destroy(first).unwrap();
    game.process_deaths().unwrap();

    assert_eq!(game.zone_of(first), Some(Zone::Graveyard));
    assert_eq!(stats(&game, squire), (3, 4));
    assert_eq!(stats(&game, second), (6, 6));
}

/// Playing the aura source from hand applies it once it enters play.
#[test]
fn test_played_champion_buffs_board() {
    let mut game = empty_game();
    let squire = summon(&mut game, PlayerId::FIRST, SQUIRE);
    let champion = in_hand(&mut game, PlayerId::FIRST, CHAMPION);

    // Still in hand: no buff.
    assert_eq!(stats(&game, squire), (2, 3));

    play(&mut game, champion, None).unwrap();
    assert_eq!(stats(&game, squire), (3, 4));
    assert_eq!(game.player(PlayerId::FIRST).mana.current, 3);
}

/// Auras only reach their own side.
#[test]
fn test_aura_ignores_enemies() {
    let mut game = empty_game();
    let enemy = summon(&mut game, PlayerId::SECOND, SQUIRE);
    summon(&mut game, PlayerId::FIRST, CHAMPION);
    assert_eq!(stats(&game, enemy), (2, 3));
}

/// Silencing the source removes its aura.
#[test]
fn test_silence_removes_aura() {
    let mut game = empty_game();
    let squire = summon(&mut game, PlayerId::FIRST, SQUIRE);
    let champion = summon(&mut game, PlayerId::FIRST, CHAMPION);

    game.silence(champion).unwrap();
    assert_eq!(stats(&game, squire), (2, 3));
    assert!(game.triggers().owned_by(champion).next().is_none());
}

/// A damaged minion kept alive by an aura dies when the aura goes.
#[test]
fn test_losing_health_aura_kills_damaged_minion() {
    let mut game = empty_game();
    let squire = summon(&mut game, PlayerId::FIRST, SQUIRE);
    let champion = summon(&mut game, PlayerId::FIRST, CHAMPION);

    game.deal_damage(None, squire, 3).unwrap();
    game.process_deaths().unwrap();
    assert_eq!(game.health(squire), 1);

    game.destroy(champion).unwrap();
    game.process_deaths().unwrap();
    assert_eq!(game.zone_of(squire), Some(Zone::Graveyard));
    assert_eq!(game.player(PlayerId::FIRST).corpses.count(), 2);
}

/// Taking control of a minion moves it under the new side's auras.
#[test]
fn test_stolen_minion_changes_aura() {
    let mut game = empty_game();
    summon(&mut game, PlayerId::FIRST, CHAMPION);
    let squire = summon(&mut game, PlayerId::SECOND, SQUIRE);
    assert_eq!(stats(&game, squire), (2, 3));

    assert!(game.take_control(squire, PlayerId::FIRST).unwrap());
    assert_eq!(stats(&game, squire), (3, 4));
    assert_eq!(game.board(PlayerId::FIRST).len(), 2);
    assert_eq!(game.entity(squire).unwrap().owner, PlayerId::SECOND);
}
