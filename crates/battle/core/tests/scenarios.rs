//! Small hand-checked encounters.

mod common;

use battle_core::{
    ActionKind, ActorId, BattleConfig, BattleEnv, CombatStats, Combatant, EffectKind, Outcome,
    SetupError, SkillEffect, SpellId, SpellSlot, resolve_battle,
};

use common::{ability, always_extra_action, dummy, fighter, tables};

#[test]
fn single_attack_deals_attack_minus_defense() {
    let tables = tables();
    let result = resolve_battle(
        BattleEnv::from_tables(&tables),
        BattleConfig::default().with_max_turns(1),
        &[fighter("attacker", 50.0, 0.0, 100, 10)],
        &[dummy("defender", 10.0, 500)],
        1,
    )
    .expect("battle should resolve");

    let damage: Vec<u32> = result
        .log
        .effects()
        .filter(|(_, effect)| effect.kind == EffectKind::PhysicalDamage)
        .filter_map(|(_, effect)| effect.value)
        .collect();
    assert_eq!(damage, vec![40]);
    assert_eq!(result.enemies[0].hp, 460);
    assert_eq!(result.outcome, Outcome::Retreat);
    assert_eq!(result.turns, 1);
}

#[test]
fn one_hp_defender_falls_on_first_strike() {
    let tables = tables();
    let mut defender = dummy("defender", 0.0, 10);
    defender.hp = Some(1);

    let result = resolve_battle(
        BattleEnv::from_tables(&tables),
        BattleConfig::default(),
        &[fighter("attacker", 20.0, 0.0, 100, 10)],
        &[defender],
        9,
    )
    .expect("battle should resolve");

    assert_eq!(result.outcome, Outcome::Victory);
    assert_eq!(result.turns, 1);
    assert_eq!(result.enemies[0].hp, 0);
    let defeated = result
        .log
        .effects()
        .any(|(_, effect)| {
            effect.kind == EffectKind::Defeated && effect.target == Some(ActorId::enemy(0))
        });
    assert!(defeated);
    assert!(
        result
            .log
            .by_actor(ActorId::enemy(0))
            .all(|entry| entry.turn == 0),
        "a defeated actor never takes a turn"
    );
}

#[test]
fn enemy_appearances_open_the_log() {
    let tables = tables();
    let result = resolve_battle(
        BattleEnv::from_tables(&tables),
        BattleConfig::default().with_max_turns(1),
        &[dummy("p", 0.0, 10)],
        &[dummy("a", 0.0, 10), dummy("b", 0.0, 10)],
        2,
    )
    .expect("battle should resolve");

    let opening: Vec<(ActionKind, Option<ActorId>)> = result
        .log
        .entries()
        .iter()
        .take(3)
        .map(|entry| (entry.kind, entry.actor))
        .collect();
    assert_eq!(
        opening,
        vec![
            (ActionKind::BattleStart, None),
            (ActionKind::EnemyAppeared, Some(ActorId::enemy(0))),
            (ActionKind::EnemyAppeared, Some(ActorId::enemy(1))),
        ]
    );
}

#[test]
fn guaranteed_extra_action_adds_one_nested_pass() {
    let tables = tables();
    let mut hero = fighter("hero", 5.0, 0.0, 100, 10);
    hero.abilities.push(ability(70, vec![always_extra_action(71)]));

    let result = resolve_battle(
        BattleEnv::from_tables(&tables),
        BattleConfig::default()
            .with_max_turns(1)
            .with_extra_action_depth(1),
        &[hero],
        &[dummy("target", 0.0, 1000)],
        4,
    )
    .expect("battle should resolve");

    let depths: Vec<u8> = result
        .log
        .by_actor(ActorId::player(0))
        .map(|entry| entry.depth)
        .collect();
    assert_eq!(depths, vec![0, 1]);
}

#[test]
fn unknown_spell_is_rejected_at_setup() {
    let tables = tables();
    let mut caster = Combatant::new(
        "caster",
        "caster",
        CombatStats {
            max_hp: 10,
            ..CombatStats::default()
        },
    );
    caster.spells.push(SpellSlot {
        spell: SpellId(99),
        max_charges: 1,
        current: None,
    });

    let err = resolve_battle(
        BattleEnv::from_tables(&tables),
        BattleConfig::default(),
        &[caster],
        &[dummy("e", 0.0, 10)],
        0,
    )
    .expect_err("unknown spell must fail setup");
    assert_eq!(err, SetupError::MissingSpell(SpellId(99)));
}

#[test]
fn empty_roster_is_rejected() {
    let tables = tables();
    let err = resolve_battle(
        BattleEnv::from_tables(&tables),
        BattleConfig::default(),
        &[],
        &[dummy("e", 0.0, 10)],
        0,
    )
    .expect_err("empty roster must fail setup");
    assert!(matches!(err, SetupError::EmptyRoster { .. }));
}

#[test]
fn forced_withdrawal_ends_in_retreat() {
    let tables = tables();
    let mut runner = fighter("runner", 5.0, 0.0, 100, 10);
    runner.abilities.push(ability(
        70,
        vec![SkillEffect::Retreat {
            from_turn: 2,
            chance: 100.0,
        }],
    ));
    let result = resolve_battle(
        BattleEnv::from_tables(&tables),
        BattleConfig::default(),
        &[runner],
        &[dummy("post", 0.0, 10_000)],
        5,
    )
    .expect("battle should resolve");

    assert_eq!(result.outcome, Outcome::Retreat);
    assert_eq!(result.turns, 2);
    assert!(result.players[0].withdrawn);
    let withdrawn: Vec<Option<ActorId>> = result
        .log
        .effects()
        .filter(|(_, effect)| effect.kind == EffectKind::Withdrawn)
        .map(|(entry, effect)| {
            assert_eq!(entry.kind, ActionKind::TurnStart);
            assert_eq!(entry.turn, 2);
            effect.target
        })
        .collect();
    assert_eq!(withdrawn, vec![Some(ActorId::player(0))]);
}
