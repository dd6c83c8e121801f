//! Shared rosters and tables for integration tests.
#![allow(dead_code)]

use std::collections::BTreeMap;

use battle_core::{
    AbilityDescriptor, AbilityId, ActionRates, AttackMultipliers, BuffStat, CombatStats,
    Combatant, DefinitionTables, EnemySkillDefinition, EnemySkillId, EnemySkillKind,
    ExtraActionDescriptor, ExtraActionTrigger, ReactionAction, ReactionChance,
    ReactionDescriptor, ReactionTarget, ReactionTrigger, SkillEffect, SpellDefinition, SpellId,
    SpellKind, SpellSchool, SpellSlot, StatusDefinition, StatusId, StatusTags, Targeting,
};

pub const POISON: StatusId = StatusId(1);
pub const SLEEP: StatusId = StatusId(2);
pub const CONFUSE: StatusId = StatusId(3);

pub const FIREBOLT: SpellId = SpellId(1);
pub const HEAL: SpellId = SpellId(2);
pub const GUARD_UP: SpellId = SpellId(3);

pub const CLAW: EnemySkillId = EnemySkillId(10);
pub const FIRE_BREATH: EnemySkillId = EnemySkillId(11);

/// A plain melee fighter: 100 hit, no evasion, no crits, always attacks.
pub fn fighter(name: &str, attack: f64, defense: f64, max_hp: u32, agility: i32) -> Combatant {
    let mut combatant = Combatant::new(
        name,
        name,
        CombatStats {
            max_hp,
            physical_attack: attack,
            physical_defense: defense,
            magical_attack: attack,
            magical_defense: defense,
            hit_score: 100.0,
            attack_count: 1.0,
            magical_healing: 20.0,
            breath_power: attack,
            ..CombatStats::default()
        },
    );
    combatant.attributes.agility = agility;
    combatant.rates = ActionRates {
        physical: 100,
        ..ActionRates::default()
    };
    combatant
}

/// Never acts on its own; only guards.
pub fn dummy(name: &str, defense: f64, max_hp: u32) -> Combatant {
    let mut combatant = fighter(name, 1.0, defense, max_hp, 1);
    combatant.rates = ActionRates::default();
    combatant
}

pub fn tables() -> DefinitionTables {
    let mut modifiers = BTreeMap::new();
    modifiers.insert(BuffStat::PhysicalDefense, 0.5);

    DefinitionTables::new()
        .with_status(
            StatusDefinition::new(POISON, "poison", 3)
                .with_tick(5)
                .with_tags(StatusTags::HARMFUL | StatusTags::POISON),
        )
        .with_status(
            StatusDefinition::new(SLEEP, "sleep", 2)
                .locking()
                .with_recovery(30.0)
                .with_tags(StatusTags::HARMFUL | StatusTags::SLEEP),
        )
        .with_status(
            StatusDefinition::new(CONFUSE, "confusion", 2)
                .with_recovery(25.0)
                .with_tags(StatusTags::HARMFUL | StatusTags::CONFUSION | StatusTags::SPELL_BOUND),
        )
        .with_spell(
            SpellDefinition::new(
                FIREBOLT,
                "firebolt",
                SpellSchool::Mage,
                SpellKind::Attack {
                    multiplier: 1.2,
                    hits: 1,
                },
                Targeting::Single,
            )
            .with_tier(2),
        )
        .with_spell(SpellDefinition::new(
            HEAL,
            "heal",
            SpellSchool::Priest,
            SpellKind::Heal {
                flat_percent: None,
                multiplier: 1.5,
            },
            Targeting::Single,
        ))
        .with_spell(SpellDefinition::new(
            GUARD_UP,
            "guard up",
            SpellSchool::Priest,
            SpellKind::Buff {
                buff: 1,
                turns: 3,
                modifiers,
            },
            Targeting::AllAllies,
        ))
        .with_enemy_skill(
            EnemySkillDefinition::new(CLAW, "claw", EnemySkillKind::Physical, Targeting::Random, 40.0)
                .with_hits(2)
                .with_uses(3)
                .with_multipliers(1.3, 0.9),
        )
        .with_enemy_skill(
            EnemySkillDefinition::new(
                FIRE_BREATH,
                "fire breath",
                EnemySkillKind::Breath,
                Targeting::All,
                25.0,
            )
            .with_multipliers(0.8, 1.0),
        )
}

pub fn ability(id: u16, effects: Vec<SkillEffect>) -> AbilityDescriptor {
    AbilityDescriptor::new(AbilityId(id), effects)
}

pub fn counter(id: u16, trigger: ReactionTrigger, chance: f64) -> SkillEffect {
    SkillEffect::Reaction(ReactionDescriptor::new(
        AbilityId(id),
        trigger,
        ReactionChance::flat(chance),
        ReactionAction::Physical(AttackMultipliers::NEUTRAL),
        ReactionTarget::Attacker,
    ))
}

pub fn always_extra_action(id: u16) -> SkillEffect {
    SkillEffect::ExtraAction(ExtraActionDescriptor::new(
        AbilityId(id),
        ExtraActionTrigger::Always,
        100.0,
        1,
    ))
}

fn spells(combatant: &mut Combatant, ids: &[SpellId], charges: u8) {
    for &spell in ids {
        combatant.spells.push(SpellSlot {
            spell,
            max_charges: charges,
            current: None,
        });
    }
}

/// A mixed party exercising spells, reactions, statuses and barriers.
pub fn party() -> Vec<Combatant> {
    let mut knight = fighter("knight", 42.0, 20.0, 160, 12);
    knight.level = 12;
    knight.attributes.strength = 30;
    knight.attributes.vitality = 25;
    knight.abilities.push(ability(
        100,
        vec![
            SkillEffect::ShieldBlock { bonus: 10.0 },
            SkillEffect::AllyProtection(0.8),
            counter(101, ReactionTrigger::AllyDamaged, 30.0),
        ],
    ));

    let mut mage = fighter("mage", 18.0, 8.0, 90, 15);
    mage.row = 1;
    mage.level = 10;
    mage.rates = ActionRates {
        mage: 70,
        physical: 100,
        ..ActionRates::default()
    };
    spells(&mut mage, &[FIREBOLT], 4);
    mage.abilities.push(ability(
        110,
        vec![
            SkillEffect::MagicCritical(15.0),
            SkillEffect::ChargeRegen(1),
            SkillEffect::Barrier {
                damage_type: battle_core::DamageType::Physical,
                guard: false,
                charges: 2,
            },
        ],
    ));

    let mut priest = fighter("priest", 14.0, 10.0, 100, 9);
    priest.row = 2;
    priest.level = 8;
    priest.rates = ActionRates {
        priest: 80,
        physical: 100,
        ..ActionRates::default()
    };
    spells(&mut priest, &[HEAL, GUARD_UP], 3);
    priest.abilities.push(ability(
        120,
        vec![
            SkillEffect::Rescue {
                chance: 40.0,
                hp_percent: 25,
                uses: 1,
            },
            SkillEffect::ResistStatus {
                status: POISON,
                multiplier: 0.5,
                additive: 0.0,
            },
        ],
    ));

    let mut rogue = fighter("rogue", 30.0, 12.0, 110, 20);
    rogue.stats.critical_rate = 20.0;
    rogue.stats.attack_count = 2.0;
    rogue.level = 11;
    rogue.abilities.push(ability(
        130,
        vec![
            SkillEffect::InflictStatus {
                status: POISON,
                chance: 35.0,
            },
            SkillEffect::Degradation(5.0),
            counter(131, ReactionTrigger::SelfEvaded, 50.0),
            SkillEffect::ExtraAction(
                ExtraActionDescriptor::new(AbilityId(132), ExtraActionTrigger::AfterTurn(2), 30.0, 1)
                    .lasting(3),
            ),
        ],
    ));

    vec![knight, mage, priest, rogue]
}

/// A pack of enemies with special skills and disruptive abilities.
pub fn pack() -> Vec<Combatant> {
    let mut alpha = fighter("alpha", 38.0, 15.0, 180, 14);
    alpha.enemy_skills = vec![CLAW, FIRE_BREATH];
    alpha.abilities.push(ability(
        200,
        vec![
            SkillEffect::InflictStatus {
                status: SLEEP,
                chance: 15.0,
            },
            counter(201, ReactionTrigger::SelfDamagedPhysical, 25.0),
            counter(202, ReactionTrigger::AllyDefeated, 60.0),
            SkillEffect::Resurrection {
                chance: 50.0,
                hp_percent: 30,
                uses: 1,
            },
        ],
    ));

    let mut imp = fighter("imp", 22.0, 8.0, 70, 18);
    imp.abilities.push(ability(
        210,
        vec![
            SkillEffect::InflictStatus {
                status: CONFUSE,
                chance: 20.0,
            },
            SkillEffect::Parry { bonus: 15.0 },
            SkillEffect::Absorption(25.0),
        ],
    ));

    let mut brute = fighter("brute", 45.0, 22.0, 200, 6);
    brute.stats.hit_score = 60.0;
    brute.abilities.push(ability(
        220,
        vec![
            SkillEffect::Berserk {
                chance: 10.0,
                status: CONFUSE,
            },
            SkillEffect::EnemyActionDebuff(10.0),
        ],
    ));

    vec![alpha, imp, brute]
}
