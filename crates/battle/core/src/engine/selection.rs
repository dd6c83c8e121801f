//! Action selection.
//!
//! Enemy special skills are rolled first; otherwise an ordered lottery over
//! the category rates (breath, priest, mage, physical) yields a fallback
//! chain that always ends in [`ActionChoice::Guard`].

use crate::env::{EnemySkillKind, RandomSource, SpellKind, SpellSchool};
use crate::state::{ActorId, ChargeKey, EnemySkillId, SpellId};

use super::BattleEngine;

/// One link of an action chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionChoice {
    EnemySkill(EnemySkillId),
    Breath,
    Spell(SpellSchool),
    Physical,
    Guard,
}

impl<R: RandomSource> BattleEngine<'_, R> {
    /// Builds the fallback chain for `actor`'s action this slot.
    pub(crate) fn choose_actions(&mut self, actor: ActorId) -> Vec<ActionChoice> {
        if let Some(skill) = self.select_enemy_skill(actor) {
            return vec![ActionChoice::EnemySkill(skill), ActionChoice::Guard];
        }

        let rates = self.ctx.actor(actor).rates;
        let candidates: Vec<(ActionChoice, u8)> = [
            (ActionChoice::Breath, rates.breath),
            (ActionChoice::Spell(SpellSchool::Priest), rates.priest),
            (ActionChoice::Spell(SpellSchool::Mage), rates.mage),
            (ActionChoice::Physical, rates.physical),
        ]
        .into_iter()
        .filter(|&(choice, rate)| rate > 0 && self.can_perform(actor, choice))
        .collect();

        let mut chain = Vec::with_capacity(candidates.len() + 1);
        for (index, &(_, rate)) in candidates.iter().enumerate() {
            let hit = rate >= 100 || self.ctx.rng.chance(rate as f64);
            if hit {
                chain.extend(candidates[index..].iter().map(|&(choice, _)| choice));
                break;
            }
        }
        chain.push(ActionChoice::Guard);
        chain
    }

    /// Whether `choice` is currently possible for `actor`.
    pub(crate) fn can_perform(&self, actor: ActorId, choice: ActionChoice) -> bool {
        let has_target = self.ctx.has_active(actor.side.opponent());
        match choice {
            ActionChoice::EnemySkill(skill) => self.enemy_skill_eligible(actor, skill),
            ActionChoice::Breath => {
                has_target && self.ctx.actor(actor).charges.can_spend(ChargeKey::Breath, 1)
            }
            ActionChoice::Spell(school) => self.choose_spell(actor, school).is_some(),
            ActionChoice::Physical => has_target,
            ActionChoice::Guard => true,
        }
    }

    /// First enemy skill whose roll succeeds; its use counter is bumped.
    fn select_enemy_skill(&mut self, actor: ActorId) -> Option<EnemySkillId> {
        let skills = self.ctx.actor(actor).enemy_skills.clone();
        for skill in skills {
            if !self.enemy_skill_eligible(actor, skill) {
                continue;
            }
            let Some(def) = self.env.enemy_skill(skill) else {
                continue;
            };
            if self.ctx.rng.chance(def.chance) {
                *self
                    .ctx
                    .actor_mut(actor)
                    .enemy_skill_uses
                    .entry(skill)
                    .or_insert(0) += 1;
                tracing::trace!(%actor, skill = skill.0, "enemy skill selected");
                return Some(skill);
            }
        }
        None
    }

    fn enemy_skill_eligible(&self, actor: ActorId, skill: EnemySkillId) -> bool {
        let Some(def) = self.env.enemy_skill(skill) else {
            return false;
        };
        if self.ctx.actor(actor).enemy_skill_uses(skill) >= def.uses_per_battle {
            return false;
        }
        match def.kind {
            EnemySkillKind::Heal { .. } => self.any_ally_damaged(actor),
            _ => self.ctx.has_active(actor.side.opponent()),
        }
    }

    /// Best usable spell of `school`.
    ///
    /// When an ally sits at or below the heal threshold the highest-tier heal
    /// wins; otherwise the highest-tier non-heal. Ties go to the lowest id.
    pub(crate) fn choose_spell(&self, actor: ActorId, school: SpellSchool) -> Option<SpellId> {
        let caster = self.ctx.actor(actor);
        let has_target = self.ctx.has_active(actor.side.opponent());
        let damaged = self.any_ally_damaged(actor);

        let usable: Vec<_> = caster
            .spells
            .iter()
            .filter_map(|&id| self.env.spell(id))
            .filter(|def| def.school == school)
            .filter(|def| caster.charges.can_spend(ChargeKey::Spell(def.id), def.charge_cost))
            .filter(|def| match def.kind {
                SpellKind::Heal { .. } => damaged,
                SpellKind::Buff { .. } => true,
                SpellKind::Attack { .. } | SpellKind::Status { .. } => {
                    def.targeting.is_supportive() || has_target
                }
            })
            .collect();

        let best = |heal: bool| {
            usable
                .iter()
                .filter(|def| def.is_heal() == heal)
                .min_by(|a, b| b.tier.cmp(&a.tier).then(a.id.cmp(&b.id)))
                .map(|def| def.id)
        };

        if self.ally_needs_healing(actor) {
            best(true).or_else(|| best(false))
        } else {
            best(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::config::BattleConfig;
    use crate::env::{BattleEnv, DefinitionTables, ScriptedRng, SpellDefinition, Targeting};
    use crate::state::{ActionRates, SpellSlot};

    fn spell_tables() -> DefinitionTables {
        DefinitionTables::new()
            .with_spell(SpellDefinition::new(
                SpellId(1),
                "spark",
                SpellSchool::Mage,
                SpellKind::Attack {
                    multiplier: 1.0,
                    hits: 1,
                },
                Targeting::Single,
            ))
            .with_spell(
                SpellDefinition::new(
                    SpellId(2),
                    "blaze",
                    SpellSchool::Mage,
                    SpellKind::Attack {
                        multiplier: 2.0,
                        hits: 1,
                    },
                    Targeting::All,
                )
                .with_tier(3),
            )
            .with_spell(SpellDefinition::new(
                SpellId(3),
                "mend",
                SpellSchool::Priest,
                SpellKind::Heal {
                    flat_percent: Some(30),
                    multiplier: 1.0,
                },
                Targeting::Single,
            ))
    }

    fn caster(hp: u32) -> crate::state::Combatant {
        let mut c = idle("caster", 100);
        c.hp = Some(hp);
        for id in 1..=3 {
            c.spells.push(SpellSlot {
                spell: SpellId(id),
                max_charges: 2,
                current: None,
            });
        }
        c
    }

    #[test]
    fn highest_tier_attack_spell_wins() {
        let tables = spell_tables();
        let engine = BattleEngine::new(
            BattleEnv::from_tables(&tables),
            BattleConfig::default(),
            &[caster(100)],
            &[idle("e", 10)],
            ScriptedRng::always_low(),
        )
        .unwrap();
        let me = ActorId::player(0);
        assert_eq!(engine.choose_spell(me, SpellSchool::Mage), Some(SpellId(2)));
        // nobody is hurt, so the priest school has nothing to cast
        assert_eq!(engine.choose_spell(me, SpellSchool::Priest), None);
    }

    #[test]
    fn wounded_ally_prefers_heal() {
        let tables = spell_tables();
        let engine = BattleEngine::new(
            BattleEnv::from_tables(&tables),
            BattleConfig::default(),
            &[caster(40)],
            &[idle("e", 10)],
            ScriptedRng::always_low(),
        )
        .unwrap();
        assert_eq!(
            engine.choose_spell(ActorId::player(0), SpellSchool::Priest),
            Some(SpellId(3))
        );
    }

    #[test]
    fn lottery_chain_starts_at_first_success() {
        let tables = spell_tables();
        let mut player = caster(100);
        player.rates = ActionRates {
            breath: 0,
            priest: 50,
            mage: 50,
            physical: 100,
        };
        let mut engine = BattleEngine::new(
            BattleEnv::from_tables(&tables),
            BattleConfig::default(),
            &[player],
            &[idle("e", 10)],
            ScriptedRng::always_high(),
        )
        .unwrap();
        // priest is ineligible, mage rolls high and fails, physical auto-hits
        assert_eq!(
            engine.choose_actions(ActorId::player(0)),
            vec![ActionChoice::Physical, ActionChoice::Guard]
        );

        let mut engine = BattleEngine::new(
            BattleEnv::from_tables(&tables),
            BattleConfig::default(),
            &[caster(100)],
            &[idle("e", 10)],
            ScriptedRng::always_low(),
        )
        .unwrap();
        // all rates zero: guard only
        assert_eq!(
            engine.choose_actions(ActorId::player(0)),
            vec![ActionChoice::Guard]
        );
    }

    #[test]
    fn fallback_chain_keeps_later_categories() {
        let tables = spell_tables();
        let mut player = caster(100);
        player.rates = ActionRates {
            breath: 0,
            priest: 0,
            mage: 60,
            physical: 40,
        };
        let mut engine = BattleEngine::new(
            BattleEnv::from_tables(&tables),
            BattleConfig::default(),
            &[player],
            &[idle("e", 10)],
            ScriptedRng::always_low(),
        )
        .unwrap();
        assert_eq!(
            engine.choose_actions(ActorId::player(0)),
            vec![
                ActionChoice::Spell(SpellSchool::Mage),
                ActionChoice::Physical,
                ActionChoice::Guard
            ]
        );
    }
}
