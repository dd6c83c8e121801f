use crate::env::{RandomSource, Targeting};
use crate::state::ActorId;

use super::BattleEngine;

impl<R: RandomSource> BattleEngine<'_, R> {
    /// A uniformly chosen active opponent of `actor`.
    pub(crate) fn random_opponent(&mut self, actor: ActorId) -> Option<ActorId> {
        let candidates = self.ctx.active(actor.side.opponent());
        if candidates.is_empty() {
            return None;
        }
        let pick = self.ctx.rng.index(candidates.len());
        Some(candidates[pick])
    }

    /// Targets of an offensive ability.
    ///
    /// `preferred` is honored for single-target modes while it is still an
    /// active opponent.
    pub(crate) fn offensive_targets(
        &mut self,
        actor: ActorId,
        targeting: Targeting,
        preferred: Option<ActorId>,
    ) -> Vec<ActorId> {
        match targeting {
            Targeting::Single | Targeting::Random => {
                let preferred = preferred.filter(|&t| {
                    !t.is_ally_of(actor) && self.ctx.actor(t).is_active()
                });
                preferred
                    .or_else(|| self.random_opponent(actor))
                    .into_iter()
                    .collect()
            }
            Targeting::All => self.ctx.active(actor.side.opponent()),
            Targeting::SelfOnly => vec![actor],
            Targeting::AllAllies => self.ctx.active(actor.side),
        }
    }

    /// Targets of a heal or buff.
    ///
    /// Single-target support picks the most wounded active ally, ties by
    /// roster index.
    pub(crate) fn support_targets(&mut self, actor: ActorId, targeting: Targeting) -> Vec<ActorId> {
        match targeting {
            Targeting::SelfOnly => vec![actor],
            Targeting::All | Targeting::AllAllies => self.ctx.active(actor.side),
            Targeting::Single => self.most_wounded_ally(actor).into_iter().collect(),
            Targeting::Random => {
                let allies = self.ctx.active(actor.side);
                if allies.is_empty() {
                    return Vec::new();
                }
                let pick = self.ctx.rng.index(allies.len());
                vec![allies[pick]]
            }
        }
    }

    pub(crate) fn most_wounded_ally(&self, actor: ActorId) -> Option<ActorId> {
        self.ctx
            .active(actor.side)
            .into_iter()
            .min_by(|&a, &b| {
                let a = self.ctx.actor(a).hp_percent();
                let b = self.ctx.actor(b).hp_percent();
                a.total_cmp(&b)
            })
    }

    /// True when some active ally of `actor` (itself included) is at or
    /// below the heal threshold.
    pub(crate) fn ally_needs_healing(&self, actor: ActorId) -> bool {
        let threshold = self.config.combat.heal_threshold_percent as f64;
        self.ctx
            .active(actor.side)
            .into_iter()
            .any(|ally| self.ctx.actor(ally).hp_percent() <= threshold)
    }

    pub(crate) fn any_ally_damaged(&self, actor: ActorId) -> bool {
        self.ctx
            .active(actor.side)
            .into_iter()
            .any(|ally| self.ctx.actor(ally).missing_hp() > 0)
    }

    /// Protection factor covering `defender`: the lowest factor among active
    /// allies in a strictly more forward row, 1.0 when nobody covers it.
    pub(crate) fn ally_protection(&self, defender: ActorId) -> f64 {
        let row = self.ctx.actor(defender).row;
        self.ctx
            .active_allies(defender)
            .into_iter()
            .map(|ally| self.ctx.actor(ally))
            .filter(|ally| ally.row < row)
            .map(|ally| ally.profile.ally_protection)
            .fold(1.0, f64::min)
    }
}
