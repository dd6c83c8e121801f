use std::collections::BTreeMap;

use super::SpellId;

/// Resource an action draws on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChargeKey {
    Breath,
    Spell(SpellId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Charge {
    pub current: u8,
    pub max: u8,
}

/// Per-ability charge counters, each with its own cap.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionCharges {
    breath: Option<Charge>,
    spells: BTreeMap<SpellId, Charge>,
}

impl ActionCharges {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, key: ChargeKey) -> Option<&Charge> {
        match key {
            ChargeKey::Breath => self.breath.as_ref(),
            ChargeKey::Spell(id) => self.spells.get(&id),
        }
    }

    fn slot_mut(&mut self, key: ChargeKey) -> Option<&mut Charge> {
        match key {
            ChargeKey::Breath => self.breath.as_mut(),
            ChargeKey::Spell(id) => self.spells.get_mut(&id),
        }
    }

    /// Registers a counter. `current` is clamped to `max`.
    pub fn insert(&mut self, key: ChargeKey, current: u8, max: u8) {
        let charge = Charge {
            current: current.min(max),
            max,
        };
        match key {
            ChargeKey::Breath => self.breath = Some(charge),
            ChargeKey::Spell(id) => {
                self.spells.insert(id, charge);
            }
        }
    }

    pub fn get(&self, key: ChargeKey) -> Option<Charge> {
        self.slot(key).copied()
    }

    pub fn current(&self, key: ChargeKey) -> u8 {
        self.get(key).map_or(0, |c| c.current)
    }

    pub fn can_spend(&self, key: ChargeKey, cost: u8) -> bool {
        self.current(key) >= cost
    }

    /// Spends `cost` charges. Never goes negative; returns `false` and leaves
    /// the counter untouched when there are not enough.
    pub fn spend(&mut self, key: ChargeKey, cost: u8) -> bool {
        match self.slot_mut(key) {
            Some(charge) if charge.current >= cost => {
                charge.current -= cost;
                true
            }
            _ => false,
        }
    }

    /// Restores up to `amount` charges. Returns how many were actually added.
    pub fn restore(&mut self, key: ChargeKey, amount: u8) -> u8 {
        match self.slot_mut(key) {
            Some(charge) => {
                let gained = amount.min(charge.max - charge.current);
                charge.current += gained;
                gained
            }
            None => 0,
        }
    }

    /// Spell counters in id order.
    pub fn spells(&self) -> impl Iterator<Item = (SpellId, Charge)> + '_ {
        self.spells.iter().map(|(id, charge)| (*id, *charge))
    }

    /// Spell counters that are below their cap, in id order.
    pub fn depleted_spells(&self) -> Vec<SpellId> {
        self.spells()
            .filter(|(_, c)| c.current < c.max)
            .map(|(id, _)| id)
            .collect()
    }
}

/// Damage channel; selects barrier pools and profile multipliers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamageType {
    Physical,
    Magical,
    Breath,
}

/// Which pool absorbed a hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BarrierHit {
    pub damage_type: DamageType,
    /// True when a guard-only pool was used.
    pub guard: bool,
}

/// Barrier charges by damage type. Guard pools are usable only while guarding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BarrierPools {
    pub physical: u8,
    pub magical: u8,
    pub breath: u8,
    pub guard_physical: u8,
    pub guard_magical: u8,
    pub guard_breath: u8,
}

impl BarrierPools {
    fn pool_mut(&mut self, damage_type: DamageType, guard: bool) -> &mut u8 {
        match (damage_type, guard) {
            (DamageType::Physical, false) => &mut self.physical,
            (DamageType::Magical, false) => &mut self.magical,
            (DamageType::Breath, false) => &mut self.breath,
            (DamageType::Physical, true) => &mut self.guard_physical,
            (DamageType::Magical, true) => &mut self.guard_magical,
            (DamageType::Breath, true) => &mut self.guard_breath,
        }
    }

    /// Adds charges to one pool, saturating at the pool cap.
    pub fn grant(&mut self, damage_type: DamageType, guard: bool, charges: u8) {
        let pool = self.pool_mut(damage_type, guard);
        *pool = pool.saturating_add(charges);
    }

    /// Charges left in the regular pool for `damage_type`.
    pub fn remaining(&self, damage_type: DamageType) -> u8 {
        match damage_type {
            DamageType::Physical => self.physical,
            DamageType::Magical => self.magical,
            DamageType::Breath => self.breath,
        }
    }

    /// Consumes one charge for an incoming hit, guard pool first while guarding.
    pub fn consume(&mut self, damage_type: DamageType, guarding: bool) -> Option<BarrierHit> {
        let order: &[bool] = if guarding { &[true, false] } else { &[false] };
        for &guard in order {
            let pool = self.pool_mut(damage_type, guard);
            if *pool > 0 {
                *pool -= 1;
                return Some(BarrierHit { damage_type, guard });
            }
        }
        None
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charges_never_go_negative() {
        let mut charges = ActionCharges::new();
        charges.insert(ChargeKey::Breath, 1, 2);
        assert!(charges.spend(ChargeKey::Breath, 1));
        assert!(!charges.spend(ChargeKey::Breath, 1));
        assert_eq!(charges.current(ChargeKey::Breath), 0);
        assert_eq!(charges.restore(ChargeKey::Breath, 5), 2);
        assert_eq!(charges.current(ChargeKey::Breath), 2);
    }

    #[test]
    fn unknown_counter_is_empty() {
        let mut charges = ActionCharges::new();
        assert!(!charges.can_spend(ChargeKey::Spell(SpellId(3)), 1));
        assert_eq!(charges.restore(ChargeKey::Spell(SpellId(3)), 1), 0);
    }

    #[test]
    fn guard_pool_used_first_while_guarding() {
        let mut barriers = BarrierPools {
            physical: 1,
            guard_physical: 1,
            ..Default::default()
        };
        assert_eq!(
            barriers.consume(DamageType::Physical, true),
            Some(BarrierHit {
                damage_type: DamageType::Physical,
                guard: true
            })
        );
        assert_eq!(
            barriers.consume(DamageType::Physical, true).map(|h| h.guard),
            Some(false)
        );
        assert_eq!(barriers.consume(DamageType::Physical, true), None);
    }

    #[test]
    fn guard_pool_unused_when_not_guarding() {
        let mut barriers = BarrierPools {
            guard_magical: 2,
            ..Default::default()
        };
        assert_eq!(barriers.consume(DamageType::Magical, false), None);
        assert_eq!(barriers.guard_magical, 2);
    }
}
