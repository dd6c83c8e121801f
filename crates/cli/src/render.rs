//! Human-readable log rendering.

use battle_content::Encounter;
use battle_core::{ActionEntry, Actor, ActorId, BattleResult, Effect, Outcome, Side};
use console::style;

pub fn print_battle(encounter: &Encounter, seed: u64, result: &BattleResult, root: &str) {
    let title = if encounter.name.is_empty() {
        encounter.id.as_str()
    } else {
        encounter.name.as_str()
    };
    println!("{} {}", style("Encounter:").bold().cyan(), title);
    println!("{} {}", style("Seed:").bold().cyan(), seed);
    println!();

    for entry in result.log.entries() {
        println!("{}", entry_line(result, entry));
        for effect in &entry.effects {
            println!("      {}", effect_line(result, effect));
        }
    }

    println!();
    let outcome = match result.outcome {
        Outcome::Victory => style(result.outcome.to_string()).bold().green(),
        Outcome::Defeat => style(result.outcome.to_string()).bold().red(),
        Outcome::Retreat => style(result.outcome.to_string()).bold().yellow(),
    };
    println!(
        "{} {} after {} turns",
        style("Outcome:").bold().cyan(),
        outcome,
        result.turns
    );
    print_roster("Players", &result.players);
    print_roster("Enemies", &result.enemies);
    println!("{} {}", style("Log root:").bold().cyan(), root);
}

fn print_roster(label: &str, roster: &[Actor]) {
    println!("{}", style(label).bold().cyan());
    for actor in roster {
        let state = if actor.withdrawn {
            " (withdrawn)"
        } else if actor.hp == 0 {
            " (defeated)"
        } else {
            ""
        };
        println!(
            "  {:<4} {:<16} {:>5}/{:<5}{}",
            actor.id.to_string(),
            actor.display_id,
            actor.hp,
            actor.max_hp(),
            state
        );
    }
}

fn name(result: &BattleResult, id: ActorId) -> String {
    let roster = match id.side {
        Side::Players => &result.players,
        Side::Enemies => &result.enemies,
    };
    roster
        .get(id.index as usize)
        .map_or_else(|| id.to_string(), |actor| actor.display_id.clone())
}

fn entry_line(result: &BattleResult, entry: &ActionEntry) -> String {
    let mut line = format!("T{:<3}", entry.turn);
    line.push_str(&"  ".repeat(entry.depth as usize));
    if let Some(actor) = entry.actor {
        line.push_str(&format!("{} ", style(name(result, actor)).bold()));
    }
    line.push_str(entry.kind.as_ref());
    if let Some(ability) = entry.ability {
        line.push_str(&format!(" #{}", ability));
    }
    line
}

fn effect_line(result: &BattleResult, effect: &Effect) -> String {
    let mut line = effect.kind.to_string();
    if let Some(target) = effect.target {
        line.push_str(&format!(" -> {}", name(result, target)));
    }
    if let Some(value) = effect.value {
        line.push_str(&format!(" {}", value));
    }
    if let Some(status) = effect.status {
        line.push_str(&format!(" [status {}]", status));
    }
    line
}
