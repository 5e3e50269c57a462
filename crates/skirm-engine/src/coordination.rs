//! Cross-agent coordination passes.
//!
//! These run after the per-agent decisions in every decision-loop
//! iteration and look across agents of one class: pairing support
//! abilities with attackers whose cooldowns are spent, and claiming
//! boarding candidates for waiting transports.

use crate::behavior;
use crate::turn::TurnEngine;
use skirm_core::{Action, AgentClass, AgentId, Cell, GameEngine, Side, WorldSnapshot};

/// Pair each ready healer with the closest in-range attacker that has
/// already spent its attack, boost it, and let it swing again
/// immediately — the move–ability–move chain.
pub(crate) fn support_pairing<E: GameEngine>(
    eng: &mut TurnEngine,
    game: &mut E,
    snap: &WorldSnapshot,
) -> bool {
    let mut acted = false;
    let healer_ids: Vec<AgentId> = snap
        .side(Side::Friendly)
        .filter(|a| a.class == AgentClass::Healer && a.ability_ready && a.pos.is_some())
        .map(|a| a.id)
        .collect();
    let range2 = eng.config.profiles.get(AgentClass::Healer).attack_range2;

    for hid in healer_ids {
        let Some(healer) = game.agent(hid) else {
            continue;
        };
        if !healer.ability_ready {
            continue;
        }
        let Some(hpos) = healer.pos else { continue };

        let mut pick: Option<AgentId> = None;
        let mut pick_d2 = i32::MAX;
        for ally in snap.side(Side::Friendly) {
            let Some(apos) = ally.pos else { continue };
            if !ally.class.is_combat() || ally.attack_ready {
                continue;
            }
            let d2 = hpos.dist2(apos);
            if d2 > range2 || d2 >= pick_d2 {
                continue;
            }
            let action = Action::Boost {
                agent: hid,
                target: ally.id,
            };
            if game.legal(&action) {
                pick = Some(ally.id);
                pick_d2 = d2;
            }
        }

        let Some(target) = pick else { continue };
        if game.execute(&Action::Boost {
            agent: hid,
            target,
        }) {
            acted = true;
            // The boosted attacker strikes again right away, from its
            // refreshed state.
            if let Some(attacker) = game.agent(target) {
                behavior::attack_with(eng, game, snap, &attacker);
            }
        }
    }
    acted
}

/// Claim boarding candidates for every waiting transport: nearest
/// eligible units by path distance, up to the free garrison slots.
/// Claimed agents' movement targets gain a strong attractor at their
/// transport for the rest of the turn.
pub(crate) fn assign_boarding(eng: &mut TurnEngine, snap: &WorldSnapshot) {
    // Drop claims whose ends no longer hold.
    eng.boarding.retain(|unit, transport| {
        let unit_alive = snap.agent(*unit).is_some_and(|a| a.pos.is_some());
        let waiting = snap
            .agent(*transport)
            .is_some_and(|t| t.built && t.ability_ready);
        unit_alive && waiting
    });

    let transports: Vec<(AgentId, Cell, usize)> = snap
        .side(Side::Friendly)
        .filter(|a| a.class == AgentClass::Transport && a.built && a.ability_ready)
        .filter_map(|a| a.pos.map(|p| (a.id, p, a.garrison.len())))
        .collect();

    for (tid, tpos, garrisoned) in transports {
        let claimed = eng.boarding.values().filter(|&&t| t == tid).count();
        let free = eng
            .config
            .transport_capacity
            .saturating_sub(garrisoned + claimed);
        if free == 0 {
            continue;
        }

        let mut costs = eng.fields.passable.clone();
        costs.set(tpos, 1.0);
        let distances = eng.pathfinder.distances(tpos, &costs);

        let mut candidates: Vec<(AgentId, f64)> = snap
            .side(Side::Friendly)
            .filter(|a| !a.class.is_structure() && !eng.boarding.contains_key(&a.id))
            .filter_map(|a| a.pos.map(|p| (a.id, distances.get(p))))
            .filter(|(_, d)| d.is_finite())
            .collect();
        candidates.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));

        for (id, _) in candidates.into_iter().take(free) {
            eng.boarding.insert(id, tid);
        }
    }
}
