//! Per-class decision behaviors.
//!
//! One `match` over the closed class set dispatches to a behavior
//! function; everything class-specific beyond control flow comes from
//! the profile table and the kernel set. Behaviors execute move, attack,
//! and heal verbs directly (re-sensing after each mutation) and submit
//! everything resource-consuming to the auction as candidates.

use crate::fields::GlobalFields;
use crate::kernels::KernelSet;
use crate::turn::{TimeMode, TurnEngine};
use rand::Rng;
use skirm_core::{
    Action, AgentClass, AgentId, AgentState, Cell, GameEngine, Side, WorldSnapshot,
};
use skirm_field::{CacheKey, Field, FieldKind};
use skirm_path::Route;

/// Decide for one agent. Returns whether anything was committed.
pub(crate) fn decide<E: GameEngine>(
    eng: &mut TurnEngine,
    game: &mut E,
    snap: &WorldSnapshot,
    id: AgentId,
    mode: TimeMode,
) -> bool {
    // Stale handle: the agent died or vanished earlier this turn.
    let Some(agent) = game.agent(id) else {
        return false;
    };
    if mode == TimeMode::Minimal && !agent.class.is_structure() {
        // Out of time: structures still queue their cheap candidates,
        // units stand down for the rest of the turn.
        return false;
    }
    match agent.class {
        AgentClass::Worker => worker(eng, game, snap, &agent, mode),
        AgentClass::Knight | AgentClass::Ranger | AgentClass::Mage => {
            combat(eng, game, snap, &agent, mode)
        }
        AgentClass::Healer => healer(eng, game, snap, &agent, mode),
        AgentClass::Factory => factory(eng, game, snap, &agent, mode),
        AgentClass::Transport => transport(eng, game, snap, &agent, mode),
    }
}

/// The coarse per-agent flag that may influence cached fields. Combat
/// classes start looking for healers below 80% health; everyone else at
/// any missing health.
pub(crate) fn damaged_for(agent: &AgentState) -> bool {
    if agent.class.is_combat() {
        agent.health_fraction() < 0.8
    } else {
        agent.health < agent.max_health
    }
}

fn occupied(snap: &WorldSnapshot, cell: Cell) -> bool {
    snap.agents.iter().any(|a| a.pos == Some(cell))
}

// ── Shared field builders (cached per class and damaged flag) ───

fn combat_target(
    fields: &GlobalFields,
    kernels: &KernelSet,
    snap: &WorldSnapshot,
    enemy_origins: &[Cell],
    class: AgentClass,
    damaged: bool,
) -> Field {
    // A faint pull toward enemies everywhere, then hard attack rings.
    let mut target = fields.enemy_nearby.clone() * 0.0001;
    if let Some(attack) = kernels.attack(class) {
        for enemy in snap.side(Side::Enemy) {
            if let Some(pos) = enemy.pos {
                target.stamp_max(attack, pos, 1.0);
            }
        }
    }
    // Even with no enemy in sight, their origins are worth marching on.
    for &origin in enemy_origins {
        if target.in_bounds(origin) {
            let v = target.get(origin);
            target.set(origin, v.max(0.01));
        }
    }
    if damaged {
        let factor = if class == AgentClass::Mage { 0.1 } else { 10.0 };
        for ally in snap.side(Side::Friendly) {
            let Some(pos) = ally.pos else { continue };
            match ally.class {
                AgentClass::Healer => target.stamp_add(&kernels.heal_reach, pos, factor),
                AgentClass::Factory => *target.get_mut(pos) += 0.1,
                _ => {}
            }
        }
    }
    // Never path onto our own structures.
    for ally in snap.side(Side::Friendly) {
        if ally.class.is_structure() {
            if let Some(pos) = ally.pos {
                target.set(pos, 0.0);
            }
        }
    }
    target
}

fn healer_target(fields: &GlobalFields, kernels: &KernelSet, snap: &WorldSnapshot) -> Field {
    let mut target = fields.friendly_presence.clone() * 0.05;
    for ally in snap.side(Side::Friendly) {
        let Some(pos) = ally.pos else { continue };
        if !ally.class.is_structure() && ally.health < ally.max_health {
            target.stamp_add(&kernels.heal_reach, pos, 2.0 - ally.health_fraction());
        }
        if ally.class.is_combat() {
            // Hold the band behind the front line.
            target.stamp_add(&kernels.support_ring, pos, 0.2);
        }
    }
    target
}

fn worker_target(
    fields: &GlobalFields,
    kernels: &KernelSet,
    snap: &WorldSnapshot,
    damaged: bool,
) -> Field {
    let mut target = fields.ore_fuzzy.clone();
    target += &fields.damaged_structure;
    target -= &fields.enemy_nearby;
    target += 0.01;
    target -= &(fields.structure_proximity.clone() * 0.01);
    if damaged {
        for ally in snap.side(Side::Friendly) {
            if ally.class == AgentClass::Healer {
                if let Some(pos) = ally.pos {
                    target.stamp_add(&kernels.heal_reach, pos, 10.0);
                }
            }
        }
    }
    // Positive offsets keep the divisors off zero.
    target = target / &(fields.hazard.clone() + 0.1);
    target
}

fn target_field(
    fields: &GlobalFields,
    kernels: &KernelSet,
    snap: &WorldSnapshot,
    enemy_origins: &[Cell],
    class: AgentClass,
    damaged: bool,
) -> Field {
    match class {
        AgentClass::Worker => worker_target(fields, kernels, snap, damaged),
        AgentClass::Healer => healer_target(fields, kernels, snap),
        _ => combat_target(fields, kernels, snap, enemy_origins, class, damaged),
    }
}

fn cost_field(fields: &GlobalFields, class: AgentClass) -> Field {
    match class {
        AgentClass::Worker => {
            // Ore discounts terrain so workers drift through deposits.
            let mut cost = fields.passable.clone() * 50.0;
            cost = cost / &(fields.ore_fuzzy.clone() + 50.0);
            cost += &fields.enemy_nearby;
            cost += &fields.enemy_influence;
            cost += &fields.worker_proximity;
            cost += &fields.structure_proximity;
            cost += &(fields.hazard.clone() * 50.0);
            cost
        }
        _ => {
            let mut cost = fields.passable.clone();
            cost += &(fields.enemy_influence.clone() * 2.0);
            cost / &(fields.friendly_presence.clone() + 1.0)
        }
    }
}

// ── Movement ────────────────────────────────────────────────────

/// Compute the value-search route for `agent` from `from`, using the
/// cached per-class fields plus per-agent adjustments that must never
/// leak into the cache (own-cell cost, boarding attractors, occupied
/// neighbours when structures are disallowed).
pub(crate) fn plan_route(
    eng: &mut TurnEngine,
    snap: &WorldSnapshot,
    agent: &AgentState,
    from: Cell,
    allow_structures: bool,
) -> Route {
    let class = agent.class;
    let damaged = damaged_for(agent);
    let TurnEngine {
        cache,
        fields,
        kernels,
        enemy_origins,
        boarding,
        pathfinder,
        metrics,
        ..
    } = eng;
    let fields: &GlobalFields = fields;
    let kernels: &KernelSet = kernels;
    let enemy_origins: &[Cell] = enemy_origins;

    let mut target = cache
        .get_or_compute(
            CacheKey {
                kind: FieldKind::Target,
                class,
                damaged,
            },
            || target_field(fields, kernels, snap, enemy_origins, class, damaged),
        )
        .clone();
    let mut costs = cache
        .get_or_compute(
            CacheKey {
                kind: FieldKind::Cost,
                class,
                damaged: false,
            },
            || cost_field(fields, class),
        )
        .clone();

    if let Some(tid) = boarding.get(&agent.id) {
        if let Some(transport) = snap.agent(*tid) {
            if let Some(tpos) = transport.pos {
                *target.get_mut(tpos) += 100.0;
            }
        }
    }

    if allow_structures {
        costs.set(from, 1.0);
    } else {
        costs.set(from, f64::INFINITY);
        for nb in from.neighbours() {
            if costs.in_bounds(nb) && occupied(snap, nb) {
                costs.set(nb, f64::INFINITY);
            }
        }
    }

    let route = pathfinder.seek(from, &target, &costs);
    metrics.searches += 1;
    metrics.cells_expanded += pathfinder.expanded() as u64;
    route
}

/// Run the value search and commit the resulting step. Falls back to
/// boarding when the chosen step is a friendly structure's tile.
fn move_agent<E: GameEngine>(
    eng: &mut TurnEngine,
    game: &mut E,
    snap: &WorldSnapshot,
    id: AgentId,
) -> bool {
    let Some(agent) = game.agent(id) else {
        return false;
    };
    let Some(from) = agent.pos else {
        return false;
    };
    if !agent.move_ready {
        return false;
    }

    let route = plan_route(eng, snap, &agent, from, true);
    let step = route.next_step();
    if step == from {
        return false;
    }

    if game.execute(&Action::Move {
        agent: id,
        to: step,
    }) {
        eng.fields.mark_move(from, step);
        eng.metrics.moves += 1;
        return true;
    }

    // The step may point into a friendly structure: enter it instead.
    let garrison_host = snap.agents.iter().find(|a| {
        a.side == Side::Friendly && a.class.is_structure() && a.built && a.pos == Some(step)
    });
    if let Some(host) = garrison_host {
        if game.execute(&Action::Board {
            agent: id,
            transport: host.id,
        }) {
            // The boarder's tile frees up; the structure tile stays blocked.
            eng.fields.passable.set(from, 1.0);
            return true;
        }
    }
    false
}

// ── Attacks and heals ───────────────────────────────────────────

/// Pick an attack target by squared strategic weight with reservoir
/// sampling, so equal targets share the load without systematic bias.
fn attack_reservoir<E: GameEngine>(
    eng: &mut TurnEngine,
    game: &mut E,
    snap: &WorldSnapshot,
    agent: &AgentState,
) -> bool {
    if !agent.attack_ready {
        return false;
    }
    let Some(pos) = agent.pos else {
        return false;
    };
    let profile = *eng.config.profiles.get(agent.class);
    if profile.attack_range2 == 0 {
        return false;
    }
    let damaged = agent.health_fraction() < 0.8;

    let mut best: Option<AgentId> = None;
    let mut total_weight = 0.0;
    for target in snap.side(Side::Enemy) {
        let Some(tpos) = target.pos else { continue };
        if target.health == 0 {
            continue;
        }
        let d2 = pos.dist2(tpos);
        if d2 > profile.attack_range2 || d2 < profile.attack_min_range2 {
            continue;
        }
        let action = Action::Attack {
            agent: agent.id,
            target: target.id,
        };
        if !game.legal(&action) {
            continue;
        }
        let value = eng.config.profiles.target_value(target.class, damaged)
            / target.health_fraction();
        let weight = value * value;
        total_weight += weight;
        if eng.rng.random::<f64>() * total_weight <= weight {
            best = Some(target.id);
        }
    }

    if let Some(target) = best {
        if game.execute(&Action::Attack {
            agent: agent.id,
            target,
        }) {
            eng.metrics.strikes += 1;
            return true;
        }
    }
    false
}

/// Splash targeting: accumulate the 3×3 hit value around every unit in
/// range (friendlies count negative) and strike the cell that nets the
/// most.
fn attack_splash<E: GameEngine>(
    eng: &mut TurnEngine,
    game: &mut E,
    snap: &WorldSnapshot,
    agent: &AgentState,
) -> bool {
    if !agent.attack_ready {
        return false;
    }
    let Some(pos) = agent.pos else {
        return false;
    };
    let profile = *eng.config.profiles.get(agent.class);
    let damaged = agent.health_fraction() < 0.8;
    let w = eng.fields.passable.width();
    let h = eng.fields.passable.height();
    let mut hit = Field::new(w, h).expect("map dims are valid");

    for unit in &snap.agents {
        let Some(upos) = unit.pos else { continue };
        if unit.health == 0 || unit.id == agent.id {
            continue;
        }
        let mut value = eng.config.profiles.target_value(unit.class, damaged)
            / (unit.health_fraction() + 2.0);
        if unit.side == Side::Friendly {
            value = -value;
        }
        for dy in -1..=1 {
            for dx in -1..=1 {
                let cell = upos.offset(dx, dy);
                if hit.in_bounds(cell) {
                    *hit.get_mut(cell) += value;
                }
            }
        }
    }

    let mut best: Option<AgentId> = None;
    let mut best_score = 0.0;
    for target in snap.side(Side::Enemy) {
        let Some(tpos) = target.pos else { continue };
        if target.health == 0 {
            continue;
        }
        if pos.dist2(tpos) > profile.attack_range2 {
            continue;
        }
        let action = Action::Attack {
            agent: agent.id,
            target: target.id,
        };
        if !game.legal(&action) {
            continue;
        }
        let score = hit.get(tpos);
        if score > best_score {
            best_score = score;
            best = Some(target.id);
        }
    }

    if let Some(target) = best {
        if game.execute(&Action::Attack {
            agent: agent.id,
            target,
        }) {
            eng.metrics.strikes += 1;
            return true;
        }
    }
    false
}

pub(crate) fn attack_with<E: GameEngine>(
    eng: &mut TurnEngine,
    game: &mut E,
    snap: &WorldSnapshot,
    agent: &AgentState,
) -> bool {
    if agent.class == AgentClass::Mage {
        attack_splash(eng, game, snap, agent)
    } else {
        attack_reservoir(eng, game, snap, agent)
    }
}

fn heal_best<E: GameEngine>(
    eng: &mut TurnEngine,
    game: &mut E,
    snap: &WorldSnapshot,
    agent: &AgentState,
) -> bool {
    if !agent.attack_ready {
        return false;
    }
    let Some(pos) = agent.pos else {
        return false;
    };
    let range2 = eng.config.profiles.get(AgentClass::Healer).attack_range2;

    let mut best: Option<AgentId> = None;
    let mut most_missing = 0.0;
    for ally in snap.side(Side::Friendly) {
        let Some(apos) = ally.pos else { continue };
        if ally.class.is_structure() || ally.health >= ally.max_health || ally.id == agent.id {
            continue;
        }
        if pos.dist2(apos) > range2 {
            continue;
        }
        let action = Action::Heal {
            agent: agent.id,
            target: ally.id,
        };
        if !game.legal(&action) {
            continue;
        }
        let missing = 1.0 - ally.health_fraction();
        if missing > most_missing {
            most_missing = missing;
            best = Some(ally.id);
        }
    }

    if let Some(target) = best {
        if game.execute(&Action::Heal {
            agent: agent.id,
            target,
        }) {
            eng.metrics.strikes += 1;
            return true;
        }
    }
    false
}

// ── Class behaviors ─────────────────────────────────────────────

fn combat<E: GameEngine>(
    eng: &mut TurnEngine,
    game: &mut E,
    snap: &WorldSnapshot,
    agent: &AgentState,
    mode: TimeMode,
) -> bool {
    if agent.pos.is_none() {
        return false;
    }
    let mut acted = false;

    // Long-range strike when nothing is close enough to shoot back.
    if agent.class == AgentClass::Ranger && agent.ability_ready && mode == TimeMode::Full {
        if let Some(pos) = agent.pos {
            if eng.fields.enemy_nearby.get(pos) == 0.0 {
                acted |= ranger_strike(eng, game, agent.id);
            }
        }
    }

    // Attack, then move, then attack again from the new cell.
    acted |= attack_with(eng, game, snap, agent);
    if mode == TimeMode::Full {
        acted |= move_agent(eng, game, snap, agent.id);
    }
    if let Some(fresh) = game.agent(agent.id) {
        acted |= attack_with(eng, game, snap, &fresh);
    }
    acted
}

/// Sample a strike cell from the enemy position field, weighted by
/// presence mass.
fn ranger_strike<E: GameEngine>(eng: &mut TurnEngine, game: &mut E, id: AgentId) -> bool {
    let total = eng.fields.enemy_position.sum();
    if total <= 0.0 {
        return false;
    }
    let mut r = eng.rng.random::<f64>() * total;
    for i in 0..eng.fields.enemy_position.len() {
        let cell = eng.fields.enemy_position.cell_at(i);
        r -= eng.fields.enemy_position.get(cell);
        if r < 0.0 {
            let action = Action::Strike { agent: id, at: cell };
            if game.legal(&action) && game.execute(&action) {
                eng.metrics.strikes += 1;
                return true;
            }
            return false;
        }
    }
    false
}

fn healer<E: GameEngine>(
    eng: &mut TurnEngine,
    game: &mut E,
    snap: &WorldSnapshot,
    agent: &AgentState,
    mode: TimeMode,
) -> bool {
    if agent.pos.is_none() {
        return false;
    }
    let mut acted = heal_best(eng, game, snap, agent);
    if mode == TimeMode::Full {
        acted |= move_agent(eng, game, snap, agent.id);
    }
    if let Some(fresh) = game.agent(agent.id) {
        acted |= heal_best(eng, game, snap, &fresh);
    }
    acted
}

fn worker<E: GameEngine>(
    eng: &mut TurnEngine,
    game: &mut E,
    snap: &WorldSnapshot,
    agent: &AgentState,
    mode: TimeMode,
) -> bool {
    if agent.pos.is_none() {
        return false;
    }
    let mut acted = false;
    if mode == TimeMode::Full {
        acted |= move_agent(eng, game, snap, agent.id);
    }
    // The move may have put us inside a garrison.
    let Some(agent) = game.agent(agent.id) else {
        return acted;
    };
    let Some(pos) = agent.pos else {
        return acted;
    };
    let id = agent.id;

    if agent.attack_ready {
        // Build and repair adjacent structures.
        for site in snap.side(Side::Friendly) {
            let Some(spos) = site.pos else { continue };
            if !site.class.is_structure() || pos.chebyshev(spos) > 1 {
                continue;
            }
            if !site.built {
                let score = site.health_fraction();
                eng.auction.submit(
                    score,
                    0,
                    1,
                    Action::Build { agent: id, site: site.id },
                    &mut eng.rng,
                );
            } else if site.health < site.max_health {
                let score = 2.0 - site.health_fraction();
                eng.auction.submit(
                    score,
                    0,
                    1,
                    Action::Repair { agent: id, site: site.id },
                    &mut eng.rng,
                );
            }
        }

        // Harvest the richest adjacent deposit.
        let mut best_cell = pos;
        let mut best_ore = 0;
        for dy in -1..=1 {
            for dx in -1..=1 {
                let cell = pos.offset(dx, dy);
                let ore = snap.map.ore_at(cell);
                if ore > best_ore {
                    best_ore = ore;
                    best_cell = cell;
                }
            }
        }
        if best_ore > 0 {
            eng.auction.submit(
                1.0,
                0,
                0,
                Action::Harvest { agent: id, at: best_cell },
                &mut eng.rng,
            );
        }
    }

    if mode == TimeMode::Full {
        submit_blueprints(eng, snap, &agent, pos);
        submit_replicate(eng, snap, &agent, pos);
    }
    acted
}

fn submit_blueprints(eng: &mut TurnEngine, snap: &WorldSnapshot, agent: &AgentState, pos: Cell) {
    let factories = snap.count_of(AgentClass::Factory) as f64;
    let transports = snap.count_of(AgentClass::Transport) as f64;
    let workers = snap.count_of(AgentClass::Worker) as f64;
    let friendly_total = snap.side(Side::Friendly).count() as f64;
    let ore_left = eng.fields.ore.sum();
    let id = agent.id;

    for nb in pos.neighbours() {
        if !snap.map.passable_at(nb) || occupied(snap, nb) {
            continue;
        }

        // Factory placement.
        let mut score = if factories < 4.0 {
            2.3 - 0.4 * factories
        } else {
            5.0 / (5.0 + factories)
        };
        if factories >= 5.0 && factories * 800.0 > ore_left {
            score = 0.0;
        }
        score *= placement_score(eng, snap, nb, AgentClass::Factory);
        eng.auction.submit(
            score,
            eng.config.profiles.get(AgentClass::Factory).cost,
            2,
            Action::Blueprint {
                agent: id,
                class: AgentClass::Factory,
                at: nb,
            },
            &mut eng.rng,
        );

        // Transport placement: mostly driven by how hard the enemy is
        // to reach over land and how big the army has grown.
        let mut factor = 0.01;
        if snap.turn >= eng.config.departure_deadline {
            factor = 0.2;
        }
        if transports == 0.0 {
            factor += 0.5;
        }
        factor += match eng.connectivity {
            Some(0) => 0.2,
            Some(1) => 0.01,
            Some(2) => 0.002,
            _ => 0.0,
        };
        let mut tscore =
            factor * (friendly_total - workers * 0.9 - factories - 12.0 * transports);
        tscore -= eng.fields.ore.get(nb) * 0.001;
        tscore -= (eng.fields.structure_proximity.get(nb)
            + eng.fields.enemy_nearby.get(nb) * 0.01)
            * 0.001;
        tscore *= placement_score(eng, snap, nb, AgentClass::Transport);
        eng.auction.submit(
            tscore,
            eng.config.profiles.get(AgentClass::Transport).cost,
            2,
            Action::Blueprint {
                agent: id,
                class: AgentClass::Transport,
                at: nb,
            },
            &mut eng.rng,
        );
    }
}

/// Score a structure placement: free standing room around the site,
/// discounted by buried ore, sibling structures, and enemy pressure.
/// Lands in roughly `[0, 1]` for a sensible site.
fn placement_score(eng: &TurnEngine, snap: &WorldSnapshot, cell: Cell, class: AgentClass) -> f64 {
    let mut standing_room = 0.0;
    for nb in cell.neighbours() {
        if eng.fields.passable.in_bounds(nb) && eng.fields.passable.get(nb).is_finite() {
            standing_room += 0.4 / (0.4 + eng.fields.structure_proximity.get(nb));
        }
    }
    standing_room /= 8.0;

    let mut score = standing_room - eng.fields.ore.get(cell) / 50.0;

    let siblings = snap
        .side(Side::Friendly)
        .filter(|a| a.class.is_structure() && a.pos.map_or(false, |p| p.chebyshev(cell) <= 1))
        .count() as f64;
    if class == AgentClass::Transport {
        score /= siblings + 1.0;
    } else {
        score /= siblings * 0.3 + 1.0;
    }
    score / (eng.fields.enemy_nearby.get(cell) + 1.0)
}

fn submit_replicate(
    eng: &mut TurnEngine,
    snap: &WorldSnapshot,
    agent: &AgentState,
    pos: Cell,
) -> bool {
    if !agent.ability_ready {
        return false;
    }
    let workers = snap.count_of(AgentClass::Worker) as f64;
    let ore_per_worker = eng.fields.ore.sum() / workers.max(1.0);
    let mut score = ore_per_worker * 0.008 + 2.5 / (workers + 0.1);
    if workers > 100.0 || (ore_per_worker < 70.0 && workers >= 10.0) {
        score = -1.0;
    }
    // Only worth considering when it would clear the bar the last
    // auction set for spending.
    if score <= eng.cutoff_score - 0.1 {
        return false;
    }

    let route = plan_route(eng, snap, agent, pos, false);
    if route.is_hold() {
        return false;
    }
    let score = score + 0.001 * (1.1 + route.score()).ln();
    eng.auction.submit(
        score,
        eng.config.profiles.replicate_cost,
        2,
        Action::Replicate {
            agent: agent.id,
            to: route.next_step(),
        },
        &mut eng.rng,
    );
    true
}

fn factory<E: GameEngine>(
    eng: &mut TurnEngine,
    game: &mut E,
    snap: &WorldSnapshot,
    agent: &AgentState,
    mode: TimeMode,
) -> bool {
    if !agent.built || agent.pos.is_none() {
        return false;
    }
    let mut acted = false;

    // Unloading plans a route for the garrisoned unit; that is search
    // work, skipped under time pressure.
    if mode == TimeMode::Full && !agent.garrison.is_empty() {
        acted |= unload_front(eng, game, snap, agent);
    }

    let Some(agent) = game.agent(agent.id) else {
        return acted;
    };
    if agent.attack_ready {
        submit_production(eng, snap, agent.id);
    }
    acted
}

/// Production policy: a steady ranger line, healers scaled to the army,
/// a worker only to bootstrap a dead economy.
fn submit_production(eng: &mut TurnEngine, snap: &WorldSnapshot, id: AgentId) {
    let combat = snap
        .side(Side::Friendly)
        .filter(|a| a.class.is_combat())
        .count() as f64;
    let healers = snap.count_of(AgentClass::Healer) as f64;
    let workers = snap.count_of(AgentClass::Worker) as f64;

    let scores = [
        (AgentClass::Ranger, 2.0),
        (AgentClass::Knight, 1.0),
        (AgentClass::Mage, 0.8),
        (AgentClass::Healer, 0.3 + combat / (3.0 * (healers + 1.0))),
        (AgentClass::Worker, if workers == 0.0 { 3.0 } else { 0.0 }),
    ];
    for (class, score) in scores {
        eng.auction.submit(
            score,
            eng.config.profiles.get(class).cost,
            2,
            Action::Produce { agent: id, class },
            &mut eng.rng,
        );
    }
}

/// Release the front garrisoned unit toward its own preferred next
/// step, planned with that unit's cached fields from the structure's
/// cell.
fn unload_front<E: GameEngine>(
    eng: &mut TurnEngine,
    game: &mut E,
    snap: &WorldSnapshot,
    structure: &AgentState,
) -> bool {
    let Some(pos) = structure.pos else {
        return false;
    };
    let Some(front_id) = structure.garrison.first().copied() else {
        return false;
    };
    let Some(front) = game.agent(front_id) else {
        return false;
    };

    let route = plan_route(eng, snap, &front, pos, false);
    let mut step = route.next_step();
    if step == pos {
        // Nothing out there worth walking to; any open door will do.
        let fallback = pos.neighbours().into_iter().find(|&nb| {
            eng.fields.passable.in_bounds(nb)
                && snap.map.passable_at(nb)
                && !occupied(snap, nb)
        });
        match fallback {
            Some(nb) => step = nb,
            None => return false,
        }
    }
    if game.execute(&Action::Unload {
        agent: structure.id,
        to: step,
    }) {
        eng.fields.passable.set(step, skirm_path::BLOCKED);
        return true;
    }
    false
}

fn transport<E: GameEngine>(
    eng: &mut TurnEngine,
    game: &mut E,
    snap: &WorldSnapshot,
    agent: &AgentState,
    mode: TimeMode,
) -> bool {
    if !agent.built || agent.pos.is_none() || mode == TimeMode::Minimal {
        return false;
    }

    if !agent.ability_ready {
        // Already flown: deliver the garrison.
        if mode == TimeMode::Full && !agent.garrison.is_empty() {
            return unload_front(eng, game, snap, agent);
        }
        return false;
    }

    let full = agent.garrison.len() >= eng.config.transport_capacity;
    let deadline = snap.turn >= eng.config.departure_deadline;
    if agent.garrison.is_empty() || !(full || deadline) {
        return false;
    }

    let Some(dest) = best_landing_cell(eng, snap) else {
        return false;
    };
    let action = Action::Launch {
        agent: agent.id,
        to: dest,
    };
    if game.legal(&action) && game.execute(&action) {
        return true;
    }
    false
}

/// Deterministic scan for the best landing cell: rich in ore, clear of
/// enemies and of other imminent departures.
fn best_landing_cell(eng: &TurnEngine, snap: &WorldSnapshot) -> Option<Cell> {
    let mut best: Option<(Cell, f64)> = None;
    for i in 0..eng.fields.ore_fuzzy.len() {
        let cell = eng.fields.ore_fuzzy.cell_at(i);
        if !snap.map.passable_at(cell) || occupied(snap, cell) {
            continue;
        }
        let score = eng.fields.ore_fuzzy.get(cell)
            - eng.fields.enemy_nearby.get(cell) * 5.0
            - eng.fields.hazard.get(cell) * 10.0;
        match best {
            Some((_, s)) if score <= s => {}
            _ => best = Some((cell, score)),
        }
    }
    best.map(|(cell, _)| cell)
}
