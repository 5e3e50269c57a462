//! The in-memory mock game engine.

use skirm_core::{
    Action, AgentClass, AgentId, AgentState, Cell, GameEngine, MapSnapshot, Side, Turn,
    WorldSnapshot,
};
use std::collections::HashSet;

/// Damage per ordinary attack.
pub const ATTACK_DAMAGE: u32 = 30;
/// Health restored per heal.
pub const HEAL_AMOUNT: u32 = 30;
/// Damage of the long-range strike.
pub const STRIKE_DAMAGE: u32 = 40;
/// Ore collected per harvest.
pub const HARVEST_AMOUNT: u32 = 10;
/// Garrison slots per structure.
pub const GARRISON_CAPACITY: usize = 8;

fn max_health(class: AgentClass) -> u32 {
    match class {
        AgentClass::Worker => 100,
        AgentClass::Knight => 250,
        AgentClass::Ranger => 200,
        AgentClass::Mage => 80,
        AgentClass::Healer => 100,
        AgentClass::Factory => 300,
        AgentClass::Transport => 200,
    }
}

fn attack_range2(class: AgentClass) -> (i32, i32) {
    // (min, max) squared ranges; heal range doubles as Healer "attack".
    match class {
        AgentClass::Knight => (0, 2),
        AgentClass::Ranger => (10, 50),
        AgentClass::Mage => (0, 30),
        AgentClass::Healer => (0, 30),
        _ => (0, 0),
    }
}

fn production_cost(class: AgentClass) -> u32 {
    match class {
        AgentClass::Worker => 25,
        AgentClass::Factory => 100,
        AgentClass::Transport => 75,
        _ => 20,
    }
}

/// Scripted, deterministic [`GameEngine`] for tests.
///
/// Holds a full world state and applies the legality rules the decision
/// core relies on: adjacency for moves and unloads, squared ranges for
/// attacks and heals, cooldown flags consumed by acting, resource costs
/// charged on execution, and one blueprint per structure class per turn.
/// Every executed action is recorded for assertions.
pub struct MockEngine {
    turn: Turn,
    resources: u32,
    time_remaining_ms: u32,
    map: MapSnapshot,
    agents: Vec<AgentState>,
    next_id: u32,
    launched: HashSet<AgentId>,
    blueprinted_this_turn: HashSet<u8>,
    executed: Vec<Action>,
    replicate_cost: u32,
}

impl MockEngine {
    /// An open `width × height` world with no ore and no agents.
    pub fn new(width: u32, height: u32) -> Self {
        let n = (width * height) as usize;
        Self {
            turn: Turn(1),
            resources: 0,
            time_remaining_ms: 60_000,
            map: MapSnapshot {
                width,
                height,
                passable: vec![true; n],
                ore: vec![0; n],
            },
            agents: Vec::new(),
            next_id: 1,
            launched: HashSet::new(),
            blueprinted_this_turn: HashSet::new(),
            executed: Vec::new(),
            replicate_cost: 15,
        }
    }

    /// Make a cell impassable terrain.
    pub fn set_rock(&mut self, cell: Cell) {
        let i = self.map.idx(cell);
        self.map.passable[i] = false;
    }

    /// Put ore on a cell.
    pub fn set_ore(&mut self, cell: Cell, amount: u32) {
        let i = self.map.idx(cell);
        self.map.ore[i] = amount;
    }

    /// Set the shared resource pool.
    pub fn set_resources(&mut self, amount: u32) {
        self.resources = amount;
    }

    /// Set the reported remaining turn time.
    pub fn set_time_remaining(&mut self, ms: u32) {
        self.time_remaining_ms = ms;
    }

    /// Spawn a full-health agent and return its id.
    pub fn add_agent(&mut self, class: AgentClass, side: Side, cell: Cell) -> AgentId {
        let id = AgentId(self.next_id);
        self.next_id += 1;
        let hp = max_health(class);
        self.agents.push(AgentState {
            id,
            class,
            side,
            pos: Some(cell),
            health: hp,
            max_health: hp,
            attack_ready: true,
            move_ready: true,
            ability_ready: true,
            built: true,
            garrison: Vec::new(),
        });
        id
    }

    /// Spawn an unfinished structure blueprint at quarter health.
    pub fn add_blueprint(&mut self, class: AgentClass, side: Side, cell: Cell) -> AgentId {
        let id = self.add_agent(class, side, cell);
        let agent = self.agent_mut(id).expect("just spawned");
        agent.built = false;
        agent.health = agent.max_health / 4;
        id
    }

    /// Damage an agent directly (test setup).
    pub fn hurt(&mut self, id: AgentId, amount: u32) {
        if let Some(agent) = self.agent_mut(id) {
            agent.health = agent.health.saturating_sub(amount).max(1);
        }
    }

    /// All actions executed so far, in order.
    pub fn executed(&self) -> &[Action] {
        &self.executed
    }

    /// Number of living agents on one side.
    pub fn count(&self, side: Side) -> usize {
        self.agents.iter().filter(|a| a.side == side).count()
    }

    fn agent_ref(&self, id: AgentId) -> Option<&AgentState> {
        self.agents.iter().find(|a| a.id == id)
    }

    fn agent_mut(&mut self, id: AgentId) -> Option<&mut AgentState> {
        self.agents.iter_mut().find(|a| a.id == id)
    }

    fn occupied(&self, cell: Cell) -> bool {
        self.agents.iter().any(|a| a.pos == Some(cell))
    }

    fn open_for(&self, cell: Cell) -> bool {
        self.map.passable_at(cell) && !self.occupied(cell)
    }

    fn in_attack_range(&self, attacker: &AgentState, target: &AgentState) -> bool {
        let (Some(a), Some(t)) = (attacker.pos, target.pos) else {
            return false;
        };
        let (min2, max2) = attack_range2(attacker.class);
        let d2 = a.dist2(t);
        max2 > 0 && d2 <= max2 && d2 >= min2
    }

    fn remove_dead(&mut self, id: AgentId) {
        if self.agent_ref(id).is_some_and(|a| a.health == 0) {
            self.agents.retain(|a| a.id != id);
            for a in &mut self.agents {
                a.garrison.retain(|g| *g != id);
            }
        }
    }

    fn check(&self, action: &Action) -> bool {
        match *action {
            Action::Move { agent, to } => self.agent_ref(agent).is_some_and(|a| {
                a.move_ready
                    && a.pos.is_some_and(|p| p.is_adjacent(to))
                    && self.open_for(to)
            }),
            Action::Attack { agent, target } => {
                let (Some(a), Some(t)) = (self.agent_ref(agent), self.agent_ref(target)) else {
                    return false;
                };
                a.attack_ready && a.side != t.side && self.in_attack_range(a, t)
            }
            Action::Heal { agent, target } => {
                let (Some(a), Some(t)) = (self.agent_ref(agent), self.agent_ref(target)) else {
                    return false;
                };
                a.class == AgentClass::Healer
                    && a.attack_ready
                    && a.side == t.side
                    && t.health < t.max_health
                    && self.in_attack_range(a, t)
            }
            Action::Boost { agent, target } => {
                let (Some(a), Some(t)) = (self.agent_ref(agent), self.agent_ref(target)) else {
                    return false;
                };
                a.class == AgentClass::Healer
                    && a.ability_ready
                    && a.side == t.side
                    && t.class.is_combat()
                    && self.in_attack_range(a, t)
            }
            Action::Harvest { agent, at } => self.agent_ref(agent).is_some_and(|a| {
                a.class == AgentClass::Worker
                    && a.attack_ready
                    && a.pos.is_some_and(|p| p.chebyshev(at) <= 1)
                    && self.map.ore_at(at) > 0
            }),
            Action::Produce { agent, class } => self.agent_ref(agent).is_some_and(|a| {
                a.class == AgentClass::Factory
                    && a.built
                    && a.attack_ready
                    && !class.is_structure()
                    && a.garrison.len() < GARRISON_CAPACITY
                    && self.resources >= production_cost(class)
            }),
            Action::Blueprint { agent, class, at } => self.agent_ref(agent).is_some_and(|a| {
                a.class == AgentClass::Worker
                    && class.is_structure()
                    && !self.blueprinted_this_turn.contains(&(class.index() as u8))
                    && a.pos.is_some_and(|p| p.is_adjacent(at))
                    && self.open_for(at)
                    && self.resources >= production_cost(class)
            }),
            Action::Build { agent, site } => {
                let (Some(a), Some(s)) = (self.agent_ref(agent), self.agent_ref(site)) else {
                    return false;
                };
                a.class == AgentClass::Worker
                    && a.attack_ready
                    && !s.built
                    && a.pos.is_some_and(|p| s.pos.is_some_and(|sp| p.is_adjacent(sp)))
            }
            Action::Repair { agent, site } => {
                let (Some(a), Some(s)) = (self.agent_ref(agent), self.agent_ref(site)) else {
                    return false;
                };
                a.class == AgentClass::Worker
                    && a.attack_ready
                    && s.built
                    && s.health < s.max_health
                    && a.pos.is_some_and(|p| s.pos.is_some_and(|sp| p.is_adjacent(sp)))
            }
            Action::Replicate { agent, to } => self.agent_ref(agent).is_some_and(|a| {
                a.class == AgentClass::Worker
                    && a.ability_ready
                    && a.pos.is_some_and(|p| p.is_adjacent(to))
                    && self.open_for(to)
                    && self.resources >= self.replicate_cost
            }),
            Action::Board { agent, transport } => {
                let (Some(a), Some(t)) = (self.agent_ref(agent), self.agent_ref(transport)) else {
                    return false;
                };
                !a.class.is_structure()
                    && t.class.is_structure()
                    && t.built
                    && a.side == t.side
                    && t.garrison.len() < GARRISON_CAPACITY
                    && a.pos.is_some_and(|p| t.pos.is_some_and(|tp| p.is_adjacent(tp)))
            }
            Action::Unload { agent, to } => self.agent_ref(agent).is_some_and(|a| {
                a.class.is_structure()
                    && !a.garrison.is_empty()
                    && a.pos.is_some_and(|p| p.is_adjacent(to))
                    && self.open_for(to)
            }),
            Action::Launch { agent, to } => self.agent_ref(agent).is_some_and(|a| {
                a.class == AgentClass::Transport
                    && a.built
                    && a.ability_ready
                    && self.open_for(to)
            }),
            Action::Strike { agent, at } => self.agent_ref(agent).is_some_and(|a| {
                a.class == AgentClass::Ranger && a.ability_ready && self.map.in_bounds(at)
            }),
        }
    }

    fn apply(&mut self, action: &Action) {
        match *action {
            Action::Move { agent, to } => {
                let a = self.agent_mut(agent).expect("checked");
                a.pos = Some(to);
                a.move_ready = false;
            }
            Action::Attack { agent, target } => {
                let t = self.agent_mut(target).expect("checked");
                t.health = t.health.saturating_sub(ATTACK_DAMAGE);
                self.remove_dead(target);
                let a = self.agent_mut(agent).expect("checked");
                a.attack_ready = false;
            }
            Action::Heal { agent, target } => {
                let t = self.agent_mut(target).expect("checked");
                t.health = (t.health + HEAL_AMOUNT).min(t.max_health);
                let a = self.agent_mut(agent).expect("checked");
                a.attack_ready = false;
            }
            Action::Boost { agent, target } => {
                let t = self.agent_mut(target).expect("checked");
                t.attack_ready = true;
                t.move_ready = true;
                let a = self.agent_mut(agent).expect("checked");
                a.ability_ready = false;
            }
            Action::Harvest { agent, at } => {
                let i = self.map.idx(at);
                let taken = self.map.ore[i].min(HARVEST_AMOUNT);
                self.map.ore[i] -= taken;
                self.resources += taken;
                let a = self.agent_mut(agent).expect("checked");
                a.attack_ready = false;
            }
            Action::Produce { agent, class } => {
                self.resources -= production_cost(class);
                let id = AgentId(self.next_id);
                self.next_id += 1;
                let hp = max_health(class);
                self.agents.push(AgentState {
                    id,
                    class,
                    side: Side::Friendly,
                    pos: None,
                    health: hp,
                    max_health: hp,
                    attack_ready: true,
                    move_ready: true,
                    ability_ready: true,
                    built: true,
                    garrison: Vec::new(),
                });
                let factory = self.agent_mut(agent).expect("checked");
                factory.garrison.push(id);
                factory.attack_ready = false;
            }
            Action::Blueprint { agent, class, at } => {
                self.resources -= production_cost(class);
                self.blueprinted_this_turn.insert(class.index() as u8);
                let side = self.agent_ref(agent).expect("checked").side;
                self.add_blueprint(class, side, at);
            }
            Action::Build { agent, site } => {
                let s = self.agent_mut(site).expect("checked");
                s.health = (s.health + s.max_health / 4).min(s.max_health);
                if s.health == s.max_health {
                    s.built = true;
                }
                let a = self.agent_mut(agent).expect("checked");
                a.attack_ready = false;
            }
            Action::Repair { agent, site } => {
                let s = self.agent_mut(site).expect("checked");
                s.health = (s.health + HEAL_AMOUNT).min(s.max_health);
                let a = self.agent_mut(agent).expect("checked");
                a.attack_ready = false;
            }
            Action::Board { agent, transport } => {
                let a = self.agent_mut(agent).expect("checked");
                a.pos = None;
                let t = self.agent_mut(transport).expect("checked");
                t.garrison.push(agent);
            }
            Action::Unload { agent, to } => {
                let front = {
                    let t = self.agent_mut(agent).expect("checked");
                    t.garrison.remove(0)
                };
                if let Some(u) = self.agent_mut(front) {
                    u.pos = Some(to);
                    u.move_ready = false;
                }
            }
            Action::Launch { agent, to } => {
                let a = self.agent_mut(agent).expect("checked");
                a.pos = Some(to);
                a.ability_ready = false;
                self.launched.insert(agent);
            }
            Action::Strike { agent, at } => {
                let hit: Vec<AgentId> = self
                    .agents
                    .iter()
                    .filter(|u| u.pos == Some(at))
                    .map(|u| u.id)
                    .collect();
                for id in hit {
                    let u = self.agent_mut(id).expect("listed");
                    u.health = u.health.saturating_sub(STRIKE_DAMAGE);
                    self.remove_dead(id);
                }
                let a = self.agent_mut(agent).expect("checked");
                a.ability_ready = false;
            }
        }
    }
}

impl GameEngine for MockEngine {
    fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            turn: self.turn,
            resources: self.resources,
            map: self.map.clone(),
            agents: self.agents.clone(),
        }
    }

    fn agent(&self, id: AgentId) -> Option<AgentState> {
        self.agent_ref(id).cloned()
    }

    fn resources(&self) -> u32 {
        self.resources
    }

    fn time_remaining_ms(&self) -> u32 {
        self.time_remaining_ms
    }

    fn legal(&self, action: &Action) -> bool {
        self.check(action)
    }

    fn execute(&mut self, action: &Action) -> bool {
        if !self.check(action) {
            return false;
        }
        self.apply(action);
        self.executed.push(*action);
        true
    }

    fn end_turn(&mut self) {
        self.turn = Turn(self.turn.0 + 1);
        self.blueprinted_this_turn.clear();
        for agent in &mut self.agents {
            agent.attack_ready = true;
            agent.move_ready = true;
            agent.ability_ready = !self.launched.contains(&agent.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_rules() {
        let mut engine = MockEngine::new(5, 5);
        let id = engine.add_agent(AgentClass::Knight, Side::Friendly, Cell::new(2, 2));
        let diagonal = Action::Move {
            agent: id,
            to: Cell::new(3, 3),
        };
        assert!(engine.execute(&diagonal));
        // Movement cooldown spent.
        assert!(!engine.execute(&Action::Move {
            agent: id,
            to: Cell::new(3, 4),
        }));
        engine.end_turn();
        // Too far.
        assert!(!engine.execute(&Action::Move {
            agent: id,
            to: Cell::new(1, 1),
        }));
        assert!(engine.execute(&Action::Move {
            agent: id,
            to: Cell::new(2, 2),
        }));
    }

    #[test]
    fn attack_kills_and_id_goes_stale() {
        let mut engine = MockEngine::new(5, 5);
        let knight = engine.add_agent(AgentClass::Knight, Side::Friendly, Cell::new(2, 2));
        let victim = engine.add_agent(AgentClass::Mage, Side::Enemy, Cell::new(3, 3));
        engine.hurt(victim, 79); // 80 max → 1 health left

        assert!(engine.execute(&Action::Attack {
            agent: knight,
            target: victim,
        }));
        assert!(engine.agent(victim).is_none(), "dead id resolves to None");
        assert!(!engine.legal(&Action::Attack {
            agent: knight,
            target: victim,
        }));
    }

    #[test]
    fn ranger_dead_zone() {
        let mut engine = MockEngine::new(12, 12);
        let ranger = engine.add_agent(AgentClass::Ranger, Side::Friendly, Cell::new(0, 0));
        let near = engine.add_agent(AgentClass::Knight, Side::Enemy, Cell::new(1, 1));
        let far = engine.add_agent(AgentClass::Knight, Side::Enemy, Cell::new(5, 5));
        assert!(!engine.legal(&Action::Attack {
            agent: ranger,
            target: near,
        }));
        assert!(engine.legal(&Action::Attack {
            agent: ranger,
            target: far,
        }));
    }

    #[test]
    fn blueprint_once_per_class_per_turn() {
        let mut engine = MockEngine::new(8, 8);
        engine.set_resources(500);
        let w1 = engine.add_agent(AgentClass::Worker, Side::Friendly, Cell::new(2, 2));
        let w2 = engine.add_agent(AgentClass::Worker, Side::Friendly, Cell::new(5, 5));

        assert!(engine.execute(&Action::Blueprint {
            agent: w1,
            class: AgentClass::Factory,
            at: Cell::new(2, 3),
        }));
        assert!(!engine.execute(&Action::Blueprint {
            agent: w2,
            class: AgentClass::Factory,
            at: Cell::new(5, 6),
        }));
        engine.end_turn();
        assert!(engine.execute(&Action::Blueprint {
            agent: w2,
            class: AgentClass::Factory,
            at: Cell::new(5, 6),
        }));
    }

    #[test]
    fn garrison_cycle() {
        let mut engine = MockEngine::new(6, 6);
        engine.set_resources(100);
        let factory = engine.add_agent(AgentClass::Factory, Side::Friendly, Cell::new(3, 3));

        assert!(engine.execute(&Action::Produce {
            agent: factory,
            class: AgentClass::Knight,
        }));
        let knight = engine.snapshot().agents.last().unwrap().id;
        assert!(engine.agent(knight).unwrap().pos.is_none());

        assert!(engine.execute(&Action::Unload {
            agent: factory,
            to: Cell::new(3, 4),
        }));
        assert_eq!(engine.agent(knight).unwrap().pos, Some(Cell::new(3, 4)));
        assert!(engine.agent(factory).unwrap().garrison.is_empty());
    }

    #[test]
    fn launch_is_once_ever() {
        let mut engine = MockEngine::new(10, 10);
        let transport = engine.add_agent(AgentClass::Transport, Side::Friendly, Cell::new(1, 1));
        assert!(engine.execute(&Action::Launch {
            agent: transport,
            to: Cell::new(8, 8),
        }));
        assert_eq!(engine.agent(transport).unwrap().pos, Some(Cell::new(8, 8)));
        engine.end_turn();
        assert!(
            !engine.agent(transport).unwrap().ability_ready,
            "a flown transport never readies its launch again"
        );
    }

    #[test]
    fn harvest_moves_ore_into_pool() {
        let mut engine = MockEngine::new(4, 4);
        let worker = engine.add_agent(AgentClass::Worker, Side::Friendly, Cell::new(1, 1));
        engine.set_ore(Cell::new(1, 2), 25);

        assert!(engine.execute(&Action::Harvest {
            agent: worker,
            at: Cell::new(1, 2),
        }));
        assert_eq!(engine.resources(), HARVEST_AMOUNT);
        assert_eq!(engine.snapshot().map.ore_at(Cell::new(1, 2)), 15);
    }
}
