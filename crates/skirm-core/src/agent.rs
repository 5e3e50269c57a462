//! The closed set of agent classes and their configuration profiles.
//!
//! The class set is fixed and never extended at runtime, so behavior
//! dispatch is a plain `match` over this enum and per-class numbers live
//! in a lookup table rather than behind dynamic dispatch. The profile
//! numbers are configuration data consumed by the generic engine — tuning
//! them changes play style, not engine logic.

use std::fmt;

/// Every kind of agent the engine decides for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AgentClass {
    /// Economy unit: harvests ore, builds and repairs structures,
    /// places blueprints, and can replicate itself.
    Worker,
    /// Melee attacker.
    Knight,
    /// Ranged attacker with a minimum range and a long-range strike
    /// ability.
    Ranger,
    /// Splash-damage attacker.
    Mage,
    /// Support unit: heals, and can boost an attacker's spent cooldown.
    Healer,
    /// Structure that produces new units and garrisons them.
    Factory,
    /// Structure that carries garrisoned units to a remote landing zone.
    Transport,
}

impl AgentClass {
    /// All classes, in table order. The per-class profile table and the
    /// decision-pass ordering both index by this.
    pub const ALL: [AgentClass; 7] = [
        AgentClass::Worker,
        AgentClass::Knight,
        AgentClass::Ranger,
        AgentClass::Mage,
        AgentClass::Healer,
        AgentClass::Factory,
        AgentClass::Transport,
    ];

    /// Index into per-class tables.
    pub fn index(self) -> usize {
        match self {
            AgentClass::Worker => 0,
            AgentClass::Knight => 1,
            AgentClass::Ranger => 2,
            AgentClass::Mage => 3,
            AgentClass::Healer => 4,
            AgentClass::Factory => 5,
            AgentClass::Transport => 6,
        }
    }

    /// Structures occupy their tile permanently and never move.
    pub fn is_structure(self) -> bool {
        matches!(self, AgentClass::Factory | AgentClass::Transport)
    }

    /// Damage-dealing classes. Healers are support, not combat: they
    /// decide before these classes within every decision pass.
    pub fn is_combat(self) -> bool {
        matches!(
            self,
            AgentClass::Knight | AgentClass::Ranger | AgentClass::Mage
        )
    }
}

impl fmt::Display for AgentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AgentClass::Worker => "worker",
            AgentClass::Knight => "knight",
            AgentClass::Ranger => "ranger",
            AgentClass::Mage => "mage",
            AgentClass::Healer => "healer",
            AgentClass::Factory => "factory",
            AgentClass::Transport => "transport",
        };
        write!(f, "{name}")
    }
}

/// Per-class configuration numbers.
///
/// `strategic_value` weights target selection when the attacker is near
/// full health; `defensive_value` replaces it when the attacker is
/// damaged and should prefer finishing threats over high-value trades.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClassProfile {
    /// Relative target value at full or near-full attacker health.
    pub strategic_value: f64,
    /// Relative target value when the attacker is damaged.
    pub defensive_value: f64,
    /// Squared maximum attack (or heal) range. Zero for classes that
    /// cannot attack.
    pub attack_range2: i32,
    /// Squared minimum attack range; cells closer than this cannot be
    /// hit. Zero for every class except Ranger.
    pub attack_min_range2: i32,
    /// Resource cost for a Factory to produce one unit of this class,
    /// or for a Worker to blueprint it if it is a structure.
    pub cost: u32,
}

/// The class → profile lookup table plus a few cross-class constants.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassProfiles {
    table: [ClassProfile; 7],
    /// Resource cost of a Worker replicating itself.
    pub replicate_cost: u32,
}

impl ClassProfiles {
    /// Profile for one class.
    pub fn get(&self, class: AgentClass) -> &ClassProfile {
        &self.table[class.index()]
    }

    /// Target value of `class` as seen by an attacker that is either
    /// healthy or damaged.
    pub fn target_value(&self, class: AgentClass, attacker_damaged: bool) -> f64 {
        let p = self.get(class);
        if attacker_damaged {
            p.defensive_value
        } else {
            p.strategic_value
        }
    }
}

impl Default for ClassProfiles {
    fn default() -> Self {
        // Value tables: damaged attackers weight dangerous classes higher
        // so they finish threats instead of chasing trades.
        let table = [
            // Worker
            ClassProfile {
                strategic_value: 2.0,
                defensive_value: 1.0,
                attack_range2: 0,
                attack_min_range2: 0,
                cost: 25,
            },
            // Knight
            ClassProfile {
                strategic_value: 1.0,
                defensive_value: 4.0,
                attack_range2: 2,
                attack_min_range2: 0,
                cost: 20,
            },
            // Ranger
            ClassProfile {
                strategic_value: 3.0,
                defensive_value: 5.0,
                attack_range2: 50,
                attack_min_range2: 10,
                cost: 20,
            },
            // Mage
            ClassProfile {
                strategic_value: 3.0,
                defensive_value: 4.0,
                attack_range2: 30,
                attack_min_range2: 0,
                cost: 20,
            },
            // Healer: "attack" range doubles as heal range.
            ClassProfile {
                strategic_value: 2.0,
                defensive_value: 2.0,
                attack_range2: 30,
                attack_min_range2: 0,
                cost: 20,
            },
            // Factory
            ClassProfile {
                strategic_value: 2.0,
                defensive_value: 2.0,
                attack_range2: 0,
                attack_min_range2: 0,
                cost: 100,
            },
            // Transport
            ClassProfile {
                strategic_value: 2.0,
                defensive_value: 1.0,
                attack_range2: 0,
                attack_min_range2: 0,
                cost: 75,
            },
        ];
        Self {
            table,
            replicate_cost: 15,
        }
    }
}
