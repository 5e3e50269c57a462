//! The grid-wide aggregate fields, rebuilt from the snapshot each turn.
//!
//! These are the shared inputs every per-class target and cost field is
//! assembled from. They are recomputed in one pass over the snapshot at
//! the top of each turn and then read-only for the rest of it — with the
//! single exception of the passability bookkeeping that follows each
//! committed move.

use crate::kernels::KernelSet;
use skirm_core::{AgentClass, Cell, Side, WorldSnapshot};
use skirm_field::{Field, FieldError};
use skirm_path::BLOCKED;

/// Per-turn grid aggregates.
#[derive(Debug)]
pub struct GlobalFields {
    /// Traversal base: 1 on open ground, [`BLOCKED`] on occupied tiles,
    /// infinite on impassable terrain.
    pub passable: Field,
    /// Raw ore per cell.
    pub ore: Field,
    /// Ore blurred by the scent kernel — lets movement feel ore a few
    /// cells out.
    pub ore_fuzzy: Field,
    /// Union of enemy attack coverage (soft-edged), for cost fields that
    /// keep units out of reach.
    pub enemy_influence: Field,
    /// Wide, flat enemy presence — 1 at an enemy, felt far away.
    pub enemy_nearby: Field,
    /// Exactly 1 on cells an enemy stands on, 0 elsewhere.
    pub enemy_position: Field,
    /// Friendly combat crowding pressure.
    pub friendly_presence: Field,
    /// Worker crowding pressure (mild spread incentive).
    pub worker_proximity: Field,
    /// Standing room claimed by friendly structures.
    pub structure_proximity: Field,
    /// Attractor around friendly structures missing health (repair and
    /// construction targets).
    pub damaged_structure: Field,
    /// Cells endangered by imminent transport departures.
    pub hazard: Field,
}

impl GlobalFields {
    /// Allocate zeroed fields for a `width × height` map.
    pub fn new(width: u32, height: u32) -> Result<Self, FieldError> {
        Ok(Self {
            passable: Field::new(width, height)?,
            ore: Field::new(width, height)?,
            ore_fuzzy: Field::new(width, height)?,
            enemy_influence: Field::new(width, height)?,
            enemy_nearby: Field::new(width, height)?,
            enemy_position: Field::new(width, height)?,
            friendly_presence: Field::new(width, height)?,
            worker_proximity: Field::new(width, height)?,
            structure_proximity: Field::new(width, height)?,
            damaged_structure: Field::new(width, height)?,
            hazard: Field::new(width, height)?,
        })
    }

    /// Rebuild everything from `snap`. Called once per turn, before the
    /// cache is cleared and any agent decides.
    pub fn refresh(&mut self, snap: &WorldSnapshot, kernels: &KernelSet) {
        let w = snap.map.width;
        let h = snap.map.height;

        for y in 0..h as i32 {
            for x in 0..w as i32 {
                let cell = Cell::new(x, y);
                self.passable.set(
                    cell,
                    if snap.map.passable_at(cell) {
                        1.0
                    } else {
                        f64::INFINITY
                    },
                );
                self.ore.set(cell, f64::from(snap.map.ore_at(cell)));
                self.ore_fuzzy.set(cell, 0.0);
                self.enemy_influence.set(cell, 0.0);
                self.enemy_nearby.set(cell, 0.0);
                self.enemy_position.set(cell, 0.0);
                self.friendly_presence.set(cell, 0.0);
                self.worker_proximity.set(cell, 0.0);
                self.structure_proximity.set(cell, 0.0);
                self.damaged_structure.set(cell, 0.0);
                self.hazard.set(cell, 0.0);
            }
        }

        for y in 0..h as i32 {
            for x in 0..w as i32 {
                let cell = Cell::new(x, y);
                let ore = snap.map.ore_at(cell);
                if ore > 0 {
                    self.ore_fuzzy
                        .stamp_add(&kernels.ore_blur, cell, f64::from(ore));
                }
            }
        }

        for agent in &snap.agents {
            let Some(pos) = agent.pos else { continue };
            self.passable.set(pos, BLOCKED);

            match agent.side {
                Side::Enemy => {
                    if let Some(threat) = kernels.threat(agent.class) {
                        self.enemy_influence.stamp_max(threat, pos, 1.0);
                    }
                    self.enemy_nearby.stamp_max(&kernels.enemy_wide, pos, 1.0);
                    self.enemy_position.set(pos, 1.0);
                }
                Side::Friendly => {
                    if agent.class.is_combat() {
                        self.friendly_presence.stamp_add(&kernels.crowding, pos, 1.0);
                    }
                    match agent.class {
                        AgentClass::Worker => {
                            self.worker_proximity
                                .stamp_add(&kernels.worker_crowding, pos, 1.0);
                        }
                        AgentClass::Factory | AgentClass::Transport => {
                            self.structure_proximity
                                .stamp_add(&kernels.structure_zone, pos, 1.0);
                            if agent.health < agent.max_health {
                                // Blueprints and battle damage both pull
                                // workers in; the more missing, the harder.
                                let weight = 2.0 - agent.health_fraction();
                                self.damaged_structure
                                    .stamp_add(&kernels.adjacency, pos, weight);
                            }
                            if agent.class == AgentClass::Transport
                                && agent.built
                                && agent.ability_ready
                                && !agent.garrison.is_empty()
                            {
                                self.hazard.stamp_max(&kernels.hazard_zone, pos, 1.0);
                            }
                        }
                        _ => {}
                    }
                }
            }
        }
    }

    /// Passability bookkeeping for a committed move: the vacated cell
    /// reopens, the entered cell becomes occupied. Keeps later searches
    /// in the same turn honest without a full refresh.
    pub fn mark_move(&mut self, from: Cell, to: Cell) {
        self.passable.set(from, 1.0);
        self.passable.set(to, BLOCKED);
    }
}
