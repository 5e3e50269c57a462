//! The precomputed kernel set.
//!
//! Every stamp shape the engine uses is built once at construction from
//! the class profile table and reused for the whole game. Kernels are
//! pure data; rebuilding them per turn would waste the cache-friendly
//! stamping loops for nothing.

use skirm_core::{AgentClass, ClassProfiles};
use skirm_field::Kernel;

/// All stamp kernels, indexed by class where class-specific.
#[derive(Clone, Debug)]
pub struct KernelSet {
    attack: [Option<Kernel>; 7],
    threat: [Option<Kernel>; 7],
    /// Wide, flat enemy influence felt far from the fight.
    pub enemy_wide: Kernel,
    /// Where a damaged unit can expect to be healed: the healer's reach
    /// plus one cell of slack for the healer's own movement.
    pub heal_reach: Kernel,
    /// The band a support unit wants to hold around the front line —
    /// close enough to boost, far enough to survive.
    pub support_ring: Kernel,
    /// Friendly crowding pressure; the center is discounted so a unit
    /// does not flee its own tile.
    pub crowding: Kernel,
    /// Worker crowding: mild spread pressure between economy units.
    pub worker_crowding: Kernel,
    /// Standing room around structures: punitive on the structure,
    /// strong on the adjacent ring, mild falloff beyond.
    pub structure_zone: Kernel,
    /// Cells endangered by an imminent transport departure or arrival.
    pub hazard_zone: Kernel,
    /// Ore scent: lets the pathfinder smell ore a few cells away.
    pub ore_blur: Kernel,
    /// The 8-neighbourhood plus center — standing room for adjacency
    /// verbs (build, repair, board).
    pub adjacency: Kernel,
}

impl KernelSet {
    /// Build the full set from the class profile table.
    pub fn from_profiles(profiles: &ClassProfiles) -> Self {
        let mut attack: [Option<Kernel>; 7] = Default::default();
        let mut threat: [Option<Kernel>; 7] = Default::default();
        for class in AgentClass::ALL {
            let p = profiles.get(class);
            if p.attack_range2 == 0 {
                continue;
            }
            attack[class.index()] = Some(if p.attack_min_range2 > 0 {
                Kernel::annulus(p.attack_min_range2, p.attack_range2)
            } else {
                Kernel::uniform_disc(p.attack_range2)
            });
            threat[class.index()] = Some(Kernel::soft_disc(p.attack_range2));
        }

        let mut structure_zone = Kernel::falloff(5, 0.1);
        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx != 0 || dy != 0 {
                    structure_zone = structure_zone.with_weight(dx, dy, 0.4);
                }
            }
        }
        structure_zone = structure_zone.with_weight(0, 0, 5.0);

        Self {
            attack,
            threat,
            enemy_wide: Kernel::plateau(12, 50.0),
            heal_reach: Kernel::uniform_disc(31),
            support_ring: Kernel::annulus(80, 110),
            crowding: Kernel::falloff(5, 1.0).with_weight(0, 0, 0.5),
            worker_crowding: Kernel::falloff(5, 0.05),
            structure_zone,
            hazard_zone: Kernel::uniform_disc(8),
            ore_blur: Kernel::falloff(3, 1.0),
            adjacency: Kernel::uniform_disc(2),
        }
    }

    /// The ring or disc from which `class` can strike — where it wants
    /// to stand relative to an enemy. `None` for classes that cannot
    /// attack.
    pub fn attack(&self, class: AgentClass) -> Option<&Kernel> {
        self.attack[class.index()].as_ref()
    }

    /// The area an enemy of `class` covers, one soft cell wider than its
    /// true range — cells it could step into range of.
    pub fn threat(&self, class: AgentClass) -> Option<&Kernel> {
        self.threat[class.index()].as_ref()
    }
}
