//! The [`Pathfinder`] and its reusable search scratch.

use skirm_core::{Cell, OFFSETS_8};
use skirm_field::{Field, FieldError};
use std::collections::BinaryHeap;

/// Entry cost at or above which a cell counts as blocked.
///
/// Occupied tiles carry this weight in cost fields; impassable terrain
/// carries `f64::INFINITY`. Both satisfy the blocked test, but occupied
/// tiles remain technically traversable at punitive cost — a tile may
/// free up before the agent arrives.
pub const BLOCKED: f64 = 1000.0;

/// A frontier entry ordered for a deterministic min-heap.
///
/// `BinaryHeap` pops the greatest element, so the ordering is reversed:
/// lowest cost first, ties broken by lowest flat cell index. The index
/// tie-break is what makes repeated searches on identical inputs expand
/// in identical order.
#[derive(Clone, Copy, Debug)]
struct FrontierEntry {
    cost: f64,
    cell: u32,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.cell.cmp(&self.cell))
    }
}

/// The result of a value-maximizing search.
///
/// Always contains at least the start cell. A length-1 route means
/// "hold position": either nothing reachable beat staying put, or the
/// start was boxed in.
#[derive(Clone, Debug, PartialEq)]
pub struct Route {
    cells: Vec<Cell>,
    score: f64,
}

impl Route {
    fn hold(start: Cell, score: f64) -> Self {
        Self {
            cells: vec![start],
            score,
        }
    }

    /// The full path, start first, destination last.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// The starting cell.
    pub fn start(&self) -> Cell {
        self.cells[0]
    }

    /// The chosen destination (equals the start for a hold).
    pub fn destination(&self) -> Cell {
        *self.cells.last().expect("route is never empty")
    }

    /// The move to make this turn: the second cell of the path, or the
    /// start itself when holding position.
    pub fn next_step(&self) -> Cell {
        if self.cells.len() > 1 {
            self.cells[1]
        } else {
            self.cells[0]
        }
    }

    /// `true` when the route is a single-cell hold.
    pub fn is_hold(&self) -> bool {
        self.cells.len() == 1
    }

    /// The winning `value / (path_cost + 1)` score.
    pub fn score(&self) -> f64 {
        self.score
    }
}

/// Reusable 8-connected weighted-grid Dijkstra.
///
/// The per-cell `cost`/`parent` scratch arrays are sized to the map once
/// and revalidated per invocation with a generation stamp: a cell whose
/// stamp does not match the current generation is treated as untouched,
/// so starting a search costs O(1) instead of an O(map) clear. Instances
/// are independent — construct one per map (or per test) freely.
///
/// # Cost semantics
///
/// Stepping into a cell costs that cell's entry in the cost field;
/// diagonal and cardinal steps accumulate identically, with no geometric
/// correction. That matches the game's turn-granularity movement and is
/// deliberate — do not "fix" it.
#[derive(Debug)]
pub struct Pathfinder {
    width: u32,
    height: u32,
    cost: Vec<f64>,
    parent: Vec<u32>,
    stamp: Vec<u32>,
    generation: u32,
    frontier: BinaryHeap<FrontierEntry>,
    expanded: usize,
}

impl Pathfinder {
    /// Create a pathfinder for a `width × height` map.
    pub fn new(width: u32, height: u32) -> Result<Self, FieldError> {
        if width == 0 || height == 0 {
            return Err(FieldError::EmptyField);
        }
        if width > Field::MAX_DIM {
            return Err(FieldError::DimensionTooLarge {
                name: "width",
                value: width,
                max: Field::MAX_DIM,
            });
        }
        if height > Field::MAX_DIM {
            return Err(FieldError::DimensionTooLarge {
                name: "height",
                value: height,
                max: Field::MAX_DIM,
            });
        }
        let n = width as usize * height as usize;
        Ok(Self {
            width,
            height,
            cost: vec![0.0; n],
            parent: vec![0; n],
            stamp: vec![0; n],
            generation: 0,
            frontier: BinaryHeap::new(),
            expanded: 0,
        })
    }

    /// Map width in cells.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Map height in cells.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Cells expanded by the most recent search. Feeds turn metrics.
    pub fn expanded(&self) -> usize {
        self.expanded
    }

    fn idx(&self, cell: Cell) -> u32 {
        cell.y as u32 * self.width + cell.x as u32
    }

    fn cell_of(&self, idx: u32) -> Cell {
        Cell::new((idx % self.width) as i32, (idx / self.width) as i32)
    }

    fn in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && (cell.x as u32) < self.width && (cell.y as u32) < self.height
    }

    /// Start a fresh invocation: bump the generation and reset the
    /// frontier. On counter wrap the stamps are cleared once — the only
    /// O(map) cost in roughly four billion searches.
    fn begin(&mut self) {
        if self.generation == u32::MAX {
            self.stamp.fill(0);
            self.generation = 1;
        } else {
            self.generation += 1;
        }
        self.frontier.clear();
        self.expanded = 0;
    }

    fn cost_of(&self, idx: u32) -> f64 {
        if self.stamp[idx as usize] == self.generation {
            self.cost[idx as usize]
        } else {
            f64::INFINITY
        }
    }

    fn relax(&mut self, idx: u32, cost: f64, parent: u32) {
        self.cost[idx as usize] = cost;
        self.parent[idx as usize] = parent;
        self.stamp[idx as usize] = self.generation;
    }

    fn check_dims(&self, field: &Field) {
        assert!(
            field.width() == self.width && field.height() == self.height,
            "field {}x{} does not match pathfinder {}x{}",
            field.width(),
            field.height(),
            self.width,
            self.height,
        );
    }

    /// Accumulated cost from `start` to every cell.
    ///
    /// Unreachable cells hold `f64::INFINITY`. Used by coordination
    /// passes that score many candidate targets against one source.
    pub fn distances(&mut self, start: Cell, costs: &Field) -> Field {
        self.check_dims(costs);
        assert!(self.in_bounds(start), "start {start} out of bounds");
        self.begin();

        let si = self.idx(start);
        self.relax(si, 0.0, si);
        self.frontier.push(FrontierEntry {
            cost: 0.0,
            cell: si,
        });

        while let Some(entry) = self.frontier.pop() {
            if entry.cost > self.cost_of(entry.cell) {
                continue;
            }
            self.expanded += 1;
            self.expand_neighbours(entry, costs);
        }

        let mut out = Field::filled(self.width, self.height, f64::INFINITY)
            .expect("pathfinder dims are valid");
        for i in 0..self.stamp.len() {
            if self.stamp[i] == self.generation {
                out.set(self.cell_of(i as u32), self.cost[i]);
            }
        }
        out
    }

    /// Accumulated cost from `start` to `goal`, or `None` when no route
    /// exists. Early-exits the moment `goal` is settled.
    pub fn reach(&mut self, start: Cell, goal: Cell, costs: &Field) -> Option<f64> {
        self.check_dims(costs);
        assert!(self.in_bounds(start), "start {start} out of bounds");
        assert!(self.in_bounds(goal), "goal {goal} out of bounds");
        self.begin();

        let si = self.idx(start);
        let gi = self.idx(goal);
        self.relax(si, 0.0, si);
        self.frontier.push(FrontierEntry {
            cost: 0.0,
            cell: si,
        });

        while let Some(entry) = self.frontier.pop() {
            if entry.cost > self.cost_of(entry.cell) {
                continue;
            }
            self.expanded += 1;
            if entry.cell == gi {
                return Some(entry.cost);
            }
            self.expand_neighbours(entry, costs);
        }
        None
    }

    /// Find the reachable cell maximizing `values / (path_cost + 1)` and
    /// the path to it.
    ///
    /// The start cell's own score — `values[start] / (costs[start] + 1)`,
    /// using its *entry* cost — is the baseline: the search returns a
    /// hold unless some other cell strictly beats it. Expansion stops
    /// early once the optimistic bound `values.max() / (frontier_cost + 1)`
    /// can no longer beat the incumbent.
    ///
    /// If every 8-neighbour of `start` has entry cost ≥ [`BLOCKED`], the
    /// agent is boxed in and a hold is returned without searching.
    pub fn seek(&mut self, start: Cell, values: &Field, costs: &Field) -> Route {
        self.check_dims(values);
        self.check_dims(costs);
        assert!(self.in_bounds(start), "start {start} out of bounds");

        let baseline = values.get(start) / (costs.get(start) + 1.0);
        let boxed_in = OFFSETS_8.iter().all(|&(dx, dy)| {
            let nb = start.offset(dx, dy);
            !self.in_bounds(nb) || costs.get(nb) >= BLOCKED
        });
        if boxed_in {
            return Route::hold(start, baseline);
        }

        self.begin();
        let si = self.idx(start);
        let mut best_cell = si;
        let mut best_score = baseline;
        self.relax(si, 0.0, si);
        self.frontier.push(FrontierEntry {
            cost: 0.0,
            cell: si,
        });

        let value_bound = values.max();

        while let Some(entry) = self.frontier.pop() {
            if entry.cost > self.cost_of(entry.cell) {
                continue;
            }
            // No unexpanded cell can beat the incumbent: even a cell
            // holding the map-wide maximum value loses at this depth.
            if value_bound / (entry.cost + 1.0) <= best_score {
                break;
            }
            self.expanded += 1;
            if entry.cell != si {
                let score =
                    values.get(self.cell_of(entry.cell)) / (entry.cost + 1.0);
                if score > best_score {
                    best_score = score;
                    best_cell = entry.cell;
                }
            }
            self.expand_neighbours(entry, costs);
        }

        if best_cell == si {
            return Route::hold(start, baseline);
        }

        let mut cells = Vec::new();
        let mut cursor = best_cell;
        while cursor != si {
            cells.push(self.cell_of(cursor));
            cursor = self.parent[cursor as usize];
        }
        cells.push(start);
        cells.reverse();
        Route {
            cells,
            score: best_score,
        }
    }

    fn expand_neighbours(&mut self, entry: FrontierEntry, costs: &Field) {
        let cell = self.cell_of(entry.cell);
        for &(dx, dy) in &OFFSETS_8 {
            let nb = cell.offset(dx, dy);
            if !self.in_bounds(nb) {
                continue;
            }
            let ni = self.idx(nb);
            let next_cost = entry.cost + costs.get(nb);
            if next_cost < self.cost_of(ni) {
                self.relax(ni, next_cost, entry.cell);
                self.frontier.push(FrontierEntry {
                    cost: next_cost,
                    cell: ni,
                });
            }
        }
    }
}
