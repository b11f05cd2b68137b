//! Spatial hash grid for tank-tank collision
//!
//! Divides the arena into uniform cells and buckets Active tanks by cell.
//! Queries return the 3x3 cell neighborhood around a point: a superset of
//! the true neighbors that callers must narrow with an exact circle test.

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::game::constants::tank;
use crate::game::state::{Tank, TankId};
use crate::util::vec2::Vec2;

/// Cell size for the tank grid: two tank diameters
pub const TANK_GRID_CELL_SIZE: f32 = tank::DIAMETER * 2.0;

/// Initial capacity for grid cells (number of expected non-empty cells)
const TANK_GRID_INITIAL_CAPACITY: usize = 32;

/// Grid cell key - (x, y) cell coordinates
pub type CellKey = (i32, i32);

/// Tank entry stored in a grid cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridEntry {
    /// Index into `GameState::tanks`
    pub index: usize,
    pub id: TankId,
    pub position: Vec2,
}

/// Candidate buffer returned by neighborhood queries
pub type Candidates = SmallVec<[GridEntry; 8]>;

/// Spatial hash grid over Active tanks
pub struct TankGrid {
    cell_size: f32,
    /// Inverse cell size for fast position-to-cell conversion
    inv_cell_size: f32,
    cells: HashMap<CellKey, SmallVec<[GridEntry; 4]>>,
    /// Pre-allocated neighbor offsets for 9-cell query
    neighbor_offsets: [(i32, i32); 9],
}

impl TankGrid {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            inv_cell_size: 1.0 / cell_size,
            cells: HashMap::with_capacity(TANK_GRID_INITIAL_CAPACITY),
            #[rustfmt::skip]
            neighbor_offsets: [
                (-1, -1), (0, -1), (1, -1),
                (-1,  0), (0,  0), (1,  0),
                (-1,  1), (0,  1), (1,  1),
            ],
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Clear all entries, keeping cell allocations
    #[inline]
    pub fn clear(&mut self) {
        for cell in self.cells.values_mut() {
            cell.clear();
        }
    }

    #[inline]
    fn position_to_cell(&self, position: Vec2) -> CellKey {
        (
            (position.x * self.inv_cell_size).floor() as i32,
            (position.y * self.inv_cell_size).floor() as i32,
        )
    }

    pub fn insert(&mut self, entry: GridEntry) {
        let key = self.position_to_cell(entry.position);
        self.cells.entry(key).or_default().push(entry);
    }

    /// Re-bucket every Active tank (Respawning tanks are left out)
    pub fn rebuild(&mut self, tanks: &[Tank]) {
        self.clear();
        for (index, tank) in tanks.iter().enumerate() {
            if tank.is_active() {
                self.insert(GridEntry {
                    index,
                    id: tank.id,
                    position: tank.position,
                });
            }
        }
    }

    /// Entries from the 3x3 neighborhood around `position`, ordered by tank index
    pub fn query(&self, position: Vec2) -> Candidates {
        let (cx, cy) = self.position_to_cell(position);
        let mut out = Candidates::new();

        for &(dx, dy) in &self.neighbor_offsets {
            if let Some(cell) = self.cells.get(&(cx + dx, cy + dy)) {
                out.extend(cell.iter().copied());
            }
        }

        // Cell lookup order is fixed but entries across cells are not sorted
        out.sort_unstable_by_key(|e| e.index);
        out
    }

    /// Number of entries currently bucketed
    pub fn len(&self) -> usize {
        self.cells.values().map(|c| c.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TankGrid {
    fn default() -> Self {
        Self::new(TANK_GRID_CELL_SIZE)
    }
}
