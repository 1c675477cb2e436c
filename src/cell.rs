//! Cell storage and sorting
//!
//! Cells hold the signed coverage and area deposited by path edges in one
//! pixel. They are stored in fixed size blocks so growth never moves a cell
//! already handed out as a [`CellRef`].

use crate::error::RasterError;
use crate::fixed::PackedCoord;

pub const CELL_BLOCK_SHIFT: usize = 12;
pub const CELL_BLOCK_SIZE: usize = 1 << CELL_BLOCK_SHIFT;
pub const CELL_BLOCK_MASK: usize = CELL_BLOCK_SIZE - 1;
/// Default number of blocks before the arena refuses to grow (4M cells)
pub const CELL_BLOCK_LIMIT: usize = 1024;

#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub struct Cell { // cell_aa
    pub packed: PackedCoord,
    pub cover: i32,
    pub area: i32,
}

impl Default for Cell {
    fn default() -> Self {
        Cell { packed: PackedCoord::NONE, cover: 0, area: 0 }
    }
}

impl Cell {
    pub fn at(x: i32, y: i32) -> Self {
        Cell { packed: PackedCoord::new(x, y), cover: 0, area: 0 }
    }
    pub fn x(&self) -> i32 {
        self.packed.x()
    }
    pub fn y(&self) -> i32 {
        self.packed.y()
    }
    pub fn is_empty(&self) -> bool {
        self.cover == 0 && self.area == 0
    }
}

/// Index of a cell as (block, slot)
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub struct CellRef(u32);

impl CellRef {
    fn new(block: usize, slot: usize) -> Self {
        CellRef(((block << CELL_BLOCK_SHIFT) | slot) as u32)
    }
    pub fn block(self) -> usize {
        self.0 as usize >> CELL_BLOCK_SHIFT
    }
    pub fn slot(self) -> usize {
        self.0 as usize & CELL_BLOCK_MASK
    }
}

/// Block based cell store
///
/// Blocks are kept across [`reset`](CellArena::reset) and released when the
/// arena is dropped.
#[derive(Debug)]
pub struct CellArena {
    blocks: Vec<Vec<Cell>>,
    num_cells: usize,
    block_limit: usize,
    sorted: Vec<CellRef>,
    is_sorted: bool,
}

impl Default for CellArena {
    fn default() -> Self {
        Self::new()
    }
}

impl CellArena {
    pub fn new() -> Self {
        Self::with_block_limit(CELL_BLOCK_LIMIT)
    }
    pub fn with_block_limit(block_limit: usize) -> Self {
        Self { blocks: vec![], num_cells: 0, block_limit,
               sorted: vec![], is_sorted: false }
    }
    pub fn reset(&mut self) {
        for block in self.blocks.iter_mut() {
            block.clear();
        }
        self.num_cells = 0;
        self.sorted.clear();
        self.is_sorted = false;
    }
    pub fn total_cells(&self) -> usize {
        self.num_cells
    }
    /// Number of blocks allocated so far, including reusable ones
    pub fn allocated_blocks(&self) -> usize {
        self.blocks.len()
    }
    pub fn is_sorted(&self) -> bool {
        self.is_sorted
    }

    /// Append a cell, allocating a new block when the last one is full
    pub fn push(&mut self, cell: Cell) -> Result<CellRef, RasterError> {
        let block = self.num_cells >> CELL_BLOCK_SHIFT;
        let slot = self.num_cells & CELL_BLOCK_MASK;
        if block >= self.blocks.len() {
            self.allocate_block()?;
        }
        self.blocks[block].push(cell);
        self.num_cells += 1;
        self.is_sorted = false;
        Ok(CellRef::new(block, slot))
    }

    fn allocate_block(&mut self) -> Result<(), RasterError> {
        if self.blocks.len() >= self.block_limit {
            log::warn!("cell block limit reached: {} blocks", self.block_limit);
            return Err(RasterError::CellLimit { limit: self.block_limit });
        }
        let mut block = Vec::new();
        block.try_reserve_exact(CELL_BLOCK_SIZE)
            .map_err(|_| RasterError::OutOfMemory)?;
        self.blocks.try_reserve(1)
            .map_err(|_| RasterError::OutOfMemory)?;
        self.blocks.push(block);
        log::trace!("ALLOC CELL BLOCK {}", self.blocks.len());
        Ok(())
    }

    pub fn get(&self, r: CellRef) -> &Cell {
        &self.blocks[r.block()][r.slot()]
    }

    /// Cells in insertion order
    pub fn cells(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.blocks.iter().flat_map(|b| b.iter())
    }

    /// Order the cells by packed coordinate, y-major then x
    ///
    /// Repeated calls without new cells are free.
    pub fn sort_cells(&mut self) -> Result<(), RasterError> {
        if self.is_sorted {
            return Ok(());
        }
        self.sorted.clear();
        self.sorted.try_reserve(self.num_cells)
            .map_err(|_| RasterError::OutOfMemory)?;
        for (b, block) in self.blocks.iter().enumerate() {
            self.sorted.extend((0..block.len()).map(|s| CellRef::new(b, s)));
        }
        let blocks = &self.blocks;
        self.sorted.sort_unstable_by_key(|r| blocks[r.block()][r.slot()].packed);
        log::debug!("SORT_CELLS: {} cells in {} blocks", self.num_cells, self.blocks.len());
        self.is_sorted = true;
        Ok(())
    }

    /// View of the cells in sorted order
    ///
    /// Empty until [`sort_cells`](CellArena::sort_cells) has run.
    pub fn sorted_cells(&self) -> SortedCells<'_> {
        let order: &[CellRef] = if self.is_sorted { &self.sorted } else { &[] };
        SortedCells { arena: self, order }
    }
}

/// Borrowed, sorted view into a [`CellArena`]
#[derive(Debug,Copy,Clone)]
pub struct SortedCells<'a> {
    arena: &'a CellArena,
    order: &'a [CellRef],
}

impl<'a> SortedCells<'a> {
    pub fn len(&self) -> usize {
        self.order.len()
    }
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
    pub fn get(&self, i: usize) -> Option<&'a Cell> {
        let arena = self.arena;
        self.order.get(i).map(|&r| arena.get(r))
    }
    pub fn iter(&self) -> impl Iterator<Item = &'a Cell> + 'a {
        let arena = self.arena;
        self.order.iter().map(move |&r| arena.get(r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(x: i32, y: i32, cover: i32) -> Cell {
        Cell { cover, ..Cell::at(x, y) }
    }

    #[test]
    fn grows_past_one_block_without_moving_cells() {
        let mut arena = CellArena::new();
        let first = arena.push(cell(1, 1, 7)).unwrap();
        for i in 0 .. CELL_BLOCK_SIZE + 10 {
            arena.push(cell((i % 100) as i32, (i / 100) as i32, 1)).unwrap();
        }
        assert_eq!(arena.allocated_blocks(), 2);
        assert_eq!(arena.get(first).cover, 7);
        assert_eq!(arena.total_cells(), CELL_BLOCK_SIZE + 11);
    }

    #[test]
    fn reset_reuses_blocks() {
        let mut arena = CellArena::new();
        for i in 0 .. CELL_BLOCK_SIZE + 1 {
            arena.push(cell(i as i32 & 0xff, 0, 1)).unwrap();
        }
        arena.reset();
        assert_eq!(arena.total_cells(), 0);
        assert_eq!(arena.allocated_blocks(), 2);
        arena.push(cell(0, 0, 1)).unwrap();
        assert_eq!(arena.allocated_blocks(), 2);
    }

    #[test]
    fn block_limit_is_reported() {
        let mut arena = CellArena::with_block_limit(1);
        for _ in 0 .. CELL_BLOCK_SIZE {
            arena.push(cell(0, 0, 1)).unwrap();
        }
        assert_eq!(arena.push(cell(0, 0, 1)),
                   Err(RasterError::CellLimit { limit: 1 }));
    }

    #[test]
    fn sorts_by_packed_coord() {
        let mut arena = CellArena::new();
        for &(x, y) in &[(5, 2), (1, 0), (-3, 2), (9, 1), (1, 0), (0, 0)] {
            arena.push(cell(x, y, 1)).unwrap();
        }
        assert!(arena.sorted_cells().is_empty());
        arena.sort_cells().unwrap();
        let xy: Vec<_> = arena.sorted_cells().iter().map(|c| c.packed.xy()).collect();
        assert_eq!(xy, vec![(0, 0), (1, 0), (1, 0), (9, 1), (-3, 2), (5, 2)]);
    }
}
