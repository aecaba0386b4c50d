use crate::api::types::PieceId;
use crate::components::piece::Piece;

/// Index into a `PieceSet`, tagged with the generation it was issued for.
///
/// Replacing the set bumps the generation, so handles from a previous level
/// resolve to `None` instead of aliasing a different piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceHandle {
    index: u32,
    generation: u32,
}

impl PieceHandle {
    pub fn id(&self) -> PieceId {
        PieceId(self.index)
    }

    pub fn index(&self) -> usize {
        self.index as usize
    }
}

/// Flat arena owning every piece of the current level.
/// Designed for small-to-medium counts (hundreds, not millions).
pub struct PieceSet {
    pieces: Vec<Piece>,
    generation: u32,
}

impl PieceSet {
    pub fn new() -> Self {
        Self {
            pieces: Vec::new(),
            generation: 0,
        }
    }

    /// Discard the current pieces and take ownership of a new set.
    /// Every outstanding handle becomes stale.
    pub fn replace(&mut self, pieces: Vec<Piece>) {
        self.pieces = pieces;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Remove all pieces. Outstanding handles become stale.
    pub fn clear(&mut self) {
        self.replace(Vec::new());
    }

    /// Issue a handle for the piece at `index`, if it exists.
    pub fn handle(&self, index: usize) -> Option<PieceHandle> {
        (index < self.pieces.len()).then(|| PieceHandle {
            index: index as u32,
            generation: self.generation,
        })
    }

    pub fn is_current(&self, handle: PieceHandle) -> bool {
        handle.generation == self.generation && handle.index() < self.pieces.len()
    }

    pub fn get(&self, handle: PieceHandle) -> Option<&Piece> {
        if self.is_current(handle) {
            self.pieces.get(handle.index())
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, handle: PieceHandle) -> Option<&mut Piece> {
        if self.is_current(handle) {
            self.pieces.get_mut(handle.index())
        } else {
            None
        }
    }

    /// Look up by id in the current generation.
    pub fn by_id(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id.0 as usize)
    }

    /// Find the piece occupying grid cell (row, col).
    pub fn find_cell(&self, row: u32, col: u32) -> Option<PieceId> {
        self.pieces
            .iter()
            .position(|p| p.row() == row && p.col() == col)
            .map(|i| PieceId(i as u32))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Piece> {
        self.pieces.iter_mut()
    }

    pub fn as_slice(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn locked_count(&self) -> usize {
        self.pieces.iter().filter(|p| p.locked).count()
    }

    /// True once every piece is locked. An empty set is never solved.
    pub fn all_locked(&self) -> bool {
        !self.pieces.is_empty() && self.pieces.iter().all(|p| p.locked)
    }

    /// Indices of loose pieces, topmost first: the reverse of paint order.
    /// Equal pick orders are painted in storage order, so the later index
    /// is on top.
    pub fn loose_top_down(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.pieces.len())
            .filter(|&i| !self.pieces[i].locked)
            .collect();
        order.sort_by_key(|&i| std::cmp::Reverse((self.pieces[i].pick_order, i)));
        order
    }
}

impl Default for PieceSet {
    fn default() -> Self {
        Self::new()
    }
}
