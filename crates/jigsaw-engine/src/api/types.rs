use bytemuck::{Pod, Zeroable};

/// Identifier of a piece within the current level's piece set.
/// Equal to the piece's row-major index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceId(pub u32);

/// Something the host UI may want to react to (sounds, overlays, progress).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PuzzleEvent {
    PiecePickedUp { piece: PieceId, row: u32, col: u32 },
    PiecePlaced { piece: PieceId, row: u32, col: u32 },
    /// Every piece of `level` is locked. Emitted once per level.
    Solved { level: u32 },
}

impl PuzzleEvent {
    pub const KIND_PICKED_UP: f32 = 1.0;
    pub const KIND_PLACED: f32 = 2.0;
    pub const KIND_SOLVED: f32 = 3.0;

    /// Flat encoding for hosts that read events as `f32` quads.
    pub fn to_wire(&self) -> WireEvent {
        match *self {
            PuzzleEvent::PiecePickedUp { piece, row, col } => WireEvent {
                kind: Self::KIND_PICKED_UP,
                a: row as f32,
                b: col as f32,
                c: piece.0 as f32,
            },
            PuzzleEvent::PiecePlaced { piece, row, col } => WireEvent {
                kind: Self::KIND_PLACED,
                a: row as f32,
                b: col as f32,
                c: piece.0 as f32,
            },
            PuzzleEvent::Solved { level } => WireEvent {
                kind: Self::KIND_SOLVED,
                a: level as f32,
                b: 0.0,
                c: 0.0,
            },
        }
    }
}

/// A puzzle event as four floats: `kind` identifies it, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct WireEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl WireEvent {
    pub const FLOATS: usize = 4;
}

/// Flatten a batch of events into a contiguous float buffer.
pub fn pack_events(events: &[PuzzleEvent]) -> Vec<f32> {
    let wire: Vec<WireEvent> = events.iter().map(PuzzleEvent::to_wire).collect();
    bytemuck::cast_slice(&wire).to_vec()
}
