//! Pieces module - tetromino shapes and rotation kicks
//!
//! Shapes are mino offsets inside a square bounding box (4x4 for I, 2x2 for O,
//! 3x3 for the rest). Rotation states follow the usual 0/R/2/L order, so the same
//! tables serve both the simple column-kick resolver and SRS.
//! Reference: https://tetris.wiki/SRS

use serde::{Deserialize, Serialize};

use crate::types::{PieceKind, Rotation, RotationDirection, BOARD_WIDTH};

/// Offset of a single mino relative to piece origin
pub type MinoOffset = (i8, i8);

/// Shape of a piece - 4 mino offsets from piece origin
pub type PieceShape = [MinoOffset; 4];

/// Get the shape (mino offsets) for a piece kind and rotation
pub fn get_shape(kind: PieceKind, rotation: Rotation) -> PieceShape {
    match kind {
        PieceKind::I => get_i_shape(rotation),
        PieceKind::O => get_o_shape(rotation),
        PieceKind::T => get_t_shape(rotation),
        PieceKind::S => get_s_shape(rotation),
        PieceKind::Z => get_z_shape(rotation),
        PieceKind::J => get_j_shape(rotation),
        PieceKind::L => get_l_shape(rotation),
    }
}

/// Side length of the square box the kind's shapes live in
pub fn box_size(kind: PieceKind) -> u8 {
    match kind {
        PieceKind::I => 4,
        PieceKind::O => 2,
        PieceKind::T | PieceKind::S | PieceKind::Z | PieceKind::J | PieceKind::L => 3,
    }
}

/// Spawn origin for a kind: horizontally centered box, top row
pub fn spawn_position(kind: PieceKind) -> (i8, i8) {
    let x = (BOARD_WIDTH - box_size(kind)) / 2;
    (x as i8, 0)
}

/// I piece shapes
fn get_i_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        // N: horizontal, centered on row 1
        Rotation::North => [(0, 1), (1, 1), (2, 1), (3, 1)],
        // E: vertical, right-aligned
        Rotation::East => [(2, 0), (2, 1), (2, 2), (2, 3)],
        // S: horizontal, centered on row 2
        Rotation::South => [(0, 2), (1, 2), (2, 2), (3, 2)],
        // W: vertical, left-aligned
        Rotation::West => [(1, 0), (1, 1), (1, 2), (1, 3)],
    }
}

/// O piece fills its whole 2x2 box in every state
fn get_o_shape(_rotation: Rotation) -> PieceShape {
    [(0, 0), (1, 0), (0, 1), (1, 1)]
}

fn get_t_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(1, 0), (0, 1), (1, 1), (2, 1)],
        Rotation::East => [(1, 0), (1, 1), (2, 1), (1, 2)],
        Rotation::South => [(0, 1), (1, 1), (2, 1), (1, 2)],
        Rotation::West => [(1, 0), (0, 1), (1, 1), (1, 2)],
    }
}

fn get_s_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(1, 0), (2, 0), (0, 1), (1, 1)],
        Rotation::East => [(1, 0), (1, 1), (2, 1), (2, 2)],
        Rotation::South => [(1, 1), (2, 1), (0, 2), (1, 2)],
        Rotation::West => [(0, 0), (0, 1), (1, 1), (1, 2)],
    }
}

fn get_z_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(0, 0), (1, 0), (1, 1), (2, 1)],
        Rotation::East => [(2, 0), (1, 1), (2, 1), (1, 2)],
        Rotation::South => [(0, 1), (1, 1), (1, 2), (2, 2)],
        Rotation::West => [(1, 0), (0, 1), (1, 1), (0, 2)],
    }
}

fn get_j_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(0, 0), (0, 1), (1, 1), (2, 1)],
        Rotation::East => [(1, 0), (2, 0), (1, 1), (1, 2)],
        Rotation::South => [(0, 1), (1, 1), (2, 1), (2, 2)],
        Rotation::West => [(1, 0), (1, 1), (0, 2), (1, 2)],
    }
}

fn get_l_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(2, 0), (0, 1), (1, 1), (2, 1)],
        Rotation::East => [(1, 0), (1, 1), (1, 2), (2, 2)],
        Rotation::South => [(0, 1), (1, 1), (2, 1), (0, 2)],
        Rotation::West => [(0, 0), (1, 0), (1, 1), (1, 2)],
    }
}

/// Which kick list the rotation resolver walks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RotationSystem {
    /// Same origin, then one and two columns right/left; rows never change
    #[default]
    Simple,
    /// Super Rotation System tables (separate I table, O never kicks)
    Srs,
}

/// Kick candidates for one rotation, in board coordinates (y grows downward).
/// The first entry is always the unmodified origin.
pub type KickList = [(i8, i8); 5];

const SIMPLE_KICKS: KickList = [(0, 0), (1, 0), (-1, 0), (2, 0), (-2, 0)];

/// SRS kick data, written y-up as published; [`kicks`] flips y for the board.
/// Indexed by [`get_kick_index`].
type SrsKickTable = [KickList; 8];

const O_KICKS: SrsKickTable = [[(0, 0); 5]; 8];

/// JLSTZ kick table (shared by J, L, S, T, Z)
const JLSTZ_KICKS: SrsKickTable = [
    // 0->1 (N->E, clockwise)
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    // 0->3 (N->W, counter-clockwise)
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    // 1->0 (E->N, counter-clockwise)
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    // 1->2 (E->S, clockwise)
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    // 2->1 (S->E, counter-clockwise)
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    // 2->3 (S->W, clockwise)
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    // 3->2 (W->S, counter-clockwise)
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    // 3->0 (W->N, clockwise)
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
];

const I_KICKS: SrsKickTable = [
    // 0->1 (N->E)
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    // 0->3 (N->W)
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
    // 1->0 (E->N)
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    // 1->2 (E->S)
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
    // 2->1 (S->E)
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
    // 2->3 (S->W)
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    // 3->2 (W->S)
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    // 3->0 (W->N)
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
];

/// Get the SRS table index for a rotation transition
fn get_kick_index(from: Rotation, dir: RotationDirection) -> usize {
    use RotationDirection::{Clockwise, CounterClockwise};

    match (from, dir) {
        (Rotation::North, Clockwise) => 0,
        (Rotation::North, CounterClockwise) => 1,
        (Rotation::East, CounterClockwise) => 2,
        (Rotation::East, Clockwise) => 3,
        (Rotation::South, CounterClockwise) => 4,
        (Rotation::South, Clockwise) => 5,
        (Rotation::West, CounterClockwise) => 6,
        (Rotation::West, Clockwise) => 7,
    }
}

/// Kick candidates to try, in order, for rotating `kind` out of `from`
pub fn kicks(
    system: RotationSystem,
    kind: PieceKind,
    from: Rotation,
    dir: RotationDirection,
) -> KickList {
    let table = match system {
        RotationSystem::Simple => return SIMPLE_KICKS,
        RotationSystem::Srs => match kind {
            PieceKind::O => &O_KICKS,
            PieceKind::I => &I_KICKS,
            _ => &JLSTZ_KICKS,
        },
    };

    let mut out = table[get_kick_index(from, dir)];
    for kick in out.iter_mut() {
        kick.1 = -kick.1;
    }
    out
}

/// Try to rotate a piece with kicks.
///
/// `is_free` reports whether a board cell can hold a mino. Returns the new rotation
/// and origin of the first legal candidate, or `None` if every candidate collides.
pub fn try_rotate(
    system: RotationSystem,
    kind: PieceKind,
    rotation: Rotation,
    x: i8,
    y: i8,
    dir: RotationDirection,
    is_free: impl Fn(i8, i8) -> bool,
) -> Option<(Rotation, i8, i8)> {
    let new_rotation = rotation.rotate(dir);
    let new_shape = get_shape(kind, new_rotation);

    kicks(system, kind, rotation, dir)
        .into_iter()
        .map(|(dx, dy)| (x + dx, y + dy))
        .find(|&(nx, ny)| new_shape.iter().all(|&(mx, my)| is_free(nx + mx, ny + my)))
        .map(|(nx, ny)| (new_rotation, nx, ny))
}
