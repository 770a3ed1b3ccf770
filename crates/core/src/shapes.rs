//! Shapes module - the seven tetromino definitions
//!
//! Every shape lives in a 5x5 frame. A rotation state is the list of the four
//! occupied `(column, row)` offsets inside that frame; the piece origin is the
//! frame's top-left corner. States are listed in clockwise order.
//!
//! The spawn states and the two-state shapes follow the classic drawings.
//! The remaining J, L and T states are exact quarter turns of the spawn state
//! about the frame center `(2, 2)`, so every state is connected and no two
//! kinds share a state.
//!
//! ```text
//! T, state 0        T, state 1
//! .....             .....
//! .....             ..#..
//! .###.             .##..
//! ..#..             ..#..
//! .....             .....
//! ```

use crate::types::{Rgb, ShapeKind};

/// Offset of a single cell relative to the piece origin
pub type CellOffset = (i8, i8);

/// One rotation state - 4 cell offsets from the piece origin
pub type Mask = [CellOffset; 4];

const S_STATES: [Mask; 2] = [
    [(2, 2), (3, 2), (1, 3), (2, 3)],
    [(2, 1), (2, 2), (3, 2), (3, 3)],
];

const Z_STATES: [Mask; 2] = [
    [(1, 2), (2, 2), (2, 3), (3, 3)],
    [(2, 1), (1, 2), (2, 2), (1, 3)],
];

const J_STATES: [Mask; 4] = [
    [(1, 2), (2, 2), (3, 2), (1, 3)],
    [(1, 1), (2, 1), (2, 2), (2, 3)],
    [(3, 1), (1, 2), (2, 2), (3, 2)],
    [(2, 1), (2, 2), (2, 3), (3, 3)],
];

const L_STATES: [Mask; 4] = [
    [(1, 2), (2, 2), (3, 2), (3, 3)],
    [(2, 1), (2, 2), (1, 3), (2, 3)],
    [(1, 1), (1, 2), (2, 2), (3, 2)],
    [(2, 1), (3, 1), (2, 2), (2, 3)],
];

const T_STATES: [Mask; 4] = [
    [(1, 2), (2, 2), (3, 2), (2, 3)],
    [(2, 1), (1, 2), (2, 2), (2, 3)],
    [(2, 1), (1, 2), (2, 2), (3, 2)],
    [(2, 1), (2, 2), (3, 2), (2, 3)],
];

const O_STATES: [Mask; 1] = [[(2, 2), (3, 2), (2, 3), (3, 3)]];

const I_STATES: [Mask; 2] = [
    [(1, 2), (2, 2), (3, 2), (4, 2)],
    [(2, 0), (2, 1), (2, 2), (2, 3)],
];

/// Rotation states of `kind`, in clockwise order
pub fn rotation_states(kind: ShapeKind) -> &'static [Mask] {
    match kind {
        ShapeKind::S => &S_STATES,
        ShapeKind::Z => &Z_STATES,
        ShapeKind::J => &J_STATES,
        ShapeKind::L => &L_STATES,
        ShapeKind::T => &T_STATES,
        ShapeKind::O => &O_STATES,
        ShapeKind::I => &I_STATES,
    }
}

/// Display color of `kind`
pub fn color_of(kind: ShapeKind) -> Rgb {
    match kind {
        ShapeKind::S => Rgb::new(46, 204, 113),
        ShapeKind::Z => Rgb::new(231, 76, 60),
        ShapeKind::J => Rgb::new(52, 152, 219),
        ShapeKind::L => Rgb::new(230, 126, 34),
        ShapeKind::T => Rgb::new(155, 89, 182),
        ShapeKind::O => Rgb::new(241, 196, 15),
        ShapeKind::I => Rgb::new(26, 188, 156),
    }
}
