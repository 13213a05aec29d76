use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Total number of key slots on a split layout (3 rows of 12 + 6 thumbs).
pub const SLOT_COUNT: usize = 42;
/// Columns per alpha row (6 per hand).
pub const COLUMNS: usize = 12;
/// First thumb slot. Slots 36..=38 are left thumbs, 39..=41 right thumbs.
pub const THUMB_START: usize = 36;
/// Home row index.
pub const HOME_ROW: u8 = 1;

/// Minimum horizontal distance between adjacent-finger keys that counts as a
/// lateral stretch.
pub const LSB_MIN_COL_DIST: f64 = 2.0;

/// Pinky slots in the order used by `TargetLoads::pinky_penalties`:
/// left hand (outer/inner per row, top to bottom), then right hand mirrored.
pub const PINKY_SLOTS: [usize; 12] = [0, 1, 12, 13, 24, 25, 11, 10, 23, 22, 35, 34];

pub const FINGER_COUNT: usize = 10;
pub const ROW_COUNT: usize = 4;

pub const LEFT: u8 = 0;
pub const RIGHT: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotInfo {
    pub hand: u8,   // 0 = Left, 1 = Right
    pub finger: u8, // 0..=9, left pinky to right pinky; 4/5 are thumbs
    pub row: u8,    // 0=Top, 1=Home, 2=Bottom, 3=Thumb
    pub col: u8,    // 0..=11 for alpha rows; thumbs sit under columns 3..=8
}

impl SlotInfo {
    #[inline(always)]
    pub fn is_thumb(&self) -> bool {
        self.finger == 4 || self.finger == 5
    }

    #[inline(always)]
    pub fn is_pinky(&self) -> bool {
        self.finger == 0 || self.finger == 9
    }
}

const fn k(hand: u8, finger: u8, row: u8, col: u8) -> SlotInfo {
    SlotInfo {
        hand,
        finger,
        row,
        col,
    }
}

/// The canonical slot table. Mirrored left/right: slot `r*12 + c` and
/// `r*12 + (11 - c)` are on opposite hands with fingers `f` and `9 - f`.
pub static SLOTS: [SlotInfo; SLOT_COUNT] = [
    // ROW 0 (Top)
    k(0, 0, 0, 0),  // 0
    k(0, 0, 0, 1),  // 1
    k(0, 1, 0, 2),  // 2
    k(0, 2, 0, 3),  // 3
    k(0, 3, 0, 4),  // 4
    k(0, 3, 0, 5),  // 5 inner
    k(1, 6, 0, 6),  // 6 inner
    k(1, 6, 0, 7),  // 7
    k(1, 7, 0, 8),  // 8
    k(1, 8, 0, 9),  // 9
    k(1, 9, 0, 10), // 10
    k(1, 9, 0, 11), // 11
    // ROW 1 (Home)
    k(0, 0, 1, 0),  // 12
    k(0, 0, 1, 1),  // 13
    k(0, 1, 1, 2),  // 14
    k(0, 2, 1, 3),  // 15
    k(0, 3, 1, 4),  // 16
    k(0, 3, 1, 5),  // 17 inner
    k(1, 6, 1, 6),  // 18 inner
    k(1, 6, 1, 7),  // 19
    k(1, 7, 1, 8),  // 20
    k(1, 8, 1, 9),  // 21
    k(1, 9, 1, 10), // 22
    k(1, 9, 1, 11), // 23
    // ROW 2 (Bottom)
    k(0, 0, 2, 0),  // 24
    k(0, 0, 2, 1),  // 25
    k(0, 1, 2, 2),  // 26
    k(0, 2, 2, 3),  // 27
    k(0, 3, 2, 4),  // 28
    k(0, 3, 2, 5),  // 29 inner
    k(1, 6, 2, 6),  // 30 inner
    k(1, 6, 2, 7),  // 31
    k(1, 7, 2, 8),  // 32
    k(1, 8, 2, 9),  // 33
    k(1, 9, 2, 10), // 34
    k(1, 9, 2, 11), // 35
    // ROW 3 (Thumbs)
    k(0, 4, 3, 3), // 36
    k(0, 4, 3, 4), // 37
    k(0, 4, 3, 5), // 38
    k(1, 5, 3, 6), // 39
    k(1, 5, 3, 7), // 40
    k(1, 5, 3, 8), // 41
];

/// Angle-mod moves the left bottom row one finger inward.
const ANGLEMOD_FINGERS: [(usize, u8); 3] = [(25, 1), (26, 2), (27, 3)];
const ANGLEMOD_INNER_SLOT: usize = 29;
const ANGLEMOD_INNER_DX: f64 = -0.5;

const ROW_STAGGER_X: [f64; ROW_COUNT] = [0.0, 0.25, 0.75, 0.0];
/// Per column, left hand outer to inner. The right hand mirrors it.
const COL_STAGGER_Y: [f64; 6] = [0.5, 0.5, 0.25, 0.0, 0.25, 0.35];

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    Display,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
#[serde(rename_all = "UPPERCASE")]
pub enum LayoutType {
    #[default]
    Rowstag,
    Anglemod,
    Ortho,
    Colstag,
}

type OffsetFn = fn(usize) -> (f64, f64);

fn no_offset(_idx: usize) -> (f64, f64) {
    (0.0, 0.0)
}

fn row_stagger(idx: usize) -> (f64, f64) {
    (ROW_STAGGER_X[SLOTS[idx].row as usize], 0.0)
}

fn angle_mod(idx: usize) -> (f64, f64) {
    let (dx, dy) = row_stagger(idx);
    if idx == ANGLEMOD_INNER_SLOT {
        (dx + ANGLEMOD_INNER_DX, dy)
    } else {
        (dx, dy)
    }
}

fn col_stagger(idx: usize) -> (f64, f64) {
    let s = &SLOTS[idx];
    if s.row as usize >= ROW_COUNT - 1 {
        return (0.0, 0.0);
    }
    let c = s.col as usize;
    let hand_col = if c < 6 { c } else { COLUMNS - 1 - c };
    (0.0, COL_STAGGER_Y[hand_col])
}

impl LayoutType {
    fn offset_fn(self) -> OffsetFn {
        match self {
            LayoutType::Rowstag => row_stagger,
            LayoutType::Anglemod => angle_mod,
            LayoutType::Ortho => no_offset,
            LayoutType::Colstag => col_stagger,
        }
    }

    /// Slot metadata for this board type.
    pub fn slot(self, idx: usize) -> SlotInfo {
        let mut info = SLOTS[idx];
        if self == LayoutType::Anglemod {
            if let Some(&(_, finger)) = ANGLEMOD_FINGERS.iter().find(|(s, _)| *s == idx) {
                info.finger = finger;
            }
        }
        info
    }

    /// Physical key centre in key units (x grows right, y grows down).
    pub fn position(self, idx: usize) -> (f64, f64) {
        let s = &SLOTS[idx];
        let (dx, dy) = (self.offset_fn())(idx);
        (s.col as f64 + dx, s.row as f64 + dy)
    }

    pub fn distance(self, i: usize, j: usize) -> KeyDistance {
        let (x1, y1) = self.position(i);
        let (x2, y2) = self.position(j);
        let a = self.slot(i);
        let b = self.slot(j);

        let row_dist = (y1 - y2).abs();
        let col_dist = (x1 - x2).abs();

        KeyDistance {
            row_dist,
            col_dist,
            finger_dist: a.finger.abs_diff(b.finger),
            distance: (row_dist * row_dist + col_dist * col_dist).sqrt(),
        }
    }

    /// Same hand, adjacent non-thumb fingers, stretched apart horizontally.
    pub fn is_lateral_stretch(self, i: usize, j: usize) -> bool {
        let a = self.slot(i);
        let b = self.slot(j);
        if a.hand != b.hand || a.is_thumb() || b.is_thumb() {
            return false;
        }
        let d = self.distance(i, j);
        d.finger_dist == 1 && d.col_dist >= LSB_MIN_COL_DIST
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KeyDistance {
    pub row_dist: f64,
    pub col_dist: f64,
    pub finger_dist: u8,
    pub distance: f64,
}

/// Slot that `idx` lands on after a horizontal flip.
#[inline(always)]
pub fn mirror_slot(idx: usize) -> usize {
    if idx >= THUMB_START {
        THUMB_START + (SLOT_COUNT - 1 - idx)
    } else {
        let row = idx / COLUMNS;
        let col = idx % COLUMNS;
        row * COLUMNS + (COLUMNS - 1 - col)
    }
}

/// 0 for pinky up to 4 for thumb, on either hand.
#[inline(always)]
pub fn inward_rank(finger: u8) -> u8 {
    if finger < 5 {
        finger
    } else {
        9 - finger
    }
}

/// Relative finger length: middle > ring > index > pinky. Thumbs rank lowest.
#[inline(always)]
pub fn finger_length(finger: u8) -> u8 {
    match inward_rank(finger) {
        0 => 1, // pinky
        1 => 3, // ring
        2 => 4, // middle
        3 => 2, // index
        _ => 0, // thumb
    }
}

#[inline(always)]
pub fn is_index_or_middle(finger: u8) -> bool {
    matches!(inward_rank(finger), 2 | 3)
}
