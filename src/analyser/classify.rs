use crate::geometry::{finger_length, inward_rank, is_index_or_middle, LayoutType};
use std::cmp::Ordering;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Geometric relationship between two consecutive (or skip-1) keys.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BigramKind {
    pub same_finger: bool,
    pub repeat: bool,
    pub lateral_stretch: bool,
    pub full_scissor: bool,
    pub half_scissor: bool,
}

impl BigramKind {
    pub fn label(&self) -> String {
        let mut parts = Vec::new();
        if self.repeat {
            parts.push("repeat");
        } else if self.same_finger {
            parts.push("same-finger");
        }
        if self.lateral_stretch {
            parts.push("lateral-stretch");
        }
        if self.full_scissor {
            parts.push("full-scissor");
        }
        if self.half_scissor {
            parts.push("half-scissor");
        }
        if parts.is_empty() {
            "other".to_string()
        } else {
            parts.join("+")
        }
    }
}

pub fn classify_bigram(lt: LayoutType, i: usize, j: usize) -> BigramKind {
    let mut res = BigramKind::default();
    let a = lt.slot(i);
    let b = lt.slot(j);

    if a.hand != b.hand {
        return res;
    }

    if a.finger == b.finger {
        res.same_finger = true;
        res.repeat = i == j;
        return res;
    }

    res.lateral_stretch = lt.is_lateral_stretch(i, j);

    if a.is_thumb() || b.is_thumb() || a.finger.abs_diff(b.finger) != 1 {
        return res;
    }

    match a.row.abs_diff(b.row) {
        0 => {}
        1 => {
            // Only awkward when the shorter finger has to reach higher.
            let (upper, lower) = if a.row < b.row { (a, b) } else { (b, a) };
            res.half_scissor = finger_length(upper.finger) < finger_length(lower.finger);
        }
        _ => res.full_scissor = true,
    }

    res
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumString, Display, AsRefStr,
)]
pub enum TrigramClass {
    #[strum(serialize = "ALT-NML")]
    AltNormal,
    #[strum(serialize = "ALT-SFS")]
    AltSfs,
    #[strum(serialize = "2RL-IN")]
    Roll2In,
    #[strum(serialize = "2RL-OUT")]
    Roll2Out,
    #[strum(serialize = "2RL-SFB")]
    Roll2Sfb,
    #[strum(serialize = "3RL-IN")]
    Roll3In,
    #[strum(serialize = "3RL-OUT")]
    Roll3Out,
    #[strum(serialize = "3RL-SFB")]
    Roll3Sfb,
    #[strum(serialize = "RED-NML")]
    RedNormal,
    #[strum(serialize = "RED-WEAK")]
    RedWeak,
    #[strum(serialize = "RED-SFS")]
    RedSfs,
}

impl TrigramClass {
    pub const COUNT: usize = 11;

    pub fn family(&self) -> &'static str {
        match self {
            Self::AltNormal | Self::AltSfs => "ALT",
            Self::Roll2In | Self::Roll2Out | Self::Roll2Sfb => "2RL",
            Self::Roll3In | Self::Roll3Out | Self::Roll3Sfb => "3RL",
            Self::RedNormal | Self::RedWeak | Self::RedSfs => "RED",
        }
    }

    #[inline(always)]
    pub fn index(&self) -> usize {
        *self as usize
    }
}

pub const TRIGRAM_FAMILIES: [&str; 4] = ["ALT", "2RL", "3RL", "RED"];

fn roll_direction(first: u8, second: u8) -> Ordering {
    inward_rank(second).cmp(&inward_rank(first))
}

/// Classifies three key slots. Every same-hand or mixed-hand trigram falls in
/// exactly one class.
pub fn classify_trigram(lt: LayoutType, i: usize, j: usize, k: usize) -> TrigramClass {
    let a = lt.slot(i);
    let b = lt.slot(j);
    let c = lt.slot(k);

    if a.hand == c.hand && a.hand != b.hand {
        return if a.finger == c.finger {
            TrigramClass::AltSfs
        } else {
            TrigramClass::AltNormal
        };
    }

    if a.hand != b.hand || b.hand != c.hand {
        // Exactly one consecutive pair shares a hand.
        let (p, q) = if a.hand == b.hand { (a, b) } else { (b, c) };
        if p.finger == q.finger {
            return TrigramClass::Roll2Sfb;
        }
        return match roll_direction(p.finger, q.finger) {
            Ordering::Greater => TrigramClass::Roll2In,
            _ => TrigramClass::Roll2Out,
        };
    }

    let d1 = roll_direction(a.finger, b.finger);
    let d2 = roll_direction(b.finger, c.finger);

    if d1 == Ordering::Equal || d2 == Ordering::Equal {
        return TrigramClass::Roll3Sfb;
    }

    if d1 == d2 {
        return if d1 == Ordering::Greater {
            TrigramClass::Roll3In
        } else {
            TrigramClass::Roll3Out
        };
    }

    if a.finger == c.finger {
        TrigramClass::RedSfs
    } else if [a.finger, b.finger, c.finger]
        .iter()
        .all(|&f| !is_index_or_middle(f))
    {
        TrigramClass::RedWeak
    } else {
        TrigramClass::RedNormal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use strum::IntoEnumIterator;

    const LT: LayoutType = LayoutType::Ortho;

    #[test]
    fn test_same_key_is_repeat_and_same_finger() {
        let k = classify_bigram(LT, 13, 13);
        assert!(k.same_finger);
        assert!(k.repeat);
    }

    #[test]
    fn test_same_finger_different_key() {
        // Left index home (16) to left index top (4).
        let k = classify_bigram(LT, 16, 4);
        assert!(k.same_finger);
        assert!(!k.repeat);
    }

    #[rstest]
    #[case(2, 27, true, false)] // ring top -> middle bottom: full scissor
    #[case(27, 2, true, false)]
    #[case(4, 15, false, true)] // index top -> middle home: index is shorter and higher
    #[case(3, 16, false, false)] // middle top -> index home: natural
    #[case(14, 15, false, false)] // same row
    fn test_scissors(#[case] i: usize, #[case] j: usize, #[case] full: bool, #[case] half: bool) {
        let k = classify_bigram(LT, i, j);
        assert_eq!(k.full_scissor, full, "full {}->{}", i, j);
        assert_eq!(k.half_scissor, half, "half {}->{}", i, j);
    }

    #[test]
    fn test_cross_hand_is_unclassified() {
        assert_eq!(classify_bigram(LT, 16, 19), BigramKind::default());
    }

    #[rstest]
    #[case(16, 19, 15, TrigramClass::AltNormal)] // L index, R index, L middle
    #[case(16, 19, 4, TrigramClass::AltSfs)] // L index, R, L index
    #[case(13, 15, 19, TrigramClass::Roll2In)] // pinky -> middle, then right hand
    #[case(19, 16, 13, TrigramClass::Roll2Out)] // right, then index -> pinky
    #[case(16, 4, 19, TrigramClass::Roll2Sfb)]
    #[case(13, 14, 16, TrigramClass::Roll3In)] // pinky ring index
    #[case(16, 15, 14, TrigramClass::Roll3Out)]
    #[case(13, 13, 16, TrigramClass::Roll3Sfb)]
    #[case(16, 14, 15, TrigramClass::RedNormal)] // index ring middle
    #[case(13, 14, 12, TrigramClass::RedSfs)] // pinky ring pinky(other key)
    #[case(14, 13, 37, TrigramClass::RedWeak)] // ring pinky thumb
    fn test_trigram_classes(
        #[case] i: usize,
        #[case] j: usize,
        #[case] k: usize,
        #[case] expected: TrigramClass,
    ) {
        assert_eq!(classify_trigram(LT, i, j, k), expected);
    }

    #[test]
    fn test_right_hand_inward_is_towards_thumb() {
        // Right pinky (22) -> ring (21) -> middle (20)
        assert_eq!(classify_trigram(LT, 22, 21, 20), TrigramClass::Roll3In);
    }

    #[test]
    fn test_class_names_and_indices() {
        for (i, class) in TrigramClass::iter().enumerate() {
            assert_eq!(class.index(), i);
            assert!(class.to_string().starts_with(class.family()));
        }
        assert_eq!(TrigramClass::iter().count(), TrigramClass::COUNT);
    }
}
