use crate::error::{KcResult, KeycraftError};
use crate::geometry::{mirror_slot, KeyDistance, LayoutType, SlotInfo, COLUMNS, SLOT_COUNT, THUMB_START};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

/// Marks a slot with no character. Placeholders are always pinned.
pub const PLACEHOLDER: char = '~';

/// A 42-slot split keyboard layout.
///
/// Slots 0..36 are three rows of twelve columns (columns 0..6 on the left
/// hand), slots 36..42 the thumb cluster. The multiset of runes is fixed at
/// construction; `swap` and `flip_horizontal` only permute it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitLayout {
    pub name: String,
    #[serde(default, rename = "type")]
    pub layout_type: LayoutType,
    #[serde(with = "rune_string")]
    pub runes: [char; SLOT_COUNT],
}

impl SplitLayout {
    pub fn new(name: &str, layout_type: LayoutType, runes: [char; SLOT_COUNT]) -> KcResult<Self> {
        let layout = Self {
            name: name.to_string(),
            layout_type,
            runes,
        };
        layout.validate()?;
        Ok(layout)
    }

    /// Builds a layout from 42 characters; whitespace is ignored so rows can be
    /// written on separate lines.
    pub fn from_str_runes(name: &str, layout_type: LayoutType, s: &str) -> KcResult<Self> {
        let runes = parse_runes(s).map_err(KeycraftError::Validation)?;
        Self::new(name, layout_type, runes)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> KcResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(KeycraftError::NotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        let layout: SplitLayout = serde_json::from_str(&content)?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> KcResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Rejects duplicate non-placeholder characters.
    pub fn validate(&self) -> KcResult<()> {
        let mut seen: HashMap<char, usize> = HashMap::new();
        for (idx, &c) in self.runes.iter().enumerate() {
            if c == PLACEHOLDER {
                continue;
            }
            if let Some(prev) = seen.insert(c, idx) {
                return Err(KeycraftError::Validation(format!(
                    "Layout '{}' has duplicate character '{}' at slots {} and {}",
                    self.name, c, prev, idx
                )));
            }
        }
        Ok(())
    }

    #[inline(always)]
    pub fn rune(&self, idx: usize) -> char {
        self.runes[idx]
    }

    #[inline(always)]
    pub fn is_placeholder(&self, idx: usize) -> bool {
        self.runes[idx] == PLACEHOLDER
    }

    #[inline(always)]
    pub fn slot_info(&self, idx: usize) -> SlotInfo {
        self.layout_type.slot(idx)
    }

    #[inline(always)]
    pub fn distance(&self, i: usize, j: usize) -> KeyDistance {
        self.layout_type.distance(i, j)
    }

    pub fn slot_of(&self, c: char) -> Option<usize> {
        if c == PLACEHOLDER {
            return None;
        }
        self.runes.iter().position(|&r| r == c)
    }

    /// Character to slot lookup. Upper-case runes also answer for their
    /// lower-case form since corpora are case-normalised.
    pub fn rune_index(&self) -> HashMap<char, usize> {
        let mut map = HashMap::with_capacity(SLOT_COUNT * 2);
        for (idx, &c) in self.runes.iter().enumerate() {
            if c == PLACEHOLDER {
                continue;
            }
            map.insert(c, idx);
        }
        for (idx, &c) in self.runes.iter().enumerate() {
            if c == PLACEHOLDER {
                continue;
            }
            let mut lower = c.to_lowercase();
            if let (Some(l), None) = (lower.next(), lower.next()) {
                map.entry(l).or_insert(idx);
            }
        }
        map
    }

    /// Exchanges two slots. Pin masks are the caller's concern.
    #[inline(always)]
    pub fn swap(&mut self, i: usize, j: usize) {
        self.runes.swap(i, j);
    }

    /// Mirrors every row left to right, moving keys across hands.
    pub fn flip_horizontal(&mut self) {
        let mut flipped = self.runes;
        for (idx, &c) in self.runes.iter().enumerate() {
            flipped[mirror_slot(idx)] = c;
        }
        self.runes = flipped;
    }

    pub fn is_permutation_of(&self, other: &SplitLayout) -> bool {
        let mut a = self.runes;
        let mut b = other.runes;
        a.sort_unstable();
        b.sort_unstable();
        a == b
    }
}

impl fmt::Display for SplitLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({})", self.name, self.layout_type)?;
        for row in 0..3 {
            let start = row * COLUMNS;
            let left: String = self.runes[start..start + 6]
                .iter()
                .map(|c| format!("{} ", c))
                .collect();
            let right: String = self.runes[start + 6..start + COLUMNS]
                .iter()
                .map(|c| format!("{} ", c))
                .collect();
            writeln!(f, "{}  {}", left.trim_end(), right.trim_end())?;
        }
        let thumbs = &self.runes[THUMB_START..];
        write!(
            f,
            "      {} {} {}  {} {} {}",
            thumbs[0], thumbs[1], thumbs[2], thumbs[3], thumbs[4], thumbs[5]
        )
    }
}

fn parse_runes(s: &str) -> Result<[char; SLOT_COUNT], String> {
    let chars: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();
    if chars.len() != SLOT_COUNT {
        return Err(format!(
            "Layout requires {} characters, found {}",
            SLOT_COUNT,
            chars.len()
        ));
    }
    let mut runes = [PLACEHOLDER; SLOT_COUNT];
    runes.copy_from_slice(&chars);
    Ok(runes)
}

/// Serialises the rune array as a single 42-character string.
mod rune_string {
    use super::{parse_runes, SLOT_COUNT};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(runes: &[char; SLOT_COUNT], s: S) -> Result<S::Ok, S::Error> {
        let text: String = runes.iter().collect();
        s.serialize_str(&text)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<[char; SLOT_COUNT], D::Error> {
        let text = String::deserialize(d)?;
        parse_runes(&text).map_err(D::Error::custom)
    }
}
