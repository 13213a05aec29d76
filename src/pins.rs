use crate::error::{KcResult, KeycraftError};
use crate::geometry::SLOT_COUNT;
use crate::layout::SplitLayout;

/// Which slots the optimiser may not touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinMask {
    pinned: [bool; SLOT_COUNT],
}

impl PinMask {
    /// Only placeholders pinned.
    pub fn placeholders(layout: &SplitLayout) -> Self {
        let mut pinned = [false; SLOT_COUNT];
        for (idx, p) in pinned.iter_mut().enumerate() {
            *p = layout.is_placeholder(idx);
        }
        Self { pinned }
    }

    /// Builds a mask from slot indices and character lists.
    ///
    /// A non-empty `free_chars` starts from everything pinned and releases
    /// just those characters. `pin_chars` and `pinned_slots` are applied
    /// after that, and placeholders are always pinned.
    pub fn resolve(
        layout: &SplitLayout,
        pinned_slots: &[usize],
        pin_chars: &str,
        free_chars: &str,
    ) -> KcResult<Self> {
        let free_chars = free_chars.trim();
        let mut pinned = [!free_chars.is_empty(); SLOT_COUNT];

        for c in free_chars.chars().filter(|c| !c.is_whitespace()) {
            pinned[find(layout, c)?] = false;
        }
        for c in pin_chars.chars().filter(|c| !c.is_whitespace()) {
            pinned[find(layout, c)?] = true;
        }
        for &slot in pinned_slots {
            if slot >= SLOT_COUNT {
                return Err(KeycraftError::Validation(format!(
                    "Pinned slot {} is out of range (0..{})",
                    slot, SLOT_COUNT
                )));
            }
            pinned[slot] = true;
        }
        for (idx, p) in pinned.iter_mut().enumerate() {
            if layout.is_placeholder(idx) {
                *p = true;
            }
        }

        Ok(Self { pinned })
    }

    #[inline(always)]
    pub fn is_pinned(&self, idx: usize) -> bool {
        self.pinned[idx]
    }

    pub fn free_slots(&self) -> Vec<usize> {
        (0..SLOT_COUNT).filter(|&i| !self.pinned[i]).collect()
    }

    pub fn pinned_count(&self) -> usize {
        self.pinned.iter().filter(|p| **p).count()
    }
}

fn find(layout: &SplitLayout, c: char) -> KcResult<usize> {
    layout.slot_of(c).ok_or_else(|| {
        KeycraftError::Validation(format!(
            "Character '{}' is not on layout '{}'",
            c, layout.name
        ))
    })
}
