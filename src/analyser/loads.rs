use crate::config::TargetLoads;
use crate::geometry::{
    LayoutType, COLUMNS, FINGER_COUNT, HOME_ROW, PINKY_SLOTS, ROW_COUNT, SLOT_COUNT, THUMB_START,
};

/// Per-group key usage, in percent of all corpus characters.
#[derive(Debug, Clone, PartialEq)]
pub struct Loads {
    pub layout_type: LayoutType,
    pub slots: [f64; SLOT_COUNT],
    pub columns: [f64; COLUMNS],
    pub fingers: [f64; FINGER_COUNT],
    pub hands: [f64; 2],
    pub rows: [f64; ROW_COUNT],
    /// Pinky usage outside the home row.
    pub pinky_off_home: f64,
}

impl Loads {
    pub fn from_slot_counts(lt: LayoutType, counts: &[u64; SLOT_COUNT], total: u64) -> Self {
        let mut loads = Loads {
            layout_type: lt,
            slots: [0.0; SLOT_COUNT],
            columns: [0.0; COLUMNS],
            fingers: [0.0; FINGER_COUNT],
            hands: [0.0; 2],
            rows: [0.0; ROW_COUNT],
            pinky_off_home: 0.0,
        };
        if total == 0 {
            return loads;
        }

        for (idx, &count) in counts.iter().enumerate() {
            if count == 0 {
                continue;
            }
            let pct = count as f64 * 100.0 / total as f64;
            let info = lt.slot(idx);

            loads.slots[idx] = pct;
            if idx < THUMB_START {
                loads.columns[info.col as usize] += pct;
            }
            loads.fingers[info.finger as usize] += pct;
            loads.hands[info.hand as usize] += pct;
            loads.rows[info.row as usize] += pct;
            if info.is_pinky() && info.row != HOME_ROW {
                loads.pinky_off_home += pct;
            }
        }
        loads
    }

    pub fn hand_deviation(&self, t: &TargetLoads) -> f64 {
        abs_diff_sum(&self.hands, &t.hand)
    }

    pub fn finger_deviation(&self, t: &TargetLoads) -> f64 {
        abs_diff_sum(&self.fingers, &t.finger)
    }

    /// Thumb row excluded.
    pub fn row_deviation(&self, t: &TargetLoads) -> f64 {
        abs_diff_sum(&self.rows[..3], &t.row)
    }

    /// Slots this board type hands to another finger carry no penalty.
    pub fn pinky_deviation(&self, t: &TargetLoads) -> f64 {
        PINKY_SLOTS
            .iter()
            .zip(&t.pinky_penalties)
            .filter(|&(&slot, _)| self.layout_type.slot(slot).is_pinky())
            .map(|(&slot, &penalty)| self.slots[slot] * penalty)
            .sum()
    }

    /// Population standard deviation over the eight non-thumb fingers.
    pub fn finger_balance(&self) -> f64 {
        let loads: Vec<f64> = self
            .fingers
            .iter()
            .enumerate()
            .filter(|(f, _)| *f != 4 && *f != 5)
            .map(|(_, &v)| v)
            .collect();
        let n = loads.len() as f64;
        let mean = loads.iter().sum::<f64>() / n;
        let var = loads.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        var.sqrt()
    }
}

fn abs_diff_sum(actual: &[f64], target: &[f64]) -> f64 {
    actual.iter().zip(target).map(|(a, t)| (a - t).abs()).sum()
}
