//! Phase-count classification and column labels.

/// Column layout of a voltage series, selected from the width of its rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseLayout {
    SinglePhase,
    TwoPhase,
    ThreePhase,
}

/// Labels of every power table, whatever the source's phase count.
pub const POWER_LABELS: [&str; 6] = ["P_1", "Q_1", "P_2", "Q_2", "P_3", "Q_3"];

const VOLTAGE_LABELS: [&str; 6] = ["V_A", "Angle_A", "V_B", "Angle_B", "V_C", "Angle_C"];

impl PhaseLayout {
    /// Classify a magnitude/angle tuple width. Only 2, 4 and 6 are valid.
    pub fn from_width(width: usize) -> Option<Self> {
        match width {
            2 => Some(PhaseLayout::SinglePhase),
            4 => Some(PhaseLayout::TwoPhase),
            6 => Some(PhaseLayout::ThreePhase),
            _ => None,
        }
    }

    pub fn phase_count(self) -> usize {
        match self {
            PhaseLayout::SinglePhase => 1,
            PhaseLayout::TwoPhase => 2,
            PhaseLayout::ThreePhase => 3,
        }
    }

    pub fn width(self) -> usize {
        self.phase_count() * 2
    }

    pub fn labels(self) -> &'static [&'static str] {
        &VOLTAGE_LABELS[..self.width()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documented_labels() {
        assert_eq!(
            PhaseLayout::from_width(2).map(PhaseLayout::labels),
            Some(&["V_A", "Angle_A"][..])
        );
        assert_eq!(
            PhaseLayout::TwoPhase.labels(),
            &["V_A", "Angle_A", "V_B", "Angle_B"]
        );
        assert_eq!(
            PhaseLayout::ThreePhase.labels(),
            &["V_A", "Angle_A", "V_B", "Angle_B", "V_C", "Angle_C"]
        );
    }

    #[test]
    fn other_widths_are_unclassified() {
        for width in [0, 1, 3, 5, 7, 8, 12] {
            assert_eq!(PhaseLayout::from_width(width), None);
        }
    }
}
