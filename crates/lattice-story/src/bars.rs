//! Small diegetic readouts shared between scenes.

use lattice_core::{GameState, STAT_MAX};

/// Render a stat as a block bar, e.g. `[███░░░░░░░] 3/10`.
pub(crate) fn stat_bar(value: i32) -> String {
    let filled = value.clamp(0, STAT_MAX) as usize;
    let empty = STAT_MAX as usize - filled;
    format!("[{}{}] {value}/{STAT_MAX}", "█".repeat(filled), "░".repeat(empty))
}

/// The boot-log stability line.
pub(crate) fn stability_readout(state: &GameState) -> String {
    format!("Stability: {}", stat_bar(state.stability()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_shape() {
        assert_eq!(stat_bar(3), "[███░░░░░░░] 3/10");
        assert_eq!(stat_bar(0), "[░░░░░░░░░░] 0/10");
        assert_eq!(stat_bar(10), "[██████████] 10/10");
    }

    #[test]
    fn out_of_range_values_clamp_in_the_bar() {
        assert_eq!(stat_bar(12), "[██████████] 12/10");
    }
}
