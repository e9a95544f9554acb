use crate::config::GameConfig;
use duel_core::Position;

/// Columns skipped between zigzag teeth.
const TOOTH_GAP: i32 = 6;

/// Builds the fixed enemy path: an entry run from the left edge along the
/// center row, vertical teeth spanning the configured band joined by
/// horizontal runs along the band edges, and an exit run to the right edge.
/// Deterministic, contiguous (every step is one unit move on one axis) and
/// fully in bounds; this is the sole authority for walkability, spawn and
/// despawn cells.
pub fn generate_path(config: &GameConfig) -> Vec<Position> {
    let height = config.height;
    let width = config.width;

    let band = ((height as f64 * config.path_band_fraction) as i32).max(2);
    let center = height / 2;
    let top = (center - band / 2).max(1);
    let bottom = (center + band / 2).min(height - 2);

    let first_tooth = 7.min(width / 4);
    let last_tooth = ((width as f64 * config.path_span_fraction) as i32).min(width - 4);

    let mut path = Vec::new();

    // Entry run.
    for col in 0..=first_tooth {
        path.push(Position::new(center, col));
    }

    let mut row = center;
    let mut col = first_tooth;
    let mut descending = true;

    while col < last_tooth {
        // Vertical tooth down to (or up to) the band edge.
        let target = if descending { bottom } else { top };
        while row != target {
            row += if descending { 1 } else { -1 };
            path.push(Position::new(row, col));
        }
        descending = !descending;

        // Horizontal run along the band edge to the next tooth.
        let next = (col + TOOTH_GAP).min(last_tooth);
        while col < next {
            col += 1;
            path.push(Position::new(row, col));
        }
    }

    // Exit run to the right edge.
    for c in (col + 1)..width {
        path.push(Position::new(row, c));
    }

    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_is_non_empty_and_spans_the_grid() {
        let config = GameConfig::default();
        let path = generate_path(&config);

        assert!(!path.is_empty());
        assert_eq!(path[0].col, 0);
        assert_eq!(path.last().unwrap().col, config.width - 1);
    }

    #[test]
    fn path_is_contiguous_unit_steps() {
        let path = generate_path(&GameConfig::default());
        for pair in path.windows(2) {
            let dr = (pair[1].row - pair[0].row).abs();
            let dc = (pair[1].col - pair[0].col).abs();
            assert_eq!(dr + dc, 1, "non-unit step between {:?} and {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn path_stays_in_bounds() {
        let config = GameConfig::default();
        for pos in generate_path(&config) {
            assert!(pos.row >= 0 && pos.row < config.height, "row out of bounds: {pos:?}");
            assert!(pos.col >= 0 && pos.col < config.width, "col out of bounds: {pos:?}");
        }
    }

    #[test]
    fn path_is_deterministic() {
        let config = GameConfig::default();
        assert_eq!(generate_path(&config), generate_path(&config));
    }

    #[test]
    fn small_grids_still_produce_a_valid_path() {
        let config = GameConfig {
            width: 20,
            height: 8,
            ..GameConfig::default()
        };
        let path = generate_path(&config);
        assert!(!path.is_empty());
        for pair in path.windows(2) {
            let dr = (pair[1].row - pair[0].row).abs();
            let dc = (pair[1].col - pair[0].col).abs();
            assert_eq!(dr + dc, 1);
        }
    }
}
