/// Asserts that the map holds exactly `$count` creatures.
#[macro_export]
macro_rules! assert_creature_count {
    ($map:expr, $count:expr) => {
        assert_eq!(
            $map.creatures().len(),
            $count,
            "Creature count mismatch"
        );
    };
}

/// Asserts that two maps hold identical cells.
#[macro_export]
macro_rules! assert_same_grid {
    ($a:expr, $b:expr) => {
        let (a, b) = ($a.grid().cells(), $b.grid().cells());
        let first_diff = a.iter().zip(b).position(|(x, y)| x != y);
        assert!(
            first_diff.is_none(),
            "Grids differ at index {:?}",
            first_diff
        );
    };
}
