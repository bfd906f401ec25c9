//! Property tests for the strict-rectangular shape and failed-call atomicity

use proptest::prelude::*;
use tabdata::table::{Table, TimeAxis};

fn ramp(len: usize) -> Vec<f64> {
    (0..len).map(|i| i as f64).collect()
}

fn lax_source(lengths: &[usize]) -> Table {
    let mut source = Table::new(TimeAxis::Absent, false);
    for &len in lengths {
        source.append_column(ramp(len), None, false).unwrap();
    }
    source
}

fn is_rectangular(table: &Table) -> bool {
    match table.npts() {
        Ok(npts) => {
            table.columns().iter().all(|c| c.len() == npts)
                && table.time().map_or(true, |t| t.len() == npts)
        }
        Err(_) => true,
    }
}

proptest! {
    /// Appending single columns keeps strict tables rectangular, time included
    #[test]
    fn test_append_column_keeps_shape(
        start in 0usize..6,
        ops in prop::collection::vec((0usize..8, any::<bool>()), 1..12),
    ) {
        let mut table = Table::new(TimeAxis::Present, true);
        table.append_column(ramp(start), None, false).unwrap();
        table.set_time(ramp(start)).unwrap();

        for (len, shorten) in ops {
            let before = table.clone();
            match table.append_column(ramp(len), None, shorten) {
                Ok(()) => prop_assert!(is_rectangular(&table)),
                Err(_) => prop_assert_eq!(&table, &before),
            }
        }
    }

    /// Appending column blocks of any shape keeps strict tables rectangular
    #[test]
    fn test_append_columns_keeps_shape(
        start in 1usize..6,
        lengths in prop::collection::vec(0usize..8, 1..4),
        shorten in any::<bool>(),
    ) {
        let mut table = Table::new(TimeAxis::Absent, true);
        table.append_column(ramp(start), None, false).unwrap();
        let source = lax_source(&lengths);

        let before = table.clone();
        match table.append_columns(&source, 0, None, shorten) {
            Ok(()) => {
                prop_assert!(is_rectangular(&table));
                prop_assert_eq!(table.nvars(), 1 + lengths.len());
            }
            Err(_) => prop_assert_eq!(&table, &before),
        }
    }

    /// Stacking rows either succeeds completely or leaves the table untouched
    #[test]
    fn test_append_rows_is_atomic(
        start in 0usize..5,
        lengths in prop::collection::vec(0usize..5, 1..4),
    ) {
        let mut table = Table::new(TimeAxis::Present, true);
        table.append_column(ramp(start), None, false).unwrap();
        table.append_column(ramp(start), None, false).unwrap();
        table.set_time(ramp(start)).unwrap();
        let block = lax_source(&lengths);

        let before = table.clone();
        match table.append_rows(&block, 0, 0, None) {
            Ok(()) => {
                prop_assert!(is_rectangular(&table));
                prop_assert_eq!(table.npts().unwrap(), start + lengths[0]);
                prop_assert_eq!(table.time().unwrap(), &ramp(start + lengths[0])[..]);
            }
            Err(_) => prop_assert_eq!(&table, &before),
        }
    }

    /// Extracted rows match the source slice and keep the shape
    #[test]
    fn test_extract_rows_matches_source(
        len in 1usize..10,
        from_frac in 0.0f64..1.0,
    ) {
        let mut table = Table::new(TimeAxis::Present, true);
        table.append_column(ramp(len), None, false).unwrap();
        table.set_time(ramp(len)).unwrap();
        let from = ((len as f64) * from_frac) as usize;

        let part = table.extract_rows(from, None, false).unwrap();
        prop_assert!(is_rectangular(&part));
        prop_assert_eq!(part.column(0).unwrap(), &table.column(0).unwrap()[from..]);
        prop_assert_eq!(part.time().unwrap(), &table.time().unwrap()[from..]);
    }
}
