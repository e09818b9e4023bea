//! Unit tests for waymark-speed.

mod helpers {
    use std::io::Write;

    use tempfile::NamedTempFile;

    /// Write `contents` to a fresh temp file and return its handle.
    pub fn csv_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }
}

// ── Segment speed map ─────────────────────────────────────────────────────────

mod segment {
    use waymark_core::INVALID_SPEED;

    use super::helpers::csv_file;
    use crate::{SegmentSpeedMap, SpeedError};

    #[test]
    fn add_get_has() {
        let mut map = SegmentSpeedMap::new();
        map.add(62397298, 62523814, 20);
        map.add(62444552, 62444554, 63);

        assert_eq!(map.get(62444552, 62444554).unwrap(), 63);
        assert!(matches!(
            map.get(62300298, 62523814),
            Err(SpeedError::SegmentNotFound { from: 62300298, to: 62523814 })
        ));
        assert!(!map.has(60097298, 62523814));
        assert!(map.has(62397298, 62523814));
    }

    #[test]
    fn directions_are_distinct() {
        let mut map = SegmentSpeedMap::new();
        map.add(1, 2, 10);
        assert!(map.has(1, 2));
        assert!(!map.has(2, 1));
    }

    #[test]
    fn add_overwrites() {
        let mut map = SegmentSpeedMap::new();
        map.add(1, 2, 10);
        map.add(1, 2, 20);
        assert_eq!(map.get(1, 2).unwrap(), 20);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn get_many_fills_missing_with_sentinel() {
        let mut map = SegmentSpeedMap::new();
        map.add(1, 2, 1);
        map.add(2, 3, 2);
        map.add(3, 4, 3);
        assert_eq!(
            map.get_many(&[1, 2, 3, 4, 5]).unwrap(),
            vec![1, 2, 3, INVALID_SPEED]
        );
    }

    #[test]
    fn get_many_boundaries() {
        let mut map = SegmentSpeedMap::new();
        map.add(1, 2, 5);
        assert_eq!(map.get_many(&[1, 2]).unwrap(), vec![5]);
        assert!(matches!(
            map.get_many(&[1]),
            Err(SpeedError::TooShort { need: 2, got: 1 })
        ));
        assert!(matches!(
            map.get_many(&[]),
            Err(SpeedError::TooShort { need: 2, got: 0 })
        ));
    }

    #[test]
    fn load_csv_basic() {
        let file = csv_file(
            "86909055,86909053,81\n\
             86909053,86909050,81\n\
             86623322,86622998,89\n\
             86622998,86623322,88\n",
        );
        let map = SegmentSpeedMap::from_csv(file.path()).unwrap();
        assert_eq!(map.get(86909055, 86909053).unwrap(), 81);
        assert_eq!(map.get(86623322, 86622998).unwrap(), 89);
        assert_eq!(map.get(86622998, 86623322).unwrap(), 88);
        assert!(!map.has(100, 100));
    }

    #[test]
    fn trailing_fields_and_blank_lines_tolerated() {
        let file = csv_file("1,2,50,whatever,else\n\n2,3,60\n\n\n");
        let map = SegmentSpeedMap::from_csv(file.path()).unwrap();
        assert_eq!(map.get(1, 2).unwrap(), 50);
        assert_eq!(map.get(2, 3).unwrap(), 60);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn empty_file_loads_nothing() {
        let file = csv_file("");
        let map = SegmentSpeedMap::from_csv(file.path()).unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn incremental_loads_merge() {
        let first = csv_file("90,91,2\n91,92,3\n");
        let second = csv_file("92,93,4\n93,94,5\n");

        let mut map = SegmentSpeedMap::from_csv(first.path()).unwrap();
        assert_eq!(
            map.get_many(&[90, 91, 92, 93, 94]).unwrap(),
            vec![2, 3, INVALID_SPEED, INVALID_SPEED]
        );

        map.load_csv(second.path()).unwrap();
        assert_eq!(
            map.get_many(&[90, 91, 92, 93, 94]).unwrap(),
            vec![2, 3, 4, 5]
        );
    }

    #[test]
    fn later_load_overwrites_earlier() {
        let first = csv_file("1,2,10\n");
        let second = csv_file("1,2,99\n");
        let map =
            SegmentSpeedMap::from_csv_files(&[first.path(), second.path()]).unwrap();
        assert_eq!(map.get(1, 2).unwrap(), 99);
    }

    #[test]
    fn parse_error_reports_line_and_text() {
        let file = csv_file(
            "1,2,10\n2,3,20\n3,4,30\n4,5,40\n5,6,50\n6,7,60\n12345,notanumber,42\n",
        );
        match SegmentSpeedMap::from_csv(file.path()) {
            Err(SpeedError::Parse { path, line, text }) => {
                assert_eq!(path, file.path());
                assert_eq!(line, 7);
                assert_eq!(text, "12345,notanumber,42");
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn failed_load_leaves_map_unchanged() {
        let good = csv_file("1,2,10\n");
        let bad = csv_file("3,4,20\nbroken line\n");

        let mut map = SegmentSpeedMap::from_csv(good.path()).unwrap();
        assert!(map.load_csv(bad.path()).is_err());

        // Neither the bad row nor the good row preceding it landed.
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(1, 2).unwrap(), 10);
        assert!(!map.has(3, 4));
    }

    #[test]
    fn whitespace_is_rejected() {
        let file = csv_file("1, 2,30\n");
        assert!(matches!(
            SegmentSpeedMap::from_csv(file.path()),
            Err(SpeedError::Parse { line: 1, .. })
        ));
    }

    #[test]
    fn negative_numbers_are_rejected() {
        let file = csv_file("1,-2,30\n");
        assert!(matches!(
            SegmentSpeedMap::from_csv(file.path()),
            Err(SpeedError::Parse { .. })
        ));
    }

    #[test]
    fn fewer_columns_are_rejected() {
        let file = csv_file("1,2\n");
        assert!(matches!(
            SegmentSpeedMap::from_csv(file.path()),
            Err(SpeedError::Parse { .. })
        ));
    }

    #[test]
    fn sentinel_speed_is_rejected() {
        let file = csv_file(&format!("1,2,{INVALID_SPEED}\n"));
        assert!(matches!(
            SegmentSpeedMap::from_csv(file.path()),
            Err(SpeedError::Parse { .. })
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = SegmentSpeedMap::from_csv(std::path::Path::new("/no/such/file.csv"));
        assert!(matches!(result, Err(SpeedError::Io(_))));
    }

    #[test]
    fn loaded_map_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SegmentSpeedMap>();
    }
}

// ── Way speed map ─────────────────────────────────────────────────────────────

mod way {
    use waymark_core::INVALID_SPEED;

    use super::helpers::csv_file;
    use crate::{SpeedError, WaySpeedMap};

    #[test]
    fn mph_converts_to_kph() {
        let file = csv_file("62444552,Telegraph Ave,mph,19\n");
        let map = WaySpeedMap::from_csv(file.path()).unwrap();
        // round(19 × 1.609) = 31
        assert_eq!(map.get(62444552).unwrap(), 31);
    }

    #[test]
    fn kph_and_empty_unit_pass_through() {
        let file = csv_file(
            "11750872,Broadway,kph,50\n\
             15591960,,,30\n",
        );
        let map = WaySpeedMap::from_csv(file.path()).unwrap();
        assert_eq!(map.get(11750872).unwrap(), 50);
        assert_eq!(map.get(15591960).unwrap(), 30);
    }

    #[test]
    fn over_limit_rows_are_skipped_not_fatal() {
        let file = csv_file(
            "5,Fast Road,mph,200\n\
             6,Sane Road,kph,100\n",
        );
        let map = WaySpeedMap::from_csv(file.path()).unwrap();
        assert!(!map.has(5));
        assert_eq!(map.get(6).unwrap(), 100);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn unknown_unit_is_rejected() {
        let file = csv_file("7,Some Road,furlongs,30\n");
        assert!(matches!(
            WaySpeedMap::from_csv(file.path()),
            Err(SpeedError::Parse { line: 1, .. })
        ));
    }

    #[test]
    fn fewer_columns_are_rejected() {
        let file = csv_file("7,Some Road,30\n");
        assert!(matches!(
            WaySpeedMap::from_csv(file.path()),
            Err(SpeedError::Parse { .. })
        ));
    }

    #[test]
    fn quoted_names_may_contain_commas() {
        let file = csv_file("8,\"Main St, West\",kph,40\n");
        let map = WaySpeedMap::from_csv(file.path()).unwrap();
        assert_eq!(map.get(8).unwrap(), 40);
    }

    #[test]
    fn get_many_is_one_speed_per_way() {
        let file = csv_file(
            "11750872,,kph,50\n\
             286508200,,kph,5\n\
             11753880,,kph,40\n",
        );
        let map = WaySpeedMap::from_csv(file.path()).unwrap();
        assert_eq!(
            map.get_many(&[11750872, 286508200, 11753880, 99]).unwrap(),
            vec![50, 5, 40, INVALID_SPEED]
        );
    }

    #[test]
    fn get_many_rejects_empty_input() {
        let map = WaySpeedMap::new();
        assert!(matches!(
            map.get_many(&[]),
            Err(SpeedError::TooShort { need: 1, got: 0 })
        ));
    }

    #[test]
    fn get_unknown_way_fails() {
        let map = WaySpeedMap::new();
        assert!(matches!(map.get(100), Err(SpeedError::WayNotFound(100))));
        assert!(!map.has(100));
    }

    #[test]
    fn incremental_loads_merge_and_overwrite() {
        let first = csv_file("1,,kph,30\n2,,kph,40\n");
        let second = csv_file("2,,kph,45\n3,,kph,50\n");

        let mut map = WaySpeedMap::from_csv(first.path()).unwrap();
        map.load_csv(second.path()).unwrap();

        assert_eq!(map.get(1).unwrap(), 30);
        assert_eq!(map.get(2).unwrap(), 45);
        assert_eq!(map.get(3).unwrap(), 50);
    }

    #[test]
    fn failed_load_leaves_map_unchanged() {
        let good = csv_file("1,,kph,30\n");
        let bad = csv_file("2,,kph,40\n3,,badunit,50\n");

        let mut map = WaySpeedMap::from_csv(good.path()).unwrap();
        assert!(map.load_csv(bad.path()).is_err());
        assert_eq!(map.len(), 1);
        assert!(!map.has(2));
    }

    #[test]
    fn add_overwrites() {
        let mut map = WaySpeedMap::new();
        map.add(9, 10);
        map.add(9, 20);
        assert_eq!(map.get(9).unwrap(), 20);
    }
}
