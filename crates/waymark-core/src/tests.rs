//! Unit tests for waymark-core.

mod ids {
    use crate::{INVALID_SPEED, NodeId, StringId, WayId};

    #[test]
    fn sentinel_is_max() {
        assert_eq!(NodeId::INVALID.0, u32::MAX);
        assert_eq!(WayId::INVALID.0, u32::MAX);
        assert_eq!(StringId::INVALID.0, u32::MAX);
        assert_eq!(INVALID_SPEED, u8::MAX);
    }

    #[test]
    fn default_is_invalid() {
        assert_eq!(NodeId::default(), NodeId::INVALID);
        assert_eq!(WayId::default(), WayId::INVALID);
    }

    #[test]
    fn index_roundtrip() {
        let id = NodeId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(usize::from(id), 42);
        assert_eq!(NodeId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn try_from_overflow() {
        assert!(WayId::try_from(usize::MAX).is_err());
    }

    #[test]
    fn display() {
        assert_eq!(NodeId(7).to_string(), "NodeId(7)");
        assert_eq!(WayId(0).to_string(), "WayId(0)");
    }
}

mod geo {
    use crate::GeoPoint;

    #[test]
    fn zero_distance() {
        let p = GeoPoint::new(13.4, 52.5);
        assert_eq!(p.distance_m(p), 0.0);
    }

    #[test]
    fn symmetric() {
        let a = GeoPoint::new(1.0, 1.0);
        let b = GeoPoint::new(1.1, 1.1);
        let d1 = a.distance_m(b);
        let d2 = b.distance_m(a);
        assert!((d1 - d2).abs() < 1e-9);
    }

    #[test]
    fn one_degree_meridian() {
        // 1° of latitude is the same length everywhere on a sphere.
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 1.0);
        let d = a.distance_m(b);
        assert!((d - 111_226.0).abs() < 10.0, "got {d}");
    }

    #[test]
    fn small_offsets_near_equator() {
        // 1e-5° of longitude at 1°N is ~1.1 m.
        let a = GeoPoint::new(1.0, 1.0);
        let b = GeoPoint::new(1.00001, 1.0);
        let d = a.distance_m(b);
        assert!((d - 1.11).abs() < 0.01, "got {d}");
    }

    #[test]
    fn longitude_shrinks_at_high_latitude() {
        // The same 1e-5° longitude offset at 65°N is only ~0.47 m.
        let a = GeoPoint::new(1.0, 65.0);
        let b = GeoPoint::new(1.00001, 65.0);
        let d = a.distance_m(b);
        assert!((d - 0.47).abs() < 0.01, "got {d}");
    }
}
