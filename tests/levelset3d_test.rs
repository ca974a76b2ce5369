//! World-to-grid conversion of LevelSet3D, observed through a recording store

use mpmkit::{AssetId, Error, GeometryStore, LevelSet3D, LevelSetGrid, Result};
use nalgebra::Vector3;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Sphere(Vector3<f32>, f32, bool),
    Plane(Vector3<f32>, f32),
    Cuboid(Vector3<f32>, Vector3<f32>, bool),
    Increase(f32),
    Friction(f32),
}

#[derive(Debug, Default)]
struct RecordingGrid {
    res: Vector3<i32>,
    offset: Vector3<f32>,
    calls: Vec<Call>,
}

impl LevelSetGrid for RecordingGrid {
    fn add_sphere(&mut self, center: Vector3<f32>, radius: f32, inside_out: bool) {
        self.calls.push(Call::Sphere(center, radius, inside_out));
    }

    fn add_plane(&mut self, normal: Vector3<f32>, d: f32) {
        self.calls.push(Call::Plane(normal, d));
    }

    fn add_cuboid(&mut self, lower: Vector3<f32>, upper: Vector3<f32>, inside_out: bool) {
        self.calls.push(Call::Cuboid(lower, upper, inside_out));
    }

    fn global_increase(&mut self, delta: f32) {
        self.calls.push(Call::Increase(delta));
    }

    fn set_friction(&mut self, friction: f32) {
        self.calls.push(Call::Friction(friction));
    }
}

#[derive(Default)]
struct RecordingStore {
    allocations: Vec<(Vector3<i32>, Vector3<f32>)>,
    registered: u32,
}

impl GeometryStore for RecordingStore {
    type Grid = RecordingGrid;

    fn allocate_grid(&mut self, res: Vector3<i32>, offset: Vector3<f32>) -> Result<RecordingGrid> {
        self.allocations.push((res, offset));
        Ok(RecordingGrid {
            res,
            offset,
            calls: Vec::new(),
        })
    }

    fn register(&mut self, _grid: &RecordingGrid) -> Result<AssetId> {
        let id = AssetId::new(self.registered);
        self.registered += 1;
        Ok(id)
    }
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() <= 1e-4 * b.abs().max(1.0)
}

fn approx_vec(a: Vector3<f32>, b: Vector3<f32>) -> bool {
    approx(a.x, b.x) && approx(a.y, b.y) && approx(a.z, b.z)
}

#[test]
fn test_delta_x_uses_shortest_axis() {
    let mut store = RecordingStore::default();
    let ls = LevelSet3D::new(&mut store, Vector3::new(64, 32, 128)).unwrap();
    assert_eq!(ls.get_delta_x(), 1.0 / 32.0);
    assert_eq!(ls.resolution(), Vector3::new(65, 33, 129));
    assert_eq!(ls.grid().res, Vector3::new(65, 33, 129));
    assert_eq!(ls.grid().offset, Vector3::repeat(0.5));
    assert_eq!(store.allocations.len(), 1);
}

#[test]
fn test_ids_come_from_the_store() {
    let mut store = RecordingStore::default();
    let a = LevelSet3D::new(&mut store, Vector3::new(8, 8, 8)).unwrap();
    let b = LevelSet3D::new(&mut store, Vector3::new(8, 8, 8)).unwrap();
    assert_eq!(a.id(), AssetId::new(0));
    assert_eq!(b.id(), AssetId::new(1));
}

#[test]
fn test_explicit_offset_is_forwarded() {
    let mut store = RecordingStore::default();
    let ls = LevelSet3D::with_offset(&mut store, [16, 16, 16], [0.0, 0.25, 1.0]).unwrap();
    assert_eq!(ls.grid().offset, Vector3::new(0.0, 0.25, 1.0));
}

#[test]
fn test_sphere_in_grid_units() {
    let mut store = RecordingStore::default();
    let mut ls = LevelSet3D::new(&mut store, Vector3::new(255, 255, 255)).unwrap();
    ls.add_sphere([0.5, 0.6, 0.5], 0.05);

    match &ls.grid().calls[..] {
        [Call::Sphere(center, radius, inside_out)] => {
            assert!(approx_vec(*center, Vector3::new(127.5, 153.0, 127.5)), "{}", center);
            assert!(approx(*radius, 12.75), "{}", radius);
            assert!(!inside_out);
        }
        calls => panic!("unexpected calls {:?}", calls),
    }
}

#[test]
fn test_inside_out_flag_is_forwarded() {
    let mut store = RecordingStore::default();
    let mut ls = LevelSet3D::new(&mut store, Vector3::new(10, 10, 10)).unwrap();
    ls.add_sphere_with_inside_out([0.5, 0.5, 0.5], 0.5, true);
    ls.add_cuboid_with_inside_out([0.1, 0.1, 0.1], [0.9, 0.9, 0.9], true);

    let calls = &ls.grid().calls;
    assert!(matches!(calls[0], Call::Sphere(_, _, true)));
    match &calls[1] {
        Call::Cuboid(lower, upper, inside_out) => {
            assert!(approx_vec(*lower, Vector3::repeat(1.0)));
            assert!(approx_vec(*upper, Vector3::repeat(9.0)));
            assert!(*inside_out);
        }
        call => panic!("unexpected call {:?}", call),
    }
}

#[test]
fn test_plane_scales_only_offset() {
    let mut store = RecordingStore::default();
    let mut ls = LevelSet3D::new(&mut store, Vector3::new(100, 200, 100)).unwrap();
    ls.add_plane(0.0, 2.0, 0.0, -0.1);

    match &ls.grid().calls[..] {
        [Call::Plane(normal, d)] => {
            assert_eq!(*normal, Vector3::new(0.0, 2.0, 0.0));
            assert!(approx(*d, -10.0), "{}", d);
        }
        calls => panic!("unexpected calls {:?}", calls),
    }
}

#[test]
fn test_cuboid_corners_in_grid_units() {
    let mut store = RecordingStore::default();
    let mut ls = LevelSet3D::new(&mut store, Vector3::new(64, 64, 64)).unwrap();
    ls.add_cuboid([0.25, 0.0, 0.5], [0.75, 0.125, 1.0]);

    match &ls.grid().calls[..] {
        [Call::Cuboid(lower, upper, false)] => {
            assert_eq!(*lower, Vector3::new(16.0, 0.0, 32.0));
            assert_eq!(*upper, Vector3::new(48.0, 8.0, 64.0));
        }
        calls => panic!("unexpected calls {:?}", calls),
    }
}

#[test]
fn test_increase_scaled_and_friction_unchanged() {
    let mut store = RecordingStore::default();
    let mut ls = LevelSet3D::new(&mut store, Vector3::new(40, 40, 40)).unwrap();
    ls.global_increase(0.05);
    ls.set_friction(0.3);

    match &ls.grid().calls[..] {
        [Call::Increase(delta), Call::Friction(friction)] => {
            assert!(approx(*delta, 2.0), "{}", delta);
            assert_eq!(*friction, 0.3);
        }
        calls => panic!("unexpected calls {:?}", calls),
    }
}

#[test]
fn test_invalid_resolution_allocates_nothing() {
    for res in [
        Vector3::new(0, 10, 10),
        Vector3::new(10, -1, 10),
        Vector3::new(10, 10, 0),
    ] {
        let mut store = RecordingStore::default();
        let result = LevelSet3D::new(&mut store, res);
        match result {
            Err(Error::InvalidResolution { x, y, z }) => {
                assert_eq!(Vector3::new(x, y, z), res);
            }
            other => panic!("expected InvalidResolution, got {:?}", other.map(|l| l.id())),
        }
        assert!(store.allocations.is_empty());
        assert_eq!(store.registered, 0);
    }
}

#[test]
fn test_largest_resolution_fails_cleanly() {
    let mut store = RecordingStore::default();
    let result = LevelSet3D::new(&mut store, [i32::MAX, 4, 4]);
    match result {
        Err(Error::InvalidResolution { x, y, z }) => {
            assert_eq!((x, y, z), (i32::MAX, 4, 4));
        }
        other => panic!("expected InvalidResolution, got {:?}", other.map(|l| l.id())),
    }
    assert!(store.allocations.is_empty());
}

#[test]
fn test_non_finite_offset_rejected() {
    for offset in [[f32::NAN, 0.5, 0.5], [0.5, f32::INFINITY, 0.5]] {
        let mut store = RecordingStore::default();
        let result = LevelSet3D::with_offset(&mut store, [8, 8, 8], offset);
        assert!(matches!(result, Err(Error::InvalidParameter(_))));
        assert!(store.allocations.is_empty());
    }
}
