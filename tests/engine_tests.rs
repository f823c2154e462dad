use hashlife_engine::Config;
use hashlife_engine::EngineError;
use hashlife_engine::ErrorKind;
use hashlife_engine::NodeStore;
use hashlife_engine::Simulation;
use hashlife_engine::Viewport;

const GLIDER: [(i64, i64); 5] = [(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)];
const BLINKER: [(i64, i64); 3] = [(0, 1), (1, 1), (2, 1)];
const BLOCK: [(i64, i64); 4] = [(1, 1), (2, 1), (1, 2), (2, 2)];

fn shifted(points: &[(i64, i64)], dx: i64, dy: i64) -> Vec<(i64, i64)> {
    points.iter().map(|&(x, y)| (x + dx, y + dy)).collect()
}

#[test]
fn glider_after_4_generations() {
    let mut store = NodeStore::new();

    let root = store.construct(&GLIDER).unwrap();
    let next = store.advance(root, 4).unwrap();

    // The 4x4 root is centred on (2, 2), which stays fixed: the result is the 8x8 around it,
    // with the glider one cell further down and right
    let expected = store.construct(&shifted(&GLIDER, 2 + 1, 2 + 1)).unwrap();

    assert_eq!(next, expected);
    assert_eq!(store.population(next), 5);
}

#[test]
fn advance_zero_is_identity() {
    let mut store = NodeStore::new();

    for points in [&GLIDER[..], &BLINKER[..], &[]] {
        let root = store.construct(points).unwrap();
        assert_eq!(store.advance(root, 0).unwrap(), root);
    }
}

#[test]
fn advance_is_additive() {
    let mut store = NodeStore::new();

    for points in [&GLIDER[..], &BLINKER[..]] {
        let root = store.construct(points).unwrap();

        let three = store.advance(root, 3).unwrap();
        let eight = store.advance(three, 5).unwrap();

        assert_eq!(store.advance(root, 8).unwrap(), eight);
    }
}

#[test]
fn blinker_has_period_2() {
    let mut store = NodeStore::new();

    let root = store.construct(&BLINKER).unwrap();
    let cropped = store.crop(root).unwrap();

    let one = store.advance(root, 1).unwrap();
    assert_ne!(one, cropped);
    assert_eq!(store.population(one), 3);

    assert_eq!(store.advance(root, 2).unwrap(), cropped);
    assert_eq!(store.advance(one, 1).unwrap(), cropped);
    assert_eq!(store.advance(root, 1000).unwrap(), cropped);
}

#[test]
fn block_is_still() {
    let mut store = NodeStore::new();

    let root = store.construct(&BLOCK).unwrap();
    let cropped = store.crop(root).unwrap();

    for generations in [1, 2, 7, 64, 1 << 20] {
        assert_eq!(store.advance(root, generations).unwrap(), cropped);
    }
}

#[test]
fn round_trip() {
    let mut store = NodeStore::new();

    let points = [(0, 0), (1, 0), (0, 1)];
    let root = store.construct(&points).unwrap();

    assert_eq!(store.level(root), 2);
    assert_eq!(store.population(root), 3);

    let mut view = Viewport::new(-4, -4, 16, 16);
    store.expand(root, 0, 0, &mut view);

    let mut cells: Vec<_> = view.live_cells().collect();
    cells.sort();
    assert_eq!(cells, [(0, 0), (0, 1), (1, 0)]);
}

#[test]
fn glider_after_1024_generations() {
    let mut sim = Simulation::from_points(Config::default(), &GLIDER).unwrap();

    sim.advance(1024).unwrap();

    assert_eq!(sim.generation(), 1024);
    assert_eq!(sim.population(), 5);

    let mut view = Viewport::new(250, 250, 16, 16);
    sim.expand(&mut view);

    let mut cells: Vec<_> = view.live_cells().collect();
    let mut expected = shifted(&GLIDER, 256, 256);
    cells.sort();
    expected.sort();

    assert_eq!(cells, expected);
}

#[test]
fn memo_does_not_change_results() {
    let mut memo = Simulation::from_points(Config::default(), &GLIDER).unwrap();
    let mut plain =
        Simulation::from_points(Config::default().with_memoize(false), &GLIDER).unwrap();

    for generations in [1, 6, 3] {
        memo.advance(generations).unwrap();
        plain.advance(generations).unwrap();

        let (mut a, mut b) = (Viewport::new(-8, -8, 32, 32), Viewport::new(-8, -8, 32, 32));
        memo.expand(&mut a);
        plain.expand(&mut b);

        assert_eq!(a, b);
        assert_eq!(memo.origin(), plain.origin());
    }
}

#[test]
fn glider_snapshot() {
    let mut sim = Simulation::from_points(Config::default(), &GLIDER).unwrap();
    sim.advance(4).unwrap();

    let mut view = Viewport::new(0, 0, 5, 5);
    sim.expand(&mut view);

    insta::assert_snapshot!(view.to_string(), @r"
    .....
    ..*..
    ...*.
    .***.
    .....
    ");
}

#[test]
fn depth_limit_stops_advance() {
    let mut store = NodeStore::with_config(Config::default().with_max_depth(8));

    let root = store.construct(&GLIDER).unwrap();
    let err = store.advance(root, 1 << 10).unwrap_err();

    assert!(matches!(err, EngineError::DepthLimit { max: 8, .. }));
    assert_eq!(err.kind(), ErrorKind::ResourceLimit);
}
