use bank_radar::*;
use fnv::FnvHashSet;
use std::cell::{Cell, RefCell};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

const ORE: u16 = 0xDC;
const WALL: u16 = 0x1;

struct Host {
    terrain: StaticTerrain,
    position: Cell<WorldLocation>,
    key: RefCell<Option<HotKey>>,
}

impl Host {
    fn new(terrain: StaticTerrain, position: WorldLocation) -> Self {
        Host {
            terrain,
            position: Cell::new(position),
            key: RefCell::new(None),
        }
    }
}

impl TerrainSource for Host {
    fn terrain_id_at(&self, location: WorldLocation, map: MapIndex) -> Option<u16> {
        self.terrain.terrain_id_at(location, map)
    }

    fn is_impassable(&self, terrain_id: u16) -> bool {
        self.terrain.is_impassable(terrain_id)
    }
}

impl HostWorld for Host {
    fn agent_position(&self) -> WorldLocation {
        self.position.get()
    }

    fn map_index(&self) -> MapIndex {
        0
    }

    fn last_hot_key(&self) -> Option<HotKey> {
        self.key.borrow().clone()
    }

    fn notify_user(&self, _message: &str) {}
}

#[derive(Default)]
struct Viewer {
    closed: AtomicBool,
    redraws: AtomicUsize,
}

impl RadarViewer for Viewer {
    fn is_visible(&self) -> bool {
        !self.closed.load(Ordering::SeqCst)
    }

    fn request_redraw(&self) {
        self.redraws.fetch_add(1, Ordering::SeqCst);
    }
}

fn small_bank_terrain() -> StaticTerrain {
    let mut terrain = StaticTerrain::new();
    terrain.fill(0, WorldLocation::new(4, 4), WorldLocation::new(5, 5), ORE);
    terrain
}

fn small_config(dir: &tempfile::TempDir) -> RadarConfig {
    RadarConfig::default()
        .visible_range(2)
        .bank_size(2)
        .update_every_ticks(1)
        .tick_interval_ms(0)
        .store_path(dir.path().join("mining-spots.txt"))
}

#[test]
fn test_single_bank_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let config = small_config(&dir);
    let terrain = small_bank_terrain();
    let classifier = TileClassifier::default();

    let grid = GridState::recenter(
        WorldLocation::new(4, 4),
        0,
        &terrain,
        &classifier,
        &FnvHashSet::default(),
        &config,
    );
    assert_eq!(grid.side(), 5);
    let center = grid.center_tile();
    assert_eq!(center.reachable_banks, 1);
    assert_eq!(center.reachable_tiles, vec![WorldLocation::new(4, 4)]);
    assert_eq!(center.reachable_bank_set(2), vec![BankLocation::new(2, 2)]);

    let store = MarkedSpotStore::new(&config.store_path, 6, LoadPolicy::Strict);
    let mut ledger = ConsumedBankLedger::new();
    let spot = MarkedSpot::new(grid.center(), grid.map(), center.reachable_tiles.clone());
    store.append(&spot).unwrap();
    spot.consume_into(&mut ledger, 2);

    let contents = std::fs::read_to_string(&config.store_path).unwrap();
    assert_eq!(contents, "4,4,0|4,4\n");
    assert!(ledger.contains(0, BankLocation::new(2, 2)));

    let (min, max) = grid.world_bounds();
    let visible = ledger.visible_subset(0, &BankRange::covering(min, max, 2));
    let rescanned = GridState::recenter(
        WorldLocation::new(4, 4),
        0,
        &terrain,
        &classifier,
        &visible,
        &config,
    );
    assert_eq!(rescanned.center_tile().reachable_banks, 0);
    assert!(rescanned.center_tile().reachable_tiles.is_empty());
}

#[test]
fn test_store_round_trip_reseeds_ledger() {
    let dir = tempfile::tempdir().unwrap();
    let config = small_config(&dir);
    let store = MarkedSpotStore::new(&config.store_path, 6, LoadPolicy::Strict);
    let spot = MarkedSpot::new(
        WorldLocation::new(1450, 1600),
        3,
        vec![
            WorldLocation::new(1449, 1598),
            WorldLocation::new(1452, 1600),
            WorldLocation::new(1447, 1602),
        ],
    );
    store.append(&spot).unwrap();

    let loaded = MarkedSpotStore::new(&config.store_path, 6, LoadPolicy::Strict)
        .load_all()
        .unwrap();
    assert_eq!(loaded, vec![spot.clone()]);

    let mut ledger = ConsumedBankLedger::new();
    for spot in &loaded {
        spot.consume_into(&mut ledger, 8);
    }
    let expected: FnvHashSet<BankLocation> = spot.banks(8).collect();
    assert_eq!(ledger.len(3), expected.len());
    assert!(expected.iter().all(|bank| ledger.contains(3, *bank)));
}

#[test]
fn test_controller_save_and_reload() {
    let dir = tempfile::tempdir().unwrap();
    let viewer = Viewer::default();

    {
        let host = Host::new(small_bank_terrain(), WorldLocation::new(4, 4));
        let mut radar = RadarController::new(host, small_config(&dir)).unwrap();
        assert_eq!(radar.tick(&viewer).unwrap(), TickOutcome::Recomputed);

        *radar.host().key.borrow_mut() = Some(HotKey::new("S", 1));
        radar.tick(&viewer).unwrap();
        assert!(radar.ledger().contains(0, BankLocation::new(2, 2)));
    }

    let host = Host::new(small_bank_terrain(), WorldLocation::new(4, 4));
    let mut radar = RadarController::new(host, small_config(&dir)).unwrap();
    assert!(radar.ledger().contains(0, BankLocation::new(2, 2)));
    radar.tick(&viewer).unwrap();

    let frame = radar.shared().frame();
    assert_eq!(frame.grid.center_tile().reachable_banks, 0);
    assert_eq!(frame.marked_spots, vec![WorldLocation::new(4, 4)]);
    let center = frame
        .paint_plan()
        .into_iter()
        .find(|p| p.pos == frame.grid.center_pos())
        .unwrap();
    assert_eq!(center.label, Some(TileLabel::Consumed));
}

#[test]
fn test_viewer_thread_reads_consistent_frames() {
    let dir = tempfile::tempdir().unwrap();
    let mut terrain = StaticTerrain::new();
    for x in -20..20 {
        terrain.set_tile(0, WorldLocation::new(x, 3), ORE);
        terrain.set_tile(0, WorldLocation::new(x, -5), WALL);
    }
    terrain.mark_impassable(WALL);

    let config = RadarConfig::default()
        .visible_range(6)
        .update_every_ticks(1)
        .tick_interval_ms(0)
        .store_path(dir.path().join("spots.txt"));
    let host = Host::new(terrain, WorldLocation::new(-10, 0));
    let mut radar = RadarController::new(host, config).unwrap();
    let shared: Arc<SharedRadar> = radar.shared();
    let stop = Arc::new(AtomicBool::new(false));

    let reader = {
        let shared = shared.clone();
        let stop = stop.clone();
        std::thread::spawn(move || {
            let mut frames = 0;
            loop {
                let frame = shared.frame();
                for (_, tile) in frame.grid.tiles().iter() {
                    let banks = tile.reachable_bank_set(frame.grid.bank_size());
                    assert_eq!(tile.reachable_banks as usize, banks.len());
                    assert!(tile.reachable_tiles.len() == banks.len());
                }
                shared.click(frame.grid.center_pos());
                frames += 1;
                if stop.load(Ordering::SeqCst) {
                    break;
                }
            }
            frames
        })
    };

    let viewer = Viewer::default();
    for step in 0..20 {
        radar.host().position.set(WorldLocation::new(-10 + step, step % 3));
        assert_eq!(radar.tick(&viewer).unwrap(), TickOutcome::Recomputed);
    }
    stop.store(true, Ordering::SeqCst);

    let frames = reader.join().unwrap();
    assert!(frames > 0);
    assert_eq!(viewer.redraws.load(Ordering::SeqCst), 20);
    assert_eq!(shared.grid().center(), WorldLocation::new(9, 1));
}
