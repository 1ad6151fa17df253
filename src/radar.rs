//! The controller loop and the state it shares with the viewer.
//!
//! Two regions are guarded separately: the map state (displayed grid and
//! marked spots) and the overlay (visible consumed banks, highlighted banks,
//! last known agent position). Each is locked only for the copy or the
//! wholesale replace it guards, never across a redraw request. When both are
//! needed the map state is locked first.
//!
//! The controller polls the host every tick. Keys are handled every tick;
//! movement is checked every `update_every_ticks` ticks and a move triggers
//! a full recenter of the grid.

use crate::config::RadarConfig;
use crate::constants::SAVE_CONFIRMATION;
use crate::error::{Result, StoreError};
use crate::grid::GridState;
use crate::host::{HostWorld, HotKey};
use crate::ledger::{BankRange, ConsumedBankLedger};
use crate::location::*;
use crate::store::{MarkedSpot, MarkedSpotIndex, MarkedSpotStore};
use crate::terrain::TileClassifier;
use crate::visual::{highlight_banks, RadarFrame, RadarViewer};
use fnv::FnvHashSet;
use log::*;
use std::cell::Cell;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Poisoning is ignored: guarded values are only ever copied or replaced
/// whole.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

struct MapState {
    grid: GridState,
    marked_spots: MarkedSpotIndex,
}

#[derive(Clone, Debug, Default)]
struct Overlay {
    visible_consumed: FnvHashSet<BankLocation>,
    highlighted: FnvHashSet<BankLocation>,
    agent: WorldLocation,
    map: MapIndex,
}

/// Radar state shared between the controller loop and the viewer.
pub struct SharedRadar {
    map_state: Mutex<MapState>,
    overlay: Mutex<Overlay>,
}

impl SharedRadar {
    fn new(config: &RadarConfig, marked_spots: MarkedSpotIndex) -> Self {
        SharedRadar {
            map_state: Mutex::new(MapState {
                grid: GridState::empty(config),
                marked_spots,
            }),
            overlay: Mutex::new(Overlay::default()),
        }
    }

    /// Copy of everything needed to paint.
    pub fn frame(&self) -> RadarFrame {
        let state = lock(&self.map_state);
        let marked_spots = state.marked_spots.for_map(state.grid.map()).to_vec();
        let grid = state.grid.clone();
        let overlay = lock(&self.overlay).clone();
        drop(state);

        RadarFrame {
            grid,
            visible_consumed: overlay.visible_consumed,
            highlighted: overlay.highlighted,
            marked_spots,
            agent: overlay.agent,
        }
    }

    /// Highlight the banks reachable from the clicked tile until the next
    /// recenter. Returns the highlighted set.
    ///
    /// The grid stays locked until the highlight is stored, so a click never
    /// outlives the grid it was computed from.
    pub fn click(&self, pos: GridPos) -> FnvHashSet<BankLocation> {
        let state = lock(&self.map_state);
        let banks = highlight_banks(&state.grid, pos);
        lock(&self.overlay).highlighted = banks.clone();
        banks
    }

    pub fn highlighted(&self) -> FnvHashSet<BankLocation> {
        lock(&self.overlay).highlighted.clone()
    }

    pub fn visible_consumed(&self) -> FnvHashSet<BankLocation> {
        lock(&self.overlay).visible_consumed.clone()
    }

    pub fn grid(&self) -> GridState {
        lock(&self.map_state).grid.clone()
    }

    fn begin_recenter(
        &self,
        agent: WorldLocation,
        map: MapIndex,
        visible: FnvHashSet<BankLocation>,
    ) {
        let mut overlay = lock(&self.overlay);
        overlay.visible_consumed = visible;
        overlay.agent = agent;
        overlay.map = map;
    }

    /// Swap in a rebuilt grid and drop the highlight of the old one.
    fn replace_grid(&self, grid: GridState) {
        let mut state = lock(&self.map_state);
        state.grid = grid;
        lock(&self.overlay).highlighted.clear();
    }

    fn with_map_state<R>(&self, f: impl FnOnce(&mut MapState) -> R) -> R {
        f(&mut lock(&self.map_state))
    }

    fn with_overlay<R>(&self, f: impl FnOnce(&mut Overlay) -> R) -> R {
        f(&mut lock(&self.overlay))
    }
}

/// Decides when the loop should stop, besides the viewer closing.
pub struct TickBudget {
    should_continue: Box<dyn Fn() -> bool>,
}

impl TickBudget {
    pub fn new<F: Fn() -> bool + 'static>(should_continue: F) -> Self {
        TickBudget {
            should_continue: Box::new(should_continue),
        }
    }

    /// Run until the viewer closes.
    pub fn unlimited() -> Self {
        TickBudget::new(|| true)
    }

    /// Run at most `count` ticks.
    pub fn ticks(count: u64) -> Self {
        let remaining = Cell::new(count);
        TickBudget::new(move || {
            let left = remaining.get();
            if left == 0 {
                false
            } else {
                remaining.set(left - 1);
                true
            }
        })
    }

    pub fn has_budget(&self) -> bool {
        (self.should_continue)()
    }
}

/// What one tick did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Idle,
    Recomputed,
    ViewerClosed,
}

pub struct RadarController<H: HostWorld> {
    host: H,
    config: RadarConfig,
    classifier: TileClassifier,
    store: MarkedSpotStore,
    ledger: ConsumedBankLedger,
    shared: Arc<SharedRadar>,
    last_key: Option<HotKey>,
    last_seen: Option<(WorldLocation, MapIndex)>,
    tick: u32,
}

impl<H: HostWorld> RadarController<H> {
    /// Load the spot history and seed the ledger from it.
    pub fn new(host: H, config: RadarConfig) -> Result<Self> {
        Self::with_classifier(host, config, TileClassifier::default())
    }

    pub fn with_classifier(
        host: H,
        config: RadarConfig,
        classifier: TileClassifier,
    ) -> Result<Self> {
        let store = MarkedSpotStore::new(
            config.store_path.clone(),
            config.number_of_maps,
            config.load_policy,
        );

        let mut ledger = ConsumedBankLedger::new();
        let mut marked_spots = MarkedSpotIndex::new();
        let spots = store.load_all()?;
        for spot in &spots {
            marked_spots.push(spot.map, spot.location);
            spot.consume_into(&mut ledger, config.bank_span());
        }

        info!(
            "Loaded {} marked spots from {}, {} banks consumed",
            spots.len(),
            store.path().display(),
            ledger.total()
        );

        let shared = Arc::new(SharedRadar::new(&config, marked_spots));
        let last_key = host.last_hot_key();

        Ok(RadarController {
            host,
            config,
            classifier,
            store,
            ledger,
            shared,
            last_key,
            last_seen: None,
            tick: 0,
        })
    }

    /// Handle for the viewer thread.
    pub fn shared(&self) -> Arc<SharedRadar> {
        self.shared.clone()
    }

    pub fn ledger(&self) -> &ConsumedBankLedger {
        &self.ledger
    }

    pub fn config(&self) -> &RadarConfig {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// One pass of the loop: keys every tick, movement every
    /// `update_every_ticks` ticks.
    pub fn tick<V: RadarViewer + ?Sized>(&mut self, viewer: &V) -> Result<TickOutcome> {
        if !viewer.is_visible() {
            return Ok(TickOutcome::ViewerClosed);
        }

        self.handle_key(viewer)?;

        self.tick += 1;
        if self.tick < self.config.update_every_ticks {
            return Ok(TickOutcome::Idle);
        }
        self.tick = 0;

        if !self.update() {
            return Ok(TickOutcome::Idle);
        }

        if viewer.is_visible() {
            viewer.request_redraw();
            Ok(TickOutcome::Recomputed)
        } else {
            Ok(TickOutcome::ViewerClosed)
        }
    }

    /// Save the spot if a new press of the save key arrived.
    pub fn handle_key<V>(&mut self, viewer: &V) -> Result<Option<MarkedSpot>>
    where
        V: RadarViewer + ?Sized,
    {
        let Some(key) = self.host.last_hot_key() else {
            return Ok(None);
        };

        if let Some(last) = &self.last_key {
            if last.timestamp >= key.timestamp {
                return Ok(None);
            }
        }

        let is_save = key.key == self.config.save_key;
        self.last_key = Some(key);

        if !is_save {
            return Ok(None);
        }

        self.save_spot(viewer)
    }

    /// Recenter on the agent if it moved or changed map since the last
    /// update. Returns whether the grid was rebuilt.
    pub fn update(&mut self) -> bool {
        let position = self.host.agent_position();
        let map = self.host.map_index();

        if self.last_seen == Some((position, map)) {
            return false;
        }
        self.last_seen = Some((position, map));

        let visible = self.ledger.visible_subset(map, &self.window_banks(position));
        self.shared.begin_recenter(position, map, visible.clone());

        let grid = GridState::recenter(
            position,
            map,
            &self.host,
            &self.classifier,
            &visible,
            &self.config,
        );
        self.shared.replace_grid(grid);

        true
    }

    /// Record the displayed center tile and the tiles it reaches. No rescan
    /// happens: what is saved is what was on screen. Spots on a map index the
    /// store cannot read back are refused.
    pub fn save_spot<V: RadarViewer + ?Sized>(&mut self, viewer: &V) -> Result<Option<MarkedSpot>> {
        if self.last_seen.is_none() {
            debug!("Ignoring save request, nothing scanned yet");
            return Ok(None);
        }

        let store = &self.store;
        let ledger = &mut self.ledger;
        let bank_size = self.config.bank_span();
        let number_of_maps = self.config.number_of_maps;

        let saved = self.shared.with_map_state(|state| {
            let map = state.grid.map();
            if map >= number_of_maps {
                warn!(
                    "Not saving spot {}: map {} is outside the {} known maps",
                    state.grid.center(),
                    map,
                    number_of_maps
                );
                return Ok(None);
            }

            let spot = MarkedSpot::new(
                state.grid.center(),
                map,
                state.grid.center_tile().reachable_tiles.clone(),
            );
            store.append(&spot)?;
            state.marked_spots.push(spot.map, spot.location);
            spot.consume_into(ledger, bank_size);
            Ok::<_, StoreError>(Some(spot))
        })?;

        let Some(spot) = saved else {
            return Ok(None);
        };

        info!(
            "Saved spot {} on map {} exposing {} tile(s)",
            spot.location,
            spot.map,
            spot.tiles.len()
        );
        self.host.notify_user(SAVE_CONFIRMATION);

        let ledger = &self.ledger;
        let config = &self.config;
        self.shared.with_overlay(|overlay| {
            let range = window_banks(config, overlay.agent);
            overlay.visible_consumed = ledger.visible_subset(overlay.map, &range);
        });

        if viewer.is_visible() {
            viewer.request_redraw();
        }

        Ok(Some(spot))
    }

    fn window_banks(&self, center: WorldLocation) -> BankRange {
        window_banks(&self.config, center)
    }
}

fn window_banks(config: &RadarConfig, center: WorldLocation) -> BankRange {
    let half = config.center_index() as i32;
    BankRange::covering(
        center.offset(-half, -half),
        center.offset(half, half),
        config.bank_span(),
    )
}

/// Drive the controller until the viewer closes or the budget runs out,
/// sleeping one tick interval between ticks.
pub fn run_radar<H, V>(
    controller: &mut RadarController<H>,
    viewer: &V,
    budget: &TickBudget,
) -> Result<()>
where
    H: HostWorld,
    V: RadarViewer + ?Sized,
{
    while budget.has_budget() {
        if controller.tick(viewer)? == TickOutcome::ViewerClosed {
            debug!("Radar viewer closed, stopping");
            break;
        }
        std::thread::sleep(controller.config().tick_interval());
    }
    Ok(())
}
