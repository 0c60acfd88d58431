// ── Reactive dashboard store ──
//
// Single source of truth for everything the UI renders. Each slice
// lives behind a `tokio::sync::watch` channel so consumers can either
// read the latest value or subscribe for changes.
//
// Refreshes are sequenced with a monotonic generation counter: a fetch
// takes a generation *before* it hits the network and presents it with
// its result. The store rejects any result whose generation is not
// newer than the last applied one, so a slow in-flight fetch can never
// clobber fresher state.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::debug;

use crate::model::{Device, EventRecord, SensorSnapshot, Session, StateSnapshot};

/// Reactive store of dashboard state.
#[derive(Debug)]
pub struct DashboardStore {
    devices: watch::Sender<Arc<Vec<Device>>>,
    sensors: watch::Sender<Option<SensorSnapshot>>,
    events: watch::Sender<Arc<Vec<EventRecord>>>,
    session: watch::Sender<Option<Session>>,
    last_refresh: watch::Sender<Option<DateTime<Utc>>>,

    /// Next generation to hand out.
    next_gen: AtomicU64,
    /// Highest generation applied so far. The lock also serializes
    /// apply calls so all watch channels update as a unit.
    applied: Mutex<u64>,
}

impl Default for DashboardStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardStore {
    pub fn new() -> Self {
        Self {
            devices: watch::Sender::new(Arc::new(Vec::new())),
            sensors: watch::Sender::new(None),
            events: watch::Sender::new(Arc::new(Vec::new())),
            session: watch::Sender::new(None),
            last_refresh: watch::Sender::new(None),
            next_gen: AtomicU64::new(1),
            applied: Mutex::new(0),
        }
    }

    /// Reserve a generation for a refresh that is about to start.
    pub fn begin_refresh(&self) -> u64 {
        self.next_gen.fetch_add(1, Ordering::Relaxed)
    }

    /// Apply a full snapshot fetched under `generation`.
    ///
    /// Returns `false` (and changes nothing) when a newer snapshot has
    /// already been applied.
    pub fn apply_state(&self, generation: u64, snapshot: StateSnapshot) -> bool {
        let mut applied = self.applied.lock().unwrap_or_else(|e| e.into_inner());
        if generation <= *applied {
            debug!(generation, applied = *applied, "discarding stale snapshot");
            return false;
        }
        *applied = generation;

        self.devices.send_replace(Arc::new(snapshot.devices));
        self.sensors.send_replace(Some(snapshot.sensors));
        self.events.send_replace(Arc::new(snapshot.events));
        self.session.send_replace(Some(snapshot.session));
        self.last_refresh.send_replace(Some(Utc::now()));
        true
    }

    /// Apply an events-only refresh. Same sequencing rules as
    /// [`apply_state`](Self::apply_state), but the other slices are
    /// left untouched.
    pub fn apply_events(&self, generation: u64, events: Vec<EventRecord>) -> bool {
        let mut applied = self.applied.lock().unwrap_or_else(|e| e.into_inner());
        if generation <= *applied {
            debug!(generation, applied = *applied, "discarding stale events");
            return false;
        }
        *applied = generation;

        self.events.send_replace(Arc::new(events));
        true
    }

    /// Drop all cached state (used on disconnect).
    pub fn clear(&self) {
        let mut applied = self.applied.lock().unwrap_or_else(|e| e.into_inner());
        *applied = self.next_gen.fetch_add(1, Ordering::Relaxed);

        self.devices.send_replace(Arc::new(Vec::new()));
        self.sensors.send_replace(None);
        self.events.send_replace(Arc::new(Vec::new()));
        self.session.send_replace(None);
        self.last_refresh.send_replace(None);
    }

    // ── Point-in-time accessors ──────────────────────────────────────

    pub fn devices(&self) -> Arc<Vec<Device>> {
        self.devices.borrow().clone()
    }

    pub fn sensors(&self) -> Option<SensorSnapshot> {
        *self.sensors.borrow()
    }

    pub fn events(&self) -> Arc<Vec<EventRecord>> {
        self.events.borrow().clone()
    }

    pub fn session(&self) -> Option<Session> {
        self.session.borrow().clone()
    }

    /// Whether the current session carries the admin role.
    pub fn is_admin(&self) -> bool {
        self.session
            .borrow()
            .as_ref()
            .is_some_and(|s| s.role.is_admin())
    }

    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        *self.last_refresh.borrow()
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe_devices(&self) -> watch::Receiver<Arc<Vec<Device>>> {
        self.devices.subscribe()
    }

    pub fn subscribe_sensors(&self) -> watch::Receiver<Option<SensorSnapshot>> {
        self.sensors.subscribe()
    }

    pub fn subscribe_events(&self) -> watch::Receiver<Arc<Vec<EventRecord>>> {
        self.events.subscribe()
    }

    pub fn subscribe_session(&self) -> watch::Receiver<Option<Session>> {
        self.session.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;

    fn snapshot(devices: &[(&str, bool)], temperature: f64) -> StateSnapshot {
        StateSnapshot {
            devices: devices
                .iter()
                .map(|(name, on)| Device {
                    name: (*name).to_string(),
                    on: *on,
                })
                .collect(),
            sensors: SensorSnapshot {
                temperature,
                motion: false,
                door_open: false,
                smoke: false,
            },
            events: Vec::new(),
            session: Session {
                user: "alice".into(),
                role: Role::new("admin"),
            },
        }
    }

    #[test]
    fn snapshots_apply_in_order() {
        let store = DashboardStore::new();
        let g1 = store.begin_refresh();
        let g2 = store.begin_refresh();

        assert!(store.apply_state(g1, snapshot(&[("luz", true)], 20.0)));
        assert!(store.apply_state(g2, snapshot(&[("luz", false)], 21.0)));

        assert!(!store.devices()[0].on);
        assert_eq!(store.sensors().expect("sensors").temperature, 21.0);
        assert!(store.is_admin());
        assert!(store.last_refresh().is_some());
    }

    #[test]
    fn stale_snapshot_is_discarded() {
        let store = DashboardStore::new();
        let slow = store.begin_refresh();
        let fast = store.begin_refresh();

        // The later fetch finishes first.
        assert!(store.apply_state(fast, snapshot(&[("luz", false)], 21.0)));
        // The earlier one straggles in and must be rejected.
        assert!(!store.apply_state(slow, snapshot(&[("luz", true)], 20.0)));

        assert!(!store.devices()[0].on);
        assert_eq!(store.sensors().expect("sensors").temperature, 21.0);
    }

    #[test]
    fn events_refresh_leaves_other_slices_untouched() {
        let store = DashboardStore::new();
        let g = store.begin_refresh();
        assert!(store.apply_state(g, snapshot(&[("luz", true)], 20.0)));

        let mut devices_rx = store.subscribe_devices();
        devices_rx.mark_unchanged();

        let g = store.begin_refresh();
        let event = EventRecord {
            timestamp: "2024-01-01 10:00:00".into(),
            user: "alice".into(),
            action: "toggle".into(),
            device: Some("luz".into()),
            extra: None,
        };
        assert!(store.apply_events(g, vec![event]));

        assert_eq!(store.events().len(), 1);
        assert_eq!(store.devices().len(), 1);
        assert!(!devices_rx.has_changed().expect("sender alive"));
    }

    #[test]
    fn clear_resets_everything_and_fences_inflight_fetches() {
        let store = DashboardStore::new();
        let g = store.begin_refresh();
        assert!(store.apply_state(g, snapshot(&[("luz", true)], 20.0)));

        let inflight = store.begin_refresh();
        store.clear();

        assert!(store.devices().is_empty());
        assert!(store.sensors().is_none());
        assert!(store.session().is_none());
        // A fetch started before the clear must not resurrect state.
        assert!(!store.apply_state(inflight, snapshot(&[("luz", true)], 20.0)));
    }
}
