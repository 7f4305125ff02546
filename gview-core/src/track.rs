//! Track kinds, instances, and the registry that constructs them.
//!
//! Track behavior lives behind the `TrackOps` trait so new kinds plug in
//! without touching the dispatcher. Instances keep per-subpanel load
//! state and report which subpanels need a reload after the view's
//! subpanel set changes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, LayoutResult};
use crate::subpanel::{SubpanelKey, SubpanelSet};
use crate::view::ViewState;

/// The behavior of one track kind.
pub trait TrackOps {
    /// Kind identifier, matching the registry key.
    fn kind(&self) -> &str;

    /// Build an instance from a JSON template block.
    fn from_template(&self, template: &serde_json::Value) -> anyhow::Result<TrackInstance>;

    /// One-time setup after the instance joins a view.
    fn initialize(&self, instance: &mut TrackInstance, view: &ViewState) {
        let _ = view;
        instance.initialized = true;
    }

    /// Fetch and lay out data for the current view range.
    fn load(&self, instance: &mut TrackInstance, view: &ViewState) -> anyhow::Result<()>;
}

/// Load state for one subpanel of one track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackSubpanelState {
    pub key: SubpanelKey,
    pub loaded: bool,
}

/// A configured track in a view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackInstance {
    pub kind: String,
    pub name: String,
    pub initialized: bool,
    pub subpanel_state: Vec<TrackSubpanelState>,
}

impl TrackInstance {
    pub fn new(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
            initialized: false,
            subpanel_state: Vec::new(),
        }
    }

    /// Reconcile this track's subpanel state with the view's subpanel set.
    /// Returns the indices of subpanels whose data must be (re)loaded:
    /// panels that are new to this track or whose identity key changed.
    /// Identity is positional plus key, so a same-locus panel on another
    /// track stays in sync without refetching.
    pub fn sync_subpanels(&mut self, panels: &SubpanelSet) -> Vec<usize> {
        let keys = panels.keys();
        let mut stale = Vec::new();
        let mut next = Vec::with_capacity(keys.len());
        for (index, key) in keys.into_iter().enumerate() {
            let carried = self
                .subpanel_state
                .get(index)
                .filter(|s| s.key == key)
                .map(|s| s.loaded)
                .unwrap_or(false);
            if !carried {
                stale.push(index);
            }
            next.push(TrackSubpanelState {
                key,
                loaded: carried,
            });
        }
        if !stale.is_empty() {
            log::debug!(
                "track {}: {} subpanel(s) need reload: {stale:?}",
                self.name,
                stale.len()
            );
        }
        self.subpanel_state = next;
        stale
    }

    pub fn mark_loaded(&mut self, index: usize) {
        if let Some(state) = self.subpanel_state.get_mut(index) {
            state.loaded = true;
        }
    }
}

/// Maps kind identifiers to their `TrackOps` implementation.
#[derive(Default)]
pub struct TrackRegistry {
    kinds: HashMap<String, Box<dyn TrackOps>>,
}

impl TrackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, ops: Box<dyn TrackOps>) {
        self.kinds.insert(ops.kind().to_string(), ops);
    }

    pub fn get(&self, kind: &str) -> LayoutResult<&dyn TrackOps> {
        self.kinds
            .get(kind)
            .map(|b| b.as_ref())
            .ok_or_else(|| LayoutError::unknown_track_kind(kind))
    }

    /// Construct an instance from a template block. The block's `type`
    /// field selects the kind.
    pub fn create(&self, template: &serde_json::Value) -> anyhow::Result<TrackInstance> {
        let kind = template
            .get("type")
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow::anyhow!("track template is missing a \"type\" field"))?;
        let ops = self.get(kind)?;
        ops.from_template(template)
    }

    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.kinds.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }
}
