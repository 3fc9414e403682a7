//! Rendering bridge

use std::collections::BTreeMap;

use glam::{Vec2, Vec4};

/// Opaque visual owned by exactly one entity or absorption effect.
///
/// Deliberately neither `Clone` nor `Copy`: handing it over is a move.
#[derive(Debug, PartialEq, Eq)]
pub struct VisualHandle(u64);

impl VisualHandle {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Host renderer as seen from the simulation
pub trait RenderBridge {
    fn create_visual(&mut self, size: f32, color: Vec4) -> VisualHandle;
    fn update_visual(&mut self, handle: &VisualHandle, position: Vec2, size: f32, color: Vec4);
    /// Reposition only; used by absorption effects
    fn move_visual(&mut self, handle: &VisualHandle, position: Vec2);
    fn destroy_visual(&mut self, handle: VisualHandle);
    /// Raise draw order above food
    fn promote_visual(&mut self, handle: &VisualHandle);
}

/// Last known state of a visual held by [`RecordingRenderer`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualRecord {
    pub position: Vec2,
    pub size: f32,
    pub color: Vec4,
    pub promoted: bool,
}

/// Headless renderer that remembers every live visual
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    next: u64,
    live: BTreeMap<u64, VisualRecord>,
    pub created: usize,
    pub destroyed: usize,
    pub updates: usize,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn get(&self, raw: u64) -> Option<&VisualRecord> {
        self.live.get(&raw)
    }

    pub fn is_live(&self, raw: u64) -> bool {
        self.live.contains_key(&raw)
    }

    /// Live visuals in creation order
    pub fn iter(&self) -> impl Iterator<Item = (u64, &VisualRecord)> {
        self.live.iter().map(|(k, v)| (*k, v))
    }
}

impl RenderBridge for RecordingRenderer {
    fn create_visual(&mut self, size: f32, color: Vec4) -> VisualHandle {
        let raw = self.next;
        self.next += 1;
        self.created += 1;
        self.live.insert(
            raw,
            VisualRecord {
                position: Vec2::ZERO,
                size,
                color,
                promoted: false,
            },
        );
        VisualHandle::new(raw)
    }

    fn update_visual(&mut self, handle: &VisualHandle, position: Vec2, size: f32, color: Vec4) {
        if let Some(record) = self.live.get_mut(&handle.raw()) {
            record.position = position;
            record.size = size;
            record.color = color;
            self.updates += 1;
        } else {
            log::warn!("update for unknown visual {}", handle.raw());
        }
    }

    fn move_visual(&mut self, handle: &VisualHandle, position: Vec2) {
        if let Some(record) = self.live.get_mut(&handle.raw()) {
            record.position = position;
            self.updates += 1;
        }
    }

    fn destroy_visual(&mut self, handle: VisualHandle) {
        if self.live.remove(&handle.raw()).is_some() {
            self.destroyed += 1;
        } else {
            log::warn!("destroy for unknown visual {}", handle.raw());
        }
    }

    fn promote_visual(&mut self, handle: &VisualHandle) {
        if let Some(record) = self.live.get_mut(&handle.raw()) {
            record.promoted = true;
        }
    }
}
