//! In-process graph for tests and lightweight embedding.
//!
//! `MemoryGraph` implements the [`Graph`] capability over plain locked
//! maps. Hosts with a real document model implement [`Graph`] themselves;
//! this one exists so the runtime can be exercised (and tested) without
//! an application around it.

use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use weft_ir::{Frame, FrameId, ItemId, ItemKind, Statement};

use crate::host::Graph;

#[derive(Clone, Debug)]
struct ItemRecord {
    frame: FrameId,
    kind: ItemKind,
    x: i64,
    y: i64,
    text: String,
    link: Option<FrameId>,
}

#[derive(Default)]
struct GraphState {
    frames: FxHashMap<FrameId, Arc<Frame>>,
    items: FxHashMap<ItemId, ItemRecord>,
    next_frame: u32,
    next_item: u32,
}

/// A self-contained frame graph held in memory.
#[derive(Default)]
pub struct MemoryGraph {
    state: Mutex<GraphState>,
}

impl MemoryGraph {
    pub fn new() -> MemoryGraph {
        MemoryGraph::default()
    }

    /// Add a frame with a prepared body.
    pub fn add_frame(&self, title: &str, body: Vec<Statement>) -> FrameId {
        let mut state = self.state.lock();
        let id = FrameId(state.next_frame);
        state.next_frame += 1;
        let frame = Frame {
            id,
            title: title.to_string(),
            body: body.into_iter().map(Arc::new).collect(),
        };
        state.frames.insert(id, Arc::new(frame));
        id
    }

    /// Point a body statement's link at a target frame.
    ///
    /// Frames are immutable snapshots, so the statement (and its parse
    /// cache) is rebuilt. Used to wire links that point at frames created
    /// later, including cycles.
    pub fn relink(&self, frame: FrameId, index: usize, target: FrameId) -> bool {
        let mut state = self.state.lock();
        let Some(old) = state.frames.get(&frame) else {
            return false;
        };
        let mut body = old.body.clone();
        let Some(slot) = body.get_mut(index) else {
            return false;
        };
        let mut stmt = Statement::new(slot.text.clone()).with_link(target);
        if let Some(item) = slot.item {
            stmt = stmt.with_item(item);
        }
        *slot = Arc::new(stmt);
        let title = old.title.clone();
        state.frames.insert(frame, Arc::new(Frame { id: frame, title, body }));
        true
    }

    /// Give an existing item a child link.
    pub fn set_item_link(&self, item: ItemId, target: FrameId) -> bool {
        let mut state = self.state.lock();
        match state.items.get_mut(&item) {
            Some(record) => {
                record.link = Some(target);
                true
            }
            None => false,
        }
    }

    fn insert_item(state: &mut GraphState, record: ItemRecord) -> ItemId {
        let id = ItemId(state.next_item);
        state.next_item += 1;
        state.items.insert(id, record);
        id
    }
}

impl Graph for MemoryGraph {
    fn frame(&self, id: FrameId) -> Option<Arc<Frame>> {
        self.state.lock().frames.get(&id).cloned()
    }

    fn frame_by_title(&self, title: &str) -> Option<FrameId> {
        let state = self.state.lock();
        let mut ids: Vec<FrameId> = state
            .frames
            .values()
            .filter(|f| f.title == title)
            .map(|f| f.id)
            .collect();
        ids.sort_unstable();
        ids.first().copied()
    }

    fn create_frame(&self, title: &str) -> FrameId {
        self.add_frame(title, Vec::new())
    }

    fn delete_frame(&self, id: FrameId) -> bool {
        let mut state = self.state.lock();
        if state.frames.remove(&id).is_none() {
            return false;
        }
        state.items.retain(|_, record| record.frame != id);
        true
    }

    fn copy_frame(&self, src: FrameId, title: &str) -> Option<FrameId> {
        let mut state = self.state.lock();
        let source = state.frames.get(&src)?.clone();
        let id = FrameId(state.next_frame);
        state.next_frame += 1;

        let body = source
            .body
            .iter()
            .map(|stmt| {
                let mut copy = Statement::new(stmt.text.clone());
                if let Some(link) = stmt.link {
                    copy = copy.with_link(link);
                }
                Arc::new(copy)
            })
            .collect();
        let frame = Frame {
            id,
            title: title.to_string(),
            body,
        };
        state.frames.insert(id, Arc::new(frame));

        let copied: Vec<ItemRecord> = state
            .items
            .values()
            .filter(|record| record.frame == src)
            .cloned()
            .collect();
        for mut record in copied {
            record.frame = id;
            Self::insert_item(&mut state, record);
        }
        Some(id)
    }

    fn clear_frame(&self, id: FrameId) -> bool {
        let mut state = self.state.lock();
        if !state.frames.contains_key(&id) {
            return false;
        }
        state.items.retain(|_, record| record.frame != id);
        true
    }

    fn items(&self, frame: FrameId, kind: ItemKind) -> Vec<ItemId> {
        let state = self.state.lock();
        let mut ids: Vec<ItemId> = state
            .items
            .iter()
            .filter(|(_, record)| record.frame == frame && kind.admits(record.kind))
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }

    fn item_text(&self, item: ItemId) -> Option<String> {
        self.state.lock().items.get(&item).map(|r| r.text.clone())
    }

    fn set_item_text(&self, item: ItemId, text: &str) -> bool {
        let mut state = self.state.lock();
        match state.items.get_mut(&item) {
            Some(record) => {
                record.text = text.to_string();
                true
            }
            None => false,
        }
    }

    fn item_link(&self, item: ItemId) -> Option<FrameId> {
        self.state.lock().items.get(&item).and_then(|r| r.link)
    }

    fn item_position(&self, item: ItemId) -> Option<(i64, i64)> {
        self.state.lock().items.get(&item).map(|r| (r.x, r.y))
    }

    fn create_item(
        &self,
        frame: FrameId,
        kind: ItemKind,
        x: i64,
        y: i64,
        text: &str,
    ) -> Option<ItemId> {
        let mut state = self.state.lock();
        if !state.frames.contains_key(&frame) {
            return None;
        }
        Some(Self::insert_item(
            &mut state,
            ItemRecord {
                frame,
                kind,
                x,
                y,
                text: text.to_string(),
                link: None,
            },
        ))
    }

    fn delete_item(&self, item: ItemId) -> bool {
        self.state.lock().items.remove(&item).is_some()
    }

    fn copy_item(&self, item: ItemId, dest: FrameId) -> Option<ItemId> {
        let mut state = self.state.lock();
        if !state.frames.contains_key(&dest) {
            return None;
        }
        let mut record = state.items.get(&item)?.clone();
        record.frame = dest;
        Some(Self::insert_item(&mut state, record))
    }
}
