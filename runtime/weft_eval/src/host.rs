//! Capability traits the embedding host implements.
//!
//! The interpreter is host-agnostic: it never imports the application's
//! object model, only these narrow contracts. All three traits are
//! `Send + Sync` because a run executes on a dedicated worker thread;
//! marshaling display work back onto a UI thread is the host's concern.

use std::sync::Arc;

use weft_ir::{Frame, FrameId, ItemId, ItemKind};

/// Graph access and mutation.
///
/// Frames are handed out as shared handles; the interpreter never owns
/// them. Mutating operations return `false`/`None` when the target does
/// not exist, and the dispatcher turns that into a structured error.
pub trait Graph: Send + Sync {
    /// Resolve a frame handle.
    fn frame(&self, id: FrameId) -> Option<Arc<Frame>>;

    /// Resolve a frame by its exact title.
    fn frame_by_title(&self, title: &str) -> Option<FrameId>;

    /// Create an empty frame.
    fn create_frame(&self, title: &str) -> FrameId;

    /// Remove a frame and its items.
    fn delete_frame(&self, id: FrameId) -> bool;

    /// Duplicate a frame (body and items) under a new title.
    fn copy_frame(&self, src: FrameId, title: &str) -> Option<FrameId>;

    /// Remove a frame's items, leaving the frame itself.
    fn clear_frame(&self, id: FrameId) -> bool;

    /// The frame's visible child items passing a kind filter, in stable
    /// order.
    fn items(&self, frame: FrameId, kind: ItemKind) -> Vec<ItemId>;

    fn item_text(&self, item: ItemId) -> Option<String>;

    fn set_item_text(&self, item: ItemId, text: &str) -> bool;

    /// Follow an item's child link, when it has one.
    fn item_link(&self, item: ItemId) -> Option<FrameId>;

    /// The item's position within its frame.
    fn item_position(&self, item: ItemId) -> Option<(i64, i64)>;

    fn create_item(
        &self,
        frame: FrameId,
        kind: ItemKind,
        x: i64,
        y: i64,
        text: &str,
    ) -> Option<ItemId>;

    fn delete_item(&self, item: ItemId) -> bool;

    /// Duplicate an item into another frame.
    fn copy_item(&self, item: ItemId, dest: FrameId) -> Option<ItemId>;
}

/// Reflective action dispatch: the host-defined command set that catches
/// every statement the interpreter itself does not recognize.
pub trait Actions: Send + Sync {
    /// Perform a named command.
    ///
    /// `Ok(Some(item))` is a command that produced an item, `Ok(None)` one
    /// that was handled without a result, and `Err(())` means the host
    /// does not recognize the command either.
    fn perform(&self, frame: FrameId, item: Option<ItemId>, command: &str)
        -> Result<Option<ItemId>, ()>;
}

/// An action dispatcher that recognizes nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoActions;

impl Actions for NoActions {
    fn perform(
        &self,
        _frame: FrameId,
        _item: Option<ItemId>,
        _command: &str,
    ) -> Result<Option<ItemId>, ()> {
        Err(())
    }
}

/// Display and stepping collaborator.
///
/// Default methods are no-ops so headless hosts only implement what they
/// show.
pub trait Stage: Send + Sync {
    /// Bring a frame to the front of the display.
    fn bring_to_front(&self, _frame: FrameId) {}

    /// Close a frame's window/view.
    fn close(&self, _frame: FrameId) {}

    /// Highlight the statement about to execute (step mode).
    fn highlight(&self, _frame: FrameId, _statement: usize) {}

    /// Visually flag the statement that raised an error.
    fn flag_statement(&self, _frame: FrameId, _statement: usize) {}

    /// Attach an item produced by a host action to the UI cursor.
    fn attach_to_cursor(&self, _item: ItemId) {}

    /// Show a message to the user.
    fn message(&self, _text: &str) {}
}

/// A stage that shows nothing; the default for headless runs.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentStage;

impl Stage for SilentStage {}
