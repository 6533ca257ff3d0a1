#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure wall-editor system translating pointer and action input into world commands.

use glam::DVec2;
use lidar_arena_core::{Command, Event, Rect, ResizeHandle, WallId};

/// Side length of the square grips drawn on a selected wall.
pub const HANDLE_SIZE: f64 = 5.0;
/// Rectangle of a freshly spawned wall.
pub const SPAWN_RECT: Rect = Rect::new(100.0, 100.0, 50.0, 50.0);

/// Input snapshot distilled from adapter-provided pointer and button events.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EditorInput {
    /// Primary pointer button went down.
    Press {
        /// Pointer position in arena coordinates.
        position: DVec2,
    },
    /// Pointer moved.
    Motion {
        /// Pointer position after the motion.
        position: DVec2,
        /// Offset from the previous pointer position.
        delta: DVec2,
        /// Whether the primary button is held during the motion.
        primary_held: bool,
    },
    /// Primary pointer button went up.
    Release,
    /// Adds a wall at the spawn location.
    Spawn,
    /// Stores the selected wall's rectangle and clears the selection.
    Copy,
    /// Adds a wall sized like the clipboard at the origin.
    Paste,
    /// Removes the selected wall.
    Delete,
    /// Removes every wall.
    Reset,
}

/// Wall currently picked in the editor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Selection {
    /// Identifier of the selected wall.
    pub wall: WallId,
    /// Last known rectangle of the selected wall.
    pub rect: Rect,
    /// Handle being dragged, if a resize is in progress.
    pub resizing: Option<ResizeHandle>,
}

/// Editor system tracking selection, active resize handle and clipboard.
#[derive(Clone, Debug, Default)]
pub struct Editor {
    selection: Option<Selection>,
    clipboard: Option<Rect>,
}

impl Editor {
    /// Creates an editor with nothing selected and an empty clipboard.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            selection: None,
            clipboard: None,
        }
    }

    /// Current selection, if any.
    #[must_use]
    pub const fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// Identifier of the selected wall, if any.
    #[must_use]
    pub fn selected(&self) -> Option<WallId> {
        self.selection.map(|selection| selection.wall)
    }

    /// Rectangle stored by the last copy.
    #[must_use]
    pub const fn clipboard(&self) -> Option<Rect> {
        self.clipboard
    }

    /// Consumes world events and adapter input to emit wall commands.
    ///
    /// The `wall_at` closure should mirror the world's `query::wall_at` helper
    /// so the editor can identify the wall under the pointer.
    pub fn handle<F>(
        &mut self,
        events: &[Event],
        input: Option<EditorInput>,
        mut wall_at: F,
        out: &mut Vec<Command>,
    ) where
        F: FnMut(DVec2) -> Option<(WallId, Rect)>,
    {
        for event in events {
            self.observe(event);
        }

        let Some(input) = input else {
            return;
        };

        match input {
            EditorInput::Press { position } => {
                self.selection = wall_at(position).map(|(wall, rect)| Selection {
                    wall,
                    rect,
                    resizing: handle_at(rect, position),
                });
            }
            EditorInput::Motion {
                position,
                delta,
                primary_held,
            } => {
                if let Some(selection) = self.selection {
                    if let Some(handle) = selection.resizing {
                        out.push(Command::ResizeWall {
                            wall: selection.wall,
                            handle,
                            cursor: position,
                        });
                    } else if primary_held && delta != DVec2::ZERO {
                        out.push(Command::MoveWall {
                            wall: selection.wall,
                            delta,
                        });
                    }
                }
            }
            EditorInput::Release => {
                if let Some(selection) = self.selection.as_mut() {
                    selection.resizing = None;
                }
            }
            EditorInput::Spawn => out.push(Command::AddWall { rect: SPAWN_RECT }),
            EditorInput::Copy => {
                if let Some(selection) = self.selection.take() {
                    self.clipboard = Some(selection.rect);
                }
            }
            EditorInput::Paste => {
                if let Some(copied) = self.clipboard {
                    out.push(Command::AddWall {
                        rect: Rect::new(0.0, 0.0, copied.width, copied.height),
                    });
                }
            }
            EditorInput::Delete => {
                if let Some(selection) = self.selection {
                    out.push(Command::RemoveWall {
                        wall: selection.wall,
                    });
                }
            }
            EditorInput::Reset => out.push(Command::ClearWalls),
        }
    }

    fn observe(&mut self, event: &Event) {
        let Some(selection) = self.selection else {
            return;
        };
        self.selection = match event {
            Event::WallMoved { wall, rect } | Event::WallResized { wall, rect }
                if *wall == selection.wall =>
            {
                Some(Selection {
                    rect: *rect,
                    ..selection
                })
            }
            Event::WallRemoved { wall } | Event::WallRejected { wall, .. }
                if *wall == selection.wall =>
            {
                None
            }
            Event::WallsReplaced { .. } => None,
            _ => Some(selection),
        };
    }
}

/// Grip squares of `rect`, in hit-testing order.
#[must_use]
pub fn handles(rect: Rect) -> [(ResizeHandle, Rect); 8] {
    let x = rect.left();
    let y = rect.top();
    let w = rect.right() - x;
    let h = rect.bottom() - y;
    let hs = HANDLE_SIZE;
    let half = (hs / 2.0).floor();
    let center_x = x + (w / 2.0).floor() - half;
    let center_y = y + (h / 2.0).floor() - half;
    let square = |left: f64, top: f64| Rect::new(left, top, hs, hs);

    [
        (ResizeHandle::TopLeft, square(x, y)),
        (ResizeHandle::TopRight, square(x + w - hs, y)),
        (ResizeHandle::BottomLeft, square(x, y + h - hs)),
        (ResizeHandle::BottomRight, square(x + w - hs, y + h - hs)),
        (ResizeHandle::TopCenter, square(center_x, y)),
        (ResizeHandle::BottomCenter, square(center_x, y + h - hs)),
        (ResizeHandle::LeftCenter, square(x, center_y)),
        (ResizeHandle::RightCenter, square(x + w - hs, center_y)),
    ]
}

/// First grip of `rect` containing `point`.
#[must_use]
pub fn handle_at(rect: Rect, point: DVec2) -> Option<ResizeHandle> {
    handles(rect)
        .into_iter()
        .find(|(_, square)| square.contains(point))
        .map(|(handle, _)| handle)
}
