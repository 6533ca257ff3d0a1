#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative wall-set management for Lidar Arena.
//!
//! The world owns the ordered sequence of walls. Every mutation arrives as a
//! [`Command`] through [`apply`], which reports its outcome as [`Event`]
//! values. Agents never hold on to the wall set; they borrow
//! [`query::walls`] for the duration of a single scan or move.

pub mod codec;

use glam::DVec2;
use lidar_arena_core::{Command, Event, Rect, ResizeHandle, Wall, WallError, WallId};
use tracing::debug;

/// Represents the authoritative Lidar Arena world state.
#[derive(Debug)]
pub struct World {
    walls: Vec<Wall>,
    ids: Vec<WallId>,
    /// `None` once `u32::MAX` has been handed out.
    next_wall_id: Option<u32>,
}

impl Default for World {
    fn default() -> Self {
        Self {
            walls: Vec::new(),
            ids: Vec::new(),
            next_wall_id: Some(0),
        }
    }
}

impl World {
    /// Creates an empty world.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a world populated with the provided rectangles in order.
    ///
    /// Rectangles beyond the identifier space are dropped.
    #[must_use]
    pub fn with_rects(rects: impl IntoIterator<Item = Rect>) -> Self {
        let mut world = Self::new();
        for rect in rects {
            if world.push(rect).is_none() {
                debug!("wall identifiers exhausted while populating world");
                break;
            }
        }
        world
    }

    fn allocate_id(&mut self) -> Option<WallId> {
        let id = self.next_wall_id?;
        self.next_wall_id = id.checked_add(1);
        Some(WallId::new(id))
    }

    /// Identifiers that can still be allocated.
    fn remaining_ids(&self) -> u64 {
        self.next_wall_id
            .map_or(0, |next| u64::from(u32::MAX) - u64::from(next) + 1)
    }

    fn push(&mut self, rect: Rect) -> Option<WallId> {
        let id = self.allocate_id()?;
        self.walls.push(Wall::from_rect(rect));
        self.ids.push(id);
        Some(id)
    }

    fn index_of(&self, wall: WallId) -> Option<usize> {
        self.ids.iter().position(|id| *id == wall)
    }

    /// Swaps in `rects`, or leaves the world untouched when they would not
    /// all receive an identifier.
    fn replace(&mut self, rects: Vec<Rect>) -> Result<(), WallError> {
        if rects.len() as u64 > self.remaining_ids() {
            return Err(WallError::IdsExhausted);
        }
        self.walls.clear();
        self.ids.clear();
        for rect in rects {
            let _ = self.push(rect);
        }
        Ok(())
    }

    fn edit_wall<F>(&mut self, wall: WallId, edit: F) -> Option<Rect>
    where
        F: FnOnce(&mut Wall),
    {
        let index = self.index_of(wall)?;
        let target = &mut self.walls[index];
        edit(target);
        Some(target.rect())
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::AddWall { rect } => match world.push(rect) {
            Some(wall) => out_events.push(Event::WallAdded { wall, rect }),
            None => {
                debug!("rejected wall addition, identifiers exhausted");
                out_events.push(Event::AddRejected {
                    rect,
                    reason: WallError::IdsExhausted,
                });
            }
        },
        Command::RemoveWall { wall } => match world.index_of(wall) {
            Some(index) => {
                let _ = world.walls.remove(index);
                let _ = world.ids.remove(index);
                out_events.push(Event::WallRemoved { wall });
            }
            None => reject(wall, out_events),
        },
        Command::MoveWall { wall, delta } => {
            match world.edit_wall(wall, |target| target.translate(delta)) {
                Some(rect) => out_events.push(Event::WallMoved { wall, rect }),
                None => reject(wall, out_events),
            }
        }
        Command::ResizeWall {
            wall,
            handle,
            cursor,
        } => match resize(world, wall, handle, cursor) {
            Some(rect) => out_events.push(Event::WallResized { wall, rect }),
            None => reject(wall, out_events),
        },
        Command::ReplaceWalls { rects } => {
            let requested = rects.len();
            match world.replace(rects) {
                Ok(()) => {
                    debug!(count = world.walls.len(), "replaced wall set");
                    out_events.push(Event::WallsReplaced {
                        count: world.walls.len(),
                    });
                }
                Err(reason) => {
                    debug!(requested, "rejected wall set replacement");
                    out_events.push(Event::ReplaceRejected { requested, reason });
                }
            }
        }
        Command::ClearWalls => {
            world.walls.clear();
            world.ids.clear();
            debug!("cleared wall set");
            out_events.push(Event::WallsReplaced { count: 0 });
        }
    }
}

fn resize(world: &mut World, wall: WallId, handle: ResizeHandle, cursor: DVec2) -> Option<Rect> {
    world.edit_wall(wall, |target| target.resize(handle, cursor))
}

fn reject(wall: WallId, out_events: &mut Vec<Event>) {
    debug!(wall = wall.get(), "rejected command for missing wall");
    out_events.push(Event::WallRejected {
        wall,
        reason: WallError::MissingWall,
    });
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use lidar_arena_core::{Rect, Wall, WallId, WallRecord};

    /// Ordered wall slice that agents borrow for scans and moves.
    #[must_use]
    pub fn walls(world: &World) -> &[Wall] {
        &world.walls
    }

    /// Identifiers of the stored walls, in wall order.
    #[must_use]
    pub fn wall_ids(world: &World) -> &[WallId] {
        &world.ids
    }

    /// Looks up a single wall by identifier.
    #[must_use]
    pub fn wall(world: &World, wall: WallId) -> Option<&Wall> {
        world.index_of(wall).map(|index| &world.walls[index])
    }

    /// Number of walls currently stored.
    #[must_use]
    pub fn wall_count(world: &World) -> usize {
        world.walls.len()
    }

    /// Topmost wall whose rectangle contains the point, if any.
    ///
    /// Right and bottom borders are outside the wall, so a point on the seam
    /// between two touching walls hits exactly one of them.
    ///
    /// Later walls are drawn over earlier ones, so the search runs backwards.
    #[must_use]
    pub fn wall_at(world: &World, point: glam::DVec2) -> Option<(WallId, Rect)> {
        world
            .walls
            .iter()
            .zip(world.ids.iter())
            .rev()
            .find(|(wall, _)| wall.rect().contains(point))
            .map(|(wall, id)| (*id, wall.rect()))
    }

    /// Records describing every wall, in order, ready for persistence.
    #[must_use]
    pub fn records(world: &World) -> Vec<WallRecord> {
        world.walls.iter().map(Wall::to_record).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_are_never_reused_after_removal() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::AddWall {
                rect: Rect::new(0.0, 0.0, 1.0, 1.0),
            },
            &mut events,
        );
        let first = query::wall_ids(&world)[0];
        apply(&mut world, Command::RemoveWall { wall: first }, &mut events);
        apply(
            &mut world,
            Command::AddWall {
                rect: Rect::new(0.0, 0.0, 1.0, 1.0),
            },
            &mut events,
        );
        assert_ne!(query::wall_ids(&world)[0], first);
    }

    #[test]
    fn exhausted_identifiers_reject_additions_instead_of_wrapping() {
        let mut world = World::with_rects([Rect::new(0.0, 0.0, 5.0, 5.0)]);
        world.next_wall_id = Some(u32::MAX);
        let rect = Rect::new(10.0, 10.0, 5.0, 5.0);
        let mut events = Vec::new();

        apply(&mut world, Command::AddWall { rect }, &mut events);
        apply(&mut world, Command::AddWall { rect }, &mut events);

        assert_eq!(
            events,
            vec![
                Event::WallAdded {
                    wall: WallId::new(u32::MAX),
                    rect,
                },
                Event::AddRejected {
                    rect,
                    reason: WallError::IdsExhausted,
                },
            ]
        );
        assert_eq!(
            query::wall_ids(&world),
            &[WallId::new(0), WallId::new(u32::MAX)]
        );
    }

    #[test]
    fn replacement_beyond_remaining_identifiers_keeps_old_walls() {
        let original = Rect::new(0.0, 0.0, 5.0, 5.0);
        let mut world = World::with_rects([original]);
        world.next_wall_id = Some(u32::MAX);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::ReplaceWalls {
                rects: vec![Rect::new(1.0, 1.0, 1.0, 1.0); 2],
            },
            &mut events,
        );
        assert_eq!(
            events,
            vec![Event::ReplaceRejected {
                requested: 2,
                reason: WallError::IdsExhausted,
            }]
        );
        assert_eq!(query::walls(&world)[0].rect(), original);

        events.clear();
        apply(
            &mut world,
            Command::ReplaceWalls {
                rects: vec![Rect::new(1.0, 1.0, 1.0, 1.0)],
            },
            &mut events,
        );
        assert_eq!(events, vec![Event::WallsReplaced { count: 1 }]);
        assert_eq!(query::wall_ids(&world), &[WallId::new(u32::MAX)]);

        events.clear();
        apply(&mut world, Command::ClearWalls, &mut events);
        assert_eq!(events, vec![Event::WallsReplaced { count: 0 }]);
        assert_eq!(world.remaining_ids(), 0);
    }

    #[test]
    fn edit_of_missing_wall_leaves_world_untouched() {
        let mut world = World::with_rects([Rect::new(0.0, 0.0, 5.0, 5.0)]);
        let rect = world.edit_wall(WallId::new(99), |wall| {
            wall.translate(DVec2::new(1.0, 1.0));
        });
        assert_eq!(rect, None);
        assert_eq!(query::walls(&world)[0].rect(), Rect::new(0.0, 0.0, 5.0, 5.0));
    }
}
