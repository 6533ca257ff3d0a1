use glam::DVec2;
use lidar_arena_core::{Command, Event, Rect, ResizeHandle};
use lidar_arena_system_editor::{Editor, EditorInput, SPAWN_RECT};
use lidar_arena_world::{self as world, query, World};

/// Feeds one input through the editor and applies the resulting commands.
fn step(editor: &mut Editor, world: &mut World, events: &mut Vec<Event>, input: EditorInput) {
    let mut commands = Vec::new();
    editor.handle(
        events,
        Some(input),
        |point| query::wall_at(world, point),
        &mut commands,
    );
    events.clear();
    for command in commands {
        world::apply(world, command, events);
    }
}

fn press(x: f64, y: f64) -> EditorInput {
    EditorInput::Press {
        position: DVec2::new(x, y),
    }
}

fn drag(x: f64, y: f64, dx: f64, dy: f64) -> EditorInput {
    EditorInput::Motion {
        position: DVec2::new(x, y),
        delta: DVec2::new(dx, dy),
        primary_held: true,
    }
}

#[test]
fn spawn_adds_a_fixed_wall() {
    let mut editor = Editor::new();
    let mut world = World::new();
    let mut events = Vec::new();

    step(&mut editor, &mut world, &mut events, EditorInput::Spawn);

    assert_eq!(query::wall_count(&world), 1);
    assert_eq!(query::walls(&world)[0].rect(), SPAWN_RECT);
    assert!(matches!(events.as_slice(), [Event::WallAdded { .. }]));
}

#[test]
fn press_on_wall_selects_it_and_press_elsewhere_clears() {
    let mut editor = Editor::new();
    let mut world = World::with_rects([Rect::new(100.0, 100.0, 50.0, 50.0)]);
    let mut events = Vec::new();

    step(&mut editor, &mut world, &mut events, press(120.0, 120.0));
    let selection = editor.selection().expect("wall should be selected");
    assert_eq!(selection.wall, query::wall_ids(&world)[0]);
    assert_eq!(selection.resizing, None);

    step(&mut editor, &mut world, &mut events, press(400.0, 400.0));
    assert_eq!(editor.selected(), None);
}

#[test]
fn dragging_a_selected_wall_moves_it_by_the_pointer_delta() {
    let mut editor = Editor::new();
    let mut world = World::with_rects([Rect::new(100.0, 100.0, 50.0, 50.0)]);
    let mut events = Vec::new();

    step(&mut editor, &mut world, &mut events, press(120.0, 120.0));
    step(&mut editor, &mut world, &mut events, drag(130.0, 115.0, 10.0, -5.0));
    step(&mut editor, &mut world, &mut events, drag(133.0, 115.0, 3.0, 0.0));

    assert_eq!(
        query::walls(&world)[0].rect(),
        Rect::new(113.0, 95.0, 50.0, 50.0)
    );
    step(&mut editor, &mut world, &mut events, EditorInput::Release);
    assert_eq!(
        editor.selection().map(|selection| selection.rect),
        Some(Rect::new(113.0, 95.0, 50.0, 50.0))
    );
}

#[test]
fn hover_without_button_does_not_move() {
    let mut editor = Editor::new();
    let mut world = World::with_rects([Rect::new(100.0, 100.0, 50.0, 50.0)]);
    let mut events = Vec::new();

    step(&mut editor, &mut world, &mut events, press(120.0, 120.0));
    step(
        &mut editor,
        &mut world,
        &mut events,
        EditorInput::Motion {
            position: DVec2::new(140.0, 140.0),
            delta: DVec2::new(20.0, 20.0),
            primary_held: false,
        },
    );

    assert!(events.is_empty());
    assert_eq!(
        query::walls(&world)[0].rect(),
        Rect::new(100.0, 100.0, 50.0, 50.0)
    );
}

#[test]
fn pressing_a_corner_handle_resizes_until_release() {
    let mut editor = Editor::new();
    let mut world = World::with_rects([Rect::new(100.0, 100.0, 50.0, 50.0)]);
    let mut events = Vec::new();

    step(&mut editor, &mut world, &mut events, press(148.0, 148.0));
    assert_eq!(
        editor.selection().and_then(|selection| selection.resizing),
        Some(ResizeHandle::BottomRight)
    );

    step(&mut editor, &mut world, &mut events, drag(180.0, 170.0, 32.0, 22.0));
    assert_eq!(
        query::walls(&world)[0].rect(),
        Rect::new(100.0, 100.0, 80.0, 70.0)
    );

    step(&mut editor, &mut world, &mut events, EditorInput::Release);
    assert_eq!(
        editor.selection().and_then(|selection| selection.resizing),
        None
    );

    step(&mut editor, &mut world, &mut events, drag(185.0, 170.0, 5.0, 0.0));
    assert_eq!(
        query::walls(&world)[0].rect(),
        Rect::new(105.0, 100.0, 80.0, 70.0),
        "after release, dragging moves instead of resizing"
    );
}

#[test]
fn top_left_handle_keeps_opposite_corner_anchored() {
    let mut editor = Editor::new();
    let mut world = World::with_rects([Rect::new(100.0, 100.0, 50.0, 50.0)]);
    let mut events = Vec::new();

    step(&mut editor, &mut world, &mut events, press(101.0, 101.0));
    step(&mut editor, &mut world, &mut events, drag(90.0, 80.0, -11.0, -21.0));

    assert_eq!(
        query::walls(&world)[0].rect(),
        Rect::new(90.0, 80.0, 60.0, 70.0)
    );
}

#[test]
fn copy_clears_selection_and_paste_adds_at_origin() {
    let mut editor = Editor::new();
    let mut world = World::with_rects([Rect::new(200.0, 150.0, 70.0, 30.0)]);
    let mut events = Vec::new();

    step(&mut editor, &mut world, &mut events, EditorInput::Paste);
    assert_eq!(query::wall_count(&world), 1, "nothing to paste yet");

    step(&mut editor, &mut world, &mut events, press(210.0, 160.0));
    step(&mut editor, &mut world, &mut events, EditorInput::Copy);
    assert_eq!(editor.selected(), None);
    assert_eq!(editor.clipboard(), Some(Rect::new(200.0, 150.0, 70.0, 30.0)));

    step(&mut editor, &mut world, &mut events, EditorInput::Paste);
    step(&mut editor, &mut world, &mut events, EditorInput::Paste);
    let rects: Vec<Rect> = query::walls(&world).iter().map(|wall| wall.rect()).collect();
    assert_eq!(
        rects,
        vec![
            Rect::new(200.0, 150.0, 70.0, 30.0),
            Rect::new(0.0, 0.0, 70.0, 30.0),
            Rect::new(0.0, 0.0, 70.0, 30.0),
        ]
    );
}

#[test]
fn delete_removes_selected_wall_and_drops_selection() {
    let mut editor = Editor::new();
    let mut world = World::with_rects([
        Rect::new(10.0, 10.0, 20.0, 20.0),
        Rect::new(100.0, 100.0, 50.0, 50.0),
        Rect::new(300.0, 300.0, 20.0, 20.0),
    ]);
    let mut events = Vec::new();

    step(&mut editor, &mut world, &mut events, EditorInput::Delete);
    assert_eq!(query::wall_count(&world), 3, "delete without selection is a no-op");

    step(&mut editor, &mut world, &mut events, press(120.0, 120.0));
    step(&mut editor, &mut world, &mut events, EditorInput::Delete);
    assert_eq!(query::wall_count(&world), 2);
    assert_eq!(query::walls(&world)[1].rect(), Rect::new(300.0, 300.0, 20.0, 20.0));

    step(&mut editor, &mut world, &mut events, EditorInput::Release);
    assert_eq!(editor.selected(), None);
}

#[test]
fn reset_clears_the_world_and_selection() {
    let mut editor = Editor::new();
    let mut world = World::with_rects([Rect::new(100.0, 100.0, 50.0, 50.0)]);
    let mut events = Vec::new();

    step(&mut editor, &mut world, &mut events, press(120.0, 120.0));
    step(&mut editor, &mut world, &mut events, EditorInput::Reset);
    assert_eq!(query::wall_count(&world), 0);

    step(&mut editor, &mut world, &mut events, drag(130.0, 130.0, 10.0, 10.0));
    assert_eq!(editor.selected(), None);
    assert!(events.is_empty());
}

#[test]
fn overlapping_walls_select_the_topmost() {
    let mut editor = Editor::new();
    let mut world = World::with_rects([
        Rect::new(100.0, 100.0, 100.0, 100.0),
        Rect::new(150.0, 150.0, 100.0, 100.0),
    ]);
    let mut events = Vec::new();

    step(&mut editor, &mut world, &mut events, press(175.0, 175.0));
    assert_eq!(editor.selected(), Some(query::wall_ids(&world)[1]));
}

#[test]
fn press_on_right_or_bottom_border_misses_the_wall() {
    let mut editor = Editor::new();
    let mut world = World::with_rects([Rect::new(100.0, 100.0, 50.0, 50.0)]);
    let mut events = Vec::new();

    step(&mut editor, &mut world, &mut events, press(150.0, 120.0));
    assert_eq!(editor.selected(), None);
    step(&mut editor, &mut world, &mut events, press(120.0, 150.0));
    assert_eq!(editor.selected(), None);

    step(&mut editor, &mut world, &mut events, press(100.0, 100.0));
    let selection = editor.selection().expect("top-left corner is inside");
    assert_eq!(selection.resizing, Some(ResizeHandle::TopLeft));
}

#[test]
fn idle_frames_emit_no_commands() {
    let mut editor = Editor::new();
    let mut commands = Vec::new();
    editor.handle(&[], None, |_| None, &mut commands);
    assert_eq!(commands, Vec::<Command>::new());
}
