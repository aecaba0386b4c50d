use glam::Vec2;
use jigsaw_engine::{
    render, DragBounds, DrawCommand, EdgeTabs, FrameView, ImageSize, InputEvent, InteractionController,
    InteractionResult, LevelCatalog, LoadError, Piece, PieceId, PieceSet, PuzzleConfig, PuzzleEngine, PuzzleEvent,
    RecordingSurface, Rect, Rng, Viewport,
};

const SNAP: f32 = 30.0;
const EPS: f32 = 0.01;

/// Roomy desktop surface: every solved position is well inside the drag
/// bounds, so drags in these tests are never clamped.
fn desktop_engine(seed: u64) -> PuzzleEngine {
    let config = PuzzleConfig {
        viewport: Viewport::new(1280.0, 900.0),
        snap_distance: SNAP,
        ..PuzzleConfig::default()
    };
    let mut engine = PuzzleEngine::with_rng(config, LevelCatalog::default(), Rng::new(seed));
    engine.load_level(1, ImageSize::new(1000.0, 1000.0)).unwrap();
    engine
}

/// Index of the loose piece a click on its own centre would pick.
fn topmost(engine: &PuzzleEngine) -> Option<usize> {
    engine.pieces().loose_top_down().first().copied()
}

fn piece(engine: &PuzzleEngine, index: usize) -> &Piece {
    &engine.pieces().as_slice()[index]
}

/// Pick up the topmost piece by its centre and drop it with its top-left
/// corner at `dest`. Returns the piece index.
fn drag_topmost_to(engine: &mut PuzzleEngine, dest: impl FnOnce(&Piece) -> Vec2) -> usize {
    let index = topmost(engine).expect("a loose piece");
    let p = piece(engine, index);
    let grab = p.size() * 0.5;
    let start = p.position + grab;
    let end = dest(p) + grab;

    assert!(engine.pointer_down(start));
    assert!(engine.pointer_move(end));
    engine.pointer_up();
    index
}

#[test]
fn release_just_inside_snap_distance_locks() {
    let mut engine = desktop_engine(1);
    let index = drag_topmost_to(&mut engine, |p| p.target() + Vec2::new(SNAP - EPS, 0.0));

    let p = piece(&engine, index);
    assert!(p.locked);
    assert_eq!(p.position, p.target());
    assert_eq!(p.pick_order, 0);
}

#[test]
fn release_just_outside_snap_distance_stays_loose() {
    let mut engine = desktop_engine(1);
    let index = drag_topmost_to(&mut engine, |p| p.target() + Vec2::new(0.0, SNAP + EPS));

    let p = piece(&engine, index);
    assert!(!p.locked);
    let expected = p.target() + Vec2::new(0.0, SNAP + EPS);
    assert!(p.position.distance(expected) < 1e-3, "{:?} vs {:?}", p.position, expected);
    assert!(p.pick_order > 0);
}

#[test]
fn solved_fires_exactly_once() {
    let mut engine = desktop_engine(7);
    let total = engine.pieces().len();
    assert_eq!(total, 49);

    for placed in 1..=total {
        assert!(!engine.is_solved());
        drag_topmost_to(&mut engine, |p| p.target());
        assert_eq!(engine.pieces().locked_count(), placed);
    }
    assert!(engine.is_solved());

    // Redundant input after the win changes nothing.
    let anywhere = engine.puzzle_rect().unwrap().min() + Vec2::splat(5.0);
    assert!(!engine.pointer_down(anywhere));
    assert!(!engine.pointer_up());
    assert!(!engine.pointer_up());

    let events = engine.drain_events();
    let solved: Vec<_> = events.iter().filter(|e| matches!(e, PuzzleEvent::Solved { .. })).collect();
    assert_eq!(solved, vec![&PuzzleEvent::Solved { level: 1 }]);
    assert_eq!(events.last(), Some(&PuzzleEvent::Solved { level: 1 }));
    let placed = events.iter().filter(|e| matches!(e, PuzzleEvent::PiecePlaced { .. })).count();
    assert_eq!(placed, total);
}

fn overlapping_pair() -> PieceSet {
    let size = Vec2::splat(60.0);
    let spot = Vec2::new(300.0, 300.0);
    let mut set = PieceSet::new();
    set.replace(vec![
        Piece::new(0, 0, size, EdgeTabs::FLAT, Vec2::new(100.0, 100.0), spot),
        Piece::new(0, 1, size, EdgeTabs::FLAT, Vec2::new(160.0, 100.0), spot),
    ]);
    set
}

#[test]
fn overlapping_pieces_pick_the_one_drawn_on_top() {
    let mut set = overlapping_pair();
    let mut ctl = InteractionController::new();
    let point = Vec2::new(330.0, 330.0);

    // Equal pick order: the later piece is painted last, so it wins.
    assert_eq!(ctl.pointer_down(&mut set, point), InteractionResult::PickedUp(PieceId(1)));
    ctl.pointer_up(&mut set, SNAP);

    // Touch the first piece through a spot only it covers, then release it
    // back on top of the second.
    let first = set.handle(0).unwrap();
    set.get_mut(first).unwrap().position = Vec2::new(500.0, 300.0);
    assert_eq!(ctl.pointer_down(&mut set, Vec2::new(530.0, 330.0)), InteractionResult::PickedUp(PieceId(0)));
    let bounds = DragBounds { width: 1000.0, height: 1000.0, header: 80.0, solved: None };
    ctl.pointer_move(&mut set, point, &bounds);
    ctl.pointer_up(&mut set, SNAP);
    assert_eq!(set.as_slice()[0].position, Vec2::new(300.0, 300.0));

    assert_eq!(ctl.pointer_down(&mut set, point), InteractionResult::PickedUp(PieceId(0)));
}

#[test]
fn untouched_overlap_picks_the_piece_painted_last() {
    let size = Vec2::splat(60.0);
    let mut set = PieceSet::new();
    set.replace(vec![
        Piece::new(0, 0, size, EdgeTabs::FLAT, Vec2::new(100.0, 100.0), Vec2::new(300.0, 300.0)),
        Piece::new(0, 1, size, EdgeTabs::FLAT, Vec2::new(160.0, 100.0), Vec2::new(320.0, 320.0)),
    ]);

    let mut surface = RecordingSurface::new(false);
    render(
        &mut surface,
        &FrameView {
            viewport: Viewport::new(800.0, 600.0),
            puzzle_rect: Some(Rect::new(100.0, 100.0, 120.0, 60.0)),
            pieces: &set,
            image: None,
        },
    );
    let last_painted = *surface.piece_bounds().last().unwrap();
    assert_eq!(last_painted, set.as_slice()[1].outline_bounds());

    let mut ctl = InteractionController::new();
    assert_eq!(ctl.pointer_down(&mut set, Vec2::new(340.0, 340.0)), InteractionResult::PickedUp(PieceId(1)));
}

#[test]
fn locked_pieces_are_never_hit() {
    let mut set = overlapping_pair();
    set.iter_mut().for_each(|p| p.snap());
    let mut ctl = InteractionController::new();

    for p in [Vec2::new(130.0, 130.0), Vec2::new(190.0, 130.0), Vec2::new(330.0, 330.0)] {
        assert_eq!(ctl.pointer_down(&mut set, p), InteractionResult::None);
    }
}

/// Position of `p` as a fraction of the solved rectangle.
fn relative(p: Vec2, rect: Rect) -> Vec2 {
    (p - rect.min()) / rect.size()
}

#[test]
fn resize_keeps_locked_pieces_on_their_cells() {
    let mut engine = desktop_engine(3);
    for _ in 0..5 {
        drag_topmost_to(&mut engine, |p| p.target());
    }
    let before = engine.puzzle_rect().unwrap();
    let cells: Vec<(usize, Vec2)> = engine
        .pieces()
        .iter()
        .enumerate()
        .filter(|(_, p)| p.locked)
        .map(|(i, p)| (i, relative(p.position, before)))
        .collect();
    assert_eq!(cells.len(), 5);

    for viewport in [Viewport::new(1600.0, 1000.0), Viewport::new(1000.0, 800.0), Viewport::new(600.0, 900.0)] {
        assert!(engine.handle(InputEvent::Resize { width: viewport.width, height: viewport.height }));
        let after = engine.puzzle_rect().unwrap();
        assert!(after.x >= 0.0 && after.right() <= viewport.width + 1e-3);

        for &(i, cell) in &cells {
            let p = piece(&engine, i);
            assert!(p.locked);
            assert_eq!(p.position, p.target());
            assert!((relative(p.position, after) - cell).length() < 1e-4);
        }
        for p in engine.pieces().iter().filter(|p| !p.locked) {
            let tab = p.size().max_element() * 0.45;
            assert!(p.position.x >= tab.min(after.x) - 1e-3);
            assert!(p.position.x + p.size().x <= (viewport.width - tab).max(after.right()) + 1e-3);
            assert!(p.position.y >= (80.0 + tab).min(after.y) - 1e-3);
            assert!(p.position.y + p.size().y <= (viewport.height - tab).max(after.bottom()) + 1e-3);
        }
    }

    // Back to the original surface: the same rectangle as at load time.
    engine.resize(Viewport::new(1280.0, 900.0));
    let restored = engine.puzzle_rect().unwrap();
    assert!((restored.min() - before.min()).length() < 1e-3);
    assert!((restored.size() - before.size()).length() < 1e-3);
}

#[test]
fn puzzle_stays_solvable_after_a_large_shrink() {
    let mut engine = desktop_engine(3);
    for _ in 0..3 {
        drag_topmost_to(&mut engine, |p| p.target());
    }

    engine.resize(Viewport::new(600.0, 900.0));
    let total = engine.pieces().len();
    for placed in 4..=total {
        let index = drag_topmost_to(&mut engine, |p| p.target());
        assert!(piece(&engine, index).locked, "piece {} could not reach its target", index);
        assert_eq!(engine.pieces().locked_count(), placed);
    }
    assert!(engine.is_solved());
    let solved = engine.drain_events().into_iter().filter(|e| matches!(e, PuzzleEvent::Solved { .. })).count();
    assert_eq!(solved, 1);
}

#[test]
fn failed_decode_keeps_current_puzzle() {
    let mut engine = desktop_engine(5);
    let positions: Vec<Vec2> = engine.pieces().iter().map(|p| p.position).collect();

    engine.request_level(2).unwrap();
    let err = engine.complete_level(2, Err(LoadError::Decode("truncated PNG".into())));
    assert_eq!(err, Err(LoadError::Decode("truncated PNG".into())));

    assert_eq!(engine.level(), Some(1));
    let after: Vec<Vec2> = engine.pieces().iter().map(|p| p.position).collect();
    assert_eq!(after, positions);

    // Retry succeeds.
    engine.request_level(2).unwrap();
    engine.complete_level(2, Ok(ImageSize::new(1200.0, 900.0))).unwrap();
    assert_eq!(engine.level(), Some(2));
}

#[test]
fn failed_first_load_leaves_engine_inert() {
    let mut engine = PuzzleEngine::new(PuzzleConfig::default(), LevelCatalog::default());
    engine.request_level(1).unwrap();
    assert!(engine.complete_level(1, Ok(ImageSize::new(0.0, 0.0))).is_err());

    assert!(engine.pieces().is_empty());
    assert!(engine.puzzle_rect().is_none());
    assert!(!engine.handle(InputEvent::PointerDown { x: 400.0, y: 300.0 }));
    assert!(!engine.handle(InputEvent::PointerMove { x: 410.0, y: 310.0 }));
    assert!(!engine.handle(InputEvent::PointerUp { x: 410.0, y: 310.0 }));

    let mut surface = RecordingSurface::new(false);
    engine.render(&mut surface);
    assert_eq!(surface.commands.len(), 1);
}

#[test]
fn stale_completion_is_superseded() {
    let mut engine = desktop_engine(5);
    engine.request_level(2).unwrap();
    engine.request_level(3).unwrap();

    let stale = engine.complete_level(2, Ok(ImageSize::new(800.0, 600.0)));
    assert_eq!(stale, Err(LoadError::Superseded { requested: 2, pending: 3 }));
    assert_eq!(engine.level(), Some(1));

    engine.complete_level(3, Ok(ImageSize::new(800.0, 600.0))).unwrap();
    assert_eq!(engine.level(), Some(3));
}

#[test]
fn reload_mid_drag_drops_the_drag() {
    let mut engine = desktop_engine(9);
    let index = topmost(&engine).unwrap();
    let p = piece(&engine, index);
    assert!(engine.pointer_down(p.position + p.size() * 0.5));
    assert!(engine.is_dragging());

    engine.load_level(2, ImageSize::new(1000.0, 1000.0)).unwrap();
    assert!(!engine.is_dragging());

    let positions: Vec<Vec2> = engine.pieces().iter().map(|p| p.position).collect();
    assert!(!engine.pointer_move(Vec2::new(640.0, 450.0)));
    assert!(!engine.pointer_up());
    let after: Vec<Vec2> = engine.pieces().iter().map(|p| p.position).collect();
    assert_eq!(after, positions);
}

#[test]
fn cancel_never_snaps() {
    let mut engine = desktop_engine(11);
    let index = topmost(&engine).unwrap();
    let p = piece(&engine, index);
    let grab = p.size() * 0.5;
    let target = p.target();
    engine.pointer_down(p.position + grab);
    engine.pointer_move(target + grab);

    assert!(engine.handle(InputEvent::PointerCancel));
    let p = piece(&engine, index);
    assert!(!p.locked);
    assert!(p.position.distance(target) < 1e-3);
    assert!(!engine.is_dragging());
}

#[test]
fn render_draws_guide_then_pieces_with_active_on_top() {
    let mut engine = desktop_engine(13);
    drag_topmost_to(&mut engine, |p| p.target());
    let index = topmost(&engine).unwrap();
    let p = piece(&engine, index);
    engine.pointer_down(p.position + p.size() * 0.5);

    let mut surface = RecordingSurface::new(true);
    engine.render(&mut surface);

    assert_eq!(surface.commands[0], DrawCommand::Clear(Viewport::new(1280.0, 900.0)));
    match &surface.commands[1] {
        DrawCommand::Stroke { bounds, style } => {
            assert_eq!(*bounds, engine.puzzle_rect().unwrap());
            assert!(style.dash.is_some());
        }
        other => panic!("expected guide stroke, got {:?}", other),
    }

    let drawn = surface.piece_bounds();
    assert_eq!(drawn.len(), engine.pieces().len());
    // The one locked piece comes first, the piece in hand last.
    let locked = engine.pieces().iter().find(|p| p.locked).unwrap();
    assert_eq!(drawn[0], locked.outline_bounds());
    assert_eq!(*drawn.last().unwrap(), piece(&engine, index).outline_bounds());
    assert!(!surface.commands.iter().any(|c| matches!(c, DrawCommand::Fill { .. })));
}
