//! Browser bridge for the jigsaw engine.
//!
//! JS calls `puzzle_init` once with a canvas id, then `puzzle_load_level`
//! for each level. Pointer and touch handlers forward surface coordinates;
//! the engine redraws the canvas itself. Progress is read back with
//! `puzzle_take_events` as a `Float32Array` of `[kind, a, b, c]` quads
//! (1 = picked up, 2 = placed, 3 = solved).

pub mod canvas;
pub mod runner;

use std::cell::RefCell;

use jigsaw_engine::{primary_touch, InputEvent, LevelCatalog, PuzzleConfig};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlImageElement;

pub use canvas::CanvasSurface;
pub use runner::PuzzleRunner;

thread_local! {
    static RUNNER: RefCell<Option<PuzzleRunner>> = RefCell::new(None);
}

/// Run `f` against the runner. Calls made before `puzzle_init` are dropped.
fn with_runner<R: Default>(f: impl FnOnce(&mut PuzzleRunner) -> R) -> R {
    RUNNER.with(|cell| match cell.borrow_mut().as_mut() {
        Some(runner) => f(runner),
        None => {
            log::warn!("puzzle not initialized; call puzzle_init() first");
            R::default()
        }
    })
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen]
pub fn puzzle_init(canvas_id: &str, config_json: Option<String>, catalog_json: Option<String>) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let config = match config_json {
        Some(json) => PuzzleConfig::from_json(&json).map_err(to_js)?,
        None => PuzzleConfig::default(),
    };
    let catalog = match catalog_json {
        Some(json) => LevelCatalog::from_json(&json).map_err(to_js)?,
        None => LevelCatalog::default(),
    };
    let surface = CanvasSurface::from_element_id(canvas_id)?;
    let runner = PuzzleRunner::new(config, catalog, surface);

    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });
    log::info!("jigsaw: initialized on #{}", canvas_id);
    Ok(())
}

/// Start loading `level`. The puzzle appears once its image has decoded;
/// a newer call supersedes any load still in flight.
#[wasm_bindgen]
pub fn puzzle_load_level(level: u32) -> Result<(), JsValue> {
    let Some(request) = with_runner(|r| r.request_level(level).map_err(|e| log::warn!("{}", e)).ok()) else {
        return Ok(());
    };

    let image = HtmlImageElement::new()?;
    image.set_cross_origin(Some("anonymous"));

    let loaded = image.clone();
    let onload = Closure::<dyn FnMut()>::new(move || {
        let image = loaded.clone();
        with_runner(|r| r.image_loaded(level, image));
    });
    let path = request.path.clone();
    let onerror = Closure::<dyn FnMut()>::new(move || {
        with_runner(|r| r.image_failed(level, &path));
    });

    image.set_onload(Some(onload.as_ref().unchecked_ref()));
    image.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    // The element owns the callbacks from here on.
    onload.forget();
    onerror.forget();

    image.set_src(&request.path);
    Ok(())
}

#[wasm_bindgen]
pub fn puzzle_pointer_down(x: f32, y: f32) {
    with_runner(|r| r.handle(InputEvent::PointerDown { x, y }));
}

#[wasm_bindgen]
pub fn puzzle_pointer_move(x: f32, y: f32) {
    with_runner(|r| r.handle(InputEvent::PointerMove { x, y }));
}

#[wasm_bindgen]
pub fn puzzle_pointer_up(x: f32, y: f32) {
    with_runner(|r| r.handle(InputEvent::PointerUp { x, y }));
}

/// Blur, lost pointer capture or `touchcancel`.
#[wasm_bindgen]
pub fn puzzle_pointer_cancel() {
    with_runner(|r| r.handle(InputEvent::PointerCancel));
}

/// `touches` is a flat `[x0, y0, x1, y1, ...]` list; only the first touch counts.
#[wasm_bindgen]
pub fn puzzle_touch_start(touches: &[f32]) {
    if let Some(p) = primary_touch(touches) {
        puzzle_pointer_down(p.x, p.y);
    }
}

#[wasm_bindgen]
pub fn puzzle_touch_move(touches: &[f32]) {
    if let Some(p) = primary_touch(touches) {
        puzzle_pointer_move(p.x, p.y);
    }
}

#[wasm_bindgen]
pub fn puzzle_touch_end(touches: &[f32]) {
    let p = primary_touch(touches).unwrap_or_default();
    puzzle_pointer_up(p.x, p.y);
}

#[wasm_bindgen]
pub fn puzzle_resize(width: f32, height: f32) {
    with_runner(|r| r.handle(InputEvent::Resize { width, height }));
}

#[wasm_bindgen]
pub fn puzzle_redraw() {
    with_runner(|r| r.redraw());
}

#[wasm_bindgen]
pub fn puzzle_take_events() -> Vec<f32> {
    with_runner(|r| r.take_events())
}

// ---- State accessors ----

#[wasm_bindgen]
pub fn puzzle_level() -> u32 {
    with_runner(|r| r.level())
}

#[wasm_bindgen]
pub fn puzzle_is_solved() -> bool {
    with_runner(|r| r.is_solved())
}

#[wasm_bindgen]
pub fn puzzle_locked_count() -> u32 {
    with_runner(|r| r.locked_count())
}

#[wasm_bindgen]
pub fn puzzle_piece_count() -> u32 {
    with_runner(|r| r.piece_count())
}
