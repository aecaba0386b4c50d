//! Canvas2D implementation of `DrawSurface`.

use glam::Vec2;
use jigsaw_engine::{Color, DrawSurface, OutlineCommand, OutlinePath, Rect, Shadow, StrokeStyle, Viewport};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, Path2d};

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    image: Option<HtmlImageElement>,
}

impl CanvasSurface {
    /// Attach to the `<canvas>` with the given element id.
    pub fn from_element_id(canvas_id: &str) -> Result<Self, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element #{}", canvas_id)))?
            .dyn_into()?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into()?;
        Ok(Self { canvas, ctx, image: None })
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.canvas.width() as f32, self.canvas.height() as f32)
    }

    /// Resize the backing store to `viewport`.
    pub fn set_size(&mut self, viewport: Viewport) {
        self.canvas.set_width(viewport.width.max(0.0) as u32);
        self.canvas.set_height(viewport.height.max(0.0) as u32);
    }

    pub fn set_image(&mut self, image: Option<HtmlImageElement>) {
        self.image = image;
    }

    /// Run `draw` translated by `offset`, restoring all canvas state after.
    fn scoped(&self, offset: Vec2, draw: impl FnOnce(&CanvasRenderingContext2d) -> Result<(), JsValue>) {
        self.ctx.save();
        let result = self
            .ctx
            .translate(offset.x as f64, offset.y as f64)
            .and_then(|_| draw(&self.ctx));
        self.ctx.restore();
        if let Err(err) = result {
            log::warn!("canvas draw failed: {:?}", err);
        }
    }
}

fn to_path2d(outline: &OutlinePath) -> Result<Path2d, JsValue> {
    let path = Path2d::new()?;
    for cmd in outline.commands() {
        match *cmd {
            OutlineCommand::MoveTo(p) => path.move_to(p.x as f64, p.y as f64),
            OutlineCommand::LineTo(p) => path.line_to(p.x as f64, p.y as f64),
            OutlineCommand::CubicTo { ctrl1, ctrl2, to } => path.bezier_curve_to(
                ctrl1.x as f64,
                ctrl1.y as f64,
                ctrl2.x as f64,
                ctrl2.y as f64,
                to.x as f64,
                to.y as f64,
            ),
            OutlineCommand::Close => path.close_path(),
        }
    }
    Ok(path)
}

impl DrawSurface for CanvasSurface {
    fn image_ready(&self) -> bool {
        self.image
            .as_ref()
            .map_or(false, |img| img.complete() && img.natural_width() > 0)
    }

    fn clear(&mut self, viewport: Viewport) {
        self.ctx
            .clear_rect(0.0, 0.0, viewport.width as f64, viewport.height as f64);
    }

    fn draw_clipped_image(&mut self, path: &OutlinePath, offset: Vec2, src: Rect, dst: Rect) {
        let Some(image) = self.image.as_ref() else {
            return;
        };
        self.scoped(offset, |ctx| {
            ctx.clip_with_path_2d(&to_path2d(path)?);
            ctx.draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                image,
                src.x as f64,
                src.y as f64,
                src.w as f64,
                src.h as f64,
                dst.x as f64,
                dst.y as f64,
                dst.w as f64,
                dst.h as f64,
            )
        });
    }

    fn stroke_path(&mut self, path: &OutlinePath, offset: Vec2, style: &StrokeStyle) {
        self.scoped(offset, |ctx| {
            ctx.set_stroke_style_str(&style.color.to_css());
            ctx.set_line_width(style.width as f64);
            if let Some([on, off]) = style.dash {
                let dash = js_sys::Array::of2(&JsValue::from_f64(on as f64), &JsValue::from_f64(off as f64));
                ctx.set_line_dash(&dash)?;
            }
            ctx.stroke_with_path(&to_path2d(path)?);
            Ok(())
        });
    }

    fn fill_path(&mut self, path: &OutlinePath, offset: Vec2, color: Color) {
        self.scoped(offset, |ctx| {
            ctx.set_fill_style_str(&color.to_css());
            ctx.fill_with_path_2d(&to_path2d(path)?);
            Ok(())
        });
    }

    fn set_shadow(&mut self, shadow: Option<Shadow>) {
        let shadow = shadow.unwrap_or(Shadow {
            color: Color::TRANSPARENT,
            blur: 0.0,
            offset: Vec2::ZERO,
        });
        self.ctx.set_shadow_color(&shadow.color.to_css());
        self.ctx.set_shadow_blur(shadow.blur as f64);
        self.ctx.set_shadow_offset_x(shadow.offset.x as f64);
        self.ctx.set_shadow_offset_y(shadow.offset.y as f64);
    }
}
