use hexsweeper_core::{CellPainter, CellStyle, Coord2, HexLayout};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::utils::*;

/// `<canvas>` painter for one board layout.
#[derive(Debug)]
pub(crate) struct HexCanvas {
    element: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    layout: HexLayout,
}

impl HexCanvas {
    pub(crate) fn new(element: HtmlCanvasElement, layout: HexLayout) -> anyhow::Result<Self> {
        let ctx = element
            .get_context("2d")
            .map_err(js_error)?
            .ok_or_else(|| anyhow::anyhow!("Canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| anyhow::anyhow!("Canvas 2d context has an unexpected type"))?;

        Ok(Self {
            element,
            ctx,
            layout,
        })
    }

    pub(crate) fn layout(&self) -> &HexLayout {
        &self.layout
    }

    // Resizing a canvas resets its context, so text settings are applied afterwards.
    fn apply_text_settings(&self) {
        self.ctx
            .set_font(&format!("{}px 'Courier New'", self.layout.font_size()));
        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("middle");
    }

    fn trace_hex(&self, coords: Coord2) {
        let [first, rest @ ..] = self.layout.vertices(coords);
        self.ctx.begin_path();
        self.ctx.move_to(first.0, first.1);
        for (x, y) in rest {
            self.ctx.line_to(x, y);
        }
        self.ctx.close_path();
    }
}

impl CellPainter for HexCanvas {
    fn resize_surface_to(&mut self, width: f64, height: f64) {
        self.element.set_width(width.ceil() as u32);
        self.element.set_height(height.ceil() as u32);
        self.apply_text_settings();
    }

    fn paint_cell(&mut self, coords: Coord2, style: &CellStyle) {
        if !self.layout.contains(coords) {
            return;
        }

        self.trace_hex(coords);
        self.ctx.set_fill_style_str(style.fill.css());
        self.ctx.fill();
        self.ctx.set_stroke_style_str(style.border.css());
        self.ctx.stroke();

        if let Some(label) = style.label {
            let (x, y) = self.layout.cell_center(coords);
            self.ctx.set_fill_style_str(label.color().css());
            if let Err(err) = self.ctx.fill_text(&label.to_string(), x, y) {
                log::warn!("Could not draw label at {:?}: {:?}", coords, err);
            }
        }
    }
}
