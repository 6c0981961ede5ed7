use crate::*;

/// Drawing surface the game paints onto, one hexagon at a time.
pub trait CellPainter {
    fn resize_surface_to(&mut self, width: f64, height: f64);

    fn paint_cell(&mut self, coords: Coord2, style: &CellStyle);
}

/// Sizes the surface for `layout` and paints every cell of `board`.
pub fn paint_board<P: CellPainter + ?Sized>(board: &Board, layout: &HexLayout, painter: &mut P) {
    let (width, height) = layout.surface_size();
    painter.resize_surface_to(width, height);
    for (coords, tile) in board.iter_tiles() {
        painter.paint_cell(coords, &CellStyle::for_view(tile.view()));
    }
}

/// Repaints only `cells`, typically the `updated` list of a reveal.
pub fn paint_cells<P: CellPainter + ?Sized>(board: &Board, cells: &[Coord2], painter: &mut P) {
    for &coords in cells {
        painter.paint_cell(coords, &board.style_at(coords));
    }
}
