use std::cell::RefCell;
use std::f64::consts::PI;
use std::rc::Rc;

use gtk4 as gtk;
use gtk4::prelude::*;

use super::grid::{COLS, ROWS, TileColor};
use super::state::AppState;

pub const CONTENT_MARGIN: i32 = 12;
pub const TILE_GAP: f64 = 4.0;

fn rounded_rect(cr: &cairo::Context, x: f64, y: f64, size: f64, radius: f64) {
    cr.new_sub_path();
    cr.arc(x + size - radius, y + radius, radius, -PI / 2.0, 0.0);
    cr.arc(x + size - radius, y + size - radius, radius, 0.0, PI / 2.0);
    cr.arc(x + radius, y + size - radius, radius, PI / 2.0, PI);
    cr.arc(x + radius, y + radius, radius, PI, 3.0 * PI / 2.0);
    cr.close_path();
}

fn draw_tile(cr: &cairo::Context, x: f64, y: f64, size: f64, color: TileColor) {
    let radius = size * 0.15;
    let (r, g, b) = color.rgb();
    rounded_rect(cr, x, y, size, radius);
    cr.set_source_rgb(r, g, b);
    let _ = cr.fill_preserve();

    // Cleared tiles are white, so they get a darker outline.
    cr.set_source_rgba(0.0, 0.0, 0.0, if color.is_cleared() { 0.18 } else { 0.08 });
    cr.set_line_width(1.0);
    let _ = cr.stroke();
}

pub fn build_board_area(state: &Rc<RefCell<AppState>>) -> gtk::DrawingArea {
    let area = gtk::DrawingArea::builder()
        .hexpand(true)
        .vexpand(true)
        .content_width(280)
        .content_height(280)
        .css_classes(vec!["game-board"])
        .build();

    let state_draw = state.clone();
    area.set_draw_func(move |_, cr, width, height| {
        let st = state_draw.borrow();
        let side = width.min(height) as f64;
        let tile = (side - TILE_GAP * (COLS as f64 - 1.0)) / COLS as f64;
        if tile <= 0.0 {
            return;
        }
        let offset_x = (width as f64 - side) / 2.0;
        let offset_y = (height as f64 - side) / 2.0;

        cr.set_antialias(cairo::Antialias::Best);
        for (row, cells) in st.session.game.grid.rows().enumerate().take(ROWS) {
            for (col, color) in cells.iter().enumerate() {
                let x = offset_x + col as f64 * (tile + TILE_GAP);
                let y = offset_y + row as f64 * (tile + TILE_GAP);
                draw_tile(cr, x, y, tile, *color);
            }
        }
    });

    area
}
