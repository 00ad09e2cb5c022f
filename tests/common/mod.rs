//! Synthetic glyph and captcha builders shared by the integration tests.
#![allow(dead_code)]

use glyphmatch::OwnedImage;

pub const GLYPH_WIDTH: usize = 30;
pub const GLYPH_HEIGHT: usize = 50;

/// Rectangles as `(x0, x1, y0, y1)`, half-open.
pub type Rects = &'static [(usize, usize, usize, usize)];

pub const BAR: Rects = &[(12, 18, 8, 42)];
pub const HBAR: Rects = &[(4, 26, 20, 28)];
pub const RING: Rects = &[(5, 25, 8, 12), (5, 25, 38, 42), (5, 9, 8, 42), (21, 25, 8, 42)];
pub const STEPS: Rects = &[(4, 12, 6, 20), (16, 26, 30, 44)];

/// All shapes are made of blocks at least 4px thick, which the
/// resize/blur/Otsu pipeline reproduces exactly at 30x50.
pub const SHAPES: [Rects; 4] = [BAR, HBAR, RING, STEPS];

fn inside(rects: Rects, x: usize, y: usize) -> bool {
    rects
        .iter()
        .any(|&(x0, x1, y0, y1)| (x0..x1).contains(&x) && (y0..y1).contains(&y))
}

/// A white-on-black 30x50 glyph cell.
pub fn glyph_cell(rects: Rects) -> OwnedImage {
    OwnedImage::from_fn(GLYPH_WIDTH, GLYPH_HEIGHT, |x, y| {
        if inside(rects, x, y) {
            255
        } else {
            0
        }
    })
    .unwrap()
}

/// Concatenates cells left to right, then pads `extra` black columns.
pub fn captcha(cells: &[Rects], extra: usize) -> OwnedImage {
    let width = cells.len() * GLYPH_WIDTH + extra;
    OwnedImage::from_fn(width, GLYPH_HEIGHT, |x, y| {
        let cell = x / GLYPH_WIDTH;
        match cells.get(cell) {
            Some(rects) if inside(rects, x % GLYPH_WIDTH, y) => 255,
            _ => 0,
        }
    })
    .unwrap()
}

/// Lists file names in `dir`, sorted.
pub fn list_dir(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect(),
        Err(_) => Vec::new(),
    };
    names.sort();
    names
}
