use comfy_table::presets::ASCII_FULL;
use comfy_table::{Cell, CellAlignment, Table};
use keycraft::geometry::{COLUMNS, SLOT_COUNT, THUMB_START};
use keycraft::layout::{SplitLayout, PLACEHOLDER};

fn key_cell(c: char) -> Cell {
    let label = if c == PLACEHOLDER {
        " ".to_string()
    } else {
        c.to_string()
    };
    Cell::new(label).set_alignment(CellAlignment::Center)
}

pub fn print_layout(layout: &SplitLayout) {
    println!("\nLayout: {} ({})", layout.name, layout.layout_type);
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);

    // A blank column separates the hands.
    for row in layout.runes[..THUMB_START].chunks(COLUMNS) {
        let mut cells: Vec<Cell> = row[..6].iter().map(|&c| key_cell(c)).collect();
        cells.push(Cell::new(""));
        cells.extend(row[6..].iter().map(|&c| key_cell(c)));
        table.add_row(cells);
    }

    // Thumbs sit under columns 3..=8.
    let mut thumbs: Vec<Cell> = (0..3).map(|_| Cell::new("")).collect();
    thumbs.extend(layout.runes[THUMB_START..THUMB_START + 3].iter().map(|&c| key_cell(c)));
    thumbs.push(Cell::new(""));
    thumbs.extend(layout.runes[THUMB_START + 3..SLOT_COUNT].iter().map(|&c| key_cell(c)));
    thumbs.extend((0..3).map(|_| Cell::new("")));
    table.add_row(thumbs);

    println!("{}", table);
}
