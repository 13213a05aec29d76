use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use keycraft::analyser::classify::{TrigramClass, TRIGRAM_FAMILIES};
use keycraft::analyser::{NgramDetail, BIGRAM_METRICS, DERIVED_METRICS, DEVIATION_METRICS, SKIPGRAM_METRICS};
use keycraft::optimizer::Telemetry;
use keycraft::ranking::Ranking;
use keycraft::scorer::ScoreTerm;
use std::collections::BTreeMap;
use strum::IntoEnumIterator;

/// Columns shown in the ranking table besides score and delta.
const RANK_COLUMNS: [&str; 9] = ["SFB", "LSB", "FSB", "SFS", "ALT", "2RL", "3RL", "RED", "HDEV"];

fn right_align_from(table: &mut Table, first: usize, count: usize) {
    for i in first..first + count {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
}

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Display order of metric sections.
fn metric_sections() -> Vec<(&'static str, Vec<String>)> {
    let owned = |names: &[&str]| names.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    let mut trigrams = owned(&TRIGRAM_FAMILIES);
    trigrams.extend(TrigramClass::iter().map(|c| c.to_string()));

    let mut loads = owned(&["H0", "H1"]);
    loads.extend((0..10).map(|f| format!("F{}", f)));
    loads.extend((0..4).map(|r| format!("R{}", r)));
    loads.extend((0..12).map(|c| format!("C{}", c)));

    vec![
        ("Bigrams", owned(&BIGRAM_METRICS)),
        ("Skipgrams", owned(&SKIPGRAM_METRICS)),
        ("Trigrams", trigrams),
        ("Loads", loads),
        ("Deviation", owned(&DEVIATION_METRICS)),
        ("Derived", owned(&DERIVED_METRICS)),
    ]
}

pub fn metrics(columns: &[(&str, &BTreeMap<String, f64>)]) {
    let mut table = new_table();

    let mut header = vec![Cell::new("Metric").add_attribute(Attribute::Bold)];
    header.extend(
        columns
            .iter()
            .map(|(name, _)| Cell::new(name).add_attribute(Attribute::Bold)),
    );
    table.set_header(header);

    for (section, names) in metric_sections() {
        let mut divider = vec![Cell::new(section).fg(Color::Cyan)];
        divider.extend(columns.iter().map(|_| Cell::new("")));
        table.add_row(divider);

        for name in names {
            let mut row = vec![Cell::new(&name)];
            row.extend(columns.iter().map(|(_, m)| {
                Cell::new(format!("{:.3}", m.get(&name).copied().unwrap_or(0.0)))
            }));
            table.add_row(row);
        }
    }

    right_align_from(&mut table, 1, columns.len());
    println!("\n{}", table);
}

pub fn score_breakdown(terms: &[ScoreTerm], total: f64) {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new("Metric").add_attribute(Attribute::Bold),
        Cell::new("Value"),
        Cell::new("Weight"),
        Cell::new("Contribution"),
    ]);

    for t in terms {
        let colour = if t.contribution < 0.0 {
            Color::Red
        } else {
            Color::Green
        };
        table.add_row(vec![
            Cell::new(&t.metric),
            Cell::new(format!("{:.3}", t.value)),
            Cell::new(format!("{:+.3}", t.weight)),
            Cell::new(format!("{:+.4}", t.contribution)).fg(colour),
        ]);
    }
    table.add_row(vec![
        Cell::new("Score").add_attribute(Attribute::Bold),
        Cell::new(""),
        Cell::new(""),
        Cell::new(format!("{:+.4}", total)).add_attribute(Attribute::Bold),
    ]);

    right_align_from(&mut table, 1, 3);
    println!("{}", table);
}

pub fn detail(layout: &str, metric: &str, rows: &[NgramDetail], top: usize) {
    println!("\n{} on {}: {} n-grams", metric, layout, rows.len());
    let mut table = new_table();
    table.set_header(vec!["N-gram", "Count", "%", "Class"]);
    for r in rows.iter().take(top) {
        table.add_row(vec![
            Cell::new(&r.ngram),
            Cell::new(r.count),
            Cell::new(format!("{:.3}", r.percentage)),
            Cell::new(&r.class),
        ]);
    }
    right_align_from(&mut table, 1, 2);
    println!("{}", table);
}

pub fn ranking(ranking: &Ranking) {
    let mut table = new_table();

    let mut header = vec![
        Cell::new("#"),
        Cell::new("Layout").add_attribute(Attribute::Bold),
        Cell::new("Score").fg(Color::Cyan),
        Cell::new(format!("Δ {}", ranking.baseline)),
    ];
    header.extend(RANK_COLUMNS.iter().map(Cell::new));
    table.set_header(header);

    for e in &ranking.entries {
        let mut row = vec![
            Cell::new(e.rank),
            Cell::new(&e.name).add_attribute(Attribute::Bold),
            Cell::new(format!("{:.3}", e.score)).fg(Color::Cyan),
            Cell::new(format!("{:+.3}", e.delta)),
        ];
        row.extend(RANK_COLUMNS.iter().map(|m| {
            Cell::new(format!("{:.2}", e.metrics.get(*m).copied().unwrap_or(0.0)))
        }));
        table.add_row(row);
    }

    let mut median = vec![
        Cell::new(""),
        Cell::new("median").add_attribute(Attribute::Italic),
        Cell::new(""),
        Cell::new(""),
    ];
    median.extend(RANK_COLUMNS.iter().map(|m| {
        Cell::new(format!("{:.2}", ranking.medians.get(*m).copied().unwrap_or(0.0)))
    }));
    table.add_row(median);

    right_align_from(&mut table, 2, 2 + RANK_COLUMNS.len());
    println!("\n{}", table);
}

pub fn telemetry(t: &Telemetry) {
    let mut table = new_table();
    table.set_header(vec!["Run", ""]);
    let rows: Vec<(&str, String)> = vec![
        ("Seed", t.seed.to_string()),
        ("Generations", t.generations.to_string()),
        ("Evaluations", t.evaluations.to_string()),
        ("Breakouts", t.breakouts.to_string()),
        ("Improvements", t.improvements.to_string()),
        ("Initial score", format!("{:.4}", t.initial_score)),
        ("Best score", format!("{:.4}", t.best_score)),
        ("Best at generation", t.best_generation.to_string()),
        ("Elapsed", format!("{:.1}s", t.elapsed_seconds)),
        ("Stopped by", t.stop_reason.to_string()),
    ];
    for (k, v) in rows {
        table.add_row(vec![Cell::new(k), Cell::new(v)]);
    }
    right_align_from(&mut table, 1, 1);
    println!("\n{}", table);
}
