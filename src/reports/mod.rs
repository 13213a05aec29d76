mod grid;
mod tables;

pub use self::grid::print_layout as print_layout_grid;
pub use self::tables::{
    detail as print_detail, metrics as print_metrics, ranking as print_ranking,
    score_breakdown as print_score_breakdown, telemetry as print_telemetry,
};
