use super::resolve_layout;
use crate::reports;
use crate::Session;
use clap::Args;
use keycraft::analyser::Analyser;
use keycraft::error::KcResult;
use keycraft::scorer::{breakdown, score};

#[derive(Args, Debug, Clone)]
pub struct AnalyseArgs {
    /// Layout JSON files or built-in names (qwerty, colemak-dh, ...).
    #[arg(required = true)]
    pub layouts: Vec<String>,

    /// Also list the n-grams behind this metric (e.g. SFB, 2RL-IN, F3).
    #[arg(short, long)]
    pub detail: Option<String>,

    /// Rows shown for --detail.
    #[arg(long, default_value_t = 20)]
    pub top: usize,
}

pub fn run(args: &AnalyseArgs, session: &Session) -> KcResult<()> {
    let layouts = args
        .layouts
        .iter()
        .map(|a| resolve_layout(a))
        .collect::<KcResult<Vec<_>>>()?;

    let analysers: Vec<Analyser> = layouts
        .iter()
        .map(|l| Analyser::new(l, &session.corpus, &session.targets))
        .collect();

    for a in &analysers {
        reports::print_layout_grid(a.layout);
        let total = score(&a.metrics, &session.weights);
        reports::print_score_breakdown(&breakdown(&a.metrics, &session.weights), total);
    }

    let columns: Vec<(&str, &_)> = analysers
        .iter()
        .map(|a| (a.layout.name.as_str(), &a.metrics))
        .collect();
    reports::print_metrics(&columns);

    if let Some(metric) = &args.detail {
        for a in &analysers {
            let rows = a.detail(metric)?;
            reports::print_detail(&a.layout.name, metric, &rows, args.top);
        }
    }
    Ok(())
}
