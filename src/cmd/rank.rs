use super::resolve_layout;
use crate::reports;
use crate::Session;
use clap::Args;
use keycraft::error::KcResult;
use keycraft::layouts::get_all_layouts;
use keycraft::ranking::rank;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct RankArgs {
    /// Layouts to rank; every built-in layout when omitted.
    pub layouts: Vec<String>,

    /// Layout that deltas are measured against (default: the winner).
    #[arg(short, long)]
    pub baseline: Option<String>,

    /// Write the full ranking as CSV.
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

pub fn run(args: &RankArgs, session: &Session) -> KcResult<()> {
    let layouts = if args.layouts.is_empty() {
        get_all_layouts()?
    } else {
        args.layouts
            .iter()
            .map(|a| resolve_layout(a))
            .collect::<KcResult<Vec<_>>>()?
    };

    info!("🏁 Ranking {} layouts", layouts.len());
    let ranking = rank(
        &layouts,
        &session.corpus,
        &session.weights,
        &session.targets,
        args.baseline.as_deref(),
    )?;

    reports::print_ranking(&ranking);

    if let Some(path) = &args.csv {
        ranking.write_csv(BufWriter::new(File::create(path)?))?;
        info!("💾 Ranking written to {:?}", path);
    }
    Ok(())
}
