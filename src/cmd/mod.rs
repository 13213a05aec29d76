pub mod analyse;
pub mod optimise;
pub mod rank;

use keycraft::error::{KcResult, KeycraftError};
use keycraft::layout::SplitLayout;
use keycraft::layouts::KnownLayout;
use std::path::Path;

/// A layout argument is a JSON file path or the name of a built-in layout.
pub fn resolve_layout(arg: &str) -> KcResult<SplitLayout> {
    let path = Path::new(arg);
    if path.is_file() {
        return SplitLayout::load_from_file(path);
    }
    match arg.parse::<KnownLayout>() {
        Ok(known) => known.to_layout(),
        Err(_) => Err(KeycraftError::NotFound(path.to_path_buf())),
    }
}
