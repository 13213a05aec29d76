use crate::error::KcResult;
use crate::geometry::LayoutType;
use crate::layout::SplitLayout;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

#[derive(Debug, Clone, Copy, EnumIter, EnumString, Display, PartialEq, Eq, Hash)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum KnownLayout {
    Qwerty,
    Colemak,
    #[strum(serialize = "colemak-dh")]
    ColemakDh,
    Dvorak,
    Workman,
    Graphite,
}

impl KnownLayout {
    // Three rows of 12 columns, then 6 thumbs. Outer columns and thumbs are
    // mostly unused ('~').
    pub fn get_str(&self) -> &'static str {
        match self {
            Self::Qwerty => "~qwertyuiop~ ~asdfghjkl;' ~zxcvbnm,./~ ~~~~~~",
            Self::Colemak => "~qwfpgjluy;~ ~arstdhneio' ~zxcvbkm,./~ ~~~~~~",
            Self::ColemakDh => "~qwfpbjluy;~ ~arstgmneio' ~zxcdvkh,./~ ~~~~~~",
            Self::Dvorak => "~',.pyfgcrl~ ~aoeuidhtns- ~;qjkxbmwvz~ ~~~~~~",
            Self::Workman => "~qdrwbjfup;~ ~ashtgyneoi' ~zxmcvkl,./~ ~~~~~~",
            Self::Graphite => "~bldwz'fouj~ ~nrtsgyhaei, ~qxmcvkp.-/~ ~~~~~~",
        }
    }

    pub fn layout_type(&self) -> LayoutType {
        LayoutType::Rowstag
    }

    pub fn to_layout(&self) -> KcResult<SplitLayout> {
        SplitLayout::from_str_runes(&self.to_string(), self.layout_type(), self.get_str())
    }
}

pub fn get_all_layouts() -> KcResult<Vec<SplitLayout>> {
    KnownLayout::iter().map(|l| l.to_layout()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_known_layouts_are_valid() {
        let layouts = get_all_layouts().unwrap();
        assert_eq!(layouts.len(), KnownLayout::iter().count());
        let qwerty = &layouts[0];
        for other in &layouts[1..] {
            let letters = |l: &SplitLayout| {
                let mut v: Vec<char> = l.runes.iter().copied().filter(|c| c.is_alphabetic()).collect();
                v.sort_unstable();
                v
            };
            assert_eq!(letters(qwerty), letters(other), "{}", other.name);
        }
    }

    #[test]
    fn test_parse_name() {
        let l: KnownLayout = "colemak-dh".parse().unwrap();
        assert_eq!(l, KnownLayout::ColemakDh);
        assert_eq!(KnownLayout::Qwerty.to_string(), "qwerty");
    }
}
