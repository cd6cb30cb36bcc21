use serde::{Deserialize, Serialize};

/// Degree options offered for the undergraduate block.
pub const UG_DEGREES: &[&str] = &[
    "B.Tech / BE",
    "B.Sc",
    "BCA",
    "B.Com",
    "BBA",
    "B.Arch",
    "B.Des",
    "B.Pharm",
    "BA",
    "BFA",
    "Integrated M.Sc",
    "Integrated M.Tech",
    "B.Ed",
    "BVoc",
    "Other",
];

/// Which post-tenth record is collected: class 12 or a diploma. Never both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TwelfthTrack {
    #[default]
    Class12,
    Diploma,
}

impl TwelfthTrack {
    /// `"12th"` selects class 12; any other selector value means diploma.
    pub fn from_selector(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("12th") {
            TwelfthTrack::Class12
        } else {
            TwelfthTrack::Diploma
        }
    }
}

/// Which education blocks are shown for a given `currentEducation` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Visibility {
    pub class10: bool,
    pub twelfth: bool,
    pub ug: bool,
}

impl Visibility {
    /// Undergraduates see every block. Anything unrecognised falls back to
    /// class 10 plus class 12 with UG hidden.
    pub fn for_level(current_education: &str) -> Self {
        let level = current_education.trim().to_lowercase();
        let is_ug = level.contains("undergraduate")
            || level
                .split(|c: char| !c.is_alphanumeric())
                .any(|token| token == "ug");

        Self {
            class10: true,
            twelfth: true,
            ug: is_ug,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undergraduate_shows_ug() {
        assert!(Visibility::for_level("Undergraduate").ug);
        assert!(Visibility::for_level("UG - 2nd year").ug);
    }

    #[test]
    fn test_ambiguous_level_hides_ug() {
        let vis = Visibility::for_level("Working professional");
        assert!(vis.class10);
        assert!(vis.twelfth);
        assert!(!vis.ug);
    }

    #[test]
    fn test_school_levels_hide_ug() {
        assert!(!Visibility::for_level("Class 12").ug);
        assert!(!Visibility::for_level("Diploma").ug);
        // "drug" must not match the ug token
        assert!(!Visibility::for_level("drug studies").ug);
    }

    #[test]
    fn test_track_selector() {
        assert_eq!(TwelfthTrack::from_selector("12th"), TwelfthTrack::Class12);
        assert_eq!(TwelfthTrack::from_selector("diploma"), TwelfthTrack::Diploma);
    }

    #[test]
    fn test_degree_list_ends_with_other() {
        assert_eq!(UG_DEGREES.last(), Some(&"Other"));
        assert!(UG_DEGREES.contains(&"BCA"));
    }
}
