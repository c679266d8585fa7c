// 🎓 Grade Scale - Rules as Data
// Maps a percentage score to a letter grade and its point value.
//
// The scale is a fixed table of (minimum %, letter, points) bands, highest
// threshold first. Anything below the lowest band is the failing band.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// LETTER
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Letter {
    S,
    A,
    B,
    C,
    D,
    E,
    F,
}

impl Letter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Letter::S => "S",
            Letter::A => "A",
            Letter::B => "B",
            Letter::C => "C",
            Letter::D => "D",
            Letter::E => "E",
            Letter::F => "F",
        }
    }

    pub fn parse(s: &str) -> Option<Letter> {
        match s {
            "S" => Some(Letter::S),
            "A" => Some(Letter::A),
            "B" => Some(Letter::B),
            "C" => Some(Letter::C),
            "D" => Some(Letter::D),
            "E" => Some(Letter::E),
            "F" => Some(Letter::F),
            _ => None,
        }
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// GRADE
// ============================================================================

/// A letter grade together with the points it contributes to a GPA
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grade {
    pub letter: Letter,
    pub points: u32,
}

impl Grade {
    /// Look up the band for a letter (used when restoring stored grades)
    pub fn from_letter(letter: Letter) -> Grade {
        GRADE_BANDS
            .iter()
            .find(|band| band.letter == letter)
            .map(GradeBand::grade)
            .unwrap_or(FAILING_BAND.grade())
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter)
    }
}

// ============================================================================
// GRADE SCALE
// ============================================================================

#[derive(Debug, Clone, Copy)]
struct GradeBand {
    minimum: f64,
    letter: Letter,
    points: u32,
}

impl GradeBand {
    const fn new(minimum: f64, letter: Letter, points: u32) -> Self {
        GradeBand { minimum, letter, points }
    }

    fn grade(&self) -> Grade {
        Grade {
            letter: self.letter,
            points: self.points,
        }
    }
}

/// Passing bands, highest threshold first
const GRADE_BANDS: [GradeBand; 6] = [
    GradeBand::new(90.0, Letter::S, 10),
    GradeBand::new(80.0, Letter::A, 9),
    GradeBand::new(70.0, Letter::B, 8),
    GradeBand::new(60.0, Letter::C, 7),
    GradeBand::new(50.0, Letter::D, 6),
    GradeBand::new(40.0, Letter::E, 5),
];

const FAILING_BAND: GradeBand = GradeBand::new(f64::NEG_INFINITY, Letter::F, 0);

/// Grade for a percentage score
///
/// Total over all reals: values above 100 land in the top band, values below
/// 40 (including negatives and NaN) land in the failing band.
pub fn grade_for(percentage: f64) -> Grade {
    GRADE_BANDS
        .iter()
        .find(|band| percentage >= band.minimum)
        .unwrap_or(&FAILING_BAND)
        .grade()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_boundaries() {
        assert_eq!(grade_for(90.0).letter, Letter::S);
        assert_eq!(grade_for(89.999).letter, Letter::A);
        assert_eq!(grade_for(80.0).letter, Letter::A);
        assert_eq!(grade_for(70.0).letter, Letter::B);
        assert_eq!(grade_for(60.0).letter, Letter::C);
        assert_eq!(grade_for(50.0).letter, Letter::D);
        assert_eq!(grade_for(40.0).letter, Letter::E);
        assert_eq!(grade_for(39.999).letter, Letter::F);
    }

    #[test]
    fn test_points_per_letter() {
        assert_eq!(grade_for(95.0).points, 10);
        assert_eq!(grade_for(85.0).points, 9);
        assert_eq!(grade_for(45.0).points, 5);
        assert_eq!(grade_for(10.0).points, 0);
    }

    #[test]
    fn test_out_of_range_inputs_degrade_to_nearest_band() {
        assert_eq!(grade_for(150.0).letter, Letter::S);
        assert_eq!(grade_for(-20.0).letter, Letter::F);
        assert_eq!(grade_for(f64::INFINITY).letter, Letter::S);
        assert_eq!(grade_for(f64::NEG_INFINITY).letter, Letter::F);
        assert_eq!(grade_for(f64::NAN).letter, Letter::F);
    }

    #[test]
    fn test_points_are_monotonic() {
        let mut previous = 0;
        let mut pct = -10.0;
        while pct <= 110.0 {
            let points = grade_for(pct).points;
            assert!(points >= previous, "points dropped at {}", pct);
            previous = points;
            pct += 0.25;
        }
    }

    #[test]
    fn test_from_letter_matches_scale() {
        assert_eq!(Grade::from_letter(Letter::S), grade_for(90.0));
        assert_eq!(Grade::from_letter(Letter::E), grade_for(40.0));
        assert_eq!(Grade::from_letter(Letter::F), grade_for(0.0));
    }

    #[test]
    fn test_letter_parse() {
        assert_eq!(Letter::parse("B"), Some(Letter::B));
        assert_eq!(Letter::parse("b"), None);
        assert_eq!(Letter::S.to_string(), "S");
    }
}
