//! Static sanmeigaku correspondence tables.
//!
//! Everything downstream (pillars, balance, scoring) is a lookup into these.
//! The three score matrices are deliberately distinct — the yearly, daily and
//! compatibility readings each use their own table and they do not agree.

use serde::Serialize;

/// The ten heavenly stems, in cycle order.
pub const STEM_SYMBOLS: [&str; 10] =
    ["甲", "乙", "丙", "丁", "戊", "己", "庚", "辛", "壬", "癸"];

/// The twelve earthly branches, in cycle order.
pub const BRANCH_SYMBOLS: [&str; 12] =
    ["子", "丑", "寅", "卯", "辰", "巳", "午", "未", "申", "酉", "戌", "亥"];

/// Five elements in the fixed table order used for dominance resolution
/// and matrix indexing: wood, fire, earth, metal, water.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Element {
    Wood,
    Fire,
    Earth,
    Metal,
    Water,
}

impl Element {
    pub const ALL: [Element; 5] = [
        Element::Wood,
        Element::Fire,
        Element::Earth,
        Element::Metal,
        Element::Water,
    ];

    pub fn index(self) -> usize {
        match self {
            Element::Wood => 0,
            Element::Fire => 1,
            Element::Earth => 2,
            Element::Metal => 3,
            Element::Water => 4,
        }
    }

    pub fn from_index(i: usize) -> Element {
        Element::ALL[i % 5]
    }

    pub fn symbol(self) -> &'static str {
        ["木", "火", "土", "金", "水"][self.index()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Polarity {
    Yang,
    Yin,
}

impl Polarity {
    pub fn symbol(self) -> &'static str {
        match self {
            Polarity::Yang => "陽",
            Polarity::Yin => "陰",
        }
    }
}

/// A heavenly stem, stored as its cycle index (0 = 甲 … 9 = 癸).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stem(u8);

impl Stem {
    /// Wrap any integer into the 10-stem cycle (negative-safe).
    pub fn from_cycle(i: i64) -> Stem {
        Stem(i.rem_euclid(10) as u8)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn symbol(self) -> &'static str {
        STEM_SYMBOLS[self.index()]
    }

    /// 甲乙→木, 丙丁→火, 戊己→土, 庚辛→金, 壬癸→水.
    pub fn element(self) -> Element {
        Element::from_index(self.index() / 2)
    }

    /// Even stems are yang, odd stems are yin.
    pub fn polarity(self) -> Polarity {
        if self.index() % 2 == 0 {
            Polarity::Yang
        } else {
            Polarity::Yin
        }
    }
}

/// An earthly branch, stored as its cycle index (0 = 子 … 11 = 亥).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Branch(u8);

impl Branch {
    pub fn from_cycle(i: i64) -> Branch {
        Branch(i.rem_euclid(12) as u8)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn symbol(self) -> &'static str {
        BRANCH_SYMBOLS[self.index()]
    }
}

/// One stem-branch pair, displayed as a two-character label like 庚午.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StemBranch {
    pub stem: Stem,
    pub branch: Branch,
}

impl StemBranch {
    pub fn new(stem: Stem, branch: Branch) -> StemBranch {
        StemBranch { stem, branch }
    }

    /// Position in the 60-pair sexagenary cycle: stem `i mod 10`, branch `i mod 12`.
    pub fn from_cycle(i: i64) -> StemBranch {
        StemBranch {
            stem: Stem::from_cycle(i),
            branch: Branch::from_cycle(i),
        }
    }

    pub fn label(self) -> String {
        format!("{}{}", self.stem.symbol(), self.branch.symbol())
    }
}

/// Seasonal element per 0-indexed calendar month, yearly-fortune path.
/// Winter (Dec–Feb) water, spring wood, summer fire, Sep–Nov earth.
pub fn season_element(month0: usize) -> Element {
    const TABLE: [Element; 12] = [
        Element::Water,
        Element::Water,
        Element::Wood,
        Element::Wood,
        Element::Wood,
        Element::Fire,
        Element::Fire,
        Element::Fire,
        Element::Earth,
        Element::Earth,
        Element::Earth,
        Element::Water,
    ];
    TABLE[month0 % 12]
}

/// Month element per 0-indexed calendar month, daily-fortune path.
/// Differs from [`season_element`]: autumn months map to metal here.
pub fn daily_month_element(month0: usize) -> Element {
    const TABLE: [Element; 12] = [
        Element::Water,
        Element::Water,
        Element::Wood,
        Element::Wood,
        Element::Wood,
        Element::Fire,
        Element::Fire,
        Element::Fire,
        Element::Metal,
        Element::Metal,
        Element::Metal,
        Element::Water,
    ];
    TABLE[month0 % 12]
}

/// Yearly-fortune compatibility scores, `[source][target]` in
/// wood/fire/earth/metal/water order. Generation pairs score 85.
pub const YEARLY_MATRIX: [[u8; 5]; 5] = [
    [65, 85, 60, 40, 75],
    [75, 65, 85, 45, 40],
    [45, 75, 65, 85, 55],
    [40, 45, 75, 65, 85],
    [85, 40, 45, 75, 65],
];

/// Daily-fortune compatibility scores. Not the same table as the yearly one.
pub const DAILY_MATRIX: [[u8; 5]; 5] = [
    [60, 80, 40, 30, 70],
    [70, 60, 80, 40, 30],
    [50, 70, 60, 80, 40],
    [30, 50, 70, 60, 80],
    [80, 30, 50, 70, 60],
];

/// Two-person compatibility scores. Asymmetric off the diagonal
/// (木→火 is 90 but 火→木 is 70); the diagonal is a uniform 60.
pub const COMPAT_MATRIX: [[u8; 5]; 5] = [
    [60, 90, 50, 30, 70],
    [70, 60, 90, 40, 30],
    [40, 70, 60, 90, 50],
    [30, 40, 70, 60, 90],
    [90, 30, 40, 70, 60],
];

pub fn yearly_score(source: Element, target: Element) -> u8 {
    YEARLY_MATRIX[source.index()][target.index()]
}

pub fn daily_score(source: Element, target: Element) -> u8 {
    DAILY_MATRIX[source.index()][target.index()]
}

pub fn compat_score(source: Element, target: Element) -> u8 {
    COMPAT_MATRIX[source.index()][target.index()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stem_elements_follow_pairs() {
        assert_eq!(Stem::from_cycle(0).element(), Element::Wood);
        assert_eq!(Stem::from_cycle(1).element(), Element::Wood);
        assert_eq!(Stem::from_cycle(6).element(), Element::Metal);
        assert_eq!(Stem::from_cycle(9).element(), Element::Water);
    }

    #[test]
    fn stem_polarity_alternates() {
        assert_eq!(Stem::from_cycle(0).polarity(), Polarity::Yang);
        assert_eq!(Stem::from_cycle(1).polarity(), Polarity::Yin);
        assert_eq!(Stem::from_cycle(6).polarity(), Polarity::Yang);
    }

    #[test]
    fn negative_cycles_wrap() {
        assert_eq!(Stem::from_cycle(-1).symbol(), "癸");
        assert_eq!(Branch::from_cycle(-1).symbol(), "亥");
    }

    #[test]
    fn all_matrix_entries_in_range() {
        for m in [YEARLY_MATRIX, DAILY_MATRIX, COMPAT_MATRIX] {
            for row in m {
                for v in row {
                    assert!(v <= 100);
                }
            }
        }
    }

    #[test]
    fn matrices_are_distinct() {
        assert_ne!(YEARLY_MATRIX, DAILY_MATRIX);
        assert_ne!(DAILY_MATRIX, COMPAT_MATRIX);
    }

    #[test]
    fn compat_diagonal_uniform_but_asymmetric() {
        for e in Element::ALL {
            assert_eq!(compat_score(e, e), 60);
        }
        assert_eq!(compat_score(Element::Wood, Element::Fire), 90);
        assert_eq!(compat_score(Element::Fire, Element::Wood), 70);
    }

    #[test]
    fn season_tables_disagree_in_autumn() {
        assert_eq!(season_element(8), Element::Earth);
        assert_eq!(daily_month_element(8), Element::Metal);
    }
}
