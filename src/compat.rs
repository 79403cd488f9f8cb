//! Two-person compatibility from the year-stem elements of both birthdates.
//!
//! Uses the generation/control matrix, which is asymmetric: person→partner is
//! not the same lookup as partner→person, and that asymmetry is load-bearing.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::ganzhi::LegacyProvider;
use crate::tables::compat_score;

#[derive(Debug, Clone, Serialize)]
pub struct Compatibility {
    pub score: u8,
    pub result: String,
    pub advice: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityReading {
    pub person_kanshi: String,
    pub partner_kanshi: String,
    pub compatibility: Compatibility,
}

fn band(score: u8) -> &'static str {
    if score >= 80 {
        "とても相性が良い"
    } else if score >= 60 {
        "相性が良い"
    } else if score >= 40 {
        "普通の相性"
    } else {
        "相性があまり良くない"
    }
}

fn advice(score: u8) -> &'static str {
    if score >= 80 {
        "お互いを高め合える関係です。素直な気持ちで接することで、さらに絆が深まるでしょう。"
    } else if score >= 60 {
        "基本的に良好な関係を築けますが、時には譲り合いの精神が必要です。"
    } else if score >= 40 {
        "互いの違いを理解し、尊重することで関係は改善します。コミュニケーションを大切にしましょう。"
    } else {
        "理解し合うのに時間がかかるかもしれません。相手の立場に立って考えることが大切です。"
    }
}

pub fn analyze(person: NaiveDate, partner: NaiveDate) -> CompatibilityReading {
    let person_pair = LegacyProvider::year_pair(person.year());
    let partner_pair = LegacyProvider::year_pair(partner.year());
    let score = compat_score(
        person_pair.stem.element(),
        partner_pair.stem.element(),
    );
    CompatibilityReading {
        person_kanshi: person_pair.label(),
        partner_kanshi: partner_pair.label(),
        compatibility: Compatibility {
            score,
            result: band(score).to_string(),
            advice: advice(score).to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn same_birth_year_hits_the_diagonal_regardless_of_order() {
        let a = analyze(d(1990, 1, 1), d(1990, 12, 31));
        let b = analyze(d(1990, 12, 31), d(1990, 1, 1));
        assert_eq!(a.compatibility.score, 60);
        assert_eq!(b.compatibility.score, 60);
    }

    #[test]
    fn off_diagonal_is_asymmetric() {
        // 1984 (甲子, wood) vs 1986 (丙寅, fire): wood→fire 90, fire→wood 70
        let ab = analyze(d(1984, 6, 1), d(1986, 6, 1));
        let ba = analyze(d(1986, 6, 1), d(1984, 6, 1));
        assert_eq!(ab.compatibility.score, 90);
        assert_eq!(ba.compatibility.score, 70);
        assert_ne!(ab.compatibility.score, ba.compatibility.score);
    }

    #[test]
    fn bands_at_boundaries() {
        assert_eq!(band(90), "とても相性が良い");
        assert_eq!(band(80), "とても相性が良い");
        assert_eq!(band(70), "相性が良い");
        assert_eq!(band(50), "普通の相性");
        assert_eq!(band(30), "相性があまり良くない");
    }
}
