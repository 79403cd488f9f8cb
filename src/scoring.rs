//! Yearly fortune scorer: life-cycle phase, four themed matrix lookups and
//! their band labels, plus the three-tier advice pools.
//!
//! Band thresholds here belong to the yearly path only — the daily path in
//! [`crate::daily`] uses different cut-offs, and the two must not be merged.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::ganzhi::{GanzhiProvider, LegacyProvider};
use crate::tables::{season_element, yearly_score, Element};

/// One themed reading: raw matrix score, band label, canned advice.
#[derive(Debug, Clone, Serialize)]
pub struct ThemeFortune {
    pub score: u8,
    pub result: String,
    pub advice: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KanshiView {
    pub year: String,
    pub month: String,
    pub day: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyFortune {
    pub kanshi: KanshiView,
    pub fortune_cycle: String,
    pub overall: ThemeFortune,
    pub work: ThemeFortune,
    pub love: ThemeFortune,
    pub health: ThemeFortune,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Overall,
    Work,
    Love,
    Health,
}

/// Ten-year life-cycle phases. The age wraps at 60 before bucketing, so ages
/// 60+ restart the cycle; only a negative age (birth after the target year)
/// falls through to the final label.
fn fortune_cycle(age: i64) -> &'static str {
    let phase = ((age % 60) as f64 / 10.0).floor() as i64;
    match phase {
        0 => "基礎形成期",
        1 => "成長期",
        2 => "確立期",
        3 => "安定期",
        4 => "充実期",
        5 => "収穫期",
        _ => "円熟期",
    }
}

/// Yearly-path band labels. ≥80 very good down to <50 caution.
fn yearly_band(score: u8) -> &'static str {
    if score >= 80 {
        "非常に良い"
    } else if score >= 70 {
        "良い"
    } else if score >= 60 {
        "まずまず"
    } else if score >= 50 {
        "普通"
    } else {
        "やや注意"
    }
}

/// Three canned strings per theme, picked at ≥70 / ≥50 / below.
pub fn fortune_advice(score: u8, theme: Theme) -> &'static str {
    let (high, medium, low) = match theme {
        Theme::Overall => (
            "全体的に運気が高まっています。新しいことに挑戦するのに良い時期です。",
            "安定した運気です。計画的に行動すれば良い結果が得られるでしょう。",
            "今は時期を待つことも大切です。無理をせず、基盤を固める活動に集中しましょう。",
        ),
        Theme::Work => (
            "仕事面での成果が表れやすい時期です。積極的に意見を出し、新しいプロジェクトに取り組むと良いでしょう。",
            "堅実な仕事ぶりが評価される時期です。地道な努力を続けましょう。",
            "今は目立った成果を求めるより、スキルアップや人間関係の構築に力を入れると良いでしょう。",
        ),
        Theme::Love => (
            "恋愛運が高まっています。素直な気持ちで接することで、良い関係が築けるでしょう。",
            "穏やかな恋愛運です。焦らず自然体で過ごすことが大切です。",
            "恋愛面では慎重さが必要な時期です。相手をよく観察し、理解を深めることに集中しましょう。",
        ),
        Theme::Health => (
            "健康面は良好です。この調子を維持するため、適度な運動や栄養バランスの良い食事を心がけましょう。",
            "体調は安定していますが、疲れが溜まりやすい時期かもしれません。十分な休息を取りましょう。",
            "健康面に注意が必要です。無理をせず、規則正しい生活を心がけ、早め早めの対処を。",
        ),
    };
    if score >= 70 {
        high
    } else if score >= 50 {
        medium
    } else {
        low
    }
}

fn theme_fortune(score: u8, theme: Theme) -> ThemeFortune {
    ThemeFortune {
        score,
        result: yearly_band(score).to_string(),
        advice: fortune_advice(score, theme).to_string(),
    }
}

/// Full yearly reading against `target_year`. The health theme compares the
/// birth-year element with the current month's seasonal element, so `today`
/// is injected rather than read from a clock.
pub fn yearly_fortune(
    birthdate: NaiveDate,
    target_year: i32,
    today: NaiveDate,
) -> YearlyFortune {
    let chart = LegacyProvider.chart(birthdate);
    let age = i64::from(target_year) - i64::from(birthdate.year());

    let year_el = chart.year.stem.element();
    let month_el = chart.month.stem.element();
    let day_el = chart.day.stem.element();
    let current_year_el = LegacyProvider::year_pair(target_year).stem.element();
    let season_el = season_element(today.month0() as usize);

    YearlyFortune {
        kanshi: KanshiView {
            year: chart.year.label(),
            month: chart.month.label(),
            day: chart.day.label(),
        },
        fortune_cycle: fortune_cycle(age).to_string(),
        overall: theme_fortune(yearly_score(year_el, current_year_el), Theme::Overall),
        work: theme_fortune(yearly_score(day_el, current_year_el), Theme::Work),
        love: theme_fortune(yearly_score(month_el, current_year_el), Theme::Love),
        health: theme_fortune(yearly_score(year_el, season_el), Theme::Health),
    }
}

/// Birth-year element under the legacy strategy.
pub fn legacy_year_element(birthdate: NaiveDate) -> Element {
    LegacyProvider::year_pair(birthdate.year()).stem.element()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_phases() {
        assert_eq!(fortune_cycle(0), "基礎形成期");
        assert_eq!(fortune_cycle(9), "基礎形成期");
        assert_eq!(fortune_cycle(10), "成長期");
        assert_eq!(fortune_cycle(35), "安定期");
        assert_eq!(fortune_cycle(59), "収穫期");
        // the cycle wraps at 60 rather than saturating
        assert_eq!(fortune_cycle(60), "基礎形成期");
        assert_eq!(fortune_cycle(95), "安定期");
        assert_eq!(fortune_cycle(-5), "円熟期");
    }

    #[test]
    fn yearly_bands_at_boundaries() {
        assert_eq!(yearly_band(85), "非常に良い");
        assert_eq!(yearly_band(80), "非常に良い");
        assert_eq!(yearly_band(75), "良い");
        assert_eq!(yearly_band(65), "まずまず");
        assert_eq!(yearly_band(55), "普通");
        assert_eq!(yearly_band(45), "やや注意");
    }

    #[test]
    fn advice_tiers() {
        let high = fortune_advice(85, Theme::Work);
        let mid = fortune_advice(55, Theme::Work);
        let low = fortune_advice(45, Theme::Work);
        assert_ne!(high, mid);
        assert_ne!(mid, low);
        assert_eq!(fortune_advice(70, Theme::Work), high);
        assert_eq!(fortune_advice(50, Theme::Work), mid);
    }
}
