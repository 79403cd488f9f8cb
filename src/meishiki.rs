//! Natal chart (meishiki) construction and five-element balance analysis.

use chrono::NaiveDate;
use serde::Serialize;

use crate::ganzhi::{GanzhiChart, GanzhiProvider};
use crate::tables::{Element, Polarity, StemBranch};

/// One pillar on the wire: two-character label plus its stem's element and
/// polarity symbols.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PillarView {
    pub ganzhi: String,
    pub element: String,
    pub yin_yang: String,
}

impl PillarView {
    fn from_pair(pair: StemBranch) -> PillarView {
        PillarView {
            ganzhi: pair.label(),
            element: pair.stem.element().symbol().to_string(),
            yin_yang: pair.stem.polarity().symbol().to_string(),
        }
    }
}

/// Fixed 9-slot body-star map attached to every chart. Placeholder values,
/// never derived from the chart itself.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyStars {
    pub center: &'static str,
    pub left: &'static str,
    pub right: &'static str,
    pub top: &'static str,
    pub bottom: &'static str,
    pub left_top: &'static str,
    pub right_top: &'static str,
    pub left_bottom: &'static str,
    pub right_bottom: &'static str,
}

impl Default for BodyStars {
    fn default() -> BodyStars {
        BodyStars {
            center: "調舒星",
            left: "車騎星",
            right: "車騎星",
            top: "禄存星",
            bottom: "天南星",
            left_top: "天胡星",
            right_top: "天将星",
            left_bottom: "龍高星",
            right_bottom: "天将星",
        }
    }
}

/// The flat nine-star list returned beside the chart by `/api/fortune`.
pub const BODY_STAR_GRID: [&str; 9] = [
    "貫索星", "石門星", "鳳閣星",
    "調舒星", "禄存星", "司禄星",
    "車騎星", "牽牛星", "龍高星",
];

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Meishiki {
    pub year: PillarView,
    pub month: PillarView,
    pub day: PillarView,
    pub hour: PillarView,
    pub gender: String,
    pub body_stars: BodyStars,
    #[serde(skip)]
    pub chart: GanzhiChart,
}

pub fn build_meishiki<P: GanzhiProvider>(
    provider: &P,
    birthdate: NaiveDate,
    gender: &str,
) -> Meishiki {
    let chart = provider.chart(birthdate);
    Meishiki {
        year: PillarView::from_pair(chart.year),
        month: PillarView::from_pair(chart.month),
        day: PillarView::from_pair(chart.day),
        hour: PillarView::from_pair(chart.hour),
        gender: gender.to_string(),
        body_stars: BodyStars::default(),
        chart,
    }
}

/// Element occurrence counts over the year/month/day pillars (the hour pillar
/// is excluded everywhere). Counts always sum to 3.
#[derive(Debug, Clone, Copy)]
pub struct ElementBalance {
    counts: [u8; 5],
    yin: u8,
}

impl ElementBalance {
    pub fn of(chart: &GanzhiChart) -> ElementBalance {
        let mut counts = [0u8; 5];
        let mut yin = 0u8;
        for pair in [chart.year, chart.month, chart.day] {
            counts[pair.stem.element().index()] += 1;
            if pair.stem.polarity() == Polarity::Yin {
                yin += 1;
            }
        }
        ElementBalance { counts, yin }
    }

    pub fn count(&self, e: Element) -> u8 {
        self.counts[e.index()]
    }

    pub fn total(&self) -> u8 {
        self.counts.iter().sum()
    }

    /// First element reaching 2 of the 3 pillars, in 木火土金水 order.
    /// `None` means a 1/1/1 split ("balanced").
    pub fn dominant(&self) -> Option<Element> {
        Element::ALL.into_iter().find(|e| self.count(*e) >= 2)
    }

    pub fn yin_count(&self) -> u8 {
        self.yin
    }

    pub fn yang_count(&self) -> u8 {
        3 - self.yin
    }

    /// 2-of-3 majority. Three samples can never tie, so the balanced branch
    /// is unreachable in practice.
    pub fn yin_yang_label(&self) -> &'static str {
        if self.yang_count() > self.yin_count() {
            "陽が強い"
        } else if self.yin_count() > self.yang_count() {
            "陰が強い"
        } else {
            "バランス型"
        }
    }

    /// Display form 木1・火0・土1・金1・水0.
    pub fn balance_string(&self) -> String {
        Element::ALL
            .into_iter()
            .map(|e| format!("{}{}", e.symbol(), self.count(e)))
            .collect::<Vec<_>>()
            .join("・")
    }
}

fn dominant_comment(dominant: Option<Element>) -> &'static str {
    match dominant {
        Some(Element::Wood) => "成長志向・クリエイティブ",
        Some(Element::Fire) => "情熱的・エネルギッシュ",
        Some(Element::Earth) => "堅実・信頼されやすい",
        Some(Element::Metal) => "知的・合理的",
        Some(Element::Water) => "柔軟・社交的",
        None => "バランス型タイプ",
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalityDetails {
    pub element_balance: String,
    pub yin_yang: String,
    pub comment: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Personality {
    pub summary: String,
    pub details: PersonalityDetails,
}

pub fn analyze_personality(chart: &GanzhiChart) -> Personality {
    let balance = ElementBalance::of(chart);
    let element_balance = balance.balance_string();
    let yin_yang = balance.yin_yang_label().to_string();
    Personality {
        summary: format!(
            "あなたの五行バランスは「{element_balance}」で、{yin_yang}です。"
        ),
        details: PersonalityDetails {
            element_balance,
            yin_yang,
            comment: dominant_comment(balance.dominant()).to_string(),
        },
    }
}

/// Chart-based fortune texts for `/api/fortune`. Four fixed-pool selections:
/// the overall text keys on the dominant element, love on the year stem,
/// work on the yin/yang majority, health on fire count and water absence.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartFortune {
    pub year_fortune: String,
    pub love: String,
    pub work: String,
    pub health: String,
}

pub fn analyze_fortune(chart: &GanzhiChart) -> ChartFortune {
    let balance = ElementBalance::of(chart);

    let year_fortune = match balance.dominant() {
        Some(Element::Wood) => "今年は成長や新たな挑戦が吉。積極的に動くと運気上昇。",
        Some(Element::Fire) => "情熱や行動力が評価される年。思い切った決断が吉。",
        Some(Element::Earth) => "安定と信頼がテーマ。地道な努力が実を結ぶ年。",
        Some(Element::Metal) => "知的活動や新しい知識の吸収が運気を高めます。",
        Some(Element::Water) => "柔軟な対応や人脈が幸運を呼びます。",
        None => "バランス型の年。多方面にチャンスあり。",
    };

    let love = match chart.year.stem.symbol() {
        "甲" | "丙" => "新しい出会いが期待できる年。積極的なアプローチが吉。",
        "乙" | "丁" => "穏やかな関係を大切に。信頼を深めると良縁に。",
        "庚" | "辛" => "知的な会話や共通の趣味が恋愛運を高めます。",
        _ => "自然体でいることが恋愛運アップの鍵。",
    };

    let work = if balance.yang_count() > balance.yin_count() {
        "行動力と決断力が評価され、昇進や成果に繋がる年。"
    } else if balance.yin_count() > balance.yang_count() {
        "サポート役や裏方での努力が認められる年。"
    } else {
        "バランス感覚を活かすと仕事運が安定。"
    };

    let health = if balance.count(Element::Fire) >= 2 {
        "体力充実。スポーツや運動でさらに健康運アップ。"
    } else if balance.count(Element::Water) == 0 {
        "水分補給や休息を意識して。無理は禁物。"
    } else {
        "大きなトラブルは少ないが、生活リズムを整えて吉。"
    };

    ChartFortune {
        year_fortune: year_fortune.to_string(),
        love: love.to_string(),
        work: work.to_string(),
        health: health.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ganzhi::LegacyProvider;
    use chrono::NaiveDate;

    fn chart(y: i32, m: u32, d: u32) -> GanzhiChart {
        LegacyProvider.chart(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn balance_counts_sum_to_three() {
        for (y, m, d) in [(1990, 5, 15), (1847, 1, 1), (2044, 12, 31), (2000, 2, 29)] {
            let b = ElementBalance::of(&chart(y, m, d));
            assert_eq!(b.total(), 3);
        }
    }

    #[test]
    fn yin_yang_never_ties() {
        for y in 1900..1960 {
            let b = ElementBalance::of(&chart(y, 6, 15));
            assert_ne!(b.yin_yang_label(), "バランス型");
        }
    }

    #[test]
    fn balance_string_lists_all_five() {
        let s = ElementBalance::of(&chart(1990, 5, 15)).balance_string();
        for sym in ["木", "火", "土", "金", "水"] {
            assert!(s.contains(sym));
        }
    }

    #[test]
    fn personality_summary_embeds_balance() {
        let p = analyze_personality(&chart(1990, 5, 15));
        assert!(p.summary.contains(&p.details.element_balance));
        assert!(p.summary.contains(&p.details.yin_yang));
    }

    #[test]
    fn dominant_picks_first_in_table_order() {
        // construct via counts: a chart with 2 wood pillars must report wood
        let mut found = false;
        for y in 1900..2100 {
            let c = chart(y, 3, 3);
            let b = ElementBalance::of(&c);
            if b.count(crate::tables::Element::Wood) >= 2 {
                assert_eq!(b.dominant(), Some(crate::tables::Element::Wood));
                found = true;
                break;
            }
        }
        assert!(found);
    }
}
