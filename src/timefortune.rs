//! Time-span fortune: a five-element energy vector for the day, month or
//! year, long-form texts keyed on the strongest element with a caution for
//! the weakest, and a nine-slot star grid shifted by the current date.

use std::hash::{DefaultHasher, Hash, Hasher};

use chrono::{Datelike, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::meishiki::BODY_STAR_GRID;
use crate::tables::Element;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeSpan {
    Day,
    Month,
    Year,
}

impl TimeSpan {
    fn period_label(self, now: NaiveDate) -> String {
        match self {
            TimeSpan::Day => format!(
                "{}年{}月{}日の運勢",
                now.year(),
                now.month(),
                now.day()
            ),
            TimeSpan::Month => format!("{}年{}月の運勢", now.year(), now.month()),
            TimeSpan::Year => format!("{}年の運勢", now.year()),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SpanTexts {
    pub general: String,
    pub love: String,
    pub work: String,
    pub health: String,
    pub advice: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeFortune {
    pub period: String,
    pub gogyo_values: [u8; 5],
    pub strongest_element: String,
    pub weakest_element: String,
    pub fortune: SpanTexts,
    pub star_energy: [&'static str; 9],
}

/// Stem-cycle offset table applied to the birth year only; the current year
/// skips it and uses the raw decade residue.
const YEAR_BASE: [i64; 10] = [5, 6, 7, 8, 9, 0, 1, 2, 3, 4];

struct EnergyBases {
    year: i64,
    month: i64,
    day: i64,
}

fn birth_bases(birthdate: NaiveDate) -> EnergyBases {
    let year = YEAR_BASE[(i64::from(birthdate.year()) - 1900).rem_euclid(10) as usize];
    let month = (i64::from(birthdate.month()) + year) % 5;
    let day = (i64::from(birthdate.day()) + month) % 5;
    EnergyBases { year, month, day }
}

fn now_bases(now: NaiveDate) -> EnergyBases {
    let year = (i64::from(now.year()) - 1900).rem_euclid(10);
    let month = (i64::from(now.month()) + year) % 5;
    let day = (i64::from(now.day()) + month) % 5;
    EnergyBases { year, month, day }
}

/// The raw [木,火,土,金,水] energy vector before jitter. Each span stacks a
/// 5/3/1 run from the current-date base, then birth affinities in
/// decreasing weight.
fn energy_vector(birth: &EnergyBases, now: &EnergyBases, span: TimeSpan) -> [i64; 5] {
    let mut v = [0i64; 5];
    let bump = |v: &mut [i64; 5], base: i64, amount: i64| {
        v[base.rem_euclid(5) as usize] += amount;
    };
    match span {
        TimeSpan::Day => {
            bump(&mut v, now.day, 5);
            bump(&mut v, now.day + 1, 3);
            bump(&mut v, now.day + 2, 1);
            bump(&mut v, birth.day, 3);
            bump(&mut v, birth.month, 2);
            bump(&mut v, birth.year, 1);
        }
        TimeSpan::Month => {
            bump(&mut v, now.month, 5);
            bump(&mut v, now.month + 1, 3);
            bump(&mut v, now.month + 2, 1);
            bump(&mut v, birth.month, 3);
            bump(&mut v, birth.year, 2);
        }
        TimeSpan::Year => {
            bump(&mut v, now.year, 5);
            bump(&mut v, now.year + 1, 3);
            bump(&mut v, now.year + 2, 1);
            bump(&mut v, birth.year, 3);
        }
    }
    v
}

/// Per-element 0/1 jitter, seeded from the request's (birthdate, date, span)
/// so the same day always yields the same vector; a floor of 1 keeps every
/// element present.
fn jittered(
    mut v: [i64; 5],
    birthdate: NaiveDate,
    now: NaiveDate,
    span: TimeSpan,
) -> [u8; 5] {
    let mut hasher = DefaultHasher::new();
    birthdate.hash(&mut hasher);
    now.hash(&mut hasher);
    match span {
        TimeSpan::Day => "day",
        TimeSpan::Month => "month",
        TimeSpan::Year => "year",
    }
    .hash(&mut hasher);
    let mut rng = StdRng::seed_from_u64(hasher.finish());
    let mut out = [0u8; 5];
    for (slot, val) in out.iter_mut().zip(v.iter_mut()) {
        *val += rng.random_range(0..2);
        *slot = (*val).max(1) as u8;
    }
    out
}

/// First index of the maximum, in 木火土金水 order.
fn strongest(v: &[u8; 5]) -> Element {
    let max = v.iter().max().copied().unwrap_or(0);
    let idx = v.iter().position(|&x| x == max).unwrap_or(0);
    Element::ALL[idx]
}

fn weakest(v: &[u8; 5]) -> Element {
    let min = v.iter().min().copied().unwrap_or(0);
    let idx = v.iter().position(|&x| x == min).unwrap_or(0);
    Element::ALL[idx]
}

struct SpanTable {
    general: &'static str,
    love: &'static str,
    work: &'static str,
    health: &'static str,
    advice: &'static str,
}

fn day_table(strong: Element) -> SpanTable {
    match strong {
        Element::Wood => SpanTable {
            general: "創造性が高まる日です。新しいアイデアや計画を立てるのに適しています。",
            love: "相手との会話が弾み、新鮮な関係が築けるでしょう。",
            work: "柔軟な発想が求められる仕事で成果を上げられます。",
            health: "軽い運動や散歩が心身の調子を整えるでしょう。",
            advice: "自分の考えを積極的に表現してみましょう。",
        },
        Element::Fire => SpanTable {
            general: "活力に満ちた1日になるでしょう。情熱的に行動すると良い結果が得られます。",
            love: "感情表現が豊かになり、相手に気持ちが伝わりやすい日です。",
            work: "プレゼンテーションや人前での発表が成功しやすいでしょう。",
            health: "体を動かすことでエネルギーの消費バランスが取れます。",
            advice: "感情の高ぶりを上手にコントロールすることが大切です。",
        },
        Element::Earth => SpanTable {
            general: "安定感のある日です。地に足をつけた行動が実を結びます。",
            love: "落ち着いた雰囲気の中で相手との絆が深まるでしょう。",
            work: "地道な努力が評価される日です。基礎固めに適しています。",
            health: "規則正しい生活リズムを保つことが健康の鍵となります。",
            advice: "焦らず一歩一歩進むことで確実な成果が得られます。",
        },
        Element::Metal => SpanTable {
            general: "物事の価値を見極める力が高まる日です。選択や判断が的確になります。",
            love: "相手の良さを再発見し、関係が洗練されていくでしょう。",
            work: "細部への気配りが評価され、信頼を得られる日です。",
            health: "美しいものに触れることでリラックス効果が高まります。",
            advice: "質の高さを意識した行動が運気を高めます。",
        },
        Element::Water => SpanTable {
            general: "直感力が冴える日です。柔軟な対応で状況を好転させられるでしょう。",
            love: "相手の気持ちを敏感に感じ取れる日です。心の交流が深まります。",
            work: "情報収集や分析作業が捗り、新たな発見があるでしょう。",
            health: "十分な水分補給と質の良い睡眠を心がけましょう。",
            advice: "周囲の変化に柔軟に対応することで運気が開けます。",
        },
    }
}

fn day_caution(weak: Element) -> &'static str {
    match weak {
        Element::Wood => "ただし、物事を進める際には計画性を忘れないように。",
        Element::Fire => "感情的になりすぎないよう冷静さも大切にしましょう。",
        Element::Earth => "柔軟性を失わないよう、新しい視点も取り入れて。",
        Element::Metal => "完璧を求めすぎると疲れてしまうので、バランスを意識して。",
        Element::Water => "考えすぎて行動が遅れないよう、時には決断も必要です。",
    }
}

fn month_table(strong: Element) -> SpanTable {
    match strong {
        Element::Wood => SpanTable {
            general: "成長と発展の月です。新しいプロジェクトや挑戦に適した時期でしょう。",
            love: "関係が新たな段階に進む可能性があります。積極的なアプローチが実を結びます。",
            work: "創造的なアイデアが浮かびやすく、キャリアの成長につながるでしょう。",
            health: "適度な運動を取り入れることで、心身のバランスが整います。",
            advice: "柔軟な思考と行動力を活かして、新しい可能性を広げていきましょう。",
        },
        Element::Fire => SpanTable {
            general: "情熱と活力に満ちた月になるでしょう。自己表現が注目される時期です。",
            love: "魅力が高まり、異性からの注目を集めやすい時期です。",
            work: "リーダーシップを発揮する機会が増え、周囲に良い影響を与えられます。",
            health: "エネルギッシュな活動と十分な休息のバランスが重要です。",
            advice: "熱意を持って取り組む姿勢が周囲の協力を引き寄せるでしょう。",
        },
        Element::Earth => SpanTable {
            general: "安定と基盤を固める月です。地道な努力が実を結ぶ時期でしょう。",
            love: "信頼関係が深まり、長期的な視点での関係構築に適しています。",
            work: "責任ある立場や役割を任される可能性があります。堅実さが評価されます。",
            health: "規則正しい生活習慣が心身の安定につながります。",
            advice: "焦らず基礎を固めることで、将来の大きな成功につながります。",
        },
        Element::Metal => SpanTable {
            general: "洗練と調和の月です。美的センスが高まり、周囲との関係も円滑になります。",
            love: "相手との関係が洗練され、穏やかな愛情表現が心を打つでしょう。",
            work: "細部への気配りや正確さが評価され、信頼を得られる時期です。",
            health: "質の高い食事や美しい環境がリラックス効果を高めます。",
            advice: "質にこだわる姿勢が、周囲からの尊敬と信頼を集めるでしょう。",
        },
        Element::Water => SpanTable {
            general: "知恵と直感が冴える月です。情報収集と学びが大きな財産になります。",
            love: "相手の気持ちを深く理解できる時期です。精神的なつながりが深まります。",
            work: "情報分析やコミュニケーション能力が高まり、円滑な人間関係が築けます。",
            health: "心の平静を保つことが健康維持の鍵となります。",
            advice: "流れに逆らわず、柔軟に対応することで道が開けるでしょう。",
        },
    }
}

fn month_caution(weak: Element) -> &'static str {
    match weak {
        Element::Wood => "計画性を欠くと、エネルギーが分散してしまう月になるかもしれません。",
        Element::Fire => "感情の起伏に振り回されないよう、冷静さを保つことも大切です。",
        Element::Earth => "変化を恐れず、新しい状況にも柔軟に対応する心構えを持ちましょう。",
        Element::Metal => "他者の意見にも耳を傾け、過度な完璧主義は避けることが肝心です。",
        Element::Water => "優柔不断にならないよう、時には決断力も必要になるでしょう。",
    }
}

fn year_table(strong: Element) -> SpanTable {
    match strong {
        Element::Wood => SpanTable {
            general: "成長と拡大の年です。新しい可能性に挑戦し、人生の幅を広げる時期となるでしょう。",
            love: "新鮮な出会いや関係の発展が期待できます。自然体で接することが幸運を呼びます。",
            work: "創造力とアイデアが評価され、キャリアの飛躍につながる年になるでしょう。",
            health: "適度な運動と自然との触れ合いが心身をリフレッシュさせます。",
            advice: "計画的に行動しながらも、柔軟性を持って新しい機会を活かしましょう。",
        },
        Element::Fire => SpanTable {
            general: "情熱と活力に満ちた1年になります。自己表現と挑戦が実を結ぶ時期です。",
            love: "パートナーシップに熱意と活力をもたらし、関係が活性化するでしょう。",
            work: "リーダーシップを発揮する機会が増え、周囲に大きな影響を与えられます。",
            health: "エネルギッシュに活動しつつ、適切な休息を取ることが重要です。",
            advice: "熱意と冷静さのバランスを保ちながら、目標に向かって進みましょう。",
        },
        Element::Earth => SpanTable {
            general: "安定と基盤強化の年です。着実な成長と責任が増す時期となるでしょう。",
            love: "信頼と安定に基づいた関係が築かれ、将来を見据えた絆が深まります。",
            work: "責任ある立場への昇進や、重要なプロジェクトを任される可能性があります。",
            health: "規則正しい生活習慣が長期的な健康の鍵となります。",
            advice: "焦らず一歩一歩進むことで、堅固な成功の土台を築けるでしょう。",
        },
        Element::Metal => SpanTable {
            general: "洗練と充実の年です。質の高い選択と判断力が運命を好転させるでしょう。",
            love: "互いの価値観を尊重し合う、品格のある関係が築かれます。",
            work: "正確さと細部への配慮が高く評価され、信頼と実績を積み重ねられます。",
            health: "美しい環境と質の高い生活習慣が心身の健康をもたらします。",
            advice: "本質的な価値を見極める目を養い、人生の質を高めていきましょう。",
        },
        Element::Water => SpanTable {
            general: "知恵と柔軟性の年です。変化に対応しながら、内面の成長が促される時期でしょう。",
            love: "精神的なつながりが深まり、互いの心の奥底まで理解し合える関係に発展します。",
            work: "情報収集と分析力が成功の鍵となり、知的な才能が開花するでしょう。",
            health: "心の平和を保つことが、身体の健康にも良い影響を与えます。",
            advice: "状況の変化に柔軟に対応しながら、本質を見極める洞察力を磨きましょう。",
        },
    }
}

fn year_caution(weak: Element) -> &'static str {
    match weak {
        Element::Wood => "長期的な視点を持ち、エネルギーの使い方に注意することが重要です。",
        Element::Fire => "情熱を持続させるために、時には休息をとり、エネルギーを蓄えることも大切です。",
        Element::Earth => "保守的になりすぎず、新しい可能性にも心を開くことが成長につながります。",
        Element::Metal => "完璧を求めすぎず、時には妥協することも必要になるでしょう。",
        Element::Water => "思考と行動のバランスを意識し、実行力も高めていくと良いでしょう。",
    }
}

fn span_texts(span: TimeSpan, strong: Element, weak: Element) -> SpanTexts {
    let (table, caution) = match span {
        TimeSpan::Day => (day_table(strong), day_caution(weak)),
        TimeSpan::Month => (month_table(strong), month_caution(weak)),
        TimeSpan::Year => (year_table(strong), year_caution(weak)),
    };
    SpanTexts {
        general: table.general.to_string(),
        love: table.love.to_string(),
        work: table.work.to_string(),
        health: table.health.to_string(),
        advice: format!("{} {}", table.advice, caution),
    }
}

/// Nine-slot star grid. The current value mixes a zero-based month with a
/// one-based day, an inherited quirk the readings depend on.
fn star_energy(birthdate: NaiveDate, now: NaiveDate, span: TimeSpan) -> [&'static str; 9] {
    let base = (i64::from(birthdate.year())
        + i64::from(birthdate.month())
        + i64::from(birthdate.day()))
    .rem_euclid(9);
    let current = (i64::from(now.year()) + i64::from(now.month0()) + i64::from(now.day()))
        .rem_euclid(9);
    let shift = match span {
        TimeSpan::Day => (current * 3) % 9,
        TimeSpan::Month => (current * 2) % 9,
        TimeSpan::Year => current % 9,
    };
    let mut result = [""; 9];
    for i in 0..9 {
        result[((i + shift) % 9) as usize] = BODY_STAR_GRID[((i + base) % 9) as usize];
    }
    result
}

/// The full time-span reading for an injected current date.
pub fn time_fortune(birthdate: NaiveDate, now: NaiveDate, span: TimeSpan) -> TimeFortune {
    let birth = birth_bases(birthdate);
    let current = now_bases(now);
    let vector = jittered(
        energy_vector(&birth, &current, span),
        birthdate,
        now,
        span,
    );
    let strong = strongest(&vector);
    let weak = weakest(&vector);
    TimeFortune {
        period: span.period_label(now),
        gogyo_values: vector,
        strongest_element: strong.symbol().to_string(),
        weakest_element: weak.symbol().to_string(),
        fortune: span_texts(span, strong, weak),
        star_energy: star_energy(birthdate, now, span),
    }
}
