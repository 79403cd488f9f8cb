//! Per-stem and per-branch personality trait tables for the sanmei
//! personality reading. Pure data keyed by the year pillar.

use serde::Serialize;

use crate::tables::{Branch, Stem};

#[derive(Debug, Clone, Serialize)]
pub struct PersonalityReading {
    pub strengths: Vec<&'static str>,
    pub weaknesses: Vec<&'static str>,
    pub traits: Vec<&'static str>,
}

struct TraitSet {
    traits: [&'static str; 3],
    strengths: [&'static str; 2],
    weaknesses: [&'static str; 2],
}

fn stem_traits(stem: Stem) -> TraitSet {
    match stem.index() {
        0 => TraitSet {
            traits: ["リーダーシップがある", "行動力がある", "決断力がある"],
            strengths: ["目標に向かって突き進む力", "自己主張が強い"],
            weaknesses: ["頑固さ", "柔軟性に欠けることがある"],
        },
        1 => TraitSet {
            traits: ["柔軟", "細やか", "協調性がある"],
            strengths: ["調和を重んじる", "忍耐強い"],
            weaknesses: ["優柔不断", "受動的になることがある"],
        },
        2 => TraitSet {
            traits: ["情熱的", "明るい", "活発"],
            strengths: ["人を引き付ける魅力", "エネルギッシュ"],
            weaknesses: ["短気", "飽きっぽい"],
        },
        3 => TraitSet {
            traits: ["感受性が豊か", "優しい", "共感力がある"],
            strengths: ["人の気持ちを理解する力", "繊細な配慮"],
            weaknesses: ["傷つきやすい", "感情に流されやすい"],
        },
        4 => TraitSet {
            traits: ["誠実", "安定感がある", "信頼できる"],
            strengths: ["地道な努力を続ける力", "実直さ"],
            weaknesses: ["保守的", "変化を好まない"],
        },
        5 => TraitSet {
            traits: ["思慮深い", "几帳面", "計画的"],
            strengths: ["緻密な分析力", "冷静な判断力"],
            weaknesses: ["心配性", "完璧主義"],
        },
        6 => TraitSet {
            traits: ["強い意志", "公正", "規律正しい"],
            strengths: ["正義感", "責任感"],
            weaknesses: ["融通が利かない", "厳格すぎることがある"],
        },
        7 => TraitSet {
            traits: ["美的センスがある", "洗練されている", "鋭い"],
            strengths: ["審美眼", "先見の明"],
            weaknesses: ["批判的", "理想を追求しすぎる"],
        },
        8 => TraitSet {
            traits: ["独創的", "先進的", "アイデアマン"],
            strengths: ["創造力", "適応力"],
            weaknesses: ["現実離れしている", "計画性に欠ける"],
        },
        _ => TraitSet {
            traits: ["直感的", "柔和", "繊細"],
            strengths: ["豊かな想像力", "共感力"],
            weaknesses: ["依存的", "現実逃避"],
        },
    }
}

fn branch_traits(branch: Branch) -> TraitSet {
    match branch.index() {
        0 => TraitSet {
            traits: ["賢い", "器用", "活動的"],
            strengths: ["機知に富む", "好奇心旺盛"],
            weaknesses: ["落ち着きがない", "浪費家"],
        },
        1 => TraitSet {
            traits: ["堅実", "忍耐強い", "勤勉"],
            strengths: ["地道な努力", "責任感"],
            weaknesses: ["頑固", "変化を嫌う"],
        },
        2 => TraitSet {
            traits: ["勇敢", "情熱的", "正義感が強い"],
            strengths: ["リーダーシップ", "行動力"],
            weaknesses: ["短気", "自己中心的になることがある"],
        },
        3 => TraitSet {
            traits: ["穏やか", "親しみやすい", "平和主義"],
            strengths: ["調和を重んじる", "外交的手腕"],
            weaknesses: ["優柔不断", "現実逃避"],
        },
        4 => TraitSet {
            traits: ["才能豊か", "野心的", "カリスマ性がある"],
            strengths: ["総合的な能力", "順応性"],
            weaknesses: ["過度な自信", "投げやり"],
        },
        5 => TraitSet {
            traits: ["知的", "分析力に優れる", "直感力がある"],
            strengths: ["洞察力", "判断力"],
            weaknesses: ["疑い深い", "執着心が強い"],
        },
        6 => TraitSet {
            traits: ["活発", "社交的", "明るい"],
            strengths: ["コミュニケーション能力", "適応力"],
            weaknesses: ["気分屋", "不安定"],
        },
        7 => TraitSet {
            traits: ["芸術的", "優雅", "思いやりがある"],
            strengths: ["創造性", "共感力"],
            weaknesses: ["優柔不断", "現実感覚の欠如"],
        },
        8 => TraitSet {
            traits: ["機知に富む", "多才", "柔軟性がある"],
            strengths: ["問題解決能力", "適応力"],
            weaknesses: ["落ち着きがない", "不誠実になることがある"],
        },
        9 => TraitSet {
            traits: ["几帳面", "完璧主義", "誠実"],
            strengths: ["緻密さ", "美的センス"],
            weaknesses: ["批判的", "神経質"],
        },
        10 => TraitSet {
            traits: ["忠実", "誠実", "責任感がある"],
            strengths: ["信頼性", "忍耐力"],
            weaknesses: ["頑固", "心配性"],
        },
        _ => TraitSet {
            traits: ["独立心が強い", "公平", "理性的"],
            strengths: ["知性", "洞察力"],
            weaknesses: ["孤独を好む", "感情表現が苦手"],
        },
    }
}

/// Combine stem and branch traits of the year pillar: stem entries first,
/// then branch entries, in table order.
pub fn personality_from_kanshi(stem: Stem, branch: Branch) -> PersonalityReading {
    let s = stem_traits(stem);
    let b = branch_traits(branch);
    PersonalityReading {
        strengths: s.strengths.into_iter().chain(b.strengths).collect(),
        weaknesses: s.weaknesses.into_iter().chain(b.weaknesses).collect(),
        traits: s.traits.into_iter().chain(b.traits).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combines_stem_then_branch() {
        let p = personality_from_kanshi(Stem::from_cycle(0), Branch::from_cycle(0));
        assert_eq!(p.traits.len(), 6);
        assert_eq!(p.strengths.len(), 4);
        assert_eq!(p.weaknesses.len(), 4);
        assert_eq!(p.traits[0], "リーダーシップがある");
        assert_eq!(p.traits[3], "賢い");
    }

    #[test]
    fn every_pair_has_full_tables() {
        for s in 0..10 {
            for b in 0..12 {
                let p = personality_from_kanshi(Stem::from_cycle(s), Branch::from_cycle(b));
                assert_eq!(p.traits.len(), 6);
            }
        }
    }
}
