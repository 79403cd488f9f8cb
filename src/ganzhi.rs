//! Stem-branch (ganzhi) derivation from calendar dates.
//!
//! Two strategies coexist behind [`GanzhiProvider`] and they do NOT agree for
//! every date. [`LegacyProvider`] is the epoch-offset arithmetic used by the
//! sanmei and daily endpoints. [`SolarProvider`] is the more accurate path
//! used by `/api/fortune` (day pillar from the Julian day number, year pillar
//! bounded at lichun, month pillar from solar-term months). Call sites pick
//! one; neither is authoritative.

use chrono::{Datelike, NaiveDate};

use crate::tables::{Branch, Stem, StemBranch};

/// Year/month/day pillars plus the fixed hour pillar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GanzhiChart {
    pub year: StemBranch,
    pub month: StemBranch,
    pub day: StemBranch,
    pub hour: StemBranch,
}

/// The hour pillar is never derived from time-of-day anywhere in the system;
/// every path hardcodes 庚午 (metal, yang).
pub fn hour_pillar() -> StemBranch {
    StemBranch::new(Stem::from_cycle(6), Branch::from_cycle(6))
}

pub trait GanzhiProvider {
    fn chart(&self, date: NaiveDate) -> GanzhiChart;
}

/// Epoch-offset approximation. No calendar knowledge beyond y/m/d arithmetic;
/// valid for any year, pre-1900 and far-future included.
pub struct LegacyProvider;

impl LegacyProvider {
    pub fn year_pair(year: i32) -> StemBranch {
        let y = i64::from(year) - 4;
        StemBranch::new(Stem::from_cycle(y), Branch::from_cycle(y))
    }

    fn month_pair(year: i32, month: u32) -> StemBranch {
        let base = (i64::from(year) - 4).rem_euclid(5) * 2;
        StemBranch::new(
            Stem::from_cycle(base + i64::from(month) - 1),
            Branch::from_cycle(i64::from(month) + 1),
        )
    }

    fn day_pair(year: i32, month: u32, day: u32) -> StemBranch {
        let idx =
            (i64::from(year) * 5 + i64::from(month) * 30 + i64::from(day)).rem_euclid(60);
        StemBranch::from_cycle(idx)
    }
}

impl GanzhiProvider for LegacyProvider {
    fn chart(&self, date: NaiveDate) -> GanzhiChart {
        GanzhiChart {
            year: Self::year_pair(date.year()),
            month: Self::month_pair(date.year(), date.month()),
            day: Self::day_pair(date.year(), date.month(), date.day()),
            hour: hour_pillar(),
        }
    }
}

/// Solar-calendar sexagenary computation. The day pillar follows the true
/// 60-day cycle via the Julian day number; year and month pillars use fixed
/// day-of-month approximations of lichun and the other solar-term nodes.
pub struct SolarProvider;

/// First day-of-month of each solar-term month, calendar months Jan..Dec.
/// A date on or after the node belongs to that month's term.
const TERM_NODE_DAY: [u32; 12] = [6, 4, 6, 5, 6, 6, 7, 8, 8, 8, 7, 7];

impl SolarProvider {
    fn jdn(date: NaiveDate) -> i64 {
        // chrono day 1 of CE is JDN 1721426
        i64::from(date.num_days_from_ce()) + 1_721_425
    }

    /// Year attributed to the date once the lichun boundary (≈ Feb 4) is applied.
    fn solar_year(date: NaiveDate) -> i32 {
        if date.month() == 1 || (date.month() == 2 && date.day() < 4) {
            date.year() - 1
        } else {
            date.year()
        }
    }

    fn year_pair(date: NaiveDate) -> StemBranch {
        let y = i64::from(Self::solar_year(date)) - 4;
        StemBranch::new(Stem::from_cycle(y), Branch::from_cycle(y))
    }

    /// Ordinal of the solar-term month, 0 = 寅月 (starts at lichun).
    fn month_ordinal(date: NaiveDate) -> i64 {
        let m = date.month() as i64;
        if date.day() >= TERM_NODE_DAY[(date.month() - 1) as usize] {
            (m - 2).rem_euclid(12)
        } else {
            (m - 3).rem_euclid(12)
        }
    }

    fn month_pair(date: NaiveDate) -> StemBranch {
        let ordinal = Self::month_ordinal(date);
        let year_stem = Stem::from_cycle(i64::from(Self::solar_year(date)) - 4);
        // five-tigers rule: 甲/己 years open on 丙寅
        let first_stem = (year_stem.index() as i64 % 5) * 2 + 2;
        StemBranch::new(
            Stem::from_cycle(first_stem + ordinal),
            Branch::from_cycle(ordinal + 2),
        )
    }

    fn day_pair(date: NaiveDate) -> StemBranch {
        StemBranch::from_cycle((Self::jdn(date) + 49).rem_euclid(60))
    }
}

impl GanzhiProvider for SolarProvider {
    fn chart(&self, date: NaiveDate) -> GanzhiChart {
        GanzhiChart {
            year: Self::year_pair(date),
            month: Self::month_pair(date),
            day: Self::day_pair(date),
            hour: hour_pillar(),
        }
    }
}

/// Today's stem-branch pair from whole days since the Unix epoch.
pub fn today_kanshi(date: NaiveDate) -> StemBranch {
    let epoch_days = i64::from(date.num_days_from_ce()) - 719_163;
    StemBranch::new(Stem::from_cycle(epoch_days), Branch::from_cycle(epoch_days))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn legacy_year_1990_is_kanoe_uma() {
        // (1990-4) % 10 = 6 → 庚, (1990-4) % 12 = 6 → 午
        assert_eq!(LegacyProvider::year_pair(1990).label(), "庚午");
    }

    #[test]
    fn legacy_handles_pre_1900_and_far_future() {
        assert_eq!(LegacyProvider::year_pair(4).label(), "甲子");
        assert_eq!(LegacyProvider::year_pair(1864).label(), "甲子");
        assert_eq!(LegacyProvider::year_pair(3004).label(), "甲子");
        // negative offsets must wrap, not panic
        let _ = LegacyProvider::year_pair(1);
    }

    #[test]
    fn legacy_chart_is_pure() {
        let a = LegacyProvider.chart(d(1990, 5, 15));
        let b = LegacyProvider.chart(d(1990, 5, 15));
        assert_eq!(a, b);
    }

    #[test]
    fn solar_day_pillar_known_dates() {
        // 2000-01-01 was a 戊午 day in the true sexagenary cycle
        assert_eq!(SolarProvider::day_pair(d(2000, 1, 1)).label(), "戊午");
        // cycle advances by one per day
        let a = SolarProvider::day_pair(d(2000, 1, 1));
        let b = SolarProvider::day_pair(d(2000, 1, 2));
        assert_eq!(
            (a.stem.index() + 1) % 10,
            b.stem.index()
        );
    }

    #[test]
    fn solar_year_boundary_at_lichun() {
        // before Feb 4 the date still belongs to the previous year's pillar
        assert_eq!(SolarProvider::year_pair(d(1990, 2, 3)).label(), "己巳");
        assert_eq!(SolarProvider::year_pair(d(1990, 2, 4)).label(), "庚午");
    }

    #[test]
    fn month_branch_starts_at_tiger() {
        // mid-February sits in the first solar month, branch 寅
        assert_eq!(SolarProvider::month_pair(d(1990, 2, 15)).branch.symbol(), "寅");
        assert_eq!(SolarProvider::month_pair(d(1990, 1, 15)).branch.symbol(), "丑");
    }

    #[test]
    fn strategies_disagree_and_stay_that_way() {
        // documented pre-existing inconsistency: the legacy day arithmetic is
        // not the sexagenary cycle, so the two providers diverge
        let date = d(1990, 5, 15);
        let legacy = LegacyProvider.chart(date);
        let solar = SolarProvider.chart(date);
        assert_ne!(legacy.day, solar.day);
        // both keep the fixed hour pillar
        assert_eq!(legacy.hour.label(), "庚午");
        assert_eq!(solar.hour.label(), "庚午");
    }

    #[test]
    fn today_kanshi_epoch() {
        // day 0 of the Unix epoch → stem 0, branch 0
        assert_eq!(today_kanshi(d(1970, 1, 1)).label(), "甲子");
        assert_eq!(today_kanshi(d(1970, 1, 11)).label(), "甲戌");
    }
}
