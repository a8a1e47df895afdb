//! Four pillars (BaZi) chart.
//!
//! Each pillar pairs a heavenly stem with an earthly branch, read from the
//! birth's wall clock fields: year, month, day and hour. The chart is a
//! simplified counting scheme on the Gregorian calendar, not a solar-term
//! almanac, so it never needs the time zone or an ephemeris.

use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use super::elements::{Element, ElementBalance, Polarity};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeavenlyStem {
    Jia,
    Yi,
    Bing,
    Ding,
    Wu,
    Ji,
    Geng,
    Xin,
    Ren,
    Gui,
}

impl HeavenlyStem {
    pub const CYCLE: [HeavenlyStem; 10] = [
        HeavenlyStem::Jia,
        HeavenlyStem::Yi,
        HeavenlyStem::Bing,
        HeavenlyStem::Ding,
        HeavenlyStem::Wu,
        HeavenlyStem::Ji,
        HeavenlyStem::Geng,
        HeavenlyStem::Xin,
        HeavenlyStem::Ren,
        HeavenlyStem::Gui,
    ];

    fn nth(n: i64) -> Self {
        Self::CYCLE[n.rem_euclid(10) as usize]
    }

    /// Stems come in yang/yin pairs per element.
    pub fn element(self) -> Element {
        Element::ALL[self as usize / 2]
    }

    pub fn polarity(self) -> Polarity {
        if self as usize % 2 == 0 {
            Polarity::Yang
        } else {
            Polarity::Yin
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            HeavenlyStem::Jia => "Jia",
            HeavenlyStem::Yi => "Yi",
            HeavenlyStem::Bing => "Bing",
            HeavenlyStem::Ding => "Ding",
            HeavenlyStem::Wu => "Wu",
            HeavenlyStem::Ji => "Ji",
            HeavenlyStem::Geng => "Geng",
            HeavenlyStem::Xin => "Xin",
            HeavenlyStem::Ren => "Ren",
            HeavenlyStem::Gui => "Gui",
        }
    }
}

impl fmt::Display for HeavenlyStem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EarthlyBranch {
    Zi,
    Chou,
    Yin,
    Mao,
    Chen,
    Si,
    Wu,
    Wei,
    Shen,
    You,
    Xu,
    Hai,
}

impl EarthlyBranch {
    pub const CYCLE: [EarthlyBranch; 12] = [
        EarthlyBranch::Zi,
        EarthlyBranch::Chou,
        EarthlyBranch::Yin,
        EarthlyBranch::Mao,
        EarthlyBranch::Chen,
        EarthlyBranch::Si,
        EarthlyBranch::Wu,
        EarthlyBranch::Wei,
        EarthlyBranch::Shen,
        EarthlyBranch::You,
        EarthlyBranch::Xu,
        EarthlyBranch::Hai,
    ];

    fn nth(n: i64) -> Self {
        Self::CYCLE[n.rem_euclid(12) as usize]
    }

    pub fn element(self) -> Element {
        match self {
            EarthlyBranch::Zi | EarthlyBranch::Hai => Element::Water,
            EarthlyBranch::Yin | EarthlyBranch::Mao => Element::Wood,
            EarthlyBranch::Si | EarthlyBranch::Wu => Element::Fire,
            EarthlyBranch::Shen | EarthlyBranch::You => Element::Metal,
            EarthlyBranch::Chou | EarthlyBranch::Chen | EarthlyBranch::Wei | EarthlyBranch::Xu => {
                Element::Earth
            }
        }
    }

    /// Branch six places away on the cycle.
    pub fn opposite(self) -> Self {
        Self::nth(self as i64 + 6)
    }

    pub fn name(self) -> &'static str {
        match self {
            EarthlyBranch::Zi => "Zi",
            EarthlyBranch::Chou => "Chou",
            EarthlyBranch::Yin => "Yin",
            EarthlyBranch::Mao => "Mao",
            EarthlyBranch::Chen => "Chen",
            EarthlyBranch::Si => "Si",
            EarthlyBranch::Wu => "Wu",
            EarthlyBranch::Wei => "Wei",
            EarthlyBranch::Shen => "Shen",
            EarthlyBranch::You => "You",
            EarthlyBranch::Xu => "Xu",
            EarthlyBranch::Hai => "Hai",
        }
    }
}

impl fmt::Display for EarthlyBranch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PillarPosition {
    Year,
    Month,
    Day,
    Hour,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pillar {
    pub stem: HeavenlyStem,
    pub branch: EarthlyBranch,
}

impl Pillar {
    fn new(stem: i64, branch: i64) -> Self {
        Self {
            stem: HeavenlyStem::nth(stem),
            branch: EarthlyBranch::nth(branch),
        }
    }

    /// Element of the stem.
    pub fn element(&self) -> Element {
        self.stem.element()
    }
}

impl fmt::Display for Pillar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.stem, self.branch)
    }
}

/// Role of a stem or branch relative to the day master.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TenGod {
    /// Same element as the day master.
    Companion,
    /// Fed by the day master.
    Output,
    /// Controlled by the day master.
    Wealth,
    /// Controls the day master.
    Authority,
    /// Feeds the day master.
    Resource,
}

impl TenGod {
    /// Role of `element` seen from a day master of `master`.
    pub fn of(master: Element, element: Element) -> Self {
        if element == master {
            TenGod::Companion
        } else if master.generates() == element {
            TenGod::Output
        } else if master.controls() == element {
            TenGod::Wealth
        } else if element.controls() == master {
            TenGod::Authority
        } else {
            TenGod::Resource
        }
    }

    /// Fixed role of a branch, independent of the day master.
    pub fn of_branch(branch: EarthlyBranch) -> Self {
        match branch {
            EarthlyBranch::Zi | EarthlyBranch::Hai => TenGod::Resource,
            EarthlyBranch::Chou | EarthlyBranch::Chen | EarthlyBranch::Wei | EarthlyBranch::Xu => {
                TenGod::Wealth
            }
            EarthlyBranch::Yin | EarthlyBranch::Mao => TenGod::Output,
            EarthlyBranch::Si | EarthlyBranch::Wu => TenGod::Companion,
            EarthlyBranch::Shen | EarthlyBranch::You => TenGod::Authority,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PillarPart {
    Stem,
    Branch,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenGodInfluence {
    pub pillar: PillarPosition,
    pub part: PillarPart,
    pub god: TenGod,
}

/// Two opposite branches in one chart.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BranchClash {
    pub branches: [EarthlyBranch; 2],
}

impl BranchClash {
    /// Same pair of branches, in either order.
    pub fn same_pair(&self, other: &BranchClash) -> bool {
        let [a, b] = self.branches;
        other.branches == [a, b] || other.branches == [b, a]
    }
}

/// Branches that merge into one element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BranchCombination {
    pub branches: Vec<EarthlyBranch>,
    pub element: Element,
}

const PAIR_COMBINATIONS: [(EarthlyBranch, EarthlyBranch, Element); 4] = [
    (EarthlyBranch::Yin, EarthlyBranch::Mao, Element::Wood),
    (EarthlyBranch::Shen, EarthlyBranch::You, Element::Metal),
    (EarthlyBranch::Si, EarthlyBranch::Wu, Element::Fire),
    (EarthlyBranch::Hai, EarthlyBranch::Zi, Element::Water),
];

const EARTH_STOREHOUSES: [EarthlyBranch; 4] = [
    EarthlyBranch::Chen,
    EarthlyBranch::Chou,
    EarthlyBranch::Xu,
    EarthlyBranch::Wei,
];

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayMasterStrength {
    Strong,
    Weak,
}

/// Complete four pillars chart of one birth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaziChart {
    pub year: Pillar,
    pub month: Pillar,
    pub day: Pillar,
    pub hour: Pillar,
    pub day_master: HeavenlyStem,
    pub day_master_strength: DayMasterStrength,
    pub element_balance: ElementBalance,
    pub ten_gods: Vec<TenGodInfluence>,
    pub clashes: Vec<BranchClash>,
    pub combinations: Vec<BranchCombination>,
}

impl BaziChart {
    /// Build the chart from a birth's wall clock date and time.
    pub fn new(date: NaiveDate, time: NaiveTime) -> Self {
        let year = date.year() as i64;
        let month = date.month() as i64;
        let day = date.day() as i64;
        let hour = time.hour() as i64;

        let year_pillar = Pillar::new(year - 4, year - 4);
        let month_pillar = Pillar::new(month + 1, month + 1);
        let day_pillar = Pillar::new(day - 1, day);
        let hour_pillar = Pillar::new(hour, hour / 2);

        let positioned = [
            (PillarPosition::Year, year_pillar),
            (PillarPosition::Month, month_pillar),
            (PillarPosition::Day, day_pillar),
            (PillarPosition::Hour, hour_pillar),
        ];
        let branches = positioned.map(|(_, p)| p.branch);

        let element_balance: ElementBalance = positioned
            .iter()
            .flat_map(|(_, p)| [p.stem.element(), p.branch.element()])
            .collect();

        let day_master = day_pillar.stem;
        let day_master_strength = if element_balance.count(day_master.element()) >= 2 {
            DayMasterStrength::Strong
        } else {
            DayMasterStrength::Weak
        };

        // The day stem is the reference point and has no role of its own.
        let stem_gods = positioned
            .iter()
            .filter(|(position, _)| *position != PillarPosition::Day)
            .map(|(position, p)| TenGodInfluence {
                pillar: *position,
                part: PillarPart::Stem,
                god: TenGod::of(day_master.element(), p.stem.element()),
            });
        let branch_gods = positioned.iter().map(|(position, p)| TenGodInfluence {
            pillar: *position,
            part: PillarPart::Branch,
            god: TenGod::of_branch(p.branch),
        });
        let ten_gods = stem_gods.chain(branch_gods).collect();

        Self {
            year: year_pillar,
            month: month_pillar,
            day: day_pillar,
            hour: hour_pillar,
            day_master,
            day_master_strength,
            element_balance,
            ten_gods,
            clashes: find_clashes(&branches),
            combinations: find_combinations(&branches),
        }
    }

    pub fn pillars(&self) -> [(PillarPosition, Pillar); 4] {
        [
            (PillarPosition::Year, self.year),
            (PillarPosition::Month, self.month),
            (PillarPosition::Day, self.day),
            (PillarPosition::Hour, self.hour),
        ]
    }

    pub fn day_master_element(&self) -> Element {
        self.day_master.element()
    }
}

/// Every pair of opposite branches, in pillar order.
pub fn find_clashes(branches: &[EarthlyBranch]) -> Vec<BranchClash> {
    let mut clashes = Vec::new();
    for (i, a) in branches.iter().enumerate() {
        for b in &branches[i + 1..] {
            if a.opposite() == *b {
                clashes.push(BranchClash { branches: [*a, *b] });
            }
        }
    }
    clashes
}

/// Pairwise harmonies, then the four earth storehouses when all are present.
pub fn find_combinations(branches: &[EarthlyBranch]) -> Vec<BranchCombination> {
    let mut combinations = Vec::new();
    for (i, a) in branches.iter().enumerate() {
        for b in &branches[i + 1..] {
            let merged = PAIR_COMBINATIONS.iter().find(|(x, y, _)| {
                (*x == *a && *y == *b) || (*x == *b && *y == *a)
            });
            if let Some((x, y, element)) = merged {
                combinations.push(BranchCombination {
                    branches: vec![*x, *y],
                    element: *element,
                });
            }
        }
    }

    if EARTH_STOREHOUSES.iter().all(|s| branches.contains(s)) {
        combinations.push(BranchCombination {
            branches: EARTH_STOREHOUSES.to_vec(),
            element: Element::Earth,
        });
    }
    combinations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart(date: (i32, u32, u32), time: (u32, u32)) -> BaziChart {
        BaziChart::new(
            NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            NaiveTime::from_hms_opt(time.0, time.1, 0).unwrap(),
        )
    }

    #[test]
    fn test_stem_elements_and_polarity() {
        assert_eq!(HeavenlyStem::Jia.element(), Element::Wood);
        assert_eq!(HeavenlyStem::Ding.element(), Element::Fire);
        assert_eq!(HeavenlyStem::Gui.element(), Element::Water);
        assert_eq!(HeavenlyStem::Geng.polarity(), Polarity::Yang);
        assert_eq!(HeavenlyStem::Xin.polarity(), Polarity::Yin);
    }

    #[test]
    fn test_opposite_branches() {
        assert_eq!(EarthlyBranch::Zi.opposite(), EarthlyBranch::Wu);
        assert_eq!(EarthlyBranch::Hai.opposite(), EarthlyBranch::Si);
        assert_eq!(EarthlyBranch::Chen.opposite(), EarthlyBranch::Xu);
    }

    #[test]
    fn test_reference_chart() {
        let c = chart((1995, 3, 7), (14, 30));
        assert_eq!(c.year.to_string(), "Yi Hai");
        assert_eq!(c.month.to_string(), "Wu Chen");
        assert_eq!(c.day.to_string(), "Geng Wei");
        assert_eq!(c.hour.to_string(), "Wu Wei");
        assert_eq!(c.day_master, HeavenlyStem::Geng);
        assert_eq!(c.day_master_strength, DayMasterStrength::Weak);

        let balance = c.element_balance;
        assert_eq!(balance.count(Element::Earth), 5);
        assert_eq!(balance.count(Element::Fire), 0);
        assert_eq!(balance.total(), 8);
        assert_eq!(balance.dominant(), Element::Earth);
        assert!(c.clashes.is_empty());
        assert!(c.combinations.is_empty());
    }

    #[test]
    fn test_ten_gods_relative_to_day_master() {
        let c = chart((1995, 3, 7), (14, 30));
        let stems: Vec<_> = c
            .ten_gods
            .iter()
            .filter(|t| t.part == PillarPart::Stem)
            .map(|t| (t.pillar, t.god))
            .collect();
        // Metal day master: wood is wealth, earth is resource
        assert_eq!(
            stems,
            vec![
                (PillarPosition::Year, TenGod::Wealth),
                (PillarPosition::Month, TenGod::Resource),
                (PillarPosition::Hour, TenGod::Resource),
            ]
        );
        assert_eq!(c.ten_gods.len(), 7);
    }

    #[test]
    fn test_ten_god_relations() {
        assert_eq!(TenGod::of(Element::Wood, Element::Wood), TenGod::Companion);
        assert_eq!(TenGod::of(Element::Wood, Element::Fire), TenGod::Output);
        assert_eq!(TenGod::of(Element::Wood, Element::Earth), TenGod::Wealth);
        assert_eq!(TenGod::of(Element::Wood, Element::Metal), TenGod::Authority);
        assert_eq!(TenGod::of(Element::Wood, Element::Water), TenGod::Resource);
    }

    #[test]
    fn test_clashes_found_in_pillar_order() {
        let clashes = find_clashes(&[
            EarthlyBranch::Wu,
            EarthlyBranch::Chen,
            EarthlyBranch::Zi,
            EarthlyBranch::Xu,
        ]);
        assert_eq!(
            clashes,
            vec![
                BranchClash { branches: [EarthlyBranch::Wu, EarthlyBranch::Zi] },
                BranchClash { branches: [EarthlyBranch::Chen, EarthlyBranch::Xu] },
            ]
        );
        assert!(clashes[0].same_pair(&BranchClash {
            branches: [EarthlyBranch::Zi, EarthlyBranch::Wu]
        }));
    }

    #[test]
    fn test_pair_combinations_in_either_order() {
        let found = find_combinations(&[
            EarthlyBranch::Mao,
            EarthlyBranch::Yin,
            EarthlyBranch::Zi,
            EarthlyBranch::Hai,
        ]);
        let elements: Vec<_> = found.iter().map(|c| c.element).collect();
        assert_eq!(elements, vec![Element::Wood, Element::Water]);
    }

    #[test]
    fn test_four_storehouses_form_earth() {
        let found = find_combinations(&[
            EarthlyBranch::Xu,
            EarthlyBranch::Chou,
            EarthlyBranch::Wei,
            EarthlyBranch::Chen,
        ]);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].element, Element::Earth);
        assert_eq!(found[0].branches.len(), 4);
    }

    #[test]
    fn test_hour_branch_spans_two_hours() {
        assert_eq!(chart((2000, 1, 1), (0, 0)).hour.branch, EarthlyBranch::Zi);
        assert_eq!(chart((2000, 1, 1), (1, 59)).hour.branch, EarthlyBranch::Zi);
        assert_eq!(chart((2000, 1, 1), (23, 0)).hour.branch, EarthlyBranch::Hai);
    }
}
