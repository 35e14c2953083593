//! The catalog of variables that can be cross-tabulated.
//!
//! A [`Variable`] says how to read a value from a respondent (a raw field or
//! a derived bin), which integer codes make up its domain and how each code
//! is labeled. Values outside the domain are not counted.

use serde::Serialize;

use crate::labels::label_for_code;
use crate::survey::{Field, Respondent};
use crate::utils::{format_code, safe_split};

/// Measurement level. Spearman's rho is only computed for ordinal pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableKind {
    Categorical,
    Ordinal,
}

/// How a variable's value is obtained from a respondent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableSource {
    /// The answer as recorded.
    Raw(Field),
    /// 1-5 scale folded to 1 (1-2), 2 (3), 3 (4-5).
    LikertBin(Field),
    /// 0-100 slider folded to 1 (0-50), 2 (51-75), 3 (76-100).
    RatingBin(Field),
    /// 0-100 slider split at 25/50/75, upper bounds inclusive.
    RatingQuartile(Field),
    /// Q11 nostalgia split at 25/50/75, lower bounds inclusive.
    NostalgiaQuartile,
    /// Q8 folded to 1 (1), 2 (2-3), 3 (4-5).
    MemoryInfluence,
    /// Q19 folded to detractor / passive / promoter.
    NpsCategory,
    /// First platform listed in the multi-select answer.
    PrimaryPlatform,
}

/// How a domain code is turned into a display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Labeler {
    /// Use the static code table for the field.
    Code(Field),
    /// "Level 3", "Rank 2", ...
    Prefixed(&'static str),
    /// Index `code - 1` into a fixed list.
    Named(&'static [&'static str]),
    /// 1 = Yes, anything else = No.
    YesNo,
}

impl Labeler {
    pub fn label(&self, code: f64) -> String {
        match self {
            Labeler::Code(field) => label_for_code(*field, code),
            Labeler::Prefixed(prefix) => format!("{} {}", prefix, format_code(code)),
            Labeler::Named(names) => {
                let idx = code as i64 - 1;
                usize::try_from(idx)
                    .ok()
                    .filter(|_| code.fract() == 0.0)
                    .and_then(|i| names.get(i))
                    .map(|s| (*s).to_string())
                    .unwrap_or_else(|| format_code(code))
            }
            Labeler::YesNo => {
                if code == 1.0 {
                    "Yes".to_string()
                } else {
                    "No".to_string()
                }
            }
        }
    }
}

/// A cross-tabulation variable descriptor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Variable {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: VariableKind,
    /// Ordered codes that form the rows or columns of a table.
    pub domain: &'static [i64],
    pub source: VariableSource,
    pub labeler: Labeler,
}

impl Variable {
    /// Read this variable from a respondent. `None` when the underlying answer is missing.
    pub fn value(&self, record: &Respondent) -> Option<f64> {
        match self.source {
            VariableSource::Raw(field) => record.get(field),
            VariableSource::LikertBin(field) => record.get(field).map(bin_likert),
            VariableSource::RatingBin(field) => record.get(field).map(bin_rating),
            VariableSource::RatingQuartile(field) => record.get(field).map(rating_quartile),
            VariableSource::NostalgiaQuartile => record.get(Field::Q11Nostalgia).map(nostalgia_quartile),
            VariableSource::MemoryInfluence => {
                record.get(Field::Q8MemoriesInfluencePurchase).map(memory_influence)
            }
            VariableSource::NpsCategory => record.get(Field::Q19Nps).map(nps_category),
            VariableSource::PrimaryPlatform => primary_platform(&record.platforms_selections),
        }
    }

    /// Position of `value` in the domain.
    pub fn domain_index(&self, value: f64) -> Option<usize> {
        self.domain.iter().position(|code| *code as f64 == value)
    }

    /// Display labels for the domain, in order.
    pub fn domain_labels(&self) -> Vec<String> {
        self.domain
            .iter()
            .map(|code| self.labeler.label(*code as f64))
            .collect()
    }

    pub fn is_ordinal(&self) -> bool {
        self.kind == VariableKind::Ordinal
    }
}

fn bin_likert(v: f64) -> f64 {
    if v <= 2.0 {
        1.0
    } else if v == 3.0 {
        2.0
    } else {
        3.0
    }
}

fn bin_rating(v: f64) -> f64 {
    if v <= 50.0 {
        1.0
    } else if v <= 75.0 {
        2.0
    } else {
        3.0
    }
}

fn rating_quartile(v: f64) -> f64 {
    if v <= 25.0 {
        1.0
    } else if v <= 50.0 {
        2.0
    } else if v <= 75.0 {
        3.0
    } else {
        4.0
    }
}

fn nostalgia_quartile(v: f64) -> f64 {
    if v > 75.0 {
        4.0
    } else if v > 50.0 {
        3.0
    } else if v > 25.0 {
        2.0
    } else {
        1.0
    }
}

fn memory_influence(v: f64) -> f64 {
    if v >= 4.0 {
        3.0
    } else if v == 2.0 || v == 3.0 {
        2.0
    } else {
        1.0
    }
}

fn nps_category(v: f64) -> f64 {
    if v <= 2.0 {
        1.0
    } else if v >= 4.0 {
        3.0
    } else {
        2.0
    }
}

/// First listed platform code. Unknown codes map to 1; no selection is `None`.
fn primary_platform(selections: &str) -> Option<f64> {
    let first = safe_split(selections, ',').into_iter().next()?;
    let code = match first.parse::<u8>() {
        Ok(c @ 1..=7) => c,
        _ => 1,
    };
    Some(f64::from(code))
}

const BINARY: &[i64] = &[0, 1];
const THREE: &[i64] = &[1, 2, 3];
const FOUR: &[i64] = &[1, 2, 3, 4];
const FIVE: &[i64] = &[1, 2, 3, 4, 5];
const SIX: &[i64] = &[1, 2, 3, 4, 5, 6];
const SEVEN: &[i64] = &[1, 2, 3, 4, 5, 6, 7];

const NPS_CATEGORIES: &[&str] = &["Detractor", "Passive", "Promoter"];
const MEMORY_BINS: &[&str] = &[
    "Not at All (1)",
    "Slightly-Moderately (2-3)",
    "Very-Extremely (4-5)",
];
const NOSTALGIA_QUARTILES: &[&str] = &["Q1 (0-25)", "Q2 (26-50)", "Q3 (51-75)", "Q4 (76-100)"];
const AGREE_BINS: &[&str] = &["Disagree (1-2)", "Neutral (3)", "Agree (4-5)"];
const IMPORTANCE_BINS: &[&str] = &["Not Important (1-2)", "Moderate (3)", "Very Important (4-5)"];
const RATING_QUARTILES: &[&str] = &["0-25", "26-50", "51-75", "76-100"];
const RATING_BINS: &[&str] = &["Low (0-50)", "Medium (51-75)", "High (76-100)"];
const PLATFORMS: &[&str] = &[
    "Instagram",
    "TikTok",
    "Facebook",
    "YouTube",
    "Blogs/Websites",
    "Texts/Group Chats",
    "Other",
];

const LEVEL: Labeler = Labeler::Prefixed("Level");
const RANK: Labeler = Labeler::Prefixed("Rank");
const RATING: Labeler = Labeler::Prefixed("Rating");

const fn raw(
    field: Field,
    label: &'static str,
    kind: VariableKind,
    domain: &'static [i64],
    labeler: Labeler,
) -> Variable {
    Variable {
        key: field.name(),
        label,
        kind,
        domain,
        source: VariableSource::Raw(field),
        labeler,
    }
}

const fn ordinal(field: Field, label: &'static str, domain: &'static [i64], labeler: Labeler) -> Variable {
    raw(field, label, VariableKind::Ordinal, domain, labeler)
}

const fn derived(
    key: &'static str,
    label: &'static str,
    domain: &'static [i64],
    source: VariableSource,
    names: &'static [&'static str],
) -> Variable {
    Variable {
        key,
        label,
        kind: VariableKind::Ordinal,
        domain,
        source,
        labeler: Labeler::Named(names),
    }
}

use VariableKind::{Categorical, Ordinal};

/// Every variable offered for cross-tabulation, in menu order.
pub const CATALOG: &[Variable] = &[
    raw(Field::AgeGroup, "Age Group", Ordinal, SIX, Labeler::Code(Field::AgeGroup)),
    raw(Field::Gender, "Gender", Categorical, FOUR, Labeler::Code(Field::Gender)),
    raw(Field::Location, "Location", Categorical, THREE, Labeler::Code(Field::Location)),
    raw(
        Field::HouseholdIncome,
        "Household Income",
        Ordinal,
        FOUR,
        Labeler::Code(Field::HouseholdIncome),
    ),
    raw(
        Field::NumberOfChildren,
        "Number of Children",
        Ordinal,
        FOUR,
        Labeler::Code(Field::NumberOfChildren),
    ),
    raw(Field::ChildrenTwoToSeven, "Has Children Age 2-7", Categorical, BINARY, Labeler::YesNo),
    ordinal(Field::Q19Nps, "NPS Score (Q19)", FIVE, Labeler::Prefixed("Score")),
    Variable {
        key: "nps_category",
        label: "NPS Category (Q19)",
        kind: Categorical,
        domain: THREE,
        source: VariableSource::NpsCategory,
        labeler: Labeler::Named(NPS_CATEGORIES),
    },
    ordinal(
        Field::Q18PreferenceVsBrands,
        "Brand Preference (Q18)",
        THREE,
        Labeler::Code(Field::Q18PreferenceVsBrands),
    ),
    ordinal(Field::Q8MemoriesInfluencePurchase, "Memory Influence (Q8)", FIVE, LEVEL),
    derived(
        "memory_influence_binned",
        "Memory Influence - Binned",
        THREE,
        VariableSource::MemoryInfluence,
        MEMORY_BINS,
    ),
    derived(
        "q11_nostalgia_quartile",
        "Nostalgia Quartile",
        FOUR,
        VariableSource::NostalgiaQuartile,
        NOSTALGIA_QUARTILES,
    ),
    ordinal(Field::Q6RankLittleTikes, "LT Childhood Rank (Q6)", SIX, RANK),
    ordinal(Field::Q6RankFisherPrice, "Fisher-Price Childhood Rank (Q6)", SIX, RANK),
    ordinal(Field::Q6RankPlayskool, "Playskool Childhood Rank (Q6)", SIX, RANK),
    ordinal(Field::Q6RankToynado, "Toynado Childhood Rank (Q6)", SIX, RANK),
    ordinal(Field::Q6RankLego, "LEGO Childhood Rank (Q6)", SIX, RANK),
    ordinal(Field::Q6RankOther, "Other Brand Childhood Rank (Q6)", SIX, RANK),
    ordinal(Field::Q7VividMemories, "Vivid Toy Memories (Q7a)", FIVE, LEVEL),
    ordinal(Field::Q7RemindsChildhood, "Toys Remind of Childhood (Q7b)", FIVE, LEVEL),
    ordinal(Field::Q7WantChildExperience, "Want Child to Experience Toys (Q7c)", FIVE, LEVEL),
    ordinal(Field::Q7NotRelevantToday, "Toys Not Relevant Today (Q7d)", FIVE, LEVEL),
    ordinal(Field::Q10RankQualityDurability, "Quality/Durability Future Rank (Q10)", SIX, RANK),
    ordinal(Field::Q10RankSafetyTrust, "Safety/Trust Future Rank (Q10)", SIX, RANK),
    ordinal(
        Field::Q10RankActiveImaginativePlay,
        "Active/Imaginative Play Future Rank (Q10)",
        SIX,
        RANK,
    ),
    ordinal(
        Field::Q10RankEducationalDevelopmental,
        "Educational/Developmental Future Rank (Q10)",
        SIX,
        RANK,
    ),
    ordinal(Field::Q10RankUseOfTechnology, "Tech Use Future Rank (Q10)", SIX, RANK),
    ordinal(Field::Q10RankChildhoodMemories, "Childhood Memories Future Rank (Q10)", SIX, RANK),
    ordinal(Field::Q16FisherPrice, "Fisher-Price Rating (Q16)", FIVE, RATING),
    ordinal(Field::Q16Step2, "Step2 Rating (Q16)", FIVE, RATING),
    ordinal(Field::Q16MelissaDoug, "Melissa & Doug Rating (Q16)", FIVE, RATING),
    ordinal(Field::Q16Lego, "LEGO Rating (Q16)", FIVE, RATING),
    ordinal(Field::Q16Tonies, "Tonies Rating (Q16)", FIVE, RATING),
    ordinal(Field::Q16Lovevery, "Lovevery Rating (Q16)", FIVE, RATING),
    ordinal(Field::Q16Toynado, "Toynado Rating (Q16)", FIVE, RATING),
    ordinal(Field::Q16LittleTikes, "LT Competitor Rating (Q16)", FIVE, RATING),
    raw(
        Field::Q12Represents,
        "Brand Perception (Q12)",
        Categorical,
        FIVE,
        Labeler::Code(Field::Q12Represents),
    ),
    raw(
        Field::Q17FutureDirection,
        "Future Direction Preference (Q17)",
        Categorical,
        FOUR,
        Labeler::Code(Field::Q17FutureDirection),
    ),
    ordinal(Field::Q13MakesNostalgic, "Nostalgia Feel (Q13a)", FIVE, LEVEL),
    derived(
        "nostalgia_feel_binned",
        "Nostalgia Feel - Binned (Q13a)",
        THREE,
        VariableSource::LikertBin(Field::Q13MakesNostalgic),
        AGREE_BINS,
    ),
    ordinal(Field::Q13NostalgiaBuyLikelihood, "Nostalgia Purchase Lift (Q13b)", FIVE, LEVEL),
    derived(
        "nostalgia_purchase_binned",
        "Nostalgia Purchase Lift - Binned (Q13b)",
        THREE,
        VariableSource::LikertBin(Field::Q13NostalgiaBuyLikelihood),
        AGREE_BINS,
    ),
    ordinal(Field::Q13TrustVsNewer, "Nostalgia Trust Lift (Q13c)", FIVE, LEVEL),
    derived(
        "nostalgia_trust_binned",
        "Nostalgia Trust Lift - Binned (Q13c)",
        THREE,
        VariableSource::LikertBin(Field::Q13TrustVsNewer),
        AGREE_BINS,
    ),
    ordinal(Field::Q14FeelsModern, "Modernness Perception (Q14a)", FIVE, LEVEL),
    derived(
        "modernness_binned",
        "Modernness Perception - Binned (Q14a)",
        THREE,
        VariableSource::LikertBin(Field::Q14FeelsModern),
        AGREE_BINS,
    ),
    ordinal(Field::Q14IncorporateTechnology, "Tech Innovation Appetite (Q14b)", FIVE, LEVEL),
    derived(
        "tech_innovation_binned",
        "Tech Innovation Appetite - Binned (Q14b)",
        THREE,
        VariableSource::LikertBin(Field::Q14IncorporateTechnology),
        AGREE_BINS,
    ),
    ordinal(Field::Q14KeepTraditional, "Traditional Look Preference (Q14c)", FIVE, LEVEL),
    derived(
        "traditional_preference_binned",
        "Traditional Look Preference - Binned (Q14c)",
        THREE,
        VariableSource::LikertBin(Field::Q14KeepTraditional),
        AGREE_BINS,
    ),
    ordinal(Field::Q14TrendySocialMedia, "Social-Media Relevance (Q14d)", FIVE, LEVEL),
    derived(
        "social_media_relevance_binned",
        "Social-Media Relevance - Binned (Q14d)",
        THREE,
        VariableSource::LikertBin(Field::Q14TrendySocialMedia),
        AGREE_BINS,
    ),
    ordinal(Field::Q9QualityDurability, "Quality & Durability Importance (Q9a)", FIVE, LEVEL),
    derived(
        "quality_importance_binned",
        "Quality & Durability Importance - Binned (Q9a)",
        THREE,
        VariableSource::LikertBin(Field::Q9QualityDurability),
        IMPORTANCE_BINS,
    ),
    ordinal(Field::Q9SafetyTrust, "Safety & Trust Importance (Q9b)", FIVE, LEVEL),
    derived(
        "safety_importance_binned",
        "Safety & Trust Importance - Binned (Q9b)",
        THREE,
        VariableSource::LikertBin(Field::Q9SafetyTrust),
        IMPORTANCE_BINS,
    ),
    ordinal(Field::Q9ActiveImaginativePlay, "Imaginative Play Importance (Q9c)", FIVE, LEVEL),
    derived(
        "imaginative_play_importance_binned",
        "Imaginative Play Importance - Binned (Q9c)",
        THREE,
        VariableSource::LikertBin(Field::Q9ActiveImaginativePlay),
        IMPORTANCE_BINS,
    ),
    ordinal(Field::Q9EducationalDevelopmental, "Educational Value Importance (Q9d)", FIVE, LEVEL),
    derived(
        "educational_importance_binned",
        "Educational Value Importance - Binned (Q9d)",
        THREE,
        VariableSource::LikertBin(Field::Q9EducationalDevelopmental),
        IMPORTANCE_BINS,
    ),
    ordinal(Field::Q9UseOfTechnology, "Tech Importance (Q9e)", FIVE, LEVEL),
    derived(
        "tech_importance_binned",
        "Tech Importance - Binned (Q9e)",
        THREE,
        VariableSource::LikertBin(Field::Q9UseOfTechnology),
        IMPORTANCE_BINS,
    ),
    ordinal(Field::Q9ChildhoodMemories, "Childhood Memories Importance (Q9f)", FIVE, LEVEL),
    derived(
        "memories_importance_binned",
        "Childhood Memories Importance - Binned (Q9f)",
        THREE,
        VariableSource::LikertBin(Field::Q9ChildhoodMemories),
        IMPORTANCE_BINS,
    ),
    derived(
        "q15a_quartile",
        "LT Durability Rating Quartile (Q15a: 0-100)",
        FOUR,
        VariableSource::RatingQuartile(Field::Q15QualityDurability),
        RATING_QUARTILES,
    ),
    derived(
        "lt_durability_binned",
        "LT Durability Rating - Binned (Q15a)",
        THREE,
        VariableSource::RatingBin(Field::Q15QualityDurability),
        RATING_BINS,
    ),
    derived(
        "q15b_quartile",
        "LT Safety Rating Quartile (Q15b: 0-100)",
        FOUR,
        VariableSource::RatingQuartile(Field::Q15SafetyTrust),
        RATING_QUARTILES,
    ),
    derived(
        "lt_safety_binned",
        "LT Safety Rating - Binned (Q15b)",
        THREE,
        VariableSource::RatingBin(Field::Q15SafetyTrust),
        RATING_BINS,
    ),
    derived(
        "q15c_quartile",
        "LT Imaginative Play Rating Quartile (Q15c: 0-100)",
        FOUR,
        VariableSource::RatingQuartile(Field::Q15ActiveImaginativePlay),
        RATING_QUARTILES,
    ),
    derived(
        "lt_imaginative_play_binned",
        "LT Imaginative Play Rating - Binned (Q15c)",
        THREE,
        VariableSource::RatingBin(Field::Q15ActiveImaginativePlay),
        RATING_BINS,
    ),
    derived(
        "q15d_quartile",
        "LT Educational Rating Quartile (Q15d: 0-100)",
        FOUR,
        VariableSource::RatingQuartile(Field::Q15EducationalDevelopmental),
        RATING_QUARTILES,
    ),
    derived(
        "lt_educational_binned",
        "LT Educational Rating - Binned (Q15d)",
        THREE,
        VariableSource::RatingBin(Field::Q15EducationalDevelopmental),
        RATING_BINS,
    ),
    derived(
        "q15e_quartile",
        "LT Tech Rating Quartile (Q15e: 0-100)",
        FOUR,
        VariableSource::RatingQuartile(Field::Q15UseOfTechnology),
        RATING_QUARTILES,
    ),
    derived(
        "lt_tech_binned",
        "LT Tech Rating - Binned (Q15e)",
        THREE,
        VariableSource::RatingBin(Field::Q15UseOfTechnology),
        RATING_BINS,
    ),
    derived(
        "q15f_quartile",
        "LT Childhood Memories Rating Quartile (Q15f: 0-100)",
        FOUR,
        VariableSource::RatingQuartile(Field::Q15ChildhoodMemories),
        RATING_QUARTILES,
    ),
    derived(
        "lt_childhood_memories_binned",
        "LT Childhood Memories Rating - Binned (Q15f)",
        THREE,
        VariableSource::RatingBin(Field::Q15ChildhoodMemories),
        RATING_BINS,
    ),
    Variable {
        key: "primary_platform",
        label: "Primary Parenting Platform (Q5)",
        kind: Categorical,
        domain: SEVEN,
        source: VariableSource::PrimaryPlatform,
        labeler: Labeler::Named(PLATFORMS),
    },
];

/// Look up a catalog variable by key.
pub fn find_variable(key: &str) -> Option<&'static Variable> {
    CATALOG.iter().find(|v| v.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_keys_are_unique() {
        let keys: HashSet<_> = CATALOG.iter().map(|v| v.key).collect();
        assert_eq!(keys.len(), CATALOG.len());
    }

    #[test]
    fn test_find_variable() {
        let age = find_variable("age_group").unwrap();
        assert_eq!(age.label, "Age Group");
        assert!(age.is_ordinal());
        assert!(find_variable("shoe_size").is_none());
    }

    #[test]
    fn test_raw_keys_match_field_names() {
        for var in CATALOG {
            if let VariableSource::Raw(field) = var.source {
                assert_eq!(var.key, field.name());
            }
        }
    }

    #[test]
    fn test_likert_bins() {
        assert_eq!(bin_likert(1.0), 1.0);
        assert_eq!(bin_likert(2.0), 1.0);
        assert_eq!(bin_likert(3.0), 2.0);
        assert_eq!(bin_likert(4.0), 3.0);
    }

    #[test]
    fn test_rating_bins_and_quartiles() {
        assert_eq!(bin_rating(50.0), 1.0);
        assert_eq!(bin_rating(51.0), 2.0);
        assert_eq!(bin_rating(76.0), 3.0);
        assert_eq!(rating_quartile(25.0), 1.0);
        assert_eq!(rating_quartile(75.0), 3.0);
        assert_eq!(rating_quartile(100.0), 4.0);
        // nostalgia quartile boundaries belong to the lower bucket
        assert_eq!(nostalgia_quartile(25.0), 1.0);
        assert_eq!(nostalgia_quartile(26.0), 2.0);
        assert_eq!(nostalgia_quartile(76.0), 4.0);
    }

    #[test]
    fn test_memory_and_nps_bins() {
        assert_eq!(memory_influence(1.0), 1.0);
        assert_eq!(memory_influence(3.0), 2.0);
        assert_eq!(memory_influence(5.0), 3.0);
        assert_eq!(nps_category(2.0), 1.0);
        assert_eq!(nps_category(3.0), 2.0);
        assert_eq!(nps_category(4.0), 3.0);
    }

    #[test]
    fn test_primary_platform() {
        assert_eq!(primary_platform("4,1"), Some(4.0));
        assert_eq!(primary_platform(" 2 "), Some(2.0));
        assert_eq!(primary_platform("9"), Some(1.0));
        assert_eq!(primary_platform(""), None);
    }

    #[test]
    fn test_derived_value_missing_is_none() {
        let var = find_variable("nostalgia_feel_binned").unwrap();
        assert_eq!(var.value(&Respondent::default()), None);
        let r = Respondent::default().with(Field::Q13MakesNostalgic, 5.0);
        assert_eq!(var.value(&r), Some(3.0));
    }

    #[test]
    fn test_labels() {
        let nps = find_variable("q19_nps_little_tikes_1_5").unwrap();
        assert_eq!(nps.domain_labels()[0], "Score 1");
        let platform = find_variable("primary_platform").unwrap();
        assert_eq!(platform.labeler.label(6.0), "Texts/Group Chats");
        assert_eq!(platform.labeler.label(12.0), "12");
        let kids = find_variable("children_2_7").unwrap();
        assert_eq!(kids.domain_labels(), vec!["No", "Yes"]);
        let income = find_variable("household_income").unwrap();
        assert_eq!(income.domain_labels()[3], "$150K+");
    }
}
