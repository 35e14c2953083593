//! The survey schema: a typed respondent record and an enum of its numeric fields.
//!
//! Every numeric answer is `Option<f64>`; `None` means the cell was blank or
//! unparseable. Code that needs "a field chosen at runtime" goes through
//! [`Field`] and [`Respondent::get`], never through string lookups on the
//! record itself.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SurveyError};

macro_rules! survey_schema {
    (
        numeric { $($column:ident => $variant:ident),* $(,)? }
        text { $($text:ident),* $(,)? }
    ) => {
        /// One survey respondent (one CSV row).
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(default)]
        pub struct Respondent {
            $(pub $column: Option<f64>,)*
            $(pub $text: String,)*
        }

        /// Numeric fields of the survey schema.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Field {
            $($variant,)*
        }

        impl Field {
            /// Every numeric field, in CSV column order.
            pub const ALL: &'static [Field] = &[$(Field::$variant,)*];

            /// Canonical CSV column name.
            pub const fn name(self) -> &'static str {
                match self {
                    $(Field::$variant => stringify!($column),)*
                }
            }
        }

        impl Respondent {
            /// Names of the free-text and multi-select columns.
            pub const TEXT_COLUMNS: &'static [&'static str] = &[$(stringify!($text),)*];

            /// Read a numeric field.
            pub fn get(&self, field: Field) -> Option<f64> {
                match field {
                    $(Field::$variant => self.$column,)*
                }
            }

            pub(crate) fn set(&mut self, field: Field, value: Option<f64>) {
                match field {
                    $(Field::$variant => self.$column = value,)*
                }
            }

            /// Assign a text column by name; returns false for unknown names.
            pub(crate) fn set_text(&mut self, column: &str, value: String) -> bool {
                match column {
                    $(stringify!($text) => {
                        self.$text = value;
                        true
                    })*
                    _ => false,
                }
            }
        }
    };
}

survey_schema! {
    numeric {
        children_2_7 => ChildrenTwoToSeven,
        number_of_children => NumberOfChildren,
        age_group => AgeGroup,
        gender => Gender,
        location => Location,
        household_income => HouseholdIncome,
        q6_childhood_brand_rank_little_tikes => Q6RankLittleTikes,
        q6_childhood_brand_rank_fisher_price => Q6RankFisherPrice,
        q6_childhood_brand_rank_playskool => Q6RankPlayskool,
        q6_childhood_brand_rank_toynado => Q6RankToynado,
        q6_childhood_brand_rank_lego => Q6RankLego,
        q6_childhood_brand_rank_other => Q6RankOther,
        q7_memories_childhood_toys_vivid_memories_1_5 => Q7VividMemories,
        q7_memories_childhood_toys_reminds_childhood_1_5 => Q7RemindsChildhood,
        q7_memories_childhood_toys_want_child_experience_1_5 => Q7WantChildExperience,
        q7_memories_childhood_toys_not_relevant_today_1_5 => Q7NotRelevantToday,
        q8_memories_influence_purchase_1_5 => Q8MemoriesInfluencePurchase,
        q9_importance_quality_durability_1_5 => Q9QualityDurability,
        q9_importance_safety_trust_1_5 => Q9SafetyTrust,
        q9_importance_active_imaginative_play_1_5 => Q9ActiveImaginativePlay,
        q9_importance_educational_developmental_1_5 => Q9EducationalDevelopmental,
        q9_importance_use_of_technology_1_5 => Q9UseOfTechnology,
        q9_importance_childhood_memories_1_5 => Q9ChildhoodMemories,
        q10_rank_attributes_future_1 => Q10RankQualityDurability,
        q10_rank_attributes_future_2 => Q10RankSafetyTrust,
        q10_rank_attributes_future_3 => Q10RankActiveImaginativePlay,
        q10_rank_attributes_future_4 => Q10RankEducationalDevelopmental,
        q10_rank_attributes_future_5 => Q10RankUseOfTechnology,
        q10_rank_attributes_future_6 => Q10RankChildhoodMemories,
        q11_nostalgia_little_tikes_0_100 => Q11Nostalgia,
        q12_little_tikes_represents => Q12Represents,
        q13_emotional_impact_makes_nostalgic_1_5 => Q13MakesNostalgic,
        q13_emotional_impact_nostalgia_buy_likelihood_1_5 => Q13NostalgiaBuyLikelihood,
        q13_emotional_impact_trust_vs_newer_1_5 => Q13TrustVsNewer,
        q14_perception_brand_feels_modern_1_5 => Q14FeelsModern,
        q14_perception_brand_incorporate_technology_1_5 => Q14IncorporateTechnology,
        q14_perception_brand_keep_traditional_1_5 => Q14KeepTraditional,
        q14_perception_brand_trendy_social_media_1_5 => Q14TrendySocialMedia,
        q15_lt_rating_vs_competitors_quality_durability_0_100 => Q15QualityDurability,
        q15_lt_rating_vs_competitors_safety_trust_0_100 => Q15SafetyTrust,
        q15_lt_rating_vs_competitors_active_imaginative_play_0_100 => Q15ActiveImaginativePlay,
        q15_lt_rating_vs_competitors_educational_developmental_0_100 => Q15EducationalDevelopmental,
        q15_lt_rating_vs_competitors_use_of_technology_0_100 => Q15UseOfTechnology,
        q15_lt_rating_vs_competitors_childhood_memories_0_100 => Q15ChildhoodMemories,
        q16_competitor_brand_rating_fisher_price_1_5 => Q16FisherPrice,
        q16_competitor_brand_rating_step2_1_5 => Q16Step2,
        q16_competitor_brand_rating_melissa_doug_1_5 => Q16MelissaDoug,
        q16_competitor_brand_rating_lego_1_5 => Q16Lego,
        q16_competitor_brand_rating_tonies_1_5 => Q16Tonies,
        q16_competitor_brand_rating_lovevery_1_5 => Q16Lovevery,
        q16_competitor_brand_rating_toynado_1_5 => Q16Toynado,
        q16_competitor_brand_rating_little_tikes_1_5 => Q16LittleTikes,
        q17_future_directions_excitement_1_4 => Q17FutureDirection,
        q18_preference_vs_brands_1_3 => Q18PreferenceVsBrands,
        q19_nps_little_tikes_1_5 => Q19Nps,
    }
    text {
        q_id,
        platforms_selections,
        platforms_other_text,
        q6_childhood_brand_other_text,
    }
}

impl Field {
    /// Look up a field by its CSV column name.
    pub fn from_name(name: &str) -> Option<Field> {
        Field::ALL.iter().copied().find(|f| f.name() == name)
    }

    /// Like [`Field::from_name`], but an unknown name is an error.
    pub fn parse(name: &str) -> Result<Field> {
        Field::from_name(name.trim()).ok_or_else(|| SurveyError::UnknownField(name.to_string()))
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Respondent {
    /// Builder-style setter, mostly useful for fixtures.
    pub fn with(mut self, field: Field, value: f64) -> Self {
        self.set(field, Some(value));
        self
    }

    /// Values of `field` across `records`, `None` for blanks.
    pub fn column(records: &[Respondent], field: Field) -> Vec<Option<f64>> {
        records.iter().map(|r| r.get(field)).collect()
    }
}

/// Q6: childhood brand ranking (1 = favourite, 6 = least).
pub const CHILDHOOD_BRAND_RANKS: [(Field, &str); 6] = [
    (Field::Q6RankLittleTikes, "Little Tikes"),
    (Field::Q6RankFisherPrice, "Fisher-Price"),
    (Field::Q6RankPlayskool, "Playskool"),
    (Field::Q6RankToynado, "Toynado"),
    (Field::Q6RankLego, "LEGO"),
    (Field::Q6RankOther, "Other"),
];

/// Q10: future attribute ranking (1 = most important).
pub const FUTURE_ATTRIBUTE_RANKS: [(Field, &str); 6] = [
    (Field::Q10RankQualityDurability, "Quality & Durability"),
    (Field::Q10RankSafetyTrust, "Safety & Trust"),
    (Field::Q10RankActiveImaginativePlay, "Active & Imaginative Play"),
    (Field::Q10RankEducationalDevelopmental, "Educational & Developmental"),
    (Field::Q10RankUseOfTechnology, "Use of Technology"),
    (Field::Q10RankChildhoodMemories, "Childhood Memories"),
];

/// Q15: Little Tikes rated against competitors, 0-100 sliders.
pub const COMPETITOR_RATINGS: [(Field, &str); 6] = [
    (Field::Q15QualityDurability, "Quality & Durability"),
    (Field::Q15SafetyTrust, "Safety & Trust"),
    (Field::Q15ActiveImaginativePlay, "Active & Imaginative Play"),
    (Field::Q15EducationalDevelopmental, "Educational & Developmental Value"),
    (Field::Q15UseOfTechnology, "Use of Technology"),
    (Field::Q15ChildhoodMemories, "My Childhood Memories"),
];

/// Q16: 1-5 ratings of each brand.
pub const BRAND_RATINGS: [(Field, &str); 8] = [
    (Field::Q16FisherPrice, "Fisher-Price"),
    (Field::Q16Step2, "Step2"),
    (Field::Q16MelissaDoug, "Melissa & Doug"),
    (Field::Q16Lego, "LEGO"),
    (Field::Q16Tonies, "Tonies"),
    (Field::Q16Lovevery, "Lovevery"),
    (Field::Q16Toynado, "Toynado"),
    (Field::Q16LittleTikes, "Little Tikes"),
];
