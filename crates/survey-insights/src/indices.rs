//! Per-respondent composite indices and the Net Promoter Score.
//!
//! Every composite is a fixed weighted combination of raw answers rescaled to
//! roughly 0-100. Missing answers are zero-filled in every formula, so a
//! respondent with blanks scores lower rather than being dropped.

use serde::{Deserialize, Serialize};

use crate::interpretation::interpret_nps;
use crate::stats::descriptive::{mean, percentage};
use crate::survey::{COMPETITOR_RATINGS, FUTURE_ATTRIBUTE_RANKS, Field, Respondent};
use crate::utils::{DEFAULT_FILL, safe_number, safe_split};

/// Number of social platforms offered in the survey.
pub const PLATFORM_COUNT: usize = 7;

/// Parenthood segment used throughout the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParentProfile {
    #[serde(rename = "Active Parent")]
    ActiveParent,
    #[serde(rename = "Non-Parent/Future Parent")]
    NonParent,
}

impl ParentProfile {
    pub fn label(self) -> &'static str {
        match self {
            ParentProfile::ActiveParent => "Active Parent",
            ParentProfile::NonParent => "Non-Parent/Future Parent",
        }
    }
}

/// Priority score for one Q10 attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributePriority {
    pub attribute: String,
    pub score: f64,
}

/// Composite scores for a single respondent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedIndices {
    pub nostalgia_intensity: f64,
    pub brand_trust: f64,
    pub purchase_intent: f64,
    pub modernization_score: f64,
    pub competitive_strength: f64,
    pub attribute_priority: Vec<AttributePriority>,
    pub parent_profile: ParentProfile,
    pub digital_adoption: f64,
}

/// Net Promoter breakdown; all figures are percentages of respondents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct NpsBreakdown {
    pub n: usize,
    pub score: f64,
    pub promoters: f64,
    pub passives: f64,
    pub detractors: f64,
    pub label: String,
}

/// Average of each composite over a set of respondents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct IndexMeans {
    pub n: usize,
    pub nostalgia_intensity: f64,
    pub brand_trust: f64,
    pub purchase_intent: f64,
    pub modernization_score: f64,
    pub competitive_strength: f64,
    pub digital_adoption: f64,
    pub attribute_priority: Vec<AttributePriority>,
    pub active_parent_share: f64,
}

#[inline]
fn value(record: &Respondent, field: Field) -> f64 {
    safe_number(record.get(field), DEFAULT_FILL)
}

/// Compute every composite for `record`.
pub fn derive_indices(record: &Respondent) -> DerivedIndices {
    let v = |field| value(record, field);

    let nostalgia_intensity = ((v(Field::Q7VividMemories)
        + v(Field::Q7RemindsChildhood)
        + v(Field::Q7WantChildExperience)
        + (6.0 - v(Field::Q7NotRelevantToday))
        + v(Field::Q11Nostalgia) / 20.0
        + v(Field::Q13MakesNostalgic))
        / 6.0)
        * 20.0;

    let brand_trust = (((7.0 - v(Field::Q6RankLittleTikes))
        + v(Field::Q13TrustVsNewer)
        + v(Field::Q19Nps)
        + (v(Field::Q15QualityDurability) + v(Field::Q15SafetyTrust)) / 40.0)
        / 4.0)
        * 20.0;

    let purchase_intent = ((v(Field::Q8MemoriesInfluencePurchase)
        + v(Field::Q13NostalgiaBuyLikelihood)
        + v(Field::Q18PreferenceVsBrands)
        + v(Field::Q19Nps))
        / 4.0)
        * 20.0;

    let modernization_score = ((v(Field::Q14FeelsModern)
        + v(Field::Q14IncorporateTechnology)
        + (6.0 - v(Field::Q14KeepTraditional))
        + v(Field::Q14TrendySocialMedia))
        / 4.0)
        * 20.0;

    let competitive_strength =
        COMPETITOR_RATINGS.iter().map(|(f, _)| v(*f)).sum::<f64>() / COMPETITOR_RATINGS.len() as f64;

    let attribute_priority = FUTURE_ATTRIBUTE_RANKS
        .iter()
        .map(|(field, label)| AttributePriority {
            attribute: (*label).to_string(),
            score: ((7.0 - v(*field)) / 6.0) * 100.0,
        })
        .collect();

    let parent_profile = if record.get(Field::ChildrenTwoToSeven) == Some(1.0) {
        ParentProfile::ActiveParent
    } else {
        ParentProfile::NonParent
    };

    let platforms = safe_split(&record.platforms_selections, ',').len();
    let digital_adoption = (platforms as f64 / PLATFORM_COUNT as f64 * 100.0).min(100.0);

    DerivedIndices {
        nostalgia_intensity,
        brand_trust,
        purchase_intent,
        modernization_score,
        competitive_strength,
        attribute_priority,
        parent_profile,
        digital_adoption,
    }
}

/// Net Promoter Score on the 1-5 recommendation item.
///
/// Promoters answer 4-5, passives 3, detractors 1-2. Respondents without an
/// answer count toward the total but fall in no category.
pub fn nps(records: &[Respondent]) -> NpsBreakdown {
    let n = records.len();
    if n == 0 {
        return NpsBreakdown {
            label: interpret_nps(0.0).to_string(),
            ..Default::default()
        };
    }

    let answers = records.iter().filter_map(|r| r.get(Field::Q19Nps));
    let (mut promoters, mut passives, mut detractors) = (0usize, 0usize, 0usize);
    for answer in answers {
        if answer >= 4.0 {
            promoters += 1;
        } else if answer == 3.0 {
            passives += 1;
        } else if answer <= 2.0 {
            detractors += 1;
        }
    }

    let total = n as f64;
    let score = percentage(promoters as f64, total) - percentage(detractors as f64, total);
    NpsBreakdown {
        n,
        score,
        promoters: percentage(promoters as f64, total),
        passives: percentage(passives as f64, total),
        detractors: percentage(detractors as f64, total),
        label: interpret_nps(score).to_string(),
    }
}

/// Mean of each composite across `records`.
pub fn index_means(records: &[Respondent]) -> IndexMeans {
    if records.is_empty() {
        return IndexMeans::default();
    }

    let all: Vec<DerivedIndices> = records.iter().map(derive_indices).collect();
    let avg = |pick: fn(&DerivedIndices) -> f64| mean(&all.iter().map(pick).collect::<Vec<_>>());

    let attribute_priority = FUTURE_ATTRIBUTE_RANKS
        .iter()
        .enumerate()
        .map(|(idx, (_, label))| AttributePriority {
            attribute: (*label).to_string(),
            score: mean(
                &all.iter()
                    .map(|d| d.attribute_priority[idx].score)
                    .collect::<Vec<_>>(),
            ),
        })
        .collect();

    let parents = all
        .iter()
        .filter(|d| d.parent_profile == ParentProfile::ActiveParent)
        .count();

    IndexMeans {
        n: all.len(),
        nostalgia_intensity: avg(|d| d.nostalgia_intensity),
        brand_trust: avg(|d| d.brand_trust),
        purchase_intent: avg(|d| d.purchase_intent),
        modernization_score: avg(|d| d.modernization_score),
        competitive_strength: avg(|d| d.competitive_strength),
        digital_adoption: avg(|d| d.digital_adoption),
        attribute_priority,
        active_parent_share: percentage(parents as f64, all.len() as f64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn neutral_respondent() -> Respondent {
        let mut r = Respondent::default();
        for field in Field::ALL {
            let value = if field.name().ends_with("_0_100") {
                50.0
            } else {
                3.0
            };
            r = r.with(*field, value);
        }
        r
    }

    #[test]
    fn test_neutral_record_regression() {
        let d = derive_indices(&neutral_respondent());
        // (3 + 3 + 3 + 3 + 2.5 + 3) / 6 * 20
        assert!((d.nostalgia_intensity - 58.333_333).abs() < 1e-4);
        // (4 + 3 + 3 + 2.5) / 4 * 20
        assert!((d.brand_trust - 62.5).abs() < 1e-9);
        assert!((d.purchase_intent - 60.0).abs() < 1e-9);
        assert!((d.modernization_score - 60.0).abs() < 1e-9);
        assert!((d.competitive_strength - 50.0).abs() < 1e-9);
        assert!((d.attribute_priority[0].score - 200.0 / 3.0).abs() < 1e-9);
        assert_eq!(d.parent_profile, ParentProfile::NonParent);
    }

    #[test]
    fn test_missing_fields_zero_fill() {
        let d = derive_indices(&Respondent::default());
        // only the reversed item contributes: 6 / 6 * 20
        assert!((d.nostalgia_intensity - 20.0).abs() < 1e-9);
        assert!((d.brand_trust - 35.0).abs() < 1e-9);
        assert_eq!(d.purchase_intent, 0.0);
        assert!((d.modernization_score - 30.0).abs() < 1e-9);
        assert_eq!(d.digital_adoption, 0.0);
        assert!((d.attribute_priority[5].score - 700.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_parent_profile_and_digital_adoption() {
        let mut r = Respondent::default().with(Field::ChildrenTwoToSeven, 1.0);
        r.platforms_selections = "1,2,3,4,5,6,7,8".to_string();
        let d = derive_indices(&r);
        assert_eq!(d.parent_profile, ParentProfile::ActiveParent);
        assert_eq!(d.digital_adoption, 100.0);
        assert_eq!(d.parent_profile.label(), "Active Parent");
    }

    #[test]
    fn test_parent_profile_serializes_as_label() {
        let json = serde_json::to_string(&ParentProfile::NonParent).unwrap();
        assert_eq!(json, "\"Non-Parent/Future Parent\"");
    }

    // ==== nps tests ====

    #[test]
    fn test_nps_breakdown() {
        let records: Vec<Respondent> = [5.0, 4.0, 3.0, 1.0]
            .into_iter()
            .map(|s| Respondent::default().with(Field::Q19Nps, s))
            .collect();
        let result = nps(&records);
        assert_eq!(result.n, 4);
        assert_eq!(result.promoters, 50.0);
        assert_eq!(result.passives, 25.0);
        assert_eq!(result.detractors, 25.0);
        assert_eq!(result.score, 25.0);
        assert_eq!(result.label, "Needs Improvement");
    }

    #[test]
    fn test_nps_empty_and_missing() {
        assert_eq!(nps(&[]).score, 0.0);
        let records = vec![
            Respondent::default().with(Field::Q19Nps, 5.0),
            Respondent::default(),
        ];
        let result = nps(&records);
        assert_eq!(result.promoters, 50.0);
        assert_eq!(result.detractors, 0.0);
    }

    #[test]
    fn test_index_means() {
        let records = vec![neutral_respondent(), neutral_respondent()];
        let means = index_means(&records);
        assert_eq!(means.n, 2);
        assert!((means.purchase_intent - 60.0).abs() < 1e-9);
        assert_eq!(means.attribute_priority.len(), 6);
        assert_eq!(means.active_parent_share, 0.0);
        assert_eq!(index_means(&[]), IndexMeans::default());
    }
}
