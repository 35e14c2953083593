use crate::config::AnalysisConfig;
use crate::error::{Result, ResultExt, SurveyError};
use crate::filter::SurveyFilter;
use crate::indices::{IndexMeans, NpsBreakdown, index_means, nps};
use crate::interpretation::{
    concentration_index, consensus_level, interpret_alpha, interpret_kendall_w,
};
use crate::labels::{coded_values, label_for_code};
use crate::stats::contingency::{ChiSquareResult, chi_square_uniform};
use crate::stats::descriptive::{
    DescriptiveStats, LikertSummary, confidence_interval, describe, likert_summary, mean, median,
    mode, percentage, std_dev,
};
use crate::stats::reliability::{
    KendallWResult, SpearmanResult, TTestResult, cronbach_alpha, item_total_correlation,
    kendall_w, spearman_rho, t_test, total_scores,
};
use crate::survey::{
    BRAND_RATINGS, CHILDHOOD_BRAND_RANKS, COMPETITOR_RATINGS, FUTURE_ATTRIBUTE_RANKS, Field,
    Respondent,
};
use crate::utils::{DEFAULT_FILL, safe_number};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info};

// ============================================================================
// Question blocks
// ============================================================================

const Q7_ITEMS: [(Field, &str); 4] = [
    (Field::Q7VividMemories, "I have vivid memories of playing with my favorite toys"),
    (Field::Q7RemindsChildhood, "Seeing my favorite toys today reminds me of my childhood"),
    (Field::Q7WantChildExperience, "I want my child to experience my favorite childhood toy"),
    (Field::Q7NotRelevantToday, "My favorite childhood toys do not feel relevant today [REVERSE]"),
];

const Q9_ITEMS: [(Field, &str); 6] = [
    (Field::Q9QualityDurability, "Quality & Durability"),
    (Field::Q9SafetyTrust, "Safety & Trust"),
    (Field::Q9ActiveImaginativePlay, "Active & Imaginative Play"),
    (Field::Q9EducationalDevelopmental, "Educational & Developmental Value"),
    (Field::Q9UseOfTechnology, "Use of Technology"),
    (Field::Q9ChildhoodMemories, "My Childhood Memories"),
];

const Q13_ITEMS: [(Field, &str); 3] = [
    (Field::Q13MakesNostalgic, "Little Tikes makes me feel nostalgic"),
    (Field::Q13NostalgiaBuyLikelihood, "Nostalgia makes me more likely to buy Little Tikes"),
    (Field::Q13TrustVsNewer, "Nostalgia makes me trust Little Tikes more than newer brands"),
];

const Q14_ITEMS: [(Field, &str); 4] = [
    (Field::Q14FeelsModern, "Little Tikes feels modern and up-to-date"),
    (Field::Q14IncorporateTechnology, "Should incorporate more technology or digital play"),
    (Field::Q14KeepTraditional, "Should keep traditional look and feel"),
    (Field::Q14TrendySocialMedia, "Featured in trendy or social-media-relevant ways"),
];

// ============================================================================
// Report Types
// ============================================================================

/// Full statistical report over one (optionally filtered) respondent set.
///
/// Serializes to the JSON printed by `--json` and written by `--emit-report`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyReport {
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Path to the input file, when loaded from disk
    pub input_file: Option<String>,
    /// Respondents analysed, after filtering
    pub respondents: usize,
    /// Filter in effect, omitted when everything was kept
    pub filter: Option<SurveyFilter>,

    pub likert_items: Vec<LikertItem>,
    pub scale_reliability: Vec<ScaleReliability>,
    pub brand_ratings: Vec<LikertItem>,
    pub childhood_brand_ranking: RankingAnalysis,
    pub future_attribute_ranking: RankingAnalysis,
    /// Agreement between mean Q9 importance and mean Q10 rank per attribute.
    pub rating_ranking_agreement: SpearmanResult,
    pub competitor_ratings: Vec<CompetitorRating>,
    pub nostalgia: NostalgiaSummary,
    pub choices: Vec<ChoiceDistribution>,
    pub index_means: IndexMeans,
    pub nps: NpsBreakdown,
    pub nps_segments: Vec<NpsSegment>,
}

/// Likert summary tagged with its question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikertItem {
    pub field: String,
    pub label: String,
    pub summary: LikertSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemTotal {
    pub label: String,
    pub correlation: f64,
}

/// Cronbach's alpha for a question block plus item-total correlations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScaleReliability {
    pub scale: String,
    pub alpha: f64,
    pub interpretation: String,
    pub items: Vec<ItemTotal>,
}

/// Per-item statistics for a ranking question (1 = top).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedItem {
    pub label: String,
    pub n: usize,
    pub mean_rank: f64,
    pub ci95: (f64, f64),
    pub sd: f64,
    pub median: f64,
    pub mode: f64,
    pub pct_ranked_first: f64,
    pub pct_top_two: f64,
    pub pct_bottom_two: f64,
    pub concentration_index: f64,
    pub consensus: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingAnalysis {
    pub question: String,
    pub items: Vec<RankedItem>,
    pub kendall: KendallWResult,
    pub interpretation: String,
}

/// A Q15 slider compared against the neutral reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitorRating {
    pub attribute: String,
    pub n: usize,
    pub mean: f64,
    pub sd: f64,
    pub ci95: (f64, f64),
    pub pct_above_reference: f64,
    pub t_test: TTestResult,
    pub verdict: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NostalgiaSummary {
    pub stats: DescriptiveStats,
    pub ci95: (f64, f64),
    pub pct_above_50: f64,
    pub pct_below_25: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub code: f64,
    pub label: String,
    pub count: usize,
    pub percentage: f64,
    pub ci95: (f64, f64),
}

/// Share of respondents choosing each option of a single-choice question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoiceDistribution {
    pub question: String,
    pub field: String,
    pub options: Vec<ChoiceOption>,
    /// Test against an even split across options.
    pub goodness_of_fit: ChiSquareResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NpsSegment {
    pub dimension: String,
    pub segment: String,
    pub breakdown: NpsBreakdown,
}

// ============================================================================
// Generator
// ============================================================================

/// Builds [`SurveyReport`]s and writes them to disk.
pub struct ReportGenerator {
    output_dir: PathBuf,
    config: AnalysisConfig,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new(PathBuf::from("."), AnalysisConfig::default())
    }
}

impl ReportGenerator {
    pub fn new(output_dir: PathBuf, config: AnalysisConfig) -> Self {
        Self { output_dir, config }
    }

    /// Compute every report section over `records`.
    ///
    /// Returns [`SurveyError::NoData`] for an empty set.
    pub fn build_report(
        &self,
        records: &[Respondent],
        input_file: Option<&str>,
        filter: Option<&SurveyFilter>,
    ) -> Result<SurveyReport> {
        if records.is_empty() {
            return Err(SurveyError::NoData);
        }
        debug!("Building report over {} respondents", records.len());

        let mut likert_items = Vec::new();
        for (field, label) in Q7_ITEMS
            .iter()
            .chain(&[(
                Field::Q8MemoriesInfluencePurchase,
                "To what extent do childhood memories influence purchasing?",
            )])
            .chain(&Q9_ITEMS)
            .chain(&Q13_ITEMS)
            .chain(&Q14_ITEMS)
            .chain(&[(
                Field::Q19Nps,
                "Likelihood to recommend Little Tikes to another parent",
            )])
        {
            likert_items.push(likert_item(records, *field, label));
        }

        let scale_reliability = vec![
            scale_reliability(records, "Q7 Memory & Nostalgia", &Q7_ITEMS),
            scale_reliability(records, "Q9 Importance Ratings", &Q9_ITEMS),
            scale_reliability(records, "Q13 Emotional Impact", &Q13_ITEMS),
            scale_reliability(records, "Q14 Brand Perception", &Q14_ITEMS),
        ];

        let brand_ratings = BRAND_RATINGS
            .iter()
            .map(|(field, label)| likert_item(records, *field, label))
            .collect();

        let future_attribute_ranking = ranking(
            records,
            "Q10 Future Attribute Importance",
            &FUTURE_ATTRIBUTE_RANKS,
            self.config.confidence_z,
        );

        let report = SurveyReport {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            input_file: input_file.map(String::from),
            respondents: records.len(),
            filter: filter.filter(|f| !f.is_unconstrained()).cloned(),
            likert_items,
            scale_reliability,
            brand_ratings,
            childhood_brand_ranking: ranking(
                records,
                "Q6 Childhood Brand Ranking",
                &CHILDHOOD_BRAND_RANKS,
                self.config.confidence_z,
            ),
            rating_ranking_agreement: rating_ranking_agreement(records),
            future_attribute_ranking,
            competitor_ratings: self.competitor_ratings(records),
            nostalgia: nostalgia_summary(records, self.config.confidence_z),
            choices: [
                ("Q12 What Little Tikes Represents", Field::Q12Represents),
                ("Q17 Future Direction Excitement", Field::Q17FutureDirection),
                ("Q18 Preference vs Other Brands", Field::Q18PreferenceVsBrands),
            ]
            .into_iter()
            .map(|(question, field)| {
                choice_distribution(records, question, field, self.config.confidence_z)
            })
            .collect(),
            index_means: index_means(records),
            nps: nps(records),
            nps_segments: nps_segments(records),
        };

        info!(
            "Report built: {} respondents, NPS {:.1} ({})",
            report.respondents, report.nps.score, report.nps.label
        );
        Ok(report)
    }

    fn competitor_ratings(&self, records: &[Respondent]) -> Vec<CompetitorRating> {
        let reference = self.config.t_test_reference;
        COMPETITOR_RATINGS
            .iter()
            .map(|(field, label)| {
                let values = answered(records, *field);
                let n = values.len();
                let m = mean(&values);
                let (lo, hi) = confidence_interval(m / 100.0, n, self.config.confidence_z);
                let above = values.iter().filter(|v| **v > reference).count();
                CompetitorRating {
                    attribute: (*label).to_string(),
                    n,
                    mean: m,
                    sd: std_dev(&values),
                    ci95: (lo * 100.0, hi * 100.0),
                    pct_above_reference: percentage(above as f64, n as f64),
                    t_test: t_test(&values, reference),
                    verdict: if m > reference {
                        "Strong vs competitors".to_string()
                    } else {
                        "Below market".to_string()
                    },
                }
            })
            .collect()
    }

    /// Write a report to `<output_dir>/<base_name>_report.json`.
    pub fn write_report_to_file(
        &self,
        report: &SurveyReport,
        report_base_name: &str,
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)
            .context(format!("Creating {}", self.output_dir.display()))?;

        let report_path = self
            .output_dir
            .join(format!("{}_report.json", report_base_name));
        let mut file = File::create(&report_path)
            .context(format!("Creating {}", report_path.display()))?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());

        Ok(report_path)
    }
}

// ============================================================================
// Section builders
// ============================================================================

/// Answered values only; blanks are dropped.
fn answered(records: &[Respondent], field: Field) -> Vec<f64> {
    records
        .iter()
        .filter_map(|r| r.get(field))
        .filter(|v| v.is_finite())
        .collect()
}

/// One value per respondent, blanks zero-filled so columns stay aligned.
fn filled(records: &[Respondent], field: Field) -> Vec<f64> {
    records
        .iter()
        .map(|r| safe_number(r.get(field), DEFAULT_FILL))
        .collect()
}

fn likert_item(records: &[Respondent], field: Field, label: &str) -> LikertItem {
    LikertItem {
        field: field.name().to_string(),
        label: label.to_string(),
        summary: likert_summary(&answered(records, field)),
    }
}

fn scale_reliability(
    records: &[Respondent],
    scale: &str,
    items: &[(Field, &str)],
) -> ScaleReliability {
    let columns: Vec<Vec<f64>> = items.iter().map(|(f, _)| filled(records, *f)).collect();
    let alpha = cronbach_alpha(&columns);
    let totals = total_scores(&columns);

    ScaleReliability {
        scale: scale.to_string(),
        alpha,
        interpretation: interpret_alpha(alpha).to_string(),
        items: items
            .iter()
            .zip(&columns)
            .map(|((_, label), column)| ItemTotal {
                label: (*label).to_string(),
                correlation: item_total_correlation(column, &totals),
            })
            .collect(),
    }
}

fn ranking(
    records: &[Respondent],
    question: &str,
    items: &[(Field, &str)],
    z: f64,
) -> RankingAnalysis {
    let ranked: Vec<RankedItem> = items
        .iter()
        .map(|(field, label)| {
            let values = answered(records, *field);
            let n = values.len();
            let m = mean(&values);
            let sd = std_dev(&values);
            let (lo, hi) = confidence_interval(m / 6.0, n, z);
            let share = |pred: fn(f64) -> bool| {
                percentage(values.iter().filter(|v| pred(**v)).count() as f64, n as f64)
            };
            let top = share(|v: f64| v <= 2.0);
            let bottom = share(|v: f64| v >= 5.0);

            RankedItem {
                label: (*label).to_string(),
                n,
                mean_rank: m,
                ci95: (lo * 6.0, hi * 6.0),
                sd,
                median: median(&values),
                mode: mode(&values),
                pct_ranked_first: share(|v: f64| v == 1.0),
                pct_top_two: top,
                pct_bottom_two: bottom,
                concentration_index: concentration_index(top, bottom),
                consensus: consensus_level(sd).to_string(),
            }
        })
        .collect();

    let rows: Vec<Vec<f64>> = records
        .iter()
        .map(|r| {
            items
                .iter()
                .map(|(f, _)| safe_number(r.get(*f), DEFAULT_FILL))
                .collect()
        })
        .collect();
    let kendall = kendall_w(&rows);

    RankingAnalysis {
        question: question.to_string(),
        items: ranked,
        interpretation: interpret_kendall_w(kendall.w).to_string(),
        kendall,
    }
}

/// Spearman between mean importance (Q9) and mean future rank (Q10), per attribute.
fn rating_ranking_agreement(records: &[Respondent]) -> SpearmanResult {
    let ratings: Vec<f64> = Q9_ITEMS
        .iter()
        .map(|(f, _)| mean(&filled(records, *f)))
        .collect();
    let ranks: Vec<f64> = FUTURE_ATTRIBUTE_RANKS
        .iter()
        .map(|(f, _)| mean(&filled(records, *f)))
        .collect();
    spearman_rho(&ratings, &ranks)
}

fn nostalgia_summary(records: &[Respondent], z: f64) -> NostalgiaSummary {
    let values = answered(records, Field::Q11Nostalgia);
    let stats = describe(&values);
    let (lo, hi) = confidence_interval(stats.mean / 100.0, values.len(), z);
    let n = values.len() as f64;

    NostalgiaSummary {
        ci95: (lo * 100.0, hi * 100.0),
        pct_above_50: percentage(values.iter().filter(|v| **v > 50.0).count() as f64, n),
        pct_below_25: percentage(values.iter().filter(|v| **v < 25.0).count() as f64, n),
        stats,
    }
}

fn choice_distribution(
    records: &[Respondent],
    question: &str,
    field: Field,
    z: f64,
) -> ChoiceDistribution {
    let n = records.len();
    let options: Vec<ChoiceOption> = coded_values(field)
        .into_iter()
        .map(|(code, _)| {
            let count = records.iter().filter(|r| r.get(field) == Some(code)).count();
            let p = if n == 0 { 0.0 } else { count as f64 / n as f64 };
            let (lo, hi) = confidence_interval(p, n, z);
            ChoiceOption {
                code,
                label: label_for_code(field, code),
                count,
                percentage: p * 100.0,
                ci95: (lo * 100.0, hi * 100.0),
            }
        })
        .collect();

    let observed: Vec<f64> = options.iter().map(|o| o.count as f64).collect();
    let goodness_of_fit = chi_square_uniform(&observed);

    ChoiceDistribution {
        question: question.to_string(),
        field: field.name().to_string(),
        options,
        goodness_of_fit,
    }
}

fn nps_segments(records: &[Respondent]) -> Vec<NpsSegment> {
    let mut segments = Vec::new();
    let mut push = |dimension: &str, segment: String, subset: Vec<Respondent>| {
        segments.push(NpsSegment {
            dimension: dimension.to_string(),
            segment,
            breakdown: nps(&subset),
        });
    };

    for (code, label) in coded_values(Field::AgeGroup) {
        let subset = records
            .iter()
            .filter(|r| r.get(Field::AgeGroup) == Some(code))
            .cloned()
            .collect();
        push("Age Group", label.to_string(), subset);
    }

    let (parents, others): (Vec<Respondent>, Vec<Respondent>) = records
        .iter()
        .cloned()
        .partition(|r| r.get(Field::ChildrenTwoToSeven) == Some(1.0));
    push("Parenthood", "Parents (2-7)".to_string(), parents);
    push("Parenthood", "Non-Parents".to_string(), others);

    let nostalgia = |r: &Respondent| safe_number(r.get(Field::Q11Nostalgia), DEFAULT_FILL);
    let bands: [(&str, fn(f64) -> bool); 3] = [
        ("Low (0-33)", |v: f64| v < 34.0),
        ("Medium (34-66)", |v: f64| (34.0..67.0).contains(&v)),
        ("High (67-100)", |v: f64| v >= 67.0),
    ];
    for (label, in_band) in bands {
        let subset = records
            .iter()
            .filter(|r| in_band(nostalgia(r)))
            .cloned()
            .collect();
        push("Nostalgia Level", label.to_string(), subset);
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Respondent> {
        (0..12)
            .map(|i| {
                let score = (i % 5 + 1) as f64;
                let mut r = Respondent::default()
                    .with(Field::AgeGroup, (i % 6 + 1) as f64)
                    .with(Field::ChildrenTwoToSeven, (i % 2) as f64)
                    .with(Field::Q19Nps, score)
                    .with(Field::Q11Nostalgia, (i * 8) as f64)
                    .with(Field::Q12Represents, (i % 5 + 1) as f64)
                    .with(Field::Q15QualityDurability, 60.0 + i as f64);
                for (field, _) in Q7_ITEMS {
                    r = r.with(field, score);
                }
                for (j, (field, _)) in CHILDHOOD_BRAND_RANKS.iter().enumerate() {
                    r = r.with(*field, (j + 1) as f64);
                }
                r
            })
            .collect()
    }

    #[test]
    fn test_empty_records_is_no_data() {
        let err = ReportGenerator::default()
            .build_report(&[], None, None)
            .unwrap_err();
        assert_eq!(err.error_code(), "NO_DATA");
    }

    #[test]
    fn test_report_sections() {
        let report = ReportGenerator::default()
            .build_report(&sample(), Some("survey.csv"), None)
            .unwrap();
        assert_eq!(report.respondents, 12);
        assert_eq!(report.input_file.as_deref(), Some("survey.csv"));
        assert!(report.filter.is_none());
        assert_eq!(report.scale_reliability.len(), 4);
        assert_eq!(report.brand_ratings.len(), 8);
        assert_eq!(report.choices.len(), 3);
        assert_eq!(report.choices[0].options.len(), 5);
        // Q7, Q8, Q9, Q13, Q14, Q19
        assert_eq!(report.likert_items.len(), 4 + 1 + 6 + 3 + 4 + 1);
    }

    #[test]
    fn test_identical_q7_items_are_reliable() {
        let report = ReportGenerator::default()
            .build_report(&sample(), None, None)
            .unwrap();
        let q7 = &report.scale_reliability[0];
        assert!((q7.alpha - 1.0).abs() < 1e-9);
        assert_eq!(q7.interpretation, "Good internal consistency");
        assert!(q7.items.iter().all(|i| (i.correlation - 1.0).abs() < 1e-9));
    }

    #[test]
    fn test_identical_rankings_agree() {
        let report = ReportGenerator::default()
            .build_report(&sample(), None, None)
            .unwrap();
        let q6 = &report.childhood_brand_ranking;
        assert!((q6.kendall.w - 1.0).abs() < 1e-12);
        assert_eq!(q6.interpretation, "Very strong agreement");
        assert_eq!(q6.items[0].pct_ranked_first, 100.0);
        assert_eq!(q6.items[0].concentration_index, 999.0);
    }

    #[test]
    fn test_competitor_rating_against_reference() {
        let report = ReportGenerator::default()
            .build_report(&sample(), None, None)
            .unwrap();
        let quality = &report.competitor_ratings[0];
        assert_eq!(quality.n, 12);
        assert_eq!(quality.verdict, "Strong vs competitors");
        assert_eq!(quality.t_test.p_value, 0.01);
        // unanswered slider
        assert_eq!(report.competitor_ratings[1].n, 0);
        assert_eq!(report.competitor_ratings[1].verdict, "Below market");
    }

    #[test]
    fn test_nps_segments() {
        let segments = nps_segments(&sample());
        assert_eq!(segments.len(), 6 + 2 + 3);
        let parents: usize = segments
            .iter()
            .filter(|s| s.dimension == "Parenthood")
            .map(|s| s.breakdown.n)
            .sum();
        assert_eq!(parents, 12);
    }

    #[test]
    fn test_write_report_to_file() {
        let dir = std::env::temp_dir().join(format!("survey_report_test_{}", std::process::id()));
        let generator = ReportGenerator::new(dir.clone(), AnalysisConfig::default());
        let report = generator.build_report(&sample(), None, None).unwrap();
        let path = generator.write_report_to_file(&report, "sample").unwrap();
        assert!(path.ends_with("sample_report.json"));

        let text = std::fs::read_to_string(&path).unwrap();
        let parsed: SurveyReport = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.respondents, 12);
        std::fs::remove_dir_all(dir).ok();
    }
}
