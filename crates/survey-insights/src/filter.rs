//! Demographic and response filters.
//!
//! A [`SurveyFilter`] is a plain value passed to [`SurveyFilter::apply`];
//! nothing holds a "current filtered set". The default filter accepts every
//! respondent.
//!
//! Empty lists impose no constraint. A missing answer fails any list or
//! parenthood constraint and passes the range constraints.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::survey::{Field, Respondent};

/// Parenthood constraint on `children_2_7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChildrenFilter {
    #[default]
    All,
    /// Only respondents with children aged 2-7.
    Yes,
    /// Only respondents without.
    No,
}

/// Filter over the respondent set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurveyFilter {
    pub age_groups: Vec<i64>,
    pub genders: Vec<i64>,
    pub locations: Vec<i64>,
    pub incomes: Vec<i64>,
    /// Selecting 4 also matches any larger value.
    pub number_of_children: Vec<i64>,
    /// Inclusive bounds on the 1-5 NPS item.
    pub nps_range: (f64, f64),
    /// Inclusive bounds on the 0-100 nostalgia slider.
    pub nostalgia_range: (f64, f64),
    pub has_children_2_7: ChildrenFilter,
}

impl Default for SurveyFilter {
    fn default() -> Self {
        Self {
            age_groups: Vec::new(),
            genders: Vec::new(),
            locations: Vec::new(),
            incomes: Vec::new(),
            number_of_children: Vec::new(),
            nps_range: (1.0, 5.0),
            nostalgia_range: (0.0, 100.0),
            has_children_2_7: ChildrenFilter::All,
        }
    }
}

fn in_list(list: &[i64], value: Option<f64>) -> bool {
    list.is_empty() || value.is_some_and(|v| list.iter().any(|code| *code as f64 == v))
}

fn in_range((low, high): (f64, f64), value: Option<f64>) -> bool {
    value.is_none_or(|v| v >= low && v <= high)
}

impl SurveyFilter {
    /// True when the filter is equivalent to the default (accept all).
    pub fn is_unconstrained(&self) -> bool {
        *self == SurveyFilter::default()
    }

    /// Whether `record` passes every constraint.
    pub fn matches(&self, record: &Respondent) -> bool {
        in_list(&self.age_groups, record.get(Field::AgeGroup))
            && in_list(&self.genders, record.get(Field::Gender))
            && in_list(&self.locations, record.get(Field::Location))
            && in_list(&self.incomes, record.get(Field::HouseholdIncome))
            && in_range(self.nps_range, record.get(Field::Q19Nps))
            && in_range(self.nostalgia_range, record.get(Field::Q11Nostalgia))
            && self.matches_parenthood(record)
            && self.matches_children_count(record)
    }

    fn matches_parenthood(&self, record: &Respondent) -> bool {
        let value = record.get(Field::ChildrenTwoToSeven);
        match self.has_children_2_7 {
            ChildrenFilter::All => true,
            ChildrenFilter::Yes => value == Some(1.0),
            ChildrenFilter::No => value == Some(0.0),
        }
    }

    fn matches_children_count(&self, record: &Respondent) -> bool {
        if self.number_of_children.is_empty() {
            return true;
        }
        let Some(count) = record.get(Field::NumberOfChildren) else {
            return false;
        };
        if self.number_of_children.contains(&4) && count >= 4.0 {
            return true;
        }
        self.number_of_children.iter().any(|c| *c as f64 == count)
    }

    /// Respondents that pass the filter, cloned in input order.
    pub fn apply(&self, records: &[Respondent]) -> Vec<Respondent> {
        let kept: Vec<Respondent> = records
            .iter()
            .filter(|r| self.matches(r))
            .cloned()
            .collect();
        debug!("Filter kept {} of {} respondents", kept.len(), records.len());
        kept
    }
}
