//! Human-readable labels for coded answers.

use crate::survey::Field;
use crate::utils::format_code;

const AGE_GROUP: &[(i64, &str)] = &[
    (1, "18-24"),
    (2, "25-29"),
    (3, "30-34"),
    (4, "35-39"),
    (5, "40-44"),
    (6, "45+"),
];

const GENDER: &[(i64, &str)] = &[
    (1, "Male"),
    (2, "Female"),
    (3, "Non-binary"),
    (4, "Prefer not to say"),
];

const LOCATION: &[(i64, &str)] = &[(1, "Urban"), (2, "Suburban"), (3, "Rural")];

const HOUSEHOLD_INCOME: &[(i64, &str)] = &[
    (1, "<$50K"),
    (2, "$50-99K"),
    (3, "$100-149K"),
    (4, "$150K+"),
    (5, "Prefer not to answer"),
];

const NUMBER_OF_CHILDREN: &[(i64, &str)] = &[
    (1, "1 child"),
    (2, "2 children"),
    (3, "3 children"),
    (4, "4 or more children"),
];

const BRAND_ESSENCE: &[(i64, &str)] = &[
    (1, "Quality & Durability"),
    (2, "Safety & Trust"),
    (3, "Unlocking Family Memories"),
    (4, "Innovation & Developmental Growth"),
    (5, "Active & Imaginative Play"),
];

const FUTURE_DIRECTION: &[(i64, &str)] = &[
    (1, "Re-introducing vintage"),
    (2, "Tech-enhanced experiences"),
    (3, "Pop-culture partnership"),
    (4, "Family play time advertising"),
];

const PREFERENCE_VS_BRANDS: &[(i64, &str)] = &[(1, "Much less"), (2, "Neutral"), (3, "Much more")];

fn table_for(field: Field) -> Option<&'static [(i64, &'static str)]> {
    match field {
        Field::AgeGroup => Some(AGE_GROUP),
        Field::Gender => Some(GENDER),
        Field::Location => Some(LOCATION),
        Field::HouseholdIncome => Some(HOUSEHOLD_INCOME),
        Field::NumberOfChildren => Some(NUMBER_OF_CHILDREN),
        Field::Q12Represents => Some(BRAND_ESSENCE),
        Field::Q17FutureDirection => Some(FUTURE_DIRECTION),
        Field::Q18PreferenceVsBrands => Some(PREFERENCE_VS_BRANDS),
        _ => None,
    }
}

/// Label for a coded answer, falling back to the code itself.
pub fn label_for_code(field: Field, value: f64) -> String {
    table_for(field)
        .filter(|_| value.fract() == 0.0)
        .and_then(|table| {
            table
                .iter()
                .find(|(code, _)| *code as f64 == value)
                .map(|(_, label)| (*label).to_string())
        })
        .unwrap_or_else(|| format_code(value))
}

/// Codes with a fixed label for `field`, in code order.
pub fn coded_values(field: Field) -> Vec<(f64, &'static str)> {
    table_for(field)
        .map(|table| table.iter().map(|(c, l)| (*c as f64, *l)).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_labels() {
        assert_eq!(label_for_code(Field::AgeGroup, 6.0), "45+");
        assert_eq!(label_for_code(Field::Gender, 2.0), "Female");
        assert_eq!(label_for_code(Field::HouseholdIncome, 1.0), "<$50K");
        assert_eq!(label_for_code(Field::NumberOfChildren, 4.0), "4 or more children");
        assert_eq!(label_for_code(Field::Q18PreferenceVsBrands, 3.0), "Much more");
    }

    #[test]
    fn test_fallback_to_code() {
        assert_eq!(label_for_code(Field::AgeGroup, 9.0), "9");
        assert_eq!(label_for_code(Field::Q19Nps, 4.0), "4");
        assert_eq!(label_for_code(Field::Gender, 1.5), "1.5");
    }

    #[test]
    fn test_coded_values() {
        assert_eq!(coded_values(Field::Location).len(), 3);
        assert!(coded_values(Field::Q19Nps).is_empty());
    }
}
