//! Qualitative bands for statistics shown to dashboard readers.

/// Effect-size band for Cramér's V, lowercase for use inside sentences.
pub fn cramers_v_band(v: f64) -> &'static str {
    if v < 0.10 {
        "negligible"
    } else if v < 0.20 {
        "weak"
    } else if v < 0.40 {
        "moderate"
    } else {
        "strong"
    }
}

/// "Weak association", "Strong association", ...
pub fn interpret_cramers_v(v: f64) -> String {
    format!("{} association", capitalize(cramers_v_band(v)))
}

/// Strength band for |rho|, lowercase.
pub fn spearman_band(rho: f64) -> &'static str {
    let abs = rho.abs();
    if abs < 0.20 {
        "negligible"
    } else if abs < 0.40 {
        "weak"
    } else if abs < 0.60 {
        "moderate"
    } else if abs < 0.80 {
        "strong"
    } else {
        "very strong"
    }
}

/// Sign of a correlation; zero counts as positive.
pub fn direction(rho: f64) -> &'static str {
    if rho >= 0.0 { "positive" } else { "negative" }
}

/// "Moderate positive correlation", "Very strong negative correlation", ...
pub fn interpret_spearman(rho: f64) -> String {
    format!(
        "{} {} correlation",
        capitalize(spearman_band(rho)),
        direction(rho)
    )
}

/// Agreement band for a 1-5 Likert mean.
pub fn interpret_mean(mean: f64) -> &'static str {
    if mean >= 4.5 {
        "Strongly Agree (highly favorable)"
    } else if mean >= 3.5 {
        "Agree (favorable)"
    } else if mean >= 2.5 {
        "Neutral (mixed)"
    } else if mean >= 1.5 {
        "Disagree (unfavorable)"
    } else {
        "Strongly Disagree (highly unfavorable)"
    }
}

pub fn interpret_alpha(alpha: f64) -> &'static str {
    if alpha >= 0.80 {
        "Good internal consistency"
    } else if alpha >= 0.70 {
        "Acceptable internal consistency"
    } else {
        "Consider with caution"
    }
}

pub fn interpret_kendall_w(w: f64) -> &'static str {
    if w < 0.1 {
        "Very weak agreement"
    } else if w < 0.3 {
        "Weak agreement"
    } else if w < 0.5 {
        "Moderate agreement"
    } else if w < 0.7 {
        "Strong agreement"
    } else {
        "Very strong agreement"
    }
}

/// Consensus on a ranked item from the spread of its ranks.
pub fn consensus_level(sd: f64) -> &'static str {
    if sd < 1.0 {
        "High consensus"
    } else if sd < 1.5 {
        "Medium consensus"
    } else {
        "Low consensus"
    }
}

/// Ratio of top-2 to bottom-2 rank shares.
///
/// A zero bottom share gives 999 (or 1 when both are zero).
pub fn concentration_index(top: f64, bottom: f64) -> f64 {
    if bottom == 0.0 {
        if top > 0.0 { 999.0 } else { 1.0 }
    } else {
        top / bottom
    }
}

pub fn interpret_nps(score: f64) -> &'static str {
    if score >= 70.0 {
        "Excellent"
    } else if score >= 50.0 {
        "Great"
    } else if score >= 30.0 {
        "Good"
    } else if score >= 0.0 {
        "Needs Improvement"
    } else {
        "Critical"
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
