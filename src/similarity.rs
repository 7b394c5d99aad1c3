//! String similarity measures.
//!
//! Scalar functions ([`levenshtein`], [`jaccard`]) plus Series-level
//! appliers that zip two String columns elementwise, and DataFrame-level
//! wrappers that append the result as a named column. Nulls propagate: a
//! null on either side yields a null result for that row.

use std::collections::HashSet;

use polars::prelude::*;

/// Character-level edit distance between `a` and `b`.
///
/// # Examples
///
/// ```
/// use polars_extensions::levenshtein;
///
/// assert_eq!(levenshtein("kitten", "sitting"), 3);
/// assert_eq!(levenshtein("", "abc"), 3);
/// ```
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Two-row DP over the classic (m+1) x (n+1) table.
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr: Vec<usize> = vec![0; b.len() + 1];
    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j]
            } else {
                1 + prev[j + 1].min(curr[j]).min(prev[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

fn ngrams(s: &str, n: usize) -> HashSet<String> {
    let chars: Vec<char> = s.chars().collect();
    if n == 0 || chars.len() < n {
        return HashSet::new();
    }
    chars.windows(n).map(|w| w.iter().collect()).collect()
}

/// Jaccard similarity over character n-gram sets.
///
/// A string shorter than `ngram_size` contributes an empty set, so the
/// similarity is 0.0 even for identical inputs.
///
/// # Examples
///
/// ```
/// use polars_extensions::jaccard;
///
/// assert_eq!(jaccard("night", "night", 2), 1.0);
/// assert_eq!(jaccard("night", "nacht", 2), 1.0 / 7.0);
/// assert_eq!(jaccard("a", "a", 2), 0.0);
/// ```
pub fn jaccard(a: &str, b: &str, ngram_size: usize) -> f64 {
    let a_grams = ngrams(a, ngram_size);
    let b_grams = ngrams(b, ngram_size);
    let intersection = a_grams.intersection(&b_grams).count();
    let union = a_grams.union(&b_grams).count();
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

fn ensure_same_length(what: &str, a: &Series, b: &Series) -> PolarsResult<()> {
    if a.len() != b.len() {
        return Err(PolarsError::ShapeMismatch(
            format!(
                "{what} inputs differ in length: {} vs {}",
                a.len(),
                b.len()
            )
            .into(),
        ));
    }
    Ok(())
}

/// Elementwise [`levenshtein`] over two String series.
pub fn levenshtein_series(a: &Series, b: &Series) -> PolarsResult<Series> {
    ensure_same_length("levenshtein", a, b)?;
    let a = a.str()?;
    let b = b.str()?;
    let out: UInt32Chunked = a
        .into_iter()
        .zip(b)
        .map(|(left, right)| match (left, right) {
            (Some(left), Some(right)) => Some(levenshtein(left, right) as u32),
            _ => None,
        })
        .collect();
    Ok(out.with_name(PlSmallStr::from_static("levenshtein")).into_series())
}

/// Elementwise [`jaccard`] over two String series.
pub fn jaccard_series(a: &Series, b: &Series, ngram_size: usize) -> PolarsResult<Series> {
    ensure_same_length("jaccard", a, b)?;
    let a = a.str()?;
    let b = b.str()?;
    let out: Float64Chunked = a
        .into_iter()
        .zip(b)
        .map(|(left, right)| match (left, right) {
            (Some(left), Some(right)) => Some(jaccard(left, right, ngram_size)),
            _ => None,
        })
        .collect();
    Ok(out.with_name(PlSmallStr::from_static("jaccard")).into_series())
}

/// Append the elementwise edit distance of two String columns as `output`.
pub fn with_levenshtein(
    df: &DataFrame,
    left: &str,
    right: &str,
    output: &str,
) -> PolarsResult<DataFrame> {
    let distances = levenshtein_series(
        df.column(left)?.as_materialized_series(),
        df.column(right)?.as_materialized_series(),
    )?;
    let mut out = df.clone();
    out.with_column(distances.with_name(output.into()).into_column())?;
    Ok(out)
}

/// Append the elementwise n-gram Jaccard similarity of two String columns as
/// `output`.
pub fn with_jaccard(
    df: &DataFrame,
    left: &str,
    right: &str,
    ngram_size: usize,
    output: &str,
) -> PolarsResult<DataFrame> {
    let similarity = jaccard_series(
        df.column(left)?.as_materialized_series(),
        df.column(right)?.as_materialized_series(),
        ngram_size,
    )?;
    let mut out = df.clone();
    out.with_column(similarity.with_name(output.into()).into_column())?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levenshtein_classic_cases() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("abc", "abc"), 0);
        assert_eq!(levenshtein("", ""), 0);
        assert_eq!(levenshtein("abc", ""), 3);
    }

    #[test]
    fn levenshtein_counts_characters_not_bytes() {
        assert_eq!(levenshtein("café", "cafe"), 1);
    }

    #[test]
    fn jaccard_bigram_overlap() {
        // night: {ni, ig, gh, ht}; nacht: {na, ac, ch, ht} -> 1 shared of 7.
        assert_eq!(jaccard("night", "nacht", 2), 1.0 / 7.0);
        assert_eq!(jaccard("night", "night", 2), 1.0);
    }

    #[test]
    fn jaccard_short_strings_score_zero() {
        assert_eq!(jaccard("a", "a", 2), 0.0);
        assert_eq!(jaccard("", "", 2), 0.0);
        assert_eq!(jaccard("ab", "ab", 0), 0.0);
    }

    #[test]
    fn series_appliers_propagate_nulls() {
        let a = Series::new("a".into(), &[Some("kitten"), None, Some("x")]);
        let b = Series::new("b".into(), &[Some("sitting"), Some("y"), None]);

        let distances = levenshtein_series(&a, &b).unwrap();
        let distances = distances.u32().unwrap();
        assert_eq!(distances.get(0), Some(3));
        assert_eq!(distances.get(1), None);
        assert_eq!(distances.get(2), None);
    }

    #[test]
    fn series_appliers_reject_mismatched_lengths() {
        let a = Series::new("a".into(), &["x", "y"]);
        let b = Series::new("b".into(), &["x"]);
        let err = levenshtein_series(&a, &b).unwrap_err();
        assert!(err.to_string().contains("differ in length"));
    }

    #[test]
    fn frame_wrappers_append_named_columns() {
        let df = df!(
            "left" => ["night", "kitten"],
            "right" => ["nacht", "sitting"],
        )
        .unwrap();

        let df = with_levenshtein(&df, "left", "right", "dist").unwrap();
        let df = with_jaccard(&df, "left", "right", 2, "sim").unwrap();

        let dist = df.column("dist").unwrap().as_materialized_series().clone();
        assert_eq!(dist.u32().unwrap().get(1), Some(3));
        let sim = df.column("sim").unwrap().as_materialized_series().clone();
        assert_eq!(sim.f64().unwrap().get(0), Some(1.0 / 7.0));
    }
}
