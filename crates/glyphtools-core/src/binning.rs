//! Grouping glyphs by metric similarity
//!
//! Give it widths of 100, 102, 105, 210 and 220 and ask for two bins: you get
//! three narrow glyphs and two wide ones, not an even split. The clustering
//! is the exact [`ckmeans`](crate::ckmeans) dynamic program, run over the
//! distinct metric values weighted by how many glyphs share each one. Equal
//! values therefore always land in the same bin, and the result depends only
//! on the multiset of values, never on the order glyphs were listed in.

use crate::{
    ckmeans::ckmeans,
    error::{GlyphtoolsError, Result},
    traits::FontSource,
    types::{Bin, Metric, MetricSample},
};

/// Cluster samples into at most `bincount` bins, ordered by ascending value.
///
/// When there are fewer distinct values than bins requested, each distinct
/// value gets a bin of its own. Fails on an empty sample list, a zero bin
/// count, or a value that is not a finite number.
pub fn bin_by_metric(samples: &[MetricSample], bincount: usize) -> Result<Vec<Bin>> {
    if samples.is_empty() {
        return Err(GlyphtoolsError::InvalidBinRequest(
            "no glyphs to bin".into(),
        ));
    }
    if bincount == 0 {
        return Err(GlyphtoolsError::InvalidBinRequest(
            "bin count must be at least 1".into(),
        ));
    }
    if let Some(bad) = samples.iter().find(|s| !s.value.is_finite()) {
        return Err(GlyphtoolsError::InvalidBinRequest(format!(
            "glyph '{}' has non-finite metric {}",
            bad.glyph, bad.value
        )));
    }

    let mut sorted: Vec<f64> = samples.iter().map(|s| s.value).collect();
    sorted.sort_by(f64::total_cmp);

    let mut values: Vec<f64> = Vec::new();
    let mut weights: Vec<f64> = Vec::new();
    for v in sorted {
        match (values.last(), weights.last_mut()) {
            (Some(&last), Some(weight)) if last == v => *weight += 1.0,
            _ => {
                values.push(v);
                weights.push(1.0);
            }
        }
    }

    let k = bincount.min(values.len());
    if k < bincount {
        log::debug!(
            "only {} distinct values; binning into {k} instead of {bincount}",
            values.len()
        );
    }

    let clusters = ckmeans(&values, &weights, k)?;
    let bins = clusters
        .into_iter()
        .map(|range| {
            let lo = values[range.start];
            let hi = values[range.end - 1];
            let members: Vec<&MetricSample> = samples
                .iter()
                .filter(|s| s.value >= lo && s.value <= hi)
                .collect();
            let mean = members.iter().map(|s| s.value).sum::<f64>() / members.len() as f64;
            Bin {
                glyphs: members.iter().map(|s| s.glyph.clone()).collect(),
                mean: mean.trunc() as i32,
            }
        })
        .collect();
    Ok(bins)
}

/// Read `metric` for each glyph from a font source and bin the results.
pub fn bin_glyphs_by_metric<S, G>(
    source: &S,
    glyphs: &[G],
    metric: Metric,
    bincount: usize,
) -> Result<Vec<Bin>>
where
    S: FontSource + ?Sized,
    G: AsRef<str>,
{
    let samples = glyphs
        .iter()
        .map(|g| {
            let name = g.as_ref();
            source
                .metrics(name)
                .map(|m| MetricSample::new(name, m.get(metric)))
        })
        .collect::<Result<Vec<_>>>()?;
    log::debug!(
        "binning {} glyphs by {metric} into {bincount} bins",
        samples.len()
    );
    bin_by_metric(&samples, bincount)
}
