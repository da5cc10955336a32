use crate::core::{
    AnalysisResult,
    ResultSet,
    SentimentLabel,
};

/// Number of results per label, always covering all three labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LabelCounts {
    counts: [usize; 3],
}

impl LabelCounts {
    fn index(label: SentimentLabel) -> usize {
        match label {
            SentimentLabel::Positive => 0,
            SentimentLabel::Neutral => 1,
            SentimentLabel::Negative => 2,
        }
    }

    pub fn add(&mut self, label: SentimentLabel) {
        self.counts[Self::index(label)] += 1;
    }

    pub fn get(&self, label: SentimentLabel) -> usize {
        self.counts[Self::index(label)]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn max(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Positive, Neutral, Negative, in that order.
    pub fn iter(&self) -> impl Iterator<Item = (SentimentLabel, usize)> + '_ {
        SentimentLabel::ALL.iter().map(|label| (*label, self.get(*label)))
    }
}

fn count<'a>(results: impl IntoIterator<Item = &'a AnalysisResult>) -> LabelCounts {
    let mut counts = LabelCounts::default();
    for result in results {
        counts.add(result.sentiment);
    }
    counts
}

pub fn label_counts(results: &ResultSet) -> LabelCounts {
    count(results.iter())
}

/// Per-source label counts, sources in order of first appearance.
pub fn counts_by_source(results: &ResultSet) -> Vec<(String, LabelCounts)> {
    let groups = results.group_by_source();
    results
        .sources()
        .into_iter()
        .map(|source| {
            let counts = groups.get(source).map(|group| count(group.iter().copied()));
            (source.to_string(), counts.unwrap_or_default())
        })
        .collect()
}

impl ResultSet {
    pub fn label_counts(&self) -> LabelCounts {
        label_counts(self)
    }

    pub fn counts_by_source(&self) -> Vec<(String, LabelCounts)> {
        counts_by_source(self)
    }
}
