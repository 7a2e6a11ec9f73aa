use crate::metric::Metric;
use crate::mode::{is_match, EvaluationMode};
use kpm_model::{BestMatch, Labels, LabelledDataset, PairId, Stance};
use std::collections::{BTreeMap, HashMap};

/// Share of each topic / stance group kept, ranked by score
const KEEP_SHARE: f64 = 0.5;
/// Score given to arguments without predictions once the group is truncated
const DUMMY_SCORE: f64 = 0.99;

/// Mean average precision over topic / stance groups, as ranked by the best
/// key point of every argument.
///
/// Only the top half of each group is scored, so a matcher may abstain on
/// arguments it is unsure about.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanAveragePrecision;

#[derive(Debug, Clone, Copy)]
struct RankedArgument {
    score: f64,
    relevant: bool,
    dummy: bool,
}

impl Metric for MeanAveragePrecision {
    fn slug(&self) -> &'static str {
        "map"
    }

    fn name(&self) -> &'static str {
        "Mean average precision"
    }

    fn evaluate(&self, predicted: &Labels, data: &LabelledDataset, mode: EvaluationMode) -> f64 {
        let best_matches = predicted.best_matches();
        let best: HashMap<&str, &BestMatch> = best_matches
            .iter()
            .map(|best| (best.argument_id.as_str(), best))
            .collect();

        let mut groups: BTreeMap<(&str, Stance), Vec<RankedArgument>> = BTreeMap::new();
        for argument in &data.arguments {
            let ranked = match best.get(argument.id.as_str()) {
                Some(best) => {
                    let pair = PairId::new(argument.id.as_str(), best.key_point_id.as_str());
                    RankedArgument {
                        score: best.score,
                        relevant: data
                            .labels
                            .get(&pair)
                            .map_or(mode.unannotated(), is_match),
                        dummy: false,
                    }
                }
                None => RankedArgument {
                    score: 0.0,
                    relevant: false,
                    dummy: true,
                },
            };
            groups
                .entry((argument.topic.as_str(), argument.stance))
                .or_default()
                .push(ranked);
        }

        let unknown = best
            .keys()
            .filter(|id| data.argument(id).is_none())
            .count();
        if unknown > 0 {
            log::warn!("Ignoring predictions for {unknown} unknown arguments");
        }

        let precisions: Vec<f64> = groups
            .into_iter()
            .map(|((topic, stance), mut ranked)| {
                ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
                let keep = (ranked.len() as f64 * KEEP_SHARE).floor() as usize;
                ranked.truncate(keep);
                let scored: Vec<(f64, bool)> = ranked
                    .iter()
                    .map(|r| (if r.dummy { DUMMY_SCORE } else { r.score }, r.relevant))
                    .collect();
                let precision = average_precision(scored);
                log::debug!("AP {precision:.4} for {stance} arguments on '{topic}'");
                precision
            })
            .collect();
        mean_f64(&precisions)
    }
}

/// Average precision of a ranking: the sum over distinct score thresholds of
/// precision weighted by the recall gained at that threshold.
///
/// Returns `0` when nothing is relevant.
pub fn average_precision(mut scored: Vec<(f64, bool)>) -> f64 {
    let relevant = scored.iter().filter(|(_, r)| *r).count();
    if relevant == 0 {
        return 0.0;
    }
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));

    let mut true_positives = 0usize;
    let mut seen = 0usize;
    let mut previous_recall = 0.0;
    let mut precision_sum = 0.0;
    let mut i = 0;
    while i < scored.len() {
        let threshold = scored[i].0;
        while i < scored.len() && scored[i].0 == threshold {
            if scored[i].1 {
                true_positives += 1;
            }
            seen += 1;
            i += 1;
        }
        let precision = true_positives as f64 / seen as f64;
        let recall = true_positives as f64 / relevant as f64;
        precision_sum += (recall - previous_recall) * precision;
        previous_recall = recall;
    }
    precision_sum
}

fn mean_f64(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
