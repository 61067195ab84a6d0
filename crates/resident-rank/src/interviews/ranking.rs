use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::domain::{round1, ApplicantRanking, EvaluationTable};

#[derive(Default)]
struct Tally {
    rows: usize,
    sum: f64,
    scored: usize,
}

/// Groups completed evaluations by applicant and ranks them by average total
/// score, highest first.
///
/// Averages are rounded to one decimal before sorting. Applicants with no
/// numeric score sort last. Equal averages keep applicant name order.
pub fn rank_applicants(table: &EvaluationTable) -> Vec<ApplicantRanking> {
    let mut tallies: BTreeMap<&str, Tally> = BTreeMap::new();
    for record in table.records() {
        let tally = tallies.entry(record.applicant.as_str()).or_default();
        tally.rows += 1;
        if let Some(score) = record.total_score {
            tally.sum += score;
            tally.scored += 1;
        }
    }

    let mut rows: Vec<(&str, Option<f64>, usize)> = tallies
        .into_iter()
        .map(|(applicant, tally)| {
            let average = (tally.scored > 0).then(|| round1(tally.sum / tally.scored as f64));
            (applicant, average, tally.rows)
        })
        .collect();

    rows.sort_by(|left, right| compare_averages(left.1, right.1));

    rows.into_iter()
        .enumerate()
        .map(|(index, (applicant, average_score, evaluations))| ApplicantRanking {
            rank: index + 1,
            applicant: applicant.to_string(),
            average_score,
            evaluations,
        })
        .collect()
}

fn compare_averages(left: Option<f64>, right: Option<f64>) -> Ordering {
    match (left, right) {
        (Some(left), Some(right)) => right.total_cmp(&left),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
