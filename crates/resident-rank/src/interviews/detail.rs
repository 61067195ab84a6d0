use super::domain::{ApplicantDetail, EvaluationTable, QuestionStat};

/// Per-question breakdown for one applicant, or `None` when the applicant has
/// no completed evaluations.
///
/// Only question columns with at least one numeric value for this applicant
/// are reported; free-text columns drop out on their own.
pub fn applicant_detail(table: &EvaluationTable, applicant: &str) -> Option<ApplicantDetail> {
    let records: Vec<_> = table.records_for(applicant).collect();
    if records.is_empty() {
        return None;
    }

    let questions = table
        .question_columns()
        .iter()
        .enumerate()
        .filter_map(|(index, column)| {
            let values: Vec<f64> = records
                .iter()
                .filter_map(|record| record.question_scores.get(index).copied().flatten())
                .collect();
            (!values.is_empty()).then(|| QuestionStat::from_values(column, &values))
        })
        .collect();

    Some(ApplicantDetail {
        applicant: applicant.to_string(),
        evaluations: records.len(),
        questions,
    })
}
