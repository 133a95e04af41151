use std::collections::{BTreeMap, HashMap};

use crate::models::surveys::entities::{
    AnswerValue, AssignmentStatus, QuestionKind, SurveyAssignment, SurveyQuestion,
    SurveyResponseRecord,
};
use crate::models::surveys::responses::{OptionCount, QuestionResult};

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 邀请数（不含已撤销）、已作答数与作答率
pub fn response_rate(assignments: &[SurveyAssignment]) -> (u64, u64, f64) {
    let invited = assignments
        .iter()
        .filter(|a| a.status != AssignmentStatus::Revoked)
        .count() as u64;
    let responded = assignments
        .iter()
        .filter(|a| a.status == AssignmentStatus::Completed)
        .count() as u64;
    let rate = if invited == 0 {
        0.0
    } else {
        round2(responded as f64 * 100.0 / invited as f64)
    };
    (invited, responded, rate)
}

fn question_result(question: &SurveyQuestion, answers: &[&AnswerValue]) -> QuestionResult {
    let mut result = QuestionResult {
        question_id: question.id,
        prompt: question.prompt.clone(),
        kind: question.kind,
        answered: answers.len() as u64,
        option_counts: Vec::new(),
        average: None,
        text_answers: Vec::new(),
    };

    match question.kind {
        QuestionKind::SingleChoice | QuestionKind::MultiChoice => {
            let mut counts: HashMap<&str, u64> = HashMap::new();
            for answer in answers {
                match answer {
                    AnswerValue::Text(choice) => *counts.entry(choice.as_str()).or_default() += 1,
                    AnswerValue::Choices(choices) => {
                        for choice in choices {
                            *counts.entry(choice.as_str()).or_default() += 1;
                        }
                    }
                    AnswerValue::Number(_) => {}
                }
            }
            result.option_counts = question
                .options
                .iter()
                .map(|option| OptionCount {
                    option: option.clone(),
                    count: counts.get(option.as_str()).copied().unwrap_or(0),
                })
                .collect();
        }
        QuestionKind::Rating => {
            let scores: Vec<f64> = answers
                .iter()
                .filter_map(|a| match a {
                    AnswerValue::Number(n) => Some(*n),
                    _ => None,
                })
                .collect();
            let mut counts: BTreeMap<i64, u64> =
                (1..=i64::from(question.rating_scale())).map(|s| (s, 0)).collect();
            for score in &scores {
                *counts.entry(*score as i64).or_default() += 1;
            }
            result.option_counts = counts
                .into_iter()
                .map(|(score, count)| OptionCount {
                    option: score.to_string(),
                    count,
                })
                .collect();
            if !scores.is_empty() {
                result.average = Some(round2(scores.iter().sum::<f64>() / scores.len() as f64));
            }
        }
        QuestionKind::Text => {
            result.text_answers = answers.iter().map(|a| a.display()).collect();
        }
    }
    result
}

/// 按题目顺序统计每题的作答
pub fn summarize_questions(
    questions: &[SurveyQuestion],
    responses: &[SurveyResponseRecord],
) -> Vec<QuestionResult> {
    let mut by_question: HashMap<i64, Vec<&AnswerValue>> = HashMap::new();
    for response in responses {
        by_question
            .entry(response.question_id)
            .or_default()
            .push(&response.answer);
    }

    let mut ordered: Vec<&SurveyQuestion> = questions.iter().collect();
    ordered.sort_by_key(|q| (q.position, q.id));
    ordered
        .into_iter()
        .map(|q| {
            let answers = by_question.get(&q.id).map(Vec::as_slice).unwrap_or(&[]);
            question_result(q, answers)
        })
        .collect()
}

/// 导出表头；匿名问卷不含受邀人列
pub fn export_header(questions: &[SurveyQuestion], anonymous: bool) -> Vec<String> {
    let mut header = vec!["respondent".to_string()];
    if !anonymous {
        header.push("invitee".to_string());
    }
    header.push("submitted_at".to_string());

    let mut ordered: Vec<&SurveyQuestion> = questions.iter().collect();
    ordered.sort_by_key(|q| (q.position, q.id));
    header.extend(ordered.iter().map(|q| format!("Q{} {}", q.position, q.prompt)));
    header
}

/// 每份已完成的作答一行，未作答的题留空
pub fn export_rows(
    questions: &[SurveyQuestion],
    assignments: &[SurveyAssignment],
    responses: &[SurveyResponseRecord],
    anonymous: bool,
) -> Vec<Vec<String>> {
    let mut ordered: Vec<&SurveyQuestion> = questions.iter().collect();
    ordered.sort_by_key(|q| (q.position, q.id));

    let mut answers: HashMap<(i64, i64), &AnswerValue> = HashMap::new();
    for response in responses {
        answers.insert((response.assignment_id, response.question_id), &response.answer);
    }

    let mut completed: Vec<&SurveyAssignment> = assignments
        .iter()
        .filter(|a| a.status == AssignmentStatus::Completed)
        .collect();
    completed.sort_by_key(|a| a.id);

    completed
        .into_iter()
        .enumerate()
        .map(|(index, assignment)| {
            let mut row = vec![(index + 1).to_string()];
            if !anonymous {
                row.push(assignment.invitee_email.clone().unwrap_or_default());
            }
            row.push(
                assignment
                    .completed_at
                    .map(|at| at.to_rfc3339())
                    .unwrap_or_default(),
            );
            row.extend(ordered.iter().map(|q| {
                answers
                    .get(&(assignment.id, q.id))
                    .map(|a| a.display())
                    .unwrap_or_default()
            }));
            row
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: i64, kind: QuestionKind, options: &[&str]) -> SurveyQuestion {
        SurveyQuestion {
            id,
            survey_id: 1,
            position: id as i32,
            kind,
            prompt: format!("Question {id}"),
            options: options.iter().map(|s| s.to_string()).collect(),
            scale: None,
            required: false,
        }
    }

    fn assignment(id: i64, status: AssignmentStatus, email: &str) -> SurveyAssignment {
        SurveyAssignment {
            id,
            survey_id: 1,
            token: format!("token{id}"),
            invitee_email: Some(email.to_string()),
            invitee_user_id: None,
            status,
            completed_at: (status == AssignmentStatus::Completed).then(chrono::Utc::now),
            created_at: chrono::Utc::now(),
        }
    }

    fn response(assignment_id: i64, question_id: i64, answer: AnswerValue) -> SurveyResponseRecord {
        SurveyResponseRecord {
            id: assignment_id * 10 + question_id,
            survey_id: 1,
            assignment_id,
            question_id,
            answer,
            created_at: chrono::Utc::now(),
        }
    }

    fn fixture() -> (
        Vec<SurveyQuestion>,
        Vec<SurveyAssignment>,
        Vec<SurveyResponseRecord>,
    ) {
        let questions = vec![
            question(1, QuestionKind::SingleChoice, &["Yes", "No"]),
            question(2, QuestionKind::Rating, &[]),
            question(3, QuestionKind::Text, &[]),
        ];
        let assignments = vec![
            assignment(1, AssignmentStatus::Completed, "a@example.com"),
            assignment(2, AssignmentStatus::Completed, "b@example.com"),
            assignment(3, AssignmentStatus::Pending, "c@example.com"),
            assignment(4, AssignmentStatus::Revoked, "d@example.com"),
        ];
        let responses = vec![
            response(1, 1, AnswerValue::Text("Yes".into())),
            response(1, 2, AnswerValue::Number(4.0)),
            response(1, 3, AnswerValue::Text("Great labs".into())),
            response(2, 1, AnswerValue::Text("Yes".into())),
            response(2, 2, AnswerValue::Number(5.0)),
        ];
        (questions, assignments, responses)
    }

    #[test]
    fn response_rate_ignores_revoked_invitations() {
        let (_, assignments, _) = fixture();
        let (invited, responded, rate) = response_rate(&assignments);
        assert_eq!((invited, responded), (3, 2));
        assert_eq!(rate, 66.67);
        assert_eq!(response_rate(&[]), (0, 0, 0.0));
    }

    #[test]
    fn questions_are_summarized_by_kind() {
        let (questions, _, responses) = fixture();
        let results = summarize_questions(&questions, &responses);

        assert_eq!(results[0].answered, 2);
        assert_eq!(
            results[0].option_counts,
            vec![
                OptionCount { option: "Yes".into(), count: 2 },
                OptionCount { option: "No".into(), count: 0 },
            ]
        );
        assert_eq!(results[1].average, Some(4.5));
        assert_eq!(results[1].option_counts.len(), 5);
        assert_eq!(results[2].text_answers, vec!["Great labs".to_string()]);
    }

    #[test]
    fn anonymous_export_omits_invitee_column() {
        let (questions, assignments, responses) = fixture();

        let header = export_header(&questions, true);
        assert_eq!(header[0], "respondent");
        assert_eq!(header[1], "submitted_at");
        let rows = export_rows(&questions, &assignments, &responses, true);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].len(), header.len());
        assert!(!rows.iter().flatten().any(|cell| cell.contains("@example.com")));
        assert_eq!(rows[1][4], "");

        let header = export_header(&questions, false);
        assert_eq!(header[1], "invitee");
        let rows = export_rows(&questions, &assignments, &responses, false);
        assert_eq!(rows[0][1], "a@example.com");
        assert_eq!(rows[0][5], "Great labs");
    }
}
