//! 问卷作答校验
//!
//! 按题目定义逐题检查答案：必答、选项归属、评分范围、文本长度。
//! 校验通过后返回按题目顺序排列、已规范化的答案。

use std::collections::{HashMap, HashSet};

use crate::models::surveys::entities::{AnswerValue, QuestionKind, SurveyQuestion};
use crate::models::surveys::requests::SurveyAnswer;

pub const MAX_TEXT_ANSWER_CHARS: usize = 2000;

/// 空文本或空多选视为未作答
fn is_blank(value: &AnswerValue) -> bool {
    match value {
        AnswerValue::Text(t) => t.trim().is_empty(),
        AnswerValue::Choices(c) => c.is_empty(),
        AnswerValue::Number(_) => false,
    }
}

fn check_one(question: &SurveyQuestion, value: AnswerValue) -> Result<AnswerValue, String> {
    let prompt = &question.prompt;
    match (question.kind, value) {
        (QuestionKind::SingleChoice, AnswerValue::Text(choice)) => {
            let choice = choice.trim().to_string();
            if !question.options.contains(&choice) {
                return Err(format!("'{prompt}': 选项 '{choice}' 不存在"));
            }
            Ok(AnswerValue::Text(choice))
        }
        (QuestionKind::MultiChoice, AnswerValue::Text(choice)) => {
            check_one(question, AnswerValue::Choices(vec![choice]))
        }
        (QuestionKind::MultiChoice, AnswerValue::Choices(choices)) => {
            let mut seen = HashSet::new();
            let mut picked = Vec::with_capacity(choices.len());
            for choice in choices {
                let choice = choice.trim().to_string();
                if !question.options.contains(&choice) {
                    return Err(format!("'{prompt}': 选项 '{choice}' 不存在"));
                }
                if seen.insert(choice.clone()) {
                    picked.push(choice);
                }
            }
            Ok(AnswerValue::Choices(picked))
        }
        (QuestionKind::Rating, AnswerValue::Number(n)) => {
            let scale = question.rating_scale();
            if !n.is_finite() || n.fract() != 0.0 || n < 1.0 || n > f64::from(scale) {
                return Err(format!("'{prompt}': 评分必须是 1 到 {scale} 之间的整数"));
            }
            Ok(AnswerValue::Number(n))
        }
        (QuestionKind::Text, AnswerValue::Text(text)) => {
            let text = text.trim().to_string();
            if text.chars().count() > MAX_TEXT_ANSWER_CHARS {
                return Err(format!(
                    "'{prompt}': 回答不能超过 {MAX_TEXT_ANSWER_CHARS} 个字符"
                ));
            }
            Ok(AnswerValue::Text(text))
        }
        (kind, _) => Err(format!("'{prompt}': 答案类型与题型 {kind} 不符")),
    }
}

/// 校验全部答案
pub fn validate_answers(
    questions: &[SurveyQuestion],
    answers: Vec<SurveyAnswer>,
) -> Result<Vec<(i64, AnswerValue)>, String> {
    let by_id: HashMap<i64, &SurveyQuestion> = questions.iter().map(|q| (q.id, q)).collect();

    let mut given: HashMap<i64, AnswerValue> = HashMap::new();
    for answer in answers {
        if !by_id.contains_key(&answer.question_id) {
            return Err(format!("题目 {} 不属于该问卷", answer.question_id));
        }
        if given.insert(answer.question_id, answer.value).is_some() {
            return Err(format!("题目 {} 重复作答", answer.question_id));
        }
    }

    let mut ordered: Vec<&SurveyQuestion> = questions.iter().collect();
    ordered.sort_by_key(|q| (q.position, q.id));

    let mut result = Vec::new();
    for question in ordered {
        match given.remove(&question.id) {
            Some(value) if !is_blank(&value) => {
                result.push((question.id, check_one(question, value)?));
            }
            _ if question.required => {
                return Err(format!("'{}' 为必答题", question.prompt));
            }
            _ => {}
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: i64, kind: QuestionKind, options: &[&str], required: bool) -> SurveyQuestion {
        SurveyQuestion {
            id,
            survey_id: 1,
            position: id as i32,
            kind,
            prompt: format!("Q{id}"),
            options: options.iter().map(|s| s.to_string()).collect(),
            scale: None,
            required,
        }
    }

    fn answer(question_id: i64, value: AnswerValue) -> SurveyAnswer {
        SurveyAnswer { question_id, value }
    }

    fn questions() -> Vec<SurveyQuestion> {
        vec![
            question(1, QuestionKind::SingleChoice, &["Yes", "No"], true),
            question(2, QuestionKind::MultiChoice, &["Labs", "Lectures", "Projects"], false),
            question(3, QuestionKind::Rating, &[], true),
            question(4, QuestionKind::Text, &[], false),
        ]
    }

    #[test]
    fn accepts_a_complete_response_in_question_order() {
        let answers = vec![
            answer(3, AnswerValue::Number(4.0)),
            answer(1, AnswerValue::Text("Yes".into())),
            answer(
                2,
                AnswerValue::Choices(vec!["Labs".into(), "Labs".into(), "Projects".into()]),
            ),
            answer(4, AnswerValue::Text("  More examples please ".into())),
        ];
        let result = validate_answers(&questions(), answers).unwrap();
        assert_eq!(result.len(), 4);
        assert_eq!(result[0], (1, AnswerValue::Text("Yes".into())));
        assert_eq!(
            result[1],
            (
                2,
                AnswerValue::Choices(vec!["Labs".into(), "Projects".into()])
            )
        );
        assert_eq!(result[3], (4, AnswerValue::Text("More examples please".into())));
    }

    #[test]
    fn optional_blank_answers_are_dropped() {
        let answers = vec![
            answer(1, AnswerValue::Text("No".into())),
            answer(3, AnswerValue::Number(1.0)),
            answer(4, AnswerValue::Text("   ".into())),
        ];
        let result = validate_answers(&questions(), answers).unwrap();
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn missing_required_answer_is_rejected() {
        let answers = vec![answer(1, AnswerValue::Text("Yes".into()))];
        let err = validate_answers(&questions(), answers).unwrap_err();
        assert!(err.contains("Q3"));
    }

    #[test]
    fn rating_must_be_whole_number_within_scale() {
        for bad in [0.0, 6.0, 2.5, f64::NAN] {
            let answers = vec![
                answer(1, AnswerValue::Text("Yes".into())),
                answer(3, AnswerValue::Number(bad)),
            ];
            assert!(validate_answers(&questions(), answers).is_err());
        }
    }

    #[test]
    fn unknown_option_or_question_is_rejected() {
        let answers = vec![
            answer(1, AnswerValue::Text("Maybe".into())),
            answer(3, AnswerValue::Number(3.0)),
        ];
        assert!(validate_answers(&questions(), answers).is_err());

        let answers = vec![answer(99, AnswerValue::Text("x".into()))];
        assert!(validate_answers(&questions(), answers).is_err());
    }

    #[test]
    fn wrong_value_shape_is_rejected() {
        let answers = vec![
            answer(1, AnswerValue::Text("Yes".into())),
            answer(3, AnswerValue::Text("five".into())),
        ];
        let err = validate_answers(&questions(), answers).unwrap_err();
        assert!(err.contains("rating"));
    }

    #[test]
    fn overlong_text_is_rejected() {
        let answers = vec![
            answer(1, AnswerValue::Text("Yes".into())),
            answer(3, AnswerValue::Number(3.0)),
            answer(4, AnswerValue::Text("a".repeat(MAX_TEXT_ANSWER_CHARS + 1))),
        ];
        assert!(validate_answers(&questions(), answers).is_err());
    }
}
