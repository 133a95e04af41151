//! 达成度与覆盖度计算
//!
//! 输入为方案的成果、映射以及每个 (学生, CLO) 的最新结果，全部为纯计算。

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::models::attainment::entities::{
    CoverageSummary, LatestCloResult, OutcomeAttainment, OutcomeCoverage, StudentOutcomeScore,
};
use crate::models::frameworks::entities::{Outcome, OutcomeLink};
use crate::models::observations::entities::CloResultStatus;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn rate(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        round2(100.0 * part as f64 / whole as f64)
    }
}

/// 加权平均，权重为映射强度；没有任何数据时为 None
fn weighted_mean(terms: impl IntoIterator<Item = (i32, f64)>) -> Option<f64> {
    let (sum, weight) = terms
        .into_iter()
        .fold((0.0, 0.0), |(sum, weight), (level, value)| {
            (sum + level as f64 * value, weight + level as f64)
        });
    (weight > 0.0).then(|| sum / weight)
}

/// 一个方案的成果与映射
#[derive(Debug, Clone, Default)]
pub struct OutcomeGraph {
    pub plos: Vec<Outcome>,
    pub pis: Vec<Outcome>,
    pub clos: Vec<Outcome>,
    pub plo_pi_links: Vec<OutcomeLink>,
    pub plo_clo_links: Vec<OutcomeLink>,
    pub pi_clo_links: Vec<OutcomeLink>,
}

/// 单个学生在三个层级上的得分（百分比，未评价的成果缺省）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentScores {
    pub clos: HashMap<i64, (f64, bool)>,
    pub pis: HashMap<i64, f64>,
    pub plos: HashMap<i64, f64>,
}

impl OutcomeGraph {
    /// 由学生的 CLO 结果推出 PI 与 PLO 得分
    pub fn student_scores(&self, results: &[&LatestCloResult]) -> StudentScores {
        let clos: HashMap<i64, (f64, bool)> = results
            .iter()
            .map(|r| {
                (
                    r.clo_id,
                    (r.score_percent, r.status == CloResultStatus::Achieved),
                )
            })
            .collect();

        let pis: HashMap<i64, f64> = self
            .pis
            .iter()
            .filter_map(|pi| {
                let terms = self
                    .pi_clo_links
                    .iter()
                    .filter(|l| l.source_id == pi.id)
                    .filter_map(|l| clos.get(&l.target_id).map(|(p, _)| (l.level, *p)));
                weighted_mean(terms).map(|score| (pi.id, score))
            })
            .collect();

        let plos: HashMap<i64, f64> = self
            .plos
            .iter()
            .filter_map(|plo| {
                let direct = self
                    .plo_clo_links
                    .iter()
                    .filter(|l| l.source_id == plo.id)
                    .filter_map(|l| clos.get(&l.target_id).map(|(p, _)| (l.level, *p)));
                let via_pi = self
                    .plo_pi_links
                    .iter()
                    .filter(|l| l.source_id == plo.id)
                    .filter_map(|l| pis.get(&l.target_id).map(|p| (l.level, *p)));
                weighted_mean(direct.chain(via_pi)).map(|score| (plo.id, score))
            })
            .collect();

        StudentScores { clos, pis, plos }
    }

    /// 学生个人得分列表，按成果顺序
    pub fn student_outcomes(
        &self,
        scores: &StudentScores,
        threshold: f64,
    ) -> (
        Vec<StudentOutcomeScore>,
        Vec<StudentOutcomeScore>,
        Vec<StudentOutcomeScore>,
    ) {
        let clos = self
            .clos
            .iter()
            .filter_map(|clo| {
                let (percent, achieved) = scores.clos.get(&clo.id)?;
                Some(StudentOutcomeScore {
                    id: clo.id,
                    code: clo.code.clone(),
                    score_percent: round2(*percent),
                    achieved: *achieved,
                })
            })
            .collect();
        let derived = |outcomes: &[Outcome], values: &HashMap<i64, f64>| {
            outcomes
                .iter()
                .filter_map(|o| {
                    let percent = values.get(&o.id)?;
                    Some(StudentOutcomeScore {
                        id: o.id,
                        code: o.code.clone(),
                        score_percent: round2(*percent),
                        achieved: *percent >= threshold,
                    })
                })
                .collect::<Vec<_>>()
        };
        (
            clos,
            derived(&self.pis, &scores.pis),
            derived(&self.plos, &scores.plos),
        )
    }

    /// 全体学生的三层达成统计
    pub fn summarize(
        &self,
        results: &[LatestCloResult],
        threshold: f64,
    ) -> (
        Vec<OutcomeAttainment>,
        Vec<OutcomeAttainment>,
        Vec<OutcomeAttainment>,
    ) {
        let mut by_student: BTreeMap<i64, Vec<&LatestCloResult>> = BTreeMap::new();
        for result in results {
            by_student.entry(result.student_id).or_default().push(result);
        }
        let all_scores: Vec<StudentScores> = by_student
            .values()
            .map(|results| self.student_scores(results))
            .collect();

        let clos = self
            .clos
            .iter()
            .map(|clo| {
                let samples: Vec<(f64, bool)> = all_scores
                    .iter()
                    .filter_map(|s| s.clos.get(&clo.id).copied())
                    .collect();
                attainment(clo, &samples)
            })
            .collect();
        let derived = |outcomes: &[Outcome], pick: fn(&StudentScores) -> &HashMap<i64, f64>| {
            outcomes
                .iter()
                .map(|o| {
                    let samples: Vec<(f64, bool)> = all_scores
                        .iter()
                        .filter_map(|s| pick(s).get(&o.id).map(|p| (*p, *p >= threshold)))
                        .collect();
                    attainment(o, &samples)
                })
                .collect::<Vec<_>>()
        };

        (
            clos,
            derived(&self.pis, pi_scores),
            derived(&self.plos, plo_scores),
        )
    }

    /// 映射覆盖度
    pub fn coverage(&self) -> CoverageSummary {
        let course_of: HashMap<i64, Option<i64>> =
            self.clos.iter().map(|c| (c.id, c.course_id)).collect();

        let pi_clos: HashMap<i64, Vec<&OutcomeLink>> =
            self.pi_clo_links.iter().fold(HashMap::new(), |mut acc, l| {
                acc.entry(l.source_id).or_insert_with(Vec::new).push(l);
                acc
            });

        let summarize = |outcome: &Outcome, clo_ids: HashSet<i64>, max_level: Option<i32>| {
            let courses: HashSet<i64> = clo_ids
                .iter()
                .filter_map(|id| course_of.get(id).copied().flatten())
                .collect();
            OutcomeCoverage {
                id: outcome.id,
                code: outcome.code.clone(),
                clo_count: clo_ids.len() as u64,
                course_count: courses.len() as u64,
                max_level,
            }
        };

        let pis: Vec<OutcomeCoverage> = self
            .pis
            .iter()
            .map(|pi| {
                let links = pi_clos.get(&pi.id).map(Vec::as_slice).unwrap_or_default();
                let clo_ids = links.iter().map(|l| l.target_id).collect();
                let max_level = links.iter().map(|l| l.level).max();
                summarize(pi, clo_ids, max_level)
            })
            .collect();

        let plos: Vec<OutcomeCoverage> = self
            .plos
            .iter()
            .map(|plo| {
                let direct: Vec<&OutcomeLink> = self
                    .plo_clo_links
                    .iter()
                    .filter(|l| l.source_id == plo.id)
                    .collect();
                let via: Vec<&OutcomeLink> = self
                    .plo_pi_links
                    .iter()
                    .filter(|l| l.source_id == plo.id)
                    .collect();

                let mut clo_ids: HashSet<i64> = direct.iter().map(|l| l.target_id).collect();
                for pi_link in &via {
                    if let Some(links) = pi_clos.get(&pi_link.target_id) {
                        clo_ids.extend(links.iter().map(|l| l.target_id));
                    }
                }
                let max_level = direct.iter().chain(via.iter()).map(|l| l.level).max();
                summarize(plo, clo_ids, max_level)
            })
            .collect();

        let mapped_clos: HashSet<i64> = self
            .pi_clo_links
            .iter()
            .chain(self.plo_clo_links.iter())
            .map(|l| l.target_id)
            .collect();
        let mapped_count = self
            .clos
            .iter()
            .filter(|c| mapped_clos.contains(&c.id))
            .count();

        CoverageSummary {
            plo_coverage_rate: rate(
                plos.iter().filter(|c| c.clo_count > 0).count(),
                plos.len(),
            ),
            pi_coverage_rate: rate(pis.iter().filter(|c| c.clo_count > 0).count(), pis.len()),
            clo_mapped_rate: rate(mapped_count, self.clos.len()),
            plos,
            pis,
        }
    }
}

fn pi_scores(scores: &StudentScores) -> &HashMap<i64, f64> {
    &scores.pis
}

fn plo_scores(scores: &StudentScores) -> &HashMap<i64, f64> {
    &scores.plos
}

fn attainment(outcome: &Outcome, samples: &[(f64, bool)]) -> OutcomeAttainment {
    let evaluated = samples.len();
    let achieved = samples.iter().filter(|(_, ok)| *ok).count();
    let average_percent = (!samples.is_empty())
        .then(|| round2(samples.iter().map(|(p, _)| p).sum::<f64>() / evaluated as f64));
    OutcomeAttainment {
        id: outcome.id,
        code: outcome.code.clone(),
        course_id: outcome.course_id,
        evaluated: evaluated as u64,
        achieved: achieved as u64,
        attainment_rate: rate(achieved, evaluated),
        average_percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::frameworks::entities::{LinkKind, OutcomeKind};
    use chrono::Utc;

    fn outcome(kind: OutcomeKind, id: i64, course_id: Option<i64>) -> Outcome {
        Outcome {
            id,
            kind,
            framework_id: 1,
            course_id,
            code: format!("{}{id}", kind.label()),
            description: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn link(kind: LinkKind, source_id: i64, target_id: i64, level: i32) -> OutcomeLink {
        OutcomeLink {
            id: source_id * 100 + target_id,
            kind,
            source_id,
            target_id,
            level,
            created_at: Utc::now(),
        }
    }

    fn result(student_id: i64, clo_id: i64, percent: f64) -> LatestCloResult {
        LatestCloResult {
            student_id,
            clo_id,
            score_percent: percent,
            status: if percent >= 50.0 {
                CloResultStatus::Achieved
            } else {
                CloResultStatus::NotAchieved
            },
            recorded_at: Utc::now(),
        }
    }

    // PLO1 <- CLO11 (3), PLO1 <- PI21 (2); PI21 <- CLO11 (1), CLO12 (3); CLO13 unmapped
    fn graph() -> OutcomeGraph {
        OutcomeGraph {
            plos: vec![outcome(OutcomeKind::Plo, 1, None), outcome(OutcomeKind::Plo, 2, None)],
            pis: vec![outcome(OutcomeKind::Pi, 21, None)],
            clos: vec![
                outcome(OutcomeKind::Clo, 11, Some(100)),
                outcome(OutcomeKind::Clo, 12, Some(101)),
                outcome(OutcomeKind::Clo, 13, Some(101)),
            ],
            plo_pi_links: vec![link(LinkKind::PloPi, 1, 21, 2)],
            plo_clo_links: vec![link(LinkKind::PloClo, 1, 11, 3)],
            pi_clo_links: vec![
                link(LinkKind::PiClo, 21, 11, 1),
                link(LinkKind::PiClo, 21, 12, 3),
            ],
        }
    }

    #[test]
    fn pi_and_plo_scores_are_level_weighted() {
        let g = graph();
        let r1 = result(1, 11, 80.0);
        let r2 = result(1, 12, 40.0);
        let scores = g.student_scores(&[&r1, &r2]);

        // (1*80 + 3*40) / 4
        assert_eq!(scores.pis[&21], 50.0);
        // (3*80 + 2*50) / 5
        assert_eq!(scores.plos[&1], 68.0);
        assert!(!scores.plos.contains_key(&2));

        let (clos, pis, plos) = g.student_outcomes(&scores, 60.0);
        assert_eq!(clos.len(), 2);
        assert!(clos[0].achieved);
        assert!(!pis[0].achieved);
        assert!(plos[0].achieved);
    }

    #[test]
    fn plo_without_clo_data_uses_pi_only_when_available() {
        let g = graph();
        let r = result(1, 12, 70.0);
        let scores = g.student_scores(&[&r]);
        assert_eq!(scores.pis[&21], 70.0);
        // 只有 PI 这一项
        assert_eq!(scores.plos[&1], 70.0);
    }

    #[test]
    fn summary_counts_students_per_outcome() {
        let g = graph();
        let results = vec![
            result(1, 11, 80.0),
            result(1, 12, 40.0),
            result(2, 11, 30.0),
        ];
        let (clos, pis, plos) = g.summarize(&results, 60.0);

        let clo11 = &clos[0];
        assert_eq!((clo11.evaluated, clo11.achieved), (2, 1));
        assert_eq!(clo11.attainment_rate, 50.0);
        assert_eq!(clo11.average_percent, Some(55.0));

        let clo13 = &clos[2];
        assert_eq!(clo13.evaluated, 0);
        assert_eq!(clo13.attainment_rate, 0.0);
        assert_eq!(clo13.average_percent, None);

        // 学生 1: 50；学生 2: 30
        assert_eq!(pis[0].evaluated, 2);
        assert_eq!(pis[0].achieved, 0);

        // 学生 1: 68；学生 2: (3*30 + 2*30) / 5 = 30
        assert_eq!(plos[0].achieved, 1);
        assert_eq!(plos[0].average_percent, Some(49.0));
        assert_eq!(plos[1].evaluated, 0);
    }

    #[test]
    fn coverage_follows_pi_links() {
        let cov = graph().coverage();

        let plo1 = &cov.plos[0];
        assert_eq!(plo1.clo_count, 2);
        assert_eq!(plo1.course_count, 2);
        assert_eq!(plo1.max_level, Some(3));
        assert_eq!(cov.plos[1].clo_count, 0);
        assert_eq!(cov.plos[1].max_level, None);

        assert_eq!(cov.pis[0].clo_count, 2);
        assert_eq!(cov.plo_coverage_rate, 50.0);
        assert_eq!(cov.pi_coverage_rate, 100.0);
        assert_eq!(cov.clo_mapped_rate, 66.67);
    }
}
