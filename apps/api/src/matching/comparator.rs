//! Skill Set Comparator: exact set algebra between resume and job skills.

use crate::models::skills::SkillSet;

/// Outcome of comparing a resume's skills against a job description's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillComparison {
    /// resume ∩ job
    pub matched: SkillSet,
    /// job − resume
    pub missing: SkillSet,
    /// resume − job
    pub extra: SkillSet,
}

impl SkillComparison {
    /// ATS coverage: `|matched| / |job skills|`, or 1.0 when the job lists no
    /// recognized skills.
    pub fn keyword_score(&self) -> f64 {
        let required = self.matched.len() + self.missing.len();
        if required == 0 {
            return 1.0;
        }
        self.matched.len() as f64 / required as f64
    }
}

pub fn compare(resume_skills: &SkillSet, job_skills: &SkillSet) -> SkillComparison {
    SkillComparison {
        matched: resume_skills.intersection(job_skills),
        missing: job_skills.difference(resume_skills),
        extra: resume_skills.difference(job_skills),
    }
}
