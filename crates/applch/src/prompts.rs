//! Markdown instruction templates for the background-check and arena passes.

use std::fmt::Write as _;

use chrono::NaiveDate;

use crate::documents::{DocumentKind, SourceDocument};
use crate::results::CandidateReport;

/// Instructions for a single-applicant background check.
pub fn background_check_prompt(
    applicant_name: &str,
    file_names: &[String],
    requirements: Option<&str>,
    date: NaiveDate,
) -> String {
    let date = date.format("%Y-%m-%d");
    let mut prompt = String::new();

    prompt.push_str(
        "You are a professional background verification specialist. Your task is to thoroughly \
         analyze the provided resume/CV documents and conduct a comprehensive background check on \
         this job applicant.",
    );
    if requirements.is_some() {
        prompt.push_str(
            " Additionally, evaluate how well the candidate matches the provided job requirements.",
        );
    }
    prompt.push_str("\n\n");

    writeln!(&mut prompt, "## Applicant: {applicant_name}").expect("write applicant");
    writeln!(&mut prompt, "## Documents provided: {}", file_names.join(", "))
        .expect("write documents");

    if let Some(requirements) = requirements {
        write!(
            &mut prompt,
            "\n## Job Requirements\nThe following are the specific requirements for this position. \
             Please evaluate the candidate against these requirements as part of your analysis:\n\n\
             {requirements}\n\n---\n"
        )
        .expect("write requirements");
    }

    prompt.push_str(CHECK_TASKS);
    prompt.push_str(CHECK_FORMAT);

    if requirements.is_some() {
        prompt.push_str(CHECK_REQUIREMENTS_MATCH);
    }

    write!(
        &mut prompt,
        "\n## Final Recommendation\n\
         Brief recommendation on whether this appears to be a legitimate candidate worth interviewing.\n\n\
         ---\n\
         *Report generated on {date}*\n\
         *Note: This report is based on publicly available information and should be used as one \
         input among many in the hiring process.*\n\n\
         ---\n\n\
         Now analyze the provided documents and generate the complete background check report."
    )
    .expect("write footer");

    prompt
}

/// Appendix carrying the full contents of text documents, which are not sent
/// as attachments. Empty when there are none.
pub fn inline_text_documents(documents: &[SourceDocument]) -> String {
    let mut section = String::new();
    let texts: Vec<&SourceDocument> = documents
        .iter()
        .filter(|doc| doc.kind == DocumentKind::Text)
        .collect();
    if texts.is_empty() {
        return section;
    }

    section.push_str("\n\n## Text Documents Content:\n");
    for doc in texts {
        write!(&mut section, "\n### {}:\n```\n{}\n```\n", doc.name, doc.text())
            .expect("write text document");
    }
    section
}

/// Instructions for ranking several candidates from their stored reports.
pub fn arena_prompt(
    candidates: &[CandidateReport],
    requirements: Option<&str>,
    date: NaiveDate,
) -> String {
    let date = date.format("%Y-%m-%d");
    let mut prompt = String::new();

    prompt.push_str(
        "You are a senior hiring manager and talent acquisition specialist. Your task is to \
         analyze multiple candidate background check reports and create a comprehensive \
         ranking/decision matrix.",
    );
    if requirements.is_some() {
        prompt.push_str(" Evaluate all candidates against the provided job requirements.");
    }
    prompt.push('\n');

    if let Some(requirements) = requirements {
        write!(
            &mut prompt,
            "\n## Job Requirements\nThe following are the specific requirements for this position. \
             Use these to evaluate and rank candidates:\n\n{requirements}\n\n---\n"
        )
        .expect("write requirements");
    }

    prompt.push_str("\n## Candidates to Evaluate\n\n");
    let reports: Vec<String> = candidates
        .iter()
        .enumerate()
        .map(|(index, candidate)| {
            format!(
                "\n## Candidate {}: {}\n\n{}\n\n---\n",
                index + 1,
                candidate.name,
                candidate.content
            )
        })
        .collect();
    prompt.push_str(&reports.join("\n"));

    prompt.push_str(ARENA_TASKS);

    write!(
        &mut prompt,
        "\n## Required Output Format (Markdown):\n\n\
         # Candidate Arena: Comparative Analysis\n\n\
         ## Analysis Date: {date}\n\
         ## Total Candidates Evaluated: {}\n\n---\n",
        candidates.len()
    )
    .expect("write arena header");

    prompt.push_str(ARENA_FORMAT);

    if requirements.is_some() {
        prompt.push_str(ARENA_REQUIREMENTS_MATCH);
    }

    prompt.push_str(ARENA_RECOMMENDATIONS);

    write!(
        &mut prompt,
        "\n*Arena analysis generated on {date}*\n\
         *This comparative analysis should be used alongside other hiring inputs and processes.*\n\n\
         ---\n\n\
         Now analyze all the candidate reports provided above, identify their roles, group them \
         accordingly, and generate the complete comparative arena analysis with per-role decision \
         matrices."
    )
    .expect("write arena footer");

    prompt
}

const CHECK_TASKS: &str = r#"

## Your Analysis Tasks:

### 1. Company Verification
For each company mentioned in the resume:
- Verify if the company exists and is legitimate
- Check if it's an established business (founding date, size, reputation)
- Look for any red flags (shell companies, recently created, no online presence)
- Assess if company ratings/reviews are available and what they indicate

### 2. Project & Portfolio Link Verification
For any project links, portfolio URLs, or GitHub profiles mentioned:
- Check if the links are still active and accessible
- Assess the scale/size of the projects (stars, forks, contributors for GitHub)
- Verify if the work shown matches the claimed expertise

### 3. Technology & Company Alignment
- Verify if the listed technologies align with what the companies they worked at typically use
- Check for any mismatches that seem suspicious (e.g., claiming to use technologies a company doesn't work with)
- Assess if the skill progression makes sense chronologically

### 4. General Credibility Assessment
- Look for any inconsistencies in dates, roles, or claims
- Check for any unrealistic claims or exaggerations
- Identify any information that cannot be verified
"#;

const CHECK_FORMAT: &str = r#"
## Required Output Format (Markdown):

# Background Check Report: [Applicant Name]

## Overall Rating: [X/10]
Brief explanation of the rating.

## Realness/Legitimacy Score: [X/100]
- 90-100: Highly verified, all claims check out
- 70-89: Mostly verified, minor unverifiable claims
- 50-69: Partially verified, some concerns
- 30-49: Many unverifiable claims, significant concerns
- 0-29: Likely fake or heavily fabricated

- 40-0 is flagged a bullshit application

## Company Verification Results
| Company | Status | Established | Rating/Reputation | Notes |
|---------|--------|-------------|-------------------|-------|
| ... | ✅/⚠️/❌ | ... | ... | ... |

## Project/Link Verification
| Project/Link | Status | Scale/Activity | Notes |
|--------------|--------|----------------|-------|
| ... | ✅/⚠️/❌ | ... | ... |

## Technology Alignment Analysis
Assessment of whether the claimed technologies match the companies and roles.

## 🚨 Suspicious Items / Red Flags
List any concerning findings that warrant further investigation.

## ✅ Verified / Positive Indicators
List verified claims and positive findings.

## 📋 Unverifiable Claims
List items that could not be verified but aren't necessarily suspicious.
"#;

const CHECK_REQUIREMENTS_MATCH: &str = r#"
## 🎯 Requirements Match Assessment
Evaluate how well the candidate matches the job requirements:
| Requirement | Match Status | Evidence | Notes |
|-------------|--------------|----------|-------|
| ... | ✅/⚠️/❌ | ... | ... |

### Overall Requirements Fit: [X/10]
Brief assessment of how well the candidate meets the specified requirements.
"#;

const ARENA_TASKS: &str = r#"

## Your Analysis Tasks:

### 1. Role Identification & Grouping
First, analyze each candidate's background check report to identify:
- What role(s) they are applying for or best suited for (based on their experience, skills, and career trajectory)
- Group candidates by their identified roles
- If a candidate could fit multiple roles, note this

### 2. Individual Assessment Summary
For each candidate, extract and summarize:
- Identified role/position
- Overall rating from their report
- Realness/Legitimacy score
- Key strengths
- Key concerns/red flags
- Verification status (well-verified vs. unverifiable claims)

### 3. Per-Role Decision Matrix
For each identified role, create a separate decision matrix comparing only the candidates for that role.

### 4. Per-Role Ranking
Provide a ranked list within each role group with justification.
"#;

const ARENA_FORMAT: &str = r#"
## 🏷️ Candidates by Role

List all identified roles and which candidates belong to each.

---

## 📊 Decision Matrix by Role

For EACH identified role, create a section:

### Role: [Role Name]

#### Candidates for this role:
| Candidate | Overall Score | Legitimacy | Verification Strength | Red Flags | Recommendation |
|-----------|---------------|------------|----------------------|-----------|----------------|
| ... | X/10 | X/100 | High/Medium/Low | Count | ✅/⚠️/❌ |

#### Ranking for [Role Name]:
1. **[Name]** - Score X/10, Legitimacy X/100
   - Why they rank here: ...
   - Concerns: ...

(Repeat for each role...)

---

## 📈 Cross-Role Insights

### Verification Strength Comparison
Which candidates have the most verifiable work history across all roles?

### Red Flags Summary
| Candidate | Role | Red Flag | Severity | Impact |
|-----------|------|----------|----------|--------|
| ... | ... | ... | High/Medium/Low | ... |

---
"#;

const ARENA_REQUIREMENTS_MATCH: &str = r#"
## 🎯 Requirements Match Matrix

Evaluate each candidate against the job requirements:

| Candidate | Requirement 1 | Requirement 2 | ... | Overall Fit |
|-----------|---------------|---------------|-----|-------------|
| ... | ✅/⚠️/❌ | ✅/⚠️/❌ | ... | X/10 |

### Requirements Fit Ranking
Rank candidates by how well they match the specific job requirements:
1. **[Name]** - Fit Score: X/10 - [Brief justification]

---
"#;

const ARENA_RECOMMENDATIONS: &str = r#"
## 🎯 Hiring Recommendations by Role

For EACH role:

### [Role Name]
- **Strongly Recommend**: [Names]
- **Recommend with Reservations**: [Names]
- **Do Not Recommend**: [Names]

---

## 📋 Next Steps for Top Candidates

For each recommended candidate, list specific verification steps:
1. [Candidate Name] ([Role]): [Specific action items]

---
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).expect("valid date")
    }

    fn candidate(name: &str, content: &str) -> CandidateReport {
        CandidateReport {
            name: name.to_string(),
            slug: crate::roster::slugify(name),
            content: content.to_string(),
        }
    }

    #[test]
    fn check_prompt_lists_applicant_and_documents() {
        let prompt = background_check_prompt(
            "Jane Doe",
            &["resume.pdf".to_string(), "notes.txt".to_string()],
            None,
            date(),
        );

        assert!(prompt.contains("## Applicant: Jane Doe"));
        assert!(prompt.contains("## Documents provided: resume.pdf, notes.txt"));
        assert!(prompt.contains("*Report generated on 2025-03-14*"));
        assert!(!prompt.contains("Job Requirements"));
        assert!(!prompt.contains("Requirements Match Assessment"));
    }

    #[test]
    fn check_prompt_embeds_requirements() {
        let prompt =
            background_check_prompt("Jane Doe", &[], Some("- 5 years of Rust"), date());

        assert!(prompt.contains("Additionally, evaluate how well the candidate matches"));
        assert!(prompt.contains("## Job Requirements"));
        assert!(prompt.contains("- 5 years of Rust"));
        assert!(prompt.contains("## 🎯 Requirements Match Assessment"));
    }

    #[test]
    fn inline_text_only_covers_text_documents() {
        let docs = vec![
            SourceDocument {
                kind: DocumentKind::Text,
                name: "notes.txt".to_string(),
                path: PathBuf::from("notes.txt"),
                data: b"Speaks French".to_vec(),
            },
            SourceDocument {
                kind: DocumentKind::Image,
                name: "id.png".to_string(),
                path: PathBuf::from("id.png"),
                data: vec![0x89, 0x50],
            },
        ];

        let section = inline_text_documents(&docs);

        assert!(section.starts_with("\n\n## Text Documents Content:\n"));
        assert!(section.contains("### notes.txt:\n```\nSpeaks French\n```"));
        assert!(!section.contains("id.png"));
        assert!(inline_text_documents(&docs[1..]).is_empty());
    }

    #[test]
    fn arena_prompt_labels_each_candidate() {
        let candidates = vec![
            candidate("Jane Doe", "# Report A"),
            candidate("John Smith", "# Report B"),
        ];

        let prompt = arena_prompt(&candidates, None, date());

        assert!(prompt.contains("## Candidate 1: Jane Doe\n\n# Report A"));
        assert!(prompt.contains("## Candidate 2: John Smith\n\n# Report B"));
        assert!(prompt.contains("## Total Candidates Evaluated: 2"));
        assert!(prompt.contains("## Analysis Date: 2025-03-14"));
        assert!(!prompt.contains("Requirements Match Matrix"));
    }

    #[test]
    fn arena_prompt_adds_requirements_matrix() {
        let candidates = vec![candidate("Jane Doe", "# Report A")];

        let prompt = arena_prompt(&candidates, Some("Must know Rust"), date());

        assert!(prompt.contains("Evaluate all candidates against the provided job requirements."));
        assert!(prompt.contains("Must know Rust"));
        assert!(prompt.contains("## 🎯 Requirements Match Matrix"));
    }
}
