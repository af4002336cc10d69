//! Prompt templates for report analysis.
//!
//! Each prompt asks for markdown with fixed section headings so the
//! answer can be re-parsed by [`super::format`].

use civic_core::Department;

use super::types::{GenerationSettings, ModelTier};

/// A rendered prompt together with the settings it runs with.
#[derive(Debug, Clone)]
pub struct Prompt {
    pub text: String,
    pub settings: GenerationSettings,
    pub tier: ModelTier,
}

const SUMMARY: GenerationSettings = GenerationSettings::new(0.7, 40, 0.95, 8192);
const ENHANCE: GenerationSettings = GenerationSettings::new(0.8, 40, 0.95, 8192);
const ACTION_ITEMS: GenerationSettings = GenerationSettings::new(0.6, 32, 0.9, 4096);
const COMPARATIVE: GenerationSettings = GenerationSettings::new(0.7, 40, 0.95, 8192);
const RISK: GenerationSettings = GenerationSettings::new(0.5, 32, 0.8, 6144);
const PERFORMANCE: GenerationSettings = GenerationSettings::new(0.6, 40, 0.9, 6144);

/// Structured summary of an attached PDF.
#[must_use]
pub fn summarize_document(department: Department, file_name: &str) -> Prompt {
    let department = department.label();
    Prompt {
        text: format!(
            "You are an assistant analyzing reports for the {department} department. \
             The attached PDF is \"{file_name}\". Write a structured summary in this format:

## EXECUTIVE SUMMARY
[2-3 sentence overview of the main findings]

## KEY FINDINGS
- [Finding with specific data or metrics] (five findings)

## CRITICAL METRICS
- Performance Rate: [X%]
- Budget Utilization: [amount or percentage]
- Issue Resolution: [cases or percentage]
- Timeline Adherence: [percentage]

## AREAS OF CONCERN
- [Concern with severity level] (three concerns)

## RECOMMENDATIONS
1. Immediate Actions (1-7 days)
2. Short-term Goals (1-4 weeks)
3. Long-term Strategy (1-6 months)

## SUCCESS INDICATORS
- [KPI]: Target [value]

## NEXT STEPS
- [Step with responsible party]

Focus on actionable insights with specific metrics and clear timelines."
        ),
        settings: SUMMARY,
        tier: ModelTier::Standard,
    }
}

/// Turn an officer's raw notes into a structured report.
#[must_use]
pub fn enhance_report(department: Department, text: &str) -> Prompt {
    let department = department.label();
    Prompt {
        text: format!(
            "You are an assistant enhancing reports for the {department} department. \
             Transform this raw report into a professional, structured analysis.

Original Report:
{text}

Use this format:

## ENHANCED REPORT SUMMARY
[Professional title and 2-3 sentence overview]

## KEY INSIGHTS
- Insight 1: [based on original content]
- Insight 2: [deeper analysis]
- Insight 3: [implications]

## EXTRACTED METRICS & DATA
- [Quantifiable metric or performance indicator]

## IDENTIFIED RISKS & CONCERNS
- High Priority: [risk with mitigation strategy]
- Medium Priority: [risk with monitoring plan]
- Low Priority: [risk with awareness note]

## STRATEGIC RECOMMENDATIONS
1. Immediate Actions (Next 7 Days)
2. Short-Term Improvements (1-4 Weeks)
3. Long-Term Development (1-6 Months)

## PROPOSED KPIs
- [KPI]: Baseline [X], Target [Y]

## IMPLEMENTATION ROADMAP
- Week 1-2: [activities]
- Week 3-4: [activities]
- Month 2-3: [activities]
- Month 4-6: [activities]

## FOLLOW-UP REQUIREMENTS
- [Monitoring, reporting or review requirement]

Keep all original information while adding structure and actionable insights."
        ),
        settings: ENHANCE,
        tier: ModelTier::Standard,
    }
}

/// Prioritized action items for one report.
#[must_use]
pub fn action_items(department: Department, content: &str) -> Prompt {
    let department = department.label();
    Prompt {
        text: format!(
            "Based on the following {department} department report, generate specific, \
             actionable items with clear priorities and timelines.

Report Content:
{content}

## IMMEDIATE ACTION ITEMS (Priority: HIGH - Next 1-7 days)
1. [Action] - Owner: [Role] - Resources: [Required] - Deadline: [Date]

## SHORT-TERM RECOMMENDATIONS (1-4 weeks)
1. [Recommendation] - Expected Outcome: [Result] - Budget: [Amount]

## LONG-TERM STRATEGIC INITIATIVES (1-6 months)
1. [Initiative] - Impact: [Benefit] - Investment: [Resources]

## RESOURCE REQUIREMENTS
- Personnel: [staff]
- Budget: [financial]
- Equipment: [tools]
- Training: [skills]

## SUCCESS METRICS & KPIs
- [Metric]: Current [X] -> Target [Y] by [Date]

## MONITORING & REVIEW SCHEDULE
- Daily: [items]
- Weekly: [items]
- Monthly: [items]

Make every action item specific, measurable and time-bound."
        ),
        settings: ACTION_ITEMS,
        tier: ModelTier::Analysis,
    }
}

/// Comparative analysis over several report bodies.
#[must_use]
pub fn comparative_analysis(department: Department, reports: &[&str]) -> Prompt {
    let department = department.label();
    let reports = join_reports(reports);
    Prompt {
        text: format!(
            "Analyze multiple reports for the {department} department and provide a \
             comparative analysis.

{reports}

## COMPARATIVE ANALYSIS DASHBOARD

### COMMON THEMES & PATTERNS
- [Theme]: Appears in [X/Y] reports

### TREND ANALYSIS
- Improving Areas: [...]
- Declining Areas: [...]
- Emerging Issues: [...]

### KEY DIFFERENCES & VARIATIONS
- Performance Gaps: [...]
- Resource Allocation: [...]

### CONSOLIDATED RECOMMENDATIONS
1. Universal Actions
2. Targeted Interventions
3. Best Practice Replication

### CRITICAL SUCCESS FACTORS
- [Factor]: Essential for [outcome]

### INTEGRATED TIMELINE
- Month 1: [...]
- Month 2-3: [...]
- Month 4-6: [...]

Focus on synergies between reports."
        ),
        settings: COMPARATIVE,
        tier: ModelTier::Analysis,
    }
}

/// Risk assessment of one report.
#[must_use]
pub fn risk_assessment(department: Department, content: &str) -> Prompt {
    let department = department.label();
    Prompt {
        text: format!(
            "Conduct a risk assessment for the {department} department based on this report.

Report Content:
{content}

## RISK ASSESSMENT MATRIX

### HIGH-RISK AREAS (Impact: High | Probability: High)
- Risk: [Description]
  - Impact: [...]
  - Mitigation: [...]
  - Timeline: [...]

### MEDIUM-RISK AREAS (Impact: Medium | Probability: Medium)
- Risk: [Description]
  - Monitoring: [...]

### LOW-RISK AREAS (Impact: Low | Probability: Low)
- Risk: [Description]

## RISK MITIGATION STRATEGIES
- Immediate Actions (Next 7 Days): [...]
- Short-term Measures (1-4 Weeks): [...]
- Long-term Strategy (1-6 Months): [...]

## EARLY WARNING INDICATORS
- Critical Threshold: [Metric] drops below [Value]

## CONTINGENCY PLANNING
- Immediate Response: [...]
- Escalation Triggers: [...]

Give specific strategies with clear ownership and timelines."
        ),
        settings: RISK,
        tier: ModelTier::Analysis,
    }
}

/// Performance analytics for one report, optionally against history.
#[must_use]
pub fn performance_analytics(
    department: Department,
    content: &str,
    history: Option<&str>,
) -> Prompt {
    let department = department.label();
    let history = history
        .map(|h| format!("Historical Context:\n{h}\n"))
        .unwrap_or_default();
    Prompt {
        text: format!(
            "Generate performance analytics for the {department} department.

Current Report:
{content}

{history}
## PERFORMANCE ANALYTICS DASHBOARD

### KEY PERFORMANCE INDICATORS
- Efficiency Rate: [Current] vs [Target] vs [Previous Period]
- Quality Score: [Current] vs [Benchmark]
- Cost Effectiveness: [Amount] per [Unit]
- Timeline Adherence: [Percentage] vs [Target]

### TREND ANALYSIS
- Improving Metrics: [...]
- Declining Metrics: [...]

### PERFORMANCE INSIGHTS
- Root Cause Analysis: [...]
- Correlation Patterns: [...]

### OPTIMIZATION OPPORTUNITIES
1. Quick Wins
2. Strategic Improvements
3. Innovation Areas

### PERFORMANCE ROADMAP
- Next 30 Days: [...]
- Next 90 Days: [...]
- Next 12 Months: [...]

Provide data-driven insights with specific improvement recommendations."
        ),
        settings: PERFORMANCE,
        tier: ModelTier::Analysis,
    }
}

/// Number each report and separate them with horizontal rules.
fn join_reports(reports: &[&str]) -> String {
    reports
        .iter()
        .enumerate()
        .map(|(i, report)| format!("## Report {}:\n{report}", i + 1))
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}
