#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderablePriority {
    Low,
    Medium,
    High,
}

impl RenderablePriority {
    pub fn as_str(self) -> &'static str {
        match self {
            RenderablePriority::Low => "LOW",
            RenderablePriority::Medium => "MEDIUM",
            RenderablePriority::High => "HIGH",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableVerdictStatus {
    Pass,
    Warn,
    Fail,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableLocation {
    pub path: String,
    pub line: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableViolation {
    pub rule_id: String,
    pub code: String,
    pub subject: String,
    pub message: String,
    pub location: Option<RenderableLocation>,
}

/// A checked rule with its violations in evaluation order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableRule {
    pub description: String,
    pub priority: RenderablePriority,
    pub violations: Vec<RenderableViolation>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableData {
    pub rules_checked: u32,
    pub rules_failed: u32,
    pub violations_emitted: u32,
    pub violations_total: u32,
    pub truncated_reason: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableReport {
    pub verdict: RenderableVerdictStatus,
    pub rules: Vec<RenderableRule>,
    pub data: RenderableData,
}
