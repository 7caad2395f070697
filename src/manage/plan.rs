use serde::{Deserialize, Deserializer, Serialize};

/// Subscription tier of the site being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanType {
    #[default]
    Basic,
    Pro,
}

impl PlanType {
    /// Anything other than `"pro"` is the default tier.
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("pro") {
            PlanType::Pro
        } else {
            PlanType::Basic
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlanType::Basic => "basic",
            PlanType::Pro => "pro",
        }
    }
}

impl<'de> Deserialize<'de> for PlanType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(PlanType::parse(&raw))
    }
}

/// Per-kind ceiling on collection length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanLimits {
    pub basic: usize,
    pub pro: usize,
}

impl PlanLimits {
    pub const fn new(basic: usize, pro: usize) -> Self {
        PlanLimits { basic, pro }
    }

    pub fn for_plan(&self, plan: PlanType) -> usize {
        match plan {
            PlanType::Basic => self.basic,
            PlanType::Pro => self.pro,
        }
    }
}

/// The "current site" every page is scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteContext {
    pub subtype: String,
    #[serde(default, rename = "planType")]
    pub plan: PlanType,
}

impl SiteContext {
    pub fn new(subtype: &str, plan: PlanType) -> Self {
        SiteContext {
            subtype: subtype.to_string(),
            plan,
        }
    }
}
