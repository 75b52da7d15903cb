use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::BillingError;

/// Recognized billing cycle kinds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum CycleKind {
    Monthly,
    Quarterly,
    Yearly,
}

impl CycleKind {
    pub const ALL: [CycleKind; 3] = [CycleKind::Monthly, CycleKind::Quarterly, CycleKind::Yearly];

    pub fn as_str(&self) -> &'static str {
        match self {
            CycleKind::Monthly => "MONTHLY",
            CycleKind::Quarterly => "QUARTERLY",
            CycleKind::Yearly => "YEARLY",
        }
    }

    /// Calendar months covered by a single unit of this kind.
    pub fn months_per_unit(&self) -> u32 {
        match self {
            CycleKind::Monthly => 1,
            CycleKind::Quarterly => 3,
            CycleKind::Yearly => 12,
        }
    }

    /// Singular and plural unit names used in labels.
    pub fn unit_names(&self) -> (&'static str, &'static str) {
        match self {
            CycleKind::Monthly => ("month", "months"),
            CycleKind::Quarterly => ("quarter", "quarters"),
            CycleKind::Yearly => ("year", "years"),
        }
    }
}

impl FromStr for CycleKind {
    type Err = BillingError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "MONTHLY" => Ok(CycleKind::Monthly),
            "QUARTERLY" => Ok(CycleKind::Quarterly),
            "YEARLY" => Ok(CycleKind::Yearly),
            other => Err(BillingError::InvalidCycle(format!(
                "unrecognized cycle kind `{}`",
                other
            ))),
        }
    }
}

impl fmt::Display for CycleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated billing cycle: `duration` units of `kind`.
///
/// Instances can only be built through [`CycleDefinition::new`] or [`normalize_cycle`], so a
/// live value always carries `duration >= 1`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "RawCycle", into = "RawCycle")]
pub struct CycleDefinition {
    kind: CycleKind,
    duration: u32,
}

impl CycleDefinition {
    pub fn new(kind: CycleKind, duration: u32) -> Result<Self, BillingError> {
        if duration < 1 {
            return Err(BillingError::InvalidCycle(
                "duration must be at least 1".into(),
            ));
        }
        Ok(Self { kind, duration })
    }

    pub fn monthly() -> Self {
        Self {
            kind: CycleKind::Monthly,
            duration: 1,
        }
    }

    pub fn kind(&self) -> CycleKind {
        self.kind
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    /// Whole calendar months spanned by one cycle.
    pub fn months(&self) -> u32 {
        self.kind.months_per_unit().saturating_mul(self.duration)
    }

    pub fn label(&self) -> String {
        match (self.duration, self.kind) {
            (1, CycleKind::Monthly) => "Monthly".into(),
            (1, CycleKind::Quarterly) => "Quarterly".into(),
            (1, CycleKind::Yearly) => "Yearly".into(),
            (n, kind) => format!("Every {} {}", n, kind.unit_names().1),
        }
    }
}

impl Default for CycleDefinition {
    fn default() -> Self {
        Self::monthly()
    }
}

impl fmt::Display for CycleDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Validates a cycle coming from an untyped boundary (persisted tag plus integer multiplier).
pub fn normalize_cycle(kind: &str, duration: i64) -> Result<CycleDefinition, BillingError> {
    let kind = CycleKind::from_str(kind)?;
    if duration < 1 {
        return Err(BillingError::InvalidCycle(format!(
            "duration must be at least 1 (got {})",
            duration
        )));
    }
    let duration = u32::try_from(duration).map_err(|_| {
        BillingError::InvalidCycle(format!("duration {} is out of range", duration))
    })?;
    CycleDefinition::new(kind, duration)
}

/// Months advanced by one cycle of `cycle`.
pub fn months_per_cycle(cycle: &CycleDefinition) -> u32 {
    cycle.months()
}

#[derive(Serialize, Deserialize)]
struct RawCycle {
    kind: String,
    duration: i64,
}

impl TryFrom<RawCycle> for CycleDefinition {
    type Error = BillingError;

    fn try_from(raw: RawCycle) -> Result<Self, Self::Error> {
        normalize_cycle(&raw.kind, raw.duration)
    }
}

impl From<CycleDefinition> for RawCycle {
    fn from(cycle: CycleDefinition) -> Self {
        Self {
            kind: cycle.kind.as_str().to_string(),
            duration: i64::from(cycle.duration),
        }
    }
}
