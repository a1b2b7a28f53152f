use stakehook_model::ProgramStatus;

/// Status of a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "strum",
    derive(strum::EnumIter, strum::EnumString, strum::Display)
)]
#[cfg_attr(feature = "strum", strum(serialize_all = "snake_case"))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PoolStatus {
    /// No reward program yet.
    Uninitialized,
    /// Rewards are accruing.
    Funded,
    /// The program has finished.
    Depleted,
}

impl From<ProgramStatus> for PoolStatus {
    fn from(status: ProgramStatus) -> Self {
        match status {
            ProgramStatus::Funded => Self::Funded,
            ProgramStatus::Depleted => Self::Depleted,
        }
    }
}
