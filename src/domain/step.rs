use super::payment::PaymentStatus;
use serde::Serialize;

/// The four-step checkout shown to the client.
#[derive(Debug, Serialize, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum WizardStep {
    #[default]
    Pay,
    Verify,
    Release,
    Done,
}

/// What the client can do at a given step.
#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum StepAction {
    Pay,
    Verify,
    Release,
}

impl WizardStep {
    /// Step for an existing payment record.
    pub fn for_status(status: PaymentStatus) -> Self {
        match status {
            PaymentStatus::Pending => WizardStep::Verify,
            PaymentStatus::Escrowed => WizardStep::Release,
            PaymentStatus::Completed => WizardStep::Done,
        }
    }

    pub fn number(&self) -> u8 {
        match self {
            WizardStep::Pay => 1,
            WizardStep::Verify => 2,
            WizardStep::Release => 3,
            WizardStep::Done => 4,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::Pay => "Pay",
            WizardStep::Verify => "Verify",
            WizardStep::Release => "Release",
            WizardStep::Done => "Done",
        }
    }

    pub fn action(&self) -> Option<StepAction> {
        match self {
            WizardStep::Pay => Some(StepAction::Pay),
            WizardStep::Verify => Some(StepAction::Verify),
            WizardStep::Release => Some(StepAction::Release),
            WizardStep::Done => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, WizardStep::Done)
    }
}

impl From<PaymentStatus> for WizardStep {
    fn from(status: PaymentStatus) -> Self {
        Self::for_status(status)
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.number(), self.title())
    }
}
