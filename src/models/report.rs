use rust_decimal::Decimal;

/// One row of the category report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CategoryTotal {
    pub(crate) name: String,
    pub(crate) total: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BudgetStatus {
    Exceeded,
    Within,
}

impl BudgetStatus {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Exceeded => "exceeded",
            Self::Within => "within",
        }
    }
}

impl std::fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BudgetAlert {
    pub(crate) status: BudgetStatus,
    pub(crate) total_spent: Decimal,
    /// `None` when no budget is configured for the month
    pub(crate) limit: Option<Decimal>,
}

impl BudgetAlert {
    /// Only a strictly greater total exceeds the limit. A missing budget is
    /// always within.
    pub(crate) fn evaluate(total_spent: Decimal, limit: Option<Decimal>) -> Self {
        let status = match limit {
            Some(l) if total_spent > l => BudgetStatus::Exceeded,
            _ => BudgetStatus::Within,
        };
        Self {
            status,
            total_spent,
            limit,
        }
    }

    pub(crate) fn is_exceeded(&self) -> bool {
        self.status == BudgetStatus::Exceeded
    }
}
