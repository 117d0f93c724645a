use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Expense {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) amount: Decimal,
    /// Format: "YYYY-MM-DD"
    pub(crate) date: String,
    pub(crate) category_id: Option<i64>,
}
