use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Budget {
    pub(crate) id: i64,
    /// Format: "YYYY-MM"
    pub(crate) month: String,
    pub(crate) limit_amount: Decimal,
}
