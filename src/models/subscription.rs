use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Subscription {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) amount: Decimal,
    /// Next payment date, "YYYY-MM-DD"
    pub(crate) next_date: String,
}
