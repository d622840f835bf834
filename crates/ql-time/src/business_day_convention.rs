//! Business-day adjustment conventions.

/// How to adjust a date that falls on a non-business day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BusinessDayConvention {
    /// Keep the date as is.
    Unadjusted,
    /// First business day after the holiday.
    #[default]
    Following,
    /// Following, unless that crosses into the next month; then Preceding.
    ModifiedFollowing,
    /// First business day before the holiday.
    Preceding,
    /// Preceding, unless that crosses into the previous month; then Following.
    ModifiedPreceding,
}

impl std::fmt::Display for BusinessDayConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BusinessDayConvention::Unadjusted => "Unadjusted",
            BusinessDayConvention::Following => "Following",
            BusinessDayConvention::ModifiedFollowing => "Modified Following",
            BusinessDayConvention::Preceding => "Preceding",
            BusinessDayConvention::ModifiedPreceding => "Modified Preceding",
        };
        write!(f, "{s}")
    }
}
