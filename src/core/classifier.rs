use crate::domain::model::{LookupOutcome, StatusCategory};

pub const PLACED_TEXT: &str = "Your order has been placed.";
pub const PROCESSING_TEXT: &str = "Your order is currently being processed.";
pub const SHIPPED_TEXT: &str = "Your order has been despatched.";
pub const DELIVERED_TEXT: &str = "Your order has been delivered.";
pub const CANCELLED_TEXT: &str = "It looks like your order has been cancelled.";

/// Maps the tracking service's message text to a category.
///
/// Matching is exact and case-sensitive. Text that matches no known phrase,
/// including the empty string, is `Unrecognized`.
pub fn classify(raw_text: &str) -> StatusCategory {
    match raw_text {
        PLACED_TEXT => StatusCategory::Placed,
        PROCESSING_TEXT => StatusCategory::Processing,
        SHIPPED_TEXT => StatusCategory::Shipped,
        DELIVERED_TEXT => StatusCategory::Delivered,
        CANCELLED_TEXT => StatusCategory::Cancelled,
        _ => StatusCategory::Unrecognized,
    }
}

pub fn categorize(outcome: &LookupOutcome) -> StatusCategory {
    match outcome {
        LookupOutcome::Success { raw_text } => classify(raw_text),
        LookupOutcome::Failure { .. } => StatusCategory::LookupFailed,
    }
}
