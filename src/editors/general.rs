//! Default editor: fare rules shared by most ride services (car/cab, auto, etc.).

use super::FieldBinding;

pub fn fields() -> Vec<FieldBinding> {
    vec![
        FieldBinding::amount("Base fare", "baseFare"),
        FieldBinding::amount("Per km rate", "perKmRate"),
        FieldBinding::amount("Per minute rate", "perMinuteRate"),
        FieldBinding::amount("Minimum fare", "minimumFare"),
        FieldBinding::text("Currency", "currency"),
        // Night charges
        FieldBinding::toggle("Night charges enabled", "nightCharges.enabled"),
        FieldBinding::hour("Night start hour", "nightCharges.startHour"),
        FieldBinding::hour("Night end hour", "nightCharges.endHour"),
        FieldBinding::number("Night multiplier", "nightCharges.multiplier").range(1.0, 5.0),
        // Platform fee split
        FieldBinding::percent("Platform fee %", "platformFee.percentage"),
        FieldBinding::percent("Driver share %", "platformFee.driverShare"),
        FieldBinding::percent("Company share %", "platformFee.companyShare"),
        // Cancellation
        FieldBinding::amount("Cancellation before arrival", "cancellationFees.beforeArrival"),
        FieldBinding::amount("Cancellation after arrival", "cancellationFees.afterArrival"),
        FieldBinding::amount("Cancellation after waiting", "cancellationFees.afterWaitingTime"),
        // Waiting
        FieldBinding::number("Free waiting minutes", "waitingCharges.freeMinutes").range(0.0, 120.0),
        FieldBinding::amount("Waiting per minute", "waitingCharges.perMinuteRate"),
        // Surge levels
        FieldBinding::toggle("Surge enabled", "surgePricing.enabled"),
        FieldBinding::number("Surge level 1", "surgePricing.levels.low").range(1.0, 10.0),
        FieldBinding::number("Surge level 2", "surgePricing.levels.medium").range(1.0, 10.0),
        FieldBinding::number("Surge level 3", "surgePricing.levels.high").range(1.0, 10.0),
        FieldBinding::percent("VAT %", "tax.vatPercentage"),
    ]
}
