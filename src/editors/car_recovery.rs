//! Car-recovery editor, used for every category/sub-service tier
//! (winching, towing, battery jump-start, key unlocking, ...).

use super::FieldBinding;

pub fn fields() -> Vec<FieldBinding> {
    vec![
        FieldBinding::amount("Base fare", "baseFare"),
        FieldBinding::amount("Per km rate", "perKmRate"),
        FieldBinding::amount("Minimum fare", "minimumFare"),
        FieldBinding::amount("Convenience fee", "convenienceFee"),
        FieldBinding::number("Service radius (km)", "serviceRadiusKm").range(1.0, 500.0),
        FieldBinding::number("Free waiting minutes", "waitingCharges.freeMinutes").range(0.0, 120.0),
        FieldBinding::amount("Waiting per minute", "waitingCharges.perMinuteRate"),
        FieldBinding::toggle("Night charges enabled", "nightCharges.enabled"),
        FieldBinding::hour("Night start hour", "nightCharges.startHour"),
        FieldBinding::hour("Night end hour", "nightCharges.endHour"),
        FieldBinding::number("Night multiplier", "nightCharges.multiplier").range(1.0, 5.0),
        FieldBinding::amount("Cancellation fee", "cancellationFee"),
        FieldBinding::percent("Platform fee %", "platformFee.percentage"),
    ]
}
