//! Bike editor.
//!
//! Shown flat for one vehicle type; the `bike` shape adapter nests the fare
//! fields under `vehicleTypes.<vehicle>` on save.

use super::FieldBinding;

pub fn fields() -> Vec<FieldBinding> {
    vec![
        FieldBinding::amount("Base fare", "baseFare"),
        FieldBinding::amount("Per km rate", "perKmRate"),
        FieldBinding::toggle("Night charges enabled", "nightCharges.enabled"),
        FieldBinding::hour("Night start hour", "nightCharges.startHour"),
        FieldBinding::hour("Night end hour", "nightCharges.endHour"),
        FieldBinding::number("Night multiplier", "nightCharges.multiplier").range(1.0, 5.0),
        FieldBinding::amount("Minimum fare", "minimumFare"),
    ]
}
