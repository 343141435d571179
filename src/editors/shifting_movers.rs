//! Shifting & movers editor.
//!
//! Service-wide charges sit at the root of the subtree; fares differ per truck
//! and live under `vehicleTypes.<vehicle>`.

use super::FieldBinding;

pub fn fields() -> Vec<FieldBinding> {
    vec![
        FieldBinding::amount("Per floor charge", "loadingUnloading.perFloorCharge"),
        FieldBinding::percent("Lift discount %", "loadingUnloading.liftDiscount"),
        FieldBinding::toggle("Packing materials", "packingMaterials.enabled"),
        FieldBinding::amount("Packing charge", "packingMaterials.charge"),
        FieldBinding::toggle("Insurance offered", "insurance.enabled"),
        FieldBinding::percent("Insurance % of goods value", "insurance.percentage"),
        FieldBinding::amount("Base fare", "baseFare").per_vehicle(),
        FieldBinding::amount("Per km rate", "perKmRate").per_vehicle(),
        FieldBinding::amount("Minimum fare", "minimumFare").per_vehicle(),
        FieldBinding::amount("Capacity (kg)", "capacityKg").per_vehicle(),
        FieldBinding::number("Helpers included", "helpersIncluded").range(0.0, 10.0).per_vehicle(),
        FieldBinding::amount("Extra helper charge", "extraHelperCharge").per_vehicle(),
    ]
}
