//! Appointment-based services (home surveys, inspections, installations).

use super::FieldBinding;

pub fn fields() -> Vec<FieldBinding> {
    vec![
        FieldBinding::amount("Appointment fee", "appointmentFee"),
        FieldBinding::number("Free cancellation window (h)", "cancellationWindowHours").range(0.0, 168.0),
        FieldBinding::amount("Late cancellation fee", "lateCancellationFee"),
        FieldBinding::toggle("Survey required", "surveyConfig.enabled"),
        FieldBinding::text("Survey title", "surveyConfig.title"),
        FieldBinding::amount("Survey fee", "surveyConfig.fee"),
        FieldBinding::toggle("Survey fee waived on booking", "surveyConfig.waivedOnBooking"),
        FieldBinding::number("Survey duration (min)", "surveyConfig.durationMinutes").range(5.0, 480.0),
        FieldBinding::toggle("Reminders", "reminders.enabled"),
        FieldBinding::number("Remind hours before", "reminders.hoursBefore").range(1.0, 72.0),
    ]
}
