use crate::prelude::AlertConfig;
use crate::wire::Distance;

/// Buzzer level for a measured distance: full strength at contact, fading
/// linearly to silence at `max_alert_distance_cm`, silent beyond it.
pub fn derive_aux_intensity(distance: Distance, alert: &AlertConfig) -> u16 {
    let Distance::Echo(cm) = distance else {
        return 0;
    };
    if cm > alert.max_alert_distance_cm {
        return 0;
    }
    let max = f64::from(alert.max_intensity);
    let scaled = (1.0 - cm / alert.max_alert_distance_cm) * max;
    scaled.clamp(0.0, max) as u16
}
