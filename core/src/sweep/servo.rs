use crate::wire::MAX_ANGLE_DEGREES;

/// 16-bit duty for the 0° end of a 50 Hz hobby servo (~0.5 ms pulse).
pub const MIN_DUTY: u16 = 1638;
/// 16-bit duty for the 180° end (~2.5 ms pulse).
pub const MAX_DUTY: u16 = 8192;

/// Positions the sweep head.
pub trait Actuator {
    fn set_angle(&mut self, angle_degrees: f64);
}

/// A PWM output taking a 16-bit duty cycle.
pub trait PwmChannel {
    fn set_duty_u16(&mut self, duty: u16);
}

pub fn angle_to_duty(angle_degrees: f64) -> u16 {
    let fraction = angle_degrees.clamp(0.0, MAX_ANGLE_DEGREES) / MAX_ANGLE_DEGREES;
    MIN_DUTY + (fraction * f64::from(MAX_DUTY - MIN_DUTY)) as u16
}

/// Servo driven directly from a PWM channel.
pub struct PwmServo<C: PwmChannel> {
    channel: C,
}

impl<C: PwmChannel> PwmServo<C> {
    pub fn new(channel: C) -> Self {
        Self { channel }
    }

    pub fn into_inner(self) -> C {
        self.channel
    }
}

impl<C: PwmChannel> Actuator for PwmServo<C> {
    fn set_angle(&mut self, angle_degrees: f64) {
        self.channel.set_duty_u16(angle_to_duty(angle_degrees));
    }
}
