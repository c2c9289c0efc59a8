//! Hysteresis decision function.
//!
//! A [`HysteresisBand`] maps (measured temperature, actuator state) to a
//! switching request. It is pure: it never mutates anything and never
//! touches hardware. One band per actuator, both sharing the setpoint.
//!
//! Heating side: on-threshold = setpoint − on_hyst, off-threshold =
//! setpoint − off_hyst (the warmer bound). Cooling side mirrors above the
//! setpoint. `on_hyst > off_hyst` gives the dead band that prevents
//! oscillation at the threshold.

/// Which side of the setpoint the actuator works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Turns on below the setpoint (heater).
    Heat,
    /// Turns on above the setpoint (cooler).
    Cool,
}

/// Switching request for one actuator. Exactly one is returned per
/// evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    /// Ask the actuator to switch on.
    On,
    /// Ask the actuator to switch off.
    Off,
    /// Leave the actuator alone.
    None,
}

/// Per-actuator hysteresis parameters.
#[derive(Debug, Clone, Copy)]
pub struct HysteresisBand {
    side: Side,
    setpoint: f32,
    on_hyst: f32,
    off_hyst: f32,
}

impl HysteresisBand {
    /// Callers must guarantee `on_hyst > off_hyst >= 0`
    /// ([`FridgeConfig::validate`](crate::config::FridgeConfig::validate)
    /// enforces this at load time).
    pub fn new(side: Side, setpoint: f32, on_hyst: f32, off_hyst: f32) -> Self {
        Self {
            side,
            setpoint,
            on_hyst,
            off_hyst,
        }
    }

    /// Temperature at which an idle actuator is asked to switch on.
    pub fn on_threshold(&self) -> f32 {
        match self.side {
            Side::Heat => self.setpoint - self.on_hyst,
            Side::Cool => self.setpoint + self.on_hyst,
        }
    }

    /// Temperature past which a running actuator is asked to switch off.
    pub fn off_threshold(&self) -> f32 {
        match self.side {
            Side::Heat => self.setpoint - self.off_hyst,
            Side::Cool => self.setpoint + self.off_hyst,
        }
    }

    /// Evaluate the band for the current measurement and actuator state.
    ///
    /// The on-check only applies to an idle actuator and the off-check only
    /// to a running one, so the two guards are mutually exclusive for any
    /// single evaluation.
    pub fn decide(&self, temp: f32, is_on: bool) -> Request {
        match self.side {
            Side::Heat => {
                if !is_on && temp < self.on_threshold() {
                    return Request::On;
                }
                if is_on && temp > self.off_threshold() {
                    return Request::Off;
                }
            }
            Side::Cool => {
                if !is_on && temp > self.on_threshold() {
                    return Request::On;
                }
                if is_on && temp < self.off_threshold() {
                    return Request::Off;
                }
            }
        }
        Request::None
    }
}
