//! Digital input adapter.
//!
//! [`GpioInput`] is an `embedded-hal` [`InputPin`] over one ESP32 GPIO,
//! configured with raw ESP-IDF sys calls.  [`sensor_bank`] configures all
//! five inputs from the board pin map and hands them to a [`SensorBank`].
//!
//! On non-espidf targets each pin is a shared simulated level; clone a
//! pin's [`SimLevel`] handle to drive it from a test.

use core::convert::Infallible;
use core::fmt;

use embedded_hal::digital::{ErrorType, InputPin};
use log::info;

use crate::sensors::{Polarity, SensorBank, SensorId};

#[cfg(target_os = "espidf")]
use esp_idf_sys::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpioConfigError {
    pub gpio: i32,
    pub rc: i32,
}

impl fmt::Display for GpioConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GPIO{} config failed (rc={})", self.gpio, self.rc)
    }
}

impl std::error::Error for GpioConfigError {}

/// Simulated line level, shared between a [`GpioInput`] and the test
/// that drives it.
#[cfg(not(target_os = "espidf"))]
#[derive(Debug, Clone)]
pub struct SimLevel(std::rc::Rc<core::cell::Cell<bool>>);

#[cfg(not(target_os = "espidf"))]
impl SimLevel {
    pub fn set_high(&self) {
        self.0.set(true);
    }

    pub fn set_low(&self) {
        self.0.set(false);
    }

    pub fn is_high(&self) -> bool {
        self.0.get()
    }
}

pub struct GpioInput {
    gpio: i32,
    #[cfg(not(target_os = "espidf"))]
    level: SimLevel,
}

impl GpioInput {
    /// Configure `gpio` as an input, with the internal pull-up if asked.
    #[cfg(target_os = "espidf")]
    pub fn new(gpio: i32, pull_up: bool) -> Result<Self, GpioConfigError> {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << gpio,
            mode: gpio_mode_t_GPIO_MODE_INPUT,
            pull_up_en: if pull_up {
                gpio_pullup_t_GPIO_PULLUP_ENABLE
            } else {
                gpio_pullup_t_GPIO_PULLUP_DISABLE
            },
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        // SAFETY: called once per pin from the boot path.
        let rc = unsafe { gpio_config(&cfg) };
        if rc != ESP_OK as i32 {
            return Err(GpioConfigError { gpio, rc });
        }
        Ok(Self { gpio })
    }

    /// Simulated input.  Idles high when pulled up, low otherwise.
    #[cfg(not(target_os = "espidf"))]
    pub fn new(gpio: i32, pull_up: bool) -> Result<Self, GpioConfigError> {
        Ok(Self {
            gpio,
            level: SimLevel(std::rc::Rc::new(core::cell::Cell::new(pull_up))),
        })
    }

    pub fn gpio(&self) -> i32 {
        self.gpio
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn sim_level(&self) -> SimLevel {
        self.level.clone()
    }

    #[cfg(target_os = "espidf")]
    fn level(&self) -> bool {
        // SAFETY: read-only register access on a configured input.
        (unsafe { gpio_get_level(self.gpio) }) != 0
    }

    #[cfg(not(target_os = "espidf"))]
    fn level(&self) -> bool {
        self.level.is_high()
    }
}

impl ErrorType for GpioInput {
    type Error = Infallible;
}

impl InputPin for GpioInput {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.level())
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(!self.level())
    }
}

/// Configure the five sensor inputs: contacts pulled up, motion floating.
pub fn sensor_bank() -> Result<SensorBank<GpioInput>, GpioConfigError> {
    let input = |id: SensorId| GpioInput::new(id.gpio(), id.polarity() == Polarity::ActiveLow);
    let pins = [
        input(SensorId::ALL[0])?,
        input(SensorId::ALL[1])?,
        input(SensorId::ALL[2])?,
        input(SensorId::ALL[3])?,
        input(SensorId::ALL[4])?,
    ];
    info!("GPIO: sensor inputs configured");
    Ok(SensorBank::new(pins))
}
