//! Door-open flag and the LED flashing ticker.
//!
//! The ticker runs as a tokio task on its own schedule. The only state it
//! shares with the control loop is [`DoorFlag`], which the controller writes
//! on transitions and the ticker reads before each toggle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use doorlock_core::saturating_millis;
use doorlock_hardware::{HardwareError, Indicator, LedPin, Result};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::debug;

/// Door-open flag shared between the controller and the flash ticker.
///
/// Cloning shares the flag. Only the controller crate can write it.
#[derive(Debug, Clone, Default)]
pub struct DoorFlag(Arc<AtomicBool>);

impl DoorFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub(crate) fn set_open(&self, open: bool) {
        self.0.store(open, Ordering::Release);
    }
}

/// [`Indicator`] driving a single LED pin, flashing from a tokio task.
///
/// `set_flashing` needs a tokio runtime; calling it outside one is an
/// `Unsupported` error.
pub struct FlashingIndicator<P: LedPin> {
    led: Arc<Mutex<P>>,
    door: DoorFlag,
    ticker: Option<JoinHandle<()>>,
}

impl<P: LedPin> FlashingIndicator<P> {
    pub fn new(led: P, door: DoorFlag) -> Self {
        Self {
            led: Arc::new(Mutex::new(led)),
            door,
            ticker: None,
        }
    }

    pub fn is_flashing(&self) -> bool {
        self.ticker
            .as_ref()
            .is_some_and(|ticker| !ticker.is_finished())
    }

    pub fn is_lit(&self) -> bool {
        self.led
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_on()
    }

    fn abort_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

impl<P: LedPin> Indicator for FlashingIndicator<P> {
    fn set_solid(&mut self, on: bool) -> Result<()> {
        self.led
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .write(on);
        Ok(())
    }

    fn set_flashing(&mut self, period: Duration) -> Result<()> {
        let half = period / 2;
        if half.is_zero() {
            return Err(HardwareError::configuration(format!(
                "flash period too short: {period:?}"
            )));
        }
        let runtime = Handle::try_current()
            .map_err(|_| HardwareError::unsupported("flashing outside a tokio runtime"))?;

        self.abort_ticker();

        let led = Arc::clone(&self.led);
        let door = self.door.clone();
        self.ticker = Some(runtime.spawn(async move {
            let mut interval = tokio::time::interval(half);
            // first tick completes immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                // flag is read under the pin lock so no toggle lands after `set_solid`
                let mut led = led.lock().unwrap_or_else(PoisonError::into_inner);
                if door.is_open() {
                    led.toggle();
                }
            }
        }));

        debug!(period_ms = saturating_millis(period), "flash ticker started");
        Ok(())
    }

    fn stop_flashing(&mut self) -> Result<()> {
        if self.ticker.is_some() {
            debug!("flash ticker stopped");
        }
        self.abort_ticker();
        Ok(())
    }
}

impl<P: LedPin> Drop for FlashingIndicator<P> {
    fn drop(&mut self) {
        self.abort_ticker();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doorlock_hardware::mock::MockLed;

    const PERIOD: Duration = Duration::from_millis(500);

    fn indicator(open: bool) -> (FlashingIndicator<MockLed>, MockLed, DoorFlag) {
        let led = MockLed::new();
        let flag = DoorFlag::new();
        flag.set_open(open);
        (FlashingIndicator::new(led.clone(), flag.clone()), led, flag)
    }

    #[test]
    fn test_door_flag_is_shared() {
        let flag = DoorFlag::new();
        let reader = flag.clone();
        assert!(!reader.is_open());

        flag.set_open(true);
        assert!(reader.is_open());
    }

    #[test]
    fn test_solid_drives_pin() {
        let (mut indicator, led, _flag) = indicator(false);

        indicator.set_solid(true).unwrap();
        assert!(led.is_on());
        assert!(indicator.is_lit());

        indicator.set_solid(false).unwrap();
        assert!(!led.is_on());
    }

    #[test]
    fn test_flashing_requires_runtime() {
        let (mut indicator, _led, _flag) = indicator(true);

        let err = indicator.set_flashing(PERIOD).unwrap_err();
        assert!(matches!(err, HardwareError::Unsupported { .. }));
        assert!(!indicator.is_flashing());
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_period_rejected() {
        let (mut indicator, _led, _flag) = indicator(true);

        let err = indicator.set_flashing(Duration::ZERO).unwrap_err();
        assert!(matches!(err, HardwareError::ConfigurationError { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_toggles_every_half_period_while_open() {
        let (mut indicator, led, _flag) = indicator(true);

        indicator.set_flashing(PERIOD).unwrap();
        assert!(indicator.is_flashing());

        // ticks at 250, 500, 750 and 1000 ms
        tokio::time::sleep(Duration::from_millis(1010)).await;
        assert_eq!(led.transitions(), 4);
        assert!(!led.is_on());
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_door_suppresses_toggle() {
        let (mut indicator, led, flag) = indicator(false);

        indicator.set_flashing(PERIOD).unwrap();
        tokio::time::sleep(Duration::from_millis(1010)).await;
        assert_eq!(led.transitions(), 0);

        flag.set_open(true);
        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(led.transitions(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_flashing_halts_ticker() {
        let (mut indicator, led, _flag) = indicator(true);

        indicator.set_flashing(PERIOD).unwrap();
        tokio::time::sleep(Duration::from_millis(260)).await;
        assert_eq!(led.transitions(), 1);

        indicator.stop_flashing().unwrap();
        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(led.transitions(), 1);
        assert!(!indicator.is_flashing());
    }

    /// Counts toggles that land after the door was secured.
    #[derive(Clone, Default)]
    struct SealedLed {
        on: Arc<AtomicBool>,
        sealed: Arc<AtomicBool>,
        late_toggles: Arc<std::sync::atomic::AtomicU64>,
    }

    impl LedPin for SealedLed {
        fn write(&mut self, on: bool) {
            self.on.store(on, Ordering::SeqCst);
        }

        fn is_on(&self) -> bool {
            self.on.load(Ordering::SeqCst)
        }

        fn toggle(&mut self) {
            if self.sealed.load(Ordering::SeqCst) {
                self.late_toggles.fetch_add(1, Ordering::SeqCst);
            }
            let on = self.is_on();
            self.write(!on);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_no_toggle_after_door_secured() {
        let led = SealedLed::default();
        let flag = DoorFlag::new();
        let mut indicator = FlashingIndicator::new(led.clone(), flag.clone());

        for _ in 0..50 {
            led.sealed.store(false, Ordering::SeqCst);
            flag.set_open(true);
            indicator.set_flashing(Duration::from_millis(2)).unwrap();
            tokio::time::sleep(Duration::from_millis(3)).await;

            // same order as the controller closing the door
            flag.set_open(false);
            indicator.stop_flashing().unwrap();
            indicator.set_solid(true).unwrap();
            led.sealed.store(true, Ordering::SeqCst);

            tokio::time::sleep(Duration::from_millis(3)).await;
            assert!(led.is_on(), "LED left off after closing");
        }
        assert_eq!(led.late_toggles.load(Ordering::SeqCst), 0);
    }
}
