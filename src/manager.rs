//! Effects manager - the orchestrator
//!
//! Owns the strip, the registry, the live effect and the fade-out behind a
//! single async mutex. Every public operation goes through that lock:
//! control operations wait up to [`LockTimeouts::control`], the per-frame
//! [`EffectsManager::update`] waits at most [`LockTimeouts::frame`] and skips
//! the frame otherwise.
//!
//! State machine: Idle → Running → Fading → Idle. `start` is accepted in any
//! state, `stop` forces Idle.

use core::cell::Cell;

use embassy_sync::{
    blocking_mutex::raw::CriticalSectionRawMutex,
    mutex::{Mutex, MutexGuard},
};
use embassy_time::{Duration, Instant, with_timeout};
#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::{
    MAX_PIXELS, OutputDriver,
    board::PinTable,
    config::EffectsConfig,
    effect::{EffectCounters, EffectKind, EffectSlot, Palette},
    error::{ConfigError, EffectError, LockTimeout},
    fade::{FADE_DURATION, FadeOut},
    frame_scheduler::{DEFAULT_REFRESH_RATE_HZ, FrameScheduler},
    registry::EffectRegistry,
    strip::{LedStrip, StripConfig},
};

/// How long each kind of caller may wait for the engine lock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockTimeouts {
    /// start / stop / reconfigure / queries
    pub control: Duration,
    /// per-frame tick
    pub frame: Duration,
}

impl LockTimeouts {
    pub const DEFAULT: Self = Self {
        control: Duration::from_millis(1500),
        frame: Duration::from_millis(20),
    };
}

impl Default for LockTimeouts {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// What a call to [`EffectsManager::update`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Lock was busy, frame skipped
    Skipped,
    /// No effect running
    Idle,
    /// Frame interval has not elapsed yet
    NotDue,
    /// Effect rendered a frame
    Rendered,
    /// Cycle target reached, fade-out began this frame
    FadeStarted,
    /// Fade-out frame rendered
    Fading,
    /// Fade-out finished, strip cleared
    Finished,
    /// Strip state was invalid, effect stopped
    Aborted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Running,
    Fading,
}

/// Consistent snapshot of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineStatus {
    pub state: EngineState,
    pub effect: Option<&'static str>,
    pub completed_cycles: u32,
    /// 0 means unbounded
    pub target_cycles: u32,
    pub remaining: Duration,
}

/// Lifetime counters, mostly for diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStats {
    pub effects_created: u32,
    pub effects_released: u32,
    pub frames_pushed: u32,
    /// Ticks dropped because the lock was busy
    pub frames_skipped: u32,
}

impl EngineStats {
    /// Effect instances currently alive
    pub const fn live_effects(&self) -> u32 {
        self.effects_created - self.effects_released
    }
}

#[derive(Debug, Clone)]
enum Phase {
    Running,
    Fading(FadeOut),
}

/// The live effect and everything needed to drive it
#[derive(Debug)]
struct EffectSession {
    kind: EffectKind,
    effect: EffectSlot,
    palette: Palette,
    counters: EffectCounters,
    target_cycles: u32,
    completed_cycles: u32,
    started_at: Instant,
    last_cycle_at: Option<Instant>,
    phase: Phase,
}

impl EffectSession {
    fn new(
        kind: EffectKind,
        effect: EffectSlot,
        palette: Palette,
        target_cycles: u32,
        now: Instant,
    ) -> Self {
        Self {
            kind,
            effect,
            palette,
            counters: EffectCounters::default(),
            target_cycles,
            completed_cycles: 0,
            started_at: now,
            last_cycle_at: None,
            phase: Phase::Running,
        }
    }

    fn state(&self) -> EngineState {
        match self.phase {
            Phase::Running => EngineState::Running,
            Phase::Fading(_) => EngineState::Fading,
        }
    }

    fn target_reached(&self) -> bool {
        self.target_cycles > 0 && self.completed_cycles >= self.target_cycles
    }

    /// Take the effect's own cycle count, never past the target
    fn record_cycles(&mut self, now: Instant) {
        let reported = if self.target_cycles > 0 {
            self.counters.cycles.min(self.target_cycles)
        } else {
            self.counters.cycles
        };
        if reported > self.completed_cycles {
            self.completed_cycles = reported;
            self.last_cycle_at = Some(now);
        }
    }

    /// Render one frame into `strip`
    fn advance<D: OutputDriver>(&mut self, strip: &mut LedStrip<D>, now: Instant) -> TickOutcome {
        if let Phase::Fading(fade) = &self.phase {
            if fade.is_complete(now) {
                return TickOutcome::Finished;
            }
            fade.render_into(strip.pixels_mut(), now);
            strip.show();
            return TickOutcome::Fading;
        }

        let keep_running = self
            .effect
            .update(strip.pixels_mut(), &mut self.counters, &self.palette);
        self.record_cycles(now);
        strip.show();

        if self.target_reached() || !keep_running {
            self.phase = Phase::Fading(FadeOut::capture(strip.pixels(), now));
            return TickOutcome::FadeStarted;
        }
        TickOutcome::Rendered
    }

    /// Estimated time until the engine is idle again; zero when unknown
    fn remaining(&self, now: Instant) -> Duration {
        let zero = Duration::from_ticks(0);
        match &self.phase {
            Phase::Fading(fade) => fade.remaining(now),
            Phase::Running => {
                let Some(last_cycle_at) = self.last_cycle_at else {
                    return zero;
                };
                if self.target_cycles == 0 || self.completed_cycles == 0 {
                    return zero;
                }
                let per_cycle = last_cycle_at
                    .saturating_duration_since(self.started_at)
                    .as_ticks()
                    / u64::from(self.completed_cycles);
                let left = u64::from(self.target_cycles - self.completed_cycles);
                let since_last = now.saturating_duration_since(last_cycle_at).as_ticks();
                let running = (per_cycle * left).saturating_sub(since_last);
                Duration::from_ticks(running) + FADE_DURATION
            }
        }
    }
}

/// Everything behind the lock
struct Engine<D: OutputDriver> {
    strip: Option<LedStrip<D>>,
    registry: EffectRegistry,
    scheduler: FrameScheduler,
    session: Option<EffectSession>,
    stats: EngineStats,
}

impl<D: OutputDriver> Engine<D> {
    const fn new() -> Self {
        Self {
            strip: None,
            registry: EffectRegistry::new(EffectsConfig::DEFAULT),
            scheduler: FrameScheduler::from_refresh_rate(DEFAULT_REFRESH_RATE_HZ),
            session: None,
            stats: EngineStats {
                effects_created: 0,
                effects_released: 0,
                frames_pushed: 0,
                frames_skipped: 0,
            },
        }
    }

    fn install(
        &mut self,
        driver: D,
        config: &StripConfig,
        effects: EffectsConfig,
        pins: &PinTable,
    ) -> Result<(), ConfigError> {
        let strip = LedStrip::bind(driver, config, pins)?;
        self.release_session();
        self.strip = Some(strip);
        self.apply(config, effects);
        Ok(())
    }

    fn rebind(
        &mut self,
        config: &StripConfig,
        effects: EffectsConfig,
        pins: &PinTable,
    ) -> Result<(), ConfigError> {
        let Some(strip) = self.strip.as_mut() else {
            return Err(ConfigError::NotInitialized);
        };
        strip.rebind(config, pins)?;
        self.release_session();
        self.apply(config, effects);
        Ok(())
    }

    fn apply(&mut self, config: &StripConfig, effects: EffectsConfig) {
        self.registry.update_config(effects);
        self.scheduler = FrameScheduler::from_refresh_rate(config.refresh_rate_hz);
        self.blank();

        #[cfg(feature = "esp32-log")]
        println!(
            "[EffectsManager.initialize] GPIO{} leds={} brightness={} refresh={}Hz",
            config.pin, config.led_count, config.brightness, config.refresh_rate_hz
        );
    }

    fn start(
        &mut self,
        name: &str,
        cycles: u32,
        palette: Option<Palette>,
        now: Instant,
    ) -> Result<EffectKind, EffectError> {
        let Some(led_count) = self.strip.as_ref().map(LedStrip::len) else {
            return Err(EffectError::NotInitialized);
        };
        let Some(kind) = self.registry.lookup(name) else {
            #[cfg(feature = "esp32-log")]
            println!("[EffectsManager.start] unknown effect: {}", name);
            return Err(EffectError::UnknownEffect);
        };
        if cycles > 0 && !kind.is_cycle_based() {
            return Err(EffectError::NotCycleBased);
        }
        let palette = palette.unwrap_or_else(|| self.registry.default_colors(kind));

        // The previous instance is gone before the next one is built.
        self.release_session();

        let mut effect = self.registry.create(kind);
        effect.initialize(led_count);
        self.stats.effects_created += 1;
        self.session = Some(EffectSession::new(kind, effect, palette, cycles, now));
        self.scheduler.reset();
        if let Some(strip) = self.strip.as_mut() {
            strip.clear();
        }

        #[cfg(feature = "esp32-log")]
        println!(
            "[EffectsManager.start] {} cycles={} leds={}",
            kind.as_str(),
            cycles,
            led_count
        );
        Ok(kind)
    }

    fn tick(&mut self, now: Instant) -> TickOutcome {
        if self.session.is_none() {
            return TickOutcome::Idle;
        }
        let led_count = self.strip.as_ref().map_or(0, LedStrip::len);
        if led_count == 0 || led_count > MAX_PIXELS {
            #[cfg(feature = "esp32-log")]
            println!(
                "[EffectsManager.update] invalid pixel count {}, stopping",
                led_count
            );
            self.halt();
            return TickOutcome::Aborted;
        }
        if !self.scheduler.is_due(now) {
            return TickOutcome::NotDue;
        }
        self.scheduler.mark(now);

        let (Some(session), Some(strip)) = (self.session.as_mut(), self.strip.as_mut()) else {
            return TickOutcome::Idle;
        };
        let outcome = session.advance(strip, now);
        match outcome {
            TickOutcome::FadeStarted => {
                #[cfg(feature = "esp32-log")]
                println!(
                    "[EffectsManager.update] {} done after {} cycles, fading out",
                    session.kind.as_str(),
                    session.completed_cycles
                );
            }
            TickOutcome::Finished => {
                #[cfg(feature = "esp32-log")]
                println!("[EffectsManager.update] fade-out complete");
                self.release_session();
                self.blank();
            }
            _ => {}
        }
        self.sync_stats();
        outcome
    }

    /// Drop the live effect and its fade snapshot, if any
    fn release_session(&mut self) {
        let Some(_released) = self.session.take() else {
            return;
        };
        self.stats.effects_released += 1;
        #[cfg(feature = "esp32-log")]
        println!("[EffectsManager.release] {}", _released.kind.as_str());
    }

    /// Clear the buffer and push it
    fn blank(&mut self) {
        if let Some(strip) = self.strip.as_mut() {
            strip.clear();
            strip.show();
        }
        self.sync_stats();
    }

    /// Any state → Idle; the strip is cleared and pushed twice
    fn halt(&mut self) {
        self.release_session();
        self.blank();
        self.blank();
        self.scheduler.reset();
    }

    fn sync_stats(&mut self) {
        if let Some(strip) = self.strip.as_ref() {
            self.stats.frames_pushed = strip.pushes();
        }
    }

    fn status(&self, now: Instant) -> EngineStatus {
        match &self.session {
            None => EngineStatus {
                state: EngineState::Idle,
                effect: None,
                completed_cycles: 0,
                target_cycles: 0,
                remaining: Duration::from_ticks(0),
            },
            Some(session) => EngineStatus {
                state: session.state(),
                effect: Some(session.kind.as_str()),
                completed_cycles: session.completed_cycles,
                target_cycles: session.target_cycles,
                remaining: session.remaining(now),
            },
        }
    }
}

/// Process-wide effects engine for one strip.
///
/// `const`-constructible so it can live in a `static`:
///
/// ```ignore
/// static LEDS: EffectsManager<MyDriver> = EffectsManager::new(&ESP32C3_MINI);
/// ```
pub struct EffectsManager<D: OutputDriver> {
    engine: Mutex<CriticalSectionRawMutex, Engine<D>>,
    /// Ticks that timed out waiting for `engine`
    skipped: critical_section::Mutex<Cell<u32>>,
    pins: &'static PinTable,
    timeouts: LockTimeouts,
}

impl<D: OutputDriver> EffectsManager<D> {
    pub const fn new(pins: &'static PinTable) -> Self {
        Self::with_timeouts(pins, LockTimeouts::DEFAULT)
    }

    pub const fn with_timeouts(pins: &'static PinTable, timeouts: LockTimeouts) -> Self {
        Self {
            engine: Mutex::new(Engine::new()),
            skipped: critical_section::Mutex::new(Cell::new(0)),
            pins,
            timeouts,
        }
    }

    pub const fn pins(&self) -> &'static PinTable {
        self.pins
    }

    pub const fn timeouts(&self) -> LockTimeouts {
        self.timeouts
    }

    async fn lock(
        &self,
        timeout: Duration,
    ) -> Result<MutexGuard<'_, CriticalSectionRawMutex, Engine<D>>, LockTimeout> {
        with_timeout(timeout, self.engine.lock())
            .await
            .map_err(|_| LockTimeout)
    }

    async fn lock_control(
        &self,
        _op: &str,
    ) -> Result<MutexGuard<'_, CriticalSectionRawMutex, Engine<D>>, LockTimeout> {
        let guard = self.lock(self.timeouts.control).await;
        #[cfg(feature = "esp32-log")]
        if guard.is_err() {
            println!("[EffectsManager.{}] lock timeout", _op);
        }
        guard
    }

    /// Bind the strip to `driver` and load the effect parameters.
    ///
    /// Any running effect is stopped. On error nothing changes.
    pub async fn initialize(
        &self,
        driver: D,
        config: &StripConfig,
        effects: EffectsConfig,
    ) -> Result<(), ConfigError> {
        let mut engine = self.lock_control("initialize").await?;
        engine.install(driver, config, effects, self.pins)
    }

    /// Rebind the existing driver with a new pin, size or rate.
    pub async fn reinitialize(
        &self,
        config: &StripConfig,
        effects: EffectsConfig,
    ) -> Result<(), ConfigError> {
        let mut engine = self.lock_control("reinitialize").await?;
        engine.rebind(config, effects, self.pins)
    }

    /// Start `name` for `cycles` cycles (0 = until stopped) with explicit colors.
    ///
    /// Replaces whatever was running, including a fade in progress. On error
    /// the previous effect keeps running untouched.
    pub async fn start_effect_cycles(
        &self,
        name: &str,
        cycles: u32,
        palette: Palette,
        now: Instant,
    ) -> Result<EffectKind, EffectError> {
        let mut engine = self.lock_control("start").await?;
        engine.start(name, cycles, Some(palette), now)
    }

    /// Same as [`Self::start_effect_cycles`] with the effect's default colors
    pub async fn start_effect_cycles_auto(
        &self,
        name: &str,
        cycles: u32,
        now: Instant,
    ) -> Result<EffectKind, EffectError> {
        let mut engine = self.lock_control("start").await?;
        engine.start(name, cycles, None, now)
    }

    /// Stop immediately and leave the strip dark
    pub async fn stop_effect(&self) -> Result<(), LockTimeout> {
        let mut engine = self.lock_control("stop").await?;
        engine.halt();
        #[cfg(feature = "esp32-log")]
        println!("[EffectsManager.stop] strip off");
        Ok(())
    }

    /// Per-frame tick; call once per main loop iteration.
    ///
    /// Never blocks longer than [`LockTimeouts::frame`].
    pub async fn update(&self, now: Instant) -> TickOutcome {
        match self.lock(self.timeouts.frame).await {
            Ok(mut engine) => engine.tick(now),
            Err(LockTimeout) => {
                critical_section::with(|cs| {
                    let skipped = self.skipped.borrow(cs);
                    skipped.set(skipped.get().wrapping_add(1));
                });
                TickOutcome::Skipped
            }
        }
    }

    /// Replace the effect parameter table. Applies to the next effect started.
    pub async fn update_effect_config(&self, config: EffectsConfig) -> Result<(), LockTimeout> {
        let mut engine = self.lock_control("update_config").await?;
        engine.registry.update_config(config);
        Ok(())
    }

    pub async fn effects_config(&self) -> Result<EffectsConfig, LockTimeout> {
        let engine = self.lock_control("effects_config").await?;
        Ok(*engine.registry.config())
    }

    /// Reseed randomized effects
    pub async fn reseed(&self, seed: u64) -> Result<(), LockTimeout> {
        let mut engine = self.lock_control("reseed").await?;
        engine.registry.reseed(seed);
        Ok(())
    }

    pub async fn set_brightness(&self, brightness: u8) -> Result<(), EffectError> {
        let mut engine = self.lock_control("set_brightness").await?;
        let strip = engine.strip.as_mut().ok_or(EffectError::NotInitialized)?;
        strip.set_brightness(brightness);
        Ok(())
    }

    pub async fn is_effect_running(&self) -> Result<bool, LockTimeout> {
        let engine = self.lock_control("is_running").await?;
        Ok(engine.session.is_some())
    }

    pub async fn current_effect_name(&self) -> Result<Option<&'static str>, LockTimeout> {
        let engine = self.lock_control("current_effect").await?;
        Ok(engine.session.as_ref().map(|s| s.kind.as_str()))
    }

    /// Estimated time until idle, including the fade-out.
    ///
    /// Zero when idle, unbounded, or before the first cycle completed.
    pub async fn remaining_time(&self, now: Instant) -> Result<Duration, LockTimeout> {
        let engine = self.lock_control("remaining_time").await?;
        Ok(engine.status(now).remaining)
    }

    pub async fn status(&self, now: Instant) -> Result<EngineStatus, LockTimeout> {
        let engine = self.lock_control("status").await?;
        Ok(engine.status(now))
    }

    pub async fn stats(&self) -> Result<EngineStats, LockTimeout> {
        let engine = self.lock_control("stats").await?;
        let mut stats = engine.stats;
        stats.frames_skipped = critical_section::with(|cs| self.skipped.borrow(cs).get());
        Ok(stats)
    }

    /// Names the registry accepts
    pub fn available_effects(&self) -> impl Iterator<Item = &'static str> {
        EffectKind::ALL.into_iter().map(EffectKind::as_str)
    }
}

#[cfg(test)]
mod tests {
    use embassy_futures::block_on;

    use super::*;
    use crate::{board::ESP32C3_MINI, color::Rgb};

    struct NullDriver;

    impl OutputDriver for NullDriver {
        fn write(&mut self, _colors: &[Rgb]) {}
    }

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    fn manager() -> EffectsManager<NullDriver> {
        let timeouts = LockTimeouts {
            control: Duration::from_millis(5),
            frame: Duration::from_millis(5),
        };
        let manager = EffectsManager::with_timeouts(&ESP32C3_MINI, timeouts);
        let strip = StripConfig::new(20, 16);
        let init = manager.initialize(NullDriver, &strip, EffectsConfig::DEFAULT);
        block_on(init).unwrap();
        manager
    }

    #[test]
    fn test_update_skips_frame_when_busy() {
        let manager = manager();
        block_on(manager.start_effect_cycles_auto("pulse", 0, at(0))).unwrap();

        let guard = manager.engine.try_lock().unwrap();
        assert_eq!(block_on(manager.update(at(0))), TickOutcome::Skipped);
        drop(guard);

        assert_eq!(block_on(manager.update(at(0))), TickOutcome::Rendered);
        assert_eq!(block_on(manager.stats()).unwrap().frames_skipped, 1);
    }

    #[test]
    fn test_control_reports_lock_timeout() {
        let manager = manager();
        let guard = manager.engine.try_lock().unwrap();
        assert_eq!(block_on(manager.stop_effect()), Err(LockTimeout));
        assert_eq!(
            block_on(manager.start_effect_cycles_auto("rainbow", 1, at(0))),
            Err(EffectError::LockTimeout)
        );
        drop(guard);
        assert_eq!(block_on(manager.is_effect_running()), Ok(false));
    }

    #[test]
    fn test_corrupt_pixel_count_aborts() {
        let manager = manager();
        block_on(manager.start_effect_cycles_auto("rainbow", 0, at(0))).unwrap();
        {
            let mut engine = manager.engine.try_lock().unwrap();
            if let Some(strip) = engine.strip.as_mut() {
                strip.len = MAX_PIXELS + 1;
            }
        }
        assert_eq!(block_on(manager.update(at(0))), TickOutcome::Aborted);
        assert_eq!(block_on(manager.is_effect_running()), Ok(false));
    }
}
