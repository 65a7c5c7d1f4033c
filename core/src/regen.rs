use core::time::Duration;
use parking_lot::{Condvar, Mutex, MutexGuard};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;

use crate::*;

/// Accumulates elapsed time into whole regeneration ticks, for hosts that drive the game from a frame loop.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RegenClock {
    period: Duration,
    elapsed: Duration,
}

impl RegenClock {
    pub const fn new(period: Duration) -> Self {
        Self {
            period,
            elapsed: Duration::ZERO,
        }
    }

    /// Adds `dt` and returns how many full periods have passed.
    pub fn advance(&mut self, dt: Duration) -> u32 {
        if self.period.is_zero() {
            return 0;
        }

        self.elapsed += dt;
        let mut ticks = 0;
        while self.elapsed >= self.period {
            self.elapsed -= self.period;
            ticks += 1;
        }
        ticks
    }

    pub fn clear(&mut self) {
        self.elapsed = Duration::ZERO;
    }
}

#[derive(Debug)]
struct SharedState<G> {
    engine: Mutex<ExcavationEngine<G>>,
    wake: Condvar,
}

#[derive(Debug)]
struct Session<G> {
    state: SharedState<G>,
    clock: Mutex<RegenClock>,
    stopped: Mutex<bool>,
    /// Bumped whenever energy changes outside a regeneration tick.
    rearms: Mutex<u64>,
}

/// Engine handle that serialises excavations, resets and regeneration ticks behind one lock.
#[derive(Debug)]
pub struct SharedEngine<G = RandomGridGenerator> {
    session: Arc<Session<G>>,
}

impl<G> Clone for SharedEngine<G> {
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
        }
    }
}

impl<G: GridGenerator> SharedEngine<G> {
    pub fn new(engine: ExcavationEngine<G>) -> Self {
        let clock = RegenClock::new(engine.config().regen_period());
        Self {
            session: Arc::new(Session {
                state: SharedState {
                    engine: Mutex::new(engine),
                    wake: Condvar::new(),
                },
                clock: Mutex::new(clock),
                stopped: Mutex::new(false),
                rearms: Mutex::new(0),
            }),
        }
    }

    pub fn excavate(&self, id: TileId) -> Result<ExcavateOutcome> {
        let mut engine = self.lock();
        let outcome = engine.excavate(id)?;
        if outcome.has_update() {
            // energy was spent, the countdown starts over from this dig
            self.rearm();
        }
        Ok(outcome)
    }

    pub fn reset(&self) {
        let mut engine = self.lock();
        engine.reset();
        self.session.clock.lock().clear();
        self.rearm();
    }

    pub fn snapshot(&self) -> ResourceSnapshot {
        self.lock().snapshot()
    }

    /// Runs `f` with exclusive access to the engine.
    ///
    /// If `f` changes the energy level (for example through
    /// [`ExcavationEngine::restore_resources`]) the scheduler is re-armed, the same as after a dig.
    pub fn with<R>(&self, f: impl FnOnce(&mut ExcavationEngine<G>) -> R) -> R {
        let mut engine = self.lock();
        let energy = engine.energy();
        let result = f(&mut engine);
        if engine.energy() != energy {
            self.rearm();
        }
        result
    }

    /// Applies the regeneration ticks that fit into `dt`, returns how many changed energy.
    pub fn advance(&self, dt: Duration) -> u32 {
        let ticks = self.session.clock.lock().advance(dt);
        let mut engine = self.lock();
        (0..ticks).filter(|_| engine.regen_tick()).count() as u32
    }

    fn lock(&self) -> MutexGuard<'_, ExcavationEngine<G>> {
        self.session.state.engine.lock()
    }

    /// Callers hold the engine lock, so the scheduler sees the bump on its next wakeup.
    fn rearm(&self) {
        *self.session.rearms.lock() += 1;
        self.session.state.wake.notify_all();
    }
}

/// Background thread regenerating energy once per configured period while energy is below its cap.
///
/// The thread parks while energy is full and resumes when an excavation spends energy again. Every such change
/// restarts the countdown, so a tick lands one full period after the last dig. Dropping the scheduler stops and
/// joins it.
#[derive(Debug)]
pub struct RegenScheduler<G: GridGenerator + Send + 'static = RandomGridGenerator> {
    shared: SharedEngine<G>,
    handle: Option<JoinHandle<()>>,
}

impl<G: GridGenerator + Send + 'static> RegenScheduler<G> {
    pub fn spawn(shared: SharedEngine<G>) -> std::io::Result<Self> {
        *shared.session.stopped.lock() = false;
        let session = Arc::clone(&shared.session);
        let handle = std::thread::Builder::new()
            .name("energy-regen".into())
            .spawn(move || run(&session))?;
        log::debug!("Regeneration scheduler started");
        Ok(Self {
            shared,
            handle: Some(handle),
        })
    }

    pub fn shared(&self) -> &SharedEngine<G> {
        &self.shared
    }

    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };

        {
            // hold the engine lock so the flag cannot slip in between the check and the wait
            let _engine = self.shared.lock();
            *self.shared.session.stopped.lock() = true;
            self.shared.session.state.wake.notify_all();
        }

        if handle.join().is_err() {
            log::warn!("Regeneration thread panicked");
        }
        log::debug!("Regeneration scheduler stopped");
    }
}

impl<G: GridGenerator + Send + 'static> Drop for RegenScheduler<G> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run<G: GridGenerator>(session: &Session<G>) {
    let SharedState { engine, wake } = &session.state;
    let mut engine = engine.lock();

    loop {
        if *session.stopped.lock() {
            return;
        }

        if !engine.needs_regen() {
            log::trace!("Energy full, regeneration parked");
            wake.wait(&mut engine);
            continue;
        }

        let period = engine.config().regen_period();
        let mut armed = *session.rearms.lock();
        let mut deadline = Instant::now() + period;
        while Instant::now() < deadline {
            wake.wait_until(&mut engine, deadline);
            if *session.stopped.lock() {
                return;
            }

            if !engine.needs_regen() {
                break;
            }
            let rearms = *session.rearms.lock();
            if rearms != armed {
                armed = rearms;
                deadline = Instant::now() + period;
            }
        }

        engine.regen_tick();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    fn shared_blank(period_ms: u64) -> SharedEngine<PresetGridGenerator> {
        let config = GameConfig {
            regen_period_ms: period_ms,
            ..GameConfig::default()
        };
        SharedEngine::new(ExcavationEngine::new(
            config,
            PresetGridGenerator::new(Grid::empty()),
        ))
    }

    #[test]
    fn clock_counts_whole_periods() {
        let mut clock = RegenClock::new(Duration::from_secs(3));

        assert_eq!(clock.advance(Duration::from_secs(2)), 0);
        assert_eq!(clock.advance(Duration::from_secs(2)), 1);
        assert_eq!(clock.advance(Duration::from_secs(7)), 2);
        clock.clear();
        assert_eq!(clock.advance(Duration::from_millis(2999)), 0);
    }

    #[test]
    fn advance_refills_up_to_cap() {
        let shared = shared_blank(3000);
        shared.with(|engine| engine.restore_resources(47, 100));

        assert_eq!(shared.advance(Duration::from_secs(9)), 3);
        assert_eq!(shared.snapshot().energy, 50);
        assert_eq!(shared.advance(Duration::from_secs(30)), 0);
        assert_eq!(shared.snapshot().energy, 50);
    }

    #[test]
    fn scheduler_regenerates_in_background() {
        let shared = shared_blank(5);
        shared.with(|engine| engine.restore_resources(45, 100));
        let scheduler = RegenScheduler::spawn(shared.clone()).unwrap();

        let mut waited = 0;
        while shared.snapshot().energy < 50 && waited < 400 {
            sleep(Duration::from_millis(5));
            waited += 1;
        }
        scheduler.stop();

        assert_eq!(shared.snapshot().energy, 50);
    }

    #[test]
    fn scheduler_resumes_after_excavation() {
        let shared = shared_blank(5);
        let scheduler = RegenScheduler::spawn(shared.clone()).unwrap();

        // let it park on a full bar first
        sleep(Duration::from_millis(20));
        for id in 0..5 {
            shared.excavate(id).unwrap();
        }

        let mut waited = 0;
        while shared.snapshot().energy < 50 && waited < 400 {
            sleep(Duration::from_millis(5));
            waited += 1;
        }
        drop(scheduler);

        let snapshot = shared.snapshot();
        assert_eq!(snapshot.energy, 50);
        assert_eq!(snapshot.excavation_count, 5);
    }

    #[test]
    fn scheduler_resumes_after_restored_resources() {
        let shared = shared_blank(5);
        let scheduler = RegenScheduler::spawn(shared.clone()).unwrap();

        sleep(Duration::from_millis(20));
        shared.with(|engine| engine.restore_resources(40, 100));

        let mut waited = 0;
        while shared.snapshot().energy < 50 && waited < 400 {
            sleep(Duration::from_millis(5));
            waited += 1;
        }
        scheduler.stop();

        assert_eq!(shared.snapshot().energy, 50);
    }

    #[test]
    fn every_dig_restarts_the_countdown() {
        let period = Duration::from_millis(150);
        let shared = shared_blank(period.as_millis() as u64);
        shared.with(|engine| engine.restore_resources(45, 100));
        let scheduler = RegenScheduler::spawn(shared.clone()).unwrap();

        // digging keeps going for longer than one period in total
        for id in 0..6 {
            shared.excavate(id).unwrap();
            sleep(Duration::from_millis(30));
        }
        let last_dig = Instant::now();
        shared.excavate(6).unwrap();
        assert_eq!(shared.snapshot().energy, 38);

        let mut waited = 0;
        while shared.snapshot().energy == 38 && waited < 400 {
            sleep(Duration::from_millis(5));
            waited += 1;
        }
        let elapsed = last_dig.elapsed();
        scheduler.stop();

        assert_eq!(shared.snapshot().energy, 39);
        assert!(elapsed >= period, "ticked {elapsed:?} after the last dig");
    }

    #[test]
    fn stopped_scheduler_no_longer_ticks() {
        let shared = shared_blank(5);
        RegenScheduler::spawn(shared.clone()).unwrap().stop();
        shared.with(|engine| engine.restore_resources(10, 100));

        sleep(Duration::from_millis(30));

        assert_eq!(shared.snapshot().energy, 10);
    }
}
