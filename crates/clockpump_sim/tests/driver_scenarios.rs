//! End-to-end driver scenarios against a recording mock model.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use clockpump_sim::{
    DeviceModel, Driver, DriverState, ModelCtx, RegInitPolicy, RunSummary, SimContext, SimError,
    StepResult,
};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Evaluate { time: u64, stamp: f64 },
    Finalize { time: u64 },
}

/// Mock model that records every call into a shared log.
struct Recorder {
    log: Rc<RefCell<Vec<Call>>>,
    finish_on: Option<u64>,
    fault_on: Option<u64>,
    evaluations: u64,
}

impl Recorder {
    fn new(log: Rc<RefCell<Vec<Call>>>) -> Self {
        Self {
            log,
            finish_on: None,
            fault_on: None,
            evaluations: 0,
        }
    }

    fn finish_on(mut self, n: u64) -> Self {
        self.finish_on = Some(n);
        self
    }

    fn fault_on(mut self, n: u64) -> Self {
        self.fault_on = Some(n);
        self
    }
}

impl DeviceModel for Recorder {
    fn evaluate(&mut self, ctx: &mut ModelCtx<'_>) -> Result<(), SimError> {
        self.evaluations += 1;
        self.log.borrow_mut().push(Call::Evaluate {
            time: ctx.time().units,
            stamp: ctx.time_stamp(),
        });
        if self.finish_on == Some(self.evaluations) {
            ctx.finish();
        }
        if self.fault_on == Some(self.evaluations) {
            return Err(SimError::ModelFault {
                time: ctx.time().units,
                reason: "inconsistent state".into(),
            });
        }
        Ok(())
    }

    fn finalize(&mut self, ctx: &mut ModelCtx<'_>) -> Result<(), SimError> {
        self.log.borrow_mut().push(Call::Finalize {
            time: ctx.time().units,
        });
        Ok(())
    }
}

fn new_log() -> Rc<RefCell<Vec<Call>>> {
    Rc::new(RefCell::new(Vec::new()))
}

fn finalize_count(log: &[Call]) -> usize {
    log.iter()
        .filter(|c| matches!(c, Call::Finalize { .. }))
        .count()
}

#[test]
fn scenario_a_finish_on_fifth_evaluation() {
    let log = new_log();
    let model_log = Rc::clone(&log);
    let driver = Driver::new(SimContext::new(), move |_| {
        Ok(Recorder::new(model_log).finish_on(5))
    })
    .unwrap();

    let summary = driver.run().unwrap();
    assert_eq!(summary.iterations, 5);
    assert_eq!(summary.final_time.units, 5);

    let log = log.borrow();
    assert_eq!(log.len(), 6);
    assert_eq!(log.last(), Some(&Call::Finalize { time: 5 }));
    assert_eq!(finalize_count(&log), 1);
}

#[test]
fn first_evaluation_observes_time_one() {
    let log = new_log();
    let model_log = Rc::clone(&log);
    Driver::new(SimContext::new(), move |_| {
        Ok(Recorder::new(model_log).finish_on(3))
    })
    .unwrap()
    .run()
    .unwrap();

    let log = log.borrow();
    assert_eq!(
        log[0],
        Call::Evaluate {
            time: 1,
            stamp: 1.0
        }
    );
    let times: Vec<u64> = log
        .iter()
        .filter_map(|c| match c {
            Call::Evaluate { time, .. } => Some(*time),
            Call::Finalize { .. } => None,
        })
        .collect();
    assert_eq!(times, vec![1, 2, 3]);
}

#[test]
fn finalize_runs_once_after_last_evaluation() {
    let log = new_log();
    let model_log = Rc::clone(&log);
    Driver::new(SimContext::new(), move |_| {
        Ok(Recorder::new(model_log).finish_on(4))
    })
    .unwrap()
    .run()
    .unwrap();

    let log = log.borrow();
    let finalize_at = log
        .iter()
        .position(|c| matches!(c, Call::Finalize { .. }))
        .unwrap();
    assert_eq!(finalize_at, log.len() - 1);
    assert!(log[..finalize_at]
        .iter()
        .all(|c| matches!(c, Call::Evaluate { .. })));
    assert_eq!(finalize_count(&log), 1);
}

#[test]
fn finished_flag_false_until_terminal_iteration() {
    let log = new_log();
    let model_log = Rc::clone(&log);
    let mut driver = Driver::new(SimContext::new(), move |_| {
        Ok(Recorder::new(model_log).finish_on(6))
    })
    .unwrap();

    let mut observed = Vec::new();
    loop {
        let result = driver.step().unwrap();
        observed.push(driver.context().is_finished());
        if result == StepResult::Done {
            break;
        }
    }
    assert_eq!(observed, vec![false, false, false, false, false, true]);
    assert_eq!(driver.context().time().units, 6);
    assert_eq!(driver.context().time_stamp(), 6.0);
    driver.finish().unwrap();
}

#[test]
fn scenario_b_never_finishing_model_is_bounded_externally() {
    let log = new_log();
    let model_log = Rc::clone(&log);
    let mut driver =
        Driver::new(SimContext::new(), move |_| Ok(Recorder::new(model_log))).unwrap();

    for _ in 0..10_000 {
        assert_eq!(driver.step().unwrap(), StepResult::Continued);
    }
    assert_eq!(driver.iterations(), 10_000);
    assert!(!driver.context().is_finished());
    assert!(matches!(
        driver.finish(),
        Err(SimError::NotFinished { time: 10_000 })
    ));
    assert_eq!(finalize_count(&log.borrow()), 0);
}

/// Never finishes; counts evaluations into a counter the test can watch.
/// Faults once `stop` is raised so the looping thread can be joined.
struct Spinner {
    evaluations: Arc<AtomicU64>,
    stop: Arc<AtomicBool>,
}

impl DeviceModel for Spinner {
    fn evaluate(&mut self, ctx: &mut ModelCtx<'_>) -> Result<(), SimError> {
        if self.stop.load(Ordering::Relaxed) {
            return Err(SimError::ModelFault {
                time: ctx.time().units,
                reason: "stopped by watchdog".into(),
            });
        }
        self.evaluations.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn finalize(&mut self, _ctx: &mut ModelCtx<'_>) -> Result<(), SimError> {
        panic!("a model that never finishes must never be finalized");
    }
}

#[test]
fn scenario_b_run_keeps_looping_under_watchdog() {
    let evaluations = Arc::new(AtomicU64::new(0));
    let stop = Arc::new(AtomicBool::new(false));
    let counter = Arc::clone(&evaluations);
    let model_stop = Arc::clone(&stop);
    let handle = thread::spawn(move || -> Result<RunSummary, SimError> {
        let driver = Driver::new(SimContext::new(), move |_| {
            Ok(Spinner {
                evaluations: counter,
                stop: model_stop,
            })
        })?;
        driver.run()
    });

    let deadline = Instant::now() + Duration::from_secs(10);
    while evaluations.load(Ordering::Relaxed) < 100_000 && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(5));
    }
    assert!(evaluations.load(Ordering::Relaxed) >= 100_000);
    assert!(!handle.is_finished());

    stop.store(true, Ordering::Relaxed);
    let result = handle.join().unwrap();
    assert!(matches!(
        result,
        Err(SimError::ModelFault { ref reason, .. }) if reason == "stopped by watchdog"
    ));
}

#[test]
fn scenario_c_fault_on_third_evaluation() {
    let log = new_log();
    let model_log = Rc::clone(&log);
    let driver = Driver::new(SimContext::new(), move |_| {
        Ok(Recorder::new(model_log).fault_on(3).finish_on(5))
    })
    .unwrap();

    let err = driver.run().unwrap_err();
    assert!(matches!(err, SimError::ModelFault { time: 3, .. }));

    let log = log.borrow();
    assert_eq!(log.len(), 3);
    assert_eq!(finalize_count(&log), 0);
}

#[test]
fn stepping_after_fault_never_evaluates_again() {
    let log = new_log();
    let model_log = Rc::clone(&log);
    let mut driver = Driver::new(SimContext::new(), move |_| {
        Ok(Recorder::new(model_log).fault_on(3))
    })
    .unwrap();

    assert_eq!(driver.step().unwrap(), StepResult::Continued);
    assert_eq!(driver.step().unwrap(), StepResult::Continued);
    assert!(matches!(
        driver.step(),
        Err(SimError::ModelFault { time: 3, .. })
    ));
    assert_eq!(driver.state(), DriverState::Faulted);

    for _ in 0..3 {
        assert!(matches!(driver.step(), Err(SimError::Halted { time: 3 })));
    }
    assert_eq!(log.borrow().len(), 3);
    assert_eq!(driver.iterations(), 2);

    assert!(matches!(driver.finish(), Err(SimError::Halted { time: 3 })));
    assert_eq!(finalize_count(&log.borrow()), 0);
}

#[test]
fn finish_then_fault_in_same_evaluation_is_not_finalized() {
    let log = new_log();
    let model_log = Rc::clone(&log);
    let mut driver = Driver::new(SimContext::new(), move |_| {
        Ok(Recorder::new(model_log).finish_on(3).fault_on(3))
    })
    .unwrap();

    driver.step().unwrap();
    driver.step().unwrap();
    assert!(driver.step().is_err());
    assert!(driver.context().is_finished());

    assert!(matches!(driver.finish(), Err(SimError::Halted { time: 3 })));
    let log = log.borrow();
    assert_eq!(log.len(), 3);
    assert_eq!(finalize_count(&log), 0);
}

#[test]
fn reg_init_snapshot_taken_at_construction() {
    struct Seeded {
        register: u64,
    }
    impl DeviceModel for Seeded {
        fn evaluate(&mut self, ctx: &mut ModelCtx<'_>) -> Result<(), SimError> {
            ctx.finish();
            Ok(())
        }
        fn finalize(&mut self, _ctx: &mut ModelCtx<'_>) -> Result<(), SimError> {
            Ok(())
        }
    }

    let mut ctx = SimContext::new();
    ctx.set_reg_init(RegInitPolicy::pattern(17));
    let expected = RegInitPolicy::pattern(17).fill(16);

    let mut driver = Driver::new(ctx, |ctx| {
        Ok(Seeded {
            register: ctx.reg_init().fill(16),
        })
    })
    .unwrap();
    driver.context_mut().set_reg_init(RegInitPolicy::ones());
    driver.step().unwrap();

    assert_eq!(driver.model().register, expected);
    assert_ne!(driver.model().register, RegInitPolicy::ones().fill(16));
    driver.finish().unwrap();
}
