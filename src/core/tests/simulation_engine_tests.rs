// Tests for SimulationEngine functionality
#[cfg(test)]
mod tests {
    use crate::core::{
        errors::{SimError, SimResult},
        process::{Context, Process, Suspend},
        simulation_engine::{SimulationEngine, SimulationObserver},
        types::SimTime,
    };
    use std::sync::{Arc, Mutex};

    type Trace = Vec<(f64, String)>;

    /// Wakes every `interval` days and logs itself
    struct Ticker {
        name: String,
        interval: f64,
    }

    impl Process<Trace> for Ticker {
        fn label(&self) -> &str {
            &self.name
        }

        fn resume(&mut self, ctx: &mut Context<'_, Trace>) -> SimResult<Suspend> {
            let now = ctx.now().days();
            ctx.world.push((now, self.name.clone()));
            Ok(Suspend::Timeout(self.interval))
        }
    }

    /// Spawns children, then settles with a zero timeout
    struct Parent {
        children: usize,
        settled: bool,
    }

    impl Process<Trace> for Parent {
        fn label(&self) -> &str {
            "parent"
        }

        fn resume(&mut self, ctx: &mut Context<'_, Trace>) -> SimResult<Suspend> {
            if self.settled {
                let now = ctx.now().days();
                ctx.world.push((now, "parent settled".to_string()));
                return Ok(Suspend::Terminate);
            }
            for index in 0..self.children {
                ctx.spawn(Box::new(Once { name: format!("child {index}") }));
            }
            self.settled = true;
            Ok(Suspend::Timeout(0.0))
        }
    }

    struct Once {
        name: String,
    }

    impl Process<Trace> for Once {
        fn label(&self) -> &str {
            &self.name
        }

        fn resume(&mut self, ctx: &mut Context<'_, Trace>) -> SimResult<Suspend> {
            let now = ctx.now().days();
            ctx.world.push((now, self.name.clone()));
            Ok(Suspend::Terminate)
        }
    }

    struct BadDelay;

    impl Process<Trace> for BadDelay {
        fn label(&self) -> &str {
            "bad"
        }

        fn resume(&mut self, _ctx: &mut Context<'_, Trace>) -> SimResult<Suspend> {
            Ok(Suspend::Timeout(-1.0))
        }
    }

    #[derive(Default)]
    struct Recorded {
        advances: Vec<(f64, f64)>,
        steps: usize,
    }

    struct Recorder(Arc<Mutex<Recorded>>);

    impl SimulationObserver<Trace> for Recorder {
        fn on_time_advance(&mut self, old_time: SimTime, new_time: SimTime) {
            self.0.lock().unwrap().advances.push((old_time.days(), new_time.days()));
        }

        fn on_step_complete(&mut self, _now: SimTime, _world: &Trace) {
            self.0.lock().unwrap().steps += 1;
        }
    }

    fn ticker(name: &str, interval: f64) -> Box<dyn Process<Trace>> {
        Box::new(Ticker {
            name: name.to_string(),
            interval,
        })
    }

    #[test]
    fn test_run_until_stops_before_horizon() {
        let mut engine = SimulationEngine::new(Trace::new());
        engine.spawn(ticker("daily", 1.0)).unwrap();

        let end = engine.run_until(SimTime::new(3.0)).unwrap();

        assert_eq!(end, SimTime::new(2.0));
        let times: Vec<f64> = engine.world().iter().map(|(t, _)| *t).collect();
        assert_eq!(times, vec![0.0, 1.0, 2.0]);
        assert!(engine.has_pending_events());
    }

    #[test]
    fn test_interleaves_processes_by_time() {
        let mut engine = SimulationEngine::new(Trace::new());
        engine.spawn(ticker("slow", 1.0)).unwrap();
        engine.spawn(ticker("fast", 0.5)).unwrap();

        engine.run_until(SimTime::new(1.5)).unwrap();

        let names: Vec<&str> = engine.world().iter().map(|(_, n)| n.as_str()).collect();
        // At t=1.0 the slow ticker was scheduled first (at t=0), fast at t=0.5
        assert_eq!(names, vec!["slow", "fast", "fast", "slow", "fast"]);
    }

    #[test]
    fn test_children_run_before_parent_settles() {
        let mut engine = SimulationEngine::new(Trace::new());
        engine.spawn(Box::new(Parent { children: 3, settled: false })).unwrap();

        engine.run().unwrap();

        let names: Vec<&str> = engine.world().iter().map(|(_, n)| n.as_str()).collect();
        assert_eq!(names, vec!["child 0", "child 1", "child 2", "parent settled"]);
        assert!(engine.world().iter().all(|(t, _)| *t == 0.0));
        assert_eq!(engine.processes_spawned(), 4);
        assert_eq!(engine.live_processes(), 0);
    }

    #[test]
    fn test_invalid_delay_aborts_run() {
        let mut engine = SimulationEngine::new(Trace::new());
        engine.spawn(Box::new(BadDelay)).unwrap();

        let err = engine.run().unwrap_err();
        assert!(matches!(err, SimError::InvalidDelay { delay } if delay == -1.0));
    }

    #[test]
    fn test_observers_see_every_step() {
        let recorded = Arc::new(Mutex::new(Recorded::default()));
        let mut engine = SimulationEngine::new(Trace::new());
        engine.add_observer(Box::new(Recorder(recorded.clone())));
        engine.spawn(ticker("daily", 1.0)).unwrap();

        engine.run_until(SimTime::new(3.0)).unwrap();

        let recorded = recorded.lock().unwrap();
        assert_eq!(recorded.steps, 3);
        assert_eq!(recorded.advances, vec![(0.0, 1.0), (1.0, 2.0)]);
        assert_eq!(engine.events_processed(), 3);
    }

    #[test]
    fn test_empty_engine_does_nothing() {
        let mut engine: SimulationEngine<Trace> = SimulationEngine::new(Trace::new());
        assert!(!engine.step().unwrap());
        assert_eq!(engine.run().unwrap(), SimTime::ZERO);
    }
}
