use std::fmt;

use super::state::{LifecycleState, LifecycleStats};
use crate::binding::{EngineBinding, RawHandle};
use crate::error::EngineError;

/// Single owner of one engine handle.
///
/// The handle is created in [`Engine::new`] and released exactly once, either
/// by [`Engine::terminate`] or when the value is dropped. `Engine` is neither
/// `Clone` nor `Copy`, and `terminate` consumes it, so no call can reach the
/// binding with a released handle.
///
/// There is no second owner to hand the handle to:
///
/// ```compile_fail
/// use studio_engine::{Engine, NativeBinding};
///
/// fn fork(engine: Engine<NativeBinding>) -> (Engine<NativeBinding>, Engine<NativeBinding>) {
///     (engine.clone(), engine)
/// }
/// ```
///
/// and a native engine stays on the thread that created it:
///
/// ```compile_fail
/// use studio_engine::{Engine, NativeBinding};
///
/// fn assert_send<T: Send>(_: T) {}
///
/// fn hand_off(engine: Engine<NativeBinding>) {
///     assert_send(engine);
/// }
/// ```
pub struct Engine<B: EngineBinding> {
    binding: B,
    handle: RawHandle,
    state: LifecycleState,
    stats: LifecycleStats,
}

impl<B: EngineBinding> Engine<B> {
    /// Takes ownership of `binding` and asks it for a fresh engine instance.
    ///
    /// A null handle from `create` is fatal: no engine is returned and no
    /// other call is made on the binding.
    pub fn new(mut binding: B) -> Result<Self, EngineError> {
        let handle = binding.create();
        if handle.is_null() {
            log::error!("engine create returned a null handle");
            return Err(EngineError::NullHandle);
        }
        log::debug!("engine created, handle {handle}");

        Ok(Self {
            binding,
            handle,
            state: LifecycleState::Created,
            stats: LifecycleStats::default(),
        })
    }

    /// Forwards `initialize` with the owned handle.
    pub fn initialize(&mut self) -> Result<(), B::Error> {
        self.stats.initialize_calls += 1;
        log::debug!("engine initialize, handle {}", self.handle);
        // SAFETY: the handle came from this binding's `create` and is only
        // released by `release`, which no live `Engine` has completed.
        unsafe { self.binding.initialize(self.handle)? };
        self.state = LifecycleState::Initialized;
        Ok(())
    }

    /// Forwards `execute` with the owned handle.
    pub fn execute(&mut self) -> Result<(), B::Error> {
        self.stats.execute_calls += 1;
        log::debug!("engine execute, handle {}", self.handle);
        // SAFETY: same invariant as `initialize`.
        unsafe { self.binding.execute(self.handle)? };
        self.state = LifecycleState::Executed;
        Ok(())
    }

    /// Releases the handle now and reports the external component's answer.
    ///
    /// Dropping the engine does the same but can only log a failure.
    ///
    /// ```no_run
    /// use studio_engine::{Engine, NativeBinding};
    ///
    /// fn drive(mut engine: Engine<NativeBinding>) {
    ///     engine.initialize().unwrap();
    ///     engine.execute().unwrap();
    ///     engine.terminate().unwrap();
    /// }
    /// ```
    ///
    /// The engine is gone afterwards; nothing can be forwarded with its handle:
    ///
    /// ```compile_fail
    /// use studio_engine::{Engine, NativeBinding};
    ///
    /// fn drive(mut engine: Engine<NativeBinding>) {
    ///     engine.terminate().unwrap();
    ///     engine.execute().unwrap();
    /// }
    /// ```
    pub fn terminate(mut self) -> Result<(), B::Error> {
        self.release().unwrap_or(Ok(()))
    }

    pub fn handle(&self) -> RawHandle {
        self.handle
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn stats(&self) -> LifecycleStats {
        self.stats
    }

    /// Calls `terminate` on the binding unless that already happened.
    fn release(&mut self) -> Option<Result<(), B::Error>> {
        if self.state == LifecycleState::Terminated {
            return None;
        }
        let from = std::mem::replace(&mut self.state, LifecycleState::Terminated);

        log::debug!(
            "engine terminate, handle {} in state {from} ({} initialize, {} execute)",
            self.handle,
            self.stats.initialize_calls,
            self.stats.execute_calls
        );
        // SAFETY: the handle is live and the state flip above makes this the
        // only terminate it will ever see.
        Some(unsafe { self.binding.terminate(self.handle) })
    }
}

impl<B: EngineBinding> Drop for Engine<B> {
    fn drop(&mut self) {
        if let Some(Err(err)) = self.release() {
            log::warn!("engine terminate failed during drop: {err}");
        }
    }
}

impl<B: EngineBinding> fmt::Debug for Engine<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("handle", &self.handle)
            .field("state", &self.state)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::panic::{self, AssertUnwindSafe};

    use super::*;
    use crate::testing::{Call, ExternalFailure, Op, RecordingBinding};

    const H: usize = 0x5eed;

    fn h() -> RawHandle {
        RawHandle::from_addr(H)
    }

    // ── construction ──────────────────────────────────────────────────────

    #[test]
    fn new_stores_created_handle() {
        let (binding, log) = RecordingBinding::new(H);
        let engine = Engine::new(binding).unwrap();
        assert_eq!(engine.handle(), h());
        assert_eq!(engine.state(), LifecycleState::Created);
        assert_eq!(log.calls(), vec![Call::Create]);
    }

    #[test]
    fn null_handle_fails_construction_without_further_calls() {
        let (binding, log) = RecordingBinding::new(0);
        let err = Engine::new(binding).unwrap_err();
        assert!(matches!(err, EngineError::NullHandle));
        assert_eq!(log.calls(), vec![Call::Create]);
    }

    // ── forwarding ────────────────────────────────────────────────────────

    #[test]
    fn create_initialize_execute_drop_scenario() {
        let (binding, log) = RecordingBinding::new(H);
        {
            let mut engine = Engine::new(binding).unwrap();
            engine.initialize().unwrap();
            assert_eq!(log.calls(), vec![Call::Create, Call::Initialize(h())]);
            assert_eq!(engine.state(), LifecycleState::Initialized);

            engine.execute().unwrap();
            assert_eq!(
                log.calls(),
                vec![Call::Create, Call::Initialize(h()), Call::Execute(h())]
            );
            assert_eq!(engine.state(), LifecycleState::Executed);
        }
        assert_eq!(
            log.calls(),
            vec![
                Call::Create,
                Call::Initialize(h()),
                Call::Execute(h()),
                Call::Terminate(h()),
            ]
        );
    }

    #[test]
    fn repeated_calls_forward_one_to_one_with_same_handle() {
        let (binding, log) = RecordingBinding::new(H);
        let mut engine = Engine::new(binding).unwrap();
        for _ in 0..3 {
            engine.initialize().unwrap();
        }
        for _ in 0..2 {
            engine.execute().unwrap();
        }
        engine.initialize().unwrap();
        assert_eq!(engine.state(), LifecycleState::Initialized);
        assert_eq!(
            engine.stats(),
            LifecycleStats {
                initialize_calls: 4,
                execute_calls: 2
            }
        );
        drop(engine);

        let calls = log.calls();
        let inits = calls.iter().filter(|c| **c == Call::Initialize(h())).count();
        let execs = calls.iter().filter(|c| **c == Call::Execute(h())).count();
        assert_eq!(inits, 4);
        assert_eq!(execs, 2);
        assert_eq!(log.terminations(), 1);
        assert_eq!(calls.last(), Some(&Call::Terminate(h())));
    }

    // ── teardown ──────────────────────────────────────────────────────────

    #[test]
    fn explicit_terminate_releases_once() {
        let (binding, log) = RecordingBinding::new(H);
        let mut engine = Engine::new(binding).unwrap();
        engine.execute().unwrap();
        engine.terminate().unwrap();
        assert_eq!(log.terminations(), 1);
        assert_eq!(log.calls().last(), Some(&Call::Terminate(h())));
    }

    #[test]
    fn untouched_engine_still_terminates_on_drop() {
        let (binding, log) = RecordingBinding::new(H);
        drop(Engine::new(binding).unwrap());
        assert_eq!(log.calls(), vec![Call::Create, Call::Terminate(h())]);
    }

    #[test]
    fn terminate_failure_is_returned_unchanged() {
        let (binding, log) = RecordingBinding::new(H);
        let engine = Engine::new(binding.failing_on(Op::Terminate)).unwrap();
        assert_eq!(engine.terminate(), Err(ExternalFailure(Op::Terminate)));
        assert_eq!(log.terminations(), 1);
    }

    #[test]
    fn terminate_failure_on_drop_is_not_retried() {
        let (binding, log) = RecordingBinding::new(H);
        drop(Engine::new(binding.failing_on(Op::Terminate)).unwrap());
        assert_eq!(log.terminations(), 1);
    }

    // ── errors ────────────────────────────────────────────────────────────

    #[test]
    fn initialize_failure_is_surfaced_and_state_kept() {
        let (binding, log) = RecordingBinding::new(H);
        let mut engine = Engine::new(binding.failing_on(Op::Initialize)).unwrap();
        assert_eq!(engine.initialize(), Err(ExternalFailure(Op::Initialize)));
        assert_eq!(engine.state(), LifecycleState::Created);
        assert_eq!(engine.stats().initialize_calls, 1);
        drop(engine);
        assert_eq!(log.terminations(), 1);
    }

    #[test]
    fn early_return_through_question_mark_terminates_once() {
        fn drive(binding: RecordingBinding) -> Result<(), ExternalFailure> {
            let mut engine = Engine::new(binding).expect("non-null handle");
            engine.initialize()?;
            engine.execute()?;
            engine.initialize()?;
            Ok(())
        }

        let (binding, log) = RecordingBinding::new(H);
        assert_eq!(
            drive(binding.failing_on(Op::Execute)),
            Err(ExternalFailure(Op::Execute))
        );
        assert_eq!(
            log.calls(),
            vec![
                Call::Create,
                Call::Initialize(h()),
                Call::Execute(h()),
                Call::Terminate(h()),
            ]
        );
    }

    #[test]
    fn panic_while_engine_is_live_terminates_once() {
        let (binding, log) = RecordingBinding::new(H);
        let result = panic::catch_unwind(AssertUnwindSafe(move || {
            let mut engine = Engine::new(binding).unwrap();
            engine.initialize().unwrap();
            panic!("studio crashed mid-session");
        }));
        assert!(result.is_err());
        assert_eq!(log.terminations(), 1);
    }

    #[test]
    fn debug_output_omits_binding() {
        let (binding, _log) = RecordingBinding::new(H);
        let engine = Engine::new(binding).unwrap();
        let text = format!("{engine:?}");
        assert!(text.contains("RawHandle(0x5eed)"));
        assert!(text.contains("Created"));
    }
}
