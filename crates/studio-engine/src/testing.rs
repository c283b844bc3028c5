//! Recording stand-in for the external engine library.

use std::cell::RefCell;
use std::rc::Rc;

use crate::binding::{EngineBinding, RawHandle};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Call {
    Create,
    Initialize(RawHandle),
    Execute(RawHandle),
    Terminate(RawHandle),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Op {
    Initialize,
    Execute,
    Terminate,
}

#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
#[error("external engine rejected {0:?}")]
pub struct ExternalFailure(pub Op);

/// Shared view of every call a [`RecordingBinding`] received.
#[derive(Clone, Default)]
pub struct CallLog(Rc<RefCell<Vec<Call>>>);

impl CallLog {
    pub fn calls(&self) -> Vec<Call> {
        self.0.borrow().clone()
    }

    pub fn terminations(&self) -> usize {
        self.0
            .borrow()
            .iter()
            .filter(|call| matches!(call, Call::Terminate(_)))
            .count()
    }

    fn push(&self, call: Call) {
        self.0.borrow_mut().push(call);
    }
}

pub struct RecordingBinding {
    log: CallLog,
    handle: RawHandle,
    failing: Vec<Op>,
}

impl RecordingBinding {
    /// A binding whose `create` hands out `addr`. Zero yields a null handle.
    pub fn new(addr: usize) -> (Self, CallLog) {
        let log = CallLog::default();
        let binding = Self {
            log: log.clone(),
            handle: RawHandle::from_addr(addr),
            failing: Vec::new(),
        };
        (binding, log)
    }

    pub fn failing_on(mut self, op: Op) -> Self {
        self.failing.push(op);
        self
    }

    fn outcome(&self, op: Op) -> Result<(), ExternalFailure> {
        if self.failing.contains(&op) {
            Err(ExternalFailure(op))
        } else {
            Ok(())
        }
    }
}

impl EngineBinding for RecordingBinding {
    type Error = ExternalFailure;

    fn create(&mut self) -> RawHandle {
        self.log.push(Call::Create);
        self.handle
    }

    unsafe fn initialize(&mut self, handle: RawHandle) -> Result<(), Self::Error> {
        self.log.push(Call::Initialize(handle));
        self.outcome(Op::Initialize)
    }

    unsafe fn execute(&mut self, handle: RawHandle) -> Result<(), Self::Error> {
        self.log.push(Call::Execute(handle));
        self.outcome(Op::Execute)
    }

    unsafe fn terminate(&mut self, handle: RawHandle) -> Result<(), Self::Error> {
        self.log.push(Call::Terminate(handle));
        self.outcome(Op::Terminate)
    }
}
