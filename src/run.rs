//! Execution framework for long-running algorithms.
//!
//! An algorithm run goes through a small state machine, driven by
//! [`Lifecycle`]. The run starts in [`NotRunning`](State::NotRunning) and ends
//! in either [`Finished`](State::Finished) or [`Aborted`](State::Aborted). A
//! lifecycle is single-use, starting a second run on the same value panics.
//!
//! Cancellation is cooperative. Anyone holding an [`AbortHandle`] may request
//! abortion at any time, even from another thread, but the request takes
//! effect only when the running algorithm reaches its next checkpoint. Between
//! the request and the checkpoint the run is in
//! [`PendingAbortion`](State::PendingAbortion) state.
//!
//! State transitions and run milestones are reported to a [`RunObserver`].

use std::{
    marker::PhantomData,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    sync::mpsc::Sender,
};

/// The state of an algorithm run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    NotRunning,
    Running,
    /// Abortion was requested but the algorithm has not yet reached a
    /// checkpoint.
    PendingAbortion,
    Finished,
    Aborted,
}

impl State {
    pub fn is_terminal(&self) -> bool {
        matches!(self, State::Finished | State::Aborted)
    }
}

/// A milestone of an algorithm run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent<VI> {
    StateChanged(State),
    Started,
    Finished,
    Aborted,
    /// The root vertex of a rooted algorithm was changed.
    RootChanged(Option<VI>),
}

pub trait RunObserver<VI> {
    fn on_event(&mut self, event: RunEvent<VI>);
}

impl<VI> RunObserver<VI> for () {
    fn on_event(&mut self, _event: RunEvent<VI>) {}
}

impl<VI> RunObserver<VI> for Vec<RunEvent<VI>> {
    fn on_event(&mut self, event: RunEvent<VI>) {
        self.push(event);
    }
}

impl<VI> RunObserver<VI> for Sender<RunEvent<VI>> {
    fn on_event(&mut self, event: RunEvent<VI>) {
        let _ = self.send(event);
    }
}

/// A cloneable handle for requesting cooperative cancellation.
#[derive(Debug, Clone, Default)]
pub struct AbortHandle {
    flag: Arc<AtomicBool>,
}

impl AbortHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests abortion of the run. The request is a one-way switch, it
    /// cannot be withdrawn.
    pub fn request(&self) {
        // The flag does not guard any data, relaxed ordering is enough.
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_requested(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Access to the run state of an algorithm that supports cooperative
/// cancellation.
pub trait Interruptible {
    fn state(&self) -> State;
    fn abort_handle(&self) -> AbortHandle;

    /// Requests abortion of the current run, if there is one.
    fn abort(&self) {
        if self.state() == State::Running {
            self.abort_handle().request();
        }
    }
}

/// The phases of an algorithm run driven by [`Lifecycle::drive`].
pub trait Phases {
    type Error;

    fn initialize(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn execute(&mut self, abort: &AbortHandle) -> Result<(), Self::Error>;

    /// Runs unconditionally at the end of the run, also after an error or
    /// abortion.
    fn clean(&mut self) {}
}

#[derive(Debug)]
pub struct Lifecycle<VI, O = ()> {
    state: State,
    abort: AbortHandle,
    observer: O,
    ty: PhantomData<fn() -> VI>,
}

impl<VI> Lifecycle<VI, ()> {
    pub fn new() -> Self {
        Self::with_observer(())
    }
}

impl<VI> Default for Lifecycle<VI, ()> {
    fn default() -> Self {
        Self::new()
    }
}

impl<VI, O: RunObserver<VI>> Lifecycle<VI, O> {
    pub fn with_observer(observer: O) -> Self {
        Self {
            state: State::NotRunning,
            abort: AbortHandle::new(),
            observer,
            ty: PhantomData,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn abort_handle(&self) -> AbortHandle {
        self.abort.clone()
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Requests abortion of the run. Does nothing unless the run is in
    /// [`Running`](State::Running) state.
    pub fn abort(&mut self) {
        if self.state == State::Running {
            self.abort.request();
        }
    }

    /// Starts the run.
    ///
    /// # Panics
    ///
    /// Panics if the run was already started. A lifecycle is single-use.
    pub fn begin(&mut self) {
        assert_eq!(
            self.state,
            State::NotRunning,
            "the lifecycle cannot be reused"
        );

        self.transition(State::Running);
        self.observer.on_event(RunEvent::Started);
    }

    /// Checks for a pending abortion request. Returns `true` when the run
    /// should continue.
    pub fn checkpoint(&mut self) -> bool {
        if self.state == State::Running && self.abort.is_requested() {
            self.transition(State::PendingAbortion);
        }

        self.state == State::Running
    }

    /// Completes the run, entering [`Finished`](State::Finished) or, when
    /// abortion took effect, [`Aborted`](State::Aborted).
    ///
    /// # Panics
    ///
    /// Panics if the run is not in progress.
    pub fn finish(&mut self) {
        match self.state {
            State::Running => {
                self.transition(State::Finished);
                self.observer.on_event(RunEvent::Finished);
            }
            State::PendingAbortion => {
                self.transition(State::Aborted);
                self.observer.on_event(RunEvent::Aborted);
            }
            state => panic!("cannot finish a run in {state:?} state"),
        }
    }

    pub fn root_changed(&mut self, root: Option<VI>) {
        self.observer.on_event(RunEvent::RootChanged(root));
    }

    /// Runs all phases of an algorithm, checking for abortion between them.
    ///
    /// The clean phase runs unconditionally. On success or abortion the run
    /// finishes, reaching a terminal state. A phase error is propagated as is
    /// and leaves the run in its current, non-terminal state.
    pub fn drive<P: Phases>(&mut self, phases: &mut P) -> Result<(), P::Error> {
        self.begin();

        let result = self.run_phases(phases);
        phases.clean();

        if result.is_ok() {
            self.finish();
        }

        result
    }

    fn run_phases<P: Phases>(&mut self, phases: &mut P) -> Result<(), P::Error> {
        if !self.checkpoint() {
            return Ok(());
        }

        phases.initialize()?;

        if !self.checkpoint() {
            return Ok(());
        }

        phases.execute(&self.abort)?;
        self.checkpoint();

        Ok(())
    }

    fn transition(&mut self, state: State) {
        self.state = state;
        self.observer.on_event(RunEvent::StateChanged(state));
    }
}
