//! The ordered per-cycle steps. Each one checks its own precondition and idempotency guard and
//! reports what it did through a [`StepOutcome`](crate::bridge::report::StepOutcome).

pub(crate) mod bootstrap;
pub(crate) mod event;
pub(crate) mod identity;
pub(crate) mod screen;
pub(crate) mod tags;
