use std::fmt::Debug;

/// The generic type used for a simulation's clock.
///
/// Kept generic so the engine can be exercised with integral clocks in tests while the checkout model runs on
/// [`NotNan<f64>`]. This trait is a superset of [`Ord`] and [`Debug`] with no additional requirements or
/// functionality.
///
/// Events execute in ascending order of execution time, i.e. if `A.cmp(&B) == std::cmp::Ordering::Less` then event A
/// will execute before event B. Ties are resolved by the order in which events were enqueued, which keeps equal-time
/// arrivals and service completions in a reproducible order.
///
/// Floating-point builtin types do not implement [`Ord`], so implementations are provided for the [`OrderedFloat`] and
/// [`NotNan`] wrappers instead.
///
/// [`OrderedFloat`]: ordered_float::OrderedFloat
/// [`NotNan`]: ordered_float::NotNan
/// [`NotNan<f64>`]: ordered_float::NotNan
pub trait SimTime: Ord + Debug {}

impl SimTime for u8 {}
impl SimTime for u16 {}
impl SimTime for u32 {}
impl SimTime for u64 {}
impl SimTime for u128 {}
impl SimTime for usize {}
impl SimTime for i8 {}
impl SimTime for i16 {}
impl SimTime for i32 {}
impl SimTime for i64 {}
impl SimTime for i128 {}
impl SimTime for isize {}

impl<Float> SimTime for ordered_float::OrderedFloat<Float> where Float: ordered_float::FloatCore + Debug {}

impl<Float> SimTime for ordered_float::NotNan<Float> where Float: ordered_float::FloatCore + Debug {}

/// The generic type used for a simulation's overall state.
///
/// This trait has only one method, which provides a way for [`Simulation::run()`] to ask whether it should wrap up
/// event execution. The default implementation of this method will always answer "no," and so a simulation running
/// with the default will continue until the event queue becomes empty.
///
/// [`Simulation::run()`]: crate::engine::Simulation::run
pub trait SimState<Time>
where
    Time: SimTime,
{
    /// Reports whether the simulation has run to completion. This method will be invoked in [`Simulation::run()`]
    /// and [`Simulation::run_until()`] before popping each event off the queue: `true` indicates that the simulation
    /// is finished and that the loop should stop, whereas `false` means that it should continue with the next
    /// scheduled event.
    ///
    /// The `current_time` argument will provide shared access to the internally tracked simulation clock.
    ///
    /// [`Simulation::run()`]: crate::engine::Simulation::run
    /// [`Simulation::run_until()`]: crate::engine::Simulation::run_until
    // expect that other implementations will make use of the
    // argument even though this one doesn't
    #[allow(unused_variables)]
    fn is_complete(&self, current_time: &Time) -> bool {
        false
    }
}
