/// Watches the events a solver emits while it iterates.
///
/// An observer only sees each event; it has no way to stop or redirect the
/// run. Any `FnMut(&E)` closure is an observer, and `()` discards every event.
pub trait Observer<E> {
    /// Observes a solver event.
    fn observe(&mut self, event: &E);
}

impl<E, F> Observer<E> for F
where
    F: FnMut(&E),
{
    fn observe(&mut self, event: &E) {
        self(event);
    }
}

impl<E> Observer<E> for () {
    fn observe(&mut self, _event: &E) {}
}
