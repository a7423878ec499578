/// Controller source contract consumed by the round loop.

use crate::domain::entity::Direction;

pub trait ControllerSource {
    /// Direction currently requested, if any. Called once per frame.
    fn poll(&mut self) -> Option<Direction>;

    /// Abort-to-title request. Checked between moves, never during one.
    fn abort_requested(&mut self) -> bool {
        false
    }
}

impl<T: ControllerSource + ?Sized> ControllerSource for &mut T {
    fn poll(&mut self) -> Option<Direction> {
        (**self).poll()
    }

    fn abort_requested(&mut self) -> bool {
        (**self).abort_requested()
    }
}
