//! Reaction dispatch.

use tracing::trace;

use super::event::Event;
use crate::core::KernelResult;
use crate::game::Game;

impl Game {
    /// Fire a reaction event.
    ///
    /// Callbacks run in registration order over a copy of the list taken
    /// when the fire starts. A registration removed by an earlier callback
    /// is skipped. A source whose callback for this kind is already running
    /// further up the stack is skipped too, which stops self-triggering
    /// loops. The first error aborts the fire and is returned.
    pub fn fire<E: Event>(&mut self, event: E) -> KernelResult<()> {
        let reactions = self.triggers().reactions::<E>();
        for (ctx, reaction) in reactions {
            if !self.triggers().is_live(ctx.registration) {
                continue;
            }
            if self.triggers().is_firing(E::KIND, ctx.source) {
                trace!(kind = ?E::KIND, source = %ctx.source, "skipping reentrant reaction");
                continue;
            }

            self.triggers_mut().enter(E::KIND, ctx.source);
            let result = reaction(self, &ctx, &event);
            self.triggers_mut().exit();
            result?;
        }
        Ok(())
    }
}
