//! Moving platform tracking
//!
//! While the character stands on a surface with the rigid platform capability,
//! its carrying frame is parented under that platform's mirror transform so it
//! rides along. Leaving the platform hands the frame back to its original
//! holder. Only actual changes reach the backend.

use hover_core::{Carrier, CarrierFrame, PlatformId, PlatformInfo, ProbeHit};
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct PlatformTracker {
    current: Option<PlatformInfo>,
}

impl PlatformTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// The platform currently carrying the character
    pub fn current(&self) -> Option<PlatformId> {
        self.current.map(|platform| platform.id)
    }

    /// The carrier the frame is parented under
    pub fn carrier(&self) -> Carrier {
        match self.current {
            Some(platform) => Carrier::Mirror(platform.mirror),
            None => Carrier::Origin,
        }
    }

    /// Follow the probe result. Returns true if the frame was reparented.
    pub fn refresh<F: CarrierFrame + ?Sized>(
        &mut self,
        frame: &mut F,
        grounded: bool,
        hit: Option<&ProbeHit>,
    ) -> bool {
        let platform = hit.and_then(|hit| hit.platform).filter(|_| grounded);

        match platform {
            Some(platform) if self.current != Some(platform) => {
                debug!(
                    platform = platform.id.0,
                    mirror = platform.mirror.0,
                    "boarding platform"
                );
                frame.reparent(Carrier::Mirror(platform.mirror));
                self.current = Some(platform);
                true
            }
            Some(_) => false,
            None => self.clear(frame),
        }
    }

    fn clear<F: CarrierFrame + ?Sized>(&mut self, frame: &mut F) -> bool {
        let Some(previous) = self.current.take() else {
            return false;
        };

        debug!(platform = previous.id.0, "leaving platform");
        frame.reparent(Carrier::Origin);
        true
    }
}
