// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Opening cuts evaluated off the calling thread.
//!
//! The wall is cloned when the job is submitted, so the cut sees whatever
//! scale the wall had at that moment and the group stays free for other
//! edits. The result is applied with [`crate::RoomGroup::apply_opening`].

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, TryRecvError};

use room_lite_geometry::SolidKernel;

use crate::engine::{panic_message, OpeningConfig, OpeningCut, RoomTransformEngine};
use crate::error::{Error, Result};
use crate::group::RoomGroup;
use crate::part::{OpeningKind, PartKey};

/// Handle to an opening cut running on the rayon pool.
#[derive(Debug)]
pub struct PendingOpening {
    wall: PartKey,
    rx: Receiver<Result<OpeningCut>>,
}

impl PendingOpening {
    /// The wall this cut belongs to.
    pub fn wall(&self) -> PartKey {
        self.wall
    }

    /// Block until the cut finishes.
    pub fn wait(self) -> Result<OpeningCut> {
        self.rx.recv().map_err(|_| Error::JobCancelled)?
    }

    /// The result if the cut has finished, `None` while it is still running.
    pub fn try_take(&self) -> Option<Result<OpeningCut>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(Error::JobCancelled)),
        }
    }
}

impl<K> RoomTransformEngine<K>
where
    K: SolidKernel + Clone + 'static,
{
    /// Snapshot `wall` and cut the opening on the rayon pool.
    ///
    /// Lookup errors are returned immediately; everything else, including
    /// [`Error::MissingDoorPosition`], arrives through the handle. A panic in
    /// the job arrives as [`Error::KernelPanic`] instead of tearing down the
    /// pool. Apply the result with [`RoomGroup::apply_opening`], which refuses
    /// it if the wall changed in the meantime.
    pub fn add_opening_in_background(
        &self,
        group: &RoomGroup,
        wall: PartKey,
        config: OpeningConfig,
        kind: OpeningKind,
    ) -> Result<PendingOpening> {
        let snapshot = group.get(wall)?.clone();
        let engine = self.clone();
        let (tx, rx) = mpsc::channel();

        tracing::debug!(kind = kind.as_str(), "opening cut queued");
        rayon::spawn(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(|| {
                engine.add_opening(&snapshot, &config, kind)
            }))
            .unwrap_or_else(|payload| Err(Error::KernelPanic(panic_message(payload.as_ref()))));
            if tx.send(result).is_err() {
                tracing::debug!("opening cut finished after its handle was dropped");
            }
        });

        Ok(PendingOpening { wall, rx })
    }
}
