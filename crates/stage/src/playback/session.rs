//! Join bookkeeping for one press of Play.

use std::collections::BTreeSet;

use bevy::prelude::*;

use super::events::PlayCompleted;
use crate::sprite::SpriteId;

/// Which sprites are still playing. A session completes only once every
/// timeline it started has finished.
#[derive(Resource, Debug, Clone, Default)]
pub struct PlaySession {
    started_at_ms: Option<u64>,
    pending: BTreeSet<SpriteId>,
    last_completed: Option<PlayCompleted>,
    completed_count: u64,
}

impl PlaySession {
    pub fn begin(&mut self, sprites: impl IntoIterator<Item = SpriteId>, now_ms: u64) {
        self.started_at_ms = Some(now_ms);
        self.pending = sprites.into_iter().collect();
    }

    pub fn is_active(&self) -> bool {
        self.started_at_ms.is_some()
    }

    pub fn is_playing(&self, sprite: SpriteId) -> bool {
        self.pending.contains(&sprite)
    }

    pub fn pending(&self) -> impl Iterator<Item = SpriteId> + '_ {
        self.pending.iter().copied()
    }

    pub fn mark_finished(&mut self, sprite: SpriteId) {
        self.pending.remove(&sprite);
    }

    /// Close the session if nothing is pending any more.
    pub fn try_complete(&mut self, now_ms: u64) -> Option<PlayCompleted> {
        if !self.pending.is_empty() {
            return None;
        }
        self.close(now_ms, false)
    }

    /// Close the session regardless of pending timelines.
    pub fn cancel(&mut self, now_ms: u64) -> Option<PlayCompleted> {
        self.pending.clear();
        self.close(now_ms, true)
    }

    fn close(&mut self, now_ms: u64, cancelled: bool) -> Option<PlayCompleted> {
        let started_at_ms = self.started_at_ms.take()?;
        let completed = PlayCompleted {
            started_at_ms,
            finished_at_ms: now_ms,
            cancelled,
        };
        self.last_completed = Some(completed.clone());
        self.completed_count += 1;
        Some(completed)
    }

    pub fn last_completed(&self) -> Option<&PlayCompleted> {
        self.last_completed.as_ref()
    }

    /// Number of sessions that have completed or been cancelled.
    pub fn completed_count(&self) -> u64 {
        self.completed_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completes_only_after_every_sprite_finishes() {
        let mut session = PlaySession::default();
        session.begin([SpriteId(1), SpriteId(2)], 100);
        assert!(session.is_active());

        session.mark_finished(SpriteId(1));
        assert_eq!(session.try_complete(600), None);
        assert!(session.is_playing(SpriteId(2)));

        session.mark_finished(SpriteId(2));
        let done = session.try_complete(1100).expect("all sprites finished");
        assert_eq!(
            done,
            PlayCompleted {
                started_at_ms: 100,
                finished_at_ms: 1100,
                cancelled: false
            }
        );
        assert!(!session.is_active());
        assert_eq!(session.completed_count(), 1);
    }

    #[test]
    fn empty_session_completes_immediately() {
        let mut session = PlaySession::default();
        session.begin(std::iter::empty(), 0);
        assert!(session.try_complete(0).is_some());
    }

    #[test]
    fn inactive_session_never_completes() {
        let mut session = PlaySession::default();
        assert_eq!(session.try_complete(0), None);
        assert_eq!(session.cancel(0), None);
        assert_eq!(session.completed_count(), 0);
    }

    #[test]
    fn cancel_reports_cancelled() {
        let mut session = PlaySession::default();
        session.begin([SpriteId(3)], 0);
        let done = session.cancel(200).expect("active session");
        assert!(done.cancelled);
        assert_eq!(session.pending().count(), 0);
        assert_eq!(session.last_completed(), Some(&done));
    }
}
