//! Post-event rating: the eligibility gate and the rating ledger.
//!
//! Rating is permitted iff the viewer's participation state is `Joined` and
//! the activity is ended - never for the organizer of their own activity,
//! never before the end. One rater rates multiple co-participants
//! independently, so "already rated" is a per-ratee fact, not a single flag.

use std::fmt;

use serde::Serialize;

use crate::activity::{Activity, ActivityId, UserId};
use crate::error::{DomainError, IneligibilityReason, Resource};
use crate::participation::state::ParticipationState;

/// A rating score, validated to 1..=5 at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Score(u8);

impl Score {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Result<Self, DomainError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(DomainError::ScoreRange { score: value })
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One submitted rating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rating {
    pub activity: ActivityId,
    pub rater: UserId,
    pub ratee: UserId,
    pub score: Score,
    pub comment: Option<String>,
}

/// Gate and ledger for one activity's post-event ratings.
///
/// At most one rating exists per (rater, ratee) pair; re-submitting
/// overwrites the stored rating instead of creating a duplicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingGate {
    activity: ActivityId,
    ratings: Vec<Rating>,
}

impl RatingGate {
    pub fn new(activity: ActivityId) -> Self {
        Self {
            activity,
            ratings: Vec::new(),
        }
    }

    /// Whether a viewer in `state` may rate at all right now.
    ///
    /// Every refusal is a `NotEligible` so callers can key UI affordances
    /// off a single error kind; the reason says which guard tripped.
    pub fn eligibility(
        state: &ParticipationState,
        activity: &Activity,
    ) -> Result<(), DomainError> {
        if activity.is_cancelled() {
            return Err(DomainError::NotEligible {
                reason: IneligibilityReason::ActivityCancelled,
            });
        }
        if !activity.is_ended() {
            return Err(DomainError::NotEligible {
                reason: IneligibilityReason::NotYetEnded,
            });
        }
        if !state.is_joined() {
            return Err(DomainError::NotEligible {
                reason: IneligibilityReason::NotMember,
            });
        }
        Ok(())
    }

    /// Record or overwrite a rating.
    ///
    /// Guards run in order: eligibility, self-rating, score range, ratee
    /// membership. `roster` is the rateable set for this activity (the
    /// organizer plus accepted members), supplied by the session.
    #[allow(clippy::too_many_arguments)]
    pub fn submit(
        &mut self,
        rater: &UserId,
        ratee: &UserId,
        score: u8,
        comment: Option<String>,
        state: &ParticipationState,
        activity: &Activity,
        roster: &[UserId],
    ) -> Result<&Rating, DomainError> {
        Self::eligibility(state, activity)?;
        if rater == ratee {
            return Err(DomainError::NotEligible {
                reason: IneligibilityReason::SelfRating,
            });
        }
        let score = Score::new(score)?;
        if !roster.iter().any(|member| member == ratee) {
            return Err(DomainError::NotFound {
                kind: Resource::Participant,
                id: ratee.to_string(),
            });
        }

        let rating = Rating {
            activity: self.activity.clone(),
            rater: rater.clone(),
            ratee: ratee.clone(),
            score,
            comment,
        };
        let index = match self
            .ratings
            .iter()
            .position(|existing| &existing.rater == rater && &existing.ratee == ratee)
        {
            Some(index) => {
                self.ratings[index] = rating;
                index
            }
            None => {
                self.ratings.push(rating);
                self.ratings.len() - 1
            }
        };
        Ok(&self.ratings[index])
    }

    /// True if `rater` has already rated `ratee`.
    pub fn is_rated(&self, rater: &UserId, ratee: &UserId) -> bool {
        self.ratings
            .iter()
            .any(|rating| &rating.rater == rater && &rating.ratee == ratee)
    }

    /// Ratings `rater` has given, in first-submission order.
    pub fn given(&self, rater: &UserId) -> impl Iterator<Item = &Rating> + '_ {
        let rater = rater.clone();
        self.ratings
            .iter()
            .filter(move |rating| rating.rater == rater)
    }

    /// All stored ratings in first-submission order.
    pub fn ratings(&self) -> &[Rating] {
        &self.ratings
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::ActivityStatus;
    use chrono::{TimeZone, Utc};

    fn activity_with_status(status: ActivityStatus) -> Activity {
        Activity {
            id: ActivityId::from("act-1"),
            title: "Harbor walk".to_string(),
            organizer: UserId::from("mira"),
            starts_at: Utc.with_ymd_and_hms(2030, 6, 7, 17, 30, 0).unwrap(),
            ends_at: Utc.with_ymd_and_hms(2030, 6, 7, 20, 0, 0).unwrap(),
            max_participants: Some(4),
            status,
        }
    }

    #[test]
    fn test_score_range() {
        assert!(Score::new(1).is_ok());
        assert!(Score::new(5).is_ok());
        assert_eq!(
            Score::new(0).unwrap_err(),
            DomainError::ScoreRange { score: 0 }
        );
        assert_eq!(
            Score::new(6).unwrap_err(),
            DomainError::ScoreRange { score: 6 }
        );
    }

    #[test]
    fn test_eligibility_requires_ended() {
        // Not ended fails NotEligible regardless of role.
        for state in [
            ParticipationState::Idle,
            ParticipationState::Applied,
            ParticipationState::Joined,
            ParticipationState::Organizer,
        ] {
            let err =
                RatingGate::eligibility(&state, &activity_with_status(ActivityStatus::Open))
                    .unwrap_err();
            assert!(
                matches!(err, DomainError::NotEligible { .. }),
                "state {} on an open activity must be ineligible",
                state
            );
        }
    }

    #[test]
    fn test_eligibility_requires_joined() {
        // Role != Joined fails NotEligible regardless of ended.
        let ended = activity_with_status(ActivityStatus::Ended);
        for state in [
            ParticipationState::Idle,
            ParticipationState::Applied,
            ParticipationState::Organizer,
        ] {
            let err = RatingGate::eligibility(&state, &ended).unwrap_err();
            assert_eq!(
                err,
                DomainError::NotEligible {
                    reason: IneligibilityReason::NotMember
                },
                "state {} must not be allowed to rate",
                state
            );
        }

        assert!(RatingGate::eligibility(&ParticipationState::Joined, &ended).is_ok());
    }

    #[test]
    fn test_eligibility_refuses_cancelled_activity() {
        let err = RatingGate::eligibility(
            &ParticipationState::Joined,
            &activity_with_status(ActivityStatus::Cancelled),
        )
        .unwrap_err();

        assert_eq!(
            err,
            DomainError::NotEligible {
                reason: IneligibilityReason::ActivityCancelled
            }
        );
    }

    #[test]
    fn test_submit_records_rating() {
        let mut gate = RatingGate::new(ActivityId::from("act-1"));
        let ended = activity_with_status(ActivityStatus::Ended);
        let rater = UserId::from("kai");
        let ratee = UserId::from("mira");
        let roster = [ratee.clone()];

        let rating = gate
            .submit(
                &rater,
                &ratee,
                4,
                Some("great guide".to_string()),
                &ParticipationState::Joined,
                &ended,
                &roster,
            )
            .unwrap();

        assert_eq!(rating.score.value(), 4);
        assert!(gate.is_rated(&rater, &ratee));
    }

    #[test]
    fn test_resubmit_overwrites_not_duplicates() {
        // Score 4 then score 2 leaves exactly one stored rating with score 2.
        let mut gate = RatingGate::new(ActivityId::from("act-1"));
        let ended = activity_with_status(ActivityStatus::Ended);
        let rater = UserId::from("kai");
        let ratee = UserId::from("mira");
        let roster = [ratee.clone()];

        gate.submit(
            &rater,
            &ratee,
            4,
            None,
            &ParticipationState::Joined,
            &ended,
            &roster,
        )
        .unwrap();
        gate.submit(
            &rater,
            &ratee,
            2,
            None,
            &ParticipationState::Joined,
            &ended,
            &roster,
        )
        .unwrap();

        assert_eq!(gate.len(), 1);
        assert_eq!(gate.ratings()[0].score.value(), 2);
    }

    #[test]
    fn test_self_rating_refused() {
        let mut gate = RatingGate::new(ActivityId::from("act-1"));
        let ended = activity_with_status(ActivityStatus::Ended);
        let rater = UserId::from("kai");
        let roster = [rater.clone()];

        let err = gate
            .submit(
                &rater,
                &rater,
                5,
                None,
                &ParticipationState::Joined,
                &ended,
                &roster,
            )
            .unwrap_err();

        assert_eq!(
            err,
            DomainError::NotEligible {
                reason: IneligibilityReason::SelfRating
            }
        );
    }

    #[test]
    fn test_unknown_ratee_fails_not_found() {
        let mut gate = RatingGate::new(ActivityId::from("act-1"));
        let ended = activity_with_status(ActivityStatus::Ended);
        let rater = UserId::from("kai");
        let stranger = UserId::from("drive-by");
        let member = UserId::from("noor");
        let roster = [member.clone()];

        let err = gate
            .submit(
                &rater,
                &stranger,
                3,
                None,
                &ParticipationState::Joined,
                &ended,
                &roster,
            )
            .unwrap_err();

        assert_eq!(
            err,
            DomainError::NotFound {
                kind: Resource::Participant,
                id: "drive-by".to_string(),
            }
        );
    }

    #[test]
    fn test_out_of_range_score_rejected_before_storage() {
        let mut gate = RatingGate::new(ActivityId::from("act-1"));
        let ended = activity_with_status(ActivityStatus::Ended);
        let rater = UserId::from("kai");
        let ratee = UserId::from("mira");
        let roster = [ratee.clone()];

        let err = gate
            .submit(
                &rater,
                &ratee,
                0,
                None,
                &ParticipationState::Joined,
                &ended,
                &roster,
            )
            .unwrap_err();

        assert!(matches!(err, DomainError::ScoreRange { score: 0 }));
        assert!(gate.is_empty());
    }

    #[test]
    fn test_rated_flags_are_per_ratee() {
        let mut gate = RatingGate::new(ActivityId::from("act-1"));
        let ended = activity_with_status(ActivityStatus::Ended);
        let rater = UserId::from("kai");
        let first = UserId::from("mira");
        let second = UserId::from("noor");
        let roster = [first.clone(), second.clone()];

        gate.submit(
            &rater,
            &first,
            5,
            None,
            &ParticipationState::Joined,
            &ended,
            &roster,
        )
        .unwrap();

        assert!(gate.is_rated(&rater, &first));
        assert!(!gate.is_rated(&rater, &second));
        assert_eq!(gate.given(&rater).count(), 1);
    }

    use proptest::prelude::*;

    proptest! {
        /// Property: for any pair of valid scores, resubmitting leaves one
        /// rating holding the second score
        #[test]
        fn resubmission_keeps_the_last_score(
            first in 1u8..=5,
            second in 1u8..=5,
            comment in proptest::option::of(".*"),
        ) {
            let mut gate = RatingGate::new(ActivityId::from("act-1"));
            let ended = activity_with_status(ActivityStatus::Ended);
            let rater = UserId::from("kai");
            let ratee = UserId::from("mira");
            let roster = [ratee.clone()];

            gate.submit(
                &rater,
                &ratee,
                first,
                None,
                &ParticipationState::Joined,
                &ended,
                &roster,
            )
            .unwrap();
            gate.submit(
                &rater,
                &ratee,
                second,
                comment,
                &ParticipationState::Joined,
                &ended,
                &roster,
            )
            .unwrap();

            prop_assert_eq!(gate.len(), 1, "overwrite grew the rating list");
            prop_assert_eq!(gate.ratings()[0].score.value(), second);
        }

        /// Property: scores outside 1..=5 are refused and never stored
        #[test]
        fn invalid_scores_never_stored(score in 0u8..=255) {
            prop_assume!(!(1..=5).contains(&score));

            let mut gate = RatingGate::new(ActivityId::from("act-1"));
            let ended = activity_with_status(ActivityStatus::Ended);
            let rater = UserId::from("kai");
            let ratee = UserId::from("mira");
            let roster = [ratee.clone()];

            let err = gate
                .submit(
                    &rater,
                    &ratee,
                    score,
                    None,
                    &ParticipationState::Joined,
                    &ended,
                    &roster,
                )
                .unwrap_err();

            prop_assert_eq!(err, DomainError::ScoreRange { score });
            prop_assert!(gate.is_empty(), "a refused score was stored anyway");
        }
    }
}
