//! Defendant acknowledgement.

use crate::error::VerificationError;
use jury_types::{Dispute, DomainEvent, ParticipantId};

pub struct VerificationGate;

impl VerificationGate {
    /// Check that `caller` may verify `dispute`, without mutating it.
    pub fn check(
        &self,
        dispute: &Dispute,
        caller: &ParticipantId,
    ) -> Result<(), VerificationError> {
        if dispute.resolved {
            return Err(VerificationError::DisputeResolved(dispute.id));
        }
        if dispute.defendant != *caller {
            return Err(VerificationError::NotDefendant {
                dispute: dispute.id,
                caller: caller.clone(),
            });
        }
        if dispute.defendant_verified {
            return Err(VerificationError::AlreadyVerified(dispute.id));
        }
        Ok(())
    }

    /// Record the defendant's acknowledgement.
    pub fn verify(
        &self,
        dispute: &mut Dispute,
        caller: &ParticipantId,
    ) -> Result<DomainEvent, VerificationError> {
        self.check(dispute, caller)?;

        dispute.defendant_verified = true;
        dispute.verification_complete = dispute.disputant_verified && dispute.defendant_verified;

        tracing::info!(
            dispute = %dispute.id,
            defendant = %caller,
            complete = dispute.verification_complete,
            "defendant verified dispute"
        );

        Ok(DomainEvent::Verified {
            dispute_id: dispute.id,
            defendant: caller.clone(),
        })
    }
}
