use crate::models::Participant;

/// Check whether a stage-one pair may take part in group formation
///
/// Both members must have opted in.
#[inline]
pub fn is_group_eligible(youth: &Participant, elder: &Participant) -> bool {
    youth.wants_group && elder.wants_group
}
