//! Authorization for commands that act on someone else's library.

use crate::audience::Community;
use crate::error::{GameLibError, Result};
use crate::types::UserId;

/// Members may always act on their own library. Acting on another member's
/// library requires the manage-community capability.
pub fn authorize(community: &dyn Community, target: UserId) -> Result<()> {
    let requester = community.requester();
    if requester == target || community.can_manage(requester) {
        return Ok(());
    }
    Err(GameLibError::Unauthorized {
        requester: requester.get(),
        action: format!("manage the library of user {target}"),
    })
}

/// Global settings (the integration credential) are manager-only.
pub fn authorize_admin(community: &dyn Community) -> Result<()> {
    let requester = community.requester();
    if community.can_manage(requester) {
        return Ok(());
    }
    Err(GameLibError::Unauthorized {
        requester: requester.get(),
        action: "change global settings".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audience::tests::{member, FakeCommunity};
    use crate::types::Presence;

    fn community(requester: u64) -> FakeCommunity {
        let mut admin = member(1, Presence::Online);
        admin.can_manage = true;
        FakeCommunity {
            requester: UserId(requester),
            members: vec![admin, member(2, Presence::Online)],
            voice: None,
        }
    }

    #[test]
    fn self_target_always_allowed() {
        assert!(authorize(&community(2), UserId(2)).is_ok());
    }

    #[test]
    fn other_target_requires_manage() {
        assert!(authorize(&community(1), UserId(2)).is_ok());
        let err = authorize(&community(2), UserId(1)).unwrap_err();
        assert!(matches!(err, GameLibError::Unauthorized { requester: 2, .. }));
        assert!(err.to_string().contains("library of user 1"), "{err}");
    }

    #[test]
    fn admin_settings_require_manage() {
        assert!(authorize_admin(&community(1)).is_ok());
        assert!(authorize_admin(&community(2)).is_err());
    }
}
