//! Write-time audience validation.

use domains::{Audience, DomainError, DomainResult, GroupService, UserId, ALL};
use tracing::{debug, warn};

/// Resolves the audience requested for a new post by `actor`.
///
/// An absent request, an empty list, or any list containing `"all"` resolves
/// to the public audience without touching the group registry. Restricted
/// audiences require an authenticated actor and groups that all exist; every
/// missing group is reported at once. The accepted list is returned as given.
pub async fn validate_audience(
    requested: Option<&[String]>,
    actor: UserId,
    groups: &dyn GroupService,
) -> DomainResult<Audience> {
    let tokens = match requested {
        Some(tokens) if !tokens.is_empty() && !tokens.iter().any(|t| t == ALL) => tokens,
        _ => {
            debug!(uid = %actor, "public audience");
            return Ok(Audience::public());
        }
    };

    if actor.is_guest() {
        warn!("guest attempted a restricted post");
        return Err(DomainError::GuestRestrictedPost);
    }

    let exists = groups.exists(tokens).await?;
    let unknown: Vec<String> = tokens
        .iter()
        .enumerate()
        .filter(|(index, _)| !exists.get(*index).copied().unwrap_or(false))
        .map(|(_, name)| name.clone())
        .collect();

    if !unknown.is_empty() {
        warn!(uid = %actor, ?unknown, "audience names unknown groups");
        return Err(DomainError::UnknownGroups(unknown));
    }

    debug!(uid = %actor, groups = ?tokens, "restricted audience accepted");
    Ok(Audience::restricted(tokens.to_vec()))
}
