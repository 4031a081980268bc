use reel_db::models::VideoRow;
use reel_db::queries::VideoScope;
use reel_types::api::Claims;

/// Who is asking. Inserted into request extensions by the auth middleware.
#[derive(Debug, Clone)]
pub enum Viewer {
    Anonymous,
    User(Claims),
}

/// Staff see everything, owners see their own drafts, everyone sees published videos.
pub fn can_view(viewer: &Viewer, video: &VideoRow) -> bool {
    if video.is_published {
        return true;
    }
    match viewer {
        Viewer::Anonymous => false,
        Viewer::User(claims) => claims.is_staff || claims.sub.to_string() == video.owner_id,
    }
}

/// The listing filter that matches `can_view`.
pub fn scope_for(viewer: &Viewer) -> VideoScope {
    match viewer {
        Viewer::Anonymous => VideoScope::Published,
        Viewer::User(claims) if claims.is_staff => VideoScope::All,
        Viewer::User(claims) => VideoScope::PublishedOrOwnedBy(claims.sub.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn user(id: Uuid, is_staff: bool) -> Viewer {
        Viewer::User(Claims {
            sub: id,
            username: "someone".into(),
            is_staff,
            exp: 0,
        })
    }

    fn draft(owner: Uuid) -> VideoRow {
        VideoRow {
            id: Uuid::new_v4().to_string(),
            owner_id: owner.to_string(),
            owner_username: "owner".into(),
            name: "draft".into(),
            is_published: false,
            total_likes: 0,
            created_at: "2025-01-01 00:00:00.000".into(),
        }
    }

    #[test]
    fn drafts_are_visible_to_owner_and_staff_only() {
        let owner = Uuid::new_v4();
        let video = draft(owner);

        assert!(!can_view(&Viewer::Anonymous, &video));
        assert!(!can_view(&user(Uuid::new_v4(), false), &video));
        assert!(can_view(&user(owner, false), &video));
        assert!(can_view(&user(Uuid::new_v4(), true), &video));
    }

    #[test]
    fn published_is_visible_to_everyone() {
        let mut video = draft(Uuid::new_v4());
        video.is_published = true;
        assert!(can_view(&Viewer::Anonymous, &video));
    }

    #[test]
    fn scopes_follow_roles() {
        let id = Uuid::new_v4();
        assert_eq!(scope_for(&Viewer::Anonymous), VideoScope::Published);
        assert_eq!(scope_for(&user(id, true)), VideoScope::All);
        assert_eq!(scope_for(&user(id, false)), VideoScope::PublishedOrOwnedBy(id.to_string()));
    }
}
