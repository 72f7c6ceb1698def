mod common;

use kanban_board::error::AppError;
use kanban_board::models::NewMember;
use pretty_assertions::assert_eq;

fn member(user_id: i32, role: &str) -> NewMember {
    NewMember {
        user_id,
        role: role.to_string(),
    }
}

#[actix_rt::test]
async fn test_add_and_list_members() {
    let h = common::harness();
    let (owner, project, _, _) = h.seeded().await;
    let guest = h.user("guest").await;

    let added = h
        .state
        .members
        .add_member(project.id, member(guest.id, "viewer"))
        .await
        .unwrap();
    assert_eq!(added.message, "User added to project successfully");

    let members = h.state.members.list_members(project.id).await.unwrap();
    let pairs: Vec<(i32, &str)> = members
        .iter()
        .map(|m| (m.user_id, m.role.as_str()))
        .collect();
    assert_eq!(pairs, vec![(owner.id, "user"), (guest.id, "viewer")]);
    assert_eq!(members[1].email, "guest@example.com");
}

#[actix_rt::test]
async fn test_add_member_twice_conflicts() {
    let h = common::harness();
    let (owner, project, _, _) = h.seeded().await;

    let err = h
        .state
        .members
        .add_member(project.id, member(owner.id, "admin"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        AppError::Conflict("User is already in the project".into())
    );
}

#[actix_rt::test]
async fn test_add_member_integrity_failures() {
    let h = common::harness();
    let (_, project, _, _) = h.seeded().await;
    let guest = h.user("guest").await;

    let no_user = h
        .state
        .members
        .add_member(project.id, member(0, "viewer"))
        .await;
    assert!(matches!(no_user, Err(AppError::BadRequest(_))));

    let no_user_long_role = h
        .state
        .members
        .add_member(project.id, member(0, &"r".repeat(65)))
        .await;
    assert!(matches!(no_user_long_role, Err(AppError::BadRequest(_))));

    let long_role = h
        .state
        .members
        .add_member(project.id, member(guest.id, &"r".repeat(65)))
        .await;
    assert!(matches!(long_role, Err(AppError::ValidationError(_))));

    let no_role = h
        .state
        .members
        .add_member(project.id, member(guest.id, ""))
        .await;
    assert!(matches!(no_role, Err(AppError::BadRequest(_))));

    let unknown_project = h
        .state
        .members
        .add_member(project.id + 100, member(guest.id, "viewer"))
        .await;
    assert!(matches!(unknown_project, Err(AppError::NotFound(_))));

    let unknown_user = h
        .state
        .members
        .add_member(project.id, member(5150, "viewer"))
        .await;
    assert!(matches!(unknown_user, Err(AppError::NotFound(_))));

    assert_eq!(h.state.members.list_members(project.id).await.unwrap().len(), 1);
}

#[actix_rt::test]
async fn test_remove_member() {
    let h = common::harness();
    let (_, project, _, _) = h.seeded().await;
    let guest = h.user("guest").await;
    h.state
        .members
        .add_member(project.id, member(guest.id, "viewer"))
        .await
        .unwrap();

    let removed = h
        .state
        .members
        .remove_member(project.id, guest.id)
        .await
        .unwrap();
    assert_eq!(removed.message, "User removed from project successfully");

    let again = h
        .state
        .members
        .remove_member(project.id, guest.id)
        .await
        .unwrap_err();
    assert_eq!(again, AppError::NotFound("User is not in the project".into()));

    let missing_id = h.state.members.remove_member(project.id, 0).await;
    assert!(matches!(missing_id, Err(AppError::BadRequest(_))));
}
