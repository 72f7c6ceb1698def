#![allow(dead_code)]

use std::sync::Arc;

use chrono::Duration;
use kanban_board::auth::TokenService;
use kanban_board::config::PatchSemantics;
use kanban_board::models::{
    BoardWithColumns, NewBoard, NewProject, NewTask, Project, Task, User,
};
use kanban_board::store::{MemoryStore, Store};
use kanban_board::AppState;

pub const TEST_SECRET: &str = "integration-test-secret";

pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub state: AppState,
}

pub fn harness() -> Harness {
    harness_with(PatchSemantics::EmptyMeansUnchanged)
}

pub fn harness_with(patch: PatchSemantics) -> Harness {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::with_parts(
        store.clone() as Arc<dyn Store>,
        TokenService::new(TEST_SECRET, Duration::hours(1)),
        patch,
    );
    Harness { store, state }
}

impl Harness {
    /// Inserts a user straight into the store, skipping bcrypt.
    pub async fn user(&self, name: &str) -> User {
        self.store
            .insert_user(name, &format!("{}@example.com", name), "not-a-real-hash")
            .await
            .expect("insert user")
    }

    pub async fn project(&self, owner: &User, name: &str) -> Project {
        self.state
            .projects
            .create_project(NewProject {
                user_id: owner.id,
                name: name.to_string(),
                description: format!("{} description", name),
            })
            .await
            .expect("create project")
    }

    pub async fn board(&self, project: &Project, name: &str) -> BoardWithColumns {
        self.state
            .boards
            .create_board(NewBoard {
                project_id: project.id,
                name: name.to_string(),
            })
            .await
            .expect("create board")
    }

    pub async fn task(&self, column_id: i32, title: &str) -> Task {
        self.state
            .tasks
            .create_task(NewTask {
                column_id,
                title: title.to_string(),
                description: String::new(),
            })
            .await
            .expect("create task")
    }

    /// A user, a project, a board and the board's `todo` column id.
    pub async fn seeded(&self) -> (User, Project, BoardWithColumns, i32) {
        let owner = self.user("owner").await;
        let project = self.project(&owner, "Apollo").await;
        let board = self.board(&project, "Sprint1").await;
        let todo = board.columns[0].id;
        (owner, project, board, todo)
    }
}
