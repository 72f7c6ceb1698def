//! Task audit trail entries.
//!
//! Every task mutation writes exactly one [`NewTaskLog`] in the same store transaction as the
//! mutation itself. This module decides what that entry says and when it is stamped.

use chrono::{DateTime, Utc};

use crate::models::{NewTaskLog, TaskAction};

pub fn message_for(action: TaskAction) -> &'static str {
    match action {
        TaskAction::Create => "Task created successfully",
        TaskAction::Update => "Task updated successfully",
        TaskAction::Delete => "Task deleted successfully",
    }
}

/// Entry stamped at `at`. Creation passes the task's own timestamp so both rows agree.
pub fn entry_at(action: TaskAction, at: DateTime<Utc>) -> NewTaskLog {
    NewTaskLog {
        action,
        log_message: message_for(action).to_string(),
        created_at: at,
    }
}

pub fn entry(action: TaskAction) -> NewTaskLog {
    entry_at(action, Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_entry_carries_action_and_message() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let log = entry_at(TaskAction::Delete, at);
        assert_eq!(log.action, TaskAction::Delete);
        assert_eq!(log.log_message, "Task deleted successfully");
        assert_eq!(log.created_at, at);
    }

    #[test]
    fn test_entry_is_stamped_now() {
        let before = Utc::now();
        let log = entry(TaskAction::Update);
        assert!(log.created_at >= before);
        assert_eq!(log.log_message, message_for(TaskAction::Update));
    }
}
