//! Display lines and chooser headers.

use restart_core::{BackendKind, CheckState, ReviewItem, SubTask};

pub const ITEM_HEADER: &str = "Select PR to restart checks (❌=failed, 🟡=pending, ✅=success)";

/// Header for the job chooser, naming the icon of every backend.
pub fn task_header() -> String {
    let legend = [BackendKind::GithubActions, BackendKind::Jenkins]
        .iter()
        .map(|kind| format!("{}={}", kind.icon(), kind.label()))
        .collect::<Vec<_>>()
        .join(", ");
    format!("Select jobs to restart ({legend}, TAB: multi-select, Ctrl+A: select all)")
}

pub fn item_icon(item: &ReviewItem) -> String {
    match item.state() {
        CheckState::Failure => format!("❌({})", item.checks.failed),
        CheckState::Pending => format!("🟡({})", item.checks.pending),
        CheckState::Success => "✅".to_string(),
    }
}

/// `#42 ❌(1) [@octo] Fix flaky test`
pub fn item_line(item: &ReviewItem) -> String {
    format!(
        "#{} {} [@{}] {}",
        item.number,
        item_icon(item),
        item.author,
        item.title
    )
}

/// `github 🔧 ❌ CI                        build [05-01 10:00]`
pub fn task_line(task: &SubTask) -> String {
    format!(
        "{} {} {} {:<25} {} [{}]",
        task.backend.tag(),
        task.backend.icon(),
        task.state.icon(),
        task.workflow_name,
        task.run_name,
        task.created_at_short()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use restart_core::SubTaskState;

    #[test]
    fn item_lines_per_state() {
        let failing = ReviewItem::new(42, "Fix flaky test", "octo", "abc123", ["FAILURE", "PENDING"]);
        assert_eq!(item_line(&failing), "#42 ❌(1) [@octo] Fix flaky test");

        let pending = ReviewItem::new(43, "Docs", "octo", "def", ["SUCCESS", "QUEUED", "IN_PROGRESS"]);
        assert_eq!(item_line(&pending), "#43 🟡(2) [@octo] Docs");

        let green = ReviewItem::new(44, "Chore", "octo", "fed", Vec::<String>::new());
        assert_eq!(item_line(&green), "#44 ✅ [@octo] Chore");
    }

    #[test]
    fn task_line_pads_workflow_name() {
        let task = SubTask {
            backend: BackendKind::GithubActions,
            id: "555".to_string(),
            workflow_name: "CI".to_string(),
            run_name: "build".to_string(),
            state: SubTaskState::Failure,
            created_at: "2024-05-01T10:00:00Z".to_string(),
        };
        assert_eq!(
            task_line(&task),
            format!("github 🔧 ❌ CI{} build [05-01 10:00]", " ".repeat(23))
        );
    }

    #[test]
    fn task_line_keeps_raw_timestamp() {
        let task = SubTask {
            backend: BackendKind::Jenkins,
            id: "https://ci.example/job/lint/42/".to_string(),
            workflow_name: "lint".to_string(),
            run_name: "Jenkins Job".to_string(),
            state: SubTaskState::Pending,
            created_at: "n/a".to_string(),
        };
        assert!(task_line(&task).starts_with("jenkins ⚙️ 🟡 lint"));
        assert!(task_line(&task).ends_with("Jenkins Job [n/a]"));
    }

    #[test]
    fn task_header_names_backends() {
        let header = task_header();
        assert!(header.contains("🔧=GitHub Actions"));
        assert!(header.contains("⚙️=Jenkins"));
    }
}
