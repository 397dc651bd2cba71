//! Unit tests for the workflow context.


use crate::test_support::{issue_number, repo};
use crate::workflow::domain::{Subject, Workflow};

pub(super) const WORKFLOW_YAML: &str = r#"
workflow:
  - name: kubernetes
    labels:
      - group: status
        labels: [welcome, translating, pushed, finished]
      - group: priority
        labels: [high, low]
    events:
      on_issue:
        - regex: opened
          actions:
            - type: label
              value: {group: status, label: welcome, mutex: true}
      on_comment:
        - regex: "/accept"
          conditions:
            - type: state
              value: open
              failed_actions:
                - type: comment
                  value: "@%operator% this issue is closed"
            - type: labels
              value: [welcome]
            - type: assigned
              value: "false"
            - type: user_is_member
              value: true
            - type: search
              value: {assignee: "%operator%", label: translating, max: 2}
          actions:
            - type: assign
              value: "%operator%"
            - type: label
              value: {group: status, label: translating, mutex: true}
        - regex: "/approve"
          conditions:
            - type: user_in_list
              value: ["%admin%"]
              failed_actions:
                - type: comment
                  value: "Only %admin_list% can approve"
          actions:
            - type: set_state
              value: closed
        - regex: "/track .+"
          actions:
            - type: create_issue
              value: {title: Follow-up, body: tracked elsewhere}
  - name: minimal
    events:
      on_comment:
        - regex: "/ping"
          actions:
            - type: comment
              value: pong
"#;

pub(super) fn kubernetes() -> Workflow {
    Workflow::load(WORKFLOW_YAML, "kubernetes")
        .unwrap_or_else(|err| panic!("test workflow: {err}"))
}

pub(super) fn admins() -> Vec<String> {
    vec!["alice".to_owned(), "carol".to_owned()]
}

pub(super) fn subject(sender: &str, command: &str) -> Subject {
    Subject::new(repo("owner/site"), issue_number(7), sender, command)
}
