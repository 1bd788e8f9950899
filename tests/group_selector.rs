mod common;

use cohortdesk::backend::{Group, InMemoryBackend};
use cohortdesk::ui::components::{GroupSelector, SelectionState, SelectorVariant};
use cohortdesk::ui::core::{Action, Component, Notification, NotificationBus};
use common::{backend_with_group, roster};
use std::time::Duration;

const COOLDOWN: Duration = Duration::from_millis(2000);

fn inline_selector(bus: &NotificationBus, students: usize) -> (GroupSelector, InMemoryBackend, Group) {
    let (backend, group) = backend_with_group();
    let mut selector = GroupSelector::new(SelectorVariant::Inline { cooldown: COOLDOWN }, bus);
    assert_eq!(selector.initialize(roster(students), &backend), Action::None);
    (selector, backend, group)
}

fn list_selector(bus: &NotificationBus, students: usize, groups: Vec<Group>) -> GroupSelector {
    let backend = InMemoryBackend::logged_in("6446", "Test Advisor");
    let mut selector = GroupSelector::new(SelectorVariant::ListView, bus);
    assert_eq!(selector.initialize(roster(students), &backend), Action::LoadMyGroups);
    assert!(selector.is_loading());
    selector.update(Action::GroupsLoaded(groups));
    selector
}

/// `select_all` iff non-empty and all selected; bulk menu iff anything selected
fn assert_invariants(selector: &GroupSelector) {
    let entries = selector.entries();
    let all = !entries.is_empty() && entries.iter().all(|e| e.selected_for_bulk_action);
    let any = entries.iter().any(|e| e.selected_for_bulk_action);
    let view = selector.view_state();
    assert_eq!(view.select_all, all);
    assert_eq!(view.show_bulk_menu, all || any);
}

#[test]
fn test_initialize_clears_checkboxes_and_reads_session_groups() {
    let bus = NotificationBus::new();
    let (selector, _backend, group) = inline_selector(&bus, 5);

    assert_eq!(selector.selection_state(), SelectionState::NoneSelected);
    assert!(selector.entries().iter().all(|e| !e.selected_for_bulk_action));
    assert_eq!(selector.groups().len(), 1);
    assert_eq!(selector.groups()[0].group.id, group.id);
    assert!(!selector.is_loading());
    assert_invariants(&selector);
}

#[test]
fn test_toggle_all_sets_every_checkbox() {
    let bus = NotificationBus::new();
    let (mut selector, _, _) = inline_selector(&bus, 4);

    selector.toggle_all(Some(true));
    assert!(selector.view_state().select_all);
    assert!(selector.entries().iter().all(|e| e.selected_for_bulk_action));
    assert_invariants(&selector);

    selector.toggle_all(Some(false));
    assert!(!selector.view_state().select_all);
    assert!(selector.entries().iter().all(|e| !e.selected_for_bulk_action));
    assert_invariants(&selector);
}

#[test]
fn test_toggle_all_without_value_flips_aggregate() {
    let bus = NotificationBus::new();
    let (mut selector, _, _) = inline_selector(&bus, 3);

    selector.toggle_item(1);
    selector.toggle_all(None);
    assert_eq!(selector.selection_state(), SelectionState::AllSelected);

    selector.toggle_all(None);
    assert_eq!(selector.selection_state(), SelectionState::NoneSelected);
}

#[test]
fn test_empty_roster_is_never_all_selected() {
    let bus = NotificationBus::new();
    let (mut selector, _, _) = inline_selector(&bus, 0);

    selector.toggle_all(Some(true));
    assert_eq!(selector.selection_state(), SelectionState::NoneSelected);
    assert!(!selector.view_state().select_all);
    assert!(!selector.view_state().show_bulk_menu);
}

#[test]
fn test_toggle_item_tracks_tri_state() {
    let bus = NotificationBus::new();
    let (mut selector, _, _) = inline_selector(&bus, 3);

    selector.toggle_item(0);
    assert_eq!(selector.selection_state(), SelectionState::SomeSelected);
    assert!(selector.view_state().show_bulk_menu);
    assert_invariants(&selector);

    selector.toggle_item(1);
    selector.toggle_item(2);
    assert_eq!(selector.selection_state(), SelectionState::AllSelected);
    assert_invariants(&selector);

    selector.toggle_item(1);
    assert_eq!(selector.selection_state(), SelectionState::SomeSelected);
    assert!(!selector.view_state().select_all);
    assert_invariants(&selector);
}

#[test]
fn test_toggle_item_round_trip_restores_state() {
    let bus = NotificationBus::new();
    let (mut selector, _, _) = inline_selector(&bus, 5);
    selector.toggle_item(0);
    selector.toggle_item(3);

    for index in 0..5 {
        let before = (selector.selection_state(), selector.view_state());
        selector.toggle_item(index);
        selector.toggle_item(index);
        assert_eq!((selector.selection_state(), selector.view_state()), before);
    }
}

#[test]
fn test_toggle_item_out_of_range_is_ignored() {
    let bus = NotificationBus::new();
    let (mut selector, _, _) = inline_selector(&bus, 2);
    selector.toggle_item(7);
    assert_eq!(selector.selection_state(), SelectionState::NoneSelected);
}

#[test]
fn test_assign_requests_only_selected_non_members() {
    let bus = NotificationBus::new();
    let (backend, _) = backend_with_group();
    let students = roster(4);
    let group = backend.insert_group("Honors", &students[..1]);
    let mut selector = GroupSelector::new(SelectorVariant::Inline { cooldown: COOLDOWN }, &bus);
    selector.initialize(students.clone(), &backend);

    selector.toggle_item(0);
    selector.toggle_item(2);
    let action = selector.assign_selected_to(group.id);

    assert_eq!(
        action,
        Action::AddMembers {
            group_id: group.id,
            members: vec![students[2].clone()],
            cooldown: Some(COOLDOWN),
        }
    );
    assert!(selector.view_state().is_saving);
}

#[test]
fn test_repeat_assignment_is_suppressed() {
    let bus = NotificationBus::new();
    let (mut selector, _, group) = inline_selector(&bus, 5);

    selector.toggle_item(0);
    selector.toggle_item(1);
    let first = selector.assign_selected_to(group.id);
    let Action::AddMembers { members, .. } = first.clone() else {
        panic!("expected an add-members request, got {:?}", first);
    };
    assert_eq!(members.len(), 2);

    selector.update(Action::MembersAdded {
        group_id: group.id,
        members,
    });
    selector.update(Action::SelectorCooldownElapsed);

    // Same selection again: everybody is already a member
    selector.toggle_item(0);
    selector.toggle_item(1);
    let second = selector.assign_selected_to(group.id);
    assert_eq!(second, Action::StartSelectorCooldown(COOLDOWN));
}

#[test]
fn test_repeat_assignment_before_completion_is_suppressed() {
    let bus = NotificationBus::new();
    let (mut selector, _, group) = inline_selector(&bus, 3);
    selector.toggle_item(0);
    selector.toggle_item(1);

    assert!(matches!(
        selector.assign_selected_to(group.id),
        Action::AddMembers { ref members, .. } if members.len() == 2
    ));
    // No completion in between
    assert_eq!(
        selector.assign_selected_to(group.id),
        Action::StartSelectorCooldown(COOLDOWN)
    );
}

#[test]
fn test_failed_add_can_be_retried() {
    let bus = NotificationBus::new();
    let (mut selector, _, group) = inline_selector(&bus, 3);
    selector.toggle_item(0);
    selector.assign_selected_to(group.id);

    selector.update(Action::AddMembersFailed {
        group_id: group.id,
        message: "boom".to_string(),
    });
    selector.update(Action::SelectorCooldownElapsed);
    assert!(!selector.groups()[0].group.contains("1000"));

    selector.toggle_item(0);
    assert!(matches!(
        selector.assign_selected_to(group.id),
        Action::AddMembers { ref members, .. } if members.len() == 1
    ));
}

#[test]
fn test_overlapping_cooldowns_release_after_the_last() {
    let bus = NotificationBus::new();
    let (mut selector, _, group) = inline_selector(&bus, 3);
    selector.toggle_all(Some(true));
    selector.assign_selected_to(group.id);

    // A group created during the busy window gets the same selection
    bus.publish(Notification::GroupCreated {
        group: Group::new(42, "New Group"),
    });
    let actions = selector.poll_notifications();
    assert!(matches!(
        actions.as_slice(),
        [Action::AddMembers { group_id: 42, cooldown: Some(_), .. }]
    ));

    selector.update(Action::SelectorCooldownElapsed);
    assert!(selector.view_state().is_saving);
    assert_eq!(selector.selection_state(), SelectionState::AllSelected);

    selector.update(Action::SelectorCooldownElapsed);
    assert!(!selector.view_state().is_saving);
    assert_eq!(selector.selection_state(), SelectionState::NoneSelected);
}

#[test]
fn test_remove_student_recomputes_selection() {
    let bus = NotificationBus::new();
    let (mut selector, _, _) = inline_selector(&bus, 3);
    selector.toggle_item(0);
    selector.toggle_item(2);
    assert_eq!(selector.selection_state(), SelectionState::SomeSelected);

    selector.remove_student("1001");
    let sids: Vec<&str> = selector.students().map(|s| s.sid.as_str()).collect();
    assert_eq!(sids, ["1000", "1002"]);
    assert_eq!(selector.selection_state(), SelectionState::AllSelected);
    assert_invariants(&selector);

    selector.remove_student("9999");
    assert_eq!(selector.entries().len(), 2);
}

#[test]
fn test_pick_group_deselects_chips() {
    let bus = NotificationBus::new();
    let (mut selector, _, _) = inline_selector(&bus, 2);
    selector.toggle_all(Some(true));

    let action = selector.pick_group(0);
    assert!(matches!(action, Action::AddMembers { .. }));
    assert!(selector.groups().iter().all(|chip| !chip.selected));
    assert_eq!(selector.pick_group(9), Action::None);
}

#[test]
fn test_inline_stays_busy_until_cooldown() {
    let bus = NotificationBus::new();
    let (mut selector, _, group) = inline_selector(&bus, 3);
    selector.toggle_all(Some(true));
    let Action::AddMembers { members, .. } = selector.assign_selected_to(group.id) else {
        panic!("expected an add-members request");
    };

    selector.update(Action::MembersAdded {
        group_id: group.id,
        members,
    });
    assert!(selector.view_state().is_saving);
    assert_eq!(selector.selection_state(), SelectionState::NoneSelected);
    assert!(!selector.view_state().show_bulk_menu);

    selector.update(Action::SelectorCooldownElapsed);
    assert!(!selector.view_state().is_saving);
    assert_invariants(&selector);
}

#[test]
fn test_inline_failure_keeps_busy_until_cooldown() {
    let bus = NotificationBus::new();
    let (mut selector, _, group) = inline_selector(&bus, 3);
    selector.toggle_item(0);
    selector.assign_selected_to(group.id);

    selector.update(Action::AddMembersFailed {
        group_id: group.id,
        message: "boom".to_string(),
    });
    assert!(selector.view_state().is_saving);
    assert!(selector.error_message().is_some_and(|m| m.contains("boom")));

    selector.update(Action::SelectorCooldownElapsed);
    assert!(!selector.view_state().is_saving);
    assert_eq!(selector.selected_count(), 0);
}

#[test]
fn test_list_view_resets_immediately() {
    let bus = NotificationBus::new();
    let group = Group::new(7, "Cool Kids");
    let mut selector = list_selector(&bus, 4, vec![group.clone()]);
    assert!(!selector.is_loading());

    selector.toggle_item(1);
    selector.toggle_item(3);
    let action = selector.assign_selected_to(group.id);

    assert!(matches!(action, Action::AddMembers { cooldown: None, ref members, .. } if members.len() == 2));
    assert_eq!(selector.selection_state(), SelectionState::NoneSelected);
    assert!(!selector.view_state().show_bulk_menu);
    assert!(selector.view_state().is_saving);

    selector.update(Action::MembersAdded {
        group_id: group.id,
        members: Vec::new(),
    });
    assert!(!selector.view_state().is_saving);
}

#[test]
fn test_list_view_with_nothing_selected_issues_nothing() {
    let bus = NotificationBus::new();
    let mut selector = list_selector(&bus, 2, vec![Group::new(3, "Empty")]);
    assert_eq!(selector.assign_selected_to(3), Action::None);
    assert!(!selector.view_state().is_saving);
}

#[test]
fn test_group_created_appends_and_assigns_selection() {
    let bus = NotificationBus::new();
    let (mut selector, _, _) = inline_selector(&bus, 5);
    selector.toggle_item(0);
    selector.toggle_item(2);
    selector.toggle_item(4);

    let created = Group::new(42, "New Group");
    assert_eq!(
        bus.publish(Notification::GroupCreated {
            group: created.clone()
        }),
        1
    );
    let actions = selector.poll_notifications();

    assert_eq!(selector.groups().last().map(|chip| chip.group.id), Some(42));
    assert_eq!(actions.len(), 1);
    let Action::AddMembers { group_id, members, .. } = actions[0].clone() else {
        panic!("expected an add-members request, got {:?}", actions[0]);
    };
    assert_eq!(group_id, 42);
    let sids: Vec<&str> = members.iter().map(|m| m.sid.as_str()).collect();
    assert_eq!(sids, ["1000", "1002", "1004"]);

    selector.update(Action::MembersAdded { group_id, members });
    assert_eq!(selector.selected_count(), 0);
    assert!(!selector.view_state().show_bulk_menu);
}

#[test]
fn test_group_created_twice_is_appended_once() {
    let bus = NotificationBus::new();
    let (mut selector, _, _) = inline_selector(&bus, 1);
    let created = Group::new(42, "New Group");

    bus.publish(Notification::GroupCreated { group: created.clone() });
    bus.publish(Notification::GroupCreated { group: created });
    selector.poll_notifications();

    assert_eq!(selector.groups().iter().filter(|chip| chip.group.id == 42).count(), 1);
}

#[test]
fn test_reset_notification_targets_matching_variant() {
    let bus = NotificationBus::new();
    let (mut inline, _, _) = inline_selector(&bus, 3);
    let mut list = list_selector(&bus, 3, Vec::new());
    inline.toggle_all(Some(true));
    list.toggle_all(Some(true));

    bus.publish(Notification::ResetCuratedCohortSelector);
    inline.poll_notifications();
    list.poll_notifications();
    assert_eq!(inline.selection_state(), SelectionState::NoneSelected);
    assert_eq!(list.selection_state(), SelectionState::AllSelected);

    bus.publish(Notification::ResetStudentGroupsSelector);
    list.poll_notifications();
    assert_eq!(list.selection_state(), SelectionState::NoneSelected);
}

#[test]
fn test_late_success_after_reset_still_applies() {
    let bus = NotificationBus::new();
    let (mut selector, _, group) = inline_selector(&bus, 2);
    selector.toggle_all(Some(true));
    let Action::AddMembers { members, .. } = selector.assign_selected_to(group.id) else {
        panic!("expected an add-members request");
    };

    bus.publish(Notification::ResetCuratedCohortSelector);
    selector.poll_notifications();
    selector.toggle_item(0);

    selector.update(Action::MembersAdded {
        group_id: group.id,
        members,
    });
    assert_eq!(selector.selected_count(), 0);
    assert!(selector.groups()[0].group.contains("1000"));
    assert!(selector.groups()[0].group.contains("1001"));
}
