use pdf_annotate::*;

fn loaded(page_count: usize) -> SessionState {
    reduce(SessionState::default(), Action::Load { page_count }).unwrap()
}

fn toggle_all(mut state: SessionState, indices: &[usize]) -> SessionState {
    for &index in indices {
        state = reduce(state, Action::Toggle(index)).unwrap();
    }
    state
}

fn custom_template() -> BatchTemplate {
    AnnotationSettings {
        has_border: true,
        border_margin: 25.0,
        has_page_number: true,
        page_number_position: Position::new(90.0, 95.0),
        page_number_weight: FontWeight::Bold,
        page_number_size: 18.0,
        has_footer: true,
        footer_text: "Confidential".to_string(),
        footer_position: Position::new(50.0, 3.0),
        footer_weight: FontWeight::Regular,
        footer_size: 8.0,
    }
}

#[test]
fn test_sequential_number_follows_selection_order() {
    let state = toggle_all(loaded(6), &[4, 1, 5, 0]);

    let assigned: Vec<SequentialNumber> = state
        .configs
        .iter()
        .map(|config| config.sequential_number)
        .collect();
    assert_eq!(
        assigned,
        vec![
            SequentialNumber::Assigned(4),
            SequentialNumber::Assigned(2),
            SequentialNumber::Unassigned,
            SequentialNumber::Unassigned,
            SequentialNumber::Assigned(1),
            SequentialNumber::Assigned(3),
        ]
    );
}

#[test]
fn test_sequential_number_matches_rank_for_every_prefix() {
    let sequence = [2, 0, 3, 0, 1, 2, 4, 0, 3];
    let mut state = loaded(5);
    for &index in &sequence {
        state = reduce(state, Action::Toggle(index)).unwrap();

        let order = state.selection.as_slice();
        for (page, config) in state.configs.iter().enumerate() {
            match order.iter().position(|&i| i == page) {
                Some(rank) => {
                    assert_eq!(config.sequential_number, SequentialNumber::Assigned(rank + 1))
                }
                None => assert_eq!(config.sequential_number, SequentialNumber::Unassigned),
            }
        }
    }
}

#[test]
fn test_reselecting_moves_page_to_end() {
    let state = toggle_all(loaded(4), &[0, 1, 2, 0, 0]);

    assert_eq!(state.selection.as_slice(), &[1, 2, 0]);
    assert_eq!(state.configs[0].sequential_number, SequentialNumber::Assigned(3));
    assert_eq!(state.configs[1].sequential_number, SequentialNumber::Assigned(1));
    assert_eq!(state.configs[2].sequential_number, SequentialNumber::Assigned(2));
}

#[test]
fn test_selected_pages_take_the_template() {
    let mut state = reduce(loaded(3), Action::SetTemplate(custom_template())).unwrap();
    state = toggle_all(state, &[2]);

    assert_eq!(state.configs[2].settings, custom_template());
    assert!(state.configs[0].settings.is_disabled());
    assert!(state.configs[1].settings.is_disabled());
}

#[test]
fn test_deselect_resets_to_defaults() {
    let mut state = reduce(loaded(3), Action::SetTemplate(custom_template())).unwrap();
    state = toggle_all(state, &[1, 1]);

    let config = &state.configs[1];
    assert_eq!(config.settings, AnnotationSettings::default());
    assert_eq!(config.settings.border_margin, 40.0);
    assert_eq!(config.settings.page_number_position, Position::new(50.0, 5.0));
    assert_eq!(config.settings.page_number_size, 12.0);
    assert_eq!(config.settings.footer_text, "");
    assert_eq!(config.settings.footer_position, Position::new(50.0, 2.0));
    assert_eq!(config.settings.footer_size, 10.0);
    assert_eq!(config.sequential_number, SequentialNumber::Unassigned);
    assert_eq!(config.page_number, 2);
}

#[test]
fn test_deselect_discards_per_page_edits() {
    let mut state = toggle_all(loaded(2), &[0]);
    state = reduce(
        state,
        Action::EditPage {
            index: 0,
            settings: custom_template(),
        },
    )
    .unwrap();
    state = toggle_all(state, &[0, 0]);

    assert_eq!(state.configs[0].settings, AnnotationSettings::template());
}

#[test]
fn test_set_template_updates_only_selected_pages() {
    let before = toggle_all(loaded(5), &[3, 1]);
    let after = reduce(before.clone(), Action::SetTemplate(custom_template())).unwrap();

    for index in 0..5 {
        let old = &before.configs[index];
        let new = &after.configs[index];
        assert_eq!(new.page_number, old.page_number);
        assert_eq!(new.sequential_number, old.sequential_number);
        if index == 1 || index == 3 {
            assert_eq!(new.settings, custom_template());
        } else {
            assert_eq!(new, old);
        }
    }
    assert_eq!(after.template, custom_template());
}

#[test]
fn test_set_template_without_selection_changes_no_config() {
    let before = loaded(3);
    let after = reduce(before.clone(), Action::SetTemplate(custom_template())).unwrap();
    assert_eq!(after.configs, before.configs);
    assert_eq!(after.template, custom_template());
}

#[test]
fn test_set_template_leaves_unselected_edits_alone() {
    let mut state = reduce(
        loaded(3),
        Action::EditPage {
            index: 2,
            settings: custom_template(),
        },
    )
    .unwrap();
    state = toggle_all(state, &[0]);
    // the toggle resyncs page 2 back to disabled
    assert!(state.configs[2].settings.is_disabled());

    state = reduce(
        state,
        Action::EditPage {
            index: 2,
            settings: custom_template(),
        },
    )
    .unwrap();
    state = reduce(state, Action::SetTemplate(AnnotationSettings::default())).unwrap();
    assert_eq!(state.configs[2].settings, custom_template());
}

#[test]
fn test_toggle_out_of_range_is_rejected() {
    let state = loaded(3);
    let err = reduce(state, Action::Toggle(3)).unwrap_err();
    assert!(matches!(
        err,
        AnnotateError::PageOutOfRange {
            index: 3,
            page_count: 3
        }
    ));
    assert_eq!(err.code(), ErrorCode::Processing);
}

#[test]
fn test_edit_page_out_of_range_is_rejected() {
    let result = reduce(
        loaded(1),
        Action::EditPage {
            index: 1,
            settings: custom_template(),
        },
    );
    assert!(matches!(result, Err(AnnotateError::PageOutOfRange { .. })));
}

#[test]
fn test_set_template_rejects_selection_past_configs() {
    let mut state = toggle_all(loaded(5), &[1, 4]);
    state.configs.truncate(2);

    let err = reduce(state, Action::SetTemplate(custom_template())).unwrap_err();
    assert!(matches!(
        err,
        AnnotateError::PageOutOfRange {
            index: 4,
            page_count: 2
        }
    ));
}

#[test]
fn test_load_replaces_previous_document() {
    let state = toggle_all(loaded(4), &[0, 1]);
    let state = reduce(state, Action::Load { page_count: 2 }).unwrap();

    assert_eq!(state.configs.len(), 2);
    assert!(state.selection.is_empty());
    assert!(state.configs.iter().all(|c| !c.sequential_number.is_assigned()));
}

#[test]
fn test_initial_template() {
    let template = SessionState::default().template;
    assert!(template.has_border);
    assert_eq!(template.border_margin, 40.0);
    assert!(template.has_page_number);
    assert_eq!(template.page_number_weight, FontWeight::Regular);
    assert!(!template.has_footer);
}
