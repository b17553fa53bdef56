use std::sync::Once;

use docshelf_core::{update, AppState, Document, Effect, Filter, Msg};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(client_logging::initialize_for_tests);
}

fn doc(id: &str, tag: &str) -> Document {
    Document {
        id: id.to_string(),
        title: id.to_string(),
        filename: format!("{id}.pdf"),
        ext: ".pdf".to_string(),
        size: 2048,
        updated_at: 1_700_000_000,
        tag: tag.to_string(),
    }
}

fn booted(tags: &[&str], docs: Vec<Document>) -> AppState {
    let (state, effects) = update(AppState::new(), Msg::BootRequested);
    assert_eq!(effects, vec![Effect::LoadRegistry]);

    let (state, effects) = update(
        state,
        Msg::RegistryLoaded {
            result: Ok(tags.iter().map(|tag| tag.to_string()).collect()),
        },
    );
    let generation = match effects.as_slice() {
        [Effect::LoadDocuments { generation, filter }] => {
            assert_eq!(filter, "All");
            *generation
        }
        other => panic!("expected a single list refresh, got {other:?}"),
    };

    let (state, effects) = update(
        state,
        Msg::DocsLoaded {
            generation,
            result: Ok(docs),
        },
    );
    assert!(effects.is_empty());
    state
}

#[test]
fn add_tag_reloads_registry_without_optimistic_insert() {
    init_logging();
    let state = booted(&[], Vec::new());

    let (state, _) = update(state, Msg::TagInputChanged("invoices".to_string()));
    assert!(state.view().tag_actions_enabled);

    let (state, effects) = update(state, Msg::AddTagClicked);
    assert_eq!(
        effects,
        vec![Effect::AddTag {
            name: "invoices".to_string()
        }]
    );
    // Nothing is inserted until the reload returns.
    assert_eq!(state.registry(), &[] as &[String]);

    let (state, effects) = update(state, Msg::TagAdded { result: Ok(()) });
    assert_eq!(effects, vec![Effect::LoadRegistry]);
    assert_eq!(state.tag_input(), "");

    let (state, _) = update(
        state,
        Msg::RegistryLoaded {
            result: Ok(vec!["invoices".to_string()]),
        },
    );
    let labels: Vec<String> = state
        .view()
        .chips
        .into_iter()
        .map(|chip| chip.label)
        .collect();
    assert_eq!(labels, vec!["All".to_string(), "invoices".to_string()]);
}

#[test]
fn blank_tag_input_disables_both_actions() {
    init_logging();
    let state = booted(&["a"], Vec::new());

    let (state, _) = update(state, Msg::TagInputChanged("   ".to_string()));
    assert!(!state.view().tag_actions_enabled);

    let (state, effects) = update(state, Msg::AddTagClicked);
    assert!(effects.is_empty());
    let (_state, effects) = update(state, Msg::DeleteTagClicked);
    assert!(effects.is_empty());
}

#[test]
fn add_tag_failure_alerts_and_keeps_input() {
    init_logging();
    let state = booted(&[], Vec::new());
    let (state, _) = update(state, Msg::TagInputChanged("invoices".to_string()));
    let (state, _) = update(state, Msg::AddTagClicked);

    let (mut state, effects) = update(
        state,
        Msg::TagAdded {
            result: Err("Tag name required".to_string()),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.take_alert().as_deref(), Some("Tag name required"));
    assert_eq!(state.tag_input(), "invoices");
}

#[test]
fn deleting_active_filter_resets_to_all_before_refresh() {
    init_logging();
    let state = booted(&["invoices"], vec![doc("7", "invoices")]);

    let (state, effects) = update(state, Msg::FilterSelected("invoices".to_string()));
    let generation = match effects.as_slice() {
        [Effect::LoadDocuments { generation, filter }] => {
            assert_eq!(filter, "invoices");
            *generation
        }
        other => panic!("unexpected effects {other:?}"),
    };
    let (state, _) = update(
        state,
        Msg::DocsLoaded {
            generation,
            result: Ok(vec![doc("7", "invoices")]),
        },
    );

    let (state, _) = update(state, Msg::TagInputChanged("invoices".to_string()));
    let (state, effects) = update(state, Msg::DeleteTagClicked);
    assert_eq!(
        effects,
        vec![Effect::DeleteTag {
            name: "invoices".to_string()
        }]
    );

    let (state, effects) = update(
        state,
        Msg::TagDeleted {
            name: "invoices".to_string(),
            result: Ok(()),
        },
    );
    // The filter falls back first; only the registry reload goes out until it
    // lands, keeping registry-before-list ordering.
    assert_eq!(state.filter(), &Filter::All);
    assert_eq!(effects, vec![Effect::LoadRegistry]);

    let (state, effects) = update(state, Msg::RegistryLoaded { result: Ok(Vec::new()) });
    match effects.as_slice() {
        [Effect::LoadDocuments { filter, .. }] => assert_eq!(filter, "All"),
        other => panic!("unexpected effects {other:?}"),
    }
    assert_eq!(state.filter(), &Filter::All);
}

#[test]
fn registry_reload_missing_active_filter_resets() {
    init_logging();
    let state = booted(&["drafts"], Vec::new());
    let (state, _) = update(state, Msg::FilterSelected("drafts".to_string()));

    let (state, _) = update(
        state,
        Msg::RegistryLoaded {
            result: Ok(vec!["other".to_string()]),
        },
    );
    assert_eq!(state.filter(), &Filter::All);
}

#[test]
fn boot_failure_is_swallowed_into_diagnostic() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::BootRequested);
    let (mut state, effects) = update(
        state,
        Msg::RegistryLoaded {
            result: Err("connection refused".to_string()),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.take_alert(), None);
    assert_eq!(state.boot_diagnostic(), Some("connection refused"));
    assert!(!state.is_booting());
}

#[test]
fn resync_registry_failure_alerts() {
    init_logging();
    let state = booted(&[], Vec::new());
    let (state, _) = update(state, Msg::ResyncRequested);
    let (mut state, effects) = update(
        state,
        Msg::RegistryLoaded {
            result: Err("bad gateway".to_string()),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.take_alert().as_deref(), Some("bad gateway"));
}
