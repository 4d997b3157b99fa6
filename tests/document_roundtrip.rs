// SPDX-FileCopyrightText: 2026 the Rhizome authors
// SPDX-License-Identifier: LicenseRef-Rhizome-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Rhizome and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! End-to-end round trip: build a map through the store API, export it,
//! parse it back, and keep working on the restored state.

use rhizome::format::{export_document, parse_document};
use rhizome::model::NodePatch;
use rhizome::store::MapStore;

#[test]
fn edited_map_survives_the_document_round_trip() {
    let mut store = MapStore::new();
    let root = store.add_root_node();
    store
        .rename_node(&root, "日本語のルート \"quoted\"")
        .expect("rename root");
    store.update_selected_node(&NodePatch {
        color: Some("#a8e6cf".to_owned()),
        question: Some("What is the theme?".to_owned()),
        answer: Some("Resilience.".to_owned()),
        ..NodePatch::default()
    });

    let child = store.add_child_node().expect("child");
    store.rename_node(&child, "Branch — ünïcödé").expect("rename child");
    store.select_node(Some(root.clone())).expect("reselect");
    store.add_child_nodes(&["Left".to_owned(), "Right".to_owned()]);
    store.align();

    let document = export_document(store.map()).expect("export");

    // The document is presentable markdown with the tagged payload fence.
    assert!(document.starts_with("# MindMap Export"));
    assert!(document.contains("```mermaid"));
    assert!(document.contains("graph TD"));
    assert!(document.contains("```json"));
    assert!(document.contains("#quot;quoted#quot;"));

    let restored = parse_document(&document).expect("parse");
    assert_eq!(&restored, store.map());

    // The restored state is fully operational: load it into a fresh store
    // and keep editing.
    let mut second = MapStore::with_map(restored);
    second.select_node(Some(root)).expect("select root");
    assert_eq!(
        second
            .chat_history()
            .iter()
            .map(|m| m.content())
            .collect::<Vec<_>>(),
        vec!["What is the theme?", "Resilience."]
    );

    let grandchild = second.add_child_node().expect("grandchild");
    assert!(second.map().incoming_edge(&grandchild).is_some());
}
