//! Integration tests for directory browsing driven by notifications.

mod helpers;

use std::sync::Arc;

use serde_json::json;

use gridstudy::FixtureBackend;
use gridstudy_core::config::directory::DirectoryConfig;
use gridstudy_core::types::ElementId;
use gridstudy_directory::{DirectoryExplorer, ElementType};
use gridstudy_realtime::DispatchOutcome;

use helpers::{TestStudy, directory, directory_updated, element, names, roots_updated};

struct Layout {
    study: TestStudy,
    beta: ElementId,
    alpha: ElementId,
    xray: ElementId,
    winds: ElementId,
}

async fn layout() -> Layout {
    let study = TestStudy::new();
    let (beta, alpha, xray, winds) = (
        ElementId::new(),
        ElementId::new(),
        ElementId::new(),
        ElementId::new(),
    );
    study
        .backend
        .set_roots(vec![directory(beta, "Beta"), directory(alpha, "alpha")]);
    study.backend.set_directory_content(
        beta,
        vec![
            directory(xray, "x-ray"),
            element(ElementId::new(), "Case", ElementType::Study),
            directory(winds, "Winds"),
        ],
    );
    study.backend.set_directory_content(alpha, Vec::new());
    study.backend.set_directory_content(xray, Vec::new());
    study.explorer.refresh_roots().await.unwrap();
    Layout {
        study,
        beta,
        alpha,
        xray,
        winds,
    }
}

#[tokio::test]
async fn test_roots_and_selection_are_sorted() {
    let l = layout().await;
    let tree = l.study.explorer.tree();
    let roots: Vec<_> = tree.roots().iter().map(|n| n.element_name.as_str()).collect();
    assert_eq!(roots, vec!["alpha", "Beta"]);

    assert!(l.study.explorer.select_directory(l.beta).await.unwrap());
    let children = l.study.explorer.current_children().unwrap();
    assert_eq!(names(&children), vec!["Case", "Winds", "x-ray"]);

    let tree = l.study.explorer.tree();
    let beta = tree.get(&l.beta).unwrap();
    let subdirs: Vec<_> = beta.children.iter().map(|c| c.element_uuid).collect();
    assert_eq!(subdirs, vec![l.winds, l.xray]);
    assert_eq!(beta.subdirectories_count, 2);
}

#[tokio::test]
async fn test_directory_notification_refreshes_selected_content() {
    let l = layout().await;
    l.study.explorer.select_directory(l.beta).await.unwrap();
    let xray_before = l.study.explorer.tree().get(&l.xray).cloned().unwrap();
    let alpha_before = l.study.explorer.tree().get(&l.alpha).cloned().unwrap();

    let yard = ElementId::new();
    l.study.backend.set_directory_content(
        l.beta,
        vec![
            directory(l.xray, "x-ray"),
            element(ElementId::new(), "Case", ElementType::Study),
            directory(l.winds, "Winds"),
            directory(yard, "Yard"),
        ],
    );
    assert_eq!(
        l.study.notify(directory_updated(l.beta)).await,
        DispatchOutcome::Applied
    );

    let tree = l.study.explorer.tree();
    assert_eq!(tree.get(&l.beta).unwrap().children.len(), 3);
    assert!(tree.contains(&yard));
    assert!(Arc::ptr_eq(&xray_before, tree.get(&l.xray).unwrap()));
    assert!(Arc::ptr_eq(&alpha_before, tree.get(&l.alpha).unwrap()));

    let children = l.study.explorer.current_children().unwrap();
    assert_eq!(names(&children), vec!["Case", "Winds", "x-ray", "Yard"]);
}

#[tokio::test]
async fn test_deleted_selection_is_cleared() {
    let l = layout().await;
    l.study.explorer.refresh_directory(l.beta).await.unwrap();
    assert!(l.study.explorer.select_directory(l.xray).await.unwrap());

    l.study
        .backend
        .set_directory_content(l.beta, vec![directory(l.winds, "Winds")]);
    l.study.notify(directory_updated(l.beta)).await;

    assert_eq!(l.study.explorer.selected_directory(), None);
    assert!(l.study.explorer.current_children().is_none());
    assert!(!l.study.explorer.contains(&l.xray));
}

#[tokio::test]
async fn test_removed_root_is_purged_with_its_subtree() {
    let l = layout().await;
    l.study.explorer.refresh_directory(l.beta).await.unwrap();
    assert!(l.study.explorer.contains(&l.winds));

    l.study.backend.set_roots(vec![directory(l.alpha, "alpha")]);
    assert_eq!(l.study.notify(roots_updated()).await, DispatchOutcome::Applied);

    let tree = l.study.explorer.tree();
    assert_eq!(tree.roots().len(), 1);
    assert!(!tree.contains(&l.beta));
    assert!(!tree.contains(&l.winds));
    assert!(!tree.contains(&l.xray));
    assert_eq!(tree.len(), 1);
}

#[tokio::test]
async fn test_unknown_directory_is_ignored() {
    let l = layout().await;
    let before = l.study.explorer.tree();
    assert_eq!(
        l.study.notify(directory_updated(ElementId::new())).await,
        DispatchOutcome::Ignored
    );
    assert!(before.same_as(&l.study.explorer.tree()));
}

#[tokio::test]
async fn test_fixture_document_builds_tree() {
    let (root, sub) = (ElementId::new(), ElementId::new());
    let fixture = json!({
        "roots": [{ "elementUuid": root, "elementName": "Studies", "type": "DIRECTORY", "subdirectoriesCount": 1 }],
        "directories": {
            root.to_string(): [
                { "elementUuid": sub, "elementName": "Grid 2030", "type": "DIRECTORY",
                  "accessRights": { "isPrivate": true }, "owner": "bob" },
                { "elementUuid": ElementId::new(), "elementName": "Peak load", "type": "CONTINGENCY_LIST" }
            ]
        }
    });
    let backend = Arc::new(FixtureBackend::from_json(&fixture.to_string()).unwrap());
    let explorer = DirectoryExplorer::new(backend, DirectoryConfig::default());

    explorer.refresh_roots().await.unwrap();
    let tree = explorer.refresh_directory(root).await.unwrap();
    let node = tree.get(&sub).unwrap();
    assert_eq!(node.parent_uuid, Some(root));
    assert!(node.access_rights.is_private);
    assert_eq!(tree.len(), 2);
}
