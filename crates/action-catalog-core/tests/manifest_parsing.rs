//! Manifest parser behavior on real-world manifest shapes.

use action_catalog_core::{parse_manifest, sanitize, UNDEFINED};

const COMPOSITE: &str = include_str!("fixtures/composite_action.yml");
const NODE: &str = include_str!("fixtures/node_action.yml");
const BROKEN: &str = include_str!("fixtures/broken_action.yml");

#[test]
fn composite_manifest_fields_and_steps() {
    let record = parse_manifest("fixtures/composite_action.yml", Some("test"), COMPOSITE);

    // Emoji and variation selector are not letters; the space after them is kept.
    assert_eq!(record.name, " PR Name Validation");
    // `&` is dropped, leaving both surrounding spaces.
    assert_eq!(record.author, "Andreas Dukstad  Arne Kristian Jansen");
    assert_eq!(
        record.description,
        "This action will validate the name of a PR ensuring it follows the expected naming rules"
    );
    assert_eq!(record.using, "composite");

    assert_eq!(record.steps.actions.len(), 2);
    assert_eq!(record.steps.shell.len(), 4);

    assert_eq!(record.steps.actions[0].action, "actions/checkout");
    assert_eq!(record.steps.actions[0].git_ref, "v2");
    assert_eq!(
        record.steps.actions[1].action,
        "amannn/action-semantic-pull-request"
    );
    assert_eq!(
        record.steps.actions[1].git_ref,
        "01d5fd8a8ebb9aafe902c40c53f0f4744f7381eb"
    );

    assert_eq!(record.steps.shell[0]["name"], "Print PR title");
    assert_eq!(record.steps.shell[3]["name"], "Done");
}

#[test]
fn node_manifest_has_no_steps() {
    let record = parse_manifest("action.yml", Some("test"), NODE);

    assert_eq!(record.name, "Load available actions");
    assert_eq!(record.author, "Rob Bos");
    assert_eq!(
        record.description,
        "Load an overview of all available actions in a GitHub Organization by looking for the actionymlyaml files"
    );
    assert_eq!(record.using, "node16");
    assert!(record.steps.actions.is_empty());
    assert!(record.steps.shell.is_empty());
}

#[test]
fn broken_manifest_falls_back_to_defaults() {
    let record = parse_manifest("action.yml", Some("octo/link-check"), BROKEN);

    assert_eq!(record.name, UNDEFINED);
    assert_eq!(record.author, UNDEFINED);
    assert_eq!(record.description, UNDEFINED);
    assert_eq!(record.using, UNDEFINED);
}

#[test]
fn parsed_fields_are_sanitized_or_undefined() {
    for content in [COMPOSITE, NODE, BROKEN, "", "name: ''", "::::", "runs: 5"] {
        let record = parse_manifest("action.yml", None, content);
        for field in [&record.name, &record.author, &record.description, &record.using] {
            assert!(
                field == UNDEFINED || (!field.is_empty() && sanitize(field) == **field),
                "unexpected field value {field:?}"
            );
        }
    }
}
