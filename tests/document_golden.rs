//! Golden tests for the workspace document format
//!
//! The JSON document is the contract with remote services and with
//! documents written by other tools, so its field names must stay stable.

use c4_cli::domain::{ElementSpec, ItemId, Location, RelationshipSpec};
use c4_cli::exchange;
use c4_cli::view::{FilterMode, PaperSize};
use c4_cli::Workspace;
use serde_json::{json, Value};

fn id(value: &str) -> ItemId {
    ItemId::try_from(value).unwrap()
}

/// Customer uses Internet Banking, which has an API deployed to Live
fn bank_workspace() -> Workspace {
    let mut workspace = Workspace::new("Bank", "Internet banking");
    let model = &mut workspace.model;

    let customer = model
        .add_person(
            ElementSpec::new("Customer")
                .id("customer")
                .location(Location::External),
        )
        .unwrap();
    let bank = model
        .add_software_system(ElementSpec::new("Internet Banking").id("bank"))
        .unwrap();
    let api = model
        .add_container(&bank, ElementSpec::new("API").id("api").technology("Rust"))
        .unwrap();
    model
        .add_relationship(
            RelationshipSpec::new(&customer, &bank, "Views balances using")
                .id("r1")
                .technology("HTTPS"),
        )
        .unwrap();
    let node = model
        .add_deployment_node("Live", ElementSpec::new("Server").id("server"))
        .unwrap();
    model.add_container_instance(&node, &api).unwrap();

    let Workspace { model, views, .. } = &mut workspace;
    let context = views
        .create_system_context_view(model, &id("bank"), "Context", "Bank in context")
        .unwrap();
    context.add_nearest_neighbours(model, &id("bank")).unwrap();
    context.paper_size = Some(PaperSize::A4Landscape);
    views
        .create_filtered_view(
            "Context",
            "External",
            "",
            FilterMode::Exclude,
            vec!["Internal".to_string()],
        )
        .unwrap();

    workspace
}

fn document(workspace: &Workspace) -> Value {
    let json = exchange::to_json(workspace, false).unwrap();
    serde_json::from_str(&json).unwrap()
}

// =============================================================================
// Model Records
// =============================================================================

#[test]
fn test_person_record() {
    let doc = document(&bank_workspace());

    assert_eq!(
        doc["model"]["people"],
        json!([{
            "id": "customer",
            "name": "Customer",
            "description": "",
            "tags": "Element,Person",
            "location": "External",
            "relationships": [{
                "id": "r1",
                "description": "Views balances using",
                "tags": "Relationship,Synchronous",
                "sourceId": "customer",
                "destinationId": "bank",
                "technology": "HTTPS",
                "interactionStyle": "Synchronous"
            }]
        }])
    );
}

#[test]
fn test_software_system_nests_containers() {
    let doc = document(&bank_workspace());
    let system = &doc["model"]["softwareSystems"][0];

    assert_eq!(system["id"], "bank");
    assert_eq!(system["tags"], "Element,Software System");
    assert_eq!(system["location"], "Unspecified");
    assert!(system.get("relationships").is_none());
    assert_eq!(
        system["containers"],
        json!([{
            "id": "api",
            "name": "API",
            "description": "",
            "tags": "Element,Container",
            "technology": "Rust"
        }])
    );
}

#[test]
fn test_deployment_node_record() {
    let doc = document(&bank_workspace());
    let node = &doc["model"]["deploymentNodes"][0];

    assert_eq!(node["id"], "server");
    assert_eq!(node["environment"], "Live");
    assert_eq!(node["instances"], 1);

    let instance = &node["containerInstances"][0];
    assert_eq!(instance["containerId"], "api");
    assert_eq!(instance["instanceId"], 1);
    assert_eq!(instance["environment"], "Live");
}

// =============================================================================
// View Records
// =============================================================================

#[test]
fn test_system_context_view_record() {
    let doc = document(&bank_workspace());
    let view = &doc["views"]["systemContextViews"][0];

    assert_eq!(view["key"], "Context");
    assert_eq!(view["description"], "Bank in context");
    assert_eq!(view["softwareSystemId"], "bank");
    assert_eq!(view["paperSize"], "A4_Landscape");
    assert_eq!(view["enterpriseBoundaryVisible"], true);

    let mut elements: Vec<&str> = view["elements"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_str().unwrap())
        .collect();
    elements.sort_unstable();
    assert_eq!(elements, vec!["bank", "customer"]);
    assert_eq!(view["relationships"], json!([{ "id": "r1" }]));
}

#[test]
fn test_filtered_view_record() {
    let doc = document(&bank_workspace());

    assert_eq!(
        doc["views"]["filteredViews"],
        json!([{
            "key": "External",
            "description": "",
            "baseViewKey": "Context",
            "mode": "Exclude",
            "tags": ["Internal"]
        }])
    );
}

#[test]
fn test_empty_view_groups_are_omitted() {
    let doc = document(&bank_workspace());
    let views = doc["views"].as_object().unwrap();

    assert!(views.contains_key("systemContextViews"));
    assert!(!views.contains_key("systemLandscapeViews"));
    assert!(!views.contains_key("dynamicViews"));
    assert!(views.contains_key("configuration"));
}

// =============================================================================
// Foreign Documents
// =============================================================================

#[test]
fn test_foreign_document_hydrates() {
    // Shape of a document written by the remote service: numeric-looking
    // string ids, implicit relationship sources and view layout
    let json = r#"{
      "id": 70818,
      "name": "Big Bank plc",
      "description": "",
      "lastModifiedDate": "2026-03-01T09:30:00Z",
      "model": {
        "people": [
          {
            "id": "1",
            "name": "Personal Banking Customer",
            "tags": "Element,Person",
            "location": "External",
            "relationships": [
              { "id": "3", "description": "Uses", "destinationId": "2" }
            ]
          }
        ],
        "softwareSystems": [
          { "id": "2", "name": "Internet Banking System", "tags": "Element,Software System" }
        ]
      },
      "views": {
        "systemContextViews": [
          {
            "key": "SystemContext",
            "softwareSystemId": "2",
            "paperSize": "A5_Landscape",
            "elements": [ { "id": "1", "x": 100, "y": 50 }, { "id": "2", "x": 700, "y": 50 } ],
            "relationships": [ { "id": "3", "vertices": [ { "x": 400, "y": 60 } ] } ]
          }
        ]
      }
    }"#;

    let workspace = exchange::from_json(json).unwrap();

    assert_eq!(workspace.id, Some(70818));
    assert!(workspace.last_modified.is_some());

    let relationship = workspace.model.relationship(&id("3")).unwrap();
    assert_eq!(relationship.source_id, id("1"));
    assert_eq!(relationship.destination_id, id("2"));

    let view = workspace.views.view("SystemContext").unwrap();
    assert_eq!(view.paper_size, Some(PaperSize::A5Landscape));
    assert_eq!(view.element_view(&id("2")).unwrap().x, Some(700));
    assert_eq!(view.relationships()[0].vertices.len(), 1);

    // New ids continue after the highest numeric id in the document
    let mut workspace = workspace;
    let next = workspace
        .model
        .add_person(ElementSpec::new("Business Customer"))
        .unwrap();
    assert_eq!(next.as_str(), "4");
}

#[test]
fn test_unknown_fields_are_ignored() {
    let json = r#"{
      "name": "Extra",
      "revision": 12,
      "model": { "people": [ { "id": "1", "name": "User", "group": "Staff" } ] }
    }"#;

    let workspace = exchange::from_json(json).unwrap();
    assert_eq!(workspace.model.element_count(), 1);
}

#[test]
fn test_large_paper_sizes_hydrate() {
    let json = r#"{
      "name": "Posters",
      "views": {
        "systemLandscapeViews": [
          { "key": "Wall", "paperSize": "A1_Landscape" },
          { "key": "Plotter", "paperSize": "A0_Portrait" },
          { "key": "Deck", "paperSize": "Slide_16_10" }
        ]
      }
    }"#;

    let workspace = exchange::from_json(json).unwrap();

    assert_eq!(
        workspace.views.view("Wall").unwrap().paper_size,
        Some(PaperSize::A1Landscape)
    );
    assert_eq!(
        workspace.views.view("Plotter").unwrap().paper_size,
        Some(PaperSize::A0Portrait)
    );
    assert_eq!(
        workspace.views.view("Deck").unwrap().paper_size,
        Some(PaperSize::Slide16x10)
    );

    let doc = document(&workspace);
    assert_eq!(doc["views"]["systemLandscapeViews"][0]["paperSize"], "A1_Landscape");
}
