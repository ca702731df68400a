//! Sample workspace
//!
//! A recruitment platform modelled end to end: people, systems, containers,
//! components, two deployment environments, one view of every type and a
//! set of styles. `c4 init --sample` writes it as the starting workspace.

use crate::domain::{ElementSpec, Location, RelationshipSpec, Tag, Workspace};
use crate::view::{ElementStyle, FilterMode, PaperSize, RelationshipStyle, Shape, ViewError};

pub const EXISTING_SYSTEM: &str = "Existing System";
pub const STAFF: &str = "Staff";
pub const WEB_BROWSER: &str = "Web Browser";
pub const MOBILE_APP: &str = "Mobile App";
pub const DATABASE: &str = "Database";
pub const FAILOVER: &str = "Failover";
pub const BOUNDED_CONTEXT: &str = "Bounded Context";

/// Builds the recruitment platform workspace
pub fn recruitment_workspace() -> Result<Workspace, ViewError> {
    let mut workspace = Workspace::new(
        "Recruitment Platform",
        "Publishes job openings, registers applicants and evaluates them",
    );
    let model = &mut workspace.model;
    model.enterprise = Some("Open Solutions".to_string());

    // People and software systems

    let applicant = model.add_person(
        ElementSpec::new("Applicant")
            .id("applicant")
            .description("Someone applying for a job opening through a temporary account")
            .location(Location::External),
    )?;
    let recruitment = model.add_software_system(
        ElementSpec::new("Recruitment System")
            .id("recruitmentSystem")
            .description("Publishes openings, registers applicants and runs evaluations")
            .location(Location::Internal),
    )?;
    model.uses(
        &applicant,
        &recruitment,
        "Registers with a temporary account and takes evaluations",
    )?;

    let mainframe = model.add_software_system(
        ElementSpec::new("Mainframe Business System")
            .id("mainframe")
            .description("Transactional core; hired applicants are registered here as employees")
            .location(Location::Internal)
            .tag(EXISTING_SYSTEM),
    )?;
    model.uses(&recruitment, &mainframe, "Registers new staff")?;

    let email = model.add_software_system(
        ElementSpec::new("E-mail System")
            .id("email")
            .description("Internal mail server")
            .location(Location::Internal)
            .tag(EXISTING_SYSTEM),
    )?;
    model.uses(&recruitment, &email, "Sends e-mail using")?;
    model.delivers(&email, &applicant, "Sends e-mails to")?;

    let portal = model.add_software_system(
        ElementSpec::new("Corporate Portal")
            .id("portal")
            .description("Static website with information about the organisation")
            .location(Location::Internal)
            .tag(EXISTING_SYSTEM),
    )?;
    model.uses(&applicant, &portal, "Looks for job openings")?;
    model.uses(&recruitment, &portal, "Publishes openings on")?;

    let hr_lead = model.add_person(
        ElementSpec::new("Head of Human Resources")
            .id("hrLead")
            .description("Decides on new positions and opens recruitment calls")
            .location(Location::Internal)
            .tag(STAFF),
    )?;
    model.uses(&hr_lead, &recruitment, "Uses")?;

    let committee = model.add_person(
        ElementSpec::new("Evaluation Committee")
            .id("committee")
            .description("Evaluates the applicants of a recruitment call")
            .location(Location::Internal)
            .tag(STAFF),
    )?;
    model.uses(&committee, &recruitment, "Uses")?;

    // Containers

    let spa = model.add_container(
        &recruitment,
        ElementSpec::new("Single-Page Application")
            .id("singlePageApplication")
            .description("Provides all functionality to applicants and staff")
            .technology("Flutter web")
            .tag(WEB_BROWSER),
    )?;
    for person in [&applicant, &hr_lead, &committee] {
        model.add_relationship(RelationshipSpec::new(person, &spa, "Uses").technology("JSON/HTTPS"))?;
    }

    let mobile = model.add_container(
        &recruitment,
        ElementSpec::new("Mobile App")
            .id("mobileApp")
            .description("Notifies applicants and lets them follow their application")
            .technology("Flutter")
            .tag(MOBILE_APP),
    )?;
    model.uses(&applicant, &mobile, "Uses")?;

    let api = model.add_container(
        &recruitment,
        ElementSpec::new("API Application")
            .id("apiApplication")
            .description("Provides the functionality via a JSON/HTTPS API")
            .technology("NestJS"),
    )?;
    for client in [&spa, &mobile] {
        model.add_relationship(
            RelationshipSpec::new(client, &api, "Makes API calls to").technology("JSON/HTTPS"),
        )?;
    }

    let mut contexts = Vec::new();
    for (id, name, aggregate) in [
        ("applicantContext", "Applicant Context", "applicant"),
        ("callContext", "Recruitment Call Context", "recruitment call"),
        ("evaluationContext", "Evaluation Context", "evaluation"),
    ] {
        let context = model.add_container(
            &recruitment,
            ElementSpec::new(name)
                .id(id)
                .description(format!("Manages the {} aggregate", aggregate))
                .technology("Java and Spring MVC")
                .tag(BOUNDED_CONTEXT),
        )?;
        model.uses(&api, &context, "Delegates to")?;
        contexts.push((context, aggregate));
    }

    let database = model.add_container(
        &recruitment,
        ElementSpec::new("Database")
            .id("database")
            .description("Stores applicants, calls, evaluations and credentials")
            .technology("Relational Database Schema")
            .tag(DATABASE),
    )?;
    for (context, aggregate) in &contexts {
        model.uses(context, &database, format!("Stores {}s in", aggregate))?;
    }
    if let Some((evaluation, _)) = contexts.last() {
        model.uses(evaluation, &mainframe, "Registers new staff")?;
    }

    // Components of the API application

    let sign_in = model.add_component(
        &api,
        ElementSpec::new("Sign In Controller")
            .id("signinController")
            .description("Allows users to sign in")
            .technology("NestJS controller"),
    )?;
    let reset_password = model.add_component(
        &api,
        ElementSpec::new("Reset Password Controller")
            .id("resetPasswordController")
            .description("Allows users to reset their passwords with a single use URL")
            .technology("NestJS controller"),
    )?;
    let security = model.add_component(
        &api,
        ElementSpec::new("Security Component")
            .id("securityComponent")
            .description("Signing in, changing passwords and so on")
            .technology("NestJS service"),
    )?;
    let mailer = model.add_component(
        &api,
        ElementSpec::new("E-mail Component")
            .id("emailComponent")
            .description("Sends e-mails to users")
            .technology("NestJS service"),
    )?;
    for controller in [&sign_in, &reset_password] {
        for client in [&spa, &mobile] {
            model.add_relationship(
                RelationshipSpec::new(client, controller, "Makes API calls to")
                    .technology("JSON/HTTPS"),
            )?;
        }
    }
    model.uses(&sign_in, &security, "Uses")?;
    model.uses(&reset_password, &security, "Uses")?;
    model.uses(&reset_password, &mailer, "Uses")?;
    model.add_relationship(
        RelationshipSpec::new(&security, &database, "Reads from and writes to").technology("JDBC"),
    )?;
    model.uses(&mailer, &email, "Sends e-mail using")?;

    // Deployment

    let laptop = model.add_deployment_node(
        "Development",
        ElementSpec::new("Developer Laptop")
            .id("developerLaptop")
            .technology("Microsoft Windows 10 or Apple macOS"),
    )?;
    let dev_web = model.add_child_deployment_node(
        &laptop,
        ElementSpec::new("Docker - Web Server").technology("Docker"),
    )?;
    model.add_container_instance(&dev_web, &api)?;
    let dev_db = model.add_child_deployment_node(
        &laptop,
        ElementSpec::new("Docker - Database Server").technology("Docker"),
    )?;
    model.add_container_instance(&dev_db, &database)?;
    let dev_browser = model.add_child_deployment_node(
        &laptop,
        ElementSpec::new("Web Browser").technology("Chrome, Firefox, Safari, or Edge"),
    )?;
    model.add_container_instance(&dev_browser, &spa)?;

    let phone = model.add_deployment_node(
        "Live",
        ElementSpec::new("Applicant's mobile device")
            .id("applicantPhone")
            .technology("Apple iOS or Android"),
    )?;
    model.add_container_instance(&phone, &mobile)?;

    let data_center = model.add_deployment_node(
        "Live",
        ElementSpec::new("Data Center").id("dataCenter"),
    )?;
    let api_server = model.add_child_deployment_node(
        &data_center,
        ElementSpec::new("api-***")
            .technology("Ubuntu 22.04 LTS")
            .instances(4)
            .property("Location", "Primary site"),
    )?;
    model.add_container_instance(&api_server, &api)?;
    let primary_db = model.add_child_deployment_node(
        &data_center,
        ElementSpec::new("db-01")
            .technology("PostgreSQL 16")
            .property("Location", "Primary site"),
    )?;
    model.add_container_instance(&primary_db, &database)?;
    let secondary_db = model.add_child_deployment_node(
        &data_center,
        ElementSpec::new("db-02")
            .technology("PostgreSQL 16")
            .property("Location", "Secondary site")
            .tag(FAILOVER),
    )?;
    let standby = model.add_container_instance(&secondary_db, &database)?;
    model.element_mut(&standby)?.tags.add(FAILOVER);
    let replication = model.add_relationship(
        RelationshipSpec::new(&primary_db, &secondary_db, "Replicates data to").tag(FAILOVER),
    )?;

    // Views

    let views = &mut workspace.views;
    let model = &workspace.model;

    let landscape = views.create_system_landscape_view(
        "SystemLandscape",
        "Overview of the recruitment platform and its neighbours",
    )?;
    landscape.add_all_elements(model)?;
    landscape.paper_size = Some(PaperSize::A4Landscape);

    let context = views.create_system_context_view(
        model,
        &recruitment,
        "SystemContext",
        "System context diagram for the recruitment system",
    )?;
    context.add_nearest_neighbours(model, &recruitment)?;
    context.paper_size = Some(PaperSize::A4Landscape);

    let containers = views.create_container_view(
        model,
        &recruitment,
        "Containers",
        "Container diagram for the recruitment system",
    )?;
    for id in [&applicant, &hr_lead, &committee] {
        containers.add(model, id)?;
    }
    containers.add_all_containers(model)?;
    containers.add(model, &mainframe)?;
    containers.add(model, &email)?;
    containers.paper_size = Some(PaperSize::A4Landscape);

    let components = views.create_component_view(
        model,
        &api,
        "Components",
        "Component diagram for the API application",
    )?;
    for id in [&mobile, &spa, &database] {
        components.add(model, id)?;
    }
    components.add_all_components(model)?;
    components.add(model, &email)?;
    components.paper_size = Some(PaperSize::A4Landscape);

    let sign_in_flow = views.create_dynamic_view(
        model,
        Some(&api),
        "SignIn",
        "How signing in works in the single-page application",
    )?;
    sign_in_flow.add_interaction(model, &spa, &sign_in, "Submits credentials to")?;
    sign_in_flow.add_interaction(model, &sign_in, &security, "Calls isAuthenticated() on")?;
    sign_in_flow.add_interaction(
        model,
        &security,
        &database,
        "select * from users where username = ?",
    )?;
    sign_in_flow.paper_size = Some(PaperSize::A5Landscape);

    let development = views.create_deployment_view(
        model,
        Some(&recruitment),
        "Development",
        "DevelopmentDeployment",
        "Development deployment of the recruitment system",
    )?;
    development.add_deployment_node(model, &laptop)?;
    development.paper_size = Some(PaperSize::A5Landscape);

    let live = views.create_deployment_view(
        model,
        Some(&recruitment),
        "Live",
        "LiveDeployment",
        "Live deployment of the recruitment system",
    )?;
    live.add_deployment_node(model, &data_center)?;
    live.add_deployment_node(model, &phone)?;
    live.add(model, &replication)?;
    live.paper_size = Some(PaperSize::A5Landscape);

    views.create_filtered_view(
        "SystemLandscape",
        "SystemLandscape-Internal",
        "The landscape without existing systems",
        FilterMode::Exclude,
        vec![EXISTING_SYSTEM.to_string()],
    )?;

    // Styles

    let configuration = &mut views.configuration;
    configuration.default_view = Some("SystemContext".to_string());
    let styles = &mut configuration.styles;
    styles.add_element_style(
        ElementStyle::new(Tag::SoftwareSystem.as_str())
            .background("#1168bd")
            .color("#ffffff"),
    );
    styles.add_element_style(
        ElementStyle::new(Tag::Container.as_str())
            .background("#438dd5")
            .color("#ffffff"),
    );
    styles.add_element_style(
        ElementStyle::new(Tag::Component.as_str())
            .background("#85bbf0")
            .color("#000000"),
    );
    styles.add_element_style(
        ElementStyle::new(Tag::Person.as_str())
            .background("#08427b")
            .color("#ffffff")
            .shape(Shape::Person)
            .font_size(22),
    );
    styles.add_element_style(
        ElementStyle::new(EXISTING_SYSTEM)
            .background("#999999")
            .color("#ffffff"),
    );
    styles.add_element_style(ElementStyle::new(STAFF).background("#999999").color("#ffffff"));
    styles.add_element_style(ElementStyle::new(WEB_BROWSER).shape(Shape::WebBrowser));
    styles.add_element_style(ElementStyle::new(MOBILE_APP).shape(Shape::MobileDeviceLandscape));
    styles.add_element_style(ElementStyle::new(DATABASE).shape(Shape::Cylinder));
    styles.add_element_style(ElementStyle::new(FAILOVER).opacity(25));
    styles.add_element_style(
        ElementStyle::new(BOUNDED_CONTEXT)
            .shape(Shape::Hexagon)
            .background("#facc2e"),
    );
    styles.add_relationship_style(RelationshipStyle::new(FAILOVER).opacity(25).position(70));

    Ok(workspace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ItemId;
    use crate::exchange;
    use crate::view::ViewType;

    fn id(value: &str) -> ItemId {
        ItemId::try_from(value).unwrap()
    }

    #[test]
    fn builds_one_view_of_every_type() {
        let workspace = recruitment_workspace().unwrap();

        for view_type in [
            ViewType::SystemLandscape,
            ViewType::SystemContext,
            ViewType::Container,
            ViewType::Component,
            ViewType::Dynamic,
            ViewType::Filtered,
        ] {
            assert_eq!(workspace.views.of_type(view_type).count(), 1, "{}", view_type);
        }
        assert_eq!(workspace.views.of_type(ViewType::Deployment).count(), 2);
    }

    #[test]
    fn context_view_holds_direct_neighbours_only() {
        let workspace = recruitment_workspace().unwrap();
        let view = workspace.views.get_view("SystemContext").unwrap();

        for neighbour in ["applicant", "mainframe", "email", "portal", "hrLead", "committee"] {
            assert!(view.contains_element(&id(neighbour)), "{}", neighbour);
        }
        assert!(!view.contains_element(&id("apiApplication")));
    }

    #[test]
    fn sign_in_flow_is_numbered() {
        let workspace = recruitment_workspace().unwrap();
        let view = workspace.views.get_view("SignIn").unwrap();

        let orders: Vec<&str> = view
            .relationships()
            .iter()
            .filter_map(|r| r.order.as_deref())
            .collect();
        assert_eq!(orders, vec!["1", "2", "3"]);
    }

    #[test]
    fn live_deployment_includes_replication() {
        let workspace = recruitment_workspace().unwrap();
        let view = workspace.views.get_view("LiveDeployment").unwrap();

        assert!(view.contains_element(&id("dataCenter")));
        assert!(view.contains_element(&id("applicantPhone")));
        let replicated = workspace
            .model
            .relationships()
            .find(|r| r.description == "Replicates data to")
            .unwrap();
        assert!(view.contains_relationship(&replicated.id));
    }

    #[test]
    fn survives_the_round_trip() {
        let workspace = recruitment_workspace().unwrap();

        let json = exchange::to_json(&workspace, true).unwrap();
        let restored = exchange::from_json(&json).unwrap();

        assert_eq!(restored.model.element_count(), workspace.model.element_count());
        assert_eq!(
            restored.model.relationship_count(),
            workspace.model.relationship_count()
        );
        assert_eq!(restored.views, workspace.views);
    }
}
