//! Command dispatch

use colored::Colorize;
use futures::future::join_all;
use openapi_client::{
    CreateDatabaseRequest, CreateDockerImageApplicationRequest, CreateDockerfileApplicationRequest,
    CreatePublicApplicationRequest, CreateServiceRequest, EnvironmentVariable,
    EnvironmentVariableRequest, PrivateKeyRequest, ProjectRequest, ServerRequest,
    UpdateApplicationRequest, UpdateDatabaseRequest, UpdateServiceRequest,
};
use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::app::options::{
    AppsCommand, BulkArgs, Cli, Command, ConfigCommand, CreateAppCommand, DatabasesCommand,
    DeployCommand, EnvCommand, EnvTarget, KeysCommand, PlacementArgs, ProfileCommand,
    ProjectsCommand, ServersCommand, ServicesCommand, SystemCommand, TeamsCommand,
};
use crate::app::state::AppState;
use crate::bulk::actions;
use crate::deploy::{DeployOptions, DeploymentController, DeploymentReference};
use crate::envsync::dotenv::is_valid_key;
use crate::envsync::{ApplicationEnv, EnvSync, RemoteEnv, ServiceEnv};
use crate::errors::ClientError;
use crate::filesys::file::File;
use crate::http::client::HttpClient;
use crate::logs::LogLevel;
use crate::output::OutputFormat;
use crate::utils::{mask_secret, version_info};

/// Execute the parsed command line
pub async fn run(cli: Cli, state: AppState) -> Result<(), ClientError> {
    match cli.command {
        Command::Profile(cmd) => {
            profile(&state, &cli.global.token, &cli.global.base_url, cmd).await
        }
        Command::Config(cmd) => config(&state, cmd).await,
        Command::Apps(cmd) => apps(&state, cmd).await,
        Command::Services(cmd) => services(&state, cmd).await,
        Command::Databases(cmd) => databases(&state, cmd).await,
        Command::Servers(cmd) => servers(&state, cmd).await,
        Command::Projects(cmd) => projects(&state, cmd).await,
        Command::Teams(cmd) => teams(&state, cmd).await,
        Command::Keys(cmd) => keys(&state, cmd).await,
        Command::Deploy(cmd) => deploy(&state, cmd).await,
        Command::Env(cmd) => env(&state, cmd).await,
        Command::Bulk(args) => bulk(&state, args).await,
        Command::System(cmd) => system(&state, cmd).await,
        Command::Resources => {
            let client = state.client()?;
            let resources = state.read(|| client.list_resources()).await?;
            state.print(&resources)
        }
        Command::Version => state.print(&version_info()),
    }
}

#[derive(Serialize)]
struct ProfileView {
    name: String,
    base_url: String,
    api_token: String,
    default: bool,
}

async fn profile(
    state: &AppState,
    token: &Option<String>,
    base_url: &Option<String>,
    cmd: ProfileCommand,
) -> Result<(), ClientError> {
    let store = &state.store;
    match cmd {
        ProfileCommand::Create { name, default } => {
            let token = token.as_deref().ok_or_else(|| {
                ClientError::InvalidArgument("--token is required to create a profile".into())
            })?;
            let created = store
                .update(|doc| {
                    let profile = doc.create_profile(&name, token, base_url.as_deref())?.clone();
                    if default {
                        doc.set_default_profile(&name)?;
                    }
                    Ok(profile)
                })
                .await?;
            info!(profile = %created.name, "profile created");
            state.report(
                &format!("Profile {} created", created.name.bold()),
                &json!({"name": created.name, "base_url": created.base_url}),
            )
        }
        ProfileCommand::Update { name } => {
            if token.is_none() && base_url.is_none() {
                return Err(ClientError::InvalidArgument(
                    "nothing to update, pass --token and/or --base-url".into(),
                ));
            }
            store
                .update(|doc| {
                    doc.update_profile(&name, token.as_deref(), base_url.as_deref())
                        .map(|_| ())
                })
                .await?;
            state.report(
                &format!("Profile {} updated", name.bold()),
                &json!({"name": name}),
            )
        }
        ProfileCommand::Delete { name } => {
            store.delete_profile(&name).await?;
            state.report(
                &format!("Profile {} deleted", name.bold()),
                &json!({"name": name}),
            )
        }
        ProfileCommand::List => {
            let (profiles, default) = store.list_profiles().await?;
            let views: Vec<ProfileView> = profiles
                .into_iter()
                .map(|p| ProfileView {
                    default: default.as_deref() == Some(p.name.as_str()),
                    api_token: mask_secret(&p.api_token),
                    name: p.name,
                    base_url: p.base_url,
                })
                .collect();
            if views.is_empty() && state.format() == OutputFormat::Table {
                state.warn("no profiles configured, create one with `coolifyme profile create`");
                return Ok(());
            }
            state.print(&views)
        }
        ProfileCommand::Use { name } => {
            store.set_default_profile(&name).await?;
            state.report(
                &format!("Default profile set to {}", name.bold()),
                &json!({"default_profile": name}),
            )
        }
        ProfileCommand::Show { name } => {
            let name = name.unwrap_or_else(|| state.config.profile_name.clone());
            let doc = store.load_or_default().await?;
            let profile = doc
                .profile(&name)
                .ok_or_else(|| ClientError::NotFound(format!("profile {:?} not found", name)))?;
            state.print(&ProfileView {
                name: profile.name.clone(),
                base_url: profile.base_url.clone(),
                api_token: mask_secret(&profile.api_token),
                default: doc.default_profile.as_deref() == Some(name.as_str()),
            })
        }
    }
}

async fn config(state: &AppState, cmd: ConfigCommand) -> Result<(), ClientError> {
    match cmd {
        ConfigCommand::Show => {
            use secrecy::ExposeSecret;
            let token = state
                .config
                .api_token
                .as_ref()
                .map(|t| mask_secret(t.expose_secret()));
            state.print(&json!({
                "config_file": state.store.file().path().display().to_string(),
                "profile": state.config.profile_name,
                "base_url": state.config.base_url,
                "api_token": token,
                "output_format": state.config.output_format,
                "log_level": state.config.log_level,
                "color": state.config.color,
            }))
        }
        ConfigCommand::Set { key, value } => {
            let (key, value) = (key.trim().to_string(), value.trim().to_string());
            state
                .store
                .update(|doc| {
                    let settings = &mut doc.global_settings;
                    match key.as_str() {
                        "output_format" | "output" => {
                            settings.output_format = Some(
                                value
                                    .parse::<OutputFormat>()
                                    .map_err(ClientError::InvalidArgument)?,
                            );
                        }
                        "log_level" => {
                            settings.log_level = Some(
                                value
                                    .parse::<LogLevel>()
                                    .map_err(ClientError::InvalidArgument)?,
                            );
                        }
                        "color_output" | "color" => {
                            settings.color_output = match value.as_str() {
                                "true" | "on" | "yes" => Some(true),
                                "false" | "off" | "no" => Some(false),
                                "auto" | "unset" | "" => None,
                                other => {
                                    return Err(ClientError::InvalidArgument(format!(
                                        "invalid color setting {:?}, use true, false or auto",
                                        other
                                    )))
                                }
                            };
                        }
                        other => {
                            return Err(ClientError::InvalidArgument(format!(
                                "unknown setting {:?}, expected output_format, color_output \
                                 or log_level",
                                other
                            )))
                        }
                    }
                    Ok(())
                })
                .await?;
            state.report(
                &format!("{} set to {}", key.bold(), value),
                &json!({ "key": key, "value": value }),
            )
        }
        ConfigCommand::Path => {
            println!("{}", state.store.file().path().display());
            Ok(())
        }
    }
}

type Placement = (Option<String>, Option<String>, Option<String>, Option<bool>);

fn placement_fields(p: &PlacementArgs) -> Placement {
    (
        p.destination.clone(),
        p.name.clone(),
        p.description.clone(),
        p.instant_deploy.then_some(true),
    )
}

async fn apps(state: &AppState, cmd: AppsCommand) -> Result<(), ClientError> {
    let client = state.client()?;
    match cmd {
        AppsCommand::List => {
            let apps = state.read(|| client.list_applications()).await?;
            state.print(&apps)
        }
        AppsCommand::Get { uuid } => {
            let app = state.read(|| client.get_application(&uuid)).await?;
            state.print(&app)
        }
        AppsCommand::Create(create) => {
            let uuid = match create {
                CreateAppCommand::Public {
                    placement,
                    git_repository,
                    git_branch,
                    build_pack,
                    ports_exposes,
                    domains,
                } => {
                    let (destination_uuid, name, description, instant_deploy) =
                        placement_fields(&placement);
                    let request = CreatePublicApplicationRequest {
                        project_uuid: placement.project,
                        server_uuid: placement.server,
                        environment_name: placement.environment,
                        git_repository,
                        git_branch,
                        build_pack,
                        ports_exposes,
                        destination_uuid,
                        name,
                        description,
                        domains,
                        instant_deploy,
                    };
                    state.write(|| client.create_public_application(&request)).await?
                }
                CreateAppCommand::Dockerfile {
                    placement,
                    dockerfile,
                    ports_exposes,
                    domains,
                } => {
                    let dockerfile = File::checked(&dockerfile)?.read_string().await?;
                    let (destination_uuid, name, description, instant_deploy) =
                        placement_fields(&placement);
                    let request = CreateDockerfileApplicationRequest {
                        project_uuid: placement.project,
                        server_uuid: placement.server,
                        environment_name: placement.environment,
                        dockerfile,
                        destination_uuid,
                        ports_exposes,
                        name,
                        description,
                        domains,
                        instant_deploy,
                    };
                    state
                        .write(|| client.create_dockerfile_application(&request))
                        .await?
                }
                CreateAppCommand::Image {
                    placement,
                    image,
                    tag,
                    ports_exposes,
                    domains,
                } => {
                    let (destination_uuid, name, description, instant_deploy) =
                        placement_fields(&placement);
                    let request = CreateDockerImageApplicationRequest {
                        project_uuid: placement.project,
                        server_uuid: placement.server,
                        environment_name: placement.environment,
                        docker_registry_image_name: image,
                        ports_exposes,
                        docker_registry_image_tag: tag,
                        destination_uuid,
                        name,
                        description,
                        domains,
                        instant_deploy,
                    };
                    state
                        .write(|| client.create_dockerimage_application(&request))
                        .await?
                }
            };
            state.report(&format!("Application {} created", uuid.bold()), &json!({ "uuid": uuid }))
        }
        AppsCommand::Update {
            uuid,
            name,
            description,
            domains,
            git_branch,
            git_repository,
            ports_exposes,
        } => {
            let request = UpdateApplicationRequest {
                name,
                description,
                domains,
                git_branch,
                git_repository,
                ports_exposes,
                instant_deploy: None,
            };
            let response = state.write(|| client.update_application(&uuid, &request)).await?;
            state.report(&format!("Application {} updated", uuid.bold()), &response)
        }
        AppsCommand::Delete { uuid } => {
            let response = state.write(|| client.delete_application(&uuid)).await?;
            state.report(&format!("Application {} deleted", uuid.bold()), &response)
        }
        AppsCommand::Start {
            uuid,
            force,
            instant,
        } => {
            let response = state
                .write(|| client.start_application(&uuid, force, instant))
                .await?;
            let deployment = response.deployment_uuid.clone().unwrap_or_default();
            state.report(
                &format!("Application {} queued for deployment {}", uuid.bold(), deployment),
                &response,
            )
        }
        AppsCommand::Stop { uuid } => {
            let response = state.write(|| client.stop_application(&uuid)).await?;
            state.report(&format!("Application {} stopping", uuid.bold()), &response)
        }
        AppsCommand::Restart { uuid } => {
            let response = state.write(|| client.restart_application(&uuid)).await?;
            state.report(&format!("Application {} restarting", uuid.bold()), &response)
        }
        AppsCommand::Logs { uuid, lines } => {
            let logs = state.read(|| client.application_logs(&uuid, lines)).await?;
            match state.format() {
                OutputFormat::Table => {
                    println!("{}", logs.trim_end());
                    Ok(())
                }
                _ => state.print(&json!({ "uuid": uuid, "logs": logs })),
            }
        }
    }
}

async fn services(state: &AppState, cmd: ServicesCommand) -> Result<(), ClientError> {
    let client = state.client()?;
    match cmd {
        ServicesCommand::List => {
            let services = state.read(|| client.list_services()).await?;
            state.print(&services)
        }
        ServicesCommand::Get { uuid } => {
            let service = state.read(|| client.get_service(&uuid)).await?;
            state.print(&service)
        }
        ServicesCommand::Create {
            placement,
            service_type,
            compose_file,
        } => {
            let docker_compose_raw = match compose_file {
                Some(path) => Some(File::checked(&path)?.read_string().await?),
                None => None,
            };
            let (destination_uuid, name, description, instant_deploy) =
                placement_fields(&placement);
            let request = CreateServiceRequest {
                service_type,
                project_uuid: placement.project,
                server_uuid: placement.server,
                environment_name: placement.environment,
                name,
                description,
                destination_uuid,
                docker_compose_raw,
                instant_deploy,
            };
            let uuid = state.write(|| client.create_service(&request)).await?;
            state.report(&format!("Service {} created", uuid.bold()), &json!({ "uuid": uuid }))
        }
        ServicesCommand::Update {
            uuid,
            name,
            description,
            compose_file,
        } => {
            let docker_compose_raw = match compose_file {
                Some(path) => Some(File::checked(&path)?.read_string().await?),
                None => None,
            };
            let request = UpdateServiceRequest {
                name,
                description,
                docker_compose_raw,
            };
            let response = state.write(|| client.update_service(&uuid, &request)).await?;
            state.report(&format!("Service {} updated", uuid.bold()), &response)
        }
        ServicesCommand::Delete { uuid } => {
            let response = state.write(|| client.delete_service(&uuid)).await?;
            state.report(&format!("Service {} deleted", uuid.bold()), &response)
        }
        ServicesCommand::Start { uuid } => {
            let response = state.write(|| client.start_service(&uuid)).await?;
            state.report(&format!("Service {} starting", uuid.bold()), &response)
        }
        ServicesCommand::Stop { uuid } => {
            let response = state.write(|| client.stop_service(&uuid)).await?;
            state.report(&format!("Service {} stopping", uuid.bold()), &response)
        }
        ServicesCommand::Restart { uuid } => {
            let response = state.write(|| client.restart_service(&uuid)).await?;
            state.report(&format!("Service {} restarting", uuid.bold()), &response)
        }
    }
}

/// Print an opaque response body, pretty-printed when it happens to be JSON
fn print_raw(state: &AppState, body: &str) -> Result<(), ClientError> {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => state.print(&value),
        Err(_) => {
            println!("{}", body.trim_end());
            Ok(())
        }
    }
}

async fn databases(state: &AppState, cmd: DatabasesCommand) -> Result<(), ClientError> {
    let client = state.client()?;
    match cmd {
        DatabasesCommand::List => {
            let body = state.read(|| client.list_databases()).await?;
            print_raw(state, &body)
        }
        DatabasesCommand::Get { uuid } => {
            let body = state.read(|| client.get_database(&uuid)).await?;
            print_raw(state, &body)
        }
        DatabasesCommand::Create {
            engine,
            placement,
            image,
            public_port,
        } => {
            let (destination_uuid, name, description, instant_deploy) =
                placement_fields(&placement);
            let request = CreateDatabaseRequest {
                server_uuid: placement.server,
                project_uuid: placement.project,
                environment_name: placement.environment,
                destination_uuid,
                name,
                description,
                image,
                is_public: public_port.map(|_| true),
                public_port,
                instant_deploy,
            };
            let uuid = state.write(|| client.create_database(engine, &request)).await?;
            state.report(&format!("Database {} created", uuid.bold()), &json!({ "uuid": uuid }))
        }
        DatabasesCommand::Update {
            uuid,
            name,
            description,
            image,
            public_port,
        } => {
            let request = UpdateDatabaseRequest {
                name,
                description,
                image,
                is_public: public_port.map(|_| true),
                public_port,
            };
            let response = state.write(|| client.update_database(&uuid, &request)).await?;
            state.report(&format!("Database {} updated", uuid.bold()), &response)
        }
        DatabasesCommand::Delete {
            uuid,
            delete_volumes,
        } => {
            let response = state
                .write(|| client.delete_database(&uuid, delete_volumes))
                .await?;
            state.report(&format!("Database {} deleted", uuid.bold()), &response)
        }
        DatabasesCommand::Start { uuid } => {
            let response = state.write(|| client.start_database(&uuid)).await?;
            state.report(&format!("Database {} starting", uuid.bold()), &response)
        }
        DatabasesCommand::Stop { uuid } => {
            let response = state.write(|| client.stop_database(&uuid)).await?;
            state.report(&format!("Database {} stopping", uuid.bold()), &response)
        }
        DatabasesCommand::Restart { uuid } => {
            let response = state.write(|| client.restart_database(&uuid)).await?;
            state.report(&format!("Database {} restarting", uuid.bold()), &response)
        }
    }
}

async fn servers(state: &AppState, cmd: ServersCommand) -> Result<(), ClientError> {
    let client = state.client()?;
    match cmd {
        ServersCommand::List => {
            let servers = state.read(|| client.list_servers()).await?;
            state.print(&servers)
        }
        ServersCommand::Get { uuid } => {
            let server = state.read(|| client.get_server(&uuid)).await?;
            state.print(&server)
        }
        ServersCommand::Create {
            name,
            ip,
            port,
            user,
            private_key,
            description,
            build_server,
            validate,
        } => {
            let request = ServerRequest {
                name: Some(name),
                description,
                ip: Some(ip),
                port: Some(port),
                user: Some(user),
                private_key_uuid: Some(private_key),
                is_build_server: Some(build_server),
                instant_validate: Some(validate),
            };
            let uuid = state.write(|| client.create_server(&request)).await?;
            state.report(&format!("Server {} created", uuid.bold()), &json!({ "uuid": uuid }))
        }
        ServersCommand::Update {
            uuid,
            name,
            description,
            ip,
            port,
            user,
        } => {
            let request = ServerRequest {
                name,
                description,
                ip,
                port,
                user,
                ..Default::default()
            };
            let response = state.write(|| client.update_server(&uuid, &request)).await?;
            state.report(&format!("Server {} updated", uuid.bold()), &response)
        }
        ServersCommand::Delete { uuid } => {
            let response = state.write(|| client.delete_server(&uuid)).await?;
            state.report(&format!("Server {} deleted", uuid.bold()), &response)
        }
        ServersCommand::Validate { uuid } => {
            let response = state.write(|| client.validate_server(&uuid)).await?;
            state.report(&format!("Validation of server {} started", uuid.bold()), &response)
        }
        ServersCommand::Resources { uuid } => {
            let body = state.read(|| client.server_resources(&uuid)).await?;
            print_raw(state, &body)
        }
        ServersCommand::Domains { uuid } => {
            let body = state.read(|| client.server_domains(&uuid)).await?;
            print_raw(state, &body)
        }
    }
}

async fn projects(state: &AppState, cmd: ProjectsCommand) -> Result<(), ClientError> {
    let client = state.client()?;
    match cmd {
        ProjectsCommand::List => {
            let projects = state.read(|| client.list_projects()).await?;
            state.print(&projects)
        }
        ProjectsCommand::Get { uuid } => {
            let project = state.read(|| client.get_project(&uuid)).await?;
            state.print(&project)
        }
        ProjectsCommand::Create { name, description } => {
            let request = ProjectRequest {
                name: Some(name),
                description,
            };
            let uuid = state.write(|| client.create_project(&request)).await?;
            state.report(&format!("Project {} created", uuid.bold()), &json!({ "uuid": uuid }))
        }
        ProjectsCommand::Update {
            uuid,
            name,
            description,
        } => {
            let request = ProjectRequest { name, description };
            let response = state.write(|| client.update_project(&uuid, &request)).await?;
            state.report(&format!("Project {} updated", uuid.bold()), &response)
        }
        ProjectsCommand::Delete { uuid } => {
            let response = state.write(|| client.delete_project(&uuid)).await?;
            state.report(&format!("Project {} deleted", uuid.bold()), &response)
        }
        ProjectsCommand::Environment { uuid, environment } => {
            let env = state
                .read(|| client.get_project_environment(&uuid, &environment))
                .await?;
            state.print(&env)
        }
    }
}

async fn teams(state: &AppState, cmd: TeamsCommand) -> Result<(), ClientError> {
    let client = state.client()?;
    match cmd {
        TeamsCommand::List => {
            let teams = state.read(|| client.list_teams()).await?;
            state.print(&teams)
        }
        TeamsCommand::Get { id } => {
            let team = state.read(|| client.get_team(id)).await?;
            state.print(&team)
        }
        TeamsCommand::Members { id: Some(id) } => {
            let members = state.read(|| client.team_members(id)).await?;
            state.print(&members)
        }
        TeamsCommand::Members { id: None } => {
            let members = state.read(|| client.current_team_members()).await?;
            state.print(&members)
        }
        TeamsCommand::Current => {
            let team = state.read(|| client.current_team()).await?;
            state.print(&team)
        }
    }
}

async fn keys(state: &AppState, cmd: KeysCommand) -> Result<(), ClientError> {
    let client = state.client()?;
    match cmd {
        KeysCommand::List => {
            let keys = state.read(|| client.list_private_keys()).await?;
            state.print(&keys)
        }
        KeysCommand::Get { uuid } => {
            let key = state.read(|| client.get_private_key(&uuid)).await?;
            state.print(&key)
        }
        KeysCommand::Create {
            name,
            description,
            key_file,
        } => {
            let private_key = File::checked(&key_file)?.read_string().await?;
            let request = PrivateKeyRequest {
                uuid: None,
                name: Some(name),
                description,
                private_key: Some(private_key),
            };
            let uuid = state.write(|| client.create_private_key(&request)).await?;
            state.report(&format!("Private key {} created", uuid.bold()), &json!({ "uuid": uuid }))
        }
        KeysCommand::Update {
            uuid,
            name,
            description,
            key_file,
        } => {
            let private_key = match key_file {
                Some(path) => Some(File::checked(&path)?.read_string().await?),
                None => None,
            };
            let request = PrivateKeyRequest {
                uuid: None,
                name,
                description,
                private_key,
            };
            let response = state.write(|| client.update_private_key(&uuid, &request)).await?;
            state.report(&format!("Private key {} updated", uuid.bold()), &response)
        }
        KeysCommand::Delete { uuid } => {
            let response = state.write(|| client.delete_private_key(&uuid)).await?;
            state.report(&format!("Private key {} deleted", uuid.bold()), &response)
        }
    }
}

async fn deploy(state: &AppState, cmd: DeployCommand) -> Result<(), ClientError> {
    let client = state.client()?;
    let controller = DeploymentController::new(client);
    match cmd {
        DeployCommand::App {
            uuids,
            force,
            branch,
            pr,
            watch,
        } => {
            let options = DeployOptions { force, branch, pr };
            let references = state
                .write(|| controller.trigger_multiple(&uuids, &options))
                .await?;
            if state.format() == OutputFormat::Table {
                for r in &references {
                    println!(
                        "{} {} deployment {} queued",
                        "✓".green(),
                        r.resource_uuid.bold(),
                        r.deployment_uuid
                    );
                }
            } else {
                state.print(&references)?;
            }
            if !watch {
                return Ok(());
            }

            let watched: Vec<&DeploymentReference> = references
                .iter()
                .filter(|r| !r.deployment_uuid.is_empty())
                .collect();
            let results = join_all(
                watched
                    .iter()
                    .map(|r| controller.watch(&r.deployment_uuid, &state.cancel)),
            )
            .await;
            let mut first_error = None;
            for (reference, result) in watched.into_iter().zip(results) {
                match result {
                    Ok(status) => println!(
                        "{} deployment {} {}",
                        "✓".green(),
                        reference.deployment_uuid,
                        status.status
                    ),
                    Err(e) => {
                        eprintln!(
                            "{} deployment {}: {}",
                            "✗".red(),
                            reference.deployment_uuid,
                            e
                        );
                        first_error.get_or_insert(e);
                    }
                }
            }
            first_error.map_or(Ok(()), Err)
        }
        DeployCommand::Service { uuid } => {
            let response = state.write(|| controller.deploy_service(&uuid)).await?;
            state.report(&format!("Service {} deploying", uuid.bold()), &response)
        }
        DeployCommand::Status { deployment_uuid } => {
            let status = state.read(|| controller.get(&deployment_uuid)).await?;
            state.print(&status)
        }
        DeployCommand::Watch { deployment_uuid } => {
            let status = controller.watch(&deployment_uuid, &state.cancel).await?;
            state.report(
                &format!("Deployment {} {}", deployment_uuid.bold(), status.status),
                &status,
            )
        }
        DeployCommand::List { app, skip, take } => {
            let deployments = match app {
                Some(app) => {
                    state
                        .read(|| controller.list_for_app(&app, skip, take))
                        .await?
                }
                None => state.read(|| controller.list_all()).await?,
            };
            state.print(&deployments)
        }
    }
}

#[derive(Serialize)]
struct EnvRow {
    key: String,
    value: String,
    build_time: bool,
    preview: bool,
}

async fn list_envs(
    state: &AppState,
    client: &HttpClient,
    target: &EnvTarget,
) -> Result<Vec<EnvironmentVariable>, ClientError> {
    if target.service {
        state.read(|| client.list_service_envs(&target.uuid)).await
    } else {
        state.read(|| client.list_application_envs(&target.uuid)).await
    }
}

async fn env(state: &AppState, cmd: EnvCommand) -> Result<(), ClientError> {
    let client = state.client()?;
    match cmd {
        EnvCommand::List {
            target,
            show_values,
        } => {
            let vars = list_envs(state, &client, &target).await?;
            let rows: Vec<EnvRow> = vars
                .into_iter()
                .map(|v| {
                    let value = v.value.unwrap_or_default();
                    EnvRow {
                        key: v.key.unwrap_or_default(),
                        value: if show_values { value } else { mask_secret(&value) },
                        build_time: v.is_build_time.unwrap_or(false),
                        preview: v.is_preview.unwrap_or(false),
                    }
                })
                .collect();
            state.print(&rows)
        }
        EnvCommand::Set {
            target,
            pair,
            build_time,
            preview,
            literal,
        } => {
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                ClientError::InvalidArgument(format!("expected KEY=VALUE, got {:?}", pair))
            })?;
            let key = key.trim();
            if !is_valid_key(key) {
                return Err(ClientError::InvalidArgument(format!(
                    "invalid variable name {:?}",
                    key
                )));
            }
            let request = EnvironmentVariableRequest {
                key: key.to_string(),
                value: value.to_string(),
                is_preview: preview.then_some(true),
                is_build_time: build_time.then_some(true),
                is_literal: literal.then_some(true),
                is_multiline: value.contains('\n').then_some(true),
                is_shown_once: None,
            };
            let exists = list_envs(state, &client, &target)
                .await?
                .iter()
                .any(|v| v.key.as_deref() == Some(key) && v.is_preview.unwrap_or(false) == preview);
            match (exists, target.service) {
                (true, false) => {
                    state
                        .write(|| client.update_application_env(&target.uuid, &request))
                        .await?;
                }
                (true, true) => {
                    state
                        .write(|| client.update_service_env(&target.uuid, &request))
                        .await?;
                }
                (false, false) => {
                    state
                        .write(|| client.create_application_env(&target.uuid, &request))
                        .await?;
                }
                (false, true) => {
                    state
                        .write(|| client.create_service_env(&target.uuid, &request))
                        .await?;
                }
            }
            let verb = if exists { "updated" } else { "created" };
            state.report(
                &format!("Variable {} {}", key.bold(), verb),
                &json!({ "key": key, "result": verb }),
            )
        }
        EnvCommand::Delete { target, key } => {
            let vars = list_envs(state, &client, &target).await?;
            let env_uuids: Vec<String> = vars
                .into_iter()
                .filter(|v| v.key.as_deref() == Some(key.as_str()))
                .filter_map(|v| v.uuid)
                .collect();
            if env_uuids.is_empty() {
                return Err(ClientError::NotFound(format!("variable {:?} not found", key)));
            }
            for env_uuid in &env_uuids {
                if target.service {
                    state
                        .write(|| client.delete_service_env(&target.uuid, env_uuid))
                        .await?;
                } else {
                    state
                        .write(|| client.delete_application_env(&target.uuid, env_uuid))
                        .await?;
                }
            }
            state.report(&format!("Variable {} deleted", key.bold()), &json!({ "key": key }))
        }
        cmd => {
            let target = cmd.target().clone();
            if target.service {
                let remote = ServiceEnv::new(client, target.uuid);
                env_file(state, EnvSync::new(remote), cmd).await
            } else {
                let remote = ApplicationEnv::new(client, target.uuid);
                env_file(state, EnvSync::new(remote), cmd).await
            }
        }
    }
}

async fn env_file<R: RemoteEnv>(
    state: &AppState,
    engine: EnvSync<R>,
    cmd: EnvCommand,
) -> Result<(), ClientError> {
    let table = state.format() == OutputFormat::Table;
    match cmd {
        EnvCommand::Export {
            file,
            force,
            dry_run,
            ..
        } => {
            let report = engine.export(&file, force, dry_run).await?;
            if !table {
                return state.print(&report);
            }
            let verb = if dry_run { "Would export" } else { "Exported" };
            println!(
                "{} {} {} variable(s) to {}",
                "✓".green(),
                verb,
                report.count,
                report.path.display()
            );
            Ok(())
        }
        EnvCommand::Import { file, dry_run, .. } => {
            let report = engine.import(&file, dry_run).await?;
            if !table {
                let masked: std::collections::BTreeMap<&String, String> = report
                    .variables
                    .iter()
                    .map(|(k, v)| (k, mask_secret(v)))
                    .collect();
                return state.print(&json!({
                    "path": report.path,
                    "variables": masked,
                    "dry_run": report.dry_run,
                }));
            }
            if dry_run {
                for (key, value) in &report.variables {
                    println!("  {}={}", key, mask_secret(value));
                }
                println!("Would import {} variable(s)", report.variables.len());
            } else {
                println!(
                    "{} Imported {} variable(s) from {}",
                    "✓".green(),
                    report.variables.len(),
                    report.path.display()
                );
            }
            Ok(())
        }
        EnvCommand::Sync { file, dry_run, .. } => {
            let report = engine.sync(&file, dry_run).await?;
            if !table {
                return state.print(&json!({
                    "path": report.path,
                    "dry_run": report.dry_run,
                    "add_to_remote": report.plan.add_to_remote.keys().collect::<Vec<_>>(),
                    "update_in_remote": report.plan.update_in_remote.keys().collect::<Vec<_>>(),
                    "add_to_file": report.plan.add_to_file.keys().collect::<Vec<_>>(),
                    "update_in_file": report.plan.update_in_file.keys().collect::<Vec<_>>(),
                }));
            }
            let plan = &report.plan;
            if plan.total_changes() == 0 {
                println!("{} Already in sync", "✓".green());
                return Ok(());
            }
            let prefix = if dry_run { "Would apply" } else { "Applied" };
            println!(
                "{} {}: {} added and {} updated on the Platform, {} added and {} updated in {}",
                "✓".green(),
                prefix,
                plan.add_to_remote.len(),
                plan.update_in_remote.len(),
                plan.add_to_file.len(),
                plan.update_in_file.len(),
                report.path.display()
            );
            Ok(())
        }
        EnvCommand::Cleanup {
            file,
            backup,
            dry_run,
            ..
        } => {
            let report = engine.cleanup(&file, backup, dry_run).await?;
            if !table {
                return state.print(&report);
            }
            if report.removed.is_empty() {
                println!("{} Nothing to clean up", "✓".green());
                return Ok(());
            }
            for key in &report.removed {
                println!("  - {}", key);
            }
            if let Some(backup) = &report.backup {
                println!("Backup written to {}", backup.display());
            }
            let verb = if dry_run { "Would remove" } else { "Removed" };
            println!("{} {} {} variable(s)", "✓".green(), verb, report.removed.len());
            Ok(())
        }
        EnvCommand::List { .. } | EnvCommand::Set { .. } | EnvCommand::Delete { .. } => Err(
            ClientError::InvalidArgument("command does not operate on a .env file".into()),
        ),
    }
}

async fn bulk(state: &AppState, args: BulkArgs) -> Result<(), ClientError> {
    let client = state.client()?;
    let targets = state
        .read(|| actions::select_targets(&client, args.kind, args.filter.as_deref()))
        .await?;
    if targets.is_empty() {
        state.warn("no matching resources");
        return Ok(());
    }
    if args.dry_run {
        return state.print(&targets);
    }

    let report = actions::run(
        &client,
        args.kind,
        args.action,
        &targets,
        args.concurrency,
        &state.cancel,
    )
    .await;

    if state.format() != OutputFormat::Table {
        return state.print(&json!({
            "summary": report.summary(),
            "results": report.items(),
        }));
    }
    for item in &report.results {
        match &item.outcome {
            Ok(message) => println!("{} {} {}", "✓".green(), item.id.bold(), message),
            Err(e) => println!("{} {} {}", "✗".red(), item.id.bold(), e),
        }
    }
    println!("{}", report.summary());
    Ok(())
}

async fn system(state: &AppState, cmd: SystemCommand) -> Result<(), ClientError> {
    let client = state.client()?;
    match cmd {
        SystemCommand::Version => {
            let version = state.read(|| client.version()).await?;
            match state.format() {
                OutputFormat::Table => {
                    println!("{}", version);
                    Ok(())
                }
                _ => state.print(&json!({ "version": version })),
            }
        }
        SystemCommand::Health => {
            let health = state.read(|| client.healthcheck()).await?;
            match state.format() {
                OutputFormat::Table => {
                    println!("{}", health);
                    Ok(())
                }
                _ => state.print(&json!({ "health": health })),
            }
        }
        SystemCommand::EnableApi => {
            let response = state.write(|| client.enable_api()).await?;
            state.report("API enabled", &response)
        }
        SystemCommand::DisableApi => {
            let response = state.write(|| client.disable_api()).await?;
            state.report("API disabled", &response)
        }
    }
}
