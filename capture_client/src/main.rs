use std::{
    io::{self, BufRead, Write},
    process::ExitCode,
    sync::Arc,
};

use args::{Args, Command, Login, StoreMode};
use capture_client::{
    admin::{AdminGate, AdminSession, GENERATED_MESSAGE},
    api::RemoteStore,
    capture::{Capture, CaptureState},
    display::{render_capture, render_records},
    geocoding::NominatimGeocoder,
    local_store::LocalStore,
    position::{ask_on_terminal, ConsentGate, FixedPosition, IpPosition, NoPosition, PositionProvider},
    store::LocationStore,
};
use clap::Parser;
use location_tracker_lib::{messages, Coordinates};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod args;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| format!("{}={default_level}", env!("CARGO_CRATE_NAME")).into())
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let store: Arc<dyn LocationStore> = match args.store {
        StoreMode::Remote => Arc::new(RemoteStore::new(&args.server_url, args.admin_token.clone())),
        StoreMode::Local => {
            let local = LocalStore::new(&args.local_store);
            tracing::debug!("Using local store at {:?}", local.path());
            Arc::new(local)
        }
    };

    let gate = AdminGate::new(args.admin_user.clone(), args.admin_password.clone());

    match args.command {
        Command::Capture { lat, lon, ip, ip_service, yes } => {
            let position: Box<dyn PositionProvider> = match (lat, lon) {
                (Some(lat), Some(lon)) => Box::new(FixedPosition(Coordinates::new(lat, lon))),
                _ if ip => Box::new(IpPosition::new(ip_service)),
                _ => Box::new(NoPosition),
            };

            let position: Box<dyn PositionProvider> = if yes || !(ip || lat.is_some()) {
                position
            } else {
                Box::new(ConsentGate::new(position, ask_on_terminal))
            };

            let geocoder = NominatimGeocoder::new(&args.geocoder_url, &args.language)?;
            let mut capture = Capture::new(position, Box::new(geocoder), store)
                .with_device_info(args.device_info);

            let failed = matches!(capture.run().await, CaptureState::Failed(_));
            println!("{}", render_capture(capture.state()));
            if !failed && !capture.submitted() {
                eprintln!("{}", messages::SAVE_FAILED);
            }

            Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
        }
        Command::Simulate(login) => {
            let Some(session) = login_with(&gate, login).await? else {
                return Ok(ExitCode::FAILURE);
            };

            if session.generate(store.as_ref()).await.is_err() {
                eprintln!("{}", messages::SAVE_FAILED);
                return Ok(ExitCode::FAILURE);
            }
            println!("{GENERATED_MESSAGE}");

            list(&session, store.as_ref()).await
        }
        Command::List(login) => {
            let Some(session) = login_with(&gate, login).await? else {
                return Ok(ExitCode::FAILURE);
            };
            list(&session, store.as_ref()).await
        }
        Command::Clear(login) => {
            let Some(session) = login_with(&gate, login).await? else {
                return Ok(ExitCode::FAILURE);
            };

            match session.clear(store.as_ref()).await {
                Ok(message) => {
                    println!("{message}");
                    Ok(ExitCode::SUCCESS)
                }
                Err(message) => {
                    eprintln!("{message}");
                    Ok(ExitCode::FAILURE)
                }
            }
        }
    }
}

async fn login_with(gate: &AdminGate, login: Login) -> anyhow::Result<Option<AdminSession>> {
    let password = match login.password {
        Some(password) => password,
        None => tokio::task::spawn_blocking(ask_password).await??,
    };

    match gate.login(&login.username, &password) {
        Ok(session) => Ok(Some(session)),
        Err(err) => {
            eprintln!("{err}");
            Ok(None)
        }
    }
}

fn ask_password() -> io::Result<String> {
    eprint!("Senha: ");
    io::stderr().flush()?;

    let mut password = String::new();
    io::stdin().lock().read_line(&mut password)?;
    Ok(password.trim_end_matches(['\r', '\n']).to_string())
}

async fn list(session: &AdminSession, store: &dyn LocationStore) -> anyhow::Result<ExitCode> {
    match session.list(store).await {
        Ok(records) => {
            println!("{}", render_records(&records));
            Ok(ExitCode::SUCCESS)
        }
        Err(_) => {
            eprintln!("{}", messages::LIST_FAILED);
            Ok(ExitCode::FAILURE)
        }
    }
}
