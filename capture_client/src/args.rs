use std::path::PathBuf;

use capture_client::{
    api::DEFAULT_SERVER_URL,
    geocoding::{DEFAULT_LANGUAGE, NOMINATIM_URL},
    local_store::DEFAULT_LOCAL_STORE,
    position::IP_API_URL,
};
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "capture-client",
    version,
    about = "Capture, describe and store visitor locations"
)]
pub struct Args {
    /// Where records are stored
    #[arg(long, value_enum, env = "LOCATION_STORE_MODE", default_value_t = StoreMode::Remote)]
    pub store: StoreMode,

    /// Base URL of the location server
    #[arg(long, env = "LOCATION_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    pub server_url: String,

    /// JSON file used by the local store
    #[arg(long, env = "LOCATION_LOCAL_STORE", default_value = DEFAULT_LOCAL_STORE)]
    pub local_store: PathBuf,

    /// Base URL of the Nominatim compatible reverse geocoder
    #[arg(long, env = "LOCATION_GEOCODER_URL", default_value = NOMINATIM_URL)]
    pub geocoder_url: String,

    /// Preferred language of place descriptions
    #[arg(long, env = "LOCATION_LANGUAGE", default_value = DEFAULT_LANGUAGE)]
    pub language: String,

    /// Bearer token sent to the server when listing or clearing
    #[arg(long, env = "LOCATION_ADMIN_TOKEN", hide_env_values = true)]
    pub admin_token: Option<String>,

    /// Free-text description of this device, stored with each capture
    #[arg(long)]
    pub device_info: Option<String>,

    /// Expected admin username
    #[arg(long, env = "LOCATION_ADMIN_USER", hide = true)]
    pub admin_user: Option<String>,

    /// Expected admin password
    #[arg(long, env = "LOCATION_ADMIN_PASSWORD", hide = true, hide_env_values = true)]
    pub admin_password: Option<String>,

    /// Print debug logs
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Capture the current position, describe it and store it
    Capture {
        /// Latitude in degrees
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude in degrees
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,

        /// Locate this machine by its public IP address
        #[arg(long, conflicts_with_all = ["lat", "lon"])]
        ip: bool,

        /// IP geolocation service
        #[arg(long, default_value = IP_API_URL)]
        ip_service: String,

        /// Do not ask for permission before reading the position
        #[arg(short, long)]
        yes: bool,
    },
    /// Store a simulated location and list all records
    Simulate(Login),
    /// List all stored records
    List(Login),
    /// Delete all stored records
    Clear(Login),
}

#[derive(clap::Args, Debug)]
pub struct Login {
    #[arg(short, long, env = "LOCATION_LOGIN_USER")]
    pub username: String,

    /// Asked on the terminal when neither given nor set in the environment
    #[arg(short, long, env = "LOCATION_LOGIN_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
pub enum StoreMode {
    /// The location server's HTTP API
    Remote,
    /// A JSON file on this machine
    Local,
}
