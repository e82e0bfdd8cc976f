use location_tracker_data_management::DataManager;

pub struct ServerState {
    pub data_manager: DataManager,
    /// Bearer token guarding list and clear. `None` leaves them open.
    pub admin_token: Option<String>,
}

impl ServerState {
    pub fn new(data_manager: DataManager, admin_token: Option<String>) -> Self {
        Self {
            data_manager,
            admin_token,
        }
    }
}
