pub const LOCATIONS_TABLE_NAME: &str = "locations";
pub const ID: &str = "id";
pub const LATITUDE: &str = "latitude";
pub const LONGITUDE: &str = "longitude";
pub const COUNTRY: &str = "country";
pub const CITY: &str = "city";
pub const ADDRESS: &str = "address";
pub const PLACE_NAME: &str = "place_name";
pub const DEVICE_INFO: &str = "device_info";
pub const TIMESTAMP: &str = "timestamp";
